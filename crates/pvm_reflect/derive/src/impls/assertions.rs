use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectMeta;

/// Checks at compile time that the type implements every trait listed in
/// `#[reflect(implements(...))]`.
///
/// Only emitted for non-generic types.
pub(crate) fn get_implements_assertion(meta: &ReflectMeta) -> TokenStream {
    let interfaces = &meta.attrs().implements;
    if interfaces.is_empty() || meta.impl_with_generic() {
        return crate::utils::empty();
    }

    let ident = meta.ident();

    quote! {
        #[allow(dead_code)]
        fn __assert_implements(value: &#ident) {
            #(let _: &dyn #interfaces = value;)*
        }
    }
}
