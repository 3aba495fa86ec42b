use proc_macro2::TokenStream;

use crate::derive_data::ReflectMeta;

/// Submits the `type_id` declaration of the type to `inventory`.
#[cfg(feature = "auto_register")]
pub(crate) fn get_auto_register_impl(meta: &ReflectMeta) -> TokenStream {
    let Some(type_id) = &meta.attrs().type_id else {
        return crate::utils::empty();
    };

    // Generic types have no single `TypeInfo` to submit.
    if meta.impl_with_generic() {
        return syn::Error::new(type_id.span(), "`type_id` requires a non-generic type")
            .to_compile_error();
    }

    let pvm_reflect_path = meta.pvm_reflect_path();
    let auto_register_ = crate::path::auto_register_(pvm_reflect_path);
    let typed_ = crate::path::typed_(pvm_reflect_path);
    let ident = meta.ident();

    quote::quote! {
        #auto_register_::inventory::submit! {
            #auto_register_::TypeIdRegistration {
                type_info: <#ident as #typed_>::type_info,
                type_id: #type_id,
            }
        }
    }
}

/// Without the feature the attribute is accepted and ignored.
#[cfg(not(feature = "auto_register"))]
pub(crate) fn get_auto_register_impl(_: &ReflectMeta) -> TokenStream {
    crate::utils::empty()
}
