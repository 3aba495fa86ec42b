use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectMeta;

/// Generates `Reflect`. `kind` names both the `ReflectRef` variant and,
/// if `mutable_kind` is set, the `ReflectMut` one; otherwise the value is
/// exposed as `ReflectMut::Value`.
pub(crate) fn impl_trait_reflect(meta: &ReflectMeta, kind: TokenStream, mutable_kind: bool) -> TokenStream {
    let pvm_reflect_path = meta.pvm_reflect_path();
    let reflect_ = crate::path::reflect_(pvm_reflect_path);
    let typed_ = crate::path::typed_(pvm_reflect_path);
    let type_info_ = crate::path::type_info_(pvm_reflect_path);
    let reflect_ref_ = crate::path::reflect_ref_(pvm_reflect_path);
    let reflect_mut_ = crate::path::reflect_mut_(pvm_reflect_path);
    let box_ = crate::path::macro_box_(pvm_reflect_path);

    let reflect_mut_tokens = if mutable_kind {
        quote!(#reflect_mut_::#kind(self))
    } else {
        quote!(#reflect_mut_::Value(self))
    };

    let ident = meta.ident();
    let (impl_generics, ty_generics, where_clause) = meta.split_generics();

    quote! {
        impl #impl_generics #reflect_ for #ident #ty_generics #where_clause {
            #[inline]
            fn reflect_type_info(&self) -> &'static #type_info_ {
                <Self as #typed_>::type_info()
            }

            #[inline]
            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            #[inline]
            fn as_any_mut(&mut self) -> &mut dyn ::core::any::Any {
                self
            }

            #[inline]
            fn into_any(self: #box_<Self>) -> #box_<dyn ::core::any::Any> {
                self
            }

            #[inline]
            fn as_reflect(&self) -> &dyn #reflect_ {
                self
            }

            #[inline]
            fn as_reflect_mut(&mut self) -> &mut dyn #reflect_ {
                self
            }

            #[inline]
            fn into_reflect(self: #box_<Self>) -> #box_<dyn #reflect_> {
                self
            }

            #[inline]
            fn reflect_ref(&self) -> #reflect_ref_<'_> {
                #reflect_ref_::#kind(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> #reflect_mut_<'_> {
                #reflect_mut_tokens
            }

            fn set(
                &mut self,
                value: #box_<dyn #reflect_>,
            ) -> ::core::result::Result<(), #box_<dyn #reflect_>> {
                *self = value.take::<Self>()?;
                ::core::result::Result::Ok(())
            }
        }
    }
}
