use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{DeriveInput, Generics, Ident, ImplGenerics, Path, TypeGenerics};

use super::TypeAttributes;

/// What every derived impl needs to know about the type.
pub(crate) struct ReflectMeta<'a> {
    pvm_reflect_path: Path,
    attrs: TypeAttributes,
    ident: &'a Ident,
    generics: &'a Generics,
}

impl<'a> ReflectMeta<'a> {
    pub fn new(input: &'a DeriveInput) -> syn::Result<Self> {
        if let Some(lifetime) = input.generics.lifetimes().next() {
            return Err(syn::Error::new_spanned(
                lifetime,
                "reflected types must be 'static, lifetime parameters are not supported",
            ));
        }

        Ok(Self {
            pvm_reflect_path: crate::path::pvm_reflect(),
            attrs: TypeAttributes::parse_attrs(&input.attrs)?,
            ident: &input.ident,
            generics: &input.generics,
        })
    }

    #[inline]
    pub fn pvm_reflect_path(&self) -> &Path {
        &self.pvm_reflect_path
    }

    #[inline]
    pub fn attrs(&self) -> &TypeAttributes {
        &self.attrs
    }

    #[inline]
    pub fn ident(&self) -> &Ident {
        self.ident
    }

    /// Generic types share one `static` per impl, so their info lives in a
    /// `GenericTypeInfoCell` and link-time registration is impossible.
    #[inline]
    pub fn impl_with_generic(&self) -> bool {
        !self.generics.params.is_empty()
    }

    /// Splits the generics for an impl block, adding `T: Reflect + Typed`
    /// for every type parameter.
    pub fn split_generics(&self) -> (ImplGenerics<'a>, TypeGenerics<'a>, TokenStream) {
        let (impl_generics, ty_generics, where_clause) = self.generics.split_for_impl();

        let reflect_ = crate::path::reflect_(&self.pvm_reflect_path);
        let typed_ = crate::path::typed_(&self.pvm_reflect_path);

        let mut predicates: Vec<TokenStream> = where_clause
            .map(|clause| clause.predicates.iter().map(ToTokens::to_token_stream).collect())
            .unwrap_or_default();

        predicates.extend(self.generics.type_params().map(|param| {
            let ident = &param.ident;
            quote!(#ident: #reflect_ + #typed_)
        }));

        let where_tokens = if predicates.is_empty() {
            crate::utils::empty()
        } else {
            quote!(where #(#predicates,)*)
        };

        (impl_generics, ty_generics, where_tokens)
    }
}
