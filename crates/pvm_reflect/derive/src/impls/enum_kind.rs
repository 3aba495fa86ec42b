use proc_macro2::{Literal, TokenStream};
use quote::quote;

use super::{impl_trait_reflect, impl_trait_typed};
use crate::derive_data::ReflectEnum;

/// Implements `Typed`, `Reflect` and `Enum` for an enum.
///
/// Enums are replaced as a whole, so `reflect_mut` yields `ReflectMut::Value`.
pub(crate) fn impl_enum(info: &ReflectEnum) -> syn::Result<TokenStream> {
    let meta = &info.meta;
    let attrs = meta.attrs();

    if let Some(span) = attrs.default {
        return Err(syn::Error::new(span, "`default` is only supported on structs"));
    }
    if let Some(path) = attrs.implements.first() {
        return Err(syn::Error::new_spanned(path, "`implements` is only supported on structs"));
    }
    if let Some(lit) = &attrs.type_id {
        return Err(syn::Error::new(lit.span(), "`type_id` is only supported on structs"));
    }

    let pvm_reflect_path = meta.pvm_reflect_path();
    let type_info_ = crate::path::type_info_(pvm_reflect_path);
    let enum_info_ = crate::path::enum_info_(pvm_reflect_path);
    let enum_ = crate::path::enum_(pvm_reflect_path);

    let variants = &info.variants;
    let names: Vec<String> = variants.iter().map(ToString::to_string).collect();
    let indices: Vec<_> = (0..variants.len()).map(Literal::usize_unsuffixed).collect();

    let typed_trait_tokens = impl_trait_typed(
        meta,
        quote!(#type_info_::Enum(#enum_info_::new::<Self>(&[ #(#names),* ]))),
    );
    let reflect_trait_tokens = impl_trait_reflect(meta, quote!(Enum), false);

    let ident = meta.ident();
    let (impl_generics, ty_generics, where_clause) = meta.split_generics();

    Ok(quote! {
        const _: () = {
            #typed_trait_tokens

            #reflect_trait_tokens

            impl #impl_generics #enum_ for #ident #ty_generics #where_clause {
                fn variant_name(&self) -> &str {
                    match *self {
                        #(Self::#variants { .. } => #names,)*
                    }
                }

                fn variant_index(&self) -> usize {
                    match *self {
                        #(Self::#variants { .. } => #indices,)*
                    }
                }
            }
        };
    })
}
