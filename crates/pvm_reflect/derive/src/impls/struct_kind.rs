use proc_macro2::{Literal, TokenStream};
use quote::quote;

use super::{get_auto_register_impl, get_implements_assertion, impl_trait_reflect, impl_trait_typed};
use crate::derive_data::{AccessorSource, ReflectStruct, StructField};

/// Implements `Typed`, `Reflect` and `Struct` for a struct.
pub(crate) fn impl_struct(info: &ReflectStruct) -> TokenStream {
    let meta = &info.meta;

    let typed_trait_tokens = impl_trait_typed(meta, get_struct_info_tokens(info));
    let reflect_trait_tokens = impl_trait_reflect(meta, quote!(Struct), true);
    let struct_trait_tokens = impl_trait_struct(info);
    let assertion_tokens = get_implements_assertion(meta);
    let auto_register_tokens = get_auto_register_impl(meta);

    quote! {
        const _: () = {
            #typed_trait_tokens

            #reflect_trait_tokens

            #struct_trait_tokens

            #assertion_tokens

            #auto_register_tokens
        };
    }
}

/// `TypeInfo::Struct(StructInfo::new::<Self>(..).with_accessors(..) ...)`
fn get_struct_info_tokens(info: &ReflectStruct) -> TokenStream {
    let meta = &info.meta;
    let pvm_reflect_path = meta.pvm_reflect_path();
    let type_info_ = crate::path::type_info_(pvm_reflect_path);
    let struct_info_ = crate::path::struct_info_(pvm_reflect_path);
    let named_field_ = crate::path::named_field_(pvm_reflect_path);
    let field_flags_ = crate::path::field_flags_(pvm_reflect_path);
    let interface_ = crate::path::interface_(pvm_reflect_path);
    let boxed_default_ = crate::path::boxed_default_(pvm_reflect_path);

    let fields = info.fields.iter().map(|field| {
        let ty = field.ty;
        let name = field.name();
        let with_flags = if field.attrs.transient.is_some() {
            quote!(.with_flags(#field_flags_::TRANSIENT))
        } else if field.attrs.parent.is_some() {
            quote!(.with_flags(#field_flags_::PARENT))
        } else {
            crate::utils::empty()
        };
        quote!(#named_field_::new::<#ty>(#name) #with_flags)
    });

    let accessors: Vec<TokenStream> = info
        .fields
        .iter()
        .filter(|field| field.attrs.parent.is_none())
        .flat_map(|field| [get_getter_tokens(info, field), get_setter_tokens(info, field)])
        .flatten()
        .collect();

    let with_accessors = if accessors.is_empty() {
        crate::utils::empty()
    } else {
        quote!(.with_accessors(&[ #(#accessors),* ]))
    };

    let interfaces = &meta.attrs().implements;
    let with_interfaces = if interfaces.is_empty() {
        crate::utils::empty()
    } else {
        quote!(.with_interfaces(&[ #(#interface_::of::<dyn #interfaces>()),* ]))
    };

    let with_constructor = if meta.attrs().default.is_some() {
        quote!(.with_constructor(#boxed_default_::<Self>))
    } else {
        crate::utils::empty()
    };

    quote! {
        #type_info_::Struct(
            #struct_info_::new::<Self>(&[ #(#fields),* ])
                #with_accessors
                #with_interfaces
                #with_constructor
        )
    }
}

/// `get_<field>`, or `is_<field>` for `bool`.
fn get_getter_tokens(info: &ReflectStruct, field: &StructField) -> Option<TokenStream> {
    let pvm_reflect_path = info.meta.pvm_reflect_path();
    let reflect_ = crate::path::reflect_(pvm_reflect_path);
    let accessor_ = crate::path::accessor_(pvm_reflect_path);

    let prefix = if field.is_bool() { "is" } else { "get" };
    let name = format!("{prefix}_{}", field.name());
    let ident = field.ident;

    let read = match &field.attrs.getter {
        AccessorSource::Generated => quote!(&target.#ident),
        AccessorSource::Custom(path) => quote!(#path(target)),
        AccessorSource::Disabled => return None,
    };

    Some(quote! {
        #accessor_::getter(#name, |this| {
            this.downcast_ref::<Self>().map(|target| #read as &dyn #reflect_)
        })
    })
}

/// `set_<field>`.
fn get_setter_tokens(info: &ReflectStruct, field: &StructField) -> Option<TokenStream> {
    let pvm_reflect_path = info.meta.pvm_reflect_path();
    let reflect_ = crate::path::reflect_(pvm_reflect_path);
    let accessor_ = crate::path::accessor_(pvm_reflect_path);

    let name = format!("set_{}", field.name());
    let ident = field.ident;
    let ty = field.ty;

    let body = match &field.attrs.setter {
        AccessorSource::Generated => quote! {
            match this.downcast_mut::<Self>() {
                ::core::option::Option::Some(target) => {
                    <#ty as #reflect_>::set(&mut target.#ident, value)
                }
                ::core::option::Option::None => ::core::result::Result::Err(value),
            }
        },
        AccessorSource::Custom(path) => quote! {
            let ::core::option::Option::Some(target) = this.downcast_mut::<Self>() else {
                return ::core::result::Result::Err(value);
            };
            #path(target, value.take::<#ty>()?);
            ::core::result::Result::Ok(())
        },
        AccessorSource::Disabled => return None,
    };

    Some(quote! {
        #accessor_::setter::<#ty>(#name, |this, value| { #body })
    })
}

fn impl_trait_struct(info: &ReflectStruct) -> TokenStream {
    let meta = &info.meta;
    let pvm_reflect_path = meta.pvm_reflect_path();
    let reflect_ = crate::path::reflect_(pvm_reflect_path);
    let struct_ = crate::path::struct_(pvm_reflect_path);
    let field_iter_ = crate::path::field_iter_(pvm_reflect_path);

    let idents: Vec<_> = info.fields.iter().map(|field| field.ident).collect();
    let names: Vec<_> = info.fields.iter().map(StructField::name).collect();
    let indices: Vec<_> = (0..info.fields.len()).map(Literal::usize_unsuffixed).collect();
    let field_len = info.fields.len();

    let ident = meta.ident();
    let (impl_generics, ty_generics, where_clause) = meta.split_generics();

    quote! {
        impl #impl_generics #struct_ for #ident #ty_generics #where_clause {
            fn field(&self, name: &str) -> ::core::option::Option<&dyn #reflect_> {
                match name {
                    #(#names => ::core::option::Option::Some(&self.#idents as &dyn #reflect_),)*
                    _ => ::core::option::Option::None,
                }
            }

            fn field_mut(&mut self, name: &str) -> ::core::option::Option<&mut dyn #reflect_> {
                match name {
                    #(#names => ::core::option::Option::Some(&mut self.#idents as &mut dyn #reflect_),)*
                    _ => ::core::option::Option::None,
                }
            }

            fn field_at(&self, index: usize) -> ::core::option::Option<&dyn #reflect_> {
                match index {
                    #(#indices => ::core::option::Option::Some(&self.#idents as &dyn #reflect_),)*
                    _ => ::core::option::Option::None,
                }
            }

            fn name_at(&self, index: usize) -> ::core::option::Option<&str> {
                match index {
                    #(#indices => ::core::option::Option::Some(#names),)*
                    _ => ::core::option::Option::None,
                }
            }

            #[inline]
            fn field_len(&self) -> usize {
                #field_len
            }

            #[inline]
            fn iter_fields(&self) -> #field_iter_<'_> {
                #field_iter_::new(self)
            }
        }
    }
}
