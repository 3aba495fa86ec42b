//! Paths of `pvm_reflect` items used by the generated code.
//!
//! Keeping them here means a change of layout in `pvm_reflect` only touches
//! this module.

use proc_macro2::TokenStream;
use quote::quote;

mod manifest;

use manifest::Manifest;

// -----------------------------------------------------------------------------
// Crate Path

/// The path of `pvm_reflect` from the crate being expanded.
///
/// `::pvm_reflect` for direct dependents, `::pvm_core::reflect` for crates
/// that only depend on the facade. Reading the manifest is not cheap, so the
/// result is computed once per derive and passed around.
pub(crate) fn pvm_reflect() -> syn::Path {
    Manifest::shared(|manifest| manifest.get_crate_path("pvm_reflect"))
}

// -----------------------------------------------------------------------------
// Items

macro_rules! item_paths {
    ($($name:ident => $($segment:ident)::+;)*) => {
        $(
            #[inline(always)]
            pub(crate) fn $name(pvm_reflect_path: &syn::Path) -> TokenStream {
                quote! { #pvm_reflect_path::$($segment)::+ }
            }
        )*
    };
}

item_paths! {
    reflect_ => Reflect;
    typed_ => info::Typed;
    type_info_ => info::TypeInfo;
    struct_info_ => info::StructInfo;
    enum_info_ => info::EnumInfo;
    named_field_ => info::NamedField;
    field_flags_ => info::FieldFlags;
    accessor_ => info::Accessor;
    interface_ => info::Interface;
    reflect_ref_ => ops::ReflectRef;
    reflect_mut_ => ops::ReflectMut;
    struct_ => ops::Struct;
    enum_ => ops::Enum;
    field_iter_ => ops::FieldIter;
    boxed_default_ => impls::boxed_default;
    non_generic_type_info_cell_ => impls::NonGenericTypeInfoCell;
    generic_type_info_cell_ => impls::GenericTypeInfoCell;
    macro_box_ => __macro_exports::Box;
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn auto_register_(pvm_reflect_path: &syn::Path) -> TokenStream {
    quote! {
        #pvm_reflect_path::__macro_exports::auto_register
    }
}
