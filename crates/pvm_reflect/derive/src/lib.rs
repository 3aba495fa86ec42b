//! `#[derive(Reflect)]` for `pvm_reflect`.
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{Data, DeriveInput, parse_macro_input};

static REFLECT_ATTRIBUTE_NAME: &str = "reflect";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;
mod utils;

// -----------------------------------------------------------------------------
// Macros

/// # Reflection Derivation
///
/// `#[derive(Reflect)]` implements `Typed` and `Reflect`, plus `Struct` for
/// structs with named fields or `Enum` for enums. Tuple structs are rejected.
///
/// Every reflected field type must itself implement `Reflect + Typed`, and
/// generic type parameters get that bound added.
///
/// ## Accessors
///
/// Each field receives a getter named `get_<field>` (`is_<field>` for `bool`)
/// and a setter named `set_<field>`, recorded in the struct's `StructInfo`.
/// Either can be routed through your own function or removed:
///
/// ```rust, ignore
/// #[derive(Reflect)]
/// struct Gauge {
///     // fn read_level(&Gauge) -> &f64 / fn write_level(&mut Gauge, f64)
///     #[reflect(getter = read_level, setter = write_level)]
///     level: f64,
///     #[reflect(setter = false)]
///     serial: u64,
/// }
/// ```
///
/// ## Field Attributes
///
/// - `skip`: the field is invisible to reflection. It must still be
///   `Send + Sync + 'static`.
/// - `transient`: reflected, but never marshalled.
/// - `parent`: the field embeds the ancestor type. Its fields and accessors
///   are searched after the owner's own. At most one per struct.
///
/// ## Type Attributes
///
/// - `default`: `Default::default` becomes the constructor used when
///   decoding.
/// - `implements(TraitA, path::TraitB)`: declares interfaces, identified by
///   `dyn TraitA`. For non-generic types the implementation is checked at
///   compile time.
/// - `type_id = "..."`: with the `auto_register` feature, the id is collected
///   at link time. Non-generic structs only.
///
/// ```rust, ignore
/// #[derive(Reflect, Default)]
/// #[reflect(default, implements(Shape), type_id = "geometry:Circle/1.0")]
/// struct Circle {
///     radius: f64,
///     #[reflect(parent)]
///     base: Figure,
/// }
/// ```
///
/// ## Enums
///
/// Enums are reflected by variant name only. No attribute is accepted on an
/// enum, its variants or their fields.
#[proc_macro_derive(Reflect, attributes(reflect))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    let result = derive_data::ReflectMeta::new(&ast).and_then(|meta| match &ast.data {
        Data::Struct(_) => derive_data::ReflectStruct::new(meta, &ast).map(|info| impls::impl_struct(&info)),
        Data::Enum(_) => derive_data::ReflectEnum::new(meta, &ast).and_then(|info| impls::impl_enum(&info)),
        Data::Union(data) => Err(syn::Error::new(
            data.union_token.span,
            "unions cannot be reflected",
        )),
    });

    match result {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}
