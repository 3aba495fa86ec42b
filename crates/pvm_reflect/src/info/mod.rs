//! Static type information.
//!
//! Every reflected type exposes a [`TypeInfo`] through [`Typed`]. The
//! variants mirror [`ReflectKind`]:
//!
//! - [`ScalarInfo`]: primitives, `char` and `String`.
//! - [`StructInfo`]: named-field structs, with their accessors and interfaces.
//! - [`ListInfo`], [`ArrayInfo`], [`MapInfo`]: containers and their declared item types.
//! - [`OptionalInfo`]: `Option<T>`.
//! - [`VariantInfo`]: the unrestricted union value.
//! - [`EnumInfo`]: fixed-member unions.
//! - [`DynamicInfo`]: `Box<dyn Reflect>`.

// -----------------------------------------------------------------------------
// Modules

mod accessor;
mod container_info;
mod enum_info;
mod field_info;
mod scalar_info;
mod struct_info;
mod ty;
mod type_info;
mod typed;

// -----------------------------------------------------------------------------
// Exports

pub use accessor::{Accessor, AccessorKind, GetterFn, SetterFn};
pub use container_info::{ArrayInfo, FromItemsFn, ListInfo, MapInfo, OptionalInfo};
pub use enum_info::{DynamicInfo, EnumInfo, VariantInfo};
pub use field_info::{FieldFlags, NamedField};
pub use scalar_info::{ScalarInfo, ScalarKind};
pub use struct_info::{Interface, StructInfo};
pub use ty::Type;
pub use type_info::{ReflectKind, ReflectKindError, TypeInfo};
pub use typed::Typed;
