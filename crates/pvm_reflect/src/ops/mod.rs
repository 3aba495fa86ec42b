//! Kind-specific access to reflected values.
//!
//! [`Reflect::reflect_ref`](crate::Reflect::reflect_ref) and
//! [`Reflect::reflect_mut`](crate::Reflect::reflect_mut) split a value by
//! kind; each kind then offers its own trait:
//!
//! - [`Struct`]: named fields.
//! - [`List`]: growable ordered collections and sets.
//! - [`Array`]: fixed-shape sequences.
//! - [`Map`]: key/value maps.
//! - [`Enum`]: fixed-member unions.
//!
//! [`Variant`] is the concrete unrestricted union value and [`ScalarRef`]
//! a borrowed scalar.

// -----------------------------------------------------------------------------
// Modules

mod array_ops;
mod enum_ops;
mod kind;
mod list_ops;
mod map_ops;
mod scalar_ref;
mod struct_ops;
mod variant;

// -----------------------------------------------------------------------------
// Exports

pub use array_ops::Array;
pub use enum_ops::Enum;
pub use kind::{ReflectMut, ReflectRef};
pub use list_ops::List;
pub use map_ops::Map;
pub use scalar_ref::ScalarRef;
pub use struct_ops::{FieldIter, Struct};
pub use variant::Variant;
