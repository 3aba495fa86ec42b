//! An in-memory structured value store in the pvData style.
//!
//! The model is split in two halves, like pvData itself:
//!
//! - Introspection ([`Field`], [`Structure`], [`Union`]) describes shapes.
//!   It is immutable and shared through [`Arc`](alloc::sync::Arc).
//! - Data ([`PvStructure`], [`PvField`], [`PvUnion`] and the array types)
//!   holds values conforming to an introspection tree.
//!
//! Arrays are stored in segments and read back with a chunked protocol:
//! [`PvArray::get`] never returns data across a segment boundary, so a reader
//! must keep asking until it has collected the full length.
//!
//! # Examples
//!
//! ```
//! use pvm_data::{FieldBuilder, PvStructure, Scalar, ScalarType};
//!
//! let mut builder = FieldBuilder::new();
//! builder.add_scalar("count", ScalarType::Int);
//! builder.add_array("samples", ScalarType::Double);
//! builder.set_id("example:1.0");
//! let schema = builder.create_structure().unwrap();
//!
//! let mut value = PvStructure::new(schema);
//! value.put_scalar("count", Scalar::Int(3)).unwrap();
//! value
//!     .scalar_array_mut("samples")
//!     .unwrap()
//!     .put(vec![Scalar::Double(0.5), Scalar::Double(1.5)])
//!     .unwrap();
//!
//! assert_eq!(value.scalar("count").unwrap(), &Scalar::Int(3));
//! assert_eq!(value.structure().id(), "example:1.0");
//! ```

// -----------------------------------------------------------------------------
// Extern Self

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod array;
mod error;
mod introspect;
mod scalar;
mod ser;
mod value;

// -----------------------------------------------------------------------------
// Exports

pub use array::{ArrayChunk, PvArray};
pub use error::StoreError;
pub use introspect::{DEFAULT_STRUCTURE_ID, Field, FieldBuilder, FieldKind, Structure};
pub use introspect::{Union, VARIANT_UNION_ID};
pub use scalar::{Scalar, ScalarType};
pub use value::{PvField, PvScalarArray, PvStructure, PvStructureArray, PvUnion, PvUnionArray};
