//! Marshalling between reflected native values and structured values.
//!
//! The engine walks a native object graph through [`pvm_reflect`] and
//! produces a [`pvm_data`] schema and value for it, or reads a structured
//! value back into native objects through their setters:
//!
//! - [`classify`] maps a native type to the structured-value category it is
//!   marshalled as.
//! - [`MarshallerContext::build_structure`] derives a schema from an instance.
//!   Null composite fields are omitted, so the schema depends on the instance.
//! - [`MarshallerContext::populate`] writes an instance into a structured
//!   value created from such a schema.
//! - [`MarshallerContext::deserialize`] and its variants decode structured
//!   values, driven by the target type or a setter's parameter type.
//! - [`OverrideRegistry`] resolves custom [`StructureSerializer`]s and
//!   type-ids through a type's ancestors and declared interfaces.
//!
//! Every failure is a [`MarshalError`] carrying the field path where it was
//! detected.
//!
//! # Examples
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! use pvm_marshal::MarshallerContext;
//! use pvm_reflect::derive::Reflect;
//! use pvm_reflect::ops::Variant;
//!
//! #[derive(Reflect, Default)]
//! #[reflect(default)]
//! struct Channel {
//!     name: String,
//!     samples: Vec<f64>,
//!     limits: BTreeMap<String, i32>,
//!     value: Variant,
//! }
//!
//! let channel = Channel {
//!     name: "SR:C01:CURRENT".into(),
//!     samples: vec![0.5, 0.75],
//!     limits: BTreeMap::from([("low".into(), -5), ("high".into(), 5)]),
//!     value: Variant::new(1.5_f64),
//! };
//!
//! let ctx = MarshallerContext::new();
//! let value = ctx.serialize(&channel).unwrap();
//! assert_eq!(value.len(), 4);
//!
//! let back: Channel = ctx.deserialize(&value).unwrap();
//! assert_eq!(back.samples, [0.5, 0.75]);
//! assert_eq!(back.limits["high"], 5);
//! assert_eq!(back.value.downcast_ref::<f64>(), Some(&1.5));
//! ```

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod assemble;
mod classify;
mod container;
mod context;
mod error;
mod fields;
mod populate;
mod registry;
mod scalar;
mod schema;

#[cfg(test)]
mod fixtures;

// -----------------------------------------------------------------------------
// Top-level exports

pub use classify::{Category, classify, resolve};
pub use context::MarshallerContext;
pub use error::{AccessorRole, FieldPath, MarshalError, MarshalErrorKind, PathSegment, Result};
pub use registry::{Found, Lookup, OverrideRegistry, Rule, StructureSerializer};
