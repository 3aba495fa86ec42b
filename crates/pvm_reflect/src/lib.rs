//! Compile-time generated introspection for native values.
//!
//! `pvm_reflect` describes Rust types at runtime so that a generic engine can
//! walk object graphs without per-type code:
//!
//! - [`Reflect`] is implemented by every reflected value and exposes it by
//!   kind through [`ReflectRef`](ops::ReflectRef) / [`ReflectMut`](ops::ReflectMut).
//! - [`Typed`](info::Typed) gives static [`TypeInfo`](info::TypeInfo): fields,
//!   accessor tables, declared interfaces, container item types.
//! - `#[derive(Reflect)]` generates both for structs and enums.
//!
//! # Examples
//!
//! ```
//! use pvm_reflect::Reflect;
//! use pvm_reflect::derive::Reflect;
//! use pvm_reflect::info::Typed;
//!
//! #[derive(Reflect, Default)]
//! #[reflect(default)]
//! struct Channel {
//!     name: String,
//!     connected: bool,
//! }
//!
//! let info = Channel::type_info().as_struct().unwrap();
//! let mut channel = info.construct().unwrap();
//!
//! info.accessor("set_name")
//!     .unwrap()
//!     .set(channel.as_reflect_mut(), Box::new(String::from("SR:C01")))
//!     .unwrap();
//!
//! let name = info.accessor("get_name").unwrap().get(channel.as_reflect()).unwrap();
//! assert_eq!(name.downcast_ref::<String>().unwrap(), "SR:C01");
//! assert!(info.accessor("is_connected").is_some());
//! ```

// -----------------------------------------------------------------------------
// Extern Self

// Generated code names this crate `::pvm_reflect`, which must also resolve
// inside the crate itself.
extern crate self as pvm_reflect;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod reflection;

pub mod impls;
pub mod info;
pub mod ops;

#[cfg(feature = "auto_register")]
pub mod auto_register;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use pvm_reflect_derive as derive;
pub use reflection::Reflect;

// -----------------------------------------------------------------------------
// Tests
