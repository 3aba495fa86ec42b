//! Small shared containers for the marshalling workspace.
//!
//! - [`hash`]: `hashbrown` maps with a fixed `foldhash` seed, so iteration
//!   order only depends on the inserted keys.
//! - [`TypeIdMap`]: a map keyed by [`TypeId`](core::any::TypeId), used by the
//!   type-info cells and the override registries.
#![no_std]

// -----------------------------------------------------------------------------
// No STD Support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod typeid_map;

pub mod hash;

// -----------------------------------------------------------------------------
// Top-level exports

pub use typeid_map::TypeIdMap;
