//! Items referenced by code generated with `#[derive(Reflect)]`.
//!
//! Not public API.

pub use alloc::boxed::Box;

#[cfg(feature = "auto_register")]
pub mod auto_register {
    pub use crate::auto_register::TypeIdRegistration;
    pub use inventory;
}
