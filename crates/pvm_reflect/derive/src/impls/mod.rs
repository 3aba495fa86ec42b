//! Code generation.

// -----------------------------------------------------------------------------
// Modules

mod assertions;
mod auto_register;
mod enum_kind;
mod struct_kind;
mod trait_reflect;
mod trait_typed;

// -----------------------------------------------------------------------------
// Internal API

use assertions::get_implements_assertion;
use auto_register::get_auto_register_impl;
use trait_reflect::impl_trait_reflect;
use trait_typed::impl_trait_typed;

pub(crate) use enum_kind::impl_enum;
pub(crate) use struct_kind::impl_struct;
