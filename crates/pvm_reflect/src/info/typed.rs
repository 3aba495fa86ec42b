use crate::info::TypeInfo;

/// Static access to a type's [`TypeInfo`].
///
/// Implemented by `#[derive(Reflect)]` and by the built-in impls. The info
/// is computed once and cached in a static cell, see
/// [`NonGenericTypeInfoCell`](crate::impls::NonGenericTypeInfoCell) and
/// [`GenericTypeInfoCell`](crate::impls::GenericTypeInfoCell).
pub trait Typed: 'static {
    fn type_info() -> &'static TypeInfo;
}
