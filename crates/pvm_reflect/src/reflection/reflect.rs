use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt;

use crate::info::{ReflectKind, TypeInfo};
use crate::ops::{ReflectMut, ReflectRef};

/// The core reflection trait.
///
/// A `Reflect` value can report its [`TypeInfo`], expose itself by kind
/// through [`reflect_ref`](Self::reflect_ref) and
/// [`reflect_mut`](Self::reflect_mut), and be overwritten from a boxed value
/// of the same type with [`set`](Self::set).
///
/// Prefer `#[derive(Reflect)]` over manual implementations.
///
/// # Type identity
///
/// `Box<dyn Reflect>` implements `Reflect` by forwarding every call to the
/// boxed value, so [`reflect_type_info`](Self::reflect_type_info) and the
/// downcast helpers on `dyn Reflect` always see the concrete type:
///
/// ```
/// use pvm_reflect::Reflect;
///
/// let boxed: Box<dyn Reflect> = Box::new(7_i32);
/// let nested: Box<dyn Reflect> = Box::new(boxed);
///
/// assert!(nested.is::<i32>());
/// assert_eq!(nested.reflect_type_path(), "i32");
/// assert_eq!(nested.take::<i32>().ok(), Some(7));
/// ```
pub trait Reflect: Any + Send + Sync {
    /// The [`TypeInfo`] of the concrete type.
    fn reflect_type_info(&self) -> &'static TypeInfo;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    fn as_reflect(&self) -> &dyn Reflect;

    fn as_reflect_mut(&mut self) -> &mut dyn Reflect;

    fn into_reflect(self: Box<Self>) -> Box<dyn Reflect>;

    fn reflect_ref(&self) -> ReflectRef<'_>;

    fn reflect_mut(&mut self) -> ReflectMut<'_>;

    /// Replaces `self` with `value`, handing `value` back if its type differs.
    ///
    /// The usual implementation is:
    ///
    /// ```ignore
    /// fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
    ///     *self = value.take::<Self>()?;
    ///     Ok(())
    /// }
    /// ```
    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;

    #[inline]
    fn reflect_kind(&self) -> ReflectKind {
        self.reflect_ref().kind()
    }
}

impl dyn Reflect {
    #[inline]
    pub fn reflect_type_path(&self) -> &'static str {
        self.reflect_type_info().type_path()
    }

    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.as_any().is::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// Downcasts the box, handing it back unchanged on a type mismatch.
    pub fn downcast<T: Any>(self: Box<Self>) -> Result<Box<T>, Box<dyn Reflect>> {
        if !self.is::<T>() {
            return Err(self);
        }
        match self.into_any().downcast::<T>() {
            Ok(value) => Ok(value),
            Err(_) => unreachable!("type checked above"),
        }
    }

    /// Moves the value out of the box.
    ///
    /// Taking a `Box<dyn Reflect>` always succeeds and keeps the box as is.
    pub fn take<T: Any>(self: Box<Self>) -> Result<T, Box<dyn Reflect>> {
        if TypeId::of::<T>() == TypeId::of::<Box<dyn Reflect>>() {
            let wrapped: Box<dyn Any> = Box::new(self);
            return match wrapped.downcast::<T>() {
                Ok(value) => Ok(*value),
                Err(_) => unreachable!("type checked above"),
            };
        }
        self.downcast::<T>().map(|value| *value)
    }
}

impl fmt::Debug for dyn Reflect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::impls::reflect_debug(self, f)
    }
}
