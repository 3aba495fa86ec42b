use alloc::boxed::Box;
use core::fmt;

use crate::Reflect;

/// A value tagged as an unrestricted union alternative.
///
/// `Variant` is how native code says "this slot may hold any single value".
/// An empty variant is the union with nothing selected.
///
/// # Examples
///
/// ```
/// use pvm_reflect::ops::Variant;
///
/// let mut value = Variant::new(3.5_f64);
/// assert_eq!(value.downcast_ref::<f64>(), Some(&3.5));
///
/// value.set_boxed(Box::new(String::from("text")));
/// assert!(value.downcast_ref::<f64>().is_none());
///
/// value.clear();
/// assert!(value.is_empty());
/// ```
#[derive(Default)]
pub struct Variant(Option<Box<dyn Reflect>>);

impl Variant {
    #[inline]
    pub const fn empty() -> Self {
        Self(None)
    }

    #[inline]
    pub fn new<T: Reflect>(value: T) -> Self {
        Self(Some(Box::new(value)))
    }

    #[inline]
    pub fn from_boxed(value: Box<dyn Reflect>) -> Self {
        Self(Some(value))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// The held value.
    #[inline]
    pub fn value(&self) -> Option<&dyn Reflect> {
        self.0.as_deref()
    }

    #[inline]
    pub fn value_mut(&mut self) -> Option<&mut dyn Reflect> {
        self.0.as_deref_mut()
    }

    #[inline]
    pub fn set_boxed(&mut self, value: Box<dyn Reflect>) {
        self.0 = Some(value);
    }

    #[inline]
    pub fn clear(&mut self) {
        self.0 = None;
    }

    #[inline]
    pub fn into_inner(self) -> Option<Box<dyn Reflect>> {
        self.0
    }

    pub fn downcast_ref<T: Reflect>(&self) -> Option<&T> {
        self.value()?.downcast_ref::<T>()
    }
}

impl fmt::Debug for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            Some(value) => f.debug_tuple("Variant").field(&value).finish(),
            None => f.write_str("Variant(<empty>)"),
        }
    }
}

impl PartialEq for Variant {
    fn eq(&self, other: &Self) -> bool {
        match (self.value(), other.value()) {
            (Some(a), Some(b)) => crate::impls::reflect_partial_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}
