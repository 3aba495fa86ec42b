use alloc::boxed::Box;
use core::any::Any;

use crate::Reflect;
use crate::impls::NonGenericTypeInfoCell;
use crate::info::{DynamicInfo, TypeInfo, Typed, VariantInfo};
use crate::ops::{ReflectMut, ReflectRef, Variant};

// -----------------------------------------------------------------------------
// Box<dyn Reflect>

impl Typed for Box<dyn Reflect> {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::Dynamic(DynamicInfo::new::<Self>()))
    }
}

/// Every method forwards to the boxed value.
impl Reflect for Box<dyn Reflect> {
    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        (**self).reflect_type_info()
    }

    #[inline]
    fn as_any(&self) -> &dyn Any {
        (**self).as_any()
    }

    #[inline]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        (**self).as_any_mut()
    }

    #[inline]
    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        <dyn Reflect as Reflect>::into_any(*self)
    }

    #[inline]
    fn as_reflect(&self) -> &dyn Reflect {
        (**self).as_reflect()
    }

    #[inline]
    fn as_reflect_mut(&mut self) -> &mut dyn Reflect {
        (**self).as_reflect_mut()
    }

    #[inline]
    fn into_reflect(self: Box<Self>) -> Box<dyn Reflect> {
        *self
    }

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        (**self).reflect_ref()
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        (**self).reflect_mut()
    }

    /// Accepts a value of any type.
    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        *self = value.into_reflect();
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Variant

impl Typed for Variant {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::Variant(VariantInfo::new::<Self>()))
    }
}

impl Reflect for Variant {
    impl_reflect_cast!();

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Variant(self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Variant(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::Reflect;
    use crate::info::{ReflectKind, Typed};
    use crate::ops::Variant;
    use alloc::vec::Vec;

    #[test]
    fn boxed_values_report_the_inner_type() {
        let mut boxed: Box<dyn Reflect> = Box::new(12_u64);
        assert_eq!(boxed.reflect_kind(), ReflectKind::Scalar);
        assert_eq!(
            <Box<dyn Reflect> as Typed>::type_info().kind(),
            ReflectKind::Dynamic
        );

        boxed.set(Box::new(String::from("any"))).unwrap();
        assert_eq!(boxed.downcast_ref::<String>().map(String::as_str), Some("any"));
    }

    #[test]
    fn lists_of_boxed_values_accept_anything() {
        let mut values: Vec<Box<dyn Reflect>> = Vec::new();
        let crate::ops::ReflectMut::List(list) = values.reflect_mut() else {
            panic!("expected a list");
        };
        list.push(Box::new(1_i8)).unwrap();
        list.push(Box::new(true)).unwrap();
        assert_eq!(values.len(), 2);
        assert!(values[1].is::<bool>());
    }

    #[test]
    fn variant_is_its_own_kind() {
        let value = Variant::new(1.5_f32);
        assert_eq!(value.reflect_kind(), ReflectKind::Variant);
        assert_eq!(value, Variant::new(1.5_f32));
        assert_ne!(value, Variant::empty());
    }
}
