use crate::Reflect;
use crate::impls::GenericTypeInfoCell;
use crate::info::{OptionalInfo, TypeInfo, Typed};
use crate::ops::{ReflectMut, ReflectRef};

impl<T: Reflect + Typed> Typed for Option<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Optional(OptionalInfo::new::<T>()))
    }
}

impl<T: Reflect + Typed> Reflect for Option<T> {
    impl_reflect_cast!();

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Optional(self.as_ref().map(|value| value as &dyn Reflect))
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Value(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::Reflect;
    use crate::info::Typed;
    use crate::ops::ReflectRef;

    #[test]
    fn none_is_null() {
        let value: Option<u16> = None;
        assert!(matches!(value.reflect_ref(), ReflectRef::Optional(None)));

        let value = Some(4_u16);
        let ReflectRef::Optional(Some(inner)) = value.reflect_ref() else {
            panic!("expected a value");
        };
        assert_eq!(inner.downcast_ref::<u16>(), Some(&4));
    }

    #[test]
    fn optional_info_wraps_values() {
        let info = <Option<String> as Typed>::type_info().as_optional().unwrap();
        assert!(info.some_ty().is::<String>());

        let wrapped = info.wrap_some(Box::new(String::from("x"))).unwrap();
        assert_eq!(wrapped.take::<Option<String>>().ok(), Some(Some(String::from("x"))));
        assert!(info.wrap_some(Box::new(1_i32)).is_err());
        assert_eq!(info.none().take::<Option<String>>().ok(), Some(None));
    }
}
