use alloc::string::String;

use crate::Reflect;
use crate::impls::NonGenericTypeInfoCell;
use crate::info::{ScalarInfo, ScalarKind, TypeInfo, Typed};
use crate::ops::{ReflectMut, ReflectRef, ScalarRef};

macro_rules! impl_reflect_scalar {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| TypeInfo::Scalar(ScalarInfo::new::<$ty>(ScalarKind::$kind)))
            }
        }

        impl Reflect for $ty {
            impl_reflect_cast!();

            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                ReflectRef::Scalar(ScalarRef::$kind(*self))
            }

            #[inline]
            fn reflect_mut(&mut self) -> ReflectMut<'_> {
                ReflectMut::Value(self)
            }
        }
    )*};
}

impl_reflect_scalar! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    char => Char,
}

impl Typed for String {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::Scalar(ScalarInfo::new::<String>(ScalarKind::String)))
    }
}

impl Reflect for String {
    impl_reflect_cast!();

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Scalar(ScalarRef::String(self))
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Value(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::Reflect;
    use crate::info::{ReflectKind, ScalarKind, Typed};
    use crate::ops::{ReflectRef, ScalarRef};

    #[test]
    fn scalar_kinds() {
        assert_eq!(<u16 as Typed>::type_info().as_scalar().unwrap().kind(), ScalarKind::U16);
        assert_eq!(<String as Typed>::type_info().type_path(), "alloc::string::String");
        assert_eq!(1.5_f32.reflect_kind(), ReflectKind::Scalar);
    }

    #[test]
    fn set_checks_type() {
        let mut value = 3_i64;
        assert!(value.set(Box::new(9_i64)).is_ok());
        assert_eq!(value, 9);
        let rejected = value.set(Box::new(9_i32)).unwrap_err();
        assert!(rejected.is::<i32>());

        let text = String::from("pv");
        assert!(matches!(text.reflect_ref(), ReflectRef::Scalar(ScalarRef::String("pv"))));
    }
}
