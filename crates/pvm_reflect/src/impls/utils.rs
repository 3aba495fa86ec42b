use alloc::boxed::Box;
use core::fmt;

use crate::Reflect;
use crate::info::Typed;
use crate::ops::{ReflectRef, ScalarRef};

/// `Box::new(T::default())`, usable as a `fn` pointer.
#[inline]
pub fn boxed_default<T: Reflect + Default>() -> Box<dyn Reflect> {
    Box::new(T::default())
}

/// Moves a `T` into `Some(T)`.
#[inline]
pub fn wrap_some<T: Reflect + Typed>(value: Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
    Ok(Box::new(Some(value.take::<T>()?)))
}

#[inline]
pub fn boxed_none<T: Reflect + Typed>() -> Box<dyn Reflect> {
    Box::new(None::<T>)
}

/// Structural equality of two reflected values.
///
/// Structs and enums must also have the same concrete type. Maps are
/// compared without regard to order, lists and arrays element by element.
///
/// ```
/// use pvm_reflect::impls::reflect_partial_eq;
///
/// assert!(reflect_partial_eq(&vec![1_u8, 2], &vec![1_u8, 2]));
/// assert!(!reflect_partial_eq(&vec![1_u8, 2], &vec![2_u8, 1]));
/// assert!(!reflect_partial_eq(&1_u8, &1_u16));
/// ```
pub fn reflect_partial_eq(a: &dyn Reflect, b: &dyn Reflect) -> bool {
    match (a.reflect_ref(), b.reflect_ref()) {
        (ReflectRef::Scalar(x), ReflectRef::Scalar(y)) => x == y,
        (ReflectRef::Struct(x), ReflectRef::Struct(y)) => {
            x.reflect_type_info().type_id() == y.reflect_type_info().type_id()
                && x.field_len() == y.field_len()
                && x.iter_fields()
                    .zip(y.iter_fields())
                    .all(|((xn, xv), (yn, yv))| xn == yn && reflect_partial_eq(xv, yv))
        }
        (ReflectRef::List(x), ReflectRef::List(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(xv, yv)| reflect_partial_eq(xv, yv))
        }
        (ReflectRef::Array(x), ReflectRef::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(xv, yv)| reflect_partial_eq(xv, yv))
        }
        (ReflectRef::Map(x), ReflectRef::Map(y)) => {
            x.len() == y.len()
                && x.iter().all(|(xk, xv)| {
                    y.iter()
                        .any(|(yk, yv)| reflect_partial_eq(xk, yk) && reflect_partial_eq(xv, yv))
                })
        }
        (ReflectRef::Optional(x), ReflectRef::Optional(y)) => match (x, y) {
            (Some(xv), Some(yv)) => reflect_partial_eq(xv, yv),
            (None, None) => true,
            _ => false,
        },
        (ReflectRef::Variant(x), ReflectRef::Variant(y)) => x == y,
        (ReflectRef::Enum(x), ReflectRef::Enum(y)) => {
            x.reflect_type_info().type_id() == y.reflect_type_info().type_id()
                && x.variant_index() == y.variant_index()
        }
        _ => false,
    }
}

/// `Debug` output driven by reflection.
pub fn reflect_debug(value: &dyn Reflect, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value.reflect_ref() {
        ReflectRef::Scalar(ScalarRef::String(text)) => fmt::Debug::fmt(text, f),
        ReflectRef::Scalar(ScalarRef::Char(ch)) => fmt::Debug::fmt(&ch, f),
        ReflectRef::Scalar(scalar) => fmt::Display::fmt(&scalar, f),
        ReflectRef::Struct(target) => {
            let mut debug = f.debug_struct(target.reflect_type_info().type_path());
            for (name, field) in target.iter_fields() {
                debug.field(name, &field);
            }
            debug.finish()
        }
        ReflectRef::List(list) => f.debug_list().entries(list.iter()).finish(),
        ReflectRef::Array(array) => f.debug_list().entries(array.iter()).finish(),
        ReflectRef::Map(map) => f.debug_map().entries(map.iter()).finish(),
        ReflectRef::Optional(Some(inner)) => f.debug_tuple("Some").field(&inner).finish(),
        ReflectRef::Optional(None) => f.write_str("None"),
        ReflectRef::Variant(variant) => fmt::Debug::fmt(variant, f),
        ReflectRef::Enum(target) => f.write_str(target.variant_name()),
    }
}

#[cfg(test)]
mod tests {
    use super::reflect_partial_eq;
    use crate::Reflect;
    use alloc::collections::BTreeMap;
    use alloc::format;
    use pvm_utils::hash::HashMap;

    #[test]
    fn maps_compare_without_order() {
        let ordered: BTreeMap<String, i32> = [("a".into(), 1), ("b".into(), 2)].into();
        let mut hashed: HashMap<String, i32> = HashMap::default();
        hashed.insert("b".into(), 2);
        hashed.insert("a".into(), 1);
        assert!(reflect_partial_eq(&ordered, &hashed));

        hashed.insert("a".into(), 3);
        assert!(!reflect_partial_eq(&ordered, &hashed));
    }

    #[test]
    fn debug_output() {
        let value: Box<dyn Reflect> = Box::new(vec![Some(1_i32), None]);
        assert_eq!(format!("{value:?}"), "[Some(1), None]");

        let text: &dyn Reflect = &String::from("hi");
        assert_eq!(format!("{text:?}"), "\"hi\"");
    }
}
