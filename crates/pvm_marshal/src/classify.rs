use alloc::string::String;

use pvm_reflect::Reflect;
use pvm_reflect::info::{ArrayInfo, ListInfo, MapInfo, ScalarInfo, ScalarKind, StructInfo, TypeInfo};
use pvm_reflect::ops::ReflectRef;

use crate::error::MarshalErrorKind;

// -----------------------------------------------------------------------------
// Category

/// How a native type is marshalled.
#[derive(Debug, Clone, Copy)]
pub enum Category {
    /// Numbers, `bool`, `char` and `String`.
    Scalar(&'static ScalarInfo),
    /// Fixed-shape sequences.
    Array(&'static ArrayInfo),
    /// Growable ordered collections and sets.
    ListLike(&'static ListInfo),
    /// String-keyed maps, marshalled as structures.
    Map(&'static MapInfo),
    /// [`Variant`](pvm_reflect::ops::Variant) and `Box<dyn Reflect>`.
    UnionVariant,
    /// Anything else with named fields, marshalled field by field.
    Composite(&'static StructInfo),
}

/// Classifies a type.
///
/// `Option<T>` is classified as `T`. Enums are fixed-member unions and are
/// refused, as are maps whose keys are not `String`.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
///
/// use pvm_marshal::{Category, MarshalErrorKind, classify};
/// use pvm_reflect::info::Typed;
///
/// assert!(matches!(classify(<Option<u8>>::type_info()), Ok(Category::Scalar(_))));
/// assert!(matches!(classify(<Vec<String>>::type_info()), Ok(Category::ListLike(_))));
/// assert!(matches!(
///     classify(<BTreeMap<u32, u8>>::type_info()),
///     Err(MarshalErrorKind::UnsupportedKeyType { .. })
/// ));
/// ```
pub fn classify(info: &'static TypeInfo) -> Result<Category, MarshalErrorKind> {
    match info {
        TypeInfo::Scalar(scalar) => Ok(Category::Scalar(scalar)),
        TypeInfo::Struct(composite) => Ok(Category::Composite(composite)),
        TypeInfo::List(list) => Ok(Category::ListLike(list)),
        TypeInfo::Array(array) => Ok(Category::Array(array)),
        TypeInfo::Map(map) => {
            check_string_keys(map)?;
            Ok(Category::Map(map))
        }
        TypeInfo::Variant(_) | TypeInfo::Dynamic(_) => Ok(Category::UnionVariant),
        TypeInfo::Optional(optional) => match optional.some_info() {
            TypeInfo::Optional(_) => Err(MarshalErrorKind::UnsupportedContainerType {
                type_path: info.type_path(),
            }),
            some => classify(some),
        },
        TypeInfo::Enum(_) => Err(MarshalErrorKind::RegularUnionNotSupported {
            type_name: String::from(info.type_path()),
        }),
    }
}

fn check_string_keys(map: &MapInfo) -> Result<(), MarshalErrorKind> {
    match map.key_info() {
        TypeInfo::Scalar(key) if key.kind() == ScalarKind::String => Ok(()),
        key => Err(MarshalErrorKind::UnsupportedKeyType {
            type_path: key.type_path(),
        }),
    }
}

/// Looks through `Option`s. `None` is null.
pub fn resolve(value: &dyn Reflect) -> Option<&dyn Reflect> {
    match value.reflect_ref() {
        ReflectRef::Optional(inner) => inner.and_then(resolve),
        _ => Some(value),
    }
}

/// Strips `Option` from a declared type.
pub(crate) fn declared(info: &'static TypeInfo) -> &'static TypeInfo {
    match info {
        TypeInfo::Optional(optional) => declared(optional.some_info()),
        _ => info,
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;

    use pvm_reflect::info::Typed;
    use pvm_reflect::ops::Variant;

    use super::*;
    use crate::fixtures::{Mode, Point};

    #[test]
    fn every_kind_has_one_category() {
        assert!(matches!(classify(String::type_info()), Ok(Category::Scalar(_))));
        assert!(matches!(classify(<[u8; 4]>::type_info()), Ok(Category::Array(_))));
        assert!(matches!(classify(Point::type_info()), Ok(Category::Composite(_))));
        assert!(matches!(classify(Variant::type_info()), Ok(Category::UnionVariant)));
        assert!(matches!(
            classify(<Box<dyn Reflect>>::type_info()),
            Ok(Category::UnionVariant)
        ));
        assert!(matches!(
            classify(<std::collections::HashMap<String, f64>>::type_info()),
            Ok(Category::Map(_))
        ));
    }

    #[test]
    fn refused_types() {
        assert!(matches!(
            classify(Mode::type_info()),
            Err(MarshalErrorKind::RegularUnionNotSupported { .. })
        ));
        assert!(matches!(
            classify(<Option<Option<i32>>>::type_info()),
            Err(MarshalErrorKind::UnsupportedContainerType { .. })
        ));
    }

    #[test]
    fn resolve_sees_through_options() {
        let present = Some(Some(3_i32));
        let value = resolve(&present).unwrap();
        assert_eq!(value.downcast_ref::<i32>(), Some(&3));
        assert!(resolve(&None::<Point>).is_none());
        assert!(resolve(&4_u8).is_some());
    }
}
