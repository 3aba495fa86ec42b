//! Schema construction for native values.

use alloc::string::String;
use alloc::sync::Arc;

use log::trace;
use pvm_data::{Field, FieldBuilder, Structure, Union};
use pvm_reflect::Reflect;
use pvm_reflect::info::{MapInfo, StructInfo};
use pvm_reflect::ops::ReflectRef;

use crate::MarshallerContext;
use crate::classify::{Category, classify, resolve};
use crate::container::{check_union_payload, sequence_field, union_payload};
use crate::error::{MarshalErrorKind, Result, ResultExt};
use crate::fields::marshalled_fields;
use crate::scalar::scalar_type;

/// Builds the schema of a composite or map value.
pub(crate) fn build_structure(ctx: &MarshallerContext, value: &dyn Reflect) -> Result<Arc<Structure>> {
    match classify(value.reflect_type_info())? {
        Category::Composite(info) => composite_structure(ctx, value, info),
        Category::Map(info) => map_structure(ctx, value, info),
        _ => Err(MarshalErrorKind::NotStructured {
            kind: value.reflect_kind(),
        }
        .into()),
    }
}

/// The store field describing a non-null value.
pub(crate) fn field_schema(ctx: &MarshallerContext, value: &dyn Reflect) -> Result<Field> {
    Ok(match classify(value.reflect_type_info())? {
        Category::Scalar(info) => Field::Scalar(scalar_type(info.kind())),
        Category::Composite(_) | Category::Map(_) => Field::Structure(build_structure(ctx, value)?),
        Category::ListLike(_) | Category::Array(_) => sequence_field(ctx, value, false)?,
        Category::UnionVariant => {
            check_union_payload(union_payload(value))?;
            Field::Union(Arc::new(Union::variant()))
        }
    })
}

fn composite_structure(
    ctx: &MarshallerContext,
    value: &dyn Reflect,
    info: &'static StructInfo,
) -> Result<Arc<Structure>> {
    if let Some(serializer) = ctx.serializer_for(info)? {
        return serializer.build_structure(ctx, value);
    }

    let mut builder = FieldBuilder::new();
    for field in marshalled_fields(info, value)? {
        let Some(current) = field.value else {
            trace!("omitting null field `{}` of `{}`", field.name, info.type_path());
            continue;
        };
        builder.add(field.name, field_schema(ctx, current).in_field(field.name)?);
    }
    if let Some(id) = ctx.type_id_for(info)? {
        builder.set_id(id);
    }
    Ok(builder.create_structure()?)
}

fn map_structure(ctx: &MarshallerContext, value: &dyn Reflect, info: &'static MapInfo) -> Result<Arc<Structure>> {
    let ReflectRef::Map(map) = value.reflect_ref() else {
        return Err(MarshalErrorKind::NotStructured {
            kind: value.reflect_kind(),
        }
        .into());
    };

    let mut builder = FieldBuilder::new();
    for (key, entry) in map.iter() {
        let name = map_key(key, info)?;
        let Some(entry) = resolve(entry) else {
            trace!("omitting null entry `{name}` of `{}`", info.ty());
            continue;
        };
        builder.add(name, field_schema(ctx, entry).in_field(name)?);
    }
    Ok(builder.create_structure()?)
}

/// The field name of a map entry.
pub(crate) fn map_key<'a>(key: &'a dyn Reflect, info: &MapInfo) -> Result<&'a str, MarshalErrorKind> {
    key.downcast_ref::<String>()
        .map(String::as_str)
        .ok_or(MarshalErrorKind::UnsupportedKeyType {
            type_path: info.key_info().type_path(),
        })
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;
    use std::collections::BTreeMap;

    use pvm_data::ScalarType;
    use pvm_reflect::ops::Variant;

    use super::*;
    use crate::fixtures::{Base, Beacon, Point, Slot, Tagged};

    fn ctx() -> MarshallerContext {
        MarshallerContext::new()
    }

    #[test]
    fn null_composites_are_omitted() {
        let mut beacon = Beacon {
            label: String::from("b1"),
            position: None,
            enabled: true,
        };
        let without = build_structure(&ctx(), &beacon).unwrap();
        beacon.position = Some(Point::default());
        let with = build_structure(&ctx(), &beacon).unwrap();

        assert_eq!(with.len() - without.len(), 1);
        assert!(without.field("position").is_none());
        assert!(matches!(with.field("position"), Some(Field::Structure(_))));
    }

    #[test]
    fn ancestors_and_transients() {
        let tagged = Tagged {
            base: Base {
                serial: 4,
                note: Some(String::from("n")),
            },
            tag: String::from("t"),
            cache: 99,
        };
        let structure = build_structure(&ctx(), &tagged).unwrap();
        assert_eq!(
            structure.field_names().collect::<Vec<_>>(),
            ["tag", "serial", "note"]
        );
        assert_eq!(structure.field("serial"), Some(&Field::Scalar(ScalarType::UInt)));
        assert_eq!(structure.id(), pvm_data::DEFAULT_STRUCTURE_ID);
    }

    #[test]
    fn maps_become_structures() {
        let mut map = BTreeMap::new();
        map.insert(String::from("low"), Some(1.5_f32));
        map.insert(String::from("high"), None);
        map.insert(String::from("mid"), Some(2.0));

        let structure = build_structure(&ctx(), &map).unwrap();
        assert_eq!(structure.field_names().collect::<Vec<_>>(), ["low", "mid"]);
        assert_eq!(structure.field("mid"), Some(&Field::Scalar(ScalarType::Float)));
    }

    #[test]
    fn unions_are_checked_while_building() {
        let scalar = Slot {
            content: Variant::new(2_u16),
        };
        assert!(matches!(
            build_structure(&ctx(), &scalar).unwrap().field("content"),
            Some(Field::Union(union)) if union.is_variant()
        ));

        let array = Slot {
            content: Variant::new(vec![1_u16, 2]),
        };
        let error = build_structure(&ctx(), &array).unwrap_err();
        assert!(matches!(
            error.kind(),
            MarshalErrorKind::UnionOfArrayNotSupported { .. }
        ));
        assert_eq!(error.path().to_string(), "content");
    }

    #[test]
    fn scalars_are_not_structures() {
        let error = build_structure(&ctx(), &5_i32).unwrap_err();
        assert!(matches!(error.kind(), MarshalErrorKind::NotStructured { .. }));
    }
}
