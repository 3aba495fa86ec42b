//! Writing native values into structured values.
//!
//! The field set is derived again from the value with the same rules the
//! schema was built with, so a value only fits a schema built from an
//! instance with the same null fields.

use alloc::string::String;

use pvm_data::{FieldKind, PvField, PvStructure, StoreError};
use pvm_reflect::Reflect;
use pvm_reflect::info::{MapInfo, StructInfo};
use pvm_reflect::ops::ReflectRef;

use crate::MarshallerContext;
use crate::classify::{Category, classify, resolve};
use crate::container::{populate_sequence, populate_union, union_payload};
use crate::error::{MarshalErrorKind, Result, ResultExt};
use crate::fields::marshalled_fields;
use crate::scalar::encode_value;
use crate::schema::map_key;

/// Writes a composite or map value into `target`.
pub(crate) fn populate_structure(ctx: &MarshallerContext, value: &dyn Reflect, target: &mut PvStructure) -> Result<()> {
    match classify(value.reflect_type_info())? {
        Category::Composite(info) => populate_composite(ctx, value, info, target),
        Category::Map(info) => populate_map(ctx, value, info, target),
        _ => Err(MarshalErrorKind::NotStructured {
            kind: value.reflect_kind(),
        }
        .into()),
    }
}

fn field_slot<'a>(target: &'a mut PvStructure, name: &str) -> Result<&'a mut PvField, StoreError> {
    target
        .sub_field_mut(name)
        .ok_or_else(|| StoreError::NoSuchField(String::from(name)))
}

fn populate_composite(
    ctx: &MarshallerContext,
    value: &dyn Reflect,
    info: &'static StructInfo,
    target: &mut PvStructure,
) -> Result<()> {
    if let Some(serializer) = ctx.serializer_for(info)? {
        return serializer.populate_structure(ctx, value, target);
    }

    for field in marshalled_fields(info, value)? {
        let Some(current) = field.value else {
            continue;
        };
        let slot = field_slot(target, field.name).in_field(field.name)?;
        populate_field(ctx, current, slot).in_field(field.name)?;
    }
    Ok(())
}

fn populate_map(ctx: &MarshallerContext, value: &dyn Reflect, info: &'static MapInfo, target: &mut PvStructure) -> Result<()> {
    let ReflectRef::Map(map) = value.reflect_ref() else {
        return Err(MarshalErrorKind::NotStructured {
            kind: value.reflect_kind(),
        }
        .into());
    };
    for (key, entry) in map.iter() {
        let name = map_key(key, info)?;
        let Some(entry) = resolve(entry) else {
            continue;
        };
        let slot = field_slot(target, name).in_field(name)?;
        populate_field(ctx, entry, slot).in_field(name)?;
    }
    Ok(())
}

/// Writes a non-null value into the slot built for it.
pub(crate) fn populate_field(ctx: &MarshallerContext, value: &dyn Reflect, slot: &mut PvField) -> Result<()> {
    let actual = slot.kind();
    let mismatch = |expected| MarshalErrorKind::ShapeMismatch { expected, actual };
    match classify(value.reflect_type_info())? {
        Category::Scalar(_) => {
            let PvField::Scalar(current) = slot else {
                return Err(mismatch(FieldKind::Scalar).into());
            };
            let encoded = encode_value(value)?;
            if encoded.scalar_type() != current.scalar_type() {
                return Err(StoreError::ScalarTypeMismatch {
                    expected: current.scalar_type(),
                    actual: encoded.scalar_type(),
                }
                .into());
            }
            *current = encoded;
            Ok(())
        }
        Category::Composite(_) | Category::Map(_) => {
            let PvField::Structure(structure) = slot else {
                return Err(mismatch(FieldKind::Structure).into());
            };
            populate_structure(ctx, value, structure)
        }
        Category::ListLike(_) | Category::Array(_) => populate_sequence(ctx, value, slot, false),
        Category::UnionVariant => {
            let PvField::Union(union) = slot else {
                return Err(mismatch(FieldKind::Union).into());
            };
            populate_union(ctx, union_payload(value), union)
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use std::collections::HashMap;

    use pvm_data::{FieldBuilder, Scalar, ScalarType};

    use super::*;
    use crate::fixtures::{Beacon, Point};
    use crate::schema::build_structure;

    #[test]
    fn fields_are_written_by_name() {
        let ctx = MarshallerContext::new();
        let beacon = Beacon {
            label: String::from("north"),
            position: Some(Point { x: 0.5, y: -1.0 }),
            enabled: true,
        };
        let mut target = PvStructure::new(build_structure(&ctx, &beacon).unwrap());
        populate_structure(&ctx, &beacon, &mut target).unwrap();

        assert_eq!(target.scalar("label").unwrap(), &Scalar::from("north"));
        assert_eq!(target.scalar("enabled").unwrap(), &Scalar::Boolean(true));
        let position = target.structure_field("position").unwrap();
        assert_eq!(position.scalar("y").unwrap(), &Scalar::Double(-1.0));
    }

    #[test]
    fn heterogeneous_map_entries() {
        let ctx = MarshallerContext::new();
        let mut map: HashMap<String, Box<dyn Reflect>> = HashMap::new();
        map.insert(String::from("a"), Box::new(1_i32));
        map.insert(String::from("b"), Box::new(String::from("text")));

        let mut target = PvStructure::new(build_structure(&ctx, &map).unwrap());
        populate_structure(&ctx, &map, &mut target).unwrap();
        assert_eq!(target.scalar("a").unwrap(), &Scalar::Int(1));
        assert_eq!(target.scalar("b").unwrap(), &Scalar::from("text"));
    }

    #[test]
    fn mismatched_schemas_are_reported() {
        let ctx = MarshallerContext::new();
        let mut builder = FieldBuilder::new();
        builder.add_scalar("x", ScalarType::Float);
        builder.add_array("y", ScalarType::Double);
        let mut target = PvStructure::new(builder.create_structure().unwrap());

        let error = populate_structure(&ctx, &Point { x: 1.0, y: 2.0 }, &mut target).unwrap_err();
        assert_eq!(error.path().to_string(), "x");
        assert!(matches!(
            error.kind(),
            MarshalErrorKind::StoreAccess(StoreError::ScalarTypeMismatch { .. })
        ));

        let mut builder = FieldBuilder::new();
        builder.add_scalar("x", ScalarType::Double);
        builder.add_array("y", ScalarType::Double);
        let mut target = PvStructure::new(builder.create_structure().unwrap());
        let error = populate_structure(&ctx, &Point { x: 1.0, y: 2.0 }, &mut target).unwrap_err();
        assert_eq!(
            error.kind(),
            &MarshalErrorKind::ShapeMismatch {
                expected: FieldKind::Scalar,
                actual: FieldKind::ScalarArray,
            }
        );
    }
}
