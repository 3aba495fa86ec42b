//! Sequences and unions, shared by both directions.
//!
//! The store shape of a sequence depends only on its declared item type:
//!
//! | Item | Store field |
//! |---|---|
//! | scalar | scalar array |
//! | struct, map | structure array, schema taken from the elements |
//! | `Variant`, `Box<dyn Reflect>` | variant union array |
//! | list, array | structure array of `{ value: <inner array> }` |
//!
//! Only one level of sequence nesting is supported.

use alloc::sync::Arc;
use alloc::vec::Vec;

use pvm_data::{DEFAULT_STRUCTURE_ID, Field, FieldBuilder, FieldKind, PvField, PvStructure, PvUnion};
use pvm_data::{ScalarType, StoreError, Structure, Union};
use pvm_reflect::Reflect;
use pvm_reflect::info::{TypeInfo, Typed};
use pvm_reflect::ops::{ReflectRef, Variant};

use crate::MarshallerContext;
use crate::classify::{Category, classify, resolve};
use crate::error::{MarshalErrorKind, Result, ResultExt};
use crate::scalar::{encode_value, scalar_type};
use crate::{populate, schema};

/// Field name of the wrapper structure used for nested sequences.
pub(crate) const NESTED_VALUE_FIELD: &str = "value";

// -----------------------------------------------------------------------------
// Element shapes

pub(crate) enum ElementShape {
    Scalar(ScalarType),
    Structure,
    Union,
    /// The item type of the outer sequence, itself a sequence.
    Nested(&'static TypeInfo),
}

pub(crate) fn element_shape(item: &'static TypeInfo, nested: bool) -> Result<ElementShape, MarshalErrorKind> {
    Ok(match classify(item)? {
        Category::Scalar(info) => ElementShape::Scalar(scalar_type(info.kind())),
        Category::Composite(_) | Category::Map(_) => ElementShape::Structure,
        Category::UnionVariant => ElementShape::Union,
        Category::ListLike(_) | Category::Array(_) if nested => {
            return Err(MarshalErrorKind::UnsupportedNestedContainer {
                type_path: item.type_path(),
            });
        }
        Category::ListLike(_) | Category::Array(_) => ElementShape::Nested(item),
    })
}

/// The declared item type of a sequence type, looking through `Option`.
pub(crate) fn item_info(sequence: &'static TypeInfo) -> Option<&'static TypeInfo> {
    match sequence {
        TypeInfo::List(info) => Some(info.item_info()),
        TypeInfo::Array(info) => Some(info.item_info()),
        TypeInfo::Optional(info) => item_info(info.some_info()),
        _ => None,
    }
}

fn not_a_sequence(value: &dyn Reflect) -> MarshalErrorKind {
    MarshalErrorKind::UnsupportedContainerType {
        type_path: value.reflect_type_path(),
    }
}

/// The item type and non-null items of a sequence value.
fn sequence_items(value: &dyn Reflect) -> Result<(&'static TypeInfo, Vec<&dyn Reflect>)> {
    let items: Vec<_> = match value.reflect_ref() {
        ReflectRef::List(list) => list.iter().collect(),
        ReflectRef::Array(array) => array.iter().collect(),
        _ => return Err(not_a_sequence(value).into()),
    };
    let item = item_info(value.reflect_type_info()).ok_or_else(|| not_a_sequence(value))?;
    let items = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| resolve(item).ok_or(MarshalErrorKind::NullElement).at_index(index))
        .collect::<Result<Vec<_>>>()?;
    Ok((item, items))
}

// -----------------------------------------------------------------------------
// Schema

/// Builds the store field of a sequence value.
pub(crate) fn sequence_field(ctx: &MarshallerContext, value: &dyn Reflect, nested: bool) -> Result<Field> {
    let (item, items) = sequence_items(value)?;
    Ok(match element_shape(item, nested)? {
        ElementShape::Scalar(ty) => Field::ScalarArray(ty),
        ElementShape::Union => {
            for (index, element) in items.iter().enumerate() {
                check_union_payload(union_payload(*element)).at_index(index)?;
            }
            Field::UnionArray(Arc::new(Union::variant()))
        }
        ElementShape::Structure => Field::StructureArray(uniform(
            &items,
            |element| schema::build_structure(ctx, element),
            || declared_structure(ctx, item),
        )?),
        ElementShape::Nested(inner) => Field::StructureArray(uniform(
            &items,
            |element| nested_wrapper(sequence_field(ctx, element, true)?),
            || nested_wrapper(declared_sequence_field(ctx, inner)?),
        )?),
    })
}

/// Derives the element schema from each element and requires them to agree.
fn uniform(
    items: &[&dyn Reflect],
    build: impl Fn(&dyn Reflect) -> Result<Arc<Structure>>,
    empty: impl FnOnce() -> Result<Arc<Structure>>,
) -> Result<Arc<Structure>> {
    let Some((first, rest)) = items.split_first() else {
        return empty();
    };
    let schema = build(*first).at_index(0)?;
    for (offset, element) in rest.iter().enumerate() {
        let index = offset + 1;
        let other = build(*element).at_index(index)?;
        if other != schema {
            return Err(MarshalErrorKind::ElementShapeMismatch { index }.into());
        }
    }
    Ok(schema)
}

fn nested_wrapper(inner: Field) -> Result<Arc<Structure>> {
    let mut builder = FieldBuilder::new();
    builder.add(NESTED_VALUE_FIELD, inner);
    Ok(builder.create_structure()?)
}

/// The element schema of an empty sequence of `item`.
fn declared_structure(ctx: &MarshallerContext, item: &'static TypeInfo) -> Result<Arc<Structure>> {
    if let Category::Composite(info) = classify(item)? {
        if let Some(sample) = info.construct() {
            return schema::build_structure(ctx, &*sample);
        }
        let id = ctx.type_id_for(info)?.unwrap_or(DEFAULT_STRUCTURE_ID);
        return Ok(Arc::new(Structure::empty(id)));
    }
    Ok(Arc::new(Structure::empty(DEFAULT_STRUCTURE_ID)))
}

/// The store field of an inner sequence type, without a value to look at.
fn declared_sequence_field(ctx: &MarshallerContext, sequence: &'static TypeInfo) -> Result<Field> {
    let item = item_info(sequence).ok_or(MarshalErrorKind::UnsupportedContainerType {
        type_path: sequence.type_path(),
    })?;
    Ok(match element_shape(item, true)? {
        ElementShape::Scalar(ty) => Field::ScalarArray(ty),
        ElementShape::Union => Field::UnionArray(Arc::new(Union::variant())),
        ElementShape::Structure => Field::StructureArray(declared_structure(ctx, item)?),
        ElementShape::Nested(_) => unreachable!("rejected by element_shape"),
    })
}

// -----------------------------------------------------------------------------
// Values

/// Writes a sequence value into an array slot built by [`sequence_field`].
pub(crate) fn populate_sequence(
    ctx: &MarshallerContext,
    value: &dyn Reflect,
    slot: &mut PvField,
    nested: bool,
) -> Result<()> {
    let (item, items) = sequence_items(value)?;
    let actual = slot.kind();
    let mismatch = |expected| MarshalErrorKind::ShapeMismatch { expected, actual };
    match element_shape(item, nested)? {
        ElementShape::Scalar(_) => {
            let PvField::ScalarArray(array) = slot else {
                return Err(mismatch(FieldKind::ScalarArray).into());
            };
            let values = items
                .iter()
                .enumerate()
                .map(|(index, element)| encode_value(*element).at_index(index))
                .collect::<Result<Vec<_>>>()?;
            array.put(values)?;
        }
        ElementShape::Structure => {
            let PvField::StructureArray(array) = slot else {
                return Err(mismatch(FieldKind::StructureArray).into());
            };
            let element = array.element().clone();
            let mut values = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                let mut target = PvStructure::new(element.clone());
                populate::populate_structure(ctx, *item, &mut target).at_index(index)?;
                values.push(target);
            }
            array.put(values)?;
        }
        ElementShape::Union => {
            let PvField::UnionArray(array) = slot else {
                return Err(mismatch(FieldKind::UnionArray).into());
            };
            let union = array.union().clone();
            let mut values = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                let mut target = PvUnion::new(union.clone());
                populate_union(ctx, union_payload(*item), &mut target).at_index(index)?;
                values.push(target);
            }
            array.put(values)?;
        }
        ElementShape::Nested(_) => {
            let PvField::StructureArray(array) = slot else {
                return Err(mismatch(FieldKind::StructureArray).into());
            };
            let element = array.element().clone();
            let mut values = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                let mut wrapper = PvStructure::new(element.clone());
                let inner = wrapper
                    .sub_field_mut(NESTED_VALUE_FIELD)
                    .ok_or_else(|| StoreError::NoSuchField(NESTED_VALUE_FIELD.into()))
                    .at_index(index)?;
                populate_sequence(ctx, *item, inner, true).at_index(index)?;
                values.push(wrapper);
            }
            array.put(values)?;
        }
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// Unions

/// What a union-classified value holds: the content of a [`Variant`], or the
/// value itself for `Box<dyn Reflect>`. `None` is an empty union.
pub(crate) fn union_payload(value: &dyn Reflect) -> Option<&dyn Reflect> {
    match value.reflect_ref() {
        ReflectRef::Variant(variant) => variant.value().and_then(resolve),
        _ => resolve(value),
    }
}

fn array_kind(value: &dyn Reflect) -> FieldKind {
    match item_info(value.reflect_type_info()).map(|item| element_shape(item, false)) {
        Some(Ok(ElementShape::Scalar(_))) => FieldKind::ScalarArray,
        Some(Ok(ElementShape::Union)) => FieldKind::UnionArray,
        _ => FieldKind::StructureArray,
    }
}

/// Checks that a payload can be stored in a variant union: a scalar or a
/// single structure.
pub(crate) fn check_union_payload(payload: Option<&dyn Reflect>) -> Result<(), MarshalErrorKind> {
    let Some(payload) = payload else {
        return Ok(());
    };
    match classify(payload.reflect_type_info())? {
        Category::Scalar(_) | Category::Composite(_) | Category::Map(_) => Ok(()),
        Category::ListLike(_) | Category::Array(_) => Err(MarshalErrorKind::UnionOfArrayNotSupported {
            kind: array_kind(payload),
        }),
        Category::UnionVariant => Err(MarshalErrorKind::UnsupportedNestedContainer {
            type_path: Variant::type_info().type_path(),
        }),
    }
}

fn payload_field(ctx: &MarshallerContext, payload: &dyn Reflect) -> Result<PvField> {
    check_union_payload(Some(payload))?;
    if let Category::Scalar(_) = classify(payload.reflect_type_info())? {
        return Ok(PvField::Scalar(encode_value(payload)?));
    }
    let structure = schema::build_structure(ctx, payload)?;
    let mut target = PvStructure::new(structure);
    populate::populate_structure(ctx, payload, &mut target)?;
    Ok(PvField::Structure(target))
}

/// Stores `payload` in a union value. Restricted unions are refused before
/// anything is written.
pub(crate) fn populate_union(
    ctx: &MarshallerContext,
    payload: Option<&dyn Reflect>,
    target: &mut PvUnion,
) -> Result<()> {
    if !target.is_variant() {
        return Err(MarshalErrorKind::RegularUnionNotSupported {
            type_name: target.union().id().into(),
        }
        .into());
    }
    match payload {
        None => target.clear(),
        Some(payload) => target.set(payload_field(ctx, payload)?)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;

    use pvm_data::Scalar;

    use super::*;
    use crate::fixtures::{Point, Tagged};

    fn ctx() -> MarshallerContext {
        MarshallerContext::new()
    }

    #[test]
    fn scalar_items_give_scalar_arrays() {
        let field = sequence_field(&ctx(), &vec![1_i16, 2], false).unwrap();
        assert_eq!(field, Field::ScalarArray(ScalarType::Short));

        let field = sequence_field(&ctx(), &[Some('a'), Some('b')], false).unwrap();
        assert_eq!(field, Field::ScalarArray(ScalarType::String));
    }

    #[test]
    fn structure_items_share_one_schema() {
        let points = vec![Point { x: 1.0, y: 2.0 }, Point { x: 3.0, y: 4.0 }];
        let Field::StructureArray(element) = sequence_field(&ctx(), &points, false).unwrap() else {
            panic!("expected a structure array");
        };
        assert_eq!(element.field_names().collect::<Vec<_>>(), ["x", "y"]);

        let mut slot = PvField::new(&Field::StructureArray(element));
        populate_sequence(&ctx(), &points, &mut slot, false).unwrap();
        let PvField::StructureArray(array) = &slot else {
            unreachable!()
        };
        assert_eq!(array.len(), 2);
        assert_eq!(array.get(1, 1).data[0].scalar("y").unwrap(), &Scalar::Double(4.0));
    }

    #[test]
    fn elements_with_different_schemas_are_refused() {
        let mut first = Tagged::default();
        first.base.note = Some(String::from("set"));
        let items = vec![first, Tagged::default()];
        let error = sequence_field(&ctx(), &items, false).unwrap_err();
        assert_eq!(error.kind(), &MarshalErrorKind::ElementShapeMismatch { index: 1 });
    }

    #[test]
    fn empty_sequences_use_the_default_instance() {
        let Field::StructureArray(element) = sequence_field(&ctx(), &Vec::<Point>::new(), false).unwrap()
        else {
            panic!("expected a structure array");
        };
        assert_eq!(element.len(), 2);
    }

    #[test]
    fn null_elements_are_refused() {
        let error = sequence_field(&ctx(), &vec![Some(1_u8), None], false).unwrap_err();
        assert_eq!(error.kind(), &MarshalErrorKind::NullElement);
        assert_eq!(error.path().to_string(), "[1]");
    }

    #[test]
    fn one_level_of_nesting() {
        let grid = vec![vec![1_i32, 2], vec![3]];
        let field = sequence_field(&ctx(), &grid, false).unwrap();
        let Field::StructureArray(element) = &field else {
            panic!("expected a structure array");
        };
        assert_eq!(element.field(NESTED_VALUE_FIELD), Some(&Field::ScalarArray(ScalarType::Int)));

        let cube = vec![vec![vec![1_i32]]];
        let error = sequence_field(&ctx(), &cube, false).unwrap_err();
        assert!(matches!(
            error.kind(),
            MarshalErrorKind::UnsupportedNestedContainer { .. }
        ));
    }

    #[test]
    fn union_payload_legality() {
        assert!(check_union_payload(Some(&3_u8)).is_ok());
        assert!(check_union_payload(Some(&Point::default())).is_ok());
        assert!(check_union_payload(None).is_ok());
        assert_eq!(
            check_union_payload(Some(&vec![1_u8])),
            Err(MarshalErrorKind::UnionOfArrayNotSupported {
                kind: FieldKind::ScalarArray
            })
        );
        assert_eq!(
            check_union_payload(Some(&vec![Point::default()])),
            Err(MarshalErrorKind::UnionOfArrayNotSupported {
                kind: FieldKind::StructureArray
            })
        );

        let boxed: Box<dyn Reflect> = Box::new(Variant::new(1_u8));
        assert!(matches!(
            check_union_payload(Some(&*boxed)),
            Err(MarshalErrorKind::UnsupportedNestedContainer { .. })
        ));
    }

    #[test]
    fn restricted_unions_are_refused() {
        let mut builder = FieldBuilder::new();
        builder.add_scalar("count", ScalarType::Int);
        let mut target = PvUnion::new(builder.create_union().unwrap());
        let error = populate_union(&ctx(), Some(&1_i32), &mut target).unwrap_err();
        assert!(matches!(
            error.kind(),
            MarshalErrorKind::RegularUnionNotSupported { .. }
        ));
        assert!(target.get().is_none());
    }
}
