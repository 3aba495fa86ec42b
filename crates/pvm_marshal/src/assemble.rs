//! Reconstructing native values from structured values.
//!
//! Decoding is driven by a target [`TypeInfo`], normally the parameter type
//! of the setter that will receive the value. Nothing is written to a native
//! object until every value it needs has been decoded.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use log::trace;
use pvm_data::{ArrayChunk, DEFAULT_STRUCTURE_ID, FieldKind, PvField, PvScalarArray, PvStructure, PvStructureArray};
use pvm_data::{PvUnion, PvUnionArray, Scalar, StoreError};
use pvm_reflect::Reflect;
use pvm_reflect::info::{ArrayInfo, ListInfo, MapInfo, StructInfo, TypeInfo, Typed};
use pvm_reflect::ops::{ReflectMut, Variant};

use crate::MarshallerContext;
use crate::classify::{classify, declared};
use crate::container::{ElementShape, NESTED_VALUE_FIELD, element_shape, item_info};
use crate::error::{AccessorRole, MarshalErrorKind, Result, ResultExt};
use crate::fields::{apply_setter, find_setter};
use crate::scalar;

// -----------------------------------------------------------------------------
// Source

/// A borrowed store value of any kind.
#[derive(Clone, Copy)]
pub(crate) enum Source<'a> {
    Scalar(&'a Scalar),
    ScalarArray(&'a PvScalarArray),
    Structure(&'a PvStructure),
    StructureArray(&'a PvStructureArray),
    Union(&'a PvUnion),
    UnionArray(&'a PvUnionArray),
}

impl<'a> From<&'a PvField> for Source<'a> {
    fn from(field: &'a PvField) -> Self {
        match field {
            PvField::Scalar(v) => Source::Scalar(v),
            PvField::ScalarArray(v) => Source::ScalarArray(v),
            PvField::Structure(v) => Source::Structure(v),
            PvField::StructureArray(v) => Source::StructureArray(v),
            PvField::Union(v) => Source::Union(v),
            PvField::UnionArray(v) => Source::UnionArray(v),
        }
    }
}

impl Source<'_> {
    const fn kind(self) -> FieldKind {
        match self {
            Source::Scalar(_) => FieldKind::Scalar,
            Source::ScalarArray(_) => FieldKind::ScalarArray,
            Source::Structure(_) => FieldKind::Structure,
            Source::StructureArray(_) => FieldKind::StructureArray,
            Source::Union(_) => FieldKind::Union,
            Source::UnionArray(_) => FieldKind::UnionArray,
        }
    }

    fn mismatch(self, expected: FieldKind) -> MarshalErrorKind {
        MarshalErrorKind::ShapeMismatch {
            expected,
            actual: self.kind(),
        }
    }
}

// -----------------------------------------------------------------------------
// Chunked reads

/// Collects a whole array through a reader that may return short chunks.
///
/// `get(offset, len)` is asked for the remaining elements until `len`
/// elements were seen. An empty chunk before that is an error.
fn read_all<'a, T: 'a>(len: usize, get: impl Fn(usize, usize) -> ArrayChunk<'a, T>) -> Result<Vec<&'a T>> {
    let mut out = Vec::with_capacity(len);
    while out.len() < len {
        let chunk = get(out.len(), len - out.len());
        if chunk.is_empty() {
            return Err(MarshalErrorKind::ArrayLengthMismatch {
                expected: len,
                actual: out.len(),
            }
            .into());
        }
        out.extend(chunk.data);
    }
    Ok(out)
}

fn scalars(array: &PvScalarArray) -> Result<Vec<&Scalar>> {
    read_all(array.len(), |offset, len| array.get(offset, len))
}

fn structures(array: &PvStructureArray) -> Result<Vec<&PvStructure>> {
    read_all(array.len(), |offset, len| array.get(offset, len))
}

fn unions(array: &PvUnionArray) -> Result<Vec<&PvUnion>> {
    read_all(array.len(), |offset, len| array.get(offset, len))
}

// -----------------------------------------------------------------------------
// Decoding

fn unsupported(target: &'static TypeInfo) -> MarshalErrorKind {
    MarshalErrorKind::UnsupportedContainerType {
        type_path: target.type_path(),
    }
}

fn type_mismatch(expected: &'static TypeInfo, actual: &dyn Reflect) -> MarshalErrorKind {
    MarshalErrorKind::TypeMismatch {
        expected: expected.type_path(),
        actual: actual.reflect_type_path(),
    }
}

/// Decodes `source` as a value of `target`.
pub(crate) fn decode(ctx: &MarshallerContext, source: Source<'_>, target: &'static TypeInfo) -> Result<Box<dyn Reflect>> {
    match target {
        TypeInfo::Optional(info) => {
            let value = decode(ctx, source, info.some_info())?;
            Ok(info.wrap_some(value).map_err(|v| type_mismatch(target, &*v))?)
        }
        TypeInfo::Dynamic(_) => decode_dynamic(ctx, source),
        TypeInfo::Variant(_) => match source {
            Source::Union(union) => Ok(Box::new(decode_variant(ctx, union)?)),
            other => Err(other.mismatch(FieldKind::Union).into()),
        },
        TypeInfo::Scalar(info) => match source {
            Source::Scalar(value) => Ok(scalar::decode(value, info.kind())?),
            other => Err(other.mismatch(FieldKind::Scalar).into()),
        },
        TypeInfo::Struct(info) => match source {
            Source::Structure(value) => decode_struct(ctx, value, info),
            other => Err(other.mismatch(FieldKind::Structure).into()),
        },
        TypeInfo::Map(info) => match source {
            Source::Structure(value) => decode_map(ctx, value, target, info),
            other => Err(other.mismatch(FieldKind::Structure).into()),
        },
        TypeInfo::List(_) | TypeInfo::Array(_) => decode_sequence(ctx, source, target, false),
        TypeInfo::Enum(_) => Err(MarshalErrorKind::RegularUnionNotSupported {
            type_name: String::from(target.type_path()),
        }
        .into()),
    }
}

/// Decodes a composite through its constructor and setters.
///
/// Every field present in `value` needs a setter. Setters run only once all
/// fields were decoded.
pub(crate) fn decode_struct(ctx: &MarshallerContext, value: &PvStructure, info: &'static StructInfo) -> Result<Box<dyn Reflect>> {
    let mut target = info.construct().ok_or(MarshalErrorKind::MissingConstructor {
        type_path: info.type_path(),
    })?;

    let mut pending = Vec::with_capacity(value.len());
    for (name, field) in value.iter() {
        let (level, setter, param) = find_setter(info, name)
            .and_then(|(level, setter)| Some((level, setter, setter.param_info()?)))
            .ok_or_else(|| MarshalErrorKind::AccessorNotFound {
                type_path: info.type_path(),
                field: String::from(name),
                role: AccessorRole::Setter,
            })
            .in_field(name)?;
        let decoded = decode(ctx, Source::from(field), param).in_field(name)?;
        pending.push((name, level, setter, decoded));
    }

    for (name, level, setter, decoded) in pending {
        apply_setter(&mut *target, info, level, setter, decoded).in_field(name)?;
    }
    Ok(target)
}

fn decode_map(ctx: &MarshallerContext, value: &PvStructure, target: &'static TypeInfo, info: &'static MapInfo) -> Result<Box<dyn Reflect>> {
    classify(target)?;
    let mut map = info.new_instance();
    {
        let ReflectMut::Map(entries) = map.reflect_mut() else {
            return Err(unsupported(target).into());
        };
        for (name, field) in value.iter() {
            let entry = decode(ctx, Source::from(field), info.value_info()).in_field(name)?;
            entries
                .insert_boxed(Box::new(String::from(name)), entry)
                .map_err(|v| type_mismatch(info.value_info(), &*v))
                .in_field(name)?;
        }
    }
    Ok(map)
}

/// Decodes a list or array target. `nested` is set for the inner sequences
/// of a sequence of sequences.
fn decode_sequence(ctx: &MarshallerContext, source: Source<'_>, target: &'static TypeInfo, nested: bool) -> Result<Box<dyn Reflect>> {
    let item = item_info(target).ok_or_else(|| unsupported(target))?;
    let items = decode_items(ctx, source, item, nested)?;
    let value = match declared(target) {
        TypeInfo::List(info) => build_list(info, target, items)?,
        TypeInfo::Array(info) => build_array(info, target, items)?,
        _ => return Err(unsupported(target).into()),
    };
    wrap_optional(target, value)
}

fn wrap_optional(target: &'static TypeInfo, value: Box<dyn Reflect>) -> Result<Box<dyn Reflect>> {
    match target {
        TypeInfo::Optional(info) => {
            let inner = wrap_optional(info.some_info(), value)?;
            Ok(info.wrap_some(inner).map_err(|v| type_mismatch(target, &*v))?)
        }
        _ => Ok(value),
    }
}

fn build_list(info: &'static ListInfo, target: &'static TypeInfo, items: Vec<Box<dyn Reflect>>) -> Result<Box<dyn Reflect>> {
    let mut list = info.new_instance();
    {
        let ReflectMut::List(elements) = list.reflect_mut() else {
            return Err(unsupported(target).into());
        };
        for (index, item) in items.into_iter().enumerate() {
            elements
                .push(item)
                .map_err(|v| type_mismatch(info.item_info(), &*v))
                .at_index(index)?;
        }
    }
    Ok(list)
}

fn build_array(info: &'static ArrayInfo, target: &'static TypeInfo, items: Vec<Box<dyn Reflect>>) -> Result<Box<dyn Reflect>> {
    if let Some(capacity) = info.capacity()
        && capacity != items.len()
    {
        return Err(MarshalErrorKind::ArrayLengthMismatch {
            expected: capacity,
            actual: items.len(),
        }
        .into());
    }
    info.from_items(items).ok_or_else(|| {
        MarshalErrorKind::TypeMismatch {
            expected: target.type_path(),
            actual: info.item_info().type_path(),
        }
        .into()
    })
}

/// Decodes the elements of a store array as values of `item`.
fn decode_items(ctx: &MarshallerContext, source: Source<'_>, item: &'static TypeInfo, nested: bool) -> Result<Vec<Box<dyn Reflect>>> {
    let mut out = Vec::new();
    match (element_shape(item, nested)?, source) {
        (ElementShape::Scalar(_), Source::ScalarArray(array)) => {
            for (index, value) in scalars(array)?.into_iter().enumerate() {
                out.push(decode(ctx, Source::Scalar(value), item).at_index(index)?);
            }
        }
        (ElementShape::Structure, Source::StructureArray(array)) => {
            for (index, value) in structures(array)?.into_iter().enumerate() {
                out.push(decode(ctx, Source::Structure(value), item).at_index(index)?);
            }
        }
        (ElementShape::Union, Source::UnionArray(array)) => {
            let dynamic = matches!(declared(item), TypeInfo::Dynamic(_));
            for (index, value) in unions(array)?.into_iter().enumerate() {
                let element = if dynamic {
                    decode_union_payload(ctx, value)
                } else {
                    decode(ctx, Source::Union(value), item)
                };
                out.push(element.at_index(index)?);
            }
        }
        (ElementShape::Scalar(_) | ElementShape::Structure, Source::UnionArray(array)) => {
            for (index, value) in unions(array)?.into_iter().enumerate() {
                out.push(decode_union_element(ctx, value, item).at_index(index)?);
            }
        }
        (ElementShape::Nested(inner), Source::StructureArray(array)) => {
            for (index, wrapper) in structures(array)?.into_iter().enumerate() {
                let value = wrapper
                    .sub_field(NESTED_VALUE_FIELD)
                    .ok_or_else(|| StoreError::NoSuchField(String::from(NESTED_VALUE_FIELD)))
                    .at_index(index)?;
                let element = decode_sequence(ctx, Source::from(value), inner, true)
                    .in_field(NESTED_VALUE_FIELD)
                    .at_index(index)?;
                out.push(element);
            }
        }
        (shape, other) => {
            let expected = match shape {
                ElementShape::Scalar(_) => FieldKind::ScalarArray,
                ElementShape::Union => FieldKind::UnionArray,
                ElementShape::Structure | ElementShape::Nested(_) => FieldKind::StructureArray,
            };
            return Err(other.mismatch(expected).into());
        }
    }
    Ok(out)
}

// -----------------------------------------------------------------------------
// Unions and dynamic targets

fn decode_variant(ctx: &MarshallerContext, union: &PvUnion) -> Result<Variant> {
    Ok(match decode_union_payload_opt(ctx, union)? {
        Some(value) => Variant::from_boxed(value),
        None => Variant::empty(),
    })
}

/// The payload of a union element stored for a `Box<dyn Reflect>` item.
fn decode_union_payload(ctx: &MarshallerContext, union: &PvUnion) -> Result<Box<dyn Reflect>> {
    match decode_union_payload_opt(ctx, union)? {
        Some(value) => Ok(value),
        None => Ok(Box::new(Variant::empty())),
    }
}

/// The current payload of a variant union, a scalar or a structure.
fn union_payload(union: &PvUnion) -> Result<Option<&PvField>, MarshalErrorKind> {
    if !union.is_variant() {
        return Err(MarshalErrorKind::RegularUnionNotSupported {
            type_name: String::from(union.union().id()),
        });
    }
    match union.get() {
        None => Ok(None),
        Some(PvField::Union(_)) => Err(MarshalErrorKind::UnsupportedNestedContainer {
            type_path: Variant::type_info().type_path(),
        }),
        Some(array) if array.kind().is_array() => {
            Err(MarshalErrorKind::UnionOfArrayNotSupported { kind: array.kind() })
        }
        Some(payload) => Ok(Some(payload)),
    }
}

fn decode_union_payload_opt(ctx: &MarshallerContext, union: &PvUnion) -> Result<Option<Box<dyn Reflect>>> {
    match union_payload(union)? {
        Some(payload) => decode_dynamic(ctx, Source::from(payload)).map(Some),
        None => Ok(None),
    }
}

/// Decodes the payload of a union array element as a typed `item`. An empty
/// union is only accepted by an `Option` item.
fn decode_union_element(ctx: &MarshallerContext, union: &PvUnion, item: &'static TypeInfo) -> Result<Box<dyn Reflect>> {
    match (union_payload(union)?, item) {
        (Some(payload), _) => decode(ctx, Source::from(payload), item),
        (None, TypeInfo::Optional(info)) => Ok(info.none()),
        (None, _) => Err(MarshalErrorKind::NullElement.into()),
    }
}

/// Decodes without a target type: scalars to their natural type, structures
/// through their registered type id. Structures without an id become a
/// `BTreeMap<String, Box<dyn Reflect>>`.
fn decode_dynamic(ctx: &MarshallerContext, source: Source<'_>) -> Result<Box<dyn Reflect>> {
    match source {
        Source::Scalar(value) => Ok(scalar::natural(value)),
        Source::ScalarArray(array) => Ok(scalar::natural_vec(array.element_type(), &scalars(array)?)?),
        Source::Structure(value) => {
            let id = value.structure().id();
            let info = match ctx.type_info_for_id(id) {
                Some(info) => info,
                None if id == DEFAULT_STRUCTURE_ID => <BTreeMap<String, Box<dyn Reflect>>>::type_info(),
                None => {
                    return Err(MarshalErrorKind::UnresolvableElementType {
                        what: format!("structure `{id}`"),
                    }
                    .into());
                }
            };
            trace!("structure `{id}` resolved to `{}`", info.type_path());
            decode(ctx, source, info)
        }
        Source::StructureArray(array) => {
            let mut out: Vec<Box<dyn Reflect>> = Vec::with_capacity(array.len());
            for (index, value) in structures(array)?.into_iter().enumerate() {
                out.push(decode_dynamic(ctx, Source::Structure(value)).at_index(index)?);
            }
            Ok(Box::new(out))
        }
        Source::Union(union) => Ok(Box::new(decode_variant(ctx, union)?)),
        Source::UnionArray(array) => {
            let mut out = Vec::with_capacity(array.len());
            for (index, union) in unions(array)?.into_iter().enumerate() {
                out.push(decode_variant(ctx, union).at_index(index)?);
            }
            Ok(Box::new(out))
        }
    }
}

#[cfg(test)]
mod tests {
    use pvm_data::{Field, FieldBuilder, PvUnion, ScalarType, Union};
    use pvm_reflect::impls::reflect_partial_eq;

    use super::*;
    use crate::fixtures::{Point, Slot};

    fn decode_as<T: Typed>(ctx: &MarshallerContext, field: &PvField) -> Result<Box<dyn Reflect>> {
        decode(ctx, Source::from(field), T::type_info())
    }

    #[test]
    fn chunked_arrays_are_reassembled() {
        let mut array = PvScalarArray::new(ScalarType::Int);
        for segment in [0..3, 3..6, 6..9, 9..10] {
            array.push_segment(segment.map(Scalar::Int).collect()).unwrap();
        }
        assert_eq!(array.get(0, 10).len(), 3);

        let field = PvField::ScalarArray(array);
        let value = decode_as::<Vec<i32>>(&MarshallerContext::new(), &field).unwrap();
        assert_eq!(value.downcast_ref::<Vec<i32>>(), Some(&(0..10).collect::<Vec<_>>()));
    }

    #[test]
    fn fixed_arrays_need_the_exact_length() {
        let mut array = PvScalarArray::new(ScalarType::Double);
        array.put(vec![Scalar::Double(1.0), Scalar::Double(2.0)]).unwrap();
        let field = PvField::ScalarArray(array);
        let ctx = MarshallerContext::new();

        let value = decode_as::<[f64; 2]>(&ctx, &field).unwrap();
        assert_eq!(value.downcast_ref::<[f64; 2]>(), Some(&[1.0, 2.0]));

        let error = decode_as::<[f64; 3]>(&ctx, &field).unwrap_err();
        assert_eq!(
            error.kind(),
            &MarshalErrorKind::ArrayLengthMismatch {
                expected: 3,
                actual: 2,
            }
        );
    }

    #[test]
    fn missing_setters_are_reported() {
        let mut builder = FieldBuilder::new();
        builder.add_scalar("x", ScalarType::Double);
        builder.add_scalar("z", ScalarType::Double);
        let field = PvField::Structure(PvStructure::new(builder.create_structure().unwrap()));

        let error = decode_as::<Point>(&MarshallerContext::new(), &field).unwrap_err();
        assert_eq!(error.path().to_string(), "z");
        assert!(matches!(
            error.kind(),
            MarshalErrorKind::AccessorNotFound {
                role: AccessorRole::Setter,
                ..
            }
        ));
    }

    #[test]
    fn variant_targets_take_the_payload() {
        let mut union = PvUnion::new(alloc::sync::Arc::new(Union::variant()));
        union.set(PvField::Scalar(Scalar::from("on"))).unwrap();
        let mut builder = FieldBuilder::new();
        builder.add("content", Field::Union(union.union().clone()));
        let mut structure = PvStructure::new(builder.create_structure().unwrap());
        *structure.union_field_mut("content").unwrap() = union;

        let value = decode_as::<Slot>(&MarshallerContext::new(), &PvField::Structure(structure)).unwrap();
        let slot = value.downcast_ref::<Slot>().unwrap();
        assert_eq!(slot.content.downcast_ref::<String>().map(String::as_str), Some("on"));
    }

    #[test]
    fn union_arrays_decode_to_variants() {
        let mut array = PvUnionArray::new(alloc::sync::Arc::new(Union::variant()));
        let mut first = PvUnion::new(array.union().clone());
        first.set(PvField::Scalar(Scalar::Int(1))).unwrap();
        let empty = PvUnion::new(array.union().clone());
        array.put(vec![first, empty]).unwrap();
        let field = PvField::UnionArray(array);

        let value = decode_as::<Box<dyn Reflect>>(&MarshallerContext::new(), &field).unwrap();
        let expected = vec![Variant::new(1_i32), Variant::empty()];
        assert!(reflect_partial_eq(&*value, &expected));

        let value = decode_as::<Vec<Box<dyn Reflect>>>(&MarshallerContext::new(), &field).unwrap();
        let list = value.downcast_ref::<Vec<Box<dyn Reflect>>>().unwrap();
        assert_eq!(list[0].downcast_ref::<i32>(), Some(&1));
        assert!(list[1].downcast_ref::<Variant>().unwrap().is_empty());
    }

    fn union_array(payloads: Vec<Option<PvField>>) -> PvField {
        let mut array = PvUnionArray::new(alloc::sync::Arc::new(Union::variant()));
        let elements = payloads
            .into_iter()
            .map(|payload| {
                let mut union = PvUnion::new(array.union().clone());
                if let Some(payload) = payload {
                    union.set(payload).unwrap();
                }
                union
            })
            .collect();
        array.put(elements).unwrap();
        PvField::UnionArray(array)
    }

    #[test]
    fn union_arrays_decode_to_typed_items() {
        let ctx = MarshallerContext::new();
        let field = union_array(vec![
            Some(PvField::Scalar(Scalar::Int(1))),
            Some(PvField::Scalar(Scalar::Int(2))),
        ]);
        let value = decode_as::<Vec<i32>>(&ctx, &field).unwrap();
        assert_eq!(value.downcast_ref::<Vec<i32>>(), Some(&vec![1, 2]));
        let value = decode_as::<[i64; 2]>(&ctx, &field).unwrap();
        assert_eq!(value.downcast_ref::<[i64; 2]>(), Some(&[1, 2]));

        let field = union_array(vec![Some(PvField::Scalar(Scalar::Int(1))), None]);
        let value = decode_as::<Vec<Option<i32>>>(&ctx, &field).unwrap();
        assert_eq!(value.downcast_ref::<Vec<Option<i32>>>(), Some(&vec![Some(1), None]));
        let error = decode_as::<Vec<i32>>(&ctx, &field).unwrap_err();
        assert_eq!(error.kind(), &MarshalErrorKind::NullElement);
        assert_eq!(error.path().to_string(), "[1]");

        let mut samples = PvScalarArray::new(ScalarType::Int);
        samples.put(vec![Scalar::Int(3)]).unwrap();
        let field = union_array(vec![
            Some(PvField::Scalar(Scalar::Int(1))),
            Some(PvField::ScalarArray(samples)),
        ]);
        let error = decode_as::<Vec<i32>>(&ctx, &field).unwrap_err();
        assert_eq!(error.path().to_string(), "[1]");
        assert_eq!(
            error.kind(),
            &MarshalErrorKind::UnionOfArrayNotSupported {
                kind: FieldKind::ScalarArray
            }
        );
    }

    #[test]
    fn anonymous_structures_decode_to_maps() {
        let mut builder = FieldBuilder::new();
        builder.add_scalar("x", ScalarType::Int);
        let mut inner = PvStructure::new(builder.create_structure().unwrap());
        inner.put_scalar("x", Scalar::Int(1)).unwrap();

        let value = decode_as::<Box<dyn Reflect>>(&MarshallerContext::new(), &PvField::Structure(inner)).unwrap();
        let map = value.downcast_ref::<BTreeMap<String, Box<dyn Reflect>>>().unwrap();
        assert_eq!(map["x"].downcast_ref::<i32>(), Some(&1));
    }

    #[test]
    fn unknown_structures_are_unresolvable() {
        let mut builder = FieldBuilder::new();
        builder.set_id("demo:Unknown:1.0");
        let field = PvField::Structure(PvStructure::new(builder.create_structure().unwrap()));
        let error = decode_as::<BTreeMap<String, Box<dyn Reflect>>>(
            &MarshallerContext::new(),
            &PvField::Structure({
                let mut builder = FieldBuilder::new();
                builder.add("inner", field.field());
                let mut outer = PvStructure::new(builder.create_structure().unwrap());
                *outer.sub_field_mut("inner").unwrap() = field;
                outer
            }),
        )
        .unwrap_err();
        assert_eq!(error.path().to_string(), "inner");
        assert!(matches!(
            error.kind(),
            MarshalErrorKind::UnresolvableElementType { .. }
        ));
    }
}
