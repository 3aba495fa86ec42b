//! Data: values conforming to an introspection tree.

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::{ArrayChunk, Field, FieldKind, PvArray, Scalar, ScalarType, StoreError, Structure, Union};

#[inline]
fn same_structure(a: &Arc<Structure>, b: &Arc<Structure>) -> bool {
    Arc::ptr_eq(a, b) || **a == **b
}

#[inline]
fn same_union(a: &Arc<Union>, b: &Arc<Union>) -> bool {
    Arc::ptr_eq(a, b) || **a == **b
}

// -----------------------------------------------------------------------------
// PvField

/// A value of any field kind.
#[derive(Debug, Clone, PartialEq)]
pub enum PvField {
    Scalar(Scalar),
    ScalarArray(PvScalarArray),
    Structure(PvStructure),
    StructureArray(PvStructureArray),
    Union(PvUnion),
    UnionArray(PvUnionArray),
}

impl PvField {
    /// Creates a default-initialised value for `field`.
    pub fn new(field: &Field) -> Self {
        match field {
            Field::Scalar(ty) => PvField::Scalar(ty.default_value()),
            Field::ScalarArray(ty) => PvField::ScalarArray(PvScalarArray::new(*ty)),
            Field::Structure(s) => PvField::Structure(PvStructure::new(s.clone())),
            Field::StructureArray(s) => PvField::StructureArray(PvStructureArray::new(s.clone())),
            Field::Union(u) => PvField::Union(PvUnion::new(u.clone())),
            Field::UnionArray(u) => PvField::UnionArray(PvUnionArray::new(u.clone())),
        }
    }

    pub const fn kind(&self) -> FieldKind {
        match self {
            PvField::Scalar(_) => FieldKind::Scalar,
            PvField::ScalarArray(_) => FieldKind::ScalarArray,
            PvField::Structure(_) => FieldKind::Structure,
            PvField::StructureArray(_) => FieldKind::StructureArray,
            PvField::Union(_) => FieldKind::Union,
            PvField::UnionArray(_) => FieldKind::UnionArray,
        }
    }

    /// Rebuilds the introspection this value conforms to.
    pub fn field(&self) -> Field {
        match self {
            PvField::Scalar(v) => Field::Scalar(v.scalar_type()),
            PvField::ScalarArray(a) => Field::ScalarArray(a.element_type()),
            PvField::Structure(s) => Field::Structure(s.structure().clone()),
            PvField::StructureArray(a) => Field::StructureArray(a.element().clone()),
            PvField::Union(u) => Field::Union(u.union().clone()),
            PvField::UnionArray(a) => Field::UnionArray(a.union().clone()),
        }
    }

    /// Returns `true` if this value may be stored where `field` is declared.
    pub fn conforms_to(&self, field: &Field) -> bool {
        match (self, field) {
            (PvField::Scalar(v), Field::Scalar(ty)) => v.scalar_type() == *ty,
            (PvField::ScalarArray(a), Field::ScalarArray(ty)) => a.element_type() == *ty,
            (PvField::Structure(s), Field::Structure(f)) => same_structure(s.structure(), f),
            (PvField::StructureArray(a), Field::StructureArray(f)) => same_structure(a.element(), f),
            (PvField::Union(u), Field::Union(f)) => same_union(u.union(), f),
            (PvField::UnionArray(a), Field::UnionArray(f)) => same_union(a.union(), f),
            _ => false,
        }
    }
}

// -----------------------------------------------------------------------------
// Arrays

/// An array of scalars of one type.
#[derive(Debug, Clone, PartialEq)]
pub struct PvScalarArray {
    element: ScalarType,
    data: PvArray<Scalar>,
}

impl PvScalarArray {
    pub const fn new(element: ScalarType) -> Self {
        Self {
            element,
            data: PvArray::new(),
        }
    }

    #[inline]
    pub const fn element_type(&self) -> ScalarType {
        self.element
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// See [`PvArray::get`].
    #[inline]
    pub fn get(&self, offset: usize, len: usize) -> ArrayChunk<'_, Scalar> {
        self.data.get(offset, len)
    }

    fn check(&self, values: &[Scalar]) -> Result<(), StoreError> {
        match values.iter().find(|v| v.scalar_type() != self.element) {
            Some(bad) => Err(StoreError::ScalarTypeMismatch {
                expected: self.element,
                actual: bad.scalar_type(),
            }),
            None => Ok(()),
        }
    }

    /// Replaces the content. Every value must have the element type.
    pub fn put(&mut self, values: Vec<Scalar>) -> Result<(), StoreError> {
        self.check(&values)?;
        self.data.put(values);
        Ok(())
    }

    /// Appends a segment. Every value must have the element type.
    pub fn push_segment(&mut self, values: Vec<Scalar>) -> Result<(), StoreError> {
        self.check(&values)?;
        self.data.push_segment(values);
        Ok(())
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Scalar> {
        self.data.iter()
    }
}

/// An array of structures sharing one introspection.
#[derive(Debug, Clone, PartialEq)]
pub struct PvStructureArray {
    element: Arc<Structure>,
    data: PvArray<PvStructure>,
}

impl PvStructureArray {
    pub const fn new(element: Arc<Structure>) -> Self {
        Self {
            element,
            data: PvArray::new(),
        }
    }

    #[inline]
    pub fn element(&self) -> &Arc<Structure> {
        &self.element
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// See [`PvArray::get`].
    #[inline]
    pub fn get(&self, offset: usize, len: usize) -> ArrayChunk<'_, PvStructure> {
        self.data.get(offset, len)
    }

    fn check(&self, values: &[PvStructure]) -> Result<(), StoreError> {
        match values.iter().all(|v| same_structure(v.structure(), &self.element)) {
            true => Ok(()),
            false => Err(StoreError::ElementMismatch(self.element.id().to_string())),
        }
    }

    /// Replaces the content. Every structure must share the element introspection.
    pub fn put(&mut self, values: Vec<PvStructure>) -> Result<(), StoreError> {
        self.check(&values)?;
        self.data.put(values);
        Ok(())
    }

    pub fn push_segment(&mut self, values: Vec<PvStructure>) -> Result<(), StoreError> {
        self.check(&values)?;
        self.data.push_segment(values);
        Ok(())
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &PvStructure> {
        self.data.iter()
    }
}

/// An array of unions sharing one introspection.
#[derive(Debug, Clone, PartialEq)]
pub struct PvUnionArray {
    union: Arc<Union>,
    data: PvArray<PvUnion>,
}

impl PvUnionArray {
    pub const fn new(union: Arc<Union>) -> Self {
        Self {
            union,
            data: PvArray::new(),
        }
    }

    #[inline]
    pub fn union(&self) -> &Arc<Union> {
        &self.union
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// See [`PvArray::get`].
    #[inline]
    pub fn get(&self, offset: usize, len: usize) -> ArrayChunk<'_, PvUnion> {
        self.data.get(offset, len)
    }

    fn check(&self, values: &[PvUnion]) -> Result<(), StoreError> {
        match values.iter().all(|v| same_union(v.union(), &self.union)) {
            true => Ok(()),
            false => Err(StoreError::ElementMismatch(self.union.id().to_string())),
        }
    }

    pub fn put(&mut self, values: Vec<PvUnion>) -> Result<(), StoreError> {
        self.check(&values)?;
        self.data.put(values);
        Ok(())
    }

    pub fn push_segment(&mut self, values: Vec<PvUnion>) -> Result<(), StoreError> {
        self.check(&values)?;
        self.data.push_segment(values);
        Ok(())
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &PvUnion> {
        self.data.iter()
    }
}

// -----------------------------------------------------------------------------
// PvStructure

/// A structure value: one [`PvField`] per field of its introspection.
#[derive(Debug, Clone, PartialEq)]
pub struct PvStructure {
    structure: Arc<Structure>,
    values: Vec<PvField>,
}

macro_rules! typed_access {
    ($(#[$doc:meta] $variant:ident: $ty:ty => $get:ident, $get_mut:ident;)*) => {$(
        #[$doc]
        pub fn $get(&self, name: &str) -> Result<&$ty, StoreError> {
            match self.lookup(name)? {
                PvField::$variant(value) => Ok(value),
                other => Err(kind_mismatch(name, FieldKind::$variant, other.kind())),
            }
        }

        #[$doc]
        pub fn $get_mut(&mut self, name: &str) -> Result<&mut $ty, StoreError> {
            match self.lookup_mut(name)? {
                PvField::$variant(value) => Ok(value),
                other => Err(kind_mismatch(name, FieldKind::$variant, other.kind())),
            }
        }
    )*};
}

fn kind_mismatch(name: &str, expected: FieldKind, actual: FieldKind) -> StoreError {
    StoreError::FieldKindMismatch {
        name: String::from(name),
        expected,
        actual,
    }
}

impl PvStructure {
    /// Creates a default-initialised instance of `structure`.
    pub fn new(structure: Arc<Structure>) -> Self {
        let values = structure.fields().map(|(_, f)| PvField::new(f)).collect();
        Self { structure, values }
    }

    #[inline]
    pub fn structure(&self) -> &Arc<Structure> {
        &self.structure
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn sub_field(&self, name: &str) -> Option<&PvField> {
        self.structure.index_of(name).map(|i| &self.values[i])
    }

    pub fn sub_field_mut(&mut self, name: &str) -> Option<&mut PvField> {
        self.structure.index_of(name).map(|i| &mut self.values[i])
    }

    /// Iterates `(name, value)` in introspection order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &PvField)> {
        self.structure.field_names().zip(self.values.iter())
    }

    fn lookup(&self, name: &str) -> Result<&PvField, StoreError> {
        self.sub_field(name)
            .ok_or_else(|| StoreError::NoSuchField(String::from(name)))
    }

    fn lookup_mut(&mut self, name: &str) -> Result<&mut PvField, StoreError> {
        self.sub_field_mut(name)
            .ok_or_else(|| StoreError::NoSuchField(String::from(name)))
    }

    /// Writes a scalar field. The value must have the declared scalar type.
    pub fn put_scalar(&mut self, name: &str, value: Scalar) -> Result<(), StoreError> {
        let slot = self.scalar_mut(name)?;
        if slot.scalar_type() != value.scalar_type() {
            return Err(StoreError::ScalarTypeMismatch {
                expected: slot.scalar_type(),
                actual: value.scalar_type(),
            });
        }
        *slot = value;
        Ok(())
    }

    typed_access! {
        /// Typed access to a scalar field.
        Scalar: Scalar => scalar, scalar_mut;
        /// Typed access to a scalar array field.
        ScalarArray: PvScalarArray => scalar_array, scalar_array_mut;
        /// Typed access to a nested structure field.
        Structure: PvStructure => structure_field, structure_field_mut;
        /// Typed access to a structure array field.
        StructureArray: PvStructureArray => structure_array, structure_array_mut;
        /// Typed access to a union field.
        Union: PvUnion => union_field, union_field_mut;
        /// Typed access to a union array field.
        UnionArray: PvUnionArray => union_array, union_array_mut;
    }
}

// -----------------------------------------------------------------------------
// PvUnion

/// A union value holding at most one payload.
#[derive(Debug, Clone, PartialEq)]
pub struct PvUnion {
    union: Arc<Union>,
    selector: Option<usize>,
    value: Option<Box<PvField>>,
}

impl PvUnion {
    /// Creates an empty union value.
    pub const fn new(union: Arc<Union>) -> Self {
        Self {
            union,
            selector: None,
            value: None,
        }
    }

    #[inline]
    pub fn union(&self) -> &Arc<Union> {
        &self.union
    }

    #[inline]
    pub fn is_variant(&self) -> bool {
        self.union.is_variant()
    }

    /// The current payload, if any.
    pub fn get(&self) -> Option<&PvField> {
        self.value.as_deref()
    }

    pub fn get_mut(&mut self) -> Option<&mut PvField> {
        self.value.as_deref_mut()
    }

    /// Name of the selected member of a restricted union.
    pub fn selected_name(&self) -> Option<&str> {
        let index = self.selector?;
        self.union.members().nth(index).map(|(name, _)| name)
    }

    /// Stores `value` as the payload.
    ///
    /// A restricted union selects the first member whose introspection
    /// matches `value` and fails if there is none.
    pub fn set(&mut self, value: PvField) -> Result<(), StoreError> {
        if !self.union.is_variant() {
            let index = self
                .union
                .members()
                .position(|(_, field)| value.conforms_to(field))
                .ok_or_else(|| StoreError::NoMatchingMember(self.union.id().to_string()))?;
            self.selector = Some(index);
        }
        self.value = Some(Box::new(value));
        Ok(())
    }

    /// Selects a member of a restricted union, resetting it to its default.
    pub fn select(&mut self, member: &str) -> Result<&mut PvField, StoreError> {
        if self.union.is_variant() {
            return Err(StoreError::NotRestricted(self.union.id().to_string()));
        }
        let (index, field) = self
            .union
            .members()
            .enumerate()
            .find(|(_, (name, _))| *name == member)
            .map(|(index, (_, field))| (index, PvField::new(field)))
            .ok_or_else(|| StoreError::NoSuchField(String::from(member)))?;
        self.selector = Some(index);
        Ok(&mut **self.value.insert(Box::new(field)))
    }

    /// Removes the payload.
    pub fn clear(&mut self) {
        self.selector = None;
        self.value = None;
    }
}

#[cfg(test)]
mod tests {
    use super::{PvField, PvStructure, PvUnion};
    use crate::{FieldBuilder, FieldKind, Scalar, ScalarType, StoreError, Union};
    use alloc::sync::Arc;

    fn sample() -> PvStructure {
        let mut inner = FieldBuilder::new();
        inner.add_scalar("x", ScalarType::Double);
        let inner = inner.create_structure().unwrap();

        let mut builder = FieldBuilder::new();
        builder.add_scalar("name", ScalarType::String);
        builder.add("point", crate::Field::Structure(inner.clone()));
        builder.add("points", crate::Field::StructureArray(inner));
        builder.add("any", crate::Field::Union(Arc::new(Union::variant())));
        PvStructure::new(builder.create_structure().unwrap())
    }

    #[test]
    fn defaults_follow_introspection() {
        let value = sample();
        assert_eq!(value.len(), 4);
        assert_eq!(value.scalar("name").unwrap(), &Scalar::String(String::new()));
        assert_eq!(
            value.structure_field("point").unwrap().scalar("x").unwrap(),
            &Scalar::Double(0.0)
        );
        assert!(value.structure_array("points").unwrap().is_empty());
        assert!(value.union_field("any").unwrap().get().is_none());
    }

    #[test]
    fn typed_access_reports_mismatch() {
        let mut value = sample();
        assert_eq!(
            value.scalar_array("name"),
            Err(StoreError::FieldKindMismatch {
                name: "name".into(),
                expected: FieldKind::ScalarArray,
                actual: FieldKind::Scalar,
            })
        );
        assert_eq!(
            value.put_scalar("name", Scalar::Int(1)),
            Err(StoreError::ScalarTypeMismatch {
                expected: ScalarType::String,
                actual: ScalarType::Int,
            })
        );
        assert_eq!(value.scalar("nope"), Err(StoreError::NoSuchField("nope".into())));
    }

    #[test]
    fn structure_array_checks_element_introspection() {
        let mut value = sample();
        let element = value.structure_array("points").unwrap().element().clone();
        let good = PvStructure::new(element);
        let bad = PvStructure::new(FieldBuilder::new().create_structure().unwrap());

        let array = value.structure_array_mut("points").unwrap();
        assert!(array.put(vec![good.clone(), good]).is_ok());
        assert_eq!(array.len(), 2);
        assert!(matches!(array.put(vec![bad]), Err(StoreError::ElementMismatch(_))));
        assert_eq!(array.len(), 2);
    }

    #[test]
    fn restricted_union_selects_matching_member() {
        let mut builder = FieldBuilder::new();
        builder.add_scalar("number", ScalarType::Double);
        builder.add_scalar("text", ScalarType::String);
        let mut union = PvUnion::new(builder.create_union().unwrap());

        union.set(PvField::Scalar(Scalar::from("hi"))).unwrap();
        assert_eq!(union.selected_name(), Some("text"));
        assert_eq!(
            union.set(PvField::Scalar(Scalar::Int(1))),
            Err(StoreError::NoMatchingMember("union".into()))
        );

        *union.select("number").unwrap() = PvField::Scalar(Scalar::Double(2.0));
        assert_eq!(union.selected_name(), Some("number"));
        assert_eq!(union.get(), Some(&PvField::Scalar(Scalar::Double(2.0))));
    }

    #[test]
    fn variant_union_accepts_anything() {
        let mut union = PvUnion::new(Arc::new(Union::variant()));
        union.set(PvField::Scalar(Scalar::Int(7))).unwrap();
        assert_eq!(union.selected_name(), None);
        assert!(matches!(union.select("x"), Err(StoreError::NotRestricted(_))));
        union.clear();
        assert!(union.get().is_none());
    }
}
