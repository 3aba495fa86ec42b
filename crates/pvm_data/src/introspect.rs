//! Introspection: the shape half of the model.

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::{ScalarType, StoreError};

/// The id given to structures built without an explicit one.
pub const DEFAULT_STRUCTURE_ID: &str = "structure";

/// The id of the variant (unrestricted) union.
pub const VARIANT_UNION_ID: &str = "any";

// -----------------------------------------------------------------------------
// FieldKind

/// The six field kinds of the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Scalar,
    ScalarArray,
    Structure,
    StructureArray,
    Union,
    UnionArray,
}

impl FieldKind {
    pub const fn is_array(self) -> bool {
        matches!(
            self,
            FieldKind::ScalarArray | FieldKind::StructureArray | FieldKind::UnionArray
        )
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FieldKind::Scalar => "scalar",
            FieldKind::ScalarArray => "scalar array",
            FieldKind::Structure => "structure",
            FieldKind::StructureArray => "structure array",
            FieldKind::Union => "union",
            FieldKind::UnionArray => "union array",
        })
    }
}

// -----------------------------------------------------------------------------
// Field

/// The introspection of one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Scalar(ScalarType),
    ScalarArray(ScalarType),
    Structure(Arc<Structure>),
    StructureArray(Arc<Structure>),
    Union(Arc<Union>),
    UnionArray(Arc<Union>),
}

impl Field {
    pub const fn kind(&self) -> FieldKind {
        match self {
            Field::Scalar(_) => FieldKind::Scalar,
            Field::ScalarArray(_) => FieldKind::ScalarArray,
            Field::Structure(_) => FieldKind::Structure,
            Field::StructureArray(_) => FieldKind::StructureArray,
            Field::Union(_) => FieldKind::Union,
            Field::UnionArray(_) => FieldKind::UnionArray,
        }
    }

    fn write_tree(&self, f: &mut fmt::Formatter<'_>, name: &str, depth: usize) -> fmt::Result {
        let indent = depth * 4;
        match self {
            Field::Scalar(ty) => writeln!(f, "{:indent$}{ty} {name}", ""),
            Field::ScalarArray(ty) => writeln!(f, "{:indent$}{ty}[] {name}", ""),
            Field::Structure(s) => {
                writeln!(f, "{:indent$}{} {name}", "", s.id())?;
                s.write_fields(f, depth + 1)
            }
            Field::StructureArray(s) => {
                writeln!(f, "{:indent$}{}[] {name}", "", s.id())?;
                s.write_fields(f, depth + 1)
            }
            Field::Union(u) => {
                writeln!(f, "{:indent$}{} {name}", "", u.id())?;
                u.write_members(f, depth + 1)
            }
            Field::UnionArray(u) => {
                writeln!(f, "{:indent$}{}[] {name}", "", u.id())?;
                u.write_members(f, depth + 1)
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Structure

/// An ordered set of named fields plus a type id.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    id: String,
    fields: Vec<(String, Field)>,
}

impl Structure {
    /// A structure with no fields.
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Vec::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.index_of(name).map(|index| &self.fields[index].1)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|(n, _)| n == name)
    }

    /// Iterates `(name, field)` in declaration order.
    pub fn fields(&self) -> impl ExactSizeIterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(n, f)| (n.as_str(), f))
    }

    pub fn field_names(&self) -> impl ExactSizeIterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    fn write_fields(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        for (name, field) in &self.fields {
            field.write_tree(f, name, depth)?;
        }
        Ok(())
    }
}

/// Prints the introspection tree, one field per line.
///
/// ```
/// use pvm_data::{FieldBuilder, ScalarType};
///
/// let mut builder = FieldBuilder::new();
/// builder.add_scalar("x", ScalarType::Double);
/// builder.add_array("tags", ScalarType::String);
/// let s = builder.create_structure().unwrap();
///
/// assert_eq!(s.to_string(), "structure\n    double x\n    string[] tags\n");
/// ```
impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.id)?;
        self.write_fields(f, 1)
    }
}

// -----------------------------------------------------------------------------
// Union

/// A union introspection.
///
/// A variant union (`members == None`) may hold any single field. A
/// restricted union may only hold one of its named members.
#[derive(Debug, Clone, PartialEq)]
pub struct Union {
    id: String,
    members: Option<Vec<(String, Field)>>,
}

impl Union {
    /// The variant union.
    pub fn variant() -> Self {
        Self {
            id: String::from(VARIANT_UNION_ID),
            members: None,
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub const fn is_variant(&self) -> bool {
        self.members.is_none()
    }

    /// Iterates the members of a restricted union. Empty for the variant union.
    pub fn members(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.members
            .iter()
            .flatten()
            .map(|(n, f)| (n.as_str(), f))
    }

    pub fn member(&self, name: &str) -> Option<&Field> {
        self.members().find(|(n, _)| *n == name).map(|(_, f)| f)
    }

    fn write_members(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        for (name, field) in self.members() {
            field.write_tree(f, name, depth)?;
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// FieldBuilder

/// Accumulates named fields and produces a [`Structure`] or a restricted [`Union`].
#[derive(Debug, Default)]
pub struct FieldBuilder {
    id: Option<String>,
    fields: Vec<(String, Field)>,
}

impl FieldBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.id = Some(id.into());
        self
    }

    pub fn add(&mut self, name: impl Into<String>, field: Field) -> &mut Self {
        self.fields.push((name.into(), field));
        self
    }

    pub fn add_scalar(&mut self, name: impl Into<String>, ty: ScalarType) -> &mut Self {
        self.add(name, Field::Scalar(ty))
    }

    pub fn add_array(&mut self, name: impl Into<String>, ty: ScalarType) -> &mut Self {
        self.add(name, Field::ScalarArray(ty))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn check_unique(&self) -> Result<(), StoreError> {
        for (index, (name, _)) in self.fields.iter().enumerate() {
            if self.fields[..index].iter().any(|(n, _)| n == name) {
                return Err(StoreError::DuplicateField(name.clone()));
            }
        }
        Ok(())
    }

    /// Builds the structure. Fails on duplicate field names.
    pub fn create_structure(self) -> Result<Arc<Structure>, StoreError> {
        self.check_unique()?;
        Ok(Arc::new(Structure {
            id: self
                .id
                .unwrap_or_else(|| String::from(DEFAULT_STRUCTURE_ID)),
            fields: self.fields,
        }))
    }

    /// Builds a restricted union whose members are the added fields.
    pub fn create_union(self) -> Result<Arc<Union>, StoreError> {
        self.check_unique()?;
        Ok(Arc::new(Union {
            id: self.id.unwrap_or_else(|| String::from("union")),
            members: Some(self.fields),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::{Field, FieldBuilder, Union};
    use crate::{ScalarType, StoreError};

    #[test]
    fn builder_keeps_order_and_id() {
        let mut builder = FieldBuilder::new();
        builder.add_scalar("b", ScalarType::Int);
        builder.add_scalar("a", ScalarType::String);
        builder.set_id("point_t");
        let s = builder.create_structure().unwrap();

        assert_eq!(s.id(), "point_t");
        assert_eq!(s.field_names().collect::<Vec<_>>(), ["b", "a"]);
        assert_eq!(s.field("a"), Some(&Field::Scalar(ScalarType::String)));
        assert_eq!(s.index_of("c"), None);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut builder = FieldBuilder::new();
        builder.add_scalar("x", ScalarType::Int);
        builder.add_array("x", ScalarType::Int);
        assert_eq!(
            builder.create_structure(),
            Err(StoreError::DuplicateField("x".into()))
        );
    }

    #[test]
    fn union_kinds() {
        assert!(Union::variant().is_variant());
        assert_eq!(Union::variant().members().count(), 0);

        let mut builder = FieldBuilder::new();
        builder.add_scalar("number", ScalarType::Double);
        builder.add_scalar("text", ScalarType::String);
        let restricted = builder.create_union().unwrap();
        assert!(!restricted.is_variant());
        assert_eq!(restricted.member("text"), Some(&Field::Scalar(ScalarType::String)));
    }
}
