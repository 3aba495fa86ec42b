use alloc::string::String;
use alloc::vec::Vec;
use core::error::Error;
use core::fmt;

use pvm_data::{FieldKind, ScalarType, StoreError};
use pvm_reflect::info::{ReflectKind, ScalarKind};
use thiserror::Error;

/// `Result` with [`MarshalError`] as the default error.
pub type Result<T, E = MarshalError> = core::result::Result<T, E>;

// -----------------------------------------------------------------------------
// AccessorRole

/// Which half of a field's accessor pair was looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorRole {
    Getter,
    Setter,
}

impl fmt::Display for AccessorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AccessorRole::Getter => "getter",
            AccessorRole::Setter => "setter",
        })
    }
}

// -----------------------------------------------------------------------------
// MarshalErrorKind

/// What went wrong, independent of where.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum MarshalErrorKind {
    #[error("`{type_path}` has no {role} for field `{field}`")]
    AccessorNotFound {
        type_path: &'static str,
        field: String,
        role: AccessorRole,
    },
    #[error("accessor `{accessor}` of `{type_path}` rejected the value")]
    AccessorRejected {
        type_path: &'static str,
        accessor: &'static str,
    },
    #[error("container type `{type_path}` cannot be mapped to a list, array or map")]
    UnsupportedContainerType { type_path: &'static str },
    #[error("`{type_path}` nests containers deeper than one level")]
    UnsupportedNestedContainer { type_path: &'static str },
    #[error("map keys must be strings, found `{type_path}`")]
    UnsupportedKeyType { type_path: &'static str },
    #[error("`{type_name}` is a fixed-member union, only variant unions are supported")]
    RegularUnionNotSupported { type_name: String },
    #[error("a union cannot hold a {kind}")]
    UnionOfArrayNotSupported { kind: FieldKind },
    #[error("cannot resolve a native type for {what}")]
    UnresolvableElementType { what: String },
    #[error("override for `{type_path}` is ambiguous between {candidates:?}")]
    AmbiguousOverride {
        type_path: &'static str,
        candidates: Vec<&'static str>,
    },
    #[error(transparent)]
    StoreAccess(#[from] StoreError),
    #[error("a {kind} cannot be marshalled as a structure")]
    NotStructured { kind: ReflectKind },
    #[error("cannot decode a {actual} value as `{expected}`")]
    ScalarMismatch {
        expected: ScalarKind,
        actual: ScalarType,
    },
    #[error("expected a {expected}, found a {actual}")]
    ShapeMismatch {
        expected: FieldKind,
        actual: FieldKind,
    },
    #[error("decoded a `{actual}` where `{expected}` was required")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },
    #[error("`{type_path}` has no constructor")]
    MissingConstructor { type_path: &'static str },
    #[error("containers cannot hold null elements")]
    NullElement,
    #[error("element {index} does not share the schema of element 0")]
    ElementShapeMismatch { index: usize },
    #[error("expected {expected} elements, found {actual}")]
    ArrayLengthMismatch { expected: usize, actual: usize },
}

// -----------------------------------------------------------------------------
// FieldPath

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

/// Where in a nested value an error was detected.
///
/// Rendered as `outer.inner[2].leaf`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    #[inline]
    pub const fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segments from the outermost value inwards.
    #[inline]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    fn prepend(&mut self, segment: PathSegment) {
        self.segments.insert(0, segment);
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) if index == 0 => f.write_str(name)?,
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Index(i) => write!(f, "[{i}]")?,
            }
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// MarshalError

/// A marshalling failure and the field path where it was detected.
///
/// # Examples
///
/// ```
/// use pvm_marshal::{MarshalError, MarshalErrorKind};
///
/// let error = MarshalError::from(MarshalErrorKind::NullElement)
///     .at_index(2)
///     .in_field("samples")
///     .in_field("frame");
///
/// assert_eq!(error.path().to_string(), "frame.samples[2]");
/// assert_eq!(error.to_string(), "frame.samples[2]: containers cannot hold null elements");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MarshalError {
    kind: MarshalErrorKind,
    path: FieldPath,
}

impl MarshalError {
    #[inline]
    pub fn kind(&self) -> &MarshalErrorKind {
        &self.kind
    }

    #[inline]
    pub fn into_kind(self) -> MarshalErrorKind {
        self.kind
    }

    #[inline]
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Records that the error happened inside field `name`.
    pub fn in_field(mut self, name: &str) -> Self {
        self.path.prepend(PathSegment::Field(String::from(name)));
        self
    }

    /// Records that the error happened inside element `index`.
    pub fn at_index(mut self, index: usize) -> Self {
        self.path.prepend(PathSegment::Index(index));
        self
    }
}

impl From<MarshalErrorKind> for MarshalError {
    #[inline]
    fn from(kind: MarshalErrorKind) -> Self {
        Self {
            kind,
            path: FieldPath::new(),
        }
    }
}

impl From<StoreError> for MarshalError {
    #[inline]
    fn from(error: StoreError) -> Self {
        MarshalErrorKind::StoreAccess(error).into()
    }
}

impl fmt::Display for MarshalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            fmt::Display::fmt(&self.kind, f)
        } else {
            write!(f, "{}: {}", self.path, self.kind)
        }
    }
}

impl Error for MarshalError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.kind)
    }
}

// -----------------------------------------------------------------------------
// Path helpers

/// Path bookkeeping for results, so call sites read `.in_field(name)?`.
pub(crate) trait ResultExt<T> {
    fn in_field(self, name: &str) -> Result<T>;

    fn at_index(self, index: usize) -> Result<T>;
}

impl<T, E: Into<MarshalError>> ResultExt<T> for core::result::Result<T, E> {
    #[inline]
    fn in_field(self, name: &str) -> Result<T> {
        self.map_err(|e| e.into().in_field(name))
    }

    #[inline]
    fn at_index(self, index: usize) -> Result<T> {
        self.map_err(|e| e.into().at_index(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_keep_their_message() {
        let error = MarshalError::from(StoreError::NoSuchField(String::from("x"))).in_field("point");
        assert_eq!(error.to_string(), "point: no field named `x`");
        assert!(matches!(
            error.kind(),
            MarshalErrorKind::StoreAccess(StoreError::NoSuchField(_))
        ));
    }

    #[test]
    fn index_first_path() {
        let error = MarshalError::from(MarshalErrorKind::NullElement).at_index(0).at_index(3);
        assert_eq!(error.path().to_string(), "[3][0]");
        assert_eq!(error.path().segments().len(), 2);
    }
}
