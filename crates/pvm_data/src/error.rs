use alloc::string::String;

use thiserror::Error;

use crate::{FieldKind, ScalarType};

/// An error raised by the structured value store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("no field named `{0}`")]
    NoSuchField(String),
    #[error("field `{name}` is a {actual}, not a {expected}")]
    FieldKindMismatch {
        name: String,
        expected: FieldKind,
        actual: FieldKind,
    },
    #[error("expected a {expected} value, received a {actual}")]
    ScalarTypeMismatch {
        expected: ScalarType,
        actual: ScalarType,
    },
    #[error("duplicate field name `{0}`")]
    DuplicateField(String),
    #[error("element does not conform to the array element introspection `{0}`")]
    ElementMismatch(String),
    #[error("union `{0}` has no member matching the value")]
    NoMatchingMember(String),
    #[error("union `{0}` is a variant union and has no members to select")]
    NotRestricted(String),
}
