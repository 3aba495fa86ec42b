use crate::Reflect;
use crate::info::ReflectKind;
use crate::ops::{Array, Enum, List, Map, ScalarRef, Struct, Variant};

/// An immutable view of a reflected value, split by kind.
///
/// `Box<dyn Reflect>` never shows up here: it forwards to the boxed value.
pub enum ReflectRef<'a> {
    Scalar(ScalarRef<'a>),
    Struct(&'a dyn Struct),
    List(&'a dyn List),
    Array(&'a dyn Array),
    Map(&'a dyn Map),
    /// `None` is the null value.
    Optional(Option<&'a dyn Reflect>),
    Variant(&'a Variant),
    Enum(&'a dyn Enum),
}

impl ReflectRef<'_> {
    pub const fn kind(&self) -> ReflectKind {
        match self {
            ReflectRef::Scalar(_) => ReflectKind::Scalar,
            ReflectRef::Struct(_) => ReflectKind::Struct,
            ReflectRef::List(_) => ReflectKind::List,
            ReflectRef::Array(_) => ReflectKind::Array,
            ReflectRef::Map(_) => ReflectKind::Map,
            ReflectRef::Optional(_) => ReflectKind::Optional,
            ReflectRef::Variant(_) => ReflectKind::Variant,
            ReflectRef::Enum(_) => ReflectKind::Enum,
        }
    }
}

/// A mutable view of a reflected value.
///
/// Kinds that can only be replaced as a whole (scalars, arrays, options,
/// enums) are exposed as [`ReflectMut::Value`]; use [`Reflect::set`] on them.
pub enum ReflectMut<'a> {
    Struct(&'a mut dyn Struct),
    List(&'a mut dyn List),
    Map(&'a mut dyn Map),
    Variant(&'a mut Variant),
    Value(&'a mut dyn Reflect),
}
