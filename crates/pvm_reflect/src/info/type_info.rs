use core::any::TypeId;
use core::error::Error;
use core::fmt;

use crate::info::{ArrayInfo, DynamicInfo, EnumInfo, ListInfo, MapInfo, OptionalInfo};
use crate::info::{ScalarInfo, StructInfo, Type, VariantInfo};

// -----------------------------------------------------------------------------
// ReflectKind

/// The shape of a reflected type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReflectKind {
    Scalar,
    Struct,
    List,
    Array,
    Map,
    Optional,
    Variant,
    Enum,
    Dynamic,
}

impl fmt::Display for ReflectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReflectKind::Scalar => "scalar",
            ReflectKind::Struct => "struct",
            ReflectKind::List => "list",
            ReflectKind::Array => "array",
            ReflectKind::Map => "map",
            ReflectKind::Optional => "optional",
            ReflectKind::Variant => "variant",
            ReflectKind::Enum => "enum",
            ReflectKind::Dynamic => "dynamic",
        })
    }
}

/// Returned by the `TypeInfo::as_*` casts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReflectKindError {
    pub expected: ReflectKind,
    pub received: ReflectKind,
}

impl fmt::Display for ReflectKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "kind mismatch: expected {}, received {}",
            self.expected, self.received
        )
    }
}

impl Error for ReflectKindError {}

// -----------------------------------------------------------------------------
// TypeInfo

/// Compile-time information about a reflected type.
///
/// # Examples
///
/// ```
/// use pvm_reflect::info::{ReflectKind, ScalarKind, Typed};
///
/// let info = <Vec<u16> as Typed>::type_info();
/// assert_eq!(info.kind(), ReflectKind::List);
///
/// let item = info.as_list().unwrap().item_info();
/// assert_eq!(item.as_scalar().unwrap().kind(), ScalarKind::U16);
/// assert!(info.as_struct().is_err());
/// ```
#[derive(Debug)]
pub enum TypeInfo {
    Scalar(ScalarInfo),
    Struct(StructInfo),
    List(ListInfo),
    Array(ArrayInfo),
    Map(MapInfo),
    Optional(OptionalInfo),
    Variant(VariantInfo),
    Enum(EnumInfo),
    Dynamic(DynamicInfo),
}

macro_rules! impl_cast_fn {
    ($name:ident : $kind:ident => $info:ident) => {
        #[doc = concat!("Casts to [`", stringify!($info), "`].")]
        pub const fn $name(&self) -> Result<&$info, ReflectKindError> {
            match self {
                Self::$kind(info) => Ok(info),
                _ => Err(ReflectKindError {
                    expected: ReflectKind::$kind,
                    received: self.kind(),
                }),
            }
        }
    };
}

impl TypeInfo {
    pub const fn ty(&self) -> &Type {
        match self {
            Self::Scalar(info) => info.ty(),
            Self::Struct(info) => info.ty(),
            Self::List(info) => info.ty(),
            Self::Array(info) => info.ty(),
            Self::Map(info) => info.ty(),
            Self::Optional(info) => info.ty(),
            Self::Variant(info) => info.ty(),
            Self::Enum(info) => info.ty(),
            Self::Dynamic(info) => info.ty(),
        }
    }

    #[inline]
    pub const fn type_id(&self) -> TypeId {
        self.ty().id()
    }

    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.ty().path()
    }

    #[inline]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.ty().is::<T>()
    }

    pub const fn kind(&self) -> ReflectKind {
        match self {
            Self::Scalar(_) => ReflectKind::Scalar,
            Self::Struct(_) => ReflectKind::Struct,
            Self::List(_) => ReflectKind::List,
            Self::Array(_) => ReflectKind::Array,
            Self::Map(_) => ReflectKind::Map,
            Self::Optional(_) => ReflectKind::Optional,
            Self::Variant(_) => ReflectKind::Variant,
            Self::Enum(_) => ReflectKind::Enum,
            Self::Dynamic(_) => ReflectKind::Dynamic,
        }
    }

    impl_cast_fn!(as_scalar: Scalar => ScalarInfo);
    impl_cast_fn!(as_struct: Struct => StructInfo);
    impl_cast_fn!(as_list: List => ListInfo);
    impl_cast_fn!(as_array: Array => ArrayInfo);
    impl_cast_fn!(as_map: Map => MapInfo);
    impl_cast_fn!(as_optional: Optional => OptionalInfo);
    impl_cast_fn!(as_enum: Enum => EnumInfo);
}
