use alloc::string::String;
use core::fmt;

// -----------------------------------------------------------------------------
// ScalarType

/// The primitive types a scalar field or scalar array can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    UByte,
    UShort,
    UInt,
    ULong,
    Float,
    Double,
    String,
}

impl ScalarType {
    /// The type name used in introspection dumps, e.g. `"int"`.
    pub const fn name(self) -> &'static str {
        match self {
            ScalarType::Boolean => "boolean",
            ScalarType::Byte => "byte",
            ScalarType::Short => "short",
            ScalarType::Int => "int",
            ScalarType::Long => "long",
            ScalarType::UByte => "ubyte",
            ScalarType::UShort => "ushort",
            ScalarType::UInt => "uint",
            ScalarType::ULong => "ulong",
            ScalarType::Float => "float",
            ScalarType::Double => "double",
            ScalarType::String => "string",
        }
    }

    /// Returns `true` for every integer and floating point type.
    pub const fn is_numeric(self) -> bool {
        !matches!(self, ScalarType::Boolean | ScalarType::String)
    }

    /// The value a freshly created field of this type holds.
    pub fn default_value(self) -> Scalar {
        match self {
            ScalarType::Boolean => Scalar::Boolean(false),
            ScalarType::Byte => Scalar::Byte(0),
            ScalarType::Short => Scalar::Short(0),
            ScalarType::Int => Scalar::Int(0),
            ScalarType::Long => Scalar::Long(0),
            ScalarType::UByte => Scalar::UByte(0),
            ScalarType::UShort => Scalar::UShort(0),
            ScalarType::UInt => Scalar::UInt(0),
            ScalarType::ULong => Scalar::ULong(0),
            ScalarType::Float => Scalar::Float(0.0),
            ScalarType::Double => Scalar::Double(0.0),
            ScalarType::String => Scalar::String(String::new()),
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// -----------------------------------------------------------------------------
// Scalar

/// A single primitive value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Boolean(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    UByte(u8),
    UShort(u16),
    UInt(u32),
    ULong(u64),
    Float(f32),
    Double(f64),
    String(String),
}

impl Scalar {
    pub const fn scalar_type(&self) -> ScalarType {
        match self {
            Scalar::Boolean(_) => ScalarType::Boolean,
            Scalar::Byte(_) => ScalarType::Byte,
            Scalar::Short(_) => ScalarType::Short,
            Scalar::Int(_) => ScalarType::Int,
            Scalar::Long(_) => ScalarType::Long,
            Scalar::UByte(_) => ScalarType::UByte,
            Scalar::UShort(_) => ScalarType::UShort,
            Scalar::UInt(_) => ScalarType::UInt,
            Scalar::ULong(_) => ScalarType::ULong,
            Scalar::Float(_) => ScalarType::Float,
            Scalar::Double(_) => ScalarType::Double,
            Scalar::String(_) => ScalarType::String,
        }
    }

    /// Widens any integer value. `None` for the other types.
    pub const fn as_integer(&self) -> Option<i128> {
        Some(match *self {
            Scalar::Byte(v) => v as i128,
            Scalar::Short(v) => v as i128,
            Scalar::Int(v) => v as i128,
            Scalar::Long(v) => v as i128,
            Scalar::UByte(v) => v as i128,
            Scalar::UShort(v) => v as i128,
            Scalar::UInt(v) => v as i128,
            Scalar::ULong(v) => v as i128,
            _ => return None,
        })
    }

    /// Widens any numeric value to `f64`. `None` for boolean and string.
    pub fn as_double(&self) -> Option<f64> {
        match *self {
            Scalar::Float(v) => Some(f64::from(v)),
            Scalar::Double(v) => Some(v),
            _ => self.as_integer().map(|v| v as f64),
        }
    }

    pub const fn as_bool(&self) -> Option<bool> {
        match *self {
            Scalar::Boolean(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Boolean(v) => fmt::Display::fmt(v, f),
            Scalar::Byte(v) => fmt::Display::fmt(v, f),
            Scalar::Short(v) => fmt::Display::fmt(v, f),
            Scalar::Int(v) => fmt::Display::fmt(v, f),
            Scalar::Long(v) => fmt::Display::fmt(v, f),
            Scalar::UByte(v) => fmt::Display::fmt(v, f),
            Scalar::UShort(v) => fmt::Display::fmt(v, f),
            Scalar::UInt(v) => fmt::Display::fmt(v, f),
            Scalar::ULong(v) => fmt::Display::fmt(v, f),
            Scalar::Float(v) => fmt::Display::fmt(v, f),
            Scalar::Double(v) => fmt::Display::fmt(v, f),
            Scalar::String(v) => fmt::Debug::fmt(v, f),
        }
    }
}

macro_rules! impl_scalar_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl From<$ty> for Scalar {
            #[inline]
            fn from(value: $ty) -> Self {
                Scalar::$variant(value)
            }
        }
    )*};
}

impl_scalar_from! {
    bool => Boolean,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    u8 => UByte,
    u16 => UShort,
    u32 => UInt,
    u64 => ULong,
    f32 => Float,
    f64 => Double,
    String => String,
}

impl From<&str> for Scalar {
    #[inline]
    fn from(value: &str) -> Self {
        Scalar::String(String::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::{Scalar, ScalarType};

    #[test]
    fn default_value_has_matching_type() {
        for ty in [ScalarType::Boolean, ScalarType::UShort, ScalarType::Double, ScalarType::String] {
            assert_eq!(ty.default_value().scalar_type(), ty);
        }
    }

    #[test]
    fn numeric_widening() {
        assert_eq!(Scalar::UByte(200).as_integer(), Some(200));
        assert_eq!(Scalar::Long(-4).as_double(), Some(-4.0));
        assert_eq!(Scalar::Float(0.5).as_integer(), None);
        assert_eq!(Scalar::from("x").as_double(), None);
        assert!(!ScalarType::Boolean.is_numeric());
    }
}
