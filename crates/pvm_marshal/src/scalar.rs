//! Native scalar kinds and store scalar types.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use pvm_data::{Scalar, ScalarType};
use pvm_reflect::Reflect;
use pvm_reflect::info::ScalarKind;
use pvm_reflect::ops::{ReflectRef, ScalarRef};

use crate::error::MarshalErrorKind;

/// The store type a native scalar kind is written as.
pub(crate) const fn scalar_type(kind: ScalarKind) -> ScalarType {
    match kind {
        ScalarKind::Bool => ScalarType::Boolean,
        ScalarKind::I8 => ScalarType::Byte,
        ScalarKind::I16 => ScalarType::Short,
        ScalarKind::I32 => ScalarType::Int,
        ScalarKind::I64 | ScalarKind::Isize => ScalarType::Long,
        ScalarKind::U8 => ScalarType::UByte,
        ScalarKind::U16 => ScalarType::UShort,
        ScalarKind::U32 => ScalarType::UInt,
        ScalarKind::U64 | ScalarKind::Usize => ScalarType::ULong,
        ScalarKind::F32 => ScalarType::Float,
        ScalarKind::F64 => ScalarType::Double,
        ScalarKind::Char | ScalarKind::String => ScalarType::String,
    }
}

pub(crate) fn encode(value: ScalarRef<'_>) -> Scalar {
    match value {
        ScalarRef::Bool(v) => Scalar::Boolean(v),
        ScalarRef::I8(v) => Scalar::Byte(v),
        ScalarRef::I16(v) => Scalar::Short(v),
        ScalarRef::I32(v) => Scalar::Int(v),
        ScalarRef::I64(v) => Scalar::Long(v),
        ScalarRef::Isize(v) => Scalar::Long(v as i64),
        ScalarRef::U8(v) => Scalar::UByte(v),
        ScalarRef::U16(v) => Scalar::UShort(v),
        ScalarRef::U32(v) => Scalar::UInt(v),
        ScalarRef::U64(v) => Scalar::ULong(v),
        ScalarRef::Usize(v) => Scalar::ULong(v as u64),
        ScalarRef::F32(v) => Scalar::Float(v),
        ScalarRef::F64(v) => Scalar::Double(v),
        ScalarRef::Char(v) => Scalar::String(String::from(v)),
        ScalarRef::String(v) => Scalar::String(String::from(v)),
    }
}

/// Encodes a value already classified as a scalar.
pub(crate) fn encode_value(value: &dyn Reflect) -> Result<Scalar, MarshalErrorKind> {
    match value.reflect_ref() {
        ReflectRef::Scalar(scalar) => Ok(encode(scalar)),
        _ => Err(MarshalErrorKind::NotStructured {
            kind: value.reflect_kind(),
        }),
    }
}

/// Decodes `scalar` as the native kind `kind`.
///
/// Integers convert when the value fits. Floats accept any number; an `f32`
/// target rounds to the nearest `f32` and refuses finite values beyond its
/// range. `char` needs a one-character string.
pub(crate) fn decode(scalar: &Scalar, kind: ScalarKind) -> Result<Box<dyn Reflect>, MarshalErrorKind> {
    let mismatch = || MarshalErrorKind::ScalarMismatch {
        expected: kind,
        actual: scalar.scalar_type(),
    };

    macro_rules! integer {
        ($ty:ty) => {{
            let wide = scalar.as_integer().ok_or_else(mismatch)?;
            Box::new(<$ty>::try_from(wide).map_err(|_| mismatch())?)
        }};
    }

    let value: Box<dyn Reflect> = match kind {
        ScalarKind::Bool => Box::new(scalar.as_bool().ok_or_else(mismatch)?),
        ScalarKind::I8 => integer!(i8),
        ScalarKind::I16 => integer!(i16),
        ScalarKind::I32 => integer!(i32),
        ScalarKind::I64 => integer!(i64),
        ScalarKind::Isize => integer!(isize),
        ScalarKind::U8 => integer!(u8),
        ScalarKind::U16 => integer!(u16),
        ScalarKind::U32 => integer!(u32),
        ScalarKind::U64 => integer!(u64),
        ScalarKind::Usize => integer!(usize),
        ScalarKind::F32 => {
            let wide = scalar.as_double().ok_or_else(mismatch)?;
            let narrow = wide as f32;
            if narrow.is_infinite() && wide.is_finite() {
                return Err(mismatch());
            }
            Box::new(narrow)
        }
        ScalarKind::F64 => Box::new(scalar.as_double().ok_or_else(mismatch)?),
        ScalarKind::Char => {
            let text = scalar.as_str().ok_or_else(mismatch)?;
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Box::new(c),
                _ => return Err(mismatch()),
            }
        }
        ScalarKind::String => Box::new(String::from(scalar.as_str().ok_or_else(mismatch)?)),
    };
    Ok(value)
}

/// The native value a scalar decodes to when no target type is known.
pub(crate) fn natural(scalar: &Scalar) -> Box<dyn Reflect> {
    match scalar.clone() {
        Scalar::Boolean(v) => Box::new(v),
        Scalar::Byte(v) => Box::new(v),
        Scalar::Short(v) => Box::new(v),
        Scalar::Int(v) => Box::new(v),
        Scalar::Long(v) => Box::new(v),
        Scalar::UByte(v) => Box::new(v),
        Scalar::UShort(v) => Box::new(v),
        Scalar::UInt(v) => Box::new(v),
        Scalar::ULong(v) => Box::new(v),
        Scalar::Float(v) => Box::new(v),
        Scalar::Double(v) => Box::new(v),
        Scalar::String(v) => Box::new(v),
    }
}

/// A `Vec` of the natural type of `ty`, e.g. `Vec<i32>` for `int[]`.
pub(crate) fn natural_vec(ty: ScalarType, items: &[&Scalar]) -> Result<Box<dyn Reflect>, MarshalErrorKind> {
    macro_rules! collect {
        ($variant:ident, $kind:ident) => {{
            let values = items
                .iter()
                .map(|item| match item {
                    Scalar::$variant(v) => Ok(v.clone()),
                    other => Err(MarshalErrorKind::ScalarMismatch {
                        expected: ScalarKind::$kind,
                        actual: other.scalar_type(),
                    }),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Box::new(values)
        }};
    }

    let value: Box<dyn Reflect> = match ty {
        ScalarType::Boolean => collect!(Boolean, Bool),
        ScalarType::Byte => collect!(Byte, I8),
        ScalarType::Short => collect!(Short, I16),
        ScalarType::Int => collect!(Int, I32),
        ScalarType::Long => collect!(Long, I64),
        ScalarType::UByte => collect!(UByte, U8),
        ScalarType::UShort => collect!(UShort, U16),
        ScalarType::UInt => collect!(UInt, U32),
        ScalarType::ULong => collect!(ULong, U64),
        ScalarType::Float => collect!(Float, F32),
        ScalarType::Double => collect!(Double, F64),
        ScalarType::String => collect!(String, String),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_are_range_checked() {
        let value = decode(&Scalar::Long(300), ScalarKind::I16).unwrap();
        assert_eq!(value.downcast_ref::<i16>(), Some(&300));

        let error = decode(&Scalar::Long(300), ScalarKind::U8).unwrap_err();
        assert_eq!(
            error,
            MarshalErrorKind::ScalarMismatch {
                expected: ScalarKind::U8,
                actual: ScalarType::Long,
            }
        );
    }

    #[test]
    fn floats_accept_integers() {
        let value = decode(&Scalar::Int(2), ScalarKind::F64).unwrap();
        assert_eq!(value.downcast_ref::<f64>(), Some(&2.0));
        assert!(decode(&Scalar::Double(2.5), ScalarKind::I32).is_err());
    }

    #[test]
    fn narrowing_to_f32_stays_in_range() {
        let value = decode(&Scalar::Double(0.1), ScalarKind::F32).unwrap();
        assert_eq!(value.downcast_ref::<f32>(), Some(&0.1_f32));

        let value = decode(&Scalar::Double(f64::INFINITY), ScalarKind::F32).unwrap();
        assert_eq!(value.downcast_ref::<f32>(), Some(&f32::INFINITY));

        assert_eq!(
            decode(&Scalar::Double(1e300), ScalarKind::F32).unwrap_err(),
            MarshalErrorKind::ScalarMismatch {
                expected: ScalarKind::F32,
                actual: ScalarType::Double,
            }
        );
        assert!(decode(&Scalar::Long(i64::MAX), ScalarKind::F32).is_ok());
    }

    #[test]
    fn chars_travel_as_strings() {
        assert_eq!(encode(ScalarRef::Char('λ')), Scalar::String(String::from("λ")));
        let value = decode(&Scalar::from("λ"), ScalarKind::Char).unwrap();
        assert_eq!(value.downcast_ref::<char>(), Some(&'λ'));
        assert!(decode(&Scalar::from("ab"), ScalarKind::Char).is_err());
    }

    #[test]
    fn natural_vec_matches_element_type() {
        let items = [Scalar::UInt(1), Scalar::UInt(2)];
        let refs: Vec<&Scalar> = items.iter().collect();
        let value = natural_vec(ScalarType::UInt, &refs).unwrap();
        assert_eq!(value.downcast_ref::<Vec<u32>>(), Some(&vec![1, 2]));
    }
}
