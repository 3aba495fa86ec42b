use core::fmt;

use crate::info::ScalarKind;

/// A borrowed scalar value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarRef<'a> {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Isize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Usize(usize),
    F32(f32),
    F64(f64),
    Char(char),
    String(&'a str),
}

impl ScalarRef<'_> {
    pub const fn kind(&self) -> ScalarKind {
        match self {
            ScalarRef::Bool(_) => ScalarKind::Bool,
            ScalarRef::I8(_) => ScalarKind::I8,
            ScalarRef::I16(_) => ScalarKind::I16,
            ScalarRef::I32(_) => ScalarKind::I32,
            ScalarRef::I64(_) => ScalarKind::I64,
            ScalarRef::Isize(_) => ScalarKind::Isize,
            ScalarRef::U8(_) => ScalarKind::U8,
            ScalarRef::U16(_) => ScalarKind::U16,
            ScalarRef::U32(_) => ScalarKind::U32,
            ScalarRef::U64(_) => ScalarKind::U64,
            ScalarRef::Usize(_) => ScalarKind::Usize,
            ScalarRef::F32(_) => ScalarKind::F32,
            ScalarRef::F64(_) => ScalarKind::F64,
            ScalarRef::Char(_) => ScalarKind::Char,
            ScalarRef::String(_) => ScalarKind::String,
        }
    }
}

impl fmt::Display for ScalarRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarRef::Bool(v) => fmt::Display::fmt(v, f),
            ScalarRef::I8(v) => fmt::Display::fmt(v, f),
            ScalarRef::I16(v) => fmt::Display::fmt(v, f),
            ScalarRef::I32(v) => fmt::Display::fmt(v, f),
            ScalarRef::I64(v) => fmt::Display::fmt(v, f),
            ScalarRef::Isize(v) => fmt::Display::fmt(v, f),
            ScalarRef::U8(v) => fmt::Display::fmt(v, f),
            ScalarRef::U16(v) => fmt::Display::fmt(v, f),
            ScalarRef::U32(v) => fmt::Display::fmt(v, f),
            ScalarRef::U64(v) => fmt::Display::fmt(v, f),
            ScalarRef::Usize(v) => fmt::Display::fmt(v, f),
            ScalarRef::F32(v) => fmt::Display::fmt(v, f),
            ScalarRef::F64(v) => fmt::Display::fmt(v, f),
            ScalarRef::Char(v) => fmt::Debug::fmt(v, f),
            ScalarRef::String(v) => fmt::Debug::fmt(v, f),
        }
    }
}
