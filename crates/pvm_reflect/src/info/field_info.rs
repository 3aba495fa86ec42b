use core::fmt;

use crate::info::{Type, TypeInfo, Typed};

bitflags::bitflags! {
    /// Marshalling hints attached to a struct field.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FieldFlags: u8 {
        /// Reflected, but never marshalled.
        const TRANSIENT = 1;
        /// The field embeds the ancestor type. Its fields are walked after
        /// the owner's own fields.
        const PARENT = 1 << 1;
    }
}

/// A named field of a struct.
#[derive(Clone, Copy)]
pub struct NamedField {
    name: &'static str,
    ty: Type,
    type_info: fn() -> &'static TypeInfo,
    flags: FieldFlags,
}

impl NamedField {
    pub fn new<T: Typed>(name: &'static str) -> Self {
        Self {
            name,
            ty: Type::of::<T>(),
            type_info: T::type_info,
            flags: FieldFlags::empty(),
        }
    }

    #[inline]
    pub const fn with_flags(mut self, flags: FieldFlags) -> Self {
        self.flags = flags;
        self
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.type_info)()
    }

    #[inline]
    pub const fn flags(&self) -> FieldFlags {
        self.flags
    }

    #[inline]
    pub const fn is_transient(&self) -> bool {
        self.flags.contains(FieldFlags::TRANSIENT)
    }

    #[inline]
    pub const fn is_parent(&self) -> bool {
        self.flags.contains(FieldFlags::PARENT)
    }
}

impl fmt::Debug for NamedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedField")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("flags", &self.flags)
            .finish()
    }
}
