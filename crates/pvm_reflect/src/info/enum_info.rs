use alloc::boxed::Box;

use crate::info::{Type, Typed};

/// Type info of an enum.
///
/// Enums are fixed-member unions; only their variant names are recorded.
#[derive(Debug)]
pub struct EnumInfo {
    ty: Type,
    variants: Box<[&'static str]>,
}

impl EnumInfo {
    pub fn new<T: Typed>(variants: &[&'static str]) -> Self {
        Self {
            ty: Type::of::<T>(),
            variants: variants.into(),
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn variant_names(&self) -> &[&'static str] {
        &self.variants
    }
}

/// Type info of [`Variant`](crate::ops::Variant), the unrestricted union value.
#[derive(Debug)]
pub struct VariantInfo {
    ty: Type,
}

impl VariantInfo {
    pub fn new<T: Typed>() -> Self {
        Self { ty: Type::of::<T>() }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }
}

/// Type info of `Box<dyn Reflect>`.
///
/// The concrete type is only known from a value, through
/// [`Reflect::reflect_type_info`](crate::Reflect::reflect_type_info).
#[derive(Debug)]
pub struct DynamicInfo {
    ty: Type,
}

impl DynamicInfo {
    pub fn new<T: Typed>() -> Self {
        Self { ty: Type::of::<T>() }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }
}
