//! Static storage for [`TypeInfo`].
//!
//! A non-generic type keeps its info in a [`NonGenericTypeInfoCell`], a thin
//! `OnceLock`. A `static` inside a generic impl is shared by every
//! instantiation, so generic types use [`GenericTypeInfoCell`], which maps
//! `TypeId` to a leaked `&'static TypeInfo`.

use alloc::boxed::Box;
use core::any::TypeId;
use std::sync::{OnceLock, PoisonError, RwLock};

use pvm_utils::TypeIdMap;

use crate::info::TypeInfo;

/// Type info storage for a non-generic type.
///
/// ```
/// use pvm_reflect::impls::NonGenericTypeInfoCell;
/// use pvm_reflect::info::{ScalarInfo, ScalarKind, TypeInfo};
///
/// struct Celsius;
///
/// fn celsius_info() -> &'static TypeInfo {
///     static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///     CELL.get_or_init(|| TypeInfo::Scalar(ScalarInfo::new::<Celsius>(ScalarKind::F64)))
/// }
///
/// assert!(core::ptr::eq(celsius_info(), celsius_info()));
/// ```
pub struct NonGenericTypeInfoCell(OnceLock<TypeInfo>);

impl NonGenericTypeInfoCell {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    #[inline]
    pub fn get_or_init(&self, f: impl FnOnce() -> TypeInfo) -> &TypeInfo {
        self.0.get_or_init(f)
    }
}

/// Type info storage shared by all instantiations of a generic impl.
pub struct GenericTypeInfoCell(RwLock<TypeIdMap<&'static TypeInfo>>);

impl GenericTypeInfoCell {
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::new()))
    }

    /// Returns the info stored for `G`, creating it with `f` on first use.
    ///
    /// `f` runs under the write lock and must not query this cell again.
    pub fn get_or_insert<G: ?Sized + 'static>(&self, f: impl FnOnce() -> TypeInfo) -> &'static TypeInfo {
        let type_id = TypeId::of::<G>();
        let found = self
            .0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied();
        if let Some(info) = found {
            return info;
        }
        let mut map = self.0.write().unwrap_or_else(PoisonError::into_inner);
        *map.get_or_insert(type_id, || Box::leak(Box::new(f())))
    }
}
