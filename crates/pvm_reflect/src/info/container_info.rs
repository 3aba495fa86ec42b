use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::Reflect;
use crate::info::{Type, TypeInfo, Typed};

// -----------------------------------------------------------------------------
// ListInfo

/// Type info of a growable ordered collection (`Vec`, `VecDeque`, sets, ...).
#[derive(Clone, Copy)]
pub struct ListInfo {
    ty: Type,
    item_ty: Type,
    item_info: fn() -> &'static TypeInfo,
    new: fn() -> Box<dyn Reflect>,
}

impl ListInfo {
    /// `L` is the list type, `T` its declared item type.
    pub fn new<L: Reflect + Typed + Default, T: Typed>() -> Self {
        Self {
            ty: Type::of::<L>(),
            item_ty: Type::of::<T>(),
            item_info: T::type_info,
            new: crate::impls::boxed_default::<L>,
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub const fn item_ty(&self) -> &Type {
        &self.item_ty
    }

    #[inline]
    pub fn item_info(&self) -> &'static TypeInfo {
        (self.item_info)()
    }

    /// Creates an empty list.
    #[inline]
    pub fn new_instance(&self) -> Box<dyn Reflect> {
        (self.new)()
    }
}

impl fmt::Debug for ListInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListInfo")
            .field("ty", &self.ty)
            .field("item_ty", &self.item_ty)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// ArrayInfo

/// Builds an array from decoded items. `None` if an item has the wrong type
/// or the count does not fit.
pub type FromItemsFn = fn(Vec<Box<dyn Reflect>>) -> Option<Box<dyn Reflect>>;

/// Type info of a fixed-shape sequence (`[T; N]`, `Box<[T]>`).
#[derive(Clone, Copy)]
pub struct ArrayInfo {
    ty: Type,
    item_ty: Type,
    item_info: fn() -> &'static TypeInfo,
    capacity: Option<usize>,
    from_items: FromItemsFn,
}

impl ArrayInfo {
    /// `capacity` is `Some(N)` for `[T; N]` and `None` for boxed slices.
    pub fn new<A: Typed, T: Typed>(capacity: Option<usize>, from_items: FromItemsFn) -> Self {
        Self {
            ty: Type::of::<A>(),
            item_ty: Type::of::<T>(),
            item_info: T::type_info,
            capacity,
            from_items,
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub const fn item_ty(&self) -> &Type {
        &self.item_ty
    }

    #[inline]
    pub fn item_info(&self) -> &'static TypeInfo {
        (self.item_info)()
    }

    /// The fixed length, if the array type has one.
    #[inline]
    pub const fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    #[inline]
    pub fn from_items(&self, items: Vec<Box<dyn Reflect>>) -> Option<Box<dyn Reflect>> {
        (self.from_items)(items)
    }
}

impl fmt::Debug for ArrayInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayInfo")
            .field("ty", &self.ty)
            .field("item_ty", &self.item_ty)
            .field("capacity", &self.capacity)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// MapInfo

/// Type info of a key/value map.
#[derive(Clone, Copy)]
pub struct MapInfo {
    ty: Type,
    key_ty: Type,
    key_info: fn() -> &'static TypeInfo,
    value_ty: Type,
    value_info: fn() -> &'static TypeInfo,
    new: fn() -> Box<dyn Reflect>,
}

impl MapInfo {
    pub fn new<M: Reflect + Typed + Default, K: Typed, V: Typed>() -> Self {
        Self {
            ty: Type::of::<M>(),
            key_ty: Type::of::<K>(),
            key_info: K::type_info,
            value_ty: Type::of::<V>(),
            value_info: V::type_info,
            new: crate::impls::boxed_default::<M>,
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub const fn key_ty(&self) -> &Type {
        &self.key_ty
    }

    #[inline]
    pub fn key_info(&self) -> &'static TypeInfo {
        (self.key_info)()
    }

    #[inline]
    pub const fn value_ty(&self) -> &Type {
        &self.value_ty
    }

    #[inline]
    pub fn value_info(&self) -> &'static TypeInfo {
        (self.value_info)()
    }

    /// Creates an empty map.
    #[inline]
    pub fn new_instance(&self) -> Box<dyn Reflect> {
        (self.new)()
    }
}

impl fmt::Debug for MapInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapInfo")
            .field("ty", &self.ty)
            .field("key_ty", &self.key_ty)
            .field("value_ty", &self.value_ty)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// OptionalInfo

/// Type info of `Option<T>`, the nullable wrapper.
#[derive(Clone, Copy)]
pub struct OptionalInfo {
    ty: Type,
    some_ty: Type,
    some_info: fn() -> &'static TypeInfo,
    wrap: fn(Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>>,
    none: fn() -> Box<dyn Reflect>,
}

impl OptionalInfo {
    pub fn new<T: Reflect + Typed>() -> Self {
        Self {
            ty: Type::of::<Option<T>>(),
            some_ty: Type::of::<T>(),
            some_info: T::type_info,
            wrap: crate::impls::wrap_some::<T>,
            none: crate::impls::boxed_none::<T>,
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub const fn some_ty(&self) -> &Type {
        &self.some_ty
    }

    #[inline]
    pub fn some_info(&self) -> &'static TypeInfo {
        (self.some_info)()
    }

    /// Wraps a `T` into `Some(T)`. Hands the value back if it is not a `T`.
    #[inline]
    pub fn wrap_some(&self, value: Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
        (self.wrap)(value)
    }

    /// Creates `None`.
    #[inline]
    pub fn none(&self) -> Box<dyn Reflect> {
        (self.none)()
    }
}

impl fmt::Debug for OptionalInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionalInfo")
            .field("ty", &self.ty)
            .field("some_ty", &self.some_ty)
            .finish()
    }
}
