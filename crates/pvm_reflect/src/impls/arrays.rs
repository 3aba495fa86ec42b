use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::Reflect;
use crate::impls::GenericTypeInfoCell;
use crate::info::{ArrayInfo, TypeInfo, Typed};
use crate::ops::{Array, ReflectMut, ReflectRef};

fn take_items<T: Reflect>(items: Vec<Box<dyn Reflect>>) -> Option<Vec<T>> {
    items.into_iter().map(|item| item.take::<T>().ok()).collect()
}

fn array_from_items<T: Reflect + Typed, const N: usize>(
    items: Vec<Box<dyn Reflect>>,
) -> Option<Box<dyn Reflect>> {
    let array: [T; N] = take_items::<T>(items)?.try_into().ok()?;
    Some(Box::new(array))
}

fn slice_from_items<T: Reflect + Typed>(items: Vec<Box<dyn Reflect>>) -> Option<Box<dyn Reflect>> {
    Some(Box::new(take_items::<T>(items)?.into_boxed_slice()))
}

// -----------------------------------------------------------------------------
// [T; N]

impl<T: Reflect + Typed, const N: usize> Typed for [T; N] {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::Array(ArrayInfo::new::<Self, T>(Some(N), array_from_items::<T, N>))
        })
    }
}

impl<T: Reflect + Typed, const N: usize> Reflect for [T; N] {
    impl_reflect_cast!();

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Array(self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Value(self)
    }
}

impl<T: Reflect + Typed, const N: usize> Array for [T; N] {
    #[inline]
    fn len(&self) -> usize {
        N
    }

    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        self.as_slice().get(index).map(|item| item as &dyn Reflect)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_> {
        Box::new(self.as_slice().iter().map(|item| item as &dyn Reflect))
    }
}

// -----------------------------------------------------------------------------
// Box<[T]>

impl<T: Reflect + Typed> Typed for Box<[T]> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::Array(ArrayInfo::new::<Self, T>(None, slice_from_items::<T>))
        })
    }
}

impl<T: Reflect + Typed> Reflect for Box<[T]> {
    impl_reflect_cast!();

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Array(self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Value(self)
    }
}

impl<T: Reflect + Typed> Array for Box<[T]> {
    #[inline]
    fn len(&self) -> usize {
        (**self).len()
    }

    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        (**self).get(index).map(|item| item as &dyn Reflect)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_> {
        Box::new((**self).iter().map(|item| item as &dyn Reflect))
    }
}

#[cfg(test)]
mod tests {
    use crate::Reflect;
    use crate::info::Typed;

    #[test]
    fn fixed_array_needs_exact_count() {
        let info = <[i16; 2] as Typed>::type_info().as_array().unwrap();
        assert_eq!(info.capacity(), Some(2));

        let items: Vec<Box<dyn Reflect>> = vec![Box::new(1_i16), Box::new(2_i16)];
        let built = info.from_items(items).unwrap();
        assert_eq!(built.take::<[i16; 2]>().ok(), Some([1, 2]));

        let short: Vec<Box<dyn Reflect>> = vec![Box::new(1_i16)];
        assert!(info.from_items(short).is_none());
        let mixed: Vec<Box<dyn Reflect>> = vec![Box::new(1_i16), Box::new(2_u8)];
        assert!(info.from_items(mixed).is_none());
    }

    #[test]
    fn boxed_slice_takes_any_count() {
        let info = <Box<[bool]> as Typed>::type_info().as_array().unwrap();
        assert_eq!(info.capacity(), None);
        let items: Vec<Box<dyn Reflect>> = vec![Box::new(true)];
        let built = info.from_items(items).unwrap();
        assert_eq!(built.take::<Box<[bool]>>().ok().as_deref(), Some(&[true][..]));
    }
}
