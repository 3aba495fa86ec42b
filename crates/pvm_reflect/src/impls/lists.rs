use alloc::boxed::Box;
use alloc::collections::{BTreeSet, LinkedList, VecDeque};
use alloc::vec::Vec;
use core::hash::Hash;
use std::collections::HashSet;

use crate::Reflect;
use crate::impls::GenericTypeInfoCell;
use crate::info::{ListInfo, TypeInfo, Typed};
use crate::ops::{List, ReflectMut, ReflectRef};

macro_rules! impl_reflect_list {
    ($ty:ident, $push:ident, $($bound:path),*) => {
        impl<T: Reflect + Typed $(+ $bound)*> Typed for $ty<T> {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| TypeInfo::List(ListInfo::new::<Self, T>()))
            }
        }

        impl<T: Reflect + Typed $(+ $bound)*> Reflect for $ty<T> {
            impl_reflect_cast!();

            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                ReflectRef::List(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> ReflectMut<'_> {
                ReflectMut::List(self)
            }
        }

        impl<T: Reflect + Typed $(+ $bound)*> List for $ty<T> {
            #[inline]
            fn len(&self) -> usize {
                <$ty<T>>::len(self)
            }

            fn get(&self, index: usize) -> Option<&dyn Reflect> {
                IntoIterator::into_iter(self)
                    .nth(index)
                    .map(|item| item as &dyn Reflect)
            }

            fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_> {
                Box::new(IntoIterator::into_iter(self).map(|item| item as &dyn Reflect))
            }

            fn push(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
                let value = value.take::<T>()?;
                <$ty<T>>::$push(self, value);
                Ok(())
            }
        }
    };
}

impl_reflect_list!(Vec, push,);
impl_reflect_list!(VecDeque, push_back,);
impl_reflect_list!(LinkedList, push_back,);
impl_reflect_list!(BTreeSet, insert, Ord);
impl_reflect_list!(HashSet, insert, Eq, Hash);

#[cfg(test)]
mod tests {
    use crate::Reflect;
    use crate::info::{ScalarKind, Typed};
    use crate::ops::ReflectMut;
    use alloc::collections::{BTreeSet, VecDeque};

    #[test]
    fn list_info_records_item_type() {
        let info = <VecDeque<i8> as Typed>::type_info().as_list().unwrap();
        assert!(info.item_ty().is::<i8>());
        assert_eq!(info.item_info().as_scalar().unwrap().kind(), ScalarKind::I8);
        assert!(info.new_instance().is::<VecDeque<i8>>());
    }

    #[test]
    fn push_and_iterate() {
        let mut set = BTreeSet::<u32>::new();
        let ReflectMut::List(list) = set.reflect_mut() else {
            panic!("expected a list");
        };
        list.push(Box::new(3_u32)).unwrap();
        list.push(Box::new(1_u32)).unwrap();
        assert!(list.push(Box::new("x".to_string())).is_err());

        let items: Vec<u32> = list.iter().map(|v| *v.downcast_ref::<u32>().unwrap()).collect();
        assert_eq!(items, [1, 3]);
        assert_eq!(list.get(1).and_then(|v| v.downcast_ref::<u32>()), Some(&3));
    }
}
