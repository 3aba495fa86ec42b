use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use core::hash::{BuildHasher, Hash};

use crate::Reflect;
use crate::impls::GenericTypeInfoCell;
use crate::info::{MapInfo, TypeInfo, Typed};
use crate::ops::{Map, ReflectMut, ReflectRef};

macro_rules! impl_reflect_map {
    (
        $ty:ty,
        [$($generics:tt)*],
        where $($bounds:tt)*
    ) => {
        impl<$($generics)*> Typed for $ty where $($bounds)* {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| TypeInfo::Map(MapInfo::new::<Self, K, V>()))
            }
        }

        impl<$($generics)*> Reflect for $ty where $($bounds)* {
            impl_reflect_cast!();

            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                ReflectRef::Map(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> ReflectMut<'_> {
                ReflectMut::Map(self)
            }
        }

        impl<$($generics)*> Map for $ty where $($bounds)* {
            #[inline]
            fn len(&self) -> usize {
                <$ty>::len(self)
            }

            fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_> {
                Box::new(
                    <$ty>::iter(self).map(|(key, value)| (key as &dyn Reflect, value as &dyn Reflect)),
                )
            }

            fn insert_boxed(
                &mut self,
                key: Box<dyn Reflect>,
                value: Box<dyn Reflect>,
            ) -> Result<(), Box<dyn Reflect>> {
                let key = key.take::<K>()?;
                let value = value.take::<V>()?;
                <$ty>::insert(self, key, value);
                Ok(())
            }
        }
    };
}

impl_reflect_map!(
    BTreeMap<K, V>,
    [K, V],
    where K: Reflect + Typed + Ord, V: Reflect + Typed
);

impl_reflect_map!(
    std::collections::HashMap<K, V, S>,
    [K, V, S],
    where
        K: Reflect + Typed + Eq + Hash,
        V: Reflect + Typed,
        S: BuildHasher + Default + Send + Sync + 'static
);

impl_reflect_map!(
    pvm_utils::hash::hashbrown::HashMap<K, V, S>,
    [K, V, S],
    where
        K: Reflect + Typed + Eq + Hash,
        V: Reflect + Typed,
        S: BuildHasher + Default + Send + Sync + 'static
);

#[cfg(test)]
mod tests {
    use crate::Reflect;
    use crate::info::Typed;
    use crate::ops::ReflectMut;
    use alloc::collections::BTreeMap;
    use pvm_utils::hash::HashMap;

    #[test]
    fn map_info_records_key_and_value() {
        let info = <HashMap<String, f64> as Typed>::type_info().as_map().unwrap();
        assert!(info.key_ty().is::<String>());
        assert!(info.value_ty().is::<f64>());
        assert!(info.new_instance().is::<HashMap<String, f64>>());
    }

    #[test]
    fn insert_boxed_rejects_wrong_types() {
        let mut map = BTreeMap::<String, i32>::new();
        let ReflectMut::Map(reflected) = map.reflect_mut() else {
            panic!("expected a map");
        };
        reflected
            .insert_boxed(Box::new("a".to_string()), Box::new(1_i32))
            .unwrap();
        assert!(reflected.insert_boxed(Box::new(2_i32), Box::new(1_i32)).is_err());
        assert!(reflected.insert_boxed(Box::new("b".to_string()), Box::new(1_u8)).is_err());
        assert_eq!(reflected.len(), 1);
        assert_eq!(map.get("a"), Some(&1));
    }
}
