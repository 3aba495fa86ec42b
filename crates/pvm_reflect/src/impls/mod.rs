//! `Reflect` implementations for standard types, plus the helpers shared by
//! those impls and by generated code.
//!
//! | Kind | Types |
//! |---|---|
//! | Scalar | `bool`, integers, `f32`, `f64`, `char`, `String` |
//! | List | `Vec`, `VecDeque`, `LinkedList`, `BTreeSet`, `HashSet` |
//! | Array | `[T; N]`, `Box<[T]>` |
//! | Map | `BTreeMap`, `std` and `hashbrown` `HashMap` |
//! | Optional | `Option<T>` |
//! | Variant | [`Variant`](crate::ops::Variant) |
//! | Dynamic | `Box<dyn Reflect>` |

/// Expands to the `Reflect` methods whose body is the same for every sized type.
macro_rules! impl_reflect_cast {
    () => {
        #[inline]
        fn reflect_type_info(&self) -> &'static $crate::info::TypeInfo {
            <Self as $crate::info::Typed>::type_info()
        }

        #[inline]
        fn as_any(&self) -> &dyn ::core::any::Any {
            self
        }

        #[inline]
        fn as_any_mut(&mut self) -> &mut dyn ::core::any::Any {
            self
        }

        #[inline]
        fn into_any(self: ::alloc::boxed::Box<Self>) -> ::alloc::boxed::Box<dyn ::core::any::Any> {
            self
        }

        #[inline]
        fn as_reflect(&self) -> &dyn $crate::Reflect {
            self
        }

        #[inline]
        fn as_reflect_mut(&mut self) -> &mut dyn $crate::Reflect {
            self
        }

        #[inline]
        fn into_reflect(self: ::alloc::boxed::Box<Self>) -> ::alloc::boxed::Box<dyn $crate::Reflect> {
            self
        }

        fn set(
            &mut self,
            value: ::alloc::boxed::Box<dyn $crate::Reflect>,
        ) -> ::core::result::Result<(), ::alloc::boxed::Box<dyn $crate::Reflect>> {
            *self = value.take::<Self>()?;
            Ok(())
        }
    };
}

// -----------------------------------------------------------------------------
// Modules

mod arrays;
mod cell;
mod dynamic;
mod lists;
mod maps;
mod option;
mod scalars;
mod utils;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericTypeInfoCell, NonGenericTypeInfoCell};
pub use utils::{boxed_default, boxed_none, reflect_debug, reflect_partial_eq, wrap_some};
