use alloc::boxed::Box;

use crate::Reflect;

/// A sequence whose shape is fixed once created.
pub trait Array: Reflect {
    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, index: usize) -> Option<&dyn Reflect>;

    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_>;
}
