use alloc::boxed::Box;

use crate::Reflect;

/// An ordered, growable collection.
///
/// Sets implement this too; for them `push` inserts and iteration follows
/// the set's own order.
pub trait List: Reflect {
    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, index: usize) -> Option<&dyn Reflect>;

    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_>;

    /// Appends an item, handing it back if it has the wrong type.
    fn push(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;
}
