use crate::Reflect;

/// Field access on a reflected struct.
///
/// Implemented by `#[derive(Reflect)]`. Skipped fields are invisible here.
pub trait Struct: Reflect {
    fn field(&self, name: &str) -> Option<&dyn Reflect>;

    fn field_mut(&mut self, name: &str) -> Option<&mut dyn Reflect>;

    fn field_at(&self, index: usize) -> Option<&dyn Reflect>;

    fn name_at(&self, index: usize) -> Option<&str>;

    fn field_len(&self) -> usize;

    /// Iterates `(name, value)` in declaration order.
    fn iter_fields(&self) -> FieldIter<'_>;
}

/// Iterator over the fields of a [`Struct`].
pub struct FieldIter<'a> {
    target: &'a dyn Struct,
    index: usize,
}

impl<'a> FieldIter<'a> {
    #[inline]
    pub fn new(target: &'a dyn Struct) -> Self {
        Self { target, index: 0 }
    }
}

impl<'a> Iterator for FieldIter<'a> {
    type Item = (&'a str, &'a dyn Reflect);

    fn next(&mut self) -> Option<Self::Item> {
        let name = self.target.name_at(self.index)?;
        let value = self.target.field_at(self.index)?;
        self.index += 1;
        Some((name, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.target.field_len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FieldIter<'_> {}
