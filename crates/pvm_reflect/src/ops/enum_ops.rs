use crate::Reflect;

/// A value of a reflected enum.
pub trait Enum: Reflect {
    fn variant_name(&self) -> &str;

    fn variant_index(&self) -> usize;
}
