//! Link-time collection of `#[reflect(type_id = "...")]` declarations.
//!
//! Every non-generic type carrying the attribute submits a
//! [`TypeIdRegistration`] through [`inventory`]. Consumers read them back
//! with [`registrations`].

use crate::info::TypeInfo;

/// A type-id declared on a type definition.
#[derive(Clone, Copy)]
pub struct TypeIdRegistration {
    pub type_info: fn() -> &'static TypeInfo,
    pub type_id: &'static str,
}

impl core::fmt::Debug for TypeIdRegistration {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TypeIdRegistration")
            .field("type", &(self.type_info)().type_path())
            .field("type_id", &self.type_id)
            .finish()
    }
}

inventory::collect!(TypeIdRegistration);

/// All registrations linked into the binary, in unspecified order.
pub fn registrations() -> impl Iterator<Item = &'static TypeIdRegistration> {
    IntoIterator::into_iter(inventory::iter::<TypeIdRegistration>)
}
