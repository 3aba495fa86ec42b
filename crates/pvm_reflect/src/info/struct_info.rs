use alloc::boxed::Box;
use core::any::{TypeId, type_name};
use core::fmt;

use crate::Reflect;
use crate::info::{Accessor, NamedField, Type, Typed};

// -----------------------------------------------------------------------------
// Interface

/// A trait a struct declares to implement, identified by `TypeId::of::<dyn Trait>()`.
///
/// Interfaces take part in override lookup: a registration made for
/// `dyn Trait` applies to every struct declaring that interface.
#[derive(Clone, Copy)]
pub struct Interface {
    id: TypeId,
    name: &'static str,
}

impl Interface {
    /// Describes the trait object type `I`, e.g. `Interface::of::<dyn Named>()`.
    #[inline]
    pub fn of<I: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<I>(),
            name: type_name::<I>(),
        }
    }

    #[inline]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// -----------------------------------------------------------------------------
// StructInfo

/// Type info of a struct with named fields.
///
/// Besides its fields, a struct carries the accessor table the marshaller
/// reads and writes through, the interfaces it declares, and optionally a
/// constructor producing a default instance.
///
/// # Examples
///
/// ```
/// use pvm_reflect::derive::Reflect;
/// use pvm_reflect::info::Typed;
///
/// #[derive(Reflect, Default)]
/// #[reflect(default)]
/// struct Sample {
///     count: u32,
///     ready: bool,
/// }
///
/// let info = Sample::type_info().as_struct().unwrap();
/// assert_eq!(info.field_names().collect::<Vec<_>>(), ["count", "ready"]);
/// assert!(info.accessor("is_ready").is_some());
/// assert!(info.accessor("set_count").is_some());
/// assert!(info.construct().is_some());
/// ```
pub struct StructInfo {
    ty: Type,
    fields: Box<[NamedField]>,
    accessors: Box<[Accessor]>,
    interfaces: Box<[Interface]>,
    constructor: Option<fn() -> Box<dyn Reflect>>,
}

impl StructInfo {
    pub fn new<T: Typed>(fields: &[NamedField]) -> Self {
        Self {
            ty: Type::of::<T>(),
            fields: fields.into(),
            accessors: Box::new([]),
            interfaces: Box::new([]),
            constructor: None,
        }
    }

    pub fn with_accessors(self, accessors: &[Accessor]) -> Self {
        Self {
            accessors: accessors.into(),
            ..self
        }
    }

    pub fn with_interfaces(self, interfaces: &[Interface]) -> Self {
        Self {
            interfaces: interfaces.into(),
            ..self
        }
    }

    pub fn with_constructor(self, constructor: fn() -> Box<dyn Reflect>) -> Self {
        Self {
            constructor: Some(constructor),
            ..self
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.ty.path()
    }

    #[inline]
    pub const fn type_id(&self) -> TypeId {
        self.ty.id()
    }

    /// All reflected fields in declaration order, parent field included.
    #[inline]
    pub fn fields(&self) -> &[NamedField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&NamedField> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub fn field_names(&self) -> impl ExactSizeIterator<Item = &'static str> + '_ {
        self.fields.iter().map(NamedField::name)
    }

    /// The field embedding the ancestor type, if any.
    pub fn parent_field(&self) -> Option<&NamedField> {
        self.fields.iter().find(|f| f.is_parent())
    }

    /// The ancestor's struct info.
    pub fn parent_info(&self) -> Option<&'static StructInfo> {
        self.parent_field()?.type_info().as_struct().ok()
    }

    /// This struct followed by its ancestors, nearest first.
    pub fn ancestors(&'static self) -> impl Iterator<Item = &'static StructInfo> {
        core::iter::successors(Some(self), |info| info.parent_info())
    }

    #[inline]
    pub fn accessors(&self) -> &[Accessor] {
        &self.accessors
    }

    /// Finds an accessor by exact name.
    pub fn accessor(&self, name: &str) -> Option<&Accessor> {
        self.accessors.iter().find(|a| a.name() == name)
    }

    #[inline]
    pub fn interfaces(&self) -> &[Interface] {
        &self.interfaces
    }

    pub fn implements<I: ?Sized + 'static>(&self) -> bool {
        let id = TypeId::of::<I>();
        self.interfaces.iter().any(|i| i.id() == id)
    }

    #[inline]
    pub const fn has_constructor(&self) -> bool {
        self.constructor.is_some()
    }

    /// Creates a default instance, if a constructor was declared.
    pub fn construct(&self) -> Option<Box<dyn Reflect>> {
        self.constructor.map(|new| new())
    }
}

impl fmt::Debug for StructInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructInfo")
            .field("ty", &self.ty)
            .field("fields", &self.fields)
            .field("accessors", &self.accessors)
            .field("interfaces", &self.interfaces)
            .field("constructor", &self.constructor.is_some())
            .finish()
    }
}
