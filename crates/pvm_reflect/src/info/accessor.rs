use alloc::boxed::Box;
use core::fmt;

use crate::Reflect;
use crate::info::{TypeInfo, Typed};

/// Reads a field from its owner. `None` if `owner` is not the declaring type.
pub type GetterFn = for<'a> fn(&'a dyn Reflect) -> Option<&'a dyn Reflect>;

/// Writes a field of its owner, handing the value back on failure.
pub type SetterFn = fn(&mut dyn Reflect, Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;

/// What an [`Accessor`] does.
#[derive(Clone, Copy)]
pub enum AccessorKind {
    Getter(GetterFn),
    Setter {
        param: fn() -> &'static TypeInfo,
        apply: SetterFn,
    },
}

/// A named accessor function declared by a struct.
///
/// The derive macro generates `get_<field>` (or `is_<field>` for `bool`
/// fields) and `set_<field>` for every reflected field.
#[derive(Clone, Copy)]
pub struct Accessor {
    name: &'static str,
    kind: AccessorKind,
}

impl Accessor {
    pub const fn getter(name: &'static str, get: GetterFn) -> Self {
        Self {
            name,
            kind: AccessorKind::Getter(get),
        }
    }

    /// A setter taking a `T`.
    pub fn setter<T: Typed>(name: &'static str, apply: SetterFn) -> Self {
        Self {
            name,
            kind: AccessorKind::Setter {
                param: T::type_info,
                apply,
            },
        }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn kind(&self) -> &AccessorKind {
        &self.kind
    }

    #[inline]
    pub const fn is_getter(&self) -> bool {
        matches!(self.kind, AccessorKind::Getter(_))
    }

    #[inline]
    pub const fn is_setter(&self) -> bool {
        matches!(self.kind, AccessorKind::Setter { .. })
    }

    /// Type info of the setter parameter.
    pub fn param_info(&self) -> Option<&'static TypeInfo> {
        match self.kind {
            AccessorKind::Setter { param, .. } => Some(param()),
            AccessorKind::Getter(_) => None,
        }
    }

    /// Invokes a getter.
    pub fn get<'a>(&self, owner: &'a dyn Reflect) -> Option<&'a dyn Reflect> {
        match self.kind {
            AccessorKind::Getter(get) => get(owner),
            AccessorKind::Setter { .. } => None,
        }
    }

    /// Invokes a setter.
    pub fn set(&self, owner: &mut dyn Reflect, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        match self.kind {
            AccessorKind::Setter { apply, .. } => apply(owner, value),
            AccessorKind::Getter(_) => Err(value),
        }
    }

    /// Returns `true` if the name equals `prefix` followed by `field`,
    /// ignoring ASCII case and underscores.
    ///
    /// ```
    /// use pvm_reflect::info::Accessor;
    ///
    /// let getter = Accessor::getter("get_max_value", |owner| Some(owner));
    /// assert!(getter.matches("get", "maxValue"));
    /// assert!(getter.matches("get", "max_value"));
    /// assert!(!getter.matches("is", "max_value"));
    /// ```
    pub fn matches(&self, prefix: &str, field: &str) -> bool {
        let significant = |c: &u8| *c != b'_';
        let mut expected = prefix.bytes().chain(field.bytes()).filter(significant);
        let mut actual = self.name.bytes().filter(significant);
        loop {
            match (expected.next(), actual.next()) {
                (None, None) => return true,
                (Some(a), Some(b)) if a.eq_ignore_ascii_case(&b) => {}
                _ => return false,
            }
        }
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            AccessorKind::Getter(_) => "getter",
            AccessorKind::Setter { .. } => "setter",
        };
        f.debug_struct("Accessor")
            .field("name", &self.name)
            .field("kind", &kind)
            .finish()
    }
}
