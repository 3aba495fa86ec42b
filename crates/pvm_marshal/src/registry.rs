use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{TypeId, type_name};
use core::fmt;

use pvm_data::{PvStructure, Structure};
use pvm_reflect::Reflect;
use pvm_reflect::info::StructInfo;
use pvm_utils::TypeIdMap;

use crate::MarshallerContext;
use crate::error::Result;

// -----------------------------------------------------------------------------
// StructureSerializer

/// A replacement for the field-by-field handling of a composite type.
///
/// Registered through [`MarshallerContext::register_serializer`] for a
/// concrete type, an ancestor or an interface. Both methods receive the
/// context so they can delegate nested values back to the engine.
pub trait StructureSerializer: Send + Sync + 'static {
    /// Builds the schema of `value`.
    fn build_structure(&self, ctx: &MarshallerContext, value: &dyn Reflect) -> Result<Arc<Structure>>;

    /// Writes `value` into `target`, which was created from the schema
    /// returned by [`build_structure`](Self::build_structure).
    fn populate_structure(
        &self,
        ctx: &MarshallerContext,
        value: &dyn Reflect,
        target: &mut PvStructure,
    ) -> Result<()>;
}

// -----------------------------------------------------------------------------
// Rule

/// The precedence rules of [`OverrideRegistry::lookup`], in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// A registration for the type itself.
    Exact,
    /// A registration for exactly one interface the type declares.
    Interface,
}

impl Rule {
    pub const ORDER: [Rule; 2] = [Rule::Exact, Rule::Interface];

    fn keys(self, info: &'static StructInfo) -> Vec<TypeId> {
        match self {
            Rule::Exact => alloc::vec![info.type_id()],
            Rule::Interface => info.interfaces().iter().map(|i| i.id()).collect(),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Rule::Exact => "exact type",
            Rule::Interface => "interface",
        })
    }
}

// -----------------------------------------------------------------------------
// Lookup

/// A successful [`OverrideRegistry::lookup`].
pub struct Found<'a, T> {
    pub value: &'a T,
    /// Type name the registration was made under.
    pub registered_as: &'static str,
    pub rule: Rule,
    /// `0` for the looked-up type, `1` for its parent, and so on.
    pub level: usize,
}

/// The outcome of [`OverrideRegistry::lookup`].
pub enum Lookup<'a, T> {
    Unregistered,
    Found(Found<'a, T>),
    /// Several interfaces at the same level have registrations.
    Ambiguous(Vec<&'static str>),
}

// -----------------------------------------------------------------------------
// OverrideRegistry

struct Registration<T> {
    name: &'static str,
    value: T,
}

/// Per-type overrides, resolved through a type's ancestors and interfaces.
///
/// Starting at the concrete type and walking up through `parent` fields, each
/// level is checked with the rules of [`Rule::ORDER`]: an exact registration
/// wins immediately; otherwise the interfaces declared at that level are
/// checked and a single match wins, while several matches are ambiguous.
///
/// # Examples
///
/// ```
/// use pvm_marshal::{Lookup, OverrideRegistry, Rule};
/// use pvm_reflect::derive::Reflect;
/// use pvm_reflect::info::Typed;
///
/// trait Named {}
///
/// #[derive(Reflect)]
/// #[reflect(implements(Named))]
/// struct Pump {
///     name: String,
/// }
///
/// impl Named for Pump {}
///
/// let mut registry = OverrideRegistry::new();
/// registry.insert::<dyn Named>("named");
///
/// let info = Pump::type_info().as_struct().unwrap();
/// match registry.lookup(info) {
///     Lookup::Found(found) => {
///         assert_eq!(*found.value, "named");
///         assert_eq!(found.rule, Rule::Interface);
///     }
///     _ => unreachable!(),
/// }
/// ```
pub struct OverrideRegistry<T> {
    entries: TypeIdMap<Registration<T>>,
}

impl<T> Default for OverrideRegistry<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> OverrideRegistry<T> {
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: TypeIdMap::new(),
        }
    }

    /// Registers `value` for `K`, a type or a `dyn Trait`. Returns the
    /// previous registration.
    pub fn insert<K: ?Sized + 'static>(&mut self, value: T) -> Option<T> {
        self.entries
            .insert_type::<K>(Registration {
                name: type_name::<K>(),
                value,
            })
            .map(|previous| previous.value)
    }

    /// Registers `value` under a raw type id.
    pub fn insert_by_id(&mut self, type_id: TypeId, name: &'static str, value: T) -> Option<T> {
        self.entries
            .insert(type_id, Registration { name, value })
            .map(|previous| previous.value)
    }

    pub fn get<K: ?Sized + 'static>(&self) -> Option<&T> {
        self.entries.get_type::<K>().map(|r| &r.value)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds the registration that applies to `info`.
    pub fn lookup(&self, info: &'static StructInfo) -> Lookup<'_, T> {
        for (level, link) in info.ancestors().enumerate() {
            for rule in Rule::ORDER {
                let mut matches = rule
                    .keys(link)
                    .into_iter()
                    .filter_map(|key| self.entries.get(&key));

                let Some(first) = matches.next() else {
                    continue;
                };
                let rest: Vec<_> = matches.collect();
                if !rest.is_empty() {
                    let mut candidates = alloc::vec![first.name];
                    candidates.extend(rest.iter().map(|r| r.name));
                    return Lookup::Ambiguous(candidates);
                }
                return Lookup::Found(Found {
                    value: &first.value,
                    registered_as: first.name,
                    rule,
                    level,
                });
            }
        }
        Lookup::Unregistered
    }
}

impl<T> fmt::Debug for OverrideRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.entries.values().map(|r| r.name))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use pvm_reflect::info::Typed;

    use super::*;
    use crate::fixtures::{Beacon, Labelled, Located, Point, Tagged};

    fn info<T: Typed>() -> &'static StructInfo {
        T::type_info().as_struct().unwrap()
    }

    fn found(lookup: Lookup<'_, &'static str>) -> (&'static str, Rule, usize) {
        match lookup {
            Lookup::Found(found) => (*found.value, found.rule, found.level),
            Lookup::Unregistered => panic!("unregistered"),
            Lookup::Ambiguous(candidates) => panic!("ambiguous: {candidates:?}"),
        }
    }

    #[test]
    fn exact_beats_interface() {
        let mut registry = OverrideRegistry::new();
        registry.insert::<dyn Labelled>("labelled");
        registry.insert::<Beacon>("beacon");
        assert_eq!(found(registry.lookup(info::<Beacon>())), ("beacon", Rule::Exact, 0));
    }

    #[test]
    fn two_interfaces_are_ambiguous() {
        let mut registry = OverrideRegistry::new();
        registry.insert::<dyn Labelled>("labelled");
        assert_eq!(
            found(registry.lookup(info::<Beacon>())),
            ("labelled", Rule::Interface, 0)
        );

        registry.insert::<dyn Located>("located");
        let Lookup::Ambiguous(mut candidates) = registry.lookup(info::<Beacon>()) else {
            panic!("expected an ambiguous lookup");
        };
        candidates.sort_unstable();
        assert_eq!(candidates, [type_name::<dyn Labelled>(), type_name::<dyn Located>()]);
    }

    #[test]
    fn ancestors_are_searched_after_the_type() {
        let mut registry = OverrideRegistry::new();
        registry.insert::<Point>("point");
        assert!(matches!(registry.lookup(info::<Tagged>()), Lookup::Unregistered));

        registry.insert::<crate::fixtures::Base>("base");
        assert_eq!(found(registry.lookup(info::<Tagged>())), ("base", Rule::Exact, 1));
    }
}
