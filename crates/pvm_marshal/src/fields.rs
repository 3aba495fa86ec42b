//! The marshalled field set of a composite value and its accessors.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use pvm_reflect::Reflect;
use pvm_reflect::info::{Accessor, StructInfo};
use pvm_reflect::ops::{ReflectMut, ReflectRef};

use crate::classify::resolve;
use crate::error::{AccessorRole, MarshalErrorKind};

const GETTER_PREFIXES: [&str; 2] = ["get", "is"];
const SETTER_PREFIX: &str = "set";

/// A marshalled field and its current value, `None` when null.
pub(crate) struct FieldValue<'a> {
    pub name: &'static str,
    pub value: Option<&'a dyn Reflect>,
}

/// `(declaring info, declaring value)` from the concrete type upwards.
type Chain<'a> = Vec<(&'static StructInfo, &'a dyn Reflect)>;

fn chain<'a>(info: &'static StructInfo, value: &'a dyn Reflect) -> Result<Chain<'a>, MarshalErrorKind> {
    let mut links = Vec::new();
    let mut current = value;
    for link in info.ancestors() {
        links.push((link, current));
        if let Some(parent) = link.parent_field() {
            current = match current.reflect_ref() {
                ReflectRef::Struct(owner) => owner.field(parent.name()),
                _ => None,
            }
            .ok_or_else(|| MarshalErrorKind::AccessorNotFound {
                type_path: link.type_path(),
                field: String::from(parent.name()),
                role: AccessorRole::Getter,
            })?;
        }
    }
    Ok(links)
}

fn find_getter<'a>(chain: &Chain<'a>, field: &str) -> Option<(&'static Accessor, &'a dyn Reflect)> {
    chain.iter().find_map(|&(info, owner)| {
        GETTER_PREFIXES
            .iter()
            .find_map(|prefix| {
                info.accessors()
                    .iter()
                    .find(|a| a.is_getter() && a.matches(prefix, field))
            })
            .map(|accessor| (accessor, owner))
    })
}

/// Reads every marshalled field of `value`: its own fields first, then each
/// ancestor's. Transient and parent fields are not marshalled.
///
/// Values are read through the accessor found for each field, searched from
/// the concrete type upwards and applied to the level that declares it.
pub(crate) fn marshalled_fields<'a>(
    info: &'static StructInfo,
    value: &'a dyn Reflect,
) -> Result<Vec<FieldValue<'a>>, MarshalErrorKind> {
    let chain = chain(info, value)?;
    let mut fields = Vec::new();
    for &(link, _) in &chain {
        for field in link.fields() {
            if field.is_transient() || field.is_parent() {
                continue;
            }
            let (getter, owner) =
                find_getter(&chain, field.name()).ok_or_else(|| MarshalErrorKind::AccessorNotFound {
                    type_path: link.type_path(),
                    field: String::from(field.name()),
                    role: AccessorRole::Getter,
                })?;
            let current = getter
                .get(owner)
                .ok_or(MarshalErrorKind::AccessorRejected {
                    type_path: link.type_path(),
                    accessor: getter.name(),
                })?;
            fields.push(FieldValue {
                name: field.name(),
                value: resolve(current),
            });
        }
    }
    Ok(fields)
}

/// The setter for `field` and the ancestor level it belongs to.
pub(crate) fn find_setter(info: &'static StructInfo, field: &str) -> Option<(usize, &'static Accessor)> {
    info.ancestors().enumerate().find_map(|(level, link)| {
        link.accessors()
            .iter()
            .find(|a| a.is_setter() && a.matches(SETTER_PREFIX, field))
            .map(|accessor| (level, accessor))
    })
}

/// The value of ancestor `level` inside `root`.
fn link_mut<'a>(root: &'a mut dyn Reflect, info: &'static StructInfo, level: usize) -> Option<&'a mut dyn Reflect> {
    let mut current = root;
    for link in info.ancestors().take(level) {
        let parent = link.parent_field()?;
        let taken = current;
        current = match taken.reflect_mut() {
            ReflectMut::Struct(owner) => owner.field_mut(parent.name())?,
            _ => return None,
        };
    }
    Some(current)
}

/// Passes `value` to a setter returned by [`find_setter`].
pub(crate) fn apply_setter(
    root: &mut dyn Reflect,
    info: &'static StructInfo,
    level: usize,
    setter: &'static Accessor,
    value: Box<dyn Reflect>,
) -> Result<(), MarshalErrorKind> {
    let rejected = || MarshalErrorKind::AccessorRejected {
        type_path: info.ancestors().nth(level).unwrap_or(info).type_path(),
        accessor: setter.name(),
    };
    let owner = link_mut(root, info, level).ok_or_else(rejected)?;
    setter.set(owner, value).map_err(|_| rejected())
}

#[cfg(test)]
mod tests {
    use pvm_reflect::info::Typed;

    use super::*;
    use crate::fixtures::{Base, Beacon, Point, Tagged};

    #[test]
    fn own_fields_come_before_ancestor_fields() {
        let tagged = Tagged {
            base: Base {
                serial: 7,
                note: None,
            },
            tag: String::from("t"),
            cache: 1,
        };
        let info = Tagged::type_info().as_struct().unwrap();
        let fields = marshalled_fields(info, &tagged).unwrap();
        let names: Vec<_> = fields.iter().map(|f| f.name).collect();
        assert_eq!(names, ["tag", "serial", "note"]);
        assert!(fields[2].value.is_none());
        assert_eq!(fields[1].value.unwrap().downcast_ref::<u32>(), Some(&7));
    }

    #[test]
    fn setters_reach_into_ancestors() {
        let info = Tagged::type_info().as_struct().unwrap();
        let (level, setter) = find_setter(info, "serial").unwrap();
        assert_eq!(level, 1);

        let mut tagged = Tagged::default();
        apply_setter(&mut tagged, info, level, setter, Box::new(9_u32)).unwrap();
        assert_eq!(tagged.base.serial, 9);

        assert!(find_setter(info, "cache").is_some());
        assert!(find_setter(info, "missing").is_none());
    }

    #[test]
    fn bool_getters_use_is() {
        let beacon = Beacon {
            label: String::from("b"),
            position: Some(Point { x: 1.0, y: 2.0 }),
            enabled: true,
        };
        let info = Beacon::type_info().as_struct().unwrap();
        let fields = marshalled_fields(info, &beacon).unwrap();
        let enabled = fields.iter().find(|f| f.name == "enabled").unwrap();
        assert_eq!(enabled.value.unwrap().downcast_ref::<bool>(), Some(&true));
    }

    #[test]
    fn wrong_value_is_rejected() {
        let info = Tagged::type_info().as_struct().unwrap();
        let (level, setter) = find_setter(info, "tag").unwrap();
        let mut tagged = Tagged::default();
        let error = apply_setter(&mut tagged, info, level, setter, Box::new(1_u8)).unwrap_err();
        assert!(matches!(error, MarshalErrorKind::AccessorRejected { accessor: "set_tag", .. }));
    }
}
