use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use core::fmt;

use log::{debug, trace};
use pvm_data::{PvField, PvStructure, Structure};
use pvm_reflect::Reflect;
use pvm_reflect::info::{ReflectKind, StructInfo, TypeInfo, Typed};
use pvm_utils::hash::HashMap;

use crate::assemble::{Source, decode};
use crate::classify::resolve;
use crate::error::{AccessorRole, MarshalErrorKind, Result, ResultExt};
use crate::fields::{apply_setter, find_setter};
use crate::registry::{Lookup, OverrideRegistry, StructureSerializer};
use crate::{populate, schema};

// -----------------------------------------------------------------------------
// MarshallerContext

/// The configuration and entry points of the marshaller.
///
/// A context holds the custom serializers and type-ids consulted while
/// marshalling. Registration takes `&mut self` and marshalling `&self`, so a
/// context is configured once and may then be shared between threads.
///
/// # Examples
///
/// ```
/// use pvm_marshal::MarshallerContext;
/// use pvm_reflect::derive::Reflect;
///
/// #[derive(Reflect, Default, Debug, PartialEq)]
/// #[reflect(default)]
/// struct Magnet {
///     name: String,
///     current: f64,
/// }
///
/// let mut ctx = MarshallerContext::new();
/// ctx.register_type_id::<Magnet>("demo:Magnet/1.0");
///
/// let magnet = Magnet { name: "Q1".into(), current: 12.5 };
/// let value = ctx.serialize(&magnet).unwrap();
/// assert_eq!(value.structure().id(), "demo:Magnet/1.0");
///
/// let back: Magnet = ctx.deserialize(&value).unwrap();
/// assert_eq!(back, magnet);
/// ```
#[derive(Default)]
pub struct MarshallerContext {
    serializers: OverrideRegistry<Box<dyn StructureSerializer>>,
    type_ids: OverrideRegistry<String>,
    types_by_id: HashMap<String, &'static TypeInfo>,
}

impl MarshallerContext {
    /// Creates a context without any override.
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Configuration

    /// Uses `serializer` for `T`, a composite type or a `dyn Trait` declared
    /// through `#[reflect(implements(...))]`.
    pub fn register_serializer<T: ?Sized + 'static>(&mut self, serializer: impl StructureSerializer) -> &mut Self {
        self.serializers.insert::<T>(Box::new(serializer));
        self
    }

    /// Tags the schemas of `T` with `id`.
    ///
    /// Structures carrying `id` decode back to `T` where no other target type
    /// is known, such as the values of `Box<dyn Reflect>` fields.
    pub fn register_type_id<T: Typed>(&mut self, id: impl Into<String>) -> &mut Self {
        let id = id.into();
        self.types_by_id.insert(id.clone(), T::type_info());
        self.type_ids.insert::<T>(id);
        self
    }

    /// Tags the schemas of every type declaring the interface `I` with `id`.
    pub fn register_interface_type_id<I: ?Sized + 'static>(&mut self, id: impl Into<String>) -> &mut Self {
        self.type_ids.insert::<I>(id.into());
        self
    }

    /// Registers every `#[reflect(type_id = "...")]` linked into the binary.
    /// Returns the number of registrations.
    #[cfg(feature = "auto_register")]
    pub fn auto_register(&mut self) -> usize {
        let mut count = 0;
        for registration in pvm_reflect::auto_register::registrations() {
            let info = (registration.type_info)();
            let id = String::from(registration.type_id);
            self.types_by_id.insert(id.clone(), info);
            self.type_ids.insert_by_id(info.type_id(), info.type_path(), id);
            count += 1;
        }
        debug!("auto-registered {count} type-ids");
        count
    }

    /// The native type registered under a type-id.
    pub fn type_info_for_id(&self, id: &str) -> Option<&'static TypeInfo> {
        self.types_by_id.get(id).copied()
    }

    pub(crate) fn serializer_for(&self, info: &'static StructInfo) -> Result<Option<&dyn StructureSerializer>, MarshalErrorKind> {
        resolve_override(&self.serializers, "serializer", info).map(|found| found.map(|s| &**s))
    }

    pub(crate) fn type_id_for(&self, info: &'static StructInfo) -> Result<Option<&str>, MarshalErrorKind> {
        resolve_override(&self.type_ids, "type-id", info).map(|found| found.map(String::as_str))
    }

    // -------------------------------------------------------------------------
    // Native to structured

    /// Builds the schema of `value`, creates a structured value from it and
    /// populates it.
    pub fn serialize(&self, value: &dyn Reflect) -> Result<PvStructure> {
        let value = resolve(value).ok_or(MarshalErrorKind::NotStructured {
            kind: ReflectKind::Optional,
        })?;
        let structure = schema::build_structure(self, value)?;
        trace!("created `{}` with {} fields", structure.id(), structure.len());
        let mut target = PvStructure::new(structure);
        populate::populate_structure(self, value, &mut target)?;
        Ok(target)
    }

    /// Builds the schema of a composite or map value.
    ///
    /// Null composite fields and null map entries are left out, so two
    /// instances of one type may have different schemas.
    pub fn build_structure(&self, value: &dyn Reflect) -> Result<Arc<Structure>> {
        schema::build_structure(self, value)
    }

    /// Writes `value` into a structured value whose schema was built from an
    /// equivalent instance.
    ///
    /// On error `target` may be partially written and should be discarded.
    pub fn populate(&self, value: &dyn Reflect, target: &mut PvStructure) -> Result<()> {
        populate::populate_structure(self, value, target)
    }

    // -------------------------------------------------------------------------
    // Structured to native

    /// Decodes a structured value into a new `T`.
    pub fn deserialize<T: Reflect + Typed>(&self, value: &PvStructure) -> Result<T> {
        let decoded = decode(self, Source::Structure(value), T::type_info())?;
        let actual = decoded.reflect_type_path();
        decoded.take::<T>().map_err(|_| {
            MarshalErrorKind::TypeMismatch {
                expected: T::type_info().type_path(),
                actual,
            }
            .into()
        })
    }

    /// Decodes any structured field as a value of `target`.
    pub fn deserialize_as(&self, value: &PvField, target: &'static TypeInfo) -> Result<Box<dyn Reflect>> {
        decode(self, Source::from(value), target)
    }

    /// Decodes `value` as the parameter of the setter of `field` in `info`.
    pub fn deserialize_for(&self, info: &'static StructInfo, field: &str, value: &PvField) -> Result<Box<dyn Reflect>> {
        let param = find_setter(info, field)
            .and_then(|(_, setter)| setter.param_info())
            .ok_or_else(|| setter_not_found(info, field))
            .in_field(field)?;
        decode(self, Source::from(value), param).in_field(field)
    }

    /// Decodes `value` and passes it to the setter of `field` on `target`.
    pub fn deserialize_into(&self, target: &mut dyn Reflect, field: &str, value: &PvField) -> Result<()> {
        let info = target
            .reflect_type_info()
            .as_struct()
            .map_err(|_| MarshalErrorKind::NotStructured {
                kind: target.reflect_kind(),
            })?;
        let (level, setter) = find_setter(info, field)
            .ok_or_else(|| setter_not_found(info, field))
            .in_field(field)?;
        let param = setter
            .param_info()
            .ok_or_else(|| setter_not_found(info, field))
            .in_field(field)?;
        let decoded = decode(self, Source::from(value), param).in_field(field)?;
        apply_setter(target, info, level, setter, decoded).in_field(field)
    }
}

impl fmt::Debug for MarshallerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarshallerContext")
            .field("serializers", &self.serializers)
            .field("type_ids", &self.type_ids)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Helpers

fn resolve_override<'a, T>(
    registry: &'a OverrideRegistry<T>,
    what: &str,
    info: &'static StructInfo,
) -> Result<Option<&'a T>, MarshalErrorKind> {
    match registry.lookup(info) {
        Lookup::Unregistered => Ok(None),
        Lookup::Found(found) => {
            debug!(
                "{what} for `{}` registered as `{}` ({} rule, ancestor level {})",
                info.type_path(),
                found.registered_as,
                found.rule,
                found.level,
            );
            Ok(Some(found.value))
        }
        Lookup::Ambiguous(candidates) => Err(MarshalErrorKind::AmbiguousOverride {
            type_path: info.type_path(),
            candidates,
        }),
    }
}

fn setter_not_found(info: &'static StructInfo, field: &str) -> MarshalErrorKind {
    MarshalErrorKind::AccessorNotFound {
        type_path: info.type_path(),
        field: String::from(field),
        role: AccessorRole::Setter,
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;
    use std::collections::{BTreeMap, HashMap};

    use pvm_data::{FieldBuilder, Scalar, ScalarType};
    use pvm_reflect::derive::Reflect;
    use pvm_reflect::ops::Variant;
    use serde_json::json;

    use super::*;
    use crate::fixtures::{Base, Beacon, Labelled, Located, Mode, Point, Slot, Tagged};

    fn beacon() -> Beacon {
        Beacon {
            label: String::from("north"),
            position: Some(Point { x: 0.5, y: -1.0 }),
            enabled: true,
        }
    }

    /// Writes only the label of a [`Beacon`].
    struct LabelOnly;

    impl StructureSerializer for LabelOnly {
        fn build_structure(&self, _: &MarshallerContext, _: &dyn Reflect) -> Result<Arc<Structure>> {
            let mut builder = FieldBuilder::new();
            builder.set_id("demo:Label/1.0");
            builder.add_scalar("label", ScalarType::String);
            Ok(builder.create_structure()?)
        }

        fn populate_structure(&self, _: &MarshallerContext, value: &dyn Reflect, target: &mut PvStructure) -> Result<()> {
            let beacon = value.downcast_ref::<Beacon>().ok_or(MarshalErrorKind::TypeMismatch {
                expected: "Beacon",
                actual: value.reflect_type_path(),
            })?;
            Ok(target.put_scalar("label", Scalar::from(beacon.label.as_str()))?)
        }
    }

    #[derive(Reflect, Default, Debug, PartialEq)]
    #[reflect(default)]
    struct Grid {
        rows: Vec<Vec<i32>>,
        corners: [u8; 4],
    }

    #[derive(Reflect, Default)]
    #[reflect(default)]
    struct Route {
        points: Vec<Option<Point>>,
    }

    #[derive(Reflect, Default)]
    #[reflect(default)]
    struct Bag {
        items: Vec<Variant>,
    }

    #[derive(Reflect)]
    struct Switch {
        name: String,
        mode: Mode,
    }

    #[derive(Reflect, Default)]
    struct Sealed {
        #[reflect(getter = false)]
        secret: u32,
    }

    #[test]
    fn composites_round_trip() {
        let ctx = MarshallerContext::new();
        let beacon = beacon();
        let value = ctx.serialize(&beacon).unwrap();
        assert_eq!(ctx.deserialize::<Beacon>(&value).unwrap(), beacon);

        let dark = Beacon {
            position: None,
            ..beacon
        };
        let value = ctx.serialize(&dark).unwrap();
        assert!(value.sub_field("position").is_none());
        assert_eq!(ctx.deserialize::<Beacon>(&value).unwrap(), dark);
    }

    #[test]
    fn ancestors_round_trip_without_transients() {
        let ctx = MarshallerContext::new();
        let tagged = Tagged {
            base: Base {
                serial: 4,
                note: Some(String::from("spare")),
            },
            tag: String::from("t"),
            cache: 99,
        };
        let back = ctx.deserialize::<Tagged>(&ctx.serialize(&tagged).unwrap()).unwrap();
        assert_eq!(back.tag, "t");
        assert_eq!(back.base.serial, 4);
        assert_eq!(back.base.note.as_deref(), Some("spare"));
        assert_eq!(back.cache, 0);
    }

    #[test]
    fn nested_sequences_round_trip() {
        let ctx = MarshallerContext::new();
        let grid = Grid {
            rows: vec![vec![1, 2, 3], vec![], vec![4]],
            corners: [1, 2, 3, 4],
        };
        let value = ctx.serialize(&grid).unwrap();
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            json!({
                "rows": [{ "value": [1, 2, 3] }, { "value": [] }, { "value": [4] }],
                "corners": [1, 2, 3, 4],
            })
        );
        assert_eq!(ctx.deserialize::<Grid>(&value).unwrap(), grid);
    }

    #[test]
    fn heterogeneous_maps_round_trip() {
        let ctx = MarshallerContext::new();
        let mut map: HashMap<String, Box<dyn Reflect>> = HashMap::new();
        map.insert(String::from("a"), Box::new(1_i32));
        map.insert(String::from("b"), Box::new(String::from("text")));

        let value = ctx.serialize(&map).unwrap();
        assert_eq!(value.len(), 2);
        assert_eq!(value.scalar("a").unwrap().scalar_type(), ScalarType::Int);
        assert_eq!(value.scalar("b").unwrap().scalar_type(), ScalarType::String);

        let back: HashMap<String, Box<dyn Reflect>> = ctx.deserialize(&value).unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back["a"].downcast_ref::<i32>(), Some(&1));
        assert_eq!(back["b"].downcast_ref::<String>().map(String::as_str), Some("text"));
    }

    #[test]
    fn untagged_structures_decode_to_maps() {
        let ctx = MarshallerContext::new();
        let mut map: HashMap<String, Box<dyn Reflect>> = HashMap::new();
        map.insert(String::from("inner"), Box::new(BTreeMap::from([(String::from("x"), 1_i32)])));
        map.insert(String::from("n"), Box::new(2_i64));

        let value = ctx.serialize(&map).unwrap();
        let back: HashMap<String, Box<dyn Reflect>> = ctx.deserialize(&value).unwrap();
        assert_eq!(back["n"].downcast_ref::<i64>(), Some(&2));
        let inner = back["inner"].downcast_ref::<BTreeMap<String, Box<dyn Reflect>>>().unwrap();
        assert_eq!(inner.len(), 1);
        assert_eq!(inner["x"].downcast_ref::<i32>(), Some(&1));
    }

    #[test]
    fn variants_carry_untagged_structures() {
        let mut ctx = MarshallerContext::new();
        let slot = Slot {
            content: Variant::new(BTreeMap::from([(String::from("x"), 1_i32)])),
        };
        let value = ctx.serialize(&slot).unwrap();
        let back: Slot = ctx.deserialize(&value).unwrap();
        let content = back.content.downcast_ref::<BTreeMap<String, Box<dyn Reflect>>>().unwrap();
        assert_eq!(content["x"].downcast_ref::<i32>(), Some(&1));

        let slot = Slot {
            content: Variant::new(Point { x: 1.0, y: 2.0 }),
        };
        let value = ctx.serialize(&slot).unwrap();
        let back: Slot = ctx.deserialize(&value).unwrap();
        let content = back.content.downcast_ref::<BTreeMap<String, Box<dyn Reflect>>>().unwrap();
        assert_eq!(content["x"].downcast_ref::<f64>(), Some(&1.0));
        assert_eq!(content["y"].downcast_ref::<f64>(), Some(&2.0));

        ctx.register_type_id::<Point>("demo:Point/1.0");
        let value = ctx.serialize(&slot).unwrap();
        let back: Slot = ctx.deserialize(&value).unwrap();
        assert_eq!(back.content.downcast_ref::<Point>(), Some(&Point { x: 1.0, y: 2.0 }));
    }

    #[test]
    fn union_arrays_decode_to_typed_sequences() {
        let ctx = MarshallerContext::new();
        let points = vec![Point { x: 1.0, y: 2.0 }, Point { x: -3.0, y: 0.5 }];
        let bag = Bag {
            items: points.iter().cloned().map(Variant::new).collect(),
        };
        let value = ctx.serialize(&bag).unwrap();
        let items = value.sub_field("items").unwrap();
        assert_eq!(items.kind(), pvm_data::FieldKind::UnionArray);

        let decoded = ctx.deserialize_as(items, <Vec<Point>>::type_info()).unwrap();
        assert_eq!(decoded.downcast_ref::<Vec<Point>>(), Some(&points));

        let counts = Bag {
            items: vec![Variant::new(4_i32), Variant::new(5_i32)],
        };
        let value = ctx.serialize(&counts).unwrap();
        let decoded = ctx
            .deserialize_as(value.sub_field("items").unwrap(), <[i32; 2]>::type_info())
            .unwrap();
        assert_eq!(decoded.downcast_ref::<[i32; 2]>(), Some(&[4, 5]));
    }

    #[test]
    fn structures_render_as_json() {
        let value = MarshallerContext::new().serialize(&beacon()).unwrap();
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            json!({
                "label": "north",
                "position": { "x": 0.5, "y": -1.0 },
                "enabled": true,
            })
        );
    }

    #[test]
    fn serializers_replace_the_default_walk() {
        let mut ctx = MarshallerContext::new();
        ctx.register_serializer::<Beacon>(LabelOnly);
        let value = ctx.serialize(&beacon()).unwrap();
        assert_eq!(value.structure().id(), "demo:Label/1.0");
        assert_eq!(value.structure().field_names().collect::<Vec<_>>(), ["label"]);
        assert_eq!(value.scalar("label").unwrap(), &Scalar::from("north"));
    }

    #[test]
    fn serializers_for_two_interfaces_are_ambiguous() {
        let mut ctx = MarshallerContext::new();
        ctx.register_serializer::<dyn Labelled>(LabelOnly);
        assert!(ctx.serialize(&beacon()).is_ok());

        ctx.register_serializer::<dyn Located>(LabelOnly);
        let error = ctx.serialize(&beacon()).unwrap_err();
        let MarshalErrorKind::AmbiguousOverride { candidates, .. } = error.kind() else {
            panic!("expected an ambiguous override, got {error}");
        };
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn type_ids_tag_schemas_and_resolve_back() {
        let mut ctx = MarshallerContext::new();
        ctx.register_type_id::<Point>("demo:Point/1.0")
            .register_interface_type_id::<dyn Labelled>("demo:Labelled/1.0");

        let value = ctx.serialize(&beacon()).unwrap();
        assert_eq!(value.structure().id(), "demo:Labelled/1.0");
        let position = value.sub_field("position").unwrap();
        let PvField::Structure(structure) = position else {
            panic!("expected a structure");
        };
        assert_eq!(structure.structure().id(), "demo:Point/1.0");

        let decoded = ctx
            .deserialize_as(position, <Box<dyn Reflect>>::type_info())
            .unwrap();
        assert_eq!(decoded.downcast_ref::<Point>(), Some(&Point { x: 0.5, y: -1.0 }));
        assert!(ctx.type_info_for_id("demo:Labelled/1.0").is_none());
    }

    #[cfg(feature = "auto_register")]
    #[test]
    fn declared_type_ids_are_collected() {
        use crate::fixtures::Reading;

        let mut ctx = MarshallerContext::new();
        assert!(ctx.auto_register() >= 1);
        assert!(ctx.type_info_for_id("demo:Reading/1.0").unwrap().is::<Reading>());

        let reading = Reading {
            channel: String::from("T1"),
            value: 21.5,
        };
        let value = ctx.serialize(&reading).unwrap();
        assert_eq!(value.structure().id(), "demo:Reading/1.0");
    }

    #[test]
    fn decoding_through_setters() {
        let ctx = MarshallerContext::new();
        let info = Beacon::type_info().as_struct().unwrap();
        let position = ctx.serialize(&Point { x: 3.0, y: 4.0 }).unwrap();
        let position = PvField::Structure(position);

        let decoded = ctx.deserialize_for(info, "position", &position).unwrap();
        assert_eq!(
            decoded.downcast_ref::<Option<Point>>(),
            Some(&Some(Point { x: 3.0, y: 4.0 }))
        );

        let mut beacon = Beacon::default();
        ctx.deserialize_into(&mut beacon, "position", &position).unwrap();
        ctx.deserialize_into(&mut beacon, "label", &PvField::Scalar(Scalar::from("east")))
            .unwrap();
        assert_eq!(beacon.label, "east");
        assert_eq!(beacon.position, Some(Point { x: 3.0, y: 4.0 }));

        let error = ctx
            .deserialize_into(&mut beacon, "range", &PvField::Scalar(Scalar::Int(1)))
            .unwrap_err();
        assert_eq!(error.path().to_string(), "range");
        assert!(matches!(
            error.kind(),
            MarshalErrorKind::AccessorNotFound {
                role: AccessorRole::Setter,
                ..
            }
        ));
    }

    #[test]
    fn unsupported_shapes_are_reported_with_their_path() {
        let ctx = MarshallerContext::new();

        let route = Route {
            points: vec![Some(Point::default()), None],
        };
        let error = ctx.serialize(&route).unwrap_err();
        assert_eq!(error.kind(), &MarshalErrorKind::NullElement);
        assert_eq!(error.path().to_string(), "points[1]");

        let switch = Switch {
            name: String::from("s"),
            mode: Mode::Idle,
        };
        let error = ctx.serialize(&switch).unwrap_err();
        assert_eq!(error.path().to_string(), "mode");
        assert!(matches!(error.kind(), MarshalErrorKind::RegularUnionNotSupported { .. }));

        let mut keyed = BTreeMap::new();
        keyed.insert(1_u32, String::from("one"));
        assert!(matches!(
            ctx.serialize(&keyed).unwrap_err().kind(),
            MarshalErrorKind::UnsupportedKeyType { .. }
        ));

        let error = ctx.serialize(&Sealed::default()).unwrap_err();
        assert!(matches!(
            error.kind(),
            MarshalErrorKind::AccessorNotFound {
                role: AccessorRole::Getter,
                ..
            }
        ));

        let error = ctx.serialize(&5_i32).unwrap_err();
        assert!(matches!(error.kind(), MarshalErrorKind::NotStructured { .. }));
    }
}
