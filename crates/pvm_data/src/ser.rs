//! Rendering of structured values through `serde`.
//!
//! Structures become maps, arrays become sequences, and a union becomes its
//! payload (or `none` when empty).

use serde_core::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::{PvField, PvStructure, PvUnion, Scalar};

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Boolean(v) => serializer.serialize_bool(*v),
            Scalar::Byte(v) => serializer.serialize_i8(*v),
            Scalar::Short(v) => serializer.serialize_i16(*v),
            Scalar::Int(v) => serializer.serialize_i32(*v),
            Scalar::Long(v) => serializer.serialize_i64(*v),
            Scalar::UByte(v) => serializer.serialize_u8(*v),
            Scalar::UShort(v) => serializer.serialize_u16(*v),
            Scalar::UInt(v) => serializer.serialize_u32(*v),
            Scalar::ULong(v) => serializer.serialize_u64(*v),
            Scalar::Float(v) => serializer.serialize_f32(*v),
            Scalar::Double(v) => serializer.serialize_f64(*v),
            Scalar::String(v) => serializer.serialize_str(v),
        }
    }
}

impl Serialize for PvStructure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl Serialize for PvUnion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.get() {
            Some(value) => serializer.serialize_some(value),
            None => serializer.serialize_none(),
        }
    }
}

fn serialize_items<'a, S, T>(
    serializer: S,
    len: usize,
    items: impl Iterator<Item = &'a T>,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize + 'a,
{
    let mut seq = serializer.serialize_seq(Some(len))?;
    for item in items {
        seq.serialize_element(item)?;
    }
    seq.end()
}

impl Serialize for PvField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PvField::Scalar(v) => v.serialize(serializer),
            PvField::ScalarArray(a) => serialize_items(serializer, a.len(), a.iter()),
            PvField::Structure(s) => s.serialize(serializer),
            PvField::StructureArray(a) => serialize_items(serializer, a.len(), a.iter()),
            PvField::Union(u) => u.serialize(serializer),
            PvField::UnionArray(a) => serialize_items(serializer, a.len(), a.iter()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Field, FieldBuilder, PvField, PvStructure, PvUnion, Scalar, ScalarType, Union};
    use alloc::sync::Arc;
    use serde_json::json;

    #[test]
    fn renders_as_json() {
        let mut builder = FieldBuilder::new();
        builder.add_scalar("id", ScalarType::Int);
        builder.add_array("tags", ScalarType::String);
        builder.add("extra", Field::Union(Arc::new(Union::variant())));
        builder.add("empty", Field::Union(Arc::new(Union::variant())));
        let mut value = PvStructure::new(builder.create_structure().unwrap());

        value.put_scalar("id", Scalar::Int(4)).unwrap();
        let tags = value.scalar_array_mut("tags").unwrap();
        tags.push_segment(vec![Scalar::from("a")]).unwrap();
        tags.push_segment(vec![Scalar::from("b")]).unwrap();
        value
            .union_field_mut("extra")
            .unwrap()
            .set(PvField::Scalar(Scalar::Double(1.5)))
            .unwrap();

        let rendered = serde_json::to_value(&value).unwrap();
        assert_eq!(
            rendered,
            json!({ "id": 4, "tags": ["a", "b"], "extra": 1.5, "empty": null })
        );
    }

    #[test]
    fn empty_union_renders_null() {
        let union = PvUnion::new(Arc::new(Union::variant()));
        assert_eq!(serde_json::to_value(&union).unwrap(), json!(null));
    }
}
