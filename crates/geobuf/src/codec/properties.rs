//! Ids and property tables shared by Feature, Geometry and FeatureCollection.
//!
//! Each of these messages carries its own `values` list. Its `properties` and
//! `custom_properties` fields are flat lists of `(key index, value index)`
//! pairs: key indices point into the document-wide `Data.keys`, value indices
//! into the message's `values`.
//!
//! A custom property never uses one of the object's GeoJSON members as its
//! key. Both directions reject such keys.

use crate::codec::proto::{IdType, Value};
use crate::codec::value::{decode_value, encode_value};
use crate::error::{DecodeError, EncodeError};
use crate::model::{Id, KeyDictionary, PropertyMap, PropertyValue};

/// The `values`, `properties` and `custom_properties` fields of one message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyFields {
    pub values: Vec<Value>,
    pub properties: Vec<u32>,
    pub custom_properties: Vec<u32>,
}

// =============================================================================
// DECODING
// =============================================================================

/// Maps the `id`/`int_id` oneof to an id.
pub fn decode_id(id_type: Option<IdType>) -> Option<Id> {
    match id_type? {
        IdType::Id(s) => Some(Id::Text(s)),
        IdType::IntId(v) => Some(Id::Integer(v)),
    }
}

impl PropertyFields {
    /// Resolves the index pairs against the key table and this message's
    /// values. Returns `(properties, custom_properties)`.
    ///
    /// `reserved` lists the GeoJSON members of the object; a custom property
    /// with one of those keys is rejected.
    pub fn resolve(
        self,
        keys: &[String],
        reserved: &[&str],
    ) -> Result<(PropertyMap, PropertyMap), DecodeError> {
        let values = self
            .values
            .into_iter()
            .enumerate()
            .map(|(i, v)| decode_value(v).map_err(|e| e.at(format_args!("values[{i}]"))))
            .collect::<Result<Vec<_>, _>>()?;

        let properties = resolve_pairs(&self.properties, &values, keys, "properties")?;
        let custom_properties =
            resolve_pairs(&self.custom_properties, &values, keys, "custom_properties")?;
        if let Some(key) = custom_properties.keys().find(|k| reserved.contains(&k.as_str())) {
            return Err(DecodeError::ReservedCustomKey { key: key.clone() });
        }
        Ok((properties, custom_properties))
    }
}

/// Turns a flat `[key, value, key, value, ...]` index list into a map. A key
/// repeated in one list keeps its last value.
pub fn resolve_pairs(
    pairs: &[u32],
    values: &[PropertyValue],
    keys: &[String],
    field: &'static str,
) -> Result<PropertyMap, DecodeError> {
    if pairs.len() % 2 != 0 {
        return Err(DecodeError::UnpairedProperties {
            field,
            len: pairs.len(),
        });
    }

    let mut map = PropertyMap::new();
    for pair in pairs.chunks_exact(2) {
        let key = lookup(keys, pair[0], "keys")?;
        let value = lookup(values, pair[1], "values")?;
        map.insert(key.clone(), value.clone());
    }
    Ok(map)
}

fn lookup<'t, T>(table: &'t [T], index: u32, dict: &'static str) -> Result<&'t T, DecodeError> {
    usize::try_from(index)
        .ok()
        .and_then(|i| table.get(i))
        .ok_or(DecodeError::IndexOutOfBounds {
            dict,
            index,
            size: table.len(),
        })
}

// =============================================================================
// ENCODING
// =============================================================================

/// Maps an id to the `id` (text) or `int_id` (sint64) oneof.
pub fn encode_id(id: Option<&Id>) -> Option<IdType> {
    match id? {
        Id::Text(s) => Some(IdType::Id(s.clone())),
        Id::Integer(v) => Some(IdType::IntId(*v)),
    }
}

/// Accumulates the values and index pairs of one message.
#[derive(Debug, Default)]
pub struct PropertyEncoder {
    fields: PropertyFields,
}

impl PropertyEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the members of a `properties` object.
    pub fn encode_properties(
        &mut self,
        properties: &PropertyMap,
        keys: &mut KeyDictionary,
    ) -> Result<(), EncodeError> {
        for (key, value) in properties {
            let pair = self
                .push(key, value, keys)
                .map_err(|e| e.at(format_args!("properties.{key}")))?;
            self.fields.properties.extend(pair);
        }
        Ok(())
    }

    /// Adds non-standard members of the object itself. Keys listed in
    /// `reserved` are rejected.
    pub fn encode_custom_properties(
        &mut self,
        custom_properties: &PropertyMap,
        reserved: &[&str],
        keys: &mut KeyDictionary,
    ) -> Result<(), EncodeError> {
        for (key, value) in custom_properties {
            if reserved.contains(&key.as_str()) {
                return Err(EncodeError::ReservedCustomKey { key: key.clone() });
            }
            let pair = self.push(key, value, keys).map_err(|e| e.at(key))?;
            self.fields.custom_properties.extend(pair);
        }
        Ok(())
    }

    fn push(
        &mut self,
        key: &str,
        value: &PropertyValue,
        keys: &mut KeyDictionary,
    ) -> Result<[u32; 2], EncodeError> {
        let message = encode_value(value)?;
        let value_index = self.fields.values.len() as u32;
        self.fields.values.push(message);
        Ok([keys.add_key(key), value_index])
    }

    /// Returns the collected fields.
    pub fn finish(self) -> PropertyFields {
        self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_properties_and_custom_properties_share_values() {
        let mut keys = KeyDictionary::new();
        keys.add_key("existing");

        let mut properties = PropertyMap::new();
        properties.insert("name".to_string(), "Oslo".into());
        properties.insert("existing".to_string(), 3i64.into());
        let mut custom = PropertyMap::new();
        custom.insert("name".to_string(), true.into());

        let mut encoder = PropertyEncoder::new();
        encoder.encode_properties(&properties, &mut keys).unwrap();
        encoder.encode_custom_properties(&custom, &[], &mut keys).unwrap();
        let fields = encoder.finish();

        assert_eq!(keys.keys(), &["existing".to_string(), "name".to_string()]);
        assert_eq!(fields.values.len(), 3);
        // BTreeMap order: "existing" then "name".
        assert_eq!(fields.properties, vec![0, 0, 1, 1]);
        assert_eq!(fields.custom_properties, vec![1, 2]);

        let (decoded, decoded_custom) = fields.resolve(keys.keys(), &[]).unwrap();
        assert_eq!(decoded, properties);
        assert_eq!(decoded_custom, custom);
    }

    #[test]
    fn test_id_mapping() {
        for id in [Id::Text("a-1".to_string()), Id::Integer(-5), Id::Integer(i64::MIN)] {
            assert_eq!(decode_id(encode_id(Some(&id))), Some(id));
        }
        assert_eq!(encode_id(None), None);
    }

    #[test]
    fn test_resolve_pairs_errors() {
        let keys = vec!["k".to_string()];
        let values = vec![PropertyValue::Boolean(true)];

        assert_eq!(
            resolve_pairs(&[0], &values, &keys, "properties"),
            Err(DecodeError::UnpairedProperties {
                field: "properties",
                len: 1
            })
        );
        assert_eq!(
            resolve_pairs(&[1, 0], &values, &keys, "properties"),
            Err(DecodeError::IndexOutOfBounds {
                dict: "keys",
                index: 1,
                size: 1
            })
        );
        assert_eq!(
            resolve_pairs(&[0, 4], &values, &keys, "custom_properties"),
            Err(DecodeError::IndexOutOfBounds {
                dict: "values",
                index: 4,
                size: 1
            })
        );
    }

    #[test]
    fn test_duplicate_key_keeps_last_value() {
        let keys = vec!["k".to_string()];
        let values = vec![PropertyValue::UnsignedInteger(1), PropertyValue::UnsignedInteger(2)];
        let map = resolve_pairs(&[0, 0, 0, 1], &values, &keys, "properties").unwrap();
        assert_eq!(map.get("k"), Some(&PropertyValue::UnsignedInteger(2)));
    }

    #[test]
    fn test_encode_error_names_the_property() {
        let mut properties = PropertyMap::new();
        properties.insert("area".to_string(), PropertyValue::Double(f64::INFINITY));

        let mut encoder = PropertyEncoder::new();
        let err = encoder
            .encode_properties(&properties, &mut KeyDictionary::new())
            .unwrap_err();
        assert_eq!(err.path(), Some("properties.area"));
    }

    #[test]
    fn test_value_error_names_the_value() {
        let fields = PropertyFields {
            values: vec![
                encode_value(&PropertyValue::Boolean(true)).unwrap(),
                Value::default(),
            ],
            ..Default::default()
        };
        let err = fields.resolve(&[], &[]).unwrap_err();
        assert_eq!(err.path(), Some("values[1]"));
        assert_eq!(err.root_cause(), &DecodeError::MissingField { field: "value" });
    }

    #[test]
    fn test_reserved_custom_key_is_rejected_on_encode() {
        let mut custom = PropertyMap::new();
        custom.insert("bbox".to_string(), "ok".into());
        custom.insert("geometry".to_string(), "shadow".into());

        let mut encoder = PropertyEncoder::new();
        let err = encoder
            .encode_custom_properties(&custom, &["type", "geometry"], &mut KeyDictionary::new())
            .unwrap_err();
        assert_eq!(
            err,
            EncodeError::ReservedCustomKey {
                key: "geometry".to_string()
            }
        );
    }

    #[test]
    fn test_reserved_custom_key_is_rejected_on_decode() {
        let keys = vec!["properties".to_string()];
        let fields = PropertyFields {
            values: vec![encode_value(&PropertyValue::Text("shadow".to_string())).unwrap()],
            properties: vec![],
            custom_properties: vec![0, 0],
        };

        // The same key is fine as a standard property.
        let as_property = PropertyFields {
            properties: vec![0, 0],
            custom_properties: vec![],
            ..fields.clone()
        };
        assert!(as_property.resolve(&keys, &["type", "properties"]).is_ok());

        assert_eq!(
            fields.resolve(&keys, &["type", "properties"]),
            Err(DecodeError::ReservedCustomKey {
                key: "properties".to_string()
            })
        );
    }
}
