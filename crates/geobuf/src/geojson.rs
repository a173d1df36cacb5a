//! Conversion between GeoJSON (`serde_json::Value`) and the document model.
//!
//! Members a GeoJSON object defines for its own type are mapped to model
//! fields; every other member of the object is kept as a custom property.

use serde_json::{Map, Number, Value};

use crate::codec::{decode, encode_with_options, EncodeOptions};
use crate::error::{DecodeError, EncodeError};
use crate::limits::MAX_NESTING_DEPTH;
use crate::model::{
    Feature, FeatureCollection, GeoDocument, Geometry, GeometryType, Id, Position, PropertyMap,
    PropertyValue, Shape,
};

/// Parses GeoJSON and encodes it to Geobuf bytes.
pub fn encode_json(value: &Value, options: EncodeOptions) -> Result<Vec<u8>, EncodeError> {
    encode_with_options(&GeoDocument::from_json(value)?, options)
}

/// Decodes Geobuf bytes to GeoJSON.
pub fn decode_json(input: &[u8]) -> Result<Value, DecodeError> {
    decode(input).map(|document| document.to_json())
}

// =============================================================================
// JSON -> MODEL
// =============================================================================

impl GeoDocument {
    /// Builds a document from a GeoJSON object, dispatching on its `type`.
    pub fn from_json(value: &Value) -> Result<Self, EncodeError> {
        let object = as_object(value)?;
        match type_member(object)? {
            "FeatureCollection" => Ok(FeatureCollection::from_json(value)?.into()),
            "Feature" => Ok(Feature::from_json(value)?.into()),
            _ => Ok(Geometry::from_json(value)?.into()),
        }
    }

    /// Renders the document as GeoJSON.
    pub fn to_json(&self) -> Value {
        match self {
            GeoDocument::FeatureCollection(collection) => collection.to_json(),
            GeoDocument::Feature(feature) => feature.to_json(),
            GeoDocument::Geometry(geometry) => geometry.to_json(),
        }
    }
}

impl FeatureCollection {
    pub fn from_json(value: &Value) -> Result<Self, EncodeError> {
        let object = as_object(value)?;
        expect_type(object, "FeatureCollection")?;

        let features = object
            .get("features")
            .ok_or(EncodeError::MissingMember { member: "features" })?
            .as_array()
            .ok_or(EncodeError::InvalidMember {
                member: "features",
                expected: "an array",
            })?
            .iter()
            .enumerate()
            .map(|(i, f)| Feature::from_json(f).map_err(|e| e.at(format_args!("features[{i}]"))))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FeatureCollection {
            features,
            custom_properties: custom_properties(object, FeatureCollection::MEMBERS)?,
        })
    }

    pub fn to_json(&self) -> Value {
        let mut object = custom_members(&self.custom_properties);
        object.insert("type".into(), "FeatureCollection".into());
        object.insert(
            "features".into(),
            Value::Array(self.features.iter().map(Feature::to_json).collect()),
        );
        Value::Object(object)
    }
}

impl Feature {
    pub fn from_json(value: &Value) -> Result<Self, EncodeError> {
        let object = as_object(value)?;
        expect_type(object, "Feature")?;

        let geometry = match object.get("geometry") {
            None => return Err(EncodeError::MissingMember { member: "geometry" }),
            Some(Value::Null) => {
                return Err(EncodeError::InvalidMember {
                    member: "geometry",
                    expected: "a geometry object",
                })
            }
            Some(geometry) => geometry_from_json(geometry, 0).map_err(|e| e.at("geometry"))?,
        };

        Ok(Feature {
            id: id_member(object)?,
            geometry,
            properties: properties_member(object)?,
            custom_properties: custom_properties(object, Feature::MEMBERS)?,
        })
    }

    pub fn to_json(&self) -> Value {
        let mut object = custom_members(&self.custom_properties);
        object.insert("type".into(), "Feature".into());
        if let Some(id) = &self.id {
            object.insert("id".into(), id_to_json(id));
        }
        object.insert("geometry".into(), self.geometry.to_json());
        object.insert("properties".into(), Value::Object(custom_members(&self.properties)));
        Value::Object(object)
    }
}

impl Geometry {
    pub fn from_json(value: &Value) -> Result<Self, EncodeError> {
        geometry_from_json(value, 0)
    }

    pub fn to_json(&self) -> Value {
        let mut object = custom_members(&self.custom_properties);
        object.insert("type".into(), self.geometry_type().name().into());
        match &self.shape {
            Shape::Point(p) => {
                object.insert("coordinates".into(), position_to_json(p));
            }
            Shape::MultiPoint(points) | Shape::LineString(points) => {
                object.insert("coordinates".into(), line_to_json(points));
            }
            Shape::MultiLineString(lines) | Shape::Polygon(lines) => {
                object.insert(
                    "coordinates".into(),
                    Value::Array(lines.iter().map(|l| line_to_json(l)).collect()),
                );
            }
            Shape::MultiPolygon(polygons) => {
                let polygons = polygons
                    .iter()
                    .map(|rings| Value::Array(rings.iter().map(|r| line_to_json(r)).collect()))
                    .collect();
                object.insert("coordinates".into(), Value::Array(polygons));
            }
            Shape::GeometryCollection(children) => {
                object.insert(
                    "geometries".into(),
                    Value::Array(children.iter().map(Geometry::to_json).collect()),
                );
            }
        }
        if let Some(id) = &self.id {
            object.insert("id".into(), id_to_json(id));
        }
        if !self.properties.is_empty() {
            object.insert("properties".into(), Value::Object(custom_members(&self.properties)));
        }
        Value::Object(object)
    }
}

fn geometry_from_json(value: &Value, depth: usize) -> Result<Geometry, EncodeError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(EncodeError::NestingTooDeep {
            max: MAX_NESTING_DEPTH,
        });
    }

    let object = as_object(value)?;
    let name = type_member(object)?;
    let geometry_type = GeometryType::from_name(name).ok_or_else(|| {
        EncodeError::UnknownGeometryType {
            found: name.to_string(),
        }
    })?;

    let (shape, members) = if geometry_type == GeometryType::GeometryCollection {
        let children = object
            .get("geometries")
            .ok_or(EncodeError::MissingMember {
                member: "geometries",
            })?
            .as_array()
            .ok_or(EncodeError::InvalidMember {
                member: "geometries",
                expected: "an array",
            })?
            .iter()
            .enumerate()
            .map(|(i, g)| {
                geometry_from_json(g, depth + 1).map_err(|e| e.at(format_args!("geometries[{i}]")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        (Shape::GeometryCollection(children), geometry_type.members())
    } else {
        let coordinates = object.get("coordinates").ok_or(EncodeError::MissingMember {
            member: "coordinates",
        })?;
        let shape = shape_from_json(geometry_type, coordinates).map_err(|e| e.at("coordinates"))?;
        (shape, geometry_type.members())
    };

    Ok(Geometry {
        shape,
        id: id_member(object)?,
        properties: properties_member(object)?,
        custom_properties: custom_properties(object, members)?,
    })
}

fn shape_from_json(geometry_type: GeometryType, coordinates: &Value) -> Result<Shape, EncodeError> {
    let shape = match geometry_type {
        GeometryType::Point => Shape::Point(parse_position(coordinates)?),
        GeometryType::MultiPoint => Shape::MultiPoint(parse_array(coordinates, parse_position)?),
        GeometryType::LineString => Shape::LineString(parse_array(coordinates, parse_position)?),
        GeometryType::MultiLineString => {
            Shape::MultiLineString(parse_array(coordinates, parse_line)?)
        }
        GeometryType::Polygon => Shape::Polygon(parse_array(coordinates, parse_line)?),
        GeometryType::MultiPolygon => {
            Shape::MultiPolygon(parse_array(coordinates, |rings| parse_array(rings, parse_line))?)
        }
        GeometryType::GeometryCollection => Shape::GeometryCollection(Vec::new()),
    };
    Ok(shape)
}

fn parse_array<T>(
    value: &Value,
    parse: impl Fn(&Value) -> Result<T, EncodeError>,
) -> Result<Vec<T>, EncodeError> {
    value
        .as_array()
        .ok_or(EncodeError::InvalidMember {
            member: "coordinates",
            expected: "an array",
        })?
        .iter()
        .enumerate()
        .map(|(i, item)| parse(item).map_err(|e| e.at(format_args!("[{i}]"))))
        .collect()
}

fn parse_line(value: &Value) -> Result<Vec<Position>, EncodeError> {
    parse_array(value, parse_position)
}

fn parse_position(value: &Value) -> Result<Position, EncodeError> {
    value
        .as_array()
        .and_then(|ordinates| ordinates.iter().map(Value::as_f64).collect::<Option<Position>>())
        .ok_or(EncodeError::InvalidMember {
            member: "coordinates",
            expected: "an array of numbers",
        })
}

fn as_object(value: &Value) -> Result<&Map<String, Value>, EncodeError> {
    value.as_object().ok_or(EncodeError::NotAnObject {
        found: json_type_name(value),
    })
}

fn type_member(object: &Map<String, Value>) -> Result<&str, EncodeError> {
    object
        .get("type")
        .ok_or(EncodeError::MissingMember { member: "type" })?
        .as_str()
        .ok_or(EncodeError::InvalidMember {
            member: "type",
            expected: "a string",
        })
}

fn expect_type(object: &Map<String, Value>, expected: &'static str) -> Result<(), EncodeError> {
    let found = type_member(object)?;
    if found != expected {
        return Err(EncodeError::InvalidMember {
            member: "type",
            expected,
        });
    }
    Ok(())
}

/// A `null` id counts as absent.
fn id_member(object: &Map<String, Value>) -> Result<Option<Id>, EncodeError> {
    match object.get("id") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(Id::Text(s.clone()))),
        Some(Value::Number(n)) => integral_id(n)
            .map(|v| Some(Id::Integer(v)))
            .ok_or_else(|| EncodeError::InvalidId {
                found: n.to_string(),
            }),
        Some(other) => Err(EncodeError::InvalidId {
            found: json_type_name(other).to_string(),
        }),
    }
}

/// An id number that is an integer in `i64` range, including floats such as
/// `2.0`.
fn integral_id(n: &Number) -> Option<i64> {
    // 2^63; i64::MIN is -2^63 and exactly representable.
    const BOUND: f64 = 9_223_372_036_854_775_808.0;
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|v| v.fract() == 0.0 && (-BOUND..BOUND).contains(v))
            .map(|v| v as i64)
    })
}

fn properties_member(object: &Map<String, Value>) -> Result<PropertyMap, EncodeError> {
    match object.get("properties") {
        None | Some(Value::Null) => Ok(PropertyMap::new()),
        Some(Value::Object(members)) => members
            .iter()
            .map(|(key, value)| property_value(key, value).map(|v| (key.clone(), v)))
            .collect::<Result<PropertyMap, EncodeError>>()
            .map_err(|e| e.at("properties")),
        Some(_) => Err(EncodeError::InvalidMember {
            member: "properties",
            expected: "an object or null",
        }),
    }
}

fn custom_properties(
    object: &Map<String, Value>,
    reserved: &[&str],
) -> Result<PropertyMap, EncodeError> {
    object
        .iter()
        .filter(|(key, _)| !reserved.contains(&key.as_str()))
        .map(|(key, value)| property_value(key, value).map(|v| (key.clone(), v)))
        .collect()
}

fn property_value(key: &str, value: &Value) -> Result<PropertyValue, EncodeError> {
    let property = match value {
        Value::Object(_) | Value::Array(_) => PropertyValue::Json(value.clone()),
        Value::String(s) => PropertyValue::Text(s.clone()),
        Value::Bool(b) => PropertyValue::Boolean(*b),
        Value::Number(n) => number_value(n).ok_or_else(|| EncodeError::UnsupportedPropertyType {
            key: key.to_string(),
            found: "number",
        })?,
        Value::Null => {
            return Err(EncodeError::UnsupportedPropertyType {
                key: key.to_string(),
                found: "null",
            })
        }
    };
    Ok(property)
}

fn number_value(n: &Number) -> Option<PropertyValue> {
    if let Some(v) = n.as_u64() {
        Some(PropertyValue::UnsignedInteger(v))
    } else if let Some(v) = n.as_i64() {
        Some(PropertyValue::from_i64(v))
    } else {
        n.as_f64().map(PropertyValue::from_f64)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// MODEL -> JSON
// =============================================================================

fn custom_members(properties: &PropertyMap) -> Map<String, Value> {
    properties
        .iter()
        .map(|(key, value)| (key.clone(), value_to_json(value)))
        .collect()
}

/// Renders a property value. Non-finite doubles become `null`.
pub fn value_to_json(value: &PropertyValue) -> Value {
    match value {
        PropertyValue::Text(s) => Value::String(s.clone()),
        PropertyValue::Double(v) => float_to_json(*v),
        PropertyValue::UnsignedInteger(v) => Value::from(*v),
        PropertyValue::NegativeInteger(m) => match 0i64.checked_sub_unsigned(*m) {
            Some(v) => Value::from(v),
            None => float_to_json(-(*m as f64)),
        },
        PropertyValue::Boolean(b) => Value::Bool(*b),
        PropertyValue::Json(json) => json.clone(),
    }
}

fn id_to_json(id: &Id) -> Value {
    match id {
        Id::Integer(v) => Value::from(*v),
        Id::Text(s) => Value::String(s.clone()),
    }
}

fn float_to_json(v: f64) -> Value {
    Number::from_f64(v).map_or(Value::Null, Value::Number)
}

fn position_to_json(position: &[f64]) -> Value {
    Value::Array(position.iter().map(|&v| float_to_json(v)).collect())
}

fn line_to_json(points: &[Position]) -> Value {
    Value::Array(points.iter().map(|p| position_to_json(p)).collect())
}
