//! Geobuf protobuf message schema.
//!
//! Field numbers follow `geobuf.proto`. The codec modules map these messages
//! to and from the document model; nothing outside `codec` sees them.

use prost::{Message, Oneof};

use crate::model::GeometryType;

/// Root message: key table, coordinate header and the document body.
#[derive(Clone, PartialEq, Message)]
pub struct Data {
    /// Property keys shared by every object in the document.
    #[prost(string, repeated, tag = "1")]
    pub keys: Vec<String>,
    /// Ordinates per position.
    #[prost(uint32, optional, tag = "2", default = "2")]
    pub dimensions: Option<u32>,
    /// Decimal digits kept per ordinate.
    #[prost(uint32, optional, tag = "3", default = "6")]
    pub precision: Option<u32>,
    #[prost(oneof = "DataType", tags = "4, 5, 6")]
    pub data_type: Option<DataType>,
}

/// Document body.
#[derive(Clone, PartialEq, Oneof)]
pub enum DataType {
    #[prost(message, tag = "4")]
    FeatureCollection(FeatureCollection),
    #[prost(message, tag = "5")]
    Feature(Feature),
    #[prost(message, tag = "6")]
    Geometry(Geometry),
}

#[derive(Clone, PartialEq, Message)]
pub struct FeatureCollection {
    #[prost(message, repeated, tag = "1")]
    pub features: Vec<Feature>,
    #[prost(message, repeated, tag = "13")]
    pub values: Vec<Value>,
    #[prost(uint32, repeated, tag = "15")]
    pub custom_properties: Vec<u32>,
}

#[derive(Clone, PartialEq, Message)]
pub struct Feature {
    #[prost(message, optional, tag = "1")]
    pub geometry: Option<Geometry>,
    #[prost(oneof = "IdType", tags = "11, 12")]
    pub id_type: Option<IdType>,
    #[prost(message, repeated, tag = "13")]
    pub values: Vec<Value>,
    /// `(key index, value index)` pairs.
    #[prost(uint32, repeated, tag = "14")]
    pub properties: Vec<u32>,
    #[prost(uint32, repeated, tag = "15")]
    pub custom_properties: Vec<u32>,
}

#[derive(Clone, PartialEq, Message)]
pub struct Geometry {
    #[prost(enumeration = "GeometryType", required, tag = "1")]
    pub r#type: i32,
    /// Nesting header for multi-part geometries.
    #[prost(uint32, repeated, tag = "2")]
    pub lengths: Vec<u32>,
    /// Quantized ordinates, delta-encoded within each line or ring.
    #[prost(sint64, repeated, tag = "3")]
    pub coords: Vec<i64>,
    #[prost(message, repeated, tag = "4")]
    pub geometries: Vec<Geometry>,
    #[prost(oneof = "IdType", tags = "11, 12")]
    pub id_type: Option<IdType>,
    #[prost(message, repeated, tag = "13")]
    pub values: Vec<Value>,
    #[prost(uint32, repeated, tag = "14")]
    pub properties: Vec<u32>,
    #[prost(uint32, repeated, tag = "15")]
    pub custom_properties: Vec<u32>,
}

/// Feature or geometry id.
#[derive(Clone, PartialEq, Oneof)]
pub enum IdType {
    #[prost(string, tag = "11")]
    Id(String),
    #[prost(sint64, tag = "12")]
    IntId(i64),
}

/// Property value.
///
/// Exactly one variant is set by the encoder. When a message repeats the
/// oneof, the last occurrence wins.
#[derive(Clone, PartialEq, Message)]
pub struct Value {
    #[prost(oneof = "ValueType", tags = "1, 2, 3, 4, 5, 6")]
    pub value_type: Option<ValueType>,
}

#[derive(Clone, PartialEq, Oneof)]
pub enum ValueType {
    #[prost(string, tag = "1")]
    StringValue(String),
    #[prost(double, tag = "2")]
    DoubleValue(f64),
    #[prost(uint64, tag = "3")]
    PosIntValue(u64),
    /// Magnitude of a negative integer.
    #[prost(uint64, tag = "4")]
    NegIntValue(u64),
    #[prost(bool, tag = "5")]
    BoolValue(bool),
    /// Serialized JSON text of a composite value.
    #[prost(string, tag = "6")]
    JsonValue(String),
}
