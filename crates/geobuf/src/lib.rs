//! Geobuf: compact, lossless binary encoding for GeoJSON documents.
//!
//! This crate encodes feature collections, features and bare geometries into
//! Geobuf, a protocol-buffer message tree, and decodes them back.
//!
//! # Overview
//!
//! Geobuf is typically 6-8 times smaller than the equivalent GeoJSON:
//! - **Quantized coordinates**: ordinates become integers at a fixed decimal
//!   precision, and point sequences are stored as deltas
//! - **Shared keys**: property names are stored once per document
//! - **Lossless structure**: ids, properties and non-standard members survive
//!   a round trip
//!
//! # Quick Start
//!
//! ```rust
//! use geobuf::{decode, encode, Feature, GeoDocument, Geometry};
//!
//! let feature = Feature::new(Geometry::point(vec![10.757933, 59.911491]))
//!     .with_id(1i64)
//!     .with_property("name", "Oslo");
//! let document = GeoDocument::from(feature);
//!
//! // Encode to binary
//! let bytes = encode(&document).unwrap();
//!
//! // Decode back
//! let decoded = decode(&bytes).unwrap();
//! assert_eq!(document, decoded);
//! ```
//!
//! Working directly with GeoJSON:
//!
//! ```rust
//! use geobuf::{decode_json, encode_json, EncodeOptions};
//! use serde_json::json;
//!
//! let point = json!({"type": "Point", "coordinates": [1.23456789, 2.3456789]});
//! let bytes = encode_json(&point, EncodeOptions::new()).unwrap();
//! assert_eq!(
//!     decode_json(&bytes).unwrap(),
//!     json!({"type": "Point", "coordinates": [1.234568, 2.345679]})
//! );
//! ```
//!
//! # Modules
//!
//! - [`model`]: Document tree (FeatureCollection, Feature, Geometry, PropertyValue)
//! - [`codec`]: Binary encoding/decoding
//! - [`geojson`]: Conversion to and from `serde_json::Value`
//! - [`error`]: Error types
//! - [`limits`]: Defaults and security limits
//!
//! # Security
//!
//! The decoder is designed to safely handle untrusted input:
//! - Protobuf framing is parsed by `prost`, which bounds message recursion
//! - Geometry collection nesting is bounded
//! - Dictionary indices and `lengths` headers are checked against the data
//!   they describe before use
//! - Invalid data is rejected with descriptive errors

pub mod codec;
pub mod error;
pub mod geojson;
pub mod limits;
pub mod model;

// Re-export commonly used types at crate root
pub use codec::{decode, decode_data, encode, encode_with_options, Decoded, EncodeOptions};
pub use error::{DecodeError, EncodeError, ErrorKind};
pub use geojson::{decode_json, encode_json};
pub use model::{
    Feature, FeatureCollection, GeoDocument, Geometry, GeometryType, Id, Position, PropertyMap,
    PropertyValue, Shape,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
