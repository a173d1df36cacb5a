//! Binary encoding/decoding for Geobuf.
//!
//! The wire format is a tree of protocol-buffer messages (`Data`,
//! `FeatureCollection`, `Feature`, `Geometry`, `Value`), declared in
//! [`proto`] with `prost`. The other modules map one message kind each to and
//! from the document model.

pub mod context;
pub mod coords;
pub mod document;
pub mod geometry;
pub mod properties;
pub mod proto;
pub mod value;

pub use coords::Quantizer;
pub use document::{decode, decode_data, encode, encode_with_options, Decoded, EncodeOptions};
pub use value::{decode_value, encode_value};
