//! Data model types for Geobuf.
//!
//! This module contains the in-memory document tree:
//! - Documents (feature collections, features, bare geometries)
//! - Geometries (the seven GeoJSON geometry variants)
//! - Property values and maps
//! - The key dictionary built while encoding

pub mod dictionary;
pub mod document;
pub mod geometry;
pub mod value;

pub use dictionary::KeyDictionary;
pub use document::{Feature, FeatureCollection, GeoDocument, Id};
pub use geometry::{Geometry, GeometryType, Position, Shape};
pub use value::{PropertyMap, PropertyValue};
