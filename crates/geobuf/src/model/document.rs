//! Documents: features, feature collections and their ids.

use std::fmt;

use crate::model::{Geometry, PropertyMap, PropertyValue};

/// Feature or geometry identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Id {
    /// Written as `int_id` (sint64).
    Integer(i64),
    /// Written as `id` (string).
    Text(String),
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Integer(v) => write!(f, "{v}"),
            Id::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Id {
    fn from(value: i64) -> Self {
        Id::Integer(value)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Id::Text(value.to_string())
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Id::Text(value)
    }
}

/// A feature: one geometry plus its id and properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: Option<Id>,
    pub geometry: Geometry,
    /// Members of the feature's `properties` object.
    pub properties: PropertyMap,
    /// Non-standard members of the feature object.
    pub custom_properties: PropertyMap,
}

impl Feature {
    /// GeoJSON members of a feature object. Custom properties never use
    /// these keys.
    pub const MEMBERS: &'static [&'static str] = &["type", "id", "geometry", "properties"];

    /// Creates a feature with no id or properties.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            id: None,
            geometry,
            properties: PropertyMap::new(),
            custom_properties: PropertyMap::new(),
        }
    }

    /// Sets the id.
    pub fn with_id(mut self, id: impl Into<Id>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Adds a standard property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Adds a custom (non-standard) property.
    pub fn with_custom_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.custom_properties.insert(key.into(), value.into());
        self
    }
}

/// An ordered collection of features.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
    /// Non-standard members of the collection object.
    pub custom_properties: PropertyMap,
}

impl FeatureCollection {
    /// GeoJSON members of a feature collection object.
    pub const MEMBERS: &'static [&'static str] = &["type", "features"];

    /// Creates a collection from features.
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            features,
            custom_properties: PropertyMap::new(),
        }
    }

    /// Adds a custom (non-standard) property.
    pub fn with_custom_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.custom_properties.insert(key.into(), value.into());
        self
    }
}

/// Root of an encode or decode call.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoDocument {
    FeatureCollection(FeatureCollection),
    Feature(Feature),
    Geometry(Geometry),
}

impl GeoDocument {
    /// Returns the GeoJSON `type` of the root object.
    pub fn type_name(&self) -> &'static str {
        match self {
            GeoDocument::FeatureCollection(_) => "FeatureCollection",
            GeoDocument::Feature(_) => "Feature",
            GeoDocument::Geometry(g) => g.geometry_type().name(),
        }
    }
}

impl From<FeatureCollection> for GeoDocument {
    fn from(value: FeatureCollection) -> Self {
        GeoDocument::FeatureCollection(value)
    }
}

impl From<Feature> for GeoDocument {
    fn from(value: Feature) -> Self {
        GeoDocument::Feature(value)
    }
}

impl From<Geometry> for GeoDocument {
    fn from(value: Geometry) -> Self {
        GeoDocument::Geometry(value)
    }
}
