//! Geometry types.

use prost::Enumeration;

use crate::model::{Id, PropertyMap, PropertyValue};

/// A position: one ordinate per dimension (x, y and optionally z).
pub type Position = Vec<f64>;

/// Geometry variants, numbered as on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enumeration)]
#[repr(i32)]
pub enum GeometryType {
    Point = 0,
    MultiPoint = 1,
    LineString = 2,
    MultiLineString = 3,
    Polygon = 4,
    MultiPolygon = 5,
    GeometryCollection = 6,
}

impl GeometryType {
    /// Creates a GeometryType from its GeoJSON `type` name.
    pub fn from_name(name: &str) -> Option<GeometryType> {
        match name {
            "Point" => Some(GeometryType::Point),
            "MultiPoint" => Some(GeometryType::MultiPoint),
            "LineString" => Some(GeometryType::LineString),
            "MultiLineString" => Some(GeometryType::MultiLineString),
            "Polygon" => Some(GeometryType::Polygon),
            "MultiPolygon" => Some(GeometryType::MultiPolygon),
            "GeometryCollection" => Some(GeometryType::GeometryCollection),
            _ => None,
        }
    }

    /// Returns the GeoJSON members of a geometry object of this type. Custom
    /// properties never use these keys.
    pub fn members(self) -> &'static [&'static str] {
        match self {
            GeometryType::GeometryCollection => &["type", "id", "properties", "geometries"],
            _ => &["type", "id", "properties", "coordinates"],
        }
    }

    /// Returns the GeoJSON `type` name.
    pub fn name(self) -> &'static str {
        match self {
            GeometryType::Point => "Point",
            GeometryType::MultiPoint => "MultiPoint",
            GeometryType::LineString => "LineString",
            GeometryType::MultiLineString => "MultiLineString",
            GeometryType::Polygon => "Polygon",
            GeometryType::MultiPolygon => "MultiPolygon",
            GeometryType::GeometryCollection => "GeometryCollection",
        }
    }
}

/// Coordinate payload of a geometry, or its children for collections.
///
/// Polygon rings are closed: their first and last positions are identical.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Point(Position),
    MultiPoint(Vec<Position>),
    LineString(Vec<Position>),
    MultiLineString(Vec<Vec<Position>>),
    Polygon(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
    GeometryCollection(Vec<Geometry>),
}

impl Shape {
    /// Returns the geometry type of this shape.
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Shape::Point(_) => GeometryType::Point,
            Shape::MultiPoint(_) => GeometryType::MultiPoint,
            Shape::LineString(_) => GeometryType::LineString,
            Shape::MultiLineString(_) => GeometryType::MultiLineString,
            Shape::Polygon(_) => GeometryType::Polygon,
            Shape::MultiPolygon(_) => GeometryType::MultiPolygon,
            Shape::GeometryCollection(_) => GeometryType::GeometryCollection,
        }
    }
}

/// A geometry node with its optional id and properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub shape: Shape,
    pub id: Option<Id>,
    /// Members of a `properties` object on the geometry.
    pub properties: PropertyMap,
    /// Non-standard members of the geometry object.
    pub custom_properties: PropertyMap,
}

impl Geometry {
    /// Creates a geometry with no id or properties.
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            id: None,
            properties: PropertyMap::new(),
            custom_properties: PropertyMap::new(),
        }
    }

    pub fn point(position: Position) -> Self {
        Self::new(Shape::Point(position))
    }

    pub fn multi_point(points: Vec<Position>) -> Self {
        Self::new(Shape::MultiPoint(points))
    }

    pub fn line_string(points: Vec<Position>) -> Self {
        Self::new(Shape::LineString(points))
    }

    pub fn multi_line_string(lines: Vec<Vec<Position>>) -> Self {
        Self::new(Shape::MultiLineString(lines))
    }

    pub fn polygon(rings: Vec<Vec<Position>>) -> Self {
        Self::new(Shape::Polygon(rings))
    }

    pub fn multi_polygon(polygons: Vec<Vec<Vec<Position>>>) -> Self {
        Self::new(Shape::MultiPolygon(polygons))
    }

    pub fn collection(geometries: Vec<Geometry>) -> Self {
        Self::new(Shape::GeometryCollection(geometries))
    }

    /// Returns the geometry type.
    pub fn geometry_type(&self) -> GeometryType {
        self.shape.geometry_type()
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
