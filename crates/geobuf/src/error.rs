//! Error types for Geobuf encoding and decoding.

use std::fmt;

use thiserror::Error;

/// Broad classification of codec failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The input document violates the GeoJSON structure the codec expects.
    MalformedDocument,
    /// The binary input is truncated, inconsistent or references missing entries.
    MalformedWire,
    /// A value has no wire representation (non-finite numbers, out-of-range
    /// coordinates, unsupported precision or dimensions).
    UnsupportedValue,
}

impl ErrorKind {
    /// Returns a stable name for this kind (e.g. "malformed-wire").
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::MalformedDocument => "malformed-document",
            ErrorKind::MalformedWire => "malformed-wire",
            ErrorKind::UnsupportedValue => "unsupported-value",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error during binary decoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    // === Malformed wire ===
    #[error("malformed protobuf message: {0}")]
    Protobuf(#[from] prost::DecodeError),

    #[error("{dict} index {index} out of bounds (size: {size})")]
    IndexOutOfBounds {
        dict: &'static str,
        index: u32,
        size: usize,
    },

    #[error("{field} has odd length {len}; expected (key, value) index pairs")]
    UnpairedProperties { field: &'static str, len: usize },

    #[error("missing required field {field}")]
    MissingField { field: &'static str },

    #[error("precision {precision} exceeds maximum {max}")]
    InvalidPrecision { precision: u32, max: u32 },

    #[error("dimensions {dimensions} outside supported range [{min}, {max}]")]
    InvalidDimensions { dimensions: u32, min: u32, max: u32 },

    #[error("custom property {key:?} collides with a structural member")]
    ReservedCustomKey { key: String },

    #[error("coords length {len} is not a multiple of dimensions {dimensions}")]
    CoordsNotAligned { len: usize, dimensions: usize },

    #[error("point has {found} coordinates, expected {expected}")]
    PointDimensionMismatch { expected: usize, found: usize },

    #[error("lengths header covers {declared} coords but {available} are present")]
    LengthsMismatch { declared: usize, available: usize },

    #[error("lengths header ended while reading {context}")]
    LengthsTruncated { context: &'static str },

    #[error("lengths header has {count} unused trailing entries")]
    TrailingLengths { count: usize },

    #[error("ring has no stored points")]
    EmptyRing,

    #[error("coordinate delta overflows the integer grid")]
    CoordinateOverflow,

    #[error("nesting depth exceeds maximum {max}")]
    NestingTooDeep { max: usize },

    #[error("json_value is not valid JSON: {0}")]
    InvalidJson(String),

    // === Malformed document ===
    #[error("invalid geometry type: {geometry_type}")]
    InvalidGeometryType { geometry_type: i32 },

    // === Unsupported value ===
    #[error("double value {value} is not finite")]
    NonFiniteDouble { value: f64 },

    // === Location ===
    #[error("{path}: {source}")]
    At {
        path: String,
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DecodeError::At { source, .. } => source.kind(),
            DecodeError::InvalidGeometryType { .. } => ErrorKind::MalformedDocument,
            DecodeError::NonFiniteDouble { .. } => ErrorKind::UnsupportedValue,
            _ => ErrorKind::MalformedWire,
        }
    }

    /// Prefixes the location of this error with `segment`.
    pub fn at(self, segment: impl fmt::Display) -> Self {
        match self {
            DecodeError::At { path, source } => DecodeError::At {
                path: join_path(segment, &path),
                source,
            },
            other => DecodeError::At {
                path: segment.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// Returns the location of this error, if one was recorded.
    pub fn path(&self) -> Option<&str> {
        match self {
            DecodeError::At { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Returns the error without its location wrapper.
    pub fn root_cause(&self) -> &DecodeError {
        match self {
            DecodeError::At { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Error during binary encoding, including interpretation of GeoJSON input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    // === Malformed document ===
    #[error("expected a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("missing required member {member:?}")]
    MissingMember { member: &'static str },

    #[error("member {member:?} must be {expected}")]
    InvalidMember {
        member: &'static str,
        expected: &'static str,
    },

    #[error("unknown geometry type {found:?}")]
    UnknownGeometryType { found: String },

    #[error("id must be an integer or a string, found {found}")]
    InvalidId { found: String },

    #[error("property {key:?} has unsupported value type {found}")]
    UnsupportedPropertyType { key: String, found: &'static str },

    #[error("position has {found} ordinates, expected at least {expected}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("ring has {len} positions, expected at least 4")]
    RingTooShort { len: usize },

    #[error("ring is not closed: first and last positions differ")]
    UnclosedRing,

    #[error("nesting depth exceeds maximum {max}")]
    NestingTooDeep { max: usize },

    #[error("custom property {key:?} collides with a structural member")]
    ReservedCustomKey { key: String },

    // === Unsupported value ===
    #[error("coordinate {value} is not finite")]
    NonFiniteCoordinate { value: f64 },

    #[error("coordinate {value} overflows the integer grid at precision {precision}")]
    CoordinateOutOfRange { value: f64, precision: u32 },

    #[error("property value {value} is not finite")]
    NonFiniteDouble { value: f64 },

    #[error("precision {precision} exceeds maximum {max}")]
    InvalidPrecision { precision: u32, max: u32 },

    #[error("dimensions {dimensions} outside supported range [{min}, {max}]")]
    InvalidDimensions { dimensions: u32, min: u32, max: u32 },

    #[error("{len} entries do not fit the u32 lengths header")]
    LengthOverflow { len: usize },

    // === Location ===
    #[error("{path}: {source}")]
    At {
        path: String,
        source: Box<EncodeError>,
    },
}

impl EncodeError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EncodeError::At { source, .. } => source.kind(),
            EncodeError::NonFiniteCoordinate { .. }
            | EncodeError::CoordinateOutOfRange { .. }
            | EncodeError::NonFiniteDouble { .. }
            | EncodeError::InvalidPrecision { .. }
            | EncodeError::InvalidDimensions { .. }
            | EncodeError::LengthOverflow { .. } => ErrorKind::UnsupportedValue,
            _ => ErrorKind::MalformedDocument,
        }
    }

    /// Prefixes the location of this error with `segment`.
    pub fn at(self, segment: impl fmt::Display) -> Self {
        match self {
            EncodeError::At { path, source } => EncodeError::At {
                path: join_path(segment, &path),
                source,
            },
            other => EncodeError::At {
                path: segment.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// Returns the location of this error, if one was recorded.
    pub fn path(&self) -> Option<&str> {
        match self {
            EncodeError::At { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Returns the error without its location wrapper.
    pub fn root_cause(&self) -> &EncodeError {
        match self {
            EncodeError::At { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Joins an outer path segment onto an inner path: `features[2]` + `geometry`
/// gives `features[2].geometry`, `coordinates` + `[1]` gives `coordinates[1]`.
fn join_path(segment: impl fmt::Display, inner: &str) -> String {
    if inner.starts_with('[') {
        format!("{segment}{inner}")
    } else {
        format!("{segment}.{inner}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_nesting() {
        let err = EncodeError::UnclosedRing
            .at("[1]")
            .at("coordinates")
            .at("geometry")
            .at("features[3]");
        assert_eq!(err.path(), Some("features[3].geometry.coordinates[1]"));
        assert_eq!(err.root_cause(), &EncodeError::UnclosedRing);
        assert_eq!(
            err.to_string(),
            "features[3].geometry.coordinates[1]: ring is not closed: first and last positions differ"
        );
    }

    #[test]
    fn test_kind_passes_through_location() {
        let err = DecodeError::NonFiniteDouble { value: f64::INFINITY }.at("values[0]");
        assert_eq!(err.kind(), ErrorKind::UnsupportedValue);

        let err = DecodeError::InvalidGeometryType { geometry_type: 9 }.at("geometry");
        assert_eq!(err.kind(), ErrorKind::MalformedDocument);

        let err = DecodeError::EmptyRing;
        assert_eq!(err.kind(), ErrorKind::MalformedWire);
        assert!(err.path().is_none());
    }

    #[test]
    fn test_encode_kinds() {
        assert_eq!(EncodeError::UnclosedRing.kind(), ErrorKind::MalformedDocument);
        assert_eq!(
            EncodeError::NonFiniteCoordinate { value: f64::NAN }.kind(),
            ErrorKind::UnsupportedValue
        );
        assert_eq!(
            EncodeError::ReservedCustomKey {
                key: "geometry".to_string()
            }
            .kind(),
            ErrorKind::MalformedDocument
        );
        assert_eq!(ErrorKind::MalformedWire.to_string(), "malformed-wire");
    }

    #[test]
    fn test_protobuf_errors_are_malformed_wire() {
        use prost::Message;

        let err = DecodeError::from(crate::codec::proto::Data::decode(&[0x0au8, 0x05][..]).unwrap_err());
        assert_eq!(err.kind(), ErrorKind::MalformedWire);
        assert!(err.to_string().starts_with("malformed protobuf message"));

        let err = DecodeError::ReservedCustomKey {
            key: "type".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::MalformedWire);
    }
}
