//! Top-level `Data` message encoding/decoding.
//!
//! A Geobuf document is one `Data` message: the key table, the coordinate
//! header (dimensions, precision) and exactly one of a feature collection, a
//! feature or a bare geometry.

use prost::Message;
use tracing::debug;

use crate::codec::context::{DecodeContext, EncodeContext};
use crate::codec::coords::Quantizer;
use crate::codec::geometry::{decode_geometry, encode_geometry};
use crate::codec::properties::{decode_id, encode_id, PropertyEncoder, PropertyFields};
use crate::codec::proto::{self, DataType};
use crate::error::{DecodeError, EncodeError};
use crate::limits::{
    DEFAULT_DIMENSIONS, DEFAULT_PRECISION, MAX_DIMENSIONS, MAX_PRECISION, MIN_DIMENSIONS,
};
use crate::model::{Feature, FeatureCollection, GeoDocument};

// =============================================================================
// DECODING
// =============================================================================

/// A decoded document together with the header it was encoded with.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub precision: u32,
    pub dimensions: u32,
    pub document: GeoDocument,
}

/// Decodes a document from Geobuf bytes.
pub fn decode(input: &[u8]) -> Result<GeoDocument, DecodeError> {
    decode_data(input).map(|decoded| decoded.document)
}

/// Decodes a document from Geobuf bytes, keeping the coordinate header.
///
/// The whole `Data` message is parsed before the body is mapped, so the key
/// table and header may follow the body on the wire.
pub fn decode_data(input: &[u8]) -> Result<Decoded, DecodeError> {
    let data = proto::Data::decode(input)?;
    let (precision, dimensions) = (data.precision(), data.dimensions());

    if precision > MAX_PRECISION {
        return Err(DecodeError::InvalidPrecision {
            precision,
            max: MAX_PRECISION,
        });
    }
    if !(MIN_DIMENSIONS..=MAX_DIMENSIONS).contains(&dimensions) {
        return Err(DecodeError::InvalidDimensions {
            dimensions,
            min: MIN_DIMENSIONS,
            max: MAX_DIMENSIONS,
        });
    }

    let ctx = DecodeContext {
        quantizer: Quantizer::new(precision, dimensions),
        keys: &data.keys,
    };

    let document = match data.data_type {
        Some(DataType::FeatureCollection(collection)) => {
            GeoDocument::FeatureCollection(decode_feature_collection(collection, &ctx)?)
        }
        Some(DataType::Feature(feature)) => GeoDocument::Feature(decode_feature(feature, &ctx)?),
        Some(DataType::Geometry(geometry)) => {
            GeoDocument::Geometry(decode_geometry(geometry, &ctx, 0)?)
        }
        None => return Err(DecodeError::MissingField { field: "data_type" }),
    };

    debug!(
        bytes = input.len(),
        keys = data.keys.len(),
        precision,
        dimensions,
        root = document.type_name(),
        "decoded geobuf document"
    );

    Ok(Decoded {
        precision,
        dimensions,
        document,
    })
}

fn decode_feature_collection(
    message: proto::FeatureCollection,
    ctx: &DecodeContext<'_>,
) -> Result<FeatureCollection, DecodeError> {
    let features = message
        .features
        .into_iter()
        .enumerate()
        .map(|(i, feature)| {
            decode_feature(feature, ctx).map_err(|e| e.at(format_args!("features[{i}]")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    // A collection has no `properties` member; pairs written there are
    // skipped as an unknown field.
    let fields = PropertyFields {
        values: message.values,
        properties: Vec::new(),
        custom_properties: message.custom_properties,
    };
    let (_, custom_properties) = fields.resolve(ctx.keys, FeatureCollection::MEMBERS)?;
    Ok(FeatureCollection {
        features,
        custom_properties,
    })
}

fn decode_feature(message: proto::Feature, ctx: &DecodeContext<'_>) -> Result<Feature, DecodeError> {
    let geometry = message
        .geometry
        .ok_or(DecodeError::MissingField { field: "geometry" })?;
    let geometry = decode_geometry(geometry, ctx, 0).map_err(|e| e.at("geometry"))?;

    let fields = PropertyFields {
        values: message.values,
        properties: message.properties,
        custom_properties: message.custom_properties,
    };
    let (properties, custom_properties) = fields.resolve(ctx.keys, Feature::MEMBERS)?;
    Ok(Feature {
        id: decode_id(message.id_type),
        geometry,
        properties,
        custom_properties,
    })
}

// =============================================================================
// ENCODING
// =============================================================================

/// Options for encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Decimal digits kept per ordinate (`0..=15`).
    pub precision: u32,
    /// Ordinates per position (2 or 3).
    pub dimensions: u32,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            dimensions: DEFAULT_DIMENSIONS,
        }
    }
}

impl EncodeOptions {
    /// Creates default options: precision 6, two dimensions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of decimal digits kept.
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    /// Sets the number of ordinates per position.
    pub fn with_dimensions(mut self, dimensions: u32) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Checks the options against the supported ranges.
    pub fn validate(&self) -> Result<(), EncodeError> {
        if self.precision > MAX_PRECISION {
            return Err(EncodeError::InvalidPrecision {
                precision: self.precision,
                max: MAX_PRECISION,
            });
        }
        if !(MIN_DIMENSIONS..=MAX_DIMENSIONS).contains(&self.dimensions) {
            return Err(EncodeError::InvalidDimensions {
                dimensions: self.dimensions,
                min: MIN_DIMENSIONS,
                max: MAX_DIMENSIONS,
            });
        }
        Ok(())
    }
}

/// Encodes a document with default options.
pub fn encode(document: &GeoDocument) -> Result<Vec<u8>, EncodeError> {
    encode_with_options(document, EncodeOptions::default())
}

/// Encodes a document with the given options.
pub fn encode_with_options(
    document: &GeoDocument,
    options: EncodeOptions,
) -> Result<Vec<u8>, EncodeError> {
    options.validate()?;
    let mut ctx = EncodeContext::new(Quantizer::new(options.precision, options.dimensions));

    // The body fills the key table, so it is mapped before the header.
    let data_type = match document {
        GeoDocument::FeatureCollection(collection) => {
            DataType::FeatureCollection(encode_feature_collection(collection, &mut ctx)?)
        }
        GeoDocument::Feature(feature) => DataType::Feature(encode_feature(feature, &mut ctx)?),
        GeoDocument::Geometry(geometry) => {
            DataType::Geometry(encode_geometry(geometry, &mut ctx, 0)?)
        }
    };

    let data = proto::Data {
        keys: ctx.keys.keys().to_vec(),
        dimensions: (options.dimensions != DEFAULT_DIMENSIONS).then_some(options.dimensions),
        precision: (options.precision != DEFAULT_PRECISION).then_some(options.precision),
        data_type: Some(data_type),
    };
    let bytes = data.encode_to_vec();

    debug!(
        bytes = bytes.len(),
        keys = data.keys.len(),
        precision = options.precision,
        dimensions = options.dimensions,
        root = document.type_name(),
        "encoded geobuf document"
    );

    Ok(bytes)
}

fn encode_feature_collection(
    collection: &FeatureCollection,
    ctx: &mut EncodeContext,
) -> Result<proto::FeatureCollection, EncodeError> {
    let features = collection
        .features
        .iter()
        .enumerate()
        .map(|(i, feature)| {
            encode_feature(feature, ctx).map_err(|e| e.at(format_args!("features[{i}]")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut props = PropertyEncoder::new();
    props.encode_custom_properties(
        &collection.custom_properties,
        FeatureCollection::MEMBERS,
        &mut ctx.keys,
    )?;
    let fields = props.finish();
    Ok(proto::FeatureCollection {
        features,
        values: fields.values,
        custom_properties: fields.custom_properties,
    })
}

fn encode_feature(
    feature: &Feature,
    ctx: &mut EncodeContext,
) -> Result<proto::Feature, EncodeError> {
    let geometry = encode_geometry(&feature.geometry, ctx, 0).map_err(|e| e.at("geometry"))?;

    let mut props = PropertyEncoder::new();
    props.encode_properties(&feature.properties, &mut ctx.keys)?;
    props.encode_custom_properties(&feature.custom_properties, Feature::MEMBERS, &mut ctx.keys)?;
    let fields = props.finish();
    Ok(proto::Feature {
        geometry: Some(geometry),
        id_type: encode_id(feature.id.as_ref()),
        values: fields.values,
        properties: fields.properties,
        custom_properties: fields.custom_properties,
    })
}
