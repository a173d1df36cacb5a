//! Geometry message encoding/decoding.
//!
//! All coordinates of a geometry go into one flat `coords` stream. Nested
//! structure (lines of a MultiLineString, rings of a Polygon, polygons of a
//! MultiPolygon) is described by the `lengths` header, which is omitted when
//! the geometry has a single child.

use crate::codec::context::{DecodeContext, EncodeContext};
use crate::codec::properties::{decode_id, encode_id, PropertyEncoder, PropertyFields};
use crate::codec::proto;
use crate::error::{DecodeError, EncodeError};
use crate::limits::MAX_NESTING_DEPTH;
use crate::model::{Geometry, GeometryType, Position, Shape};

// =============================================================================
// DECODING
// =============================================================================

/// Maps one Geometry message to a geometry. `depth` is the number of
/// enclosing geometry collections.
pub fn decode_geometry(
    message: proto::Geometry,
    ctx: &DecodeContext<'_>,
    depth: usize,
) -> Result<Geometry, DecodeError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(DecodeError::NestingTooDeep {
            max: MAX_NESTING_DEPTH,
        });
    }

    let proto::Geometry {
        r#type,
        lengths,
        coords,
        geometries,
        id_type,
        values,
        properties,
        custom_properties,
    } = message;

    let geometry_type = GeometryType::try_from(r#type).map_err(|_| {
        DecodeError::InvalidGeometryType {
            geometry_type: r#type,
        }
    })?;

    let shape = if geometry_type == GeometryType::GeometryCollection {
        let children = geometries
            .into_iter()
            .enumerate()
            .map(|(i, child)| {
                decode_geometry(child, ctx, depth + 1)
                    .map_err(|e| e.at(format_args!("geometries[{i}]")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Shape::GeometryCollection(children)
    } else {
        decode_shape(geometry_type, &coords, &lengths, ctx)?
    };

    let fields = PropertyFields {
        values,
        properties,
        custom_properties,
    };
    let (properties, custom_properties) = fields.resolve(ctx.keys, geometry_type.members())?;

    Ok(Geometry {
        shape,
        id: decode_id(id_type),
        properties,
        custom_properties,
    })
}

fn decode_shape(
    geometry_type: GeometryType,
    coords: &[i64],
    lengths: &[u32],
    ctx: &DecodeContext<'_>,
) -> Result<Shape, DecodeError> {
    let q = &ctx.quantizer;
    let dims = q.dimensions();

    let shape = match geometry_type {
        GeometryType::Point => {
            if coords.len() != dims {
                return Err(DecodeError::PointDimensionMismatch {
                    expected: dims,
                    found: coords.len(),
                });
            }
            Shape::Point(q.read_point(coords))
        }
        GeometryType::MultiPoint => {
            if coords.len() % dims != 0 {
                return Err(DecodeError::CoordsNotAligned {
                    len: coords.len(),
                    dimensions: dims,
                });
            }
            Shape::MultiPoint(coords.chunks_exact(dims).map(|c| q.read_point(c)).collect())
        }
        GeometryType::LineString => Shape::LineString(q.read_line(coords, false)?),
        GeometryType::MultiLineString => {
            Shape::MultiLineString(decode_lines(coords, lengths, false, ctx)?)
        }
        GeometryType::Polygon => Shape::Polygon(decode_lines(coords, lengths, true, ctx)?),
        GeometryType::MultiPolygon => Shape::MultiPolygon(decode_polygons(coords, lengths, ctx)?),
        GeometryType::GeometryCollection => Shape::GeometryCollection(Vec::new()),
    };
    Ok(shape)
}

/// Lines of a MultiLineString or rings of a Polygon.
fn decode_lines(
    coords: &[i64],
    lengths: &[u32],
    closed: bool,
    ctx: &DecodeContext<'_>,
) -> Result<Vec<Vec<Position>>, DecodeError> {
    let q = &ctx.quantizer;
    if lengths.is_empty() {
        if coords.is_empty() {
            return Ok(Vec::new());
        }
        return Ok(vec![q.read_line(coords, closed)?]);
    }

    let mut cursor = CoordCursor::new(coords, q.dimensions());
    let mut lines = Vec::with_capacity(lengths.len());
    for &len in lengths {
        lines.push(q.read_line(cursor.take(len)?, closed)?);
    }
    cursor.finish()?;
    Ok(lines)
}

fn decode_polygons(
    coords: &[i64],
    lengths: &[u32],
    ctx: &DecodeContext<'_>,
) -> Result<Vec<Vec<Vec<Position>>>, DecodeError> {
    let q = &ctx.quantizer;
    if lengths.is_empty() {
        if coords.is_empty() {
            return Ok(Vec::new());
        }
        return Ok(vec![vec![q.read_line(coords, true)?]]);
    }

    let mut header = LengthsCursor::new(lengths);
    let mut cursor = CoordCursor::new(coords, q.dimensions());

    let polygon_count = header.next("polygon count")?;
    // Every polygon needs at least its ring count from the header.
    let mut polygons = Vec::with_capacity(bounded_capacity(polygon_count, header.remaining()));
    for _ in 0..polygon_count {
        let ring_count = header.next("ring count")?;
        let mut rings = Vec::with_capacity(bounded_capacity(ring_count, header.remaining()));
        for _ in 0..ring_count {
            let len = header.next("ring length")?;
            rings.push(q.read_line(cursor.take(len)?, true)?);
        }
        polygons.push(rings);
    }

    header.finish()?;
    cursor.finish()?;
    Ok(polygons)
}

fn bounded_capacity(count: u32, remaining: usize) -> usize {
    usize::try_from(count).map_or(remaining, |c| c.min(remaining))
}

/// Hands out consecutive runs of the flat `coords` stream.
struct CoordCursor<'c> {
    coords: &'c [i64],
    pos: usize,
    dims: usize,
}

impl<'c> CoordCursor<'c> {
    fn new(coords: &'c [i64], dims: usize) -> Self {
        Self { coords, pos: 0, dims }
    }

    /// Takes the integers for `points` points.
    fn take(&mut self, points: u32) -> Result<&'c [i64], DecodeError> {
        let available = self.coords.len();
        let end = usize::try_from(points)
            .ok()
            .and_then(|p| p.checked_mul(self.dims))
            .and_then(|n| n.checked_add(self.pos))
            .ok_or(DecodeError::LengthsMismatch {
                declared: usize::MAX,
                available,
            })?;
        if end > available {
            return Err(DecodeError::LengthsMismatch {
                declared: end,
                available,
            });
        }
        let run = &self.coords[self.pos..end];
        self.pos = end;
        Ok(run)
    }

    /// Fails unless every coordinate was consumed.
    fn finish(self) -> Result<(), DecodeError> {
        if self.pos != self.coords.len() {
            return Err(DecodeError::LengthsMismatch {
                declared: self.pos,
                available: self.coords.len(),
            });
        }
        Ok(())
    }
}

/// Sequential reader over a MultiPolygon `lengths` header.
struct LengthsCursor<'l> {
    lengths: &'l [u32],
    pos: usize,
}

impl<'l> LengthsCursor<'l> {
    fn new(lengths: &'l [u32]) -> Self {
        Self { lengths, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.lengths.len() - self.pos
    }

    fn next(&mut self, context: &'static str) -> Result<u32, DecodeError> {
        let value = *self
            .lengths
            .get(self.pos)
            .ok_or(DecodeError::LengthsTruncated { context })?;
        self.pos += 1;
        Ok(value)
    }

    fn finish(self) -> Result<(), DecodeError> {
        match self.remaining() {
            0 => Ok(()),
            count => Err(DecodeError::TrailingLengths { count }),
        }
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Maps a geometry to its Geometry message.
pub fn encode_geometry(
    geometry: &Geometry,
    ctx: &mut EncodeContext,
    depth: usize,
) -> Result<proto::Geometry, EncodeError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(EncodeError::NestingTooDeep {
            max: MAX_NESTING_DEPTH,
        });
    }

    let mut message = proto::Geometry {
        r#type: geometry.geometry_type().into(),
        id_type: encode_id(geometry.id.as_ref()),
        ..Default::default()
    };

    if let Shape::GeometryCollection(children) = &geometry.shape {
        message.geometries = children
            .iter()
            .enumerate()
            .map(|(i, child)| {
                encode_geometry(child, ctx, depth + 1)
                    .map_err(|e| e.at(format_args!("geometries[{i}]")))
            })
            .collect::<Result<Vec<_>, _>>()?;
    } else {
        encode_shape(&geometry.shape, ctx, &mut message.lengths, &mut message.coords)
            .map_err(|e| e.at("coordinates"))?;
    }

    let mut props = PropertyEncoder::new();
    props.encode_properties(&geometry.properties, &mut ctx.keys)?;
    props.encode_custom_properties(
        &geometry.custom_properties,
        geometry.geometry_type().members(),
        &mut ctx.keys,
    )?;
    let fields = props.finish();
    message.values = fields.values;
    message.properties = fields.properties;
    message.custom_properties = fields.custom_properties;
    Ok(message)
}

fn encode_shape(
    shape: &Shape,
    ctx: &EncodeContext,
    lengths: &mut Vec<u32>,
    coords: &mut Vec<i64>,
) -> Result<(), EncodeError> {
    let q = &ctx.quantizer;
    match shape {
        Shape::Point(position) => q.write_point(position, coords)?,
        Shape::MultiPoint(points) => {
            for (i, point) in points.iter().enumerate() {
                q.write_point(point, coords)
                    .map_err(|e| e.at(format_args!("[{i}]")))?;
            }
        }
        Shape::LineString(points) => q.write_line(points, false, coords)?,
        Shape::MultiLineString(lines) => {
            let single = lines.len() == 1 && !lines[0].is_empty();
            for (i, line) in lines.iter().enumerate() {
                q.write_line(line, false, coords)
                    .map_err(|e| e.at(format_args!("[{i}]")))?;
                if !single {
                    lengths.push(header_entry(line.len())?);
                }
            }
        }
        Shape::Polygon(rings) => {
            for (i, ring) in rings.iter().enumerate() {
                q.write_ring(ring, coords)
                    .map_err(|e| e.at(format_args!("[{i}]")))?;
                if rings.len() != 1 {
                    lengths.push(header_entry(ring.len() - 1)?);
                }
            }
        }
        Shape::MultiPolygon(polygons) => {
            let single = polygons.len() == 1 && polygons[0].len() == 1;
            if !single {
                lengths.push(header_entry(polygons.len())?);
            }
            for (i, rings) in polygons.iter().enumerate() {
                if !single {
                    lengths.push(header_entry(rings.len())?);
                }
                for (j, ring) in rings.iter().enumerate() {
                    q.write_ring(ring, coords)
                        .map_err(|e| e.at(format_args!("[{i}][{j}]")))?;
                    if !single {
                        lengths.push(header_entry(ring.len() - 1)?);
                    }
                }
            }
        }
        Shape::GeometryCollection(_) => {}
    }
    Ok(())
}

fn header_entry(len: usize) -> Result<u32, EncodeError> {
    u32::try_from(len).map_err(|_| EncodeError::LengthOverflow { len })
}
