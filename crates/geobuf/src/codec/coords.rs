//! Coordinate quantization and delta encoding of point sequences.
//!
//! Every ordinate is scaled by `10^precision` and rounded (half away from
//! zero) to a signed integer. Line sequences store the difference between a
//! point's quantized position and the previous point's quantized position.
//! The encoder keeps the previous *quantized* position as its accumulator, so
//! the deltas always sum back to exactly `quantize(p)` and rounding error never
//! carries from one point into the next.

use crate::error::{DecodeError, EncodeError};
use crate::model::Position;

/// 2^63 as f64; quantized values must stay strictly below this magnitude.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Quantization context for one encode or decode call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantizer {
    precision: u32,
    dimensions: usize,
    factor: f64,
}

impl Quantizer {
    /// Creates a quantizer. Callers validate `precision` and `dimensions`
    /// against the limits first.
    pub fn new(precision: u32, dimensions: u32) -> Self {
        Self {
            precision,
            dimensions: dimensions as usize,
            factor: 10f64.powi(precision as i32),
        }
    }

    /// Returns the number of decimal digits kept.
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Returns the number of ordinates per position.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Maps an ordinate to its absolute position on the integer grid.
    pub fn quantize(&self, value: f64) -> Result<i64, EncodeError> {
        if !value.is_finite() {
            return Err(EncodeError::NonFiniteCoordinate { value });
        }
        let scaled = (value * self.factor).round();
        if !(-I64_LIMIT..I64_LIMIT).contains(&scaled) {
            return Err(EncodeError::CoordinateOutOfRange {
                value,
                precision: self.precision,
            });
        }
        Ok(scaled as i64)
    }

    /// Maps a grid position back to an ordinate.
    #[inline]
    pub fn dequantize(&self, value: i64) -> f64 {
        value as f64 / self.factor
    }

    fn check_dimensions(&self, position: &[f64]) -> Result<(), EncodeError> {
        if position.len() < self.dimensions {
            return Err(EncodeError::DimensionMismatch {
                expected: self.dimensions,
                found: position.len(),
            });
        }
        Ok(())
    }

    /// Appends one position as absolute grid coordinates. Ordinates past the
    /// configured dimensions are dropped.
    pub fn write_point(&self, position: &[f64], out: &mut Vec<i64>) -> Result<(), EncodeError> {
        self.check_dimensions(position)?;
        for &ordinate in &position[..self.dimensions] {
            out.push(self.quantize(ordinate)?);
        }
        Ok(())
    }

    /// Appends a delta-encoded point sequence. With `elide_closing_point`
    /// the last position is not written; the decoder restores it from the
    /// first.
    pub fn write_line(
        &self,
        points: &[Position],
        elide_closing_point: bool,
        out: &mut Vec<i64>,
    ) -> Result<(), EncodeError> {
        let count = if elide_closing_point {
            points.len().saturating_sub(1)
        } else {
            points.len()
        };
        out.reserve(count * self.dimensions);

        let mut acc = [0i64; 3];
        for (i, point) in points[..count].iter().enumerate() {
            self.check_dimensions(point).map_err(|e| e.at(format_args!("[{i}]")))?;
            for (j, &ordinate) in point[..self.dimensions].iter().enumerate() {
                let abs = self.quantize(ordinate).map_err(|e| e.at(format_args!("[{i}]")))?;
                let delta = abs.checked_sub(acc[j]).ok_or_else(|| {
                    EncodeError::CoordinateOutOfRange {
                        value: ordinate,
                        precision: self.precision,
                    }
                    .at(format_args!("[{i}]"))
                })?;
                out.push(delta);
                acc[j] = abs;
            }
        }
        Ok(())
    }

    /// Appends a closed ring with its closing point elided.
    ///
    /// The ring must have at least four positions and its first and last
    /// positions must land on the same grid point.
    pub fn write_ring(&self, ring: &[Position], out: &mut Vec<i64>) -> Result<(), EncodeError> {
        if ring.len() < 4 {
            return Err(EncodeError::RingTooShort { len: ring.len() });
        }
        let first = &ring[0];
        let last = &ring[ring.len() - 1];
        self.check_dimensions(first)?;
        self.check_dimensions(last)?;
        for j in 0..self.dimensions {
            if self.quantize(first[j])? != self.quantize(last[j])? {
                return Err(EncodeError::UnclosedRing);
            }
        }
        self.write_line(ring, true, out)
    }

    /// Decodes one position from absolute grid coordinates.
    pub fn read_point(&self, coords: &[i64]) -> Position {
        coords.iter().map(|&v| self.dequantize(v)).collect()
    }

    /// Decodes a delta-encoded point sequence. With `close_ring` a copy of the
    /// first decoded position is appended.
    pub fn read_line(&self, coords: &[i64], close_ring: bool) -> Result<Vec<Position>, DecodeError> {
        let dims = self.dimensions;
        if coords.len() % dims != 0 {
            return Err(DecodeError::CoordsNotAligned {
                len: coords.len(),
                dimensions: dims,
            });
        }

        let count = coords.len() / dims;
        let mut points = Vec::with_capacity(count + close_ring as usize);
        let mut acc = [0i64; 3];
        for chunk in coords.chunks_exact(dims) {
            let mut point = Vec::with_capacity(dims);
            for (j, &delta) in chunk.iter().enumerate() {
                acc[j] = acc[j]
                    .checked_add(delta)
                    .ok_or(DecodeError::CoordinateOverflow)?;
                point.push(self.dequantize(acc[j]));
            }
            points.push(point);
        }

        if close_ring {
            let first = points.first().cloned().ok_or(DecodeError::EmptyRing)?;
            points.push(first);
        }
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quantizer() -> Quantizer {
        Quantizer::new(6, 2)
    }

    #[test]
    fn test_quantize_rounds_half_away_from_zero() {
        let q = Quantizer::new(0, 2);
        assert_eq!(q.quantize(0.5).unwrap(), 1);
        assert_eq!(q.quantize(-0.5).unwrap(), -1);
        assert_eq!(q.quantize(2.5).unwrap(), 3);
        assert_eq!(q.quantize(1.4999).unwrap(), 1);
    }

    #[test]
    fn test_quantize_literal_point() {
        let q = quantizer();
        let mut out = Vec::new();
        q.write_point(&[1.23456789, 2.3456789], &mut out).unwrap();
        assert_eq!(out, vec![1_234_568, 2_345_679]);
        assert_eq!(q.read_point(&out), vec![1.234568, 2.345679]);
    }

    #[test]
    fn test_quantize_rejects_non_finite() {
        let q = quantizer();
        assert!(matches!(
            q.quantize(f64::NAN),
            Err(EncodeError::NonFiniteCoordinate { .. })
        ));
        assert!(matches!(
            q.quantize(f64::INFINITY),
            Err(EncodeError::NonFiniteCoordinate { .. })
        ));
    }

    #[test]
    fn test_quantize_rejects_overflow() {
        let q = Quantizer::new(15, 2);
        assert!(matches!(
            q.quantize(1e5),
            Err(EncodeError::CoordinateOutOfRange { precision: 15, .. })
        ));
        assert!(q.quantize(180.0).is_ok());
    }

    #[test]
    fn test_line_deltas() {
        let q = Quantizer::new(1, 2);
        let mut out = Vec::new();
        q.write_line(&[vec![1.0, 1.0], vec![1.5, 0.5], vec![3.0, 0.5]], false, &mut out)
            .unwrap();
        assert_eq!(out, vec![10, 10, 5, -5, 15, 0]);
    }

    #[test]
    fn test_line_accumulates_quantized_positions() {
        // Each step is 0.00000049 which quantizes to 0 on its own; differencing
        // raw floats would lose every step. Tracking absolute grid positions
        // keeps the sum exact.
        let q = quantizer();
        let points: Vec<Position> = (0..40).map(|i| vec![i as f64 * 0.000_000_49, 0.0]).collect();

        let mut out = Vec::new();
        q.write_line(&points, false, &mut out).unwrap();
        let decoded = q.read_line(&out, false).unwrap();

        for (original, decoded) in points.iter().zip(&decoded) {
            let expected = (original[0] * 1e6).round() / 1e6;
            assert_eq!(decoded[0], expected);
        }
    }

    #[test]
    fn test_line_drops_extra_ordinates() {
        let q = quantizer();
        let mut out = Vec::new();
        q.write_line(&[vec![1.0, 2.0, 3.0]], false, &mut out).unwrap();
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_line_rejects_missing_ordinates() {
        let q = Quantizer::new(6, 3);
        let mut out = Vec::new();
        let err = q
            .write_line(&[vec![1.0, 2.0, 3.0], vec![1.0, 2.0]], false, &mut out)
            .unwrap_err();
        assert_eq!(err.path(), Some("[1]"));
        assert_eq!(
            err.root_cause(),
            &EncodeError::DimensionMismatch { expected: 3, found: 2 }
        );
    }

    #[test]
    fn test_line_delta_overflow_names_the_point() {
        let q = Quantizer::new(0, 2);
        let mut out = Vec::new();
        // Both ends are on the grid, but the step between them exceeds i64.
        let err = q
            .write_line(&[vec![0.0, -9e18], vec![0.0, 9e18]], false, &mut out)
            .unwrap_err();
        assert_eq!(err.path(), Some("[1]"));
        assert!(matches!(
            err.root_cause(),
            EncodeError::CoordinateOutOfRange { precision: 0, .. }
        ));
    }

    #[test]
    fn test_ring_closure() {
        let q = quantizer();
        let ring = vec![
            vec![0.1, 0.1],
            vec![1.1, 0.1],
            vec![1.1, 1.1],
            vec![0.1, 0.1],
        ];
        let mut out = Vec::new();
        q.write_ring(&ring, &mut out).unwrap();
        assert_eq!(out.len(), 6);

        let decoded = q.read_line(&out, true).unwrap();
        assert_eq!(decoded.len(), 4);
        assert_eq!(decoded[0], decoded[3]);
        assert_eq!(decoded[0][0].to_bits(), decoded[3][0].to_bits());
    }

    #[test]
    fn test_ring_validation() {
        let q = quantizer();
        let mut out = Vec::new();
        assert!(matches!(
            q.write_ring(&[vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 0.0]], &mut out),
            Err(EncodeError::RingTooShort { len: 3 })
        ));
        assert!(matches!(
            q.write_ring(
                &[vec![0.0, 0.0], vec![1.0, 0.0], vec![1.0, 1.0], vec![0.0, 1.0]],
                &mut out
            ),
            Err(EncodeError::UnclosedRing)
        ));
    }

    #[test]
    fn test_read_line_rejects_misaligned_coords() {
        let q = quantizer();
        assert!(matches!(
            q.read_line(&[1, 2, 3], false),
            Err(DecodeError::CoordsNotAligned { len: 3, dimensions: 2 })
        ));
    }

    #[test]
    fn test_read_line_rejects_overflow() {
        let q = quantizer();
        assert!(matches!(
            q.read_line(&[i64::MAX, 0, 1, 0], false),
            Err(DecodeError::CoordinateOverflow)
        ));
    }

    #[test]
    fn test_read_empty_ring() {
        let q = quantizer();
        assert!(matches!(q.read_line(&[], true), Err(DecodeError::EmptyRing)));
        assert!(q.read_line(&[], false).unwrap().is_empty());
    }
}
