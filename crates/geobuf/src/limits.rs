//! Defaults and security limits for encoding and decoding.

/// Coordinate precision (decimal digits) used when none is given.
pub const DEFAULT_PRECISION: u32 = 6;

/// Largest supported precision. `10^15` still leaves headroom in `i64` for
/// coordinates in the usual geographic ranges.
pub const MAX_PRECISION: u32 = 15;

/// Number of ordinates per position used when none is given.
pub const DEFAULT_DIMENSIONS: u32 = 2;

/// Smallest supported number of ordinates per position.
pub const MIN_DIMENSIONS: u32 = 2;

/// Largest supported number of ordinates per position.
pub const MAX_DIMENSIONS: u32 = 3;

/// Maximum depth of nested geometry collections.
pub const MAX_NESTING_DEPTH: usize = 64;
