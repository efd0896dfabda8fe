//! Precision selection for the arbitrary-precision evaluation path.

/// Arithmetic used to evaluate one render request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrecisionMode {
    /// `f64` arithmetic. Degenerates past roughly `10^12` zoom.
    #[default]
    Standard,
    /// Arbitrary-precision binary floats, bits chosen per request.
    Arbitrary,
}

/// Margin for rounding error accumulated across the iteration.
const SAFETY_BITS: u64 = 32;

const MIN_ARBITRARY_BITS: usize = 128;

/// Enough for any view whose coordinates and zoom fit in an `f64`.
pub const MAX_ARBITRARY_BITS: usize = 4096;

/// Mantissa bits needed to tell adjacent pixels apart at `zoom`.
///
/// `span` is the plane width visible at zoom 1 and `extent` the larger frame
/// dimension, so the pixel spacing is `span / (zoom * extent)`. The
/// coordinates themselves are bounded by `center_magnitude` plus the half
/// span; the ratio of the two gives the bits of the coordinate, and the
/// iteration count adds the bits lost to error amplification.
#[must_use]
pub fn arbitrary_precision_bits(
    span: f64,
    zoom: f64,
    extent: u32,
    max_iterations: u32,
    center_magnitude: f64,
) -> usize {
    let log2_spacing = span.log2() - zoom.log2() - f64::from(extent.max(1)).log2();
    let log2_magnitude = (center_magnitude.abs() + span / (2.0 * zoom)).max(1.0).log2() + 1.0;

    // Overflowed or degenerate inputs saturate instead of wrapping.
    let ratio = (log2_magnitude - log2_spacing).ceil();
    let bits_from_ratio = if ratio.is_nan() {
        MAX_ARBITRARY_BITS as u64
    } else {
        ratio.clamp(0.0, MAX_ARBITRARY_BITS as f64) as u64
    };
    let iteration_bits = if max_iterations > 1 {
        f64::from(max_iterations).log2().ceil() as u64
    } else {
        0
    };

    let total_bits = bits_from_ratio
        .saturating_add(iteration_bits)
        .saturating_add(SAFETY_BITS)
        .min(MAX_ARBITRARY_BITS as u64);

    (total_bits as usize)
        .next_power_of_two()
        .clamp(MIN_ARBITRARY_BITS, MAX_ARBITRARY_BITS)
}
