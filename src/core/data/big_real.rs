//! Conversions between `f64`, decimal text and the arbitrary-precision
//! binary floats used by the deep-zoom path.

use dashu_base::Approximation;
use dashu_float::round::mode::Zero;
use dashu_float::{DBig, FBig};

/// Arbitrary-precision real. Binary base, round-toward-zero.
pub type BigReal = FBig;

/// Converts a finite `f64` to a [`BigReal`] with the given precision.
/// Returns `None` for NaN and infinities.
pub fn big_from_f64(value: f64, precision_bits: usize) -> Option<BigReal> {
    if !value.is_finite() {
        return None;
    }

    if value == 0.0 {
        return Some(FBig::ZERO.with_precision(precision_bits).value());
    }

    FBig::try_from(value)
        .ok()
        .map(|big| big.with_precision(precision_bits).value())
}

/// Nearest `f64`; may be infinite when the value exceeds the `f64` range.
pub fn big_to_f64(value: &BigReal) -> f64 {
    value.to_f64().value()
}

/// Re-rounds `value` to `precision_bits`.
pub fn big_with_precision(value: &BigReal, precision_bits: usize) -> BigReal {
    value.clone().with_precision(precision_bits).value()
}

/// Parses decimal text (e.g. `-0.75`, `1.5e-30`) into a binary float.
///
/// The decimal-to-binary conversion is done in one step at the target
/// precision so long decimal expansions do not lose digits on the way.
pub fn parse_big(text: &str, precision_bits: usize) -> Option<BigReal> {
    let decimal = text.trim().parse::<DBig>().ok()?;

    let binary = match decimal.with_base_and_precision::<2>(precision_bits) {
        Approximation::Exact(value) => value,
        Approximation::Inexact(value, _) => value,
    };

    Some(binary.with_rounding::<Zero>())
}

/// Formats `value` as decimal text with `digits` significant digits. The
/// output is accepted by [`parse_big`].
pub fn format_big(value: &BigReal, digits: usize) -> String {
    match value.clone().with_base_and_precision::<10>(digits.max(1)) {
        Approximation::Exact(decimal) => decimal.to_string(),
        Approximation::Inexact(decimal, _) => decimal.to_string(),
    }
}
