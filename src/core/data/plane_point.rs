use crate::core::data::big_real::{
    BigReal, big_from_f64, big_to_f64, big_with_precision, format_big, parse_big,
};
use crate::core::data::complex::Complex;
use thiserror::Error;

/// Precision of stored plane positions. Far beyond what any zoom reachable
/// with an `f64` zoom factor needs, so repeated pan/zoom steps never erode
/// the center.
pub const PLANE_PRECISION_BITS: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanePointError {
    #[error("plane coordinate must be finite")]
    NonFinite,
    #[error("'{0}' is not a number")]
    InvalidNumber(String),
    #[error("'{0}' is outside the plottable range")]
    OutOfRange(String),
}

/// A point in the complex plane held at [`PLANE_PRECISION_BITS`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlanePoint {
    real: BigReal,
    imag: BigReal,
}

impl PlanePoint {
    #[must_use]
    pub fn origin() -> Self {
        Self {
            real: BigReal::ZERO.with_precision(PLANE_PRECISION_BITS).value(),
            imag: BigReal::ZERO.with_precision(PLANE_PRECISION_BITS).value(),
        }
    }

    pub fn from_complex(c: Complex) -> Result<Self, PlanePointError> {
        Self::from_parts(c.real, c.imag)
    }

    pub fn from_parts(real: f64, imag: f64) -> Result<Self, PlanePointError> {
        Ok(Self {
            real: big_from_f64(real, PLANE_PRECISION_BITS).ok_or(PlanePointError::NonFinite)?,
            imag: big_from_f64(imag, PLANE_PRECISION_BITS).ok_or(PlanePointError::NonFinite)?,
        })
    }

    pub fn parse(real: &str, imag: &str) -> Result<Self, PlanePointError> {
        let parse = |text: &str| {
            let value = parse_big(text, PLANE_PRECISION_BITS)
                .ok_or_else(|| PlanePointError::InvalidNumber(text.trim().to_string()))?;

            if big_to_f64(&value).is_finite() {
                Ok(value)
            } else {
                Err(PlanePointError::OutOfRange(text.trim().to_string()))
            }
        };

        Ok(Self {
            real: parse(real)?,
            imag: parse(imag)?,
        })
    }

    #[must_use]
    pub fn real(&self) -> &BigReal {
        &self.real
    }

    #[must_use]
    pub fn imag(&self) -> &BigReal {
        &self.imag
    }

    /// Nearest standard-precision value.
    #[must_use]
    pub fn to_complex(&self) -> Complex {
        Complex::new(big_to_f64(&self.real), big_to_f64(&self.imag))
    }

    /// Components rounded to `precision_bits`, for building coordinate maps.
    #[must_use]
    pub fn components_with_precision(&self, precision_bits: usize) -> (BigReal, BigReal) {
        (
            big_with_precision(&self.real, precision_bits),
            big_with_precision(&self.imag, precision_bits),
        )
    }

    pub fn offset_by(&self, delta: Complex) -> Result<Self, PlanePointError> {
        let delta = Self::from_complex(delta)?;

        Self {
            real: &self.real + &delta.real,
            imag: &self.imag + &delta.imag,
        }
        .finite()
    }

    #[must_use]
    pub fn difference(&self, other: &PlanePoint) -> Complex {
        Complex::new(
            big_to_f64(&(&self.real - &other.real)),
            big_to_f64(&(&self.imag - &other.imag)),
        )
    }

    /// `anchor + (self - anchor) * ratio`, computed at full precision.
    pub fn dilate_about(&self, anchor: &PlanePoint, ratio: f64) -> Result<Self, PlanePointError> {
        let ratio = big_from_f64(ratio, PLANE_PRECISION_BITS).ok_or(PlanePointError::NonFinite)?;

        Self {
            real: &anchor.real + &(&(&self.real - &anchor.real) * &ratio),
            imag: &anchor.imag + &(&(&self.imag - &anchor.imag) * &ratio),
        }
        .finite()
    }

    /// Rejects points whose standard-precision value overflows.
    fn finite(self) -> Result<Self, PlanePointError> {
        let approx = self.to_complex();

        if approx.real.is_finite() && approx.imag.is_finite() {
            Ok(self)
        } else {
            Err(PlanePointError::NonFinite)
        }
    }

    /// Decimal text of both components with `digits` significant digits.
    #[must_use]
    pub fn to_decimal_strings(&self, digits: usize) -> (String, String) {
        (format_big(&self.real, digits), format_big(&self.imag, digits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_is_zero() {
        assert_eq!(PlanePoint::origin().to_complex(), Complex::ZERO);
    }

    #[test]
    fn non_finite_components_are_rejected() {
        assert_eq!(
            PlanePoint::from_parts(f64::NAN, 0.0),
            Err(PlanePointError::NonFinite)
        );
        assert_eq!(
            PlanePoint::from_complex(Complex::new(0.0, f64::INFINITY)),
            Err(PlanePointError::NonFinite)
        );
    }

    #[test]
    fn offset_moves_both_components() {
        let p = PlanePoint::from_parts(-0.5, 0.25).unwrap();
        let moved = p.offset_by(Complex::new(0.5, -0.25)).unwrap();

        assert_eq!(moved.to_complex(), Complex::ZERO);
    }

    #[test]
    fn tiny_offsets_survive_at_deep_zoom() {
        let p = PlanePoint::from_parts(-0.75, 0.1).unwrap();
        let moved = p.offset_by(Complex::new(1e-40, -1e-40)).unwrap();

        assert_ne!(moved, p);

        let back = moved.difference(&p);
        assert!((back.real - 1e-40).abs() < 1e-55);
        assert!((back.imag + 1e-40).abs() < 1e-55);
    }

    #[test]
    fn dilate_keeps_anchor_fixed() {
        let center = PlanePoint::from_parts(0.0, 0.0).unwrap();
        let anchor = PlanePoint::from_parts(1.0, -1.0).unwrap();

        let zoomed_in = center.dilate_about(&anchor, 0.5).unwrap();
        assert_eq!(zoomed_in.to_complex(), Complex::new(0.5, -0.5));

        let zoomed_out = center.dilate_about(&anchor, 2.0).unwrap();
        assert_eq!(zoomed_out.to_complex(), Complex::new(-1.0, 1.0));

        let at_anchor = anchor.dilate_about(&anchor, 0.5).unwrap();
        assert_eq!(at_anchor, anchor);
    }

    #[test]
    fn parse_reports_offending_text() {
        assert_eq!(
            PlanePoint::parse("0.5", " nope "),
            Err(PlanePointError::InvalidNumber("nope".to_string()))
        );
    }

    #[test]
    fn parse_rejects_values_beyond_f64() {
        assert_eq!(
            PlanePoint::parse("1e400", "0"),
            Err(PlanePointError::OutOfRange("1e400".to_string()))
        );
        assert_eq!(
            PlanePoint::parse("0", "-2e308"),
            Err(PlanePointError::OutOfRange("-2e308".to_string()))
        );
        assert!(PlanePoint::parse("1e300", "1e-400").is_ok());
    }

    #[test]
    fn moves_that_overflow_are_rejected() {
        let far = PlanePoint::from_parts(f64::MAX, 0.0).unwrap();

        assert_eq!(
            far.offset_by(Complex::new(f64::MAX, 0.0)),
            Err(PlanePointError::NonFinite)
        );
        assert_eq!(
            far.dilate_about(&PlanePoint::origin(), 4.0),
            Err(PlanePointError::NonFinite)
        );
    }

    #[test]
    fn decimal_strings_parse_back() {
        let p = PlanePoint::from_parts(-0.743643887037151, 0.131825904205330).unwrap();
        let (re, im) = p.to_decimal_strings(40);
        let parsed = PlanePoint::parse(&re, &im).unwrap();

        let diff = parsed.difference(&p);
        assert!(diff.real.abs() < 1e-35);
        assert!(diff.imag.abs() < 1e-35);
    }
}
