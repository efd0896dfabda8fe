use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::core::data::plane_point::{PlanePoint, PlanePointError};
use crate::core::util::coordinate_maps::{IM_SPAN, RE_SPAN};

/// Significant digits printed for the center at zoom 1.
const BASE_DIGITS: usize = 17;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationParseError {
    #[error("location must be a parenthesised tuple")]
    NotATuple,
    #[error("location needs 3 or 4 fields, found {found}")]
    WrongArity { found: usize },
    #[error("{field} '{text}' is not a number")]
    InvalidNumber { field: &'static str, text: String },
    #[error("{field} '{text}' is outside the plottable range")]
    OutOfRange { field: &'static str, text: String },
    #[error("zoom must be positive and finite")]
    NonPositiveZoom,
    #[error("bounds must enclose a non-empty region")]
    EmptyBounds,
}

/// A saved view: plane center plus zoom.
///
/// Text form is `(center_real, center_imag, zoom)`. Parsing also accepts
/// plane bounds `(re_min, re_max, im_min, im_max)`, which select the largest
/// zoom that still shows the whole region.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub center: PlanePoint,
    pub zoom: f64,
}

impl Location {
    /// Digits needed so the printed center resolves a pixel at this zoom.
    fn center_digits(&self) -> usize {
        let extra = self.zoom.log10().ceil();

        if extra.is_finite() && extra > 0.0 {
            BASE_DIGITS + extra as usize
        } else {
            BASE_DIGITS
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (real, imag) = self.center.to_decimal_strings(self.center_digits());

        write!(f, "({}, {}, {:e})", real, imag, self.zoom)
    }
}

impl FromStr for Location {
    type Err = LocationParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let inner = text
            .trim()
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or(LocationParseError::NotATuple)?;
        let fields = inner.split(',').map(str::trim).collect::<Vec<_>>();

        match fields.as_slice() {
            [real, imag, zoom] => {
                let center = PlanePoint::parse(real, imag).map_err(|err| {
                    let field = if PlanePoint::parse(real, "0").is_err() {
                        "center_real"
                    } else {
                        "center_imag"
                    };
                    match err {
                        PlanePointError::OutOfRange(text) => {
                            LocationParseError::OutOfRange { field, text }
                        }
                        PlanePointError::InvalidNumber(text) => {
                            LocationParseError::InvalidNumber { field, text }
                        }
                        PlanePointError::NonFinite => LocationParseError::OutOfRange {
                            field,
                            text: String::new(),
                        },
                    }
                })?;
                let zoom = parse_number("zoom", zoom)?;

                if !zoom.is_finite() || zoom <= 0.0 {
                    return Err(LocationParseError::NonPositiveZoom);
                }

                Ok(Self { center, zoom })
            }
            [re_min, re_max, im_min, im_max] => {
                let re_min = parse_number("re_min", re_min)?;
                let re_max = parse_number("re_max", re_max)?;
                let im_min = parse_number("im_min", im_min)?;
                let im_max = parse_number("im_max", im_max)?;

                let re_span = re_max - re_min;
                let im_span = im_max - im_min;
                if !(re_span > 0.0 && im_span > 0.0) {
                    return Err(LocationParseError::EmptyBounds);
                }

                let zoom = (RE_SPAN / re_span).min(IM_SPAN / im_span);
                if !zoom.is_finite() || zoom <= 0.0 {
                    return Err(LocationParseError::NonPositiveZoom);
                }

                let center = PlanePoint::from_parts(
                    re_min + re_span / 2.0,
                    im_min + im_span / 2.0,
                )
                .map_err(|_| LocationParseError::EmptyBounds)?;

                Ok(Self { center, zoom })
            }
            _ => Err(LocationParseError::WrongArity {
                found: fields.len(),
            }),
        }
    }
}

fn parse_number(field: &'static str, text: &str) -> Result<f64, LocationParseError> {
    text.parse::<f64>()
        .map_err(|_| LocationParseError::InvalidNumber {
            field,
            text: text.to_string(),
        })
}
