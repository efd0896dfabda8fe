//! Per-column and per-row plane coordinates for one render request.
//!
//! The frame uses a square-aspect convention: both axes are scaled by the
//! larger frame dimension, so a pixel is square in the plane regardless of
//! the frame's aspect ratio.

use crate::core::data::big_real::{BigReal, big_from_f64};
use crate::core::data::complex::Complex;
use crate::core::data::plane_point::PlanePoint;
use crate::core::fractals::mandelbrot::precision::{PrecisionMode, arbitrary_precision_bits};
use thiserror::Error;

/// Plane width visible across the larger frame dimension at zoom 1.
pub const RE_SPAN: f64 = 4.0;
/// Plane height visible across the larger frame dimension at zoom 1.
pub const IM_SPAN: f64 = 4.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateMapsError {
    #[error("zoom {zoom} gives a non-finite pixel offset")]
    NonFiniteOffset { zoom: f64 },
    #[error("view at zoom {zoom} reaches past the largest representable coordinate")]
    OutsidePlane { zoom: f64 },
}

/// Offset of pixel column `x` from the center column, in plane units.
#[must_use]
pub fn column_offset(x: f64, width: u32, height: u32, zoom: f64) -> f64 {
    (x - f64::from(width / 2)) * RE_SPAN / (zoom * scale_extent(width, height))
}

/// Offset of pixel row `y` from the center row, in plane units. Screen down
/// is decreasing imaginary part.
#[must_use]
pub fn row_offset(y: f64, width: u32, height: u32, zoom: f64) -> f64 {
    -(y - f64::from(height / 2)) * IM_SPAN / (zoom * scale_extent(width, height))
}

/// `(x, y)` to a standard-precision plane coordinate around `center`.
#[must_use]
pub fn xy_to_complex(x: f64, y: f64, width: u32, height: u32, center: Complex, zoom: f64) -> Complex {
    Complex::new(
        center.real + column_offset(x, width, height, zoom),
        center.imag + row_offset(y, width, height, zoom),
    )
}

fn scale_extent(width: u32, height: u32) -> f64 {
    f64::from(width.max(height).max(1))
}

/// One pixel's coordinate, borrowed from the maps.
#[derive(Debug)]
pub enum PlaneSample<'a> {
    Standard(Complex),
    Arbitrary {
        real: &'a BigReal,
        imag: &'a BigReal,
        precision_bits: usize,
    },
}

#[derive(Debug, Clone)]
pub enum CoordinateMaps {
    Standard {
        real_per_column: Vec<f64>,
        imag_per_row: Vec<f64>,
    },
    Arbitrary {
        real_per_column: Vec<BigReal>,
        imag_per_row: Vec<BigReal>,
        precision_bits: usize,
    },
}

impl CoordinateMaps {
    pub fn build(
        width: u32,
        height: u32,
        center: &PlanePoint,
        zoom: f64,
        precision: PrecisionMode,
        max_iterations: u32,
    ) -> Result<Self, CoordinateMapsError> {
        let column_offsets = (0..width)
            .map(|x| column_offset(f64::from(x), width, height, zoom))
            .collect::<Vec<_>>();
        let row_offsets = (0..height)
            .map(|y| row_offset(f64::from(y), width, height, zoom))
            .collect::<Vec<_>>();

        if column_offsets.iter().chain(&row_offsets).any(|o| !o.is_finite()) {
            return Err(CoordinateMapsError::NonFiniteOffset { zoom });
        }

        let approx = center.to_complex();
        if column_offsets.iter().any(|o| !(approx.real + o).is_finite())
            || row_offsets.iter().any(|o| !(approx.imag + o).is_finite())
        {
            return Err(CoordinateMapsError::OutsidePlane { zoom });
        }

        match precision {
            PrecisionMode::Standard => {
                let center = approx;

                Ok(Self::Standard {
                    real_per_column: column_offsets.iter().map(|o| center.real + o).collect(),
                    imag_per_row: row_offsets.iter().map(|o| center.imag + o).collect(),
                })
            }
            PrecisionMode::Arbitrary => {
                let precision_bits = arbitrary_precision_bits(
                    RE_SPAN.max(IM_SPAN),
                    zoom,
                    width.max(height),
                    max_iterations,
                    approx.magnitude(),
                );
                let (center_real, center_imag) = center.components_with_precision(precision_bits);
                let shift = |base: &BigReal, offsets: &[f64]| {
                    offsets
                        .iter()
                        .map(|&offset| {
                            big_from_f64(offset, precision_bits)
                                .map(|offset| base + &offset)
                                .ok_or(CoordinateMapsError::NonFiniteOffset { zoom })
                        })
                        .collect::<Result<Vec<_>, _>>()
                };

                Ok(Self::Arbitrary {
                    real_per_column: shift(&center_real, &column_offsets)?,
                    imag_per_row: shift(&center_imag, &row_offsets)?,
                    precision_bits,
                })
            }
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        match self {
            Self::Standard {
                real_per_column, ..
            } => real_per_column.len() as u32,
            Self::Arbitrary {
                real_per_column, ..
            } => real_per_column.len() as u32,
        }
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        match self {
            Self::Standard { imag_per_row, .. } => imag_per_row.len() as u32,
            Self::Arbitrary { imag_per_row, .. } => imag_per_row.len() as u32,
        }
    }

    #[must_use]
    pub fn precision_mode(&self) -> PrecisionMode {
        match self {
            Self::Standard { .. } => PrecisionMode::Standard,
            Self::Arbitrary { .. } => PrecisionMode::Arbitrary,
        }
    }

    #[must_use]
    pub fn sample(&self, x: u32, y: u32) -> Option<PlaneSample<'_>> {
        let (x, y) = (x as usize, y as usize);

        match self {
            Self::Standard {
                real_per_column,
                imag_per_row,
            } => Some(PlaneSample::Standard(Complex::new(
                *real_per_column.get(x)?,
                *imag_per_row.get(y)?,
            ))),
            Self::Arbitrary {
                real_per_column,
                imag_per_row,
                precision_bits,
            } => Some(PlaneSample::Arbitrary {
                real: real_per_column.get(x)?,
                imag: imag_per_row.get(y)?,
                precision_bits: *precision_bits,
            }),
        }
    }
}
