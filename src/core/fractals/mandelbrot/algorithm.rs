use std::sync::Arc;

use crate::core::actions::generate_fractal::ports::fractal_algorithm::FractalAlgorithm;
use crate::core::data::big_real::{BigReal, big_to_f64, big_with_precision};
use crate::core::data::complex::Complex;
use crate::core::data::point::Point;
use crate::core::util::coordinate_maps::{CoordinateMaps, PlaneSample};
use thiserror::Error;

/// Escape radius of the smoothed count. Large so the logarithmic
/// interpolation has converged by the time the orbit leaves.
pub const SMOOTH_ESCAPE_RADIUS: f64 = 1e100;
pub const INTEGER_ESCAPE_RADIUS: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Smoothing {
    /// Continuous count `n + 1 - log2(ln|z| / ln R)`.
    #[default]
    Smooth,
    /// Whole iteration count `n`.
    Integer,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EscapeTimeError {
    #[error("coordinate {real} + {imag}i is not finite")]
    NonFiniteCoordinate { real: f64, imag: f64 },
    #[error("orbit magnitude became non-finite at iteration {iteration}")]
    NonFiniteMagnitude { iteration: u32 },
    #[error("pixel at x:{x}, y:{y} is outside the coordinate maps")]
    PixelOutsideMaps { x: i32, y: i32 },
}

/// Escape-time iteration of `z <- z^2 + c` from `z = 0`.
///
/// Escaped points return a count in `[1, max_iterations + 1)`; points that
/// stay bounded return [`EscapeTimeEvaluator::inside_value`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EscapeTimeEvaluator {
    max_iterations: u32,
    smoothing: Smoothing,
}

impl EscapeTimeEvaluator {
    #[must_use]
    pub fn new(max_iterations: u32, smoothing: Smoothing) -> Self {
        Self {
            max_iterations,
            smoothing,
        }
    }

    #[must_use]
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    #[must_use]
    pub fn smoothing(&self) -> Smoothing {
        self.smoothing
    }

    #[must_use]
    pub fn escape_radius(&self) -> f64 {
        match self.smoothing {
            Smoothing::Smooth => SMOOTH_ESCAPE_RADIUS,
            Smoothing::Integer => INTEGER_ESCAPE_RADIUS,
        }
    }

    /// Count reported for points that never escape.
    #[must_use]
    pub fn inside_value(&self) -> f64 {
        f64::from(self.max_iterations) + 1.0
    }

    pub fn evaluate(&self, c: Complex) -> Result<f64, EscapeTimeError> {
        if !c.is_finite() {
            return Err(EscapeTimeError::NonFiniteCoordinate {
                real: c.real,
                imag: c.imag,
            });
        }

        let radius = self.escape_radius();
        let radius_squared = radius * radius;
        let mut z = Complex::ZERO;

        for iteration in 1..=self.max_iterations {
            z = z * z + c;
            let magnitude_squared = z.magnitude_squared();

            if magnitude_squared.is_nan() {
                return Err(EscapeTimeError::NonFiniteMagnitude { iteration });
            }

            // inf compares greater, so overflow still counts as escaped
            if magnitude_squared > radius_squared {
                return Ok(self.escaped_at(iteration, z.magnitude()));
            }
        }

        Ok(self.inside_value())
    }

    /// Same iteration on binary floats carrying `precision_bits` of mantissa.
    pub fn evaluate_arbitrary(
        &self,
        real: &BigReal,
        imag: &BigReal,
        precision_bits: usize,
    ) -> Result<f64, EscapeTimeError> {
        let c_real = big_with_precision(real, precision_bits);
        let c_imag = big_with_precision(imag, precision_bits);
        let radius = self.escape_radius();
        let radius_squared = radius * radius;

        let zero = BigReal::ZERO.with_precision(precision_bits).value();
        let mut z_real = zero.clone();
        let mut z_imag = zero.clone();
        let mut real_squared = zero.clone();
        let mut imag_squared = zero;

        for iteration in 1..=self.max_iterations {
            let cross = &z_real * &z_imag;
            z_real = &(&real_squared - &imag_squared) + &c_real;
            z_imag = &(&cross + &cross) + &c_imag;

            real_squared = &z_real * &z_real;
            imag_squared = &z_imag * &z_imag;
            let magnitude_squared = big_to_f64(&(&real_squared + &imag_squared));

            if magnitude_squared.is_nan() {
                return Err(EscapeTimeError::NonFiniteMagnitude { iteration });
            }

            if magnitude_squared > radius_squared {
                let z = Complex::new(big_to_f64(&z_real), big_to_f64(&z_imag));
                return Ok(self.escaped_at(iteration, z.magnitude()));
            }
        }

        Ok(self.inside_value())
    }

    fn escaped_at(&self, iteration: u32, magnitude: f64) -> f64 {
        let count = f64::from(iteration);

        match self.smoothing {
            Smoothing::Integer => count,
            Smoothing::Smooth => count + smoothing_adjustment(magnitude, self.escape_radius()),
        }
    }
}

/// `1 - log2(ln|z| / ln R)`, or 0 when the logarithm is out of domain.
#[must_use]
pub fn smoothing_adjustment(magnitude: f64, radius: f64) -> f64 {
    let ratio = magnitude.ln() / radius.ln();

    if !ratio.is_finite() || ratio <= 0.0 {
        return 0.0;
    }

    1.0 - ratio.log2()
}

/// Evaluates pixels through the coordinate maps of one render request. The
/// maps decide which arithmetic each pixel uses.
#[derive(Debug, Clone)]
pub struct EscapeTimeKernel {
    evaluator: EscapeTimeEvaluator,
    maps: Arc<CoordinateMaps>,
}

impl EscapeTimeKernel {
    #[must_use]
    pub fn new(evaluator: EscapeTimeEvaluator, maps: Arc<CoordinateMaps>) -> Self {
        Self { evaluator, maps }
    }

    #[must_use]
    pub fn evaluator(&self) -> &EscapeTimeEvaluator {
        &self.evaluator
    }

    #[must_use]
    pub fn maps(&self) -> &Arc<CoordinateMaps> {
        &self.maps
    }
}

impl FractalAlgorithm for EscapeTimeKernel {
    type Success = f64;
    type Failure = EscapeTimeError;

    fn compute(&self, pixel: Point) -> Result<Self::Success, Self::Failure> {
        let outside = EscapeTimeError::PixelOutsideMaps {
            x: pixel.x,
            y: pixel.y,
        };
        let (Ok(x), Ok(y)) = (u32::try_from(pixel.x), u32::try_from(pixel.y)) else {
            return Err(outside);
        };

        match self.maps.sample(x, y).ok_or(outside)? {
            PlaneSample::Standard(c) => self.evaluator.evaluate(c),
            PlaneSample::Arbitrary {
                real,
                imag,
                precision_bits,
            } => self.evaluator.evaluate_arbitrary(real, imag, precision_bits),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::data::big_real::big_from_f64;
    use crate::core::data::plane_point::PlanePoint;
    use crate::core::fractals::mandelbrot::precision::PrecisionMode;

    fn smooth(max_iterations: u32) -> EscapeTimeEvaluator {
        EscapeTimeEvaluator::new(max_iterations, Smoothing::Smooth)
    }

    fn integer(max_iterations: u32) -> EscapeTimeEvaluator {
        EscapeTimeEvaluator::new(max_iterations, Smoothing::Integer)
    }

    #[test]
    fn origin_never_escapes() {
        let count = smooth(100).evaluate(Complex::ZERO).unwrap();

        assert!(count > 100.0);
        assert_eq!(count, 101.0);
    }

    #[test]
    fn three_escapes_on_first_iteration_in_integer_mode() {
        for max_iterations in [1, 2, 50, 1000] {
            let count = integer(max_iterations).evaluate(Complex::new(3.0, 0.0)).unwrap();
            assert_eq!(count, 1.0);
        }
    }

    #[test]
    fn zero_max_iterations_reports_inside() {
        assert_eq!(smooth(0).evaluate(Complex::new(3.0, 0.0)).unwrap(), 1.0);
        assert_eq!(integer(0).evaluate(Complex::ZERO).unwrap(), 1.0);
    }

    #[test]
    fn counts_stay_within_bounds() {
        let max_iterations = 200;

        for evaluator in [smooth(max_iterations), integer(max_iterations)] {
            for i in -30..=30 {
                for j in -30..=30 {
                    let c = Complex::new(f64::from(i) * 0.1, f64::from(j) * 0.1);
                    let count = evaluator.evaluate(c).unwrap();

                    assert!(count >= 0.0, "{:?} gave {}", c, count);
                    assert!(count <= f64::from(max_iterations) + 1.0, "{:?} gave {}", c, count);
                }
            }
        }
    }

    #[test]
    fn huge_coordinates_escape_without_fault() {
        let count = smooth(10).evaluate(Complex::new(1e200, -1e200)).unwrap();

        assert!((0.0..2.0).contains(&count), "count {}", count);
    }

    #[test]
    fn non_finite_coordinate_is_a_fault() {
        let result = smooth(10).evaluate(Complex::new(f64::NAN, 0.0));

        assert!(matches!(
            result,
            Err(EscapeTimeError::NonFiniteCoordinate { .. })
        ));
    }

    #[test]
    fn smoothed_counts_vary_continuously() {
        let evaluator = smooth(1000);
        let mut previous = evaluator.evaluate(Complex::new(0.30, 0.0)).unwrap();

        for step in 1..=1000 {
            let c = Complex::new(0.30 + f64::from(step) * 1e-5, 0.0);
            let count = evaluator.evaluate(c).unwrap();

            assert!(
                (count - previous).abs() < 0.01,
                "jump of {} at {:?}",
                count - previous,
                c
            );
            previous = count;
        }
    }

    #[test]
    fn integer_counts_are_whole_and_step() {
        let evaluator = integer(1000);
        let counts = (0..=2000)
            .map(|step| {
                evaluator
                    .evaluate(Complex::new(0.30 + f64::from(step) * 1e-5, 0.0))
                    .unwrap()
            })
            .collect::<Vec<_>>();

        assert!(counts.iter().all(|count| count.fract() == 0.0));
        assert!(counts.windows(2).any(|pair| (pair[0] - pair[1]).abs() >= 1.0));
    }

    #[test]
    fn smoothing_adjustment_of_degenerate_input_is_zero() {
        assert_eq!(smoothing_adjustment(f64::INFINITY, SMOOTH_ESCAPE_RADIUS), 0.0);
        assert_eq!(smoothing_adjustment(0.0, SMOOTH_ESCAPE_RADIUS), 0.0);
        assert_eq!(smoothing_adjustment(0.5, SMOOTH_ESCAPE_RADIUS), 0.0);
        assert_eq!(smoothing_adjustment(f64::NAN, SMOOTH_ESCAPE_RADIUS), 0.0);
    }

    #[test]
    fn smoothing_adjustment_lies_in_unit_interval_after_escape() {
        let radius = SMOOTH_ESCAPE_RADIUS;

        assert!((smoothing_adjustment(radius, radius) - 1.0).abs() < 1e-12);
        assert!(smoothing_adjustment(radius * radius, radius).abs() < 1e-12);
    }

    #[test]
    fn arbitrary_matches_standard_at_shallow_zoom() {
        let samples = [
            Complex::new(0.3, 0.5),
            Complex::new(-1.5, 0.5),
            Complex::new(0.0, 1.2),
            Complex::new(-0.1, 0.1),
            Complex::new(3.0, 0.0),
        ];

        for evaluator in [smooth(300), integer(300)] {
            for c in samples {
                let real = big_from_f64(c.real, 128).unwrap();
                let imag = big_from_f64(c.imag, 128).unwrap();

                let standard = evaluator.evaluate(c).unwrap();
                let arbitrary = evaluator.evaluate_arbitrary(&real, &imag, 128).unwrap();

                assert!(
                    (standard - arbitrary).abs() < 1e-6,
                    "{:?}: {} vs {}",
                    c,
                    standard,
                    arbitrary
                );
            }
        }
    }

    #[test]
    fn kernel_reads_coordinates_from_maps() {
        let center = PlanePoint::from_parts(0.0, 0.0).unwrap();
        let maps =
            CoordinateMaps::build(5, 5, &center, 1.0, PrecisionMode::Standard, 50).unwrap();
        let kernel = EscapeTimeKernel::new(smooth(50), Arc::new(maps));

        assert_eq!(kernel.compute(Point { x: 2, y: 2 }).unwrap(), 51.0);
        assert!(kernel.compute(Point { x: 0, y: 0 }).unwrap() < 51.0);
    }

    #[test]
    fn kernel_uses_arbitrary_maps_when_present() {
        let center = PlanePoint::from_parts(-0.75, 0.1).unwrap();
        let standard =
            CoordinateMaps::build(6, 6, &center, 4.0, PrecisionMode::Standard, 80).unwrap();
        let arbitrary =
            CoordinateMaps::build(6, 6, &center, 4.0, PrecisionMode::Arbitrary, 80).unwrap();
        let standard = EscapeTimeKernel::new(smooth(80), Arc::new(standard));
        let arbitrary = EscapeTimeKernel::new(smooth(80), Arc::new(arbitrary));

        for (x, y) in [(0, 0), (5, 5), (1, 4)] {
            let pixel = Point { x, y };
            let a = standard.compute(pixel).unwrap();
            let b = arbitrary.compute(pixel).unwrap();
            assert!((a - b).abs() < 1e-6, "{:?}: {} vs {}", pixel, a, b);
        }
    }

    #[test]
    fn arbitrary_maps_separate_adjacent_pixels_at_deep_zoom() {
        // Just outside the cusp at 1/4 the orbit lingers ~3000 iterations, so
        // the smoothed count reacts to sub-ulp moves of c. At 1e16 zoom one
        // pixel is well under half an f64 ulp of the center.
        let center = PlanePoint::from_parts(0.250_001, 0.0).unwrap();
        let build = |precision| {
            let maps = CoordinateMaps::build(64, 1, &center, 1e16, precision, 10_000).unwrap();
            EscapeTimeKernel::new(smooth(10_000), Arc::new(maps))
        };
        let standard = build(PrecisionMode::Standard);
        let arbitrary = build(PrecisionMode::Arbitrary);
        let left = Point { x: 32, y: 0 };
        let right = Point { x: 33, y: 0 };

        assert_eq!(
            standard.compute(left).unwrap(),
            standard.compute(right).unwrap()
        );

        let (a, b) = (
            arbitrary.compute(left).unwrap(),
            arbitrary.compute(right).unwrap(),
        );
        assert!(a < 10_001.0 && b < 10_001.0, "both pixels escape: {} {}", a, b);
        assert!(a > b, "further from the set escapes sooner: {} vs {}", a, b);
    }

    #[test]
    fn kernel_rejects_pixels_outside_maps() {
        let maps = CoordinateMaps::build(
            3,
            3,
            &PlanePoint::origin(),
            1.0,
            PrecisionMode::Standard,
            10,
        )
        .unwrap();
        let kernel = EscapeTimeKernel::new(smooth(10), Arc::new(maps));

        assert_eq!(
            kernel.compute(Point { x: -1, y: 0 }),
            Err(EscapeTimeError::PixelOutsideMaps { x: -1, y: 0 })
        );
        assert_eq!(
            kernel.compute(Point { x: 0, y: 3 }),
            Err(EscapeTimeError::PixelOutsideMaps { x: 0, y: 3 })
        );
    }
}
