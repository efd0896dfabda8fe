use crate::core::data::plane_point::PlanePoint;
use crate::core::fractals::mandelbrot::precision::PrecisionMode;

/// Everything a render depends on. Owned by the viewport; render requests
/// carry an immutable copy.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportState {
    pub width: u32,
    pub height: u32,
    pub center: PlanePoint,
    pub zoom: f64,
    pub max_iterations: u32,
    pub precision: PrecisionMode,
}

impl ViewportState {
    /// Zero-sized view of the whole set.
    #[must_use]
    pub fn new(max_iterations: u32) -> Self {
        Self {
            width: 0,
            height: 0,
            center: PlanePoint::origin(),
            zoom: 1.0,
            max_iterations,
            precision: PrecisionMode::default(),
        }
    }

    #[must_use]
    pub fn has_area(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}
