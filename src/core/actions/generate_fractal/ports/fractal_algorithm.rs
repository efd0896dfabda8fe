use std::error::Error;
use crate::core::data::point::Point;

/// Per-pixel evaluation. Implementations are shared by every worker of a
/// generation.
pub trait FractalAlgorithm: Send + Sync {
    type Success;
    type Failure: Error;

    fn compute(&self, pixel: Point) -> Result<Self::Success, Self::Failure>;
}
