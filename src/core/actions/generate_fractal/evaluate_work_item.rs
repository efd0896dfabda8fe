use crate::core::actions::cancellation::{CANCEL_CHECK_INTERVAL_PIXELS, CancelToken, Cancelled};
use crate::core::actions::generate_fractal::ports::fractal_algorithm::FractalAlgorithm;
use crate::core::actions::partition_passes::WorkItem;
use crate::core::data::cell::Cell;
use crate::core::data::point::Point;
use thiserror::Error;

/// Error type for cancelable fractal generation.
///
/// Distinguishes between algorithm failures and cancellation, allowing callers
/// to handle each case appropriately (e.g., not displaying cancellation as errors).
#[derive(Debug, Error)]
pub enum GenerateFractalError<E> {
    /// The operation was cancelled before completion.
    #[error("{0}")]
    Cancelled(#[from] Cancelled),
    /// The fractal algorithm reported a failure.
    #[error("algorithm error: {0}")]
    Algorithm(E),
}

/// Evaluates every cell of one work item, in row order.
///
/// Checks for cancellation before the first cell and every
/// [`CANCEL_CHECK_INTERVAL_PIXELS`] cells after that.
pub fn evaluate_work_item<Alg, C>(
    item: &WorkItem,
    algorithm: &Alg,
    cancel: &C,
) -> Result<Vec<Cell>, GenerateFractalError<Alg::Failure>>
where
    Alg: FractalAlgorithm<Success = f64>,
    C: CancelToken,
{
    let mut cells = Vec::with_capacity(item.rows.len());

    for (i, y) in item.rows.iter().enumerate() {
        if i % CANCEL_CHECK_INTERVAL_PIXELS == 0 && cancel.is_cancelled() {
            return Err(GenerateFractalError::Cancelled(Cancelled));
        }

        let escape_count = algorithm
            .compute(Point {
                x: item.column as i32,
                y: y as i32,
            })
            .map_err(GenerateFractalError::Algorithm)?;

        cells.push(Cell {
            x: item.column,
            y,
            escape_count,
            pitch: item.pitch,
        });
    }

    Ok(cells)
}
