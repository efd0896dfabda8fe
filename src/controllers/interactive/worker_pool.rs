use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crossbeam_channel::Sender;
use log::{debug, warn};
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use thiserror::Error;

use crate::controllers::interactive::data::render_result::{ItemOutcome, RenderResult};
use crate::core::actions::cancellation::{CancelToken, GenerationToken};
use crate::core::actions::generate_fractal::evaluate_work_item::{
    GenerateFractalError, evaluate_work_item,
};
use crate::core::actions::generate_fractal::ports::fractal_algorithm::FractalAlgorithm;
use crate::core::actions::partition_passes::{Pass, WorkItem};
use crate::core::fractals::mandelbrot::algorithm::{EscapeTimeEvaluator, EscapeTimeKernel};

#[derive(Debug, Error)]
pub enum WorkerPoolError {
    #[error("worker pool needs at least one thread")]
    NoWorkers,
    #[error("failed to start worker threads: {0}")]
    Build(#[from] ThreadPoolBuildError),
}

/// Persistent pool of render workers. Lives as long as the scheduler; each
/// generation resubmits its items.
pub struct WorkerPool {
    pool: ThreadPool,
}

impl WorkerPool {
    pub fn new(workers: usize) -> Result<Self, WorkerPoolError> {
        if workers == 0 {
            return Err(WorkerPoolError::NoWorkers);
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|index| format!("render-worker-{}", index))
            .build()?;

        Ok(Self { pool })
    }

    #[must_use]
    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Queues every item of every pass, coarsest pass first. Returns
    /// immediately; outcomes arrive on `results`.
    pub fn submit(
        &self,
        passes: Vec<Pass>,
        evaluator: EscapeTimeEvaluator,
        token: &GenerationToken,
        results: &Sender<ItemOutcome>,
    ) {
        let mut submitted = 0usize;

        for pass in passes {
            for item in pass.items {
                let token = token.clone();
                let results = results.clone();

                self.pool.spawn_fifo(move || {
                    let kernel = EscapeTimeKernel::new(evaluator, Arc::clone(&item.maps));
                    run_item(&item, &kernel, &token, &results);
                });
                submitted += 1;
            }
        }

        debug!(
            "generation {}: queued {} work items",
            token.generation(),
            submitted
        );
    }
}

/// Evaluates one item and reports its outcome.
///
/// Skipped silently when the generation is already cancelled. A fault or a
/// panic aborts the rest of the generation and is reported as
/// [`ItemOutcome::Failed`].
pub(crate) fn run_item<Alg>(
    item: &WorkItem,
    algorithm: &Alg,
    token: &GenerationToken,
    results: &Sender<ItemOutcome>,
) where
    Alg: FractalAlgorithm<Success = f64>,
{
    if token.is_cancelled() {
        return;
    }

    let evaluated = panic::catch_unwind(AssertUnwindSafe(|| {
        evaluate_work_item(item, algorithm, token)
    }));

    let outcome = match evaluated {
        Ok(Ok(cells)) => ItemOutcome::Computed(RenderResult {
            generation: token.generation(),
            pass: item.pass,
            cells,
        }),
        Ok(Err(GenerateFractalError::Cancelled(_))) => return,
        Ok(Err(GenerateFractalError::Algorithm(err))) => {
            token.abort();
            ItemOutcome::Failed {
                generation: token.generation(),
                pass: item.pass,
                message: err.to_string(),
            }
        }
        Err(payload) => {
            token.abort();
            let message = panic_message(payload.as_ref());
            warn!(
                "generation {}: worker panicked on column {}: {}",
                token.generation(),
                item.column,
                message
            );
            ItemOutcome::Failed {
                generation: token.generation(),
                pass: item.pass,
                message,
            }
        }
    };

    // The receiver is gone only after shutdown.
    let _ = results.send(outcome);
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("worker panicked: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("worker panicked: {}", message)
    } else {
        "worker panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::actions::partition_passes::{RowStride, partition_passes};
    use crate::core::data::plane_point::PlanePoint;
    use crate::core::data::point::Point;
    use crate::core::fractals::mandelbrot::algorithm::{EscapeTimeError, Smoothing};
    use crate::core::fractals::mandelbrot::precision::PrecisionMode;
    use crate::core::util::coordinate_maps::CoordinateMaps;
    use crossbeam_channel::unbounded;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Duration;

    struct PanickingAlgorithm;

    impl FractalAlgorithm for PanickingAlgorithm {
        type Success = f64;
        type Failure = EscapeTimeError;

        fn compute(&self, _: Point) -> Result<f64, EscapeTimeError> {
            panic!("boom");
        }
    }

    struct FaultingAlgorithm;

    impl FractalAlgorithm for FaultingAlgorithm {
        type Success = f64;
        type Failure = EscapeTimeError;

        fn compute(&self, _: Point) -> Result<f64, EscapeTimeError> {
            Err(EscapeTimeError::NonFiniteMagnitude { iteration: 7 })
        }
    }

    fn maps(width: u32, height: u32) -> Arc<CoordinateMaps> {
        Arc::new(
            CoordinateMaps::build(
                width,
                height,
                &PlanePoint::origin(),
                1.0,
                PrecisionMode::Standard,
                20,
            )
            .unwrap(),
        )
    }

    fn single_item() -> WorkItem {
        WorkItem {
            pass: 2,
            column: 0,
            rows: RowStride {
                start: 0,
                step: 1,
                end: 3,
            },
            pitch: 1,
            maps: maps(1, 3),
        }
    }

    #[test]
    fn test_zero_workers_is_rejected() {
        assert!(matches!(WorkerPool::new(0), Err(WorkerPoolError::NoWorkers)));
    }

    #[test]
    fn test_pool_has_requested_parallelism() {
        let pool = WorkerPool::new(3).unwrap();

        assert_eq!(pool.workers(), 3);
    }

    #[test]
    fn test_submit_returns_one_result_per_item() {
        let pool = WorkerPool::new(2).unwrap();
        let maps = maps(9, 7);
        let passes = partition_passes(&maps, 3);
        let expected_items = passes.iter().map(|pass| pass.items.len()).sum::<usize>();
        let token = GenerationToken::new(1, Arc::new(AtomicU64::new(1)));
        let (sender, receiver) = unbounded();

        pool.submit(
            passes,
            EscapeTimeEvaluator::new(20, Smoothing::Smooth),
            &token,
            &sender,
        );

        let mut cells = 0;
        for _ in 0..expected_items {
            match receiver.recv_timeout(Duration::from_secs(5)).unwrap() {
                ItemOutcome::Computed(result) => {
                    assert_eq!(result.generation, 1);
                    cells += result.cells.len();
                }
                ItemOutcome::Failed { message, .. } => panic!("unexpected failure: {}", message),
            }
        }

        assert_eq!(cells, 9 * 7);
    }

    #[test]
    fn test_cancelled_generation_sends_nothing() {
        let pool = WorkerPool::new(2).unwrap();
        let maps = maps(16, 16);
        let current = Arc::new(AtomicU64::new(1));
        let token = GenerationToken::new(1, Arc::clone(&current));
        let (sender, receiver) = unbounded();

        current.fetch_add(1, Ordering::SeqCst);
        pool.submit(
            partition_passes(&maps, 4),
            EscapeTimeEvaluator::new(20, Smoothing::Smooth),
            &token,
            &sender,
        );
        drop(sender);

        assert!(receiver.recv_timeout(Duration::from_secs(2)).is_err());
    }

    #[test]
    fn test_panic_is_reported_as_failure_and_aborts_generation() {
        let token = GenerationToken::new(4, Arc::new(AtomicU64::new(4)));
        let (sender, receiver) = unbounded();

        run_item(&single_item(), &PanickingAlgorithm, &token, &sender);

        match receiver.try_recv().unwrap() {
            ItemOutcome::Failed {
                generation,
                pass,
                message,
            } => {
                assert_eq!(generation, 4);
                assert_eq!(pass, 2);
                assert_eq!(message, "worker panicked: boom");
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(token.is_aborted());
    }

    #[test]
    fn test_numeric_fault_is_reported_as_failure() {
        let token = GenerationToken::new(1, Arc::new(AtomicU64::new(1)));
        let (sender, receiver) = unbounded();

        run_item(&single_item(), &FaultingAlgorithm, &token, &sender);

        assert!(matches!(
            receiver.try_recv().unwrap(),
            ItemOutcome::Failed { .. }
        ));
        assert!(token.is_aborted());
    }

    #[test]
    fn test_aborted_generation_skips_remaining_items() {
        let token = GenerationToken::new(1, Arc::new(AtomicU64::new(1)));
        let (sender, receiver) = unbounded();

        token.abort();
        run_item(&single_item(), &FaultingAlgorithm, &token, &sender);

        assert!(receiver.try_recv().is_err());
    }
}
