use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use thiserror::Error;

pub const CANCEL_CHECK_INTERVAL_PIXELS: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation cancelled")]
pub struct Cancelled;

pub trait CancelToken: Send + Sync {
    fn is_cancelled(&self) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

impl CancelToken for NeverCancel {
    #[inline]
    fn is_cancelled(&self) -> bool {
        false
    }
}

impl<F> CancelToken for F
where
    F: Fn() -> bool + Send + Sync,
{
    #[inline]
    fn is_cancelled(&self) -> bool {
        self()
    }
}

/// Cancellation for one render generation.
///
/// Cancelled once the shared counter moves past `generation`, or once any
/// work item of the generation has aborted it after a fault.
#[derive(Debug, Clone)]
pub struct GenerationToken {
    generation: u64,
    current: Arc<AtomicU64>,
    aborted: Arc<AtomicBool>,
}

impl GenerationToken {
    #[must_use]
    pub fn new(generation: u64, current: Arc<AtomicU64>) -> Self {
        Self {
            generation,
            current,
            aborted: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Stops the remaining items of this generation only.
    pub fn abort(&self) {
        self.aborted.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::Acquire)
    }
}

impl CancelToken for GenerationToken {
    #[inline]
    fn is_cancelled(&self) -> bool {
        self.aborted.load(Ordering::Relaxed)
            || self.current.load(Ordering::Relaxed) != self.generation
    }
}
