//! Engine configuration.

use std::time::Duration;

use crate::core::actions::partition_passes::MAX_PASSES;
use crate::core::fractals::mandelbrot::algorithm::Smoothing;
use thiserror::Error;

pub const DEFAULT_PASSES: u32 = 6;
pub const DEFAULT_RESIZE_DEBOUNCE: Duration = Duration::from_millis(100);
pub const DEFAULT_MAX_ITERATIONS: u32 = 500;
const FALLBACK_WORKERS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("pass count must be between 1 and {max}, got {passes}")]
    PassesOutOfRange { passes: u32, max: u32 },
    #[error("worker count must be at least 1")]
    NoWorkers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    passes: u32,
    workers: usize,
    resize_debounce: Duration,
    initial_max_iterations: u32,
    smoothing: Smoothing,
}

impl Default for RenderConfig {
    fn default() -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(FALLBACK_WORKERS);

        Self {
            passes: DEFAULT_PASSES,
            workers,
            resize_debounce: DEFAULT_RESIZE_DEBOUNCE,
            initial_max_iterations: DEFAULT_MAX_ITERATIONS,
            smoothing: Smoothing::default(),
        }
    }
}

impl RenderConfig {
    pub fn with_passes(mut self, passes: u32) -> Result<Self, ConfigError> {
        if !(1..=MAX_PASSES).contains(&passes) {
            return Err(ConfigError::PassesOutOfRange {
                passes,
                max: MAX_PASSES,
            });
        }

        self.passes = passes;
        Ok(self)
    }

    pub fn with_workers(mut self, workers: usize) -> Result<Self, ConfigError> {
        if workers == 0 {
            return Err(ConfigError::NoWorkers);
        }

        self.workers = workers;
        Ok(self)
    }

    #[must_use]
    pub fn with_resize_debounce(mut self, resize_debounce: Duration) -> Self {
        self.resize_debounce = resize_debounce;
        self
    }

    #[must_use]
    pub fn with_initial_max_iterations(mut self, max_iterations: u32) -> Self {
        self.initial_max_iterations = max_iterations;
        self
    }

    #[must_use]
    pub fn with_smoothing(mut self, smoothing: Smoothing) -> Self {
        self.smoothing = smoothing;
        self
    }

    #[must_use]
    pub fn passes(&self) -> u32 {
        self.passes
    }

    #[must_use]
    pub fn workers(&self) -> usize {
        self.workers
    }

    #[must_use]
    pub fn resize_debounce(&self) -> Duration {
        self.resize_debounce
    }

    #[must_use]
    pub fn initial_max_iterations(&self) -> u32 {
        self.initial_max_iterations
    }

    #[must_use]
    pub fn smoothing(&self) -> Smoothing {
        self.smoothing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RenderConfig::default();

        assert_eq!(config.passes(), 6);
        assert!(config.workers() >= 1);
        assert_eq!(config.resize_debounce(), Duration::from_millis(100));
        assert_eq!(config.initial_max_iterations(), 500);
        assert_eq!(config.smoothing(), Smoothing::Smooth);
    }

    #[test]
    fn pass_count_is_validated() {
        assert_eq!(
            RenderConfig::default().with_passes(0),
            Err(ConfigError::PassesOutOfRange { passes: 0, max: 12 })
        );
        assert!(RenderConfig::default().with_passes(13).is_err());
        assert_eq!(RenderConfig::default().with_passes(12).unwrap().passes(), 12);
    }

    #[test]
    fn worker_count_is_validated() {
        assert_eq!(
            RenderConfig::default().with_workers(0),
            Err(ConfigError::NoWorkers)
        );
        assert_eq!(RenderConfig::default().with_workers(3).unwrap().workers(), 3);
    }
}
