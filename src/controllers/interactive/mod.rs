//! Render-generation lifecycle.
//!
//! A [`scheduler::RenderScheduler`] turns published render requests into
//! generations: it partitions them into progressive passes, runs the items on
//! a persistent [`worker_pool::WorkerPool`] and composites the results in
//! pass order onto a [`ports::presenter_port::PresenterPort`].

pub mod compositor;
pub mod data;
pub mod debouncer;
pub mod errors;
pub mod events;
pub mod pass_sequencer;
pub mod ports;
pub mod scheduler;
pub mod worker_pool;
