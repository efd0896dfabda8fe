use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, bounded, select, unbounded};
use log::{debug, info, warn};

use crate::controllers::interactive::compositor::Compositor;
use crate::controllers::interactive::data::frame_data::FrameData;
use crate::controllers::interactive::data::render_request::RenderRequest;
use crate::controllers::interactive::data::render_result::ItemOutcome;
use crate::controllers::interactive::debouncer::Debouncer;
use crate::controllers::interactive::errors::render_error::RenderError;
use crate::controllers::interactive::events::render_event::RenderEvent;
use crate::controllers::interactive::pass_sequencer::PassSequencer;
use crate::controllers::interactive::ports::presenter_port::PresenterPort;
use crate::controllers::interactive::worker_pool::{WorkerPool, WorkerPoolError};
use crate::core::actions::cancellation::GenerationToken;
use crate::core::actions::partition_passes::partition_passes;

struct SharedState {
    generation: Arc<AtomicU64>,
    last_completed_generation: AtomicU64,
    latest_request: Mutex<Option<Arc<RenderRequest>>>,
    pending: Mutex<Option<(u64, Arc<RenderRequest>)>>,
    refresh_requested: AtomicBool,
    shutdown: AtomicBool,
    wake: Sender<()>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SharedState {
    /// Opens a new generation for the latest published request.
    fn start_latest(&self) -> u64 {
        let latest = lock(&self.latest_request).clone();

        // Held across the increment so pending slots are written in
        // generation order.
        let mut pending = lock(&self.pending);
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *pending = latest.map(|request| (generation, request));
        drop(pending);

        self.notify();
        generation
    }

    fn cancel(&self) -> u64 {
        let mut pending = lock(&self.pending);
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *pending = None;
        drop(pending);

        self.notify();
        generation
    }

    fn notify(&self) {
        // A full slot already guarantees a wake-up.
        let _ = self.wake.try_send(());
    }
}

/// Owns the render-generation lifecycle.
///
/// Callers publish request snapshots and trigger generations; a coordinator
/// thread partitions each generation into passes, feeds the worker pool and
/// composites results in pass order. Starting a generation cancels the
/// previous one without waiting for its workers.
pub struct RenderScheduler {
    shared: Arc<SharedState>,
    debouncer: Debouncer,
    coordinator: Option<JoinHandle<()>>,
}

impl RenderScheduler {
    pub fn new(
        presenter_port: Arc<dyn PresenterPort>,
        workers: usize,
    ) -> Result<Self, WorkerPoolError> {
        let pool = WorkerPool::new(workers)?;
        let (wake, wake_receiver) = bounded(1);
        let (results, results_receiver) = unbounded();

        let shared = Arc::new(SharedState {
            generation: Arc::new(AtomicU64::new(0)),
            last_completed_generation: AtomicU64::new(0),
            latest_request: Mutex::new(None),
            pending: Mutex::new(None),
            refresh_requested: AtomicBool::new(false),
            shutdown: AtomicBool::new(false),
            wake,
        });

        let coordinator = Coordinator {
            shared: Arc::clone(&shared),
            presenter_port,
            pool,
            compositor: Compositor::new(),
            results,
            active: None,
        };
        let coordinator = thread::spawn(move || {
            coordinator.run(&wake_receiver, &results_receiver);
        });

        let debounce_shared = Arc::clone(&shared);
        let debouncer = Debouncer::new(move || {
            if debounce_shared.shutdown.load(Ordering::Acquire) {
                return;
            }

            let generation = debounce_shared.start_latest();
            debug!("debounced redraw started generation {}", generation);
        });

        info!("render scheduler started with {} workers", workers);

        Ok(Self {
            shared,
            debouncer,
            coordinator: Some(coordinator),
        })
    }

    /// Replaces the snapshot the next generation renders. `None` means there
    /// is nothing to render.
    pub fn publish(&self, request: Option<Arc<RenderRequest>>) {
        *lock(&self.shared.latest_request) = request;
    }

    /// Starts a new generation from the latest snapshot and returns its id.
    /// Does not wait for the previous generation's workers.
    pub fn redraw(&self) -> u64 {
        self.shared.start_latest()
    }

    /// Starts a generation after `delay` without further calls. Each call
    /// restarts the delay.
    pub fn redraw_delayed(&self, delay: Duration) {
        self.debouncer.schedule(delay);
    }

    /// Stops the active generation and any pending delayed redraw.
    pub fn cancel(&self) -> u64 {
        self.debouncer.cancel();
        self.shared.cancel()
    }

    /// Re-presents the current frame through the coordinator.
    pub fn refresh(&self) {
        self.shared.refresh_requested.store(true, Ordering::Release);
        self.shared.notify();
    }

    pub fn shutdown(&mut self) {
        if self.shared.shutdown.swap(true, Ordering::AcqRel) {
            return;
        }

        self.debouncer.shutdown();
        self.shared.generation.fetch_add(1, Ordering::SeqCst);
        self.shared.notify();

        if let Some(handle) = self.coordinator.take() {
            let _ = handle.join();
        }

        info!("render scheduler stopped");
    }

    #[must_use]
    pub fn current_generation(&self) -> u64 {
        self.shared.generation.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn last_completed_generation(&self) -> u64 {
        self.shared
            .last_completed_generation
            .load(Ordering::Acquire)
    }
}

impl Drop for RenderScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

struct ActiveRender {
    request: Arc<RenderRequest>,
    sequencer: PassSequencer,
    started: Instant,
}

/// State owned by the coordinator thread. The only writer of the frame.
struct Coordinator {
    shared: Arc<SharedState>,
    presenter_port: Arc<dyn PresenterPort>,
    pool: WorkerPool,
    compositor: Compositor,
    results: Sender<ItemOutcome>,
    active: Option<ActiveRender>,
}

impl Coordinator {
    fn run(mut self, wake: &Receiver<()>, results: &Receiver<ItemOutcome>) {
        loop {
            select! {
                recv(wake) -> signal => {
                    if signal.is_err() || self.shared.shutdown.load(Ordering::Acquire) {
                        return;
                    }
                    self.on_wake();
                }
                recv(results) -> outcome => {
                    if let Ok(outcome) = outcome {
                        self.on_outcome(outcome);
                    }
                }
            }
        }
    }

    fn current_generation(&self) -> u64 {
        self.shared.generation.load(Ordering::Acquire)
    }

    fn on_wake(&mut self) {
        let current = self.current_generation();

        if let Some(active) = &self.active {
            if active.sequencer.generation() != current {
                debug!("generation {} cancelled", active.sequencer.generation());
                self.active = None;
            }
        }

        let pending = lock(&self.shared.pending).take();
        if let Some((generation, request)) = pending {
            self.start(generation, request);
        }

        if self.shared.refresh_requested.swap(false, Ordering::AcqRel) {
            self.compositor.refresh(self.presenter_port.as_ref());
        }
    }

    fn start(&mut self, generation: u64, request: Arc<RenderRequest>) {
        if generation != self.current_generation() {
            return;
        }

        if let Err(err) = self
            .compositor
            .begin(generation, request.width(), request.height())
        {
            self.fail(generation, err.to_string());
            return;
        }

        let passes = partition_passes(&request.maps, request.passes);
        let items_per_pass = passes.iter().map(|pass| pass.items.len()).collect();
        let token = GenerationToken::new(generation, Arc::clone(&self.shared.generation));

        debug!(
            "generation {}: {}x{} in {} passes, zoom {:e}, {} iterations",
            generation,
            request.width(),
            request.height(),
            passes.len(),
            request.viewport.zoom,
            request.viewport.max_iterations
        );

        self.pool
            .submit(passes, request.evaluator, &token, &self.results);

        self.active = Some(ActiveRender {
            request,
            sequencer: PassSequencer::new(generation, items_per_pass),
            started: Instant::now(),
        });
    }

    fn on_outcome(&mut self, outcome: ItemOutcome) {
        let current = self.current_generation();
        let Some(active) = self.active.as_mut() else {
            return;
        };

        if outcome.generation() != active.sequencer.generation() || outcome.generation() != current
        {
            return;
        }

        match outcome {
            ItemOutcome::Computed(result) => {
                let pass_before = active.sequencer.current_pass();
                let released = active.sequencer.accept(result);

                match self.compositor.apply(
                    &released,
                    &active.request.colour_map,
                    self.presenter_port.as_ref(),
                ) {
                    Ok(_) => {}
                    Err(never) => match never {},
                }

                for pass in pass_before..active.sequencer.current_pass() {
                    debug!(
                        "generation {}: pass {} applied",
                        active.sequencer.generation(),
                        pass
                    );
                }

                if active.sequencer.is_complete() {
                    self.complete();
                }
            }
            ItemOutcome::Failed {
                generation,
                pass,
                message,
            } => {
                debug!("generation {}: item of pass {} failed", generation, pass);
                self.fail(generation, message);
            }
        }
    }

    fn complete(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };
        let Some(frame) = self.compositor.frame() else {
            return;
        };

        let generation = active.sequencer.generation();
        let render_duration = active.started.elapsed();
        info!(
            "generation {} completed in {:?}",
            generation, render_duration
        );

        self.presenter_port
            .report(RenderEvent::Completed(FrameData {
                generation,
                frame: frame.clone(),
                render_duration,
            }));

        self.shared
            .last_completed_generation
            .store(generation, Ordering::Release);
    }

    fn fail(&mut self, generation: u64, message: String) {
        warn!("generation {} failed: {}", generation, message);
        self.active = None;

        self.presenter_port
            .report(RenderEvent::Failed(RenderError {
                generation,
                message,
            }));

        self.shared
            .last_completed_generation
            .store(generation, Ordering::Release);
    }
}
