use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{debug, info};
use thiserror::Error;

use crate::controllers::interactive::errors::render_error::RenderError;
use crate::controllers::interactive::events::render_event::RenderEvent;
use crate::controllers::interactive::ports::presenter_port::PresenterPort;
use crate::core::data::colour::Colour;
use crate::core::data::pixel_rect::PixelRect;
use crate::storage::write_ppm::write_ppm;

#[derive(Debug, Error)]
pub enum PpmPresenterError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Generation written, or why nothing was.
pub type PpmOutcome = Result<u64, PpmPresenterError>;

/// Headless presentation surface. Writes each completed frame to a PPM file
/// and forwards the outcome of every generation.
pub struct PpmFilePresenter {
    filepath: PathBuf,
    outcomes: Sender<PpmOutcome>,
    blocks: AtomicUsize,
}

impl PpmFilePresenter {
    pub fn new(filepath: impl AsRef<Path>) -> (Self, Receiver<PpmOutcome>) {
        let (outcomes, receiver) = unbounded();
        let presenter = Self {
            filepath: filepath.as_ref().to_path_buf(),
            outcomes,
            blocks: AtomicUsize::new(0),
        };

        (presenter, receiver)
    }

    #[must_use]
    pub fn filepath(&self) -> &Path {
        &self.filepath
    }
}

impl PresenterPort for PpmFilePresenter {
    fn fill_rect(&self, _: PixelRect, _: Colour) {
        self.blocks.fetch_add(1, Ordering::Relaxed);
    }

    fn present(&self) {
        let blocks = self.blocks.swap(0, Ordering::Relaxed);
        debug!("presented {} blocks", blocks);
    }

    fn report(&self, event: RenderEvent) {
        let outcome = match event {
            RenderEvent::Completed(frame) => write_ppm(&frame.frame, &self.filepath)
                .map(|()| {
                    info!(
                        "wrote generation {} to {} ({:?})",
                        frame.generation,
                        self.filepath.display(),
                        frame.render_duration
                    );
                    frame.generation
                })
                .map_err(|source| PpmPresenterError::Write {
                    path: self.filepath.clone(),
                    source,
                }),
            RenderEvent::Failed(error) => Err(error.into()),
        };

        let _ = self.outcomes.send(outcome);
    }
}
