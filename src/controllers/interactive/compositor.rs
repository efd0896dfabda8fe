use log::debug;

use crate::controllers::interactive::data::render_result::RenderResult;
use crate::controllers::interactive::ports::presenter_port::PresenterPort;
use crate::core::actions::paint_cells::paint_cells::paint_cells;
use crate::core::actions::paint_cells::ports::colour_map::ColourMap;
use crate::core::data::frame_buffer::{FrameBuffer, FrameBufferError};

/// Sole writer of the frame buffer. Applies result batches of the active
/// generation and mirrors every write onto the presentation surface.
#[derive(Debug, Default)]
pub struct Compositor {
    frame: Option<FrameBuffer>,
    generation: u64,
}

impl Compositor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `generation` the only one whose results are applied. The
    /// previous frame stays visible until the first pass overwrites it; it is
    /// replaced only when the size changes.
    pub fn begin(
        &mut self,
        generation: u64,
        width: u32,
        height: u32,
    ) -> Result<(), FrameBufferError> {
        let resized = self
            .frame
            .as_ref()
            .is_none_or(|frame| frame.width() != width || frame.height() != height);

        if resized {
            self.frame = Some(FrameBuffer::new(width, height)?);
        }

        self.generation = generation;
        Ok(())
    }

    #[must_use]
    pub fn frame(&self) -> Option<&FrameBuffer> {
        self.frame.as_ref()
    }

    /// Paints `batch` and presents once if anything was painted. Results of
    /// any other generation are skipped unapplied. Returns the number of
    /// blocks painted.
    pub fn apply<CMap>(
        &mut self,
        batch: &[RenderResult],
        colour_map: &CMap,
        presenter: &dyn PresenterPort,
    ) -> Result<usize, CMap::Failure>
    where
        CMap: ColourMap<T = f64>,
    {
        let Some(frame) = self.frame.as_mut() else {
            return Ok(0);
        };

        let mut painted = 0;

        for result in batch {
            if result.generation != self.generation {
                debug!(
                    "dropping {} cells of stale generation {} (active {})",
                    result.cells.len(),
                    result.generation,
                    self.generation
                );
                continue;
            }

            painted += paint_cells(frame, &result.cells, colour_map, |rect, colour| {
                presenter.fill_rect(rect, colour)
            })?;
        }

        if painted > 0 {
            presenter.present();
        }

        Ok(painted)
    }

    /// Re-presents the current frame without recomputing anything.
    pub fn refresh(&self, presenter: &dyn PresenterPort) {
        if self.frame.is_some() {
            presenter.present();
        }
    }
}
