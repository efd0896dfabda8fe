use crate::controllers::interactive::data::frame_data::FrameData;
use crate::controllers::interactive::errors::render_error::RenderError;

/// Outcome of a render generation. Cancelled generations produce no event.
#[derive(Debug, Clone)]
pub enum RenderEvent {
    Completed(FrameData),
    Failed(RenderError),
}

impl RenderEvent {
    #[must_use]
    pub fn generation(&self) -> u64 {
        match self {
            Self::Completed(frame) => frame.generation,
            Self::Failed(error) => error.generation,
        }
    }
}
