use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("render generation {generation} failed: {message}")]
pub struct RenderError {
    pub generation: u64,
    pub message: String,
}
