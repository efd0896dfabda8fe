use std::time::Duration;
use crate::core::data::frame_buffer::FrameBuffer;

#[derive(Debug, Clone)]
pub struct FrameData {
    pub generation: u64,
    pub frame: FrameBuffer,
    pub render_duration: Duration,
}
