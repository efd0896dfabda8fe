pub mod frame_data;
pub mod render_request;
pub mod render_result;
