pub mod big_real;
pub mod cell;
pub mod colour;
pub mod complex;
pub mod frame_buffer;
pub mod pixel_rect;
pub mod plane_point;
pub mod point;
