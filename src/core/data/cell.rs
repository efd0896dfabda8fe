use crate::core::data::pixel_rect::{PixelRect, PixelRectError};
use crate::core::data::point::Point;

/// One evaluated lattice point. Paints the `pitch`-sized block whose top-left
/// corner is `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub x: u32,
    pub y: u32,
    pub escape_count: f64,
    pub pitch: u32,
}

impl Cell {
    /// Unclipped block this cell paints.
    pub fn block(&self) -> Result<PixelRect, PixelRectError> {
        PixelRect::from_origin_size(
            Point {
                x: self.x as i32,
                y: self.y as i32,
            },
            self.pitch,
            self.pitch,
        )
    }
}
