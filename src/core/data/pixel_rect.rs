use crate::core::data::point::Point;
use thiserror::Error;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum PixelRectError {
    #[error("pixel rect size must be positive: {width}x{height}")]
    InvalidSize { width: i64, height: i64 },
}

/// Inclusive pixel rectangle. Both corners are part of the rect, so a
/// single pixel has `top_left == bottom_right`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PixelRect {
    top_left: Point,
    bottom_right: Point,
}

impl PixelRect {
    pub fn new(top_left: Point, bottom_right: Point) -> Result<Self, PixelRectError> {
        let width = (bottom_right.x as i64) - (top_left.x as i64) + 1;
        let height = (bottom_right.y as i64) - (top_left.y as i64) + 1;

        if width < 1 || height < 1 {
            return Err(PixelRectError::InvalidSize { width, height });
        }

        Ok(Self {
            top_left,
            bottom_right,
        })
    }

    pub fn from_origin_size(origin: Point, width: u32, height: u32) -> Result<Self, PixelRectError> {
        if width == 0 || height == 0 || width > i32::MAX as u32 || height > i32::MAX as u32 {
            return Err(PixelRectError::InvalidSize {
                width: width as i64,
                height: height as i64,
            });
        }

        Self::new(
            origin,
            Point {
                x: origin.x.saturating_add(width as i32 - 1),
                y: origin.y.saturating_add(height as i32 - 1),
            },
        )
    }

    #[must_use]
    pub fn top_left(&self) -> Point {
        self.top_left
    }

    #[must_use]
    pub fn bottom_right(&self) -> Point {
        self.bottom_right
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        (self.bottom_right.x as i64 - self.top_left.x as i64 + 1) as u32
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        (self.bottom_right.y as i64 - self.top_left.y as i64 + 1) as u32
    }

    #[must_use]
    pub fn contains_point(&self, point: Point) -> bool {
        self.top_left.x <= point.x
            && self.top_left.y <= point.y
            && self.bottom_right.x >= point.x
            && self.bottom_right.y >= point.y
    }

    #[must_use]
    pub fn size(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    /// The overlap of two rects, or `None` when they are disjoint.
    #[must_use]
    pub fn intersect(&self, other: &PixelRect) -> Option<PixelRect> {
        let top_left = Point {
            x: self.top_left.x.max(other.top_left.x),
            y: self.top_left.y.max(other.top_left.y),
        };
        let bottom_right = Point {
            x: self.bottom_right.x.min(other.bottom_right.x),
            y: self.bottom_right.y.min(other.bottom_right.y),
        };

        PixelRect::new(top_left, bottom_right).ok()
    }
}
