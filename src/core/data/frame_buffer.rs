use crate::core::data::colour::Colour;
use crate::core::data::pixel_rect::PixelRect;
use crate::core::data::point::Point;
use thiserror::Error;

const BYTES_PER_PIXEL: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameBufferError {
    #[error("frame size must be positive: {width}x{height}")]
    EmptyFrame { width: u32, height: u32 },
    #[error("pixel at x:{}, y:{} is outside the {width}x{height} frame", .pixel.x, .pixel.y)]
    PixelOutsideBounds { pixel: Point, width: u32, height: u32 },
}

/// RGB pixel grid the compositor paints into. Row-major, 3 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    bounds: PixelRect,
    buffer: Vec<u8>,
}

impl FrameBuffer {
    /// A black frame of the given size.
    pub fn new(width: u32, height: u32) -> Result<Self, FrameBufferError> {
        let bounds = PixelRect::from_origin_size(Point { x: 0, y: 0 }, width, height)
            .map_err(|_| FrameBufferError::EmptyFrame { width, height })?;

        Ok(Self {
            bounds,
            buffer: vec![0; width as usize * height as usize * BYTES_PER_PIXEL],
        })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.bounds.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.bounds.height()
    }

    #[must_use]
    pub fn bounds(&self) -> PixelRect {
        self.bounds
    }

    #[must_use]
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn pixel(&self, pixel: Point) -> Result<Colour, FrameBufferError> {
        let index = self.index_of(pixel)?;

        Ok(Colour {
            r: self.buffer[index],
            g: self.buffer[index + 1],
            b: self.buffer[index + 2],
        })
    }

    pub fn set_pixel(&mut self, pixel: Point, colour: Colour) -> Result<(), FrameBufferError> {
        let index = self.index_of(pixel)?;

        self.buffer[index] = colour.r;
        self.buffer[index + 1] = colour.g;
        self.buffer[index + 2] = colour.b;

        Ok(())
    }

    /// Paints `rect` clipped to the frame and returns the painted area, or
    /// `None` when the rect lies entirely outside.
    pub fn fill_rect(&mut self, rect: PixelRect, colour: Colour) -> Option<PixelRect> {
        let clipped = self.bounds.intersect(&rect)?;
        let width = self.width() as usize;

        for y in clipped.top_left().y..=clipped.bottom_right().y {
            let row_start = y as usize * width;
            let from = (row_start + clipped.top_left().x as usize) * BYTES_PER_PIXEL;
            let to = (row_start + clipped.bottom_right().x as usize + 1) * BYTES_PER_PIXEL;

            for chunk in self.buffer[from..to].chunks_exact_mut(BYTES_PER_PIXEL) {
                chunk[0] = colour.r;
                chunk[1] = colour.g;
                chunk[2] = colour.b;
            }
        }

        Some(clipped)
    }

    pub fn clear(&mut self) {
        self.buffer.fill(0);
    }

    fn index_of(&self, pixel: Point) -> Result<usize, FrameBufferError> {
        if !self.bounds.contains_point(pixel) {
            return Err(FrameBufferError::PixelOutsideBounds {
                pixel,
                width: self.width(),
                height: self.height(),
            });
        }

        Ok((pixel.y as usize * self.width() as usize + pixel.x as usize) * BYTES_PER_PIXEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Colour = Colour { r: 255, g: 0, b: 0 };

    #[test]
    fn test_new_creates_black_buffer() {
        let frame = FrameBuffer::new(10, 10).unwrap();

        assert_eq!(frame.buffer().len(), 300);
        assert!(frame.buffer().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_new_rejects_empty_frame() {
        assert_eq!(
            FrameBuffer::new(0, 10),
            Err(FrameBufferError::EmptyFrame {
                width: 0,
                height: 10
            })
        );
    }

    #[test]
    fn test_set_and_read_pixel() {
        let mut frame = FrameBuffer::new(4, 3).unwrap();

        frame.set_pixel(Point { x: 3, y: 2 }, RED).unwrap();

        assert_eq!(frame.pixel(Point { x: 3, y: 2 }).unwrap(), RED);
        assert_eq!(&frame.buffer()[33..36], &[255, 0, 0]);
    }

    #[test]
    fn test_set_pixel_outside_bounds() {
        let mut frame = FrameBuffer::new(4, 3).unwrap();

        let result = frame.set_pixel(Point { x: 4, y: 0 }, RED);

        assert_eq!(
            result,
            Err(FrameBufferError::PixelOutsideBounds {
                pixel: Point { x: 4, y: 0 },
                width: 4,
                height: 3
            })
        );
    }

    #[test]
    fn test_fill_rect_is_clipped_to_frame() {
        let mut frame = FrameBuffer::new(5, 5).unwrap();
        let block = PixelRect::from_origin_size(Point { x: 4, y: 3 }, 4, 4).unwrap();

        let painted = frame.fill_rect(block, RED).unwrap();

        assert_eq!(painted.width(), 1);
        assert_eq!(painted.height(), 2);
        assert_eq!(frame.pixel(Point { x: 4, y: 3 }).unwrap(), RED);
        assert_eq!(frame.pixel(Point { x: 4, y: 4 }).unwrap(), RED);
        assert_eq!(frame.pixel(Point { x: 3, y: 3 }).unwrap(), Colour::BLACK);
    }

    #[test]
    fn test_fill_rect_outside_frame_paints_nothing() {
        let mut frame = FrameBuffer::new(5, 5).unwrap();
        let block = PixelRect::from_origin_size(Point { x: 8, y: 8 }, 2, 2).unwrap();

        assert_eq!(frame.fill_rect(block, RED), None);
        assert!(frame.buffer().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_clear_resets_to_black() {
        let mut frame = FrameBuffer::new(2, 2).unwrap();
        frame.fill_rect(frame.bounds(), RED);

        frame.clear();

        assert!(frame.buffer().iter().all(|&b| b == 0));
    }
}
