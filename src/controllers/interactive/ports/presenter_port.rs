use crate::controllers::interactive::events::render_event::RenderEvent;
use crate::core::data::colour::Colour;
use crate::core::data::pixel_rect::PixelRect;

/// Presentation surface driven by the render coordinator thread.
pub trait PresenterPort: Send + Sync {
    /// A block of the frame changed colour. Already clipped to the frame.
    fn fill_rect(&self, rect: PixelRect, colour: Colour);

    /// Show everything filled so far.
    fn present(&self);

    fn report(&self, event: RenderEvent);
}
