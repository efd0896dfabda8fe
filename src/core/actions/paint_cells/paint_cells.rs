use crate::core::actions::paint_cells::ports::colour_map::ColourMap;
use crate::core::data::cell::Cell;
use crate::core::data::colour::Colour;
use crate::core::data::frame_buffer::FrameBuffer;
use crate::core::data::pixel_rect::PixelRect;

/// Paints each cell's block into `frame` in the colour of its escape count.
///
/// Blocks are clipped to the frame. `on_paint` receives every clipped block
/// that was written, in the order written. Returns the number of blocks
/// painted.
pub fn paint_cells<CMap, F>(
    frame: &mut FrameBuffer,
    cells: &[Cell],
    colour_map: &CMap,
    mut on_paint: F,
) -> Result<usize, CMap::Failure>
where
    CMap: ColourMap<T = f64>,
    F: FnMut(PixelRect, Colour),
{
    let mut painted = 0;

    for cell in cells {
        let colour = colour_map.map(cell.escape_count)?;

        // Cells produced by the partitioner always have a positive pitch.
        let Ok(block) = cell.block() else {
            continue;
        };

        if let Some(clipped) = frame.fill_rect(block, colour) {
            on_paint(clipped, colour);
            painted += 1;
        }
    }

    Ok(painted)
}
