use std::convert::Infallible;

use crate::core::actions::paint_cells::ports::colour_map::ColourMap;
use crate::core::data::colour::Colour;

/// Periods of the red, green and blue triangle waves, in iterations.
pub const CHANNEL_PERIODS: [f64; 3] = [30.0, 100.0, 400.0];

/// Three triangle waves over the escape count, one per channel. Counts above
/// `max_iterations` are inside the set and map to black.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriangleWaveColourMap {
    max_iterations: u32,
}

impl TriangleWaveColourMap {
    #[must_use]
    pub fn new(max_iterations: u32) -> Self {
        Self { max_iterations }
    }
}

impl ColourMap for TriangleWaveColourMap {
    type T = f64;
    type Failure = Infallible;

    fn map(&self, value: f64) -> Result<Colour, Self::Failure> {
        if value > f64::from(self.max_iterations) {
            return Ok(Colour::BLACK);
        }

        let [r, g, b] = CHANNEL_PERIODS.map(|period| channel(triangle(value, period)));

        Ok(Colour { r, g, b })
    }
}

/// Triangle wave in `[0, 1]` with the given period.
#[must_use]
pub fn triangle(x: f64, period: f64) -> f64 {
    let phase = x / period;

    2.0 * (phase - phase.round()).abs()
}

fn channel(t: f64) -> u8 {
    (t * 255.0).floor().clamp(0.0, 255.0) as u8
}
