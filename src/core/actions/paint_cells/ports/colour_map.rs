use crate::core::data::colour::Colour;
use std::error::Error;

/// Maps an evaluated value (an escape count) to the colour painted for it.
pub trait ColourMap {
    type T;
    type Failure: Error;

    fn map(&self, value: Self::T) -> Result<Colour, Self::Failure>;
}
