#[allow(clippy::module_inception)]
pub mod paint_cells;
pub mod ports;
