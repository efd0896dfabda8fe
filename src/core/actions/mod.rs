pub mod cancellation;
pub mod generate_fractal;
pub mod paint_cells;
pub mod partition_passes;
