mod config;
mod controllers;
mod core;
mod presenters;
mod storage;

pub use config::{
    ConfigError, DEFAULT_MAX_ITERATIONS, DEFAULT_PASSES, DEFAULT_RESIZE_DEBOUNCE, RenderConfig,
};
pub use controllers::interactive::data::frame_data::FrameData;
pub use controllers::interactive::data::render_request::RenderRequest;
pub use controllers::interactive::errors::render_error::RenderError;
pub use controllers::interactive::events::render_event::RenderEvent;
pub use controllers::interactive::ports::presenter_port::PresenterPort;
pub use controllers::interactive::scheduler::RenderScheduler;
pub use controllers::interactive::worker_pool::WorkerPoolError;
pub use controllers::viewport::location::{Location, LocationParseError};
pub use controllers::viewport::state::ViewportState;
pub use controllers::viewport::viewport::{Viewport, ViewportError};
pub use crate::core::actions::cancellation::NeverCancel;
pub use crate::core::actions::generate_fractal::evaluate_work_item::evaluate_work_item;
pub use crate::core::actions::generate_fractal::ports::fractal_algorithm::FractalAlgorithm;
pub use crate::core::actions::paint_cells::paint_cells::paint_cells;
pub use crate::core::actions::paint_cells::ports::colour_map::ColourMap;
pub use crate::core::actions::partition_passes::{MAX_PASSES, Pass, WorkItem, partition_passes};
pub use crate::core::data::colour::Colour;
pub use crate::core::data::complex::Complex;
pub use crate::core::data::frame_buffer::{FrameBuffer, FrameBufferError};
pub use crate::core::data::pixel_rect::PixelRect;
pub use crate::core::data::plane_point::{PlanePoint, PlanePointError};
pub use crate::core::data::point::Point;
pub use crate::core::fractals::mandelbrot::algorithm::{
    EscapeTimeError, EscapeTimeEvaluator, EscapeTimeKernel, Smoothing,
};
pub use crate::core::fractals::mandelbrot::colour_map::TriangleWaveColourMap;
pub use crate::core::fractals::mandelbrot::precision::PrecisionMode;
pub use crate::core::util::coordinate_maps::{CoordinateMaps, CoordinateMapsError};
pub use presenters::file::ppm::{PpmFilePresenter, PpmOutcome, PpmPresenterError};
pub use storage::write_ppm::write_ppm;
