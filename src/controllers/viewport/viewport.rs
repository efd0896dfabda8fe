use std::sync::Arc;

use log::{debug, warn};
use thiserror::Error;

use crate::config::RenderConfig;
use crate::controllers::interactive::data::render_request::RenderRequest;
use crate::controllers::interactive::ports::presenter_port::PresenterPort;
use crate::controllers::interactive::scheduler::RenderScheduler;
use crate::controllers::interactive::worker_pool::WorkerPoolError;
use crate::controllers::viewport::location::{Location, LocationParseError};
use crate::controllers::viewport::state::ViewportState;
use crate::core::data::complex::Complex;
use crate::core::data::plane_point::{PlanePoint, PlanePointError};
use crate::core::fractals::mandelbrot::precision::PrecisionMode;
use crate::core::util::coordinate_maps::{
    CoordinateMapsError, column_offset, row_offset, xy_to_complex,
};

/// Dilation ratio of one zoom-in step.
pub const ZOOM_IN_RATIO: f64 = 0.5;
/// Dilation ratio of one zoom-out step.
pub const ZOOM_OUT_RATIO: f64 = 2.0;

#[derive(Debug, Error)]
pub enum ViewportError {
    #[error("zoom must be positive and finite, got {0}")]
    InvalidZoom(f64),
    #[error("dilation ratio must be positive and finite, got {0}")]
    InvalidRatio(f64),
    #[error("invalid center: {0}")]
    Center(#[from] PlanePointError),
    #[error("invalid location: {0}")]
    Location(#[from] LocationParseError),
    #[error(transparent)]
    CoordinateMaps(#[from] CoordinateMapsError),
    #[error(transparent)]
    WorkerPool(#[from] WorkerPoolError),
}

/// View onto the Mandelbrot set: what region is shown, at which size and
/// iteration count.
///
/// Every state change is validated before it is committed; a rejected
/// command leaves the view as it was. Committed changes publish a new render
/// request and start a generation on the scheduler. No method blocks on
/// rendering.
pub struct Viewport {
    state: ViewportState,
    config: RenderConfig,
    scheduler: RenderScheduler,
    drag_origin: Option<PlanePoint>,
}

impl Viewport {
    pub fn new(
        config: RenderConfig,
        presenter_port: Arc<dyn PresenterPort>,
    ) -> Result<Self, ViewportError> {
        let scheduler = RenderScheduler::new(presenter_port, config.workers())?;

        Ok(Self {
            state: ViewportState::new(config.initial_max_iterations()),
            config,
            scheduler,
            drag_origin: None,
        })
    }

    #[must_use]
    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.state.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.state.height
    }

    #[must_use]
    pub fn center(&self) -> &PlanePoint {
        &self.state.center
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.state.zoom
    }

    #[must_use]
    pub fn max_iterations(&self) -> u32 {
        self.state.max_iterations
    }

    #[must_use]
    pub fn precision(&self) -> PrecisionMode {
        self.state.precision
    }

    #[must_use]
    pub fn current_generation(&self) -> u64 {
        self.scheduler.current_generation()
    }

    #[must_use]
    pub fn last_completed_generation(&self) -> u64 {
        self.scheduler.last_completed_generation()
    }

    /// Resizes the view. Rendering restarts once resizing has been quiet for
    /// the configured debounce; a zero dimension stops rendering until a
    /// positive size arrives.
    pub fn set_dimensions(&mut self, width: u32, height: u32) -> Result<(), ViewportError> {
        if (self.state.width, self.state.height) == (width, height) {
            return Ok(());
        }

        let next = ViewportState {
            width,
            height,
            ..self.state.clone()
        };
        self.commit(next)?;
        self.scheduler.cancel();

        if self.state.has_area() {
            self.scheduler.redraw_delayed(self.config.resize_debounce());
        } else {
            debug!("viewport has no area, rendering paused");
        }

        Ok(())
    }

    /// Host resize callback.
    pub fn on_resize(&mut self, width: u32, height: u32) -> Result<(), ViewportError> {
        self.set_dimensions(width, height)
    }

    /// Negative and unchanged counts are ignored.
    pub fn set_max_iterations(&mut self, max_iterations: i64) -> Result<(), ViewportError> {
        let Ok(max_iterations) = u32::try_from(max_iterations) else {
            warn!("ignoring iteration count {}", max_iterations);
            return Ok(());
        };

        if max_iterations == self.state.max_iterations {
            return Ok(());
        }

        let next = ViewportState {
            max_iterations,
            ..self.state.clone()
        };
        self.commit_and_redraw(next)
    }

    pub fn set_precision(&mut self, precision: PrecisionMode) -> Result<(), ViewportError> {
        if precision == self.state.precision {
            return Ok(());
        }

        let next = ViewportState {
            precision,
            ..self.state.clone()
        };
        self.commit_and_redraw(next)
    }

    /// Moves to `center` and/or `zoom`; whichever is `None` is kept.
    pub fn go_to_location(
        &mut self,
        center: Option<PlanePoint>,
        zoom: Option<f64>,
    ) -> Result<(), ViewportError> {
        if let Some(zoom) = zoom {
            if !zoom.is_finite() || zoom <= 0.0 {
                warn!("rejecting zoom {}", zoom);
                return Err(ViewportError::InvalidZoom(zoom));
            }
        }

        let next = ViewportState {
            center: center.unwrap_or_else(|| self.state.center.clone()),
            zoom: zoom.unwrap_or(self.state.zoom),
            ..self.state.clone()
        };
        self.commit_and_redraw(next)
    }

    #[must_use]
    pub fn location(&self) -> Location {
        Location {
            center: self.state.center.clone(),
            zoom: self.state.zoom,
        }
    }

    /// Parses `text` as a [`Location`] and goes there.
    pub fn go_to_saved_location(&mut self, text: &str) -> Result<(), ViewportError> {
        let location = text.parse::<Location>().inspect_err(|err| {
            warn!("rejecting saved location '{}': {}", text, err);
        })?;

        self.go_to_location(Some(location.center), Some(location.zoom))
    }

    pub fn pan_by(&mut self, delta: Complex) -> Result<(), ViewportError> {
        let center = self.state.center.offset_by(delta)?;

        self.go_to_location(Some(center), None)
    }

    /// Host pan callback. The content follows a pointer moved by `(dx, dy)`
    /// pixels.
    pub fn on_pan(&mut self, dx: f64, dy: f64) -> Result<(), ViewportError> {
        let (width, height, zoom) = (self.state.width, self.state.height, self.state.zoom);
        let delta = Complex::new(
            column_offset(f64::from(width / 2) + dx, width, height, zoom),
            row_offset(f64::from(height / 2) + dy, width, height, zoom),
        );

        self.pan_by(-delta)
    }

    /// Scales the view by `ratio` about the pixel `anchor` (the frame center
    /// when `None`). The anchor's plane coordinate stays under the anchor.
    pub fn dilate(&mut self, ratio: f64, anchor: Option<(f64, f64)>) -> Result<(), ViewportError> {
        if !ratio.is_finite() || ratio <= 0.0 {
            warn!("rejecting dilation ratio {}", ratio);
            return Err(ViewportError::InvalidRatio(ratio));
        }

        let (x, y) = anchor.unwrap_or_else(|| self.frame_center());
        let anchor = self.xy_to_plane(x, y)?;
        let center = self.state.center.dilate_about(&anchor, ratio)?;

        self.go_to_location(Some(center), Some(self.state.zoom / ratio))
    }

    pub fn zoom_in(&mut self, anchor: Option<(f64, f64)>) -> Result<(), ViewportError> {
        self.dilate(ZOOM_IN_RATIO, anchor)
    }

    pub fn zoom_out(&mut self, anchor: Option<(f64, f64)>) -> Result<(), ViewportError> {
        self.dilate(ZOOM_OUT_RATIO, anchor)
    }

    /// Host zoom callback. `factor > 1` magnifies around `(x, y)`.
    pub fn on_zoom(&mut self, factor: f64, x: f64, y: f64) -> Result<(), ViewportError> {
        if !factor.is_finite() || factor <= 0.0 {
            warn!("rejecting zoom factor {}", factor);
            return Err(ViewportError::InvalidRatio(factor));
        }

        self.dilate(1.0 / factor, Some((x, y)))
    }

    /// Whole set, centered on the origin.
    pub fn reset_zoom(&mut self) -> Result<(), ViewportError> {
        self.go_to_location(Some(PlanePoint::origin()), Some(1.0))
    }

    pub fn drag_begin(&mut self, x: f64, y: f64) -> Result<(), ViewportError> {
        self.drag_origin = Some(self.xy_to_plane(x, y)?);
        Ok(())
    }

    /// Moves the view so the point grabbed in [`Viewport::drag_begin`] ends
    /// up under `(x, y)`.
    pub fn drag_end(&mut self, x: f64, y: f64) -> Result<(), ViewportError> {
        let Some(origin) = self.drag_origin.take() else {
            return Ok(());
        };

        let delta = self.xy_to_plane(x, y)?.difference(&origin);
        if delta == Complex::ZERO {
            return Ok(());
        }

        self.pan_by(-delta)
    }

    /// Starts a full render of the current state now.
    pub fn redraw(&self) -> u64 {
        self.scheduler.redraw()
    }

    /// Re-presents the current frame without recomputing it.
    pub fn refresh(&self) {
        self.scheduler.refresh();
    }

    /// Stops rendering for good. Safe to call more than once.
    pub fn close(&mut self) {
        self.scheduler.shutdown();
    }

    /// Plane coordinate under pixel `(x, y)` in standard precision.
    #[must_use]
    pub fn xy_to_complex(&self, x: f64, y: f64) -> Complex {
        xy_to_complex(
            x,
            y,
            self.state.width,
            self.state.height,
            self.state.center.to_complex(),
            self.state.zoom,
        )
    }

    /// Plane coordinate under pixel `(x, y)` at full center precision.
    pub fn xy_to_plane(&self, x: f64, y: f64) -> Result<PlanePoint, ViewportError> {
        let (width, height, zoom) = (self.state.width, self.state.height, self.state.zoom);
        let offset = Complex::new(
            column_offset(x, width, height, zoom),
            row_offset(y, width, height, zoom),
        );

        Ok(self.state.center.offset_by(offset)?)
    }

    #[must_use]
    pub fn status_string(&self) -> String {
        let center = self.state.center.to_complex();

        format!(
            "{:.10} + {:.10}i, zoom={:.3e}, {}x{}",
            center.real, center.imag, self.state.zoom, self.state.width, self.state.height
        )
    }

    fn frame_center(&self) -> (f64, f64) {
        (
            f64::from(self.state.width / 2),
            f64::from(self.state.height / 2),
        )
    }

    fn commit(&mut self, next: ViewportState) -> Result<(), ViewportError> {
        let request = RenderRequest::from_state(&next, &self.config)?;

        self.state = next;
        self.scheduler.publish(request.map(Arc::new));
        debug!("viewport: {}", self.status_string());

        Ok(())
    }

    fn commit_and_redraw(&mut self, next: ViewportState) -> Result<(), ViewportError> {
        self.commit(next)?;
        self.scheduler.redraw();

        Ok(())
    }
}
