use std::sync::Arc;

use crate::config::RenderConfig;
use crate::controllers::viewport::state::ViewportState;
use crate::core::fractals::mandelbrot::algorithm::EscapeTimeEvaluator;
use crate::core::fractals::mandelbrot::colour_map::TriangleWaveColourMap;
use crate::core::util::coordinate_maps::{CoordinateMaps, CoordinateMapsError};

/// Immutable snapshot of everything one render generation needs.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub viewport: ViewportState,
    pub maps: Arc<CoordinateMaps>,
    pub evaluator: EscapeTimeEvaluator,
    pub colour_map: TriangleWaveColourMap,
    pub passes: u32,
}

impl RenderRequest {
    /// Builds the request for `state`, or `None` when the view has no area.
    pub fn from_state(
        state: &ViewportState,
        config: &RenderConfig,
    ) -> Result<Option<Self>, CoordinateMapsError> {
        if !state.has_area() {
            return Ok(None);
        }

        let maps = CoordinateMaps::build(
            state.width,
            state.height,
            &state.center,
            state.zoom,
            state.precision,
            state.max_iterations,
        )?;

        Ok(Some(Self {
            viewport: state.clone(),
            maps: Arc::new(maps),
            evaluator: EscapeTimeEvaluator::new(state.max_iterations, config.smoothing()),
            colour_map: TriangleWaveColourMap::new(state.max_iterations),
            passes: config.passes(),
        }))
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.viewport.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.viewport.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_area_has_no_request() {
        let state = ViewportState::new(100);

        assert!(RenderRequest::from_state(&state, &RenderConfig::default())
            .unwrap()
            .is_none());
    }

    #[test]
    fn request_carries_snapshot_and_maps() {
        let mut state = ViewportState::new(100);
        state.width = 8;
        state.height = 4;
        let config = RenderConfig::default().with_passes(3).unwrap();

        let request = RenderRequest::from_state(&state, &config).unwrap().unwrap();

        assert_eq!(request.width(), 8);
        assert_eq!(request.height(), 4);
        assert_eq!(request.maps.width(), 8);
        assert_eq!(request.maps.height(), 4);
        assert_eq!(request.evaluator.max_iterations(), 100);
        assert_eq!(request.passes, 3);
        assert_eq!(request.viewport, state);
    }
}
