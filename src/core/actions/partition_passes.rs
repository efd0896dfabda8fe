//! Progressive decomposition of a frame into passes of decreasing pitch.
//!
//! Pass 0 evaluates every cell on the coarsest lattice. Each later pass
//! halves the pitch and evaluates only the lattice points the previous
//! passes have not visited, so the passes together cover every pixel
//! exactly once.

use std::sync::Arc;

use crate::core::util::coordinate_maps::CoordinateMaps;

pub const MAX_PASSES: u32 = 12;

/// Rows `start, start + step, ...` below `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowStride {
    pub start: u32,
    pub step: u32,
    pub end: u32,
}

impl RowStride {
    pub fn iter(&self) -> impl Iterator<Item = u32> {
        (self.start..self.end).step_by(self.step.max(1) as usize)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// One column of one pass. Immutable once built and shared with workers.
#[derive(Debug, Clone)]
pub struct WorkItem {
    pub pass: u32,
    pub column: u32,
    pub rows: RowStride,
    pub pitch: u32,
    pub maps: Arc<CoordinateMaps>,
}

#[derive(Debug, Clone)]
pub struct Pass {
    pub index: u32,
    pub pitch: u32,
    pub items: Vec<WorkItem>,
}

/// Pitch of pass `index` out of `passes`.
#[must_use]
pub fn pass_pitch(index: u32, passes: u32) -> u32 {
    1 << (passes - 1 - index)
}

/// Splits the frame described by `maps` into `passes` passes, coarsest
/// first. `passes` is clamped to `1..=MAX_PASSES`.
pub fn partition_passes(maps: &Arc<CoordinateMaps>, passes: u32) -> Vec<Pass> {
    let passes = passes.clamp(1, MAX_PASSES);
    let width = maps.width();
    let height = maps.height();

    (0..passes)
        .map(|index| {
            let pitch = pass_pitch(index, passes);

            let items = (0..width)
                .step_by(pitch as usize)
                .filter_map(|column| {
                    let rows = if index > 0 && column % (2 * pitch) == 0 {
                        // Even lattice rows of this column were visited by coarser passes.
                        RowStride {
                            start: pitch,
                            step: 2 * pitch,
                            end: height,
                        }
                    } else {
                        RowStride {
                            start: 0,
                            step: pitch,
                            end: height,
                        }
                    };

                    (!rows.is_empty()).then(|| WorkItem {
                        pass: index,
                        column,
                        rows,
                        pitch,
                        maps: Arc::clone(maps),
                    })
                })
                .collect();

            Pass {
                index,
                pitch,
                items,
            }
        })
        .collect()
}
