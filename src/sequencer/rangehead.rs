// Rangehead snapper - Computes valid positions for the trailing marker

use crate::sequencer::cell::RhythmCell;
use crate::sequencer::timeline::{MusicalTime, SUBBEATS_PER_BAR};

/// Number of choices offered by the grid picker (16 subbeats + closing bar line)
pub const SNAP_POINT_COUNT: usize = SUBBEATS_PER_BAR as usize + 1;

/// One choice of the rangehead grid picker
#[derive(Debug, Clone, PartialEq)]
pub struct SnapPoint {
    /// Position in bars
    pub position: f64,
    /// Label formatted as `bar[.beat[.subbeat]]`
    pub label: String,
}

/// End of the last cell, or 0 for an empty timeline
pub fn snap_to_last_cell(cells: &[RhythmCell]) -> f64 {
    cells.iter().map(RhythmCell::end).fold(0.0, f64::max)
}

/// Enumerate the subbeat grid of the bar that brackets `position`
///
/// Covers `floor(position)` through `floor(position) + 1.0` inclusive.
pub fn snap_to_grid(position: f64) -> Vec<SnapPoint> {
    let floor = if position.is_finite() {
        position.max(0.0).floor()
    } else {
        0.0
    };
    // Saturating cast: bars past u64::MAX share the last label
    let bar_index = floor as u64;

    (0..SNAP_POINT_COUNT as u32)
        .map(|k| {
            let time = MusicalTime::in_bar(bar_index, k);
            SnapPoint {
                position: floor + k as f64 / SUBBEATS_PER_BAR as f64,
                label: time.label(),
            }
        })
        .collect()
}
