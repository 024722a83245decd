// Quantizer - Snaps cell positions and durations to a rhythmic grid
// Also tracks the in-progress quantize gesture so history pushes can be deferred

use crate::project::types::TimelineState;
use crate::sequencer::cell::RhythmCell;
use crate::sequencer::timeline::{BEAT, SUBBEAT};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Grid resolution used for quantization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QuantizeLevel {
    /// Whole bar (1.0)
    #[default]
    Bar,
    /// Quarter bar / beat (0.25)
    Beat,
    /// Sixteenth bar / subbeat (1/16)
    Subbeat,
}

impl QuantizeLevel {
    /// All levels, in picker order
    pub const ALL: [QuantizeLevel; 3] = [
        QuantizeLevel::Bar,
        QuantizeLevel::Beat,
        QuantizeLevel::Subbeat,
    ];

    /// Map a picker row index to a level
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Grid step in bars
    pub fn step(&self) -> f64 {
        match self {
            QuantizeLevel::Bar => 1.0,
            QuantizeLevel::Beat => BEAT,
            QuantizeLevel::Subbeat => SUBBEAT,
        }
    }

    /// Round `value` to the nearest multiple of the step (half rounds up)
    pub fn round(&self, value: f64) -> f64 {
        let step = self.step();
        (value / step + 0.5).floor() * step
    }
}

impl fmt::Display for QuantizeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantizeLevel::Bar => write!(f, "1/1"),
            QuantizeLevel::Beat => write!(f, "1/4"),
            QuantizeLevel::Subbeat => write!(f, "1/16"),
        }
    }
}

/// Quantize a single cell in place
pub fn quantize_cell(cell: &mut RhythmCell, level: QuantizeLevel) {
    let step = level.step();
    cell.set_position(level.round(cell.position()));
    // A cell rounded down to nothing keeps one grid step
    cell.set_duration_with_floor(level.round(cell.duration()), step);
}

/// Return a copy of `cells` with every position and duration on the grid
///
/// Cell order is preserved; overlaps created by rounding are left to the
/// overlap resolver.
pub fn quantize(cells: &[RhythmCell], level: QuantizeLevel) -> Vec<RhythmCell> {
    cells
        .iter()
        .cloned()
        .map(|mut cell| {
            quantize_cell(&mut cell, level);
            cell
        })
        .collect()
}

/// State of a continuous quantize gesture
///
/// While a gesture is active every preview is computed from the timeline as
/// it was when the gesture began, and history pushes are suppressed.
#[derive(Debug, Clone, Default)]
pub struct Quantizer {
    origin: Option<TimelineState>,
    level: Option<QuantizeLevel>,
}

impl Quantizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// True between `begin` and `finish`/`cancel`
    pub fn is_quantizing(&self) -> bool {
        self.origin.is_some()
    }

    /// Level of the latest preview, if any
    pub fn level(&self) -> Option<QuantizeLevel> {
        self.level
    }

    /// Start a gesture from the given timeline state
    ///
    /// Returns false if a gesture is already running.
    pub fn begin(&mut self, origin: TimelineState) -> bool {
        if self.origin.is_some() {
            return false;
        }
        self.origin = Some(origin);
        self.level = None;
        true
    }

    /// Timeline the running gesture started from
    pub fn origin(&self) -> Option<&TimelineState> {
        self.origin.as_ref()
    }

    /// Apply an edit made during the gesture to its starting state too
    ///
    /// Later previews then keep the edit. Returns false if no gesture is
    /// running.
    pub fn rebase<F>(&mut self, edit: F) -> bool
    where
        F: FnOnce(&mut TimelineState),
    {
        match self.origin.as_mut() {
            Some(origin) => {
                edit(origin);
                true
            }
            None => false,
        }
    }

    /// Compute the preview for `level`; None when no gesture is active
    pub fn preview(&mut self, level: QuantizeLevel) -> Option<Vec<RhythmCell>> {
        let origin = self.origin.as_ref()?;
        self.level = Some(level);
        Some(quantize(&origin.rhythm, level))
    }

    /// End the gesture, returning the level of the last preview
    pub fn finish(&mut self) -> Option<QuantizeLevel> {
        self.origin.take()?;
        self.level.take()
    }

    /// Abort the gesture, returning the state it started from
    pub fn cancel(&mut self) -> Option<TimelineState> {
        self.level = None;
        self.origin.take()
    }
}
