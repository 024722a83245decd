// Rhythm cell - One musical event on the timeline
// A cell has a position and duration in bars, a velocity, and optional modifiers

use crate::sequencer::timeline::SUBBEAT;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for cells
pub type CellId = u64;

/// Global cell ID generator (atomic for thread-safety)
static NEXT_CELL_ID: AtomicU64 = AtomicU64::new(1);

/// Generate a unique cell ID
pub fn generate_cell_id() -> CellId {
    NEXT_CELL_ID.fetch_add(1, Ordering::Relaxed)
}

/// Make sure future IDs are greater than `id` (used after loading cells)
pub fn reserve_cell_ids(id: CellId) {
    NEXT_CELL_ID.fetch_max(id.saturating_add(1), Ordering::Relaxed);
}

/// Default velocity for new cells
pub const DEFAULT_VELOCITY: u8 = 100;

/// Default duration for new cells (one beat)
pub const DEFAULT_DURATION: f64 = 0.25;

/// Transpose range in semitones (applies in both directions)
pub const MAX_TRANSPOSE: i8 = 48;

/// Order in which an arpeggio walks through the chord
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ArpPattern {
    #[default]
    Up,
    Down,
    UpDown,
    DownUp,
    Random,
}

/// Arpeggio modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arp {
    pub pattern: ArpPattern,
    /// Notes per beat (>= 1)
    pub rate: u8,
    /// Octave range (1-4)
    pub octaves: u8,
}

impl Arp {
    pub fn new(pattern: ArpPattern, rate: u8, octaves: u8) -> Self {
        Self {
            pattern,
            rate: rate.max(1),
            octaves: octaves.clamp(1, 4),
        }
    }
}

impl Default for Arp {
    fn default() -> Self {
        Self::new(ArpPattern::Up, 4, 1)
    }
}

/// Direction of a strum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StrumDirection {
    #[default]
    Down,
    Up,
}

/// Strum modifier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Strum {
    /// Offset between struck notes, in bars (>= 0)
    pub timing: f64,
    pub direction: StrumDirection,
}

impl Strum {
    pub fn new(timing: f64, direction: StrumDirection) -> Self {
        let timing = if timing.is_finite() { timing.max(0.0) } else { 0.0 };
        Self { timing, direction }
    }
}

impl Default for Strum {
    fn default() -> Self {
        Self::new(SUBBEAT / 4.0, StrumDirection::Down)
    }
}

/// Ratchet modifier - repeats the cell inside its own duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ratchet {
    /// Number of repeats (1-8)
    pub count: u8,
}

impl Ratchet {
    pub const MAX_COUNT: u8 = 8;

    pub fn new(count: u8) -> Self {
        Self {
            count: count.clamp(1, Self::MAX_COUNT),
        }
    }
}

impl Default for Ratchet {
    fn default() -> Self {
        Self::new(2)
    }
}

/// A rhythm cell on the timeline
///
/// The cell occupies `[position, position + duration)` in bars.
/// Setters normalize their input so a stored cell always has a
/// non-negative position and a strictly positive duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RhythmCell {
    /// Unique identifier for this cell
    pub id: CellId,

    /// Start position in bars
    position: f64,

    /// Duration in bars (> 0)
    duration: f64,

    /// MIDI velocity (0-127)
    velocity: u8,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arp: Option<Arp>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strum: Option<Strum>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratchet: Option<Ratchet>,

    /// Transpose offset in semitones
    #[serde(default, skip_serializing_if = "Option::is_none")]
    transpose: Option<i8>,
}

impl RhythmCell {
    /// Creates a new cell with a fresh ID and no modifiers
    pub fn new(position: f64, duration: f64, velocity: u8) -> Self {
        Self {
            id: generate_cell_id(),
            position: normalize_position(position),
            duration: normalize_duration(duration, SUBBEAT),
            velocity: velocity.min(127),
            arp: None,
            strum: None,
            ratchet: None,
            transpose: None,
        }
    }

    /// Creates a cell at `position` with the default duration and velocity
    pub fn at(position: f64) -> Self {
        Self::new(position, DEFAULT_DURATION, DEFAULT_VELOCITY)
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// End of the cell (exclusive)
    pub fn end(&self) -> f64 {
        self.position + self.duration
    }

    pub fn velocity(&self) -> u8 {
        self.velocity
    }

    pub fn transpose(&self) -> Option<i8> {
        self.transpose
    }

    /// Set the position; negative or NaN positions clamp to 0
    pub fn set_position(&mut self, position: f64) {
        self.position = normalize_position(position);
    }

    /// Set the duration; non-positive durations are floored to one subbeat
    pub fn set_duration(&mut self, duration: f64) {
        self.duration = normalize_duration(duration, SUBBEAT);
    }

    /// Set the duration, flooring degenerate values to `floor` instead
    pub fn set_duration_with_floor(&mut self, duration: f64, floor: f64) {
        self.duration = normalize_duration(duration, floor);
    }

    /// Set the velocity (clamped to 0-127)
    pub fn set_velocity(&mut self, velocity: u8) {
        self.velocity = velocity.min(127);
    }

    /// Set the transpose offset (clamped to +/-48 semitones)
    pub fn set_transpose(&mut self, transpose: Option<i8>) {
        self.transpose = transpose.map(|t| t.clamp(-MAX_TRANSPOSE, MAX_TRANSPOSE));
    }

    /// Check if this cell overlaps another one
    pub fn overlaps(&self, other: &RhythmCell) -> bool {
        self.position < other.end() && other.position < self.end()
    }

    /// Repair a cell that bypassed the setters (e.g. deserialized data)
    pub fn normalize(&mut self) {
        self.position = normalize_position(self.position);
        self.duration = normalize_duration(self.duration, SUBBEAT);
        self.velocity = self.velocity.min(127);
        self.set_transpose(self.transpose);
        if let Some(ratchet) = self.ratchet {
            self.ratchet = Some(Ratchet::new(ratchet.count));
        }
        if let Some(arp) = self.arp {
            self.arp = Some(Arp::new(arp.pattern, arp.rate, arp.octaves));
        }
        if let Some(strum) = self.strum {
            self.strum = Some(Strum::new(strum.timing, strum.direction));
        }
    }
}

fn normalize_position(position: f64) -> f64 {
    if position.is_finite() { position.max(0.0) } else { 0.0 }
}

fn normalize_duration(duration: f64, floor: f64) -> f64 {
    // NaN fails the comparison and is floored as well
    if duration > 0.0 && duration.is_finite() {
        duration
    } else {
        floor
    }
}
