// Types for the project timeline

use serde::{Deserialize, Serialize};

use crate::project::snapshot::SnapshotData;
use crate::sequencer::cell::{CellId, RhythmCell};
use crate::sequencer::overlap::resolve_overlaps_in_place;
use crate::sequencer::rangehead::snap_to_last_cell;
use crate::sequencer::timeline::Tempo;

/// The `(rhythm, duration)` pair captured by history entries and snapshots
///
/// Always an owned deep copy; it never shares cells with the live project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineState {
    /// Cells at the time of capture
    pub rhythm: Vec<RhythmCell>,
    /// Rangehead position at the time of capture
    pub duration: f64,
}

impl TimelineState {
    pub fn new(rhythm: Vec<RhythmCell>, duration: f64) -> Self {
        Self { rhythm, duration }
    }

    pub fn is_empty(&self) -> bool {
        self.rhythm.is_empty()
    }
}

/// Main project structure
///
/// Holds the editable timeline and the snapshots scoped to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectData {
    /// Display name
    pub name: String,
    /// Cells of the timeline
    pub rhythm: Vec<RhythmCell>,
    /// Total extent of the timeline (the rangehead position), in bars
    pub duration: f64,
    /// Tempo used to convert recorded taps into bars
    pub tempo: Tempo,
    /// Snapshots of this timeline
    #[serde(default)]
    pub snapshot_data: SnapshotData,
}

impl ProjectData {
    /// Create a new empty project
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rhythm: Vec::new(),
            duration: 0.0,
            tempo: Tempo::default(),
            snapshot_data: SnapshotData::default(),
        }
    }

    /// Deep copy of the current `(rhythm, duration)`
    pub fn timeline_state(&self) -> TimelineState {
        TimelineState::new(self.rhythm.clone(), self.duration)
    }

    /// Install an owned state without copying
    pub fn install_state(&mut self, state: TimelineState) {
        self.rhythm = state.rhythm;
        self.duration = state.duration;
    }

    /// Capture the current timeline into the snapshot store
    ///
    /// Returns the index of the new snapshot.
    pub fn snapshot(&mut self) -> usize {
        let state = self.timeline_state();
        self.snapshot_data.capture(state)
    }

    /// Get a cell by index
    pub fn cell(&self, index: usize) -> Option<&RhythmCell> {
        self.rhythm.get(index)
    }

    /// Get a mutable cell by index
    pub fn cell_mut(&mut self, index: usize) -> Option<&mut RhythmCell> {
        self.rhythm.get_mut(index)
    }

    /// Find the current index of a cell
    pub fn index_of(&self, id: CellId) -> Option<usize> {
        self.rhythm.iter().position(|c| c.id == id)
    }

    /// Get a cell by ID
    pub fn cell_by_id(&self, id: CellId) -> Option<&RhythmCell> {
        self.rhythm.iter().find(|c| c.id == id)
    }

    /// Get a mutable cell by ID
    pub fn cell_by_id_mut(&mut self, id: CellId) -> Option<&mut RhythmCell> {
        self.rhythm.iter_mut().find(|c| c.id == id)
    }

    /// End of the last cell (0 when empty)
    pub fn last_cell_end(&self) -> f64 {
        snap_to_last_cell(&self.rhythm)
    }

    /// Remove every cell and reset the rangehead
    pub fn clear(&mut self) {
        self.rhythm.clear();
        self.duration = 0.0;
    }

    /// Get the number of cells
    pub fn cell_count(&self) -> usize {
        self.rhythm.len()
    }

    /// Check if the timeline is empty
    pub fn is_empty(&self) -> bool {
        self.rhythm.is_empty()
    }

    /// Repair data that did not go through the editing operations
    ///
    /// Floors degenerate durations, clamps positions, resolves overlaps and
    /// keeps the rangehead at or after the last cell. Returns true if
    /// anything changed.
    pub fn normalize(&mut self) -> bool {
        let before = self.clone();

        for cell in self.rhythm.iter_mut() {
            cell.normalize();
        }
        resolve_overlaps_in_place(&mut self.rhythm);

        if !(self.duration.is_finite() && self.duration >= 0.0) {
            self.duration = 0.0;
        }
        self.duration = self.duration.max(self.last_cell_end());

        for snapshot in self.snapshot_data.snapshots.iter_mut() {
            let state = &mut snapshot.state;
            for cell in state.rhythm.iter_mut() {
                cell.normalize();
            }
            resolve_overlaps_in_place(&mut state.rhythm);
            if !(state.duration.is_finite() && state.duration >= 0.0) {
                state.duration = 0.0;
            }
            state.duration = state.duration.max(snap_to_last_cell(&state.rhythm));
        }
        let cc = self.snapshot_data.cc;
        self.snapshot_data.set_trigger_channel(cc);

        *self != before
    }
}

impl Default for ProjectData {
    fn default() -> Self {
        Self::new("Project")
    }
}
