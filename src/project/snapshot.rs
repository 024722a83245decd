// Snapshot store - Named copies of the timeline for later recall
// Snapshots live outside the undo/redo history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::project::thumbnail::{Thumbnail, ThumbnailStyle, render_thumbnail};
use crate::project::types::TimelineState;

/// Highest MIDI CC number
pub const MAX_MIDI_CC: u8 = 127;

/// A stored copy of the timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Display name
    pub name: String,
    /// Captured `(rhythm, duration)`
    pub state: TimelineState,
    /// Capture timestamp
    pub created: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(name: impl Into<String>, state: TimelineState) -> Self {
        Self {
            name: name.into(),
            state,
            created: Utc::now(),
        }
    }

    /// Rasterize a thumbnail of this snapshot
    pub fn thumbnail(&self, style: &ThumbnailStyle) -> Thumbnail {
        render_thumbnail(&self.state, style)
    }
}

/// Snapshots of one project plus the MIDI CC used to trigger them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotData {
    /// Snapshots in capture order
    pub snapshots: Vec<Snapshot>,
    /// MIDI CC number (0-127) that triggers snapshot recall
    pub cc: u8,
}

impl SnapshotData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a snapshot of `state`
    ///
    /// Returns the index of the new snapshot.
    pub fn capture(&mut self, state: TimelineState) -> usize {
        let index = self.snapshots.len();
        let name = format!("Snapshot {}", index + 1);
        log::debug!(
            "Captured '{}' ({} cells, duration {:.3})",
            name,
            state.rhythm.len(),
            state.duration
        );
        self.snapshots.push(Snapshot::new(name, state));
        index
    }

    /// Copy of the snapshot at `index`, ready to be installed as the live timeline
    pub fn restore(&self, index: usize) -> Option<Snapshot> {
        self.snapshots.get(index).cloned()
    }

    /// Remove the snapshot at `index`; out-of-range indices are ignored
    pub fn delete(&mut self, index: usize) -> Option<Snapshot> {
        if index < self.snapshots.len() {
            let removed = self.snapshots.remove(index);
            log::debug!("Deleted '{}'", removed.name);
            Some(removed)
        } else {
            None
        }
    }

    /// Rename the snapshot at `index`; returns false if it does not exist
    pub fn rename(&mut self, index: usize, name: impl Into<String>) -> bool {
        match self.snapshots.get_mut(index) {
            Some(snapshot) => {
                snapshot.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Set the MIDI CC that triggers snapshots (clamped to 0-127)
    pub fn set_trigger_channel(&mut self, cc: u8) {
        self.cc = cc.min(MAX_MIDI_CC);
    }

    /// Picker labels for every selectable CC
    pub fn trigger_channel_labels() -> Vec<String> {
        (0..=MAX_MIDI_CC).map(|cc| format!("CC#{}", cc)).collect()
    }

    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    /// Rasterize the thumbnail of the snapshot at `index`
    pub fn thumbnail(&self, index: usize, style: &ThumbnailStyle) -> Option<Thumbnail> {
        self.snapshots.get(index).map(|s| s.thumbnail(style))
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
