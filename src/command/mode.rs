// Toolbar modes - Closed set of editing modes and their parameters

use crate::project::types::ProjectData;
use crate::sequencer::cell::{Arp, Ratchet, RhythmCell, Strum};
use crate::sequencer::timeline::{MusicalTime, Tempo};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Editing mode selected in the action bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EditMode {
    #[default]
    Rhythm,
    Strum,
    Arp,
    Ratchet,
    Velocity,
    Transpose,
    Record,
    Snapshots,
}

impl EditMode {
    /// All modes, in action bar order
    pub const ALL: [EditMode; 8] = [
        EditMode::Rhythm,
        EditMode::Strum,
        EditMode::Arp,
        EditMode::Ratchet,
        EditMode::Velocity,
        EditMode::Transpose,
        EditMode::Record,
        EditMode::Snapshots,
    ];
}

impl fmt::Display for EditMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EditMode::Rhythm => "Rhythm",
            EditMode::Strum => "Strum",
            EditMode::Arp => "Arp",
            EditMode::Ratchet => "Ratchet",
            EditMode::Velocity => "Velocity",
            EditMode::Transpose => "Transpose",
            EditMode::Record => "Record",
            EditMode::Snapshots => "Snapshots",
        };
        write!(f, "{}", name)
    }
}

/// What the rhythm toolbar offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RhythmAction {
    /// Nothing selected: add cells and rests at the rangehead
    AddRhythm,
    /// A cell is selected: edit its duration
    EditRhythm,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RhythmProps {
    pub selected: Option<RhythmCell>,
    pub action: RhythmAction,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrumProps {
    pub selected: Option<RhythmCell>,
    pub strum: Option<Strum>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArpProps {
    pub selected: Option<RhythmCell>,
    pub arp: Option<Arp>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RatchetProps {
    pub selected: Option<RhythmCell>,
    pub ratchet: Option<Ratchet>,
}

/// Velocity can be edited on the selected cell or on every cell at once
#[derive(Debug, Clone, PartialEq)]
pub struct VelocityProps {
    pub selected: Option<RhythmCell>,
    pub velocity: Option<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransposeProps {
    pub selected: Option<RhythmCell>,
    pub transpose: Option<i8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordProps {
    pub tempo: Tempo,
    /// Recording starts at the rangehead
    pub rangehead_position: f64,
    /// Rangehead as `bar[.beat[.subbeat]]`, rounded to the nearest subbeat
    pub rangehead_label: String,
    pub is_recording: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotProps {
    pub names: Vec<String>,
    pub cc: u8,
}

/// Parameters of the toolbar for one mode
#[derive(Debug, Clone, PartialEq)]
pub enum ToolbarProps {
    Rhythm(RhythmProps),
    Strum(StrumProps),
    Arp(ArpProps),
    Ratchet(RatchetProps),
    Velocity(VelocityProps),
    Transpose(TransposeProps),
    Record(RecordProps),
    Snapshots(SnapshotProps),
}

impl ToolbarProps {
    /// Build the props of `mode` from the session state
    pub fn build(
        mode: EditMode,
        project: &ProjectData,
        selected: Option<&RhythmCell>,
        is_recording: bool,
    ) -> Self {
        let owned = selected.cloned();
        match mode {
            EditMode::Rhythm => ToolbarProps::Rhythm(RhythmProps {
                action: if owned.is_some() {
                    RhythmAction::EditRhythm
                } else {
                    RhythmAction::AddRhythm
                },
                selected: owned,
            }),
            EditMode::Strum => ToolbarProps::Strum(StrumProps {
                strum: selected.and_then(|c| c.strum),
                selected: owned,
            }),
            EditMode::Arp => ToolbarProps::Arp(ArpProps {
                arp: selected.and_then(|c| c.arp),
                selected: owned,
            }),
            EditMode::Ratchet => ToolbarProps::Ratchet(RatchetProps {
                ratchet: selected.and_then(|c| c.ratchet),
                selected: owned,
            }),
            EditMode::Velocity => ToolbarProps::Velocity(VelocityProps {
                velocity: selected.map(|c| c.velocity()),
                selected: owned,
            }),
            EditMode::Transpose => ToolbarProps::Transpose(TransposeProps {
                transpose: selected.and_then(|c| c.transpose()),
                selected: owned,
            }),
            EditMode::Record => ToolbarProps::Record(RecordProps {
                tempo: project.tempo,
                rangehead_position: project.duration,
                rangehead_label: MusicalTime::from_bars(project.duration).label(),
                is_recording,
            }),
            EditMode::Snapshots => ToolbarProps::Snapshots(SnapshotProps {
                names: project
                    .snapshot_data
                    .snapshots
                    .iter()
                    .map(|s| s.name.clone())
                    .collect(),
                cc: project.snapshot_data.cc,
            }),
        }
    }

    /// Mode these props belong to
    pub fn mode(&self) -> EditMode {
        match self {
            ToolbarProps::Rhythm(_) => EditMode::Rhythm,
            ToolbarProps::Strum(_) => EditMode::Strum,
            ToolbarProps::Arp(_) => EditMode::Arp,
            ToolbarProps::Ratchet(_) => EditMode::Ratchet,
            ToolbarProps::Velocity(_) => EditMode::Velocity,
            ToolbarProps::Transpose(_) => EditMode::Transpose,
            ToolbarProps::Record(_) => EditMode::Record,
            ToolbarProps::Snapshots(_) => EditMode::Snapshots,
        }
    }

    /// Toolbar title
    pub fn title(&self) -> String {
        match self {
            ToolbarProps::Rhythm(props) => match props.action {
                RhythmAction::AddRhythm => "Add Rhythm".to_string(),
                RhythmAction::EditRhythm => "Edit Rhythm".to_string(),
            },
            ToolbarProps::Record(_) => "Record Rhythm".to_string(),
            other => other.mode().to_string(),
        }
    }
}
