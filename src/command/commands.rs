// Edit commands - Every user intent the editing engine understands
//
// Commands address cells by their current index in the timeline. An index
// that does not point at a cell turns the command into a no-op.

use crate::command::mode::EditMode;
use crate::sequencer::cell::{Arp, Ratchet, Strum};
use crate::sequencer::quantize::QuantizeLevel;

/// A single edit applied by `EditorSession::apply`
#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    /// Insert a cell at the rangehead; `None` uses the configured default
    AddCell { duration: Option<f64> },
    /// Advance the rangehead without inserting a cell
    AddRest { duration: f64 },
    /// Live drag preview; overlaps are tolerated and history is untouched
    UpdateCell {
        index: usize,
        position: f64,
        duration: f64,
    },
    /// End of a move gesture
    MoveCell { index: usize, position: f64 },
    /// End of a resize gesture
    ResizeCell { index: usize, duration: f64 },
    DeleteCell { index: usize },

    SelectCell { index: usize },
    UnselectCells,
    SetMode(EditMode),

    /// Set the velocity of the selected cell, or of every cell if `globally`
    SetVelocity { velocity: u8, globally: bool },
    SetArp { arp: Option<Arp> },
    SetStrum { strum: Option<Strum> },
    SetRatchet { ratchet: Option<Ratchet> },
    SetTranspose { transpose: Option<i8> },

    /// Live rangehead drag, not recorded in history
    SetRangehead { position: f64 },
    /// Pick one of the grid points offered by the rangehead snapper
    SnapRangeheadToGrid { position: f64 },
    SnapRangeheadToLastCell,

    /// One-shot quantization
    Quantize { level: QuantizeLevel },
    /// Continuous quantization gesture
    BeginQuantize,
    PreviewQuantize { level: QuantizeLevel },
    EndQuantize,
    CancelQuantize,

    /// Recording pass, see `TapRecorder`
    StartRecording { position: f64 },
    UpdateRecording { duration: f64 },
    EndRecording,

    CaptureSnapshot,
    RestoreSnapshot { index: usize },
    DeleteSnapshot { index: usize },
    RenameSnapshot { index: usize, name: String },
    SetSnapshotTriggerChannel { cc: u8 },

    Undo,
    Redo,
    ClearAll,
}

impl EditCommand {
    /// True for commands accepted while a recording pass is running
    ///
    /// Recorded cells may overlap until `EndRecording` repairs them, so
    /// nothing that records or captures the timeline goes through.
    pub fn is_allowed_while_recording(&self) -> bool {
        matches!(
            self,
            EditCommand::StartRecording { .. }
                | EditCommand::UpdateRecording { .. }
                | EditCommand::EndRecording
                | EditCommand::SelectCell { .. }
                | EditCommand::UnselectCells
                | EditCommand::SetMode(_)
                | EditCommand::RenameSnapshot { .. }
                | EditCommand::SetSnapshotTriggerChannel { .. }
        )
    }

    /// True for commands accepted while a quantize gesture is running
    ///
    /// Previews are recomputed from the timeline the gesture started from,
    /// so only edits that can be replayed on that timeline (deletion and
    /// attribute changes, by cell ID) go through. Everything else that
    /// reshapes the timeline, history walks included, waits for the gesture
    /// to end.
    pub fn is_allowed_while_quantizing(&self) -> bool {
        matches!(
            self,
            EditCommand::DeleteCell { .. }
                | EditCommand::SelectCell { .. }
                | EditCommand::UnselectCells
                | EditCommand::SetMode(_)
                | EditCommand::SetVelocity { .. }
                | EditCommand::SetArp { .. }
                | EditCommand::SetStrum { .. }
                | EditCommand::SetRatchet { .. }
                | EditCommand::SetTranspose { .. }
                | EditCommand::PreviewQuantize { .. }
                | EditCommand::EndQuantize
                | EditCommand::CancelQuantize
                | EditCommand::CaptureSnapshot
                | EditCommand::DeleteSnapshot { .. }
                | EditCommand::RenameSnapshot { .. }
                | EditCommand::SetSnapshotTriggerChannel { .. }
        )
    }

    /// Short human readable description
    pub fn description(&self) -> String {
        match self {
            EditCommand::AddCell { duration } => match duration {
                Some(duration) => format!("Add Cell ({:.4} bars)", duration),
                None => "Add Cell".to_string(),
            },
            EditCommand::AddRest { duration } => format!("Add Rest ({:.4} bars)", duration),
            EditCommand::UpdateCell { index, .. } => format!("Drag Cell {}", index),
            EditCommand::MoveCell { index, position } => {
                format!("Move Cell {} to {:.4}", index, position)
            }
            EditCommand::ResizeCell { index, duration } => {
                format!("Resize Cell {} to {:.4}", index, duration)
            }
            EditCommand::DeleteCell { index } => format!("Delete Cell {}", index),
            EditCommand::SelectCell { index } => format!("Select Cell {}", index),
            EditCommand::UnselectCells => "Unselect Cells".to_string(),
            EditCommand::SetMode(mode) => format!("Set Mode {}", mode),
            EditCommand::SetVelocity { velocity, globally } => {
                if *globally {
                    format!("Set All Velocities to {}", velocity)
                } else {
                    format!("Set Velocity to {}", velocity)
                }
            }
            EditCommand::SetArp { .. } => "Set Arp".to_string(),
            EditCommand::SetStrum { .. } => "Set Strum".to_string(),
            EditCommand::SetRatchet { .. } => "Set Ratchet".to_string(),
            EditCommand::SetTranspose { transpose } => match transpose {
                Some(semitones) => format!("Transpose {:+}", semitones),
                None => "Clear Transpose".to_string(),
            },
            EditCommand::SetRangehead { position } => format!("Drag Rangehead to {:.4}", position),
            EditCommand::SnapRangeheadToGrid { position } => {
                format!("Snap Rangehead to {:.4}", position)
            }
            EditCommand::SnapRangeheadToLastCell => "Snap Rangehead to Last Cell".to_string(),
            EditCommand::Quantize { level } => format!("Quantize to {}", level),
            EditCommand::BeginQuantize => "Begin Quantize".to_string(),
            EditCommand::PreviewQuantize { level } => format!("Preview Quantize {}", level),
            EditCommand::EndQuantize => "End Quantize".to_string(),
            EditCommand::CancelQuantize => "Cancel Quantize".to_string(),
            EditCommand::StartRecording { position } => {
                format!("Start Recording at {:.4}", position)
            }
            EditCommand::UpdateRecording { duration } => {
                format!("Update Recording ({:.4} bars)", duration)
            }
            EditCommand::EndRecording => "End Recording".to_string(),
            EditCommand::CaptureSnapshot => "Capture Snapshot".to_string(),
            EditCommand::RestoreSnapshot { index } => format!("Restore Snapshot {}", index),
            EditCommand::DeleteSnapshot { index } => format!("Delete Snapshot {}", index),
            EditCommand::RenameSnapshot { index, name } => {
                format!("Rename Snapshot {} to '{}'", index, name)
            }
            EditCommand::SetSnapshotTriggerChannel { cc } => format!("Set Snapshot CC#{}", cc),
            EditCommand::Undo => "Undo".to_string(),
            EditCommand::Redo => "Redo".to_string(),
            EditCommand::ClearAll => "Clear All".to_string(),
        }
    }
}

/// Result of applying a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The session state changed
    Applied,
    /// Nothing to do (stale index, exhausted history, no selection...)
    NoOp,
}

impl CommandOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, CommandOutcome::Applied)
    }
}
