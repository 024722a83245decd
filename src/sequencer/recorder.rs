// Tap recorder - Converts live taps into recording commands
// Wall-clock seconds are converted to bars with the project tempo

use crate::command::commands::EditCommand;
use crate::sequencer::timeline::Tempo;

/// Tap recorder with the timing context of one recording pass
///
/// Times passed to the recorder are seconds elapsed since the pass started.
/// Each tap produces a `StartRecording`, every hold tick an `UpdateRecording`,
/// and `finalize_recording` closes the pass with `EndRecording`.
#[derive(Debug, Clone)]
pub struct TapRecorder {
    tempo: Tempo,
    /// Rangehead position when the pass started, in bars
    start_position: f64,
    /// Start time (seconds) of the tap currently held down
    active_tap: Option<f64>,
    taps: usize,
}

impl TapRecorder {
    pub fn new(tempo: Tempo, start_position: f64) -> Self {
        Self {
            tempo,
            start_position: start_position.max(0.0),
            active_tap: None,
            taps: 0,
        }
    }

    pub fn tempo(&self) -> Tempo {
        self.tempo
    }

    pub fn start_position(&self) -> f64 {
        self.start_position
    }

    /// True once at least one tap was recorded in this pass
    pub fn has_recorded(&self) -> bool {
        self.taps > 0
    }

    /// True while a tap is held down
    pub fn is_holding(&self) -> bool {
        self.active_tap.is_some()
    }

    /// Timeline position (bars) of a moment in this pass
    pub fn position_at(&self, elapsed_seconds: f64) -> f64 {
        self.start_position + self.tempo.seconds_to_bars(elapsed_seconds.max(0.0))
    }

    /// A finger went down: start a new cell
    ///
    /// A tap that is still held is closed first.
    pub fn tap_down(&mut self, elapsed_seconds: f64) -> Vec<EditCommand> {
        let mut commands = Vec::with_capacity(2);
        if let Some(update) = self.tap_up(elapsed_seconds) {
            commands.push(update);
        }

        self.active_tap = Some(elapsed_seconds.max(0.0));
        self.taps += 1;
        commands.push(EditCommand::StartRecording {
            position: self.position_at(elapsed_seconds),
        });
        commands
    }

    /// The finger is still down: grow the current cell
    pub fn tap_hold(&mut self, elapsed_seconds: f64) -> Option<EditCommand> {
        let started = self.active_tap?;
        Some(EditCommand::UpdateRecording {
            duration: self.tempo.seconds_to_bars(elapsed_seconds - started),
        })
    }

    /// The finger was lifted: final size of the current cell
    pub fn tap_up(&mut self, elapsed_seconds: f64) -> Option<EditCommand> {
        let command = self.tap_hold(elapsed_seconds)?;
        self.active_tap = None;
        Some(command)
    }

    /// Finalize the pass by closing the held tap and ending the recording
    pub fn finalize_recording(&mut self, elapsed_seconds: f64) -> Vec<EditCommand> {
        let mut commands = Vec::with_capacity(2);
        if let Some(update) = self.tap_up(elapsed_seconds) {
            commands.push(update);
        }
        commands.push(EditCommand::EndRecording);
        self.taps = 0;
        commands
    }
}
