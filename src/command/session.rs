// EditorSession - Owns the timeline and applies edit commands
//
// This is the single place where the project is mutated. Every command runs
// to completion: it mutates the timeline, repairs overlaps and the rangehead
// where needed, records the accepted state in history and tells the UI what
// to refresh through the notification ring buffer.

use crate::command::commands::{CommandOutcome, EditCommand};
use crate::command::history::{HistoryManager, HistoryStatus};
use crate::command::mode::{EditMode, ToolbarProps};
use crate::config::EditorConfig;
use crate::messaging::channels::{
    NotificationConsumer, NotificationSender, create_notification_channel, send_notification,
};
use crate::messaging::notification::Notification;
use crate::project::thumbnail::Thumbnail;
use crate::project::types::{ProjectData, TimelineState};
use crate::sequencer::cell::{Arp, CellId, Ratchet, RhythmCell, Strum};
use crate::sequencer::overlap::resolve_overlaps_in_place;
use crate::sequencer::quantize::{QuantizeLevel, Quantizer, quantize};
use crate::sequencer::rangehead::{SnapPoint, snap_to_grid, snap_to_last_cell};
use crate::sequencer::recorder::TapRecorder;
use crate::sequencer::timeline::SUBBEAT;
use std::sync::{Arc, Mutex};

/// Editing session over one project
///
/// Holds the mutable session state (mode, selection, running gestures) next
/// to the project and its history. The UI side only sees copies and
/// notifications.
pub struct EditorSession {
    project: ProjectData,
    history: HistoryManager,
    quantizer: Quantizer,

    /// Current toolbar mode
    mode: EditMode,

    /// Selected cell, followed by ID so reordering keeps it attached
    selected: Option<CellId>,

    /// Cell grown by `UpdateRecording`, while a recording pass is running
    recording_cell: Option<CellId>,
    is_recording: bool,

    config: EditorConfig,

    /// Shared with the history listener
    notification_sender: NotificationSender,
}

impl EditorSession {
    /// Create a session and the consumer side of its notification channel
    pub fn new(project: ProjectData, config: EditorConfig) -> (Self, NotificationConsumer) {
        let (producer, consumer) = create_notification_channel(config.notification_capacity);
        let session = Self::with_sender(project, config, Arc::new(Mutex::new(producer)));
        (session, consumer)
    }

    /// Create a session publishing into an existing notification channel
    pub fn with_sender(
        project: ProjectData,
        config: EditorConfig,
        notification_sender: NotificationSender,
    ) -> Self {
        let mut history = match config.history_limit {
            Some(limit) => HistoryManager::with_limit(limit),
            None => HistoryManager::new(),
        };

        let listener_sender = Arc::clone(&notification_sender);
        history.set_listener(Box::new(move |status: HistoryStatus| {
            send_notification(&listener_sender, Notification::history_changed(status));
        }));

        let mut session = Self {
            project,
            history,
            quantizer: Quantizer::new(),
            mode: EditMode::default(),
            selected: None,
            recording_cell: None,
            is_recording: false,
            config,
            notification_sender,
        };
        session.setup();
        session
    }

    /// Record the opening state so the first edit can be undone
    fn setup(&mut self) {
        log::debug!(
            "Session opened on '{}' ({} cells)",
            self.project.name,
            self.project.cell_count()
        );
        self.project_data_did_change(true);
    }

    // ---- Accessors -------------------------------------------------------

    pub fn project(&self) -> &ProjectData {
        &self.project
    }

    /// Close the session and hand the project back
    pub fn into_project(self) -> ProjectData {
        self.project
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    /// Rangehead position in bars
    pub fn rangehead(&self) -> f64 {
        self.project.duration
    }

    pub fn selected_cell(&self) -> Option<&RhythmCell> {
        self.selected.and_then(|id| self.project.cell_by_id(id))
    }

    /// Current index of the selected cell
    pub fn selected_index(&self) -> Option<usize> {
        self.selected.and_then(|id| self.project.index_of(id))
    }

    pub fn is_quantizing(&self) -> bool {
        self.quantizer.is_quantizing()
    }

    pub fn is_recording(&self) -> bool {
        self.is_recording
    }

    pub fn notification_sender(&self) -> NotificationSender {
        Arc::clone(&self.notification_sender)
    }

    /// Parameters of the toolbar for the current mode
    pub fn toolbar_props(&self) -> ToolbarProps {
        ToolbarProps::build(
            self.mode,
            &self.project,
            self.selected_cell(),
            self.is_recording,
        )
    }

    /// Grid points offered around the rangehead
    pub fn rangehead_snap_points(&self) -> Vec<SnapPoint> {
        snap_to_grid(self.project.duration)
    }

    /// Recorder for a pass starting at the rangehead
    pub fn tap_recorder(&self) -> TapRecorder {
        TapRecorder::new(self.project.tempo, self.project.duration)
    }

    /// Preview raster of a snapshot
    pub fn snapshot_thumbnail(&self, index: usize) -> Option<Thumbnail> {
        self.project
            .snapshot_data
            .thumbnail(index, &self.config.thumbnail)
    }

    // ---- Reducer ---------------------------------------------------------

    /// Apply one command to the session
    pub fn apply(&mut self, command: EditCommand) -> CommandOutcome {
        log::trace!("Apply: {}", command.description());

        if self.quantizer.is_quantizing() && !command.is_allowed_while_quantizing() {
            log::debug!("Ignored during quantize gesture: {}", command.description());
            return CommandOutcome::NoOp;
        }
        if self.is_recording && !command.is_allowed_while_recording() {
            log::debug!("Ignored during recording: {}", command.description());
            return CommandOutcome::NoOp;
        }

        match command {
            EditCommand::AddCell { duration } => self.add_cell(duration),
            EditCommand::AddRest { duration } => self.add_rest(duration),
            EditCommand::UpdateCell {
                index,
                position,
                duration,
            } => self.update_cell(index, position, duration),
            EditCommand::MoveCell { index, position } => {
                let Some(cell) = self.project.cell_mut(index) else {
                    return CommandOutcome::NoOp;
                };
                cell.set_position(position);
                self.cell_gesture_ended()
            }
            EditCommand::ResizeCell { index, duration } => {
                let Some(cell) = self.project.cell_mut(index) else {
                    return CommandOutcome::NoOp;
                };
                cell.set_duration(duration);
                self.cell_gesture_ended()
            }
            EditCommand::DeleteCell { index } => self.delete_cell(index),

            EditCommand::SelectCell { index } => {
                let Some(cell) = self.project.cell(index) else {
                    return CommandOutcome::NoOp;
                };
                self.selected = Some(cell.id);
                self.update_toolbar();
                CommandOutcome::Applied
            }
            EditCommand::UnselectCells => {
                if self.selected.take().is_none() {
                    return CommandOutcome::NoOp;
                }
                self.update_toolbar();
                CommandOutcome::Applied
            }
            EditCommand::SetMode(mode) => {
                if self.mode == mode {
                    return CommandOutcome::NoOp;
                }
                self.mode = mode;
                self.update_toolbar();
                CommandOutcome::Applied
            }

            EditCommand::SetVelocity { velocity, globally } => {
                self.set_velocity(velocity, globally)
            }
            EditCommand::SetArp { arp } => self.edit_selected(|cell| {
                cell.arp = arp.map(|a| Arp::new(a.pattern, a.rate, a.octaves));
            }),
            EditCommand::SetStrum { strum } => self.edit_selected(|cell| {
                cell.strum = strum.map(|s| Strum::new(s.timing, s.direction));
            }),
            EditCommand::SetRatchet { ratchet } => self.edit_selected(|cell| {
                cell.ratchet = ratchet.map(|r| Ratchet::new(r.count));
            }),
            EditCommand::SetTranspose { transpose } => {
                self.edit_selected(|cell| cell.set_transpose(transpose))
            }

            EditCommand::SetRangehead { position } => self.set_rangehead(position),
            EditCommand::SnapRangeheadToGrid { position } => {
                if !position.is_finite() {
                    return CommandOutcome::NoOp;
                }
                self.project.duration = position.max(0.0);
                self.project_data_did_change(false);
                CommandOutcome::Applied
            }
            EditCommand::SnapRangeheadToLastCell => {
                self.project.duration = self.project.last_cell_end();
                self.project_data_did_change(false);
                CommandOutcome::Applied
            }

            EditCommand::Quantize { level } => self.quantize(level),
            EditCommand::BeginQuantize => self.begin_quantize(),
            EditCommand::PreviewQuantize { level } => self.preview_quantize(level),
            EditCommand::EndQuantize => self.end_quantize(),
            EditCommand::CancelQuantize => self.cancel_quantize(),

            EditCommand::StartRecording { position } => self.start_recording(position),
            EditCommand::UpdateRecording { duration } => self.update_recording(duration),
            EditCommand::EndRecording => self.end_recording(),

            EditCommand::CaptureSnapshot => {
                self.project.snapshot();
                self.update_toolbar();
                CommandOutcome::Applied
            }
            EditCommand::RestoreSnapshot { index } => self.restore_snapshot(index),
            EditCommand::DeleteSnapshot { index } => {
                if self.project.snapshot_data.delete(index).is_none() {
                    return CommandOutcome::NoOp;
                }
                self.project_data_did_change(true);
                self.update_toolbar();
                CommandOutcome::Applied
            }
            EditCommand::RenameSnapshot { index, name } => {
                if !self.project.snapshot_data.rename(index, name) {
                    return CommandOutcome::NoOp;
                }
                self.update_toolbar();
                CommandOutcome::Applied
            }
            EditCommand::SetSnapshotTriggerChannel { cc } => {
                self.project.snapshot_data.set_trigger_channel(cc);
                self.update_toolbar();
                CommandOutcome::Applied
            }

            EditCommand::Undo => {
                let state = self.history.undo();
                self.install_history_state(state)
            }
            EditCommand::Redo => {
                let state = self.history.redo();
                self.install_history_state(state)
            }
            EditCommand::ClearAll => {
                self.selected = None;
                self.project.clear();
                self.project_data_did_change(true);
                self.update_toolbar();
                CommandOutcome::Applied
            }
        }
    }

    /// Apply commands in order, returning how many changed the session
    pub fn apply_all<I>(&mut self, commands: I) -> usize
    where
        I: IntoIterator<Item = EditCommand>,
    {
        commands
            .into_iter()
            .map(|command| self.apply(command))
            .filter(CommandOutcome::is_applied)
            .count()
    }

    // ---- Cell edits ------------------------------------------------------

    fn add_cell(&mut self, duration: Option<f64>) -> CommandOutcome {
        let duration = duration.unwrap_or(self.config.default_cell_duration);
        let cell = RhythmCell::new(
            self.project.duration,
            duration,
            self.config.default_velocity,
        );
        self.project.rhythm.push(cell);
        resolve_overlaps_in_place(&mut self.project.rhythm);
        self.project.duration = self.project.last_cell_end();
        self.project_data_did_change(true);
        CommandOutcome::Applied
    }

    fn add_rest(&mut self, duration: f64) -> CommandOutcome {
        let rest = if duration.is_finite() && duration > 0.0 {
            duration
        } else {
            SUBBEAT
        };
        self.project.duration += rest;
        self.project_data_did_change(true);
        CommandOutcome::Applied
    }

    fn update_cell(&mut self, index: usize, position: f64, duration: f64) -> CommandOutcome {
        let Some(cell) = self.project.cell_mut(index) else {
            return CommandOutcome::NoOp;
        };
        cell.set_position(position);
        cell.set_duration(duration);
        self.notify(Notification::data_changed(false));
        CommandOutcome::Applied
    }

    /// Move or resize finished: repair overlaps, snap the rangehead, commit
    fn cell_gesture_ended(&mut self) -> CommandOutcome {
        let moved = resolve_overlaps_in_place(&mut self.project.rhythm);
        self.project.duration = self.project.last_cell_end();
        self.project_data_did_change(moved > 0);
        CommandOutcome::Applied
    }

    fn delete_cell(&mut self, index: usize) -> CommandOutcome {
        if index >= self.project.cell_count() {
            return CommandOutcome::NoOp;
        }
        let removed = self.project.rhythm.remove(index);
        self.quantizer
            .rebase(|origin| origin.rhythm.retain(|cell| cell.id != removed.id));
        let was_selected = self.selected == Some(removed.id);
        if was_selected {
            self.selected = None;
        }

        let reload = !self.quantizer.is_quantizing();
        self.project_data_did_change(reload);
        if was_selected {
            self.update_toolbar();
        }
        CommandOutcome::Applied
    }

    fn set_velocity(&mut self, velocity: u8, globally: bool) -> CommandOutcome {
        if !globally {
            return self.edit_selected(|cell| cell.set_velocity(velocity));
        }
        if self.project.is_empty() {
            return CommandOutcome::NoOp;
        }
        for cell in self.project.rhythm.iter_mut() {
            cell.set_velocity(velocity);
        }
        self.quantizer.rebase(|origin| {
            for cell in origin.rhythm.iter_mut() {
                cell.set_velocity(velocity);
            }
        });
        self.project_data_did_change(false);
        CommandOutcome::Applied
    }

    /// Modify the selected cell's attributes
    ///
    /// During a quantize gesture the same edit is applied to the gesture's
    /// starting timeline.
    fn edit_selected<F>(&mut self, edit: F) -> CommandOutcome
    where
        F: Fn(&mut RhythmCell),
    {
        let Some(id) = self.selected else {
            return CommandOutcome::NoOp;
        };
        let Some(cell) = self.project.cell_by_id_mut(id) else {
            return CommandOutcome::NoOp;
        };
        edit(cell);
        self.quantizer.rebase(|origin| {
            if let Some(cell) = origin.rhythm.iter_mut().find(|cell| cell.id == id) {
                edit(cell);
            }
        });
        self.project_data_did_change(false);
        CommandOutcome::Applied
    }

    fn set_rangehead(&mut self, position: f64) -> CommandOutcome {
        if !position.is_finite() {
            return CommandOutcome::NoOp;
        }
        self.project.duration = position.max(0.0);
        self.notify(Notification::data_changed(false));
        if self.mode == EditMode::Record {
            self.update_toolbar();
        }
        CommandOutcome::Applied
    }

    // ---- Quantization ----------------------------------------------------

    /// Quantize `state` and repair what grid rounding broke
    fn quantized_state(state: &TimelineState, level: QuantizeLevel) -> TimelineState {
        let mut rhythm = quantize(&state.rhythm, level);
        resolve_overlaps_in_place(&mut rhythm);
        let last_end = snap_to_last_cell(&rhythm);
        let duration = level.round(state.duration).max(last_end);
        TimelineState::new(rhythm, duration)
    }

    fn quantize(&mut self, level: QuantizeLevel) -> CommandOutcome {
        if self.quantizer.is_quantizing() {
            return CommandOutcome::NoOp;
        }
        let quantized = Self::quantized_state(&self.project.timeline_state(), level);
        self.project.install_state(quantized);
        self.project_data_did_change(true);
        CommandOutcome::Applied
    }

    fn begin_quantize(&mut self) -> CommandOutcome {
        if self.quantizer.begin(self.project.timeline_state()) {
            log::debug!("Quantize gesture started");
            CommandOutcome::Applied
        } else {
            CommandOutcome::NoOp
        }
    }

    fn preview_quantize(&mut self, level: QuantizeLevel) -> CommandOutcome {
        let Some(origin) = self.quantizer.origin() else {
            return CommandOutcome::NoOp;
        };
        let preview = Self::quantized_state(origin, level);
        self.quantizer.preview(level);
        self.project.install_state(preview);
        // Suppressed: the gesture is still running
        self.project_data_did_change(true);
        CommandOutcome::Applied
    }

    fn end_quantize(&mut self) -> CommandOutcome {
        if !self.quantizer.is_quantizing() {
            return CommandOutcome::NoOp;
        }
        let level = self.quantizer.finish();
        log::debug!("Quantize gesture finished at {:?}", level);
        self.commit_gesture();
        CommandOutcome::Applied
    }

    fn cancel_quantize(&mut self) -> CommandOutcome {
        let Some(origin) = self.quantizer.cancel() else {
            return CommandOutcome::NoOp;
        };
        log::debug!("Quantize gesture cancelled");
        self.project.install_state(origin);
        self.commit_gesture();
        CommandOutcome::Applied
    }

    /// Record the timeline left by a finished gesture
    ///
    /// Pushes only when it differs from the current history entry, so a
    /// gesture that changed nothing adds no undo step.
    fn commit_gesture(&mut self) {
        let state = self.project.timeline_state();
        if self.history.current().as_ref() != Some(&state) {
            self.history.push(&state);
        }
        self.notify(Notification::data_changed(true));
    }

    // ---- Recording -------------------------------------------------------

    fn start_recording(&mut self, position: f64) -> CommandOutcome {
        if !position.is_finite() {
            return CommandOutcome::NoOp;
        }
        if !self.is_recording {
            log::debug!("Recording started at {:.4}", position);
            self.is_recording = true;
        }
        let cell = RhythmCell::new(position, SUBBEAT, self.config.default_velocity);
        self.recording_cell = Some(cell.id);
        self.project.rhythm.push(cell);
        self.notify(Notification::data_changed(true));
        CommandOutcome::Applied
    }

    fn update_recording(&mut self, duration: f64) -> CommandOutcome {
        let Some(id) = self.recording_cell else {
            return CommandOutcome::NoOp;
        };
        let Some(cell) = self.project.cell_by_id_mut(id) else {
            return CommandOutcome::NoOp;
        };
        cell.set_duration(duration);
        self.notify(Notification::data_changed(false));
        CommandOutcome::Applied
    }

    fn end_recording(&mut self) -> CommandOutcome {
        if !self.is_recording {
            return CommandOutcome::NoOp;
        }
        self.is_recording = false;
        self.recording_cell = None;

        resolve_overlaps_in_place(&mut self.project.rhythm);
        self.project.duration = self.project.last_cell_end();
        log::debug!(
            "Recording ended ({} cells, rangehead {:.4})",
            self.project.cell_count(),
            self.project.duration
        );
        self.update_toolbar();
        self.project_data_did_change(true);
        CommandOutcome::Applied
    }

    // ---- Snapshots & history ---------------------------------------------

    fn restore_snapshot(&mut self, index: usize) -> CommandOutcome {
        let Some(snapshot) = self.project.snapshot_data.restore(index) else {
            return CommandOutcome::NoOp;
        };
        log::debug!("Restoring '{}'", snapshot.name);
        self.project.install_state(snapshot.state);
        if self.selected.take().is_some() {
            self.update_toolbar();
        }
        self.project_data_did_change(true);
        CommandOutcome::Applied
    }

    /// Install a state handed out by undo/redo, without recording it again
    fn install_history_state(&mut self, state: Option<TimelineState>) -> CommandOutcome {
        let Some(state) = state else {
            return CommandOutcome::NoOp;
        };
        self.project.install_state(state);
        if let Some(id) = self.selected
            && self.project.index_of(id).is_none()
        {
            self.selected = None;
            self.update_toolbar();
        }
        self.notify(Notification::data_changed(true));
        CommandOutcome::Applied
    }

    /// Accept the current timeline: push it unless a quantize gesture is running
    fn project_data_did_change(&mut self, reload: bool) {
        if !self.quantizer.is_quantizing() {
            self.history.push(&self.project.timeline_state());
        }
        self.notify(Notification::data_changed(reload));
    }

    fn update_toolbar(&mut self) {
        self.notify(Notification::toolbar_changed(self.mode));
    }

    fn notify(&self, notification: Notification) {
        send_notification(&self.notification_sender, notification);
    }
}
