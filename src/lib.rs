// Rhythm Builder - Library exports for the editor, tests and benchmarks

pub mod command;
pub mod config;
pub mod messaging;
pub mod project;
pub mod sequencer;

// Re-export commonly used types for convenience
pub use command::{
    CommandOutcome, EditCommand, EditMode, EditorSession, HistoryManager, ToolbarProps,
};
pub use config::EditorConfig;
pub use messaging::channels::{create_notification_channel, drain_notifications};
pub use messaging::notification::{Notification, NotificationKind};
pub use project::{ProjectData, ProjectError, ProjectManager, SnapshotData, TimelineState};
pub use sequencer::{
    MusicalTime, QuantizeLevel, RhythmCell, SnapPoint, TapRecorder, Tempo, resolve_overlaps,
};
