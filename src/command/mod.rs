// Edit commands and the session that applies them
//
// Architecture:
// - EditCommand: every user intent, addressed to cells by index
// - EditorSession: reducer owning the project, mode and selection
// - HistoryManager: whole-state undo/redo stacks
// - EditMode / ToolbarProps: closed set of toolbar modes with their parameters
//
// Integration with the UI:
// - The UI sends commands and reads copies of the state
// - The session answers through notifications pushed into a ring buffer

pub mod commands;
pub mod history;
pub mod mode;
pub mod session;

pub use commands::{CommandOutcome, EditCommand};
pub use history::{HistoryListener, HistoryManager, HistoryStatus};
pub use mode::{EditMode, RhythmAction, ToolbarProps};
pub use session::EditorSession;
