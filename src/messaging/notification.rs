// Notifications envoyées par le moteur d'édition vers la couche UI

use crate::command::history::HistoryStatus;
use crate::command::mode::EditMode;
use std::time::{SystemTime, UNIX_EPOCH};

/// Type de notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// Undo/redo availability changed
    HistoryChanged { can_undo: bool, can_redo: bool },
    /// The cell sequence changed; `reload` asks for a full re-read
    DataChanged { reload: bool },
    /// The toolbar must be rebuilt for the given mode
    ToolbarChanged { mode: EditMode },
}

/// Notification avec timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub timestamp: u64, // Unix timestamp en millisecondes
}

impl Notification {
    /// Crée une nouvelle notification avec le timestamp actuel
    pub fn new(kind: NotificationKind) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        Self { kind, timestamp }
    }

    pub fn history_changed(status: HistoryStatus) -> Self {
        Self::new(NotificationKind::HistoryChanged {
            can_undo: status.can_undo,
            can_redo: status.can_redo,
        })
    }

    pub fn data_changed(reload: bool) -> Self {
        Self::new(NotificationKind::DataChanged { reload })
    }

    pub fn toolbar_changed(mode: EditMode) -> Self {
        Self::new(NotificationKind::ToolbarChanged { mode })
    }
}
