// Editor configuration
// Loaded from RON; every field falls back to its default when omitted

use crate::project::manager::ProjectError;
use crate::project::thumbnail::ThumbnailStyle;
use crate::sequencer::cell::{DEFAULT_DURATION, DEFAULT_VELOCITY};
use crate::sequencer::timeline::Tempo;
use serde::{Deserialize, Serialize};

/// Tunables of an editing session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum number of undo steps kept, None for unlimited
    pub history_limit: Option<usize>,

    /// Capacity of the notification ring buffer
    pub notification_capacity: usize,

    /// Duration (bars) of cells added without an explicit length
    pub default_cell_duration: f64,

    /// Velocity of newly added or recorded cells
    pub default_velocity: u8,

    /// Tempo given to new projects
    pub default_tempo: f64,

    pub thumbnail: ThumbnailStyle,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: None,
            notification_capacity: 256,
            default_cell_duration: DEFAULT_DURATION,
            default_velocity: DEFAULT_VELOCITY,
            default_tempo: Tempo::default().bpm(),
            thumbnail: ThumbnailStyle::default(),
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from RON text
    pub fn from_ron_str(ron_data: &str) -> Result<Self, ProjectError> {
        let config: EditorConfig = ron::from_str(ron_data).map_err(|e| {
            ProjectError::SerializationError(format!("Failed to parse config: {}", e))
        })?;
        Ok(config.sanitized())
    }

    /// Tempo for a new project
    pub fn tempo(&self) -> Tempo {
        Tempo::new(self.default_tempo)
    }

    fn sanitized(mut self) -> Self {
        self.notification_capacity = self.notification_capacity.max(1);
        self.default_velocity = self.default_velocity.min(127);
        if !(self.default_cell_duration.is_finite() && self.default_cell_duration > 0.0) {
            log::warn!(
                "Invalid default cell duration {}, using {}",
                self.default_cell_duration,
                DEFAULT_DURATION
            );
            self.default_cell_duration = DEFAULT_DURATION;
        }
        self
    }
}
