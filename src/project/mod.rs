// Project model for the rhythm editor
// The editable timeline, its snapshot store, and persistence helpers

pub mod manager;
pub mod serialization;
pub mod snapshot;
pub mod thumbnail;
pub mod types;

pub use manager::{ProjectError, ProjectLoadOptions, ProjectManager, validate_project_structure};
pub use snapshot::{MAX_MIDI_CC, Snapshot, SnapshotData};
pub use thumbnail::{Rgba, Thumbnail, ThumbnailStyle, render_thumbnail};
pub use types::{ProjectData, TimelineState};
