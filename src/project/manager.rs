// Project manager for loading and saving projects

use crate::project::serialization::{deserialize_from_json, serialize_to_json};
use crate::project::types::ProjectData;
use crate::sequencer::cell::reserve_cell_ids;
use std::path::Path;

/// Project error types
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid project structure: {0}")]
    InvalidStructure(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Options for loading a project
#[derive(Debug, Clone)]
pub struct ProjectLoadOptions {
    /// Whether to reject structurally broken projects
    pub validate: bool,
    /// Whether to repair degenerate cells, overlaps and the rangehead
    pub normalize: bool,
}

impl Default for ProjectLoadOptions {
    fn default() -> Self {
        Self {
            validate: true,
            normalize: true,
        }
    }
}

/// Project manager - handles saving/loading projects
#[derive(Debug, Clone, Default)]
pub struct ProjectManager;

impl ProjectManager {
    pub fn new() -> Self {
        Self
    }

    /// Create a new empty project
    pub fn create_new_project(&self, name: impl Into<String>) -> ProjectData {
        ProjectData::new(name)
    }

    /// Save project to a JSON file, creating parent directories as needed
    pub fn save_project<P: AsRef<Path>>(
        &self,
        project: &ProjectData,
        project_path: P,
    ) -> Result<(), ProjectError> {
        let project_path = project_path.as_ref();
        if let Some(dir) = project_path.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir)?;
        }

        let json = serialize_to_json(project)?;
        std::fs::write(project_path, json)?;
        log::debug!(
            "Saved project '{}' to {}",
            project.name,
            project_path.display()
        );
        Ok(())
    }

    /// Load project from a JSON file
    pub fn load_project<P: AsRef<Path>>(
        &self,
        project_path: P,
        options: &ProjectLoadOptions,
    ) -> Result<ProjectData, ProjectError> {
        let project_path = project_path.as_ref();
        let json = std::fs::read_to_string(project_path)?;
        let mut project = deserialize_from_json(&json)?;
        reserve_loaded_ids(&project);

        if options.validate {
            validate_project_structure(&project)?;
        }
        if options.normalize && project.normalize() {
            log::warn!(
                "Project '{}' contained invalid cells and was repaired",
                project.name
            );
        }

        Ok(project)
    }
}

/// Keep freshly generated cell IDs clear of the loaded ones
fn reserve_loaded_ids(project: &ProjectData) {
    let live = project.rhythm.iter();
    let stored = project
        .snapshot_data
        .snapshots
        .iter()
        .flat_map(|s| s.state.rhythm.iter());
    if let Some(max_id) = live.chain(stored).map(|c| c.id).max() {
        reserve_cell_ids(max_id);
    }
}

/// Reject projects that cannot be repaired by normalization
pub fn validate_project_structure(project: &ProjectData) -> Result<(), ProjectError> {
    if !project.duration.is_finite() {
        return Err(ProjectError::InvalidStructure(
            "Timeline duration must be finite".to_string(),
        ));
    }

    let mut ids = std::collections::HashSet::new();
    for cell in &project.rhythm {
        if !ids.insert(cell.id) {
            return Err(ProjectError::InvalidStructure(format!(
                "Duplicate cell ID {}",
                cell.id
            )));
        }
        if !cell.position().is_finite() || !cell.duration().is_finite() {
            return Err(ProjectError::InvalidStructure(format!(
                "Cell {} has a non-finite position or duration",
                cell.id
            )));
        }
    }

    Ok(())
}
