// Serialization utilities for project persistence

use crate::project::manager::ProjectError;
use crate::project::types::ProjectData;
use ron::{from_str as ron_from_str, ser::PrettyConfig};

/// Serialize project state to RON format
pub fn serialize_to_ron(project: &ProjectData) -> Result<String, ProjectError> {
    ron::ser::to_string_pretty(project, PrettyConfig::default()).map_err(|e| {
        ProjectError::SerializationError(format!("Failed to serialize to RON: {}", e))
    })
}

/// Deserialize project state from RON format
pub fn deserialize_from_ron(ron_data: &str) -> Result<ProjectData, ProjectError> {
    ron_from_str(ron_data).map_err(|e| {
        ProjectError::SerializationError(format!("Failed to deserialize from RON: {}", e))
    })
}

/// Serialize project state to JSON format
pub fn serialize_to_json(project: &ProjectData) -> Result<String, ProjectError> {
    Ok(serde_json::to_string_pretty(project)?)
}

/// Deserialize project state from JSON format
pub fn deserialize_from_json(json_data: &str) -> Result<ProjectData, ProjectError> {
    Ok(serde_json::from_str(json_data)?)
}
