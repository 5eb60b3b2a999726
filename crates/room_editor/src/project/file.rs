//! Project file save/load operations

use super::{Project, ProjectData};
use room_editor_core::{LoadError, DEFAULT_SNAPSHOT_CAPACITY};
use std::path::Path;

#[derive(Debug)]
pub enum ProjectError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    /// The file parsed but its rooms could not be rebuilt
    LoadError(LoadError),
    NoPath,
}

impl std::fmt::Display for ProjectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectError::IoError(e) => write!(f, "IO error: {}", e),
            ProjectError::ParseError(e) => write!(f, "Parse error: {}", e),
            ProjectError::SerializeError(e) => write!(f, "Serialize error: {}", e),
            ProjectError::LoadError(e) => write!(f, "Invalid project data: {}", e),
            ProjectError::NoPath => write!(f, "No file path set"),
        }
    }
}

impl std::error::Error for ProjectError {}

impl From<LoadError> for ProjectError {
    fn from(e: LoadError) -> Self {
        ProjectError::LoadError(e)
    }
}

impl Project {
    /// Load project from file
    pub fn load(path: &Path) -> Result<Self, ProjectError> {
        Self::load_with_capacity(path, DEFAULT_SNAPSHOT_CAPACITY)
    }

    /// Load project from file, keeping up to `snapshot_capacity` undo steps per layer
    pub fn load_with_capacity(path: &Path, snapshot_capacity: usize) -> Result<Self, ProjectError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ProjectError::IoError(e.to_string()))?;

        let data: ProjectData =
            serde_json::from_str(&content).map_err(|e| ProjectError::ParseError(e.to_string()))?;

        let mut project = Project::from_data(data, snapshot_capacity)?;
        project.path = Some(path.to_path_buf());

        tracing::info!(
            "Loaded project '{}': {} tiles, {} rooms",
            project.name(),
            project.context.catalog.len(),
            project.context.rooms.len()
        );
        Ok(project)
    }

    /// Save project to file
    pub fn save(&mut self, path: &Path) -> Result<(), ProjectError> {
        let content = serde_json::to_string_pretty(&self.to_data())
            .map_err(|e| ProjectError::SerializeError(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| ProjectError::IoError(e.to_string()))?;

        self.path = Some(path.to_path_buf());
        self.dirty = false;
        self.context.mark_saved();

        Ok(())
    }

    /// Save to current path if set
    pub fn save_current(&mut self) -> Result<(), ProjectError> {
        if let Some(path) = self.path.clone() {
            self.save(&path)
        } else {
            Err(ProjectError::NoPath)
        }
    }

    /// Write the map data consumed by the game: tile name table plus rooms
    pub fn export_map(&self, path: &Path) -> Result<(), ProjectError> {
        let content = serde_json::to_string_pretty(&self.context.export_map_data())
            .map_err(|e| ProjectError::SerializeError(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| ProjectError::IoError(e.to_string()))?;

        tracing::info!("Exported map data to {:?}", path);
        Ok(())
    }
}
