//! Project management for the room editor
//!
//! This module handles project file save/load and the Project type.

mod file;

pub use file::*;

use room_editor_core::{
    BrushLibrary, EditorContext, LayerJson, LoadError, Palette, RoomJson, RoomMap,
    TemplateGroupJson, TemplateLibrary, TileCatalog, DEFAULT_PALETTE_SIZE,
    DEFAULT_SNAPSHOT_CAPACITY,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// File format version written by this build
pub const PROJECT_VERSION: u32 = 1;

/// On-disk form of a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectData {
    pub version: u32,
    #[serde(default)]
    pub tiles: TileCatalog,
    #[serde(default)]
    pub brushes: BrushLibrary,
    /// Palette canvas
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette: Option<LayerJson>,
    #[serde(default)]
    pub rooms: Vec<RoomJson>,
    #[serde(default)]
    pub templates: Vec<TemplateGroupJson>,
}

/// The entire editor project
#[derive(Debug, Clone)]
pub struct Project {
    pub version: u32,
    pub path: Option<PathBuf>,
    pub context: EditorContext,
    /// Changes outside the rooms and palette, such as new tiles or brushes
    pub dirty: bool,
}

impl Default for Project {
    fn default() -> Self {
        Self::new(DEFAULT_SNAPSHOT_CAPACITY, DEFAULT_PALETTE_SIZE)
    }
}

impl Project {
    pub fn new(snapshot_capacity: usize, palette_size: (u32, u32)) -> Self {
        Self {
            version: PROJECT_VERSION,
            path: None,
            context: EditorContext::with_settings(snapshot_capacity, palette_size),
            dirty: false,
        }
    }

    /// Display name, taken from the file name
    pub fn name(&self) -> &str {
        self.path
            .as_ref()
            .and_then(|p| p.file_stem())
            .and_then(|s| s.to_str())
            .unwrap_or("Untitled")
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Whether anything changed since the last save
    pub fn is_dirty(&self) -> bool {
        self.dirty || !self.context.is_saved()
    }

    pub fn to_data(&self) -> ProjectData {
        ProjectData {
            version: self.version,
            tiles: self.context.catalog.clone(),
            brushes: self.context.brushes.clone(),
            palette: Some(self.context.palette.to_json()),
            rooms: self.context.rooms.to_json(),
            templates: self.context.templates.to_json(),
        }
    }

    /// Rebuild a project, re-stamping every room, template and the palette
    pub fn from_data(data: ProjectData, snapshot_capacity: usize) -> Result<Self, LoadError> {
        if data.version > PROJECT_VERSION {
            tracing::warn!(
                "Project version {} is newer than supported version {}",
                data.version,
                PROJECT_VERSION
            );
        }

        let catalog = data.tiles;
        let palette = match &data.palette {
            Some(json) => Palette::from_json(json, &catalog, snapshot_capacity)?,
            None => Palette::new(DEFAULT_PALETTE_SIZE, snapshot_capacity),
        };
        let rooms = RoomMap::from_json(&data.rooms, &catalog, snapshot_capacity)?;
        let templates = TemplateLibrary::from_json(&data.templates, &catalog)?;

        Ok(Self {
            version: data.version,
            path: None,
            context: EditorContext::from_parts(
                catalog,
                data.brushes,
                palette,
                rooms,
                templates,
                snapshot_capacity,
            ),
            dirty: false,
        })
    }
}
