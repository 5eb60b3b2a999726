//! Saved room templates, grouped by name

use crate::error::{LoadError, TemplateError};
use crate::format::TemplateGroupJson;
use crate::room::Room;
use crate::tile::{TileCatalog, TileId};

/// Group every library starts with
pub const DEFAULT_TEMPLATE_GROUP: &str = "default";

/// Templates carry no undo history
const TEMPLATE_SNAPSHOT_CAPACITY: usize = 0;

#[derive(Debug, Clone)]
pub struct TemplateGroup {
    pub name: String,
    pub templates: Vec<Room>,
}

impl TemplateGroup {
    pub fn template(&self, name: &str) -> Option<&Room> {
        self.templates.iter().find(|t| t.name() == name)
    }
}

#[derive(Debug, Clone)]
pub struct TemplateLibrary {
    groups: Vec<TemplateGroup>,
}

impl Default for TemplateLibrary {
    fn default() -> Self {
        Self {
            groups: vec![TemplateGroup {
                name: DEFAULT_TEMPLATE_GROUP.to_string(),
                templates: Vec::new(),
            }],
        }
    }
}

impl TemplateLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn groups(&self) -> &[TemplateGroup] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&TemplateGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    fn group_mut(&mut self, name: &str) -> Option<&mut TemplateGroup> {
        self.groups.iter_mut().find(|g| g.name == name)
    }

    /// Add an empty group; false if the name is taken
    pub fn add_group(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.group(&name).is_some() {
            return false;
        }
        self.groups.push(TemplateGroup {
            name,
            templates: Vec::new(),
        });
        true
    }

    pub fn remove_group(&mut self, name: &str) -> Option<TemplateGroup> {
        let index = self.groups.iter().position(|g| g.name == name)?;
        Some(self.groups.remove(index))
    }

    /// Store a copy of `room` as template `name` in `group`
    pub fn record(&mut self, group: &str, room: &Room, name: impl Into<String>) -> Result<(), TemplateError> {
        let name = name.into();
        if room.is_empty() {
            return Err(TemplateError::EmptyRoom);
        }
        let target = self
            .group_mut(group)
            .ok_or_else(|| TemplateError::NoSuchGroup(group.to_string()))?;
        if target.template(&name).is_some() {
            return Err(TemplateError::DuplicateName(name));
        }

        tracing::info!("Recorded room '{}' as template '{}'", room.name(), name);
        let template = room.duplicate(name, (0, 0), TEMPLATE_SNAPSHOT_CAPACITY);
        target.templates.push(template);
        Ok(())
    }

    pub fn template(&self, group: &str, name: &str) -> Option<&Room> {
        self.group(group)?.template(name)
    }

    pub fn remove_template(&mut self, group: &str, name: &str) -> Option<Room> {
        let group = self.group_mut(group)?;
        let index = group.templates.iter().position(|t| t.name() == name)?;
        Some(group.templates.remove(index))
    }

    pub fn needs_tile(&self, tile: TileId) -> bool {
        self.groups
            .iter()
            .any(|g| g.templates.iter().any(|t| t.needs_tile(tile)))
    }

    pub fn to_json(&self) -> Vec<TemplateGroupJson> {
        self.groups
            .iter()
            .map(|g| TemplateGroupJson {
                name: g.name.clone(),
                rooms: g.templates.iter().map(Room::to_json).collect(),
            })
            .collect()
    }

    /// Rebuild the library. An empty list yields the default group.
    pub fn from_json(groups: &[TemplateGroupJson], catalog: &TileCatalog) -> Result<Self, LoadError> {
        if groups.is_empty() {
            return Ok(Self::default());
        }
        let groups = groups
            .iter()
            .map(|g| -> Result<TemplateGroup, LoadError> {
                let templates = g
                    .rooms
                    .iter()
                    .map(|r| Room::from_json(r, catalog, TEMPLATE_SNAPSHOT_CAPACITY))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(TemplateGroup {
                    name: g.name.clone(),
                    templates,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { groups })
    }
}
