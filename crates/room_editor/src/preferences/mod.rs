//! Editor preferences stored in the user's config directory

mod file;

pub use file::*;

use room_editor_core::{DEFAULT_PALETTE_SIZE, DEFAULT_SNAPSHOT_CAPACITY};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Most recent projects remembered
pub const MAX_RECENT_PROJECTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentProject {
    pub path: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorPreferences {
    /// Undo steps kept per layer
    pub snapshot_capacity: usize,
    /// Size of rooms created without an explicit size
    pub default_room_size: (u32, u32),
    pub palette_size: (u32, u32),
    pub auto_open_last_project: bool,
    /// Newest first
    pub recent_projects: Vec<RecentProject>,
}

impl Default for EditorPreferences {
    fn default() -> Self {
        Self {
            snapshot_capacity: DEFAULT_SNAPSHOT_CAPACITY,
            default_room_size: (32, 32),
            palette_size: DEFAULT_PALETTE_SIZE,
            auto_open_last_project: false,
            recent_projects: Vec::new(),
        }
    }
}

impl EditorPreferences {
    /// Put a project at the front of the recent list
    pub fn add_recent_project(&mut self, path: PathBuf, name: String) {
        let path = path.to_string_lossy().to_string();
        self.recent_projects.retain(|r| r.path != path);
        self.recent_projects.insert(0, RecentProject { path, name });
        self.recent_projects.truncate(MAX_RECENT_PROJECTS);
    }

    pub fn remove_recent_project(&mut self, path: &str) {
        self.recent_projects.retain(|r| r.path != path);
    }

    pub fn clear_recent_projects(&mut self) {
        self.recent_projects.clear();
    }

    /// Project to reopen on startup, if enabled
    pub fn last_project(&self) -> Option<PathBuf> {
        if !self.auto_open_last_project {
            return None;
        }
        self.recent_projects.first().map(|r| PathBuf::from(&r.path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_projects_are_deduplicated_and_capped() {
        let mut prefs = EditorPreferences::default();
        for i in 0..12 {
            prefs.add_recent_project(PathBuf::from(format!("/p/{}.json", i)), format!("p{}", i));
        }
        assert_eq!(prefs.recent_projects.len(), MAX_RECENT_PROJECTS);
        assert_eq!(prefs.recent_projects[0].name, "p11");

        prefs.add_recent_project(PathBuf::from("/p/5.json"), "again".to_string());
        assert_eq!(prefs.recent_projects.len(), MAX_RECENT_PROJECTS);
        assert_eq!(prefs.recent_projects[0].name, "again");
        assert_eq!(
            prefs.recent_projects.iter().filter(|r| r.path == "/p/5.json").count(),
            1
        );

        prefs.remove_recent_project("/p/5.json");
        assert_eq!(prefs.recent_projects[0].name, "p11");
        prefs.clear_recent_projects();
        assert!(prefs.recent_projects.is_empty());
    }

    #[test]
    fn test_last_project_respects_setting() {
        let mut prefs = EditorPreferences::default();
        prefs.add_recent_project(PathBuf::from("/p/a.json"), "a".to_string());
        assert_eq!(prefs.last_project(), None);

        prefs.auto_open_last_project = true;
        assert_eq!(prefs.last_project(), Some(PathBuf::from("/p/a.json")));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let prefs: EditorPreferences = serde_json::from_str(r#"{"snapshot_capacity": 5}"#).unwrap();
        assert_eq!(prefs.snapshot_capacity, 5);
        assert_eq!(prefs.default_room_size, (32, 32));
        assert!(prefs.recent_projects.is_empty());
    }
}
