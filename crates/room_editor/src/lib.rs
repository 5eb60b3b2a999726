//! Project files, preferences and command line front end for room_editor
//!
//! The editing engine lives in `room_editor_core`; this crate persists it:
//! - `Project` - Tiles, brushes, palette, rooms and templates in one JSON file
//! - `EditorPreferences` - Per-user settings and recent projects

pub mod preferences;
pub mod project;

pub use preferences::{EditorPreferences, PreferencesError, RecentProject};
pub use project::{Project, ProjectData, ProjectError, PROJECT_VERSION};
