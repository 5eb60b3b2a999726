//! Core data structures for room_editor
//!
//! This crate holds the grid editing engine behind the room editor:
//! - `TileCatalog` - Tile definitions keyed by numeric id
//! - `GridMap` - Per-layer occupancy grid with checked placement
//! - `Brush` - Unit, multi-cell and composite brushes
//! - `Layer` - A grid plus its placed tiles, with bounded undo
//! - `Room` / `RoomMap` - Rooms on the world grid and their layers
//! - `RawRegion` - A lifted selection that can be moved or copied
//! - `EditorContext` - Shared state and the tile delete guard
//!
//! Grid cells use `0` for free, the tile id on a tile's anchor (lower-left)
//! cell and [`OCCUPIED_CELL`] on the rest of its footprint.

mod brush;
mod context;
mod error;
mod fill;
mod format;
mod grid;
mod ids;
mod instance;
mod layer;
mod map;
mod palette;
mod region;
mod room;
mod snapshot;
mod stamp;
mod template;
mod tile;

pub use brush::{Brush, BrushCell, BrushGroup, BrushId, BrushLibrary, BrushMaker, Placement};
pub use context::{EditorContext, TileDependency, TileDependent};
pub use error::{
    CatalogError, EditError, LoadError, PaletteError, ResizeError, RoomError, TemplateError,
    TileRemovalError,
};
pub use fill::{explore, flood_fill, Direction};
pub use format::{LayerEntry, LayerJson, MapExport, RoomJson, TemplateGroupJson, TileRecord};
pub use grid::{cell_count, CellPos, GridMap, GridTransaction, MAX_GRID_CELLS};
pub use ids::IdAllocator;
pub use instance::TileInstance;
pub use layer::Layer;
pub use map::RoomMap;
pub use palette::{Palette, DEFAULT_PALETTE_SIZE};
pub use region::{MoveOutcome, RawRegion, RegionTile};
pub use room::{Room, DEFAULT_LAYER_NAME};
pub use snapshot::{Snapshot, SnapshotHistory, DEFAULT_SNAPSHOT_CAPACITY};
pub use stamp::Stamp;
pub use template::{TemplateGroup, TemplateLibrary, DEFAULT_TEMPLATE_GROUP};
pub use tile::{Tile, TileCatalog, TileId, EMPTY_CELL, OCCUPIED_CELL};
