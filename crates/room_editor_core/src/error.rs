//! Error types for the grid editing engine
//!
//! Every failure here is a local, recoverable rejection: the operation that
//! produced it left the edited data untouched.

use crate::context::TileDependent;
use crate::grid::CellPos;
use crate::tile::TileId;

/// Why a placement, copy or fill was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// Target footprint leaves the grid
    OutOfBounds,
    /// Target footprint overlaps occupied cells
    Collision,
    /// The brush references a tile the catalog does not know
    UnknownTile(TileId),
    /// The selection contains nothing
    EmptyRegion,
}

impl std::fmt::Display for EditError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditError::OutOfBounds => write!(f, "Target lies outside the grid"),
            EditError::Collision => write!(f, "Target overlaps existing tiles"),
            EditError::UnknownTile(id) => write!(f, "Unknown tile id: {}", id),
            EditError::EmptyRegion => write!(f, "Selection is empty"),
        }
    }
}

impl std::error::Error for EditError {}

/// Why a room resize was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResizeError {
    /// The kept rectangle is not inside the current room
    OutOfRoom,
    /// The kept rectangle would cut through placed tiles
    ContentClipped,
    /// The new size cannot hold the kept rectangle
    TooSmall,
}

impl std::fmt::Display for ResizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResizeError::OutOfRoom => write!(f, "Kept area lies outside the room"),
            ResizeError::ContentClipped => write!(f, "Kept area does not contain every tile"),
            ResizeError::TooSmall => write!(f, "New size is smaller than the room content"),
        }
    }
}

impl std::error::Error for ResizeError {}

/// Room list failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomError {
    NameTaken(String),
    NotFound(String),
    /// The room rectangle overlaps another room
    Collision,
    /// A room needs at least one cell in each axis
    EmptyArea,
    /// More cells than a grid can index
    TooLarge((u32, u32)),
    Resize(ResizeError),
}

impl std::fmt::Display for RoomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoomError::NameTaken(name) => write!(f, "Room name already in use: {}", name),
            RoomError::NotFound(name) => write!(f, "No room named {}", name),
            RoomError::Collision => write!(f, "Room overlaps another room"),
            RoomError::EmptyArea => write!(f, "Room must be at least one cell wide and tall"),
            RoomError::TooLarge((w, h)) => write!(f, "Room of {}x{} cells is too large", w, h),
            RoomError::Resize(e) => write!(f, "Resize refused: {}", e),
        }
    }
}

impl std::error::Error for RoomError {}

impl From<ResizeError> for RoomError {
    fn from(e: ResizeError) -> Self {
        RoomError::Resize(e)
    }
}

/// Tile registration failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    DuplicateName(String),
    DuplicateId(TileId),
    /// Ids 0 and the occupied-cell sentinel are reserved
    InvalidId(TileId),
    InvalidFootprint((u32, u32)),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::DuplicateName(name) => write!(f, "Tile name already in use: {}", name),
            CatalogError::DuplicateId(id) => write!(f, "Tile id already in use: {}", id),
            CatalogError::InvalidId(id) => write!(f, "Reserved tile id: {}", id),
            CatalogError::InvalidFootprint((w, h)) => {
                write!(f, "Invalid tile footprint: {}x{}", w, h)
            }
        }
    }
}

impl std::error::Error for CatalogError {}

/// Why a tile could not be deleted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileRemovalError {
    UnknownTile(TileId),
    /// Some subsystem still references the tile
    InUse { tile: TileId, by: TileDependent },
}

impl std::fmt::Display for TileRemovalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TileRemovalError::UnknownTile(id) => write!(f, "Unknown tile id: {}", id),
            TileRemovalError::InUse { tile, by } => {
                write!(f, "Tile {} is still used by the {}", tile, by)
            }
        }
    }
}

impl std::error::Error for TileRemovalError {}

/// Template library failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// Empty rooms cannot be recorded
    EmptyRoom,
    DuplicateName(String),
    NoSuchGroup(String),
}

impl std::fmt::Display for TemplateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateError::EmptyRoom => write!(f, "Empty rooms cannot be recorded as templates"),
            TemplateError::DuplicateName(name) => {
                write!(f, "Template name already in use: {}", name)
            }
            TemplateError::NoSuchGroup(name) => write!(f, "No template group named {}", name),
        }
    }
}

impl std::error::Error for TemplateError {}

/// Composite brush creation failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteError {
    /// A composite brush needs at least two tiles
    TooFewTiles,
    NoSuchGroup(String),
    /// The group already holds a brush painting the same tiles
    DuplicateBrush,
}

impl std::fmt::Display for PaletteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaletteError::TooFewTiles => write!(f, "A composite brush needs at least two tiles"),
            PaletteError::NoSuchGroup(name) => write!(f, "No brush group named {}", name),
            PaletteError::DuplicateBrush => write!(f, "The group already has this brush"),
        }
    }
}

impl std::error::Error for PaletteError {}

/// Failures while rebuilding rooms and layers from JSON
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    UnknownTile {
        layer: String,
        tile: TileId,
    },
    OutOfBounds {
        layer: String,
        pos: CellPos,
    },
    Collision {
        layer: String,
        pos: CellPos,
    },
    DuplicateLayer(String),
    DuplicateRoom(String),
    /// Two rooms overlap on the world grid
    RoomCollision(String),
    /// A room or layer with more cells than a grid can hold
    TooLarge(String),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::UnknownTile { layer, tile } => {
                write!(f, "Layer '{}' references unknown tile {}", layer, tile)
            }
            LoadError::OutOfBounds { layer, pos } => {
                write!(f, "Layer '{}' has a tile outside the grid at {:?}", layer, pos)
            }
            LoadError::Collision { layer, pos } => {
                write!(f, "Layer '{}' has overlapping tiles at {:?}", layer, pos)
            }
            LoadError::DuplicateLayer(name) => write!(f, "Duplicate layer name: {}", name),
            LoadError::DuplicateRoom(name) => write!(f, "Duplicate room name: {}", name),
            LoadError::RoomCollision(name) => write!(f, "Room '{}' overlaps another room", name),
            LoadError::TooLarge(name) => write!(f, "'{}' is too large", name),
        }
    }
}

impl std::error::Error for LoadError {}
