//! Tile definitions and the catalog that owns them

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::CatalogError;
use crate::ids::IdAllocator;
use crate::stamp::Stamp;

/// Numeric tile identifier. Valid ids are in `1..OCCUPIED_CELL`.
pub type TileId = u32;

/// Grid value of a free cell
pub const EMPTY_CELL: u32 = 0;

/// Grid value of every non-anchor cell covered by a multi-cell tile
pub const OCCUPIED_CELL: u32 = u32::MAX;

/// A paintable tile type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub name: String,
    /// Cells covered, (width, height)
    pub footprint: (u32, u32),
    /// Path of the image shown for this tile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Tile {
    pub fn new(id: TileId, name: impl Into<String>, footprint: (u32, u32)) -> Self {
        Self {
            id,
            name: name.into(),
            footprint,
            image: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Whether the tile covers exactly one cell
    pub fn is_unit(&self) -> bool {
        self.footprint == (1, 1)
    }

    /// The footprint array for this tile
    pub fn stamp(&self) -> Stamp {
        Stamp::for_tile(self.id, self.footprint)
    }
}

/// Every tile the project knows about, keyed by id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TileCatalog {
    tiles: BTreeMap<TileId, Tile>,
    #[serde(default)]
    ids: IdAllocator,
}

impl TileCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new tile under the next free id
    pub fn register(
        &mut self,
        name: impl Into<String>,
        footprint: (u32, u32),
        image: Option<String>,
    ) -> Result<TileId, CatalogError> {
        let name = name.into();
        self.validate(&name, footprint)?;

        let id = self.ids.next_id();
        let mut tile = Tile::new(id, name, footprint);
        tile.image = image;
        self.tiles.insert(id, tile);
        Ok(id)
    }

    /// Insert a tile with a caller-chosen id
    pub fn insert(&mut self, tile: Tile) -> Result<(), CatalogError> {
        if tile.id == EMPTY_CELL || tile.id == OCCUPIED_CELL {
            return Err(CatalogError::InvalidId(tile.id));
        }
        if self.tiles.contains_key(&tile.id) {
            return Err(CatalogError::DuplicateId(tile.id));
        }
        self.validate(&tile.name, tile.footprint)?;

        self.ids.reserve(tile.id);
        self.tiles.insert(tile.id, tile);
        Ok(())
    }

    fn validate(&self, name: &str, footprint: (u32, u32)) -> Result<(), CatalogError> {
        if footprint.0 == 0 || footprint.1 == 0 {
            return Err(CatalogError::InvalidFootprint(footprint));
        }
        if self.by_name(name).is_some() {
            return Err(CatalogError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(&id)
    }

    pub fn contains(&self, id: TileId) -> bool {
        self.tiles.contains_key(&id)
    }

    pub fn footprint(&self, id: TileId) -> Option<(u32, u32)> {
        self.tiles.get(&id).map(|t| t.footprint)
    }

    pub fn stamp(&self, id: TileId) -> Option<Stamp> {
        self.tiles.get(&id).map(Tile::stamp)
    }

    pub fn by_name(&self, name: &str) -> Option<&Tile> {
        self.tiles.values().find(|t| t.name == name)
    }

    /// Tiles in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Name to id table written alongside exported map data
    pub fn lookup_table(&self) -> BTreeMap<String, TileId> {
        self.tiles
            .values()
            .map(|t| (t.name.clone(), t.id))
            .collect()
    }

    /// Drop a tile and free its id. Callers must check dependents first.
    pub(crate) fn remove(&mut self, id: TileId) -> Option<Tile> {
        let tile = self.tiles.remove(&id)?;
        self.ids.recycle(id);
        Some(tile)
    }
}
