//! JSON shapes for layers, rooms, templates and exported map data

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::grid::CellPos;
use crate::tile::TileId;

/// A placed tile: anchor cell and tile id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRecord {
    pub pos: CellPos,
    #[serde(rename = "tileId")]
    pub tile_id: TileId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerJson {
    pub name: String,
    /// World position of the owning room
    pub pos: CellPos,
    pub size: (u32, u32),
    pub index: i32,
    #[serde(default)]
    pub tiles: Vec<TileRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerEntry {
    pub name: String,
    pub data: LayerJson,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomJson {
    pub name: String,
    pub pos: CellPos,
    pub size: (u32, u32),
    #[serde(default)]
    pub layers: Vec<LayerEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateGroupJson {
    pub name: String,
    #[serde(rename = "roomList", default)]
    pub rooms: Vec<RoomJson>,
}

/// Map data handed to the game: tile name table plus every room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapExport {
    pub lut: BTreeMap<String, TileId>,
    pub rooms: Vec<RoomJson>,
}
