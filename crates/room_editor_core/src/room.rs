//! Rooms: a rectangle on the world grid holding an ordered stack of layers

use crate::error::{LoadError, ResizeError};
use crate::format::{LayerEntry, RoomJson};
use crate::grid::{cell_count, CellPos};
use crate::layer::Layer;
use crate::snapshot::DEFAULT_SNAPSHOT_CAPACITY;
use crate::tile::{TileCatalog, TileId};

/// Name of the layer every new room starts with
pub const DEFAULT_LAYER_NAME: &str = "default";

/// A room on the world grid.
///
/// Layers are kept in draw order, bottom first. A room always has at least
/// one layer, and layer names are unique within the room.
#[derive(Debug, Clone)]
pub struct Room {
    name: String,
    /// World position of the lower-left cell
    origin: CellPos,
    size: (u32, u32),
    layers: Vec<Layer>,
    current_layer: usize,
    pub visible: bool,
    snapshot_capacity: usize,
}

impl Room {
    pub fn new(name: impl Into<String>, origin: CellPos, size: (u32, u32)) -> Self {
        Self::with_snapshot_capacity(name, origin, size, DEFAULT_SNAPSHOT_CAPACITY)
    }

    pub fn with_snapshot_capacity(
        name: impl Into<String>,
        origin: CellPos,
        size: (u32, u32),
        snapshot_capacity: usize,
    ) -> Self {
        Self {
            name: name.into(),
            origin,
            size,
            layers: vec![Layer::new(DEFAULT_LAYER_NAME, size, 0, snapshot_capacity)],
            current_layer: 0,
            visible: true,
            snapshot_capacity,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub fn origin(&self) -> CellPos {
        self.origin
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// World cell one past the top-right corner
    pub fn upper_bound(&self) -> CellPos {
        (
            self.origin.0 + self.size.0 as i32,
            self.origin.1 + self.size.1 as i32,
        )
    }

    pub fn snapshot_capacity(&self) -> usize {
        self.snapshot_capacity
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name() == name)
    }

    pub fn layer_mut(&mut self, name: &str) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.name() == name)
    }

    fn layer_index(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.name() == name)
    }

    /// Layer edits go to by default
    pub fn current_layer(&self) -> &Layer {
        &self.layers[self.current_layer]
    }

    pub fn current_layer_mut(&mut self) -> &mut Layer {
        &mut self.layers[self.current_layer]
    }

    pub fn set_current_layer(&mut self, name: &str) -> bool {
        let Some(index) = self.layer_index(name) else {
            return false;
        };
        self.current_layer = index;
        true
    }

    /// First free name of the form `layer N`
    pub fn next_layer_name(&self) -> String {
        let mut n = self.layers.len();
        loop {
            let name = format!("layer {}", n);
            if self.layer(&name).is_none() {
                return name;
            }
            n += 1;
        }
    }

    /// Add a layer on top under a generated name
    pub fn create_layer(&mut self) -> &mut Layer {
        let name = self.next_layer_name();
        self.push_layer(name)
    }

    /// Add a layer on top; `None` if the name is taken
    pub fn add_layer(&mut self, name: impl Into<String>) -> Option<&mut Layer> {
        let name = name.into();
        if self.layer(&name).is_some() {
            return None;
        }
        Some(self.push_layer(name))
    }

    fn push_layer(&mut self, name: String) -> &mut Layer {
        let z_index = self
            .layers
            .iter()
            .map(Layer::z_index)
            .max()
            .map_or(0, |z| z + 1);
        let index = self.layers.len();
        self.layers
            .push(Layer::new(name, self.size, z_index, self.snapshot_capacity));
        &mut self.layers[index]
    }

    /// Remove a layer. The last remaining layer cannot be removed.
    pub fn remove_layer(&mut self, name: &str) -> Option<Layer> {
        if self.layers.len() <= 1 {
            return None;
        }
        let index = self.layer_index(name)?;
        let layer = self.layers.remove(index);
        if self.current_layer > index || self.current_layer >= self.layers.len() {
            self.current_layer = self.current_layer.saturating_sub(1);
        }
        Some(layer)
    }

    /// Rename a layer; false if it does not exist or the new name is taken
    pub fn rename_layer(&mut self, old: &str, new: impl Into<String>) -> bool {
        let new = new.into();
        if self.layer(&new).is_some() {
            return false;
        }
        let Some(layer) = self.layer_mut(old) else {
            return false;
        };
        layer.set_name(new);
        true
    }

    /// Move a layer one step toward the top of the draw order
    pub fn move_layer_up(&mut self, name: &str) -> bool {
        match self.layer_index(name) {
            Some(index) if index + 1 < self.layers.len() => {
                self.swap_layers(index, index + 1);
                true
            }
            _ => false,
        }
    }

    /// Move a layer one step toward the bottom of the draw order
    pub fn move_layer_down(&mut self, name: &str) -> bool {
        match self.layer_index(name) {
            Some(index) if index > 0 => {
                self.swap_layers(index, index - 1);
                true
            }
            _ => false,
        }
    }

    fn swap_layers(&mut self, a: usize, b: usize) {
        self.layers.swap(a, b);
        if self.current_layer == a {
            self.current_layer = b;
        } else if self.current_layer == b {
            self.current_layer = a;
        }
        for (z, layer) in self.layers.iter_mut().enumerate() {
            layer.set_z_index(z as i32);
        }
    }

    /// Toggle layer visibility
    pub fn toggle_layer_visibility(&mut self, name: &str) -> bool {
        let Some(layer) = self.layer_mut(name) else {
            return false;
        };
        layer.visible = !layer.visible;
        true
    }

    /// True when no layer holds a tile
    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(Layer::is_empty)
    }

    pub fn needs_tile(&self, tile: TileId) -> bool {
        self.layers.iter().any(|l| l.needs_tile(tile))
    }

    pub fn remove_snapshots_needing_tile(&mut self, tile: TileId) -> usize {
        self.layers
            .iter_mut()
            .map(|l| l.remove_snapshots_needing_tile(tile))
            .sum()
    }

    /// Bounding box of every tile on every layer, in room cells
    pub fn content_bounds(&self) -> Option<(CellPos, CellPos)> {
        self.layers
            .iter()
            .filter_map(Layer::content_bounds)
            .reduce(|(lb, rt), (l, r)| {
                (
                    (lb.0.min(l.0), lb.1.min(l.1)),
                    (rt.0.max(r.0), rt.1.max(r.1)),
                )
            })
    }

    /// Whether the room overlaps the world rectangle `p1..p2` (half-open)
    pub fn overlaps(&self, p1: CellPos, p2: CellPos) -> bool {
        let rt = self.upper_bound();
        self.origin.0 < p2.0 && p1.0 < rt.0 && self.origin.1 < p2.1 && p1.1 < rt.1
    }

    pub(crate) fn move_to(&mut self, origin: CellPos) {
        self.origin = origin;
    }

    /// Rebuild every layer on a `new_size` grid, keeping the `old_lb..old_rt`
    /// area of the current room at the new room's origin. Undo history is
    /// cleared.
    pub fn adjust(
        &mut self,
        new_origin: CellPos,
        new_size: (u32, u32),
        old_lb: CellPos,
        old_rt: CellPos,
    ) -> Result<(), ResizeError> {
        if old_lb.0 < 0
            || old_lb.1 < 0
            || old_rt.0 < old_lb.0
            || old_rt.1 < old_lb.1
            || old_rt.0 > self.size.0 as i32
            || old_rt.1 > self.size.1 as i32
        {
            return Err(ResizeError::OutOfRoom);
        }
        if (old_rt.0 - old_lb.0) as u32 > new_size.0 || (old_rt.1 - old_lb.1) as u32 > new_size.1 {
            return Err(ResizeError::TooSmall);
        }
        if let Some((lb, rt)) = self.content_bounds() {
            if lb.0 < old_lb.0 || lb.1 < old_lb.1 || rt.0 > old_rt.0 || rt.1 > old_rt.1 {
                return Err(ResizeError::ContentClipped);
            }
        }

        for layer in &mut self.layers {
            layer.adjust(new_size, old_lb, old_rt);
        }
        self.origin = new_origin;
        self.size = new_size;
        tracing::debug!(
            "Room '{}' adjusted to {:?} at {:?}",
            self.name,
            new_size,
            new_origin
        );
        Ok(())
    }

    /// A copy with new instance ids and fresh undo histories
    pub fn duplicate(&self, name: impl Into<String>, origin: CellPos, snapshot_capacity: usize) -> Room {
        Room {
            name: name.into(),
            origin,
            size: self.size,
            layers: self
                .layers
                .iter()
                .map(|l| l.duplicate(snapshot_capacity))
                .collect(),
            current_layer: self.current_layer,
            visible: true,
            snapshot_capacity,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.layers.iter().any(Layer::is_dirty)
    }

    pub fn mark_saved(&mut self) {
        for layer in &mut self.layers {
            layer.mark_saved();
        }
    }

    pub fn to_json(&self) -> RoomJson {
        RoomJson {
            name: self.name.clone(),
            pos: self.origin,
            size: self.size,
            layers: self
                .layers
                .iter()
                .map(|l| LayerEntry {
                    name: l.name().to_string(),
                    data: l.to_json(self.origin),
                })
                .collect(),
        }
    }

    /// Rebuild a room, re-stamping every layer through the catalog
    pub fn from_json(
        json: &RoomJson,
        catalog: &TileCatalog,
        snapshot_capacity: usize,
    ) -> Result<Room, LoadError> {
        if cell_count(json.size).is_none() {
            return Err(LoadError::TooLarge(json.name.clone()));
        }
        let mut layers: Vec<Layer> = Vec::with_capacity(json.layers.len());
        for entry in &json.layers {
            if layers.iter().any(|l| l.name() == entry.name) {
                return Err(LoadError::DuplicateLayer(entry.name.clone()));
            }
            let mut layer = Layer::from_json(&entry.data, json.size, catalog, snapshot_capacity)?;
            layer.set_name(entry.name.clone());
            layers.push(layer);
        }
        if layers.is_empty() {
            layers.push(Layer::new(DEFAULT_LAYER_NAME, json.size, 0, snapshot_capacity));
        }

        Ok(Room {
            name: json.name.clone(),
            origin: json.pos,
            size: json.size,
            layers,
            current_layer: 0,
            visible: true,
            snapshot_capacity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brush::Brush;

    fn catalog() -> TileCatalog {
        let mut catalog = TileCatalog::new();
        catalog.register("grass", (1, 1), None).unwrap();
        catalog.register("tree", (2, 2), None).unwrap();
        catalog
    }

    fn grass() -> Brush {
        Brush::Unit { id: 1, tile_id: 1 }
    }

    fn tree() -> Brush {
        Brush::Tile {
            id: 2,
            tile_id: 2,
            footprint: (2, 2),
        }
    }

    #[test]
    fn test_new_room_has_default_layer() {
        let room = Room::new("room 0", (0, 0), (8, 6));
        assert_eq!(room.layers().len(), 1);
        assert_eq!(room.current_layer().name(), DEFAULT_LAYER_NAME);
        assert_eq!(room.current_layer().size(), (8, 6));
        assert!(room.is_empty());
    }

    #[test]
    fn test_layer_management() {
        let mut room = Room::new("room 0", (0, 0), (4, 4));
        assert_eq!(room.create_layer().name(), "layer 1");
        assert!(room.add_layer("props").is_some());
        assert!(room.add_layer("props").is_none());
        assert_eq!(room.layer("props").map(Layer::z_index), Some(2));

        assert!(room.rename_layer("layer 1", "walls"));
        assert!(!room.rename_layer("walls", "props"));
        assert!(!room.rename_layer("missing", "other"));

        assert!(room.move_layer_up("walls"));
        assert_eq!(room.layers()[2].name(), "walls");
        assert_eq!(room.layer("walls").map(Layer::z_index), Some(2));
        assert!(!room.move_layer_up("walls"));
        assert!(room.move_layer_down("walls"));
        assert!(!room.move_layer_down(DEFAULT_LAYER_NAME));

        assert!(room.toggle_layer_visibility("props"));
        assert_eq!(room.layer("props").map(|l| l.visible), Some(false));
    }

    #[test]
    fn test_last_layer_cannot_be_removed() {
        let mut room = Room::new("room 0", (0, 0), (4, 4));
        room.add_layer("top");
        assert!(room.set_current_layer("top"));

        assert!(room.remove_layer("top").is_some());
        assert_eq!(room.current_layer().name(), DEFAULT_LAYER_NAME);
        assert!(room.remove_layer(DEFAULT_LAYER_NAME).is_none());
        assert_eq!(room.layers().len(), 1);
    }

    #[test]
    fn test_content_bounds_span_layers() {
        let catalog = catalog();
        let mut room = Room::new("room 0", (0, 0), (10, 10));
        room.current_layer_mut().draw(&grass(), (1, 5), &catalog).unwrap();
        room.add_layer("top")
            .unwrap()
            .draw(&tree(), (6, 2), &catalog)
            .unwrap();

        assert_eq!(room.content_bounds(), Some(((1, 2), (8, 6))));
        assert!(!room.is_empty());
        assert!(room.needs_tile(2));
    }

    #[test]
    fn test_adjust_keeps_content() {
        let catalog = catalog();
        let mut room = Room::new("room 0", (0, 0), (10, 10));
        room.current_layer_mut().draw(&tree(), (4, 4), &catalog).unwrap();
        room.current_layer_mut().save_snapshot();
        room.add_layer("top");

        assert_eq!(
            room.adjust((4, 4), (1, 1), (4, 4), (6, 6)),
            Err(ResizeError::TooSmall)
        );
        assert_eq!(
            room.adjust((5, 5), (3, 3), (5, 5), (8, 8)),
            Err(ResizeError::ContentClipped)
        );
        assert_eq!(
            room.adjust((0, 0), (3, 3), (8, 8), (11, 11)),
            Err(ResizeError::OutOfRoom)
        );
        assert_eq!(room.size(), (10, 10));
        assert_eq!(room.current_layer().snapshot_count(), 1);

        room.adjust((4, 4), (3, 2), (4, 4), (6, 6)).unwrap();
        assert_eq!(room.size(), (3, 2));
        assert_eq!(room.origin(), (4, 4));
        let layer = room.current_layer();
        assert_eq!(layer.instances()[0].pos, (0, 0));
        assert_eq!(layer.grid().get((0, 0)), Some(2));
        assert_eq!(layer.snapshot_count(), 0);
        assert_eq!(room.layer("top").map(Layer::size), Some((3, 2)));
    }

    #[test]
    fn test_adjust_empty_room() {
        let mut room = Room::new("room 0", (0, 0), (4, 4));
        room.adjust((2, 2), (1, 1), (0, 0), (0, 0)).unwrap();
        assert_eq!(room.size(), (1, 1));
    }

    #[test]
    fn test_overlaps() {
        let room = Room::new("room 0", (2, 2), (3, 3));
        assert!(room.overlaps((4, 4), (6, 6)));
        assert!(!room.overlaps((5, 2), (8, 8)));
        assert!(!room.overlaps((0, 0), (2, 10)));
    }

    #[test]
    fn test_duplicate_gets_new_ids() {
        let catalog = catalog();
        let mut room = Room::new("room 0", (0, 0), (4, 4));
        let id = room.current_layer_mut().draw(&grass(), (0, 0), &catalog).unwrap()[0];

        let copy = room.duplicate("room 1", (10, 0), 5);
        assert_eq!(copy.name(), "room 1");
        assert_eq!(copy.origin(), (10, 0));
        assert_eq!(copy.current_layer().instances().len(), 1);
        assert_ne!(copy.current_layer().instances()[0].id, id);
        assert_eq!(copy.current_layer().grid().cells(), room.current_layer().grid().cells());
    }

    #[test]
    fn test_json_round_trip() {
        let catalog = catalog();
        let mut room = Room::new("cave", (3, -4), (6, 6));
        room.current_layer_mut().draw(&tree(), (0, 0), &catalog).unwrap();
        room.add_layer("top")
            .unwrap()
            .flood_fill(&grass(), (0, 0), &catalog)
            .unwrap();

        let text = serde_json::to_string_pretty(&room.to_json()).unwrap();
        let json: RoomJson = serde_json::from_str(&text).unwrap();
        let loaded = Room::from_json(&json, &catalog, DEFAULT_SNAPSHOT_CAPACITY).unwrap();

        assert_eq!(loaded.name(), "cave");
        assert_eq!(loaded.origin(), (3, -4));
        assert_eq!(loaded.layers().len(), 2);
        for (a, b) in room.layers().iter().zip(loaded.layers()) {
            assert_eq!(a.name(), b.name());
            assert_eq!(a.z_index(), b.z_index());
            assert_eq!(a.grid().cells(), b.grid().cells());
        }
        assert_eq!(loaded.to_json(), room.to_json());
    }

    #[test]
    fn test_from_json_rejects_duplicate_layers() {
        let catalog = catalog();
        let room = Room::new("room 0", (0, 0), (2, 2));
        let mut json = room.to_json();
        json.layers.push(json.layers[0].clone());

        assert_eq!(
            Room::from_json(&json, &catalog, 1).err(),
            Some(LoadError::DuplicateLayer(DEFAULT_LAYER_NAME.to_string()))
        );
    }

    #[test]
    fn test_from_json_rejects_oversized_room() {
        let catalog = catalog();
        let mut json = Room::new("room 0", (0, 0), (2, 2)).to_json();
        json.size = (100_000, 100_000);

        assert_eq!(
            Room::from_json(&json, &catalog, 1).err(),
            Some(LoadError::TooLarge("room 0".to_string()))
        );
    }
}
