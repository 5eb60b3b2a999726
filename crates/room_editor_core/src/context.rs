//! Shared editing state
//!
//! [`EditorContext`] owns the tile catalog and every subsystem that can
//! reference tiles. It is built once and passed to whatever needs catalog
//! lookups or cross-subsystem checks, such as the tile delete guard.

use uuid::Uuid;

use crate::brush::{BrushId, BrushLibrary};
use crate::error::{CatalogError, PaletteError, TileRemovalError};
use crate::format::MapExport;
use crate::map::RoomMap;
use crate::palette::{Palette, DEFAULT_PALETTE_SIZE};
use crate::snapshot::DEFAULT_SNAPSHOT_CAPACITY;
use crate::template::TemplateLibrary;
use crate::tile::{Tile, TileCatalog, TileId};

/// Subsystems that can keep a tile alive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileDependent {
    BrushLibrary,
    Palette,
    Map,
    Templates,
}

impl std::fmt::Display for TileDependent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TileDependent::BrushLibrary => write!(f, "brush library"),
            TileDependent::Palette => write!(f, "palette"),
            TileDependent::Map => write!(f, "map"),
            TileDependent::Templates => write!(f, "template library"),
        }
    }
}

/// Answers whether a subsystem still references a tile
pub trait TileDependency {
    fn dependent(&self) -> TileDependent;
    fn needs_tile(&self, tile: TileId) -> bool;
}

impl TileDependency for BrushLibrary {
    fn dependent(&self) -> TileDependent {
        TileDependent::BrushLibrary
    }

    fn needs_tile(&self, tile: TileId) -> bool {
        BrushLibrary::needs_tile(self, tile)
    }
}

impl TileDependency for Palette {
    fn dependent(&self) -> TileDependent {
        TileDependent::Palette
    }

    fn needs_tile(&self, tile: TileId) -> bool {
        Palette::needs_tile(self, tile)
    }
}

impl TileDependency for RoomMap {
    fn dependent(&self) -> TileDependent {
        TileDependent::Map
    }

    fn needs_tile(&self, tile: TileId) -> bool {
        RoomMap::needs_tile(self, tile)
    }
}

impl TileDependency for TemplateLibrary {
    fn dependent(&self) -> TileDependent {
        TileDependent::Templates
    }

    fn needs_tile(&self, tile: TileId) -> bool {
        TemplateLibrary::needs_tile(self, tile)
    }
}

#[derive(Debug, Clone)]
pub struct EditorContext {
    pub catalog: TileCatalog,
    pub brushes: BrushLibrary,
    pub palette: Palette,
    pub rooms: RoomMap,
    pub templates: TemplateLibrary,
    snapshot_capacity: usize,
}

impl Default for EditorContext {
    fn default() -> Self {
        Self::with_snapshot_capacity(DEFAULT_SNAPSHOT_CAPACITY)
    }
}

impl EditorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot_capacity(snapshot_capacity: usize) -> Self {
        Self::with_settings(snapshot_capacity, DEFAULT_PALETTE_SIZE)
    }

    pub fn with_settings(snapshot_capacity: usize, palette_size: (u32, u32)) -> Self {
        Self {
            catalog: TileCatalog::new(),
            brushes: BrushLibrary::new(),
            palette: Palette::new(palette_size, snapshot_capacity),
            rooms: RoomMap::new(snapshot_capacity),
            templates: TemplateLibrary::new(),
            snapshot_capacity,
        }
    }

    /// Assemble a context from loaded parts
    pub fn from_parts(
        catalog: TileCatalog,
        brushes: BrushLibrary,
        palette: Palette,
        rooms: RoomMap,
        templates: TemplateLibrary,
        snapshot_capacity: usize,
    ) -> Self {
        let mut context = Self {
            catalog,
            brushes,
            palette,
            rooms,
            templates,
            snapshot_capacity,
        };
        context.brushes.reload_tile_brushes(&context.catalog);
        context
    }

    pub fn snapshot_capacity(&self) -> usize {
        self.snapshot_capacity
    }

    /// Register a tile and give it a brush
    pub fn register_tile(
        &mut self,
        name: impl Into<String>,
        footprint: (u32, u32),
        image: Option<String>,
    ) -> Result<TileId, CatalogError> {
        let id = self.catalog.register(name, footprint, image)?;
        self.brushes.reload_tile_brushes(&self.catalog);
        Ok(id)
    }

    /// Subsystems in the order the delete guard asks them
    pub fn dependents(&self) -> [&dyn TileDependency; 4] {
        [&self.brushes, &self.palette, &self.rooms, &self.templates]
    }

    /// First subsystem still referencing `tile`
    pub fn tile_dependent(&self, tile: TileId) -> Option<TileDependent> {
        self.dependents()
            .into_iter()
            .find(|d| d.needs_tile(tile))
            .map(|d| d.dependent())
    }

    /// Delete a tile nothing references any more.
    ///
    /// Undo entries that still mention the tile are dropped so an undo can
    /// never bring it back.
    pub fn remove_tile(&mut self, tile: TileId) -> Result<Tile, TileRemovalError> {
        if !self.catalog.contains(tile) {
            return Err(TileRemovalError::UnknownTile(tile));
        }
        if let Some(by) = self.tile_dependent(tile) {
            tracing::warn!("Tile {} is still used by the {}", tile, by);
            return Err(TileRemovalError::InUse { tile, by });
        }

        let purged = self.rooms.remove_snapshots_needing_tile(tile)
            + self.palette.canvas_mut().remove_snapshots_needing_tile(tile);
        let removed = self
            .catalog
            .remove(tile)
            .ok_or(TileRemovalError::UnknownTile(tile))?;
        self.brushes.reload_tile_brushes(&self.catalog);
        tracing::info!(
            "Removed tile '{}' ({}), dropped {} snapshots",
            removed.name,
            tile,
            purged
        );
        Ok(removed)
    }

    /// Build a composite brush from palette tiles and file it under `group`
    pub fn create_composite_brush(&mut self, group: &str, ids: &[Uuid]) -> Result<BrushId, PaletteError> {
        if self.brushes.group(group).is_none() {
            return Err(PaletteError::NoSuchGroup(group.to_string()));
        }
        let brush = self
            .palette
            .create_composite_brush(ids, self.brushes.maker_mut())?;
        let id = brush.id();
        if !self.brushes.add_brush(group, brush) {
            self.brushes.maker_mut().release(id);
            return Err(PaletteError::DuplicateBrush);
        }
        Ok(id)
    }

    /// Map data for the game runtime
    pub fn export_map_data(&self) -> MapExport {
        MapExport {
            lut: self.catalog.lookup_table(),
            rooms: self.rooms.to_json(),
        }
    }

    /// True when nothing changed since the last save
    pub fn is_saved(&self) -> bool {
        self.rooms.is_saved() && !self.palette.canvas().is_dirty()
    }

    pub fn mark_saved(&mut self) {
        self.rooms.mark_saved();
        self.palette.canvas_mut().mark_saved();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brush::Brush;

    fn context() -> (EditorContext, TileId, TileId) {
        let mut context = EditorContext::new();
        let grass = context.register_tile("grass", (1, 1), None).unwrap();
        let tree = context.register_tile("tree", (2, 2), None).unwrap();
        (context, grass, tree)
    }

    #[test]
    fn test_register_tile_creates_brush() {
        let (context, grass, tree) = context();
        assert!(matches!(context.brushes.tile_brush(grass), Some(Brush::Unit { .. })));
        assert!(matches!(context.brushes.tile_brush(tree), Some(Brush::Tile { .. })));
    }

    #[test]
    fn test_unused_tile_can_be_removed() {
        let (mut context, grass, tree) = context();
        let removed = context.remove_tile(tree).unwrap();
        assert_eq!(removed.name, "tree");
        assert!(!context.catalog.contains(tree));
        assert!(context.brushes.tile_brush(tree).is_none());
        assert!(context.brushes.tile_brush(grass).is_some());
        assert_eq!(context.remove_tile(tree), Err(TileRemovalError::UnknownTile(tree)));
    }

    #[test]
    fn test_delete_guard_checks_in_order() {
        let (mut context, grass, _) = context();
        let brush = context.brushes.tile_brush(grass).cloned().unwrap();

        let room = context.rooms.create_room((0, 0), (4, 4)).unwrap();
        room.current_layer_mut().draw(&brush, (1, 1), &context.catalog).unwrap();
        let palette_ids = context
            .palette
            .canvas_mut()
            .draw(&brush, (0, 0), &context.catalog)
            .unwrap();

        assert_eq!(
            context.remove_tile(grass),
            Err(TileRemovalError::InUse {
                tile: grass,
                by: TileDependent::Palette
            })
        );

        context.palette.canvas_mut().erase_instances(&palette_ids);
        assert_eq!(context.tile_dependent(grass), Some(TileDependent::Map));

        let room = context.rooms.room_mut("room 0").unwrap();
        context
            .templates
            .record(crate::template::DEFAULT_TEMPLATE_GROUP, room, "t")
            .unwrap();
        room.current_layer_mut().erase((1, 1));
        assert_eq!(context.tile_dependent(grass), Some(TileDependent::Templates));

        context
            .templates
            .remove_template(crate::template::DEFAULT_TEMPLATE_GROUP, "t");
        assert!(context.catalog.contains(grass));
        assert!(context.remove_tile(grass).is_ok());
    }

    #[test]
    fn test_brush_group_pins_tile() {
        let (mut context, grass, _) = context();
        let brush = context.brushes.tile_brush(grass).cloned().unwrap();
        context.brushes.add_group("mine");
        context.brushes.add_brush("mine", brush);

        assert_eq!(context.tile_dependent(grass), Some(TileDependent::BrushLibrary));
    }

    #[test]
    fn test_remove_tile_purges_snapshots() {
        let (mut context, grass, tree) = context();
        let brush = context.brushes.tile_brush(tree).cloned().unwrap();
        let room = context.rooms.create_room((0, 0), (4, 4)).unwrap();
        let layer = room.current_layer_mut();
        layer.draw(&brush, (0, 0), &context.catalog).unwrap();
        layer.save_snapshot();
        layer.erase((0, 0));
        layer.save_snapshot();

        context.remove_tile(tree).unwrap();
        let layer = context.rooms.room_mut("room 0").unwrap().current_layer_mut();
        assert_eq!(layer.snapshot_count(), 1);
        assert!(layer.restore_snapshot(&context.catalog));
        assert!(layer.is_empty());
        assert!(!layer.restore_snapshot(&context.catalog));
        assert!(context.catalog.contains(grass));
    }

    #[test]
    fn test_undo_after_remove_tile_stays_clean() {
        let (mut context, _, tree) = context();
        let brush = context.brushes.tile_brush(tree).cloned().unwrap();
        let room = context.rooms.create_room((0, 0), (4, 4)).unwrap();
        let layer = room.current_layer_mut();
        layer.draw(&brush, (0, 0), &context.catalog).unwrap();
        layer.save_snapshot();
        layer.erase((0, 0));

        context.remove_tile(tree).unwrap();
        let layer = context.rooms.room_mut("room 0").unwrap().current_layer_mut();
        layer.save_snapshot();
        while layer.restore_snapshot(&context.catalog) {
            assert!(layer.grid().is_empty());
            assert!(layer.is_empty());
        }
        assert!(!layer.needs_tile(tree));
    }

    #[test]
    fn test_composite_brush_from_palette() {
        let (mut context, grass, tree) = context();
        let unit = context.brushes.tile_brush(grass).cloned().unwrap();
        let big = context.brushes.tile_brush(tree).cloned().unwrap();
        let mut ids = context
            .palette
            .canvas_mut()
            .draw(&unit, (0, 0), &context.catalog)
            .unwrap();
        ids.extend(
            context
                .palette
                .canvas_mut()
                .draw(&big, (1, 0), &context.catalog)
                .unwrap(),
        );

        assert_eq!(
            context.create_composite_brush("nope", &ids),
            Err(PaletteError::NoSuchGroup("nope".to_string()))
        );
        context.brushes.add_group("combos");
        let id = context.create_composite_brush("combos", &ids).unwrap();
        assert!(context.brushes.find(id).is_some_and(Brush::is_composite));
        assert_eq!(context.tile_dependent(tree), Some(TileDependent::BrushLibrary));
        assert_eq!(
            context.create_composite_brush("combos", &ids),
            Err(PaletteError::DuplicateBrush)
        );
        assert_eq!(context.brushes.group("combos").map(|g| g.brushes.len()), Some(1));
    }

    #[test]
    fn test_export_map_data() {
        let (mut context, grass, _) = context();
        let brush = context.brushes.tile_brush(grass).cloned().unwrap();
        context
            .rooms
            .create_room((0, 0), (2, 2))
            .unwrap()
            .current_layer_mut()
            .draw(&brush, (1, 1), &context.catalog)
            .unwrap();

        let export = context.export_map_data();
        assert_eq!(export.lut.get("grass"), Some(&grass));
        assert_eq!(export.lut.get("tree"), Some(&2));
        assert_eq!(export.rooms.len(), 1);
        assert_eq!(export.rooms[0].layers[0].data.tiles[0].tile_id, grass);
    }
}
