//! Tile layers
//!
//! A [`Layer`] owns one [`GridMap`] and the [`TileInstance`]s placed on it.
//! Every edit keeps the two in step: the grid holds exactly the footprints
//! of the instances, and no two footprints overlap.

use uuid::Uuid;

use crate::brush::{Brush, Placement};
use crate::error::{EditError, LoadError};
use crate::fill;
use crate::format::{LayerJson, TileRecord};
use crate::grid::{cell_count, CellPos, GridMap};
use crate::instance::TileInstance;
use crate::region::RawRegion;
use crate::snapshot::{Snapshot, SnapshotHistory};
use crate::tile::{TileCatalog, TileId};

#[derive(Debug, Clone)]
pub struct Layer {
    name: String,
    pub visible: bool,
    z_index: i32,
    grid: GridMap,
    instances: Vec<TileInstance>,
    history: SnapshotHistory,
    /// Set by edits, cleared when a snapshot is taken
    changed: bool,
}

impl Layer {
    /// Create an empty layer of `size` cells
    pub fn new(name: impl Into<String>, size: (u32, u32), z_index: i32, snapshot_capacity: usize) -> Self {
        let grid = GridMap::new(size);
        let baseline = Snapshot::capture(&grid, &[]);
        Self {
            name: name.into(),
            visible: true,
            z_index,
            grid,
            instances: Vec::new(),
            history: SnapshotHistory::new(snapshot_capacity, baseline),
            changed: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub fn z_index(&self) -> i32 {
        self.z_index
    }

    /// Set the draw order of the layer and every tile on it
    pub(crate) fn set_z_index(&mut self, z_index: i32) {
        self.z_index = z_index;
        for instance in &mut self.instances {
            instance.z_index = z_index;
        }
    }

    pub fn size(&self) -> (u32, u32) {
        self.grid.size()
    }

    pub fn grid(&self) -> &GridMap {
        &self.grid
    }

    pub fn instances(&self) -> &[TileInstance] {
        &self.instances
    }

    pub fn instance(&self, id: Uuid) -> Option<&TileInstance> {
        self.instances.iter().find(|i| i.id == id)
    }

    /// Instance whose footprint covers `cell`
    pub fn instance_at(&self, cell: CellPos) -> Option<&TileInstance> {
        self.instances.iter().find(|i| i.covers(cell))
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn has_changed(&self) -> bool {
        self.changed
    }

    pub fn is_dirty(&self) -> bool {
        self.grid.is_dirty()
    }

    pub fn mark_saved(&mut self) {
        self.grid.mark_saved();
    }

    fn spawn(&mut self, pos: CellPos, placements: &[Placement]) -> Vec<Uuid> {
        let created: Vec<TileInstance> = placements
            .iter()
            .map(|p| {
                let anchor = (pos.0 + p.offset.0 as i32, pos.1 + p.offset.1 as i32);
                TileInstance::new(p.tile_id, anchor, p.footprint, self.z_index)
            })
            .collect();
        let ids = created.iter().map(|i| i.id).collect();
        self.instances.extend(created);
        self.changed = true;
        ids
    }

    /// Paint `brush` with its origin at `pos`, returning the new instance ids
    pub fn draw(&mut self, brush: &Brush, pos: CellPos, catalog: &TileCatalog) -> Result<Vec<Uuid>, EditError> {
        let placements = brush.placements(catalog)?;
        if !self.grid.fits(pos, brush.footprint()) {
            return Err(EditError::OutOfBounds);
        }
        if !brush.draw(pos, &mut self.grid, catalog) {
            return Err(EditError::Collision);
        }
        Ok(self.spawn(pos, &placements))
    }

    /// Remove the tile covering `cell`
    pub fn erase(&mut self, cell: CellPos) -> Option<TileInstance> {
        let index = self.instances.iter().position(|i| i.covers(cell))?;
        Some(self.remove_at(index))
    }

    pub fn erase_instance(&mut self, id: Uuid) -> Option<TileInstance> {
        let index = self.instances.iter().position(|i| i.id == id)?;
        Some(self.remove_at(index))
    }

    /// Remove every listed instance; unknown ids are ignored
    pub fn erase_instances(&mut self, ids: &[Uuid]) -> Vec<TileInstance> {
        ids.iter().filter_map(|&id| self.erase_instance(id)).collect()
    }

    fn remove_at(&mut self, index: usize) -> TileInstance {
        let instance = self.instances.remove(index);
        self.grid.erase(instance.pos, instance.footprint);
        self.changed = true;
        instance
    }

    /// Fill the free area around `start` with `brush`, returning the new instance ids.
    ///
    /// A blocked or out-of-bounds start fills nothing.
    pub fn flood_fill(&mut self, brush: &Brush, start: CellPos, catalog: &TileCatalog) -> Result<Vec<Uuid>, EditError> {
        let placements = brush.placements(catalog)?;
        let stamp = brush.stamp(catalog)?;
        let pool = fill::flood_fill(&mut self.grid, &stamp, start);

        let mut created = Vec::new();
        for anchor in pool {
            created.extend(self.spawn(anchor, &placements));
        }
        Ok(created)
    }

    /// Ids of instances whose footprint overlaps the rectangle spanned by two corner cells
    pub fn instances_in_rect(&self, p1: CellPos, p2: CellPos) -> Vec<Uuid> {
        let lb = (p1.0.min(p2.0), p1.1.min(p2.1));
        let rt = (p1.0.max(p2.0) + 1, p1.1.max(p2.1) + 1);
        self.instances
            .iter()
            .filter(|i| i.intersects(lb, rt))
            .map(|i| i.id)
            .collect()
    }

    /// Lift the listed instances into a region; `None` if none of them are on this layer
    pub fn select_instances(&self, ids: &[Uuid]) -> Option<RawRegion> {
        RawRegion::from_instances(self.instances.iter().filter(|i| ids.contains(&i.id)))
    }

    /// Region of every instance touching the rectangle spanned by two corner cells
    pub fn select_area(&self, p1: CellPos, p2: CellPos) -> Option<RawRegion> {
        self.select_instances(&self.instances_in_rect(p1, p2))
    }

    /// Whether every tile of `region` still sits where the region recorded it
    fn region_is_current(&self, region: &RawRegion) -> bool {
        region.tiles().iter().all(|t| {
            self.instance(t.instance)
                .is_some_and(|i| i.pos == region.tile_position(t) && i.tile_id == t.tile_id)
        })
    }

    /// Shift the tiles of `region` by `offset`.
    ///
    /// On success the instances and the region anchor both move. On failure
    /// the grid, the instances and the anchor are unchanged. A zero offset
    /// does nothing and returns false.
    pub fn try_move(&mut self, region: &mut RawRegion, offset: CellPos) -> bool {
        if offset == (0, 0) {
            return false;
        }
        if !self.region_is_current(region) {
            tracing::warn!("Layer '{}': selection is stale, move ignored", self.name);
            return false;
        }
        if !self.grid.can_move(region, offset) {
            return false;
        }
        for instance in &mut self.instances {
            if region.contains_instance(instance.id) {
                instance.pos = (instance.pos.0 + offset.0, instance.pos.1 + offset.1);
            }
        }
        self.changed = true;
        true
    }

    /// Stamp a copy of `region` with its anchor at `dest`, creating fresh instances
    pub fn try_copy(&mut self, region: &RawRegion, dest: CellPos) -> Result<Vec<Uuid>, EditError> {
        if region.is_empty() {
            return Err(EditError::EmptyRegion);
        }
        if !self.grid.fits(dest, region.size()) {
            return Err(EditError::OutOfBounds);
        }
        if !self.grid.draw(dest, region.stamp()) {
            return Err(EditError::Collision);
        }
        let placements: Vec<Placement> = region
            .tiles()
            .iter()
            .map(|t| Placement {
                offset: t.offset,
                tile_id: t.tile_id,
                footprint: t.footprint,
            })
            .collect();
        Ok(self.spawn(dest, &placements))
    }

    /// Checkpoint the current state
    pub fn save_snapshot(&mut self) {
        self.history
            .record(Snapshot::capture(&self.grid, &self.instances));
        self.changed = false;
    }

    /// Checkpoint only if something was edited since the last checkpoint
    pub fn save_snapshot_when_changed(&mut self) -> bool {
        if !self.changed {
            return false;
        }
        self.save_snapshot();
        true
    }

    /// Return to the previous checkpoint. False when there is nothing to
    /// undo, or the checkpoint holds a tile the catalog no longer has.
    pub fn restore_snapshot(&mut self, catalog: &TileCatalog) -> bool {
        let Some(latest) = self.history.latest() else {
            return false;
        };
        if let Some(tile_id) = latest.positions().values().find(|&&t| !catalog.contains(t)) {
            tracing::warn!("Layer '{}': snapshot references unknown tile {}", self.name, tile_id);
            return false;
        }
        let Some(snapshot) = self.history.undo() else {
            return false;
        };

        self.grid = snapshot.grid().clone();
        self.grid.mark_dirty();
        self.instances.clear();
        for (&pos, &tile_id) in snapshot.positions() {
            let Some(footprint) = catalog.footprint(tile_id) else {
                continue;
            };
            self.instances
                .push(TileInstance::new(tile_id, pos, footprint, self.z_index));
        }
        self.changed = false;
        tracing::debug!("Layer '{}': restored snapshot, {} left", self.name, self.history.len());
        true
    }

    pub fn snapshot_count(&self) -> usize {
        self.history.len()
    }

    /// Drop undo entries that mention `tile`; the layer itself must no longer use it
    pub fn remove_snapshots_needing_tile(&mut self, tile: TileId) -> usize {
        let (grid, instances) = (&self.grid, &self.instances);
        self.history
            .remove_needing_tile(tile, || Snapshot::capture(grid, instances))
    }

    /// Forget the undo history and checkpoint the current state
    pub fn clear_snapshots(&mut self) {
        self.history
            .reset(Snapshot::capture(&self.grid, &self.instances));
        self.changed = false;
    }

    pub fn needs_tile(&self, tile: TileId) -> bool {
        self.instances.iter().any(|i| i.tile_id == tile) || self.grid.contains_tile(tile)
    }

    /// Bounding box of all placed tiles as (lower-left, one past top-right)
    pub fn content_bounds(&self) -> Option<(CellPos, CellPos)> {
        let lb = (
            self.instances.iter().map(|i| i.pos.0).min()?,
            self.instances.iter().map(|i| i.pos.1).min()?,
        );
        let rt = (
            self.instances.iter().map(|i| i.upper_bound().0).max()?,
            self.instances.iter().map(|i| i.upper_bound().1).max()?,
        );
        Some((lb, rt))
    }

    /// Rebuild on a `new_size` grid keeping the `lb..rt` area at the new origin.
    /// The caller guarantees every tile lies inside `lb..rt`.
    pub(crate) fn adjust(&mut self, new_size: (u32, u32), lb: CellPos, rt: CellPos) {
        self.grid = self.grid.resized(new_size, lb, rt);
        for instance in &mut self.instances {
            instance.pos = (instance.pos.0 - lb.0, instance.pos.1 - lb.1);
        }
        self.clear_snapshots();
    }

    /// Same contents under new instance ids, with a fresh history
    pub fn duplicate(&self, snapshot_capacity: usize) -> Layer {
        let mut grid = self.grid.clone();
        grid.mark_dirty();
        let instances: Vec<TileInstance> = self
            .instances
            .iter()
            .map(|i| TileInstance::new(i.tile_id, i.pos, i.footprint, i.z_index))
            .collect();
        let baseline = Snapshot::capture(&grid, &instances);
        Layer {
            name: self.name.clone(),
            visible: self.visible,
            z_index: self.z_index,
            grid,
            instances,
            history: SnapshotHistory::new(snapshot_capacity, baseline),
            changed: false,
        }
    }

    /// Serialize for a room at world position `origin`
    pub fn to_json(&self, origin: CellPos) -> LayerJson {
        LayerJson {
            name: self.name.clone(),
            pos: origin,
            size: self.grid.size(),
            index: self.z_index,
            tiles: self
                .instances
                .iter()
                .map(|i| TileRecord {
                    pos: i.pos,
                    tile_id: i.tile_id,
                })
                .collect(),
        }
    }

    /// Rebuild a layer of `size` cells by re-stamping every recorded tile
    pub fn from_json(
        json: &LayerJson,
        size: (u32, u32),
        catalog: &TileCatalog,
        snapshot_capacity: usize,
    ) -> Result<Layer, LoadError> {
        if cell_count(size).is_none() {
            return Err(LoadError::TooLarge(json.name.clone()));
        }
        let mut layer = Layer::new(json.name.clone(), size, json.index, snapshot_capacity);
        for record in &json.tiles {
            let stamp = catalog.stamp(record.tile_id).ok_or_else(|| LoadError::UnknownTile {
                layer: json.name.clone(),
                tile: record.tile_id,
            })?;
            if !layer.grid.fits(record.pos, stamp.size()) {
                return Err(LoadError::OutOfBounds {
                    layer: json.name.clone(),
                    pos: record.pos,
                });
            }
            if !layer.grid.draw(record.pos, &stamp) {
                return Err(LoadError::Collision {
                    layer: json.name.clone(),
                    pos: record.pos,
                });
            }
            layer.instances.push(TileInstance::new(
                record.tile_id,
                record.pos,
                stamp.size(),
                json.index,
            ));
        }
        layer.grid.mark_saved();
        layer.clear_snapshots();
        Ok(layer)
    }
}
