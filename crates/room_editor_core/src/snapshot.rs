//! Bounded undo history for a layer
//!
//! The history keeps a *baseline*: the layer state captured at the last
//! checkpoint. Recording pushes the baseline onto the stack and replaces it
//! with the current state, so undoing returns to the previous checkpoint.

use std::collections::{BTreeMap, VecDeque};

use crate::grid::{CellPos, GridMap};
use crate::instance::TileInstance;
use crate::tile::TileId;

/// Entries kept per layer unless configured otherwise
pub const DEFAULT_SNAPSHOT_CAPACITY: usize = 20;

/// Grid contents plus the anchor of every placed tile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    grid: GridMap,
    positions: BTreeMap<CellPos, TileId>,
}

impl Snapshot {
    pub fn capture(grid: &GridMap, instances: &[TileInstance]) -> Self {
        Self {
            grid: grid.clone(),
            positions: instances.iter().map(|i| (i.pos, i.tile_id)).collect(),
        }
    }

    pub fn grid(&self) -> &GridMap {
        &self.grid
    }

    pub fn positions(&self) -> &BTreeMap<CellPos, TileId> {
        &self.positions
    }

    pub fn needs_tile(&self, tile: TileId) -> bool {
        self.positions.values().any(|&t| t == tile) || self.grid.contains_tile(tile)
    }
}

#[derive(Debug, Clone)]
pub struct SnapshotHistory {
    capacity: usize,
    entries: VecDeque<Snapshot>,
    baseline: Snapshot,
}

impl SnapshotHistory {
    pub fn new(capacity: usize, baseline: Snapshot) -> Self {
        Self {
            capacity,
            entries: VecDeque::new(),
            baseline,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn baseline(&self) -> &Snapshot {
        &self.baseline
    }

    /// Push the baseline and make `current` the new one; the oldest entry is dropped at capacity
    pub fn record(&mut self, current: Snapshot) {
        let previous = std::mem::replace(&mut self.baseline, current);
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(previous);
    }

    /// Entry the next undo would return
    pub fn latest(&self) -> Option<&Snapshot> {
        self.entries.back()
    }

    /// Pop the newest entry, which also becomes the baseline
    pub fn undo(&mut self) -> Option<Snapshot> {
        let snapshot = self.entries.pop_back()?;
        self.baseline = snapshot.clone();
        Some(snapshot)
    }

    /// Drop every entry and start over from `baseline`
    pub fn reset(&mut self, baseline: Snapshot) {
        self.entries.clear();
        self.baseline = baseline;
    }

    /// Drop entries that reference `tile`, returning how many were removed.
    ///
    /// A baseline referencing `tile` is replaced by `current`, which must
    /// itself be free of the tile.
    pub fn remove_needing_tile(&mut self, tile: TileId, current: impl FnOnce() -> Snapshot) -> usize {
        let before = self.entries.len();
        self.entries.retain(|s| !s.needs_tile(tile));
        if self.baseline.needs_tile(tile) {
            self.baseline = current();
        }
        before - self.entries.len()
    }
}
