//! Selections lifted out of a layer
//!
//! A [`RawRegion`] is the composed footprint of a set of placed tiles plus
//! enough bookkeeping to move or copy them as one unit. It is plain data: it
//! holds no reference to the layer it came from.

use uuid::Uuid;

use crate::grid::CellPos;
use crate::instance::TileInstance;
use crate::stamp::Stamp;
use crate::tile::TileId;

/// Result of the last move attempt on a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveOutcome {
    #[default]
    NotMoved,
    Moved,
    Rejected,
}

/// A tile inside a region, relative to the region anchor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionTile {
    pub instance: Uuid,
    pub offset: (u32, u32),
    pub tile_id: TileId,
    pub footprint: (u32, u32),
}

#[derive(Debug, Clone)]
pub struct RawRegion {
    anchor: CellPos,
    stamp: Stamp,
    tiles: Vec<RegionTile>,
    last_move: MoveOutcome,
}

impl RawRegion {
    /// Compose the bounding footprint of `instances`; `None` when there are none
    pub fn from_instances<'a>(instances: impl IntoIterator<Item = &'a TileInstance>) -> Option<Self> {
        let instances: Vec<&TileInstance> = instances.into_iter().collect();
        let lb = (
            instances.iter().map(|i| i.pos.0).min()?,
            instances.iter().map(|i| i.pos.1).min()?,
        );
        let rt = (
            instances.iter().map(|i| i.upper_bound().0).max()?,
            instances.iter().map(|i| i.upper_bound().1).max()?,
        );

        let mut stamp = Stamp::new((rt.0 - lb.0) as u32, (rt.1 - lb.1) as u32);
        let tiles = instances
            .iter()
            .map(|instance| {
                let offset = (
                    (instance.pos.0 - lb.0) as u32,
                    (instance.pos.1 - lb.1) as u32,
                );
                stamp.place_tile(offset, instance.tile_id, instance.footprint);
                RegionTile {
                    instance: instance.id,
                    offset,
                    tile_id: instance.tile_id,
                    footprint: instance.footprint,
                }
            })
            .collect();

        Some(Self {
            anchor: lb,
            stamp,
            tiles,
            last_move: MoveOutcome::NotMoved,
        })
    }

    /// Lower-left cell of the bounding box
    pub fn anchor(&self) -> CellPos {
        self.anchor
    }

    /// One past the top-right cell of the bounding box
    pub fn upper_bound(&self) -> CellPos {
        (
            self.anchor.0 + self.stamp.width() as i32,
            self.anchor.1 + self.stamp.height() as i32,
        )
    }

    pub fn size(&self) -> (u32, u32) {
        self.stamp.size()
    }

    pub fn stamp(&self) -> &Stamp {
        &self.stamp
    }

    pub fn tiles(&self) -> &[RegionTile] {
        &self.tiles
    }

    pub fn instance_ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.tiles.iter().map(|t| t.instance)
    }

    pub fn contains_instance(&self, id: Uuid) -> bool {
        self.tiles.iter().any(|t| t.instance == id)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn last_move(&self) -> MoveOutcome {
        self.last_move
    }

    /// Absolute anchor of a contained tile
    pub fn tile_position(&self, tile: &RegionTile) -> CellPos {
        (
            self.anchor.0 + tile.offset.0 as i32,
            self.anchor.1 + tile.offset.1 as i32,
        )
    }

    pub(crate) fn commit_move(&mut self, anchor: CellPos) {
        self.anchor = anchor;
        self.last_move = MoveOutcome::Moved;
    }

    pub(crate) fn reject_move(&mut self) {
        self.last_move = MoveOutcome::Rejected;
    }
}
