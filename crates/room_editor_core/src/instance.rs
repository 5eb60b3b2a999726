//! Placed tiles

use uuid::Uuid;

use crate::grid::CellPos;
use crate::tile::TileId;

/// One tile placed on a layer. `pos` is the anchor (lower-left) cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileInstance {
    pub id: Uuid,
    pub tile_id: TileId,
    pub pos: CellPos,
    pub footprint: (u32, u32),
    /// Draw order, copied from the owning layer
    pub z_index: i32,
}

impl TileInstance {
    pub fn new(tile_id: TileId, pos: CellPos, footprint: (u32, u32), z_index: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            tile_id,
            pos,
            footprint,
            z_index,
        }
    }

    /// One past the top-right covered cell
    pub fn upper_bound(&self) -> CellPos {
        (
            self.pos.0 + self.footprint.0 as i32,
            self.pos.1 + self.footprint.1 as i32,
        )
    }

    pub fn covers(&self, cell: CellPos) -> bool {
        let rt = self.upper_bound();
        cell.0 >= self.pos.0 && cell.1 >= self.pos.1 && cell.0 < rt.0 && cell.1 < rt.1
    }

    /// Whether the footprint overlaps the half-open rectangle `lb..rt`
    pub fn intersects(&self, lb: CellPos, rt: CellPos) -> bool {
        let own_rt = self.upper_bound();
        self.pos.0 < rt.0 && own_rt.0 > lb.0 && self.pos.1 < rt.1 && own_rt.1 > lb.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_covers_whole_footprint() {
        let instance = TileInstance::new(3, (2, 1), (2, 3), 0);
        assert!(instance.covers((2, 1)));
        assert!(instance.covers((3, 3)));
        assert!(!instance.covers((4, 1)));
        assert!(!instance.covers((2, 4)));
        assert_eq!(instance.upper_bound(), (4, 4));
    }

    #[test]
    fn test_intersects_rectangle() {
        let instance = TileInstance::new(3, (2, 2), (2, 2), 0);
        assert!(instance.intersects((0, 0), (3, 3)));
        assert!(!instance.intersects((0, 0), (2, 2)));
        assert!(instance.intersects((3, 3), (10, 10)));
    }

    #[test]
    fn test_ids_are_unique() {
        let a = TileInstance::new(1, (0, 0), (1, 1), 0);
        let b = TileInstance::new(1, (0, 0), (1, 1), 0);
        assert_ne!(a.id, b.id);
    }
}
