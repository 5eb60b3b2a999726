//! Footprint arrays
//!
//! A [`Stamp`] is a small row-major cell array with the same encoding as the
//! layer grid: `0` is free, a tile id marks the anchor (lower-left) cell of a
//! tile, and [`OCCUPIED_CELL`] marks the rest of that tile's footprint.

use crate::tile::{TileId, EMPTY_CELL, OCCUPIED_CELL};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Stamp {
    width: u32,
    height: u32,
    cells: Vec<u32>,
}

impl Stamp {
    /// An all-free stamp
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![EMPTY_CELL; width as usize * height as usize],
        }
    }

    /// The footprint array of a single tile
    pub fn for_tile(tile: TileId, footprint: (u32, u32)) -> Self {
        let mut stamp = Self::new(footprint.0, footprint.1);
        stamp.place_tile((0, 0), tile, footprint);
        stamp
    }

    /// Wrap raw cells; `None` if the length does not match
    pub fn from_cells(width: u32, height: u32, cells: Vec<u32>) -> Option<Self> {
        if (width as usize).checked_mul(height as usize) != Some(cells.len()) {
            return None;
        }
        Some(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Cell value, free outside the stamp
    pub fn get(&self, x: u32, y: u32) -> u32 {
        self.index(x, y).map_or(EMPTY_CELL, |i| self.cells[i])
    }

    pub fn set(&mut self, x: u32, y: u32, value: u32) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = value;
        }
    }

    /// Write a tile's footprint with its anchor at `offset`, clipped to the stamp
    pub fn place_tile(&mut self, offset: (u32, u32), tile: TileId, footprint: (u32, u32)) {
        for dy in 0..footprint.1 {
            for dx in 0..footprint.0 {
                let value = if dx == 0 && dy == 0 {
                    tile
                } else {
                    OCCUPIED_CELL
                };
                self.set(offset.0 + dx, offset.1 + dy, value);
            }
        }
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|&c| c == EMPTY_CELL)
    }

    /// Non-free cells as ((x, y), value)
    pub fn occupied(&self) -> impl Iterator<Item = ((u32, u32), u32)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c != EMPTY_CELL)
            .map(move |(i, &c)| (((i as u32) % width, (i as u32) / width), c))
    }

    /// Anchor cells as ((x, y), tile id)
    pub fn anchors(&self) -> impl Iterator<Item = ((u32, u32), TileId)> + '_ {
        self.occupied().filter(|(_, c)| *c != OCCUPIED_CELL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_stamp_encoding() {
        let stamp = Stamp::for_tile(3, (2, 2));
        assert_eq!(stamp.cells(), &[3, OCCUPIED_CELL, OCCUPIED_CELL, OCCUPIED_CELL]);
        assert_eq!(stamp.anchors().collect::<Vec<_>>(), vec![((0, 0), 3)]);
    }

    #[test]
    fn test_place_tile_clips() {
        let mut stamp = Stamp::new(3, 1);
        stamp.place_tile((2, 0), 7, (2, 2));
        assert_eq!(stamp.cells(), &[0, 0, 7]);
        assert_eq!(stamp.get(5, 5), EMPTY_CELL);
    }

    #[test]
    fn test_occupied_positions_are_row_major() {
        let mut stamp = Stamp::new(3, 2);
        stamp.place_tile((0, 0), 1, (1, 1));
        stamp.place_tile((1, 1), 2, (2, 1));

        let occupied: Vec<_> = stamp.occupied().collect();
        assert_eq!(
            occupied,
            vec![((0, 0), 1), ((1, 1), 2), ((2, 1), OCCUPIED_CELL)]
        );
        assert!(!stamp.is_blank());
        assert!(Stamp::new(2, 2).is_blank());
    }

    #[test]
    fn test_from_cells_checks_length() {
        assert!(Stamp::from_cells(2, 2, vec![0; 3]).is_none());
        let stamp = Stamp::from_cells(2, 1, vec![4, 0]).unwrap();
        assert_eq!(stamp.get(0, 0), 4);
    }
}
