//! Per-layer occupancy grid
//!
//! A [`GridMap`] stores one `u32` per cell in row-major order
//! (`index = y * width + x`, origin at the lower-left). Cells hold
//! [`EMPTY_CELL`], a tile id on the anchor cell of a placed tile, or
//! [`OCCUPIED_CELL`] on the rest of its footprint.
//!
//! Placement goes through [`GridMap::draw`], which checks the whole target
//! footprint before writing anything, so a rejected draw never leaves a
//! partial stamp behind.

use crate::region::RawRegion;
use crate::stamp::Stamp;
use crate::tile::{TileId, EMPTY_CELL};

/// Cell coordinate, may be negative while probing
pub type CellPos = (i32, i32);

/// Most cells a single grid may hold
pub const MAX_GRID_CELLS: usize = 1 << 24;

/// Number of cells in a `size` area, `None` above [`MAX_GRID_CELLS`]
pub fn cell_count(size: (u32, u32)) -> Option<usize> {
    (size.0 as usize)
        .checked_mul(size.1 as usize)
        .filter(|&n| n <= MAX_GRID_CELLS)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridMap {
    width: u32,
    height: u32,
    cells: Vec<u32>,
    /// Modified since the last save
    dirty: bool,
}

impl GridMap {
    pub fn new(size: (u32, u32)) -> Self {
        Self {
            width: size.0,
            height: size.1,
            cells: vec![EMPTY_CELL; size.0 as usize * size.1 as usize],
            dirty: false,
        }
    }

    /// Rebuild a grid from raw cells; `None` if the length does not match
    pub fn from_cells(size: (u32, u32), cells: Vec<u32>) -> Option<Self> {
        if (size.0 as usize).checked_mul(size.1 as usize) != Some(cells.len()) {
            return None;
        }
        Some(Self {
            width: size.0,
            height: size.1,
            cells,
            dirty: false,
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

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn index(&self, pos: CellPos) -> Option<usize> {
        if pos.0 < 0 || pos.1 < 0 {
            return None;
        }
        let (x, y) = (pos.0 as u32, pos.1 as u32);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn in_bounds(&self, pos: CellPos) -> bool {
        self.index(pos).is_some()
    }

    /// Cell value, `None` outside the grid
    pub fn get(&self, pos: CellPos) -> Option<u32> {
        self.index(pos).map(|i| self.cells[i])
    }

    fn set(&mut self, pos: CellPos, value: u32) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = value;
        }
    }

    /// Whether a single cell is inside the grid and free
    pub fn check_free(&self, pos: CellPos) -> bool {
        self.get(pos) == Some(EMPTY_CELL)
    }

    /// Whether a `size` rectangle anchored at `pos` lies fully inside the grid
    pub fn fits(&self, pos: CellPos, size: (u32, u32)) -> bool {
        pos.0 >= 0
            && pos.1 >= 0
            && pos.0 as i64 + size.0 as i64 <= self.width as i64
            && pos.1 as i64 + size.1 as i64 <= self.height as i64
    }

    /// Whether `stamp` anchored at `pos` is in bounds and touches no occupied cell
    pub fn check_region(&self, pos: CellPos, stamp: &Stamp) -> bool {
        if !self.fits(pos, stamp.size()) {
            return false;
        }
        stamp
            .occupied()
            .all(|((dx, dy), _)| self.check_free((pos.0 + dx as i32, pos.1 + dy as i32)))
    }

    /// Overwrite the sub-array at `pos` with `stamp`, free cells included.
    /// Cells outside the grid are skipped.
    pub fn force_draw(&mut self, pos: CellPos, stamp: &Stamp) {
        for y in 0..stamp.height() {
            for x in 0..stamp.width() {
                self.set((pos.0 + x as i32, pos.1 + y as i32), stamp.get(x, y));
            }
        }
        self.dirty = true;
    }

    /// Write only the non-free cells of `stamp`
    fn overlay(&mut self, pos: CellPos, stamp: &Stamp) {
        for ((x, y), value) in stamp.occupied() {
            self.set((pos.0 + x as i32, pos.1 + y as i32), value);
        }
        self.dirty = true;
    }

    /// Place `stamp` at `pos` if the whole footprint is in bounds and free.
    ///
    /// Free cells of the stamp leave the grid untouched, so a composite stamp
    /// with gaps never erases what sits in those gaps.
    pub fn draw(&mut self, pos: CellPos, stamp: &Stamp) -> bool {
        if !self.check_region(pos, stamp) {
            return false;
        }
        self.overlay(pos, stamp);
        true
    }

    /// Clear a `size` rectangle anchored at `pos`, clipped to the grid
    pub fn erase(&mut self, pos: CellPos, size: (u32, u32)) {
        for y in 0..size.1 as i32 {
            for x in 0..size.0 as i32 {
                self.set((pos.0 + x, pos.1 + y), EMPTY_CELL);
            }
        }
        self.dirty = true;
    }

    /// Copy out a `size` sub-array anchored at `pos`; cells outside the grid read as free
    pub fn extract(&self, pos: CellPos, size: (u32, u32)) -> Stamp {
        let mut stamp = Stamp::new(size.0, size.1);
        for y in 0..size.1 {
            for x in 0..size.0 {
                if let Some(value) = self.get((pos.0 + x as i32, pos.1 + y as i32)) {
                    stamp.set(x, y, value);
                }
            }
        }
        stamp
    }

    pub fn contains_tile(&self, tile: TileId) -> bool {
        self.cells.contains(&tile)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&c| c == EMPTY_CELL)
    }

    /// A new `new_size` grid holding the `lb..rt` sub-array of this one at its origin
    pub fn resized(&self, new_size: (u32, u32), lb: CellPos, rt: CellPos) -> GridMap {
        let mut grid = GridMap::new(new_size);
        for y in lb.1..rt.1 {
            for x in lb.0..rt.0 {
                if let Some(value) = self.get((x, y)) {
                    grid.set((x - lb.0, y - lb.1), value);
                }
            }
        }
        grid.dirty = true;
        grid
    }

    /// Try to shift a selected region by `offset`.
    ///
    /// Targets outside the grid are rejected before anything is touched.
    /// Otherwise the region's cells are lifted inside a [`GridTransaction`]
    /// and either committed at the target or restored bit-for-bit.
    pub fn can_move(&mut self, region: &mut RawRegion, offset: CellPos) -> bool {
        let origin = region.anchor();
        let target = (origin.0 + offset.0, origin.1 + offset.1);
        if !self.fits(target, region.size()) {
            region.reject_move();
            return false;
        }

        let transaction = GridTransaction::begin(self, origin, region.stamp());
        if transaction.try_commit(target) {
            region.commit_move(target);
            true
        } else {
            region.reject_move();
            false
        }
    }
}

/// Lifts a stamp's cells out of a grid so the grid can be probed without them.
///
/// Dropping an unfinished transaction restores the grid exactly as it was,
/// dirty flag included.
pub struct GridTransaction<'g> {
    grid: &'g mut GridMap,
    origin: CellPos,
    saved: Stamp,
    stamp: Stamp,
    was_dirty: bool,
    finished: bool,
}

impl<'g> GridTransaction<'g> {
    /// Clear the occupied cells of `stamp` anchored at `origin`
    pub fn begin(grid: &'g mut GridMap, origin: CellPos, stamp: &Stamp) -> Self {
        let saved = grid.extract(origin, stamp.size());
        let was_dirty = grid.dirty;
        for ((x, y), _) in stamp.occupied() {
            grid.set((origin.0 + x as i32, origin.1 + y as i32), EMPTY_CELL);
        }
        Self {
            grid,
            origin,
            saved,
            stamp: stamp.clone(),
            was_dirty,
            finished: false,
        }
    }

    /// Whether the lifted stamp would fit at `target`
    pub fn check(&self, target: CellPos) -> bool {
        self.grid.check_region(target, &self.stamp)
    }

    /// Draw the lifted stamp at `target`, or roll back if it does not fit
    pub fn try_commit(mut self, target: CellPos) -> bool {
        if self.grid.draw(target, &self.stamp) {
            self.finished = true;
            true
        } else {
            self.restore();
            false
        }
    }

    pub fn rollback(mut self) {
        self.restore();
    }

    fn restore(&mut self) {
        if self.finished {
            return;
        }
        self.grid.force_draw(self.origin, &self.saved);
        self.grid.dirty = self.was_dirty;
        self.finished = true;
    }
}

impl Drop for GridTransaction<'_> {
    fn drop(&mut self) {
        self.restore();
    }
}
