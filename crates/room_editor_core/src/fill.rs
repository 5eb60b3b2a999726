//! Flood fill on a layer grid
//!
//! The walk steps by the stamp's own footprint, so a `2x2` brush fills a
//! lattice of non-overlapping `2x2` placements. Every candidate is checked
//! against the grid as it was before the fill; nothing is written until the
//! whole pool is known.

use std::collections::BTreeSet;

use crate::grid::{CellPos, GridMap};
use crate::stamp::Stamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Down,
    Up,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Down,
        Direction::Up,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Up => Direction::Down,
        }
    }

    /// Neighbouring placement one footprint away
    pub fn step(self, pos: CellPos, footprint: (u32, u32)) -> CellPos {
        let (w, h) = (footprint.0 as i32, footprint.1 as i32);
        match self {
            Direction::Left => (pos.0 - w, pos.1),
            Direction::Right => (pos.0 + w, pos.1),
            Direction::Down => (pos.0, pos.1 - h),
            Direction::Up => (pos.0, pos.1 + h),
        }
    }
}

/// Collect every anchor reachable from `start` where `stamp` fits.
///
/// Empty when `start` itself is blocked.
pub fn explore(grid: &GridMap, stamp: &Stamp, start: CellPos) -> BTreeSet<CellPos> {
    let mut pool = BTreeSet::new();
    if !grid.check_region(start, stamp) {
        return pool;
    }

    pool.insert(start);
    let mut stack: Vec<(CellPos, Option<Direction>)> = vec![(start, None)];
    while let Some((pos, came_from)) = stack.pop() {
        for direction in Direction::ALL {
            if Some(direction) == came_from {
                continue;
            }
            let next = direction.step(pos, stamp.size());
            if pool.contains(&next) || !grid.check_region(next, stamp) {
                continue;
            }
            pool.insert(next);
            stack.push((next, Some(direction.opposite())));
        }
    }
    pool
}

/// Stamp every anchor of `pool`
pub fn commit(grid: &mut GridMap, stamp: &Stamp, pool: &BTreeSet<CellPos>) {
    for &pos in pool {
        if !grid.draw(pos, stamp) {
            tracing::warn!("Flood fill skipped blocked anchor {:?}", pos);
        }
    }
}

/// Explore from `start` and stamp the result, returning the filled anchors
pub fn flood_fill(grid: &mut GridMap, stamp: &Stamp, start: CellPos) -> BTreeSet<CellPos> {
    let pool = explore(grid, stamp, start);
    commit(grid, stamp, &pool);
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::{EMPTY_CELL, OCCUPIED_CELL};

    #[test]
    fn test_fill_empty_grid_covers_every_cell() {
        let mut grid = GridMap::new((4, 4));
        let pool = flood_fill(&mut grid, &Stamp::for_tile(1, (1, 1)), (0, 0));

        assert_eq!(pool.len(), 16);
        assert!(grid.cells().iter().all(|&c| c == 1));
    }

    #[test]
    fn test_fill_blocked_start_is_empty() {
        let mut grid = GridMap::new((3, 3));
        grid.draw((1, 1), &Stamp::for_tile(2, (1, 1)));
        let before = grid.cells().to_vec();

        let pool = flood_fill(&mut grid, &Stamp::for_tile(1, (1, 1)), (1, 1));
        assert!(pool.is_empty());
        assert_eq!(grid.cells(), &before[..]);

        let pool = flood_fill(&mut grid, &Stamp::for_tile(1, (1, 1)), (5, 5));
        assert!(pool.is_empty());
    }

    #[test]
    fn test_fill_stops_at_walls() {
        // A vertical wall at x = 2 splits a 5x3 grid
        let mut grid = GridMap::new((5, 3));
        grid.draw((2, 0), &Stamp::for_tile(9, (1, 3)));

        let pool = flood_fill(&mut grid, &Stamp::for_tile(1, (1, 1)), (0, 0));
        assert_eq!(pool.len(), 6);
        assert!(pool.iter().all(|&(x, _)| x < 2));
        assert_eq!(grid.get((3, 0)), Some(EMPTY_CELL));
        assert_eq!(grid.get((2, 1)), Some(OCCUPIED_CELL));
    }

    #[test]
    fn test_fill_steps_by_footprint() {
        let mut grid = GridMap::new((5, 4));
        let pool = flood_fill(&mut grid, &Stamp::for_tile(3, (2, 2)), (0, 0));

        let expected: BTreeSet<CellPos> = [(0, 0), (2, 0), (0, 2), (2, 2)].into_iter().collect();
        assert_eq!(pool, expected);
        assert_eq!(grid.get((4, 0)), Some(EMPTY_CELL));
        assert_eq!(grid.get((2, 2)), Some(3));
        assert_eq!(grid.get((3, 3)), Some(OCCUPIED_CELL));
    }

    #[test]
    fn test_refill_inside_pool_finds_nothing_new() {
        let mut grid = GridMap::new((5, 4));
        let stamp = Stamp::for_tile(3, (2, 2));
        let first = flood_fill(&mut grid, &stamp, (0, 0));
        let filled = grid.clone();

        for &anchor in &first {
            assert!(flood_fill(&mut grid, &stamp, anchor).is_empty());
            assert!(flood_fill(&mut grid, &stamp, (anchor.0 + 1, anchor.1 + 1)).is_empty());
        }
        assert_eq!(grid, filled);

        // The strip left free at x = 4 fills separately
        let second = flood_fill(&mut grid, &Stamp::for_tile(1, (1, 1)), (4, 0));
        assert_eq!(second.len(), 4);
        assert!(second.is_disjoint(&first));
        assert!(grid.cells().iter().all(|&c| c != EMPTY_CELL));
    }

    #[test]
    fn test_explore_does_not_write() {
        let grid = GridMap::new((2, 2));
        let pool = explore(&grid, &Stamp::for_tile(1, (1, 1)), (1, 1));
        assert_eq!(pool.len(), 4);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_opposite_directions() {
        for direction in Direction::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
            assert_ne!(direction.opposite(), direction);
        }
        assert_eq!(Direction::Up.step((1, 1), (2, 3)), (1, 4));
    }
}
