//! Brushes and the brush library
//!
//! A brush is what gets painted: a single unit tile, a single multi-cell
//! tile, or a composite arrangement of several tiles built from a palette
//! selection. Composite brushes are always placed as one array, never tile
//! by tile, so a composite placement either lands whole or not at all.

use serde::{Deserialize, Serialize};

use crate::error::EditError;
use crate::grid::{CellPos, GridMap};
use crate::ids::IdAllocator;
use crate::region::RawRegion;
use crate::stamp::Stamp;
use crate::tile::{Tile, TileCatalog, TileId};

pub type BrushId = u32;

/// One tile inside a composite brush, anchored at `pos` relative to the brush origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrushCell {
    pub pos: (u32, u32),
    #[serde(rename = "tile")]
    pub tile_id: TileId,
}

/// A tile the brush will create on a successful draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub offset: (u32, u32),
    pub tile_id: TileId,
    pub footprint: (u32, u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Brush {
    Unit {
        id: BrushId,
        #[serde(rename = "tileId")]
        tile_id: TileId,
    },
    Tile {
        id: BrushId,
        #[serde(rename = "tileId")]
        tile_id: TileId,
        footprint: (u32, u32),
    },
    Composite {
        id: BrushId,
        size: (u32, u32),
        tiles: Vec<BrushCell>,
    },
}

impl Brush {
    pub fn id(&self) -> BrushId {
        match self {
            Brush::Unit { id, .. } | Brush::Tile { id, .. } | Brush::Composite { id, .. } => *id,
        }
    }

    fn set_id(&mut self, new_id: BrushId) {
        match self {
            Brush::Unit { id, .. } | Brush::Tile { id, .. } | Brush::Composite { id, .. } => *id = new_id,
        }
    }

    /// Whether both brushes paint the same tiles, whatever their ids
    pub fn paints_like(&self, other: &Brush) -> bool {
        let mut a = self.clone();
        a.set_id(0);
        let mut b = other.clone();
        b.set_id(0);
        a == b
    }

    pub fn footprint(&self) -> (u32, u32) {
        match self {
            Brush::Unit { .. } => (1, 1),
            Brush::Tile { footprint, .. } => *footprint,
            Brush::Composite { size, .. } => *size,
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Brush::Composite { .. })
    }

    pub fn needs_tile(&self, tile: TileId) -> bool {
        match self {
            Brush::Unit { tile_id, .. } | Brush::Tile { tile_id, .. } => *tile_id == tile,
            Brush::Composite { tiles, .. } => tiles.iter().any(|c| c.tile_id == tile),
        }
    }

    /// Tiles created by one placement of this brush
    pub fn placements(&self, catalog: &TileCatalog) -> Result<Vec<Placement>, EditError> {
        match self {
            Brush::Unit { tile_id, .. } => {
                if !catalog.contains(*tile_id) {
                    return Err(EditError::UnknownTile(*tile_id));
                }
                Ok(vec![Placement {
                    offset: (0, 0),
                    tile_id: *tile_id,
                    footprint: (1, 1),
                }])
            }
            Brush::Tile {
                tile_id, footprint, ..
            } => {
                if !catalog.contains(*tile_id) {
                    return Err(EditError::UnknownTile(*tile_id));
                }
                Ok(vec![Placement {
                    offset: (0, 0),
                    tile_id: *tile_id,
                    footprint: *footprint,
                }])
            }
            Brush::Composite { tiles, .. } => tiles
                .iter()
                .map(|cell| {
                    let footprint = catalog
                        .footprint(cell.tile_id)
                        .ok_or(EditError::UnknownTile(cell.tile_id))?;
                    Ok(Placement {
                        offset: cell.pos,
                        tile_id: cell.tile_id,
                        footprint,
                    })
                })
                .collect(),
        }
    }

    /// The footprint array drawn by this brush
    pub fn stamp(&self, catalog: &TileCatalog) -> Result<Stamp, EditError> {
        let placements = self.placements(catalog)?;
        match self {
            Brush::Unit { tile_id, .. } => Ok(Stamp::for_tile(*tile_id, (1, 1))),
            Brush::Tile {
                tile_id, footprint, ..
            } => Ok(Stamp::for_tile(*tile_id, *footprint)),
            Brush::Composite { size, .. } => {
                let mut stamp = Stamp::new(size.0, size.1);
                for p in &placements {
                    stamp.place_tile(p.offset, p.tile_id, p.footprint);
                }
                Ok(stamp)
            }
        }
    }

    /// Stamp this brush onto `grid` at `pos` in one checked write
    pub fn draw(&self, pos: CellPos, grid: &mut GridMap, catalog: &TileCatalog) -> bool {
        match self.stamp(catalog) {
            Ok(stamp) => grid.draw(pos, &stamp),
            Err(_) => false,
        }
    }
}

impl std::fmt::Display for Brush {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.id())
    }
}

/// Issues brush ids
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrushMaker {
    ids: IdAllocator,
}

impl BrushMaker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unit brush for 1x1 tiles, tile brush otherwise
    pub fn from_tile(&mut self, tile: &Tile) -> Brush {
        let id = self.ids.next_id();
        if tile.is_unit() {
            Brush::Unit {
                id,
                tile_id: tile.id,
            }
        } else {
            Brush::Tile {
                id,
                tile_id: tile.id,
                footprint: tile.footprint,
            }
        }
    }

    /// Composite brush reproducing the arrangement of a selection
    pub fn from_region(&mut self, region: &RawRegion) -> Brush {
        Brush::Composite {
            id: self.ids.next_id(),
            size: region.size(),
            tiles: region
                .tiles()
                .iter()
                .map(|t| BrushCell {
                    pos: t.offset,
                    tile_id: t.tile_id,
                })
                .collect(),
        }
    }

    pub fn next_id(&mut self) -> BrushId {
        self.ids.next_id()
    }

    pub fn release(&mut self, id: BrushId) {
        self.ids.recycle(id);
    }

    pub fn reserve(&mut self, id: BrushId) {
        self.ids.reserve(id);
    }
}

/// A named list of brushes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrushGroup {
    pub name: String,
    #[serde(default)]
    pub brushes: Vec<Brush>,
}

/// User brush groups plus the generated one-brush-per-tile list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(into = "SavedLibrary", from = "SavedLibrary")]
pub struct BrushLibrary {
    groups: Vec<BrushGroup>,
    maker: BrushMaker,
    /// Regenerated from the catalog, never saved
    tile_brushes: Vec<Brush>,
}

/// On-disk form of a [`BrushLibrary`]. Tile brush ids go back to the maker
/// so reloading hands the same ids out again.
#[derive(Serialize, Deserialize)]
struct SavedLibrary {
    groups: Vec<BrushGroup>,
    #[serde(default)]
    maker: BrushMaker,
}

impl From<BrushLibrary> for SavedLibrary {
    fn from(mut library: BrushLibrary) -> Self {
        for brush in std::mem::take(&mut library.tile_brushes) {
            library.maker.release(brush.id());
        }
        Self {
            groups: library.groups,
            maker: library.maker,
        }
    }
}

impl From<SavedLibrary> for BrushLibrary {
    fn from(saved: SavedLibrary) -> Self {
        Self {
            groups: saved.groups,
            maker: saved.maker,
            tile_brushes: Vec::new(),
        }
    }
}

impl BrushLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn groups(&self) -> &[BrushGroup] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&BrushGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    fn group_mut(&mut self, name: &str) -> Option<&mut BrushGroup> {
        self.groups.iter_mut().find(|g| g.name == name)
    }

    /// First free name of the form `group N`
    pub fn next_group_name(&self) -> String {
        let mut n = self.groups.len();
        loop {
            let name = format!("group {}", n);
            if self.group(&name).is_none() {
                return name;
            }
            n += 1;
        }
    }

    /// Add an empty group; false if the name is taken
    pub fn add_group(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.group(&name).is_some() {
            return false;
        }
        self.groups.push(BrushGroup {
            name,
            brushes: Vec::new(),
        });
        true
    }

    /// Remove a group and release its brush ids
    pub fn remove_group(&mut self, name: &str) -> Option<BrushGroup> {
        let index = self.groups.iter().position(|g| g.name == name)?;
        let group = self.groups.remove(index);
        for brush in &group.brushes {
            self.release_if_unused(brush.id());
        }
        Some(group)
    }

    /// Whether `group` exists and has room for `brush`
    fn accepts(&self, group: &str, brush: &Brush) -> bool {
        self.group(group).is_some_and(|g| {
            !g.brushes
                .iter()
                .any(|b| b.id() == brush.id() || b.paints_like(brush))
        })
    }

    /// File `brush` under `group`; false if the group is missing or already
    /// holds it. A copy of a brush kept elsewhere, such as a tile brush, is
    /// given its own id.
    pub fn add_brush(&mut self, group: &str, mut brush: Brush) -> bool {
        if !self.accepts(group, &brush) {
            return false;
        }
        if self.find(brush.id()).is_some() {
            brush.set_id(self.maker.next_id());
        }
        let Some(group) = self.group_mut(group) else {
            return false;
        };
        group.brushes.push(brush);
        true
    }

    pub fn remove_brush(&mut self, group: &str, id: BrushId) -> Option<Brush> {
        let group = self.group_mut(group)?;
        let index = group.brushes.iter().position(|b| b.id() == id)?;
        let brush = group.brushes.remove(index);
        self.release_if_unused(id);
        Some(brush)
    }

    fn release_if_unused(&mut self, id: BrushId) {
        if self.find(id).is_none() {
            self.maker.release(id);
        }
    }

    /// Move a brush between groups; false if either group or the brush is
    /// missing, or the target already holds the same brush
    pub fn move_brush(&mut self, from: &str, to: &str, id: BrushId) -> bool {
        let Some(brush) = self
            .group(from)
            .and_then(|g| g.brushes.iter().find(|b| b.id() == id))
            .cloned()
        else {
            return false;
        };
        if from == to || !self.accepts(to, &brush) {
            return false;
        }
        if let Some(source) = self.group_mut(from) {
            source.brushes.retain(|b| b.id() != id);
        }
        let Some(target) = self.group_mut(to) else {
            return false;
        };
        target.brushes.push(brush);
        true
    }

    /// Look a brush up in the groups and the generated tile brushes
    pub fn find(&self, id: BrushId) -> Option<&Brush> {
        self.groups
            .iter()
            .flat_map(|g| g.brushes.iter())
            .chain(self.tile_brushes.iter())
            .find(|b| b.id() == id)
    }

    pub fn maker_mut(&mut self) -> &mut BrushMaker {
        &mut self.maker
    }

    /// Rebuild the one-brush-per-tile list from the catalog
    pub fn reload_tile_brushes(&mut self, catalog: &TileCatalog) {
        for brush in std::mem::take(&mut self.tile_brushes) {
            self.maker.release(brush.id());
        }
        self.tile_brushes = catalog.iter().map(|t| self.maker.from_tile(t)).collect();
    }

    pub fn tile_brushes(&self) -> &[Brush] {
        &self.tile_brushes
    }

    pub fn tile_brush(&self, tile: TileId) -> Option<&Brush> {
        self.tile_brushes.iter().find(|b| b.needs_tile(tile))
    }

    /// Whether any kept brush references `tile`. Generated tile brushes do not count.
    pub fn needs_tile(&self, tile: TileId) -> bool {
        self.groups
            .iter()
            .any(|g| g.brushes.iter().any(|b| b.needs_tile(tile)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::TileInstance;
    use crate::tile::OCCUPIED_CELL;

    fn catalog() -> TileCatalog {
        let mut catalog = TileCatalog::new();
        catalog.register("grass", (1, 1), None).unwrap();
        catalog.register("tree", (2, 2), None).unwrap();
        catalog
    }

    #[test]
    fn test_maker_picks_variant_by_footprint() {
        let catalog = catalog();
        let mut maker = BrushMaker::new();

        let unit = maker.from_tile(catalog.get(1).unwrap());
        let tile = maker.from_tile(catalog.get(2).unwrap());
        assert!(matches!(unit, Brush::Unit { tile_id: 1, .. }));
        assert!(matches!(tile, Brush::Tile { tile_id: 2, footprint: (2, 2), .. }));
        assert_ne!(unit.id(), tile.id());
        assert_eq!(tile.to_string(), format!("#{}", tile.id()));
    }

    #[test]
    fn test_composite_draw_is_atomic() {
        let catalog = catalog();
        let brush = Brush::Composite {
            id: 1,
            size: (3, 2),
            tiles: vec![
                BrushCell {
                    pos: (0, 0),
                    tile_id: 1,
                },
                BrushCell {
                    pos: (1, 0),
                    tile_id: 2,
                },
            ],
        };

        let mut grid = GridMap::new((4, 4));
        grid.draw((3, 1), &Stamp::for_tile(1, (1, 1)));
        let before = grid.cells().to_vec();

        // The tree half would land on the blocker; the grass half would not
        assert!(!brush.draw((1, 0), &mut grid, &catalog));
        assert_eq!(grid.cells(), &before[..]);

        assert!(brush.draw((0, 2), &mut grid, &catalog));
        assert_eq!(grid.get((0, 2)), Some(1));
        assert_eq!(grid.get((1, 2)), Some(2));
        assert_eq!(grid.get((2, 3)), Some(OCCUPIED_CELL));
    }

    #[test]
    fn test_unknown_tile_is_rejected() {
        let catalog = catalog();
        let brush = Brush::Unit { id: 1, tile_id: 42 };
        let mut grid = GridMap::new((2, 2));

        assert_eq!(brush.placements(&catalog), Err(EditError::UnknownTile(42)));
        assert!(!brush.draw((0, 0), &mut grid, &catalog));
        assert!(grid.is_empty());
    }

    #[test]
    fn test_region_brush_reproduces_selection() {
        let catalog = catalog();
        let a = TileInstance::new(1, (2, 2), (1, 1), 0);
        let b = TileInstance::new(2, (3, 1), (2, 2), 0);
        let region = RawRegion::from_instances([&a, &b]).unwrap();

        let mut maker = BrushMaker::new();
        let brush = maker.from_region(&region);
        assert_eq!(brush.footprint(), (3, 2));
        assert!(brush.needs_tile(1) && brush.needs_tile(2));
        assert_eq!(brush.stamp(&catalog).unwrap(), region.stamp().clone());
    }

    #[test]
    fn test_library_groups() {
        let catalog = catalog();
        let mut library = BrushLibrary::new();
        assert_eq!(library.next_group_name(), "group 0");
        assert!(library.add_group("walls"));
        assert!(!library.add_group("walls"));
        assert!(library.add_group("props"));

        let brush = library.maker_mut().from_tile(catalog.get(2).unwrap());
        let id = brush.id();
        assert!(library.add_brush("walls", brush));
        assert!(library.needs_tile(2));
        assert!(!library.needs_tile(1));

        assert!(library.move_brush("walls", "props", id));
        assert!(!library.move_brush("walls", "props", id));
        assert_eq!(library.group("props").map(|g| g.brushes.len()), Some(1));

        assert!(library.remove_brush("props", id).is_some());
        assert!(!library.needs_tile(2));
        assert!(library.remove_group("walls").is_some());
        assert_eq!(library.groups().len(), 1);
    }

    #[test]
    fn test_add_brush_rejects_duplicates() {
        let catalog = catalog();
        let mut library = BrushLibrary::new();
        library.reload_tile_brushes(&catalog);
        library.add_group("mine");

        let grass = library.tile_brush(1).cloned().unwrap();
        assert!(library.add_brush("mine", grass.clone()));
        assert!(!library.add_brush("mine", grass.clone()));
        assert!(!library.add_brush("nope", grass.clone()));
        assert_eq!(library.group("mine").map(|g| g.brushes.len()), Some(1));

        // The group copy does not share the tile brush's id
        let copy_id = library.group("mine").unwrap().brushes[0].id();
        assert_ne!(copy_id, grass.id());
        assert_eq!(library.find(grass.id()), Some(&grass));
    }

    #[test]
    fn test_removed_copy_keeps_tile_brush_id_live() {
        let catalog = catalog();
        let mut library = BrushLibrary::new();
        library.reload_tile_brushes(&catalog);
        library.add_group("mine");

        let grass = library.tile_brush(1).cloned().unwrap();
        library.add_brush("mine", grass.clone());
        let copy_id = library.group("mine").unwrap().brushes[0].id();
        assert!(library.remove_brush("mine", copy_id).is_some());

        let a = TileInstance::new(1, (0, 0), (1, 1), 0);
        let b = TileInstance::new(1, (1, 0), (1, 1), 0);
        let region = RawRegion::from_instances([&a, &b]).unwrap();
        let composite = library.maker_mut().from_region(&region);
        assert_ne!(composite.id(), grass.id());
        assert_eq!(library.find(grass.id()), Some(&grass));
    }

    #[test]
    fn test_move_brush_keeps_brush_on_refusal() {
        let catalog = catalog();
        let mut library = BrushLibrary::new();
        library.add_group("a");
        library.add_group("b");
        let brush = library.maker_mut().from_tile(catalog.get(1).unwrap());
        let id = brush.id();
        library.add_brush("a", brush.clone());
        let mut twin = brush;
        twin.set_id(library.maker_mut().next_id());
        library.add_brush("b", twin);

        assert!(!library.move_brush("a", "b", id));
        assert_eq!(library.group("a").map(|g| g.brushes.len()), Some(1));
    }

    #[test]
    fn test_save_load_reuses_tile_brush_ids() {
        let catalog = catalog();
        let mut library = BrushLibrary::new();
        library.reload_tile_brushes(&catalog);
        let ids: Vec<BrushId> = library.tile_brushes().iter().map(Brush::id).collect();

        for _ in 0..3 {
            let json = serde_json::to_string(&library).unwrap();
            library = serde_json::from_str(&json).unwrap();
            assert!(library.tile_brushes().is_empty());
            library.reload_tile_brushes(&catalog);
        }
        let reloaded: Vec<BrushId> = library.tile_brushes().iter().map(Brush::id).collect();
        assert_eq!(reloaded, ids);
        assert_eq!(library.maker_mut().next_id(), 3);
    }

    #[test]
    fn test_tile_brushes_do_not_pin_tiles() {
        let catalog = catalog();
        let mut library = BrushLibrary::new();
        library.reload_tile_brushes(&catalog);

        assert_eq!(library.tile_brushes().len(), 2);
        let id = library.tile_brush(2).map(Brush::id).unwrap();
        assert!(library.find(id).is_some());
        assert!(!library.needs_tile(2));
    }

    #[test]
    fn test_brush_json_is_tagged() {
        let brush = Brush::Tile {
            id: 4,
            tile_id: 2,
            footprint: (2, 2),
        };
        let json = serde_json::to_value(&brush).unwrap();
        assert_eq!(json["type"], "tile");
        assert_eq!(json["tileId"], 2);

        let loaded: Brush = serde_json::from_value(json).unwrap();
        assert_eq!(loaded, brush);
    }
}
