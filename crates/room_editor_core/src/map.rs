//! The world map: every room, laid out without overlap

use crate::error::{LoadError, RoomError};
use crate::format::RoomJson;
use crate::grid::{cell_count, CellPos};
use crate::room::Room;
use crate::snapshot::DEFAULT_SNAPSHOT_CAPACITY;
use crate::tile::{TileCatalog, TileId};

/// Rooms on the world grid. Names are unique and rectangles never overlap.
#[derive(Debug, Clone)]
pub struct RoomMap {
    rooms: Vec<Room>,
    snapshot_capacity: usize,
}

impl Default for RoomMap {
    fn default() -> Self {
        Self::new(DEFAULT_SNAPSHOT_CAPACITY)
    }
}

impl RoomMap {
    pub fn new(snapshot_capacity: usize) -> Self {
        Self {
            rooms: Vec::new(),
            snapshot_capacity,
        }
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn room(&self, name: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.name() == name)
    }

    pub fn room_mut(&mut self, name: &str) -> Option<&mut Room> {
        self.rooms.iter_mut().find(|r| r.name() == name)
    }

    /// Room whose rectangle contains the world cell
    pub fn room_at(&self, cell: CellPos) -> Option<&Room> {
        self.rooms
            .iter()
            .find(|r| r.overlaps(cell, (cell.0 + 1, cell.1 + 1)))
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// First free name of the form `room N`
    pub fn next_room_name(&self) -> String {
        let mut n = self.rooms.len();
        loop {
            let name = format!("room {}", n);
            if self.room(&name).is_none() {
                return name;
            }
            n += 1;
        }
    }

    /// Whether any room overlaps the world rectangle `p1..p2`
    pub fn collision_any(&self, p1: CellPos, p2: CellPos) -> bool {
        self.rooms.iter().any(|r| r.overlaps(p1, p2))
    }

    /// Whether any room other than `name` overlaps the world rectangle `p1..p2`
    pub fn collision_except(&self, name: &str, p1: CellPos, p2: CellPos) -> bool {
        self.rooms
            .iter()
            .any(|r| r.name() != name && r.overlaps(p1, p2))
    }

    fn far_corner(origin: CellPos, size: (u32, u32)) -> CellPos {
        (origin.0 + size.0 as i32, origin.1 + size.1 as i32)
    }

    fn check_area(size: (u32, u32)) -> Result<(), RoomError> {
        if size.0 == 0 || size.1 == 0 {
            return Err(RoomError::EmptyArea);
        }
        if cell_count(size).is_none() {
            return Err(RoomError::TooLarge(size));
        }
        Ok(())
    }

    /// Create an empty room under a generated name
    pub fn create_room(&mut self, origin: CellPos, size: (u32, u32)) -> Result<&mut Room, RoomError> {
        Self::check_area(size)?;
        if self.collision_any(origin, Self::far_corner(origin, size)) {
            return Err(RoomError::Collision);
        }
        let name = self.next_room_name();
        tracing::debug!("Creating room '{}' at {:?} size {:?}", name, origin, size);
        let room = Room::with_snapshot_capacity(name, origin, size, self.snapshot_capacity);
        Ok(self.push(room))
    }

    /// Add an existing room, keeping names unique and rooms apart
    pub fn insert_room(&mut self, room: Room) -> Result<&mut Room, RoomError> {
        if self.room(room.name()).is_some() {
            return Err(RoomError::NameTaken(room.name().to_string()));
        }
        if self.collision_any(room.origin(), room.upper_bound()) {
            return Err(RoomError::Collision);
        }
        Ok(self.push(room))
    }

    fn push(&mut self, room: Room) -> &mut Room {
        let index = self.rooms.len();
        self.rooms.push(room);
        &mut self.rooms[index]
    }

    pub fn remove_room(&mut self, name: &str) -> Option<Room> {
        let index = self.rooms.iter().position(|r| r.name() == name)?;
        Some(self.rooms.remove(index))
    }

    pub fn rename_room(&mut self, old: &str, new: impl Into<String>) -> Result<(), RoomError> {
        let new = new.into();
        if self.room(&new).is_some() {
            return Err(RoomError::NameTaken(new));
        }
        let room = self
            .room_mut(old)
            .ok_or_else(|| RoomError::NotFound(old.to_string()))?;
        room.set_name(new);
        Ok(())
    }

    /// Move a room to a new world origin
    pub fn move_room(&mut self, name: &str, origin: CellPos) -> Result<(), RoomError> {
        let size = self
            .room(name)
            .map(Room::size)
            .ok_or_else(|| RoomError::NotFound(name.to_string()))?;
        if self.collision_except(name, origin, Self::far_corner(origin, size)) {
            return Err(RoomError::Collision);
        }
        if let Some(room) = self.room_mut(name) {
            room.move_to(origin);
        }
        Ok(())
    }

    /// Resize a room to the world rectangle at `origin` of `size`.
    ///
    /// The room content is kept and re-anchored at the new lower-left corner.
    pub fn resize_room(&mut self, name: &str, origin: CellPos, size: (u32, u32)) -> Result<(), RoomError> {
        Self::check_area(size)?;
        if self.room(name).is_none() {
            return Err(RoomError::NotFound(name.to_string()));
        }
        if self.collision_except(name, origin, Self::far_corner(origin, size)) {
            return Err(RoomError::Collision);
        }
        let room = self
            .room_mut(name)
            .ok_or_else(|| RoomError::NotFound(name.to_string()))?;
        let (lb, rt) = room.content_bounds().unwrap_or(((0, 0), (0, 0)));
        room.adjust(origin, size, lb, rt)?;
        Ok(())
    }

    /// Place a copy of `template` at `origin` under a generated name
    pub fn restore_template(&mut self, template: &Room, origin: CellPos) -> Result<&mut Room, RoomError> {
        if self.collision_any(origin, Self::far_corner(origin, template.size())) {
            return Err(RoomError::Collision);
        }
        let room = template.duplicate(self.next_room_name(), origin, self.snapshot_capacity);
        tracing::debug!("Restored template '{}' as '{}'", template.name(), room.name());
        Ok(self.push(room))
    }

    pub fn needs_tile(&self, tile: TileId) -> bool {
        self.rooms.iter().any(|r| r.needs_tile(tile))
    }

    pub fn remove_snapshots_needing_tile(&mut self, tile: TileId) -> usize {
        self.rooms
            .iter_mut()
            .map(|r| r.remove_snapshots_needing_tile(tile))
            .sum()
    }

    /// No room has edits since the last save
    pub fn is_saved(&self) -> bool {
        !self.rooms.iter().any(Room::is_dirty)
    }

    pub fn mark_saved(&mut self) {
        for room in &mut self.rooms {
            room.mark_saved();
        }
    }

    pub fn to_json(&self) -> Vec<RoomJson> {
        self.rooms.iter().map(Room::to_json).collect()
    }

    pub fn from_json(
        rooms: &[RoomJson],
        catalog: &TileCatalog,
        snapshot_capacity: usize,
    ) -> Result<Self, LoadError> {
        let mut map = RoomMap::new(snapshot_capacity);
        for json in rooms {
            let room = Room::from_json(json, catalog, snapshot_capacity)?;
            match map.insert_room(room) {
                Ok(_) => {}
                Err(RoomError::NameTaken(name)) => return Err(LoadError::DuplicateRoom(name)),
                Err(_) => return Err(LoadError::RoomCollision(json.name.clone())),
            }
        }
        Ok(map)
    }
}
