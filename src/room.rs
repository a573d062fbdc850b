//! Room Structure
//!
//! Represents an individual rectangular room and the arena that hands out room IDs.

use std::fmt;
use std::hash::{Hash, Hasher};

use glam::IVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Integer tile coordinate. Rows grow downward, so a larger `y` is further "down".
pub type Position = IVec2;

/// Identifier of a room, assigned sequentially by [`RoomArena`]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(pub usize);

impl RoomId {
    /// Index of the room inside the arena that created it
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Role a room plays in the layout
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RoomKind {
    /// One of the largest rooms; a node of the connectivity graph
    Main,
    /// Filler room, kept only if a corridor happens to run through it
    #[default]
    HallwayAttachment,
}

/// A rectangular room
///
/// Two rooms are equal when they share an ID, whatever their geometry.
/// Geometry changes during collision resolution and normalization, so the ID
/// is the only stable handle on a room.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct Room {
    /// Identifier assigned by the arena
    pub id: RoomId,

    /// Top-left corner of the room
    pub position: Position,

    /// Width in tiles (>= 1)
    pub width: i32,

    /// Height in tiles (>= 1)
    pub height: i32,

    /// Main room or hallway attachment
    pub kind: RoomKind,
}

impl Room {
    /// Create a new hallway-attachment room
    ///
    /// Normally called through [`RoomArena::insert`], which picks the ID.
    pub fn new(id: RoomId, position: Position, width: i32, height: i32) -> Self {
        Self {
            id,
            position,
            width,
            height,
            kind: RoomKind::HallwayAttachment,
        }
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.position.x
    }

    #[inline]
    pub fn y(&self) -> i32 {
        self.position.y
    }

    /// Exclusive right edge (`x + width`)
    #[inline]
    pub fn right(&self) -> i32 {
        self.position.x + self.width
    }

    /// Exclusive bottom edge (`y + height`)
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.position.y + self.height
    }

    /// Area in tiles
    #[inline]
    pub fn area(&self) -> i32 {
        self.width * self.height
    }

    /// Center tile, rounded toward the top-left corner
    pub fn center(&self) -> Position {
        Position::new(
            self.position.x + self.width / 2,
            self.position.y + self.height / 2,
        )
    }

    #[inline]
    pub fn is_main(&self) -> bool {
        self.kind == RoomKind::Main
    }

    /// Check whether a tile lies inside the room's footprint
    pub fn contains(&self, position: Position) -> bool {
        position.x >= self.x()
            && position.x < self.right()
            && position.y >= self.y()
            && position.y < self.bottom()
    }

    /// Iterate over every tile of the footprint, row by row
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (self.y()..self.bottom())
            .flat_map(move |y| (self.x()..self.right()).map(move |x| Position::new(x, y)))
    }
}

impl PartialEq for Room {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Room {}

impl Hash for Room {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Owner of every room created during a generation run
///
/// IDs are the insertion index, so `arena.get(id)` is a plain slice lookup.
#[derive(Debug, Clone, Default)]
pub struct RoomArena {
    rooms: Vec<Room>,
}

impl RoomArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty arena with room for `capacity` rooms
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rooms: Vec::with_capacity(capacity),
        }
    }

    /// Insert a new room and return its freshly assigned ID
    pub fn insert(&mut self, position: Position, width: i32, height: i32) -> RoomId {
        let id = RoomId(self.rooms.len());
        self.rooms.push(Room::new(id, position, width, height));
        id
    }

    #[inline]
    pub fn get(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(id.0)
    }

    #[inline]
    pub fn get_mut(&mut self, id: RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(id.0)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    #[inline]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Room> {
        self.rooms.iter()
    }

    /// Consume the arena, returning the rooms in ID order
    pub fn into_rooms(self) -> Vec<Room> {
        self.rooms
    }
}

impl std::ops::Index<RoomId> for RoomArena {
    type Output = Room;

    fn index(&self, id: RoomId) -> &Room {
        &self.rooms[id.0]
    }
}
