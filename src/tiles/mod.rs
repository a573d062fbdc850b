//! Tile grid and rasterization
//!
//! Turns rooms and corridor waypoints into a row-major grid of tiles.

mod glyphs;

pub use glyphs::{BasicGlyphMapper, CustomGlyphMapper, GlyphMapper};

use std::collections::HashSet;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::hallway::{Hallway, HallwayId};
use crate::room::{Position, Room, RoomId};

/// Content of a single grid cell
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tile {
    /// Solid rock
    #[default]
    Empty,
    /// Floor belonging to a room
    Room(RoomId),
    /// Floor belonging to a corridor
    Hallway(HallwayId),
}

impl Tile {
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Tile::Empty)
    }

    #[inline]
    pub fn room(&self) -> Option<RoomId> {
        match self {
            Tile::Room(id) => Some(*id),
            _ => None,
        }
    }

    #[inline]
    pub fn hallway(&self) -> Option<HallwayId> {
        match self {
            Tile::Hallway(id) => Some(*id),
            _ => None,
        }
    }
}

/// `height` rows of `width` tiles, row 0 at the top
///
/// Room tiles are never replaced by corridor tiles or by another room.
/// Corridor tiles only give way to rooms attached after all corridors are
/// drawn (see [`TileGrid::attach_rooms`]).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Create an empty grid
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![Tile::Empty; width * height],
        }
    }

    /// Create an empty grid just large enough for every room
    ///
    /// Rooms are expected to have non-negative coordinates.
    pub fn sized_for<'a>(rooms: impl IntoIterator<Item = &'a Room>) -> Self {
        let (width, height) = rooms
            .into_iter()
            .fold((0, 0), |(w, h), room| (w.max(room.right()), h.max(room.bottom())));
        Self::new(width.max(0) as usize, height.max(0) as usize)
    }

    /// Paint rooms, corridors and attachments from scratch
    ///
    /// `rooms` holds every candidate room; main rooms are painted first, in
    /// order, and the others only survive if a corridor touches them.
    /// Returns the grid and the IDs of the attached rooms.
    pub fn rasterize(
        width: usize,
        height: usize,
        rooms: &[Room],
        hallways: &[Hallway],
        half_width: i32,
    ) -> (Self, Vec<RoomId>) {
        let mut grid = Self::new(width, height);
        for room in rooms.iter().filter(|room| room.is_main()) {
            grid.paint_room(room);
        }
        for hallway in hallways {
            grid.paint_hallway(hallway, half_width);
        }
        let leftovers: Vec<Room> = rooms.iter().filter(|room| !room.is_main()).cloned().collect();
        let attached = grid.attach_rooms(&leftovers);
        (grid, attached)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, position: Position) -> Option<usize> {
        let (x, y) = (position.x, position.y);
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    /// Tile at a position, `None` outside the grid
    pub fn get(&self, position: Position) -> Option<Tile> {
        self.index(position).map(|index| self.tiles[index])
    }

    /// Check whether a position is inside the grid and empty
    ///
    /// Positions outside the grid count as occupied.
    pub fn is_free(&self, position: Position) -> bool {
        matches!(self.get(position), Some(Tile::Empty))
    }

    /// Overwrite a tile. Positions outside the grid are ignored.
    pub fn set(&mut self, position: Position, tile: Tile) {
        if let Some(index) = self.index(position) {
            self.tiles[index] = tile;
        }
    }

    fn fill_if_empty(&mut self, position: Position, tile: Tile) {
        if let Some(index) = self.index(position) {
            if self.tiles[index].is_empty() {
                self.tiles[index] = tile;
            }
        }
    }

    /// Paint a room's footprint on every tile that holds no room yet
    pub fn paint_room(&mut self, room: &Room) {
        for cell in room.cells() {
            if let Some(index) = self.index(cell) {
                if self.tiles[index].room().is_none() {
                    self.tiles[index] = Tile::Room(room.id);
                }
            }
        }
    }

    /// Carve a corridor along its waypoints
    ///
    /// Each segment is widened by `half_width` tiles on both sides of its
    /// center line, clamped to the grid. Only empty tiles are claimed.
    pub fn paint_hallway(&mut self, hallway: &Hallway, half_width: i32) {
        let tile = Tile::Hallway(hallway.id);
        let max_x = self.width as i32 - 1;
        let max_y = self.height as i32 - 1;

        for pair in hallway.path.windows(2) {
            let (previous, current) = (pair[0], pair[1]);

            if previous.x != current.x {
                let rows = (current.y - half_width).max(0)..=(current.y + half_width).min(max_y);
                for x in previous.x.min(current.x)..=previous.x.max(current.x) {
                    for y in rows.clone() {
                        self.fill_if_empty(Position::new(x, y), tile);
                    }
                }
            }

            if previous.y != current.y {
                let columns =
                    (current.x - half_width).max(0)..=(current.x + half_width).min(max_x);
                for y in previous.y.min(current.y)..=previous.y.max(current.y) {
                    for x in columns.clone() {
                        self.fill_if_empty(Position::new(x, y), tile);
                    }
                }
            }
        }
    }

    /// Keep the leftover rooms that a corridor runs through
    ///
    /// Scans the grid row by row. The first time a corridor tile is found
    /// inside one of `rooms`, that room's whole footprint replaces the empty
    /// and corridor tiles it covers. Returns the attached rooms' IDs in
    /// discovery order, each at most once.
    pub fn attach_rooms(&mut self, rooms: &[Room]) -> Vec<RoomId> {
        let mut footprints: Vec<Option<usize>> = vec![None; self.tiles.len()];
        for (slot, room) in rooms.iter().enumerate() {
            for cell in room.cells() {
                if let Some(index) = self.index(cell) {
                    footprints[index] = Some(slot);
                }
            }
        }

        let mut visited = HashSet::new();
        let mut attached = Vec::new();

        for index in 0..self.tiles.len() {
            let Some(slot) = footprints[index] else {
                continue;
            };
            if self.tiles[index].hallway().is_none() || !visited.insert(slot) {
                continue;
            }

            let room = &rooms[slot];
            for cell in room.cells() {
                if let Some(target) = self.index(cell) {
                    if self.tiles[target].room().is_none() {
                        self.tiles[target] = Tile::Room(room.id);
                    }
                }
            }
            attached.push(room.id);
        }

        attached
    }

    /// Iterate over rows, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> + '_ {
        // A zero-width grid holds no tiles, so any non-zero chunk size works
        self.tiles.chunks(self.width.max(1))
    }

    /// Iterate over every tile with its position, row by row
    pub fn iter(&self) -> impl Iterator<Item = (Position, Tile)> + '_ {
        self.tiles.iter().enumerate().map(move |(index, &tile)| {
            let x = (index % self.width) as i32;
            let y = (index / self.width) as i32;
            (Position::new(x, y), tile)
        })
    }

    /// Number of tiles matching a predicate
    pub fn count(&self, predicate: impl Fn(&Tile) -> bool) -> usize {
        self.tiles.iter().filter(|tile| predicate(tile)).count()
    }

    /// Render the grid as text, one line per row
    pub fn render_with<M: GlyphMapper>(&self, mapper: &M) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in self.rows() {
            out.extend(row.iter().map(|tile| mapper.map_glyph(tile)));
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for TileGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_with(&BasicGlyphMapper))
    }
}
