//! Corridors between connected rooms
//!
//! A corridor is described by up to three waypoints: two for a straight run
//! between rooms that face each other, three for an L-shaped run with one
//! bend. Paths are planned against the tile grid as it stands, so corridors
//! carved earlier steer the ones planned after them.

use std::fmt;

use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::room::{Position, Room, RoomId};
use crate::tiles::TileGrid;

/// Identifier of a hallway, its index in the dungeon's hallway list
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HallwayId(pub usize);

impl fmt::Display for HallwayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H{}", self.0)
    }
}

/// Corridor linking two rooms
///
/// An empty `path` means no free route was found. The rooms stay connected
/// in the dungeon graph but no tiles were carved between them.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hallway {
    pub id: HallwayId,
    pub from: RoomId,
    pub to: RoomId,
    /// Waypoints; consecutive points differ along exactly one axis
    pub path: Vec<Position>,
}

impl Hallway {
    /// Create a hallway without a path
    pub fn new(id: HallwayId, from: RoomId, to: RoomId) -> Self {
        Self {
            id,
            from,
            to,
            path: Vec::new(),
        }
    }

    /// True if no path could be carved
    #[inline]
    pub fn is_orphan(&self) -> bool {
        self.path.is_empty()
    }

    /// True for a single-segment corridor
    #[inline]
    pub fn is_straight(&self) -> bool {
        self.path.len() == 2
    }

    /// Check whether the hallway ends at `room`
    pub fn connects(&self, room: RoomId) -> bool {
        self.from == room || self.to == room
    }

    /// The room at the other end, if `room` is one of the ends
    pub fn other_end(&self, room: RoomId) -> Option<RoomId> {
        if self.from == room {
            Some(self.to)
        } else if self.to == room {
            Some(self.from)
        } else {
            None
        }
    }

    /// Consecutive waypoint pairs
    pub fn segments(&self) -> impl Iterator<Item = (Position, Position)> + '_ {
        self.path.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

/// The two rooms of a connection, sorted along each axis
///
/// Ties go to `to`: it is the left room when both share an x, and the
/// bottom room when both share a y.
struct Arrangement<'a> {
    left: &'a Room,
    right: &'a Room,
    top: &'a Room,
    bottom: &'a Room,
}

impl<'a> Arrangement<'a> {
    fn new(from: &'a Room, to: &'a Room) -> Self {
        let (left, right) = if from.x() < to.x() { (from, to) } else { (to, from) };
        let (bottom, top) = if from.y() > to.y() { (from, to) } else { (to, from) };
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Rows shared by both rooms (top room's bottom edge minus bottom room's y)
    fn vertical_overlap(&self) -> i32 {
        self.top.bottom() - self.bottom.y()
    }

    /// Columns shared by both rooms
    fn horizontal_overlap(&self) -> i32 {
        self.left.right() - self.right.x()
    }

    fn left_is_bottom(&self) -> bool {
        self.left.id == self.bottom.id
    }
}

/// Check that every tile of an axis-aligned segment, ends included, is free
fn segment_is_free(grid: &TileGrid, a: Position, b: Position) -> bool {
    let min = a.min(b);
    let max = a.max(b);
    (min.y..=max.y).all(|y| (min.x..=max.x).all(|x| grid.is_free(Position::new(x, y))))
}

/// A usable L path: both legs non-empty and free
///
/// Rooms sharing an edge line produce zero-length legs, which would turn the
/// L into a straight run.
fn is_clear_bend(grid: &TileGrid, start: Position, bend: Position, end: Position) -> bool {
    start != bend
        && bend != end
        && segment_is_free(grid, start, bend)
        && segment_is_free(grid, bend, end)
}

fn horizontal_run(arrangement: &Arrangement, grid: &TileGrid) -> Option<Vec<Position>> {
    let Arrangement { left, right, bottom, .. } = *arrangement;
    let door_y = bottom.y() + arrangement.vertical_overlap() / 2;

    let clear = (left.right()..right.x()).all(|x| grid.is_free(Position::new(x, door_y)));
    clear.then(|| {
        vec![
            Position::new(left.right(), door_y),
            Position::new(right.x(), door_y),
        ]
    })
}

fn vertical_run(arrangement: &Arrangement, grid: &TileGrid) -> Option<Vec<Position>> {
    let Arrangement { right, top, bottom, .. } = *arrangement;
    let door_x = right.x() + arrangement.horizontal_overlap() / 2;

    let clear = (top.bottom()..bottom.y()).all(|y| grid.is_free(Position::new(door_x, y)));
    clear.then(|| {
        vec![
            Position::new(door_x, top.bottom()),
            Position::new(door_x, bottom.y()),
        ]
    })
}

/// Every collision-free L-shaped path between the two rooms
///
/// The first family leaves the left room through its right wall and bends
/// into the right room; the second leaves the bottom room through its top
/// wall and bends toward the top room.
fn bent_runs(arrangement: &Arrangement, grid: &TileGrid) -> Vec<[Position; 3]> {
    let Arrangement {
        left,
        right,
        top,
        bottom,
    } = *arrangement;
    let left_is_bottom = arrangement.left_is_bottom();
    let mut candidates = Vec::new();

    let first_x = left.right();
    let end_y = if left_is_bottom { right.bottom() } else { right.y() - 1 };
    for first_y in left.y()..left.bottom() {
        for bend_x in right.x()..right.right() {
            let start = Position::new(first_x, first_y);
            let bend = Position::new(bend_x, first_y);
            let end = Position::new(bend_x, end_y);
            if is_clear_bend(grid, start, bend, end) {
                candidates.push([start, bend, end]);
            }
        }
    }

    let first_y = bottom.y() - 1;
    let end_x = if left_is_bottom { top.x() - 1 } else { top.right() };
    for first_x in bottom.x()..bottom.right() {
        for bend_y in top.y()..top.bottom() {
            let start = Position::new(first_x, first_y);
            let bend = Position::new(first_x, bend_y);
            let end = Position::new(end_x, bend_y);
            if is_clear_bend(grid, start, bend, end) {
                candidates.push([start, bend, end]);
            }
        }
    }

    candidates
}

/// Plan the corridor between `from` and `to` on the current grid
///
/// Tries, in order: a straight horizontal run when the rooms share rows, a
/// straight vertical run when they share columns, and otherwise a random
/// pick among all free L-shaped runs. Returns an orphan hallway when the
/// chosen straight run is blocked or no L-shaped run is free.
pub fn plan_hallway<R: Rng + ?Sized>(
    id: HallwayId,
    from: &Room,
    to: &Room,
    grid: &TileGrid,
    rng: &mut R,
) -> Hallway {
    let mut hallway = Hallway::new(id, from.id, to.id);
    let arrangement = Arrangement::new(from, to);

    let vertical_overlap = arrangement.vertical_overlap();
    let horizontal_overlap = arrangement.horizontal_overlap();

    let path = if vertical_overlap > 0 && vertical_overlap <= arrangement.top.height {
        horizontal_run(&arrangement, grid)
    } else if horizontal_overlap > 0 && horizontal_overlap <= arrangement.left.width {
        vertical_run(&arrangement, grid)
    } else {
        let candidates = bent_runs(&arrangement, grid);
        if candidates.is_empty() {
            None
        } else {
            let pick = rng.gen_range(0..candidates.len());
            Some(candidates[pick].to_vec())
        }
    };

    match path {
        Some(path) => hallway.path = path,
        None => tracing::debug!(hallway = %id, from = %from.id, to = %to.id, "no free corridor"),
    }
    hallway
}
