//! Room separation
//!
//! Pushes overlapping rooms apart one tile at a time until no pair is closer
//! than the configured spacing, then shifts the layout so it starts at (0, 0).

use crate::room::{Position, Room};

/// Options for the separation loop
#[derive(Debug, Clone, Copy)]
pub struct SeparationOptions {
    /// Minimum gap required between any two rooms
    pub spacing: i32,
    /// Maximum number of full passes before giving up
    pub max_passes: usize,
}

impl Default for SeparationOptions {
    fn default() -> Self {
        Self {
            spacing: 1,
            max_passes: 10_000,
        }
    }
}

/// Outcome of [`separate_rooms`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeparationReport {
    /// Passes run, including the final collision-free one
    pub passes: usize,
    /// False if the pass cap was hit while rooms still collided
    pub converged: bool,
}

/// Axis and sense along which the second room of a pair is pushed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Push {
    Right,
    Left,
    Down,
    Up,
}

/// Check whether two rooms overlap once `spacing` is added around the first
pub fn rooms_collide(r1: &Room, r2: &Room, spacing: i32) -> bool {
    r1.x() - spacing < r2.right()
        && r1.right() + spacing > r2.x()
        && r1.y() - spacing < r2.bottom()
        && r1.bottom() + spacing > r2.y()
}

/// Pick the cheapest direction to push `r2` away from `r1`
///
/// Candidates are scored by the distance needed to clear the overlap and
/// evaluated right, left, down, up. A later candidate wins ties.
fn choose_push(r1: &Room, r2: &Room, spacing: i32) -> Push {
    let mut best = Push::Up;
    let mut best_score = i32::MAX;

    let mut consider = |push: Push, applies: bool, score: i32| {
        if applies && score <= best_score {
            best = push;
            best_score = score;
        }
    };

    consider(
        Push::Right,
        r1.right() + spacing >= r2.x(),
        r1.right() - r2.x(),
    );
    consider(
        Push::Left,
        r2.right() >= r1.x() - spacing,
        r2.right() - r1.x(),
    );
    consider(
        Push::Down,
        r1.bottom() + spacing >= r2.y(),
        r1.bottom() - r2.y(),
    );
    consider(Push::Up, r2.bottom() >= r1.y() - spacing, r2.bottom() - r1.y());

    best
}

/// Move two colliding rooms one tile apart. Returns false if they did not collide.
fn separate_pair(r1: &mut Room, r2: &mut Room, spacing: i32) -> bool {
    if !rooms_collide(r1, r2, spacing) {
        return false;
    }

    let offset = match choose_push(r1, r2, spacing) {
        Push::Right => Position::X,
        Push::Left => Position::NEG_X,
        Push::Down => Position::Y,
        Push::Up => Position::NEG_Y,
    };
    r2.position += offset;
    r1.position -= offset;
    true
}

/// Borrow two distinct rooms mutably
fn pair_mut(rooms: &mut [Room], i: usize, j: usize) -> (&mut Room, &mut Room) {
    debug_assert_ne!(i, j);
    if i < j {
        let (head, tail) = rooms.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = rooms.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}

/// Separate rooms until no two of them collide
///
/// Every pass visits all ordered pairs, so each unordered pair is handled
/// twice per pass. Stops after a pass without collisions or after
/// `options.max_passes` passes, whichever comes first.
pub fn separate_rooms(rooms: &mut [Room], options: SeparationOptions) -> SeparationReport {
    let count = rooms.len();
    let mut passes = 0;

    while passes < options.max_passes {
        passes += 1;
        let mut collided = false;

        for i in 0..count {
            for j in 0..count {
                if i == j {
                    continue;
                }
                let (r1, r2) = pair_mut(rooms, i, j);
                collided |= separate_pair(r1, r2, options.spacing);
            }
        }

        if !collided {
            tracing::debug!(rooms = count, passes, "rooms separated");
            return SeparationReport {
                passes,
                converged: true,
            };
        }
    }

    tracing::warn!(
        rooms = count,
        passes,
        spacing = options.spacing,
        "room separation hit the pass cap with collisions remaining"
    );
    SeparationReport {
        passes,
        converged: false,
    }
}

/// Translate all rooms so the smallest x and the smallest y are both zero
pub fn normalize_positions(rooms: &mut [Room]) {
    let Some(min) = rooms.iter().map(|room| room.position).reduce(|a, b| a.min(b)) else {
        return;
    };
    for room in rooms.iter_mut() {
        room.position -= min;
    }
}
