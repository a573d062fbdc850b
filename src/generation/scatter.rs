//! Room scattering
//!
//! Drops randomly sized rooms at random positions inside a disk. Rooms
//! overlap freely at this point; the separation pass spreads them out.
//!
//! # Algorithm
//!
//! The position sampler avoids rejection: the radial fraction is the sum of
//! two uniform draws folded back into `[0, 1]`, which gives the triangular
//! density a uniform-in-disk point needs along the radius.

use rand::Rng;
use std::f64::consts::PI;

use crate::config::DungeonConfig;
use crate::room::{Position, RoomArena, RoomId};

/// Pick a random position inside a disk of the given radius
///
/// Coordinates are truncated toward zero.
pub fn random_point_in_disk<R: Rng + ?Sized>(radius: u32, rng: &mut R) -> Position {
    let theta = 2.0 * PI * rng.gen::<f64>();
    let u = rng.gen::<f64>() + rng.gen::<f64>();
    let r = if u > 1.0 { 2.0 - u } else { u };

    let radius = radius as f64;
    Position::new(
        (radius * r * theta.cos()) as i32,
        (radius * r * theta.sin()) as i32,
    )
}

/// Create one room inside the disk and register it in the arena
///
/// The height is drawn before the width.
pub fn scatter_room<R: Rng + ?Sized>(
    arena: &mut RoomArena,
    config: &DungeonConfig,
    radius: u32,
    rng: &mut R,
) -> RoomId {
    let height = config.room_height.sample(rng);
    let width = config.room_width.sample(rng);
    let position = random_point_in_disk(radius, rng);
    arena.insert(position, width, height)
}

/// Scatter `count` rooms inside a disk of the given radius
pub fn scatter_rooms<R: Rng + ?Sized>(
    config: &DungeonConfig,
    count: usize,
    radius: u32,
    rng: &mut R,
) -> RoomArena {
    let mut arena = RoomArena::with_capacity(count);
    for _ in 0..count {
        scatter_room(&mut arena, config, radius, rng);
    }
    arena
}
