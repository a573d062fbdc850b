//! Dungeon main structure

use std::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::DungeonConfig;
use crate::error::{DungeonError, Result};
use crate::generation::{generate_layout, Layout, SeparationReport};
use crate::graph::Graph;
use crate::hallway::{plan_hallway, Hallway, HallwayId};
use crate::room::{Position, Room, RoomId};
use crate::tiles::{GlyphMapper, Tile, TileGrid};

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// A generated dungeon: rooms, corridors and the tile grid they are drawn on
///
/// Only main rooms and the attached rooms a corridor runs through are part
/// of the dungeon. The other scattered rooms are kept separately as
/// [`discarded_rooms`](Dungeon::discarded_rooms).
///
/// # Examples
///
/// ```
/// use dungeon_layout::*;
///
/// let config = DungeonConfigBuilder::new()
///     .seed(42)
///     .room_count(10, 16)
///     .build()
///     .unwrap();
///
/// let dungeon = Dungeon::generate(config).unwrap();
/// println!("{} rooms, {} hallways", dungeon.room_count(), dungeon.hallways().len());
///
/// // Look up what is under a tile
/// if let Some(room) = dungeon.room_at(Position::new(3, 3)) {
///     println!("Tile (3, 3) belongs to room {}", room.id);
/// }
/// ```
#[derive(Clone)]
pub struct Dungeon {
    /// Configuration used to generate this dungeon
    config: DungeonConfig,

    /// Every scattered room, indexed by room ID
    rooms: Vec<Room>,

    /// Main rooms, largest first
    main_rooms: Vec<RoomId>,

    /// Leftover rooms kept because a corridor crosses them, in discovery order
    attached_rooms: Vec<RoomId>,

    /// One hallway per connection, indexed by hallway ID
    hallways: Vec<Hallway>,

    /// Connections between main rooms the hallways were planned from
    connections: Graph,

    grid: TileGrid,

    separation: SeparationReport,

    /// Nearest-room lookups over placed rooms (requires spatial-index feature)
    #[cfg(feature = "spatial-index")]
    spatial_index: SpatialIndex,
}

impl Dungeon {
    /// Generate a dungeon from a configuration
    ///
    /// The random generator is a ChaCha8 stream seeded with `config.seed`,
    /// so the same configuration always gives the same dungeon.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the configuration fails
    /// [`DungeonConfig::validate`]. Inverted ranges in a hand-built
    /// configuration are clamped first, see [`DungeonConfig::normalized`].
    ///
    /// # Example
    ///
    /// ```
    /// use dungeon_layout::*;
    ///
    /// let config = DungeonConfigBuilder::new().seed(7).build().unwrap();
    /// let a = Dungeon::generate(config).unwrap();
    /// let b = Dungeon::generate(config).unwrap();
    /// assert_eq!(a.grid(), b.grid());
    /// ```
    pub fn generate(config: DungeonConfig) -> Result<Self> {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed as u64);
        Self::generate_with_rng(config, &mut rng)
    }

    /// Generate a dungeon drawing randomness from `rng`
    ///
    /// `config.seed` is ignored.
    pub fn generate_with_rng<R: Rng + ?Sized>(config: DungeonConfig, rng: &mut R) -> Result<Self> {
        let config = config.normalized();
        config.validate()?;

        let Layout {
            rooms,
            main_rooms,
            connections,
            separation,
        } = generate_layout(&config, rng);

        let mut grid = TileGrid::sized_for(&rooms);
        for id in &main_rooms {
            grid.paint_room(&rooms[id.index()]);
        }

        // Each corridor is carved before the next one is planned
        let half_width = config.hallway_half_width();
        let mut hallways = Vec::with_capacity(connections.edge_count());
        for (index, edge) in connections.edges().iter().enumerate() {
            let from = &rooms[edge.first().room.index()];
            let to = &rooms[edge.second().room.index()];
            let hallway = plan_hallway(HallwayId(index), from, to, &grid, rng);
            grid.paint_hallway(&hallway, half_width);
            hallways.push(hallway);
        }

        let leftovers: Vec<Room> = rooms.iter().filter(|room| !room.is_main()).cloned().collect();
        let attached_rooms = grid.attach_rooms(&leftovers);

        tracing::debug!(
            width = grid.width(),
            height = grid.height(),
            main_rooms = main_rooms.len(),
            attached_rooms = attached_rooms.len(),
            hallways = hallways.len(),
            orphans = hallways.iter().filter(|h| h.is_orphan()).count(),
            "generated dungeon"
        );

        #[cfg(feature = "spatial-index")]
        let spatial_index = SpatialIndex::new(
            main_rooms
                .iter()
                .chain(&attached_rooms)
                .map(|id| &rooms[id.index()]),
        );

        Ok(Self {
            config,
            rooms,
            main_rooms,
            attached_rooms,
            hallways,
            connections,
            grid,
            separation,
            #[cfg(feature = "spatial-index")]
            spatial_index,
        })
    }

    /// Get the configuration used to generate this dungeon
    #[inline]
    pub fn config(&self) -> &DungeonConfig {
        &self.config
    }

    /// Grid width in tiles
    #[inline]
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    /// Grid height in tiles
    #[inline]
    pub fn height(&self) -> usize {
        self.grid.height()
    }

    #[inline]
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// False if room separation stopped at the pass cap with rooms still
    /// closer than the configured spacing
    #[inline]
    pub fn separation_converged(&self) -> bool {
        self.separation.converged
    }

    /// Number of collision-resolution passes that were run
    #[inline]
    pub fn separation_passes(&self) -> usize {
        self.separation.passes
    }

    fn is_placed(&self, room: &Room) -> bool {
        room.is_main() || self.attached_rooms.contains(&room.id)
    }

    /// Placed rooms: main rooms largest first, then attached rooms
    pub fn rooms(&self) -> impl Iterator<Item = &Room> + '_ {
        self.main_rooms().chain(self.attached_rooms())
    }

    /// Number of placed rooms
    pub fn room_count(&self) -> usize {
        self.main_rooms.len() + self.attached_rooms.len()
    }

    /// Get a placed room by ID
    ///
    /// Returns `None` for unknown IDs and for discarded rooms.
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms
            .get(id.index())
            .filter(|room| self.is_placed(room))
    }

    /// Main rooms, largest first
    pub fn main_rooms(&self) -> impl Iterator<Item = &Room> + '_ {
        self.main_rooms.iter().map(move |id| &self.rooms[id.index()])
    }

    /// Leftover rooms kept because a corridor runs through them
    pub fn attached_rooms(&self) -> impl Iterator<Item = &Room> + '_ {
        self.attached_rooms.iter().map(move |id| &self.rooms[id.index()])
    }

    /// Scattered rooms that ended up in neither group, in ID order
    pub fn discarded_rooms(&self) -> impl Iterator<Item = &Room> + '_ {
        self.rooms.iter().filter(move |room| !self.is_placed(room))
    }

    /// All hallways, indexed by hallway ID
    #[inline]
    pub fn hallways(&self) -> &[Hallway] {
        &self.hallways
    }

    #[inline]
    pub fn hallway(&self, id: HallwayId) -> Option<&Hallway> {
        self.hallways.get(id.0)
    }

    /// Hallways for which no free path was found
    pub fn orphan_hallways(&self) -> impl Iterator<Item = &Hallway> + '_ {
        self.hallways.iter().filter(|hallway| hallway.is_orphan())
    }

    /// The connection graph between main rooms
    #[inline]
    pub fn connections(&self) -> &Graph {
        &self.connections
    }

    /// Tile at a position, `None` outside the grid
    #[inline]
    pub fn tile_at(&self, position: Position) -> Option<Tile> {
        self.grid.get(position)
    }

    /// The room whose floor covers a position
    pub fn room_at(&self, position: Position) -> Option<&Room> {
        self.tile_at(position)?
            .room()
            .and_then(|id| self.rooms.get(id.index()))
    }

    /// Hallways ending at a room, orphans included
    ///
    /// # Errors
    ///
    /// Returns `RoomNotFound` if `room` is not a placed room
    pub fn hallways_of(&self, room: RoomId) -> Result<Vec<&Hallway>> {
        self.room(room).ok_or(DungeonError::RoomNotFound(room))?;
        Ok(self
            .hallways
            .iter()
            .filter(|hallway| hallway.connects(room))
            .collect())
    }

    /// Rooms at the other end of the hallways ending at `room`
    ///
    /// # Errors
    ///
    /// Returns `RoomNotFound` if `room` is not a placed room
    pub fn connected_room_ids(&self, room: RoomId) -> Result<Vec<RoomId>> {
        Ok(self
            .hallways_of(room)?
            .into_iter()
            .filter_map(|hallway| hallway.other_end(room))
            .collect())
    }

    /// Find the placed room whose center is closest to a position
    /// (requires spatial-index feature)
    ///
    /// Returns `None` only if the dungeon has no placed rooms.
    #[cfg(feature = "spatial-index")]
    pub fn nearest_room(&self, position: Position) -> Option<&Room> {
        self.spatial_index
            .find_nearest(position)
            .and_then(|id| self.rooms.get(id.index()))
    }

    /// Paint the dungeon's rooms and hallways onto a fresh grid
    ///
    /// Runs the same painting steps as generation, so the result equals
    /// [`grid`](Dungeon::grid).
    pub fn rasterize(&self) -> TileGrid {
        let ordered: Vec<Room> = self
            .main_rooms()
            .chain(self.rooms.iter().filter(|room| !room.is_main()))
            .cloned()
            .collect();
        let (grid, _) = TileGrid::rasterize(
            self.grid.width(),
            self.grid.height(),
            &ordered,
            &self.hallways,
            self.config.hallway_half_width(),
        );
        grid
    }

    /// Render the dungeon as text with a custom glyph mapping
    pub fn render_with<M: GlyphMapper>(&self, mapper: &M) -> String {
        self.grid.render_with(mapper)
    }
}

impl fmt::Display for Dungeon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.grid, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Bounds, DungeonConfigBuilder};
    use crate::generation::rooms_collide;
    use crate::tiles::CustomGlyphMapper;

    fn small_config(seed: u32) -> DungeonConfig {
        DungeonConfigBuilder::new()
            .seed(seed)
            .room_count(10, 16)
            .build()
            .unwrap()
    }

    #[test]
    fn test_dungeon_generation() {
        let dungeon = Dungeon::generate(small_config(42)).unwrap();

        assert!(dungeon.separation_converged());
        assert!(dungeon.width() > 0);
        assert!(dungeon.height() > 0);
        assert!(dungeon.main_rooms().count() >= 5);
        assert_eq!(dungeon.hallways().len(), dungeon.connections().edge_count());
        assert_eq!(
            dungeon.room_count(),
            dungeon.main_rooms().count() + dungeon.attached_rooms().count()
        );
    }

    #[test]
    fn test_same_seed_same_dungeon() {
        let a = Dungeon::generate(small_config(9)).unwrap();
        let b = Dungeon::generate(small_config(9)).unwrap();

        assert_eq!(a.grid(), b.grid());
        assert_eq!(a.hallways(), b.hallways());
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn test_generate_with_rng_ignores_seed() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let a = Dungeon::generate_with_rng(small_config(1), &mut rng).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let b = Dungeon::generate_with_rng(small_config(2), &mut rng).unwrap();

        assert_eq!(a.grid(), b.grid());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = small_config(0);
        config.hallway_width = 2;
        assert!(matches!(
            Dungeon::generate(config),
            Err(DungeonError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_room_lookups() {
        let dungeon = Dungeon::generate(small_config(17)).unwrap();

        for room in dungeon.rooms() {
            assert_eq!(dungeon.room(room.id), Some(room));
            assert_eq!(dungeon.room_at(room.position).map(|r| r.id), Some(room.id));
        }
        for room in dungeon.discarded_rooms() {
            assert!(dungeon.room(room.id).is_none());
            assert!(matches!(
                dungeon.hallways_of(room.id),
                Err(DungeonError::RoomNotFound(_))
            ));
        }
        assert!(dungeon.room(RoomId(10_000)).is_none());
        assert_eq!(dungeon.tile_at(Position::new(-1, 0)), None);
    }

    #[test]
    fn test_hallway_queries() {
        let dungeon = Dungeon::generate(small_config(23)).unwrap();

        for hallway in dungeon.hallways() {
            assert_eq!(dungeon.hallway(hallway.id), Some(hallway));
            let from = dungeon.hallways_of(hallway.from).unwrap();
            assert!(from.contains(&hallway));
            let linked = dungeon.connected_room_ids(hallway.from).unwrap();
            assert!(linked.contains(&hallway.to));
        }
        assert!(dungeon.hallway(HallwayId(dungeon.hallways().len())).is_none());
        assert!(dungeon.orphan_hallways().all(|h| h.path.is_empty()));
    }

    #[test]
    fn test_main_room_cells_are_painted() {
        let dungeon = Dungeon::generate(small_config(31)).unwrap();

        // The largest room is painted first, so it owns its whole footprint
        let largest = dungeon.main_rooms().next().unwrap();
        for cell in largest.cells() {
            assert_eq!(dungeon.tile_at(cell), Some(Tile::Room(largest.id)));
        }
    }

    #[test]
    fn test_rasterize_matches_grid() {
        let dungeon = Dungeon::generate(small_config(4)).unwrap();
        assert_eq!(&dungeon.rasterize(), dungeon.grid());
    }

    #[test]
    fn test_render_with_custom_glyphs() {
        let dungeon = Dungeon::generate(small_config(12)).unwrap();
        let mapper = CustomGlyphMapper {
            wall: 'x',
            ..Default::default()
        };

        let text = dungeon.render_with(&mapper);
        assert_eq!(text.lines().count(), dungeon.height());
        assert!(text.lines().all(|line| line.chars().count() == dungeon.width()));
        assert!(!text.contains(' '));
        assert_eq!(dungeon.to_string().replace(' ', "x"), text);
    }

    #[test]
    fn test_no_collisions_after_generation() {
        let dungeon = Dungeon::generate(small_config(77)).unwrap();
        let spacing = dungeon.config().min_spacing;
        let rooms: Vec<&Room> = dungeon.rooms().chain(dungeon.discarded_rooms()).collect();

        for (i, a) in rooms.iter().enumerate() {
            for b in rooms.iter().skip(i + 1) {
                assert!(!rooms_collide(a, b, spacing));
            }
        }
    }

    #[cfg(feature = "spatial-index")]
    #[test]
    fn test_nearest_room() {
        let dungeon = Dungeon::generate(small_config(42)).unwrap();

        for room in dungeon.rooms() {
            assert_eq!(dungeon.nearest_room(room.center()).map(|r| r.id), Some(room.id));
        }
    }

    #[test]
    fn test_empty_dungeon() {
        let config = DungeonConfigBuilder::new()
            .seed(1)
            .room_count(0, 0)
            .build()
            .unwrap();

        let dungeon = Dungeon::generate(config).unwrap();

        assert_eq!((dungeon.width(), dungeon.height()), (0, 0));
        assert_eq!(dungeon.room_count(), 0);
        assert!(dungeon.hallways().is_empty());
        assert_eq!(dungeon.to_string(), "");
    }

    #[test]
    fn test_hand_built_inverted_range_is_clamped() {
        let mut config = small_config(9);
        config.room_count = Bounds { min: 40, max: 20 };
        config.room_width = Bounds { min: 8, max: 3 };

        let dungeon = Dungeon::generate(config).unwrap();

        assert_eq!(dungeon.config().room_count, Bounds::exactly(20));
        assert_eq!(
            dungeon.rooms().count() + dungeon.discarded_rooms().count(),
            20
        );
        assert!(dungeon
            .rooms()
            .chain(dungeon.discarded_rooms())
            .all(|room| room.width == 3));
    }

    #[test]
    fn test_hand_built_invalid_config_rejected() {
        let mut config = small_config(9);
        config.min_spacing = -2;
        assert!(Dungeon::generate(config).is_err());

        let mut config = small_config(9);
        config.room_height = Bounds { min: 1, max: i32::MAX };
        assert!(Dungeon::generate(config).is_err());
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::config::DungeonConfigBuilder;
    use crate::generation::rooms_collide;
    use proptest::prelude::*;

    fn config(seed: u32, rooms: usize, spacing: i32, width: u32) -> DungeonConfig {
        DungeonConfigBuilder::new()
            .seed(seed)
            .room_count(rooms, rooms)
            .min_spacing(spacing)
            .unwrap()
            .hallway_width(width)
            .unwrap()
            .extra_edge_fraction(0.0)
            .unwrap()
            .build()
            .unwrap()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_layout_invariants(
            seed in any::<u32>(),
            rooms in 2usize..20,
            spacing in 1i32..3,
            width in prop::sample::select(vec![1u32, 3, 5])
        ) {
            let dungeon = Dungeon::generate(config(seed, rooms, spacing, width)).unwrap();
            prop_assert!(dungeon.separation_converged());

            let all: Vec<&Room> = dungeon.rooms().chain(dungeon.discarded_rooms()).collect();
            prop_assert_eq!(all.len(), rooms);

            // Separated, then shifted to start at the origin
            for (i, a) in all.iter().enumerate() {
                for b in all.iter().skip(i + 1) {
                    prop_assert!(!rooms_collide(a, b, spacing));
                }
            }
            prop_assert_eq!(all.iter().map(|r| r.x()).min(), Some(0));
            prop_assert_eq!(all.iter().map(|r| r.y()).min(), Some(0));

            // Pure spanning tree over the main rooms
            let main = dungeon.main_rooms().count();
            prop_assert_eq!(main, rooms / 2);
            prop_assert!(dungeon.connections().is_connected());
            prop_assert_eq!(dungeon.connections().edge_count(), main.saturating_sub(1));

            // Room tiles stay inside their room
            for (position, tile) in dungeon.grid().iter() {
                if let Some(id) = tile.room() {
                    let room = dungeon.room(id);
                    prop_assert!(room.is_some());
                    prop_assert!(room.map_or(false, |r| r.contains(position)));
                }
            }

            // Paths are straight or bend exactly once
            for hallway in dungeon.hallways() {
                let path = &hallway.path;
                prop_assert!(matches!(path.len(), 0 | 2 | 3));
                for (a, b) in hallway.segments() {
                    prop_assert!((a.x == b.x) != (a.y == b.y));
                }
                if path.len() == 3 {
                    let first_horizontal = path[0].y == path[1].y;
                    let second_horizontal = path[1].y == path[2].y;
                    prop_assert_ne!(first_horizontal, second_horizontal);
                }
            }

            prop_assert_eq!(&dungeon.rasterize(), dungeon.grid());
        }

        #[test]
        fn prop_same_seed_same_dungeon(seed in any::<u32>(), rooms in 2usize..16) {
            let a = Dungeon::generate(config(seed, rooms, 1, 3)).unwrap();
            let b = Dungeon::generate(config(seed, rooms, 1, 3)).unwrap();

            prop_assert_eq!(a.grid(), b.grid());
            prop_assert_eq!(a.hallways(), b.hallways());
        }
    }
}
