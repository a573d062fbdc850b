//! Spatial indexing for position-to-room lookups
//!
//! This module is only available with the `spatial-index` feature.

#[cfg(feature = "spatial-index")]
use kiddo::immutable::float::kdtree::ImmutableKdTree;
#[cfg(feature = "spatial-index")]
use kiddo::SquaredEuclidean;

#[cfg(feature = "spatial-index")]
use crate::room::{Position, Room, RoomId};

/// KD-tree over room centers
///
/// Answers "which room is closest to this tile" in O(log n), for placing
/// entities or resolving clicks that land in a corridor or in solid rock.
#[cfg(feature = "spatial-index")]
#[derive(Clone)]
pub struct SpatialIndex {
    /// `None` when built from no rooms
    tree: Option<ImmutableKdTree<f32, usize, 2, 32>>,
    ids: Vec<RoomId>,
}

#[cfg(feature = "spatial-index")]
impl SpatialIndex {
    /// Build the index from the rooms' centers
    ///
    /// # Example
    ///
    /// ```
    /// use dungeon_layout::*;
    ///
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// let rooms = vec![
    ///     Room::new(RoomId(0), Position::new(0, 0), 4, 4),
    ///     Room::new(RoomId(1), Position::new(20, 0), 4, 4),
    /// ];
    ///
    /// let index = SpatialIndex::new(&rooms);
    /// assert_eq!(index.find_nearest(Position::new(17, 3)), Some(RoomId(1)));
    /// # }
    /// ```
    pub fn new<'a>(rooms: impl IntoIterator<Item = &'a Room>) -> Self {
        let (points, ids): (Vec<[f32; 2]>, Vec<RoomId>) = rooms
            .into_iter()
            .map(|room| {
                let center = room.center().as_vec2();
                ([center.x, center.y], room.id)
            })
            .unzip();

        let tree = (!points.is_empty()).then(|| ImmutableKdTree::new_from_slice(&points));
        Self { tree, ids }
    }

    /// Number of indexed rooms
    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Room whose center is closest to `position`, `None` if the index is empty
    pub fn find_nearest(&self, position: Position) -> Option<RoomId> {
        let tree = self.tree.as_ref()?;
        let query = position.as_vec2();
        let result = tree.nearest_one::<SquaredEuclidean>(&[query.x, query.y]);
        self.ids.get(result.item).copied()
    }
}

#[cfg(test)]
#[cfg(feature = "spatial-index")]
mod tests {
    use super::*;

    fn room(id: usize, x: i32, y: i32, size: i32) -> Room {
        Room::new(RoomId(id), Position::new(x, y), size, size)
    }

    #[test]
    fn test_spatial_index_basic() {
        let rooms = vec![
            room(0, 0, 0, 4),
            room(1, 30, 0, 4),
            room(2, 0, 30, 4),
            room(3, 30, 30, 6),
        ];

        let index = SpatialIndex::new(&rooms);
        assert_eq!(index.len(), 4);

        assert_eq!(index.find_nearest(Position::new(1, 1)), Some(RoomId(0)));
        assert_eq!(index.find_nearest(Position::new(25, 3)), Some(RoomId(1)));
        assert_eq!(index.find_nearest(Position::new(4, 26)), Some(RoomId(2)));
        assert_eq!(index.find_nearest(Position::new(40, 40)), Some(RoomId(3)));
    }

    #[test]
    fn test_spatial_index_keeps_room_ids() {
        // IDs need not match the order rooms were indexed in
        let rooms = vec![room(7, 10, 10, 2), room(2, 50, 10, 2)];
        let index = SpatialIndex::new(&rooms);

        assert_eq!(index.find_nearest(rooms[0].center()), Some(RoomId(7)));
        assert_eq!(index.find_nearest(rooms[1].center()), Some(RoomId(2)));
    }

    #[test]
    fn test_spatial_index_empty() {
        let index = SpatialIndex::new(&Vec::<Room>::new());
        assert!(index.is_empty());
        assert_eq!(index.find_nearest(Position::new(0, 0)), None);
    }
}
