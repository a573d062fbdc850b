//! Dungeon Configuration and Builder
//!
//! This module provides configuration types for deterministic dungeon generation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use rand::distributions::uniform::SampleUniform;
use rand::Rng;

use crate::error::{DungeonError, Result};

/// Largest room side length the builder accepts
pub const MAX_ROOM_SIZE: i32 = 1024;

/// Largest gap the collision resolver can be asked to keep between rooms
pub const MAX_ROOM_SPACING: i32 = 1024;

/// Largest scatter radius; larger requests are lowered to it
pub const MAX_SCATTER_RADIUS: u32 = 65_536;

/// Inclusive `[min, max]` range a generation parameter is drawn from
///
/// Construction through [`Bounds::new`] clamps `min` down to `max`, so
/// `min <= max` always holds.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy> Bounds<T> {
    /// Create bounds, lowering `min` to `max` if they are out of order
    pub fn new(min: T, max: T) -> Self {
        let min = if min > max { max } else { min };
        Self { min, max }
    }

    /// Create bounds holding a single value
    pub fn exactly(value: T) -> Self {
        Self {
            min: value,
            max: value,
        }
    }
}

impl<T: SampleUniform + PartialOrd + Copy> Bounds<T> {
    /// Draw a value uniformly from `[min, max]`
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        rng.gen_range(self.min..=self.max)
    }
}

/// Configuration for deterministic dungeon generation
///
/// The same configuration (including the seed) always produces the same
/// dungeon.
///
/// # Example
///
/// ```rust
/// use dungeon_layout::*;
///
/// let config = DungeonConfigBuilder::new()
///     .seed(42)
///     .room_count(20, 30)
///     .build()
///     .unwrap();
///
/// // Config is serializable (with "serde" feature)
/// # #[cfg(feature = "serde")]
/// # {
/// let json = serde_json::to_string(&config).unwrap();
/// let restored: DungeonConfig = serde_json::from_str(&json).unwrap();
/// assert_eq!(config.seed, restored.seed);
/// # }
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DungeonConfig {
    /// Random seed for deterministic generation
    pub seed: u32,

    /// Number of rooms scattered before selection
    ///
    /// Half of them (rounded down) become main rooms.
    pub room_count: Bounds<usize>,

    /// Radius of the disk rooms are scattered in
    pub radius: Bounds<u32>,

    /// Room width in tiles (1..=[`MAX_ROOM_SIZE`])
    pub room_width: Bounds<i32>,

    /// Room height in tiles (1..=[`MAX_ROOM_SIZE`])
    pub room_height: Bounds<i32>,

    /// Minimum gap kept between rooms by the collision resolver
    /// (0..=[`MAX_ROOM_SPACING`])
    pub min_spacing: i32,

    /// Corridor width in tiles (odd, >= 1)
    pub hallway_width: u32,

    /// Fraction of non-tree triangulation edges added back for loops
    ///
    /// - 0.0: pure spanning tree, no loops
    /// - 0.2: default
    /// - 1.0: keep every triangulation edge
    pub extra_edge_fraction: f32,

    /// Upper bound on collision-resolution passes
    ///
    /// Very dense configurations can take a long time to separate. When the
    /// cap is hit generation continues with the rooms as they are and
    /// [`Dungeon::separation_converged`](crate::Dungeon::separation_converged)
    /// reports `false`.
    pub max_separation_passes: usize,
}

impl DungeonConfig {
    /// Half-width of a corridor on each side of its center line
    #[inline]
    pub fn hallway_half_width(&self) -> i32 {
        (self.hallway_width as i32 - 1) / 2
    }

    /// Bring a hand-built configuration back into the ranges the builder
    /// produces
    ///
    /// Inverted ranges are clamped the way [`Bounds::new`] clamps them, the
    /// radius is capped at [`MAX_SCATTER_RADIUS`] and the extra edge fraction
    /// is clamped to `[0, 1]`. Values the builder would refuse outright are
    /// left for [`validate`](Self::validate) to report.
    pub fn normalized(&self) -> Self {
        let radius_max = self.radius.max.min(MAX_SCATTER_RADIUS);
        DungeonConfig {
            room_count: Bounds::new(self.room_count.min, self.room_count.max),
            radius: Bounds::new(self.radius.min.min(radius_max), radius_max),
            room_width: Bounds::new(self.room_width.min, self.room_width.max),
            room_height: Bounds::new(self.room_height.min, self.room_height.max),
            extra_edge_fraction: if self.extra_edge_fraction.is_nan() {
                self.extra_edge_fraction
            } else {
                self.extra_edge_fraction.clamp(0.0, 1.0)
            },
            ..*self
        }
    }

    /// Check a configuration that may not have come from the builder
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for any value the builder would have refused.
    /// Inverted ranges are not an error here; run
    /// [`normalized`](Self::normalized) first to clamp them.
    pub fn validate(&self) -> Result<()> {
        for value in [self.room_width.min, self.room_width.max] {
            check_dimension("width", value)?;
        }
        for value in [self.room_height.min, self.room_height.max] {
            check_dimension("height", value)?;
        }
        check_spacing(self.min_spacing)?;
        check_hallway_width(self.hallway_width)?;
        check_fraction(self.extra_edge_fraction)?;
        check_passes(self.max_separation_passes)?;
        Ok(())
    }
}

impl Default for DungeonConfig {
    fn default() -> Self {
        let builder = DungeonConfigBuilder::new();
        DungeonConfig {
            seed: rand::random(),
            room_count: builder.room_count,
            radius: builder.radius,
            room_width: builder.room_width,
            room_height: builder.room_height,
            min_spacing: builder.min_spacing,
            hallway_width: builder.hallway_width,
            extra_edge_fraction: builder.extra_edge_fraction,
            max_separation_passes: builder.max_separation_passes,
        }
    }
}

/// Builder for creating DungeonConfig with validation
///
/// Out-of-order ranges are clamped silently. Values that would make later
/// stages ill-defined (empty rooms, even corridor widths) are rejected.
///
/// # Example
///
/// ```rust
/// use dungeon_layout::*;
///
/// let config = DungeonConfigBuilder::new()
///     .seed(12345)
///     .room_count(20, 30)
///     .room_width(10, 20)
///     .unwrap()
///     .hallway_width(3)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(config.room_width.min, 10);
/// ```
#[derive(Debug, Clone)]
pub struct DungeonConfigBuilder {
    seed: Option<u32>,
    room_count: Bounds<usize>,
    radius: Bounds<u32>,
    room_width: Bounds<i32>,
    room_height: Bounds<i32>,
    min_spacing: i32,
    hallway_width: u32,
    extra_edge_fraction: f32,
    max_separation_passes: usize,
}

impl DungeonConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: Random
    /// - room_count: 30..=60
    /// - radius: 8..=16
    /// - room_width / room_height: 3..=15
    /// - min_spacing: 1
    /// - hallway_width: 3
    /// - extra_edge_fraction: 0.2
    /// - max_separation_passes: 10_000
    pub fn new() -> Self {
        Self {
            seed: None,
            room_count: Bounds::new(30, 60),
            radius: Bounds::new(8, 16),
            room_width: Bounds::new(3, 15),
            room_height: Bounds::new(3, 15),
            min_spacing: 1,
            hallway_width: 3,
            extra_edge_fraction: 0.2,
            max_separation_passes: 10_000,
        }
    }

    /// Set the random seed
    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set how many rooms are scattered (clamped so that min <= max)
    pub fn room_count(mut self, min: usize, max: usize) -> Self {
        self.room_count = Bounds::new(min, max);
        self
    }

    /// Set the scatter radius range
    ///
    /// Clamped so that min <= max, and capped at [`MAX_SCATTER_RADIUS`].
    pub fn radius(mut self, min: u32, max: u32) -> Self {
        self.radius = Bounds::new(min.min(MAX_SCATTER_RADIUS), max.min(MAX_SCATTER_RADIUS));
        self
    }

    /// Set the room width range
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if either bound is outside 1..=[`MAX_ROOM_SIZE`]
    pub fn room_width(mut self, min: i32, max: i32) -> Result<Self> {
        self.room_width = dimension_bounds("width", min, max)?;
        Ok(self)
    }

    /// Set the room height range
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if either bound is outside 1..=[`MAX_ROOM_SIZE`]
    pub fn room_height(mut self, min: i32, max: i32) -> Result<Self> {
        self.room_height = dimension_bounds("height", min, max)?;
        Ok(self)
    }

    /// Set the minimum gap kept between rooms
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the gap is outside 0..=[`MAX_ROOM_SPACING`]
    pub fn min_spacing(mut self, spacing: i32) -> Result<Self> {
        check_spacing(spacing)?;
        self.min_spacing = spacing;
        Ok(self)
    }

    /// Set the corridor width
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the width is zero or even
    pub fn hallway_width(mut self, width: u32) -> Result<Self> {
        check_hallway_width(width)?;
        self.hallway_width = width;
        Ok(self)
    }

    /// Set the fraction of extra edges added on top of the spanning tree
    ///
    /// Values outside `[0, 1]` are clamped.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the fraction is NaN
    pub fn extra_edge_fraction(mut self, fraction: f32) -> Result<Self> {
        check_fraction(fraction)?;
        self.extra_edge_fraction = fraction.clamp(0.0, 1.0);
        Ok(self)
    }

    /// Set the cap on collision-resolution passes
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if passes == 0
    pub fn max_separation_passes(mut self, passes: usize) -> Result<Self> {
        check_passes(passes)?;
        self.max_separation_passes = passes;
        Ok(self)
    }

    /// Build the configuration
    ///
    /// If no seed was provided, generates a random seed using thread_rng.
    pub fn build(self) -> Result<DungeonConfig> {
        let seed = self.seed.unwrap_or_else(rand::random);

        Ok(DungeonConfig {
            seed,
            room_count: self.room_count,
            radius: self.radius,
            room_width: self.room_width,
            room_height: self.room_height,
            min_spacing: self.min_spacing,
            hallway_width: self.hallway_width,
            extra_edge_fraction: self.extra_edge_fraction,
            max_separation_passes: self.max_separation_passes,
        })
    }
}

impl Default for DungeonConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn dimension_bounds(name: &str, min: i32, max: i32) -> Result<Bounds<i32>> {
    check_dimension(name, min)?;
    check_dimension(name, max)?;
    Ok(Bounds::new(min, max))
}

fn check_dimension(name: &str, value: i32) -> Result<()> {
    if !(1..=MAX_ROOM_SIZE).contains(&value) {
        return Err(DungeonError::InvalidConfig(format!(
            "Room {} must be in 1..={} (got {})",
            name, MAX_ROOM_SIZE, value
        )));
    }
    Ok(())
}

fn check_spacing(spacing: i32) -> Result<()> {
    if !(0..=MAX_ROOM_SPACING).contains(&spacing) {
        return Err(DungeonError::InvalidConfig(format!(
            "Room spacing must be in 0..={} (got {})",
            MAX_ROOM_SPACING, spacing
        )));
    }
    Ok(())
}

fn check_hallway_width(width: u32) -> Result<()> {
    if width == 0 || width % 2 == 0 {
        return Err(DungeonError::InvalidConfig(format!(
            "Hallway width must be odd and >= 1 (got {})",
            width
        )));
    }
    Ok(())
}

fn check_fraction(fraction: f32) -> Result<()> {
    if fraction.is_nan() {
        return Err(DungeonError::InvalidConfig(
            "Extra edge fraction must be a number".to_string(),
        ));
    }
    Ok(())
}

fn check_passes(passes: usize) -> Result<()> {
    if passes == 0 {
        return Err(DungeonError::InvalidConfig(
            "Separation pass cap must be >= 1".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_builder_defaults() {
        let config = DungeonConfigBuilder::new().build().unwrap();
        assert_eq!(config.room_count, Bounds::new(30, 60));
        assert_eq!(config.radius, Bounds::new(8, 16));
        assert_eq!(config.room_width, Bounds::new(3, 15));
        assert_eq!(config.room_height, Bounds::new(3, 15));
        assert_eq!(config.min_spacing, 1);
        assert_eq!(config.hallway_width, 3);
        assert_eq!(config.extra_edge_fraction, 0.2);
        assert_eq!(config.max_separation_passes, 10_000);
    }

    #[test]
    fn test_builder_custom() {
        let config = DungeonConfigBuilder::new()
            .seed(42)
            .room_count(20, 30)
            .radius(4, 6)
            .room_width(10, 20)
            .unwrap()
            .room_height(2, 5)
            .unwrap()
            .min_spacing(0)
            .unwrap()
            .hallway_width(5)
            .unwrap()
            .extra_edge_fraction(0.5)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.seed, 42);
        assert_eq!(config.room_count, Bounds::new(20, 30));
        assert_eq!(config.radius, Bounds::new(4, 6));
        assert_eq!(config.room_width, Bounds::new(10, 20));
        assert_eq!(config.room_height, Bounds::new(2, 5));
        assert_eq!(config.min_spacing, 0);
        assert_eq!(config.hallway_width, 5);
        assert_eq!(config.hallway_half_width(), 2);
        assert_eq!(config.extra_edge_fraction, 0.5);
    }

    #[test]
    fn test_inverted_ranges_are_clamped() {
        let config = DungeonConfigBuilder::new()
            .seed(1)
            .room_count(50, 10)
            .radius(20, 5)
            .room_width(9, 4)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.room_count, Bounds::new(10, 10));
        assert_eq!(config.radius, Bounds::new(5, 5));
        assert_eq!(config.room_width, Bounds::new(4, 4));
    }

    #[test]
    fn test_invalid_room_dimensions() {
        assert!(DungeonConfigBuilder::new().room_width(0, 5).is_err());
        assert!(DungeonConfigBuilder::new().room_width(3, -1).is_err());
        assert!(DungeonConfigBuilder::new().room_height(-2, 4).is_err());
    }

    #[test]
    fn test_oversized_room_dimensions_rejected() {
        assert!(DungeonConfigBuilder::new().room_width(1, i32::MAX).is_err());
        assert!(DungeonConfigBuilder::new()
            .room_height(MAX_ROOM_SIZE + 1, 4)
            .is_err());
        assert!(DungeonConfigBuilder::new()
            .room_width(MAX_ROOM_SIZE, MAX_ROOM_SIZE)
            .is_ok());

        let mut config = DungeonConfigBuilder::new().build().unwrap();
        config.room_width = Bounds::new(1, i32::MAX);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_radius_capped() {
        let config = DungeonConfigBuilder::new()
            .radius(u32::MAX, u32::MAX)
            .build()
            .unwrap();
        assert_eq!(config.radius, Bounds::exactly(MAX_SCATTER_RADIUS));

        let mut hand_built = config;
        hand_built.radius = Bounds { min: 3, max: u32::MAX };
        assert_eq!(
            hand_built.normalized().radius,
            Bounds::new(3, MAX_SCATTER_RADIUS)
        );
    }

    #[test]
    fn test_invalid_spacing() {
        assert!(DungeonConfigBuilder::new().min_spacing(-1).is_err());
        assert!(DungeonConfigBuilder::new()
            .min_spacing(MAX_ROOM_SPACING + 1)
            .is_err());
        assert!(DungeonConfigBuilder::new().min_spacing(0).is_ok());

        let mut config = DungeonConfigBuilder::new().build().unwrap();
        config.min_spacing = -3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_hallway_width() {
        assert!(DungeonConfigBuilder::new().hallway_width(0).is_err());
        assert!(DungeonConfigBuilder::new().hallway_width(2).is_err());
        assert!(DungeonConfigBuilder::new().hallway_width(1).is_ok());

        let err = DungeonConfigBuilder::new().hallway_width(4).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid configuration: Hallway width must be odd and >= 1 (got 4)"
        );
    }

    #[test]
    fn test_extra_edge_fraction_clamped() {
        let config = DungeonConfigBuilder::new()
            .extra_edge_fraction(1.5)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.extra_edge_fraction, 1.0);

        let config = DungeonConfigBuilder::new()
            .extra_edge_fraction(-0.3)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.extra_edge_fraction, 0.0);

        assert!(DungeonConfigBuilder::new()
            .extra_edge_fraction(f32::NAN)
            .is_err());
    }

    #[test]
    fn test_zero_separation_passes_rejected() {
        assert!(DungeonConfigBuilder::new().max_separation_passes(0).is_err());
        assert!(DungeonConfigBuilder::new().max_separation_passes(1).is_ok());
    }

    #[test]
    fn test_bounds_sample_stays_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let bounds = Bounds::new(3, 6);
        for _ in 0..200 {
            let value = bounds.sample(&mut rng);
            assert!((3..=6).contains(&value));
        }
        assert_eq!(Bounds::exactly(4).sample(&mut rng), 4);
    }

    #[test]
    fn test_validate_hand_built_config() {
        let config = DungeonConfigBuilder::new().seed(3).build().unwrap();
        assert!(config.validate().is_ok());

        let mut even = config;
        even.hallway_width = 4;
        assert!(even.validate().is_err());

        let mut empty_room = config;
        empty_room.room_width = Bounds { min: 0, max: 4 };
        assert!(empty_room.validate().is_err());

        let mut unbounded = config;
        unbounded.max_separation_passes = 0;
        assert!(unbounded.validate().is_err());
    }

    #[test]
    fn test_normalized_clamps_inverted_ranges() {
        let mut config = DungeonConfigBuilder::new().seed(3).build().unwrap();
        config.room_height = Bounds { min: 9, max: 2 };
        config.room_count = Bounds { min: 5, max: 1 };
        config.extra_edge_fraction = 3.0;

        let normalized = config.normalized();

        assert_eq!(normalized.room_height, Bounds::new(2, 2));
        assert_eq!(normalized.room_count, Bounds::new(1, 1));
        assert_eq!(normalized.extra_edge_fraction, 1.0);
        assert_eq!(normalized.seed, 3);
        assert!(normalized.validate().is_ok());
        assert_eq!(normalized.normalized(), normalized);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serialization() {
        let config = DungeonConfigBuilder::new().seed(12345).build().unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let restored: DungeonConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, restored);
    }
}
