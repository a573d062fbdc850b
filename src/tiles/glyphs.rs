//! Character mapping for text rendering of tile grids

use super::Tile;

/// Trait for mapping tiles to display characters
pub trait GlyphMapper {
    /// Map a tile to a single character
    fn map_glyph(&self, tile: &Tile) -> char;
}

/// Default glyphs: `#` for rooms, `.` for corridors, blank for rock
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicGlyphMapper;

impl GlyphMapper for BasicGlyphMapper {
    fn map_glyph(&self, tile: &Tile) -> char {
        match tile {
            Tile::Empty => ' ',
            Tile::Room(_) => '#',
            Tile::Hallway(_) => '.',
        }
    }
}

/// Glyph mapper with a configurable character per tile kind
#[derive(Debug, Clone)]
pub struct CustomGlyphMapper {
    pub wall: char,
    pub room: char,
    pub hallway: char,
}

impl Default for CustomGlyphMapper {
    fn default() -> Self {
        Self {
            wall: ' ',
            room: '#',
            hallway: '.',
        }
    }
}

impl GlyphMapper for CustomGlyphMapper {
    fn map_glyph(&self, tile: &Tile) -> char {
        match tile {
            Tile::Empty => self.wall,
            Tile::Room(_) => self.room,
            Tile::Hallway(_) => self.hallway,
        }
    }
}
