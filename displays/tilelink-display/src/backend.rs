//! Render target trait
//!
//! Defines the interface the command dispatcher drives.

use tilelink_protocol::{Shade, TilePattern};

/// Render target errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Coordinates entirely outside the drawable area
    OutOfBounds,
    /// Sprite or pattern index beyond the target's tables
    InvalidIndex,
    /// Payload length disagrees with the declared dimensions
    SizeMismatch,
}

/// How drawn pixels combine with what is already there
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DrawMode {
    /// Replace the pixel
    #[default]
    Solid,
    /// Bitwise OR of the shade bits
    Or,
    /// Bitwise XOR of the shade bits
    Xor,
    /// Bitwise AND of the shade bits
    And,
}

impl DrawMode {
    /// Combine a drawn shade with the existing one
    pub fn apply(self, existing: Shade, drawn: Shade) -> Shade {
        match self {
            DrawMode::Solid => drawn,
            DrawMode::Or => Shade::from_bits(existing.bits() | drawn.bits()),
            DrawMode::Xor => Shade::from_bits(existing.bits() ^ drawn.bits()),
            DrawMode::And => Shade::from_bits(existing.bits() & drawn.bits()),
        }
    }
}

/// Colour and mode for primitive drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DrawStyle {
    /// Outline and point colour
    pub fore: Shade,
    /// Interior colour of filled shapes
    pub back: Shade,
    /// Pixel combination mode
    pub mode: DrawMode,
}

impl DrawStyle {
    /// Black on white, used for points, lines and circles
    pub const INK: Self = Self {
        fore: Shade::Black,
        back: Shade::White,
        mode: DrawMode::Solid,
    };

    /// White on white, used to clear
    pub const ERASE: Self = Self {
        fore: Shade::White,
        back: Shade::White,
        mode: DrawMode::Solid,
    };
}

impl Default for DrawStyle {
    fn default() -> Self {
        Self::INK
    }
}

/// Whether a shape's interior is painted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fill {
    /// Outline only
    Outline,
    /// Outline in the fore colour, interior in the back colour
    Filled,
}

/// Render target trait
///
/// Provides every operation the command stream can request. Text and tile
/// coordinates are in cells; primitive coordinates are in pixels.
pub trait RenderTarget {
    /// Store a pattern in background pattern memory
    fn set_background_pattern(&mut self, index: u16, pattern: &TilePattern) -> Result<(), DisplayError>;

    /// Store a pattern in sprite pattern memory
    fn set_sprite_pattern(&mut self, index: u16, pattern: &TilePattern) -> Result<(), DisplayError>;

    /// Bind a sprite to a sprite pattern
    fn set_sprite_binding(&mut self, sprite: u8, pattern: u8) -> Result<(), DisplayError>;

    /// Move a sprite to an absolute pixel position
    fn move_sprite(&mut self, sprite: u8, x: u8, y: u8) -> Result<(), DisplayError>;

    /// Overwrite a `width × height` rectangle of the background grid
    ///
    /// `indices` holds the tile indices row by row.
    fn blit_background(
        &mut self,
        x: u8,
        y: u8,
        width: u8,
        height: u8,
        indices: &[u8],
    ) -> Result<(), DisplayError>;

    /// Print text starting at a cell
    fn draw_text(&mut self, cell_x: u8, cell_y: u8, text: &[u8]) -> Result<(), DisplayError>;

    /// Select the style for subsequent primitives
    fn set_draw_style(&mut self, style: DrawStyle) -> Result<(), DisplayError>;

    /// Plot one pixel
    fn draw_point(&mut self, x: u8, y: u8) -> Result<(), DisplayError>;

    /// Draw a line between two pixels, both inclusive
    fn draw_line(&mut self, x1: u8, y1: u8, x2: u8, y2: u8) -> Result<(), DisplayError>;

    /// Draw a circle outline
    fn draw_circle(&mut self, x: u8, y: u8, radius: u8) -> Result<(), DisplayError>;

    /// Draw a rectangle with its top-left corner at (`x`, `y`)
    fn draw_rect(&mut self, x: u8, y: u8, width: u8, height: u8, fill: Fill) -> Result<(), DisplayError>;

    /// Get pixel dimensions as (width, height)
    fn pixel_dimensions(&self) -> (u8, u8);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_modes() {
        assert_eq!(DrawMode::Solid.apply(Shade::Black, Shade::Light), Shade::Light);
        assert_eq!(DrawMode::Or.apply(Shade::Light, Shade::Dark), Shade::Black);
        assert_eq!(DrawMode::Xor.apply(Shade::Black, Shade::Light), Shade::Dark);
        assert_eq!(DrawMode::And.apply(Shade::Black, Shade::Light), Shade::Light);
    }

    #[test]
    fn test_default_style_is_ink() {
        assert_eq!(DrawStyle::default(), DrawStyle::INK);
        assert_ne!(DrawStyle::INK, DrawStyle::ERASE);
    }
}
