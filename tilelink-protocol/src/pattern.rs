//! Tile pattern blocks
//!
//! A pattern is an 8×8 tile at two bits per pixel, stored as two bit-planes
//! per row: byte `2r` holds the high bit of row `r`, byte `2r + 1` the low
//! bit, and bit `7 - x` of each byte belongs to column `x`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Bytes in one pattern block
pub const PATTERN_SIZE: usize = 16;

/// Pixels per pattern side
pub const TILE_SIZE: usize = 8;

/// One of the four display shades, lightest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Shade {
    #[default]
    White = 0,
    Light = 1,
    Dark = 2,
    Black = 3,
}

impl Shade {
    /// Shade from a two-bit value; higher bits are ignored
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => Shade::White,
            1 => Shade::Light,
            2 => Shade::Dark,
            _ => Shade::Black,
        }
    }

    /// Two-bit value
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Shade for a relative luminance in `0.0..=1.0`
    ///
    /// Brighter input gives a lighter shade; out-of-range input is clamped.
    pub fn from_luminance(luminance: f32) -> Self {
        let level = (1.0 - luminance) * 4.0;
        let level = if level < 0.0 {
            0
        } else if level >= 3.0 {
            3
        } else {
            level as u8
        };
        Self::from_bits(level)
    }
}

/// One 8×8 tile pattern in wire encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TilePattern(pub [u8; PATTERN_SIZE]);

impl TilePattern {
    /// Wrap a raw block
    pub const fn new(block: [u8; PATTERN_SIZE]) -> Self {
        Self(block)
    }

    /// Pattern with every pixel set to `shade`
    pub fn filled(shade: Shade) -> Self {
        Self::from_shades(&[shade; TILE_SIZE * TILE_SIZE])
    }

    /// Encode 64 shades given row by row
    pub fn from_shades(shades: &[Shade; TILE_SIZE * TILE_SIZE]) -> Self {
        let mut block = [0u8; PATTERN_SIZE];
        for (pixel, shade) in shades.iter().enumerate() {
            let (x, y) = (pixel % TILE_SIZE, pixel / TILE_SIZE);
            let bits = shade.bits();
            block[y * 2] |= ((bits & 0b10) >> 1) << (7 - x);
            block[y * 2 + 1] |= (bits & 0b01) << (7 - x);
        }
        Self(block)
    }

    /// Shade of pixel (`x`, `y`); both must be below 8
    pub fn shade(&self, x: usize, y: usize) -> Shade {
        let high = (self.0[y * 2] >> (7 - x)) & 1;
        let low = (self.0[y * 2 + 1] >> (7 - x)) & 1;
        Shade::from_bits(high << 1 | low)
    }

    /// Raw block bytes
    pub fn as_bytes(&self) -> &[u8; PATTERN_SIZE] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_shades_bit_planes() {
        let mut shades = [Shade::White; 64];
        shades[0] = Shade::Black; // (0, 0)
        shades[7] = Shade::Dark; // (7, 0)
        shades[8 + 1] = Shade::Light; // (1, 1)

        let pattern = TilePattern::from_shades(&shades);
        assert_eq!(pattern.0[0], 0b1000_0001);
        assert_eq!(pattern.0[1], 0b1000_0000);
        assert_eq!(pattern.0[2], 0b0000_0000);
        assert_eq!(pattern.0[3], 0b0100_0000);
    }

    #[test]
    fn test_shade_lookup_matches_encoding() {
        let mut shades = [Shade::White; 64];
        for (i, shade) in shades.iter_mut().enumerate() {
            *shade = Shade::from_bits((i % 4) as u8);
        }
        let pattern = TilePattern::from_shades(&shades);

        for y in 0..TILE_SIZE {
            for x in 0..TILE_SIZE {
                assert_eq!(pattern.shade(x, y), shades[y * TILE_SIZE + x]);
            }
        }
    }

    #[test]
    fn test_filled_black_is_all_ones() {
        assert_eq!(TilePattern::filled(Shade::Black).0, [0xFF; PATTERN_SIZE]);
        assert_eq!(TilePattern::filled(Shade::White).0, [0x00; PATTERN_SIZE]);
    }

    #[test]
    fn test_luminance_mapping() {
        assert_eq!(Shade::from_luminance(1.0), Shade::White);
        assert_eq!(Shade::from_luminance(0.7), Shade::Light);
        assert_eq!(Shade::from_luminance(0.4), Shade::Dark);
        assert_eq!(Shade::from_luminance(0.0), Shade::Black);
        // Out of range is clamped rather than wrapping
        assert_eq!(Shade::from_luminance(-0.5), Shade::Black);
        assert_eq!(Shade::from_luminance(1.5), Shade::White);
    }
}
