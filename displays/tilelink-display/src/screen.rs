//! In-memory tile screen
//!
//! A complete render target held in plain arrays: a background grid of tile
//! indices, a text layer on the same grid, a sprite table, background and
//! sprite pattern stores, and a pixel bitmap for primitives.

use tilelink_protocol::command::CELL_SIZE;
use tilelink_protocol::pattern::TILE_SIZE;
use tilelink_protocol::{Shade, TilePattern, GRID_CAPACITY, GRID_COLS, GRID_ROWS};

use crate::backend::{DisplayError, DrawStyle, Fill, RenderTarget};

/// Screen width in pixels
pub const SCREEN_WIDTH: usize = GRID_COLS * CELL_SIZE as usize;

/// Screen height in pixels
pub const SCREEN_HEIGHT: usize = GRID_ROWS * CELL_SIZE as usize;

/// Entries in the sprite table
pub const SPRITE_COUNT: usize = 40;

/// Patterns per pattern store
pub const PATTERN_COUNT: usize = 256;

/// One sprite table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sprite {
    /// Sprite pattern index
    pub pattern: u8,
    /// Horizontal position in pixels
    pub x: u8,
    /// Vertical position in pixels
    pub y: u8,
}

/// In-memory render target
#[derive(Clone)]
pub struct TileScreen {
    background: [u8; GRID_CAPACITY],
    text: [u8; GRID_CAPACITY],
    sprites: [Sprite; SPRITE_COUNT],
    background_patterns: [TilePattern; PATTERN_COUNT],
    sprite_patterns: [TilePattern; PATTERN_COUNT],
    bitmap: [Shade; SCREEN_WIDTH * SCREEN_HEIGHT],
    style: DrawStyle,
    dirty: bool,
}

impl Default for TileScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl TileScreen {
    /// Create a blank screen
    pub fn new() -> Self {
        Self {
            background: [0; GRID_CAPACITY],
            text: [0; GRID_CAPACITY],
            sprites: [Sprite::default(); SPRITE_COUNT],
            background_patterns: [TilePattern::default(); PATTERN_COUNT],
            sprite_patterns: [TilePattern::default(); PATTERN_COUNT],
            bitmap: [Shade::White; SCREEN_WIDTH * SCREEN_HEIGHT],
            style: DrawStyle::default(),
            dirty: true,
        }
    }

    /// Tile index at a background cell
    pub fn background_tile(&self, cell_x: usize, cell_y: usize) -> Option<u8> {
        cell_index(cell_x, cell_y).map(|i| self.background[i])
    }

    /// Text bytes of one row; unwritten cells are 0
    pub fn text_row(&self, row: usize) -> Option<&[u8]> {
        (row < GRID_ROWS).then(|| &self.text[row * GRID_COLS..(row + 1) * GRID_COLS])
    }

    /// Sprite table entry
    pub fn sprite(&self, index: usize) -> Option<&Sprite> {
        self.sprites.get(index)
    }

    /// Background pattern store entry
    pub fn background_pattern(&self, index: usize) -> Option<&TilePattern> {
        self.background_patterns.get(index)
    }

    /// Sprite pattern store entry
    pub fn sprite_pattern(&self, index: usize) -> Option<&TilePattern> {
        self.sprite_patterns.get(index)
    }

    /// Bitmap pixel drawn by primitives
    pub fn pixel(&self, x: usize, y: usize) -> Option<Shade> {
        (x < SCREEN_WIDTH && y < SCREEN_HEIGHT).then(|| self.bitmap[y * SCREEN_WIDTH + x])
    }

    /// Background pixel resolved through the grid and the pattern store
    pub fn background_pixel(&self, x: usize, y: usize) -> Option<Shade> {
        let tile = self.background_tile(x / TILE_SIZE, y / TILE_SIZE)?;
        Some(self.background_patterns[tile as usize].shade(x % TILE_SIZE, y % TILE_SIZE))
    }

    /// Current primitive style
    pub fn style(&self) -> DrawStyle {
        self.style
    }

    /// Check if anything changed since the last present
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark screen as clean (after presenting)
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn plot(&mut self, x: i16, y: i16, shade: Shade) {
        if x < 0 || y < 0 || x as usize >= SCREEN_WIDTH || y as usize >= SCREEN_HEIGHT {
            return;
        }
        let pixel = &mut self.bitmap[y as usize * SCREEN_WIDTH + x as usize];
        *pixel = self.style.mode.apply(*pixel, shade);
    }

    fn hline(&mut self, x1: i16, x2: i16, y: i16, shade: Shade) {
        for x in x1..=x2 {
            self.plot(x, y, shade);
        }
    }

    fn set_pattern(
        store: &mut [TilePattern; PATTERN_COUNT],
        index: u16,
        pattern: &TilePattern,
    ) -> Result<(), DisplayError> {
        let slot = store
            .get_mut(index as usize)
            .ok_or(DisplayError::InvalidIndex)?;
        *slot = *pattern;
        Ok(())
    }
}

fn cell_index(cell_x: usize, cell_y: usize) -> Option<usize> {
    (cell_x < GRID_COLS && cell_y < GRID_ROWS).then(|| cell_y * GRID_COLS + cell_x)
}

impl RenderTarget for TileScreen {
    fn set_background_pattern(&mut self, index: u16, pattern: &TilePattern) -> Result<(), DisplayError> {
        Self::set_pattern(&mut self.background_patterns, index, pattern)?;
        self.dirty = true;
        Ok(())
    }

    fn set_sprite_pattern(&mut self, index: u16, pattern: &TilePattern) -> Result<(), DisplayError> {
        Self::set_pattern(&mut self.sprite_patterns, index, pattern)?;
        self.dirty = true;
        Ok(())
    }

    fn set_sprite_binding(&mut self, sprite: u8, pattern: u8) -> Result<(), DisplayError> {
        let entry = self
            .sprites
            .get_mut(sprite as usize)
            .ok_or(DisplayError::InvalidIndex)?;
        entry.pattern = pattern;
        self.dirty = true;
        Ok(())
    }

    fn move_sprite(&mut self, sprite: u8, x: u8, y: u8) -> Result<(), DisplayError> {
        let entry = self
            .sprites
            .get_mut(sprite as usize)
            .ok_or(DisplayError::InvalidIndex)?;
        entry.x = x;
        entry.y = y;
        self.dirty = true;
        Ok(())
    }

    /// Cells outside the grid are clipped
    fn blit_background(
        &mut self,
        x: u8,
        y: u8,
        width: u8,
        height: u8,
        indices: &[u8],
    ) -> Result<(), DisplayError> {
        let (width, height) = (width as usize, height as usize);
        if indices.len() != width * height {
            return Err(DisplayError::SizeMismatch);
        }
        if width > 0 && height > 0 && cell_index(x as usize, y as usize).is_none() {
            return Err(DisplayError::OutOfBounds);
        }

        for (row, line) in indices.chunks(width.max(1)).enumerate() {
            for (col, &tile) in line.iter().enumerate() {
                if let Some(i) = cell_index(x as usize + col, y as usize + row) {
                    self.background[i] = tile;
                }
            }
        }
        self.dirty = true;
        Ok(())
    }

    /// Text running past the end of the row is clipped
    fn draw_text(&mut self, cell_x: u8, cell_y: u8, text: &[u8]) -> Result<(), DisplayError> {
        let start = cell_index(cell_x as usize, cell_y as usize).ok_or(DisplayError::OutOfBounds)?;
        let room = GRID_COLS - cell_x as usize;
        let len = text.len().min(room);
        self.text[start..start + len].copy_from_slice(&text[..len]);
        self.dirty = true;
        Ok(())
    }

    fn set_draw_style(&mut self, style: DrawStyle) -> Result<(), DisplayError> {
        self.style = style;
        Ok(())
    }

    fn draw_point(&mut self, x: u8, y: u8) -> Result<(), DisplayError> {
        self.plot(x.into(), y.into(), self.style.fore);
        self.dirty = true;
        Ok(())
    }

    /// Bresenham line
    fn draw_line(&mut self, x1: u8, y1: u8, x2: u8, y2: u8) -> Result<(), DisplayError> {
        let (mut x, mut y) = (i16::from(x1), i16::from(y1));
        let (x2, y2) = (i16::from(x2), i16::from(y2));
        let dx = (x2 - x).abs();
        let dy = -(y2 - y).abs();
        let sx = if x < x2 { 1 } else { -1 };
        let sy = if y < y2 { 1 } else { -1 };
        let mut err = dx + dy;
        let fore = self.style.fore;

        loop {
            self.plot(x, y, fore);
            if x == x2 && y == y2 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
        self.dirty = true;
        Ok(())
    }

    /// Midpoint circle; overlapping octant pixels are plotted once
    fn draw_circle(&mut self, x: u8, y: u8, radius: u8) -> Result<(), DisplayError> {
        let (cx, cy) = (i16::from(x), i16::from(y));
        let fore = self.style.fore;
        let mut dx = i16::from(radius);
        let mut dy = 0i16;
        let mut err = 1 - dx;

        while dx >= dy {
            let mut points: heapless::Vec<(i16, i16), 8> = heapless::Vec::new();
            for (px, py) in [
                (dx, dy),
                (dy, dx),
                (-dy, dx),
                (-dx, dy),
                (-dx, -dy),
                (-dy, -dx),
                (dy, -dx),
                (dx, -dy),
            ] {
                if !points.contains(&(px, py)) {
                    let _ = points.push((px, py));
                    self.plot(cx + px, cy + py, fore);
                }
            }

            dy += 1;
            if err < 0 {
                err += 2 * dy + 1;
            } else {
                dx -= 1;
                err += 2 * (dy - dx) + 1;
            }
        }
        self.dirty = true;
        Ok(())
    }

    fn draw_rect(&mut self, x: u8, y: u8, width: u8, height: u8, fill: Fill) -> Result<(), DisplayError> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        let (x1, y1) = (i16::from(x), i16::from(y));
        let (x2, y2) = (x1 + i16::from(width) - 1, y1 + i16::from(height) - 1);
        let DrawStyle { fore, back, .. } = self.style;

        if fill == Fill::Filled {
            for row in y1 + 1..y2 {
                self.hline(x1 + 1, x2 - 1, row, back);
            }
        }
        self.hline(x1, x2, y1, fore);
        if y2 != y1 {
            self.hline(x1, x2, y2, fore);
        }
        for row in y1 + 1..y2 {
            self.plot(x1, row, fore);
            if x2 != x1 {
                self.plot(x2, row, fore);
            }
        }
        self.dirty = true;
        Ok(())
    }

    fn pixel_dimensions(&self) -> (u8, u8) {
        (SCREEN_WIDTH as u8, SCREEN_HEIGHT as u8)
    }
}
