//! Render target that records every call, for tests

use std::vec::Vec;

use tilelink_display::{DisplayError, DrawStyle, Fill, RenderTarget};
use tilelink_protocol::TilePattern;

/// One recorded collaborator call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    BackgroundPattern(u16, TilePattern),
    SpritePattern(u16, TilePattern),
    Bind(u8, u8),
    Move(u8, u8, u8),
    Blit(u8, u8, u8, u8, Vec<u8>),
    Text(u8, u8, Vec<u8>),
    Style(DrawStyle),
    Point(u8, u8),
    Line(u8, u8, u8, u8),
    Circle(u8, u8, u8),
    Rect(u8, u8, u8, u8, Fill),
}

/// Render target that records calls and can be told to reject sprite moves
/// or pattern stores
#[derive(Debug, Default)]
pub struct RecordingTarget {
    pub calls: Vec<Call>,
    pub reject_moves: bool,
    pub reject_patterns: bool,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderTarget for RecordingTarget {
    fn set_background_pattern(&mut self, index: u16, pattern: &TilePattern) -> Result<(), DisplayError> {
        if self.reject_patterns {
            return Err(DisplayError::InvalidIndex);
        }
        self.calls.push(Call::BackgroundPattern(index, *pattern));
        Ok(())
    }

    fn set_sprite_pattern(&mut self, index: u16, pattern: &TilePattern) -> Result<(), DisplayError> {
        if self.reject_patterns {
            return Err(DisplayError::InvalidIndex);
        }
        self.calls.push(Call::SpritePattern(index, *pattern));
        Ok(())
    }

    fn set_sprite_binding(&mut self, sprite: u8, pattern: u8) -> Result<(), DisplayError> {
        self.calls.push(Call::Bind(sprite, pattern));
        Ok(())
    }

    fn move_sprite(&mut self, sprite: u8, x: u8, y: u8) -> Result<(), DisplayError> {
        if self.reject_moves {
            return Err(DisplayError::InvalidIndex);
        }
        self.calls.push(Call::Move(sprite, x, y));
        Ok(())
    }

    fn blit_background(
        &mut self,
        x: u8,
        y: u8,
        width: u8,
        height: u8,
        indices: &[u8],
    ) -> Result<(), DisplayError> {
        self.calls
            .push(Call::Blit(x, y, width, height, indices.to_vec()));
        Ok(())
    }

    fn draw_text(&mut self, cell_x: u8, cell_y: u8, text: &[u8]) -> Result<(), DisplayError> {
        self.calls.push(Call::Text(cell_x, cell_y, text.to_vec()));
        Ok(())
    }

    fn set_draw_style(&mut self, style: DrawStyle) -> Result<(), DisplayError> {
        self.calls.push(Call::Style(style));
        Ok(())
    }

    fn draw_point(&mut self, x: u8, y: u8) -> Result<(), DisplayError> {
        self.calls.push(Call::Point(x, y));
        Ok(())
    }

    fn draw_line(&mut self, x1: u8, y1: u8, x2: u8, y2: u8) -> Result<(), DisplayError> {
        self.calls.push(Call::Line(x1, y1, x2, y2));
        Ok(())
    }

    fn draw_circle(&mut self, x: u8, y: u8, radius: u8) -> Result<(), DisplayError> {
        self.calls.push(Call::Circle(x, y, radius));
        Ok(())
    }

    fn draw_rect(&mut self, x: u8, y: u8, width: u8, height: u8, fill: Fill) -> Result<(), DisplayError> {
        self.calls.push(Call::Rect(x, y, width, height, fill));
        Ok(())
    }

    fn pixel_dimensions(&self) -> (u8, u8) {
        (160, 144)
    }
}
