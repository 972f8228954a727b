//! Decoded commands
//!
//! A [`Command`] is the typed form of one opcode and its arguments.
//! Variable-length arguments borrow from the decoder's bounded buffers, so a
//! command must be applied before the next one is decoded.

use crate::opcode::{Opcode, MAX_FIELDS};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Background grid width in tile cells
pub const GRID_COLS: usize = 20;

/// Background grid height in tile cells
pub const GRID_ROWS: usize = 18;

/// Maximum text length for DrawText
pub const TEXT_CAPACITY: usize = 100;

/// Maximum number of tile indices in one SetBackgroundTiles
pub const GRID_CAPACITY: usize = GRID_COLS * GRID_ROWS;

/// Pixels per tile cell side
pub const CELL_SIZE: u8 = 8;

/// Pattern store targeted by LoadTiles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "lowercase"))]
pub enum PatternStore {
    /// Sprite pattern memory
    Sprite,
    /// Background pattern memory
    Background,
}

impl PatternStore {
    /// Selector byte; only 1 selects the background store
    pub const fn from_byte(byte: u8) -> Self {
        if byte == 1 {
            PatternStore::Background
        } else {
            PatternStore::Sprite
        }
    }

    /// Wire byte
    pub const fn to_byte(self) -> u8 {
        match self {
            PatternStore::Sprite => 0,
            PatternStore::Background => 1,
        }
    }
}

/// One decoded command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command<'a> {
    ClearScreen,
    ClearRect {
        x: u8,
        y: u8,
        width: u8,
        height: u8,
    },
    DrawPoint {
        x: u8,
        y: u8,
    },
    DrawLine {
        x1: u8,
        y1: u8,
        x2: u8,
        y2: u8,
    },
    DrawCircle {
        x: u8,
        y: u8,
        radius: u8,
    },
    /// Text at a pixel position; rendered at the containing tile cell
    DrawText {
        x: u8,
        y: u8,
        text: &'a [u8],
    },
    /// Header of a tile load; `count` pattern blocks follow on the wire
    LoadTiles {
        store: PatternStore,
        start: u16,
        count: u16,
    },
    SetBackgroundTiles {
        x: u8,
        y: u8,
        width: u8,
        height: u8,
        indices: &'a [u8],
    },
    SetSpriteTile {
        sprite: u8,
        pattern: u8,
    },
    MoveSprite {
        sprite: u8,
        x: u8,
        y: u8,
    },
}

impl<'a> Command<'a> {
    /// Build a command from its scalar field values and buffer payloads
    ///
    /// `fields` is indexed by schema position. Byte fields are truncated to
    /// their low byte; the decoder never produces larger values for them.
    pub fn from_fields(
        opcode: Opcode,
        fields: &[u16; MAX_FIELDS],
        text: &'a [u8],
        indices: &'a [u8],
    ) -> Self {
        let byte = |i: usize| fields[i] as u8;
        match opcode {
            Opcode::ClearScreen => Command::ClearScreen,
            Opcode::ClearRect => Command::ClearRect {
                x: byte(0),
                y: byte(1),
                width: byte(2),
                height: byte(3),
            },
            Opcode::DrawPoint => Command::DrawPoint {
                x: byte(0),
                y: byte(1),
            },
            Opcode::DrawLine => Command::DrawLine {
                x1: byte(0),
                y1: byte(1),
                x2: byte(2),
                y2: byte(3),
            },
            Opcode::DrawCircle => Command::DrawCircle {
                x: byte(0),
                y: byte(1),
                radius: byte(2),
            },
            Opcode::DrawText => Command::DrawText {
                x: byte(0),
                y: byte(1),
                text,
            },
            Opcode::LoadTiles => Command::LoadTiles {
                store: PatternStore::from_byte(byte(0)),
                start: fields[1],
                count: fields[2],
            },
            Opcode::SetBackgroundTiles => Command::SetBackgroundTiles {
                x: byte(0),
                y: byte(1),
                width: byte(2),
                height: byte(3),
                indices,
            },
            Opcode::SetSpriteTile => Command::SetSpriteTile {
                sprite: byte(0),
                pattern: byte(1),
            },
            Opcode::MoveSprite => Command::MoveSprite {
                sprite: byte(0),
                x: byte(1),
                y: byte(2),
            },
        }
    }

    /// Scalar field values by schema position, the inverse of [`Command::from_fields`]
    ///
    /// Length fields are derived from the payload; a payload longer than 255
    /// bytes yields a value the byte field cannot carry.
    pub fn fields(&self) -> [u16; MAX_FIELDS] {
        let mut fields = [0u16; MAX_FIELDS];
        let mut put = |values: &[u16]| fields[..values.len()].copy_from_slice(values);
        match *self {
            Command::ClearScreen => {}
            Command::ClearRect {
                x,
                y,
                width,
                height,
            } => put(&[u16::from(x), u16::from(y), u16::from(width), u16::from(height)]),
            Command::DrawPoint { x, y } => put(&[u16::from(x), u16::from(y)]),
            Command::DrawLine { x1, y1, x2, y2 } => {
                put(&[u16::from(x1), u16::from(y1), u16::from(x2), u16::from(y2)])
            }
            Command::DrawCircle { x, y, radius } => put(&[u16::from(x), u16::from(y), u16::from(radius)]),
            Command::DrawText { x, y, text } => put(&[u16::from(x), u16::from(y), text.len() as u16]),
            Command::LoadTiles {
                store,
                start,
                count,
            } => put(&[u16::from(store.to_byte()), start, count]),
            Command::SetBackgroundTiles {
                x,
                y,
                width,
                height,
                ..
            } => put(&[u16::from(x), u16::from(y), u16::from(width), u16::from(height)]),
            Command::SetSpriteTile { sprite, pattern } => put(&[u16::from(sprite), u16::from(pattern)]),
            Command::MoveSprite { sprite, x, y } => put(&[u16::from(sprite), u16::from(x), u16::from(y)]),
        }
        fields
    }

    /// Variable-length payload carried inline, if any
    pub fn payload(&self) -> &'a [u8] {
        match *self {
            Command::DrawText { text, .. } => text,
            Command::SetBackgroundTiles { indices, .. } => indices,
            _ => &[],
        }
    }

    /// Opcode of this command
    pub fn opcode(&self) -> Opcode {
        match self {
            Command::ClearScreen => Opcode::ClearScreen,
            Command::ClearRect { .. } => Opcode::ClearRect,
            Command::DrawPoint { .. } => Opcode::DrawPoint,
            Command::DrawLine { .. } => Opcode::DrawLine,
            Command::DrawCircle { .. } => Opcode::DrawCircle,
            Command::DrawText { .. } => Opcode::DrawText,
            Command::LoadTiles { .. } => Opcode::LoadTiles,
            Command::SetBackgroundTiles { .. } => Opcode::SetBackgroundTiles,
            Command::SetSpriteTile { .. } => Opcode::SetSpriteTile,
            Command::MoveSprite { .. } => Opcode::MoveSprite,
        }
    }
}

/// Tile cell containing a pixel coordinate
pub const fn pixel_to_cell(pixel: u8) -> u8 {
    pixel / CELL_SIZE
}
