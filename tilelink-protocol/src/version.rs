//! Protocol versions
//!
//! The protocol drifted across client generations: the batch length and tile
//! indices grew from one byte to two, telemetry and the handshake came and
//! went, and the set of opcodes changed. A [`ProtocolVersion`] pins all of
//! that down for one session.

use tilelink_hal::{Channel, ChannelError};

use crate::opcode::{Opcode, OpcodeSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Width of a numeric field on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "lowercase"))]
pub enum FieldWidth {
    /// One byte
    Byte,
    /// Two bytes, big-endian
    Word,
}

impl FieldWidth {
    /// Number of bytes on the wire
    pub const fn bytes(self) -> usize {
        match self {
            FieldWidth::Byte => 1,
            FieldWidth::Word => 2,
        }
    }

    /// Largest value the field can carry
    pub const fn max_value(self) -> u16 {
        match self {
            FieldWidth::Byte => u8::MAX as u16,
            FieldWidth::Word => u16::MAX,
        }
    }

    /// Read one field of this width
    pub fn read<C: Channel>(self, channel: &mut C) -> Result<u16, ChannelError> {
        match self {
            FieldWidth::Byte => channel.read().map(u16::from),
            FieldWidth::Word => channel.read_word(),
        }
    }
}

/// What the DrawCircle opcode invokes on the render target
///
/// Client generations disagree: some draw a circle, some plot only the
/// centre point. Which one the host expects is not recorded anywhere, so it
/// is selected per version instead of being guessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "lowercase"))]
pub enum CircleWiring {
    /// Draw a circle of the given radius
    #[default]
    Circle,
    /// Plot the centre point and ignore the radius
    Point,
}

/// One protocol version's wire parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProtocolVersion {
    /// Width of the batch length prefix
    pub batch_len: FieldWidth,
    /// Width of LoadTiles' start index and count
    pub tile_index: FieldWidth,
    /// Whether the client reports its input byte every frame
    pub telemetry: bool,
    /// Whether the client sends its system id once at session start
    pub handshake: bool,
    /// Opcodes the client accepts
    pub opcodes: OpcodeSet,
    /// What DrawCircle does
    pub circle: CircleWiring,
}

impl ProtocolVersion {
    /// Names accepted by [`ProtocolVersion::from_name`]
    pub const NAMES: [&'static str; 3] = ["primitives", "tiles", "superset"];

    /// Drawing-primitive client: byte batch length, no telemetry, no handshake
    pub const fn primitives() -> Self {
        Self {
            batch_len: FieldWidth::Byte,
            tile_index: FieldWidth::Word,
            telemetry: false,
            handshake: false,
            opcodes: OpcodeSet::empty()
                .with(Opcode::ClearScreen)
                .with(Opcode::ClearRect)
                .with(Opcode::DrawPoint)
                .with(Opcode::DrawLine)
                .with(Opcode::DrawCircle)
                .with(Opcode::DrawText),
            circle: CircleWiring::Circle,
        }
    }

    /// Tile/sprite client: word widths, telemetry and handshake
    pub const fn tiles() -> Self {
        Self {
            batch_len: FieldWidth::Word,
            tile_index: FieldWidth::Word,
            telemetry: true,
            handshake: true,
            opcodes: OpcodeSet::empty()
                .with(Opcode::DrawText)
                .with(Opcode::LoadTiles)
                .with(Opcode::SetBackgroundTiles)
                .with(Opcode::SetSpriteTile)
                .with(Opcode::MoveSprite),
            circle: CircleWiring::Circle,
        }
    }

    /// Every opcode with the widest fields, telemetry and handshake
    pub const fn superset() -> Self {
        Self {
            opcodes: OpcodeSet::all(),
            ..Self::tiles()
        }
    }

    /// Look up a preset by name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "primitives" => Some(Self::primitives()),
            "tiles" => Some(Self::tiles()),
            "superset" => Some(Self::superset()),
            _ => None,
        }
    }

    /// Check if the version accepts an opcode
    pub const fn supports(&self, opcode: Opcode) -> bool {
        self.opcodes.contains(opcode)
    }

    /// Largest number of commands one batch can announce
    pub const fn max_batch_len(&self) -> u16 {
        self.batch_len.max_value()
    }
}

impl Default for ProtocolVersion {
    fn default() -> Self {
        Self::superset()
    }
}
