//! Opcodes and their argument schemas
//!
//! Every command starts with one opcode byte. The opcode fixes the ordered
//! list of argument fields that follow; variable-length fields take their
//! length from earlier fields of the same command.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of opcodes in the table
pub const OPCODE_COUNT: usize = 10;

/// Maximum number of fields in any schema
pub const MAX_FIELDS: usize = 5;

/// Command opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Opcode {
    /// Clear the whole screen
    ClearScreen = 0,
    /// Clear a pixel rectangle
    ClearRect = 1,
    /// Draw a single pixel
    DrawPoint = 2,
    /// Draw a line between two pixels
    DrawLine = 3,
    /// Draw a circle outline
    DrawCircle = 4,
    /// Print text at a pixel position, snapped to the tile grid
    DrawText = 5,
    /// Stream tile patterns into a pattern store
    LoadTiles = 6,
    /// Overwrite a rectangle of the background tile grid
    SetBackgroundTiles = 7,
    /// Bind a sprite to a pattern
    SetSpriteTile = 8,
    /// Move a sprite to an absolute position
    MoveSprite = 9,
}

/// Kind of one argument field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FieldKind {
    /// One byte
    Byte,
    /// Tile pattern index or count; a byte or a word depending on version
    Index,
    /// Bytes whose count is the value of the field at position `len`
    Buffer { len: usize },
    /// `width × height` bytes taken from the fields at those positions
    Grid { width: usize, height: usize },
    /// `count` pattern blocks starting at index `start`, streamed one at a time
    Patterns { start: usize, count: usize },
}

impl FieldKind {
    /// Whether this field carries a single numeric value
    pub fn is_scalar(&self) -> bool {
        matches!(self, FieldKind::Byte | FieldKind::Index)
    }
}

use FieldKind::{Buffer, Byte, Grid, Index, Patterns};

const SCHEMA_NONE: &[FieldKind] = &[];
const SCHEMA_XY: &[FieldKind] = &[Byte, Byte];
const SCHEMA_XYR: &[FieldKind] = &[Byte, Byte, Byte];
const SCHEMA_XYWH: &[FieldKind] = &[Byte, Byte, Byte, Byte];
const SCHEMA_TEXT: &[FieldKind] = &[Byte, Byte, Byte, Buffer { len: 2 }];
const SCHEMA_LOAD_TILES: &[FieldKind] = &[Byte, Index, Index, Patterns { start: 1, count: 2 }];
const SCHEMA_BACKGROUND: &[FieldKind] = &[
    Byte,
    Byte,
    Byte,
    Byte,
    Grid {
        width: 2,
        height: 3,
    },
];

impl Opcode {
    /// All opcodes in wire order
    pub const ALL: [Opcode; OPCODE_COUNT] = [
        Opcode::ClearScreen,
        Opcode::ClearRect,
        Opcode::DrawPoint,
        Opcode::DrawLine,
        Opcode::DrawCircle,
        Opcode::DrawText,
        Opcode::LoadTiles,
        Opcode::SetBackgroundTiles,
        Opcode::SetSpriteTile,
        Opcode::MoveSprite,
    ];

    /// Parse an opcode from its wire byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        Self::ALL.get(byte as usize).copied()
    }

    /// Wire byte
    pub const fn to_byte(self) -> u8 {
        self as u8
    }

    /// Argument schema, in wire order
    pub const fn schema(self) -> &'static [FieldKind] {
        match self {
            Opcode::ClearScreen => SCHEMA_NONE,
            Opcode::ClearRect => SCHEMA_XYWH,
            Opcode::DrawPoint => SCHEMA_XY,
            Opcode::DrawLine => SCHEMA_XYWH,
            Opcode::DrawCircle => SCHEMA_XYR,
            Opcode::DrawText => SCHEMA_TEXT,
            Opcode::LoadTiles => SCHEMA_LOAD_TILES,
            Opcode::SetBackgroundTiles => SCHEMA_BACKGROUND,
            Opcode::SetSpriteTile => SCHEMA_XY,
            Opcode::MoveSprite => SCHEMA_XYR,
        }
    }

    /// Look up an opcode by its name, case-insensitive
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(name))
    }

    /// Human-readable name
    pub const fn name(self) -> &'static str {
        match self {
            Opcode::ClearScreen => "ClearScreen",
            Opcode::ClearRect => "ClearRect",
            Opcode::DrawPoint => "DrawPoint",
            Opcode::DrawLine => "DrawLine",
            Opcode::DrawCircle => "DrawCircle",
            Opcode::DrawText => "DrawText",
            Opcode::LoadTiles => "LoadTiles",
            Opcode::SetBackgroundTiles => "SetBackgroundTiles",
            Opcode::SetSpriteTile => "SetSpriteTile",
            Opcode::MoveSprite => "MoveSprite",
        }
    }
}

/// Set of opcodes enabled by a protocol version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct OpcodeSet(u16);

impl OpcodeSet {
    /// No opcodes
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Every opcode in the table
    pub const fn all() -> Self {
        Self((1 << OPCODE_COUNT) - 1)
    }

    /// This set with `opcode` added
    pub const fn with(self, opcode: Opcode) -> Self {
        Self(self.0 | 1 << opcode as u16)
    }

    /// This set with `opcode` removed
    pub const fn without(self, opcode: Opcode) -> Self {
        Self(self.0 & !(1 << opcode as u16))
    }

    /// Check membership
    pub const fn contains(self, opcode: Opcode) -> bool {
        self.0 & (1 << opcode as u16) != 0
    }

    /// Number of enabled opcodes
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Check if no opcode is enabled
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Enabled opcodes in wire order
    pub fn iter(self) -> impl Iterator<Item = Opcode> {
        Opcode::ALL.into_iter().filter(move |op| self.contains(*op))
    }
}

impl FromIterator<Opcode> for OpcodeSet {
    fn from_iter<I: IntoIterator<Item = Opcode>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(Opcode::from_name("MoveSprite"), Some(Opcode::MoveSprite));
        assert_eq!(Opcode::from_name("drawtext"), Some(Opcode::DrawText));
        assert_eq!(Opcode::from_name("Blit"), None);
    }

    #[test]
    fn test_opcode_byte_roundtrip() {
        for op in Opcode::ALL {
            assert_eq!(Opcode::from_byte(op.to_byte()), Some(op));
        }
        assert_eq!(Opcode::from_byte(OPCODE_COUNT as u8), None);
        assert_eq!(Opcode::from_byte(0xFF), None);
    }

    #[test]
    fn test_wire_values_match_table() {
        assert_eq!(Opcode::ClearScreen.to_byte(), 0);
        assert_eq!(Opcode::DrawText.to_byte(), 5);
        assert_eq!(Opcode::LoadTiles.to_byte(), 6);
        assert_eq!(Opcode::MoveSprite.to_byte(), 9);
    }

    #[test]
    fn test_schemas_reference_earlier_scalar_fields() {
        for op in Opcode::ALL {
            let schema = op.schema();
            assert!(schema.len() <= MAX_FIELDS, "{} schema too long", op.name());

            for (position, field) in schema.iter().enumerate() {
                let referenced: &[usize] = match field {
                    FieldKind::Buffer { len } => &[*len],
                    FieldKind::Grid { width, height } => &[*width, *height],
                    FieldKind::Patterns { start, count } => &[*start, *count],
                    _ => &[],
                };
                for &index in referenced {
                    assert!(index < position);
                    assert!(schema[index].is_scalar());
                }
            }
        }
    }

    #[test]
    fn test_opcode_set_membership() {
        let set = OpcodeSet::empty()
            .with(Opcode::DrawText)
            .with(Opcode::MoveSprite);
        assert!(set.contains(Opcode::DrawText));
        assert!(set.contains(Opcode::MoveSprite));
        assert!(!set.contains(Opcode::ClearScreen));
        assert_eq!(set.len(), 2);

        let set = set.without(Opcode::DrawText);
        assert!(!set.contains(Opcode::DrawText));
        assert_eq!(set.iter().collect::<heapless::Vec<_, 4>>(), [Opcode::MoveSprite]);
    }

    #[test]
    fn test_opcode_set_all() {
        let all = OpcodeSet::all();
        assert_eq!(all.len(), OPCODE_COUNT);
        assert!(Opcode::ALL.iter().all(|op| all.contains(*op)));
        assert_eq!(Opcode::ALL.into_iter().collect::<OpcodeSet>(), all);
    }
}
