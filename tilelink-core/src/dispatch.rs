//! Operation dispatch table
//!
//! Maps each opcode a protocol version enables to its argument schema and
//! the operation it performs on the render target. Opcodes missing from the
//! table are unknown to the session.

use tilelink_display::{DisplayError, DrawStyle, Fill, RenderTarget};
use tilelink_hal::Channel;
use tilelink_protocol::command::pixel_to_cell;
use tilelink_protocol::{
    CircleWiring, Command, CommandDecoder, DecodeError, FieldKind, Opcode, PatternStore,
    ProtocolVersion, TilePattern, OPCODE_COUNT,
};

/// Why a command could not be carried through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchError {
    /// Streamed payload could not be read; framing is lost
    Decode(DecodeError),
    /// The decoded command belongs to a different operation
    Mismatch {
        operation: Operation,
        opcode: Opcode,
    },
}

impl From<DecodeError> for DispatchError {
    fn from(e: DecodeError) -> Self {
        DispatchError::Decode(e)
    }
}

/// What a command does to the render target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Operation {
    /// Erase the whole screen
    ClearScreen,
    /// Erase a rectangle
    ClearRect,
    /// Plot a point in ink
    Point,
    /// Draw a line in ink
    Line,
    /// Draw a circle in ink, wired to a circle or a point
    Circle(CircleWiring),
    /// Render text at the cell containing its pixel position
    Text,
    /// Store streamed pattern blocks
    LoadPatterns,
    /// Overwrite a rectangle of the background grid
    BlitBackground,
    /// Bind a sprite to a pattern
    BindSprite,
    /// Reposition a sprite
    MoveSprite,
}

impl Operation {
    /// Operation performed for an opcode under a protocol version
    pub const fn for_opcode(opcode: Opcode, version: &ProtocolVersion) -> Self {
        match opcode {
            Opcode::ClearScreen => Operation::ClearScreen,
            Opcode::ClearRect => Operation::ClearRect,
            Opcode::DrawPoint => Operation::Point,
            Opcode::DrawLine => Operation::Line,
            Opcode::DrawCircle => Operation::Circle(version.circle),
            Opcode::DrawText => Operation::Text,
            Opcode::LoadTiles => Operation::LoadPatterns,
            Opcode::SetBackgroundTiles => Operation::BlitBackground,
            Opcode::SetSpriteTile => Operation::BindSprite,
            Opcode::MoveSprite => Operation::MoveSprite,
        }
    }

    /// Apply a decoded command to the render target
    ///
    /// LoadTiles reads its pattern blocks from `channel` one at a time and
    /// stores each before reading the next. Returns the number of calls the
    /// render target rejected; a rejection never stops the command.
    pub fn apply<C, T>(
        self,
        command: &Command<'_>,
        channel: &mut C,
        target: &mut T,
    ) -> Result<u32, DispatchError>
    where
        C: Channel,
        T: RenderTarget,
    {
        let drawn = match (self, *command) {
            (Operation::LoadPatterns, Command::LoadTiles { store, start, count }) => {
                return stream_patterns(channel, target, store, start, count);
            }
            (Operation::ClearScreen, Command::ClearScreen) => {
                let (width, height) = target.pixel_dimensions();
                target
                    .set_draw_style(DrawStyle::ERASE)
                    .and_then(|_| target.draw_rect(0, 0, width, height, Fill::Filled))
            }
            (
                Operation::ClearRect,
                Command::ClearRect {
                    x,
                    y,
                    width,
                    height,
                },
            ) => target
                .set_draw_style(DrawStyle::ERASE)
                .and_then(|_| target.draw_rect(x, y, width, height, Fill::Filled)),
            (Operation::Point, Command::DrawPoint { x, y }) => target
                .set_draw_style(DrawStyle::INK)
                .and_then(|_| target.draw_point(x, y)),
            (Operation::Line, Command::DrawLine { x1, y1, x2, y2 }) => target
                .set_draw_style(DrawStyle::INK)
                .and_then(|_| target.draw_line(x1, y1, x2, y2)),
            (Operation::Circle(wiring), Command::DrawCircle { x, y, radius }) => {
                target.set_draw_style(DrawStyle::INK).and_then(|_| match wiring {
                    CircleWiring::Circle => target.draw_circle(x, y, radius),
                    CircleWiring::Point => target.draw_point(x, y),
                })
            }
            (Operation::Text, Command::DrawText { x, y, text }) => {
                target.draw_text(pixel_to_cell(x), pixel_to_cell(y), text)
            }
            (
                Operation::BlitBackground,
                Command::SetBackgroundTiles {
                    x,
                    y,
                    width,
                    height,
                    indices,
                },
            ) => target.blit_background(x, y, width, height, indices),
            (Operation::BindSprite, Command::SetSpriteTile { sprite, pattern }) => {
                target.set_sprite_binding(sprite, pattern)
            }
            (Operation::MoveSprite, Command::MoveSprite { sprite, x, y }) => {
                target.move_sprite(sprite, x, y)
            }
            (operation, command) => {
                return Err(DispatchError::Mismatch {
                    operation,
                    opcode: command.opcode(),
                })
            }
        };

        match drawn {
            Ok(()) => Ok(0),
            Err(e) => {
                warn!("{:?} rejected by render target: {:?}", self, e);
                Ok(1)
            }
        }
    }
}

/// Read `count` pattern blocks and store them from `start` upward
fn stream_patterns<C, T>(
    channel: &mut C,
    target: &mut T,
    store: PatternStore,
    start: u16,
    count: u16,
) -> Result<u32, DispatchError>
where
    C: Channel,
    T: RenderTarget,
{
    let mut rejected = 0u32;
    for offset in 0..count {
        let pattern = CommandDecoder::read_pattern(channel)?;
        let stored = u16::try_from(u32::from(start) + u32::from(offset))
            .map_err(|_| DisplayError::InvalidIndex)
            .and_then(|index| store_pattern(target, store, index, &pattern));
        if let Err(e) = stored {
            trace!("pattern {} rejected by render target: {:?}", offset, e);
            rejected = rejected.saturating_add(1);
        }
    }
    if rejected > 0 {
        warn!("{} of {} patterns rejected by render target", rejected, count);
    }
    Ok(rejected)
}

/// Store one streamed pattern block in the selected store
pub fn store_pattern<T: RenderTarget>(
    target: &mut T,
    store: PatternStore,
    index: u16,
    pattern: &TilePattern,
) -> Result<(), DisplayError> {
    match store {
        PatternStore::Background => target.set_background_pattern(index, pattern),
        PatternStore::Sprite => target.set_sprite_pattern(index, pattern),
    }
}

/// One dispatch table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Entry {
    /// Opcode this entry handles
    pub opcode: Opcode,
    /// Fields read after the opcode byte
    pub schema: &'static [FieldKind],
    /// What the command does
    pub operation: Operation,
}

/// Opcode to operation mapping for one protocol version
#[derive(Debug, Clone)]
pub struct DispatchTable {
    entries: [Option<Entry>; OPCODE_COUNT],
}

impl DispatchTable {
    /// Build the table of opcodes a version enables
    pub fn new(version: &ProtocolVersion) -> Self {
        let mut entries = [None; OPCODE_COUNT];
        for opcode in version.opcodes.iter() {
            entries[opcode.to_byte() as usize] = Some(Entry {
                opcode,
                schema: opcode.schema(),
                operation: Operation::for_opcode(opcode, version),
            });
        }
        Self { entries }
    }

    /// Look up an opcode byte
    pub fn lookup(&self, byte: u8) -> Option<&Entry> {
        self.entries.get(byte as usize)?.as_ref()
    }

    /// Number of opcodes in the table
    pub fn len(&self) -> usize {
        self.entries.iter().flatten().count()
    }

    /// Check if the table accepts no opcodes at all
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries in opcode order
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().flatten()
    }
}
