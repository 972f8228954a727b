//! Command decoding
//!
//! The decoder reads straight from the channel: a batch length, then for each
//! command an opcode and exactly the fields its schema declares. There is no
//! envelope to resynchronize on, so any error leaves the rest of the batch
//! undecodable; callers drop it and start over at the next batch length.

use tilelink_hal::{Channel, ChannelError};

use crate::buffer::BoundedBuffer;
use crate::command::{Command, GRID_CAPACITY, TEXT_CAPACITY};
use crate::opcode::{FieldKind, Opcode, MAX_FIELDS};
use crate::pattern::{TilePattern, PATTERN_SIZE};
use crate::version::ProtocolVersion;

/// Size of the 16-bit pattern index space
pub const PATTERN_INDEX_SPACE: usize = 1 << 16;

/// Errors that end decoding of the current batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Opcode byte not in the version's dispatch table
    UnknownOpcode(u8),
    /// A decoded length exceeds the capacity it must fit in
    ProtocolOverflow { declared: usize, capacity: usize },
    /// The channel gave up waiting for a byte
    ChannelTimeout,
    /// The host is gone
    ChannelClosed,
}

impl From<ChannelError> for DecodeError {
    fn from(e: ChannelError) -> Self {
        match e {
            ChannelError::Timeout => DecodeError::ChannelTimeout,
            ChannelError::Closed => DecodeError::ChannelClosed,
        }
    }
}

impl DecodeError {
    /// Short name for logs and statistics
    pub const fn kind(&self) -> &'static str {
        match self {
            DecodeError::UnknownOpcode(_) => "unknown-opcode",
            DecodeError::ProtocolOverflow { .. } => "protocol-overflow",
            DecodeError::ChannelTimeout => "channel-timeout",
            DecodeError::ChannelClosed => "channel-closed",
        }
    }
}

/// Decoder state for one session
///
/// Owns the bounded buffers that variable-length arguments are read into.
#[derive(Debug, Clone)]
pub struct CommandDecoder {
    version: ProtocolVersion,
    text: BoundedBuffer<TEXT_CAPACITY>,
    indices: BoundedBuffer<GRID_CAPACITY>,
}

impl CommandDecoder {
    /// Create a decoder for a protocol version
    pub fn new(version: ProtocolVersion) -> Self {
        Self {
            version,
            text: BoundedBuffer::new(),
            indices: BoundedBuffer::new(),
        }
    }

    /// Protocol version being decoded
    pub fn version(&self) -> &ProtocolVersion {
        &self.version
    }

    /// Read the number of commands in the next batch
    pub fn read_batch_len<C: Channel>(&self, channel: &mut C) -> Result<u16, DecodeError> {
        Ok(self.version.batch_len.read(channel)?)
    }

    /// Read one opcode byte
    ///
    /// Bytes outside the opcode table, and opcodes this version does not
    /// enable, are [`DecodeError::UnknownOpcode`].
    pub fn read_opcode<C: Channel>(&self, channel: &mut C) -> Result<Opcode, DecodeError> {
        let byte = channel.read()?;
        Opcode::from_byte(byte)
            .filter(|op| self.version.supports(*op))
            .ok_or(DecodeError::UnknownOpcode(byte))
    }

    /// Read the arguments of `opcode` as its schema declares
    ///
    /// Pattern blocks of LoadTiles are not part of the returned command; read
    /// them one at a time with [`CommandDecoder::read_pattern`].
    pub fn read_arguments<C: Channel>(
        &mut self,
        opcode: Opcode,
        channel: &mut C,
    ) -> Result<Command<'_>, DecodeError> {
        let mut fields = [0u16; MAX_FIELDS];

        for (position, field) in opcode.schema().iter().enumerate() {
            match *field {
                FieldKind::Byte => fields[position] = channel.read()?.into(),
                FieldKind::Index => fields[position] = self.version.tile_index.read(channel)?,
                FieldKind::Buffer { len } => {
                    self.text.fill_from(channel, fields[len] as usize)?;
                }
                FieldKind::Grid { width, height } => {
                    let len = fields[width] as usize * fields[height] as usize;
                    self.indices.fill_from(channel, len)?;
                }
                FieldKind::Patterns { start, count } => {
                    let end = fields[start] as usize + fields[count] as usize;
                    if end > PATTERN_INDEX_SPACE {
                        return Err(DecodeError::ProtocolOverflow {
                            declared: end,
                            capacity: PATTERN_INDEX_SPACE,
                        });
                    }
                }
            }
        }

        Ok(Command::from_fields(
            opcode,
            &fields,
            self.text.as_slice(),
            self.indices.as_slice(),
        ))
    }

    /// Read one opcode and its arguments
    pub fn read_command<C: Channel>(&mut self, channel: &mut C) -> Result<Command<'_>, DecodeError> {
        let opcode = self.read_opcode(channel)?;
        self.read_arguments(opcode, channel)
    }

    /// Read one pattern block of a LoadTiles command
    ///
    /// Blocks carry no decoder state, so this can run while a decoded
    /// command still borrows the decoder's buffers.
    pub fn read_pattern<C: Channel>(channel: &mut C) -> Result<TilePattern, DecodeError> {
        let mut block = [0u8; PATTERN_SIZE];
        for byte in block.iter_mut() {
            *byte = channel.read()?;
        }
        Ok(TilePattern::new(block))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::PatternStore;
    use crate::opcode::OpcodeSet;
    use tilelink_hal::ScriptedChannel;

    fn decoder() -> CommandDecoder {
        CommandDecoder::new(ProtocolVersion::superset())
    }

    #[test]
    fn test_batch_len_width_follows_version() {
        let mut channel = ScriptedChannel::new(&[0x01, 0x02]);
        assert_eq!(decoder().read_batch_len(&mut channel), Ok(0x0102));

        let mut channel = ScriptedChannel::new(&[0x01, 0x02]);
        let narrow = CommandDecoder::new(ProtocolVersion::primitives());
        assert_eq!(narrow.read_batch_len(&mut channel), Ok(0x01));
        assert_eq!(channel.remaining(), 1);
    }

    #[test]
    fn test_draw_text() {
        let mut channel = ScriptedChannel::new(&[5, 16, 24, 3, 0x41, 0x42, 0x43]);
        let mut decoder = decoder();

        let command = decoder.read_command(&mut channel).unwrap();
        assert_eq!(
            command,
            Command::DrawText {
                x: 16,
                y: 24,
                text: b"ABC"
            }
        );
        assert_eq!(channel.remaining(), 0);
    }

    #[test]
    fn test_text_overflow_stops_before_payload() {
        let mut script = [0u8; 4 + TEXT_CAPACITY + 1];
        script[..4].copy_from_slice(&[5, 0, 0, TEXT_CAPACITY as u8 + 1]);
        let mut channel = ScriptedChannel::new(&script);

        let result = decoder().read_command(&mut channel).map(|_| ());
        assert_eq!(
            result,
            Err(DecodeError::ProtocolOverflow {
                declared: TEXT_CAPACITY + 1,
                capacity: TEXT_CAPACITY
            })
        );
        assert_eq!(channel.consumed(), 4);
    }

    #[test]
    fn test_background_tiles_reads_w_times_h() {
        let mut channel = ScriptedChannel::new(&[7, 1, 2, 3, 2, 10, 11, 12, 13, 14, 15, 99]);
        let mut decoder = decoder();

        let command = decoder.read_command(&mut channel).unwrap();
        assert_eq!(
            command,
            Command::SetBackgroundTiles {
                x: 1,
                y: 2,
                width: 3,
                height: 2,
                indices: &[10, 11, 12, 13, 14, 15]
            }
        );
        assert_eq!(channel.remaining(), 1);
    }

    #[test]
    fn test_background_grid_overflow() {
        // 20 x 19 cells is one row more than the grid holds
        let mut channel = ScriptedChannel::new(&[7, 0, 0, 20, 19]);
        let result = decoder().read_command(&mut channel).map(|_| ());
        assert_eq!(
            result,
            Err(DecodeError::ProtocolOverflow {
                declared: 380,
                capacity: GRID_CAPACITY
            })
        );
        assert_eq!(channel.remaining(), 0);
    }

    #[test]
    fn test_load_tiles_header_and_patterns() {
        let mut script = [0u8; 6 + 2 * PATTERN_SIZE];
        script[..6].copy_from_slice(&[6, 1, 0x00, 0x20, 0x00, 0x02]);
        script[6..22].fill(0xAA);
        script[22..38].fill(0x55);
        let mut channel = ScriptedChannel::new(&script);
        let mut decoder = decoder();

        let command = decoder.read_command(&mut channel).unwrap();
        assert_eq!(
            command,
            Command::LoadTiles {
                store: PatternStore::Background,
                start: 0x20,
                count: 2
            }
        );
        assert_eq!(CommandDecoder::read_pattern(&mut channel), Ok(TilePattern::new([0xAA; 16])));
        assert_eq!(CommandDecoder::read_pattern(&mut channel), Ok(TilePattern::new([0x55; 16])));
        assert_eq!(channel.remaining(), 0);
    }

    #[test]
    fn test_load_tiles_byte_indices() {
        let version = ProtocolVersion {
            tile_index: crate::version::FieldWidth::Byte,
            ..ProtocolVersion::superset()
        };
        let mut channel = ScriptedChannel::new(&[6, 0, 4, 1]);
        let mut decoder = CommandDecoder::new(version);

        let command = decoder.read_command(&mut channel).unwrap();
        assert_eq!(
            command,
            Command::LoadTiles {
                store: PatternStore::Sprite,
                start: 4,
                count: 1
            }
        );
    }

    #[test]
    fn test_load_tiles_past_index_space() {
        let mut channel = ScriptedChannel::new(&[6, 1, 0xFF, 0xFF, 0x00, 0x02]);
        let result = decoder().read_command(&mut channel).map(|_| ());
        assert_eq!(
            result,
            Err(DecodeError::ProtocolOverflow {
                declared: 0x1_0001,
                capacity: PATTERN_INDEX_SPACE
            })
        );
    }

    #[test]
    fn test_unknown_opcode_byte() {
        let mut channel = ScriptedChannel::new(&[0x42, 1, 2, 3]);
        let result = decoder().read_command(&mut channel).map(|_| ());
        assert_eq!(result, Err(DecodeError::UnknownOpcode(0x42)));
        assert_eq!(channel.consumed(), 1);
    }

    #[test]
    fn test_disabled_opcode_is_unknown() {
        let version = ProtocolVersion {
            opcodes: OpcodeSet::all().without(Opcode::DrawLine),
            ..ProtocolVersion::superset()
        };
        let mut channel = ScriptedChannel::new(&[3, 0, 0, 10, 10]);
        let result = CommandDecoder::new(version)
            .read_command(&mut channel)
            .map(|_| ());
        assert_eq!(result, Err(DecodeError::UnknownOpcode(3)));
    }

    #[test]
    fn test_timeout_mid_arguments() {
        let mut channel = ScriptedChannel::new(&[9, 3, 10]);
        let result = decoder().read_command(&mut channel).map(|_| ());
        assert_eq!(result, Err(DecodeError::ChannelTimeout));
    }

    #[test]
    fn test_closed_channel() {
        let mut channel = ScriptedChannel::closing(&[]);
        assert_eq!(
            decoder().read_batch_len(&mut channel),
            Err(DecodeError::ChannelClosed)
        );
    }

    #[test]
    fn test_fixed_schema_commands() {
        let script = [0, 1, 1, 2, 3, 4, 2, 5, 6, 3, 1, 2, 3, 4, 4, 8, 9, 10, 8, 3, 7, 9, 3, 10, 20];
        let mut channel = ScriptedChannel::new(&script);
        let mut decoder = decoder();

        let expected = [
            Command::ClearScreen,
            Command::ClearRect {
                x: 1,
                y: 2,
                width: 3,
                height: 4,
            },
            Command::DrawPoint { x: 5, y: 6 },
            Command::DrawLine {
                x1: 1,
                y1: 2,
                x2: 3,
                y2: 4,
            },
            Command::DrawCircle {
                x: 8,
                y: 9,
                radius: 10,
            },
            Command::SetSpriteTile {
                sprite: 3,
                pattern: 7,
            },
            Command::MoveSprite {
                sprite: 3,
                x: 10,
                y: 20,
            },
        ];
        for command in expected {
            assert_eq!(decoder.read_command(&mut channel), Ok(command));
        }
        assert_eq!(channel.remaining(), 0);
    }
}
