//! Host-side batch encoding
//!
//! Builds the byte stream a host sends for one frame. The writer applies the
//! same schemas and capacities the decoder enforces, so anything it accepts
//! decodes cleanly on the client.

use heapless::Vec;

use crate::command::{Command, PatternStore, GRID_CAPACITY, TEXT_CAPACITY};
use crate::opcode::{FieldKind, Opcode};
use crate::pattern::TilePattern;
use crate::version::{FieldWidth, ProtocolVersion};

/// Errors that can occur while building a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// Output buffer is full
    BufferFull,
    /// The batch already holds as many commands as its length field can count
    BatchFull,
    /// The protocol version does not enable this opcode
    UnsupportedOpcode(Opcode),
    /// A variable-length argument exceeds what the client can hold
    FieldTooLong { len: usize, capacity: usize },
    /// A numeric value does not fit its field width
    FieldTooWide(u16),
    /// Tile index count does not match width × height
    GridMismatch { expected: usize, actual: usize },
}

/// Builder for one command batch
#[derive(Debug, Clone)]
pub struct BatchWriter<const N: usize> {
    version: ProtocolVersion,
    bytes: Vec<u8, N>,
    count: u16,
}

impl<const N: usize> BatchWriter<N> {
    /// Start a batch; the length prefix is filled in by [`BatchWriter::finish`]
    pub fn new(version: ProtocolVersion) -> Result<Self, EncodeError> {
        let mut writer = Self {
            version,
            bytes: Vec::new(),
            count: 0,
        };
        for _ in 0..version.batch_len.bytes() {
            writer.put(0)?;
        }
        Ok(writer)
    }

    /// Number of commands written so far
    pub fn command_count(&self) -> u16 {
        self.count
    }

    /// Number of bytes written so far, including the length prefix
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if no command has been written
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Append one command
    ///
    /// For LoadTiles this writes the header only; follow it with exactly
    /// `count` calls to [`BatchWriter::push_pattern`], or use
    /// [`BatchWriter::push_load_tiles`]. On error nothing is appended.
    pub fn push(&mut self, command: &Command<'_>) -> Result<(), EncodeError> {
        let mark = self.bytes.len();
        let result = self.encode(command);
        if result.is_err() {
            self.bytes.truncate(mark);
        }
        result
    }

    /// Append one pattern block following a LoadTiles header
    pub fn push_pattern(&mut self, pattern: &TilePattern) -> Result<(), EncodeError> {
        self.put_all(pattern.as_bytes())
    }

    /// Append a complete LoadTiles command with its pattern blocks
    pub fn push_load_tiles(
        &mut self,
        store: PatternStore,
        start: u16,
        patterns: &[TilePattern],
    ) -> Result<(), EncodeError> {
        let count = u16::try_from(patterns.len()).map_err(|_| EncodeError::FieldTooLong {
            len: patterns.len(),
            capacity: u16::MAX as usize,
        })?;
        let mark = self.bytes.len();
        self.push(&Command::LoadTiles {
            store,
            start,
            count,
        })?;
        for pattern in patterns {
            if self.push_pattern(pattern).is_err() {
                self.bytes.truncate(mark);
                self.count -= 1;
                return Err(EncodeError::BufferFull);
            }
        }
        Ok(())
    }

    /// Patch the length prefix and return the encoded batch
    pub fn finish(mut self) -> Vec<u8, N> {
        match self.version.batch_len {
            FieldWidth::Byte => self.bytes[0] = self.count as u8,
            FieldWidth::Word => self.bytes[..2].copy_from_slice(&self.count.to_be_bytes()),
        }
        self.bytes
    }

    fn encode(&mut self, command: &Command<'_>) -> Result<(), EncodeError> {
        let opcode = command.opcode();
        if !self.version.supports(opcode) {
            return Err(EncodeError::UnsupportedOpcode(opcode));
        }
        if self.count >= self.version.max_batch_len() {
            return Err(EncodeError::BatchFull);
        }

        let fields = command.fields();
        let payload = command.payload();
        self.put(opcode.to_byte())?;

        for field in opcode.schema() {
            match *field {
                FieldKind::Byte | FieldKind::Index | FieldKind::Patterns { .. } => {}
                FieldKind::Buffer { len } => {
                    if payload.len() > TEXT_CAPACITY {
                        return Err(EncodeError::FieldTooLong {
                            len: payload.len(),
                            capacity: TEXT_CAPACITY,
                        });
                    }
                    debug_assert_eq!(fields[len] as usize, payload.len());
                }
                FieldKind::Grid { width, height } => {
                    let expected = fields[width] as usize * fields[height] as usize;
                    if payload.len() != expected {
                        return Err(EncodeError::GridMismatch {
                            expected,
                            actual: payload.len(),
                        });
                    }
                    if expected > GRID_CAPACITY {
                        return Err(EncodeError::FieldTooLong {
                            len: expected,
                            capacity: GRID_CAPACITY,
                        });
                    }
                }
            }
        }

        for (position, field) in opcode.schema().iter().enumerate() {
            match *field {
                FieldKind::Byte => self.put(fields[position] as u8)?,
                FieldKind::Index => self.put_sized(self.version.tile_index, fields[position])?,
                FieldKind::Buffer { .. } | FieldKind::Grid { .. } => self.put_all(payload)?,
                FieldKind::Patterns { .. } => {}
            }
        }

        self.count += 1;
        Ok(())
    }

    fn put(&mut self, byte: u8) -> Result<(), EncodeError> {
        self.bytes.push(byte).map_err(|_| EncodeError::BufferFull)
    }

    fn put_all(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        self.bytes
            .extend_from_slice(bytes)
            .map_err(|_| EncodeError::BufferFull)
    }

    fn put_sized(&mut self, width: FieldWidth, value: u16) -> Result<(), EncodeError> {
        match width {
            FieldWidth::Byte => {
                let byte = u8::try_from(value).map_err(|_| EncodeError::FieldTooWide(value))?;
                self.put(byte)
            }
            FieldWidth::Word => self.put_all(&value.to_be_bytes()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::CommandDecoder;
    use crate::pattern::Shade;
    use tilelink_hal::ScriptedChannel;

    #[test]
    fn test_empty_batch() {
        let batch = BatchWriter::<8>::new(ProtocolVersion::superset())
            .unwrap()
            .finish();
        assert_eq!(batch, [0, 0]);

        let batch = BatchWriter::<8>::new(ProtocolVersion::primitives())
            .unwrap()
            .finish();
        assert_eq!(batch, [0]);
    }

    #[test]
    fn test_sprite_commands_bytes() {
        let mut writer = BatchWriter::<16>::new(ProtocolVersion::tiles()).unwrap();
        writer
            .push(&Command::SetSpriteTile {
                sprite: 3,
                pattern: 7,
            })
            .unwrap();
        writer
            .push(&Command::MoveSprite {
                sprite: 3,
                x: 10,
                y: 20,
            })
            .unwrap();

        assert_eq!(writer.command_count(), 2);
        assert_eq!(writer.finish(), [0, 2, 8, 3, 7, 9, 3, 10, 20]);
    }

    #[test]
    fn test_text_bytes() {
        let mut writer = BatchWriter::<16>::new(ProtocolVersion::primitives()).unwrap();
        writer
            .push(&Command::DrawText {
                x: 16,
                y: 24,
                text: b"ABC",
            })
            .unwrap();
        assert_eq!(writer.finish(), [1, 5, 16, 24, 3, 0x41, 0x42, 0x43]);
    }

    #[test]
    fn test_unsupported_opcode_rejected() {
        let mut writer = BatchWriter::<16>::new(ProtocolVersion::primitives()).unwrap();
        let result = writer.push(&Command::MoveSprite {
            sprite: 0,
            x: 0,
            y: 0,
        });
        assert_eq!(result, Err(EncodeError::UnsupportedOpcode(Opcode::MoveSprite)));
        assert_eq!(writer.len(), 1);
        assert!(writer.is_empty());
    }

    #[test]
    fn test_text_longer_than_client_capacity() {
        let text = [b'x'; TEXT_CAPACITY + 1];
        let mut writer = BatchWriter::<256>::new(ProtocolVersion::superset()).unwrap();
        let result = writer.push(&Command::DrawText {
            x: 0,
            y: 0,
            text: &text,
        });
        assert_eq!(
            result,
            Err(EncodeError::FieldTooLong {
                len: TEXT_CAPACITY + 1,
                capacity: TEXT_CAPACITY
            })
        );
        assert_eq!(writer.len(), 2);
    }

    #[test]
    fn test_grid_mismatch() {
        let mut writer = BatchWriter::<32>::new(ProtocolVersion::superset()).unwrap();
        let result = writer.push(&Command::SetBackgroundTiles {
            x: 0,
            y: 0,
            width: 2,
            height: 2,
            indices: &[1, 2, 3],
        });
        assert_eq!(
            result,
            Err(EncodeError::GridMismatch {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn test_buffer_full_rolls_back() {
        let mut writer = BatchWriter::<6>::new(ProtocolVersion::superset()).unwrap();
        writer.push(&Command::DrawPoint { x: 1, y: 2 }).unwrap();
        let result = writer.push(&Command::DrawPoint { x: 3, y: 4 });
        assert_eq!(result, Err(EncodeError::BufferFull));
        assert_eq!(writer.len(), 5);
        assert_eq!(writer.finish(), [0, 1, 2, 1, 2]);
    }

    #[test]
    fn test_byte_width_index_too_wide() {
        let version = ProtocolVersion {
            tile_index: FieldWidth::Byte,
            ..ProtocolVersion::superset()
        };
        let mut writer = BatchWriter::<32>::new(version).unwrap();
        let result = writer.push(&Command::LoadTiles {
            store: PatternStore::Sprite,
            start: 300,
            count: 0,
        });
        assert_eq!(result, Err(EncodeError::FieldTooWide(300)));
    }

    #[test]
    fn test_batch_full_for_byte_length() {
        let mut writer = BatchWriter::<1024>::new(ProtocolVersion::primitives()).unwrap();
        for _ in 0..255 {
            writer.push(&Command::ClearScreen).unwrap();
        }
        assert_eq!(writer.push(&Command::ClearScreen), Err(EncodeError::BatchFull));
    }

    #[test]
    fn test_load_tiles_decodes() {
        let patterns = [TilePattern::filled(Shade::Black), TilePattern::filled(Shade::Light)];
        let mut writer = BatchWriter::<64>::new(ProtocolVersion::tiles()).unwrap();
        writer
            .push_load_tiles(PatternStore::Background, 0x0100, &patterns)
            .unwrap();
        let batch = writer.finish();

        let mut channel = ScriptedChannel::new(&batch);
        let mut decoder = CommandDecoder::new(ProtocolVersion::tiles());
        assert_eq!(decoder.read_batch_len(&mut channel), Ok(1));
        assert_eq!(
            decoder.read_command(&mut channel),
            Ok(Command::LoadTiles {
                store: PatternStore::Background,
                start: 0x0100,
                count: 2
            })
        );
        for pattern in &patterns {
            assert_eq!(CommandDecoder::read_pattern(&mut channel).as_ref(), Ok(pattern));
        }
        assert_eq!(channel.remaining(), 0);
    }

    #[test]
    fn test_load_tiles_overflow_rolls_back() {
        let patterns = [TilePattern::default(); 2];
        let mut writer = BatchWriter::<24>::new(ProtocolVersion::tiles()).unwrap();
        let result = writer.push_load_tiles(PatternStore::Sprite, 0, &patterns);
        assert_eq!(result, Err(EncodeError::BufferFull));
        assert_eq!(writer.len(), 2);
        assert_eq!(writer.command_count(), 0);
    }
}
