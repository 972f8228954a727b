//! Tilelink command protocol
//!
//! This crate defines the byte-level protocol a host uses to drive a
//! tile/sprite display client over a single duplex byte channel. There is no
//! framing envelope: a batch is a length followed by that many commands, and
//! each command's length is implied by its opcode's argument schema.
//!
//! # Wire Format
//!
//! ```text
//! ┌───────────┬────────┬──────────┬─────┬────────┬──────────┐
//! │ BATCH_LEN │ OPCODE │ FIELDS   │ ... │ OPCODE │ FIELDS   │
//! │ 1B or 2B  │ 1B     │ schema   │     │ 1B     │ schema   │
//! └───────────┴────────┴──────────┴─────┴────────┴──────────┘
//! ```
//!
//! Multi-byte fields are big-endian. The widths of the batch length and of
//! tile indices depend on the [`ProtocolVersion`].
//!
//! Once per frame, before the batch, the client writes one byte: the bitmask
//! of pressed controls ([`Buttons`]). Versions with a handshake also write the
//! [`SystemId`] once, before the first frame.
//!
//! Decoding never trusts a length field: every variable-length argument is
//! read into a fixed-capacity [`BoundedBuffer`] that rejects oversized
//! lengths before a single payload byte is consumed.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod buffer;
pub mod command;
pub mod decode;
pub mod encode;
pub mod identity;
pub mod input;
pub mod opcode;
pub mod pattern;
pub mod version;

pub use buffer::BoundedBuffer;
pub use command::{Command, PatternStore, GRID_CAPACITY, GRID_COLS, GRID_ROWS, TEXT_CAPACITY};
pub use decode::{CommandDecoder, DecodeError};
pub use encode::{BatchWriter, EncodeError};
pub use identity::SystemId;
pub use input::Buttons;
pub use opcode::{FieldKind, Opcode, OpcodeSet, OPCODE_COUNT};
pub use pattern::{Shade, TilePattern, PATTERN_SIZE};
pub use version::{CircleWiring, FieldWidth, ProtocolVersion};
