//! Scripted in-memory channel
//!
//! Plays back a fixed byte script as the host's side of the conversation and
//! records every byte the client writes. Used to drive the protocol and the
//! frame loop without a real transport.

use heapless::Vec;

use crate::channel::{Channel, ChannelError};

/// Maximum number of client writes a scripted channel records
///
/// Later writes still succeed and are counted, but their values are not kept.
pub const WRITE_CAPACITY: usize = 256;

/// Channel that replays a host script and records client writes
#[derive(Debug, Clone)]
pub struct ScriptedChannel<'a> {
    script: &'a [u8],
    position: usize,
    written: Vec<u8, WRITE_CAPACITY>,
    unrecorded: usize,
    on_exhausted: ChannelError,
}

impl<'a> ScriptedChannel<'a> {
    /// Create a channel that times out once the script is exhausted
    ///
    /// This models a host that stopped sending mid-batch on a transport
    /// with a read timeout.
    pub fn new(script: &'a [u8]) -> Self {
        Self {
            script,
            position: 0,
            written: Vec::new(),
            unrecorded: 0,
            on_exhausted: ChannelError::Timeout,
        }
    }

    /// Create a channel that reports the host as gone once the script is exhausted
    pub fn closing(script: &'a [u8]) -> Self {
        Self {
            on_exhausted: ChannelError::Closed,
            ..Self::new(script)
        }
    }

    /// Number of script bytes the client has read
    pub fn consumed(&self) -> usize {
        self.position
    }

    /// Number of script bytes not yet read
    pub fn remaining(&self) -> usize {
        self.script.len() - self.position
    }

    /// Bytes written by the client, in order, up to [`WRITE_CAPACITY`]
    pub fn written(&self) -> &[u8] {
        &self.written
    }

    /// Total number of bytes written by the client
    pub fn write_count(&self) -> usize {
        self.written.len() + self.unrecorded
    }
}

impl Channel for ScriptedChannel<'_> {
    fn read(&mut self) -> Result<u8, ChannelError> {
        let byte = *self.script.get(self.position).ok_or(self.on_exhausted)?;
        self.position += 1;
        Ok(byte)
    }

    fn write(&mut self, value: u8) -> Result<(), ChannelError> {
        if self.written.push(value).is_err() {
            self.unrecorded += 1;
        }
        Ok(())
    }
}
