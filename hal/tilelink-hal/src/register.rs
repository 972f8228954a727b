//! Shared byte register
//!
//! The handheld transport: one addressable byte slot that both sides read and
//! write. A read observes the most recent write from either side. There is no
//! queue, so a value the reader did not observe before the next write is lost.

use core::sync::atomic::{AtomicU8, Ordering};

use crate::channel::{Channel, ChannelError};

/// A single byte-wide slot shared with the host
pub trait ByteRegister {
    /// Load the current value
    fn load(&self) -> u8;

    /// Store a value, replacing whatever was there
    fn store(&mut self, value: u8);
}

/// Register backed by an atomic byte
///
/// Useful when the host runs in the same address space, e.g. an emulator
/// bridging its I/O page to a socket.
#[derive(Debug, Clone, Copy)]
pub struct AtomicRegister<'a> {
    slot: &'a AtomicU8,
}

impl<'a> AtomicRegister<'a> {
    /// Wrap a shared atomic slot
    pub const fn new(slot: &'a AtomicU8) -> Self {
        Self { slot }
    }
}

impl ByteRegister for AtomicRegister<'_> {
    fn load(&self) -> u8 {
        self.slot.load(Ordering::Acquire)
    }

    fn store(&mut self, value: u8) {
        self.slot.store(value, Ordering::Release);
    }
}

/// Channel over a shared register
///
/// Reads never fail: synchronization is purely by protocol convention, so a
/// host that stops writing leaves the client reading a stale value.
#[derive(Debug)]
pub struct RegisterChannel<R> {
    register: R,
}

impl<R: ByteRegister> RegisterChannel<R> {
    /// Create a channel over the given register
    pub fn new(register: R) -> Self {
        Self { register }
    }
}

impl<R: ByteRegister> Channel for RegisterChannel<R> {
    fn read(&mut self) -> Result<u8, ChannelError> {
        Ok(self.register.load())
    }

    fn write(&mut self, value: u8) -> Result<(), ChannelError> {
        self.register.store(value);
        Ok(())
    }
}
