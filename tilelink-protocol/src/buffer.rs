//! Capacity-bounded argument buffers
//!
//! Variable-length arguments carry their own length on the wire. That length
//! is checked against the buffer's fixed capacity before any payload byte is
//! read, so an oversized declaration fails cleanly instead of overrunning
//! memory or silently truncating.

use heapless::Vec;
use tilelink_hal::Channel;

use crate::decode::DecodeError;

/// Fixed-capacity byte buffer for one variable-length argument
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundedBuffer<const N: usize> {
    bytes: Vec<u8, N>,
}

impl<const N: usize> BoundedBuffer<N> {
    /// Maximum number of bytes the buffer holds
    pub const CAPACITY: usize = N;

    /// Create an empty buffer
    pub const fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Replace the contents with exactly `len` bytes read from the channel
    ///
    /// Fails with [`DecodeError::ProtocolOverflow`] without reading anything
    /// if `len` exceeds the capacity. On a channel error the buffer holds the
    /// bytes read so far.
    pub fn fill_from<C: Channel>(&mut self, channel: &mut C, len: usize) -> Result<usize, DecodeError> {
        self.check(len)?;
        self.bytes.clear();
        for _ in 0..len {
            let byte = channel.read()?;
            self.bytes.push(byte).map_err(|_| Self::overflow(len))?;
        }
        Ok(len)
    }

    /// Current contents
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of bytes held
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Drop the contents
    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    fn check(&self, len: usize) -> Result<(), DecodeError> {
        if len > N {
            return Err(Self::overflow(len));
        }
        Ok(())
    }

    fn overflow(declared: usize) -> DecodeError {
        DecodeError::ProtocolOverflow {
            declared,
            capacity: N,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilelink_hal::ScriptedChannel;

    #[test]
    fn test_fill_reads_exactly_len_bytes() {
        let mut channel = ScriptedChannel::new(&[1, 2, 3, 4]);
        let mut buffer = BoundedBuffer::<8>::new();

        assert_eq!(buffer.fill_from(&mut channel, 3), Ok(3));
        assert_eq!(buffer.as_slice(), &[1, 2, 3]);
        assert_eq!(channel.remaining(), 1);
    }

    #[test]
    fn test_fill_at_capacity() {
        let mut channel = ScriptedChannel::new(&[9; 4]);
        let mut buffer = BoundedBuffer::<4>::new();

        assert_eq!(buffer.fill_from(&mut channel, 4), Ok(4));
        assert_eq!(buffer.len(), 4);
    }

    #[test]
    fn test_oversized_length_consumes_nothing() {
        let mut channel = ScriptedChannel::new(&[0; 16]);
        let mut buffer = BoundedBuffer::<4>::new();

        let result = buffer.fill_from(&mut channel, 5);
        assert_eq!(
            result,
            Err(DecodeError::ProtocolOverflow {
                declared: 5,
                capacity: 4
            })
        );
        assert_eq!(channel.consumed(), 0);
    }

    #[test]
    fn test_refill_replaces_contents() {
        let mut channel = ScriptedChannel::new(&[1, 2, 3, 4, 5]);
        let mut buffer = BoundedBuffer::<8>::new();

        buffer.fill_from(&mut channel, 3).unwrap();
        buffer.fill_from(&mut channel, 2).unwrap();
        assert_eq!(buffer.as_slice(), &[4, 5]);
    }

    #[test]
    fn test_timeout_mid_fill() {
        let mut channel = ScriptedChannel::new(&[1, 2]);
        let mut buffer = BoundedBuffer::<8>::new();

        assert_eq!(
            buffer.fill_from(&mut channel, 3),
            Err(DecodeError::ChannelTimeout)
        );
        assert_eq!(buffer.as_slice(), &[1, 2]);
    }
}
