//! Duplex channel abstraction
//!
//! The host and the client share a single byte-wide slot. Every access is a
//! side effect on shared state: nothing is buffered or queued here, and there
//! is no acknowledgement. Ordering is by protocol phase alone.

/// Channel errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelError {
    /// A read did not complete within the transport's bounded wait
    Timeout,
    /// The host side is gone; no further bytes will arrive
    Closed,
}

/// Duplex byte channel to the host
///
/// Transports that cannot time out (a memory-mapped register) never return
/// [`ChannelError::Timeout`]; a host that stops mid-batch stalls them.
pub trait Channel {
    /// Read the current byte from the host
    fn read(&mut self) -> Result<u8, ChannelError>;

    /// Store a byte for the host to observe
    fn write(&mut self, value: u8) -> Result<(), ChannelError>;

    /// Read a big-endian 16-bit value as two sequential byte reads
    ///
    /// There is no retry: the host is assumed to deliver both halves in order.
    fn read_word(&mut self) -> Result<u16, ChannelError> {
        let high = self.read()?;
        let low = self.read()?;
        Ok(u16::from_be_bytes([high, low]))
    }
}

impl<T: Channel + ?Sized> Channel for &mut T {
    fn read(&mut self) -> Result<u8, ChannelError> {
        (**self).read()
    }

    fn write(&mut self, value: u8) -> Result<(), ChannelError> {
        (**self).write(value)
    }

    fn read_word(&mut self) -> Result<u16, ChannelError> {
        (**self).read_word()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScriptedChannel;

    #[test]
    fn test_read_word_is_big_endian() {
        let mut channel = ScriptedChannel::new(&[0x12, 0x34]);
        assert_eq!(channel.read_word(), Ok(0x1234));
    }

    #[test]
    fn test_read_word_propagates_timeout_on_second_half() {
        let mut channel = ScriptedChannel::new(&[0x12]);
        assert_eq!(channel.read_word(), Err(ChannelError::Timeout));
        assert_eq!(channel.consumed(), 1);
    }

    #[test]
    fn test_channel_through_mut_reference() {
        fn read_two<C: Channel>(mut channel: C) -> (u8, u8) {
            (channel.read().unwrap(), channel.read().unwrap())
        }

        let mut channel = ScriptedChannel::new(&[7, 9]);
        assert_eq!(read_two(&mut channel), (7, 9));
        assert_eq!(channel.remaining(), 0);
    }
}
