//! Per-frame input telemetry

use tilelink_hal::{Channel, ChannelError, InputPoller};
use tilelink_protocol::ProtocolVersion;

/// Writes the input snapshot to the host once per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TelemetryReporter {
    enabled: bool,
}

impl TelemetryReporter {
    /// Create a reporter for a protocol version
    pub const fn new(version: &ProtocolVersion) -> Self {
        Self {
            enabled: version.telemetry,
        }
    }

    /// Check if this version reports input at all
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Sample the input and write it to the channel
    ///
    /// Returns the byte written, or `None` when telemetry is disabled and the
    /// input was not sampled.
    pub fn report<C, I>(&self, channel: &mut C, input: &mut I) -> Result<Option<u8>, ChannelError>
    where
        C: Channel,
        I: InputPoller,
    {
        if !self.enabled {
            return Ok(None);
        }

        let snapshot = input.poll_input();
        channel.write(snapshot)?;
        Ok(Some(snapshot))
    }
}
