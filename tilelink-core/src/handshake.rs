//! Session handshake

use tilelink_hal::{Channel, ChannelError};

use crate::config::SessionConfig;

/// Send the session identity if the version has a handshake
///
/// Must run once, before the first frame. Returns whether a byte was sent.
pub fn send_handshake<C: Channel>(channel: &mut C, config: &SessionConfig) -> Result<bool, ChannelError> {
    if !config.sends_handshake() {
        return Ok(false);
    }

    channel.write(config.system_id.to_byte())?;
    info!("handshake sent: {:?}", config.system_id);
    Ok(true)
}
