//! Session configuration

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use tilelink_protocol::{ProtocolVersion, SystemId};

/// Everything a session needs to know before its first frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SessionConfig {
    /// Wire parameters shared with the host
    pub version: ProtocolVersion,
    /// Identity sent in the handshake
    pub system_id: SystemId,
}

impl SessionConfig {
    /// Create a configuration for a version and hardware variant
    pub const fn new(version: ProtocolVersion, system_id: SystemId) -> Self {
        Self { version, system_id }
    }

    /// Check if the session starts with a handshake
    pub const fn sends_handshake(&self) -> bool {
        self.version.handshake
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_superset_monochrome() {
        let config = SessionConfig::default();
        assert_eq!(config.version, ProtocolVersion::superset());
        assert_eq!(config.system_id, SystemId::Monochrome);
        assert!(config.sends_handshake());
        assert!(config.version.telemetry);
    }

    #[test]
    fn test_primitives_has_no_handshake_or_telemetry() {
        let config = SessionConfig::new(ProtocolVersion::primitives(), SystemId::Color);
        assert!(!config.sends_handshake());
        assert!(!config.version.telemetry);
    }
}
