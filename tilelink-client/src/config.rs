//! Client configuration
//!
//! Loaded from a TOML file; every key is optional and falls back to the
//! built-in default. Command-line flags are applied on top by `main`.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use tilelink_core::SessionConfig;
use tilelink_protocol::{Buttons, CircleWiring, FieldWidth, Opcode, OpcodeSet, ProtocolVersion, SystemId};

use crate::error::ClientError;

/// Complete client configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    pub link: LinkConfig,
    pub protocol: ProtocolConfig,
    pub session: SessionSection,
    pub frame: FrameConfig,
    pub input: InputConfig,
}

/// `[link]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinkConfig {
    /// Host address, `host:port`
    pub host: String,
    /// How long a read waits for the host before the batch is dropped
    pub read_timeout_ms: u64,
    /// Connection attempts before giving up
    pub connect_attempts: u32,
    /// Delay between connection attempts
    pub retry_delay_ms: u64,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1:3333".into(),
            read_timeout_ms: 100,
            connect_attempts: 5,
            retry_delay_ms: 500,
        }
    }
}

/// `[protocol]` section: a preset plus optional per-field overrides
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProtocolConfig {
    pub preset: String,
    pub batch_len: Option<FieldWidth>,
    pub tile_index: Option<FieldWidth>,
    pub telemetry: Option<bool>,
    pub handshake: Option<bool>,
    /// Opcode names; replaces the preset's opcode set
    pub opcodes: Option<Vec<String>>,
    pub circle: Option<CircleWiring>,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            preset: "superset".into(),
            batch_len: None,
            tile_index: None,
            telemetry: None,
            handshake: None,
            opcodes: None,
            circle: None,
        }
    }
}

/// `[session]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionSection {
    /// `"monochrome"` or `"color"`
    pub system_id: String,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            system_id: "monochrome".into(),
        }
    }
}

/// `[frame]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrameConfig {
    /// Frames per second
    pub rate_hz: u32,
    /// Log session statistics every this many frames; 0 disables
    pub stats_interval: u32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            rate_hz: 60,
            stats_interval: 600,
        }
    }
}

/// `[input]` section
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    /// Controls reported as held on every frame
    pub held: Vec<String>,
}

impl ClientConfig {
    /// Load from a file; no path or a missing file gives the defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ClientError> {
        let Some(path) = path else {
            debug!("no configuration file given, using defaults");
            return Ok(Self::default());
        };

        if !path.exists() {
            info!(path = %path.display(), "configuration file not found, using defaults");
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path).map_err(|source| ClientError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text)?;
        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse TOML text
    pub fn from_toml(text: &str) -> Result<Self, ClientError> {
        Ok(toml::from_str(text)?)
    }

    /// Protocol version: the preset with the overrides applied
    pub fn protocol_version(&self) -> Result<ProtocolVersion, ClientError> {
        let section = &self.protocol;
        let mut version = ProtocolVersion::from_name(&section.preset).ok_or_else(|| {
            ClientError::InvalidConfig(format!(
                "unknown protocol preset {:?}, expected one of {:?}",
                section.preset,
                ProtocolVersion::NAMES
            ))
        })?;

        if let Some(width) = section.batch_len {
            version.batch_len = width;
        }
        if let Some(width) = section.tile_index {
            version.tile_index = width;
        }
        if let Some(telemetry) = section.telemetry {
            version.telemetry = telemetry;
        }
        if let Some(handshake) = section.handshake {
            version.handshake = handshake;
        }
        if let Some(circle) = section.circle {
            version.circle = circle;
        }
        if let Some(names) = &section.opcodes {
            version.opcodes = names
                .iter()
                .map(|name| {
                    Opcode::from_name(name)
                        .ok_or_else(|| ClientError::InvalidConfig(format!("unknown opcode {name:?}")))
                })
                .collect::<Result<OpcodeSet, _>>()?;
        }

        Ok(version)
    }

    /// Session identity
    pub fn system_id(&self) -> Result<SystemId, ClientError> {
        SystemId::from_name(&self.session.system_id).ok_or_else(|| {
            ClientError::InvalidConfig(format!("unknown system id {:?}", self.session.system_id))
        })
    }

    /// Everything the session needs
    pub fn session_config(&self) -> Result<SessionConfig, ClientError> {
        Ok(SessionConfig::new(self.protocol_version()?, self.system_id()?))
    }

    /// Controls held for the whole session
    pub fn held_buttons(&self) -> Result<Buttons, ClientError> {
        self.input.held.iter().try_fold(Buttons::NONE, |held, name| {
            Buttons::from_name(name)
                .map(|button| held | button)
                .ok_or_else(|| ClientError::InvalidConfig(format!("unknown control {name:?}")))
        })
    }

    /// Read timeout of the link
    pub fn read_timeout(&self) -> Result<Duration, ClientError> {
        if self.link.read_timeout_ms == 0 {
            return Err(ClientError::InvalidConfig("read_timeout_ms must be positive".into()));
        }
        Ok(Duration::from_millis(self.link.read_timeout_ms))
    }

    /// Duration of one frame
    pub fn frame_period(&self) -> Result<Duration, ClientError> {
        if self.frame.rate_hz == 0 {
            return Err(ClientError::InvalidConfig("rate_hz must be positive".into()));
        }
        Ok(Duration::from_secs(1) / self.frame.rate_hz)
    }
}
