//! Session identity sent during the handshake

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Client hardware variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum SystemId {
    /// Four-shade monochrome handheld
    #[default]
    Monochrome = 0,
    /// Colour handheld
    Color = 1,
}

impl SystemId {
    /// Parse an id from its wire byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(SystemId::Monochrome),
            1 => Some(SystemId::Color),
            _ => None,
        }
    }

    /// Wire byte
    pub const fn to_byte(self) -> u8 {
        self as u8
    }

    /// Look up an id by name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "monochrome" => Some(SystemId::Monochrome),
            "color" | "colour" => Some(SystemId::Color),
            _ => None,
        }
    }
}
