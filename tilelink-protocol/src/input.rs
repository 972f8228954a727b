//! Input bitmask reported once per frame

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Set of pressed controls, one bit each
///
/// Bit layout, high to low: Start, Select, B, A, Down, Up, Left, Right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct Buttons(u8);

impl Buttons {
    pub const NONE: Self = Self(0);
    pub const RIGHT: Self = Self(0x01);
    pub const LEFT: Self = Self(0x02);
    pub const UP: Self = Self(0x04);
    pub const DOWN: Self = Self(0x08);
    pub const A: Self = Self(0x10);
    pub const B: Self = Self(0x20);
    pub const SELECT: Self = Self(0x40);
    pub const START: Self = Self(0x80);

    const NAMED: [(&'static str, Buttons); 8] = [
        ("start", Self::START),
        ("select", Self::SELECT),
        ("b", Self::B),
        ("a", Self::A),
        ("down", Self::DOWN),
        ("up", Self::UP),
        ("left", Self::LEFT),
        ("right", Self::RIGHT),
    ];

    /// Wrap a raw bitmask
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Raw bitmask as sent on the wire
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Check if every control in `other` is pressed
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Check if nothing is pressed
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Add controls
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Remove controls
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Look up a single control by name, case-insensitive
    pub fn from_name(name: &str) -> Option<Self> {
        Self::NAMED
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(name))
            .map(|(_, button)| *button)
    }

    /// Names of the pressed controls, Start first
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        Self::NAMED
            .into_iter()
            .filter(move |(_, button)| self.contains(*button))
            .map(|(name, _)| name)
    }
}

impl core::ops::BitOr for Buttons {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl From<u8> for Buttons {
    fn from(bits: u8) -> Self {
        Self(bits)
    }
}

impl From<Buttons> for u8 {
    fn from(buttons: Buttons) -> Self {
        buttons.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_layout() {
        assert_eq!(Buttons::START.bits(), 0x80);
        assert_eq!(Buttons::SELECT.bits(), 0x40);
        assert_eq!(Buttons::B.bits(), 0x20);
        assert_eq!(Buttons::A.bits(), 0x10);
        assert_eq!(Buttons::DOWN.bits(), 0x08);
        assert_eq!(Buttons::UP.bits(), 0x04);
        assert_eq!(Buttons::LEFT.bits(), 0x02);
        assert_eq!(Buttons::RIGHT.bits(), 0x01);
    }

    #[test]
    fn test_insert_remove_contains() {
        let mut buttons = Buttons::NONE;
        assert!(buttons.is_empty());

        buttons.insert(Buttons::A | Buttons::START);
        assert!(buttons.contains(Buttons::A));
        assert!(buttons.contains(Buttons::START));
        assert!(!buttons.contains(Buttons::B));
        assert_eq!(buttons.bits(), 0x90);

        buttons.remove(Buttons::A);
        assert_eq!(buttons, Buttons::START);
    }

    #[test]
    fn test_names() {
        assert_eq!(Buttons::from_name("Start"), Some(Buttons::START));
        assert_eq!(Buttons::from_name("left"), Some(Buttons::LEFT));
        assert_eq!(Buttons::from_name("turbo"), None);

        let pressed = Buttons::from_bits(0x81);
        let names: heapless::Vec<&str, 8> = pressed.names().collect();
        assert_eq!(names, ["start", "right"]);
    }
}
