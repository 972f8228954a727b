//! Input source for a client without physical controls

use tilelink_hal::InputPoller;
use tilelink_protocol::Buttons;

/// Reports a fixed set of held controls every frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeldButtons(Buttons);

impl HeldButtons {
    pub fn new(buttons: Buttons) -> Self {
        Self(buttons)
    }
}

impl InputPoller for HeldButtons {
    fn poll_input(&mut self) -> u8 {
        self.0.bits()
    }
}
