//! Input polling abstraction

/// Source of the local input state
///
/// Implementations read the physical controls and return a bitmask with one
/// bit per pressed control. The value is sampled fresh on every call.
pub trait InputPoller {
    /// Sample the currently pressed controls
    fn poll_input(&mut self) -> u8;
}

/// A poller whose controls never change
impl InputPoller for u8 {
    fn poll_input(&mut self) -> u8 {
        *self
    }
}
