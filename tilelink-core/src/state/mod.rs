//! Frame loop state machine
//!
//! The client runs one fixed cycle per display frame. The only way out is the
//! host going away; there is no other terminal state.

pub mod events;
pub mod machine;

pub use events::FrameEvent;
pub use machine::FrameState;
