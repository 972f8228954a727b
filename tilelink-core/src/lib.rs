//! Platform-agnostic client logic
//!
//! This crate contains everything between the channel and the render target
//! that does not depend on a particular platform:
//!
//! - Operation dispatch table and per-frame batch execution
//! - Telemetry reporter and session handshake
//! - Frame loop state machine
//! - Session configuration

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

#[macro_use]
mod fmt;

pub mod batch;
pub mod config;
pub mod dispatch;
pub mod handshake;
pub mod session;
pub mod state;
pub mod telemetry;

#[cfg(test)]
mod recording;

pub use batch::{decode_batch, BatchOutcome, FrameReport};
pub use config::SessionConfig;
pub use dispatch::{DispatchError, DispatchTable, Entry, Operation};
pub use handshake::send_handshake;
pub use session::{Session, SessionError, SessionStats};
pub use state::{FrameEvent, FrameState};
pub use telemetry::TelemetryReporter;
