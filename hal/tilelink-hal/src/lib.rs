//! Tilelink Hardware Abstraction Layer
//!
//! This crate defines the traits the client consumes from its platform. The
//! protocol and frame loop are written against these traits only, so the same
//! client logic runs against a memory-mapped register on a handheld, a TCP
//! socket on a host, or a scripted channel in tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  tilelink-core (frame loop, dispatch)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tilelink-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┼───────────┐
//!         ▼           ▼           ▼
//!   ┌──────────┐ ┌──────────┐ ┌──────────┐
//!   │ register │ │   TCP    │ │ scripted │
//!   └──────────┘ └──────────┘ └──────────┘
//! ```
//!
//! # Traits
//!
//! - [`channel::Channel`] - Duplex byte exchange with the host
//! - [`register::ByteRegister`] - A single shared byte slot
//! - [`input::InputPoller`] - Sampling of the pressed controls
//! - [`clock::FrameClock`] - Frame presentation and vsync wait

#![no_std]
#![deny(unsafe_code)]

pub mod channel;
pub mod clock;
pub mod input;
pub mod register;
pub mod scripted;

// Re-export key traits at crate root for convenience
pub use channel::{Channel, ChannelError};
pub use clock::FrameClock;
pub use input::InputPoller;
pub use register::{AtomicRegister, ByteRegister, RegisterChannel};
pub use scripted::ScriptedChannel;
