//! Render targets for Tilelink
//!
//! This crate provides:
//! - `RenderTarget` trait: every drawing and state operation the command
//!   stream can request (tile/sprite memory, text, primitives)
//! - `DrawStyle` for the colour and mode primitives are drawn with
//! - `TileScreen`: a complete in-memory render target
//!
//! # Architecture
//!
//! The dispatcher in `tilelink-core` translates decoded commands into calls on
//! a `RenderTarget`. A handheld implements the trait over its video memory; a
//! host or a test uses `TileScreen`, which keeps the background grid, sprite
//! table, pattern stores and a pixel bitmap in plain arrays.

#![no_std]
#![deny(unsafe_code)]

pub mod backend;
pub mod screen;

// Re-export key types
pub use backend::{DisplayError, DrawMode, DrawStyle, Fill, RenderTarget};
pub use screen::{Sprite, TileScreen, PATTERN_COUNT, SCREEN_HEIGHT, SCREEN_WIDTH, SPRITE_COUNT};
