//! Reverie player: terminal host for a Reverie narrative.
//!
//! Wires the scene sequencer to stdin, a terminal renderer per scene and an
//! audio backend, and drives every timer from a tokio event loop.

pub mod backend;
pub mod config;
pub mod driver;
pub mod error;
#[cfg(feature = "playback")]
pub mod playback;
pub mod renderer;
