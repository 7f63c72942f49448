//! Reverie core: shared timing and domain abstractions.
//!
//! This crate defines the clock, timer, error and event types that the audio
//! engine and the scene sequencer both build on. It contains no I/O.

pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod timer;
