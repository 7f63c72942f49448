//! Domain model for the audio context.

pub mod cue;
pub mod engine;
pub mod registry;
pub mod track;
