//! Reverie: audio track registry and crossfade engine.
//!
//! Owns a fixed set of named looping tracks and turns narrative audio cues
//! (fade-in, cross-fade, play, silence) into time-driven volume ramps. Actual
//! sound output happens behind the [`backend::AudioBackend`] seam.

pub mod backend;
pub mod domain;
