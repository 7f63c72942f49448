//! Audio output seam.

use reverie_core::error::DomainError;

use crate::domain::track::TrackId;

/// Something that can actually make noise.
///
/// The engine never decodes or mixes audio itself: it tells a backend which
/// tracks are playing and at what volume. Implementations must not panic on
/// ids they failed to load.
pub trait AudioBackend: std::fmt::Debug {
    /// Prepares `source` for playback under `track`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Asset` if the source cannot be opened or decoded.
    fn load(&mut self, track: &TrackId, source: &str) -> Result<(), DomainError>;

    /// Starts or resumes looping playback.
    fn play(&mut self, track: &TrackId);

    /// Pauses playback, keeping the position.
    fn pause(&mut self, track: &TrackId);

    /// Halts playback and rewinds.
    fn stop(&mut self, track: &TrackId);

    /// Sets the output gain in `[0, 1]`.
    fn set_volume(&mut self, track: &TrackId, volume: f32);
}

/// A backend that accepts every call and produces no sound.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBackend;

impl AudioBackend for NullBackend {
    fn load(&mut self, _track: &TrackId, _source: &str) -> Result<(), DomainError> {
        Ok(())
    }

    fn play(&mut self, _track: &TrackId) {}

    fn pause(&mut self, _track: &TrackId) {}

    fn stop(&mut self, _track: &TrackId) {}

    fn set_volume(&mut self, _track: &TrackId, _volume: f32) {}
}
