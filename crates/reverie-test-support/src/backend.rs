//! Recording audio backend that captures every call for assertions.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use reverie_audio::backend::AudioBackend;
use reverie_audio::domain::track::TrackId;
use reverie_core::error::DomainError;

/// One call made against the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    /// `load(track, source)`.
    Load(TrackId, String),
    /// `play(track)`.
    Play(TrackId),
    /// `pause(track)`.
    Pause(TrackId),
    /// `stop(track)`.
    Stop(TrackId),
    /// `set_volume(track, volume)`.
    SetVolume(TrackId, f32),
}

/// A backend that records every call. Clones share the same log, so a test
/// can keep one handle while the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    calls: Arc<Mutex<Vec<BackendCall>>>,
    missing: Arc<BTreeSet<String>>,
}

impl RecordingBackend {
    /// Creates a backend where every load succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend whose `load` fails for the given track ids.
    #[must_use]
    pub fn with_missing(tracks: &[&str]) -> Self {
        Self {
            calls: Arc::default(),
            missing: Arc::new(tracks.iter().map(|t| (*t).to_owned()).collect()),
        }
    }

    /// Returns a snapshot of all recorded calls.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Forgets everything recorded so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Counts recorded calls matching `predicate`.
    #[must_use]
    pub fn count(&self, predicate: impl Fn(&BackendCall) -> bool) -> usize {
        self.calls().iter().filter(|call| predicate(call)).count()
    }

    /// The last volume pushed for `track`.
    #[must_use]
    pub fn last_volume(&self, track: &str) -> Option<f32> {
        self.calls().iter().rev().find_map(|call| match call {
            BackendCall::SetVolume(id, volume) if id.as_str() == track => Some(*volume),
            _ => None,
        })
    }

    fn record(&self, call: BackendCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl AudioBackend for RecordingBackend {
    fn load(&mut self, track: &TrackId, source: &str) -> Result<(), DomainError> {
        self.record(BackendCall::Load(track.clone(), source.to_owned()));
        if self.missing.contains(track.as_str()) {
            return Err(DomainError::Asset(format!("{source}: no such file")));
        }
        Ok(())
    }

    fn play(&mut self, track: &TrackId) {
        self.record(BackendCall::Play(track.clone()));
    }

    fn pause(&mut self, track: &TrackId) {
        self.record(BackendCall::Pause(track.clone()));
    }

    fn stop(&mut self, track: &TrackId) {
        self.record(BackendCall::Stop(track.clone()));
    }

    fn set_volume(&mut self, track: &TrackId, volume: f32) {
        self.record(BackendCall::SetVolume(track.clone(), volume));
    }
}
