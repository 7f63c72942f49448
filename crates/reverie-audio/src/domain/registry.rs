//! Audio track registry.

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::backend::AudioBackend;
use crate::domain::track::{Track, TrackId, TrackSource, TrackStatus};

/// The fixed set of tracks, loaded once and kept for the process lifetime.
#[derive(Debug, Default)]
pub struct TrackRegistry {
    tracks: BTreeMap<TrackId, Track>,
}

impl TrackRegistry {
    /// Loads every declared track through `backend`.
    ///
    /// A track that fails to load is kept as `Unavailable`; later operations
    /// on it are skipped.
    pub fn load(declarations: &[TrackSource], backend: &mut dyn AudioBackend) -> Self {
        let mut tracks = BTreeMap::new();
        for declaration in declarations {
            let status = match backend.load(&declaration.id, &declaration.source) {
                Ok(()) => {
                    info!(track = %declaration.id, source = %declaration.source, "track loaded");
                    TrackStatus::Ready
                }
                Err(error) => {
                    warn!(track = %declaration.id, %error, "track failed to load; it will stay silent");
                    TrackStatus::Unavailable
                }
            };
            let track = Track::new(declaration.clone(), status);
            if tracks.insert(declaration.id.clone(), track).is_some() {
                warn!(track = %declaration.id, "track declared twice; keeping the last declaration");
            }
        }
        Self { tracks }
    }

    /// Looks up a track.
    #[must_use]
    pub fn get(&self, id: &TrackId) -> Option<&Track> {
        self.tracks.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &TrackId) -> Option<&mut Track> {
        self.tracks.get_mut(id)
    }

    /// Returns `true` if `id` was declared, whether or not it loaded.
    #[must_use]
    pub fn contains(&self, id: &TrackId) -> bool {
        self.tracks.contains_key(id)
    }

    /// Iterates over all tracks in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Track> {
        self.tracks.values_mut()
    }

    /// Number of declared tracks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Returns `true` if no tracks were declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
