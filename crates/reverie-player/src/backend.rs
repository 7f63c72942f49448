//! Audio backend that plays nothing and logs what it would do.

use std::path::PathBuf;

use reverie_audio::backend::AudioBackend;
use reverie_audio::domain::track::TrackId;
use reverie_core::error::DomainError;
use tracing::{debug, trace};

/// Checks that every track file exists under the asset root, then records
/// playback calls in the log instead of producing sound.
#[derive(Debug, Clone)]
pub struct LoggingBackend {
    asset_root: PathBuf,
}

impl LoggingBackend {
    /// Creates a backend resolving sources against `asset_root`.
    #[must_use]
    pub fn new(asset_root: impl Into<PathBuf>) -> Self {
        Self {
            asset_root: asset_root.into(),
        }
    }
}

impl AudioBackend for LoggingBackend {
    fn load(&mut self, track: &TrackId, source: &str) -> Result<(), DomainError> {
        let path = self.asset_root.join(source);
        if !path.is_file() {
            return Err(DomainError::Asset(format!(
                "{} does not exist",
                path.display()
            )));
        }
        debug!(%track, path = %path.display(), "track loaded");
        Ok(())
    }

    fn play(&mut self, track: &TrackId) {
        debug!(%track, "play");
    }

    fn pause(&mut self, track: &TrackId) {
        debug!(%track, "pause");
    }

    fn stop(&mut self, track: &TrackId) {
        debug!(%track, "stop");
    }

    fn set_volume(&mut self, track: &TrackId, volume: f32) {
        trace!(%track, volume, "set volume");
    }
}
