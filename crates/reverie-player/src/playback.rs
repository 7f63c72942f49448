//! Audio backend that plays tracks through the default output device.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use reverie_audio::backend::AudioBackend;
use reverie_audio::domain::track::TrackId;
use reverie_core::error::DomainError;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tracing::{debug, warn};

use crate::error::AppError;

struct Channel {
    path: PathBuf,
    sink: Sink,
}

/// One looping sink per track, created paused at zero volume.
pub struct RodioBackend {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    asset_root: PathBuf,
    channels: BTreeMap<TrackId, Channel>,
}

impl fmt::Debug for RodioBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RodioBackend")
            .field("asset_root", &self.asset_root)
            .field("tracks", &self.channels.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

fn looping_sink(handle: &OutputStreamHandle, path: &Path) -> Result<Sink, DomainError> {
    let file = File::open(path)
        .map_err(|e| DomainError::Asset(format!("{}: {e}", path.display())))?;
    let decoder = Decoder::new(BufReader::new(file))
        .map_err(|e| DomainError::Asset(format!("{}: {e}", path.display())))?;
    let sink = Sink::try_new(handle)
        .map_err(|e| DomainError::Asset(format!("no sink for {}: {e}", path.display())))?;
    sink.pause();
    sink.set_volume(0.0);
    sink.append(decoder.repeat_infinite());
    Ok(sink)
}

impl RodioBackend {
    /// Opens the default output device.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Audio` if no output device is available.
    pub fn open(asset_root: impl Into<PathBuf>) -> Result<Self, AppError> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| AppError::Audio(format!("failed to open output stream: {e}")))?;
        Ok(Self {
            _stream: stream,
            handle,
            asset_root: asset_root.into(),
            channels: BTreeMap::new(),
        })
    }

    fn channel(&self, track: &TrackId) -> Option<&Channel> {
        self.channels.get(track)
    }
}

impl AudioBackend for RodioBackend {
    fn load(&mut self, track: &TrackId, source: &str) -> Result<(), DomainError> {
        let path = self.asset_root.join(source);
        let sink = looping_sink(&self.handle, &path)?;
        debug!(%track, path = %path.display(), "track decoded");
        self.channels.insert(track.clone(), Channel { path, sink });
        Ok(())
    }

    fn play(&mut self, track: &TrackId) {
        if let Some(channel) = self.channel(track) {
            channel.sink.play();
        }
    }

    fn pause(&mut self, track: &TrackId) {
        if let Some(channel) = self.channel(track) {
            channel.sink.pause();
        }
    }

    fn stop(&mut self, track: &TrackId) {
        // Sinks cannot seek; a stopped track is re-decoded from the start.
        let Some(channel) = self.channels.get_mut(track) else {
            return;
        };
        channel.sink.stop();
        match looping_sink(&self.handle, &channel.path) {
            Ok(sink) => channel.sink = sink,
            Err(err) => warn!(%track, error = %err, "could not rewind track"),
        }
    }

    fn set_volume(&mut self, track: &TrackId, volume: f32) {
        if let Some(channel) = self.channel(track) {
            channel.sink.set_volume(volume);
        }
    }
}
