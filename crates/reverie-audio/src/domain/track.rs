//! Audio tracks and their volume ramps.

use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Name of a loaded audio track.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    /// Creates a track id.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TrackId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A track declaration: the id the narrative refers to and the opaque asset
/// reference handed to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackSource {
    /// Track id.
    pub id: TrackId,
    /// Asset reference, passed through to the backend unexamined.
    pub source: String,
}

impl TrackSource {
    /// Creates a track declaration.
    #[must_use]
    pub fn new(id: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: TrackId::new(id),
            source: source.into(),
        }
    }
}

/// A linear volume ramp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ramp {
    /// Volume at `start`.
    pub from: f32,
    /// Volume at `start + duration` and after.
    pub to: f32,
    /// When the ramp begins.
    pub start: Instant,
    /// How long the ramp lasts.
    pub duration: Duration,
}

impl Ramp {
    /// Volume at `now`. Instants before `start` read as `from`.
    #[must_use]
    pub fn value_at(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.start);
        if elapsed >= self.duration {
            return self.to;
        }
        let t = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        self.from + (self.to - self.from) * t
    }

    /// When the ramp reaches its target.
    #[must_use]
    pub fn end(&self) -> Instant {
        self.start + self.duration
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Level {
    Steady(f32),
    Ramping(Ramp),
}

/// Whether the backend managed to load a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackStatus {
    /// Loaded and playable.
    Ready,
    /// Failed to load; every operation on it is skipped.
    Unavailable,
}

/// A registered track with its playback flag and volume envelope.
#[derive(Debug, Clone)]
pub struct Track {
    id: TrackId,
    source: String,
    status: TrackStatus,
    playing: bool,
    level: Level,
}

impl Track {
    pub(crate) fn new(declaration: TrackSource, status: TrackStatus) -> Self {
        Self {
            id: declaration.id,
            source: declaration.source,
            status,
            playing: false,
            level: Level::Steady(0.0),
        }
    }

    /// Track id.
    #[must_use]
    pub fn id(&self) -> &TrackId {
        &self.id
    }

    /// Asset reference the track was loaded from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Load status.
    #[must_use]
    pub fn status(&self) -> TrackStatus {
        self.status
    }

    /// Returns `true` if the track loaded.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status == TrackStatus::Ready
    }

    /// Returns `true` while the track is playing (audible or not).
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Live volume at `now`.
    #[must_use]
    pub fn volume_at(&self, now: Instant) -> f32 {
        match self.level {
            Level::Steady(volume) => volume,
            Level::Ramping(ramp) => ramp.value_at(now),
        }
    }

    /// The volume the track is heading towards.
    #[must_use]
    pub fn target_volume(&self) -> f32 {
        match self.level {
            Level::Steady(volume) => volume,
            Level::Ramping(ramp) => ramp.to,
        }
    }

    /// The active ramp, if any.
    #[must_use]
    pub fn ramp(&self) -> Option<Ramp> {
        match self.level {
            Level::Steady(_) => None,
            Level::Ramping(ramp) => Some(ramp),
        }
    }

    /// Starts a ramp towards `to`, beginning at the live volume at `start`.
    /// A ramp issued mid-fade continues from wherever the old one had got to.
    pub(crate) fn ramp_to(&mut self, to: f32, start: Instant, duration: Duration) {
        let from = self.volume_at(start);
        let to = to.clamp(0.0, 1.0);
        self.level = if duration.is_zero() {
            Level::Steady(to)
        } else {
            Level::Ramping(Ramp {
                from,
                to,
                start,
                duration,
            })
        };
    }

    pub(crate) fn set_volume(&mut self, volume: f32) {
        self.level = Level::Steady(volume.clamp(0.0, 1.0));
    }

    pub(crate) fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn track() -> Track {
        Track::new(TrackSource::new("hero", "Songs/Hero.mp3"), TrackStatus::Ready)
    }

    #[test]
    fn test_ramp_interpolates_linearly() {
        let start = Instant::now();
        let ramp = Ramp {
            from: 0.0,
            to: 0.6,
            start,
            duration: ms(3000),
        };

        assert!((ramp.value_at(start + ms(1500)) - 0.3).abs() < 1e-6);
        assert!(ramp.value_at(start).abs() < f32::EPSILON);
        assert_eq!(ramp.end(), start + ms(3000));
    }

    #[test]
    fn test_ramp_holds_target_after_it_ends() {
        let start = Instant::now();
        let ramp = Ramp {
            from: 0.6,
            to: 0.0,
            start,
            duration: ms(2000),
        };

        assert_eq!(ramp.value_at(start + ms(2000)).to_bits(), 0.0_f32.to_bits());
        assert_eq!(ramp.value_at(start + ms(9000)).to_bits(), 0.0_f32.to_bits());
    }

    #[test]
    fn test_new_track_is_silent_and_stopped() {
        let track = track();

        assert!(!track.is_playing());
        assert!(track.volume_at(Instant::now()).abs() < f32::EPSILON);
        assert_eq!(track.source(), "Songs/Hero.mp3");
        assert!(track.ramp().is_none());
    }

    #[test]
    fn test_ramp_to_starts_from_live_volume() {
        // Arrange
        let start = Instant::now();
        let mut track = track();
        track.ramp_to(0.6, start, ms(2000));

        // Act: a fade-out issued halfway through the fade-in.
        track.ramp_to(0.0, start + ms(1000), ms(2000));

        // Assert
        let ramp = track.ramp().unwrap();
        assert!((ramp.from - 0.3).abs() < 1e-6);
        assert!(ramp.to.abs() < f32::EPSILON);
        assert!((track.volume_at(start + ms(2000)) - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_zero_duration_ramp_jumps() {
        let now = Instant::now();
        let mut track = track();

        track.ramp_to(0.6, now, Duration::ZERO);

        assert!(track.ramp().is_none());
        assert!((track.volume_at(now) - 0.6).abs() < f32::EPSILON);
    }

    #[test]
    fn test_volume_is_clamped() {
        let mut track = track();

        track.set_volume(1.7);

        assert!((track.target_volume() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_track_id_serializes_as_plain_string() {
        let id = TrackId::from("nash_plaj");

        assert_eq!(serde_json::to_value(&id).unwrap(), serde_json::json!("nash_plaj"));
        assert_eq!(id.to_string(), "nash_plaj");
    }
}
