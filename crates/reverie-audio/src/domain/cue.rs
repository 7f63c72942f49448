//! Audio cues: the action a scene transition asks the engine to perform.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::track::TrackId;

/// One narrative audio action.
///
/// Serialized with an `action` tag, e.g.
/// `{ action: cross_fade, from: hero, to: afou, duration_ms: 2000 }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AudioCue {
    /// Start `track` (if needed) and ramp it up to the ambient volume.
    FadeIn {
        /// Track to bring in.
        track: TrackId,
        /// Ramp length in milliseconds.
        duration_ms: u64,
    },
    /// Fade `from` out and, after the lead delay, fade `to` in.
    CrossFade {
        /// Outgoing track.
        from: TrackId,
        /// Incoming track.
        to: TrackId,
        /// Ramp length in milliseconds, for both tracks.
        duration_ms: u64,
    },
    /// Like `FadeIn`, but fades out a different current track first.
    Play {
        /// Track to bring in.
        track: TrackId,
        /// Ramp length in milliseconds.
        duration_ms: u64,
    },
    /// Fade out whatever is current and leave nothing current.
    Silence {
        /// Ramp length in milliseconds.
        duration_ms: u64,
    },
    /// Leave the audio exactly as it is.
    Hold,
}

impl AudioCue {
    /// Shorthand for [`AudioCue::FadeIn`].
    #[must_use]
    pub fn fade_in(track: impl Into<String>, duration_ms: u64) -> Self {
        Self::FadeIn {
            track: TrackId::new(track),
            duration_ms,
        }
    }

    /// Shorthand for [`AudioCue::CrossFade`].
    #[must_use]
    pub fn cross_fade(from: impl Into<String>, to: impl Into<String>, duration_ms: u64) -> Self {
        Self::CrossFade {
            from: TrackId::new(from),
            to: TrackId::new(to),
            duration_ms,
        }
    }

    /// Shorthand for [`AudioCue::Play`].
    #[must_use]
    pub fn play(track: impl Into<String>, duration_ms: u64) -> Self {
        Self::Play {
            track: TrackId::new(track),
            duration_ms,
        }
    }

    /// Shorthand for [`AudioCue::Silence`].
    #[must_use]
    pub fn silence(duration_ms: u64) -> Self {
        Self::Silence { duration_ms }
    }

    /// Short name used in logs.
    #[must_use]
    pub fn action(&self) -> &'static str {
        match self {
            Self::FadeIn { .. } => "fade_in",
            Self::CrossFade { .. } => "cross_fade",
            Self::Play { .. } => "play",
            Self::Silence { .. } => "silence",
            Self::Hold => "hold",
        }
    }

    /// Ramp length, zero for `Hold`.
    #[must_use]
    pub fn duration(&self) -> Duration {
        match self {
            Self::FadeIn { duration_ms, .. }
            | Self::CrossFade { duration_ms, .. }
            | Self::Play { duration_ms, .. }
            | Self::Silence { duration_ms } => Duration::from_millis(*duration_ms),
            Self::Hold => Duration::ZERO,
        }
    }

    /// Every track the cue names.
    #[must_use]
    pub fn tracks(&self) -> Vec<&TrackId> {
        match self {
            Self::FadeIn { track, .. } | Self::Play { track, .. } => vec![track],
            Self::CrossFade { from, to, .. } => vec![from, to],
            Self::Silence { .. } | Self::Hold => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_deserializes_from_tagged_map() {
        let json = serde_json::json!({
            "action": "cross_fade",
            "from": "hero",
            "to": "da_sme_tam",
            "duration_ms": 2000
        });

        let cue: AudioCue = serde_json::from_value(json).unwrap();

        assert_eq!(cue, AudioCue::cross_fade("hero", "da_sme_tam", 2000));
    }

    #[test]
    fn test_hold_deserializes_without_fields() {
        let cue: AudioCue = serde_json::from_value(serde_json::json!({ "action": "hold" })).unwrap();

        assert_eq!(cue, AudioCue::Hold);
        assert_eq!(cue.duration(), Duration::ZERO);
        assert!(cue.tracks().is_empty());
    }

    #[test]
    fn test_tracks_lists_both_sides_of_a_cross_fade() {
        let cue = AudioCue::cross_fade("nash_plaj", "chernova", 2000);

        let names: Vec<&str> = cue.tracks().into_iter().map(TrackId::as_str).collect();

        assert_eq!(names, vec!["nash_plaj", "chernova"]);
        assert_eq!(cue.action(), "cross_fade");
        assert_eq!(cue.duration(), Duration::from_millis(2000));
    }
}
