//! Query handlers for the scene sequencing context.

use reverie_core::clock::Clock;
use serde::Serialize;

use crate::domain::aggregates::SceneSequencer;
use crate::domain::scene::SceneId;

/// Read-only view of one track.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackView {
    /// Track id.
    pub id: String,
    /// Whether the backend loaded it.
    pub available: bool,
    /// Whether it is playing.
    pub playing: bool,
    /// Live volume.
    pub volume: f32,
}

/// Read-only view of the stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageView {
    /// Scene on screen.
    pub current_scene: SceneId,
    /// Whether a transition is running.
    pub transition_in_flight: bool,
    /// Target of the running transition.
    pub pending_scene: Option<SceneId>,
    /// Dissolve mask opacity.
    pub mask_opacity: f32,
    /// Current audio track.
    pub current_track: Option<String>,
    /// Audio mute flag.
    pub muted: bool,
    /// Every registered track.
    pub tracks: Vec<TrackView>,
}

/// Snapshots the sequencer at the clock's instant.
#[must_use]
pub fn get_stage_view(sequencer: &SceneSequencer, clock: &dyn Clock) -> StageView {
    let now = clock.now();
    let audio = sequencer.audio();
    StageView {
        current_scene: sequencer.current_scene(),
        transition_in_flight: sequencer.transition_in_flight(),
        pending_scene: sequencer.pending_target(),
        mask_opacity: sequencer.mask_opacity(now),
        current_track: audio.current_track().map(ToString::to_string),
        muted: audio.is_muted(),
        tracks: audio
            .registry()
            .iter()
            .map(|track| TrackView {
                id: track.id().to_string(),
                available: track.is_available(),
                playing: track.is_playing(),
                volume: track.volume_at(now),
            })
            .collect(),
    }
}
