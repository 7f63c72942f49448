//! Audio cue bindings, keyed by the scene being entered.

use std::collections::BTreeMap;

use reverie_audio::domain::cue::AudioCue;

use super::scene::SceneId;

/// Maps a target scene to the audio cue dispatched when a transition into it
/// starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CueTable {
    cues: BTreeMap<SceneId, AudioCue>,
}

impl CueTable {
    /// Builds a table from `(target, cue)` pairs.
    #[must_use]
    pub fn new(cues: BTreeMap<SceneId, AudioCue>) -> Self {
        Self { cues }
    }

    /// Bindings of the shipped narrative.
    #[must_use]
    pub fn reference() -> Self {
        use SceneId::{
            Belogradchik, Crete, Denmark, Finale, Fireworks, Forever, Globe, Memories, Tryavna,
            Vratsa, VratsaReturn, Wish,
        };
        Self::default()
            .with_cue(Fireworks, AudioCue::fade_in("chernova", 3000))
            .with_cue(Globe, AudioCue::Hold)
            .with_cue(Belogradchik, AudioCue::cross_fade("chernova", "hero", 2000))
            .with_cue(Tryavna, AudioCue::cross_fade("hero", "da_sme_tam", 2000))
            .with_cue(Crete, AudioCue::cross_fade("da_sme_tam", "afou", 2000))
            .with_cue(Vratsa, AudioCue::silence(2000))
            .with_cue(VratsaReturn, AudioCue::Hold)
            .with_cue(Denmark, AudioCue::play("nash_plaj", 2000))
            .with_cue(Memories, AudioCue::Hold)
            .with_cue(Finale, AudioCue::cross_fade("nash_plaj", "chernova", 2000))
            .with_cue(Wish, AudioCue::Hold)
            .with_cue(Forever, AudioCue::Hold)
    }

    /// Adds or replaces the cue for `target`.
    #[must_use]
    pub fn with_cue(mut self, target: SceneId, cue: AudioCue) -> Self {
        self.cues.insert(target, cue);
        self
    }

    /// Removes the cue for `target`.
    #[must_use]
    pub fn without(mut self, target: SceneId) -> Self {
        self.cues.remove(&target);
        self
    }

    /// The cue bound to entering `target`.
    #[must_use]
    pub fn cue_for(&self, target: SceneId) -> Option<&AudioCue> {
        self.cues.get(&target)
    }

    /// Every binding in scene order.
    pub fn iter(&self) -> impl Iterator<Item = (SceneId, &AudioCue)> {
        self.cues.iter().map(|(scene, cue)| (*scene, cue))
    }
}
