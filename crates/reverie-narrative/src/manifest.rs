//! Narrative manifest: the data that defines one narrative.
//!
//! Tracks, engine tunables, dissolve length, the scene graph, cue bindings
//! and the restart plan, loadable from YAML and validated before a
//! sequencer is built from it.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::time::Duration;

use reverie_audio::backend::AudioBackend;
use reverie_audio::domain::cue::AudioCue;
use reverie_audio::domain::engine::{CrossfadeEngine, EngineSettings};
use reverie_audio::domain::track::TrackSource;
use reverie_core::error::DomainError;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::aggregates::{RestartPlan, SceneSequencer, StageSettings};
use crate::domain::bindings::CueTable;
use crate::domain::graph::SceneGraph;
use crate::domain::scene::SceneId;

/// The shipped narrative in YAML form.
pub const REFERENCE_MANIFEST_YAML: &str = include_str!("../manifests/reference.yaml");

fn default_dissolve_ms() -> u64 {
    1200
}

fn default_initial() -> SceneId {
    SceneId::Gate
}

/// Everything needed to build a [`SceneSequencer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NarrativeManifest {
    /// Track declarations, loaded in order.
    pub tracks: Vec<TrackSource>,
    /// Crossfade engine tunables.
    #[serde(default)]
    pub audio: EngineSettings,
    /// Dissolve length in milliseconds.
    #[serde(default = "default_dissolve_ms")]
    pub dissolve_ms: u64,
    /// Scene shown at startup.
    #[serde(default = "default_initial")]
    pub initial: SceneId,
    /// Explicit per-origin edges.
    #[serde(default)]
    pub edges: BTreeMap<SceneId, SceneId>,
    /// Cue bound to entering each scene.
    #[serde(default)]
    pub cues: BTreeMap<SceneId, AudioCue>,
    /// Replay behavior.
    #[serde(default)]
    pub restart: RestartPlan,
}

impl NarrativeManifest {
    /// The shipped narrative.
    #[must_use]
    pub fn reference() -> Self {
        let tracks = ["chernova", "hero", "da_sme_tam", "afou", "nash_plaj"]
            .into_iter()
            .map(|id| TrackSource::new(id, format!("songs/{id}.mp3")))
            .collect();
        Self {
            tracks,
            audio: EngineSettings::default(),
            dissolve_ms: default_dissolve_ms(),
            initial: default_initial(),
            edges: SceneGraph::reference().edges().collect(),
            cues: CueTable::reference()
                .iter()
                .map(|(scene, cue)| (scene, cue.clone()))
                .collect(),
            restart: RestartPlan::default(),
        }
    }

    /// Parses a manifest from YAML text.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Configuration` if the text is not a valid
    /// manifest document.
    pub fn from_yaml_str(text: &str) -> Result<Self, DomainError> {
        serde_yaml::from_str(text)
            .map_err(|e| DomainError::Configuration(format!("invalid narrative manifest: {e}")))
    }

    /// Reads and parses a manifest file.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Configuration` if the file cannot be read or
    /// parsed.
    pub fn load(path: &Path) -> Result<Self, DomainError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            DomainError::Configuration(format!("cannot read manifest {}: {e}", path.display()))
        })?;
        let manifest = Self::from_yaml_str(&text)?;
        info!(path = %path.display(), tracks = manifest.tracks.len(), "narrative manifest loaded");
        Ok(manifest)
    }

    /// The scene graph described by this manifest.
    #[must_use]
    pub fn graph(&self) -> SceneGraph {
        SceneGraph::new(self.edges.clone())
    }

    /// The cue bindings described by this manifest.
    #[must_use]
    pub fn cue_table(&self) -> CueTable {
        CueTable::new(self.cues.clone())
    }

    /// Stage tunables described by this manifest.
    #[must_use]
    pub fn stage_settings(&self) -> StageSettings {
        StageSettings {
            initial: self.initial,
            dissolve: Duration::from_millis(self.dissolve_ms),
            restart: self.restart.clone(),
        }
    }

    /// Checks the manifest for structural errors.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Configuration` when a track id is declared
    /// twice, a cue names an undeclared track, an engine tunable is out of
    /// range, the graph walk loops, or the restart scene is unreachable or
    /// terminal.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut declared = BTreeSet::new();
        for track in &self.tracks {
            if !declared.insert(track.id.as_str()) {
                return Err(DomainError::Configuration(format!(
                    "track {} is declared twice",
                    track.id
                )));
            }
        }

        let bound = self
            .cues
            .iter()
            .map(|(scene, cue)| (scene.as_str(), cue))
            .chain(std::iter::once(("restart", &self.restart.cue)));
        for (owner, cue) in bound {
            if let Some(track) = cue.tracks().into_iter().find(|t| !declared.contains(t.as_str())) {
                return Err(DomainError::Configuration(format!(
                    "cue for {owner} names undeclared track {track}"
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.audio.ambient_volume) {
            return Err(DomainError::Configuration(format!(
                "ambient_volume must be within 0..=1, got {}",
                self.audio.ambient_volume
            )));
        }
        if !(0.0..=1.0).contains(&self.audio.crossfade_lead) {
            return Err(DomainError::Configuration(format!(
                "crossfade_lead must be within 0..=1, got {}",
                self.audio.crossfade_lead
            )));
        }

        let path = self.graph().walk(self.initial)?;
        let terminal = path.last().copied().unwrap_or(self.initial);
        if !path.contains(&self.restart.scene) {
            return Err(DomainError::Configuration(format!(
                "restart scene {} is not reachable from {}",
                self.restart.scene, self.initial
            )));
        }
        if self.restart.scene == terminal {
            return Err(DomainError::Configuration(format!(
                "restart scene {} is the terminal scene",
                self.restart.scene
            )));
        }

        for scene in path.iter().skip(1) {
            if !self.cues.contains_key(scene) {
                warn!(scene = %scene, "reachable scene has no audio cue");
            }
        }
        Ok(())
    }

    /// Validates the manifest, loads its tracks through `backend` and builds
    /// a sequencer showing the initial scene.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Configuration` if validation fails. Track load
    /// failures are not errors; those tracks become unavailable.
    pub fn build(&self, backend: Box<dyn AudioBackend>) -> Result<SceneSequencer, DomainError> {
        self.validate()?;
        let audio = CrossfadeEngine::new(&self.tracks, backend, self.audio);
        Ok(SceneSequencer::new(
            self.graph(),
            self.cue_table(),
            self.stage_settings(),
            audio,
        ))
    }
}

#[cfg(test)]
mod tests {
    use reverie_audio::backend::NullBackend;
    use reverie_audio::domain::track::TrackId;
    use reverie_test_support::RecordingBackend;

    use super::*;

    fn assert_configuration_error(result: Result<(), DomainError>, needle: &str) {
        match result {
            Err(DomainError::Configuration(message)) => {
                assert!(message.contains(needle), "{message:?} lacks {needle:?}");
            }
            other => panic!("expected Configuration error, got {other:?}"),
        }
    }

    #[test]
    fn test_shipped_yaml_matches_reference() {
        let parsed = NarrativeManifest::from_yaml_str(REFERENCE_MANIFEST_YAML).unwrap();

        assert_eq!(parsed, NarrativeManifest::reference());
    }

    #[test]
    fn test_reference_validates() {
        assert_eq!(NarrativeManifest::reference().validate(), Ok(()));
    }

    #[test]
    fn test_defaults_fill_optional_fields() {
        // Arrange
        let yaml = "tracks:\n  - id: chernova\n    source: a.mp3\n";

        // Act
        let manifest = NarrativeManifest::from_yaml_str(yaml).unwrap();

        // Assert
        assert_eq!(manifest.dissolve_ms, 1200);
        assert_eq!(manifest.initial, SceneId::Gate);
        assert_eq!(manifest.restart, RestartPlan::default());
        assert_eq!(manifest.audio, EngineSettings::default());
        assert!(manifest.cues.is_empty());
        assert_eq!(manifest.validate(), Ok(()));
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let yaml = "tracks: []\ncolour: blue\n";

        let result = NarrativeManifest::from_yaml_str(yaml);

        assert!(matches!(result, Err(DomainError::Configuration(_))));
    }

    #[test]
    fn test_undeclared_track_is_rejected() {
        // Arrange
        let mut manifest = NarrativeManifest::reference();
        manifest.tracks.retain(|t| t.id != TrackId::from("afou"));

        // Act
        let result = manifest.validate();

        // Assert
        assert_configuration_error(result, "afou");
    }

    #[test]
    fn test_undeclared_restart_track_is_rejected() {
        let mut manifest = NarrativeManifest::reference();
        manifest.restart.cue = AudioCue::fade_in("ghost", 3000);

        assert_configuration_error(manifest.validate(), "restart");
    }

    #[test]
    fn test_duplicate_track_is_rejected() {
        let mut manifest = NarrativeManifest::reference();
        manifest.tracks.push(TrackSource::new("hero", "elsewhere.mp3"));

        assert_configuration_error(manifest.validate(), "declared twice");
    }

    #[test]
    fn test_looping_graph_is_rejected() {
        let mut manifest = NarrativeManifest::reference();
        manifest.edges.insert(SceneId::Finale, SceneId::Globe);

        assert_configuration_error(manifest.validate(), "loops");
    }

    #[test]
    fn test_unreachable_restart_scene_is_rejected() {
        let mut manifest = NarrativeManifest::reference();
        manifest.initial = SceneId::Denmark;

        assert_configuration_error(manifest.validate(), "not reachable");
    }

    #[test]
    fn test_terminal_restart_scene_is_rejected() {
        let mut manifest = NarrativeManifest::reference();
        manifest.restart.scene = SceneId::Forever;

        assert_configuration_error(manifest.validate(), "terminal");
    }

    #[test]
    fn test_out_of_range_ambient_volume_is_rejected() {
        let mut manifest = NarrativeManifest::reference();
        manifest.audio.ambient_volume = 1.5;

        assert_configuration_error(manifest.validate(), "ambient_volume");
    }

    #[test]
    fn test_missing_binding_is_not_a_load_error() {
        let mut manifest = NarrativeManifest::reference();
        manifest.cues.remove(&SceneId::Globe);

        assert_eq!(manifest.validate(), Ok(()));
    }

    #[test]
    fn test_build_loads_every_track() {
        // Arrange
        let backend = RecordingBackend::with_missing(&["hero"]);

        // Act
        let sequencer = NarrativeManifest::reference()
            .build(Box::new(backend.clone()))
            .unwrap();

        // Assert
        assert_eq!(sequencer.current_scene(), SceneId::Gate);
        assert_eq!(sequencer.audio().registry().len(), 5);
        assert!(!sequencer.audio().registry().get(&TrackId::from("hero")).unwrap().is_available());
        assert_eq!(sequencer.mask().duration(), Duration::from_millis(1200));
    }

    #[test]
    fn test_build_refuses_an_invalid_manifest() {
        let mut manifest = NarrativeManifest::reference();
        manifest.restart.scene = SceneId::Forever;

        let result = manifest.build(Box::new(NullBackend));

        assert!(matches!(result, Err(DomainError::Configuration(_))));
    }
}
