//! Domain events for the scene sequencing context.

use reverie_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};

use super::scene::SceneId;

/// Emitted when a transition starts: the mask is up and the audio cue has
/// been dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionStarted {
    /// Scene on screen when the transition began.
    pub from: SceneId,
    /// Scene being brought in.
    pub to: SceneId,
    /// Action of the dispatched cue, absent when no cue is bound.
    pub cue: Option<String>,
}

/// Emitted when a transition request arrives while another is in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionDropped {
    /// Scene on screen.
    pub current: SceneId,
    /// Target of the in-flight transition.
    pub in_flight: SceneId,
}

/// Emitted when the dissolve finishes and the new scene becomes current.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneChanged {
    /// Scene that was unmounted.
    pub from: SceneId,
    /// Scene that is now current.
    pub to: SceneId,
}

/// Emitted when the narrative is reset from its terminal scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restarted {
    /// Scene that was unmounted.
    pub from: SceneId,
    /// Scene the narrative restarted at.
    pub to: SceneId,
}

/// Emitted when the audio mute flag flips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MuteToggled {
    /// New state.
    pub muted: bool,
}

/// Event payload variants for the scene sequencing context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageEventKind {
    /// A transition began.
    TransitionStarted(TransitionStarted),
    /// A transition request was dropped.
    TransitionDropped(TransitionDropped),
    /// The current scene changed.
    SceneChanged(SceneChanged),
    /// The narrative restarted.
    Restarted(Restarted),
    /// Mute was toggled.
    MuteToggled(MuteToggled),
}

impl StageEventKind {
    /// Routing name of the event.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::TransitionStarted(_) => "stage.transition_started",
            Self::TransitionDropped(_) => "stage.transition_dropped",
            Self::SceneChanged(_) => "stage.scene_changed",
            Self::Restarted(_) => "stage.restarted",
            Self::MuteToggled(_) => "stage.mute_toggled",
        }
    }
}

/// Domain event envelope for the scene sequencing context.
#[derive(Debug, Clone)]
pub struct StageEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: StageEventKind,
}

impl DomainEvent for StageEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        serde_json::to_value(&self.kind).unwrap_or(serde_json::Value::Null)
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
