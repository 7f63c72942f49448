//! Commands for the scene sequencing context.

use reverie_core::command::Command;
use uuid::Uuid;

use super::scene::SceneId;

/// A scene reports that it has finished.
#[derive(Debug, Clone)]
pub struct CompleteScene {
    /// Correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Scene that emitted the signal.
    pub from: SceneId,
}

impl Command for CompleteScene {
    fn command_type(&self) -> &'static str {
        "stage.complete_scene"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Asks for a transition to a specific scene.
#[derive(Debug, Clone)]
pub struct RequestTransition {
    /// Correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Scene to bring in.
    pub target: SceneId,
}

impl Command for RequestTransition {
    fn command_type(&self) -> &'static str {
        "stage.request_transition"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Replays the narrative from the terminal scene.
#[derive(Debug, Clone)]
pub struct Restart {
    /// Correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for Restart {
    fn command_type(&self) -> &'static str {
        "stage.restart"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Flips the audio mute flag.
#[derive(Debug, Clone)]
pub struct ToggleMute {
    /// Correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for ToggleMute {
    fn command_type(&self) -> &'static str {
        "stage.toggle_mute"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
