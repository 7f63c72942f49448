//! Command handlers for the scene sequencing context.
//!
//! Each handler logs the command, executes it against the sequencer and
//! returns the outcome. Recorded events stay on the sequencer until the host
//! drains them.

use reverie_core::clock::Clock;
use reverie_core::command::Command;
use reverie_core::error::DomainError;
use tracing::debug;

use crate::domain::aggregates::{SceneSequencer, TransitionOutcome};
use crate::domain::commands::{CompleteScene, RequestTransition, Restart, ToggleMute};
use crate::domain::events::StageEvent;

/// Handles the `CompleteScene` command.
///
/// # Errors
///
/// Returns `DomainError::InvalidTransition` if the resolved target is
/// rejected by the sequencer.
pub fn handle_complete_scene(
    command: &CompleteScene,
    sequencer: &mut SceneSequencer,
    clock: &dyn Clock,
) -> Result<TransitionOutcome, DomainError> {
    debug!(
        command = command.command_type(),
        correlation_id = %command.correlation_id,
        from = %command.from,
        "handling command"
    );
    sequencer.complete_scene(command.from, command.correlation_id, clock)
}

/// Handles the `RequestTransition` command.
///
/// # Errors
///
/// Returns `DomainError::InvalidTransition` if `target` does not follow the
/// current scene.
pub fn handle_request_transition(
    command: &RequestTransition,
    sequencer: &mut SceneSequencer,
    clock: &dyn Clock,
) -> Result<TransitionOutcome, DomainError> {
    debug!(
        command = command.command_type(),
        correlation_id = %command.correlation_id,
        target = %command.target,
        "handling command"
    );
    sequencer.request_transition(command.target, command.correlation_id, clock)
}

/// Handles the `Restart` command.
///
/// # Errors
///
/// Returns `DomainError::InvalidTransition` outside the terminal scene.
pub fn handle_restart(
    command: &Restart,
    sequencer: &mut SceneSequencer,
    clock: &dyn Clock,
) -> Result<TransitionOutcome, DomainError> {
    debug!(
        command = command.command_type(),
        correlation_id = %command.correlation_id,
        "handling command"
    );
    sequencer.restart(command.correlation_id, clock)
}

/// Handles the `ToggleMute` command.
///
/// # Errors
///
/// Never fails; the signature matches the other handlers.
pub fn handle_toggle_mute(
    command: &ToggleMute,
    sequencer: &mut SceneSequencer,
    clock: &dyn Clock,
) -> Result<TransitionOutcome, DomainError> {
    debug!(
        command = command.command_type(),
        correlation_id = %command.correlation_id,
        "handling command"
    );
    Ok(sequencer.toggle_mute(command.correlation_id, clock))
}

/// Advances time: fires due timers, pushes live volumes to the backend and
/// returns the events recorded since the last drain.
pub fn handle_tick(sequencer: &mut SceneSequencer, clock: &dyn Clock) -> Vec<StageEvent> {
    sequencer.poll(clock);
    sequencer.sync_audio(clock);
    sequencer.take_uncommitted_events()
}

#[cfg(test)]
mod tests {
    use reverie_core::event::DomainEvent;
    use std::time::Instant;

    use reverie_test_support::{FixedClock, ManualClock, RecordingBackend};
    use uuid::Uuid;

    use super::*;
    use crate::domain::scene::SceneId;
    use crate::manifest::NarrativeManifest;

    fn sequencer(backend: &RecordingBackend) -> SceneSequencer {
        NarrativeManifest::reference()
            .build(Box::new(backend.clone()))
            .unwrap()
    }

    #[test]
    fn test_handle_complete_scene_starts_transition() {
        // Arrange
        let clock = ManualClock::new();
        let backend = RecordingBackend::new();
        let mut sequencer = sequencer(&backend);
        let command = CompleteScene {
            correlation_id: Uuid::new_v4(),
            from: SceneId::Gate,
        };

        // Act
        let outcome = handle_complete_scene(&command, &mut sequencer, &clock).unwrap();

        // Assert
        assert_eq!(
            outcome,
            TransitionOutcome::Started {
                from: SceneId::Gate,
                to: SceneId::Fireworks
            }
        );
        let event = &sequencer.uncommitted_events()[0];
        assert_eq!(event.metadata().correlation_id, command.correlation_id);
    }

    #[test]
    fn test_handle_request_transition_rejects_skips() {
        let clock = ManualClock::new();
        let backend = RecordingBackend::new();
        let mut sequencer = sequencer(&backend);
        let command = RequestTransition {
            correlation_id: Uuid::new_v4(),
            target: SceneId::Forever,
        };

        let result = handle_request_transition(&command, &mut sequencer, &clock);

        assert!(matches!(result, Err(DomainError::InvalidTransition { .. })));
    }

    #[test]
    fn test_handle_restart_fails_before_the_end() {
        let clock = FixedClock(Instant::now());
        let backend = RecordingBackend::new();
        let mut sequencer = sequencer(&backend);

        let result = handle_restart(
            &Restart {
                correlation_id: Uuid::new_v4(),
            },
            &mut sequencer,
            &clock,
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_handle_toggle_mute_reports_new_state() {
        let clock = ManualClock::new();
        let backend = RecordingBackend::new();
        let mut sequencer = sequencer(&backend);
        let command = ToggleMute {
            correlation_id: Uuid::new_v4(),
        };

        let outcome = handle_toggle_mute(&command, &mut sequencer, &clock).unwrap();

        assert_eq!(outcome, TransitionOutcome::MuteToggled { muted: true });
        assert!(sequencer.audio().is_muted());
    }

    #[test]
    fn test_handle_tick_drains_events_and_syncs_volumes() {
        // Arrange
        let clock = ManualClock::new();
        let backend = RecordingBackend::new();
        let mut sequencer = sequencer(&backend);
        let command = CompleteScene {
            correlation_id: Uuid::new_v4(),
            from: SceneId::Gate,
        };
        handle_complete_scene(&command, &mut sequencer, &clock).unwrap();
        clock.advance_ms(1500);

        // Act
        let events = handle_tick(&mut sequencer, &clock);

        // Assert
        let types: Vec<&str> = events.iter().map(DomainEvent::event_type).collect();
        assert_eq!(types, vec!["stage.transition_started", "stage.scene_changed"]);
        assert!(sequencer.uncommitted_events().is_empty());
        let volume = backend.last_volume("chernova").unwrap();
        assert!((volume - 0.3).abs() < 1e-5);
    }
}
