//! The scene sequencer aggregate.
//!
//! Owns the current scene and at most one in-flight transition. Starting a
//! transition raises the dissolve mask, dispatches the audio cue bound to the
//! target scene and schedules the swap for when the dissolve ends. Requests
//! that arrive while a transition is in flight are dropped, never queued.

use std::time::{Duration, Instant};

use reverie_audio::domain::cue::AudioCue;
use reverie_audio::domain::engine::CrossfadeEngine;
use reverie_core::clock::Clock;
use reverie_core::error::DomainError;
use reverie_core::event::EventMetadata;
use reverie_core::timer::TimerQueue;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::bindings::CueTable;
use super::events::{
    MuteToggled, Restarted, SceneChanged, StageEvent, StageEventKind, TransitionDropped,
    TransitionStarted,
};
use super::graph::SceneGraph;
use super::mask::DissolveMask;
use super::scene::SceneId;

/// What the narrative does when replayed from its terminal scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestartPlan {
    /// Scene the narrative resumes at.
    pub scene: SceneId,
    /// Cue performed after every track has been stopped.
    pub cue: AudioCue,
}

impl Default for RestartPlan {
    fn default() -> Self {
        Self {
            scene: SceneId::Fireworks,
            cue: AudioCue::fade_in("chernova", 3000),
        }
    }
}

/// Stage tunables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSettings {
    /// Scene shown at startup.
    pub initial: SceneId,
    /// Length of the dissolve that hides each swap.
    pub dissolve: Duration,
    /// Replay behavior.
    pub restart: RestartPlan,
}

impl Default for StageSettings {
    fn default() -> Self {
        Self {
            initial: SceneId::Gate,
            dissolve: Duration::from_millis(1200),
            restart: RestartPlan::default(),
        }
    }
}

/// Result of a command against the sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TransitionOutcome {
    /// A transition began.
    Started {
        /// Scene on screen.
        from: SceneId,
        /// Scene being brought in.
        to: SceneId,
    },
    /// Another transition was in flight; the request was discarded.
    Dropped,
    /// The completing scene is no longer current.
    Stale,
    /// The completing scene has nothing after it.
    Terminal,
    /// The narrative restarted.
    Restarted {
        /// Scene that was unmounted.
        from: SceneId,
        /// Scene now current.
        to: SceneId,
    },
    /// Audio mute flipped.
    MuteToggled {
        /// New state.
        muted: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InFlight {
    target: SceneId,
    correlation_id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StageTimer {
    DissolveElapsed,
}

/// The aggregate root for the stage: current scene, pending transition,
/// dissolve mask and the audio engine driven by scene changes.
#[derive(Debug)]
pub struct SceneSequencer {
    current: SceneId,
    in_flight: Option<InFlight>,
    graph: SceneGraph,
    cues: CueTable,
    restart: RestartPlan,
    mask: DissolveMask,
    audio: CrossfadeEngine,
    timers: TimerQueue<StageTimer>,
    next_sequence: u64,
    uncommitted_events: Vec<StageEvent>,
}

impl SceneSequencer {
    /// Creates a sequencer showing `settings.initial` with nothing in flight.
    #[must_use]
    pub fn new(
        graph: SceneGraph,
        cues: CueTable,
        settings: StageSettings,
        audio: CrossfadeEngine,
    ) -> Self {
        Self {
            current: settings.initial,
            in_flight: None,
            graph,
            cues,
            restart: settings.restart,
            mask: DissolveMask::new(settings.dissolve),
            audio,
            timers: TimerQueue::new(),
            next_sequence: 1,
            uncommitted_events: Vec::new(),
        }
    }

    /// Scene currently on screen.
    #[must_use]
    pub fn current_scene(&self) -> SceneId {
        self.current
    }

    /// Returns `true` while a transition is running.
    #[must_use]
    pub fn transition_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Target of the in-flight transition.
    #[must_use]
    pub fn pending_target(&self) -> Option<SceneId> {
        self.in_flight.map(|f| f.target)
    }

    /// The dissolve mask.
    #[must_use]
    pub fn mask(&self) -> &DissolveMask {
        &self.mask
    }

    /// Mask opacity at `now`.
    #[must_use]
    pub fn mask_opacity(&self, now: Instant) -> f32 {
        self.mask.opacity(now)
    }

    /// The scene graph.
    #[must_use]
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// The audio engine, read-only. Audio changes only through scene
    /// transitions, restart and mute.
    #[must_use]
    pub fn audio(&self) -> &CrossfadeEngine {
        &self.audio
    }

    /// Earliest deadline across the stage and audio timers.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        [self.timers.next_deadline(), self.audio.next_deadline()]
            .into_iter()
            .flatten()
            .min()
    }

    /// Requests a transition to `target`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` if `target` does not follow
    /// the current scene. State is left unchanged.
    pub fn request_transition(
        &mut self,
        target: SceneId,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<TransitionOutcome, DomainError> {
        let now = clock.now();
        if let Some(in_flight) = self.in_flight {
            return Ok(self.drop_request(in_flight, target, correlation_id, now));
        }
        let expected = self.graph.resolve(self.current);
        if expected != Some(target) {
            error!(
                from = %self.current,
                to = %target,
                expected = ?expected,
                "invalid scene transition"
            );
            return Err(DomainError::InvalidTransition {
                from: self.current.as_str(),
                to: target.as_str(),
            });
        }
        Ok(self.begin(target, correlation_id, now))
    }

    /// Handles the completion signal of scene `from`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` if the graph resolves to a
    /// scene the sequencer refuses; never for the shipped graph.
    pub fn complete_scene(
        &mut self,
        from: SceneId,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<TransitionOutcome, DomainError> {
        if let Some(in_flight) = self.in_flight {
            return Ok(self.drop_request(in_flight, from, correlation_id, clock.now()));
        }
        if from != self.current {
            warn!(from = %from, current = %self.current, "completion from a scene that is not current");
            return Ok(TransitionOutcome::Stale);
        }
        let Some(target) = self.graph.resolve(from) else {
            debug!(scene = %from, "terminal scene completed");
            return Ok(TransitionOutcome::Terminal);
        };
        self.request_transition(target, correlation_id, clock)
    }

    /// Replays the narrative. Allowed only from the terminal scene: stops
    /// every track, jumps to the restart scene without a dissolve and
    /// performs the restart cue.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` when the current scene is
    /// not terminal or a transition is in flight.
    pub fn restart(
        &mut self,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<TransitionOutcome, DomainError> {
        let now = clock.now();
        let from = self.current;
        let to = self.restart.scene;
        if self.in_flight.is_some() || !self.graph.is_terminal(from) {
            error!(from = %from, to = %to, "restart outside the terminal scene");
            return Err(DomainError::InvalidTransition {
                from: from.as_str(),
                to: to.as_str(),
            });
        }
        self.timers.clear();
        self.mask.hide();
        self.audio.stop_all();
        self.current = to;
        self.audio.perform(&self.restart.cue, now);
        info!(from = %from, to = %to, "narrative restarted");
        self.record(
            correlation_id,
            now,
            StageEventKind::Restarted(Restarted { from, to }),
        );
        Ok(TransitionOutcome::Restarted { from, to })
    }

    /// Flips the audio mute flag.
    pub fn toggle_mute(&mut self, correlation_id: Uuid, clock: &dyn Clock) -> TransitionOutcome {
        let now = clock.now();
        if self.audio.is_muted() {
            self.audio.unmute(now);
        } else {
            self.audio.mute();
        }
        let muted = self.audio.is_muted();
        self.record(
            correlation_id,
            now,
            StageEventKind::MuteToggled(MuteToggled { muted }),
        );
        TransitionOutcome::MuteToggled { muted }
    }

    /// Fires every stage and audio timer due at the clock's instant, in
    /// deadline order. Audio timers go first on equal deadlines.
    pub fn poll(&mut self, clock: &dyn Clock) {
        let now = clock.now();
        loop {
            let audio_due = self.audio.next_deadline().filter(|at| *at <= now);
            let stage_due = self.timers.next_deadline().filter(|at| *at <= now);
            match (audio_due, stage_due) {
                (None, None) => break,
                (Some(audio), Some(stage)) if stage < audio => self.fire_stage_timer(now),
                (Some(_), _) => {
                    self.audio.fire_next_due(now);
                }
                (None, Some(_)) => self.fire_stage_timer(now),
            }
        }
    }

    /// Pushes live track volumes to the audio backend.
    pub fn sync_audio(&mut self, clock: &dyn Clock) {
        self.audio.sync(clock.now());
    }

    /// Events recorded since the last clear.
    #[must_use]
    pub fn uncommitted_events(&self) -> &[StageEvent] {
        &self.uncommitted_events
    }

    /// Discards recorded events.
    pub fn clear_uncommitted_events(&mut self) {
        self.uncommitted_events.clear();
    }

    /// Removes and returns recorded events.
    pub fn take_uncommitted_events(&mut self) -> Vec<StageEvent> {
        std::mem::take(&mut self.uncommitted_events)
    }

    fn begin(&mut self, target: SceneId, correlation_id: Uuid, now: Instant) -> TransitionOutcome {
        let from = self.current;
        self.mask.show(now);
        let action = match self.cues.cue_for(target) {
            Some(cue) => {
                self.audio.perform(cue, now);
                Some(cue.action().to_owned())
            }
            None => {
                warn!(scene = %target, "no audio cue bound; audio left unchanged");
                None
            }
        };
        self.timers
            .schedule(now + self.mask.duration(), StageTimer::DissolveElapsed);
        self.in_flight = Some(InFlight {
            target,
            correlation_id,
        });
        info!(from = %from, to = %target, cue = ?action, "transition started");
        self.record(
            correlation_id,
            now,
            StageEventKind::TransitionStarted(TransitionStarted {
                from,
                to: target,
                cue: action,
            }),
        );
        TransitionOutcome::Started { from, to: target }
    }

    fn drop_request(
        &mut self,
        in_flight: InFlight,
        requested: SceneId,
        correlation_id: Uuid,
        now: Instant,
    ) -> TransitionOutcome {
        debug!(
            current = %self.current,
            requested = %requested,
            in_flight = %in_flight.target,
            "transition in flight; request dropped"
        );
        self.record(
            correlation_id,
            now,
            StageEventKind::TransitionDropped(TransitionDropped {
                current: self.current,
                in_flight: in_flight.target,
            }),
        );
        TransitionOutcome::Dropped
    }

    fn fire_stage_timer(&mut self, now: Instant) {
        let Some((at, StageTimer::DissolveElapsed)) = self.timers.pop_due(now) else {
            return;
        };
        let Some(in_flight) = self.in_flight.take() else {
            return;
        };
        let from = self.current;
        self.current = in_flight.target;
        self.mask.hide();
        info!(from = %from, to = %self.current, "scene changed");
        self.record(
            in_flight.correlation_id,
            at,
            StageEventKind::SceneChanged(SceneChanged {
                from,
                to: self.current,
            }),
        );
    }

    fn record(&mut self, correlation_id: Uuid, occurred_at: Instant, kind: StageEventKind) {
        let sequence_number = self.next_sequence;
        self.next_sequence += 1;
        self.uncommitted_events.push(StageEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: kind.event_type().to_owned(),
                sequence_number,
                correlation_id,
                occurred_at,
            },
            kind,
        });
    }
}
