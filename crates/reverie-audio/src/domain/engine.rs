//! Audio crossfade engine.
//!
//! Every operation is fire-and-forget: it installs a volume ramp on the
//! affected tracks and, where something has to happen later (pausing a track
//! once it has gone silent, the delayed half of a cross-fade), schedules a
//! typed timer. The host drives those timers through [`CrossfadeEngine::poll`]
//! and pushes live volumes to the backend through [`CrossfadeEngine::sync`].
//!
//! Timers run *at their deadline*: work they trigger is timestamped with the
//! scheduled instant, so a late poll yields the same ramps as a punctual one.

use std::time::{Duration, Instant};

use reverie_core::timer::TimerQueue;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::backend::AudioBackend;
use crate::domain::cue::AudioCue;
use crate::domain::registry::TrackRegistry;
use crate::domain::track::{Track, TrackId, TrackSource};

/// Tunables for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Volume every current track settles at when unmuted.
    pub ambient_volume: f32,
    /// Fraction of a cross-fade's duration to wait before the incoming
    /// track starts rising.
    pub crossfade_lead: f32,
    /// Extra wait after a fade-out before checking whether to pause.
    pub pause_grace_ms: u64,
    /// Ramp length used when unmuting.
    pub unmute_ms: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            ambient_volume: 0.6,
            crossfade_lead: 0.3,
            pause_grace_ms: 100,
            unmute_ms: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AudioTimer {
    PauseIfSilent(TrackId),
    DeferredFadeIn { track: TrackId, duration: Duration },
}

/// Sequences fades across the registered tracks.
#[derive(Debug)]
pub struct CrossfadeEngine {
    registry: TrackRegistry,
    backend: Box<dyn AudioBackend>,
    settings: EngineSettings,
    current: Option<TrackId>,
    muted: bool,
    timers: TimerQueue<AudioTimer>,
}

/// Resolves a track that operations may touch, logging why when they may not.
fn usable<'a>(registry: &'a mut TrackRegistry, id: &TrackId, op: &str) -> Option<&'a mut Track> {
    match registry.get_mut(id) {
        Some(track) if track.is_available() => Some(track),
        Some(_) => {
            warn!(track = %id, op, "track is unavailable; skipping");
            None
        }
        None => {
            warn!(track = %id, op, "unknown track; skipping");
            None
        }
    }
}

impl CrossfadeEngine {
    /// Loads `declarations` through `backend` and builds an idle engine.
    #[must_use]
    pub fn new(
        declarations: &[TrackSource],
        mut backend: Box<dyn AudioBackend>,
        settings: EngineSettings,
    ) -> Self {
        let registry = TrackRegistry::load(declarations, backend.as_mut());
        Self {
            registry,
            backend,
            settings,
            current: None,
            muted: false,
            timers: TimerQueue::new(),
        }
    }

    /// The track considered current, if any.
    #[must_use]
    pub fn current_track(&self) -> Option<&TrackId> {
        self.current.as_ref()
    }

    /// Returns `true` while muted.
    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Engine settings.
    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// The loaded tracks.
    #[must_use]
    pub fn registry(&self) -> &TrackRegistry {
        &self.registry
    }

    /// Live volume of `track` at `now`.
    #[must_use]
    pub fn volume(&self, track: &TrackId, now: Instant) -> Option<f32> {
        self.registry.get(track).map(|t| t.volume_at(now))
    }

    /// Returns `true` if `track` is playing.
    #[must_use]
    pub fn is_playing(&self, track: &TrackId) -> bool {
        self.registry.get(track).is_some_and(Track::is_playing)
    }

    /// The volume a current track is ramped to: ambient, or zero when muted.
    #[must_use]
    pub fn target_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.settings.ambient_volume
        }
    }

    /// Number of pending timers.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Starts `track` if needed and ramps it to the target volume over
    /// `duration`. A track that was not playing starts from silence.
    pub fn fade_in(&mut self, track: &TrackId, duration: Duration, now: Instant) {
        let target = self.target_volume();
        let Some(t) = usable(&mut self.registry, track, "fade_in") else {
            return;
        };
        if !t.is_playing() {
            t.set_volume(0.0);
            t.set_playing(true);
            self.backend.set_volume(track, 0.0);
            self.backend.play(track);
        }
        t.ramp_to(target, now, duration);
        debug!(%track, target, duration = ?duration, "fade in");
        self.current = Some(track.clone());
    }

    /// Ramps `track` to zero over `duration`, then pauses it if it is still
    /// silent once the grace window has passed.
    pub fn fade_out(&mut self, track: &TrackId, duration: Duration, now: Instant) {
        let Some(t) = usable(&mut self.registry, track, "fade_out") else {
            return;
        };
        t.ramp_to(0.0, now, duration);
        let grace = Duration::from_millis(self.settings.pause_grace_ms);
        self.timers
            .schedule(now + duration + grace, AudioTimer::PauseIfSilent(track.clone()));
        debug!(%track, duration = ?duration, "fade out");
    }

    /// Fades `from` out immediately and `to` in after the lead delay.
    pub fn cross_fade(&mut self, from: &TrackId, to: &TrackId, duration: Duration, now: Instant) {
        self.fade_out(from, duration, now);
        let lead = duration.mul_f64(f64::from(self.settings.crossfade_lead.clamp(0.0, 1.0)));
        self.timers.schedule(
            now + lead,
            AudioTimer::DeferredFadeIn {
                track: to.clone(),
                duration,
            },
        );
        debug!(%from, %to, lead = ?lead, "cross fade");
    }

    /// Brings `track` in, fading out a different current track first.
    pub fn play(&mut self, track: &TrackId, duration: Duration, now: Instant) {
        if let Some(current) = self.current.clone()
            && current != *track
        {
            self.fade_out(&current, duration, now);
        }
        let target = self.target_volume();
        let Some(t) = usable(&mut self.registry, track, "play") else {
            return;
        };
        if !t.is_playing() {
            t.set_playing(true);
            self.backend.play(track);
        }
        t.ramp_to(target, now, duration);
        debug!(%track, target, duration = ?duration, "play");
        self.current = Some(track.clone());
    }

    /// Fades out the current track, if any, and leaves nothing current.
    pub fn silence(&mut self, duration: Duration, now: Instant) {
        if let Some(current) = self.current.take() {
            self.fade_out(&current, duration, now);
            debug!(track = %current, "silence");
        }
    }

    /// Halts every track at once and forgets all pending fades.
    pub fn stop_all(&mut self) {
        for track in self.registry.iter_mut() {
            if track.is_available() {
                self.backend.stop(track.id());
            }
            track.set_playing(false);
            track.set_volume(0.0);
        }
        self.current = None;
        let discarded = self.timers.clear();
        info!(discarded_timers = discarded, "all tracks stopped");
    }

    /// Forces every track to zero and makes later fades target zero.
    pub fn mute(&mut self) {
        self.muted = true;
        for track in self.registry.iter_mut() {
            track.set_volume(0.0);
            if track.is_available() {
                self.backend.set_volume(track.id(), 0.0);
            }
        }
        info!("muted");
    }

    /// Clears the mute flag and brings the current track back to ambient
    /// volume over the unmute duration.
    pub fn unmute(&mut self, now: Instant) {
        self.muted = false;
        let target = self.settings.ambient_volume;
        let duration = Duration::from_millis(self.settings.unmute_ms);
        if let Some(current) = self.current.clone()
            && let Some(t) = usable(&mut self.registry, &current, "unmute")
        {
            t.ramp_to(target, now, duration);
        }
        info!("unmuted");
    }

    /// Executes a narrative cue.
    pub fn perform(&mut self, cue: &AudioCue, now: Instant) {
        let duration = cue.duration();
        match cue {
            AudioCue::FadeIn { track, .. } => self.fade_in(track, duration, now),
            AudioCue::CrossFade { from, to, .. } => self.cross_fade(from, to, duration, now),
            AudioCue::Play { track, .. } => self.play(track, duration, now),
            AudioCue::Silence { .. } => self.silence(duration, now),
            AudioCue::Hold => {}
        }
    }

    /// Earliest pending timer deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Fires the earliest timer if it is due at `now`. Returns `false` when
    /// nothing was due.
    pub fn fire_next_due(&mut self, now: Instant) -> bool {
        let Some((at, task)) = self.timers.pop_due(now) else {
            return false;
        };
        match task {
            AudioTimer::PauseIfSilent(track) => self.pause_if_silent(&track, at),
            AudioTimer::DeferredFadeIn { track, duration } => self.fade_in(&track, duration, at),
        }
        true
    }

    /// Fires every timer due at `now`.
    pub fn poll(&mut self, now: Instant) {
        while self.fire_next_due(now) {}
    }

    /// Pushes the live volume of every playing track to the backend.
    pub fn sync(&mut self, now: Instant) {
        for track in self.registry.iter() {
            if track.is_playing() && track.is_available() {
                self.backend.set_volume(track.id(), track.volume_at(now));
            }
        }
    }

    fn pause_if_silent(&mut self, id: &TrackId, at: Instant) {
        // A muted current track stays running at zero so unmute can ramp it.
        let keep_running = self.muted && self.current.as_ref() == Some(id);
        let Some(track) = self.registry.get_mut(id) else {
            return;
        };
        if keep_running || !track.is_playing() {
            return;
        }
        // Re-read the volume: a later fade may have brought the track back.
        if track.volume_at(at) <= f32::EPSILON {
            track.set_playing(false);
            track.set_volume(0.0);
            self.backend.pause(id);
            debug!(track = %id, "paused after fade out");
        }
    }
}
