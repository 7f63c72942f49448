//! Real-time event loop.
//!
//! The loop sleeps until the earliest of: the next sequencer or renderer
//! deadline, the next control-rate tick, a line on stdin, or shutdown.
//! Every wake-up runs the same tick: renderer cues, then sequencer and audio
//! timers, then the recorded stage events are applied to the renderer.

use std::future::Future;
use std::io::Write;
use std::time::{Duration, Instant};

use reverie_core::clock::Clock;
use reverie_narrative::application::command_handlers::{
    handle_complete_scene, handle_restart, handle_tick, handle_toggle_mute,
};
use reverie_narrative::domain::aggregates::SceneSequencer;
use reverie_narrative::domain::commands::{CompleteScene, Restart, ToggleMute};
use reverie_narrative::domain::events::{StageEvent, StageEventKind};
use reverie_narrative::domain::scene::SceneId;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::renderer::TerminalRenderer;

/// Clock backed by tokio's timer, so paused test time applies.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }
}

/// A viewer command read from stdin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Empty line: complete the current scene.
    Advance,
    /// `m`: toggle mute.
    ToggleMute,
    /// `r`: replay from the terminal scene.
    Restart,
    /// `q`: quit.
    Quit,
}

impl Input {
    /// Parses one input line.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "" => Some(Self::Advance),
            "m" => Some(Self::ToggleMute),
            "r" => Some(Self::Restart),
            "q" => Some(Self::Quit),
            _ => None,
        }
    }
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}

/// Couples a sequencer to a renderer and drives both in real time.
#[derive(Debug)]
pub struct Player<W: Write> {
    sequencer: SceneSequencer,
    renderer: TerminalRenderer<W>,
    clock: TokioClock,
    control_period: Duration,
}

impl<W: Write> Player<W> {
    /// Creates a player. Nothing is shown until [`Player::start`].
    pub fn new(
        sequencer: SceneSequencer,
        renderer: TerminalRenderer<W>,
        control_period: Duration,
    ) -> Self {
        Self {
            sequencer,
            renderer,
            clock: TokioClock,
            control_period,
        }
    }

    /// The sequencer.
    pub fn sequencer(&self) -> &SceneSequencer {
        &self.sequencer
    }

    /// The renderer.
    pub fn renderer(&self) -> &TerminalRenderer<W> {
        &self.renderer
    }

    /// Mounts the initial scene.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the terminal cannot be written.
    pub fn start(&mut self) -> Result<(), AppError> {
        let scene = self.sequencer.current_scene();
        info!(%scene, "stage opened");
        self.renderer.mount(scene, self.clock.now())?;
        Ok(())
    }

    /// Earliest instant anything is scheduled to happen.
    pub fn next_wake(&self) -> Option<Instant> {
        [self.sequencer.next_deadline(), self.renderer.next_deadline()]
            .into_iter()
            .flatten()
            .min()
    }

    /// Applies one viewer command. Returns `false` when the player should
    /// stop.
    ///
    /// # Errors
    ///
    /// Returns `AppError` if a command fails or the terminal cannot be
    /// written.
    pub fn handle_input(&mut self, input: Input) -> Result<bool, AppError> {
        debug!(?input, "input");
        match input {
            Input::Advance => {
                if let Some(scene) = self.renderer.advance_input() {
                    self.complete(scene)?;
                }
            }
            Input::ToggleMute => self.toggle_mute()?,
            Input::Restart => self.restart()?,
            Input::Quit => {
                info!("quit requested");
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Flips the mute flag.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the terminal cannot be written.
    pub fn toggle_mute(&mut self) -> Result<(), AppError> {
        let command = ToggleMute {
            correlation_id: Uuid::new_v4(),
        };
        handle_toggle_mute(&command, &mut self.sequencer, &self.clock)?;
        self.apply_recorded()
    }

    /// Runs renderer cues and sequencer timers due now.
    ///
    /// # Errors
    ///
    /// Returns `AppError` if a command fails or the terminal cannot be
    /// written.
    pub fn tick(&mut self) -> Result<(), AppError> {
        if let Some(scene) = self.renderer.poll(self.clock.now())? {
            self.complete(scene)?;
        }
        let events = handle_tick(&mut self.sequencer, &self.clock);
        self.apply(events)
    }

    /// Runs until `q`, or until `shutdown` resolves. End of input does not
    /// stop the player; timed scenes keep playing.
    ///
    /// # Errors
    ///
    /// Returns `AppError` if reading input, a command or the terminal fails.
    #[instrument(skip_all)]
    pub async fn run<R, S>(&mut self, input: R, shutdown: S) -> Result<(), AppError>
    where
        R: AsyncBufRead + Unpin,
        S: Future<Output = ()>,
    {
        let mut lines = input.lines();
        let mut input_open = true;
        let mut control = tokio::time::interval(self.control_period);
        control.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        loop {
            let wake = self.next_wake();
            tokio::select! {
                () = &mut shutdown => {
                    info!("shutdown requested");
                    break;
                }
                line = lines.next_line(), if input_open => match line? {
                    Some(line) => match Input::parse(&line) {
                        Some(input) => {
                            if !self.handle_input(input)? {
                                break;
                            }
                        }
                        None => warn!(line = %line.trim(), "unrecognised input"),
                    },
                    None => {
                        debug!("input closed");
                        input_open = false;
                    }
                },
                () = wait_for(wake) => self.tick()?,
                _ = control.tick() => self.tick()?,
            }
        }
        Ok(())
    }

    fn complete(&mut self, scene: SceneId) -> Result<(), AppError> {
        if scene == self.sequencer.current_scene() && self.sequencer.graph().is_terminal(scene) {
            return self.restart();
        }
        let command = CompleteScene {
            correlation_id: Uuid::new_v4(),
            from: scene,
        };
        let outcome = handle_complete_scene(&command, &mut self.sequencer, &self.clock)?;
        debug!(?outcome, "scene completion handled");
        self.apply_recorded()
    }

    fn restart(&mut self) -> Result<(), AppError> {
        let command = Restart {
            correlation_id: Uuid::new_v4(),
        };
        if let Err(err) = handle_restart(&command, &mut self.sequencer, &self.clock) {
            debug!(error = %err, "restart refused");
            self.renderer.status("replay is available at the end")?;
        }
        self.apply_recorded()
    }

    fn apply_recorded(&mut self) -> Result<(), AppError> {
        let events = self.sequencer.take_uncommitted_events();
        self.apply(events)
    }

    fn apply(&mut self, events: Vec<StageEvent>) -> Result<(), AppError> {
        for event in events {
            let at = event.metadata.occurred_at;
            match event.kind {
                StageEventKind::TransitionStarted(started) => self.renderer.dissolve(started.to)?,
                StageEventKind::SceneChanged(changed) => self.renderer.mount(changed.to, at)?,
                StageEventKind::Restarted(restarted) => self.renderer.mount(restarted.to, at)?,
                StageEventKind::MuteToggled(toggled) => self
                    .renderer
                    .status(if toggled.muted { "muted" } else { "sound on" })?,
                StageEventKind::TransitionDropped(_) => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input_lines() {
        assert_eq!(Input::parse(""), Some(Input::Advance));
        assert_eq!(Input::parse("  \r"), Some(Input::Advance));
        assert_eq!(Input::parse("M"), Some(Input::ToggleMute));
        assert_eq!(Input::parse("r"), Some(Input::Restart));
        assert_eq!(Input::parse("q\n"), Some(Input::Quit));
        assert_eq!(Input::parse("jump"), None);
    }
}
