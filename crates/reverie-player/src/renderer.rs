//! Terminal scene renderers.
//!
//! Each scene is a short script: a title, captions that appear at fixed
//! offsets, and a rule for when the scene reports completion. Timed cues sit
//! in a choreography queue owned by the mounted scene and are discarded on
//! unmount, so nothing from a previous scene fires after the swap.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use reverie_core::timer::TimerQueue;
use reverie_narrative::domain::scene::SceneId;
use tracing::debug;

/// When a scene reports completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// After the scene has played for this long.
    After(Duration),
    /// When the viewer presses Enter.
    OnInput,
}

/// What a scene shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneScript {
    /// Scene the script belongs to.
    pub scene: SceneId,
    /// Heading printed on mount.
    pub title: &'static str,
    /// Captions and their offsets from mount.
    pub captions: Vec<(Duration, &'static str)>,
    /// Completion rule.
    pub advance: Advance,
}

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// The shipped script for `scene`.
#[must_use]
pub fn script_for(scene: SceneId) -> SceneScript {
    let (title, captions, advance) = match scene {
        SceneId::Gate => (
            "REVERIE",
            vec![(Duration::ZERO, "A private screening. Press Enter to begin.")],
            Advance::OnInput,
        ),
        SceneId::Fireworks => (
            "*  .  *  .  *",
            vec![
                (secs(4), "The sparks gather into a heart."),
                (secs(7), "Happy birthday."),
                (ms(8500), "This one is for you."),
            ],
            Advance::After(secs(17)),
        ),
        SceneId::Globe => (
            "THE GLOBE",
            vec![
                (ms(3500), "Two points on the map."),
                (ms(7500), "Far apart, most of the time."),
                (secs(12), "Let us travel anyway."),
                (secs(16), "Press Enter to fly."),
            ],
            Advance::OnInput,
        ),
        SceneId::Belogradchik => gallery("BELOGRADCHIK", "Rocks older than any story."),
        SceneId::Tryavna => gallery("TRYAVNA", "Cobblestones and slow mornings."),
        SceneId::Crete => gallery("CRETE", "Salt, sun and the widest sea."),
        SceneId::Vratsa => gallery("VRATSA", "Where the mountains begin."),
        SceneId::VratsaReturn => (
            "...",
            vec![
                (secs(3), "Some places you leave."),
                (secs(7), "Some places stay with you."),
                (secs(12), "And we keep going."),
            ],
            Advance::After(secs(16)),
        ),
        SceneId::Denmark => gallery("DENMARK", "Bikes, wind and our beach."),
        SceneId::Memories => (
            "MEMORIES",
            vec![(secs(3), "Every picture, one moment. Press Enter when ready.")],
            Advance::OnInput,
        ),
        SceneId::Finale => (
            "ONE MORE THING",
            vec![
                (secs(4), "Distance is only a number."),
                (secs(8), "Choosing each other is not."),
                (secs(12), "Press Enter to continue."),
            ],
            Advance::OnInput,
        ),
        SceneId::Wish => (
            "A WISH",
            vec![
                (secs(2), "May this year bring new places,"),
                (secs(6), "new dreams and new wins."),
                (secs(12), "And may you always know"),
                (secs(16), "that part of me is right beside you."),
            ],
            Advance::After(secs(24)),
        ),
        SceneId::Forever => (
            "FOREVER",
            vec![(ms(1500), "Press Enter (or r) to watch again.")],
            Advance::OnInput,
        ),
    };
    SceneScript {
        scene,
        title,
        captions,
        advance,
    }
}

fn gallery(
    title: &'static str,
    subtitle: &'static str,
) -> (&'static str, Vec<(Duration, &'static str)>, Advance) {
    (
        title,
        vec![(ms(600), subtitle), (secs(5), "Press Enter to continue.")],
        Advance::OnInput,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choreography {
    Caption(&'static str),
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Mounted {
    scene: SceneId,
    advance: Advance,
    completed: bool,
}

/// Prints the mounted scene to a terminal.
#[derive(Debug)]
pub struct TerminalRenderer<W: Write> {
    out: W,
    mounted: Option<Mounted>,
    choreography: TimerQueue<Choreography>,
}

impl<W: Write> TerminalRenderer<W> {
    /// Creates a renderer writing to `out` with nothing mounted.
    pub fn new(out: W) -> Self {
        Self {
            out,
            mounted: None,
            choreography: TimerQueue::new(),
        }
    }

    /// The underlying writer.
    pub fn writer(&self) -> &W {
        &self.out
    }

    /// Scene currently mounted.
    pub fn mounted(&self) -> Option<SceneId> {
        self.mounted.map(|m| m.scene)
    }

    /// Number of pending choreography cues.
    pub fn pending_cues(&self) -> usize {
        self.choreography.len()
    }

    /// Mounts `scene` at `now`, replacing whatever was mounted.
    ///
    /// # Errors
    ///
    /// Returns the writer's error if printing the title fails.
    pub fn mount(&mut self, scene: SceneId, now: Instant) -> io::Result<()> {
        self.unmount();
        let script = script_for(scene);
        for &(offset, caption) in &script.captions {
            self.choreography
                .schedule(now + offset, Choreography::Caption(caption));
        }
        if let Advance::After(after) = script.advance {
            self.choreography.schedule(now + after, Choreography::Complete);
        }
        self.mounted = Some(Mounted {
            scene,
            advance: script.advance,
            completed: false,
        });
        debug!(%scene, cues = self.choreography.len(), "scene mounted");
        writeln!(self.out)?;
        writeln!(self.out, "== {} ==", script.title)?;
        self.out.flush()
    }

    /// Tears down the mounted scene and its pending cues.
    pub fn unmount(&mut self) {
        if let Some(mounted) = self.mounted.take() {
            let discarded = self.choreography.clear();
            debug!(scene = %mounted.scene, discarded, "scene unmounted");
        }
    }

    /// Prints a note that a dissolve has begun.
    ///
    /// # Errors
    ///
    /// Returns the writer's error.
    pub fn dissolve(&mut self, to: SceneId) -> io::Result<()> {
        writeln!(self.out, "   ~ ~ ~ {to} ~ ~ ~")?;
        self.out.flush()
    }

    /// Prints a status line.
    ///
    /// # Errors
    ///
    /// Returns the writer's error.
    pub fn status(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "   [{message}]")?;
        self.out.flush()
    }

    /// Earliest pending cue.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.choreography.next_deadline()
    }

    /// Runs cues due at `now`. Returns the mounted scene if it completed.
    ///
    /// # Errors
    ///
    /// Returns the writer's error if printing a caption fails.
    pub fn poll(&mut self, now: Instant) -> io::Result<Option<SceneId>> {
        let mut completed = None;
        while let Some((_, cue)) = self.choreography.pop_due(now) {
            match cue {
                Choreography::Caption(text) => {
                    writeln!(self.out, "   {text}")?;
                }
                Choreography::Complete => completed = completed.or_else(|| self.complete()),
            }
        }
        self.out.flush()?;
        Ok(completed)
    }

    /// Handles Enter. Returns the mounted scene if it completes on input.
    pub fn advance_input(&mut self) -> Option<SceneId> {
        match self.mounted {
            Some(Mounted {
                advance: Advance::OnInput,
                ..
            }) => self.complete(),
            _ => None,
        }
    }

    fn complete(&mut self) -> Option<SceneId> {
        let mounted = self.mounted.as_mut()?;
        if mounted.completed {
            return None;
        }
        mounted.completed = true;
        Some(mounted.scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(renderer: &TerminalRenderer<Vec<u8>>) -> String {
        String::from_utf8(renderer.writer().clone()).unwrap()
    }

    #[test]
    fn test_every_scene_has_a_script() {
        for scene in SceneId::ALL {
            let script = script_for(scene);

            assert_eq!(script.scene, scene);
            assert!(!script.title.is_empty());
        }
    }

    #[test]
    fn test_mount_prints_title_and_schedules_captions() {
        // Arrange
        let now = Instant::now();
        let mut renderer = TerminalRenderer::new(Vec::new());

        // Act
        renderer.mount(SceneId::Fireworks, now).unwrap();

        // Assert
        assert_eq!(renderer.mounted(), Some(SceneId::Fireworks));
        assert_eq!(renderer.pending_cues(), 4);
        assert_eq!(renderer.next_deadline(), Some(now + secs(4)));
        assert!(output(&renderer).contains("== *  .  *  .  * =="));
    }

    #[test]
    fn test_timed_scene_completes_once() {
        // Arrange
        let now = Instant::now();
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.mount(SceneId::VratsaReturn, now).unwrap();

        // Act
        let early = renderer.poll(now + secs(12)).unwrap();
        let done = renderer.poll(now + secs(16)).unwrap();
        let again = renderer.advance_input();

        // Assert
        assert_eq!(early, None);
        assert_eq!(done, Some(SceneId::VratsaReturn));
        assert_eq!(again, None);
        let text = output(&renderer);
        assert!(text.contains("Some places stay with you."));
        assert!(text.contains("And we keep going."));
    }

    #[test]
    fn test_input_scene_completes_once_per_mount() {
        let now = Instant::now();
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.mount(SceneId::Gate, now).unwrap();

        assert_eq!(renderer.advance_input(), Some(SceneId::Gate));
        assert_eq!(renderer.advance_input(), None);

        renderer.mount(SceneId::Gate, now).unwrap();
        assert_eq!(renderer.advance_input(), Some(SceneId::Gate));
    }

    #[test]
    fn test_timed_scene_ignores_input() {
        let now = Instant::now();
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.mount(SceneId::Fireworks, now).unwrap();

        assert_eq!(renderer.advance_input(), None);
    }

    #[test]
    fn test_unmount_cancels_pending_cues() {
        // Arrange
        let now = Instant::now();
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.mount(SceneId::Wish, now).unwrap();

        // Act
        renderer.unmount();
        let fired = renderer.poll(now + secs(60)).unwrap();

        // Assert
        assert_eq!(fired, None);
        assert_eq!(renderer.pending_cues(), 0);
        assert_eq!(renderer.mounted(), None);
        assert!(!output(&renderer).contains("new dreams"));
    }
}
