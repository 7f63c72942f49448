//! Scene identifiers.

use std::fmt;
use std::str::FromStr;

use reverie_core::error::DomainError;
use serde::{Deserialize, Serialize};

/// One full-screen narrative unit, in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneId {
    /// Entry gate shown before anything plays.
    Gate,
    /// Opening fireworks; the intro of the story.
    Fireworks,
    /// Spinning globe.
    Globe,
    /// First gallery stop.
    Belogradchik,
    /// Second gallery stop.
    Tryavna,
    /// Third gallery stop.
    Crete,
    /// Fourth gallery stop.
    Vratsa,
    /// Interstitial after the Vratsa gallery.
    VratsaReturn,
    /// Fifth gallery stop.
    Denmark,
    /// Memory browsing.
    Memories,
    /// Closing sequence.
    Finale,
    /// Wish screen.
    Wish,
    /// Terminal screen with the replay action.
    Forever,
}

impl SceneId {
    /// Every scene in ordinal order.
    pub const ALL: [Self; 13] = [
        Self::Gate,
        Self::Fireworks,
        Self::Globe,
        Self::Belogradchik,
        Self::Tryavna,
        Self::Crete,
        Self::Vratsa,
        Self::VratsaReturn,
        Self::Denmark,
        Self::Memories,
        Self::Finale,
        Self::Wish,
        Self::Forever,
    ];

    /// Position in presentation order.
    #[must_use]
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// The scene with the next ordinal, if any.
    #[must_use]
    pub fn successor(self) -> Option<Self> {
        Self::ALL.get(self.ordinal() + 1).copied()
    }

    /// Returns `true` for the scenes rendered by the shared gallery component.
    #[must_use]
    pub fn is_gallery(self) -> bool {
        matches!(
            self,
            Self::Belogradchik | Self::Tryavna | Self::Crete | Self::Vratsa | Self::Denmark
        )
    }

    /// Stable snake_case name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gate => "gate",
            Self::Fireworks => "fireworks",
            Self::Globe => "globe",
            Self::Belogradchik => "belogradchik",
            Self::Tryavna => "tryavna",
            Self::Crete => "crete",
            Self::Vratsa => "vratsa",
            Self::VratsaReturn => "vratsa_return",
            Self::Denmark => "denmark",
            Self::Memories => "memories",
            Self::Finale => "finale",
            Self::Wish => "wish",
            Self::Forever => "forever",
        }
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SceneId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|scene| scene.as_str() == s)
            .ok_or_else(|| DomainError::Validation(format!("unknown scene: {s}")))
    }
}
