//! Scene graph: which scene follows which.

use std::collections::{BTreeMap, BTreeSet};

use reverie_core::error::DomainError;

use super::scene::SceneId;

/// Successor table. An explicit edge keyed by the origin scene wins;
/// otherwise the scene with the next ordinal follows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneGraph {
    edges: BTreeMap<SceneId, SceneId>,
}

impl SceneGraph {
    /// Builds a graph from explicit `origin -> target` edges.
    #[must_use]
    pub fn new(edges: BTreeMap<SceneId, SceneId>) -> Self {
        Self { edges }
    }

    /// The edges of the shipped narrative.
    #[must_use]
    pub fn reference() -> Self {
        Self::default()
            .with_edge(SceneId::Crete, SceneId::Vratsa)
            .with_edge(SceneId::Vratsa, SceneId::VratsaReturn)
            .with_edge(SceneId::Denmark, SceneId::Memories)
    }

    /// Adds or replaces the edge leaving `from`.
    #[must_use]
    pub fn with_edge(mut self, from: SceneId, to: SceneId) -> Self {
        self.edges.insert(from, to);
        self
    }

    /// The scene that follows `from`, or `None` if `from` is terminal.
    #[must_use]
    pub fn resolve(&self, from: SceneId) -> Option<SceneId> {
        self.edges.get(&from).copied().or_else(|| from.successor())
    }

    /// Returns `true` if nothing follows `scene`.
    #[must_use]
    pub fn is_terminal(&self, scene: SceneId) -> bool {
        self.resolve(scene).is_none()
    }

    /// Explicit edges in origin order.
    pub fn edges(&self) -> impl Iterator<Item = (SceneId, SceneId)> + '_ {
        self.edges.iter().map(|(from, to)| (*from, *to))
    }

    /// Walks the graph from `initial` and returns every scene visited, ending
    /// with the terminal one.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Configuration` if the walk revisits a scene.
    pub fn walk(&self, initial: SceneId) -> Result<Vec<SceneId>, DomainError> {
        let mut path = vec![initial];
        let mut seen = BTreeSet::from([initial]);
        let mut at = initial;
        while let Some(next) = self.resolve(at) {
            if !seen.insert(next) {
                return Err(DomainError::Configuration(format!(
                    "scene graph loops: {at} leads back to {next}"
                )));
            }
            path.push(next);
            at = next;
        }
        Ok(path)
    }
}
