//! Reverie: Scene Sequencing bounded context.
//!
//! Responsible for which scene is on screen, serializing transitions between
//! scenes, the dissolve mask that hides each swap, and dispatching the audio
//! cue bound to every scene.

pub mod application;
pub mod domain;
pub mod manifest;
