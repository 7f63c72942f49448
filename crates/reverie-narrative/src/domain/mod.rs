//! Domain model for the scene sequencing context.

pub mod aggregates;
pub mod bindings;
pub mod commands;
pub mod events;
pub mod graph;
pub mod mask;
pub mod scene;
