//! Shared test mocks and utilities for the Reverie scene engine.

mod backend;
mod clock;

pub use backend::{BackendCall, RecordingBackend};
pub use clock::{FixedClock, ManualClock};
