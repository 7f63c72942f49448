//! Clock abstraction for determinism.

use std::time::Instant;

/// Abstraction over monotonic time so timers and fades can be driven
/// deterministically.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}
