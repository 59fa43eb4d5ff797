//! Worker-thread boundary
//!
//! Browser work runs on its own thread so callers with their own event loop
//! never block on it.

pub mod job;
pub mod worker;

pub use job::JobHandle;
pub use worker::ScraperWorker;

/// Unbounded job queue into the worker.
#[inline]
#[must_use]
pub fn create_channel<T>() -> (
    tokio::sync::mpsc::UnboundedSender<T>,
    tokio::sync::mpsc::UnboundedReceiver<T>,
) {
    tokio::sync::mpsc::unbounded_channel()
}
