//! Awaitable handle for a job running on the scraper worker.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

use crate::error::{ScrapeError, ScrapeResult};

/// Pending result of a job submitted to a [`ScraperWorker`](super::ScraperWorker).
///
/// Await it from async code, or call [`wait_blocking`](Self::wait_blocking)
/// from a plain thread. Resolves to `ScrapeError::Cancelled` if the worker
/// goes away before replying.
pub struct JobHandle<T> {
    receiver: oneshot::Receiver<ScrapeResult<T>>,
}

impl<T> JobHandle<T> {
    #[must_use]
    pub fn new(receiver: oneshot::Receiver<ScrapeResult<T>>) -> Self {
        Self { receiver }
    }

    /// Block the current thread until the job finishes.
    ///
    /// Panics if called from within an async runtime.
    pub fn wait_blocking(self) -> ScrapeResult<T> {
        self.receiver
            .blocking_recv()
            .unwrap_or(Err(ScrapeError::Cancelled))
    }
}

impl<T> Future for JobHandle<T> {
    type Output = ScrapeResult<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(ScrapeError::Cancelled)),
            Poll::Pending => Poll::Pending,
        }
    }
}
