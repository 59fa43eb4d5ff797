//! Timeout utilities for page operations

use anyhow::Result;
use std::future::Future;
use std::time::Duration;

/// Wrap an async page operation with an explicit timeout
///
/// Distinguishes a timeout from the operation's own failure in the error
/// message.
///
/// # Arguments
/// * `operation` - The async Future to execute with a timeout
/// * `timeout` - How long to wait before giving up
/// * `operation_name` - Human-readable name for error messages
pub async fn with_page_timeout<F, T>(
    operation: F,
    timeout: Duration,
    operation_name: &str,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => Err(anyhow::anyhow!(
            "{operation_name} timeout after {}ms",
            timeout.as_millis()
        )),
    }
}
