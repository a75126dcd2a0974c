//! Deadline guard for pending operations.

use std::future::Future;
use std::time::Duration;

/// Raised when a guarded operation does not settle within its deadline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} ({}ms)", .limit.as_millis())]
pub struct TimeoutError {
    pub message: String,
    pub limit: Duration,
}

impl TimeoutError {
    pub fn new(limit: Duration) -> Self {
        Self::with_message("Request timed out", limit)
    }

    pub fn with_message(message: impl Into<String>, limit: Duration) -> Self {
        Self {
            message: message.into(),
            limit,
        }
    }
}

/// Converts a millisecond time limit into a deadline.
///
/// Absent, zero and negative limits mean "no deadline".
pub fn effective_limit(ms: Option<i64>) -> Option<Duration> {
    match ms {
        Some(ms) if ms > 0 => Some(Duration::from_millis(ms as u64)),
        _ => None,
    }
}

/// Race `fut` against a `time_limit` millisecond deadline.
///
/// Without an effective limit the future is awaited as is and no timer is armed.
/// When the deadline wins the operation is dropped and a [`TimeoutError`] is
/// returned through `E`; otherwise the operation's own result passes through
/// unchanged.
pub async fn with_timeout<F, T, E>(fut: F, time_limit: Option<i64>) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: From<TimeoutError>,
{
    let Some(limit) = effective_limit(time_limit) else {
        return fut.await;
    };

    match tokio::time::timeout(limit, fut).await {
        Ok(outcome) => outcome,
        Err(_) => {
            tracing::warn!(limit_ms = limit.as_millis() as u64, "operation timed out");
            Err(TimeoutError::new(limit).into())
        }
    }
}
