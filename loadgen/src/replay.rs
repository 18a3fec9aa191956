//! Replay a [`Schedule`] against an [`HttpTarget`] in real time.
//!
//! Requests are dispatched one at a time on a fixed schedule clock: the `i`-th request is due at
//! the start of the replay plus the sum of the first `i + 1` delays. A slow response therefore
//! does not push back later requests. If the loop falls behind, the next request is sent as soon
//! as the previous one completes, but never before its due time.

use std::fmt;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::http::HttpTarget;
use crate::schedule::Schedule;

/// What happened to a single dispatched request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The target responded, with any status code.
    Response {
        /// HTTP status code.
        status: u16,
        /// Response body as text.
        body: String,
    },
    /// The request did not produce a response (connection error, timeout, ...).
    Failed {
        /// Description of the failure.
        error: String,
    },
}

impl Outcome {
    /// The response status, if the target responded.
    pub fn status(&self) -> Option<u16> {
        match self {
            Outcome::Response { status, .. } => Some(*status),
            Outcome::Failed { .. } => None,
        }
    }

    /// Returns `true` if no response was received.
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }
}

/// The result of dispatching one schedule entry.
#[derive(Clone, Debug)]
pub struct DispatchRecord {
    /// Position of the entry in the schedule.
    pub index: usize,
    /// Path of the target URL.
    pub path: String,
    /// Wall-clock time between the start of the replay and sending this request.
    pub offset: Duration,
    /// Time until the response body was received or the request failed.
    pub latency: Duration,
    /// Response or failure.
    pub outcome: Outcome,
}

impl fmt::Display for DispatchRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Outcome::Response { status, body } => write!(f, "{status} {body}"),
            Outcome::Failed { error } => write!(f, "error: {error}"),
        }
    }
}

/// Replays `schedule` against `target`, returning one record per dispatched request.
///
/// `on_record` is called with every record as soon as it is available, in schedule order.
///
/// Failed requests are recorded and never retried; the replay continues with the next entry.
/// Once `cancel` is triggered, no further request is sent and pending waits return immediately.
/// A request already in flight is allowed to finish, bounded by the target's timeout.
pub async fn run<F>(
    schedule: &Schedule,
    target: &HttpTarget,
    cancel: &CancellationToken,
    mut on_record: F,
) -> Vec<DispatchRecord>
where
    F: FnMut(&DispatchRecord),
{
    tracing::info!(
        requests = schedule.len(),
        span = ?Duration::from_secs_f64(schedule.total()),
        url = target.url(),
        "replaying schedule"
    );

    let mut records = Vec::with_capacity(schedule.len());
    let start = Instant::now();

    for (index, offset) in schedule.offsets().enumerate() {
        let due = start + Duration::from_secs_f64(offset);

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!(dispatched = index, "replay cancelled");
                break;
            }
            _ = tokio::time::sleep_until(due) => {}
        }

        let sent = Instant::now();
        let outcome = target.dispatch().await;
        let record = DispatchRecord {
            index,
            path: target.path().to_owned(),
            offset: sent - start,
            latency: sent.elapsed(),
            outcome,
        };

        match &record.outcome {
            Outcome::Response { status, .. } => {
                tracing::debug!(index, status, latency = ?record.latency, "request completed");
            }
            Outcome::Failed { error } => {
                tracing::warn!(index, error = %error, "request failed");
            }
        }

        on_record(&record);
        records.push(record);
    }

    tracing::info!(
        dispatched = records.len(),
        elapsed = ?start.elapsed(),
        "replay done"
    );
    records
}
