use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Shared reference to the target [service state](State).
pub type ServiceState = Arc<State>;

/// State shared by all HTTP request handlers.
///
/// In request handlers, use `axum::extract::State<ServiceState>` to retrieve a shared reference to
/// this structure.
#[derive(Debug)]
pub struct State {
    /// Counters of handled requests.
    pub counters: RequestCounters,
}

impl State {
    /// Creates the state of a freshly started server.
    pub fn new() -> ServiceState {
        Arc::new(Self {
            counters: RequestCounters::default(),
        })
    }
}

/// Monotonic counters of handled requests.
#[derive(Debug, Default)]
pub struct RequestCounters {
    heavywork: AtomicU64,
}

impl RequestCounters {
    /// Records one request to the heavy work endpoint.
    pub fn record_heavywork(&self) {
        self.heavywork.fetch_add(1, Ordering::Relaxed);
    }

    /// Total number of heavy work requests since startup.
    pub fn heavywork(&self) -> u64 {
        self.heavywork.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_heavywork() {
        let state = State::new();
        assert_eq!(state.counters.heavywork(), 0);

        state.counters.record_heavywork();
        state.counters.record_heavywork();
        assert_eq!(state.counters.heavywork(), 2);
    }
}
