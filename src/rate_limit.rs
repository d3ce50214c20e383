//! Request throttling for Elsevier API compliance
//!
//! Elsevier asks integrators to keep a minimum interval between consecutive
//! requests rather than bursting. This module provides a shared throttle
//! clock: every request path acquires the throttle before sending and stamps
//! it once the HTTP exchange has completed, so all callers holding a clone of
//! the same client serialize through one clock.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::time::sleep;
use tracing::debug;

/// Minimum interval between consecutive outbound requests
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(500);

/// Minimum-interval throttle shared by all clones of a client
#[derive(Clone)]
pub struct RequestThrottle {
    state: Arc<Mutex<ThrottleState>>,
}

struct ThrottleState {
    min_interval: Duration,
    last_request: Option<Instant>,
}

impl RequestThrottle {
    /// Create a throttle enforcing the given minimum interval between requests
    pub fn new(min_interval: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(ThrottleState {
                min_interval,
                last_request: None,
            })),
        }
    }

    /// Wait until at least the minimum interval has elapsed since the last
    /// completed request. The first request never waits.
    pub async fn acquire(&self) {
        let wait = {
            let state = self.state.lock().unwrap();
            state
                .last_request
                .map(|last| state.min_interval.saturating_sub(last.elapsed()))
        };

        if let Some(wait) = wait {
            if !wait.is_zero() {
                debug!(wait_ms = wait.as_millis() as u64, "throttling next request");
                sleep(wait).await;
            }
        }
    }

    /// Stamp the completion time of a request as the new throttle reference
    pub fn record_request(&self) {
        let mut state = self.state.lock().unwrap();
        state.last_request = Some(Instant::now());
    }

    /// The configured minimum inter-request interval
    pub fn min_interval(&self) -> Duration {
        self.state.lock().unwrap().min_interval
    }
}

impl Default for RequestThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }
}
