//! Circuit breaker for the research service.
//!
//! Tracks consecutive failed calls. Once `failure_threshold` is reached the
//! circuit opens and calls fail fast until `recovery_timeout` has elapsed;
//! the next call is then let through as a probe (half-open) and
//! `success_threshold` successful probes close the circuit again.

use parking_lot::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiCircuitState {
    /// Normal operation - requests are allowed
    Closed,
    /// Requests are rejected without reaching the service
    Open,
    /// Probing whether the service recovered
    HalfOpen,
}

#[derive(Debug, Clone)]
pub struct ApiCircuitBreakerConfig {
    pub failure_threshold: u32,
    pub recovery_timeout: Duration,
    pub success_threshold: u32,
}

impl Default for ApiCircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            recovery_timeout: Duration::from_secs(60),
            success_threshold: 1,
        }
    }
}

#[derive(Debug)]
struct BreakerInner {
    state: ApiCircuitState,
    consecutive_failures: u32,
    probe_successes: u32,
    opened_at: Option<Instant>,
}

#[derive(Debug)]
pub struct ApiCircuitBreaker {
    name: String,
    config: ApiCircuitBreakerConfig,
    inner: Mutex<BreakerInner>,
}

impl ApiCircuitBreaker {
    pub fn new(name: &str, config: ApiCircuitBreakerConfig) -> Self {
        Self {
            name: name.to_string(),
            config,
            inner: Mutex::new(BreakerInner {
                state: ApiCircuitState::Closed,
                consecutive_failures: 0,
                probe_successes: 0,
                opened_at: None,
            }),
        }
    }

    /// Whether a call may go out now. Moves Open -> HalfOpen once the
    /// recovery timeout has elapsed.
    pub fn is_available(&self) -> bool {
        let mut inner = self.inner.lock();
        match inner.state {
            ApiCircuitState::Closed | ApiCircuitState::HalfOpen => true,
            ApiCircuitState::Open => {
                let recovered = inner
                    .opened_at
                    .map(|t| t.elapsed() >= self.config.recovery_timeout)
                    .unwrap_or(true);
                if recovered {
                    inner.state = ApiCircuitState::HalfOpen;
                    inner.probe_successes = 0;
                }
                recovered
            }
        }
    }

    pub fn record_success(&self) {
        let mut inner = self.inner.lock();
        inner.consecutive_failures = 0;
        if inner.state == ApiCircuitState::HalfOpen {
            inner.probe_successes += 1;
            if inner.probe_successes < self.config.success_threshold {
                return;
            }
            tracing::info!(
                "Circuit breaker '{}' closed after {} successful probe(s)",
                self.name,
                inner.probe_successes
            );
        }
        inner.state = ApiCircuitState::Closed;
        inner.opened_at = None;
    }

    pub fn record_failure(&self) {
        let mut inner = self.inner.lock();
        inner.consecutive_failures += 1;

        let trip = match inner.state {
            ApiCircuitState::Closed => inner.consecutive_failures >= self.config.failure_threshold,
            ApiCircuitState::HalfOpen => true,
            ApiCircuitState::Open => false,
        };
        if trip {
            tracing::warn!(
                "Circuit breaker '{}' OPENED after {} consecutive failure(s)",
                self.name,
                inner.consecutive_failures
            );
            inner.state = ApiCircuitState::Open;
            inner.opened_at = Some(Instant::now());
        }
    }

    pub fn state(&self) -> ApiCircuitState {
        self.inner.lock().state
    }
}
