// Private module declaration
mod server;

use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};

pub use server::metrics_handler;

// ============================================================================
// Metrics Module - Prometheus metrics for the portal procedures
// ============================================================================
//
// - Procedure calls by outcome and their latency
// - Login attempts by result
//
// Scraped from GET /metrics on the API server.
// ============================================================================

/// Outcome label for a procedure call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome {
    Ok,
    NotFound,
    InvalidInput,
    Error,
}

impl CallOutcome {
    fn as_str(&self) -> &'static str {
        match self {
            CallOutcome::Ok => "ok",
            CallOutcome::NotFound => "not_found",
            CallOutcome::InvalidInput => "invalid_input",
            CallOutcome::Error => "error",
        }
    }
}

/// Result label for a login attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    Success,
    Rejected,
    Invalid,
    Error,
}

impl AuthOutcome {
    fn as_str(&self) -> &'static str {
        match self {
            AuthOutcome::Success => "success",
            AuthOutcome::Rejected => "rejected",
            AuthOutcome::Invalid => "invalid",
            AuthOutcome::Error => "error",
        }
    }
}

pub struct Metrics {
    registry: Registry,
    pub rpc_requests: IntCounterVec,
    pub rpc_duration: HistogramVec,
    pub auth_attempts: IntCounterVec,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let rpc_requests = IntCounterVec::new(
            Opts::new("rpc_requests_total", "Total procedure calls"),
            &["procedure", "outcome"],
        )?;
        registry.register(Box::new(rpc_requests.clone()))?;

        let rpc_duration = HistogramVec::new(
            HistogramOpts::new("rpc_request_duration_seconds", "Procedure call duration")
                .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
            &["procedure"],
        )?;
        registry.register(Box::new(rpc_duration.clone()))?;

        let auth_attempts = IntCounterVec::new(
            Opts::new("auth_attempts_total", "Customer login attempts"),
            &["result"],
        )?;
        registry.register(Box::new(auth_attempts.clone()))?;

        Ok(Self {
            registry,
            rpc_requests,
            rpc_duration,
            auth_attempts,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_call(&self, procedure: &str, outcome: CallOutcome, duration_secs: f64) {
        self.rpc_requests
            .with_label_values(&[procedure, outcome.as_str()])
            .inc();
        self.rpc_duration
            .with_label_values(&[procedure])
            .observe(duration_secs);
    }

    pub fn record_auth(&self, outcome: AuthOutcome) {
        self.auth_attempts.with_label_values(&[outcome.as_str()]).inc();
    }
}
