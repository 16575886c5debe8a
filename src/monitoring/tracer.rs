/*!
 * Tracing
 * Structured tracing for workloads using the tracing crate
 *
 * Features:
 * - Run ID generation for correlating every worker of one workload
 * - JSON-formatted logs for structured parsing
 * - Thread names in output (workers are named `<workload>-worker-<n>`)
 */

use std::sync::Once;
use std::time::Instant;
use tracing::{debug, info, span, warn, Level};
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

/// Environment variable enabling JSON output
pub const ENV_TRACE_JSON: &str = "CONCURRENCY_TRACE_JSON";

static INIT: Once = Once::new();

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - CONCURRENCY_TRACE_JSON: Enable JSON output (default: false)
///
/// Safe to call more than once; only the first call installs a subscriber,
/// and an already-installed global subscriber is left alone.
pub fn init_tracing() {
    INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let use_json = std::env::var(ENV_TRACE_JSON)
            .map(|v| v == "1" || v == "true")
            .unwrap_or(false);

        let registry = tracing_subscriber::registry().with(env_filter);

        let installed = if use_json {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_thread_names(true)
                        .with_current_span(true)
                        .with_span_list(true)
                        .with_span_events(FmtSpan::CLOSE),
                )
                .try_init()
        } else {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_thread_names(true)
                        .with_span_events(FmtSpan::CLOSE)
                        .compact(),
                )
                .try_init()
        };

        if installed.is_ok() {
            info!(json = use_json, "Structured tracing initialized");
        }
    });
}

/// Generate a unique run ID for workload correlation
pub fn generate_run_id() -> Uuid {
    Uuid::new_v4()
}

/// Span covering one workload run
pub struct WorkloadSpan {
    span: tracing::Span,
    start: Instant,
    run_id: Uuid,
    name: String,
    finished: bool,
}

impl WorkloadSpan {
    pub fn new(name: &str, workers: usize, ops_per_worker: usize) -> Self {
        let run_id = generate_run_id();

        let span = span!(
            Level::DEBUG,
            "workload",
            run_id = %run_id,
            workload = name,
            workers = workers as u64,
            ops_per_worker = ops_per_worker as u64,
            duration_us = tracing::field::Empty,
            result = tracing::field::Empty,
        );

        span.in_scope(|| {
            debug!(workload = name, run_id = %run_id, "workload started");
        });

        Self {
            span,
            start: Instant::now(),
            run_id,
            name: name.to_string(),
            finished: false,
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Span to enter from worker threads
    pub fn span(&self) -> &tracing::Span {
        &self.span
    }

    /// Record the outcome and emit the completion event
    pub fn finish(mut self, success: bool) {
        self.complete(success);
    }

    fn complete(&mut self, success: bool) {
        if self.finished {
            return;
        }
        self.finished = true;

        let duration_us = self.start.elapsed().as_micros() as u64;
        self.span.record("duration_us", duration_us);
        self.span
            .record("result", if success { "success" } else { "error" });

        let _entered = self.span.enter();
        if success {
            info!(
                run_id = %self.run_id,
                workload = %self.name,
                duration_us,
                "workload completed"
            );
        } else {
            warn!(
                run_id = %self.run_id,
                workload = %self.name,
                duration_us,
                "workload failed"
            );
        }
    }
}

impl Drop for WorkloadSpan {
    fn drop(&mut self) {
        // Dropped without finish(): treat as failure (e.g. early return via `?`)
        self.complete(false);
    }
}
