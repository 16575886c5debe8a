/*!
 * Monitoring
 * Structured tracing for workload runs
 */

mod tracer;

pub use tracer::{generate_run_id, init_tracing, WorkloadSpan, ENV_TRACE_JSON};
