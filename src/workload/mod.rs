/*!
 * Workload Harness
 *
 * Runs T named worker threads, each performing N operations against shared
 * state, and joins them under an optional deadline.
 */

mod deadline;
mod runner;

pub use deadline::{join_within, Completion};
pub use runner::{Workload, WorkloadReport};
