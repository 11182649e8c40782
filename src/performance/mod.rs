//! CPU benchmark execution.
//!
//! - `executor`: time-bounded parallel runner with an injectable clock
//! - `workload`: the compute, crypto and compression workloads
//! - `suite`: phase state machine that sequences a CPU run

pub mod executor;
pub mod suite;
pub mod workload;

pub use executor::{Clock, SystemClock, TickClock, Workload, WorkloadExecutor};
pub use suite::{execute_test, parse_duration, percentile_for, CpuTestSuite, SuitePhase, TestType};
