//! Octane Rating hardware benchmark
//!
//! Runs time-bounded CPU workloads and reduces results from every hardware
//! domain to a Research-Octane-style number (RON) between 70 and 100.
//!
//! The system is organized into functional modules:
//! - **error**: Error type hierarchy
//! - **models**: Result documents for every domain plus platform info
//! - **performance**: Workload executor, workloads and the CPU test suite
//! - **octane**: Baselines, weights, grading and scenario scoring
//! - **hardware**: Platform identification and thermal sampling
//! - **config**: JSON settings and their validation
//! - **report**: Report assembly and on-disk storage
//! - **log_collector**: Non-blocking `log` backend

pub mod error;
pub mod models;

pub mod hardware;
pub mod performance;
pub mod octane;

pub mod config;
pub mod report;

pub mod log_collector;

// Re-export the log crate for macro usage
pub use log;

pub use log_collector::{LogCollector, LogLine};

// ============================================================================
// PUBLIC RE-EXPORTS FOR CONVENIENCE
// ============================================================================

pub use error::{ConfigError, HardwareError, ReportError, ScoringError};

pub use models::{CpuResults, Domain, PlatformInfo, TestResults};

pub use config::OctaneConfig;
pub use hardware::{get_platform_info, PlatformInfoProvider};
pub use octane::{BaselineProfile, BaselineRegistry, Grade, OctaneCalculator, OctaneRating};
pub use performance::{execute_test, CpuTestSuite, TestType, WorkloadExecutor};
pub use report::{Report, ReportBuilder, ReportStore};
