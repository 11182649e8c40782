//! CPU test suite orchestration.
//!
//! A suite walks a fixed phase sequence determined by the test type, hands
//! each phase its share of the duration budget, and writes the measured
//! figures into a [`CpuResults`]. Phases run strictly one after another;
//! only the workers inside a phase run in parallel.

use super::executor::{Clock, SystemClock, Workload, WorkloadExecutor};
use super::workload::{
    AesGcmEncrypt, GzipCompress, ModExpProxy, ParallelCompute, ScalarCompute, Sha256Digest,
    AES_BUFFER_BYTES, GZIP_BUFFER_BYTES, SHA_BUFFER_BYTES,
};
use crate::error::ConfigError;
use crate::hardware::thermal::{default_probe, ThermalProbe, ThermalReading};
use crate::models::{CpuResults, FloatScore, IntegerScore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const CPU_TEST_SUITE: &str = "octane-cpu-test";
pub const SCORE_UNIT: &str = "points";
pub const OPS_PER_POINT: u64 = 1_000;
pub const LZ4_FACTOR: f64 = 1.5;
pub const ZSTD_FACTOR: f64 = 1.2;

pub const SYNTHETIC_RSA: &str = "tests.single_core.cryptography.rsa_2048";
pub const SYNTHETIC_LZ4: &str = "tests.multi_core.compression.lz4";
pub const SYNTHETIC_ZSTD: &str = "tests.multi_core.compression.zstd";

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;
const MIB: f64 = 1024.0 * 1024.0;

/// Phases of a suite run.
///
/// Running phases may always move to `Complete` so a cancelled suite can
/// finish with what it measured so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuitePhase {
    Idle,
    SingleCore,
    MultiCore,
    Crypto,
    Compression,
    Complete,
    Error,
}

impl SuitePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuitePhase::Idle => "idle",
            SuitePhase::SingleCore => "single_core",
            SuitePhase::MultiCore => "multi_core",
            SuitePhase::Crypto => "crypto",
            SuitePhase::Compression => "compression",
            SuitePhase::Complete => "complete",
            SuitePhase::Error => "error",
        }
    }

    pub fn valid_next_phases(&self) -> &'static [SuitePhase] {
        match self {
            SuitePhase::Idle => &[
                SuitePhase::SingleCore,
                SuitePhase::Crypto,
                SuitePhase::Compression,
                SuitePhase::Complete,
                SuitePhase::Error,
            ],
            SuitePhase::SingleCore => &[SuitePhase::MultiCore, SuitePhase::Complete, SuitePhase::Error],
            SuitePhase::MultiCore => &[SuitePhase::Crypto, SuitePhase::Complete, SuitePhase::Error],
            SuitePhase::Crypto => &[SuitePhase::Compression, SuitePhase::Complete, SuitePhase::Error],
            SuitePhase::Compression => &[SuitePhase::Complete, SuitePhase::Error],
            SuitePhase::Complete | SuitePhase::Error => &[],
        }
    }

    pub fn can_transition_to(&self, next: SuitePhase) -> bool {
        self.valid_next_phases().contains(&next)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SuitePhase::Complete | SuitePhase::Error)
    }
}

impl fmt::Display for SuitePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which sub-test families a run covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestType {
    All,
    Compute,
    Crypto,
    Compress,
}

impl TestType {
    pub const ALL: [TestType; 4] = [TestType::All, TestType::Compute, TestType::Crypto, TestType::Compress];

    pub fn as_str(&self) -> &'static str {
        match self {
            TestType::All => "all",
            TestType::Compute => "compute",
            TestType::Crypto => "crypto",
            TestType::Compress => "compress",
        }
    }

    /// Phases to run with their share of the budget as (numerator, denominator).
    ///
    /// The `all` shares add up to 5/4 of the requested duration.
    pub fn plan(&self) -> &'static [(SuitePhase, u32, u32)] {
        match self {
            TestType::All => &[
                (SuitePhase::SingleCore, 1, 4),
                (SuitePhase::MultiCore, 1, 2),
                (SuitePhase::Crypto, 1, 4),
                (SuitePhase::Compression, 1, 4),
            ],
            TestType::Compute => &[(SuitePhase::SingleCore, 1, 2), (SuitePhase::MultiCore, 1, 2)],
            TestType::Crypto => &[(SuitePhase::Crypto, 1, 1)],
            TestType::Compress => &[(SuitePhase::Compression, 1, 1)],
        }
    }
}

impl FromStr for TestType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        TestType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| ConfigError::UnknownTestType(s.to_string()))
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a human time span such as `"60s"`, `"2m"`, `"1m 30s"` or `"500ms"`.
pub fn parse_duration(input: &str) -> Result<Duration, ConfigError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::InvalidDuration {
            input: input.to_string(),
            reason: "empty duration".to_string(),
        });
    }
    humantime::parse_duration(trimmed).map_err(|e| ConfigError::InvalidDuration {
        input: input.to_string(),
        reason: e.to_string(),
    })
}

/// Percentile annotation for an integer sub-score.
pub fn percentile_for(score: u64) -> u32 {
    match score {
        s if s > 2000 => 95,
        s if s > 1500 => 85,
        s if s > 1000 => 75,
        s if s > 500 => 50,
        _ => 25,
    }
}

fn share(budget: Duration, numerator: u32, denominator: u32) -> Duration {
    budget * numerator / denominator.max(1)
}

fn per_second(units: f64, budget: Duration) -> f64 {
    let nanos = budget.as_nanos() as f64;
    if nanos > 0.0 {
        units * 1e9 / nanos
    } else {
        0.0
    }
}

/// Sequences the CPU sub-tests for one invocation.
pub struct CpuTestSuite<C: Clock = SystemClock> {
    executor: WorkloadExecutor<C>,
    thermal: Box<dyn ThermalProbe>,
    threads: usize,
    phase: SuitePhase,
    history: Vec<SuitePhase>,
    error: Option<String>,
}

impl CpuTestSuite<SystemClock> {
    /// Suite on the wall clock with the platform thermal probe.
    /// `threads = 0` uses every logical CPU for the multi-threaded phases.
    pub fn new(threads: usize) -> Self {
        Self::with_executor(threads, WorkloadExecutor::new())
    }
}

impl<C: Clock> CpuTestSuite<C> {
    pub fn with_executor(threads: usize, executor: WorkloadExecutor<C>) -> Self {
        CpuTestSuite {
            executor,
            thermal: default_probe(),
            threads,
            phase: SuitePhase::Idle,
            history: vec![SuitePhase::Idle],
            error: None,
        }
    }

    pub fn with_thermal(mut self, probe: Box<dyn ThermalProbe>) -> Self {
        self.thermal = probe;
        self
    }

    pub fn phase(&self) -> SuitePhase {
        self.phase
    }

    /// Every phase entered so far, starting with `Idle`.
    pub fn history(&self) -> &[SuitePhase] {
        &self.history
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Flag that stops the running phase and skips the remaining ones.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.executor.cancel_flag()
    }

    pub fn transition_to(&mut self, next: SuitePhase) -> Result<(), String> {
        if !self.phase.can_transition_to(next) {
            return Err(format!(
                "Invalid phase transition: {} -> {}",
                self.phase.as_str(),
                next.as_str()
            ));
        }
        log::debug!("[Suite] {} -> {}", self.phase, next);
        self.phase = next;
        self.history.push(next);
        Ok(())
    }

    fn record_error(&mut self, error: String) {
        log::error!("[Suite] {}", error);
        self.error = Some(error);
        self.phase = SuitePhase::Error;
        self.history.push(SuitePhase::Error);
    }

    /// Parse the textual inputs and run. Any parse failure moves the suite
    /// to `Error` before a single workload starts.
    pub fn execute(&mut self, duration: &str, test_type: &str) -> Result<CpuResults, ConfigError> {
        let parsed = parse_duration(duration).and_then(|d| Ok((d, test_type.parse::<TestType>()?)));
        match parsed {
            Ok((budget, kind)) => {
                let mut results = self.run(budget, kind)?;
                results.duration = duration.trim().to_string();
                Ok(results)
            }
            Err(e) => {
                self.record_error(e.to_string());
                Err(e)
            }
        }
    }

    /// Run every phase of `test_type`'s plan against `budget`.
    ///
    /// A suite runs once. Any rejected phase transition leaves it in `Error`
    /// and no results are returned.
    pub fn run(&mut self, budget: Duration, test_type: TestType) -> Result<CpuResults, ConfigError> {
        let started = Instant::now();
        let mut results = CpuResults {
            test_suite: CPU_TEST_SUITE.to_string(),
            duration: humantime::format_duration(budget).to_string(),
            ..CpuResults::default()
        };

        log::info!(
            "[Suite] Starting {} run: budget {:?}, threads {}",
            test_type,
            budget,
            self.threads
        );
        let before = self.thermal.sample();

        for (phase, numerator, denominator) in test_type.plan() {
            if self.executor.is_cancelled() {
                log::warn!("[Suite] Cancelled before {}", phase);
                results.cancelled = true;
                break;
            }
            if let Err(e) = self.transition_to(*phase) {
                self.record_error(e.clone());
                return Err(ConfigError::InvalidTransition(e));
            }
            let allotted = share(budget, *numerator, *denominator);
            match phase {
                SuitePhase::SingleCore => self.single_core(allotted, &mut results),
                SuitePhase::MultiCore => self.multi_core(allotted, &mut results),
                SuitePhase::Crypto => self.crypto(allotted, &mut results),
                SuitePhase::Compression => self.compression(allotted, &mut results),
                _ => {}
            }
        }
        if self.executor.is_cancelled() {
            results.cancelled = true;
        }

        if let Err(e) = self.transition_to(SuitePhase::Complete) {
            self.record_error(e.clone());
            return Err(ConfigError::InvalidTransition(e));
        }
        apply_thermal(&mut results, before, self.thermal.sample());

        log::info!(
            "[Suite] {} run finished in {:.2}s{}",
            test_type,
            started.elapsed().as_secs_f64(),
            if results.cancelled { " (cancelled)" } else { "" }
        );
        Ok(results)
    }

    fn measure(&self, workers: usize, budget: Duration, workload: &dyn Workload) -> u64 {
        self.executor.run(workers, budget, workload)
    }

    fn single_core(&self, budget: Duration, results: &mut CpuResults) {
        let ops = self.measure(1, budget, &ScalarCompute::single_core());
        let score = ops / OPS_PER_POINT;
        let single = &mut results.tests.single_core;
        single.integer_performance = integer_score(score);
        single.floating_point = float_score(score);
        log::info!("[Suite] single_core: {} points", score);
    }

    fn multi_core(&self, budget: Duration, results: &mut CpuResults) {
        let ops = self.measure(self.threads, budget, &ParallelCompute::multi_core());
        let score = ops / OPS_PER_POINT;
        let multi = &mut results.tests.multi_core;
        multi.integer_performance = integer_score(score);
        multi.floating_point = float_score(score);
        log::info!("[Suite] multi_core: {} points", score);
    }

    fn crypto(&self, budget: Duration, results: &mut CpuResults) {
        let third = budget / 3;
        let aes = self.measure(1, third, &AesGcmEncrypt::new(AES_BUFFER_BYTES));
        let sha = self.measure(1, third, &Sha256Digest::new(SHA_BUFFER_BYTES));
        let rsa = self.measure(1, third, &ModExpProxy::rsa_2048());

        let crypto = &mut results.tests.single_core.cryptography;
        crypto.aes_256 = per_second(aes as f64, third) / GIB;
        crypto.sha256 = per_second(sha as f64, third) / GIB;
        crypto.rsa_2048 = per_second(rsa as f64, third) as u64;
        push_synthetic(results, SYNTHETIC_RSA);
        log::info!(
            "[Suite] crypto: aes {:.3} GiB/s, sha256 {:.3} GiB/s, rsa {} ops/s",
            results.tests.single_core.cryptography.aes_256,
            results.tests.single_core.cryptography.sha256,
            results.tests.single_core.cryptography.rsa_2048
        );
    }

    fn compression(&self, budget: Duration, results: &mut CpuResults) {
        let bytes = self.measure(self.threads, budget, &GzipCompress::new(GZIP_BUFFER_BYTES));
        let gzip = per_second(bytes as f64, budget) / MIB;

        let compression = &mut results.tests.multi_core.compression;
        compression.gzip = gzip as u64;
        compression.lz4 = (gzip * LZ4_FACTOR) as u64;
        compression.zstd = (gzip * ZSTD_FACTOR) as u64;
        push_synthetic(results, SYNTHETIC_LZ4);
        push_synthetic(results, SYNTHETIC_ZSTD);
        log::info!("[Suite] compression: gzip {} MB/s", results.tests.multi_core.compression.gzip);
    }
}

fn integer_score(score: u64) -> IntegerScore {
    IntegerScore {
        score,
        unit: SCORE_UNIT.to_string(),
        percentile: percentile_for(score),
    }
}

fn float_score(score: u64) -> FloatScore {
    FloatScore {
        score: score as f64,
        unit: SCORE_UNIT.to_string(),
        percentile: percentile_for(score),
    }
}

fn push_synthetic(results: &mut CpuResults, path: &str) {
    if !results.synthetic_metrics.iter().any(|p| p == path) {
        results.synthetic_metrics.push(path.to_string());
    }
}

fn apply_thermal(results: &mut CpuResults, before: ThermalReading, after: ThermalReading) {
    results.temperature.idle = before.idle;
    results.temperature.load = after.load;
    results.temperature.max = before.max.max(after.max);
    results.frequencies.average_all_cores = after.average_mhz;
    results.frequencies.stability = after.stability;
}

/// Run the CPU suite on the wall clock.
///
/// `threads = 0` uses every logical CPU. `duration` is a human time span and
/// `test_type` one of `all`, `compute`, `crypto`, `compress`; either being
/// invalid is reported before any workload runs.
pub fn execute_test(threads: usize, duration: &str, test_type: &str) -> Result<CpuResults, ConfigError> {
    CpuTestSuite::new(threads).execute(duration, test_type)
}
