//! Octane Rating calculator.
//!
//! Maps raw per-domain measurements onto the [70, 100] RON scale:
//!
//! - **Throughput metrics**: `70 + 30 * log10(raw / baseline)`. A raw value
//!   equal to the baseline scores 70, ten times the baseline scores 100.
//! - **Latency / reachability metrics**: linear `70 + 30 * score / 100` on a
//!   0..100 sub-score.
//! - **Composition**: fixed weight vectors per domain, then domain penalties or
//!   bonuses, then the only clamp to [70, 100].
//!
//! Components are left unclamped so a deficit in one metric offsets a surplus
//! in another. Invalid inputs (zero, negative, NaN, infinite) never escape as
//! NaN: the affected component scores the floor.

use super::baseline::{BaselineProfile, BaselineRegistry, DEFAULT_TIER};
use super::grades::{sanitize_ron, OctaneRating, RON_FLOOR};
use super::scenarios::{DomainRons, ProfessionalScenarioScorer, ProfessionalScenarios};
use super::weights::{
    overall_weights, CpuMetric, DomainWeights, GpuMetric, MemoryMetric, NetworkMetric,
    StorageMetric, WeightVector,
};
use crate::error::ScoringError;
use crate::models::{
    CpuResults, DeviceResults, Domain, GpuResults, MemoryResults, NetworkResults, StorageResults,
    TestResults,
};
use std::collections::BTreeMap;

/// Multi-core scores are compared against an 8-core reference machine.
pub const MULTI_CORE_REFERENCE_CORES: f64 = 8.0;
/// Random IOPS are compared against `baseline * 1000`.
pub const IOPS_BASELINE_FACTOR: f64 = 1000.0;
/// GPU compute is compared against `baseline * 10`.
pub const GPU_COMPUTE_BASELINE_FACTOR: f64 = 10.0;

pub const CPU_THERMAL_LIMIT_C: f64 = 85.0;
pub const CPU_THERMAL_PENALTY: f64 = 0.95;
pub const GPU_THERMAL_LIMIT_C: f64 = 80.0;
pub const GPU_THERMAL_PENALTY: f64 = 0.95;
pub const GPU_POWER_LIMIT_W: f64 = 400.0;
pub const GPU_POWER_PENALTY: f64 = 0.98;
pub const MEMORY_STABILITY_BONUS: f64 = 5.0;
/// Domestic samples slower than this lose latency points.
pub const NETWORK_LATENCY_LIMIT_MS: f64 = 50.0;
pub const NETWORK_LATENCY_STEP: f64 = 10.0;

/// Unclamped log-relative component: `70 + 30 * log10(raw / baseline)`.
pub fn log_relative(raw: f64, baseline: f64) -> f64 {
    if !raw.is_finite() || !baseline.is_finite() || raw <= 0.0 || baseline <= 0.0 {
        return RON_FLOOR;
    }
    // keeps the logarithm finite when the ratio under- or overflows
    let ratio = (raw / baseline).clamp(f64::MIN_POSITIVE, f64::MAX);
    70.0 + 30.0 * ratio.log10()
}

/// Unclamped linear component from a 0..100 sub-score: `70 + 30 * score / 100`.
pub fn linear_component(score: f64) -> f64 {
    if !score.is_finite() {
        return RON_FLOOR;
    }
    70.0 + 30.0 * score / 100.0
}

/// Scoring engine bound to a baseline registry and tier.
///
/// The registry is read on every call, so tier updates made between
/// calculations are always observed.
#[derive(Debug, Clone)]
pub struct OctaneCalculator<'a> {
    registry: &'a BaselineRegistry,
    tier: String,
    domain_weights: DomainWeights,
    overall: WeightVector<Domain>,
    scenarios: ProfessionalScenarioScorer,
}

impl<'a> OctaneCalculator<'a> {
    /// Calculator using the "default" tier.
    pub fn new(registry: &'a BaselineRegistry) -> Self {
        OctaneCalculator {
            registry,
            tier: DEFAULT_TIER.to_string(),
            domain_weights: DomainWeights::default(),
            overall: overall_weights(),
            scenarios: ProfessionalScenarioScorer::new(),
        }
    }

    pub fn with_tier(mut self, tier: impl Into<String>) -> Self {
        self.tier = tier.into();
        self
    }

    /// Replace the overall domain weights. Rejects vectors that do not sum to 1.0.
    pub fn with_overall_weights(mut self, weights: WeightVector<Domain>) -> Result<Self, ScoringError> {
        weights.validate()?;
        self.overall = weights;
        Ok(self)
    }

    pub fn tier(&self) -> &str {
        &self.tier
    }

    pub fn overall_weights(&self) -> &WeightVector<Domain> {
        &self.overall
    }

    /// Baseline for the configured tier (falls back to "default").
    pub fn baseline(&self) -> BaselineProfile {
        self.registry.get(&self.tier)
    }

    // ========================================================================
    // DOMAIN RONS
    // ========================================================================

    pub fn cpu_ron(&self, cpu: &CpuResults) -> f64 {
        let baseline = self.baseline().cpu;
        let single = log_relative(
            cpu.tests.single_core.integer_performance.score as f64,
            baseline,
        );
        let multi = log_relative(
            cpu.tests.multi_core.integer_performance.score as f64,
            baseline * MULTI_CORE_REFERENCE_CORES,
        );

        let mut ron = self.domain_weights.cpu.combine(|metric| match metric {
            CpuMetric::SingleCore => single,
            CpuMetric::MultiCore => multi,
        });
        if cpu.temperature.max > CPU_THERMAL_LIMIT_C {
            ron *= CPU_THERMAL_PENALTY;
        }

        log::debug!(
            "[Octane] cpu: single={:.2} multi={:.2} max_temp={:.1} -> {:.2}",
            single,
            multi,
            cpu.temperature.max,
            ron
        );
        sanitize_ron(ron)
    }

    pub fn memory_ron(&self, memory: &MemoryResults) -> f64 {
        let baseline = self.baseline().memory;
        let bw = &memory.bandwidth;
        let avg_bandwidth = (bw.sequential_read + bw.sequential_write + bw.copy) / 3.0;
        let bandwidth = log_relative(avg_bandwidth, baseline);
        let latency = linear_component(100.0 - memory.latency.main_memory);

        let mut ron = self.domain_weights.memory.combine(|metric| match metric {
            MemoryMetric::Bandwidth => bandwidth,
            MemoryMetric::Latency => latency,
        });
        if memory.stability.errors_detected == 0 {
            ron += MEMORY_STABILITY_BONUS;
        }

        log::debug!(
            "[Octane] memory: bandwidth={:.2} latency={:.2} errors={} -> {:.2}",
            bandwidth,
            latency,
            memory.stability.errors_detected,
            ron
        );
        sanitize_ron(ron)
    }

    /// Average of unclamped per-device ratings. No devices scores exactly 70.
    pub fn storage_ron(&self, storage: &StorageResults) -> f64 {
        if storage.devices.is_empty() {
            log::debug!("[Octane] storage: no devices, scoring floor");
            return RON_FLOOR;
        }
        let baseline = self.baseline().storage;
        let total: f64 = storage
            .devices
            .iter()
            .map(|device| self.storage_device_ron(device, baseline))
            .sum();
        sanitize_ron(total / storage.devices.len() as f64)
    }

    fn storage_device_ron(&self, device: &DeviceResults, baseline: f64) -> f64 {
        let tests = &device.tests;
        let iops_baseline = baseline * IOPS_BASELINE_FACTOR;
        let ron = self.domain_weights.storage.combine(|metric| match metric {
            StorageMetric::SequentialRead => log_relative(tests.sequential.read_1mb, baseline),
            StorageMetric::SequentialWrite => log_relative(tests.sequential.write_1mb, baseline),
            StorageMetric::RandomReadIops => log_relative(tests.random.read_4k_iops, iops_baseline),
            StorageMetric::RandomWriteIops => log_relative(tests.random.write_4k_iops, iops_baseline),
            StorageMetric::Latency => {
                linear_component(100.0 - (tests.latency.read_avg + tests.latency.write_avg))
            }
        });
        log::debug!("[Octane] storage device '{}' -> {:.2}", device.name, ron);
        ron
    }

    pub fn gpu_ron(&self, gpu: &GpuResults) -> f64 {
        let baseline = self.baseline().gpu;
        let graphics = log_relative(gpu.tests.graphics.score, baseline);
        let compute = log_relative(
            gpu.tests.compute.single_precision,
            baseline * GPU_COMPUTE_BASELINE_FACTOR,
        );
        // No baseline exists for the ML block, graphics stands in for it.
        let machine_learning = graphics;

        let mut ron = self.domain_weights.gpu.combine(|metric| match metric {
            GpuMetric::Graphics => graphics,
            GpuMetric::Compute => compute,
            GpuMetric::MachineLearning => machine_learning,
        });
        if gpu.temperature.max > GPU_THERMAL_LIMIT_C {
            ron *= GPU_THERMAL_PENALTY;
        }
        if gpu.power_consumption.peak > GPU_POWER_LIMIT_W {
            ron *= GPU_POWER_PENALTY;
        }

        log::debug!(
            "[Octane] gpu: graphics={:.2} compute={:.2} max_temp={:.1} peak_w={:.0} -> {:.2}",
            graphics,
            compute,
            gpu.temperature.max,
            gpu.power_consumption.peak,
            ron
        );
        sanitize_ron(ron)
    }

    pub fn network_ron(&self, network: &NetworkResults) -> f64 {
        let baseline = self.baseline().network;
        let domestic = &network.bandwidth.domestic;

        let mean_download = if domestic.is_empty() {
            0.0
        } else {
            domestic.values().map(|s| s.download).sum::<f64>() / domestic.len() as f64
        };
        let bandwidth = log_relative(mean_download, baseline);

        let slow_samples = domestic
            .values()
            .filter(|s| s.latency > NETWORK_LATENCY_LIMIT_MS)
            .count();
        let latency = linear_component(100.0 - NETWORK_LATENCY_STEP * slow_samples as f64);

        let services = &network.connectivity.service_accessibility;
        let reachable = services.values().filter(|ok| **ok).count();
        let reachable_fraction = if services.is_empty() {
            0.0
        } else {
            reachable as f64 / services.len() as f64
        };
        let connectivity = linear_component(100.0 * reachable_fraction);

        let ron = self.domain_weights.network.combine(|metric| match metric {
            NetworkMetric::Bandwidth => bandwidth,
            NetworkMetric::Latency => latency,
            NetworkMetric::Connectivity => connectivity,
        });

        log::debug!(
            "[Octane] network: bandwidth={:.2} latency={:.2} connectivity={:.2} ({}/{}) -> {:.2}",
            bandwidth,
            latency,
            connectivity,
            reachable,
            services.len(),
            ron
        );
        sanitize_ron(ron)
    }

    /// RONs for all five domains.
    pub fn domain_rons(&self, results: &TestResults) -> DomainRons {
        DomainRons {
            cpu: self.cpu_ron(&results.cpu),
            memory: self.memory_ron(&results.memory),
            storage: self.storage_ron(&results.storage),
            gpu: self.gpu_ron(&results.gpu),
            network: self.network_ron(&results.network),
        }
    }

    // ========================================================================
    // PUBLIC RATINGS
    // ========================================================================

    /// Overall rating across every domain.
    pub fn calculate_octane(&self, results: &TestResults) -> OctaneRating {
        let rons = self.domain_rons(results);
        let overall = self.overall.combine(|domain| rons.get(domain));
        log::info!(
            "[Octane] tier='{}' cpu={:.1} memory={:.1} storage={:.1} gpu={:.1} network={:.1} -> overall {:.1}",
            self.tier,
            rons.cpu,
            rons.memory,
            rons.storage,
            rons.gpu,
            rons.network,
            overall
        );
        OctaneRating::from_ron(overall)
    }

    /// One rating per domain, keyed "cpu", "memory", "storage", "gpu", "network".
    pub fn calculate_component_octanes(&self, results: &TestResults) -> BTreeMap<String, OctaneRating> {
        let rons = self.domain_rons(results);
        Domain::ALL
            .iter()
            .map(|domain| (domain.as_str().to_string(), OctaneRating::from_ron(rons.get(*domain))))
            .collect()
    }

    pub fn calculate_professional_scenarios(&self, results: &TestResults) -> ProfessionalScenarios {
        self.scenarios.score(&self.domain_rons(results))
    }
}
