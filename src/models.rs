//! Core data types for Octane.
//!
//! Raw per-domain measurements (`CpuResults`, `MemoryResults`, ...) and the
//! platform identification record. Every struct deserializes with
//! `#[serde(default)]` so a partially populated results file can still be
//! scored: missing domains fall to the rating floor.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Hardware domain under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Cpu,
    Memory,
    Storage,
    Gpu,
    Network,
}

impl Domain {
    pub const ALL: [Domain; 5] = [
        Domain::Cpu,
        Domain::Memory,
        Domain::Storage,
        Domain::Gpu,
        Domain::Network,
    ];

    /// Key used in component maps and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Cpu => "cpu",
            Domain::Memory => "memory",
            Domain::Storage => "storage",
            Domain::Gpu => "gpu",
            Domain::Network => "network",
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SHARED BLOCKS
// ============================================================================

/// Temperature samples in °C.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Temperature {
    pub idle: f64,
    pub load: f64,
    pub max: f64,
}

/// Integer benchmark score with unit and percentile annotation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegerScore {
    pub score: u64,
    pub unit: String,
    pub percentile: u32,
}

/// Floating point benchmark score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloatScore {
    pub score: f64,
    pub unit: String,
    pub percentile: u32,
}

// ============================================================================
// CPU
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Frequencies {
    /// MHz
    pub average_all_cores: f64,
    /// Percent
    pub stability: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cryptography {
    /// GiB/s
    pub aes_256: f64,
    /// GiB/s
    pub sha256: f64,
    /// ops/s
    pub rsa_2048: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Compression {
    /// MB/s
    pub gzip: u64,
    pub lz4: u64,
    pub zstd: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SingleCoreTests {
    pub integer_performance: IntegerScore,
    pub floating_point: FloatScore,
    pub cryptography: Cryptography,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiCoreTests {
    pub integer_performance: IntegerScore,
    pub floating_point: FloatScore,
    pub compression: Compression,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuTests {
    pub single_core: SingleCoreTests,
    pub multi_core: MultiCoreTests,
}

/// Result of one CPU suite run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuResults {
    pub test_suite: String,
    pub duration: String,
    pub temperature: Temperature,
    pub frequencies: Frequencies,
    pub tests: CpuTests,
    /// Dotted paths of metrics that are estimates rather than measurements,
    /// e.g. `tests.multi_core.compression.lz4`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub synthetic_metrics: Vec<String>,
    /// True when the run was cut short by a cancel request.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub cancelled: bool,
}

// ============================================================================
// MEMORY
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryBandwidth {
    pub sequential_read: f64,
    pub sequential_write: f64,
    pub random_read: f64,
    pub random_write: f64,
    pub copy: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryLatency {
    pub l1_cache: f64,
    pub l2_cache: f64,
    pub l3_cache: f64,
    pub main_memory: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryStability {
    pub errors_detected: u32,
    pub test_duration: String,
    /// MB
    pub memory_tested: f64,
    pub passes: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryResults {
    pub test_suite: String,
    pub duration: String,
    pub bandwidth: MemoryBandwidth,
    pub latency: MemoryLatency,
    pub stability: MemoryStability,
}

// ============================================================================
// STORAGE
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequentialIo {
    pub read_1mb: f64,
    pub write_1mb: f64,
    pub read_4k: f64,
    pub write_4k: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomIo {
    pub read_4k_iops: f64,
    pub write_4k_iops: f64,
    pub mixed_70_30: f64,
}

/// Storage latency in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IoLatency {
    pub read_avg: f64,
    pub write_avg: f64,
    pub read_99p: f64,
    pub write_99p: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceTests {
    pub sequential: SequentialIo,
    pub random: RandomIo,
    pub latency: IoLatency,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceResults {
    pub name: String,
    pub tests: DeviceTests,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageResults {
    pub test_suite: String,
    pub duration: String,
    pub devices: Vec<DeviceResults>,
}

// ============================================================================
// GPU
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerConsumption {
    /// Watts
    pub idle: f64,
    pub average: f64,
    pub peak: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiScore {
    pub score: u64,
    pub fps_1080p: u32,
    pub fps_1440p: u32,
    pub fps_4k: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Graphics {
    pub opengl: ApiScore,
    pub directx12: ApiScore,
    pub vulkan: ApiScore,
    /// Composite graphics score
    pub score: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CudaCompute {
    pub single_precision: f64,
    pub half_precision: f64,
    pub tensor_ops: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenClCompute {
    pub single_precision: f64,
    pub double_precision: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Compute {
    pub cuda: CudaCompute,
    pub opencl: OpenClCompute,
    /// Composite single precision compute score
    pub single_precision: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResNetInference {
    pub batch_1: u32,
    pub batch_32: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BertInference {
    pub batch_1: u32,
    pub batch_16: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Inference {
    pub resnet50_fp32: ResNetInference,
    pub bert_base: BertInference,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CnnTraining {
    pub batch_32: u32,
    pub batch_128: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Training {
    pub simple_cnn: CnnTraining,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineLearning {
    pub inference: Inference,
    pub training: Training,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoEncoding {
    pub h264_1080p: u32,
    pub h264_4k: u32,
    pub h265_1080p: u32,
    pub h265_4k: u32,
    pub av1_1080p: u32,
    pub av1_4k: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GpuMemory {
    /// GB/s
    pub bandwidth: f64,
    /// µs
    pub latency: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GpuTests {
    pub graphics: Graphics,
    pub compute: Compute,
    pub machine_learning: MachineLearning,
    pub video_encoding: VideoEncoding,
    pub memory: GpuMemory,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GpuResults {
    pub test_suite: String,
    pub duration: String,
    pub temperature: Temperature,
    pub power_consumption: PowerConsumption,
    pub tests: GpuTests,
}

// ============================================================================
// NETWORK
// ============================================================================

/// One bandwidth sample against a named endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandwidthResult {
    /// Mbps
    pub download: f64,
    pub upload: f64,
    /// ms
    pub latency: f64,
    pub jitter: f64,
    /// Percent
    pub packet_loss: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkBandwidth {
    pub domestic: BTreeMap<String, BandwidthResult>,
    pub international: BTreeMap<String, BandwidthResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Connectivity {
    /// ms per resolver
    pub dns_resolution: BTreeMap<String, f64>,
    pub service_accessibility: BTreeMap<String, bool>,
    pub port_scan: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkResults {
    pub test_suite: String,
    pub duration: String,
    pub bandwidth: NetworkBandwidth,
    pub connectivity: Connectivity,
}

// ============================================================================
// AGGREGATES
// ============================================================================

/// The five domain results of one benchmark session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestResults {
    pub cpu: CpuResults,
    pub memory: MemoryResults,
    pub storage: StorageResults,
    pub gpu: GpuResults,
    pub network: NetworkResults,
}

/// Processor identification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformInfo {
    pub model_name: String,
    pub brand: String,
    pub architecture: String,
    pub physical_cores: u32,
    pub logical_cores: u32,
    pub base_frequency_ghz: f64,
    pub max_frequency_ghz: f64,
    pub cache_l1_data: String,
    pub cache_l1_instruction: String,
    pub cache_l2: String,
    pub cache_l3: String,
    pub features: Vec<String>,
    pub tdp_watts: u32,
    pub family: String,
    pub model: String,
    pub stepping: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_keys() {
        let keys: Vec<&str> = Domain::ALL.iter().map(|d| d.as_str()).collect();
        assert_eq!(keys, vec!["cpu", "memory", "storage", "gpu", "network"]);
        assert_eq!(
            serde_json::to_string(&Domain::Gpu).expect("serialize"),
            "\"gpu\""
        );
    }

    #[test]
    fn test_partial_results_deserialize() {
        let json = r#"{
            "cpu": { "tests": { "single_core": { "integer_performance": { "score": 1200 } } } },
            "storage": { "devices": [ { "name": "nvme0n1" } ] }
        }"#;
        let results: TestResults = serde_json::from_str(json).expect("partial results parse");
        assert_eq!(results.cpu.tests.single_core.integer_performance.score, 1200);
        assert_eq!(results.storage.devices.len(), 1);
        assert_eq!(results.storage.devices[0].name, "nvme0n1");
        assert!(results.network.bandwidth.domestic.is_empty());
    }

    #[test]
    fn test_cpu_results_field_names() {
        let mut cpu = CpuResults::default();
        cpu.tests.single_core.cryptography.aes_256 = 1.5;
        cpu.tests.multi_core.compression.zstd = 120;
        let value = serde_json::to_value(&cpu).expect("serialize");
        assert_eq!(value["tests"]["single_core"]["cryptography"]["aes_256"], 1.5);
        assert_eq!(value["tests"]["multi_core"]["compression"]["zstd"], 120);
        assert!(value.get("synthetic_metrics").is_none());
        assert!(value.get("cancelled").is_none());
    }

    #[test]
    fn test_gpu_field_names() {
        let mut gpu = GpuResults::default();
        gpu.tests.machine_learning.inference.resnet50_fp32.batch_32 = 900;
        gpu.power_consumption.peak = 320.0;
        let value = serde_json::to_value(&gpu).expect("serialize");
        assert_eq!(
            value["tests"]["machine_learning"]["inference"]["resnet50_fp32"]["batch_32"],
            900
        );
        assert_eq!(value["power_consumption"]["peak"], 320.0);
    }
}
