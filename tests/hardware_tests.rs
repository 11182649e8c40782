//! Hardware detection integration tests.
//!
//! - cpuinfo parsing for x86 and ARM layouts
//! - live platform detection degrading to the generic record
//! - thermal sampling against a fake sysfs tree
//! - the suite copying thermal readings into CPU results

use octane::hardware::{
    default_probe, parse_cpuinfo, IllustrativeThermal, PlatformInfoProvider, SysfsThermal, ThermalProbe,
    ThermalReading,
};
use octane::performance::{CpuTestSuite, TestType, TickClock, WorkloadExecutor};
use octane::HardwareError;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

const INTEL_TWO_CORES: &str = "\
processor\t: 0
vendor_id\t: GenuineIntel
cpu family\t: 6
model\t\t: 154
model name\t: 12th Gen Intel(R) Core(TM) i7-1260P
stepping\t: 3
cpu MHz\t\t: 2100.000
cache size\t: 18432 KB
cpu cores\t: 12
flags\t\t: fpu vme sse sse2 avx avx2

processor\t: 1
vendor_id\t: GenuineIntel
model name\t: should be ignored
cpu MHz\t\t: 400.000
";

const ARM_BOARD: &str = "\
processor\t: 0
BogoMIPS\t: 108.00
Features\t: fp asimd evtstrm crc32 cpuid
model name\t: ARMv8 Processor rev 1 (v8l)

processor\t: 1
BogoMIPS\t: 108.00

processor\t: 2

processor\t: 3
";

fn zone(root: &Path, name: &str, millidegrees: &str) {
    let dir = root.join(name);
    fs::create_dir_all(&dir).expect("zone dir");
    fs::write(dir.join("temp"), millidegrees).expect("temp file");
}

// ============================================================================
// CPU IDENTIFICATION
// ============================================================================

#[test]
fn test_intel_cpuinfo_first_block_wins() {
    let info = parse_cpuinfo(INTEL_TWO_CORES).expect("parse");
    assert_eq!(info.model_name, "12th Gen Intel(R) Core(TM) i7-1260P");
    assert_eq!(info.brand, "Intel");
    assert_eq!(info.logical_cores, 2);
    assert_eq!(info.physical_cores, 12);
    assert!((info.base_frequency_ghz - 2.1).abs() < 1e-9);
    assert_eq!(info.cache_l2, "18.0 MB");
    assert_eq!(info.family, "6");
    assert_eq!(info.model, "154");
    assert_eq!(info.stepping, "3");
    assert!(info.features.iter().any(|f| f == "avx2"));
}

#[test]
fn test_arm_cpuinfo_features_and_count() {
    let info = parse_cpuinfo(ARM_BOARD).expect("parse");
    assert_eq!(info.brand, "ARM");
    assert_eq!(info.logical_cores, 4);
    assert_eq!(info.features, vec!["fp", "asimd", "evtstrm", "crc32", "cpuid"]);
}

#[test]
fn test_cpuinfo_without_model_name_fails() {
    let result = parse_cpuinfo("processor\t: 0\nvendor_id\t: Mystery\n");
    assert!(matches!(result, Err(HardwareError::ParseFailed(_))));
}

#[test]
fn test_detect_never_panics_and_is_populated() {
    let info = PlatformInfoProvider::detect();
    assert!(!info.model_name.is_empty());
    assert!(info.logical_cores >= 1);
    assert!(!info.architecture.is_empty());
}

#[test]
fn test_generic_record() {
    let info = PlatformInfoProvider::generic();
    assert_eq!(info.model_name, "Unknown CPU");
    assert_eq!(info.logical_cores as usize, num_cpus::get());
}

// ============================================================================
// THERMAL SAMPLING
// ============================================================================

#[test]
fn test_sysfs_hottest_zone_is_reported() {
    let temp_dir = TempDir::new().expect("tempdir");
    zone(temp_dir.path(), "thermal_zone0", "41000\n");
    zone(temp_dir.path(), "thermal_zone1", "83500\n");
    zone(temp_dir.path(), "cooling_device0", "99000\n");

    let reading = SysfsThermal::with_root(temp_dir.path()).sample();
    assert_eq!(reading.max, 83.5);
    assert_eq!(reading.load, 83.5);
    assert_eq!(reading.idle, 83.5);
    assert_eq!(reading.average_mhz, ThermalReading::illustrative().average_mhz);
}

#[test]
fn test_sysfs_without_zones_is_illustrative() {
    let temp_dir = TempDir::new().expect("tempdir");
    zone(temp_dir.path(), "thermal_zone0", "not a number");

    let reading = SysfsThermal::with_root(temp_dir.path().join("missing")).sample();
    assert_eq!(reading, ThermalReading::illustrative());
    assert_eq!(SysfsThermal::with_root(temp_dir.path()).sample(), ThermalReading::illustrative());
}

#[test]
fn test_default_probe_yields_plausible_values() {
    let reading = default_probe().sample();
    assert!(reading.max.is_finite() && reading.max > 0.0);
    assert!(reading.idle <= reading.max);
}

#[test]
fn test_suite_records_probe_readings() {
    let temp_dir = TempDir::new().expect("tempdir");
    zone(temp_dir.path(), "thermal_zone3", "91000");

    let executor = WorkloadExecutor::with_clock(TickClock::new(Duration::from_millis(1)));
    let mut suite = CpuTestSuite::with_executor(1, executor)
        .with_thermal(Box::new(SysfsThermal::with_root(temp_dir.path())));
    let results = suite.run(Duration::from_millis(40), TestType::Compute).expect("run");

    assert_eq!(results.temperature.max, 91.0);
    assert_eq!(results.temperature.load, 91.0);
    assert_eq!(results.temperature.idle, 91.0);

    let mut plain = CpuTestSuite::with_executor(
        1,
        WorkloadExecutor::with_clock(TickClock::new(Duration::from_millis(1))),
    )
    .with_thermal(Box::new(IllustrativeThermal));
    let results = plain.run(Duration::from_millis(40), TestType::Compute).expect("run");
    assert_eq!(results.temperature.max, 78.0);
    assert_eq!(results.frequencies.average_all_cores, 3200.0);
}
