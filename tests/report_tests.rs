//! End-to-end report pipeline: results document -> report -> store -> reload.

use octane::config::UploadSettings;
use octane::models::{BandwidthResult, DeviceResults, TestResults};
use octane::octane::{BaselineRegistry, Grade, OctaneCalculator};
use octane::report::{HostInfo, ReportBuilder, ReportStore};
use octane::{PlatformInfo, ReportError};
use tempfile::TempDir;

/// Results for a mid-range desktop with a weak network link.
fn desktop_results() -> TestResults {
    let mut results = TestResults::default();
    results.cpu.tests.single_core.integer_performance.score = 2600;
    results.cpu.tests.multi_core.integer_performance.score = 24000;
    results.cpu.temperature.max = 72.0;

    results.memory.bandwidth.sequential_read = 48000.0;
    results.memory.bandwidth.sequential_write = 45000.0;
    results.memory.bandwidth.copy = 40000.0;
    results.memory.latency.main_memory = 75.0;

    let mut device = DeviceResults {
        name: "nvme0n1".to_string(),
        ..DeviceResults::default()
    };
    device.tests.sequential.read_1mb = 3200.0;
    device.tests.sequential.write_1mb = 2800.0;
    device.tests.random.read_4k_iops = 450_000.0;
    device.tests.random.write_4k_iops = 380_000.0;
    device.tests.latency.read_avg = 0.08;
    device.tests.latency.write_avg = 0.02;
    results.storage.devices.push(device);

    results.gpu.tests.graphics.score = 22000.0;
    results.gpu.tests.compute.single_precision = 30000.0;
    results.gpu.temperature.max = 70.0;
    results.gpu.power_consumption.peak = 250.0;

    results.network.bandwidth.domestic.insert(
        "shanghai".to_string(),
        BandwidthResult {
            download: 40.0,
            upload: 10.0,
            latency: 120.0,
            ..BandwidthResult::default()
        },
    );
    results
}

fn platform() -> PlatformInfo {
    PlatformInfo {
        model_name: "AMD Ryzen 7 7700X 8-Core Processor".to_string(),
        brand: "AMD".to_string(),
        architecture: "x86_64".to_string(),
        physical_cores: 8,
        logical_cores: 16,
        ..PlatformInfo::default()
    }
}

fn host() -> HostInfo {
    HostInfo {
        os: "Arch Linux".to_string(),
        hostname: "workstation-7".to_string(),
        ..HostInfo::default()
    }
}

#[test]
fn test_report_sections_are_consistent() {
    let registry = BaselineRegistry::new();
    let calculator = OctaneCalculator::new(&registry);
    let results = desktop_results();

    let report = ReportBuilder::new(&calculator)
        .platform(platform())
        .host(host())
        .duration("60s")
        .precision(2)
        .build(&results);

    assert_eq!(report.test_results, results);
    assert_eq!(report.metadata.duration, "60s");
    assert_eq!(report.metadata.test_id, report.upload_info.report_id);
    assert!(!report.upload_info.uploaded);
    assert_eq!(report.system_info.cpu.logical_cores, 16);

    let overall = report.octane_ratings.overall;
    assert_eq!(report.scores.overall, (overall.ron() * 100.0).round() / 100.0);
    assert_eq!(report.octane_ratings.breakdown.len(), 5);
    for (domain, rating) in &report.octane_ratings.breakdown {
        let rounded = report.scores.breakdown.get(domain).copied().expect("domain score");
        assert!((rounded - rating.ron()).abs() <= 0.005 + 1e-9, "{}", domain);
    }
    assert_eq!(report.scores.professional_scenarios, calculator.calculate_professional_scenarios(&results));
}

#[test]
fn test_weakest_domain_gets_first_tip() {
    let registry = BaselineRegistry::new();
    let calculator = OctaneCalculator::new(&registry);
    let report = ReportBuilder::new(&calculator).build(&desktop_results());

    let tips = &report.recommendations.fuel_optimization_tips;
    assert!(!tips.is_empty());
    for tip in tips {
        let ron = report.octane_ratings.breakdown[&tip.category].ron();
        assert!(ron < Grade::Premium.band().min_ron, "{} = {}", tip.category, ron);
        assert!(tip.octane_boost.starts_with('+'));
    }
    let weakest = report
        .octane_ratings
        .breakdown
        .iter()
        .min_by(|a, b| a.1.ron().total_cmp(&b.1.ron()))
        .map(|(name, _)| name.clone())
        .expect("breakdown");
    assert_eq!(tips[0].category, weakest);
}

#[test]
fn test_anonymous_upload_hides_identity() {
    let registry = BaselineRegistry::new();
    let calculator = OctaneCalculator::new(&registry);

    let anonymous = ReportBuilder::new(&calculator)
        .host(host())
        .upload_settings(&UploadSettings::default())
        .build(&desktop_results());
    assert_eq!(anonymous.metadata.hostname, "anonymous");
    assert_eq!(anonymous.metadata.user, "anonymous");
    assert!(anonymous.upload_info.anonymized);

    let named_settings = UploadSettings {
        anonymous: false,
        tags: vec!["ci".to_string()],
        ..UploadSettings::default()
    };
    let named = ReportBuilder::new(&calculator)
        .host(host())
        .upload_settings(&named_settings)
        .build(&desktop_results());
    assert_eq!(named.metadata.hostname, "workstation-7");
    assert_eq!(named.metadata.tags, vec!["ci".to_string()]);
    assert_ne!(named.metadata.test_id, anonymous.metadata.test_id);
}

#[test]
fn test_store_round_trip_from_results_json() {
    let temp_dir = TempDir::new().expect("tempdir");
    let store = ReportStore::new(temp_dir.path().join("reports")).expect("store");
    assert!(store.latest().expect("latest").is_none());

    // Results arrive as a JSON document, the way `octane score` reads them.
    let json = serde_json::to_string_pretty(&desktop_results()).expect("serialize");
    let results: TestResults = serde_json::from_str(&json).expect("deserialize");

    let registry = BaselineRegistry::new();
    let calculator = OctaneCalculator::new(&registry).with_tier("mid_range");
    let builder = ReportBuilder::new(&calculator).platform(platform()).host(host());

    let first = builder.build(&results);
    let second = builder.build(&results);
    let first_id = store.save(&first).expect("save first");
    let second_id = store.save(&second).expect("save second");
    assert_ne!(first_id, second_id);

    assert_eq!(store.list().expect("list"), vec![second_id.clone(), first_id.clone()]);
    assert_eq!(store.load(&first_id).expect("load"), first);
    assert_eq!(store.latest().expect("latest"), Some(second));
}

#[test]
fn test_store_rejects_foreign_names() {
    let temp_dir = TempDir::new().expect("tempdir");
    let store = ReportStore::new(temp_dir.path()).expect("store");
    std::fs::write(temp_dir.path().join("notes.json"), "{}").expect("write");

    assert!(store.list().expect("list").is_empty());
    assert!(matches!(store.load("notes.json"), Err(ReportError::NotFound(_))));
    assert!(matches!(store.load("report_1.json"), Err(ReportError::NotFound(_))));
    assert!(matches!(store.load("../report_1.json"), Err(ReportError::NotFound(_))));
}
