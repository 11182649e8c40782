//! Integration tests for the config module
//!
//! Test Organization:
//! - Configuration Loading
//! - Configuration Saving
//! - Configuration Validation
//! - Baseline overrides flowing into scoring

use octane::config::{loader, OctaneConfig};
use octane::error::ConfigError;
use octane::octane::{BaselineProfile, OctaneCalculator};
use octane::performance::TestType;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = fs::File::create(&path).expect("create");
    file.write_all(content.as_bytes()).expect("write");
    path
}

// ============================================================================
// Configuration Loading
// ============================================================================

#[test]
fn test_load_partial_file_fills_defaults() {
    let temp_dir = TempDir::new().expect("tempdir");
    let path = write_file(
        &temp_dir,
        "settings.json",
        r#"{ "tests": { "duration": "2m", "test_type": "crypto", "threads": 4 } }"#,
    );

    let config = loader::load_config_from_file(&path).expect("load");
    assert_eq!(config.tests.duration, "2m");
    assert_eq!(config.tests.threads, 4);
    assert_eq!(config.test_type().expect("type"), TestType::Crypto);
    assert_eq!(config.general, OctaneConfig::default().general);
    assert_eq!(config.octane.precision, 1);
    assert!(config.tests.fuel_analysis);
    assert!(config.upload.anonymous);
}

#[test]
fn test_load_missing_file() {
    let temp_dir = TempDir::new().expect("tempdir");
    let result = loader::load_config_from_file(&temp_dir.path().join("absent.json"));
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
}

#[test]
fn test_load_invalid_json() {
    let temp_dir = TempDir::new().expect("tempdir");
    let path = write_file(&temp_dir, "broken.json", "{ \"tests\": ");
    assert!(matches!(
        loader::load_config_from_file(&path),
        Err(ConfigError::InvalidJson(_))
    ));
}

// ============================================================================
// Configuration Saving
// ============================================================================

#[test]
fn test_save_creates_parent_dirs_and_round_trips() {
    let temp_dir = TempDir::new().expect("tempdir");
    let path = temp_dir.path().join("nested").join("deeper").join("settings.json");

    let mut config = OctaneConfig::default();
    config.general.log_level = "debug".to_string();
    config.octane.baseline_tier = "enthusiast".to_string();
    config.upload.tags = vec!["lab".to_string(), "rack-3".to_string()];

    loader::save_config_to_file(&config, &path).expect("save");
    assert!(path.exists());

    let loaded = loader::load_config_from_file(&path).expect("load");
    assert_eq!(loaded, config);
}

#[test]
fn test_save_rejects_non_json_extension() {
    let temp_dir = TempDir::new().expect("tempdir");
    let path = temp_dir.path().join("settings.toml");
    let result = loader::save_config_to_file(&OctaneConfig::default(), &path);
    assert!(matches!(result, Err(ConfigError::ValidationFailed(_))));
    assert!(!path.exists());
}

#[test]
fn test_empty_overrides_not_serialized() {
    let json = serde_json::to_string(&OctaneConfig::default()).expect("serialize");
    assert!(!json.contains("baseline_overrides"));
}

// ============================================================================
// Configuration Validation
// ============================================================================

#[test]
fn test_invalid_files_are_rejected_on_load() {
    let temp_dir = TempDir::new().expect("tempdir");
    let cases = [
        (r#"{ "tests": { "duration": "forever" } }"#, "duration"),
        (r#"{ "tests": { "test_type": "gpu" } }"#, "test type"),
        (r#"{ "general": { "log_level": "loud" } }"#, "log level"),
        (r#"{ "octane": { "precision": 9 } }"#, "precision"),
        (r#"{ "upload": { "enabled": true } }"#, "upload url"),
    ];
    for (i, (content, what)) in cases.iter().enumerate() {
        let path = write_file(&temp_dir, &format!("case_{}.json", i), content);
        assert!(loader::load_config_from_file(&path).is_err(), "{} accepted", what);
    }
}

#[test]
fn test_override_with_zero_baseline_rejected() {
    let mut config = OctaneConfig::default();
    config
        .baseline_overrides
        .insert("lab".to_string(), BaselineProfile::new(1000.0, 0.0, 1000.0, 10000.0, 100.0));
    assert!(matches!(config.validate(), Err(ConfigError::ValidationFailed(_))));
}

// ============================================================================
// Baseline overrides flowing into scoring
// ============================================================================

#[test]
fn test_overrides_from_file_change_ratings() {
    let temp_dir = TempDir::new().expect("tempdir");
    let path = write_file(
        &temp_dir,
        "settings.json",
        r#"{
            "octane": { "baseline_tier": "lab" },
            "baseline_overrides": {
                "lab": { "cpu": 100.0, "memory": 1000.0, "storage": 100.0, "gpu": 1000.0, "network": 10.0 }
            }
        }"#,
    );
    let config = loader::load_config_from_file(&path).expect("load");
    let registry = config.baseline_registry();
    assert!(registry.contains("lab"));
    assert_eq!(registry.get("lab").cpu, 100.0);

    let mut results = octane::TestResults::default();
    results.cpu.tests.single_core.integer_performance.score = 1500;
    results.cpu.tests.multi_core.integer_performance.score = 12000;

    let stock = OctaneCalculator::new(&registry).cpu_ron(&results.cpu);
    let lab = OctaneCalculator::new(&registry)
        .with_tier(config.octane.baseline_tier.clone())
        .cpu_ron(&results.cpu);
    assert!(lab > stock, "lab {} <= stock {}", lab, stock);
}

#[test]
fn test_default_paths() {
    let config = OctaneConfig::default();
    assert!(config.log_dir().is_none());
    assert_eq!(config.temp_dir(), std::env::temp_dir());
    assert!(config.report_dir().to_string_lossy().contains("reports"));
}
