//! Configuration for benchmark runs, scoring and reporting.
//!
//! # Module Structure
//!
//! - `loader`: JSON load/save and the default settings path
//!
//! # Configuration Flow
//!
//! 1. `loader::load_or_default` reads `~/.config/octane/settings.json` or an explicit file
//! 2. `OctaneConfig::validate` rejects bad durations, test types and precision
//! 3. `apply_baseline_overrides` upserts configured tiers into the `BaselineRegistry`
//! 4. CLI flags override individual fields for one invocation

pub mod loader;

use crate::error::ConfigError;
use crate::hardware::{default_probe, IllustrativeThermal, ThermalProbe};
use crate::octane::{BaselineProfile, BaselineRegistry, DEFAULT_TIER};
use crate::performance::{parse_duration, TestType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    pub log_level: String,
    pub output_format: String,
    pub progress_bar: bool,
    /// Scratch directory; empty means the system temp dir.
    pub temp_dir: String,
    pub theme: String,
    /// Directory for per-session log files; empty disables file logging.
    pub log_dir: String,
    /// Where saved reports go; empty means the platform data dir.
    pub report_dir: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        GeneralSettings {
            log_level: "info".to_string(),
            output_format: "json".to_string(),
            progress_bar: true,
            temp_dir: String::new(),
            theme: "default".to_string(),
            log_dir: String::new(),
            report_dir: String::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OctaneSettings {
    pub rating_system: String,
    /// Decimal places shown for RON values.
    pub precision: u32,
    pub baseline_tier: String,
}

impl Default for OctaneSettings {
    fn default() -> Self {
        OctaneSettings {
            rating_system: "octane".to_string(),
            precision: 1,
            baseline_tier: DEFAULT_TIER.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    pub enabled: bool,
    pub server_url: String,
    pub api_key: String,
    pub anonymous: bool,
    pub auto_upload: bool,
    pub tags: Vec<String>,
}

impl Default for UploadSettings {
    fn default() -> Self {
        UploadSettings {
            enabled: false,
            server_url: String::new(),
            api_key: String::new(),
            anonymous: true,
            auto_upload: false,
            tags: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestSettings {
    pub boost_mode: bool,
    /// Attach fuel-optimization tips to reports.
    pub fuel_analysis: bool,
    /// Sample thermal zones; when off the suite records illustrative readings.
    pub temperature_monitoring: bool,
    pub power_monitoring: bool,
    /// Worker threads for multi-threaded phases; 0 = all logical CPUs.
    pub threads: usize,
    pub duration: String,
    pub test_type: String,
}

impl Default for TestSettings {
    fn default() -> Self {
        TestSettings {
            boost_mode: false,
            fuel_analysis: true,
            temperature_monitoring: true,
            power_monitoring: false,
            threads: 0,
            duration: "60s".to_string(),
            test_type: TestType::All.as_str().to_string(),
        }
    }
}

/// Complete settings file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OctaneConfig {
    pub general: GeneralSettings,
    pub octane: OctaneSettings,
    pub upload: UploadSettings,
    pub tests: TestSettings,
    /// Tiers upserted into the baseline registry on startup.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub baseline_overrides: BTreeMap<String, BaselineProfile>,
}

impl OctaneConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_duration(&self.tests.duration)?;
        TestType::from_str(&self.tests.test_type)?;
        self.log_level()?;

        let scale = &self.octane;
        if scale.precision > 6 {
            return Err(ConfigError::ValidationFailed(format!(
                "octane.precision must be at most 6, got {}",
                scale.precision
            )));
        }
        if scale.baseline_tier.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "octane.baseline_tier cannot be empty".to_string(),
            ));
        }

        if self.upload.enabled && self.upload.server_url.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "upload.server_url is required when upload is enabled".to_string(),
            ));
        }

        for (tier, profile) in &self.baseline_overrides {
            let values = [profile.cpu, profile.memory, profile.storage, profile.gpu, profile.network];
            if values.iter().any(|v| !v.is_finite() || *v <= 0.0) {
                return Err(ConfigError::ValidationFailed(format!(
                    "baseline_overrides.{} must have positive finite values",
                    tier
                )));
            }
        }
        Ok(())
    }

    pub fn log_level(&self) -> Result<log::LevelFilter, ConfigError> {
        log::LevelFilter::from_str(self.general.log_level.trim()).map_err(|_| {
            ConfigError::ValidationFailed(format!(
                "general.log_level '{}' is not one of off, error, warn, info, debug, trace",
                self.general.log_level
            ))
        })
    }

    pub fn test_type(&self) -> Result<TestType, ConfigError> {
        TestType::from_str(&self.tests.test_type)
    }

    /// Upsert every configured override into `registry`.
    pub fn apply_baseline_overrides(&self, registry: &mut BaselineRegistry) {
        for (tier, profile) in &self.baseline_overrides {
            registry.set(tier.clone(), *profile);
        }
    }

    /// Registry seeded with the built-in tiers plus this config's overrides.
    pub fn baseline_registry(&self) -> BaselineRegistry {
        let mut registry = BaselineRegistry::new();
        self.apply_baseline_overrides(&mut registry);
        registry
    }

    pub fn log_dir(&self) -> Option<PathBuf> {
        non_empty_path(&self.general.log_dir)
    }

    pub fn report_dir(&self) -> PathBuf {
        non_empty_path(&self.general.report_dir).unwrap_or_else(loader::default_report_dir)
    }

    pub fn temp_dir(&self) -> PathBuf {
        non_empty_path(&self.general.temp_dir).unwrap_or_else(std::env::temp_dir)
    }

    /// Probe the CPU suite samples before and after a run.
    pub fn thermal_probe(&self) -> Box<dyn ThermalProbe> {
        if self.tests.temperature_monitoring {
            default_probe()
        } else {
            log::debug!("[Config] Temperature monitoring off, using illustrative readings");
            Box::new(IllustrativeThermal)
        }
    }
}

fn non_empty_path(value: &str) -> Option<PathBuf> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}
