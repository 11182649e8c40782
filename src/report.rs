//! Benchmark reports.
//!
//! ## ReportBuilder
//! Combines raw [`TestResults`], the host description and an
//! [`OctaneCalculator`] into a [`Report`]: ratings, scenario scores, a
//! percentile estimate and fuel-optimization tips for weak domains.
//!
//! ## ReportStore
//! Persists reports as `report_<millis>.json` in a directory and lists them
//! newest first.

use crate::config::UploadSettings;
use crate::error::ReportError;
use crate::models::{Domain, PlatformInfo, TestResults};
use crate::octane::{Grade, OctaneCalculator, OctaneRating, ProfessionalScenarios, RON_CEILING, RON_FLOOR};
use crate::performance::percentile_for;
use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const REPORT_VERSION: &str = env!("CARGO_PKG_VERSION");
const REPORT_PREFIX: &str = "report_";
const ANONYMOUS: &str = "anonymous";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub version: String,
    pub test_id: String,
    pub timestamp: String,
    pub user: String,
    pub hostname: String,
    pub duration: String,
    pub upload_consent: bool,
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostInfo {
    pub os: String,
    pub kernel: String,
    pub architecture: String,
    pub hostname: String,
    pub uptime: String,
    pub timezone: String,
}

impl HostInfo {
    /// Describe this host. Fields the OS does not report stay empty.
    pub fn detect() -> Self {
        use sysinfo::System;

        let uptime = std::time::Duration::from_secs(System::uptime());
        HostInfo {
            os: System::long_os_version().or_else(System::name).unwrap_or_default(),
            kernel: System::kernel_version().unwrap_or_default(),
            architecture: std::env::consts::ARCH.to_string(),
            hostname: System::host_name().unwrap_or_default(),
            uptime: humantime::format_duration(uptime).to_string(),
            timezone: Local::now().format("%:z").to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemInfo {
    pub host: HostInfo,
    pub cpu: PlatformInfo,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub overall: f64,
    pub breakdown: BTreeMap<String, f64>,
    pub professional_scenarios: ProfessionalScenarios,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimilarSystem {
    pub hostname: String,
    pub overall_score: f64,
    pub cpu_model: String,
    pub gpu_model: String,
    pub location: String,
    pub test_date: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: String,
    pub suggestion: String,
    pub impact: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Comparisons {
    pub percentile_ranking: u32,
    pub similar_systems_count: u32,
    pub similar_systems: Vec<SimilarSystem>,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FuelOptimizationTip {
    pub category: String,
    pub tip: String,
    pub octane_boost: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Recommendations {
    pub fuel_optimization_tips: Vec<FuelOptimizationTip>,
}

/// Upload state. Reports are never uploaded by this crate.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadInfo {
    pub uploaded: bool,
    pub upload_time: String,
    pub server: String,
    pub anonymized: bool,
    pub report_id: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OctaneRatings {
    pub overall: OctaneRating,
    pub breakdown: BTreeMap<String, OctaneRating>,
}

/// Full report document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub metadata: Metadata,
    pub system_info: SystemInfo,
    pub test_results: TestResults,
    pub scores: Scores,
    pub comparisons: Comparisons,
    pub recommendations: Recommendations,
    pub upload_info: UploadInfo,
    pub octane_ratings: OctaneRatings,
}

/// Tip offered for a domain rated below premium.
pub fn fuel_tip(domain: Domain) -> &'static str {
    match domain {
        Domain::Cpu => "Enable the performance CPU governor and check cooling; thermal throttling costs sustained clocks",
        Domain::Memory => "Enable the XMP/EXPO memory profile and populate channels in matched pairs",
        Domain::Storage => "Move hot data to NVMe storage and keep at least 20% of the drive free",
        Domain::Gpu => "Update GPU drivers and raise the power limit if thermals allow",
        Domain::Network => "Prefer a wired connection and a low-latency DNS resolver",
    }
}

/// Sub-score a RON of 100 maps onto before the percentile table applies.
const PERCENTILE_SPAN: f64 = 2500.0;

/// Percentile estimate for an overall RON. The [70, 100] scale is stretched
/// over 0..=2500 so every row of the sub-score table is reachable.
pub fn percentile_from_ron(ron: f64) -> u32 {
    let scaled = ((ron - RON_FLOOR) / (RON_CEILING - RON_FLOOR) * PERCENTILE_SPAN).max(0.0);
    percentile_for(scaled as u64)
}

fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision.min(6) as i32);
    (value * factor).round() / factor
}

fn current_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Assembles a [`Report`] from one result set.
pub struct ReportBuilder<'c, 'r> {
    calculator: &'c OctaneCalculator<'r>,
    platform: PlatformInfo,
    host: HostInfo,
    upload: UploadSettings,
    duration: String,
    precision: u32,
    fuel_analysis: bool,
}

impl<'c, 'r> ReportBuilder<'c, 'r> {
    pub fn new(calculator: &'c OctaneCalculator<'r>) -> Self {
        ReportBuilder {
            calculator,
            platform: PlatformInfo::default(),
            host: HostInfo::default(),
            upload: UploadSettings::default(),
            duration: String::new(),
            precision: 1,
            fuel_analysis: true,
        }
    }

    pub fn platform(mut self, platform: PlatformInfo) -> Self {
        self.platform = platform;
        self
    }

    pub fn host(mut self, host: HostInfo) -> Self {
        self.host = host;
        self
    }

    /// Upload consent, tags and anonymity come from these settings.
    pub fn upload_settings(mut self, upload: &UploadSettings) -> Self {
        self.upload = upload.clone();
        self
    }

    pub fn duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = duration.into();
        self
    }

    /// Decimal places for the `scores` section. Ratings keep full precision.
    pub fn precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    /// Whether weak domains get fuel-optimization tips. On by default.
    pub fn fuel_analysis(mut self, enabled: bool) -> Self {
        self.fuel_analysis = enabled;
        self
    }

    pub fn build(&self, results: &TestResults) -> Report {
        let overall = self.calculator.calculate_octane(results);
        let breakdown = self.calculator.calculate_component_octanes(results);
        let scenarios = self.calculator.calculate_professional_scenarios(results);

        let test_id = uuid::Uuid::new_v4().to_string();
        let (user, hostname) = if self.upload.anonymous {
            (ANONYMOUS.to_string(), ANONYMOUS.to_string())
        } else {
            (current_user(), self.host.hostname.clone())
        };

        let metadata = Metadata {
            version: REPORT_VERSION.to_string(),
            test_id: test_id.clone(),
            timestamp: Utc::now().to_rfc3339(),
            user,
            hostname,
            duration: self.duration.clone(),
            upload_consent: self.upload.enabled,
            tags: self.upload.tags.clone(),
        };

        let scores = Scores {
            overall: round_to(overall.ron(), self.precision),
            breakdown: breakdown
                .iter()
                .map(|(domain, rating)| (domain.clone(), round_to(rating.ron(), self.precision)))
                .collect(),
            professional_scenarios: scenarios,
        };

        let comparisons = Comparisons {
            percentile_ranking: percentile_from_ron(overall.ron()),
            ..Comparisons::default()
        };

        let recommendations = Recommendations {
            fuel_optimization_tips: if self.fuel_analysis {
                self.tips(&breakdown)
            } else {
                Vec::new()
            },
        };

        log::info!(
            "[Report] {}: overall RON {:.1} ({}), {} tips",
            test_id,
            overall.ron(),
            overall.grade(),
            recommendations.fuel_optimization_tips.len()
        );

        Report {
            metadata,
            system_info: SystemInfo {
                host: self.host.clone(),
                cpu: self.platform.clone(),
            },
            test_results: results.clone(),
            scores,
            comparisons,
            recommendations,
            upload_info: UploadInfo {
                anonymized: self.upload.anonymous,
                server: self.upload.server_url.clone(),
                report_id: test_id,
                ..UploadInfo::default()
            },
            octane_ratings: OctaneRatings { overall, breakdown },
        }
    }

    fn tips(&self, breakdown: &BTreeMap<String, OctaneRating>) -> Vec<FuelOptimizationTip> {
        let premium = Grade::Premium.band().min_ron;
        let mut weak: Vec<(Domain, f64)> = Domain::ALL
            .iter()
            .filter_map(|domain| breakdown.get(domain.as_str()).map(|r| (*domain, r.ron())))
            .filter(|(_, ron)| *ron < premium)
            .collect();
        weak.sort_by(|a, b| a.1.total_cmp(&b.1));

        weak.into_iter()
            .map(|(domain, ron)| FuelOptimizationTip {
                category: domain.as_str().to_string(),
                tip: fuel_tip(domain).to_string(),
                octane_boost: format!("+{:.1} RON to premium", premium - ron),
            })
            .collect()
    }
}

/// Directory of saved reports.
pub struct ReportStore {
    dir: PathBuf,
}

impl ReportStore {
    /// Open `dir`, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, ReportError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(ReportStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn generate_filename(&self) -> String {
        use std::time::{SystemTime, UNIX_EPOCH};

        let mut millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        // two saves within one millisecond get consecutive stamps
        while self.dir.join(format!("{}{}.json", REPORT_PREFIX, millis)).exists() {
            millis += 1;
        }
        format!("{}{}.json", REPORT_PREFIX, millis)
    }

    /// Write `report` and return its id (the file name).
    pub fn save(&self, report: &Report) -> Result<String, ReportError> {
        let filename = self.generate_filename();
        let path = self.dir.join(&filename);
        let json = serde_json::to_string_pretty(report)?;
        fs::write(&path, &json)?;
        log::info!("[ReportStore] Saved {} ({} bytes)", path.display(), json.len());
        Ok(filename)
    }

    /// Report ids, newest first.
    pub fn list(&self) -> Result<Vec<String>, ReportError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut stamped: Vec<(u128, String)> = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if let Some(millis) = report_millis(&name) {
                stamped.push((millis, name));
            }
        }
        stamped.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(stamped.into_iter().map(|(_, name)| name).collect())
    }

    pub fn load(&self, id: &str) -> Result<Report, ReportError> {
        if report_millis(id).is_none() {
            return Err(ReportError::NotFound(id.to_string()));
        }
        let path = self.dir.join(id);
        let content = fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ReportError::NotFound(id.to_string())
            } else {
                ReportError::IoError(e)
            }
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn latest(&self) -> Result<Option<Report>, ReportError> {
        match self.list()?.first() {
            Some(id) => self.load(id).map(Some),
            None => Ok(None),
        }
    }
}

fn report_millis(name: &str) -> Option<u128> {
    name.strip_prefix(REPORT_PREFIX)?
        .strip_suffix(".json")?
        .parse()
        .ok()
}
