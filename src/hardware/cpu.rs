//! CPU identification.

use crate::error::HardwareError;
use crate::models::PlatformInfo;
use std::collections::HashSet;
use std::fs;

const CPUINFO_PATH: &str = "/proc/cpuinfo";
const CPUFREQ_MAX_PATH: &str = "/sys/devices/system/cpu/cpu0/cpufreq/cpuinfo_max_freq";
pub const UNKNOWN_CPU: &str = "Unknown CPU";

/// Vendor name from a model string.
pub fn extract_brand(model_name: &str) -> String {
    let lower = model_name.to_lowercase();
    let brand = if lower.contains("intel") {
        "Intel"
    } else if lower.contains("amd") {
        "AMD"
    } else if lower.contains("apple") {
        "Apple"
    } else if lower.contains("arm") {
        "ARM"
    } else {
        "Unknown"
    };
    brand.to_string()
}

pub fn format_cache_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

/// Parse `/proc/cpuinfo` cache notation such as `"512 KB"` into bytes.
fn parse_cache_bytes(value: &str) -> Option<u64> {
    let mut parts = value.split_whitespace();
    let amount: u64 = parts.next()?.parse().ok()?;
    let multiplier = match parts.next().map(|u| u.to_ascii_uppercase()) {
        None => 1,
        Some(unit) if unit == "B" => 1,
        Some(unit) if unit == "KB" || unit == "K" => 1024,
        Some(unit) if unit == "MB" || unit == "M" => 1024 * 1024,
        Some(_) => return None,
    };
    Some(amount * multiplier)
}

/// Parse the contents of `/proc/cpuinfo`. Only the first processor block
/// supplies identification; `processor` lines are counted for logical cores.
pub fn parse_cpuinfo(content: &str) -> Result<PlatformInfo, HardwareError> {
    let mut info = PlatformInfo {
        architecture: std::env::consts::ARCH.to_string(),
        ..PlatformInfo::default()
    };
    let mut processors = 0u32;
    let mut seen = HashSet::new();

    for line in content.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        if key == "processor" {
            processors += 1;
            continue;
        }
        // identification comes from the first block only
        if !seen.insert(key.to_string()) {
            continue;
        }
        match key {
            "model name" => {
                info.model_name = value.to_string();
                info.brand = extract_brand(value);
            }
            "cpu cores" => info.physical_cores = value.parse().unwrap_or(0),
            "cpu MHz" => {
                if let Ok(mhz) = value.parse::<f64>() {
                    info.base_frequency_ghz = mhz / 1000.0;
                }
            }
            "cache size" => {
                info.cache_l2 = parse_cache_bytes(value)
                    .map(format_cache_size)
                    .unwrap_or_else(|| value.to_string());
            }
            "flags" | "Features" => {
                info.features = value.split_whitespace().map(str::to_string).collect();
            }
            "cpu family" => info.family = value.to_string(),
            "model" => info.model = value.to_string(),
            "stepping" => info.stepping = value.to_string(),
            _ => {}
        }
    }

    if info.model_name.is_empty() {
        return Err(HardwareError::ParseFailed(
            "no 'model name' entry in cpuinfo".to_string(),
        ));
    }

    info.logical_cores = if processors > 0 {
        processors
    } else {
        num_cpus::get() as u32
    };
    if info.physical_cores == 0 {
        info.physical_cores = num_cpus::get_physical() as u32;
    }
    Ok(info)
}

/// Query the processor of this host.
pub fn get_platform_info() -> Result<PlatformInfo, HardwareError> {
    if cfg!(target_os = "linux") {
        let content = fs::read_to_string(CPUINFO_PATH)?;
        let mut info = parse_cpuinfo(&content)?;
        if let Some(ghz) = read_max_frequency_ghz() {
            info.max_frequency_ghz = ghz;
        }
        Ok(info)
    } else {
        platform_info_from_sysinfo()
    }
}

fn read_max_frequency_ghz() -> Option<f64> {
    let raw = fs::read_to_string(CPUFREQ_MAX_PATH).ok()?;
    // kHz
    let khz: f64 = raw.trim().parse().ok()?;
    Some(khz / 1_000_000.0)
}

fn platform_info_from_sysinfo() -> Result<PlatformInfo, HardwareError> {
    use sysinfo::System;

    let mut sys = System::new_all();
    sys.refresh_all();
    let cpus = sys.cpus();
    let first = cpus
        .first()
        .ok_or_else(|| HardwareError::SystemInfoUnavailable("no CPUs reported".to_string()))?;

    let model_name = first.brand().trim().to_string();
    if model_name.is_empty() {
        return Err(HardwareError::Unsupported(
            "processor brand string unavailable".to_string(),
        ));
    }
    let max_mhz = cpus.iter().map(|cpu| cpu.frequency()).max().unwrap_or(0);

    Ok(PlatformInfo {
        brand: extract_brand(&model_name),
        model_name,
        architecture: std::env::consts::ARCH.to_string(),
        physical_cores: num_cpus::get_physical() as u32,
        logical_cores: cpus.len() as u32,
        base_frequency_ghz: first.frequency() as f64 / 1000.0,
        max_frequency_ghz: max_mhz as f64 / 1000.0,
        ..PlatformInfo::default()
    })
}

/// Platform lookup that never fails.
pub struct PlatformInfoProvider;

impl PlatformInfoProvider {
    /// Query the host, falling back to [`PlatformInfoProvider::generic`].
    pub fn detect() -> PlatformInfo {
        match get_platform_info() {
            Ok(info) => {
                log::info!(
                    "[Hardware] {} ({} cores / {} threads)",
                    info.model_name,
                    info.physical_cores,
                    info.logical_cores
                );
                info
            }
            Err(e) => {
                log::warn!("[Hardware] Platform query failed, using generic record: {}", e);
                Self::generic()
            }
        }
    }

    pub fn generic() -> PlatformInfo {
        let cores = num_cpus::get() as u32;
        PlatformInfo {
            model_name: UNKNOWN_CPU.to_string(),
            brand: "Unknown".to_string(),
            architecture: std::env::consts::ARCH.to_string(),
            physical_cores: cores,
            logical_cores: cores,
            ..PlatformInfo::default()
        }
    }
}
