//! Temperature and clock sampling around a test run.

use std::fs;
use std::path::{Path, PathBuf};

pub const ILLUSTRATIVE_IDLE_C: f64 = 35.0;
pub const ILLUSTRATIVE_LOAD_C: f64 = 65.0;
pub const ILLUSTRATIVE_MAX_C: f64 = 78.0;
pub const ILLUSTRATIVE_MHZ: f64 = 3200.0;
pub const ILLUSTRATIVE_STABILITY: f64 = 98.5;

const THERMAL_ROOT: &str = "/sys/class/thermal";

/// One thermal/frequency observation. Temperatures in °C, clock in MHz,
/// stability in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalReading {
    pub idle: f64,
    pub load: f64,
    pub max: f64,
    pub average_mhz: f64,
    pub stability: f64,
}

impl ThermalReading {
    pub fn illustrative() -> Self {
        ThermalReading {
            idle: ILLUSTRATIVE_IDLE_C,
            load: ILLUSTRATIVE_LOAD_C,
            max: ILLUSTRATIVE_MAX_C,
            average_mhz: ILLUSTRATIVE_MHZ,
            stability: ILLUSTRATIVE_STABILITY,
        }
    }
}

pub trait ThermalProbe: Send + Sync {
    fn sample(&self) -> ThermalReading;
}

/// Fixed values for hosts without sensors and for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct IllustrativeThermal;

impl ThermalProbe for IllustrativeThermal {
    fn sample(&self) -> ThermalReading {
        ThermalReading::illustrative()
    }
}

/// Reads the hottest `thermal_zone*/temp` under a sysfs root.
///
/// Only the temperature comes from sysfs. Clock speed is read through
/// `sysinfo`; anything that cannot be read keeps its illustrative value.
#[derive(Debug, Clone)]
pub struct SysfsThermal {
    root: PathBuf,
    query_frequency: bool,
}

impl SysfsThermal {
    pub fn new() -> Self {
        SysfsThermal {
            root: PathBuf::from(THERMAL_ROOT),
            query_frequency: true,
        }
    }

    /// Read zones below `root` instead of `/sys/class/thermal`. Frequency
    /// querying is disabled so the reading depends on `root` alone.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        SysfsThermal {
            root: root.into(),
            query_frequency: false,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Default for SysfsThermal {
    fn default() -> Self {
        Self::new()
    }
}

impl ThermalProbe for SysfsThermal {
    fn sample(&self) -> ThermalReading {
        let mut reading = ThermalReading::illustrative();

        match read_hottest_zone(&self.root) {
            Some(celsius) => {
                log::debug!("[Thermal] Hottest zone at {:.1}°C", celsius);
                reading.load = celsius;
                reading.max = celsius;
                reading.idle = celsius;
            }
            None => log::debug!(
                "[Thermal] No readable zones under {}, using illustrative values",
                self.root.display()
            ),
        }

        if self.query_frequency {
            if let Some(mhz) = average_frequency_mhz() {
                reading.average_mhz = mhz;
            }
        }
        reading
    }
}

/// Probe for the current platform: sysfs on Linux, fixed values elsewhere.
pub fn default_probe() -> Box<dyn ThermalProbe> {
    if cfg!(target_os = "linux") {
        Box::new(SysfsThermal::new())
    } else {
        Box::new(IllustrativeThermal)
    }
}

fn read_hottest_zone(root: &Path) -> Option<f64> {
    let entries = fs::read_dir(root).ok()?;
    let mut hottest: Option<f64> = None;

    for entry in entries.flatten() {
        let name = entry.file_name();
        if !name.to_string_lossy().starts_with("thermal_zone") {
            continue;
        }
        let Ok(raw) = fs::read_to_string(entry.path().join("temp")) else {
            continue;
        };
        // millidegrees Celsius
        let Ok(milli) = raw.trim().parse::<f64>() else {
            continue;
        };
        let celsius = milli / 1000.0;
        if !celsius.is_finite() || celsius <= 0.0 {
            continue;
        }
        hottest = Some(hottest.map_or(celsius, |h| h.max(celsius)));
    }
    hottest
}

fn average_frequency_mhz() -> Option<f64> {
    use sysinfo::System;

    let mut sys = System::new_all();
    sys.refresh_all();
    let freqs: Vec<f64> = sys
        .cpus()
        .iter()
        .map(|cpu| cpu.frequency() as f64)
        .filter(|mhz| *mhz > 0.0)
        .collect();
    if freqs.is_empty() {
        None
    } else {
        Some(freqs.iter().sum::<f64>() / freqs.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn zone(root: &Path, name: &str, temp: &str) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).expect("create zone dir");
        fs::write(dir.join("temp"), temp).expect("write temp");
    }

    #[test]
    fn test_illustrative_values() {
        let reading = IllustrativeThermal.sample();
        assert_eq!(reading.idle, 35.0);
        assert_eq!(reading.load, 65.0);
        assert_eq!(reading.max, 78.0);
        assert_eq!(reading.average_mhz, 3200.0);
        assert_eq!(reading.stability, 98.5);
    }

    #[test]
    fn test_sysfs_picks_hottest_zone() {
        let tmp = TempDir::new().expect("tempdir");
        zone(tmp.path(), "thermal_zone0", "41000\n");
        zone(tmp.path(), "thermal_zone1", "72500\n");
        zone(tmp.path(), "cooling_device0", "99000\n");

        let reading = SysfsThermal::with_root(tmp.path()).sample();
        assert_eq!(reading.max, 72.5);
        assert_eq!(reading.load, 72.5);
        // a readable sensor reports the measured temperature as idle
        assert_eq!(reading.idle, 72.5);
        assert_eq!(reading.average_mhz, ILLUSTRATIVE_MHZ);
    }

    #[test]
    fn test_sysfs_skips_garbage() {
        let tmp = TempDir::new().expect("tempdir");
        zone(tmp.path(), "thermal_zone0", "not a number");
        zone(tmp.path(), "thermal_zone1", "-5000");
        zone(tmp.path(), "thermal_zone2", "30000");

        let reading = SysfsThermal::with_root(tmp.path()).sample();
        assert_eq!(reading.max, 30.0);
        assert_eq!(reading.idle, 30.0);
    }

    #[test]
    fn test_sysfs_missing_root_falls_back() {
        let tmp = TempDir::new().expect("tempdir");
        let reading = SysfsThermal::with_root(tmp.path().join("absent")).sample();
        assert_eq!(reading, ThermalReading::illustrative());
    }
}
