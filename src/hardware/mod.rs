//! Host platform detection.
//!
//! Detection degrades instead of failing: a host that cannot be queried is
//! reported as a generic "Unknown CPU" record, and a host without readable
//! thermal zones reports illustrative temperatures.

pub mod cpu;
pub mod thermal;

pub use cpu::{extract_brand, format_cache_size, get_platform_info, parse_cpuinfo, PlatformInfoProvider};
pub use thermal::{default_probe, IllustrativeThermal, SysfsThermal, ThermalProbe, ThermalReading};
