//! Reference performance profiles per hardware tier.
//!
//! The registry is an owned value. Scoring borrows it immutably, updates need
//! `&mut`, so a write can never race an in-flight rating computation.

use crate::models::Domain;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Tier every lookup falls back to.
pub const DEFAULT_TIER: &str = "default";

/// Reference values one tier is scored against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaselineProfile {
    /// CPU integer score
    pub cpu: f64,
    /// Memory bandwidth in MB/s
    pub memory: f64,
    /// Storage throughput in MB/s
    pub storage: f64,
    /// GPU composite score
    pub gpu: f64,
    /// Network bandwidth in Mbps
    pub network: f64,
}

impl BaselineProfile {
    pub const fn new(cpu: f64, memory: f64, storage: f64, gpu: f64, network: f64) -> Self {
        BaselineProfile {
            cpu,
            memory,
            storage,
            gpu,
            network,
        }
    }

    /// Reference value for a single domain.
    pub fn for_domain(&self, domain: Domain) -> f64 {
        match domain {
            Domain::Cpu => self.cpu,
            Domain::Memory => self.memory,
            Domain::Storage => self.storage,
            Domain::Gpu => self.gpu,
            Domain::Network => self.network,
        }
    }
}

impl Default for BaselineProfile {
    fn default() -> Self {
        SEED_PROFILES[0].1
    }
}

/// Built-in tiers.
pub const SEED_PROFILES: [(&str, BaselineProfile); 5] = [
    (DEFAULT_TIER, BaselineProfile::new(1000.0, 25000.0, 500.0, 10000.0, 100.0)),
    ("entry_level", BaselineProfile::new(500.0, 15000.0, 150.0, 3000.0, 50.0)),
    ("mid_range", BaselineProfile::new(1500.0, 35000.0, 1000.0, 15000.0, 200.0)),
    ("high_end", BaselineProfile::new(2500.0, 50000.0, 2000.0, 25000.0, 500.0)),
    ("enthusiast", BaselineProfile::new(4000.0, 70000.0, 5000.0, 40000.0, 1000.0)),
];

/// Named baseline tiers. A "default" tier always exists.
#[derive(Debug, Clone)]
pub struct BaselineRegistry {
    profiles: HashMap<String, BaselineProfile>,
}

impl BaselineRegistry {
    /// Registry seeded with the built-in tiers.
    pub fn new() -> Self {
        let profiles = SEED_PROFILES
            .iter()
            .map(|(tier, profile)| (tier.to_string(), *profile))
            .collect();
        BaselineRegistry { profiles }
    }

    /// Profile for `tier`, or the default profile when the tier is unknown.
    pub fn get(&self, tier: &str) -> BaselineProfile {
        match self.profiles.get(tier) {
            Some(profile) => *profile,
            None => {
                log::debug!("[Baseline] Unknown tier '{}', using '{}'", tier, DEFAULT_TIER);
                self.default_profile()
            }
        }
    }

    /// Insert or replace a tier.
    pub fn set(&mut self, tier: impl Into<String>, profile: BaselineProfile) {
        let tier = tier.into();
        log::info!("[Baseline] Updating tier '{}': {:?}", tier, profile);
        self.profiles.insert(tier, profile);
    }

    /// Snapshot of every tier, sorted by name.
    pub fn all(&self) -> BTreeMap<String, BaselineProfile> {
        self.profiles
            .iter()
            .map(|(tier, profile)| (tier.clone(), *profile))
            .collect()
    }

    pub fn contains(&self, tier: &str) -> bool {
        self.profiles.contains_key(tier)
    }

    fn default_profile(&self) -> BaselineProfile {
        // The default tier can be overwritten but never removed.
        self.profiles
            .get(DEFAULT_TIER)
            .copied()
            .unwrap_or_default()
    }
}

impl Default for BaselineRegistry {
    fn default() -> Self {
        Self::new()
    }
}
