//! Weight vectors used to compose ratings.
//!
//! Every vector sums to 1.0 within [`WEIGHT_TOLERANCE`]. Built-in vectors are
//! declared as static tables; custom vectors go through [`WeightVector::new`],
//! which validates them.

use crate::error::ScoringError;
use crate::models::Domain;
use std::fmt;

pub const WEIGHT_TOLERANCE: f64 = 1e-9;

/// A named, validated set of weights keyed by `K`.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightVector<K> {
    name: String,
    weights: Vec<(K, f64)>,
}

impl<K: Copy + PartialEq + fmt::Debug> WeightVector<K> {
    /// Build a custom vector. Weights must be finite, non-negative, unique
    /// per key and sum to 1.0.
    pub fn new(name: impl Into<String>, weights: Vec<(K, f64)>) -> Result<Self, ScoringError> {
        let vector = WeightVector {
            name: name.into(),
            weights,
        };
        vector.validate()?;
        Ok(vector)
    }

    /// Build a vector from relative weights, scaling them so they sum to 1.0.
    pub fn normalized(name: impl Into<String>, relative: &[(K, f64)]) -> Result<Self, ScoringError> {
        let name = name.into();
        let total: f64 = relative.iter().map(|(_, w)| w).sum();
        if relative.is_empty() {
            return Err(ScoringError::Empty(name));
        }
        if !total.is_finite() || total <= 0.0 {
            return Err(ScoringError::WeightSum { name, sum: total });
        }
        let weights = relative.iter().map(|(k, w)| (*k, w / total)).collect();
        Self::new(name, weights)
    }

    /// Built-in table. Checked by the unit tests rather than at runtime.
    pub(crate) fn declared(name: &str, table: &[(K, f64)]) -> Self {
        WeightVector {
            name: name.to_string(),
            weights: table.to_vec(),
        }
    }

    pub fn validate(&self) -> Result<(), ScoringError> {
        if self.weights.is_empty() {
            return Err(ScoringError::Empty(self.name.clone()));
        }
        for (i, (key, weight)) in self.weights.iter().enumerate() {
            let duplicate = self.weights[..i].iter().any(|(k, _)| k == key);
            if !weight.is_finite() || *weight < 0.0 || duplicate {
                return Err(ScoringError::InvalidWeight {
                    name: self.name.clone(),
                    key: format!("{:?}", key),
                    weight: *weight,
                });
            }
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(ScoringError::WeightSum {
                name: self.name.clone(),
                sum,
            });
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sum(&self) -> f64 {
        self.weights.iter().map(|(_, w)| w).sum()
    }

    pub fn weight(&self, key: K) -> Option<f64> {
        self.weights.iter().find(|(k, _)| *k == key).map(|(_, w)| *w)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(K, f64)> {
        self.weights.iter()
    }

    /// Weighted sum of `score(key)` over every key.
    pub fn combine(&self, mut score: impl FnMut(K) -> f64) -> f64 {
        self.weights.iter().map(|(k, w)| score(*k) * w).sum()
    }
}

// ============================================================================
// METRIC KEYS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuMetric {
    SingleCore,
    MultiCore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryMetric {
    Bandwidth,
    Latency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMetric {
    SequentialRead,
    SequentialWrite,
    RandomReadIops,
    RandomWriteIops,
    Latency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpuMetric {
    Graphics,
    Compute,
    MachineLearning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkMetric {
    Bandwidth,
    Latency,
    Connectivity,
}

// ============================================================================
// BUILT-IN TABLES
// ============================================================================

pub const CPU_WEIGHTS: [(CpuMetric, f64); 2] = [(CpuMetric::SingleCore, 0.4), (CpuMetric::MultiCore, 0.6)];

pub const MEMORY_WEIGHTS: [(MemoryMetric, f64); 2] =
    [(MemoryMetric::Bandwidth, 0.7), (MemoryMetric::Latency, 0.3)];

pub const STORAGE_DEVICE_WEIGHTS: [(StorageMetric, f64); 5] = [
    (StorageMetric::SequentialRead, 0.2),
    (StorageMetric::SequentialWrite, 0.2),
    (StorageMetric::RandomReadIops, 0.2),
    (StorageMetric::RandomWriteIops, 0.2),
    (StorageMetric::Latency, 0.2),
];

pub const GPU_WEIGHTS: [(GpuMetric, f64); 3] = [
    (GpuMetric::Graphics, 0.4),
    (GpuMetric::Compute, 0.4),
    (GpuMetric::MachineLearning, 0.2),
];

pub const NETWORK_WEIGHTS: [(NetworkMetric, f64); 3] = [
    (NetworkMetric::Bandwidth, 0.5),
    (NetworkMetric::Latency, 0.3),
    (NetworkMetric::Connectivity, 0.2),
];

/// Relative domain weights for the overall rating. They sum to 0.90 and are
/// normalized by their sum before use.
pub const OVERALL_RELATIVE_WEIGHTS: [(Domain, f64); 5] = [
    (Domain::Cpu, 0.20),
    (Domain::Memory, 0.15),
    (Domain::Storage, 0.15),
    (Domain::Gpu, 0.25),
    (Domain::Network, 0.15),
];

pub const GAMING_WEIGHTS: [(Domain, f64); 3] = [(Domain::Gpu, 0.6), (Domain::Cpu, 0.3), (Domain::Memory, 0.1)];

pub const AI_ML_WEIGHTS: [(Domain, f64); 3] = [(Domain::Gpu, 0.7), (Domain::Cpu, 0.2), (Domain::Memory, 0.1)];

pub const SERVER_WEIGHTS: [(Domain, f64); 3] =
    [(Domain::Cpu, 0.4), (Domain::Memory, 0.3), (Domain::Storage, 0.3)];

pub const WORKSTATION_WEIGHTS: [(Domain, f64); 4] = [
    (Domain::Cpu, 0.3),
    (Domain::Gpu, 0.3),
    (Domain::Memory, 0.2),
    (Domain::Storage, 0.2),
];

/// Overall weights after normalization: CPU 2/9, Memory 1/6, Storage 1/6,
/// GPU 5/18, Network 1/6.
pub fn overall_weights() -> WeightVector<Domain> {
    let total: f64 = OVERALL_RELATIVE_WEIGHTS.iter().map(|(_, w)| w).sum();
    let table: Vec<(Domain, f64)> = OVERALL_RELATIVE_WEIGHTS
        .iter()
        .map(|(d, w)| (*d, w / total))
        .collect();
    WeightVector::declared("overall", &table)
}

/// Per-domain metric weights used by the calculator.
#[derive(Debug, Clone)]
pub struct DomainWeights {
    pub cpu: WeightVector<CpuMetric>,
    pub memory: WeightVector<MemoryMetric>,
    pub storage: WeightVector<StorageMetric>,
    pub gpu: WeightVector<GpuMetric>,
    pub network: WeightVector<NetworkMetric>,
}

impl Default for DomainWeights {
    fn default() -> Self {
        DomainWeights {
            cpu: WeightVector::declared("cpu", &CPU_WEIGHTS),
            memory: WeightVector::declared("memory", &MEMORY_WEIGHTS),
            storage: WeightVector::declared("storage_device", &STORAGE_DEVICE_WEIGHTS),
            gpu: WeightVector::declared("gpu", &GPU_WEIGHTS),
            network: WeightVector::declared("network", &NETWORK_WEIGHTS),
        }
    }
}
