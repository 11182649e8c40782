//! Unified error type hierarchy for Octane
//!
//! Provides structured error handling with ConfigError, HardwareError,
//! ScoringError and ReportError.

use std::io;
use thiserror::Error;

/// Hardware detection and platform information errors.
///
/// Never fatal: callers degrade to a generic platform record.
#[derive(Error, Debug)]
pub enum HardwareError {
    #[error("Platform query unsupported: {0}")]
    Unsupported(String),

    #[error("Failed to parse platform data: {0}")]
    ParseFailed(String),

    #[error("System info unavailable: {0}")]
    SystemInfoUnavailable(String),

    #[error("IO error during hardware detection: {0}")]
    IoError(#[from] io::Error),
}

/// Configuration file parsing and test parameter errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid JSON in config: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Invalid duration '{input}': {reason}")]
    InvalidDuration { input: String, reason: String },

    #[error("Unknown test type '{0}' (expected one of: all, compute, crypto, compress)")]
    UnknownTestType(String),

    #[error("Test suite cannot run: {0}")]
    InvalidTransition(String),

    #[error("IO error during config operations: {0}")]
    IoError(#[from] io::Error),
}

/// Errors raised while assembling custom weight vectors.
///
/// The built-in scoring math never produces one of these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    #[error("Weight vector '{name}' sums to {sum}, expected 1.0")]
    WeightSum { name: String, sum: f64 },

    #[error("Weight vector '{name}' has invalid weight {weight} for '{key}'")]
    InvalidWeight {
        name: String,
        key: String,
        weight: f64,
    },

    #[error("Weight vector '{0}' is empty")]
    Empty(String),
}

/// Report persistence errors.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Report not found: {0}")]
    NotFound(String),

    #[error("Invalid report JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("IO error during report operations: {0}")]
    IoError(#[from] io::Error),
}
