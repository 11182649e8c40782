//! Octane Rating scoring engine.
//!
//! # Module Structure
//!
//! - `baseline`: reference profiles per hardware tier (`BaselineRegistry`)
//! - `grades`: the single grade table and the `OctaneRating` value object
//! - `weights`: validated weight vectors for every composite
//! - `calculator`: per-domain and overall RON computation
//! - `scenarios`: gaming / AI-ML / server / workstation archetype scores
//!
//! # Flow
//!
//! 1. Caller builds a `BaselineRegistry` (seeded, optionally overridden from config)
//! 2. `OctaneCalculator` borrows it together with a tier name
//! 3. Each domain result is reduced to a RON in [70, 100]
//! 4. Domain RONs are combined into the overall rating and scenario scores

pub mod baseline;
pub mod calculator;
pub mod grades;
pub mod scenarios;
pub mod weights;

pub use baseline::{BaselineProfile, BaselineRegistry, DEFAULT_TIER};
pub use calculator::OctaneCalculator;
pub use grades::{ColorTag, Grade, GradeBand, OctaneRating, GRADE_TABLE, RON_CEILING, RON_FLOOR};
pub use scenarios::{DomainRons, ProfessionalScenarioScorer, ProfessionalScenarios, ProfessionalScore, Scenario};
pub use weights::WeightVector;
