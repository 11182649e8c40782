//! Workload archetype scores built from per-domain RONs.

use super::grades::{band_for, sanitize_ron, Grade};
use super::weights::{WeightVector, AI_ML_WEIGHTS, GAMING_WEIGHTS, SERVER_WEIGHTS, WORKSTATION_WEIGHTS};
use crate::models::Domain;
use serde::{Deserialize, Serialize};

/// Per-domain RONs of one result set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainRons {
    pub cpu: f64,
    pub memory: f64,
    pub storage: f64,
    pub gpu: f64,
    pub network: f64,
}

impl DomainRons {
    pub fn get(&self, domain: Domain) -> f64 {
        match domain {
            Domain::Cpu => self.cpu,
            Domain::Memory => self.memory,
            Domain::Storage => self.storage,
            Domain::Gpu => self.gpu,
            Domain::Network => self.network,
        }
    }
}

/// Workload archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    Gaming,
    AiMachineLearning,
    ServerWorkload,
    Workstation,
}

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::Gaming,
        Scenario::AiMachineLearning,
        Scenario::ServerWorkload,
        Scenario::Workstation,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            Scenario::Gaming => "Gaming performance rating based on GPU and CPU capabilities",
            Scenario::AiMachineLearning => "AI/ML performance rating based on compute capabilities",
            Scenario::ServerWorkload => "Server workload performance rating",
            Scenario::Workstation => "Professional workstation performance rating",
        }
    }

    fn weight_table(&self) -> &'static [(Domain, f64)] {
        match self {
            Scenario::Gaming => &GAMING_WEIGHTS,
            Scenario::AiMachineLearning => &AI_ML_WEIGHTS,
            Scenario::ServerWorkload => &SERVER_WEIGHTS,
            Scenario::Workstation => &WORKSTATION_WEIGHTS,
        }
    }

    fn key(&self) -> &'static str {
        match self {
            Scenario::Gaming => "gaming",
            Scenario::AiMachineLearning => "ai_machine_learning",
            Scenario::ServerWorkload => "server_workload",
            Scenario::Workstation => "workstation",
        }
    }
}

/// Score for one archetype. The description names the scenario, not the grade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfessionalScore {
    pub score: f64,
    pub grade: Grade,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfessionalScenarios {
    pub gaming: ProfessionalScore,
    pub ai_machine_learning: ProfessionalScore,
    pub server_workload: ProfessionalScore,
    pub workstation: ProfessionalScore,
}

impl ProfessionalScenarios {
    pub fn get(&self, scenario: Scenario) -> &ProfessionalScore {
        match scenario {
            Scenario::Gaming => &self.gaming,
            Scenario::AiMachineLearning => &self.ai_machine_learning,
            Scenario::ServerWorkload => &self.server_workload,
            Scenario::Workstation => &self.workstation,
        }
    }
}

/// Recombines domain RONs with the archetype weight vectors.
#[derive(Debug, Clone)]
pub struct ProfessionalScenarioScorer {
    vectors: Vec<(Scenario, WeightVector<Domain>)>,
}

impl ProfessionalScenarioScorer {
    pub fn new() -> Self {
        let vectors = Scenario::ALL
            .iter()
            .map(|s| (*s, WeightVector::declared(s.key(), s.weight_table())))
            .collect();
        ProfessionalScenarioScorer { vectors }
    }

    pub fn weights(&self, scenario: Scenario) -> Option<&WeightVector<Domain>> {
        self.vectors
            .iter()
            .find(|(s, _)| *s == scenario)
            .map(|(_, v)| v)
    }

    pub fn score_one(&self, scenario: Scenario, rons: &DomainRons) -> ProfessionalScore {
        let raw = self
            .weights(scenario)
            .map(|v| v.combine(|d| rons.get(d)))
            .unwrap_or(f64::NAN);
        let score = sanitize_ron(raw);
        ProfessionalScore {
            score,
            grade: band_for(score).grade,
            description: scenario.description().to_string(),
        }
    }

    pub fn score(&self, rons: &DomainRons) -> ProfessionalScenarios {
        ProfessionalScenarios {
            gaming: self.score_one(Scenario::Gaming, rons),
            ai_machine_learning: self.score_one(Scenario::AiMachineLearning, rons),
            server_workload: self.score_one(Scenario::ServerWorkload, rons),
            workstation: self.score_one(Scenario::Workstation, rons),
        }
    }
}

impl Default for ProfessionalScenarioScorer {
    fn default() -> Self {
        Self::new()
    }
}
