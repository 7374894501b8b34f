mod config;
mod rules;

pub use config::ScoringWeights;

use serde::{Deserialize, Serialize};

use super::domain::{FinancingOption, FinancingType};
use super::eligibility::FinancingEligibility;

pub const MAX_LEAD_SCORE: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseTimeline {
    Immediately,
    WithinThreeMonths,
    WithinSixMonths,
    JustResearching,
}

/// Intent signals the homeowner stated during intake.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadPreferences {
    #[serde(default)]
    pub timeline: Option<PurchaseTimeline>,
    #[serde(default)]
    pub preferred_financing: Option<FinancingType>,
    #[serde(default)]
    pub wants_battery: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadFactor {
    Baseline,
    SystemSize,
    FinancingBreadth,
    Timeline,
    FinancingPreference,
    BatteryInterest,
    ProjectedReturn,
}

/// Discrete contribution to a lead score, kept for dashboard audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: LeadFactor,
    pub points: i16,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadScore {
    pub total: u8,
    pub components: Vec<ScoreComponent>,
}

/// Stateless scorer applying additive weights; the sum is clamped once at the end.
pub struct LeadScorer {
    weights: ScoringWeights,
}

impl Default for LeadScorer {
    fn default() -> Self {
        Self::new(ScoringWeights::default())
    }
}

impl LeadScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn score(
        &self,
        system_size_kw: f64,
        financing: &[FinancingOption],
        eligibility: Option<&FinancingEligibility>,
        preferences: &LeadPreferences,
    ) -> LeadScore {
        let components = rules::score_components(
            system_size_kw,
            financing,
            eligibility,
            preferences,
            &self.weights,
        );

        let raw: i32 = components
            .iter()
            .map(|component| i32::from(component.points))
            .sum();
        let total = raw.clamp(0, i32::from(MAX_LEAD_SCORE)) as u8;

        LeadScore { total, components }
    }
}

pub fn score_lead(
    system_size_kw: f64,
    financing: &[FinancingOption],
    eligibility: Option<&FinancingEligibility>,
    preferences: &LeadPreferences,
) -> LeadScore {
    LeadScorer::default().score(system_size_kw, financing, eligibility, preferences)
}
