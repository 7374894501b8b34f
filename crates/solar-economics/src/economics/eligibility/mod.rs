mod policy;

pub use policy::ExclusionReason;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::domain::{normalize_state, round_to, FinancingType};
use super::tables::RateTables;

/// A financing structure that is not offered, with the reason shown to the homeowner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnavailableOption {
    pub option: FinancingType,
    pub reason: String,
    pub cause: ExclusionReason,
}

/// Offered and excluded financing structures for a state and credit score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingEligibility {
    pub state: String,
    pub credit_score: u16,
    pub available_options: BTreeSet<FinancingType>,
    pub unavailable_options: Vec<UnavailableOption>,
    /// Advisory only; no component branches on these.
    pub recommendations: Vec<String>,
    pub apr: f64,
    pub credit_tier: Option<String>,
}

impl FinancingEligibility {
    pub fn is_available(&self, option: FinancingType) -> bool {
        self.available_options.contains(&option)
    }
}

/// Stateless rule set over credit brackets and state allow-lists.
pub struct EligibilityRules<'a> {
    tables: &'a RateTables,
}

impl<'a> EligibilityRules<'a> {
    pub fn new(tables: &'a RateTables) -> Self {
        Self { tables }
    }

    pub fn evaluate(&self, state: &str, credit_score: u16) -> FinancingEligibility {
        let state = normalize_state(state);
        let mut available_options = BTreeSet::new();
        let mut unavailable_options = Vec::new();

        for option in FinancingType::ordered() {
            match policy::exclusion_for(option, &state, credit_score, self.tables) {
                None => {
                    available_options.insert(option);
                }
                Some(cause) => unavailable_options.push(UnavailableOption {
                    option,
                    reason: cause.summary(),
                    cause,
                }),
            }
        }

        let apr = self.calculate_apr(credit_score);
        let ordered: Vec<FinancingType> = available_options.iter().copied().collect();
        let recommendations =
            policy::recommendations(&state, credit_score, apr, &ordered, self.tables);

        FinancingEligibility {
            credit_tier: self
                .tables
                .bracket_for(credit_score)
                .map(|bracket| bracket.label.clone()),
            state,
            credit_score,
            available_options,
            unavailable_options,
            recommendations,
            apr,
        }
    }

    /// Base APR plus the bracket adjustment, clamped to the table bounds.
    pub fn calculate_apr(&self, credit_score: u16) -> f64 {
        let adjustment = self
            .tables
            .bracket_for(credit_score)
            .map_or(0.0, |bracket| bracket.apr_adjustment);
        clamp_apr(self.tables.base_apr + adjustment, self.tables)
    }
}

pub fn eligibility(tables: &RateTables, state: &str, credit_score: u16) -> FinancingEligibility {
    EligibilityRules::new(tables).evaluate(state, credit_score)
}

pub fn calculate_apr(tables: &RateTables, credit_score: u16) -> f64 {
    EligibilityRules::new(tables).calculate_apr(credit_score)
}

pub(crate) fn clamp_apr(apr: f64, tables: &RateTables) -> f64 {
    round_to(apr.clamp(tables.apr_floor, tables.apr_ceiling), 3)
}
