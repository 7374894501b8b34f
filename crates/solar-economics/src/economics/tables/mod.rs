//! Versioned lookup data and the shared numeric assumptions of the engine.
//!
//! Tables are built once at process start, validated, and then only ever read. Every
//! component borrows the same [`RateTables`] so sizing, financing, incentives, and the
//! design tiers cannot drift apart on cost-per-watt, production, or escalation figures.

mod standard;

use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::domain::normalize_state;

/// Two-letter codes for the fifty states; the state credit table must list each exactly once.
pub const US_STATE_CODES: [&str; 50] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY",
];

const LOWEST_CREDIT_SCORE: u16 = 300;
const HIGHEST_CREDIT_SCORE: u16 = 850;

/// Defects found while loading or validating rate tables.
#[derive(Debug, thiserror::Error)]
pub enum RateTableError {
    #[error("failed to read rate tables: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid rate table JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("credit score bracket table is empty")]
    EmptyBrackets,
    #[error("credit score brackets must start at {expected}, found {found}")]
    BracketStart { expected: u16, found: u16 },
    #[error("credit score bracket '{label}' ends at {max} before it starts at {min}")]
    InvertedBracket { label: String, min: u16, max: u16 },
    #[error("credit score brackets are not contiguous: '{previous}' ends at {end}, '{next}' starts at {start}")]
    Discontinuity {
        previous: String,
        end: u16,
        next: String,
        start: u16,
    },
    #[error("only the final credit score bracket may be open-ended ('{0}')")]
    OpenEndedBracket(String),
    #[error("final credit score bracket '{0}' must be open-ended")]
    ClosedFinalBracket(String),
    #[error("credit score brackets must reach {expected}; final bracket starts at {found}")]
    BracketCoverage { expected: u16, found: u16 },
    #[error("state tax credit table is missing {0}")]
    MissingState(String),
    #[error("state tax credit table lists {0} more than once")]
    DuplicateState(String),
    #[error("state tax credit table lists unknown state code {0}")]
    UnknownState(String),
    #[error("{table} allow-list names unknown state code {code}")]
    UnknownAllowListState { table: &'static str, code: String },
    #[error("{field} must be a rate between 0 and 1, found {value}")]
    InvalidRate { field: String, value: f64 },
    #[error("{field} must be a positive finite number, found {value}")]
    InvalidAssumption { field: String, value: f64 },
    #[error("APR bounds are inverted ({floor} > {ceiling})")]
    InvalidAprBounds { floor: f64, ceiling: f64 },
    #[error("federal credit schedule must be sorted by year without duplicates (year {0})")]
    UnsortedFederalSchedule(i32),
}

/// Numeric assumptions shared by sizing, financing, and projection code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineAssumptions {
    pub cost_per_watt: f64,
    pub fixed_overhead: f64,
    pub battery_cost: f64,
    /// Annual kWh produced per installed kW at a site with `good` sun exposure.
    pub production_per_kw: f64,
    pub default_utility_rate: f64,
    pub default_monthly_kwh: f64,
    pub offset_fraction: f64,
    pub minimum_system_kw: f64,
    pub usable_roof_fraction: f64,
    pub roof_sqft_per_kw: f64,
    pub panel_watts: f64,
    pub degradation_rate: f64,
    pub escalation_rate: f64,
    pub analysis_years: u32,
    pub max_payback_years: u32,
    pub loan_down_payment_fraction: f64,
    pub loan_term_years: u32,
    pub lease_capture_fraction: f64,
    pub lease_minimum_payment: f64,
    pub lease_term_years: u32,
    pub ppa_rate_fraction: f64,
    pub ppa_escalator: f64,
    pub ppa_term_years: u32,
    pub co2_lbs_per_kwh: f64,
    pub co2_lbs_per_tree: f64,
    pub co2_lbs_per_car_mile: f64,
}

/// Contiguous credit score range mapped to a signed APR adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditScoreBracket {
    pub min_score: u16,
    /// Inclusive upper bound; `None` for the open-ended top bracket.
    pub max_score: Option<u16>,
    pub apr_adjustment: f64,
    pub label: String,
}

impl CreditScoreBracket {
    pub fn contains(&self, score: u16) -> bool {
        score >= self.min_score && self.max_score.map_or(true, |max| score <= max)
    }
}

/// State incentive program; a zero rate means the state has no program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateTaxCredit {
    pub state_code: String,
    pub rate: f64,
    #[serde(default)]
    pub max_amount: Option<f64>,
    pub start_year: i32,
    #[serde(default)]
    pub end_year: Option<i32>,
    /// Apply the state rate to the cost remaining after the federal credit.
    #[serde(default)]
    pub requires_federal_first: bool,
}

impl StateTaxCredit {
    pub fn is_active(&self, year: i32) -> bool {
        self.rate > 0.0 && year >= self.start_year && self.end_year.map_or(true, |end| year <= end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FederalCreditYear {
    pub year: i32,
    pub rate: f64,
}

/// The complete, read-only rate table set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTables {
    pub version: String,
    pub assumptions: EngineAssumptions,
    pub base_apr: f64,
    pub apr_floor: f64,
    pub apr_ceiling: f64,
    pub minimum_loan_credit_score: u16,
    pub credit_brackets: Vec<CreditScoreBracket>,
    pub lease_states: BTreeSet<String>,
    pub ppa_states: BTreeSet<String>,
    pub state_credits: Vec<StateTaxCredit>,
    /// Sorted by year; the last entry's rate carries forward to later years.
    pub federal_schedule: Vec<FederalCreditYear>,
}

impl RateTables {
    /// Built-in tables shipped with the engine.
    pub fn standard() -> Self {
        standard::standard_tables()
    }

    pub fn from_json_str(raw: &str) -> Result<Self, RateTableError> {
        let tables: Self = serde_json::from_str(raw)?;
        tables.validate()?;
        info!(version = %tables.version, "loaded rate tables");
        Ok(tables)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, RateTableError> {
        let tables: Self = serde_json::from_reader(reader)?;
        tables.validate()?;
        info!(version = %tables.version, "loaded rate tables");
        Ok(tables)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RateTableError> {
        let file = std::fs::File::open(path)?;
        Self::from_json_reader(std::io::BufReader::new(file))
    }

    pub fn validate(&self) -> Result<(), RateTableError> {
        self.validate_brackets()?;
        self.validate_states()?;
        self.validate_federal_schedule()?;
        self.validate_assumptions()?;

        if !(self.apr_floor.is_finite() && self.apr_ceiling.is_finite())
            || self.apr_floor > self.apr_ceiling
        {
            return Err(RateTableError::InvalidAprBounds {
                floor: self.apr_floor,
                ceiling: self.apr_ceiling,
            });
        }
        ensure_non_negative("base_apr", self.base_apr)
    }

    pub fn bracket_for(&self, credit_score: u16) -> Option<&CreditScoreBracket> {
        self.credit_brackets
            .iter()
            .find(|bracket| bracket.contains(credit_score))
            .or_else(|| {
                // Scores under the table floor fall into the lowest bracket.
                self.credit_brackets
                    .first()
                    .filter(|bracket| credit_score < bracket.min_score)
            })
    }

    /// Bracket immediately above the one containing `credit_score`, if any.
    pub fn next_bracket(&self, credit_score: u16) -> Option<&CreditScoreBracket> {
        let index = self
            .credit_brackets
            .iter()
            .position(|bracket| bracket.contains(credit_score))?;
        self.credit_brackets.get(index + 1)
    }

    pub fn state_credit(&self, state: &str) -> Option<&StateTaxCredit> {
        let code = normalize_state(state);
        self.state_credits
            .iter()
            .find(|credit| credit.state_code == code)
    }

    pub fn federal_rate(&self, year: i32) -> f64 {
        self.federal_schedule
            .iter()
            .rev()
            .find(|entry| entry.year <= year)
            .map_or(0.0, |entry| entry.rate)
    }

    pub fn offers_lease(&self, state: &str) -> bool {
        self.lease_states.contains(&normalize_state(state))
    }

    pub fn offers_ppa(&self, state: &str) -> bool {
        self.ppa_states.contains(&normalize_state(state))
    }

    fn validate_brackets(&self) -> Result<(), RateTableError> {
        let first = self
            .credit_brackets
            .first()
            .ok_or(RateTableError::EmptyBrackets)?;
        if first.min_score != LOWEST_CREDIT_SCORE {
            return Err(RateTableError::BracketStart {
                expected: LOWEST_CREDIT_SCORE,
                found: first.min_score,
            });
        }

        for (index, bracket) in self.credit_brackets.iter().enumerate() {
            ensure_finite("credit bracket apr_adjustment", bracket.apr_adjustment)?;
            let is_last = index + 1 == self.credit_brackets.len();

            match (bracket.max_score, is_last) {
                (Some(max), _) if max < bracket.min_score => {
                    return Err(RateTableError::InvertedBracket {
                        label: bracket.label.clone(),
                        min: bracket.min_score,
                        max,
                    });
                }
                (None, false) => {
                    return Err(RateTableError::OpenEndedBracket(bracket.label.clone()));
                }
                (Some(_), true) => {
                    return Err(RateTableError::ClosedFinalBracket(bracket.label.clone()));
                }
                _ => {}
            }

            if let (Some(end), Some(next)) =
                (bracket.max_score, self.credit_brackets.get(index + 1))
            {
                if u32::from(end) + 1 != u32::from(next.min_score) {
                    return Err(RateTableError::Discontinuity {
                        previous: bracket.label.clone(),
                        end,
                        next: next.label.clone(),
                        start: next.min_score,
                    });
                }
            }
        }

        if let Some(last) = self.credit_brackets.last() {
            if last.min_score > HIGHEST_CREDIT_SCORE {
                return Err(RateTableError::BracketCoverage {
                    expected: HIGHEST_CREDIT_SCORE,
                    found: last.min_score,
                });
            }
        }

        Ok(())
    }

    fn validate_states(&self) -> Result<(), RateTableError> {
        let mut seen = BTreeSet::new();
        for credit in &self.state_credits {
            if !US_STATE_CODES.contains(&credit.state_code.as_str()) {
                return Err(RateTableError::UnknownState(credit.state_code.clone()));
            }
            if !seen.insert(credit.state_code.as_str()) {
                return Err(RateTableError::DuplicateState(credit.state_code.clone()));
            }
            ensure_rate(format!("{} state credit rate", credit.state_code), credit.rate)?;
            if let Some(max) = credit.max_amount {
                ensure_non_negative(&format!("{} state credit cap", credit.state_code), max)?;
            }
        }

        if let Some(missing) = US_STATE_CODES.iter().find(|code| !seen.contains(**code)) {
            return Err(RateTableError::MissingState((*missing).to_string()));
        }

        for (table, states) in [("lease", &self.lease_states), ("ppa", &self.ppa_states)] {
            if let Some(code) = states
                .iter()
                .find(|code| !US_STATE_CODES.contains(&code.as_str()))
            {
                return Err(RateTableError::UnknownAllowListState {
                    table,
                    code: code.clone(),
                });
            }
        }

        Ok(())
    }

    fn validate_federal_schedule(&self) -> Result<(), RateTableError> {
        for pair in self.federal_schedule.windows(2) {
            if pair[1].year <= pair[0].year {
                return Err(RateTableError::UnsortedFederalSchedule(pair[1].year));
            }
        }
        for entry in &self.federal_schedule {
            ensure_rate(format!("federal credit rate for {}", entry.year), entry.rate)?;
        }
        Ok(())
    }

    fn validate_assumptions(&self) -> Result<(), RateTableError> {
        let a = &self.assumptions;

        for (field, value) in [
            ("cost_per_watt", a.cost_per_watt),
            ("production_per_kw", a.production_per_kw),
            ("default_utility_rate", a.default_utility_rate),
            ("default_monthly_kwh", a.default_monthly_kwh),
            ("offset_fraction", a.offset_fraction),
            ("minimum_system_kw", a.minimum_system_kw),
            ("roof_sqft_per_kw", a.roof_sqft_per_kw),
            ("panel_watts", a.panel_watts),
            ("co2_lbs_per_kwh", a.co2_lbs_per_kwh),
            ("co2_lbs_per_tree", a.co2_lbs_per_tree),
            ("co2_lbs_per_car_mile", a.co2_lbs_per_car_mile),
        ] {
            ensure_positive(field, value)?;
        }

        for (field, value) in [
            ("fixed_overhead", a.fixed_overhead),
            ("battery_cost", a.battery_cost),
            ("lease_minimum_payment", a.lease_minimum_payment),
        ] {
            ensure_non_negative(field, value)?;
        }

        for (field, value) in [
            ("offset_fraction", a.offset_fraction),
            ("usable_roof_fraction", a.usable_roof_fraction),
            ("degradation_rate", a.degradation_rate),
            ("escalation_rate", a.escalation_rate),
            ("loan_down_payment_fraction", a.loan_down_payment_fraction),
            ("lease_capture_fraction", a.lease_capture_fraction),
            ("ppa_rate_fraction", a.ppa_rate_fraction),
            ("ppa_escalator", a.ppa_escalator),
        ] {
            ensure_rate(field.to_string(), value)?;
        }

        for (field, value) in [
            ("analysis_years", a.analysis_years),
            ("max_payback_years", a.max_payback_years),
            ("loan_term_years", a.loan_term_years),
            ("lease_term_years", a.lease_term_years),
            ("ppa_term_years", a.ppa_term_years),
        ] {
            ensure_positive(field, f64::from(value))?;
        }

        Ok(())
    }
}

fn ensure_rate(field: String, value: f64) -> Result<(), RateTableError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(RateTableError::InvalidRate { field, value })
    }
}

fn ensure_positive(field: &str, value: f64) -> Result<(), RateTableError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(RateTableError::InvalidAssumption {
            field: field.to_string(),
            value,
        })
    }
}

fn ensure_non_negative(field: &str, value: f64) -> Result<(), RateTableError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(RateTableError::InvalidAssumption {
            field: field.to_string(),
            value,
        })
    }
}

fn ensure_finite(field: &str, value: f64) -> Result<(), RateTableError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(RateTableError::InvalidAssumption {
            field: field.to_string(),
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_tables_pass_validation() {
        let tables = RateTables::standard();
        tables.validate().expect("standard tables are valid");
        assert_eq!(tables.credit_brackets.len(), 6);
        assert_eq!(tables.state_credits.len(), 50);
        assert_eq!(tables.lease_states.len(), 20);
        assert_eq!(
            tables.ppa_states.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["AZ", "CA", "NV", "UT"]
        );
    }

    #[test]
    fn bracket_lookup_handles_table_edges() {
        let tables = RateTables::standard();
        assert_eq!(tables.bracket_for(250).map(|b| b.min_score), Some(300));
        assert_eq!(tables.bracket_for(649).map(|b| b.min_score), Some(580));
        assert_eq!(tables.bracket_for(650).map(|b| b.min_score), Some(650));
        assert_eq!(tables.bracket_for(900).map(|b| b.min_score), Some(800));
        assert!(tables.next_bracket(900).is_none());
    }

    #[test]
    fn federal_rate_carries_last_entry_forward() {
        let tables = RateTables::standard();
        assert_eq!(tables.federal_rate(2024), 0.30);
        assert_eq!(tables.federal_rate(2021), 0.26);
        assert_eq!(tables.federal_rate(2026), 0.0);
        assert_eq!(tables.federal_rate(2040), 0.0);
        assert_eq!(tables.federal_rate(1990), 0.0);
    }

    #[test]
    fn rejects_gap_between_brackets() {
        let mut tables = RateTables::standard();
        tables.credit_brackets[2].min_score += 5;
        assert!(matches!(
            tables.validate(),
            Err(RateTableError::Discontinuity { .. })
        ));
    }

    #[test]
    fn rejects_missing_state() {
        let mut tables = RateTables::standard();
        tables.state_credits.retain(|credit| credit.state_code != "WY");
        match tables.validate() {
            Err(RateTableError::MissingState(code)) => assert_eq!(code, "WY"),
            other => panic!("expected missing state, got {other:?}"),
        }
    }

    #[test]
    fn rejects_closed_final_bracket() {
        let mut tables = RateTables::standard();
        if let Some(last) = tables.credit_brackets.last_mut() {
            last.max_score = Some(850);
        }
        assert!(matches!(
            tables.validate(),
            Err(RateTableError::ClosedFinalBracket(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_rates() {
        let mut tables = RateTables::standard();
        tables.assumptions.degradation_rate = 1.5;
        assert!(matches!(
            tables.validate(),
            Err(RateTableError::InvalidRate { .. })
        ));
    }

    #[test]
    fn lookups_normalize_state_codes() {
        let tables = RateTables::standard();
        assert!(tables.offers_ppa(" ca "));
        assert!(tables.offers_lease("ny"));
        assert_eq!(
            tables.state_credit("il").map(|credit| credit.rate),
            Some(0.30)
        );
        assert!(tables.state_credit("PR").is_none());
    }
}
