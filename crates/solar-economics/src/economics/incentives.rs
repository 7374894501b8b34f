use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{normalize_state, ratio, round_currency, round_to};
use super::financing::SavingsProjection;
use super::tables::RateTables;

/// Federal and state incentive credits for a system cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxCreditResult {
    pub state: String,
    pub year: i32,
    pub system_cost: f64,
    pub federal_rate: f64,
    pub federal_credit: f64,
    pub state_rate: f64,
    pub state_program_active: bool,
    pub state_base_amount: f64,
    pub state_credit: f64,
    pub state_cap: Option<f64>,
    /// True when the uncapped state credit exceeded `state_cap`.
    pub capped: bool,
    pub total_credit: f64,
    pub net_system_cost: f64,
}

/// Payoff and return figures with credits applied. Always an estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncentiveImpact {
    pub annual_savings: f64,
    pub payoff_years_without_credits: Option<f64>,
    pub payoff_years_with_credits: Option<f64>,
    pub payoff_reduction_years: Option<f64>,
    /// `None` when the credits cover the whole system cost.
    pub roi_with_credits: Option<f64>,
    pub is_estimate: bool,
}

pub struct TaxCreditResolver<'a> {
    tables: &'a RateTables,
}

impl<'a> TaxCreditResolver<'a> {
    pub fn new(tables: &'a RateTables) -> Self {
        Self { tables }
    }

    pub fn resolve(&self, system_cost: f64, state: &str, year: i32) -> TaxCreditResult {
        let state = normalize_state(state);
        let system_cost = if system_cost.is_finite() {
            system_cost.max(0.0)
        } else {
            0.0
        };

        let federal_rate = self.tables.federal_rate(year);
        let federal_credit = system_cost * federal_rate;

        let program = self
            .tables
            .state_credit(&state)
            .filter(|credit| credit.is_active(year));

        let (state_rate, state_base_amount, state_cap) = match program {
            Some(credit) => {
                let base = if credit.requires_federal_first {
                    (system_cost - federal_credit).max(0.0)
                } else {
                    system_cost
                };
                (credit.rate, base, credit.max_amount)
            }
            None => (0.0, 0.0, None),
        };

        let uncapped = state_rate * state_base_amount;
        let (state_credit, capped) = match state_cap {
            Some(cap) if uncapped > cap => (cap, true),
            _ => (uncapped, false),
        };

        let total_credit = federal_credit + state_credit;
        let net_system_cost = (system_cost - total_credit).max(0.0);

        debug!(
            state = %state,
            year,
            federal_credit,
            state_credit,
            capped,
            "resolved tax credits"
        );

        TaxCreditResult {
            state_program_active: program.is_some(),
            state,
            year,
            system_cost: round_currency(system_cost),
            federal_rate,
            federal_credit: round_currency(federal_credit),
            state_rate,
            state_base_amount: round_currency(state_base_amount),
            state_credit: round_currency(state_credit),
            state_cap,
            capped,
            total_credit: round_currency(total_credit),
            net_system_cost: round_currency(net_system_cost),
        }
    }

    /// Payoff reduction and ROI from the same year-by-year projection used for financing.
    pub fn impact(&self, credits: &TaxCreditResult, projection: &SavingsProjection) -> IncentiveImpact {
        let assumptions = &self.tables.assumptions;
        let max_years = assumptions.max_payback_years;
        let annual_savings = projection.savings_for_year(1);

        let (without, with) = if annual_savings > 0.0 {
            (
                projection.payback_years(credits.system_cost, max_years),
                projection.payback_years(credits.net_system_cost, max_years),
            )
        } else {
            (None, None)
        };

        let payoff_reduction_years = match (without, with) {
            (Some(before), Some(after)) => Some(round_to((before - after).max(0.0), 2)),
            _ => None,
        };

        let lifetime = projection.cumulative_savings(assumptions.analysis_years);
        let roi_with_credits = (credits.net_system_cost > 0.0).then(|| {
            round_to(
                ratio(lifetime - credits.net_system_cost, credits.net_system_cost),
                4,
            )
        });

        IncentiveImpact {
            annual_savings: round_currency(annual_savings),
            payoff_years_without_credits: without,
            payoff_years_with_credits: with,
            payoff_reduction_years,
            roi_with_credits,
            is_estimate: true,
        }
    }
}

pub fn tax_credits(tables: &RateTables, system_cost: f64, state: &str, year: i32) -> TaxCreditResult {
    TaxCreditResolver::new(tables).resolve(system_cost, state, year)
}
