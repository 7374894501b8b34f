//! Cash, loan, lease, and PPA money flows for a sized system.

mod projection;

pub use projection::{CashFlowYear, SavingsProjection};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{
    ratio, round_currency, round_to, FinancingOption, FinancingTerms, FinancingType,
};
use super::tables::{EngineAssumptions, RateTables};

/// Inputs shared by all four financing computations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancingRequest {
    pub system_size_kw: f64,
    pub annual_production: f64,
    pub utility_rate: f64,
    pub include_battery: bool,
    /// Annual percentage rate, e.g. `6.5` for 6.5%.
    pub loan_apr: f64,
}

pub struct FinancingEngine<'a> {
    tables: &'a RateTables,
}

impl<'a> FinancingEngine<'a> {
    pub fn new(tables: &'a RateTables) -> Self {
        Self { tables }
    }

    /// Request using the table default utility rate and base APR.
    pub fn default_request(&self, system_size_kw: f64, annual_production: f64) -> FinancingRequest {
        FinancingRequest {
            system_size_kw,
            annual_production,
            utility_rate: self.tables.assumptions.default_utility_rate,
            include_battery: false,
            loan_apr: self.tables.base_apr,
        }
    }

    pub fn system_cost(&self, system_size_kw: f64, include_battery: bool) -> f64 {
        let assumptions = &self.tables.assumptions;
        let size = if system_size_kw.is_finite() {
            system_size_kw.max(0.0)
        } else {
            0.0
        };
        let battery = if include_battery {
            assumptions.battery_cost
        } else {
            0.0
        };
        round_currency(
            assumptions.fixed_overhead + size * 1_000.0 * assumptions.cost_per_watt + battery,
        )
    }

    pub fn projection(&self, annual_production: f64, utility_rate: f64) -> SavingsProjection {
        SavingsProjection::new(annual_production, utility_rate, &self.tables.assumptions)
    }

    pub fn options(&self, system_size_kw: f64, annual_production: f64) -> [FinancingOption; 4] {
        self.options_for(&self.default_request(system_size_kw, annual_production))
    }

    /// Always four options, ordered cash, loan, lease, ppa.
    pub fn options_for(&self, request: &FinancingRequest) -> [FinancingOption; 4] {
        let assumptions = &self.tables.assumptions;
        let cost = self.system_cost(request.system_size_kw, request.include_battery);
        let projection = self.projection(request.annual_production, request.utility_rate);

        debug!(
            system_size_kw = request.system_size_kw,
            total_system_cost = cost,
            loan_apr = request.loan_apr,
            "computing financing options"
        );

        [
            cash_option(cost, &projection, assumptions),
            loan_option(cost, request.loan_apr, &projection, assumptions),
            lease_option(&projection, assumptions),
            ppa_option(request.utility_rate, &projection, assumptions),
        ]
    }
}

/// Four financing options at the table defaults.
pub fn finance_options(
    tables: &RateTables,
    system_size_kw: f64,
    annual_production: f64,
) -> [FinancingOption; 4] {
    FinancingEngine::new(tables).options(system_size_kw, annual_production)
}

/// Level monthly payment for an amortized loan; `apr` in percent.
pub fn monthly_payment(principal: f64, apr: f64, months: u32) -> f64 {
    if months == 0 || !principal.is_finite() || principal <= 0.0 {
        return 0.0;
    }
    let n = f64::from(months);
    let r = if apr.is_finite() { apr.max(0.0) / 100.0 / 12.0 } else { 0.0 };
    if r == 0.0 {
        return principal / n;
    }
    let growth = (1.0 + r).powf(n);
    principal * r * growth / (growth - 1.0)
}

fn cash_option(
    cost: f64,
    projection: &SavingsProjection,
    assumptions: &EngineAssumptions,
) -> FinancingOption {
    let value = projection.cumulative_savings(assumptions.analysis_years);
    let breakeven_years = projection.payback_years(cost, assumptions.max_payback_years);
    let lifetime_savings = value - cost;

    FinancingOption {
        kind: FinancingType::Cash,
        total_cost: cost,
        down_payment: cost,
        monthly_payment: 0.0,
        total_interest: 0.0,
        payoff_years: breakeven_years.unwrap_or(f64::from(assumptions.max_payback_years)),
        roi: round_to(ratio(lifetime_savings, cost), 4),
        lifetime_savings: round_currency(lifetime_savings),
        terms: FinancingTerms::Cash {
            breakeven_years,
            year_one_savings: round_currency(projection.savings_for_year(1)),
        },
    }
}

fn loan_option(
    cost: f64,
    apr: f64,
    projection: &SavingsProjection,
    assumptions: &EngineAssumptions,
) -> FinancingOption {
    let down_payment = cost * assumptions.loan_down_payment_fraction;
    let principal = cost - down_payment;
    let months = assumptions.loan_term_years * 12;
    let payment = monthly_payment(principal, apr, months);
    let total_paid = payment * f64::from(months);
    let total_interest = (total_paid - principal).max(0.0);
    let total_cost = down_payment + total_paid;
    let lifetime_savings = projection.cumulative_savings(assumptions.analysis_years) - total_cost;

    FinancingOption {
        kind: FinancingType::Loan,
        total_cost: round_currency(total_cost),
        down_payment: round_currency(down_payment),
        monthly_payment: round_currency(payment),
        total_interest: round_currency(total_interest),
        payoff_years: f64::from(assumptions.loan_term_years),
        roi: round_to(ratio(lifetime_savings, total_cost), 4),
        lifetime_savings: round_currency(lifetime_savings),
        terms: FinancingTerms::Loan {
            apr: round_to(apr, 3),
            term_years: assumptions.loan_term_years,
            principal: round_currency(principal),
        },
    }
}

fn lease_option(projection: &SavingsProjection, assumptions: &EngineAssumptions) -> FinancingOption {
    let monthly_value = projection.savings_for_year(1) / 12.0;
    let payment = (monthly_value * assumptions.lease_capture_fraction)
        .max(assumptions.lease_minimum_payment);
    let total_cost = payment * 12.0 * f64::from(assumptions.lease_term_years);
    let value = projection.cumulative_savings(assumptions.lease_term_years);
    let lifetime_savings = value - total_cost;

    FinancingOption {
        kind: FinancingType::Lease,
        total_cost: round_currency(total_cost),
        down_payment: 0.0,
        monthly_payment: round_currency(payment),
        total_interest: 0.0,
        payoff_years: 0.0,
        roi: round_to(ratio(lifetime_savings, total_cost), 4),
        lifetime_savings: round_currency(lifetime_savings),
        terms: FinancingTerms::Lease {
            term_years: assumptions.lease_term_years,
            monthly_electricity_value: round_currency(monthly_value),
            capture_fraction: assumptions.lease_capture_fraction,
        },
    }
}

fn ppa_option(
    utility_rate: f64,
    projection: &SavingsProjection,
    assumptions: &EngineAssumptions,
) -> FinancingOption {
    let rate_per_kwh = utility_rate.max(0.0) * assumptions.ppa_rate_fraction;
    let mut total_cost = 0.0;
    let mut grid_value = 0.0;
    let mut first_year_cost = 0.0;

    for year in 1..=assumptions.ppa_term_years {
        let escalated_rate = rate_per_kwh * (1.0 + assumptions.ppa_escalator).powi(year as i32 - 1);
        let year_cost = projection.production_for_year(year) * escalated_rate;
        if year == 1 {
            first_year_cost = year_cost;
        }
        total_cost += year_cost;
        grid_value += projection.savings_for_year(year);
    }
    let lifetime_savings = grid_value - total_cost;

    FinancingOption {
        kind: FinancingType::Ppa,
        total_cost: round_currency(total_cost),
        down_payment: 0.0,
        monthly_payment: round_currency(first_year_cost / 12.0),
        total_interest: 0.0,
        payoff_years: 0.0,
        roi: round_to(ratio(lifetime_savings, total_cost), 4),
        lifetime_savings: round_currency(lifetime_savings),
        terms: FinancingTerms::Ppa {
            rate_per_kwh: round_to(rate_per_kwh, 4),
            escalator: assumptions.ppa_escalator,
            term_years: assumptions.ppa_term_years,
            grid_value: round_currency(grid_value),
        },
    }
}
