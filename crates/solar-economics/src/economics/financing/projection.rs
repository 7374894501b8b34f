use serde::{Deserialize, Serialize};

use super::super::domain::{round_currency, round_to};
use super::super::tables::EngineAssumptions;

/// One row of a cash-flow chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowYear {
    pub year: u32,
    pub production_kwh: f64,
    pub utility_rate: f64,
    pub savings: f64,
    pub cumulative_savings: f64,
    /// Cumulative savings minus the upfront outlay.
    pub net_position: f64,
}

/// Year-by-year savings model shared by every multi-year projection.
///
/// Year 1 is undegraded at the current utility rate; each later year loses
/// `degradation_rate` of output and gains `escalation_rate` on the rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SavingsProjection {
    year_one_production: f64,
    utility_rate: f64,
    degradation_rate: f64,
    escalation_rate: f64,
}

impl SavingsProjection {
    pub fn new(year_one_production: f64, utility_rate: f64, assumptions: &EngineAssumptions) -> Self {
        Self {
            year_one_production: non_negative(year_one_production),
            utility_rate: non_negative(utility_rate),
            degradation_rate: assumptions.degradation_rate,
            escalation_rate: assumptions.escalation_rate,
        }
    }

    pub fn production_for_year(&self, year: u32) -> f64 {
        if year == 0 {
            return 0.0;
        }
        self.year_one_production * (1.0 - self.degradation_rate).powi(year as i32 - 1)
    }

    pub fn rate_for_year(&self, year: u32) -> f64 {
        if year == 0 {
            return self.utility_rate;
        }
        self.utility_rate * (1.0 + self.escalation_rate).powi(year as i32 - 1)
    }

    pub fn savings_for_year(&self, year: u32) -> f64 {
        self.production_for_year(year) * self.rate_for_year(year)
    }

    pub fn cumulative_savings(&self, years: u32) -> f64 {
        (1..=years).map(|year| self.savings_for_year(year)).sum()
    }

    /// Fractional years until cumulative savings cover `cost`; `None` if not within `max_years`.
    pub fn payback_years(&self, cost: f64, max_years: u32) -> Option<f64> {
        if !cost.is_finite() || cost <= 0.0 {
            return Some(0.0);
        }

        let mut cumulative = 0.0;
        for year in 1..=max_years {
            let savings = self.savings_for_year(year);
            if savings > 0.0 && cumulative + savings >= cost {
                let fraction = (cost - cumulative) / savings;
                return Some(round_to(f64::from(year - 1) + fraction, 2));
            }
            cumulative += savings;
        }
        None
    }

    pub fn cash_flow(&self, upfront_cost: f64, years: u32) -> Vec<CashFlowYear> {
        let upfront_cost = non_negative(upfront_cost);
        let mut cumulative = 0.0;
        (1..=years)
            .map(|year| {
                let savings = self.savings_for_year(year);
                cumulative += savings;
                CashFlowYear {
                    year,
                    production_kwh: round_to(self.production_for_year(year), 0),
                    utility_rate: round_to(self.rate_for_year(year), 4),
                    savings: round_currency(savings),
                    cumulative_savings: round_currency(cumulative),
                    net_position: round_currency(cumulative - upfront_cost),
                }
            })
            .collect()
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economics::tables::RateTables;

    fn projection() -> SavingsProjection {
        SavingsProjection::new(10_000.0, 0.15, &RateTables::standard().assumptions)
    }

    #[test]
    fn year_one_is_undegraded() {
        let projection = projection();
        assert_eq!(projection.production_for_year(1), 10_000.0);
        assert_eq!(projection.rate_for_year(1), 0.15);
        assert!((projection.savings_for_year(1) - 1_500.0).abs() < 1e-9);
    }

    #[test]
    fn later_years_apply_degradation_and_escalation() {
        let projection = projection();
        let expected = 10_000.0 * 0.995 * 0.15 * 1.03;
        assert!((projection.savings_for_year(2) - expected).abs() < 1e-9);
    }

    #[test]
    fn cumulative_matches_sum_of_years() {
        let projection = projection();
        let manual: f64 = (1..=25).map(|year| projection.savings_for_year(year)).sum();
        assert!((projection.cumulative_savings(25) - manual).abs() < 1e-9);
    }

    #[test]
    fn payback_interpolates_within_year() {
        let projection = projection();
        let payback = projection.payback_years(750.0, 50).expect("pays back");
        assert!((payback - 0.5).abs() < 1e-9);
    }

    #[test]
    fn payback_is_none_without_savings() {
        let projection =
            SavingsProjection::new(0.0, 0.15, &RateTables::standard().assumptions);
        assert_eq!(projection.payback_years(10_000.0, 50), None);
        assert_eq!(projection.payback_years(0.0, 50), Some(0.0));
    }

    #[test]
    fn cash_flow_tracks_net_position() {
        let rows = projection().cash_flow(3_000.0, 3);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].net_position, -1_500.0);
        assert!(rows[2].net_position > 0.0);
        assert!((rows[2].cumulative_savings - 3_000.0 - rows[2].net_position).abs() < 0.011);
    }
}
