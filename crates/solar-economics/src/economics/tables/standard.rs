use std::collections::BTreeSet;

use super::{CreditScoreBracket, EngineAssumptions, FederalCreditYear, RateTables, StateTaxCredit};

const TABLE_VERSION: &str = "2026.1";

const LEASE_STATES: [&str; 20] = [
    "AZ", "CA", "CO", "CT", "DE", "FL", "HI", "IL", "MA", "MD", "NJ", "NM", "NV", "NY", "OR",
    "PA", "RI", "TX", "UT", "VT",
];

const PPA_STATES: [&str; 4] = ["AZ", "CA", "NV", "UT"];

pub(super) fn standard_tables() -> RateTables {
    RateTables {
        version: TABLE_VERSION.to_string(),
        assumptions: standard_assumptions(),
        base_apr: 6.5,
        apr_floor: 0.0,
        apr_ceiling: 12.0,
        minimum_loan_credit_score: 650,
        credit_brackets: standard_brackets(),
        lease_states: to_set(&LEASE_STATES),
        ppa_states: to_set(&PPA_STATES),
        state_credits: standard_state_credits(),
        federal_schedule: standard_federal_schedule(),
    }
}

fn standard_assumptions() -> EngineAssumptions {
    EngineAssumptions {
        cost_per_watt: 2.75,
        fixed_overhead: 1_500.0,
        battery_cost: 12_000.0,
        production_per_kw: 1_300.0,
        default_utility_rate: 0.15,
        default_monthly_kwh: 500.0,
        offset_fraction: 0.8,
        minimum_system_kw: 1.0,
        usable_roof_fraction: 0.75,
        roof_sqft_per_kw: 60.0,
        panel_watts: 400.0,
        degradation_rate: 0.005,
        escalation_rate: 0.03,
        analysis_years: 25,
        max_payback_years: 50,
        loan_down_payment_fraction: 0.2,
        loan_term_years: 20,
        lease_capture_fraction: 0.65,
        lease_minimum_payment: 50.0,
        lease_term_years: 20,
        ppa_rate_fraction: 0.75,
        ppa_escalator: 0.025,
        ppa_term_years: 25,
        co2_lbs_per_kwh: 0.85,
        co2_lbs_per_tree: 48.0,
        co2_lbs_per_car_mile: 0.89,
    }
}

fn standard_brackets() -> Vec<CreditScoreBracket> {
    [
        (300, Some(579), 5.0, "Poor"),
        (580, Some(649), 3.5, "Fair"),
        (650, Some(699), 1.5, "Good"),
        (700, Some(749), 0.0, "Very Good"),
        (750, Some(799), -0.5, "Excellent"),
        (800, None, -1.0, "Exceptional"),
    ]
    .into_iter()
    .map(
        |(min_score, max_score, apr_adjustment, label)| CreditScoreBracket {
            min_score,
            max_score,
            apr_adjustment,
            label: label.to_string(),
        },
    )
    .collect()
}

fn standard_federal_schedule() -> Vec<FederalCreditYear> {
    // Residential clean energy credit: 26% for 2020-2021, restored to 30% for
    // 2022-2025, terminated for expenditures after 2025.
    [
        (2006, 0.30),
        (2020, 0.26),
        (2022, 0.30),
        (2026, 0.0),
    ]
    .into_iter()
    .map(|(year, rate)| FederalCreditYear { year, rate })
    .collect()
}

fn standard_state_credits() -> Vec<StateTaxCredit> {
    let programs: [(&str, f64, Option<f64>, i32, Option<i32>, bool); 50] = [
        ("AL", 0.0, None, 2000, None, false),
        ("AK", 0.0, None, 2000, None, false),
        ("AZ", 0.25, Some(1_000.0), 1995, None, false),
        ("AR", 0.0, None, 2000, None, false),
        ("CA", 0.0, None, 2000, None, false),
        ("CO", 0.0, None, 2000, None, false),
        ("CT", 0.0, None, 2000, None, false),
        ("DE", 0.0, None, 2000, None, false),
        ("FL", 0.0, None, 2000, None, false),
        ("GA", 0.25, Some(6_700.0), 2020, None, false),
        ("HI", 0.35, Some(5_000.0), 2003, None, false),
        ("ID", 0.40, Some(5_000.0), 2000, None, false),
        ("IL", 0.30, None, 2020, None, false),
        ("IN", 0.0, None, 2000, None, false),
        ("IA", 0.0, None, 2000, None, false),
        ("KS", 0.0, None, 2000, None, false),
        ("KY", 0.0, None, 2000, None, false),
        ("LA", 0.50, Some(12_500.0), 2008, Some(2015), false),
        ("ME", 0.0, None, 2000, None, false),
        ("MD", 0.0, None, 2000, None, false),
        ("MA", 0.15, Some(1_000.0), 2000, None, false),
        ("MI", 0.0, None, 2000, None, false),
        ("MN", 0.0, None, 2000, None, false),
        ("MS", 0.0, None, 2000, None, false),
        ("MO", 0.0, None, 2000, None, false),
        ("MT", 0.10, Some(500.0), 2000, None, false),
        ("NE", 0.0, None, 2000, None, false),
        ("NV", 0.0, None, 2000, None, false),
        ("NH", 0.0, None, 2000, None, false),
        ("NJ", 0.0, None, 2000, None, false),
        ("NM", 0.10, Some(6_000.0), 2020, Some(2032), false),
        ("NY", 0.25, Some(5_000.0), 2006, None, false),
        ("NC", 0.0, None, 2000, None, false),
        ("ND", 0.0, None, 2000, None, false),
        ("OH", 0.0, None, 2000, None, false),
        ("OK", 0.0, None, 2000, None, false),
        ("OR", 0.0, None, 2000, None, false),
        ("PA", 0.0, None, 2000, None, false),
        ("RI", 0.0, None, 2000, None, false),
        ("SC", 0.25, Some(35_000.0), 2008, None, true),
        ("SD", 0.0, None, 2000, None, false),
        ("TN", 0.0, None, 2000, None, false),
        ("TX", 0.0, None, 2000, None, false),
        ("UT", 0.25, Some(800.0), 2017, Some(2023), false),
        ("VT", 0.0, None, 2000, None, false),
        ("VA", 0.0, None, 2000, None, false),
        ("WA", 0.0, None, 2000, None, false),
        ("WV", 0.0, None, 2000, None, false),
        ("WI", 0.0, None, 2000, None, false),
        ("WY", 0.0, None, 2000, None, false),
    ];

    programs
        .into_iter()
        .map(
            |(state_code, rate, max_amount, start_year, end_year, requires_federal_first)| {
                StateTaxCredit {
                    state_code: state_code.to_string(),
                    rate,
                    max_amount,
                    start_year,
                    end_year,
                    requires_federal_first,
                }
            },
        )
        .collect()
}

fn to_set(codes: &[&str]) -> BTreeSet<String> {
    codes.iter().map(|code| (*code).to_string()).collect()
}
