use crate::economics::calculator::{ProposalRequest, QuoteRequest};
use crate::economics::domain::{CalculationInput, Confidence, SunExposure, UsageSignal};
use crate::economics::scoring::{LeadPreferences, PurchaseTimeline};
use crate::economics::tables::RateTables;

pub(super) fn tables() -> RateTables {
    RateTables::standard()
}

pub(super) fn input(state: &str, usage: Option<UsageSignal>) -> CalculationInput {
    CalculationInput {
        usage,
        roof_square_feet: 1_500.0,
        sun_exposure: SunExposure::Good,
        state: state.to_string(),
        wants_battery: false,
        utility_rate: None,
    }
}

pub(super) fn quote_request(state: &str, credit_score: Option<u16>) -> QuoteRequest {
    QuoteRequest {
        input: input(state, Some(UsageSignal::Kwh(1_000.0))),
        credit_score,
        confidence: Confidence::Preliminary,
    }
}

pub(super) fn proposal_request(state: &str, credit_score: Option<u16>) -> ProposalRequest {
    ProposalRequest {
        quote: quote_request(state, credit_score),
        year: 2024,
        preferences: LeadPreferences {
            timeline: Some(PurchaseTimeline::WithinThreeMonths),
            preferred_financing: None,
            wants_battery: false,
        },
    }
}

pub(super) fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}
