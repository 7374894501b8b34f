use super::common::*;
use crate::economics::calculator::{QuoteRequest, SolarCalculator};
use crate::economics::domain::{Confidence, FinancingTerms, FinancingType, UsageSignal};
use crate::economics::scoring::LeadFactor;

fn loan_apr(result: &crate::economics::domain::SolarCalculationResult) -> f64 {
    match &result.financing[1].terms {
        FinancingTerms::Loan { apr, .. } => *apr,
        other => panic!("expected loan terms, got {other:?}"),
    }
}

#[test]
fn quote_composes_sizing_and_financing() {
    let tables = tables();
    let result = SolarCalculator::new(&tables).calculate(&quote_request("CA", Some(720)));

    assert_eq!(result.system_size_kw, 7.38);
    assert_eq!(result.estimated_annual_production, 9_594.0);
    assert_eq!(result.estimated_monthly_production, 799.5);
    assert_eq!(result.total_system_cost, 21_795.0);
    assert_eq!(result.utility_rate, 0.15);
    assert_eq!(loan_apr(&result), 6.5);
    assert_eq!(result.confidence, Confidence::Preliminary);
}

#[test]
fn monthly_production_is_a_twelfth_of_annual() {
    let tables = tables();
    let calculator = SolarCalculator::new(&tables);
    for monthly in [180.0, 640.0, 1_000.0, 2_750.0] {
        let mut request = quote_request("AZ", None);
        request.input.usage = Some(UsageSignal::Kwh(monthly));
        let result = calculator.calculate(&request);
        assert_close(
            result.estimated_monthly_production * 12.0,
            result.estimated_annual_production,
            0.06,
        );
        assert!(result.system_size_kw > 0.0);
    }
}

#[test]
fn credit_score_adjusts_loan_apr() {
    let tables = tables();
    let calculator = SolarCalculator::new(&tables);

    assert_eq!(loan_apr(&calculator.calculate(&quote_request("CA", None))), 6.5);
    assert_eq!(loan_apr(&calculator.calculate(&quote_request("CA", Some(780)))), 6.0);
    assert_eq!(loan_apr(&calculator.calculate(&quote_request("CA", Some(560)))), 11.5);
}

#[test]
fn battery_raises_system_cost() {
    let tables = tables();
    let calculator = SolarCalculator::new(&tables);
    let mut request = quote_request("CA", None);
    let without = calculator.calculate(&request);
    request.input.wants_battery = true;
    let with = calculator.calculate(&request);

    assert_eq!(with.total_system_cost - without.total_system_cost, 12_000.0);
    assert_eq!(with.system_size_kw, without.system_size_kw);
}

#[test]
fn calculation_is_idempotent() {
    let tables = tables();
    let calculator = SolarCalculator::new(&tables);
    let request = quote_request("NY", Some(705));

    let first = calculator.calculate(&request);
    let second = calculator.calculate(&request);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).expect("serialize"),
        serde_json::to_string(&second).expect("serialize")
    );
}

#[test]
fn environmental_impact_tracks_production() {
    let tables = tables();
    let result = SolarCalculator::new(&tables).calculate(&quote_request("CA", None));
    let impact = &result.environmental;

    assert_eq!(impact.annual_co2_offset_lbs, 8_155.0);
    assert_eq!(impact.equivalent_trees_planted, 170.0);
    assert!(impact.lifetime_co2_offset_tons > 0.0);
    assert!(impact.equivalent_car_miles_avoided > 0.0);
}

#[test]
fn confidence_tag_passes_through() {
    let tables = tables();
    let mut request = quote_request("CA", None);
    request.confidence = Confidence::Mocked;
    let result = SolarCalculator::new(&tables).calculate(&request);
    assert_eq!(result.confidence, Confidence::Mocked);
}

#[test]
fn quote_request_reads_wizard_json() {
    let raw = r#"{
        "usage": { "kind": "bill", "value": 180.0 },
        "roof_square_feet": 1200,
        "sun_exposure": "mostly shade",
        "state": "nv",
        "credit_score": 690
    }"#;
    let request: QuoteRequest = serde_json::from_str(raw).expect("request parses");

    assert_eq!(request.input.usage, Some(UsageSignal::Bill(180.0)));
    assert_eq!(request.input.sun_exposure.multiplier(), 1.0);
    assert_eq!(request.credit_score, Some(690));
    assert_eq!(request.confidence, Confidence::Preliminary);
    assert!(!request.input.wants_battery);
}

#[test]
fn proposal_assembles_every_section() {
    let tables = tables();
    let proposal = SolarCalculator::new(&tables).proposal(&proposal_request("CA", Some(780)));

    let eligibility = proposal.eligibility.as_ref().expect("credit score supplied");
    assert_eq!(eligibility.available_options.len(), 4);
    assert_eq!(
        proposal.tax_credits.system_cost,
        proposal.calculation.total_system_cost
    );
    assert_eq!(
        proposal.design_tiers[1].system_size_kw,
        proposal.calculation.system_size_kw
    );
    assert_eq!(proposal.cash_flow.len(), 25);
    assert_close(
        proposal.cash_flow[0].net_position,
        proposal.cash_flow[0].savings - proposal.tax_credits.net_system_cost,
        0.011,
    );
    assert!(proposal.lead_score.total <= 100);
    assert!(proposal.incentive_impact.is_estimate);
}

#[test]
fn proposal_without_credit_score_scores_cash_only() {
    let tables = tables();
    let proposal = SolarCalculator::new(&tables).proposal(&proposal_request("TX", None));

    assert!(proposal.eligibility.is_none());
    let breadth = proposal
        .lead_score
        .components
        .iter()
        .find(|component| component.factor == LeadFactor::FinancingBreadth)
        .expect("breadth component");
    assert_eq!(breadth.points, 5);
    assert_eq!(proposal.calculation.financing[0].kind, FinancingType::Cash);
}
