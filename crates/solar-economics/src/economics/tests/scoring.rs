use super::common::*;
use crate::economics::domain::FinancingType;
use crate::economics::eligibility::eligibility;
use crate::economics::financing::finance_options;
use crate::economics::scoring::{
    score_lead, LeadFactor, LeadPreferences, LeadScorer, PurchaseTimeline, ScoringWeights,
    MAX_LEAD_SCORE,
};

fn points_for(score: &crate::economics::scoring::LeadScore, factor: LeadFactor) -> i16 {
    score
        .components
        .iter()
        .filter(|component| component.factor == factor)
        .map(|component| component.points)
        .sum()
}

#[test]
fn strong_lead_clamps_to_maximum() {
    let tables = tables();
    let financing = finance_options(&tables, 12.0, 15_600.0);
    let eligible = eligibility(&tables, "CA", 780);
    let preferences = LeadPreferences {
        timeline: Some(PurchaseTimeline::Immediately),
        preferred_financing: Some(FinancingType::Ppa),
        wants_battery: true,
    };

    let score = score_lead(12.0, &financing, Some(&eligible), &preferences);

    let raw: i32 = score.components.iter().map(|c| i32::from(c.points)).sum();
    assert!(raw > i32::from(MAX_LEAD_SCORE));
    assert_eq!(score.total, MAX_LEAD_SCORE);
    assert_eq!(points_for(&score, LeadFactor::FinancingBreadth), 20);
    assert_eq!(points_for(&score, LeadFactor::ProjectedReturn), 10);
}

#[test]
fn weak_lead_scores_low_with_audit_trail() {
    let tables = tables();
    let financing = finance_options(&tables, 2.0, 2_600.0);
    let eligible = eligibility(&tables, "AL", 500);
    let preferences = LeadPreferences {
        timeline: Some(PurchaseTimeline::JustResearching),
        preferred_financing: Some(FinancingType::Loan),
        wants_battery: false,
    };

    let score = score_lead(2.0, &financing, Some(&eligible), &preferences);

    assert_eq!(score.total, 29);
    assert_eq!(points_for(&score, LeadFactor::FinancingPreference), 0);
    assert_eq!(points_for(&score, LeadFactor::BatteryInterest), 0);
    let preference = score
        .components
        .iter()
        .find(|component| component.factor == LeadFactor::FinancingPreference)
        .expect("preference component");
    assert!(preference.notes.contains("not available"));
}

#[test]
fn missing_eligibility_counts_cash_only() {
    let tables = tables();
    let financing = finance_options(&tables, 8.0, 10_400.0);
    let score = score_lead(8.0, &financing, None, &LeadPreferences::default());

    assert_eq!(points_for(&score, LeadFactor::FinancingBreadth), 5);
    assert_eq!(points_for(&score, LeadFactor::Timeline), 0);
    assert_eq!(points_for(&score, LeadFactor::FinancingPreference), 3);
}

#[test]
fn total_is_sum_of_components_when_in_range() {
    let tables = tables();
    let eligible = eligibility(&tables, "TX", 700);
    for size in [1.5, 4.0, 6.9, 7.0, 10.0] {
        let financing = finance_options(&tables, size, size * 1_300.0);
        for timeline in [
            None,
            Some(PurchaseTimeline::WithinThreeMonths),
            Some(PurchaseTimeline::WithinSixMonths),
        ] {
            let preferences = LeadPreferences {
                timeline,
                ..LeadPreferences::default()
            };
            let score = score_lead(size, &financing, Some(&eligible), &preferences);
            let raw: i32 = score.components.iter().map(|c| i32::from(c.points)).sum();
            assert_eq!(i32::from(score.total), raw.clamp(0, 100));
            assert!(score.total <= MAX_LEAD_SCORE);
        }
    }
}

#[test]
fn negative_weights_clamp_to_zero() {
    let tables = tables();
    let scorer = LeadScorer::new(ScoringWeights {
        baseline: -200,
        ..ScoringWeights::default()
    });
    let financing = finance_options(&tables, 8.0, 10_400.0);
    let score = scorer.score(8.0, &financing, None, &LeadPreferences::default());
    assert_eq!(score.total, 0);
}
