use super::common::*;
use crate::economics::domain::FinancingType;
use crate::economics::eligibility::{calculate_apr, eligibility, ExclusionReason};
use crate::economics::tables::US_STATE_CODES;

#[test]
fn apr_follows_credit_brackets() {
    let tables = tables();
    assert_eq!(calculate_apr(&tables, 700), 6.5);
    assert_eq!(calculate_apr(&tables, 825), 5.5);
    assert_eq!(calculate_apr(&tables, 760), 6.0);
    assert_eq!(calculate_apr(&tables, 650), 8.0);
    assert_eq!(calculate_apr(&tables, 600), 10.0);
    assert_eq!(calculate_apr(&tables, 500), 11.5);
}

#[test]
fn apr_is_bounded_and_non_increasing_in_score() {
    let tables = tables();
    let mut previous = f64::INFINITY;
    for score in 300..=850u16 {
        let apr = calculate_apr(&tables, score);
        assert!((0.0..=12.0).contains(&apr), "apr {apr} out of bounds at {score}");
        assert!(apr <= previous, "apr rose from {previous} to {apr} at {score}");
        previous = apr;
    }
}

#[test]
fn scores_below_table_use_lowest_bracket() {
    let tables = tables();
    assert_eq!(calculate_apr(&tables, 120), calculate_apr(&tables, 300));
}

#[test]
fn low_credit_in_non_program_state_is_cash_only() {
    let tables = tables();
    let result = eligibility(&tables, "AL", 500);

    assert_eq!(
        result.available_options.iter().copied().collect::<Vec<_>>(),
        vec![FinancingType::Cash]
    );
    assert_eq!(result.unavailable_options.len(), 3);
    assert!(result.unavailable_options.iter().any(|excluded| matches!(
        excluded.cause,
        ExclusionReason::CreditBelowMinimum {
            required: 650,
            actual: 500
        }
    )));
    assert!(result
        .recommendations
        .iter()
        .any(|note| note.contains("home equity")));
}

#[test]
fn strong_credit_in_california_unlocks_everything() {
    let tables = tables();
    let result = eligibility(&tables, "ca", 750);

    assert_eq!(result.state, "CA");
    assert_eq!(result.available_options.len(), 4);
    assert!(result.unavailable_options.is_empty());
    assert_eq!(result.credit_tier.as_deref(), Some("Excellent"));
}

#[test]
fn available_options_match_table_membership() {
    let tables = tables();
    for state in US_STATE_CODES {
        for score in [520u16, 649, 650, 720, 810] {
            let result = eligibility(&tables, state, score);
            assert!(result.is_available(FinancingType::Cash));
            assert_eq!(result.is_available(FinancingType::Loan), score >= 650);
            assert_eq!(
                result.is_available(FinancingType::Lease),
                tables.offers_lease(state)
            );
            assert_eq!(
                result.is_available(FinancingType::Ppa),
                tables.offers_ppa(state)
            );
            assert_eq!(
                result.available_options.len() + result.unavailable_options.len(),
                4
            );
        }
    }
}

#[test]
fn unknown_state_offers_no_third_party_ownership() {
    let tables = tables();
    let result = eligibility(&tables, "PR", 720);

    assert!(result.is_available(FinancingType::Cash));
    assert!(result.is_available(FinancingType::Loan));
    assert!(!result.is_available(FinancingType::Lease));
    assert!(!result.is_available(FinancingType::Ppa));
    assert_eq!(
        result.unavailable_options[0].reason,
        "Solar leases are not offered in PR"
    );
}

#[test]
fn recommends_next_bracket_when_it_lowers_apr() {
    let tables = tables();
    let result = eligibility(&tables, "TX", 690);
    assert!(result
        .recommendations
        .iter()
        .any(|note| note.contains("credit score of 700")));

    let top = eligibility(&tables, "TX", 820);
    assert!(top
        .recommendations
        .iter()
        .any(|note| note.contains("best available loan APR")));
}
