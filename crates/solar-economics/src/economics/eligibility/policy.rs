use serde::{Deserialize, Serialize};

use super::super::domain::FinancingType;
use super::super::tables::RateTables;

/// Why a financing structure is not offered for a state and credit score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ExclusionReason {
    CreditBelowMinimum { required: u16, actual: u16 },
    LeaseNotOffered { state: String },
    PpaNotOffered { state: String },
}

impl ExclusionReason {
    pub fn summary(&self) -> String {
        match self {
            ExclusionReason::CreditBelowMinimum { required, actual } => format!(
                "Solar loans require a credit score of {required} or higher (current score: {actual})"
            ),
            ExclusionReason::LeaseNotOffered { state } => {
                format!("Solar leases are not offered in {state}")
            }
            ExclusionReason::PpaNotOffered { state } => {
                format!("Power purchase agreements are not permitted in {state}")
            }
        }
    }
}

pub(crate) fn exclusion_for(
    option: FinancingType,
    state: &str,
    credit_score: u16,
    tables: &RateTables,
) -> Option<ExclusionReason> {
    match option {
        FinancingType::Cash => None,
        FinancingType::Loan => (credit_score < tables.minimum_loan_credit_score).then(|| {
            ExclusionReason::CreditBelowMinimum {
                required: tables.minimum_loan_credit_score,
                actual: credit_score,
            }
        }),
        FinancingType::Lease => (!tables.offers_lease(state)).then(|| {
            ExclusionReason::LeaseNotOffered {
                state: state.to_string(),
            }
        }),
        FinancingType::Ppa => (!tables.offers_ppa(state)).then(|| ExclusionReason::PpaNotOffered {
            state: state.to_string(),
        }),
    }
}

pub(crate) fn recommendations(
    state: &str,
    credit_score: u16,
    apr: f64,
    available: &[FinancingType],
    tables: &RateTables,
) -> Vec<String> {
    let mut notes = Vec::new();
    let offers = |option: FinancingType| available.contains(&option);

    if available == [FinancingType::Cash] {
        notes.push(format!(
            "Only a cash purchase is available in {state} at a credit score of {credit_score}; a home equity loan may provide an alternative way to finance"
        ));
    }

    if credit_score < tables.minimum_loan_credit_score {
        notes.push(format!(
            "Improving the credit score to {}+ unlocks solar loan financing",
            tables.minimum_loan_credit_score
        ));
    } else if let Some(next) = tables.next_bracket(credit_score) {
        let next_apr = super::clamp_apr(tables.base_apr + next.apr_adjustment, tables);
        if next_apr < apr {
            notes.push(format!(
                "Reaching a credit score of {} would lower the loan APR from {:.2}% to {:.2}%",
                next.min_score, apr, next_apr
            ));
        }
    } else {
        notes.push(format!(
            "Credit profile qualifies for the best available loan APR of {apr:.2}%"
        ));
    }

    if offers(FinancingType::Ppa) {
        notes.push(format!(
            "A power purchase agreement in {state} provides solar with no upfront cost, paying only for power produced"
        ));
    } else if offers(FinancingType::Lease) {
        notes.push(
            "A solar lease offers fixed monthly payments with no upfront cost".to_string(),
        );
    } else {
        notes.push(format!(
            "Third-party ownership is not available in {state}; owning the system keeps every tax incentive with the homeowner"
        ));
    }

    notes
}
