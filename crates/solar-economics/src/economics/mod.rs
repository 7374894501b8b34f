//! Solar economics engine: pure transforms from household data and static rate tables
//! to sizing, financing, eligibility, incentive, and lead-score results.

pub mod calculator;
pub mod design;
pub mod domain;
pub mod eligibility;
pub mod financing;
pub mod incentives;
pub mod lead;
pub mod scoring;
pub mod sizing;
pub mod tables;

#[cfg(test)]
mod tests;

pub use calculator::{Proposal, ProposalRequest, QuoteRequest, SolarCalculator};
pub use design::{
    design_tiers, DesignRequest, DesignTier, SystemDesignOption, SystemDesignOptionGenerator,
};
pub use domain::{
    CalculationInput, Confidence, EnvironmentalImpact, FinancingOption, FinancingTerms,
    FinancingType, SolarCalculationResult, SunExposure, UsageSignal,
};
pub use eligibility::{
    calculate_apr, eligibility, EligibilityRules, ExclusionReason, FinancingEligibility,
    UnavailableOption,
};
pub use financing::{
    finance_options, monthly_payment, CashFlowYear, FinancingEngine, FinancingRequest,
    SavingsProjection,
};
pub use incentives::{tax_credits, IncentiveImpact, TaxCreditResolver, TaxCreditResult};
pub use lead::{LeadRecord, LeadStatus, LeadTransitionError};
pub use scoring::{
    score_lead, LeadFactor, LeadPreferences, LeadScore, LeadScorer, PurchaseTimeline,
    ScoreComponent, ScoringWeights,
};
pub use sizing::{size_system, SizedSystem, SizingCalculator, SizingOutcome};
pub use tables::{
    CreditScoreBracket, EngineAssumptions, FederalCreditYear, RateTableError, RateTables,
    StateTaxCredit, US_STATE_CODES,
};
