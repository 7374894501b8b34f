use serde::{Deserialize, Serialize};
use tracing::debug;

use super::design::{DesignRequest, SystemDesignOption, SystemDesignOptionGenerator};
use super::domain::{
    round_to, CalculationInput, Confidence, EnvironmentalImpact, SolarCalculationResult,
};
use super::eligibility::{EligibilityRules, FinancingEligibility};
use super::financing::{CashFlowYear, FinancingEngine, FinancingRequest, SavingsProjection};
use super::incentives::{IncentiveImpact, TaxCreditResolver, TaxCreditResult};
use super::scoring::{LeadPreferences, LeadScore, LeadScorer};
use super::sizing::SizingCalculator;
use super::tables::{EngineAssumptions, RateTables};

/// Wizard request for an on-screen quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    #[serde(flatten)]
    pub input: CalculationInput,
    /// Selects the credit-adjusted loan APR when present.
    #[serde(default)]
    pub credit_score: Option<u16>,
    #[serde(default)]
    pub confidence: Confidence,
}

/// Document-generator request for a full proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalRequest {
    #[serde(flatten)]
    pub quote: QuoteRequest,
    pub year: i32,
    #[serde(default)]
    pub preferences: LeadPreferences,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    pub calculation: SolarCalculationResult,
    pub eligibility: Option<FinancingEligibility>,
    pub tax_credits: TaxCreditResult,
    pub incentive_impact: IncentiveImpact,
    pub design_tiers: [SystemDesignOption; 3],
    pub lead_score: LeadScore,
    pub cash_flow: Vec<CashFlowYear>,
}

/// Composes sizing, financing, eligibility, incentives, and scoring over one rate table set.
pub struct SolarCalculator<'a> {
    tables: &'a RateTables,
    scorer: LeadScorer,
}

impl<'a> SolarCalculator<'a> {
    pub fn new(tables: &'a RateTables) -> Self {
        Self {
            tables,
            scorer: LeadScorer::default(),
        }
    }

    pub fn with_scorer(tables: &'a RateTables, scorer: LeadScorer) -> Self {
        Self { tables, scorer }
    }

    pub fn calculate(&self, request: &QuoteRequest) -> SolarCalculationResult {
        self.calculate_with_projection(request).0
    }

    pub fn proposal(&self, request: &ProposalRequest) -> Proposal {
        let quote = &request.quote;
        let (calculation, projection, annual_consumption_kwh) =
            self.calculate_with_projection(quote);

        let eligibility = quote
            .credit_score
            .map(|score| EligibilityRules::new(self.tables).evaluate(&quote.input.state, score));

        let resolver = TaxCreditResolver::new(self.tables);
        let tax_credits = resolver.resolve(
            calculation.total_system_cost,
            &quote.input.state,
            request.year,
        );
        let incentive_impact = resolver.impact(&tax_credits, &projection);

        let design_tiers = SystemDesignOptionGenerator::new(self.tables).generate(&DesignRequest {
            annual_consumption_kwh,
            sun_factor: quote.input.sun_exposure.multiplier(),
            state: quote.input.state.clone(),
            roof_area_sqft: Some(quote.input.roof_square_feet),
            year: request.year,
            utility_rate: Some(calculation.utility_rate),
            include_battery: quote.input.wants_battery,
        });

        let mut preferences = request.preferences.clone();
        preferences.wants_battery |= quote.input.wants_battery;
        let lead_score = self.scorer.score(
            calculation.system_size_kw,
            &calculation.financing,
            eligibility.as_ref(),
            &preferences,
        );

        let cash_flow = projection.cash_flow(
            tax_credits.net_system_cost,
            self.tables.assumptions.analysis_years,
        );

        debug!(
            system_size_kw = calculation.system_size_kw,
            lead_score = lead_score.total,
            "assembled proposal"
        );

        Proposal {
            calculation,
            eligibility,
            tax_credits,
            incentive_impact,
            design_tiers,
            lead_score,
            cash_flow,
        }
    }

    fn calculate_with_projection(
        &self,
        request: &QuoteRequest,
    ) -> (SolarCalculationResult, SavingsProjection, f64) {
        let assumptions = &self.tables.assumptions;
        let sizing = SizingCalculator::new(self.tables).size(&request.input);
        let system_size_kw = sizing.system_size_kw();

        let production = SizingCalculator::new(self.tables)
            .annual_production(system_size_kw, sizing.sun_multiplier);
        let estimated_annual_production = round_to(production, 0);
        let estimated_monthly_production = round_to(estimated_annual_production / 12.0, 2);

        let loan_apr = match request.credit_score {
            Some(score) => EligibilityRules::new(self.tables).calculate_apr(score),
            None => self.tables.base_apr,
        };

        let engine = FinancingEngine::new(self.tables);
        let financing_request = FinancingRequest {
            system_size_kw,
            annual_production: estimated_annual_production,
            utility_rate: sizing.utility_rate,
            include_battery: request.input.wants_battery,
            loan_apr,
        };
        let financing = engine.options_for(&financing_request);
        let projection = engine.projection(estimated_annual_production, sizing.utility_rate);

        let result = SolarCalculationResult {
            system_size_kw,
            estimated_annual_production,
            estimated_monthly_production,
            total_system_cost: engine.system_cost(system_size_kw, request.input.wants_battery),
            utility_rate: sizing.utility_rate,
            financing,
            environmental: environmental_impact(&projection, assumptions),
            confidence: request.confidence,
        };

        (result, projection, sizing.annual_consumption_kwh)
    }
}

fn environmental_impact(
    projection: &SavingsProjection,
    assumptions: &EngineAssumptions,
) -> EnvironmentalImpact {
    let annual_lbs = projection.production_for_year(1) * assumptions.co2_lbs_per_kwh;
    let lifetime_kwh: f64 = (1..=assumptions.analysis_years)
        .map(|year| projection.production_for_year(year))
        .sum();

    EnvironmentalImpact {
        annual_co2_offset_lbs: round_to(annual_lbs, 0),
        lifetime_co2_offset_tons: round_to(lifetime_kwh * assumptions.co2_lbs_per_kwh / 2_000.0, 1),
        equivalent_trees_planted: round_to(annual_lbs / assumptions.co2_lbs_per_tree, 0),
        equivalent_car_miles_avoided: round_to(annual_lbs / assumptions.co2_lbs_per_car_mile, 0),
    }
}
