use serde::{Deserialize, Serialize};

use super::domain::{ratio, round_currency, round_to};
use super::financing::FinancingEngine;
use super::incentives::TaxCreditResolver;
use super::sizing::{sanitize_multiplier, SizingCalculator};
use super::tables::RateTables;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesignTier {
    Conservative,
    Standard,
    Aggressive,
}

impl DesignTier {
    pub const fn ordered() -> [Self; 3] {
        [Self::Conservative, Self::Standard, Self::Aggressive]
    }

    /// Share of annual consumption the tier is sized to cover.
    pub const fn offset_target(self) -> f64 {
        match self {
            Self::Conservative => 0.6,
            Self::Standard => 0.8,
            Self::Aggressive => 1.0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Conservative => "Conservative",
            Self::Standard => "Standard",
            Self::Aggressive => "Aggressive",
        }
    }
}

/// Parameters for the three presentation tiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignRequest {
    pub annual_consumption_kwh: f64,
    pub sun_factor: f64,
    pub state: String,
    #[serde(default)]
    pub roof_area_sqft: Option<f64>,
    pub year: i32,
    #[serde(default)]
    pub utility_rate: Option<f64>,
    #[serde(default)]
    pub include_battery: bool,
}

/// One presentation card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemDesignOption {
    pub tier: DesignTier,
    pub label: String,
    pub offset_target: f64,
    pub system_size_kw: f64,
    pub panel_count: u32,
    pub annual_production: f64,
    pub offset_achieved: f64,
    pub total_cost: f64,
    /// `total_cost` less federal and state credits for the request year.
    pub net_cost: f64,
    /// Measured against `net_cost`.
    pub payback_years: Option<f64>,
    /// Measured against `net_cost`.
    pub roi_25_year: f64,
    /// Measured against `net_cost`.
    pub lifetime_savings: f64,
    /// Payback on `total_cost`, the basis of the cash financing option.
    pub gross_payback_years: Option<f64>,
    /// 25-year ROI on `total_cost`, the basis of the cash financing option.
    pub gross_roi_25_year: f64,
    pub roof_limited: bool,
}

pub struct SystemDesignOptionGenerator<'a> {
    tables: &'a RateTables,
}

impl<'a> SystemDesignOptionGenerator<'a> {
    pub fn new(tables: &'a RateTables) -> Self {
        Self { tables }
    }

    pub fn generate(&self, request: &DesignRequest) -> [SystemDesignOption; 3] {
        DesignTier::ordered().map(|tier| self.option_for(tier, request))
    }

    fn option_for(&self, tier: DesignTier, request: &DesignRequest) -> SystemDesignOption {
        let assumptions = &self.tables.assumptions;
        let sizing = SizingCalculator::new(self.tables);
        let financing = FinancingEngine::new(self.tables);
        let resolver = TaxCreditResolver::new(self.tables);

        let consumption = if request.annual_consumption_kwh.is_finite() {
            request.annual_consumption_kwh.max(0.0)
        } else {
            0.0
        };
        let sun_factor = sanitize_multiplier(request.sun_factor);
        let utility_rate = sizing.utility_rate(request.utility_rate);

        let sized = sizing.size_for_target(
            consumption * tier.offset_target(),
            sun_factor,
            request.roof_area_sqft,
        );
        let size = sized.system_size_kw;
        let production = round_to(sizing.annual_production(size, sun_factor), 0);

        let total_cost = financing.system_cost(size, request.include_battery);
        let credits = resolver.resolve(total_cost, &request.state, request.year);
        let net_cost = credits.net_system_cost;

        let projection = financing.projection(production, utility_rate);
        let lifetime = projection.cumulative_savings(assumptions.analysis_years);
        let payback_years = projection.payback_years(net_cost, assumptions.max_payback_years);
        let gross_payback_years =
            projection.payback_years(total_cost, assumptions.max_payback_years);

        SystemDesignOption {
            tier,
            label: tier.label().to_string(),
            offset_target: tier.offset_target(),
            system_size_kw: size,
            panel_count: (size * 1_000.0 / assumptions.panel_watts).ceil() as u32,
            annual_production: production,
            offset_achieved: round_to(ratio(production, consumption), 4),
            total_cost,
            net_cost,
            payback_years,
            roi_25_year: round_to(ratio(lifetime - net_cost, net_cost), 4),
            lifetime_savings: round_currency(lifetime - net_cost),
            gross_payback_years,
            gross_roi_25_year: round_to(ratio(lifetime - total_cost, total_cost), 4),
            roof_limited: sized.roof_limited,
        }
    }
}

pub fn design_tiers(
    tables: &RateTables,
    annual_consumption_kwh: f64,
    sun_factor: f64,
    state: &str,
    roof_area_sqft: Option<f64>,
    year: i32,
) -> [SystemDesignOption; 3] {
    SystemDesignOptionGenerator::new(tables).generate(&DesignRequest {
        annual_consumption_kwh,
        sun_factor,
        state: state.to_string(),
        roof_area_sqft,
        year,
        utility_rate: None,
        include_battery: false,
    })
}
