use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::domain::{round_to, CalculationInput, SunExposure, UsageSignal};
use super::tables::RateTables;

/// System size produced for a single production target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizedSystem {
    pub system_size_kw: f64,
    pub unconstrained_kw: f64,
    /// `None` when the roof area is unknown or unusable, i.e. unconstrained.
    pub roof_cap_kw: Option<f64>,
    pub roof_limited: bool,
}

/// Full sizing trail for a calculation input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingOutcome {
    pub monthly_kwh: f64,
    pub annual_consumption_kwh: f64,
    pub target_annual_production: f64,
    pub sun_multiplier: f64,
    pub utility_rate: f64,
    pub sized: SizedSystem,
}

impl SizingOutcome {
    pub fn system_size_kw(&self) -> f64 {
        self.sized.system_size_kw
    }
}

/// Derives a recommended system size from consumption, sun exposure, and roof area.
pub struct SizingCalculator<'a> {
    tables: &'a RateTables,
}

impl<'a> SizingCalculator<'a> {
    pub fn new(tables: &'a RateTables) -> Self {
        Self { tables }
    }

    /// Per-kWh rate to use, falling back to the table default for missing or unusable values.
    pub fn utility_rate(&self, supplied: Option<f64>) -> f64 {
        supplied
            .filter(|rate| rate.is_finite() && *rate > 0.0)
            .unwrap_or(self.tables.assumptions.default_utility_rate)
    }

    /// Monthly consumption: metered kWh, else bill ÷ rate, else the table default.
    pub fn monthly_kwh(&self, usage: Option<UsageSignal>, utility_rate: f64) -> f64 {
        let value = match usage {
            Some(UsageSignal::Kwh(kwh)) => kwh,
            Some(UsageSignal::Bill(amount)) => {
                if utility_rate > 0.0 {
                    amount / utility_rate
                } else {
                    0.0
                }
            }
            None => {
                warn!(
                    default_monthly_kwh = self.tables.assumptions.default_monthly_kwh,
                    "no usage signal supplied; using default consumption"
                );
                self.tables.assumptions.default_monthly_kwh
            }
        };

        if value.is_finite() && value > 0.0 {
            value
        } else {
            0.0
        }
    }

    pub fn roof_cap_kw(&self, roof_square_feet: f64) -> Option<f64> {
        if !roof_square_feet.is_finite() || roof_square_feet <= 0.0 {
            return None;
        }
        let assumptions = &self.tables.assumptions;
        let cap = roof_square_feet * assumptions.usable_roof_fraction / assumptions.roof_sqft_per_kw;
        (cap > 0.0).then_some(cap)
    }

    /// Size a system to produce `target_annual_kwh`, clamped to the roof ceiling.
    pub fn size_for_target(
        &self,
        target_annual_kwh: f64,
        sun_multiplier: f64,
        roof_square_feet: Option<f64>,
    ) -> SizedSystem {
        let assumptions = &self.tables.assumptions;
        let multiplier = sanitize_multiplier(sun_multiplier);

        let unconstrained_kw = if target_annual_kwh.is_finite() && target_annual_kwh > 0.0 {
            target_annual_kwh / multiplier / assumptions.production_per_kw
        } else {
            0.0
        };
        let floored = unconstrained_kw.max(assumptions.minimum_system_kw);

        let roof_cap_kw = roof_square_feet.and_then(|area| self.roof_cap_kw(area));
        let (size, roof_limited) = match roof_cap_kw {
            Some(cap) if floored > cap => (cap, true),
            _ => (floored, false),
        };

        let rounded = round_to(size, 2);
        SizedSystem {
            system_size_kw: if rounded > 0.0 { rounded } else { size },
            unconstrained_kw: round_to(unconstrained_kw, 2),
            roof_cap_kw: roof_cap_kw.map(|cap| round_to(cap, 2)),
            roof_limited,
        }
    }

    pub fn size(&self, input: &CalculationInput) -> SizingOutcome {
        let assumptions = &self.tables.assumptions;
        let utility_rate = self.utility_rate(input.utility_rate);
        let monthly_kwh = self.monthly_kwh(input.usage, utility_rate);
        let annual_consumption_kwh = monthly_kwh * 12.0;
        let target_annual_production = annual_consumption_kwh * assumptions.offset_fraction;

        if input.sun_exposure == SunExposure::Unknown {
            warn!("unrecognised sun exposure; using neutral multiplier");
        }
        let sun_multiplier = input.sun_exposure.multiplier();

        let sized = self.size_for_target(
            target_annual_production,
            sun_multiplier,
            Some(input.roof_square_feet),
        );

        debug!(
            monthly_kwh,
            target_annual_production,
            system_size_kw = sized.system_size_kw,
            roof_limited = sized.roof_limited,
            "sized system"
        );

        SizingOutcome {
            monthly_kwh,
            annual_consumption_kwh,
            target_annual_production,
            sun_multiplier,
            utility_rate,
            sized,
        }
    }

    /// Year-one production for an installed size at the given sun multiplier.
    pub fn annual_production(&self, system_size_kw: f64, sun_multiplier: f64) -> f64 {
        system_size_kw.max(0.0)
            * self.tables.assumptions.production_per_kw
            * sanitize_multiplier(sun_multiplier)
    }
}

/// Recommended system size in kW; always greater than zero.
pub fn size_system(tables: &RateTables, input: &CalculationInput) -> f64 {
    SizingCalculator::new(tables).size(input).system_size_kw()
}

pub(crate) fn sanitize_multiplier(multiplier: f64) -> f64 {
    if multiplier.is_finite() && multiplier > 0.0 {
        multiplier
    } else {
        1.0
    }
}
