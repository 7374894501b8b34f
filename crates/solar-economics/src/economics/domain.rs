use serde::{Deserialize, Serialize};
use std::fmt;

/// Household consumption signal captured by the intake wizard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum UsageSignal {
    /// Monthly consumption in kWh.
    Kwh(f64),
    /// Monthly utility bill in USD.
    Bill(f64),
}

impl UsageSignal {
    /// Collapse the wizard's optional fields into a single signal, preferring metered kWh.
    pub fn from_parts(monthly_kwh: Option<f64>, bill_amount: Option<f64>) -> Option<Self> {
        monthly_kwh
            .map(Self::Kwh)
            .or_else(|| bill_amount.map(Self::Bill))
    }
}

/// Qualitative sun exposure reported by the roof analysis provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum SunExposure {
    Poor,
    Fair,
    #[default]
    Good,
    Excellent,
    Unknown,
}

impl SunExposure {
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::Poor => 0.7,
            Self::Fair => 0.85,
            Self::Good => 1.0,
            Self::Excellent => 1.15,
            Self::Unknown => 1.0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Poor => "Poor",
            Self::Fair => "Fair",
            Self::Good => "Good",
            Self::Excellent => "Excellent",
            Self::Unknown => "Unknown",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "poor" => Self::Poor,
            "fair" => Self::Fair,
            "good" => Self::Good,
            "excellent" => Self::Excellent,
            _ => Self::Unknown,
        }
    }
}

impl From<String> for SunExposure {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

/// The four financing structures, in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinancingType {
    Cash,
    Loan,
    Lease,
    Ppa,
}

impl FinancingType {
    pub const fn ordered() -> [Self; 4] {
        [Self::Cash, Self::Loan, Self::Lease, Self::Ppa]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Cash => "Cash Purchase",
            Self::Loan => "Solar Loan",
            Self::Lease => "Solar Lease",
            Self::Ppa => "Power Purchase Agreement",
        }
    }
}

impl fmt::Display for FinancingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Provenance tag supplied by the caller; the engine never promotes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Mocked,
    #[default]
    Preliminary,
    Validated,
}

/// Normalized intake data handed to the engine by the schema-validation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationInput {
    #[serde(default)]
    pub usage: Option<UsageSignal>,
    pub roof_square_feet: f64,
    #[serde(default)]
    pub sun_exposure: SunExposure,
    pub state: String,
    #[serde(default)]
    pub wants_battery: bool,
    /// Per-kWh utility rate from the utility lookup; the table default applies when absent.
    #[serde(default)]
    pub utility_rate: Option<f64>,
}

/// Type-specific terms attached to each financing option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FinancingTerms {
    Cash {
        breakeven_years: Option<f64>,
        year_one_savings: f64,
    },
    Loan {
        apr: f64,
        term_years: u32,
        principal: f64,
    },
    Lease {
        term_years: u32,
        monthly_electricity_value: f64,
        capture_fraction: f64,
    },
    Ppa {
        rate_per_kwh: f64,
        escalator: f64,
        term_years: u32,
        grid_value: f64,
    },
}

/// One financing structure's money flows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingOption {
    #[serde(rename = "type")]
    pub kind: FinancingType,
    pub total_cost: f64,
    pub down_payment: f64,
    pub monthly_payment: f64,
    pub total_interest: f64,
    pub payoff_years: f64,
    pub roi: f64,
    /// Electricity value minus customer outlay over the option's horizon.
    pub lifetime_savings: f64,
    pub terms: FinancingTerms,
}

/// Avoided-emissions figures derived from the same production estimate as financing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalImpact {
    pub annual_co2_offset_lbs: f64,
    pub lifetime_co2_offset_tons: f64,
    pub equivalent_trees_planted: f64,
    pub equivalent_car_miles_avoided: f64,
}

/// Composite calculation rendered by the wizard and the proposal generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarCalculationResult {
    pub system_size_kw: f64,
    pub estimated_annual_production: f64,
    pub estimated_monthly_production: f64,
    pub total_system_cost: f64,
    pub utility_rate: f64,
    pub financing: [FinancingOption; 4],
    pub environmental: EnvironmentalImpact,
    pub confidence: Confidence,
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

pub(crate) fn round_currency(value: f64) -> f64 {
    round_to(value, 2)
}

/// Quotient that resolves to zero instead of NaN or infinity.
pub(crate) fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 && denominator.is_finite() && numerator.is_finite() {
        numerator / denominator
    } else {
        0.0
    }
}

pub(crate) fn normalize_state(state: &str) -> String {
    state.trim().to_ascii_uppercase()
}
