use crate::infra::{
    check_credit_score, current_year, non_negative_amount, parse_state, parse_sun_exposure,
};
use clap::Args;
use serde::Serialize;
use solar_economics::config::AppConfig;
use solar_economics::economics::{
    CalculationInput, Confidence, DesignRequest, EligibilityRules, LeadPreferences,
    ProposalRequest, QuoteRequest, RateTables, SolarCalculator, SunExposure,
    SystemDesignOptionGenerator, TaxCreditResolver, UsageSignal,
};
use solar_economics::error::AppError;

fn parse_credit_score(raw: &str) -> Result<u16, String> {
    let score: u16 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{raw}' is not a whole-number credit score"))?;
    check_credit_score(score)
}

fn parse_amount(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{raw}' is not a number"))?;
    non_negative_amount("amount", value)
}

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    /// Two-letter state code
    #[arg(long, value_parser = parse_state)]
    pub(crate) state: String,
    /// Metered monthly consumption in kWh (preferred over the bill)
    #[arg(long, value_parser = parse_amount)]
    pub(crate) monthly_kwh: Option<f64>,
    /// Monthly utility bill in USD
    #[arg(long, value_parser = parse_amount)]
    pub(crate) monthly_bill: Option<f64>,
    /// Roof area in square feet
    #[arg(long, default_value_t = 1_500.0, value_parser = parse_amount)]
    pub(crate) roof_sqft: f64,
    /// Sun exposure: poor, fair, good, excellent, or unknown
    #[arg(long, default_value = "good", value_parser = parse_sun_exposure)]
    pub(crate) sun_exposure: SunExposure,
    /// Per-kWh utility rate; the rate table default applies when omitted
    #[arg(long, value_parser = parse_amount)]
    pub(crate) utility_rate: Option<f64>,
    /// Include battery storage in the system cost
    #[arg(long)]
    pub(crate) battery: bool,
    /// Credit score used for the loan APR and eligibility
    #[arg(long, value_parser = parse_credit_score)]
    pub(crate) credit_score: Option<u16>,
    /// Emit the full proposal instead of the quote
    #[arg(long)]
    pub(crate) proposal: bool,
    /// Tax year for the proposal (defaults to the current year)
    #[arg(long)]
    pub(crate) year: Option<i32>,
}

#[derive(Args, Debug)]
pub(crate) struct EligibilityArgs {
    /// Two-letter state code
    #[arg(long, value_parser = parse_state)]
    pub(crate) state: String,
    /// Credit score between 300 and 850
    #[arg(long, value_parser = parse_credit_score)]
    pub(crate) credit_score: u16,
}

#[derive(Args, Debug)]
pub(crate) struct TaxCreditArgs {
    /// Two-letter state code
    #[arg(long, value_parser = parse_state)]
    pub(crate) state: String,
    /// Gross system cost in USD
    #[arg(long, value_parser = parse_amount)]
    pub(crate) system_cost: f64,
    /// Tax year (defaults to the current year)
    #[arg(long)]
    pub(crate) year: Option<i32>,
}

#[derive(Args, Debug)]
pub(crate) struct TiersArgs {
    /// Two-letter state code
    #[arg(long, value_parser = parse_state)]
    pub(crate) state: String,
    /// Annual household consumption in kWh
    #[arg(long, value_parser = parse_amount)]
    pub(crate) annual_kwh: f64,
    /// Sun exposure: poor, fair, good, excellent, or unknown
    #[arg(long, default_value = "good", value_parser = parse_sun_exposure)]
    pub(crate) sun_exposure: SunExposure,
    /// Roof area in square feet; unconstrained when omitted
    #[arg(long, value_parser = parse_amount)]
    pub(crate) roof_sqft: Option<f64>,
    /// Tax year (defaults to the current year)
    #[arg(long)]
    pub(crate) year: Option<i32>,
}

pub(crate) fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let tables = load_tables()?;
    let calculator = SolarCalculator::new(&tables);

    let quote = QuoteRequest {
        input: CalculationInput {
            usage: UsageSignal::from_parts(args.monthly_kwh, args.monthly_bill),
            roof_square_feet: args.roof_sqft,
            sun_exposure: args.sun_exposure,
            state: args.state,
            wants_battery: args.battery,
            utility_rate: args.utility_rate,
        },
        credit_score: args.credit_score,
        confidence: Confidence::Preliminary,
    };

    if args.proposal {
        let request = ProposalRequest {
            quote,
            year: args.year.unwrap_or_else(current_year),
            preferences: LeadPreferences {
                wants_battery: args.battery,
                ..LeadPreferences::default()
            },
        };
        print_json(&calculator.proposal(&request))
    } else {
        print_json(&calculator.calculate(&quote))
    }
}

pub(crate) fn run_eligibility(args: EligibilityArgs) -> Result<(), AppError> {
    let tables = load_tables()?;
    print_json(&EligibilityRules::new(&tables).evaluate(&args.state, args.credit_score))
}

pub(crate) fn run_tax_credits(args: TaxCreditArgs) -> Result<(), AppError> {
    let tables = load_tables()?;
    let year = args.year.unwrap_or_else(current_year);
    print_json(&TaxCreditResolver::new(&tables).resolve(args.system_cost, &args.state, year))
}

pub(crate) fn run_tiers(args: TiersArgs) -> Result<(), AppError> {
    let tables = load_tables()?;
    let tiers = SystemDesignOptionGenerator::new(&tables).generate(&DesignRequest {
        annual_consumption_kwh: args.annual_kwh,
        sun_factor: args.sun_exposure.multiplier(),
        state: args.state,
        roof_area_sqft: args.roof_sqft,
        year: args.year.unwrap_or_else(current_year),
        utility_rate: None,
        include_battery: false,
    });
    print_json(&tiers)
}

fn load_tables() -> Result<RateTables, AppError> {
    let config = AppConfig::load()?;
    Ok(config.engine.load_tables()?)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
