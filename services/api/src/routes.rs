use crate::infra::{check_credit_score, current_year, non_negative_amount, parse_state, AppState};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use solar_economics::economics::{
    CashFlowYear, DesignRequest, EligibilityRules, FinancingEngine, ProposalRequest,
    QuoteRequest, RateTables, SizingCalculator, SolarCalculator, SunExposure,
    SystemDesignOptionGenerator, TaxCreditResolver, UsageSignal,
};
use std::sync::Arc;
use tracing::debug;

type Tables = State<Arc<RateTables>>;

#[derive(Debug, Deserialize)]
pub(crate) struct TaxCreditRequest {
    pub(crate) system_cost: f64,
    pub(crate) state: String,
    #[serde(default)]
    pub(crate) year: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DesignTiersRequest {
    pub(crate) annual_consumption_kwh: f64,
    #[serde(default)]
    pub(crate) sun_exposure: SunExposure,
    pub(crate) state: String,
    #[serde(default)]
    pub(crate) roof_area_sqft: Option<f64>,
    #[serde(default)]
    pub(crate) year: Option<i32>,
    #[serde(default)]
    pub(crate) utility_rate: Option<f64>,
    #[serde(default)]
    pub(crate) include_battery: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CashFlowRequest {
    pub(crate) annual_production: f64,
    #[serde(default)]
    pub(crate) utility_rate: Option<f64>,
    pub(crate) upfront_cost: f64,
    #[serde(default)]
    pub(crate) years: Option<u32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CashFlowResponse {
    pub(crate) utility_rate: f64,
    pub(crate) payback_years: Option<f64>,
    pub(crate) years: Vec<CashFlowYear>,
}

/// Calculation endpoints sharing one immutable rate table set.
pub(crate) fn engine_router(tables: Arc<RateTables>) -> Router {
    Router::new()
        .route("/api/v1/quotes", post(quote_handler))
        .route("/api/v1/proposals", post(proposal_handler))
        .route(
            "/api/v1/eligibility/:state/:credit_score",
            get(eligibility_handler),
        )
        .route("/api/v1/tax-credits", post(tax_credit_handler))
        .route("/api/v1/design-tiers", post(design_tier_handler))
        .route("/api/v1/cash-flow", post(cash_flow_handler))
        .with_state(tables)
}

pub(crate) fn with_engine_routes(tables: Arc<RateTables>) -> Router {
    engine_router(tables)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

fn unprocessable(message: String) -> Response {
    debug!(error = %message, "rejected request");
    let payload = json!({ "error": message });
    (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
}

fn optional_amount(field: &str, value: Option<f64>) -> Result<Option<f64>, String> {
    value.map(|amount| non_negative_amount(field, amount)).transpose()
}

fn validate_quote(request: &QuoteRequest) -> Result<(), String> {
    let input = &request.input;
    parse_state(&input.state)?;
    if let Some(score) = request.credit_score {
        check_credit_score(score)?;
    }
    if let Some(UsageSignal::Kwh(value) | UsageSignal::Bill(value)) = input.usage {
        non_negative_amount("usage.value", value)?;
    }
    non_negative_amount("roof_square_feet", input.roof_square_feet)?;
    optional_amount("utility_rate", input.utility_rate)?;
    Ok(())
}

fn validate_design_request(request: &DesignTiersRequest) -> Result<(String, f64), String> {
    let state = parse_state(&request.state)?;
    let consumption =
        non_negative_amount("annual_consumption_kwh", request.annual_consumption_kwh)?;
    optional_amount("roof_area_sqft", request.roof_area_sqft)?;
    optional_amount("utility_rate", request.utility_rate)?;
    Ok((state, consumption))
}

pub(crate) async fn quote_handler(
    State(tables): Tables,
    Json(request): Json<QuoteRequest>,
) -> Response {
    if let Err(message) = validate_quote(&request) {
        return unprocessable(message);
    }
    let result = SolarCalculator::new(&tables).calculate(&request);
    (StatusCode::OK, Json(result)).into_response()
}

pub(crate) async fn proposal_handler(
    State(tables): Tables,
    Json(request): Json<ProposalRequest>,
) -> Response {
    if let Err(message) = validate_quote(&request.quote) {
        return unprocessable(message);
    }
    let proposal = SolarCalculator::new(&tables).proposal(&request);
    (StatusCode::OK, Json(proposal)).into_response()
}

pub(crate) async fn eligibility_handler(
    State(tables): Tables,
    Path((state, credit_score)): Path<(String, u16)>,
) -> Response {
    let checked = parse_state(&state)
        .and_then(|state| check_credit_score(credit_score).map(|score| (state, score)));
    match checked {
        Ok((state, score)) => {
            let eligibility = EligibilityRules::new(&tables).evaluate(&state, score);
            (StatusCode::OK, Json(eligibility)).into_response()
        }
        Err(message) => unprocessable(message),
    }
}

pub(crate) async fn tax_credit_handler(
    State(tables): Tables,
    Json(request): Json<TaxCreditRequest>,
) -> Response {
    let checked = parse_state(&request.state).and_then(|state| {
        non_negative_amount("system_cost", request.system_cost).map(|cost| (state, cost))
    });
    match checked {
        Ok((state, cost)) => {
            let year = request.year.unwrap_or_else(current_year);
            let result = TaxCreditResolver::new(&tables).resolve(cost, &state, year);
            (StatusCode::OK, Json(result)).into_response()
        }
        Err(message) => unprocessable(message),
    }
}

pub(crate) async fn design_tier_handler(
    State(tables): Tables,
    Json(request): Json<DesignTiersRequest>,
) -> Response {
    let (state, annual_consumption_kwh) = match validate_design_request(&request) {
        Ok(values) => values,
        Err(message) => return unprocessable(message),
    };

    let tiers = SystemDesignOptionGenerator::new(&tables).generate(&DesignRequest {
        annual_consumption_kwh,
        sun_factor: request.sun_exposure.multiplier(),
        state,
        roof_area_sqft: request.roof_area_sqft,
        year: request.year.unwrap_or_else(current_year),
        utility_rate: request.utility_rate,
        include_battery: request.include_battery,
    });
    (StatusCode::OK, Json(tiers)).into_response()
}

pub(crate) async fn cash_flow_handler(
    State(tables): Tables,
    Json(request): Json<CashFlowRequest>,
) -> Response {
    let assumptions = &tables.assumptions;
    let years = request.years.unwrap_or(assumptions.analysis_years);
    if years == 0 || years > assumptions.max_payback_years {
        return unprocessable(format!(
            "years must be between 1 and {}",
            assumptions.max_payback_years
        ));
    }
    let amounts = non_negative_amount("annual_production", request.annual_production)
        .and_then(|production| {
            non_negative_amount("upfront_cost", request.upfront_cost).map(|cost| (production, cost))
        })
        .and_then(|amounts| {
            optional_amount("utility_rate", request.utility_rate).map(|_| amounts)
        });
    let (production, upfront_cost) = match amounts {
        Ok(values) => values,
        Err(message) => return unprocessable(message),
    };

    let utility_rate = SizingCalculator::new(&tables).utility_rate(request.utility_rate);
    let projection = FinancingEngine::new(&tables).projection(production, utility_rate);

    (
        StatusCode::OK,
        Json(CashFlowResponse {
            utility_rate,
            payback_years: projection.payback_years(upfront_cost, assumptions.max_payback_years),
            years: projection.cash_flow(upfront_cost, years),
        }),
    )
        .into_response()
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready", "rate_tables": state.tables.version })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
