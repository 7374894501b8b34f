use chrono::{Datelike, Local};
use metrics_exporter_prometheus::PrometheusHandle;
use solar_economics::economics::{RateTables, SunExposure};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub(crate) const MIN_CREDIT_SCORE: u16 = 300;
pub(crate) const MAX_CREDIT_SCORE: u16 = 850;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) tables: Arc<RateTables>,
}

/// Calendar year used when a request does not pin one.
pub(crate) fn current_year() -> i32 {
    Local::now().year()
}

/// Two-letter postal code, trimmed and upper-cased.
pub(crate) fn parse_state(raw: &str) -> Result<String, String> {
    let code = raw.trim().to_ascii_uppercase();
    if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code)
    } else {
        Err(format!("'{raw}' is not a two-letter state code"))
    }
}

pub(crate) fn check_credit_score(score: u16) -> Result<u16, String> {
    if (MIN_CREDIT_SCORE..=MAX_CREDIT_SCORE).contains(&score) {
        Ok(score)
    } else {
        Err(format!(
            "credit score {score} is outside {MIN_CREDIT_SCORE}-{MAX_CREDIT_SCORE}"
        ))
    }
}

pub(crate) fn parse_sun_exposure(raw: &str) -> Result<SunExposure, String> {
    match SunExposure::parse(raw) {
        SunExposure::Unknown if !raw.trim().eq_ignore_ascii_case("unknown") => Err(format!(
            "'{raw}' is not one of poor, fair, good, excellent, unknown"
        )),
        exposure => Ok(exposure),
    }
}

pub(crate) fn non_negative_amount(field: &str, value: f64) -> Result<f64, String> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("{field} must be a non-negative number"))
    }
}
