use serde::{Deserialize, Serialize};

/// Point weights for the additive lead score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub baseline: i16,
    pub large_system_kw: f64,
    pub large_system: i16,
    pub mid_system_kw: f64,
    pub mid_system: i16,
    pub small_system_kw: f64,
    pub small_system: i16,
    pub minimal_system: i16,
    pub points_per_available_option: i16,
    pub timeline_immediate: i16,
    pub timeline_three_months: i16,
    pub timeline_six_months: i16,
    pub timeline_researching: i16,
    pub preference_available: i16,
    pub preference_open: i16,
    pub battery_interest: i16,
    pub strong_return_roi: f64,
    pub strong_return: i16,
    pub moderate_return_roi: f64,
    pub moderate_return: i16,
    pub positive_return: i16,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            baseline: 10,
            large_system_kw: 10.0,
            large_system: 25,
            mid_system_kw: 7.0,
            mid_system: 20,
            small_system_kw: 4.0,
            small_system: 12,
            minimal_system: 5,
            points_per_available_option: 5,
            timeline_immediate: 25,
            timeline_three_months: 18,
            timeline_six_months: 10,
            timeline_researching: 3,
            preference_available: 10,
            preference_open: 3,
            battery_interest: 5,
            strong_return_roi: 1.0,
            strong_return: 10,
            moderate_return_roi: 0.5,
            moderate_return: 6,
            positive_return: 3,
        }
    }
}
