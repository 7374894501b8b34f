use super::super::domain::{FinancingOption, FinancingType};
use super::super::eligibility::FinancingEligibility;
use super::config::ScoringWeights;
use super::{LeadFactor, LeadPreferences, PurchaseTimeline, ScoreComponent};

pub(crate) fn score_components(
    system_size_kw: f64,
    financing: &[FinancingOption],
    eligibility: Option<&FinancingEligibility>,
    preferences: &LeadPreferences,
    weights: &ScoringWeights,
) -> Vec<ScoreComponent> {
    let mut components = vec![ScoreComponent {
        factor: LeadFactor::Baseline,
        points: weights.baseline,
        notes: "completed intake".to_string(),
    }];

    components.push(size_component(system_size_kw, weights));

    let available: Vec<FinancingType> = match eligibility {
        Some(eligibility) => eligibility.available_options.iter().copied().collect(),
        None => vec![FinancingType::Cash],
    };
    components.push(ScoreComponent {
        factor: LeadFactor::FinancingBreadth,
        points: weights.points_per_available_option * available.len() as i16,
        notes: match eligibility {
            Some(eligibility) => format!(
                "{} of 4 financing options available in {}",
                available.len(),
                eligibility.state
            ),
            None => "credit score not provided; only cash purchase confirmed".to_string(),
        },
    });

    components.push(timeline_component(preferences.timeline, weights));

    components.push(match preferences.preferred_financing {
        Some(preferred) if available.contains(&preferred) => ScoreComponent {
            factor: LeadFactor::FinancingPreference,
            points: weights.preference_available,
            notes: format!("preferred {} is available", preferred.label()),
        },
        Some(preferred) => ScoreComponent {
            factor: LeadFactor::FinancingPreference,
            points: 0,
            notes: format!("preferred {} is not available", preferred.label()),
        },
        None => ScoreComponent {
            factor: LeadFactor::FinancingPreference,
            points: weights.preference_open,
            notes: "open to any financing structure".to_string(),
        },
    });

    if preferences.wants_battery {
        components.push(ScoreComponent {
            factor: LeadFactor::BatteryInterest,
            points: weights.battery_interest,
            notes: "interested in battery storage".to_string(),
        });
    }

    let best_return = financing
        .iter()
        .filter(|option| available.contains(&option.kind))
        .map(|option| option.roi)
        .filter(|roi| roi.is_finite())
        .fold(None, |best: Option<f64>, roi| {
            Some(best.map_or(roi, |current| current.max(roi)))
        });
    components.push(return_component(best_return, weights));

    components
}

fn size_component(system_size_kw: f64, weights: &ScoringWeights) -> ScoreComponent {
    let points = if system_size_kw >= weights.large_system_kw {
        weights.large_system
    } else if system_size_kw >= weights.mid_system_kw {
        weights.mid_system
    } else if system_size_kw >= weights.small_system_kw {
        weights.small_system
    } else {
        weights.minimal_system
    };

    ScoreComponent {
        factor: LeadFactor::SystemSize,
        points,
        notes: format!("{system_size_kw:.2} kW recommended system"),
    }
}

fn timeline_component(timeline: Option<PurchaseTimeline>, weights: &ScoringWeights) -> ScoreComponent {
    let (points, notes) = match timeline {
        Some(PurchaseTimeline::Immediately) => (weights.timeline_immediate, "ready to install now"),
        Some(PurchaseTimeline::WithinThreeMonths) => {
            (weights.timeline_three_months, "installing within three months")
        }
        Some(PurchaseTimeline::WithinSixMonths) => {
            (weights.timeline_six_months, "installing within six months")
        }
        Some(PurchaseTimeline::JustResearching) => {
            (weights.timeline_researching, "researching options")
        }
        None => (0, "timeline not provided"),
    };

    ScoreComponent {
        factor: LeadFactor::Timeline,
        points,
        notes: notes.to_string(),
    }
}

fn return_component(best_return: Option<f64>, weights: &ScoringWeights) -> ScoreComponent {
    let points = match best_return {
        Some(roi) if roi >= weights.strong_return_roi => weights.strong_return,
        Some(roi) if roi >= weights.moderate_return_roi => weights.moderate_return,
        Some(roi) if roi > 0.0 => weights.positive_return,
        _ => 0,
    };

    ScoreComponent {
        factor: LeadFactor::ProjectedReturn,
        points,
        notes: match best_return {
            Some(roi) => format!("best available return {:.0}%", roi * 100.0),
            None => "no projected return".to_string(),
        },
    }
}
