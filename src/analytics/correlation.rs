//! Success-factor estimation.
//!
//! Each factor assigns cases to a high/low bucket by a fixed predicate over
//! the case's event trail, then reports the certification-rate gap between
//! buckets as a correlation proxy, clamped to a plausible range. Factors the
//! records cannot support (age has no source column) always report their
//! shipped default, so the whole estimator is deterministic.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::model::{ReskillCase, ReskillEvent};

pub const CORRELATION_CLAMP: f64 = 0.95;

/// Minimum cases per bucket before a derived gap beats the default.
const MIN_BUCKET: usize = 5;

/// Fast-completion cutoff for the experience proxy.
const FAST_COMPLETION_DAYS: i64 = 90;

#[derive(Debug, Clone, Serialize)]
pub struct FactorCorrelation {
    pub factor: &'static str,
    pub correlation: f64,
    /// False when the default coefficient was used instead of a derived gap.
    pub derived: bool,
    pub high_cases: u64,
    pub low_cases: u64,
}

/// One case with its joined events.
pub struct CaseJourney<'a> {
    pub case: &'a ReskillCase,
    pub events: Vec<&'a ReskillEvent>,
}

struct FactorSpec {
    name: &'static str,
    default: f64,
    predicate: Option<fn(&CaseJourney) -> bool>,
}

fn broad_skill_exposure(journey: &CaseJourney) -> bool {
    let categories: HashSet<&str> = journey
        .events
        .iter()
        .filter_map(|e| e.skill_category.as_deref())
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect();
    categories.len() >= 2
}

fn fast_completion(journey: &CaseJourney) -> bool {
    matches!(journey.case.duration_days(), Some(d) if (0..=FAST_COMPLETION_DAYS).contains(&d))
}

fn strong_technical_events(journey: &CaseJourney) -> bool {
    journey.events.iter().any(|e| {
        let category = e.skill_category.as_deref().unwrap_or("").to_lowercase();
        (category.contains("tech") || category.contains("digital"))
            && matches!(e.score_value(), Some(s) if s > 70.0)
    })
}

fn high_assessment_score(journey: &CaseJourney) -> bool {
    journey.events.iter().any(|e| {
        e.activity.as_deref().unwrap_or("").to_lowercase().contains("assess")
            && matches!(e.score_value(), Some(s) if s > 80.0)
    })
}

const FACTORS: [FactorSpec; 5] = [
    FactorSpec {
        name: "Prior Education Level",
        default: 0.72,
        predicate: Some(broad_skill_exposure),
    },
    FactorSpec {
        name: "Years of Experience",
        default: 0.58,
        predicate: Some(fast_completion),
    },
    // No age column exists anywhere in the records; this factor can only
    // report its shipped coefficient.
    FactorSpec {
        name: "Age",
        default: -0.31,
        predicate: None,
    },
    FactorSpec {
        name: "Prior Technical Skills",
        default: 0.65,
        predicate: Some(strong_technical_events),
    },
    FactorSpec {
        name: "Learning Motivation Score",
        default: 0.83,
        predicate: Some(high_assessment_score),
    },
];

/// Join cases to their events by case id.
pub fn build_journeys<'a>(
    cases: &'a [ReskillCase],
    events: &'a [ReskillEvent],
) -> Vec<CaseJourney<'a>> {
    let mut by_case: HashMap<i64, Vec<&ReskillEvent>> = HashMap::new();
    for event in events {
        if let Some(id) = event.case_id {
            by_case.entry(id).or_default().push(event);
        }
    }
    cases
        .iter()
        .map(|case| CaseJourney {
            case,
            events: by_case.remove(&case.case_id).unwrap_or_default(),
        })
        .collect()
}

fn certified_rate(journeys: &[&CaseJourney]) -> f64 {
    if journeys.is_empty() {
        return 0.0;
    }
    let certified = journeys.iter().filter(|j| j.case.is_certified()).count();
    certified as f64 / journeys.len() as f64 * 100.0
}

fn clamp(value: f64) -> f64 {
    value.clamp(-CORRELATION_CLAMP, CORRELATION_CLAMP)
}

/// Correlation proxy per factor, in the fixed factor order.
pub fn success_factors(cases: &[ReskillCase], events: &[ReskillEvent]) -> Vec<FactorCorrelation> {
    let journeys = build_journeys(cases, events);

    FACTORS
        .iter()
        .map(|spec| {
            let Some(predicate) = spec.predicate else {
                return FactorCorrelation {
                    factor: spec.name,
                    correlation: clamp(spec.default),
                    derived: false,
                    high_cases: 0,
                    low_cases: 0,
                };
            };

            let (high, low): (Vec<&CaseJourney>, Vec<&CaseJourney>) =
                journeys.iter().partition(|j| predicate(j));

            if high.len() < MIN_BUCKET || low.len() < MIN_BUCKET {
                return FactorCorrelation {
                    factor: spec.name,
                    correlation: clamp(spec.default),
                    derived: false,
                    high_cases: high.len() as u64,
                    low_cases: low.len() as u64,
                };
            }

            let gap = (certified_rate(&high) - certified_rate(&low)) / 100.0;
            FactorCorrelation {
                factor: spec.name,
                correlation: clamp((gap * 100.0).round() / 100.0),
                derived: true,
                high_cases: high.len() as u64,
                low_cases: low.len() as u64,
            }
        })
        .collect()
}
