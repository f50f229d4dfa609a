//! Row types for the five canonical backend tables.
//!
//! The backend stores several numeric columns as text (automation probability,
//! event scores) and mixes 0-1 and 0-100 probability conventions between
//! tables, so parsing is tolerant: a bad value becomes `None` and is counted
//! by the quality report rather than rejecting the row.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Occupation {
    pub occupation_id: String,
    #[serde(default)]
    pub occupation_name: Option<String>,
    #[serde(rename = "Probability of automation", default)]
    pub automation_probability: Option<String>,
}

impl Occupation {
    pub fn name(&self) -> &str {
        self.occupation_name.as_deref().unwrap_or(&self.occupation_id)
    }

    /// Automation risk as a 0-100 percentage, if the stored text parses.
    pub fn risk_pct(&self) -> Option<f64> {
        self.automation_probability
            .as_deref()
            .and_then(parse_probability_pct)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReskillCase {
    pub case_id: i64,
    pub employee_id: i64,
    #[serde(default)]
    pub training_program: Option<String>,
    #[serde(default)]
    pub certification_earned: Option<bool>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub completion_date: Option<String>,
}

impl ReskillCase {
    pub fn is_certified(&self) -> bool {
        self.certification_earned.unwrap_or(false)
    }

    pub fn program(&self) -> &str {
        match self.training_program.as_deref() {
            Some(p) if !p.trim().is_empty() => p,
            _ => "Unspecified",
        }
    }

    pub fn started(&self) -> Option<NaiveDate> {
        self.start_date.as_deref().and_then(parse_date)
    }

    pub fn completed(&self) -> Option<NaiveDate> {
        self.completion_date.as_deref().and_then(parse_date)
    }

    pub fn duration_days(&self) -> Option<i64> {
        match (self.started(), self.completed()) {
            (Some(s), Some(c)) => Some((c - s).num_days()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReskillEvent {
    pub event_id: i64,
    #[serde(default)]
    pub case_id: Option<i64>,
    #[serde(default)]
    pub activity: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub actor: Option<String>,
    #[serde(default)]
    pub skill_category: Option<String>,
    #[serde(default)]
    pub score: Option<String>,
    #[serde(default)]
    pub completion_status: Option<String>,
}

impl ReskillEvent {
    pub fn score_value(&self) -> Option<f64> {
        self.score.as_deref().and_then(|s| s.trim().parse().ok())
    }

    pub fn is_completed(&self) -> bool {
        matches!(
            self.completion_status.as_deref().map(str::trim),
            Some(s) if s.eq_ignore_ascii_case("completed") || s.eq_ignore_ascii_case("complete")
        )
    }

    pub fn activity_label(&self) -> &str {
        match self.activity.as_deref() {
            Some(a) if !a.trim().is_empty() => a,
            _ => "Unspecified",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmployeeProfile {
    pub employee_id: i64,
    #[serde(default)]
    pub occupation_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JobRisk {
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub occupation_code: Option<String>,
    #[serde(default)]
    pub automation_probability: Option<f64>,
}

impl JobRisk {
    pub fn title(&self) -> &str {
        match (self.job_title.as_deref(), self.occupation_code.as_deref()) {
            (Some(t), _) if !t.trim().is_empty() => t,
            (_, Some(c)) => c,
            _ => "Unspecified",
        }
    }

    /// Risk as a 0-100 percentage. Missing probability reads as 0.
    pub fn risk_pct(&self) -> f64 {
        self.automation_probability
            .map(normalize_probability_pct)
            .unwrap_or(0.0)
    }
}

/// All fetched row sets for one refresh.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub occupations: Vec<Occupation>,
    pub cases: Vec<ReskillCase>,
    pub events: Vec<ReskillEvent>,
    pub profiles: Vec<EmployeeProfile>,
    pub job_risk: Vec<JobRisk>,
}

/// Parse a probability stored as text and return it as a 0-100 percentage.
/// Accepts both "87.3" and "0.873"; anything non-numeric is None.
pub fn parse_probability_pct(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some(normalize_probability_pct(value))
}

/// Values at or below 1.0 are fractions; everything else is already a percent.
pub fn normalize_probability_pct(value: f64) -> f64 {
    let pct = if value <= 1.0 { value * 100.0 } else { value };
    pct.clamp(0.0, 100.0)
}

/// Dates arrive as ISO text, sometimes with a time suffix; the leading
/// YYYY-MM-DD is all the aggregations need.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let head = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

/// "YYYY-MM" bucket for trend series.
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}
