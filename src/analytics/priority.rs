//! Reskilling priority scoring.
//!
//! A fixed-weight linear combination of automation risk, capped headcount,
//! and historical certification success, ranked and truncated to the roles
//! worth immediate investment.

use std::collections::HashMap;

use serde::Serialize;

use crate::analytics::desc_f64;
use crate::model::{EmployeeProfile, JobRisk, ReskillCase};

pub const RISK_WEIGHT: f64 = 0.5;
pub const HEADCOUNT_WEIGHT: f64 = 0.3;
pub const SUCCESS_WEIGHT: f64 = 0.2;

const BASE_COST: f64 = 2500.0;
const RISK_COST_FACTOR: f64 = 0.5;

#[derive(Debug, Clone, Serialize)]
pub struct RolePriority {
    pub job_title: String,
    pub occupation_code: String,
    pub risk_score: f64,
    pub employee_count: u64,
    pub reskill_cost: f64,
    pub success_rate: f64,
    pub priority_score: f64,
}

#[derive(Debug, Clone)]
pub struct PriorityParams {
    /// Occupations below this headcount are noise and never ranked.
    pub min_headcount: u64,
    /// Assumed success rate for occupations with no training history.
    pub default_success_rate: f64,
    pub top_n: usize,
}

impl Default for PriorityParams {
    fn default() -> Self {
        Self {
            min_headcount: 5,
            default_success_rate: 70.0,
            top_n: 7,
        }
    }
}

/// Estimated per-employee reskilling cost for a role at the given risk.
pub fn reskill_cost(risk_pct: f64) -> f64 {
    (BASE_COST + BASE_COST * (risk_pct / 100.0) * RISK_COST_FACTOR).round()
}

// Headcount contributes on the same 0-100 scale as the other two terms.
fn headcount_score(count: u64) -> f64 {
    (count as f64).min(100.0)
}

pub fn priority_score(risk_pct: f64, employee_count: u64, success_rate: f64) -> f64 {
    (RISK_WEIGHT * risk_pct
        + HEADCOUNT_WEIGHT * headcount_score(employee_count)
        + SUCCESS_WEIGHT * success_rate)
        .round()
}

/// Rank occupations for reskilling investment.
///
/// Joins are linear scans: occupation code -> employees, employee -> cases,
/// occupation code -> historical success rate (default when no history).
pub fn prioritize(
    job_risk: &[JobRisk],
    profiles: &[EmployeeProfile],
    cases: &[ReskillCase],
    params: &PriorityParams,
) -> Vec<RolePriority> {
    let mut employees_by_code: HashMap<&str, Vec<i64>> = HashMap::new();
    for profile in profiles {
        if let Some(code) = profile.occupation_code.as_deref() {
            employees_by_code.entry(code).or_default().push(profile.employee_id);
        }
    }

    let mut cases_by_employee: HashMap<i64, Vec<&ReskillCase>> = HashMap::new();
    for case in cases {
        cases_by_employee.entry(case.employee_id).or_default().push(case);
    }

    let mut ranked: Vec<RolePriority> = Vec::new();
    for role in job_risk {
        let Some(code) = role.occupation_code.as_deref() else { continue };
        let employees = employees_by_code.get(code).map(Vec::as_slice).unwrap_or(&[]);
        let employee_count = employees.len() as u64;
        if employee_count < params.min_headcount {
            continue;
        }

        let mut total = 0u64;
        let mut certified = 0u64;
        for employee in employees {
            for case in cases_by_employee.get(employee).map(Vec::as_slice).unwrap_or(&[]) {
                total += 1;
                if case.is_certified() {
                    certified += 1;
                }
            }
        }
        let success_rate = if total == 0 {
            params.default_success_rate
        } else {
            (certified as f64 / total as f64 * 100.0).round()
        };

        let risk_score = role.risk_pct();
        ranked.push(RolePriority {
            job_title: role.title().to_string(),
            occupation_code: code.to_string(),
            risk_score,
            employee_count,
            reskill_cost: reskill_cost(risk_score),
            success_rate,
            priority_score: priority_score(risk_score, employee_count, success_rate),
        });
    }

    ranked.sort_by(|a, b| {
        desc_f64(a.priority_score, b.priority_score)
            .then_with(|| desc_f64(a.risk_score, b.risk_score))
            .then_with(|| a.job_title.cmp(&b.job_title))
    });
    ranked.truncate(params.top_n);
    ranked
}
