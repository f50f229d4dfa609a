//! Training-budget aggregations and the budget-cut scenario.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::analytics::classify::{budget_category, BudgetCategory};
use crate::analytics::priority::reskill_cost;
use crate::analytics::{desc_f64, success};
use crate::model::{EmployeeProfile, JobRisk, ReskillCase};

/// Assumed risk for employees whose occupation is unknown.
const UNKNOWN_RISK_PCT: f64 = 50.0;

const SIGNIFICANT_EXPOSURE: f64 = 300_000.0;
const MODERATE_EXPOSURE: f64 = 150_000.0;

const PROJECTION_MONTHS: usize = 6;

/// Baseline failure modes of a funding cut, weighted at the reference 30%
/// reduction and rescaled for other cut sizes.
const OUTCOME_BASELINE: [(&str, f64); 5] = [
    ("Reduced Training Quality", 76.0),
    ("Slower Skill Acquisition", 82.0),
    ("Lower Completion Rates", 68.0),
    ("Decreased Job Readiness", 73.0),
    ("Higher Turnover", 64.0),
];
const REFERENCE_CUT: f64 = 0.30;

#[derive(Debug, Clone, Serialize)]
pub struct CategoryBudget {
    pub category: &'static str,
    pub current: f64,
    pub reduced: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgramImpact {
    pub program: String,
    pub priority: &'static str,
    pub impact: &'static str,
    pub employees: u64,
    pub exposure: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuccessProjection {
    pub month: String,
    pub success_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutcomeRisk {
    pub outcome: &'static str,
    pub risk: f64,
}

/// Per-case reskilling cost, priced off the employee's occupation risk.
fn cost_by_case<'a>(
    cases: &'a [ReskillCase],
    profiles: &[EmployeeProfile],
    job_risk: &[JobRisk],
) -> impl Iterator<Item = (&'a ReskillCase, f64)> + 'a {
    let mut code_by_employee: HashMap<i64, &str> = HashMap::new();
    for profile in profiles {
        if let Some(code) = profile.occupation_code.as_deref() {
            code_by_employee.insert(profile.employee_id, code);
        }
    }
    let mut risk_by_code: HashMap<&str, f64> = HashMap::new();
    for role in job_risk {
        if let Some(code) = role.occupation_code.as_deref() {
            risk_by_code.insert(code, role.risk_pct());
        }
    }

    let costs: Vec<f64> = cases
        .iter()
        .map(|case| {
            let risk = code_by_employee
                .get(&case.employee_id)
                .and_then(|code| risk_by_code.get(code))
                .copied()
                .unwrap_or(UNKNOWN_RISK_PCT);
            reskill_cost(risk)
        })
        .collect();
    cases.iter().zip(costs)
}

/// Current and reduced budget per category, descending by current spend.
/// Categories with no enrolled cases are omitted.
pub fn category_budgets(
    cases: &[ReskillCase],
    profiles: &[EmployeeProfile],
    job_risk: &[JobRisk],
    cut_pct: f64,
) -> Vec<CategoryBudget> {
    let mut per_category: HashMap<BudgetCategory, f64> = HashMap::new();
    for (case, cost) in cost_by_case(cases, profiles, job_risk) {
        *per_category.entry(budget_category(case.program())).or_insert(0.0) += cost;
    }

    let mut out: Vec<CategoryBudget> = BudgetCategory::ALL
        .iter()
        .filter_map(|category| {
            per_category.get(category).map(|current| CategoryBudget {
                category: category.as_str(),
                current: *current,
                reduced: (*current * (1.0 - cut_pct)).round(),
            })
        })
        .collect();
    out.sort_by(|a, b| desc_f64(a.current, b.current));
    out
}

pub fn total_budget(
    cases: &[ReskillCase],
    profiles: &[EmployeeProfile],
    job_risk: &[JobRisk],
) -> f64 {
    cost_by_case(cases, profiles, job_risk).map(|(_, cost)| cost).sum()
}

/// Programs ranked by cost exposure, with priority (from the program's own
/// success rate) and budget-impact labels.
pub fn impacted_programs(
    cases: &[ReskillCase],
    profiles: &[EmployeeProfile],
    job_risk: &[JobRisk],
) -> Vec<ProgramImpact> {
    let rates: HashMap<String, f64> = success::success_rate_by_program(cases)
        .into_iter()
        .map(|p| (p.program, p.success_rate))
        .collect();

    let mut exposure: HashMap<&str, f64> = HashMap::new();
    let mut enrolled: HashMap<&str, HashSet<i64>> = HashMap::new();
    for (case, cost) in cost_by_case(cases, profiles, job_risk) {
        *exposure.entry(case.program()).or_insert(0.0) += cost;
        enrolled.entry(case.program()).or_default().insert(case.employee_id);
    }

    let mut out: Vec<ProgramImpact> = exposure
        .into_iter()
        .map(|(program, exposure)| {
            let rate = rates.get(program).copied().unwrap_or(0.0);
            ProgramImpact {
                program: program.to_string(),
                priority: if rate >= 80.0 {
                    "High"
                } else if rate >= 70.0 {
                    "Medium"
                } else {
                    "Low"
                },
                impact: if exposure >= SIGNIFICANT_EXPOSURE {
                    "Significant"
                } else if exposure >= MODERATE_EXPOSURE {
                    "Moderate"
                } else {
                    "Minimal"
                },
                employees: enrolled.get(program).map(|e| e.len() as u64).unwrap_or(0),
                exposure,
            }
        })
        .collect();
    out.sort_by(|a, b| desc_f64(a.exposure, b.exposure).then_with(|| a.program.cmp(&b.program)));
    out
}

/// Projected overall success rate for the months after a cut: a straight
/// decline from today's rate to a floor of `rate * (1 - cut/2)`.
pub fn success_projection(current_rate: f64, cut_pct: f64) -> Vec<SuccessProjection> {
    let floor = current_rate * (1.0 - cut_pct / 2.0);
    let mut out = vec![SuccessProjection {
        month: "Current".to_string(),
        success_rate: current_rate.round(),
    }];
    for month in 1..=PROJECTION_MONTHS {
        let fraction = month as f64 / PROJECTION_MONTHS as f64;
        out.push(SuccessProjection {
            month: format!("Month {}", month),
            success_rate: (current_rate - (current_rate - floor) * fraction).round(),
        });
    }
    out
}

/// Outcome risks scaled to the cut size.
pub fn outcome_risks(cut_pct: f64) -> Vec<OutcomeRisk> {
    OUTCOME_BASELINE
        .iter()
        .map(|&(outcome, base)| OutcomeRisk {
            outcome,
            risk: (base * cut_pct / REFERENCE_CUT).round().clamp(0.0, 100.0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(id: i64, employee: i64, program: &str, certified: bool) -> ReskillCase {
        ReskillCase {
            case_id: id,
            employee_id: employee,
            training_program: Some(program.to_string()),
            certification_earned: Some(certified),
            start_date: None,
            completion_date: None,
        }
    }

    #[test]
    fn test_unknown_occupation_prices_at_midpoint() {
        // risk 50 -> 2500 + 2500*0.5*0.5 = 3125
        let total = total_budget(&[case(1, 1, "Digital Skills", false)], &[], &[]);
        assert_eq!(total, 3125.0);
    }

    #[test]
    fn test_category_budget_cut() {
        let cases = vec![
            case(1, 1, "Digital Skills Fundamentals", true),
            case(2, 2, "Digital Skills Fundamentals", false),
            case(3, 3, "Leadership Development", true),
        ];
        let out = category_budgets(&cases, &[], &[], 0.30);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].category, "Digital Skills");
        assert_eq!(out[0].current, 6250.0);
        assert_eq!(out[0].reduced, 4375.0);
    }

    #[test]
    fn test_projection_floor() {
        let proj = success_projection(73.0, 0.30);
        assert_eq!(proj.len(), 7);
        assert_eq!(proj[0].success_rate, 73.0);
        // floor = 73 * 0.85 = 62.05
        assert_eq!(proj.last().unwrap().success_rate, 62.0);
        for w in proj.windows(2) {
            assert!(w[0].success_rate >= w[1].success_rate);
        }
    }

    #[test]
    fn test_outcome_risks_scale_and_clamp() {
        let at_reference = outcome_risks(0.30);
        assert_eq!(at_reference[0].risk, 76.0);
        let harsh = outcome_risks(0.60);
        assert!(harsh.iter().all(|o| o.risk <= 100.0));
        assert_eq!(harsh[2].risk, 100.0);
    }

    #[test]
    fn test_impacted_programs_labels() {
        let mut cases = Vec::new();
        // 120 employees in one program at 3125 each -> 375k exposure, all certified
        for i in 0..120 {
            cases.push(case(i, i, "Cloud Computing Basics", true));
        }
        cases.push(case(1000, 1000, "Beekeeping", false));
        let out = impacted_programs(&cases, &[], &[]);
        assert_eq!(out[0].program, "Cloud Computing Basics");
        assert_eq!(out[0].impact, "Significant");
        assert_eq!(out[0].priority, "High");
        assert_eq!(out[0].employees, 120);
        assert_eq!(out[1].impact, "Minimal");
        assert_eq!(out[1].priority, "Low");
    }
}
