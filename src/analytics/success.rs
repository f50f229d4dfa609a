//! Certification success rates over reskilling cases.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::analytics::{desc_f64, pct};
use crate::model::{month_key, ReskillCase};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramSuccess {
    pub program: String,
    pub success_rate: f64,
    pub cases: u64,
    pub certified: u64,
}

/// Success rate by training program, sorted descending by rate (program name
/// breaks ties so output order is stable). An empty input is an empty output;
/// a program with no certifications is 0, never a division error.
pub fn success_rate_by_program(cases: &[ReskillCase]) -> Vec<ProgramSuccess> {
    let mut groups: HashMap<&str, (u64, u64)> = HashMap::new();
    for case in cases {
        let entry = groups.entry(case.program()).or_insert((0, 0));
        entry.0 += 1;
        if case.is_certified() {
            entry.1 += 1;
        }
    }

    let mut out: Vec<ProgramSuccess> = groups
        .into_iter()
        .map(|(program, (total, certified))| ProgramSuccess {
            program: program.to_string(),
            success_rate: pct(certified, total),
            cases: total,
            certified,
        })
        .collect();
    out.sort_by(|a, b| {
        desc_f64(a.success_rate, b.success_rate).then_with(|| a.program.cmp(&b.program))
    });
    out
}

/// Certification rate across all cases.
pub fn overall_success_rate(cases: &[ReskillCase]) -> f64 {
    let certified = cases.iter().filter(|c| c.is_certified()).count() as u64;
    pct(certified, cases.len() as u64)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySuccess {
    pub month: String,
    pub success_rate: f64,
    pub cases: u64,
}

/// Success rate bucketed by completion month, ascending by month. Cases
/// without a parseable completion date are left out of the trend.
pub fn monthly_success_trend(cases: &[ReskillCase]) -> Vec<MonthlySuccess> {
    let mut months: BTreeMap<String, (u64, u64)> = BTreeMap::new();
    for case in cases {
        let Some(date) = case.completed() else { continue };
        let entry = months.entry(month_key(date)).or_insert((0, 0));
        entry.0 += 1;
        if case.is_certified() {
            entry.1 += 1;
        }
    }
    months
        .into_iter()
        .map(|(month, (total, certified))| MonthlySuccess {
            month,
            success_rate: pct(certified, total),
            cases: total,
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct SuccessBand {
    pub band: &'static str,
    pub employees: u64,
    pub share: f64,
}

const BANDS: [(&str, f64); 4] = [
    ("Highly Successful", 80.0),
    ("Moderately Successful", 60.0),
    ("Slightly Successful", 40.0),
    ("Unsuccessful", 0.0),
];

/// Distribution of employees across success bands, where an employee's own
/// rate is the certified share of their cases.
pub fn success_distribution(cases: &[ReskillCase]) -> Vec<SuccessBand> {
    let mut per_employee: HashMap<i64, (u64, u64)> = HashMap::new();
    for case in cases {
        let entry = per_employee.entry(case.employee_id).or_insert((0, 0));
        entry.0 += 1;
        if case.is_certified() {
            entry.1 += 1;
        }
    }

    let total = per_employee.len() as u64;
    let mut counts = [0u64; BANDS.len()];
    for (total_cases, certified) in per_employee.values() {
        let rate = pct(*certified, *total_cases);
        let slot = BANDS
            .iter()
            .position(|(_, floor)| rate >= *floor)
            .unwrap_or(BANDS.len() - 1);
        counts[slot] += 1;
    }

    BANDS
        .iter()
        .zip(counts)
        .map(|(&(band, _), employees)| SuccessBand {
            band,
            employees,
            share: pct(employees, total),
        })
        .collect()
}
