//! Automation-risk aggregations over occupations and headcounts.

use std::collections::HashMap;

use serde::Serialize;

use crate::analytics::classify::{department, Department};
use crate::analytics::desc_f64;
use crate::model::{EmployeeProfile, Occupation};

pub const HIGH_RISK_PCT: f64 = 75.0;

#[derive(Debug, Clone, Serialize)]
pub struct RoleRisk {
    pub role: String,
    pub risk_pct: f64,
    pub employees: u64,
    pub tier: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskBucket {
    pub label: &'static str,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DepartmentRisk {
    pub department: &'static str,
    pub high_risk: u64,
    pub total: u64,
    pub risk_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskSummary {
    pub high_risk_roles: u64,
    pub employees_at_risk: u64,
    pub average_risk: f64,
}

/// Employees per occupation id. Profiles reference occupations by code,
/// which matches the occupation id in the canonical schema.
pub fn headcount_by_occupation(profiles: &[EmployeeProfile]) -> HashMap<&str, u64> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for profile in profiles {
        if let Some(code) = profile.occupation_code.as_deref() {
            *counts.entry(code).or_insert(0) += 1;
        }
    }
    counts
}

/// Highest-risk roles with headcounts, tiered by rank: the top 3 are
/// Critical, the next 3 High, the rest Medium. Occupations without a
/// parseable probability are skipped.
pub fn top_risk_roles(
    occupations: &[Occupation],
    profiles: &[EmployeeProfile],
    n: usize,
) -> Vec<RoleRisk> {
    let headcounts = headcount_by_occupation(profiles);
    let mut roles: Vec<(f64, &Occupation)> = occupations
        .iter()
        .filter_map(|o| o.risk_pct().map(|r| (r, o)))
        .collect();
    roles.sort_by(|a, b| desc_f64(a.0, b.0).then_with(|| a.1.name().cmp(b.1.name())));

    roles
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(rank, (risk_pct, occ))| RoleRisk {
            role: occ.name().to_string(),
            risk_pct,
            employees: headcounts.get(occ.occupation_id.as_str()).copied().unwrap_or(0),
            tier: match rank {
                0..=2 => "Critical",
                3..=5 => "High",
                _ => "Medium",
            },
        })
        .collect()
}

const BUCKETS: [(&str, f64); 5] = [
    ("Very High Risk (>90%)", 90.0),
    ("High Risk (75-90%)", 75.0),
    ("Medium Risk (50-75%)", 50.0),
    ("Low Risk (25-50%)", 25.0),
    ("Very Low Risk (<25%)", 0.0),
];

/// Five-bucket distribution of automation risk. Counts employees where
/// profiles exist; with no profiles at all it counts roles so the view
/// still renders something meaningful.
pub fn risk_distribution(
    occupations: &[Occupation],
    profiles: &[EmployeeProfile],
) -> Vec<RiskBucket> {
    let headcounts = headcount_by_occupation(profiles);
    let weigh_roles = headcounts.is_empty();

    let mut counts = [0u64; BUCKETS.len()];
    for occ in occupations {
        let Some(risk) = occ.risk_pct() else { continue };
        let slot = BUCKETS
            .iter()
            .position(|(_, floor)| risk > *floor)
            .unwrap_or(BUCKETS.len() - 1);
        let weight = if weigh_roles {
            1
        } else {
            headcounts.get(occ.occupation_id.as_str()).copied().unwrap_or(0)
        };
        counts[slot] += weight;
    }

    BUCKETS
        .iter()
        .zip(counts)
        .map(|(&(label, _), count)| RiskBucket { label, count })
        .collect()
}

/// High-risk share per department, classified from occupation names.
/// Departments with nothing classified into them are omitted; output is
/// sorted descending by the high-risk percentage.
pub fn department_risk(
    occupations: &[Occupation],
    profiles: &[EmployeeProfile],
) -> Vec<DepartmentRisk> {
    let headcounts = headcount_by_occupation(profiles);
    let weigh_roles = headcounts.is_empty();

    let mut per_dept: HashMap<Department, (u64, u64)> = HashMap::new();
    for occ in occupations {
        let Some(risk) = occ.risk_pct() else { continue };
        let weight = if weigh_roles {
            1
        } else {
            headcounts.get(occ.occupation_id.as_str()).copied().unwrap_or(0)
        };
        if weight == 0 {
            continue;
        }
        let entry = per_dept.entry(department(occ.name())).or_insert((0, 0));
        entry.1 += weight;
        if risk > HIGH_RISK_PCT {
            entry.0 += weight;
        }
    }

    let mut out: Vec<DepartmentRisk> = Department::ALL
        .iter()
        .filter_map(|dept| {
            per_dept.get(dept).map(|(high, total)| DepartmentRisk {
                department: dept.as_str(),
                high_risk: *high,
                total: *total,
                risk_pct: (*high as f64 / *total as f64 * 100.0).round(),
            })
        })
        .collect();
    out.sort_by(|a, b| desc_f64(a.risk_pct, b.risk_pct));
    out
}

pub fn summarize(occupations: &[Occupation], profiles: &[EmployeeProfile]) -> RiskSummary {
    let headcounts = headcount_by_occupation(profiles);
    let mut high_risk_roles = 0u64;
    let mut employees_at_risk = 0u64;
    let mut risk_sum = 0.0;
    let mut scored = 0u64;

    for occ in occupations {
        let Some(risk) = occ.risk_pct() else { continue };
        scored += 1;
        risk_sum += risk;
        if risk > HIGH_RISK_PCT {
            high_risk_roles += 1;
            employees_at_risk += headcounts.get(occ.occupation_id.as_str()).copied().unwrap_or(0);
        }
    }

    RiskSummary {
        high_risk_roles,
        employees_at_risk,
        average_risk: if scored == 0 { 0.0 } else { (risk_sum / scored as f64).round() },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occ(id: &str, name: &str, prob: &str) -> Occupation {
        Occupation {
            occupation_id: id.to_string(),
            occupation_name: Some(name.to_string()),
            automation_probability: Some(prob.to_string()),
        }
    }

    fn profile(id: i64, code: &str) -> EmployeeProfile {
        EmployeeProfile {
            employee_id: id,
            occupation_code: Some(code.to_string()),
        }
    }

    #[test]
    fn test_top_roles_tiering() {
        let occupations: Vec<Occupation> = (0..8)
            .map(|i| occ(&format!("id-{}", i), &format!("Role {}", i), &format!("0.{}", 90 - i)))
            .collect();
        let out = top_risk_roles(&occupations, &[], 8);
        assert_eq!(out.len(), 8);
        assert_eq!(out[0].tier, "Critical");
        assert_eq!(out[3].tier, "High");
        assert_eq!(out[7].tier, "Medium");
        for w in out.windows(2) {
            assert!(w[0].risk_pct >= w[1].risk_pct);
        }
    }

    #[test]
    fn test_distribution_weighs_employees() {
        let occupations = vec![occ("a", "File Clerk", "0.95"), occ("b", "Designer", "0.10")];
        let profiles: Vec<EmployeeProfile> = (0..3)
            .map(|i| profile(i, "a"))
            .chain((3..5).map(|i| profile(i, "b")))
            .collect();
        let buckets = risk_distribution(&occupations, &profiles);
        assert_eq!(buckets[0].count, 3); // very high
        assert_eq!(buckets[4].count, 2); // very low
    }

    #[test]
    fn test_distribution_falls_back_to_roles() {
        let occupations = vec![occ("a", "File Clerk", "0.95"), occ("b", "Designer", "0.10")];
        let buckets = risk_distribution(&occupations, &[]);
        assert_eq!(buckets[0].count, 1);
        assert_eq!(buckets[4].count, 1);
    }

    #[test]
    fn test_department_risk_percentages() {
        let occupations = vec![
            occ("a", "Accounting Clerk", "0.85"),
            occ("b", "Payroll Specialist", "0.40"),
            occ("c", "Software Engineer", "0.05"),
        ];
        // Administration wins "clerk" before Finance sees "account".
        let out = department_risk(&occupations, &[]);
        let admin = out.iter().find(|d| d.department == "Administration").unwrap();
        assert_eq!(admin.high_risk, 1);
        assert_eq!(admin.total, 1);
        let finance = out.iter().find(|d| d.department == "Finance").unwrap();
        assert_eq!(finance.risk_pct, 0.0);
    }

    #[test]
    fn test_summary_counts() {
        let occupations = vec![
            occ("a", "File Clerk", "0.95"),
            occ("b", "Receptionist", "0.80"),
            occ("c", "Designer", "0.20"),
        ];
        let profiles = vec![profile(1, "a"), profile(2, "a"), profile(3, "c")];
        let s = summarize(&occupations, &profiles);
        assert_eq!(s.high_risk_roles, 2);
        assert_eq!(s.employees_at_risk, 2);
        assert_eq!(s.average_risk, 65.0);
    }
}
