//! Training-program effectiveness aggregations.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::analytics::{desc_f64, pct};
use crate::model::{month_key, ReskillCase, ReskillEvent};

#[derive(Debug, Clone, Serialize)]
pub struct ProgramStats {
    pub program: String,
    pub cases: u64,
    pub completion_rate: f64,
    /// Mean event score mapped onto a 0-5 scale, one decimal.
    pub satisfaction: f64,
    pub success_rate: f64,
}

/// Per-program completion, satisfaction and certification rates, sorted
/// descending by success rate.
pub fn program_stats(cases: &[ReskillCase], events: &[ReskillEvent]) -> Vec<ProgramStats> {
    let mut program_by_case: HashMap<i64, &str> = HashMap::new();
    let mut acc: HashMap<&str, ProgramAcc> = HashMap::new();
    for case in cases {
        let program = case.program();
        program_by_case.insert(case.case_id, program);
        let entry = acc.entry(program).or_default();
        entry.cases += 1;
        if case.completed().is_some() {
            entry.completed += 1;
        }
        if case.is_certified() {
            entry.certified += 1;
        }
    }
    for event in events {
        let Some(case_id) = event.case_id else { continue };
        let Some(program) = program_by_case.get(&case_id).copied() else { continue };
        if let Some(score) = event.score_value() {
            let entry = acc.entry(program).or_default();
            entry.score_sum += score;
            entry.scored += 1;
        }
    }

    let mut out: Vec<ProgramStats> = acc
        .into_iter()
        .map(|(program, a)| ProgramStats {
            program: program.to_string(),
            cases: a.cases,
            completion_rate: pct(a.completed, a.cases),
            satisfaction: if a.scored == 0 {
                0.0
            } else {
                (a.score_sum / a.scored as f64 / 20.0 * 10.0).round() / 10.0
            },
            success_rate: pct(a.certified, a.cases),
        })
        .collect();
    out.sort_by(|a, b| desc_f64(a.success_rate, b.success_rate).then_with(|| a.program.cmp(&b.program)));
    out
}

#[derive(Default)]
struct ProgramAcc {
    cases: u64,
    completed: u64,
    certified: u64,
    score_sum: f64,
    scored: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MethodEffectiveness {
    pub method: String,
    pub events: u64,
    pub effectiveness: f64,
}

/// Share of completed events per activity label, descending.
pub fn method_effectiveness(events: &[ReskillEvent]) -> Vec<MethodEffectiveness> {
    let mut acc: HashMap<&str, (u64, u64)> = HashMap::new();
    for event in events {
        let entry = acc.entry(event.activity_label()).or_insert((0, 0));
        entry.0 += 1;
        if event.is_completed() {
            entry.1 += 1;
        }
    }
    let mut out: Vec<MethodEffectiveness> = acc
        .into_iter()
        .map(|(method, (total, completed))| MethodEffectiveness {
            method: method.to_string(),
            events: total,
            effectiveness: pct(completed, total),
        })
        .collect();
    out.sort_by(|a, b| desc_f64(a.effectiveness, b.effectiveness).then_with(|| a.method.cmp(&b.method)));
    out
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillGain {
    pub skill: String,
    pub before: f64,
    pub after: f64,
}

/// Mean first-vs-last assessment score per skill category, across cases with
/// at least two scored events in that category. Events order by timestamp
/// text (ISO sorts lexicographically), then event id.
pub fn skill_gains(events: &[ReskillEvent]) -> Vec<SkillGain> {
    let mut per_case_skill: HashMap<(i64, &str), Vec<&ReskillEvent>> = HashMap::new();
    for event in events {
        let (Some(case_id), Some(skill)) = (event.case_id, event.skill_category.as_deref()) else {
            continue;
        };
        if event.score_value().is_none() || skill.trim().is_empty() {
            continue;
        }
        per_case_skill.entry((case_id, skill.trim())).or_default().push(event);
    }

    let mut acc: BTreeMap<&str, (f64, f64, u64)> = BTreeMap::new();
    for ((_case, skill), mut trail) in per_case_skill {
        if trail.len() < 2 {
            continue;
        }
        trail.sort_by(|a, b| {
            a.timestamp
                .as_deref()
                .unwrap_or("")
                .cmp(b.timestamp.as_deref().unwrap_or(""))
                .then(a.event_id.cmp(&b.event_id))
        });
        let first = trail.first().and_then(|e| e.score_value()).unwrap_or(0.0);
        let last = trail.last().and_then(|e| e.score_value()).unwrap_or(0.0);
        let entry = acc.entry(skill).or_insert((0.0, 0.0, 0));
        entry.0 += first;
        entry.1 += last;
        entry.2 += 1;
    }

    acc.into_iter()
        .map(|(skill, (before_sum, after_sum, n))| SkillGain {
            skill: skill.to_string(),
            before: (before_sum / n as f64).round(),
            after: (after_sum / n as f64).round(),
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyCompletion {
    pub month: String,
    pub completion_rate: f64,
    pub cases: u64,
}

/// Completion rate bucketed by start month, ascending.
pub fn monthly_completion_trend(cases: &[ReskillCase]) -> Vec<MonthlyCompletion> {
    let mut months: BTreeMap<String, (u64, u64)> = BTreeMap::new();
    for case in cases {
        let Some(started) = case.started() else { continue };
        let entry = months.entry(month_key(started)).or_insert((0, 0));
        entry.0 += 1;
        if case.completed().is_some() {
            entry.1 += 1;
        }
    }
    months
        .into_iter()
        .map(|(month, (total, completed))| MonthlyCompletion {
            month,
            completion_rate: pct(completed, total),
            cases: total,
        })
        .collect()
}
