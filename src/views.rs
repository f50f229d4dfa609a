//! Dashboard views.
//!
//! Each view resolves its tables through the query cache (table fetches race
//! concurrently; a failed fetch is logged and replaced by an empty row set),
//! runs the relevant aggregations, and shapes the result into a `ViewReport`
//! for the renderer and the JSON exporter.

use std::collections::HashMap;

use futures_util::future::join_all;
use serde::Serialize;

use crate::analytics::{budget, correlation, priority, risk, success, training};
use crate::backend::{
    decode_rows, Backend, TablePage, TableQuery, CANONICAL_TABLES, T_CASES, T_EVENTS, T_JOB_RISK,
    T_OCCUPATIONS, T_PROFILES,
};
use crate::cache::QueryCache;
use crate::config::{now_ts, Config};
use crate::logging::{json_log, json_log_at, obj, v_num, v_str, Domain, Level};
use crate::model::Dataset;
use crate::quality::TableStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Overview,
    AutomationRisk,
    TrainingEffectiveness,
    ReskillSuccess,
    BudgetCut,
    ReskillPriority,
}

impl View {
    pub const ALL: [View; 6] = [
        View::Overview,
        View::AutomationRisk,
        View::TrainingEffectiveness,
        View::ReskillSuccess,
        View::BudgetCut,
        View::ReskillPriority,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            View::Overview => "overview",
            View::AutomationRisk => "automation-risk",
            View::TrainingEffectiveness => "training-effectiveness",
            View::ReskillSuccess => "reskill-success",
            View::BudgetCut => "budget-cut",
            View::ReskillPriority => "reskill-priority",
        }
    }

    pub fn parse(slug: &str) -> Option<View> {
        View::ALL.iter().copied().find(|v| v.slug() == slug.trim())
    }

    fn title(&self) -> &'static str {
        match self {
            View::Overview => "Workforce Analytics Dashboard",
            View::AutomationRisk => "Automation Risk Analysis",
            View::TrainingEffectiveness => "Training Program Effectiveness",
            View::ReskillSuccess => "Predict Reskilling Success",
            View::BudgetCut => "Budget Cut Analysis",
            View::ReskillPriority => "Reskilling Prioritization",
        }
    }

    fn subtitle(&self) -> &'static str {
        match self {
            View::Overview => "Monitor automation risk and reskilling effectiveness",
            View::AutomationRisk => "Identifying roles most vulnerable to automation",
            View::TrainingEffectiveness => "Evaluate success rates of existing training programs",
            View::ReskillSuccess => "Analyze factors influencing successful reskilling outcomes",
            View::BudgetCut => "Impact assessment of training budget reductions",
            View::ReskillPriority => "Strategic allocation of resources for maximum impact",
        }
    }
}

/// "all" or a comma-separated list of slugs; unknown slugs are logged and
/// skipped rather than failing the run.
pub fn parse_views(selector: &str) -> Vec<View> {
    if selector.trim().eq_ignore_ascii_case("all") {
        return View::ALL.to_vec();
    }
    let mut out = Vec::new();
    for part in selector.split(',') {
        match View::parse(part) {
            Some(view) if !out.contains(&view) => out.push(view),
            Some(_) => {}
            None => json_log_at(
                Level::Warn,
                Domain::View,
                "unknown_view",
                obj(&[("slug", v_str(part.trim()))]),
            ),
        }
    }
    out
}

#[derive(Debug, Clone, Serialize)]
pub struct Stat {
    pub label: String,
    pub value: String,
    pub note: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableBlock {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeriesBlock {
    pub title: String,
    pub points: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewReport {
    pub view: String,
    pub title: String,
    pub subtitle: String,
    pub stats: Vec<Stat>,
    pub tables: Vec<TableBlock>,
    pub series: Vec<SeriesBlock>,
}

async fn fetch_one(
    backend: &(dyn Backend + Send + Sync),
    table: &'static str,
    cfg: &Config,
) -> (&'static str, anyhow::Result<TablePage>) {
    (table, backend.fetch_table(table, &default_query(table, cfg)).await)
}

fn default_query(table: &str, cfg: &Config) -> TableQuery {
    let order_column = match table {
        T_OCCUPATIONS => "occupation_id",
        T_CASES => "case_id",
        T_EVENTS => "event_id",
        T_PROFILES => "employee_id",
        T_JOB_RISK => "occupation_code",
        _ => return TableQuery::all(),
    };
    let mut query = TableQuery::all().order_asc(order_column);
    if let Some(limit) = cfg.fetch_limit {
        query = query.limit(limit);
    }
    query
}

/// Resolve all canonical tables: cache hits are reused, misses are fetched
/// concurrently. A failed fetch leaves its table empty; the aggregations
/// treat that as the zero case, so rendering always proceeds.
pub async fn load_dataset(
    backend: &(dyn Backend + Send + Sync),
    cache: &mut QueryCache,
    cfg: &Config,
) -> (Dataset, Vec<TableStats>) {
    let now = now_ts();

    let mut pages: HashMap<&'static str, TablePage> = HashMap::new();
    let mut missing: Vec<&'static str> = Vec::new();
    for table in CANONICAL_TABLES {
        match cache.get(table, now) {
            Some(page) => {
                pages.insert(table, page.clone());
            }
            None => missing.push(table),
        }
    }

    let results = join_all(missing.into_iter().map(|t| fetch_one(backend, t, cfg))).await;
    for (table, outcome) in results {
        match outcome {
            Ok(page) => {
                json_log(
                    Domain::Fetch,
                    "table_loaded",
                    obj(&[
                        ("table", v_str(table)),
                        ("rows", v_num(page.rows.len() as f64)),
                        ("bytes", v_num(page.raw_len as f64)),
                    ]),
                );
                cache.put(table, now, page.clone());
                pages.insert(table, page);
            }
            Err(err) => {
                json_log_at(
                    Level::Warn,
                    Domain::Fetch,
                    "table_failed",
                    obj(&[("table", v_str(table)), ("error", v_str(&err.to_string()))]),
                );
            }
        }
    }

    let mut dataset = Dataset::default();
    let mut stats = Vec::with_capacity(CANONICAL_TABLES.len());
    for table in CANONICAL_TABLES {
        let Some(page) = pages.get(table) else {
            stats.push(TableStats::failed(table));
            continue;
        };
        let bad_rows = match table {
            T_OCCUPATIONS => {
                let (rows, bad) = decode_rows(page);
                dataset.occupations = rows;
                bad
            }
            T_CASES => {
                let (rows, bad) = decode_rows(page);
                dataset.cases = rows;
                bad
            }
            T_EVENTS => {
                let (rows, bad) = decode_rows(page);
                dataset.events = rows;
                bad
            }
            T_PROFILES => {
                let (rows, bad) = decode_rows(page);
                dataset.profiles = rows;
                bad
            }
            T_JOB_RISK => {
                let (rows, bad) = decode_rows(page);
                dataset.job_risk = rows;
                bad
            }
            _ => 0,
        };
        stats.push(TableStats {
            table: table.to_string(),
            rows: page.rows.len() as u64,
            bad_rows,
            raw_bytes: page.raw_len as u64,
            fingerprint: page.fingerprint.clone(),
            fetch_failed: false,
        });
    }

    (dataset, stats)
}

pub fn build_view(view: View, dataset: &Dataset, cfg: &Config) -> ViewReport {
    let report = match view {
        View::Overview => overview(dataset, cfg),
        View::AutomationRisk => automation_risk(dataset),
        View::TrainingEffectiveness => training_effectiveness(dataset),
        View::ReskillSuccess => reskill_success(dataset),
        View::BudgetCut => budget_cut(dataset, cfg),
        View::ReskillPriority => reskill_priority(dataset, cfg),
    };
    json_log(
        Domain::View,
        "view_built",
        obj(&[
            ("view", v_str(view.slug())),
            ("stats", v_num(report.stats.len() as f64)),
            ("tables", v_num(report.tables.len() as f64)),
            ("series", v_num(report.series.len() as f64)),
        ]),
    );
    report
}

fn stat(label: &str, value: String, note: &str) -> Stat {
    Stat {
        label: label.to_string(),
        value,
        note: note.to_string(),
    }
}

fn money(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("\u{a3}{:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("\u{a3}{:.0}K", value / 1_000.0)
    } else {
        format!("\u{a3}{:.0}", value)
    }
}

fn empty_report(view: View) -> ViewReport {
    ViewReport {
        view: view.slug().to_string(),
        title: view.title().to_string(),
        subtitle: view.subtitle().to_string(),
        stats: Vec::new(),
        tables: Vec::new(),
        series: Vec::new(),
    }
}

fn overview(ds: &Dataset, cfg: &Config) -> ViewReport {
    let mut report = empty_report(View::Overview);

    let summary = risk::summarize(&ds.occupations, &ds.profiles);
    let programs = training::program_stats(&ds.cases, &ds.events);
    let avg_completion = if programs.is_empty() {
        0.0
    } else {
        (programs.iter().map(|p| p.completion_rate).sum::<f64>() / programs.len() as f64).round()
    };
    let overall = success::overall_success_rate(&ds.cases);
    let total = budget::total_budget(&ds.cases, &ds.profiles, &ds.job_risk);

    report.stats = vec![
        stat(
            "High Risk Roles",
            summary.high_risk_roles.to_string(),
            "Roles with >75% automation risk",
        ),
        stat(
            "Training Completion",
            format!("{:.0}%", avg_completion),
            "Average completion rate",
        ),
        stat(
            "Reskill Success Rate",
            format!("{:.0}%", overall),
            "Employees meeting criteria",
        ),
        stat("Training Budget", money(total), "Estimated reskilling spend"),
    ];

    report.series.push(SeriesBlock {
        title: "Top 5 Roles at Risk of Automation".to_string(),
        points: risk::top_risk_roles(&ds.occupations, &ds.profiles, 5)
            .into_iter()
            .map(|r| SeriesPoint {
                label: r.role,
                value: r.risk_pct,
            })
            .collect(),
    });

    let budgets = budget::category_budgets(&ds.cases, &ds.profiles, &ds.job_risk, cfg.budget_cut_pct);
    let budget_total: f64 = budgets.iter().map(|b| b.current).sum();
    report.series.push(SeriesBlock {
        title: "Training Budget Distribution".to_string(),
        points: budgets
            .iter()
            .map(|b| SeriesPoint {
                label: b.category.to_string(),
                value: if budget_total > 0.0 {
                    (b.current / budget_total * 100.0).round()
                } else {
                    0.0
                },
            })
            .collect(),
    });

    report.series.push(SeriesBlock {
        title: format!(
            "Training Program Completion vs Target ({:.0}%)",
            cfg.completion_target
        ),
        points: programs
            .iter()
            .map(|p| SeriesPoint {
                label: p.program.clone(),
                value: p.completion_rate,
            })
            .collect(),
    });

    report.series.push(SeriesBlock {
        title: "Reskilling Success Rate Trend".to_string(),
        points: success::monthly_success_trend(&ds.cases)
            .into_iter()
            .map(|m| SeriesPoint {
                label: m.month,
                value: m.success_rate,
            })
            .collect(),
    });

    report
}

fn automation_risk(ds: &Dataset) -> ViewReport {
    let mut report = empty_report(View::AutomationRisk);

    let summary = risk::summarize(&ds.occupations, &ds.profiles);
    report.stats = vec![
        stat(
            "High Risk Roles Identified",
            summary.high_risk_roles.to_string(),
            "Roles with >75% automation risk",
        ),
        stat(
            "Employees in High Risk Roles",
            summary.employees_at_risk.to_string(),
            "Across all occupations",
        ),
        stat(
            "Average Risk Score",
            format!("{:.0}%", summary.average_risk),
            "Across all departments",
        ),
    ];

    report.tables.push(TableBlock {
        title: "Top 10 Roles at Highest Risk of Automation".to_string(),
        columns: vec![
            "Role".to_string(),
            "Risk".to_string(),
            "Employees".to_string(),
            "Priority".to_string(),
        ],
        rows: risk::top_risk_roles(&ds.occupations, &ds.profiles, 10)
            .into_iter()
            .map(|r| {
                vec![
                    r.role,
                    format!("{:.0}%", r.risk_pct),
                    r.employees.to_string(),
                    r.tier.to_string(),
                ]
            })
            .collect(),
    });

    report.series.push(SeriesBlock {
        title: "Distribution of Automation Risk Across Workforce".to_string(),
        points: risk::risk_distribution(&ds.occupations, &ds.profiles)
            .into_iter()
            .map(|b| SeriesPoint {
                label: b.label.to_string(),
                value: b.count as f64,
            })
            .collect(),
    });

    report.series.push(SeriesBlock {
        title: "Percentage of High Risk Roles by Department".to_string(),
        points: risk::department_risk(&ds.occupations, &ds.profiles)
            .into_iter()
            .map(|d| SeriesPoint {
                label: d.department.to_string(),
                value: d.risk_pct,
            })
            .collect(),
    });

    report
}

fn training_effectiveness(ds: &Dataset) -> ViewReport {
    let mut report = empty_report(View::TrainingEffectiveness);

    let programs = training::program_stats(&ds.cases, &ds.events);
    let n = programs.len().max(1) as f64;
    let avg_completion = (programs.iter().map(|p| p.completion_rate).sum::<f64>() / n).round();
    let avg_satisfaction = programs.iter().map(|p| p.satisfaction).sum::<f64>() / n;
    let avg_success = (programs.iter().map(|p| p.success_rate).sum::<f64>() / n).round();

    report.stats = vec![
        stat(
            "Average Completion Rate",
            format!("{:.0}%", avg_completion),
            "Across all programs",
        ),
        stat(
            "Average Satisfaction Score",
            format!("{:.1}", avg_satisfaction),
            "Out of 5.0",
        ),
        stat(
            "Average Success Rate",
            format!("{:.0}%", avg_success),
            "Meeting post-training criteria",
        ),
    ];

    report.tables.push(TableBlock {
        title: "Training Program Performance".to_string(),
        columns: vec![
            "Program".to_string(),
            "Completion Rate".to_string(),
            "Satisfaction".to_string(),
            "Success Rate".to_string(),
        ],
        rows: programs
            .iter()
            .map(|p| {
                vec![
                    p.program.clone(),
                    format!("{:.0}%", p.completion_rate),
                    format!("{:.1}/5", p.satisfaction),
                    format!("{:.0}%", p.success_rate),
                ]
            })
            .collect(),
    });

    report.tables.push(TableBlock {
        title: "Skills Assessment: Before vs. After Training".to_string(),
        columns: vec![
            "Skill".to_string(),
            "Before".to_string(),
            "After".to_string(),
            "Gain".to_string(),
        ],
        rows: training::skill_gains(&ds.events)
            .into_iter()
            .map(|g| {
                vec![
                    g.skill,
                    format!("{:.0}", g.before),
                    format!("{:.0}", g.after),
                    format!("{:+.0}", g.after - g.before),
                ]
            })
            .collect(),
    });

    report.series.push(SeriesBlock {
        title: "Training Completion Rate Trend".to_string(),
        points: training::monthly_completion_trend(&ds.cases)
            .into_iter()
            .map(|m| SeriesPoint {
                label: m.month,
                value: m.completion_rate,
            })
            .collect(),
    });

    let mut methods = training::method_effectiveness(&ds.events);
    methods.truncate(8);
    report.series.push(SeriesBlock {
        title: "Effectiveness of Training Methods".to_string(),
        points: methods
            .into_iter()
            .map(|m| SeriesPoint {
                label: m.method,
                value: m.effectiveness,
            })
            .collect(),
    });

    report
}

fn reskill_success(ds: &Dataset) -> ViewReport {
    let mut report = empty_report(View::ReskillSuccess);

    let factors = correlation::success_factors(&ds.cases, &ds.events);
    let by_program = success::success_rate_by_program(&ds.cases);
    let bands = success::success_distribution(&ds.cases);
    let overall = success::overall_success_rate(&ds.cases);
    let derived = factors.iter().filter(|f| f.derived).count();

    let high_potential = bands.first().map(|b| b.employees).unwrap_or(0);
    let low_potential = bands.last().map(|b| b.employees).unwrap_or(0);

    report.stats = vec![
        stat(
            "Overall Success Rate",
            format!("{:.0}%", overall),
            "Employees meeting criteria",
        ),
        stat(
            "Derived Factors",
            format!("{}/{}", derived, factors.len()),
            "Factors with data support",
        ),
        stat(
            "High Success Potential",
            high_potential.to_string(),
            "Employees identified",
        ),
        stat(
            "Low Success Risk",
            low_potential.to_string(),
            "Needs additional support",
        ),
    ];

    report.series.push(SeriesBlock {
        title: "Key Success Factors (Correlation Coefficient)".to_string(),
        points: factors
            .iter()
            .map(|f| SeriesPoint {
                label: f.factor.to_string(),
                value: f.correlation,
            })
            .collect(),
    });

    report.series.push(SeriesBlock {
        title: "Employee Success Distribution".to_string(),
        points: bands
            .iter()
            .map(|b| SeriesPoint {
                label: b.band.to_string(),
                value: b.share,
            })
            .collect(),
    });

    report.tables.push(TableBlock {
        title: "Success Rate by Training Program".to_string(),
        columns: vec![
            "Program".to_string(),
            "Success Rate".to_string(),
            "Cases".to_string(),
            "Effectiveness".to_string(),
        ],
        rows: by_program
            .iter()
            .map(|p| {
                let effectiveness = if p.success_rate >= 80.0 {
                    "High"
                } else if p.success_rate >= 70.0 {
                    "Medium"
                } else {
                    "Low"
                };
                vec![
                    p.program.clone(),
                    format!("{:.0}%", p.success_rate),
                    p.cases.to_string(),
                    effectiveness.to_string(),
                ]
            })
            .collect(),
    });

    report
}

fn budget_cut(ds: &Dataset, cfg: &Config) -> ViewReport {
    let mut report = empty_report(View::BudgetCut);
    let cut = cfg.budget_cut_pct;

    let budgets = budget::category_budgets(&ds.cases, &ds.profiles, &ds.job_risk, cut);
    let current_total: f64 = budgets.iter().map(|b| b.current).sum();
    let reduced_total: f64 = budgets.iter().map(|b| b.reduced).sum();
    let mut impacted = budget::impacted_programs(&ds.cases, &ds.profiles, &ds.job_risk);
    impacted.truncate(6);
    let affected: u64 = impacted.iter().map(|p| p.employees).sum();

    report.stats = vec![
        stat(
            "Budget Reduction",
            money(current_total - reduced_total),
            &format!(
                "From {} to {} at a {:.0}% cut",
                money(current_total),
                money(reduced_total),
                cut * 100.0
            ),
        ),
        stat(
            "Impacted Programs",
            impacted.len().to_string(),
            "Programs requiring modification",
        ),
        stat(
            "Affected Employees",
            affected.to_string(),
            "Currently enrolled in programs",
        ),
    ];

    report.tables.push(TableBlock {
        title: "Current vs. Reduced Budget by Category".to_string(),
        columns: vec![
            "Category".to_string(),
            "Current".to_string(),
            "Reduced".to_string(),
        ],
        rows: budgets
            .iter()
            .map(|b| vec![b.category.to_string(), money(b.current), money(b.reduced)])
            .collect(),
    });

    report.tables.push(TableBlock {
        title: "Most Impacted Training Programs".to_string(),
        columns: vec![
            "Program".to_string(),
            "Priority".to_string(),
            "Budget Impact".to_string(),
            "Employees".to_string(),
        ],
        rows: impacted
            .iter()
            .map(|p| {
                vec![
                    p.program.clone(),
                    p.priority.to_string(),
                    p.impact.to_string(),
                    p.employees.to_string(),
                ]
            })
            .collect(),
    });

    report.series.push(SeriesBlock {
        title: "Risk Assessment of Budget Cut Outcomes".to_string(),
        points: budget::outcome_risks(cut)
            .into_iter()
            .map(|o| SeriesPoint {
                label: o.outcome.to_string(),
                value: o.risk,
            })
            .collect(),
    });

    let overall = success::overall_success_rate(&ds.cases);
    report.series.push(SeriesBlock {
        title: "Projected Success Rate After Budget Cut".to_string(),
        points: budget::success_projection(overall, cut)
            .into_iter()
            .map(|p| SeriesPoint {
                label: p.month,
                value: p.success_rate,
            })
            .collect(),
    });

    report
}

fn reskill_priority(ds: &Dataset, cfg: &Config) -> ViewReport {
    let mut report = empty_report(View::ReskillPriority);

    let params = priority::PriorityParams {
        min_headcount: cfg.min_headcount,
        default_success_rate: cfg.default_success_rate,
        top_n: cfg.top_roles,
    };
    let ranked = priority::prioritize(&ds.job_risk, &ds.profiles, &ds.cases, &params);

    let employees: u64 = ranked.iter().map(|r| r.employee_count).sum();
    let avg_success = if ranked.is_empty() {
        0.0
    } else {
        (ranked.iter().map(|r| r.success_rate).sum::<f64>() / ranked.len() as f64).round()
    };
    let investment: f64 = ranked
        .iter()
        .map(|r| r.reskill_cost * r.employee_count as f64)
        .sum();

    report.stats = vec![
        stat(
            "High Priority Roles",
            ranked.len().to_string(),
            "Requiring immediate action",
        ),
        stat(
            "Employees to Reskill",
            employees.to_string(),
            "In high priority roles",
        ),
        stat(
            "Success Probability",
            format!("{:.0}%", avg_success),
            "For prioritized programs",
        ),
        stat(
            "Estimated Investment",
            money(investment),
            "At per-employee reskilling cost",
        ),
    ];

    report.tables.push(TableBlock {
        title: "Prioritized Roles for Reskilling".to_string(),
        columns: vec![
            "Role".to_string(),
            "Risk Score".to_string(),
            "Employees".to_string(),
            "Cost".to_string(),
            "Success Prob.".to_string(),
            "Priority".to_string(),
        ],
        rows: ranked
            .iter()
            .map(|r| {
                vec![
                    r.job_title.clone(),
                    format!("{:.0}%", r.risk_score),
                    r.employee_count.to_string(),
                    format!("\u{a3}{:.0}", r.reskill_cost),
                    format!("{:.0}%", r.success_rate),
                    format!("{:.0}", r.priority_score),
                ]
            })
            .collect(),
    });

    let mut band_totals = [0.0f64; 3]; // high, medium, low
    for role in &ranked {
        let spend = role.reskill_cost * role.employee_count as f64;
        if role.priority_score >= 85.0 {
            band_totals[0] += spend;
        } else if role.priority_score >= 75.0 {
            band_totals[1] += spend;
        } else {
            band_totals[2] += spend;
        }
    }
    report.series.push(SeriesBlock {
        title: "Reskilling Investment Distribution".to_string(),
        points: ["High Priority Roles", "Medium Priority Roles", "Low Priority Roles"]
            .iter()
            .zip(band_totals)
            .map(|(label, spend)| SeriesPoint {
                label: label.to_string(),
                value: if investment > 0.0 {
                    (spend / investment * 100.0).round()
                } else {
                    0.0
                },
            })
            .collect(),
    });

    report
}
