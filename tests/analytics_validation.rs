//! Validation of the aggregation invariants on synthetic row sets.
//!
//! These are the properties the dashboards lean on: bounded rates, stable
//! ordering, noise filtering, clamped correlations, and graceful behavior on
//! empty or failed fetches.

use reskillscope::analytics::classify::{budget_category, department};
use reskillscope::analytics::correlation::{success_factors, CORRELATION_CLAMP};
use reskillscope::analytics::priority::{prioritize, priority_score, reskill_cost, PriorityParams};
use reskillscope::analytics::success::{monthly_success_trend, success_rate_by_program};
use reskillscope::analytics::{budget, risk, training};
use reskillscope::model::{Dataset, EmployeeProfile, JobRisk, Occupation, ReskillCase, ReskillEvent};

fn case(id: i64, employee: i64, program: &str, certified: bool) -> ReskillCase {
    ReskillCase {
        case_id: id,
        employee_id: employee,
        training_program: Some(program.to_string()),
        certification_earned: Some(certified),
        start_date: Some("2024-01-10".to_string()),
        completion_date: Some("2024-05-01".to_string()),
    }
}

fn event(id: i64, case_id: i64, activity: &str, score: Option<&str>) -> ReskillEvent {
    ReskillEvent {
        event_id: id,
        case_id: Some(case_id),
        activity: Some(activity.to_string()),
        timestamp: Some(format!("2024-02-{:02}T09:00:00", (id % 27) + 1)),
        actor: Some("coach".to_string()),
        skill_category: Some("Technical".to_string()),
        score: score.map(|s| s.to_string()),
        completion_status: Some("completed".to_string()),
    }
}

fn profile(id: i64, code: &str) -> EmployeeProfile {
    EmployeeProfile {
        employee_id: id,
        occupation_code: Some(code.to_string()),
    }
}

fn job(code: &str, title: &str, prob: f64) -> JobRisk {
    JobRisk {
        job_title: Some(title.to_string()),
        occupation_code: Some(code.to_string()),
        automation_probability: Some(prob),
    }
}

fn occupation(id: &str, name: &str, prob: &str) -> Occupation {
    Occupation {
        occupation_id: id.to_string(),
        occupation_name: Some(name.to_string()),
        automation_probability: Some(prob.to_string()),
    }
}

/// Build a coherent mid-sized dataset: three occupations, enrolled
/// employees, mixed outcomes, event trails.
fn synthetic_dataset() -> Dataset {
    let mut cases = Vec::new();
    let mut events = Vec::new();
    let mut profiles = Vec::new();

    // 40 clerks in "Digital Skills Fundamentals", 60% certified
    for i in 0..40i64 {
        profiles.push(profile(i, "43-9021"));
        cases.push(case(i, i, "Digital Skills Fundamentals", i % 5 < 3));
        events.push(event(i * 3, i, "Skills Assessment", Some("85")));
        events.push(event(i * 3 + 1, i, "Online Course", Some("70")));
        events.push(event(i * 3 + 2, i, "Skills Assessment", Some("90")));
    }
    // 20 tellers in "Leadership Development", 50% certified
    for i in 40..60i64 {
        profiles.push(profile(i, "43-3071"));
        cases.push(case(i, i, "Leadership Development", i % 2 == 0));
        events.push(event(i * 3, i, "Workshop", Some("55")));
    }
    // 3 designers, below the noise floor
    for i in 60..63i64 {
        profiles.push(profile(i, "27-1024"));
    }

    Dataset {
        occupations: vec![
            occupation("43-9021", "Data Entry Clerk", "0.92"),
            occupation("43-3071", "Bank Teller", "0.91"),
            occupation("27-1024", "Graphic Designer", "0.08"),
        ],
        cases,
        events,
        profiles,
        job_risk: vec![
            job("43-9021", "Data Entry Clerk", 0.92),
            job("43-3071", "Bank Teller", 0.91),
            job("27-1024", "Graphic Designer", 0.08),
        ],
    }
}

// ---------------------------------------------------------------------------
// Success rates stay in [0, 100] and sort descending
// ---------------------------------------------------------------------------
#[test]
fn success_rates_bounded_and_sorted() {
    let ds = synthetic_dataset();
    let rates = success_rate_by_program(&ds.cases);
    assert!(!rates.is_empty());
    for p in &rates {
        assert!((0.0..=100.0).contains(&p.success_rate), "{:?}", p);
    }
    for w in rates.windows(2) {
        assert!(w[0].success_rate >= w[1].success_rate);
    }
}

#[test]
fn empty_case_list_yields_empty_mapping() {
    assert!(success_rate_by_program(&[]).is_empty());
    assert!(monthly_success_trend(&[]).is_empty());
}

// ---------------------------------------------------------------------------
// Priority: worked example and noise floor
// ---------------------------------------------------------------------------
#[test]
fn priority_worked_example() {
    // automation probability 0.9, 100 employees, 70% historical success:
    // risk = 90, cost = 2500 + 2500 * 0.45 = 3625, priority = 89
    assert_eq!(reskill_cost(90.0), 3625.0);
    assert_eq!(priority_score(90.0, 100, 70.0), 89.0);
}

#[test]
fn priority_never_ranks_small_occupations() {
    let ds = synthetic_dataset();
    let ranked = prioritize(&ds.job_risk, &ds.profiles, &ds.cases, &PriorityParams::default());
    assert!(!ranked.is_empty());
    assert!(ranked.iter().all(|r| r.employee_count >= 5));
    assert!(ranked.iter().all(|r| r.job_title != "Graphic Designer"));
    assert!(ranked.len() <= 7);
}

#[test]
fn priority_uses_history_when_present() {
    let ds = synthetic_dataset();
    let ranked = prioritize(&ds.job_risk, &ds.profiles, &ds.cases, &PriorityParams::default());
    let clerks = ranked.iter().find(|r| r.job_title == "Data Entry Clerk").unwrap();
    assert_eq!(clerks.success_rate, 60.0);
    let tellers = ranked.iter().find(|r| r.job_title == "Bank Teller").unwrap();
    assert_eq!(tellers.success_rate, 50.0);
}

// ---------------------------------------------------------------------------
// Correlation clamp holds under heavy skew
// ---------------------------------------------------------------------------
#[test]
fn correlations_clamped_under_skew() {
    // All high-assessment cases certified, all others not: raw gap is 1.0.
    let mut cases = Vec::new();
    let mut events = Vec::new();
    for i in 0..50i64 {
        let hot = i < 25;
        cases.push(case(i, i, "p", hot));
        events.push(event(
            i,
            i,
            "Skills Assessment",
            Some(if hot { "99" } else { "10" }),
        ));
    }
    let factors = success_factors(&cases, &events);
    assert_eq!(factors.len(), 5);
    for f in &factors {
        assert!(
            f.correlation.abs() <= CORRELATION_CLAMP,
            "{} escaped the clamp: {}",
            f.factor,
            f.correlation
        );
    }
}

#[test]
fn correlation_age_factor_is_static() {
    let ds = synthetic_dataset();
    let factors = success_factors(&ds.cases, &ds.events);
    let age = factors.iter().find(|f| f.factor == "Age").unwrap();
    assert!(!age.derived);
    assert_eq!(age.correlation, -0.31);
}

// ---------------------------------------------------------------------------
// Classifier purity
// ---------------------------------------------------------------------------
#[test]
fn classifier_same_input_same_bucket() {
    let names = [
        "Administrative Assistant",
        "Data Entry Clerk",
        "Customer Service Rep",
        "Mail Sorter",
        "Underwater Basket Weaver",
    ];
    for name in names {
        let first = department(name);
        for _ in 0..10 {
            assert_eq!(department(name), first);
        }
    }
    for program in ["Digital Skills Fundamentals", "Mystery Program"] {
        assert_eq!(budget_category(program), budget_category(program));
    }
}

// ---------------------------------------------------------------------------
// Risk and budget derivations on the synthetic dataset
// ---------------------------------------------------------------------------
#[test]
fn risk_summary_matches_dataset() {
    let ds = synthetic_dataset();
    let summary = risk::summarize(&ds.occupations, &ds.profiles);
    assert_eq!(summary.high_risk_roles, 2);
    assert_eq!(summary.employees_at_risk, 60);
}

#[test]
fn distribution_counts_every_scored_employee() {
    let ds = synthetic_dataset();
    let buckets = risk::risk_distribution(&ds.occupations, &ds.profiles);
    let counted: u64 = buckets.iter().map(|b| b.count).sum();
    assert_eq!(counted, ds.profiles.len() as u64);
}

#[test]
fn budget_projection_floor_is_half_the_cut() {
    let projection = budget::success_projection(80.0, 0.4);
    // floor = 80 * (1 - 0.2) = 64
    assert_eq!(projection.last().unwrap().success_rate, 64.0);
    assert_eq!(projection.first().unwrap().success_rate, 80.0);
}

#[test]
fn program_stats_cover_all_programs() {
    let ds = synthetic_dataset();
    let stats = training::program_stats(&ds.cases, &ds.events);
    assert_eq!(stats.len(), 2);
    for s in &stats {
        assert!((0.0..=100.0).contains(&s.completion_rate));
        assert!((0.0..=5.0).contains(&s.satisfaction));
    }
}
