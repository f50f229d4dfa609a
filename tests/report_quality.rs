//! View reports, rendering, export, and quality accounting on degenerate
//! and messy inputs. A failed or empty fetch must always render, never panic.

use reskillscope::config::Config;
use reskillscope::model::{Dataset, EmployeeProfile, Occupation, ReskillCase, ReskillEvent};
use reskillscope::quality::{self, TableStats};
use reskillscope::render::{export_json, render};
use reskillscope::views::{build_view, View};

fn messy_dataset() -> Dataset {
    Dataset {
        occupations: vec![
            Occupation {
                occupation_id: "43-9021".to_string(),
                occupation_name: Some("Data Entry Clerk".to_string()),
                automation_probability: Some("0.92".to_string()),
            },
            Occupation {
                occupation_id: "00-0000".to_string(),
                occupation_name: None,
                automation_probability: Some("not recorded".to_string()),
            },
        ],
        cases: vec![
            ReskillCase {
                case_id: 1,
                employee_id: 10,
                training_program: Some("Digital Skills".to_string()),
                certification_earned: Some(true),
                start_date: Some("2024-02-01".to_string()),
                completion_date: Some("2024-01-01".to_string()), // inverted
            },
            ReskillCase {
                case_id: 1, // duplicate id
                employee_id: 11,
                training_program: None,
                certification_earned: None,
                start_date: None,
                completion_date: None,
            },
        ],
        events: vec![ReskillEvent {
            event_id: 1,
            case_id: Some(999), // orphan
            activity: None,
            timestamp: None,
            actor: None,
            skill_category: None,
            score: Some("ninety".to_string()),
            completion_status: None,
        }],
        profiles: vec![EmployeeProfile {
            employee_id: 10,
            occupation_code: Some("43-9021".to_string()),
        }],
        job_risk: Vec::new(),
    }
}

#[test]
fn quality_counts_every_defect() {
    let ds = messy_dataset();
    let report = quality::assess(&ds, &[TableStats::failed("job_risk")]);
    assert_eq!(report.duplicate_case_ids, 1);
    assert_eq!(report.orphan_events, 1);
    assert_eq!(report.unparsable_probabilities, 1);
    assert_eq!(report.unscored_events, 1);
    assert_eq!(report.inverted_durations, 1);
    assert!(report.warnings.iter().any(|w| w.contains("fetch_failed: job_risk")));
}

#[test]
fn every_view_renders_on_messy_data() {
    let ds = messy_dataset();
    let cfg = Config::from_env();
    for view in View::ALL {
        let report = build_view(view, &ds, &cfg);
        let text = render(&report);
        assert!(text.contains("==="), "{} rendered nothing", view.slug());
    }
}

#[test]
fn every_view_renders_on_empty_data() {
    let ds = Dataset::default();
    let cfg = Config::from_env();
    for view in View::ALL {
        let report = build_view(view, &ds, &cfg);
        let text = render(&report);
        assert!(!text.is_empty());
    }
}

#[test]
fn export_round_trip() {
    let ds = messy_dataset();
    let cfg = Config::from_env();
    let dir = tempfile::tempdir().unwrap();

    let report = build_view(View::Overview, &ds, &cfg);
    let path = export_json(&report, dir.path()).unwrap();
    assert!(path.ends_with("overview.json"));

    let body = std::fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(parsed["view"], "overview");
    assert_eq!(parsed["title"], "Workforce Analytics Dashboard");
    assert!(parsed["stats"].as_array().is_some());
}

#[test]
fn export_creates_nested_dirs() {
    let ds = Dataset::default();
    let cfg = Config::from_env();
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");

    let report = build_view(View::BudgetCut, &ds, &cfg);
    let path = export_json(&report, &nested).unwrap();
    assert!(path.exists());
}

#[test]
fn priority_table_shows_only_ranked_columns() {
    let ds = messy_dataset();
    let cfg = Config::from_env();
    let report = build_view(View::ReskillPriority, &ds, &cfg);
    let table = &report.tables[0];
    assert_eq!(table.columns.len(), 6);
    // one profile per occupation, below the noise floor: nothing ranked
    assert!(table.rows.is_empty());
}
