//! Backend probe: fetch a page of each canonical table and report row
//! counts, per-column coverage, and the dataset quality findings. Run it
//! before trusting a dashboard against a new project.

use std::collections::BTreeMap;

use anyhow::Result;

use reskillscope::backend::{BackendKind, TableQuery, CANONICAL_TABLES};
use reskillscope::cache::QueryCache;
use reskillscope::config::Config;
use reskillscope::quality;
use reskillscope::views::load_dataset;

const PROBE_LIMIT: u32 = 200;

#[tokio::main]
async fn main() -> Result<()> {
    let mut cfg = Config::from_env();
    if cfg.fetch_limit.is_none() {
        cfg.fetch_limit = Some(PROBE_LIMIT);
    }
    let backend = BackendKind::from_env().build(&cfg)?;

    println!("=== Table Probe ===");
    for table in CANONICAL_TABLES {
        let query = TableQuery::all().limit(cfg.fetch_limit.unwrap_or(PROBE_LIMIT));
        match backend.fetch_table(table, &query).await {
            Ok(page) => {
                println!();
                println!(
                    "{}: {} rows ({} bytes, sha256 {})",
                    table,
                    page.rows.len(),
                    page.raw_len,
                    &page.fingerprint.get(..12).unwrap_or("")
                );
                for (column, non_null) in column_coverage(&page.rows) {
                    let pct = if page.rows.is_empty() {
                        0.0
                    } else {
                        non_null as f64 / page.rows.len() as f64 * 100.0
                    };
                    println!("  {:<32} {:>5.1}% non-null", column, pct);
                }
            }
            Err(err) => {
                println!();
                println!("{}: FETCH FAILED: {}", table, err);
            }
        }
    }

    // Full pass through the loader so the probe sees exactly what the
    // dashboard would see, cache and decode included.
    let mut cache = QueryCache::new(cfg.cache_ttl_secs);
    let (dataset, table_stats) = load_dataset(backend.as_ref(), &mut cache, &cfg).await;
    let report = quality::assess(&dataset, &table_stats);

    println!();
    println!("=== Quality Report ===");
    println!("orphan events:            {}", report.orphan_events);
    println!("duplicate case ids:       {}", report.duplicate_case_ids);
    println!("unparsable probabilities: {}", report.unparsable_probabilities);
    println!("unscored events:          {}", report.unscored_events);
    println!("inverted durations:       {}", report.inverted_durations);
    if report.warnings.is_empty() {
        println!("warnings: none");
    } else {
        println!("warnings:");
        for warning in &report.warnings {
            println!("  - {}", warning);
        }
    }

    Ok(())
}

/// Count non-null values per column across raw rows.
fn column_coverage(rows: &[serde_json::Value]) -> BTreeMap<String, u64> {
    let mut coverage: BTreeMap<String, u64> = BTreeMap::new();
    for row in rows {
        if let Some(map) = row.as_object() {
            for (key, value) in map {
                let entry = coverage.entry(key.clone()).or_insert(0);
                if !value.is_null() {
                    *entry += 1;
                }
            }
        }
    }
    coverage
}
