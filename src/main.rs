use std::path::Path;

use anyhow::Result;
use tokio::time::{sleep, Duration};

use reskillscope::backend::BackendKind;
use reskillscope::cache::QueryCache;
use reskillscope::config::{now_ts, Config};
use reskillscope::logging::{json_log, json_log_at, obj, v_num, v_str, Domain, Level};
use reskillscope::quality;
use reskillscope::render::{export_json, render};
use reskillscope::views::{build_view, load_dataset, parse_views};

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();
    let backend = BackendKind::from_env().build(&cfg)?;
    let mut cache = QueryCache::new(cfg.cache_ttl_secs);

    let selected = parse_views(&cfg.views);
    if selected.is_empty() {
        json_log_at(
            Level::Error,
            Domain::System,
            "no_views_selected",
            obj(&[("views", v_str(&cfg.views))]),
        );
        return Ok(());
    }

    json_log(
        Domain::System,
        "startup",
        obj(&[
            ("views", v_num(selected.len() as f64)),
            ("refresh_secs", v_num(cfg.refresh_secs as f64)),
            ("cache_ttl_secs", v_num(cfg.cache_ttl_secs as f64)),
        ]),
    );

    loop {
        let (dataset, table_stats) = load_dataset(backend.as_ref(), &mut cache, &cfg).await;

        let report = quality::assess(&dataset, &table_stats);
        json_log(
            Domain::Quality,
            "dataset_assessed",
            obj(&[
                ("cases", v_num(dataset.cases.len() as f64)),
                ("events", v_num(dataset.events.len() as f64)),
                ("occupations", v_num(dataset.occupations.len() as f64)),
                ("orphan_events", v_num(report.orphan_events as f64)),
                ("warnings", v_num(report.warnings.len() as f64)),
            ]),
        );
        for warning in &report.warnings {
            json_log_at(
                Level::Warn,
                Domain::Quality,
                "dataset_warning",
                obj(&[("warning", v_str(warning))]),
            );
        }

        for view in &selected {
            let view_report = build_view(*view, &dataset, &cfg);
            print!("{}", render(&view_report));
            if let Some(dir) = &cfg.export_dir {
                match export_json(&view_report, Path::new(dir)) {
                    Ok(path) => json_log(
                        Domain::View,
                        "exported",
                        obj(&[
                            ("view", v_str(view.slug())),
                            ("path", v_str(&path.display().to_string())),
                        ]),
                    ),
                    Err(err) => json_log_at(
                        Level::Error,
                        Domain::View,
                        "export_failed",
                        obj(&[
                            ("view", v_str(view.slug())),
                            ("error", v_str(&err.to_string())),
                        ]),
                    ),
                }
            }
        }

        if cfg.refresh_secs == 0 {
            break;
        }
        let wait = cfg.sleep_until_next_refresh(now_ts());
        json_log(
            Domain::System,
            "refresh_sleep",
            obj(&[("secs", v_num(wait as f64))]),
        );
        sleep(Duration::from_secs(wait)).await;
    }

    Ok(())
}
