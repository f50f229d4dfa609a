//! Terminal rendering and JSON export of view reports.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::views::{SeriesBlock, TableBlock, ViewReport};

const BAR_WIDTH: usize = 40;

pub fn render(report: &ViewReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== {} ===\n", report.title));
    out.push_str(&format!("{}\n\n", report.subtitle));

    for stat in &report.stats {
        out.push_str(&format!("{}: {}  ({})\n", stat.label, stat.value, stat.note));
    }
    if !report.stats.is_empty() {
        out.push('\n');
    }

    for table in &report.tables {
        render_table(&mut out, table);
    }
    for series in &report.series {
        render_series(&mut out, series);
    }

    out
}

fn render_table(out: &mut String, table: &TableBlock) {
    out.push_str(&format!("--- {} ---\n", table.title));
    if table.rows.is_empty() {
        out.push_str("(no data)\n\n");
        return;
    }

    let mut widths: Vec<usize> = table.columns.iter().map(|c| c.chars().count()).collect();
    for row in &table.rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let header: Vec<String> = table
        .columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!("{:<width$}", c, width = *w))
        .collect();
    out.push_str(&header.join("  "));
    out.push('\n');
    out.push_str(&"-".repeat(widths.iter().sum::<usize>() + 2 * (widths.len().saturating_sub(1))));
    out.push('\n');

    for row in &table.rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
            .collect();
        out.push_str(&cells.join("  "));
        out.push('\n');
    }
    out.push('\n');
}

fn render_series(out: &mut String, series: &SeriesBlock) {
    out.push_str(&format!("--- {} ---\n", series.title));
    if series.points.is_empty() {
        out.push_str("(no data)\n\n");
        return;
    }

    let label_width = series
        .points
        .iter()
        .map(|p| p.label.chars().count())
        .max()
        .unwrap_or(0);
    let max_abs = series
        .points
        .iter()
        .map(|p| p.value.abs())
        .fold(0.0f64, f64::max);

    for point in &series.points {
        let bar_len = if max_abs > 0.0 {
            ((point.value.abs() / max_abs) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let sign = if point.value < 0.0 { "-" } else { "" };
        out.push_str(&format!(
            "{:<label_width$}  {:>8.2}  {}{}\n",
            point.label,
            point.value,
            sign,
            "#".repeat(bar_len),
            label_width = label_width,
        ));
    }
    out.push('\n');
}

/// Write the report as pretty JSON under `dir`, named by its view slug.
pub fn export_json(report: &ViewReport, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("creating export dir {}", dir.display()))?;
    let path = dir.join(format!("{}.json", report.view));
    let body = serde_json::to_string_pretty(report)?;
    fs::write(&path, body).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::{SeriesPoint, Stat};

    fn report() -> ViewReport {
        ViewReport {
            view: "overview".to_string(),
            title: "Workforce Analytics Dashboard".to_string(),
            subtitle: "sub".to_string(),
            stats: vec![Stat {
                label: "High Risk Roles".to_string(),
                value: "42".to_string(),
                note: "note".to_string(),
            }],
            tables: vec![TableBlock {
                title: "Roles".to_string(),
                columns: vec!["Role".to_string(), "Risk".to_string()],
                rows: vec![vec!["File Clerk".to_string(), "95%".to_string()]],
            }],
            series: vec![SeriesBlock {
                title: "Trend".to_string(),
                points: vec![
                    SeriesPoint {
                        label: "2024-01".to_string(),
                        value: 50.0,
                    },
                    SeriesPoint {
                        label: "2024-02".to_string(),
                        value: -25.0,
                    },
                ],
            }],
        }
    }

    #[test]
    fn test_render_contains_sections() {
        let text = render(&report());
        assert!(text.contains("=== Workforce Analytics Dashboard ==="));
        assert!(text.contains("High Risk Roles: 42"));
        assert!(text.contains("File Clerk"));
        assert!(text.contains("2024-01"));
    }

    #[test]
    fn test_negative_values_marked() {
        let text = render(&report());
        assert!(text.contains("-####"));
    }

    #[test]
    fn test_empty_blocks_say_so() {
        let mut r = report();
        r.tables[0].rows.clear();
        r.series[0].points.clear();
        let text = render(&r);
        assert!(text.contains("(no data)"));
    }
}
