//! JSON出力
//!
//! 行ごとに入力列をキーとしたオブジェクトを出力し、集計を添える。

use crate::batch::{BatchReport, BatchStats};
use crate::error::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use supplier_cleanse_common::MatchSource;

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    summary: JsonSummary,
    rows: Vec<JsonRow<'a>>,
}

#[derive(Serialize)]
struct JsonSummary {
    total_rows: usize,
    by_rule: usize,
    by_similarity: usize,
    unresolved: usize,
    empty_rows: usize,
}

impl From<&BatchStats> for JsonSummary {
    fn from(stats: &BatchStats) -> Self {
        Self {
            total_rows: stats.total_rows,
            by_rule: stats.by_rule,
            by_similarity: stats.by_similarity,
            unresolved: stats.unresolved,
            empty_rows: stats.empty_rows,
        }
    }
}

#[derive(Serialize)]
struct JsonRow<'a> {
    input: BTreeMap<&'a str, &'a str>,
    resolved_name: Option<&'a str>,
    match_source: MatchSource,
    match_score: Option<f64>,
}

pub fn write_json(report: &BatchReport, output: &Path) -> Result<()> {
    let rows = report
        .rows
        .iter()
        .map(|row| JsonRow {
            input: report
                .headers
                .iter()
                .zip(row.values.iter())
                .map(|(h, v)| (h.as_str(), v.as_str()))
                .collect(),
            resolved_name: Some(row.output_name.as_str()).filter(|n| !n.is_empty()),
            match_source: row.source(),
            match_score: row
                .result
                .as_ref()
                .filter(|r| r.is_resolved())
                .map(|r| r.score),
        })
        .collect();

    let json = JsonReport {
        generated_at: chrono::Local::now().to_rfc3339(),
        summary: JsonSummary::from(&report.stats),
        rows,
    };

    let content = serde_json::to_string_pretty(&json)?;
    std::fs::write(output, content)?;
    Ok(())
}
