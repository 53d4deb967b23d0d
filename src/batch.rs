//! 入力表の一括クレンジング
//!
//! 行ごとに優先順の列から名称を解決する。類似度インデックスは
//! `Resolver` 内で一度だけ構築され、全行で共有される。

use crate::error::Result;
use crate::loader::Table;
use indicatif::ProgressBar;
use supplier_cleanse_common::{title_case, MatchResult, MatchSource, Resolver};

/// 一括処理のオプション
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// 優先順の名称列
    pub columns: Vec<String>,
    /// 未解決時にクレンジング結果を出力する
    pub keep_cleansed: bool,
}

/// 1行分の結果
#[derive(Debug, Clone)]
pub struct BatchRow {
    /// 入力行の値
    pub values: Vec<String>,
    /// 採用した照合結果（名称がすべて空なら `None`）
    pub result: Option<MatchResult>,
    /// 出力する名称
    pub output_name: String,
}

impl BatchRow {
    pub fn source(&self) -> MatchSource {
        self.result.as_ref().map(|r| r.source).unwrap_or(MatchSource::None)
    }

    /// 出力用のスコア（未解決は空）
    pub fn score_text(&self) -> String {
        match &self.result {
            Some(r) if r.is_resolved() => format!("{:.4}", r.score),
            _ => String::new(),
        }
    }
}

/// 集計
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub total_rows: usize,
    pub by_rule: usize,
    pub by_similarity: usize,
    pub unresolved: usize,
    /// 名称列がすべて空だった行
    pub empty_rows: usize,
}

/// 一括処理の結果
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub headers: Vec<String>,
    pub rows: Vec<BatchRow>,
    pub stats: BatchStats,
}

impl BatchReport {
    /// 出力時に追加する列
    pub const EXTRA_COLUMNS: [&'static str; 3] = ["resolved_name", "match_source", "match_score"];

    pub fn output_headers(&self) -> Vec<String> {
        self.headers
            .iter()
            .cloned()
            .chain(Self::EXTRA_COLUMNS.iter().map(|c| c.to_string()))
            .collect()
    }

    /// 出力用の1行（入力値 + 追加列）
    pub fn output_row(&self, row: &BatchRow) -> Vec<String> {
        let mut values = row.values.clone();
        values.resize(self.headers.len(), String::new());
        values.push(row.output_name.clone());
        values.push(row.source().to_string());
        values.push(row.score_text());
        values
    }
}

/// 表を一括クレンジングする
pub fn cleanse_table(
    table: &Table,
    resolver: &Resolver,
    options: &BatchOptions,
    progress: &ProgressBar,
) -> Result<BatchReport> {
    let columns = options
        .columns
        .iter()
        .map(|name| table.column_index(name))
        .collect::<Result<Vec<usize>>>()?;

    let mut stats = BatchStats {
        total_rows: table.len(),
        ..Default::default()
    };
    let mut rows = Vec::with_capacity(table.len());

    for row_index in 0..table.len() {
        let row = resolve_row(table, row_index, &columns, resolver, options.keep_cleansed);

        match row.source() {
            MatchSource::Rule => stats.by_rule += 1,
            MatchSource::Similarity => stats.by_similarity += 1,
            MatchSource::None => {
                stats.unresolved += 1;
                if row.result.is_none() {
                    stats.empty_rows += 1;
                }
            }
        }

        rows.push(row);
        progress.inc(1);
    }

    tracing::info!(
        rows = stats.total_rows,
        by_rule = stats.by_rule,
        by_similarity = stats.by_similarity,
        unresolved = stats.unresolved,
        "一括クレンジング完了"
    );

    Ok(BatchReport {
        headers: table.headers.clone(),
        rows,
        stats,
    })
}

/// 1行を優先順に解決する
fn resolve_row(
    table: &Table,
    row_index: usize,
    columns: &[usize],
    resolver: &Resolver,
    keep_cleansed: bool,
) -> BatchRow {
    let values = table.rows[row_index].clone();
    let mut first_attempt: Option<MatchResult> = None;

    for &column in columns {
        let raw = table.cell(row_index, column);
        if raw.trim().is_empty() {
            continue;
        }

        let result = resolver.match_name(raw);
        if let Some(name) = result.matched_name.clone() {
            return BatchRow {
                values,
                result: Some(result),
                output_name: name,
            };
        }
        if first_attempt.is_none() {
            first_attempt = Some(result);
        }
    }

    let output_name = match &first_attempt {
        Some(result) if keep_cleansed => title_case(&result.cleansed),
        _ => String::new(),
    };

    BatchRow {
        values,
        result: first_attempt,
        output_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::table::read_csv;
    use supplier_cleanse_common::{Rule, RuleKind};

    fn resolver() -> Resolver {
        let catalog = ["Hubner", "Alstom", "Deutsche Bahn"];
        let rules = vec![Rule::new(RuleKind::StartsWith, "alstom", "Alstom")];
        Resolver::new(&catalog, &rules, 0.7).unwrap()
    }

    fn table() -> Table {
        let csv = "Supplier;Consignee\n\
                   Random Corp;Deutche Bahn\n\
                   Alstom SE;\n\
                   ;\n\
                   Acme Spedition;\n";
        read_csv(csv.as_bytes(), b';').unwrap()
    }

    fn options(keep_cleansed: bool) -> BatchOptions {
        BatchOptions {
            columns: vec!["Supplier".to_string(), "Consignee".to_string()],
            keep_cleansed,
        }
    }

    #[test]
    fn test_cleanse_table_priority_columns() {
        let report = cleanse_table(&table(), &resolver(), &options(false), &ProgressBar::hidden()).unwrap();

        assert_eq!(report.rows.len(), 4);
        assert_eq!(report.rows[0].output_name, "Deutsche Bahn");
        assert_eq!(report.rows[0].source(), MatchSource::Similarity);
        assert_eq!(report.rows[1].output_name, "Alstom");
        assert_eq!(report.rows[1].source(), MatchSource::Rule);
        assert_eq!(report.rows[2].output_name, "");
        assert!(report.rows[2].result.is_none());
        assert_eq!(report.rows[3].output_name, "");

        assert_eq!(
            report.stats,
            BatchStats {
                total_rows: 4,
                by_rule: 1,
                by_similarity: 1,
                unresolved: 2,
                empty_rows: 1,
            }
        );
    }

    #[test]
    fn test_keep_cleansed_fallback() {
        let report = cleanse_table(&table(), &resolver(), &options(true), &ProgressBar::hidden()).unwrap();
        assert_eq!(report.rows[3].output_name, "Acme Spedition");
        // 名称が空の行は空のまま
        assert_eq!(report.rows[2].output_name, "");
    }

    #[test]
    fn test_unknown_column() {
        let options = BatchOptions {
            columns: vec!["Carrier".to_string()],
            keep_cleansed: false,
        };
        assert!(cleanse_table(&table(), &resolver(), &options, &ProgressBar::hidden()).is_err());
    }

    #[test]
    fn test_output_row_shape() {
        let report = cleanse_table(&table(), &resolver(), &options(false), &ProgressBar::hidden()).unwrap();
        assert_eq!(
            report.output_headers(),
            vec!["Supplier", "Consignee", "resolved_name", "match_source", "match_score"]
        );

        let alstom = report.output_row(&report.rows[1]);
        assert_eq!(alstom, vec!["Alstom SE", "", "Alstom", "rule", "1.0000"]);

        let unresolved = report.output_row(&report.rows[3]);
        assert_eq!(unresolved[3], "none");
        assert_eq!(unresolved[4], "");
    }
}
