//! 一括クレンジングと出力の統合テスト
//!
//! ファイルから照合器を構築し、CSV/JSON/Excelに書き出して読み戻す

use indicatif::ProgressBar;
use supplier_cleanse::batch::{cleanse_table, BatchOptions, BatchReport};
use supplier_cleanse::cli::MatchArgs;
use supplier_cleanse::config::Config;
use supplier_cleanse::error::CleanseError;
use supplier_cleanse::export::{export_report, ExportFormat};
use supplier_cleanse::loader::read_table;
use supplier_cleanse::session::build_resolver;
use std::path::Path;
use tempfile::{tempdir, TempDir};

const CATALOG: &str = "name;count\nHubner;10\nAlstom;4\nDeutsche Bahn;7\n";

const RULES: &str = r#"rules:
  - type: startswith
    pattern: alstom
    replacement: Alstom
  - type: regex
    pattern: "h(?:ue|ü)bner"
    replacement: Hubner
"#;

const INPUT: &str = "Id;Supplier;Consignee\n\
                     1;Huebner GmbH;\n\
                     2;;ALSTOM SE\n\
                     3;Random Corp;Deutche Bahn\n\
                     4;Acme Spedition;\n";

fn run_batch(dir: &TempDir, keep_cleansed: bool) -> BatchReport {
    let catalog = dir.path().join("CONSIGNEE_NAME.csv");
    let rules = dir.path().join("rules.yaml");
    let input = dir.path().join("shipments.csv");
    std::fs::write(&catalog, CATALOG).unwrap();
    std::fs::write(&rules, RULES).unwrap();
    std::fs::write(&input, INPUT).unwrap();

    let args = MatchArgs {
        catalog: Some(catalog),
        rules: Some(rules),
        ..Default::default()
    };
    let resolver = build_resolver(&Config::default(), &args).expect("照合器構築失敗");

    let table = read_table(&input, b';').unwrap();
    let options = BatchOptions {
        columns: vec!["Supplier".to_string(), "Consignee".to_string()],
        keep_cleansed,
    };
    cleanse_table(&table, &resolver, &options, &ProgressBar::hidden()).expect("一括処理失敗")
}

fn resolved_column(path: &Path, delimiter: u8) -> Vec<String> {
    let table = read_table(path, delimiter).unwrap();
    let column = table.column_index("resolved_name").unwrap();
    (0..table.len()).map(|row| table.cell(row, column).to_string()).collect()
}

#[test]
fn test_batch_resolution() {
    let dir = tempdir().expect("Failed to create temp dir");
    let report = run_batch(&dir, false);

    let names: Vec<&str> = report.rows.iter().map(|r| r.output_name.as_str()).collect();
    assert_eq!(names, vec!["Hubner", "Alstom", "Deutsche Bahn", ""]);
    assert_eq!(report.stats.by_rule, 2);
    assert_eq!(report.stats.by_similarity, 1);
    assert_eq!(report.stats.unresolved, 1);
}

#[test]
fn test_export_csv() {
    let dir = tempdir().expect("Failed to create temp dir");
    let report = run_batch(&dir, true);
    let output = dir.path().join("out").join("result.csv");

    let format = export_report(&report, &output, b';').expect("CSV出力失敗");
    assert_eq!(format, ExportFormat::Csv);

    let table = read_table(&output, b';').unwrap();
    assert_eq!(
        table.headers,
        vec!["Id", "Supplier", "Consignee", "resolved_name", "match_source", "match_score"]
    );
    assert_eq!(
        resolved_column(&output, b';'),
        vec!["Hubner", "Alstom", "Deutsche Bahn", "Acme Spedition"]
    );
    assert_eq!(table.cell(0, 4), "rule");
    assert_eq!(table.cell(0, 5), "1.0000");
    assert_eq!(table.cell(3, 4), "none");
    assert_eq!(table.cell(3, 5), "");
}

#[test]
fn test_export_json() {
    let dir = tempdir().expect("Failed to create temp dir");
    let report = run_batch(&dir, false);
    let output = dir.path().join("result.json");

    export_report(&report, &output, b';').expect("JSON出力失敗");

    let content = std::fs::read_to_string(&output).unwrap();
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();

    assert_eq!(json["summary"]["total_rows"], 4);
    assert_eq!(json["summary"]["by_rule"], 2);
    assert_eq!(json["rows"][0]["resolved_name"], "Hubner");
    assert_eq!(json["rows"][0]["input"]["Supplier"], "Huebner GmbH");
    assert_eq!(json["rows"][2]["match_source"], "similarity");
    assert!(json["rows"][3]["resolved_name"].is_null());
    assert!(json["generated_at"].is_string());
}

#[test]
fn test_export_excel() {
    let dir = tempdir().expect("Failed to create temp dir");
    let report = run_batch(&dir, false);
    let output = dir.path().join("result.xlsx");

    let format = export_report(&report, &output, b';').expect("Excel出力失敗");
    assert_eq!(format, ExportFormat::Excel);
    assert!(output.exists());

    let table = read_table(&output, b';').unwrap();
    assert_eq!(table.len(), 4);
    assert_eq!(table.cell(1, table.column_index("resolved_name").unwrap()), "Alstom");
    assert_eq!(table.cell(2, table.column_index("match_source").unwrap()), "similarity");
}

#[test]
fn test_export_unsupported_format() {
    let dir = tempdir().expect("Failed to create temp dir");
    let report = run_batch(&dir, false);

    let result = export_report(&report, &dir.path().join("result.pdf"), b';');
    assert!(matches!(result, Err(CleanseError::UnsupportedFormat(_))));
}
