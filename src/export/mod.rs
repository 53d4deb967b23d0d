//! 一括処理結果の出力
//!
//! 出力形式は拡張子で決める（csv / json / xlsx）。

pub mod csv;
pub mod excel;
pub mod json;

use crate::batch::BatchReport;
use crate::error::{CleanseError, Result};
use std::path::Path;

/// 出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Excel,
}

impl ExportFormat {
    /// 拡張子から出力形式を判定
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" | "txt" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "xlsx" => Ok(ExportFormat::Excel),
            _ => Err(CleanseError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "CSV"),
            ExportFormat::Json => write!(f, "JSON"),
            ExportFormat::Excel => write!(f, "Excel"),
        }
    }
}

/// 一括処理結果を書き出す
///
/// CSVの区切り文字は入力と同じものを使う。
pub fn export_report(report: &BatchReport, output: &Path, delimiter: u8) -> Result<ExportFormat> {
    let format = ExportFormat::from_path(output)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    match format {
        ExportFormat::Csv => csv::write_csv(report, output, delimiter)?,
        ExportFormat::Json => json::write_json(report, output)?,
        ExportFormat::Excel => excel::write_excel(report, output)?,
    }

    tracing::info!(path = %output.display(), format = %format, "結果を出力");
    Ok(format)
}
