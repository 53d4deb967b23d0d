//! 一括処理の入力表（CSV / Excel）

use super::ensure_exists;
use crate::error::{CleanseError, Result};
use calamine::{open_workbook_auto, Reader};
use std::io::Read;
use std::path::Path;

const EXCEL_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// ヘッダー付きの表
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// 列名から列番号を取得（前後の空白・大文字小文字は無視）
    pub fn column_index(&self, name: &str) -> Result<usize> {
        let wanted = name.trim().to_lowercase();
        self.headers
            .iter()
            .position(|h| h.trim().to_lowercase() == wanted)
            .ok_or_else(|| CleanseError::ColumnNotFound(name.to_string()))
    }

    /// セルの値（行が短い場合は空文字）
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(|s| s.as_str())
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// 拡張子に応じてCSVまたはExcelを読み込む
pub fn read_table(path: &Path, delimiter: u8) -> Result<Table> {
    ensure_exists(path)?;

    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let table = if EXCEL_EXTENSIONS.contains(&extension.as_str()) {
        read_workbook(path)?
    } else {
        read_csv(std::fs::File::open(path)?, delimiter)?
    };

    tracing::info!(path = %path.display(), rows = table.len(), "入力表を読み込み");
    Ok(table)
}

/// CSVを読み込む
pub fn read_csv<R: Read>(reader: R, delimiter: u8) -> Result<Table> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(record.iter().map(|v| v.to_string()).collect());
    }

    Ok(Table { headers, rows })
}

/// Excelの先頭シートを読み込む（1行目をヘッダーとする）
fn read_workbook(path: &Path) -> Result<Table> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| CleanseError::Config(format!("シートがありません: {}", path.display())))??;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<String>>());

    let headers = rows.next().unwrap_or_default();
    Ok(Table {
        headers,
        rows: rows.collect(),
    })
}
