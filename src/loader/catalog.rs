//! 既知名称カタログの読み込み

use super::ensure_exists;
use crate::error::Result;
use std::io::Read;
use std::path::Path;

/// カタログCSVを読み込む
///
/// 1行目はヘッダーとして読み飛ばす。空の名称は除外する。
pub fn load_catalog(path: &Path) -> Result<Vec<String>> {
    ensure_exists(path)?;
    let file = std::fs::File::open(path)?;
    let names = read_catalog(file)?;
    tracing::info!(path = %path.display(), entries = names.len(), "カタログを読み込み");
    Ok(names)
}

/// 任意のリーダーからカタログを読み込む
pub fn read_catalog<R: Read>(reader: R) -> Result<Vec<String>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut names = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        if let Some(name) = record.get(0).map(str::trim) {
            if !name.is_empty() {
                names.push(name.to_string());
            }
        }
    }

    Ok(names)
}
