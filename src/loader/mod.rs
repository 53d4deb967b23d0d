//! 入力ファイル読み込みモジュール
//!
//! - カタログ: セミコロン区切りCSV（1列目が正式名称、2列目の件数は無視）
//! - ルール: YAML（`rules:` 配下に type/pattern/replacement）
//! - 一括処理の入力表: CSV / Excel

pub mod catalog;
pub mod rules;
pub mod table;

pub use catalog::{load_catalog, read_catalog};
pub use rules::{load_rules, parse_rules};
pub use table::{read_table, Table};

use crate::error::{CleanseError, Result};
use std::path::Path;

/// ファイルの存在確認
fn ensure_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(CleanseError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}
