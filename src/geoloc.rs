//! 地点座標の参照モジュール
//!
//! 地点名 → [緯度, 経度] の対応表。大文字小文字を区別せずに引く。
//!
//! ```yaml
//! Hamburg: [53.5511, 9.9937]
//! "Frankfurt am Main": [50.1109, 8.6821]
//! ```

use crate::error::{CleanseError, Result};
use std::collections::HashMap;
use std::path::Path;

/// [緯度, 経度]
pub type Coordinates = [f64; 2];

/// 未登録の地点に返す座標
pub const UNKNOWN_LOCATION: Coordinates = [0.0, 0.0];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoTable {
    /// 大文字化した地点名 → 座標
    entries: HashMap<String, Coordinates>,
}

impl GeoTable {
    /// YAMLファイルから読み込み
    ///
    /// ファイルが存在しない場合はエラーにせず、空の表と警告メッセージを返す。
    pub fn load(path: &Path) -> Result<(Self, Vec<String>)> {
        let mut warnings = Vec::new();

        if !path.exists() {
            let message = format!("座標ファイルが見つかりません: {}", path.display());
            tracing::warn!("{}", message);
            warnings.push(message);
            return Ok((Self::default(), warnings));
        }

        let content = std::fs::read_to_string(path)?;
        let table = Self::from_yaml(&content)?;
        tracing::info!(path = %path.display(), entries = table.len(), "座標ファイルを読み込み");
        Ok((table, warnings))
    }

    /// YAML文字列から読み込み
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let raw: Option<HashMap<String, Coordinates>> = serde_yaml::from_str(content)?;
        let mut table = Self::default();
        for (name, coordinates) in raw.unwrap_or_default() {
            table.insert(&name, coordinates);
        }
        Ok(table)
    }

    pub fn insert(&mut self, name: &str, coordinates: Coordinates) {
        self.entries.insert(normalize_key(name), coordinates);
    }

    /// 座標を取得（未登録なら [0.0, 0.0]）
    pub fn get(&self, name: &str) -> Coordinates {
        self.get_or(name, UNKNOWN_LOCATION)
    }

    /// 座標を取得（未登録なら `default`）
    pub fn get_or(&self, name: &str, default: Coordinates) -> Coordinates {
        self.entries
            .get(&normalize_key(name))
            .copied()
            .unwrap_or(default)
    }

    /// 座標を取得（未登録ならエラー）
    pub fn try_get(&self, name: &str) -> Result<Coordinates> {
        self.entries
            .get(&normalize_key(name))
            .copied()
            .ok_or_else(|| CleanseError::UnknownLocation(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize_key(name: &str) -> String {
    name.trim().to_uppercase()
}
