//! 置換ルールYAMLの読み込み
//!
//! ```yaml
//! rules:
//!   - type: startswith
//!     pattern: alstom
//!     replacement: Alstom
//!   - type: regex
//!     pattern: "h(?:ue|ü)bner"
//!     replacement: Hubner
//! ```

use super::ensure_exists;
use crate::error::Result;
use serde::Deserialize;
use std::path::Path;
use supplier_cleanse_common::{Rule, RuleSet};

#[derive(Debug, Deserialize)]
struct RulesFile {
    #[serde(default)]
    rules: Option<Vec<RawRule>>,
}

/// ファイル上のルール（種類は文字列のまま）
#[derive(Debug, Deserialize)]
struct RawRule {
    #[serde(rename = "type")]
    kind: String,
    pattern: String,
    replacement: String,
}

pub fn load_rules(path: &Path) -> Result<Vec<Rule>> {
    ensure_exists(path)?;
    let content = std::fs::read_to_string(path)?;
    let rules = parse_rules(&content)?;
    tracing::info!(path = %path.display(), rules = rules.len(), "ルールを読み込み");
    Ok(rules)
}

/// YAML文字列からルールを読み込む
///
/// 種類名と正規表現はこの時点で検証する。
pub fn parse_rules(content: &str) -> Result<Vec<Rule>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let file: Option<RulesFile> = serde_yaml::from_str(content)?;
    let raw_rules = file.and_then(|f| f.rules).unwrap_or_default();

    let rules = raw_rules
        .into_iter()
        .map(|raw| Rule::parse(&raw.kind, raw.pattern, raw.replacement))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    RuleSet::compile(&rules)?;

    Ok(rules)
}
