//! 置換ルールモジュール
//!
//! クレンジング済みの名称に対して、定義順にルールを評価し
//! 最初に一致したルールの置換先を返す。ルールは類似度照合より優先される。

use crate::error::{Error, Result};
use regex::{Regex, RegexBuilder};
use std::str::FromStr;

/// ルールの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// 完全一致
    Equals,
    /// 正規表現（大文字小文字を区別しない部分検索）
    Regex,
    /// 前方一致
    StartsWith,
    /// 部分一致
    Contains,
}

impl FromStr for RuleKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "equals" => Ok(RuleKind::Equals),
            "regex" => Ok(RuleKind::Regex),
            "startswith" => Ok(RuleKind::StartsWith),
            "contains" => Ok(RuleKind::Contains),
            _ => Err(Error::InvalidRuleKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleKind::Equals => write!(f, "equals"),
            RuleKind::Regex => write!(f, "regex"),
            RuleKind::StartsWith => write!(f, "startswith"),
            RuleKind::Contains => write!(f, "contains"),
        }
    }
}

/// 置換ルール定義
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub kind: RuleKind,
    pub pattern: String,
    pub replacement: String,
}

impl Rule {
    pub fn new(kind: RuleKind, pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            kind,
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }

    /// 文字列の種類名から作成（設定ファイル読み込み用）
    pub fn parse(
        kind: &str,
        pattern: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self::new(kind.parse()?, pattern, replacement))
    }
}

/// 判定部分
#[derive(Debug, Clone)]
enum Condition {
    Equals(String),
    Regex(Regex),
    StartsWith(String),
    Contains(String),
}

impl Condition {
    fn holds(&self, cleansed: &str) -> bool {
        match self {
            Condition::Equals(pattern) => cleansed == pattern,
            Condition::Regex(re) => re.is_match(cleansed),
            Condition::StartsWith(pattern) => cleansed.starts_with(pattern.as_str()),
            Condition::Contains(pattern) => cleansed.contains(pattern.as_str()),
        }
    }
}

#[derive(Debug, Clone)]
struct CompiledRule {
    condition: Condition,
    replacement: String,
}

/// コンパイル済みルール集合
///
/// 正規表現は作成時に一度だけコンパイルされる。
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
}

impl RuleSet {
    /// ルール定義をコンパイルする
    ///
    /// 文字列パターン（equals/startswith/contains）はクレンジング済みの
    /// 名称と比較するため小文字化して保持する。
    pub fn compile(rules: &[Rule]) -> Result<Self> {
        let mut compiled = Vec::with_capacity(rules.len());

        for rule in rules {
            let condition = match rule.kind {
                RuleKind::Equals => Condition::Equals(rule.pattern.to_lowercase()),
                RuleKind::StartsWith => Condition::StartsWith(rule.pattern.to_lowercase()),
                RuleKind::Contains => Condition::Contains(rule.pattern.to_lowercase()),
                RuleKind::Regex => {
                    let re = RegexBuilder::new(&rule.pattern)
                        .case_insensitive(true)
                        .build()
                        .map_err(|source| Error::InvalidPattern {
                            pattern: rule.pattern.clone(),
                            source,
                        })?;
                    Condition::Regex(re)
                }
            };

            compiled.push(CompiledRule {
                condition,
                replacement: rule.replacement.clone(),
            });
        }

        Ok(Self { rules: compiled })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// 最初に一致したルールの置換先を返す
    pub fn apply(&self, cleansed: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.condition.holds(cleansed))
            .map(|rule| rule.replacement.as_str())
    }
}

/// ルールを順に評価する（単発呼び出し用）
pub fn apply_rules(cleansed: &str, rules: &[Rule]) -> Result<Option<String>> {
    let set = RuleSet::compile(rules)?;
    Ok(set.apply(cleansed).map(|s| s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rules() -> Vec<Rule> {
        vec![
            Rule::new(RuleKind::StartsWith, "alstom", "Alstom"),
            Rule::new(RuleKind::Regex, r"h(?:ue|ü)bner", "Hubner"),
            Rule::new(RuleKind::Equals, "db", "Deutsche Bahn"),
            Rule::new(RuleKind::Contains, "bremse", "Knorr Bremse"),
        ]
    }

    #[test]
    fn test_rule_kind_from_str() {
        assert_eq!("equals".parse::<RuleKind>().unwrap(), RuleKind::Equals);
        assert_eq!("Regex".parse::<RuleKind>().unwrap(), RuleKind::Regex);
        assert_eq!("STARTSWITH".parse::<RuleKind>().unwrap(), RuleKind::StartsWith);
        assert_eq!(" contains ".parse::<RuleKind>().unwrap(), RuleKind::Contains);
    }

    #[test]
    fn test_rule_kind_invalid() {
        let err = "endswith".parse::<RuleKind>().unwrap_err();
        assert!(matches!(err, Error::InvalidRuleKind(ref k) if k == "endswith"));

        let err = Rule::parse("fuzzy", "x", "y").unwrap_err();
        assert!(matches!(err, Error::InvalidRuleKind(_)));
    }

    #[test]
    fn test_rule_kind_display_round_trip() {
        for kind in [RuleKind::Equals, RuleKind::Regex, RuleKind::StartsWith, RuleKind::Contains] {
            assert_eq!(kind.to_string().parse::<RuleKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_apply_each_kind() {
        let rules = sample_rules();
        assert_eq!(apply_rules("alstom transport", &rules).unwrap(), Some("Alstom".to_string()));
        assert_eq!(apply_rules("huebner", &rules).unwrap(), Some("Hubner".to_string()));
        assert_eq!(apply_rules("db", &rules).unwrap(), Some("Deutsche Bahn".to_string()));
        assert_eq!(apply_rules("knorr bremse rail", &rules).unwrap(), Some("Knorr Bremse".to_string()));
    }

    #[test]
    fn test_equals_is_exact() {
        let rules = sample_rules();
        // "db schenker" は equals "db" に一致しない
        assert_eq!(apply_rules("db schenker", &rules).unwrap(), None);
    }

    #[test]
    fn test_startswith_requires_prefix() {
        let rules = vec![Rule::new(RuleKind::StartsWith, "alstom", "Alstom")];
        assert_eq!(apply_rules("new alstom", &rules).unwrap(), None);
    }

    #[test]
    fn test_regex_is_search_and_case_insensitive() {
        let rules = vec![Rule::new(RuleKind::Regex, "SCHENKER", "DB Schenker")];
        assert_eq!(
            apply_rules("db schenker logistics", &rules).unwrap(),
            Some("DB Schenker".to_string())
        );
    }

    #[test]
    fn test_literal_patterns_are_lowercased() {
        let rules = vec![Rule::new(RuleKind::Equals, "Huebner", "Hubner")];
        assert_eq!(apply_rules("huebner", &rules).unwrap(), Some("Hubner".to_string()));
    }

    #[test]
    fn test_first_match_wins() {
        let rules = vec![
            Rule::new(RuleKind::Contains, "bahn", "Erste"),
            Rule::new(RuleKind::Equals, "deutsche bahn", "Zweite"),
        ];
        assert_eq!(apply_rules("deutsche bahn", &rules).unwrap(), Some("Erste".to_string()));
    }

    #[test]
    fn test_no_match_returns_none() {
        assert_eq!(apply_rules("random corp", &sample_rules()).unwrap(), None);
        assert_eq!(apply_rules("anything", &[]).unwrap(), None);
    }

    #[test]
    fn test_invalid_pattern() {
        let rules = vec![Rule::new(RuleKind::Regex, "h(ue", "Hubner")];
        let err = apply_rules("huebner", &rules).unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { ref pattern, .. } if pattern == "h(ue"));
    }

    #[test]
    fn test_invalid_pattern_fails_even_when_earlier_rule_matches() {
        // コンパイルは評価前に行うため、不正なルールは常に検出される
        let rules = vec![
            Rule::new(RuleKind::Equals, "alstom", "Alstom"),
            Rule::new(RuleKind::Regex, "[", "Broken"),
        ];
        assert!(RuleSet::compile(&rules).is_err());
    }

    #[test]
    fn test_rule_set_len() {
        let set = RuleSet::compile(&sample_rules()).unwrap();
        assert_eq!(set.len(), 4);
        assert!(!set.is_empty());
        assert!(RuleSet::default().is_empty());
    }
}
