//! サプライヤー名解決モジュール
//!
//! クレンジング → ルール適用 → 類似度照合 → 閾値判定 の順に処理し、
//! カタログ上の正式名称を返す。
//!
//! ## 処理フロー
//! 1. 名称をクレンジング
//! 2. ルールが一致すれば置換先を即座に返す（閾値は適用しない）
//! 3. 類似度インデックスで最良候補を取得
//! 4. スコアが `min_score` 以上なら候補名、未満なら未解決（`None`）

use crate::cleanser::TextCleanser;
use crate::error::{Error, Result};
use crate::rules::{Rule, RuleSet};
use crate::similarity::{build_index_with, IndexStrategy, SimilarityIndex};
use serde::Serialize;

/// 既定の採用閾値
pub const DEFAULT_MIN_SCORE: f64 = 0.7;

/// 照合結果の出どころ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchSource {
    /// 置換ルール
    Rule,
    /// 類似度照合
    Similarity,
    /// 未解決
    None,
}

impl std::fmt::Display for MatchSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchSource::Rule => write!(f, "rule"),
            MatchSource::Similarity => write!(f, "similarity"),
            MatchSource::None => write!(f, "none"),
        }
    }
}

/// 1件分の照合結果
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// 入力された名称
    pub input: String,
    /// クレンジング後の名称
    pub cleansed: String,
    /// 解決した名称（未解決なら `None`）
    pub matched_name: Option<String>,
    /// スコア（ルール一致は 1.0、未解決時は意味を持たない）
    pub score: f64,
    pub source: MatchSource,
}

impl MatchResult {
    pub fn is_resolved(&self) -> bool {
        self.matched_name.is_some()
    }
}

/// 名称解決セッション
///
/// カタログ・ルール・閾値を保持し、類似度インデックスを一度だけ構築して
/// すべての問い合わせで共有する。カタログが変わった場合は作り直すこと。
pub struct Resolver {
    cleanser: TextCleanser,
    rules: RuleSet,
    index: Box<dyn SimilarityIndex>,
    min_score: f64,
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("rules", &self.rules.len())
            .field("catalog", &self.index.len())
            .field("min_score", &self.min_score)
            .finish()
    }
}

/// `Resolver` の構築用
#[derive(Debug, Clone)]
pub struct ResolverBuilder {
    catalog: Vec<String>,
    rules: Vec<Rule>,
    min_score: f64,
    strategy: IndexStrategy,
    cleanser: TextCleanser,
}

impl ResolverBuilder {
    pub fn rules(mut self, rules: &[Rule]) -> Self {
        self.rules = rules.to_vec();
        self
    }

    pub fn min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn strategy(mut self, strategy: IndexStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn cleanser(mut self, cleanser: TextCleanser) -> Self {
        self.cleanser = cleanser;
        self
    }

    /// ルールのコンパイルとインデックス構築を行う
    pub fn build(self) -> Result<Resolver> {
        if self.min_score.is_nan() {
            return Err(Error::Config("min_score must be a number".into()));
        }

        let rules = RuleSet::compile(&self.rules)?;
        let index = build_index_with(&self.catalog, &self.strategy, &self.cleanser)?;

        tracing::debug!(
            catalog = self.catalog.len(),
            rules = rules.len(),
            min_score = self.min_score,
            "名称解決セッションを作成"
        );

        Ok(Resolver {
            cleanser: self.cleanser,
            rules,
            index,
            min_score: self.min_score,
        })
    }
}

impl Resolver {
    pub fn builder<S: AsRef<str>>(catalog: &[S]) -> ResolverBuilder {
        ResolverBuilder {
            catalog: catalog.iter().map(|s| s.as_ref().to_string()).collect(),
            rules: Vec::new(),
            min_score: DEFAULT_MIN_SCORE,
            strategy: IndexStrategy::default(),
            cleanser: TextCleanser::default(),
        }
    }

    /// 既定の戦略でセッションを作成
    pub fn new<S: AsRef<str>>(catalog: &[S], rules: &[Rule], min_score: f64) -> Result<Self> {
        Self::builder(catalog).rules(rules).min_score(min_score).build()
    }

    pub fn min_score(&self) -> f64 {
        self.min_score
    }

    pub fn catalog_len(&self) -> usize {
        self.index.len()
    }

    pub fn cleanser(&self) -> &TextCleanser {
        &self.cleanser
    }

    /// 照合の詳細を返す
    pub fn match_name(&self, name: &str) -> MatchResult {
        let cleansed = self.cleanser.clean(name);

        if let Some(replacement) = self.rules.apply(&cleansed) {
            tracing::debug!(input = name, replacement, "ルール一致");
            return MatchResult {
                input: name.to_string(),
                matched_name: Some(replacement.to_string()),
                cleansed,
                score: 1.0,
                source: MatchSource::Rule,
            };
        }

        let unresolved = |cleansed: String| MatchResult {
            input: name.to_string(),
            cleansed,
            matched_name: None,
            score: 0.0,
            source: MatchSource::None,
        };

        if cleansed.is_empty() {
            return unresolved(cleansed);
        }

        match self.index.best_match(&cleansed, 1).into_iter().next() {
            Some(best) if best.score >= self.min_score => {
                tracing::debug!(input = name, matched = %best.name, score = best.score, "類似度一致");
                MatchResult {
                    input: name.to_string(),
                    cleansed,
                    matched_name: Some(best.name),
                    score: best.score,
                    source: MatchSource::Similarity,
                }
            }
            best => {
                tracing::debug!(
                    input = name,
                    best_score = best.map(|c| c.score).unwrap_or(0.0),
                    "閾値未満のため未解決"
                );
                unresolved(cleansed)
            }
        }
    }

    /// 1件の名称を解決する
    pub fn resolve(&self, name: &str) -> Option<String> {
        self.match_name(name).matched_name
    }

    /// 優先順に並んだ候補から最初に解決できた名称を返す
    ///
    /// 「仕入先名列Aが駄目なら列B」のような列フォールバックに使う。
    pub fn resolve_from_priority<S: AsRef<str>>(&self, names: &[S]) -> Option<String> {
        names.iter().find_map(|name| self.resolve(name.as_ref()))
    }

    /// 複数の名称をまとめて解決する（入力と同じ順序・件数）
    pub fn resolve_batch<S: AsRef<str>>(&self, names: &[S]) -> Vec<Option<String>> {
        names.iter().map(|name| self.resolve(name.as_ref())).collect()
    }
}

/// 1件の名称を解決する（インデックスはその場で構築）
pub fn resolve<S: AsRef<str>>(
    name: &str,
    catalog: &[S],
    rules: Option<&[Rule]>,
    min_score: f64,
) -> Result<Option<String>> {
    let resolver = Resolver::new(catalog, rules.unwrap_or(&[]), min_score)?;
    Ok(resolver.resolve(name))
}

/// 優先順の候補から解決する
pub fn resolve_from_priority<N: AsRef<str>, S: AsRef<str>>(
    names: &[N],
    catalog: &[S],
    rules: Option<&[Rule]>,
    min_score: f64,
) -> Result<Option<String>> {
    let resolver = Resolver::new(catalog, rules.unwrap_or(&[]), min_score)?;
    Ok(resolver.resolve_from_priority(names))
}

/// まとめて解決する（インデックスは一度だけ構築して共有）
pub fn resolve_batch<N: AsRef<str>, S: AsRef<str>>(
    names: &[N],
    catalog: &[S],
    rules: Option<&[Rule]>,
    min_score: f64,
) -> Result<Vec<Option<String>>> {
    let resolver = Resolver::new(catalog, rules.unwrap_or(&[]), min_score)?;
    Ok(resolver.resolve_batch(names))
}
