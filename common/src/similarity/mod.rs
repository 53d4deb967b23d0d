//! 類似度インデックスモジュール
//!
//! 既知名称カタログに対する近似照合を提供する。
//!
//! ## 戦略
//! - `Tfidf`: 文字n-gramのTF-IDFベクトルとコサイン類似度（構築後に再利用）
//! - `Ratio`: 最長一致ブロックによる類似率（事前構築なし）
//!
//! どちらもクレンジング済み文字列を比較し、スコアは [0, 1]、
//! クレンジング後に完全一致なら 1.0 を返す。

pub mod ratio;
pub mod tfidf;

pub use ratio::RatioIndex;
pub use tfidf::TfidfIndex;

use crate::cleanser::TextCleanser;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// 照合候補
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// カタログ内の位置
    pub index: usize,
    /// カタログ上の名称（元の表記）
    pub name: String,
    /// 類似度 (0.0-1.0)
    pub score: f64,
}

/// 類似度インデックス
///
/// 構築後は読み取り専用のため、スレッド間で共有できる。
pub trait SimilarityIndex: Send + Sync {
    /// スコア降順で上位 `top_k` 件の候補を返す（同点はカタログ順）
    fn best_match(&self, query: &str, top_k: usize) -> Vec<Candidate>;

    /// カタログの件数
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// n-gramの切り出し方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Analyzer {
    /// 文字列全体から切り出す（単語境界をまたぐ）
    #[default]
    Char,
    /// 単語ごとに前後へ空白を付けて切り出す
    CharWb,
}

impl std::str::FromStr for Analyzer {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "char" => Ok(Analyzer::Char),
            "char_wb" | "charwb" | "char-wb" => Ok(Analyzer::CharWb),
            _ => Err(Error::Config(format!(
                "Unknown analyzer: {}. Use char or char_wb",
                s
            ))),
        }
    }
}

impl std::fmt::Display for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Analyzer::Char => write!(f, "char"),
            Analyzer::CharWb => write!(f, "char_wb"),
        }
    }
}

/// TF-IDFインデックスのパラメータ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TfidfParams {
    pub analyzer: Analyzer,
    pub ngram_min: usize,
    pub ngram_max: usize,
}

impl Default for TfidfParams {
    fn default() -> Self {
        Self {
            analyzer: Analyzer::Char,
            ngram_min: 2,
            ngram_max: 4,
        }
    }
}

impl TfidfParams {
    pub fn validate(&self) -> Result<()> {
        if self.ngram_min == 0 || self.ngram_min > self.ngram_max {
            return Err(Error::Config(format!(
                "Invalid n-gram range: {}-{}",
                self.ngram_min, self.ngram_max
            )));
        }
        Ok(())
    }
}

/// インデックスの戦略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexStrategy {
    Tfidf(TfidfParams),
    Ratio,
}

impl Default for IndexStrategy {
    fn default() -> Self {
        IndexStrategy::Tfidf(TfidfParams::default())
    }
}

/// 既定のクレンザーでインデックスを構築する
pub fn build_index<S: AsRef<str>>(
    catalog: &[S],
    strategy: &IndexStrategy,
) -> Result<Box<dyn SimilarityIndex>> {
    build_index_with(catalog, strategy, &TextCleanser::default())
}

/// クレンザーを指定してインデックスを構築する
pub fn build_index_with<S: AsRef<str>>(
    catalog: &[S],
    strategy: &IndexStrategy,
    cleanser: &TextCleanser,
) -> Result<Box<dyn SimilarityIndex>> {
    match strategy {
        IndexStrategy::Tfidf(params) => Ok(Box::new(TfidfIndex::build_with(
            catalog,
            *params,
            cleanser.clone(),
        )?)),
        IndexStrategy::Ratio => Ok(Box::new(RatioIndex::build_with(catalog, cleanser.clone()))),
    }
}

/// スコア降順に並べ替えて上位を返す
///
/// 安定ソートのため、同点はカタログ順が保たれる。
pub(crate) fn rank(names: &[String], scores: Vec<f64>, top_k: usize) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = scores
        .into_iter()
        .enumerate()
        .map(|(index, score)| Candidate {
            index,
            name: names[index].clone(),
            score: score.clamp(0.0, 1.0),
        })
        .collect();

    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    candidates.truncate(top_k);
    candidates
}
