//! Supplier Cleanse Common Library
//!
//! サプライヤー名・荷受人名の正規化コア。
//! クレンジング、置換ルール、類似度照合、名称解決を提供する。
//! ファイル入出力は行わない（CLI側で読み込んだデータを受け取る）。

pub mod cleanser;
pub mod error;
pub mod resolver;
pub mod rules;
pub mod similarity;

pub use cleanser::{clean, title_case, TextCleanser, DEFAULT_STOPWORDS};
pub use error::{Error, Result};
pub use resolver::{
    resolve, resolve_batch, resolve_from_priority, MatchResult, MatchSource, Resolver,
    ResolverBuilder, DEFAULT_MIN_SCORE,
};
pub use rules::{apply_rules, Rule, RuleKind, RuleSet};
pub use similarity::{
    build_index, build_index_with, Analyzer, Candidate, IndexStrategy, SimilarityIndex,
    TfidfParams,
};
