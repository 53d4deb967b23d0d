use crate::error::{CleanseError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use supplier_cleanse_common::{Analyzer, IndexStrategy, TextCleanser, TfidfParams, DEFAULT_MIN_SCORE};

/// 類似度照合の方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// 文字n-gram TF-IDF + コサイン類似度
    #[default]
    Tfidf,
    /// 最長一致ブロックの類似率
    Ratio,
}

impl std::str::FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tfidf" | "tf-idf" | "vector" => Ok(Strategy::Tfidf),
            "ratio" | "difflib" => Ok(Strategy::Ratio),
            _ => Err(format!("Unknown strategy: {}. Use tfidf or ratio", s)),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Tfidf => write!(f, "tfidf"),
            Strategy::Ratio => write!(f, "ratio"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 既知名称カタログ（セミコロン区切りCSV）
    pub catalog_path: Option<PathBuf>,
    /// 置換ルール（YAML）
    pub rules_path: Option<PathBuf>,
    /// 地点座標（YAML）
    pub geoloc_path: Option<PathBuf>,
    pub min_score: f64,
    pub strategy: Strategy,
    pub analyzer: Analyzer,
    pub ngram_min: usize,
    pub ngram_max: usize,
    /// 既定に追加する法人格語
    pub extra_stopwords: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        let params = TfidfParams::default();
        Self {
            catalog_path: None,
            rules_path: None,
            geoloc_path: None,
            min_score: DEFAULT_MIN_SCORE,
            strategy: Strategy::default(),
            analyzer: params.analyzer,
            ngram_min: params.ngram_min,
            ngram_max: params.ngram_max,
            extra_stopwords: Vec::new(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// 指定パスから読み込み（存在しなければ既定値）
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CleanseError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("supplier-cleanse").join("config.json"))
    }

    /// 値の妥当性を検証
    pub fn validate(&self) -> Result<()> {
        validate_min_score(self.min_score)?;
        self.tfidf_params().validate()?;
        Ok(())
    }

    pub fn tfidf_params(&self) -> TfidfParams {
        TfidfParams {
            analyzer: self.analyzer,
            ngram_min: self.ngram_min,
            ngram_max: self.ngram_max,
        }
    }

    pub fn index_strategy(&self) -> IndexStrategy {
        match self.strategy {
            Strategy::Tfidf => IndexStrategy::Tfidf(self.tfidf_params()),
            Strategy::Ratio => IndexStrategy::Ratio,
        }
    }

    pub fn cleanser(&self) -> TextCleanser {
        TextCleanser::with_extra_stopwords(&self.extra_stopwords)
    }
}

/// 閾値は 0.0-1.0 の範囲
pub fn validate_min_score(min_score: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&min_score) {
        return Err(CleanseError::Config(format!(
            "閾値は0.0〜1.0で指定してください: {}",
            min_score
        )));
    }
    Ok(())
}
