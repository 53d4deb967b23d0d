//! 文字n-gram TF-IDFインデックス
//!
//! カタログの各名称をTF-IDFベクトル（L2正規化）に変換して保持し、
//! 問い合わせごとに全件とのコサイン類似度を計算する。
//! IDFは平滑化版 `ln((1 + N) / (1 + df)) + 1` を用いる。

use super::{rank, Analyzer, Candidate, SimilarityIndex, TfidfParams};
use crate::cleanser::TextCleanser;
use crate::error::Result;
use std::collections::{BTreeMap, HashMap, HashSet};

/// 疎ベクトル（語彙ID昇順）
type SparseVector = Vec<(usize, f64)>;

/// TF-IDFインデックス
#[derive(Debug, Clone)]
pub struct TfidfIndex {
    /// カタログ上の名称
    names: Vec<String>,
    /// クレンジング済み名称
    cleansed: Vec<String>,
    /// n-gram → 語彙ID
    vocabulary: HashMap<String, usize>,
    /// 語彙IDごとのIDF
    idf: Vec<f64>,
    /// カタログ各行のベクトル
    vectors: Vec<SparseVector>,
    params: TfidfParams,
    cleanser: TextCleanser,
}

impl TfidfIndex {
    /// 既定のクレンザーで構築
    pub fn build<S: AsRef<str>>(catalog: &[S], params: TfidfParams) -> Result<Self> {
        Self::build_with(catalog, params, TextCleanser::default())
    }

    /// クレンザーを指定して構築
    pub fn build_with<S: AsRef<str>>(
        catalog: &[S],
        params: TfidfParams,
        cleanser: TextCleanser,
    ) -> Result<Self> {
        params.validate()?;

        let names: Vec<String> = catalog.iter().map(|s| s.as_ref().to_string()).collect();
        let cleansed: Vec<String> = names.iter().map(|n| cleanser.clean(n)).collect();

        // 語彙は出現順にIDを振る
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut document_frequency: Vec<usize> = Vec::new();

        for text in &cleansed {
            let mut seen: HashSet<usize> = HashSet::new();
            for gram in ngrams(text, &params) {
                let next_id = vocabulary.len();
                let id = *vocabulary.entry(gram).or_insert(next_id);
                if id == document_frequency.len() {
                    document_frequency.push(0);
                }
                if seen.insert(id) {
                    document_frequency[id] += 1;
                }
            }
        }

        let n_documents = cleansed.len() as f64;
        let idf: Vec<f64> = document_frequency
            .iter()
            .map(|&df| ((1.0 + n_documents) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let mut index = Self {
            names,
            cleansed,
            vocabulary,
            idf,
            vectors: Vec::new(),
            params,
            cleanser,
        };
        index.vectors = index
            .cleansed
            .iter()
            .map(|text| index.vectorize(text))
            .collect();

        tracing::debug!(
            entries = index.names.len(),
            vocabulary = index.vocabulary.len(),
            "TF-IDFインデックスを構築"
        );

        Ok(index)
    }

    /// クレンジング済み文字列をベクトル化する（語彙外のn-gramは無視）
    fn vectorize(&self, cleansed: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
        for gram in ngrams(cleansed, &self.params) {
            if let Some(&id) = self.vocabulary.get(&gram) {
                *counts.entry(id).or_insert(0) += 1;
            }
        }

        let mut vector: SparseVector = counts
            .into_iter()
            .map(|(id, count)| (id, count as f64 * self.idf[id]))
            .collect();

        let norm = vector.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, weight) in vector.iter_mut() {
                *weight /= norm;
            }
        }

        vector
    }

    /// 全カタログ行とのスコア
    fn scores(&self, query: &str) -> Vec<f64> {
        let cleansed = self.cleanser.clean(query);
        let query_vector = self.vectorize(&cleansed);

        self.vectors
            .iter()
            .zip(&self.cleansed)
            .map(|(vector, entry)| {
                if *entry == cleansed {
                    1.0
                } else {
                    dot(&query_vector, vector)
                }
            })
            .collect()
    }
}

impl SimilarityIndex for TfidfIndex {
    fn best_match(&self, query: &str, top_k: usize) -> Vec<Candidate> {
        rank(&self.names, self.scores(query), top_k)
    }

    fn len(&self) -> usize {
        self.names.len()
    }
}

/// 語彙ID昇順の疎ベクトル同士の内積
fn dot(a: &SparseVector, b: &SparseVector) -> f64 {
    let (mut i, mut j) = (0, 0);
    let mut sum = 0.0;

    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                sum += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }

    sum
}

/// パラメータに従ってn-gramを切り出す
fn ngrams(text: &str, params: &TfidfParams) -> Vec<String> {
    match params.analyzer {
        Analyzer::Char => char_ngrams(text, params.ngram_min, params.ngram_max),
        Analyzer::CharWb => char_wb_ngrams(text, params.ngram_min, params.ngram_max),
    }
}

/// 文字列全体からのn-gram（単語境界をまたぐ）
fn char_ngrams(text: &str, min_n: usize, max_n: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut grams = Vec::new();

    for n in min_n..=max_n {
        if n > chars.len() {
            break;
        }
        for window in chars.windows(n) {
            grams.push(window.iter().collect());
        }
    }

    grams
}

/// 単語ごとのn-gram（前後に空白を付ける）
///
/// n-gram長より短い単語は単語全体を1回だけ数える。
fn char_wb_ngrams(text: &str, min_n: usize, max_n: usize) -> Vec<String> {
    let mut grams = Vec::new();

    for word in text.split_whitespace() {
        let padded: Vec<char> = std::iter::once(' ')
            .chain(word.chars())
            .chain(std::iter::once(' '))
            .collect();
        let len = padded.len();

        for n in min_n..=max_n {
            let mut offset = 0;
            grams.push(padded[offset..(offset + n).min(len)].iter().collect());
            while offset + n < len {
                offset += 1;
                grams.push(padded[offset..offset + n].iter().collect());
            }
            if offset == 0 {
                break;
            }
        }
    }

    grams
}
