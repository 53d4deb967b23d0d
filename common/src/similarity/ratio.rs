//! 類似率による照合（インデックスなし）
//!
//! 最長一致ブロックを再帰的に探し、一致文字数 M から
//! `2 * M / (|a| + |b|)` を類似率とする。

use super::{rank, Candidate, SimilarityIndex};
use crate::cleanser::TextCleanser;

/// 類似率による照合器
///
/// カタログのクレンジング結果のみ保持し、問い合わせごとに全件を比較する。
#[derive(Debug, Clone)]
pub struct RatioIndex {
    names: Vec<String>,
    cleansed: Vec<Vec<char>>,
    cleanser: TextCleanser,
}

impl RatioIndex {
    pub fn build<S: AsRef<str>>(catalog: &[S]) -> Self {
        Self::build_with(catalog, TextCleanser::default())
    }

    pub fn build_with<S: AsRef<str>>(catalog: &[S], cleanser: TextCleanser) -> Self {
        let names: Vec<String> = catalog.iter().map(|s| s.as_ref().to_string()).collect();
        let cleansed = names
            .iter()
            .map(|n| cleanser.clean(n).chars().collect())
            .collect();

        Self {
            names,
            cleansed,
            cleanser,
        }
    }
}

impl SimilarityIndex for RatioIndex {
    fn best_match(&self, query: &str, top_k: usize) -> Vec<Candidate> {
        let query: Vec<char> = self.cleanser.clean(query).chars().collect();
        let scores = self
            .cleansed
            .iter()
            .map(|candidate| char_ratio(&query, candidate))
            .collect();

        rank(&self.names, scores, top_k)
    }

    fn len(&self) -> usize {
        self.names.len()
    }
}

/// 2つの文字列の類似率 (0.0-1.0)
fn char_ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_characters(a, b) as f64 / total as f64
}

/// 一致ブロックの文字数合計
fn matching_characters(a: &[char], b: &[char]) -> usize {
    let mut total = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((a_lo, a_hi, b_lo, b_hi)) = pending.pop() {
        let (i, j, size) = longest_match(a, b, a_lo, a_hi, b_lo, b_hi);
        if size == 0 {
            continue;
        }

        total += size;
        if a_lo < i && b_lo < j {
            pending.push((a_lo, i, b_lo, j));
        }
        if i + size < a_hi && j + size < b_hi {
            pending.push((i + size, a_hi, j + size, b_hi));
        }
    }

    total
}

/// 範囲内の最長一致ブロック (aの開始位置, bの開始位置, 長さ)
///
/// 同じ長さの場合は a 側、次いで b 側で先に現れるものを返す。
fn longest_match(
    a: &[char],
    b: &[char],
    a_lo: usize,
    a_hi: usize,
    b_lo: usize,
    b_hi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (a_lo, b_lo, 0);

    // 直前行の「b[j]で終わる一致長」
    let mut previous = vec![0usize; b_hi - b_lo + 1];
    let mut current = vec![0usize; b_hi - b_lo + 1];

    for i in a_lo..a_hi {
        for j in b_lo..b_hi {
            let k = j - b_lo + 1;
            if a[i] == b[j] {
                current[k] = previous[k - 1] + 1;
                if current[k] > best_size {
                    best_size = current[k];
                    best_i = i + 1 - best_size;
                    best_j = j + 1 - best_size;
                }
            } else {
                current[k] = 0;
            }
        }
        std::mem::swap(&mut previous, &mut current);
    }

    (best_i, best_j, best_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequence_ratio(a: &str, b: &str) -> f64 {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        char_ratio(&a, &b)
    }

    #[test]
    fn test_sequence_ratio_identical() {
        assert_eq!(sequence_ratio("alstom", "alstom"), 1.0);
        assert_eq!(sequence_ratio("", ""), 1.0);
    }

    #[test]
    fn test_sequence_ratio_disjoint() {
        assert_eq!(sequence_ratio("abc", "xyz"), 0.0);
        assert_eq!(sequence_ratio("abc", ""), 0.0);
    }

    #[test]
    fn test_sequence_ratio_known_values() {
        // 一致 "abc" + "e" → 2 * 4 / 10
        assert!((sequence_ratio("abcde", "abcxe") - 0.8).abs() < 1e-12);
        assert!((sequence_ratio("deutche bahn", "deutsche bahn") - 0.96).abs() < 1e-12);
    }

    #[test]
    fn test_sequence_ratio_prefers_leftmost_block() {
        // "ab" が2か所で一致しても合計は変わらない
        assert!((sequence_ratio("ab", "abab") - 2.0 * 2.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_ratio_index_best_match() {
        let index = RatioIndex::build(&["Knorr Bremse", "Alstom"]);
        let best = index.best_match("Knor Bremse GmbH", 1);
        assert_eq!(best[0].name, "Knorr Bremse");
        assert!(best[0].score > 0.9);
    }

    #[test]
    fn test_ratio_index_exact() {
        let index = RatioIndex::build(&["Hubner", "Alstom"]);
        let best = index.best_match("Hübner", 2);
        assert_eq!(best[0].name, "Hubner");
        assert_eq!(best[0].score, 1.0);
        assert_eq!(index.len(), 2);
    }
}
