//! 名称クレンジングモジュール
//!
//! サプライヤー名・荷受人名の表記ゆれを吸収するため、
//! 小文字化・アクセント除去・記号除去・法人格語の削除を行う。
//!
//! ## 処理フロー
//! 1. 小文字化
//! 2. NFD分解して結合文字（アクセント）を除去
//! 3. 分解できない文字の置換（ß → ss など）
//! 4. 区切り記号は空白、その他の記号は削除
//! 5. 法人格語（gmbh, inc, llc …）をトークン単位で削除

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// 既定の法人格語（複数語のものは空白区切り）
pub const DEFAULT_STOPWORDS: &[&str] = &[
    "gmbh co kg",
    "gmbh cokg",
    "gmbh co",
    "gmbh",
    "gmb",
    "gmh",
    "ltd",
    "sp z o o",
    "spz",
    "sp",
    "sas",
    "sa",
    "ab",
    "nv",
    "ag",
    "bv",
    "se",
    "kg",
    "inc",
    "llc",
];

/// 単語の区切りとして扱う記号
const SEPARATORS: &[char] = &['/', '-', '_', '&', '+', '\\', '|'];

lazy_static::lazy_static! {
    static ref DEFAULT_CLEANSER: TextCleanser = TextCleanser::default();
}

/// 名称クレンザー
///
/// 法人格語リストを保持する。リストは外部設定から差し替え可能。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextCleanser {
    /// トークン列に分解済みの法人格語（長い順）
    stopwords: Vec<Vec<String>>,
}

impl Default for TextCleanser {
    fn default() -> Self {
        Self::new(DEFAULT_STOPWORDS.iter().copied())
    }
}

impl TextCleanser {
    /// 法人格語リストを指定して作成
    ///
    /// 法人格語自体も同じ規則で正規化するため、"GmbH & Co. KG" のように
    /// 表記しても "gmbh co kg" として登録される。
    pub fn new<I, S>(stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut phrases: Vec<Vec<String>> = Vec::new();
        for word in stopwords {
            let tokens = tokenize(word.as_ref());
            if !tokens.is_empty() && !phrases.contains(&tokens) {
                phrases.push(tokens);
            }
        }
        // 最長一致を優先
        phrases.sort_by(|a, b| b.len().cmp(&a.len()));

        Self { stopwords: phrases }
    }

    /// 既定リストに追加の法人格語を加えて作成
    pub fn with_extra_stopwords<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words: Vec<String> = DEFAULT_STOPWORDS.iter().map(|s| s.to_string()).collect();
        words.extend(extra.into_iter().map(|s| s.as_ref().to_string()));
        Self::new(words)
    }

    /// 登録済みの法人格語（空白区切り）
    pub fn stopwords(&self) -> Vec<String> {
        self.stopwords.iter().map(|p| p.join(" ")).collect()
    }

    /// 名称をクレンジングする
    pub fn clean(&self, raw: &str) -> String {
        let mut tokens = tokenize(raw);

        // 削除で新たに法人格語が隣接する場合があるため、変化がなくなるまで繰り返す
        loop {
            let before = tokens.len();
            tokens = self.strip_stopwords(tokens);
            if tokens.len() == before {
                break;
            }
        }

        tokens.join(" ")
    }

    fn strip_stopwords(&self, tokens: Vec<String>) -> Vec<String> {
        let mut kept = Vec::with_capacity(tokens.len());
        let mut i = 0;

        while i < tokens.len() {
            let matched = self
                .stopwords
                .iter()
                .find(|phrase| tokens[i..].starts_with(phrase.as_slice()));

            match matched {
                Some(phrase) => i += phrase.len(),
                None => {
                    kept.push(tokens[i].clone());
                    i += 1;
                }
            }
        }

        kept
    }
}

/// 既定の法人格語リストでクレンジングする
pub fn clean(raw: &str) -> String {
    DEFAULT_CLEANSER.clean(raw)
}

/// クレンジング済み文字列を単語ごとに先頭大文字化する
///
/// 照合できなかった名称の表示用。
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// 文字単位の正規化を行い、トークンに分割する
///
/// 置換はNFD分解後の文字に適用する（"ǿ" → "ø" + 結合文字 → "o"）。
fn tokenize(raw: &str) -> Vec<String> {
    let lowered = raw.to_lowercase();

    let mut normalized = String::with_capacity(lowered.len());
    for c in lowered.nfd() {
        if is_combining_mark(c) {
            continue;
        }
        if let Some(replacement) = transliterate(c) {
            normalized.push_str(replacement);
        } else if c.is_alphanumeric() {
            normalized.push(c);
        } else if c.is_whitespace() || SEPARATORS.contains(&c) {
            normalized.push(' ');
        }
        // その他の記号は削除
    }

    normalized.split_whitespace().map(|s| s.to_string()).collect()
}

/// NFDで分解されない文字の置換
fn transliterate(c: char) -> Option<&'static str> {
    match c {
        'ß' => Some("ss"),
        'ø' => Some("o"),
        'æ' => Some("ae"),
        'œ' => Some("oe"),
        'ł' => Some("l"),
        'đ' => Some("d"),
        'þ' => Some("th"),
        'ı' => Some("i"),
        _ => None,
    }
}
