use crate::config::Strategy;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use supplier_cleanse_common::Analyzer;

#[derive(Parser)]
#[command(name = "supplier-cleanse")]
#[command(about = "取引先名称のクレンジング・名寄せツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// 照合に関する共通オプション（未指定の項目は設定ファイルの値）
#[derive(Args, Debug, Clone, Default)]
pub struct MatchArgs {
    /// 既知名称カタログ（セミコロン区切りCSV）
    #[arg(short, long)]
    pub catalog: Option<PathBuf>,

    /// 置換ルールファイル（YAML）
    #[arg(short, long)]
    pub rules: Option<PathBuf>,

    /// 採用する最低スコア（0.0-1.0）
    #[arg(long)]
    pub min_score: Option<f64>,

    /// 類似度方式 (tfidf/ratio)
    #[arg(long)]
    pub strategy: Option<Strategy>,

    /// n-gram の切り出し方 (char/char_wb)
    #[arg(long)]
    pub analyzer: Option<Analyzer>,

    /// 置換ルールを使用しない
    #[arg(long)]
    pub no_rules: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 名称をクレンジングして表示
    Clean {
        /// 対象の名称
        #[arg(required = true)]
        texts: Vec<String>,
    },

    /// 名称をカタログの正式名称に解決
    Resolve {
        /// 対象の名称
        #[arg(required = true)]
        names: Vec<String>,

        #[command(flatten)]
        matching: MatchArgs,

        /// スコアと照合元を表示
        #[arg(long)]
        explain: bool,
    },

    /// 優先順の候補から最初に解決できた名称を表示
    Priority {
        /// 候補の名称（優先順）
        #[arg(required = true)]
        names: Vec<String>,

        #[command(flatten)]
        matching: MatchArgs,
    },

    /// 表ファイル（CSV/Excel）を一括クレンジング
    Batch {
        /// 入力ファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 名称列（優先順に複数指定可）
        #[arg(short = 'C', long = "column", required = true)]
        columns: Vec<String>,

        /// 出力ファイル（csv/json/xlsx、省略時は 入力名_cleansed.csv）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// CSVの区切り文字
        #[arg(short, long, default_value = ";")]
        delimiter: char,

        /// 未解決の行にクレンジング結果を出力
        #[arg(long)]
        keep_cleansed: bool,

        #[command(flatten)]
        matching: MatchArgs,
    },

    /// 地点の座標を表示
    Geoloc {
        /// 地点名
        #[arg(required = true)]
        names: Vec<String>,

        /// 座標ファイル（YAML）
        #[arg(short, long)]
        geoloc: Option<PathBuf>,

        /// 未登録の地点をエラーにする
        #[arg(long)]
        strict: bool,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// カタログファイルを設定
        #[arg(long)]
        set_catalog: Option<PathBuf>,

        /// ルールファイルを設定
        #[arg(long)]
        set_rules: Option<PathBuf>,

        /// 座標ファイルを設定
        #[arg(long)]
        set_geoloc: Option<PathBuf>,

        /// 最低スコアを設定
        #[arg(long)]
        set_min_score: Option<f64>,

        /// 類似度方式を設定
        #[arg(long)]
        set_strategy: Option<Strategy>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_batch_columns() {
        let cli = Cli::try_parse_from([
            "supplier-cleanse",
            "batch",
            "shipments.csv",
            "-C",
            "Supplier",
            "-C",
            "Consignee",
            "--min-score",
            "0.8",
            "--strategy",
            "ratio",
        ])
        .unwrap();

        match cli.command {
            Commands::Batch {
                columns,
                delimiter,
                matching,
                ..
            } => {
                assert_eq!(columns, vec!["Supplier", "Consignee"]);
                assert_eq!(delimiter, ';');
                assert_eq!(matching.min_score, Some(0.8));
                assert_eq!(matching.strategy, Some(Strategy::Ratio));
            }
            _ => panic!("batch として解析されていない"),
        }
    }

    #[test]
    fn test_parse_resolve_analyzer() {
        let cli = Cli::try_parse_from([
            "supplier-cleanse",
            "-v",
            "resolve",
            "Deutche Bahn",
            "--analyzer",
            "char_wb",
            "--explain",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Resolve { names, matching, explain } => {
                assert_eq!(names, vec!["Deutche Bahn"]);
                assert_eq!(matching.analyzer, Some(Analyzer::CharWb));
                assert!(explain);
            }
            _ => panic!("resolve として解析されていない"),
        }
    }

    #[test]
    fn test_batch_requires_column() {
        assert!(Cli::try_parse_from(["supplier-cleanse", "batch", "in.csv"]).is_err());
    }
}
