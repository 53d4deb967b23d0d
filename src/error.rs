use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleanseError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("列が見つかりません: {0}")]
    ColumnNotFound(String),

    #[error("座標が登録されていません: {0}")]
    UnknownLocation(String),

    #[error("未対応のファイル形式: {0}")]
    UnsupportedFormat(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("YAML解析エラー: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("CSV処理エラー: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel読み込みエラー: {0}")]
    ExcelRead(#[from] calamine::Error),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(#[from] rust_xlsxwriter::XlsxError),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] supplier_cleanse_common::Error),
}

pub type Result<T> = std::result::Result<T, CleanseError>;
