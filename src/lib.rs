//! supplier-cleanse
//!
//! 取引先名称のクレンジング・名寄せCLIのライブラリ部分。
//! 照合のコアは `supplier_cleanse_common`、ここではファイル入出力と設定を扱う。

pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod geoloc;
pub mod loader;
pub mod session;
