//! stock-recon
//!
//! 盘点表・领用单の照合コア（stock-recon-common）を呼び出す表示側の層。
//! CLI・設定ファイル・実行パイプライン・テキスト出力を持つ。

pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;
