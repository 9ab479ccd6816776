//! 出力モジュール

pub mod xlsx_writer;

pub use xlsx_writer::{save_workbook, MarkerPalette};
