//! 数量の抽出・集計
//!
//! 指定シート群から「品名 → 数量合計」を作る。
//! 不正な行（品名が空、数量が数値でない等）は黙ってスキップし、
//! 表頭が見つからないシートは診断を残してスキップする。
//! `u64` に収まらない数量、および合計が `u64` を超える行もスキップ扱い。

use crate::cell::CellValue;
use crate::diagnostics::Diagnostic;
use crate::error::Result;
use crate::header::{resolve_header_at, HeaderColumns};
use crate::workbook::{Sheet, TabularSource};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// 品名 → 数量合計
pub type QuantityMap = BTreeMap<String, u64>;

/// 欠損値として扱う品名
pub const ABSENCE_MARKER: &str = "nan";

/// 抽出条件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractOptions {
    /// 表頭までにスキップする行数（0始まり。1なら2行目が表頭）
    pub header_row_offset: usize,
    pub name_label: String,
    pub quantity_label: String,
}

impl ExtractOptions {
    /// 盘点表: 2行目が表头、本次领用列
    pub fn inventory() -> Self {
        Self {
            header_row_offset: 1,
            name_label: "品名".into(),
            quantity_label: "本次领用".into(),
        }
    }

    /// 领用单: 3行目が表头、数量列
    pub fn requisition() -> Self {
        Self {
            header_row_offset: 2,
            name_label: "品名".into(),
            quantity_label: "数量".into(),
        }
    }
}

/// 抽出結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub quantities: QuantityMap,
    /// 集計対象になったシート
    pub sheets: Vec<String>,
    pub rows_counted: usize,
    pub rows_skipped: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// ファイルを開いて抽出する。ファイルが読めない場合のみエラー。
pub fn extract_file(path: &Path, sheet_names: &[String], options: &ExtractOptions) -> Result<Extraction> {
    let source = TabularSource::open(path)?;
    Ok(extract(&source, sheet_names, options))
}

/// 読み込み済みソースから抽出する
pub fn extract(source: &TabularSource, sheet_names: &[String], options: &ExtractOptions) -> Extraction {
    let mut extraction = Extraction::default();

    for sheet_name in sheet_names {
        let Some(sheet) = source.sheet(sheet_name) else {
            let diagnostic = source.missing_sheet_diagnostic(sheet_name);
            diagnostic.emit();
            extraction.diagnostics.push(diagnostic);
            continue;
        };

        let Some(header) = resolve_header_at(
            sheet,
            options.header_row_offset,
            &options.name_label,
            &options.quantity_label,
        ) else {
            let diagnostic = Diagnostic::HeaderNotFound {
                sheet: sheet_name.clone(),
                name_label: options.name_label.clone(),
                quantity_label: options.quantity_label.clone(),
            };
            diagnostic.emit();
            extraction.diagnostics.push(diagnostic);
            continue;
        };

        log::debug!(
            "extract '{}': header row {}, name col {}, quantity col {}",
            sheet_name,
            header.row,
            header.name_col,
            header.quantity_col
        );

        accumulate_sheet(sheet, &header, &mut extraction);
        extraction.sheets.push(sheet_name.clone());
    }

    log::info!(
        "extracted {} items from {} sheet(s) of {}",
        extraction.quantities.len(),
        extraction.sheets.len(),
        source.path.display()
    );

    extraction
}

fn accumulate_sheet(sheet: &Sheet, header: &HeaderColumns, extraction: &mut Extraction) {
    for row in header.first_data_row()..sheet.rows().len() {
        let name = sheet.cell(row, header.name_col);
        let quantity = sheet.cell(row, header.quantity_col);

        // 完全な空行は数えない
        if name.is_empty() && quantity.is_empty() {
            continue;
        }

        let Some((name, qty)) = parse_line(name, quantity) else {
            extraction.rows_skipped += 1;
            continue;
        };

        let total = extraction.quantities.entry(name).or_insert(0);
        match total.checked_add(qty) {
            Some(sum) => {
                *total = sum;
                extraction.rows_counted += 1;
            }
            None => {
                log::warn!(
                    "'{}' row {}: quantity total overflows, row skipped",
                    sheet.name,
                    row + 1
                );
                extraction.rows_skipped += 1;
            }
        }
    }
}

/// 1行を (品名, 数量) に変換する。無効な行は `None`。
pub fn parse_line(name: &CellValue, quantity: &CellValue) -> Option<(String, u64)> {
    let name = name.to_key();
    if name.is_empty() || name.eq_ignore_ascii_case(ABSENCE_MARKER) {
        return None;
    }

    let qty = quantity.as_number()?.trunc();
    // u64::MAX as f64 は 2^64 に丸められるので等号も範囲外
    if !qty.is_finite() || qty < 0.0 || qty >= u64::MAX as f64 {
        return None;
    }

    Some((name, qty as u64))
}
