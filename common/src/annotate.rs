//! 標色（アノテーション）
//!
//! 照合結果に従って元ファイルのコピーに色を付け、凡例と差异目录を追記する。
//!
//! ## 処理の流れ
//! 1. 先頭5行から表頭を探す（見つからないシートはスキップ）
//! 2. データ行ごとに品名を分類し、品名セル・数量セルにマーカーを付ける
//! 3. 使用列の右側に凡例、最終行の下に差异目录を書き込む
//! 4. 「前缀 + 元ファイル名」で同じフォルダに保存（元ファイルは変更しない）

use crate::diagnostics::Diagnostic;
use crate::header::{find_header, HeaderColumns, HEADER_SEARCH_ROWS};
use crate::marker::{Classification, MarkerSets};
use crate::reconcile::DiscrepancyRow;
use crate::workbook::{Sheet, TabularSource};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 出力ファイル名の既定の前缀
pub const DEFAULT_OUTPUT_PREFIX: &str = "标色_";

/// 凡例列の幅
pub const LEGEND_COLUMN_WIDTH: f64 = 15.0;

/// 差异目录の見出し
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationLabels {
    pub discrepancy_title: String,
    pub name_header: String,
    pub other_quantity_header: String,
    pub this_quantity_header: String,
}

impl AnnotationLabels {
    /// 盘点表に書き込む見出し（相手 = 领用单）
    pub fn for_inventory() -> Self {
        Self {
            discrepancy_title: "差异目录".into(),
            name_header: "品名".into(),
            other_quantity_header: "领用单数量".into(),
            this_quantity_header: "盘点表数量".into(),
        }
    }

    /// 领用单に書き込む見出し（相手 = 盘点表）
    pub fn for_requisition() -> Self {
        Self {
            other_quantity_header: "盘点表数量".into(),
            this_quantity_header: "领用单数量".into(),
            ..Self::for_inventory()
        }
    }
}

impl Default for AnnotationLabels {
    fn default() -> Self {
        Self::for_inventory()
    }
}

/// 1ファイル分の標色依頼
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRequest {
    pub sheets: Vec<String>,
    pub name_label: String,
    pub quantity_label: String,
    pub marks: MarkerSets,
    pub discrepancies: Vec<DiscrepancyRow>,
    pub labels: AnnotationLabels,
}

/// シートごとの標色結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetAnnotation {
    pub sheet: String,
    pub header: HeaderColumns,
    pub inconsistent: usize,
    pub consistent: usize,
    pub unique: usize,
    pub discrepancy_rows: usize,
}

impl SheetAnnotation {
    fn count(&mut self, marker: Classification) {
        match marker {
            Classification::Inconsistent => self.inconsistent += 1,
            Classification::Consistent => self.consistent += 1,
            Classification::Unique => self.unique += 1,
        }
    }
}

/// ファイル単位の標色結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationReport {
    pub source: PathBuf,
    pub output: PathBuf,
    pub sheets: Vec<SheetAnnotation>,
    pub diagnostics: Vec<Diagnostic>,
}

/// 出力パス: 同じフォルダ、ファイル名の先頭に前缀を付ける
///
/// 保存は常に xlsx なので、xls/xlsb/ods などは拡張子を `.xlsx` に替える。
pub fn annotated_output_path(source: &Path, prefix: &str) -> PathBuf {
    let is_xlsx = source
        .extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("xlsx"))
        .unwrap_or(false);
    let file_name = if is_xlsx {
        source.file_name().map(|n| n.to_string_lossy().to_string())
    } else {
        source.file_stem().map(|n| format!("{}.xlsx", n.to_string_lossy()))
    }
    .unwrap_or_default();

    source.with_file_name(format!("{}{}", prefix, file_name))
}

/// メモリ上のワークブックに標色を適用する
///
/// 表頭が見つからないシート・存在しないシートは診断を返してスキップする。
pub fn annotate_source(
    source: &mut TabularSource,
    request: &AnnotationRequest,
) -> (Vec<SheetAnnotation>, Vec<Diagnostic>) {
    let mut annotations = Vec::new();
    let mut diagnostics = Vec::new();

    for sheet_name in &request.sheets {
        let missing = source.missing_sheet_diagnostic(sheet_name);
        let Some(sheet) = source.sheet_mut(sheet_name) else {
            missing.emit();
            diagnostics.push(missing);
            continue;
        };

        match annotate_sheet(sheet, request) {
            Ok(annotation) => {
                log::debug!(
                    "annotated '{}': header row {}, name col {}, quantity col {}",
                    sheet_name,
                    annotation.header.row,
                    annotation.header.name_col,
                    annotation.header.quantity_col
                );
                annotations.push(annotation);
            }
            Err(diagnostic) => {
                diagnostic.emit();
                diagnostics.push(diagnostic);
            }
        }
    }

    (annotations, diagnostics)
}

/// 1シートに標色・凡例・差异目录を書き込む
pub fn annotate_sheet(sheet: &mut Sheet, request: &AnnotationRequest) -> Result<SheetAnnotation, Diagnostic> {
    let header = find_header(
        sheet,
        &request.name_label,
        &request.quantity_label,
        HEADER_SEARCH_ROWS,
    )
    .ok_or_else(|| Diagnostic::HeaderNotFound {
        sheet: sheet.name.clone(),
        name_label: request.name_label.clone(),
        quantity_label: request.quantity_label.clone(),
    })?;

    let mut annotation = SheetAnnotation {
        sheet: sheet.name.clone(),
        header,
        inconsistent: 0,
        consistent: 0,
        unique: 0,
        discrepancy_rows: 0,
    };

    // 追記前の範囲で標色する
    let last_row = sheet.row_count();
    for row in header.first_data_row()..last_row {
        let name = sheet.cell(row, header.name_col).to_key();
        if name.is_empty() {
            continue;
        }
        let Some(marker) = request.marks.classify(&name) else {
            continue;
        };
        sheet.set_marker(row, header.name_col, marker);
        if marker.marks_quantity() {
            sheet.set_marker(row, header.quantity_col, marker);
        }
        annotation.count(marker);
    }

    write_legend(sheet, &header);

    if !request.discrepancies.is_empty() {
        write_discrepancy_table(sheet, &request.discrepancies, &request.labels);
        annotation.discrepancy_rows = request.discrepancies.len();
    }

    Ok(annotation)
}

/// 表頭行の右側（1列空ける）に色見本、その下の行にキャプション
fn write_legend(sheet: &mut Sheet, header: &HeaderColumns) {
    let start_col = sheet.column_count() + 1;
    for (i, marker) in Classification::LEGEND_ORDER.into_iter().enumerate() {
        let col = start_col + i;
        sheet.set_marker(header.row, col, marker);
        sheet.set_cell(header.row + 1, col, marker.caption());
        sheet.set_column_width(col, LEGEND_COLUMN_WIDTH);
    }
}

/// 最終行から1行空けて差异目录を追記
fn write_discrepancy_table(sheet: &mut Sheet, rows: &[DiscrepancyRow], labels: &AnnotationLabels) {
    let title_row = sheet.row_count() + 1;
    sheet.set_cell(title_row, 0, labels.discrepancy_title.as_str());
    sheet.set_cell(title_row + 1, 0, labels.name_header.as_str());
    sheet.set_cell(title_row + 1, 1, labels.other_quantity_header.as_str());
    sheet.set_cell(title_row + 1, 2, labels.this_quantity_header.as_str());

    for (i, item) in rows.iter().enumerate() {
        let row = title_row + 2 + i;
        sheet.set_cell(row, 0, item.name.as_str());
        sheet.set_cell(row, 1, item.other_quantity);
        sheet.set_cell(row, 2, item.this_quantity);
    }
}

#[cfg(feature = "excel")]
mod persist {
    use super::*;
    use crate::error::{Error, Result};
    use crate::export::{save_workbook, MarkerPalette};

    /// ファイルを読み込み、1件以上の依頼を適用して1回だけ保存する
    ///
    /// 同じファイルの別シートに異なる依頼（盘点・领用）を適用する場合に使う。
    pub fn annotate_all(
        path: &Path,
        requests: &[AnnotationRequest],
        output_prefix: &str,
        palette: &MarkerPalette,
    ) -> Result<AnnotationReport> {
        if output_prefix.is_empty() {
            return Err(Error::Config(
                "output prefix must not be empty (the source would be overwritten)".into(),
            ));
        }

        let mut source = TabularSource::open(path)?;
        let mut report = AnnotationReport {
            source: path.to_path_buf(),
            output: annotated_output_path(path, output_prefix),
            ..Default::default()
        };

        for request in requests {
            let (sheets, diagnostics) = annotate_source(&mut source, request);
            report.sheets.extend(sheets);
            report.diagnostics.extend(diagnostics);
        }

        save_workbook(&source, &report.output, palette)?;
        log::info!("annotated copy written: {}", report.output.display());

        Ok(report)
    }

    /// 1ファイルを標色して「前缀 + ファイル名」で保存する
    pub fn annotate(
        path: &Path,
        request: &AnnotationRequest,
        output_prefix: &str,
        palette: &MarkerPalette,
    ) -> Result<AnnotationReport> {
        annotate_all(path, std::slice::from_ref(request), output_prefix, palette)
    }
}

#[cfg(feature = "excel")]
pub use persist::{annotate, annotate_all};
