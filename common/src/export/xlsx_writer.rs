//! 標色済みワークブックの書き出し（rust_xlsxwriter）
//!
//! 分類 → 塗りつぶし色の対応はここだけで行う。

use crate::cell::CellValue;
use crate::error::{Error, Result};
use crate::marker::Classification;
use crate::workbook::{Sheet, TabularSource};
use rust_xlsxwriter::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 分類ごとの塗りつぶし色（0xRRGGBB）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerPalette {
    /// 荧光色
    pub inconsistent: u32,
    /// 绿色
    pub consistent: u32,
    /// 红色
    pub unique: u32,
}

impl Default for MarkerPalette {
    fn default() -> Self {
        Self {
            inconsistent: 0xFFFF00,
            consistent: 0xADD88D,
            unique: 0xFF0000,
        }
    }
}

impl MarkerPalette {
    pub fn color(&self, marker: Classification) -> u32 {
        match marker {
            Classification::Inconsistent => self.inconsistent,
            Classification::Consistent => self.consistent,
            Classification::Unique => self.unique,
        }
    }

    fn format(&self, marker: Classification) -> Format {
        Format::new()
            .set_pattern(FormatPattern::Solid)
            .set_background_color(Color::RGB(self.color(marker)))
    }
}

/// ワークブック全体を xlsx として保存する
pub fn save_workbook(source: &TabularSource, output_path: &Path, palette: &MarkerPalette) -> Result<()> {
    let buffer = write_workbook_buffer(source, palette).map_err(|e| Error::save(output_path, e))?;
    std::fs::write(output_path, buffer).map_err(|e| Error::save(output_path, e))?;
    Ok(())
}

/// ワークブックをバッファに生成
pub fn write_workbook_buffer(source: &TabularSource, palette: &MarkerPalette) -> std::result::Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();

    for sheet in &source.sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;
        write_sheet(worksheet, sheet, palette)?;
    }

    // シートが1枚もないと xlsx として不正になる
    if source.sheets.is_empty() {
        workbook.add_worksheet();
    }

    workbook.save_to_buffer()
}

fn write_sheet(worksheet: &mut Worksheet, sheet: &Sheet, palette: &MarkerPalette) -> std::result::Result<(), XlsxError> {
    for (row_idx, cells) in sheet.rows().iter().enumerate() {
        for (col_idx, value) in cells.iter().enumerate() {
            // マーカー付きセルは後で書く
            if sheet.marker(row_idx, col_idx).is_some() {
                continue;
            }
            let (row, col) = (row_idx as RowNum, col_idx as ColNum);
            match (value, sheet.number_format(row_idx, col_idx)) {
                (CellValue::Empty, _) => {}
                (CellValue::Number(n), Some(num_format)) => {
                    let format = Format::new().set_num_format(num_format);
                    worksheet.write_number_with_format(row, col, *n, &format)?;
                }
                (CellValue::Number(n), None) => {
                    worksheet.write_number(row, col, *n)?;
                }
                (CellValue::Text(s), _) => {
                    worksheet.write_string(row, col, s)?;
                }
            }
        }
    }

    for ((row_idx, col_idx), marker) in sheet.markers() {
        let mut format = palette.format(marker);
        if let Some(num_format) = sheet.number_format(row_idx, col_idx) {
            format = format.set_num_format(num_format);
        }
        let (row, col) = (row_idx as RowNum, col_idx as ColNum);
        match sheet.cell(row_idx, col_idx) {
            CellValue::Empty => {
                worksheet.write_blank(row, col, &format)?;
            }
            CellValue::Number(n) => {
                worksheet.write_number_with_format(row, col, *n, &format)?;
            }
            CellValue::Text(s) => {
                worksheet.write_string_with_format(row, col, s, &format)?;
            }
        }
    }

    for (col_idx, width) in sheet.column_widths() {
        worksheet.set_column_width(col_idx as ColNum, width)?;
    }

    Ok(())
}
