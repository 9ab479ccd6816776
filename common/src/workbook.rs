//! 表形式ソース（ワークブック）のメモリ上モデル
//!
//! calamine で xlsx/xls/xlsb/ods を読み込み、A1 起点の密な行列として保持する。
//! 標色（マーカー）・日付の表示形式・列幅は保存時に `export::xlsx_writer` が反映する。

use crate::cell::CellValue;
use crate::diagnostics::Diagnostic;
use crate::error::{Error, Result};
use crate::marker::Classification;
use calamine::{open_workbook_auto, Data, Reader};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

static EMPTY: CellValue = CellValue::Empty;

/// 1シート分のデータ
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    pub name: String,
    rows: Vec<Vec<CellValue>>,
    markers: BTreeMap<(usize, usize), Classification>,
    /// 日付セルなど、数値に付ける表示形式
    number_formats: BTreeMap<(usize, usize), String>,
    column_widths: BTreeMap<usize, f64>,
}

/// 日付シリアル値に合う表示形式
pub fn date_number_format(serial: f64) -> &'static str {
    if serial < 1.0 {
        "hh:mm:ss"
    } else if serial.fract() == 0.0 {
        "yyyy-mm-dd"
    } else {
        "yyyy-mm-dd hh:mm:ss"
    }
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            rows,
            ..Default::default()
        }
    }

    /// 0始まりの行・列でセルを取得（範囲外は空）
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    pub fn set_cell(&mut self, row: usize, col: usize, value: impl Into<CellValue>) {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if cells.len() <= col {
            cells.resize(col + 1, CellValue::Empty);
        }
        cells[col] = value.into();
    }

    pub fn row(&self, row: usize) -> &[CellValue] {
        self.rows.get(row).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// 使用行数（末尾の空行は含めない）
    pub fn row_count(&self) -> usize {
        self.rows
            .iter()
            .rposition(|r| r.iter().any(|c| !c.is_empty()))
            .map(|i| i + 1)
            .unwrap_or(0)
    }

    /// 使用列数（全行で最も右の非空セル）
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .filter_map(|r| r.iter().rposition(|c| !c.is_empty()))
            .max()
            .map(|i| i + 1)
            .unwrap_or(0)
    }

    pub fn set_marker(&mut self, row: usize, col: usize, marker: Classification) {
        self.markers.insert((row, col), marker);
    }

    pub fn marker(&self, row: usize, col: usize) -> Option<Classification> {
        self.markers.get(&(row, col)).copied()
    }

    pub fn markers(&self) -> impl Iterator<Item = ((usize, usize), Classification)> + '_ {
        self.markers.iter().map(|(pos, m)| (*pos, *m))
    }

    pub fn set_number_format(&mut self, row: usize, col: usize, format: impl Into<String>) {
        self.number_formats.insert((row, col), format.into());
    }

    pub fn number_format(&self, row: usize, col: usize) -> Option<&str> {
        self.number_formats.get(&(row, col)).map(String::as_str)
    }

    pub fn set_column_width(&mut self, col: usize, width: f64) {
        self.column_widths.insert(col, width);
    }

    pub fn column_widths(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.column_widths.iter().map(|(c, w)| (*c, *w))
    }
}

/// 読み込んだワークブック
#[derive(Debug, Clone, Default)]
pub struct TabularSource {
    pub path: PathBuf,
    pub sheets: Vec<Sheet>,
    /// 読み込めなかったシートの記録
    pub load_diagnostics: Vec<Diagnostic>,
}

impl TabularSource {
    pub fn from_sheets(path: impl Into<PathBuf>, sheets: Vec<Sheet>) -> Self {
        Self {
            path: path.into(),
            sheets,
            load_diagnostics: Vec::new(),
        }
    }

    /// ファイルを開いて全シートを読み込む
    ///
    /// ファイル自体が開けない場合のみエラー。個別シートの読み込み失敗は
    /// `load_diagnostics` に記録してスキップする。
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::source_unreadable(path, "file not found"));
        }

        let mut workbook =
            open_workbook_auto(path).map_err(|e| Error::source_unreadable(path, e))?;

        let mut sheets = Vec::new();
        let mut load_diagnostics = Vec::new();

        for sheet_name in workbook.sheet_names() {
            let range = match workbook.worksheet_range(&sheet_name) {
                Ok(range) => range,
                Err(e) => {
                    let diagnostic = Diagnostic::SheetUnreadable {
                        sheet: sheet_name.clone(),
                        message: e.to_string(),
                    };
                    diagnostic.emit();
                    load_diagnostics.push(diagnostic);
                    continue;
                }
            };

            // データが A1 から始まらない場合があるので起点をずらす
            let (start_row, start_col) = range
                .start()
                .map(|(r, c)| (r as usize, c as usize))
                .unwrap_or((0, 0));

            let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); start_row];
            let mut dates = Vec::new();
            for data_row in range.rows() {
                let mut cells = vec![CellValue::Empty; start_col];
                for data in data_row {
                    if let Data::DateTime(dt) = data {
                        dates.push((rows.len(), cells.len(), date_number_format(dt.as_f64())));
                    }
                    cells.push(CellValue::from(data));
                }
                rows.push(cells);
            }

            log::debug!("loaded sheet '{}' ({} rows)", sheet_name, rows.len());
            let mut sheet = Sheet::from_rows(sheet_name, rows);
            for (row, col, format) in dates {
                sheet.set_number_format(row, col, format);
            }
            sheets.push(sheet);
        }

        Ok(Self {
            path: path.to_path_buf(),
            sheets,
            load_diagnostics,
        })
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// 指定シートが無いときの診断（読み込み失敗の記録を優先）
    pub(crate) fn missing_sheet_diagnostic(&self, name: &str) -> Diagnostic {
        self.load_diagnostics
            .iter()
            .find(|d| d.sheet() == name)
            .cloned()
            .unwrap_or_else(|| Diagnostic::SheetNotFound {
                sheet: name.to_string(),
            })
    }
}
