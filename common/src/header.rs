//! 表頭（ヘッダー行）の解決
//!
//! 品名列・数量列のラベルと完全一致するセルを探し、型付きの列番号を返す。
//! 見つからない場合は `None`（呼び出し側でシートをスキップする）。

use crate::cell::CellValue;
use crate::workbook::Sheet;
use serde::{Deserialize, Serialize};

/// 表頭を探索する先頭行数
pub const HEADER_SEARCH_ROWS: usize = 5;

/// 解決済みの表頭位置（すべて0始まり）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderColumns {
    pub row: usize,
    pub name_col: usize,
    pub quantity_col: usize,
}

impl HeaderColumns {
    /// データ行の開始行
    pub fn first_data_row(&self) -> usize {
        self.row + 1
    }
}

/// ラベルと完全一致する最初の列
pub fn find_label(cells: &[CellValue], label: &str) -> Option<usize> {
    cells.iter().position(|c| c.as_text() == Some(label))
}

/// 指定行を表頭として列を解決する（抽出用、行固定）
pub fn resolve_header_at(
    sheet: &Sheet,
    row: usize,
    name_label: &str,
    quantity_label: &str,
) -> Option<HeaderColumns> {
    let cells = sheet.row(row);
    let name_col = find_label(cells, name_label)?;
    let quantity_col = find_label(cells, quantity_label)?;
    Some(HeaderColumns {
        row,
        name_col,
        quantity_col,
    })
}

/// 先頭 `window` 行から両ラベルを含む最初の行を探す（標色用）
pub fn find_header(
    sheet: &Sheet,
    name_label: &str,
    quantity_label: &str,
    window: usize,
) -> Option<HeaderColumns> {
    (0..window.min(sheet.rows().len()))
        .find_map(|row| resolve_header_at(sheet, row, name_label, quantity_label))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet_with_header_at(row: usize) -> Sheet {
        let mut sheet = Sheet::new("电类盘点");
        sheet.set_cell(0, 0, "五金盘点表");
        sheet.set_cell(row, 0, "序号");
        sheet.set_cell(row, 1, "品名");
        sheet.set_cell(row, 2, "规格");
        sheet.set_cell(row, 3, "本次领用");
        sheet
    }

    #[test]
    fn test_resolve_header_at_fixed_row() {
        let sheet = sheet_with_header_at(1);
        let header = resolve_header_at(&sheet, 1, "品名", "本次领用").unwrap();
        assert_eq!(
            header,
            HeaderColumns {
                row: 1,
                name_col: 1,
                quantity_col: 3
            }
        );
        assert_eq!(header.first_data_row(), 2);
    }

    #[test]
    fn test_resolve_header_at_wrong_row() {
        let sheet = sheet_with_header_at(2);
        assert!(resolve_header_at(&sheet, 1, "品名", "本次领用").is_none());
    }

    #[test]
    fn test_resolve_header_missing_quantity_label() {
        let sheet = sheet_with_header_at(1);
        assert!(resolve_header_at(&sheet, 1, "品名", "数量").is_none());
    }

    #[test]
    fn test_find_header_within_window() {
        let sheet = sheet_with_header_at(3);
        let header = find_header(&sheet, "品名", "本次领用", HEADER_SEARCH_ROWS).unwrap();
        assert_eq!(header.row, 3);
    }

    #[test]
    fn test_find_header_outside_window() {
        let sheet = sheet_with_header_at(5);
        assert!(find_header(&sheet, "品名", "本次领用", HEADER_SEARCH_ROWS).is_none());
    }

    #[test]
    fn test_find_header_requires_both_labels_on_same_row() {
        let mut sheet = Sheet::new("s");
        sheet.set_cell(0, 0, "品名");
        sheet.set_cell(1, 1, "数量");
        assert!(find_header(&sheet, "品名", "数量", HEADER_SEARCH_ROWS).is_none());
    }

    #[test]
    fn test_find_label_exact_match_only() {
        let cells = vec![
            CellValue::from(" 品名"),
            CellValue::from("品名 "),
            CellValue::from("品名"),
        ];
        assert_eq!(find_label(&cells, "品名"), Some(2));
    }
}
