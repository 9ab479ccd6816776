//! 処理継続可能な問題の記録
//!
//! シートが見つからない・表頭が見つからない等はエラーにせず、
//! 呼び出し側へ返して表示を任せる。

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// 指定シートがファイルに存在しない
    SheetNotFound { sheet: String },
    /// シートは存在するが読み込めなかった
    SheetUnreadable { sheet: String, message: String },
    /// 表頭（品名列・数量列）が見つからない
    HeaderNotFound {
        sheet: String,
        name_label: String,
        quantity_label: String,
    },
}

impl Diagnostic {
    pub fn sheet(&self) -> &str {
        match self {
            Diagnostic::SheetNotFound { sheet }
            | Diagnostic::SheetUnreadable { sheet, .. }
            | Diagnostic::HeaderNotFound { sheet, .. } => sheet,
        }
    }

    /// `log` に警告として流す
    pub(crate) fn emit(&self) {
        log::warn!("{}", self);
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::SheetNotFound { sheet } => {
                write!(f, "sheet '{}' not found, skipped", sheet)
            }
            Diagnostic::SheetUnreadable { sheet, message } => {
                write!(f, "sheet '{}' unreadable, skipped: {}", sheet, message)
            }
            Diagnostic::HeaderNotFound {
                sheet,
                name_label,
                quantity_label,
            } => write!(
                f,
                "sheet '{}': header with '{}' and '{}' not found, skipped",
                sheet, name_label, quantity_label
            ),
        }
    }
}
