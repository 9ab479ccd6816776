//! 照合結果の分類
//!
//! 色（塗りつぶし）は表示側の関心事なので、ここでは分類のみを定義する。
//! 色への対応付けは `export::xlsx_writer::MarkerPalette` が行う。

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 品名ごとの分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Classification {
    /// 数目不一致
    Inconsistent,
    /// 数目一致
    Consistent,
    /// 只在本表有的品名
    Unique,
}

impl Classification {
    /// 凡例の並び順
    pub const LEGEND_ORDER: [Classification; 3] = [
        Classification::Inconsistent,
        Classification::Consistent,
        Classification::Unique,
    ];

    /// 数量セルにもマーカーを付けるか（Uniqueは品名セルのみ）
    pub fn marks_quantity(self) -> bool {
        !matches!(self, Classification::Unique)
    }

    /// 凡例の固定キャプション
    pub fn caption(self) -> &'static str {
        match self {
            Classification::Inconsistent => "数目不一致",
            Classification::Consistent => "数目一致",
            Classification::Unique => "只在本表有的品名",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.caption())
    }
}

/// 1ファイル分の標色対象品名
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerSets {
    pub inconsistent: BTreeSet<String>,
    pub consistent: BTreeSet<String>,
    pub unique: BTreeSet<String>,
}

impl MarkerSets {
    /// 品名を分類する。複数の集合に含まれる場合は
    /// 不一致 → 一致 → 本表のみ の順で最初に一致したものを採用する。
    pub fn classify(&self, name: &str) -> Option<Classification> {
        if self.inconsistent.contains(name) {
            Some(Classification::Inconsistent)
        } else if self.consistent.contains(name) {
            Some(Classification::Consistent)
        } else if self.unique.contains(name) {
            Some(Classification::Unique)
        } else {
            None
        }
    }

    /// 標色対象が1件もない
    pub fn is_empty(&self) -> bool {
        self.inconsistent.is_empty() && self.consistent.is_empty() && self.unique.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_classify_each_set() {
        let marks = MarkerSets {
            inconsistent: set(&["Bolt"]),
            consistent: set(&["Nut"]),
            unique: set(&["Screw"]),
        };
        assert_eq!(marks.classify("Bolt"), Some(Classification::Inconsistent));
        assert_eq!(marks.classify("Nut"), Some(Classification::Consistent));
        assert_eq!(marks.classify("Screw"), Some(Classification::Unique));
        assert_eq!(marks.classify("Washer"), None);
    }

    #[test]
    fn test_classify_precedence_when_sets_overlap() {
        let marks = MarkerSets {
            inconsistent: set(&["Bolt"]),
            consistent: set(&["Bolt", "Nut"]),
            unique: set(&["Bolt", "Nut"]),
        };
        assert_eq!(marks.classify("Bolt"), Some(Classification::Inconsistent));
        assert_eq!(marks.classify("Nut"), Some(Classification::Consistent));
    }

    #[test]
    fn test_classify_is_case_sensitive() {
        let marks = MarkerSets {
            unique: set(&["Bolt"]),
            ..Default::default()
        };
        assert_eq!(marks.classify("bolt"), None);
    }

    #[test]
    fn test_marks_quantity() {
        assert!(Classification::Inconsistent.marks_quantity());
        assert!(Classification::Consistent.marks_quantity());
        assert!(!Classification::Unique.marks_quantity());
    }
}
