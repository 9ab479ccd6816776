//! 2つの数量表の照合
//!
//! 品名の和集合を「一致」「不一致」「第1表のみ」「第2表のみ」の
//! 4つに分割する。入力は順序付きマップなので出力も品名順で決定的。

use crate::extract::QuantityMap;
use crate::marker::MarkerSets;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 数目一致の品名
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConsistentItem {
    pub name: String,
    pub quantity: u64,
}

/// 数目不一致の品名
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Discrepancy {
    pub name: String,
    /// 第1表（盘点表）の数量
    pub first: u64,
    /// 第2表（领用单）の数量
    pub second: u64,
    pub difference: u64,
}

impl Discrepancy {
    pub fn new(name: impl Into<String>, first: u64, second: u64) -> Self {
        Self {
            name: name.into(),
            first,
            second,
            difference: first.abs_diff(second),
        }
    }

    pub fn swapped(&self) -> Self {
        Self::new(self.name.clone(), self.second, self.first)
    }
}

/// 差异目录の1行（相手表の数量, 本表の数量）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscrepancyRow {
    pub name: String,
    pub other_quantity: u64,
    pub this_quantity: u64,
}

/// 照合結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    pub consistent: Vec<ConsistentItem>,
    pub inconsistent: Vec<Discrepancy>,
    pub only_in_first: BTreeSet<String>,
    pub only_in_second: BTreeSet<String>,
}

/// 2つの数量表を照合する（副作用なし）
pub fn reconcile(first: &QuantityMap, second: &QuantityMap) -> ReconciliationResult {
    let mut result = ReconciliationResult::default();

    for (name, &qty_a) in first {
        match second.get(name) {
            Some(&qty_b) if qty_a == qty_b => result.consistent.push(ConsistentItem {
                name: name.clone(),
                quantity: qty_a,
            }),
            Some(&qty_b) => result.inconsistent.push(Discrepancy::new(name.clone(), qty_a, qty_b)),
            None => {
                result.only_in_first.insert(name.clone());
            }
        }
    }

    result.only_in_second = second
        .keys()
        .filter(|name| !first.contains_key(*name))
        .cloned()
        .collect();

    result
}

impl ReconciliationResult {
    /// 第2表から見た照合結果
    pub fn swapped(&self) -> Self {
        Self {
            consistent: self.consistent.clone(),
            inconsistent: self.inconsistent.iter().map(Discrepancy::swapped).collect(),
            only_in_first: self.only_in_second.clone(),
            only_in_second: self.only_in_first.clone(),
        }
    }

    /// 不一致も片側のみの品名もない
    pub fn is_clean(&self) -> bool {
        self.inconsistent.is_empty() && self.only_in_first.is_empty() && self.only_in_second.is_empty()
    }

    /// 照合対象の品名総数（和集合の大きさ）
    pub fn total_names(&self) -> usize {
        self.consistent.len()
            + self.inconsistent.len()
            + self.only_in_first.len()
            + self.only_in_second.len()
    }

    pub fn consistent_names(&self) -> BTreeSet<String> {
        self.consistent.iter().map(|c| c.name.clone()).collect()
    }

    pub fn inconsistent_names(&self) -> BTreeSet<String> {
        self.inconsistent.iter().map(|d| d.name.clone()).collect()
    }

    /// 第1表の標色対象
    pub fn marker_sets_for_first(&self) -> MarkerSets {
        MarkerSets {
            inconsistent: self.inconsistent_names(),
            consistent: self.consistent_names(),
            unique: self.only_in_first.clone(),
        }
    }

    /// 第2表の標色対象
    pub fn marker_sets_for_second(&self) -> MarkerSets {
        MarkerSets {
            inconsistent: self.inconsistent_names(),
            consistent: self.consistent_names(),
            unique: self.only_in_second.clone(),
        }
    }

    /// 第1表に書き込む差异目录（相手 = 第2表）
    pub fn discrepancy_rows_for_first(&self) -> Vec<DiscrepancyRow> {
        self.inconsistent
            .iter()
            .map(|d| DiscrepancyRow {
                name: d.name.clone(),
                other_quantity: d.second,
                this_quantity: d.first,
            })
            .collect()
    }

    /// 第2表に書き込む差异目录（相手 = 第1表）
    pub fn discrepancy_rows_for_second(&self) -> Vec<DiscrepancyRow> {
        self.swapped().discrepancy_rows_for_first()
    }
}
