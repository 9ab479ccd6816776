//! 照合の実行パイプライン
//!
//! 盘点抽出 → 领用抽出 → 照合 → 盘点標色 → 领用標色 の順に1回ずつ実行する。

use crate::config::Config;
use crate::error::Result;
use log::{debug, info};
use serde::Serialize;
use std::path::{Path, PathBuf};
use stock_recon_common::{
    annotate, annotate_all, extract, reconcile, AnnotationLabels, AnnotationReport,
    AnnotationRequest, ExtractOptions, Extraction, MarkerPalette, ReconciliationResult,
    TabularSource,
};

/// 1回の照合に必要な入力
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub inventory_path: PathBuf,
    /// `None` なら盘点表と同じファイル
    pub requisition_path: Option<PathBuf>,
    pub inventory_sheets: Vec<String>,
    pub requisition_sheets: Vec<String>,
    pub inventory: ExtractOptions,
    pub requisition: ExtractOptions,
    pub annotate: bool,
    pub output_prefix: String,
    pub palette: MarkerPalette,
}

impl RunOptions {
    pub fn from_config(config: &Config, inventory_path: PathBuf, requisition_path: Option<PathBuf>) -> Self {
        Self {
            inventory_path,
            requisition_path,
            inventory_sheets: config.inventory_sheets.clone(),
            requisition_sheets: config.requisition_sheets.clone(),
            inventory: config.inventory.clone(),
            requisition: config.requisition.clone(),
            annotate: true,
            output_prefix: config.output_prefix.clone(),
            palette: config.palette,
        }
    }

    pub fn requisition_path(&self) -> &Path {
        self.requisition_path.as_deref().unwrap_or(&self.inventory_path)
    }

    /// 盘点・领用が同じファイル（`./a.xlsx` と `a.xlsx` も同一とみなす）
    pub fn single_file(&self) -> bool {
        let requisition = self.requisition_path();
        if requisition == self.inventory_path {
            return true;
        }
        match (
            std::fs::canonicalize(&self.inventory_path),
            std::fs::canonicalize(requisition),
        ) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

/// 表示層に渡す実行結果
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub inventory_path: PathBuf,
    pub requisition_path: PathBuf,
    pub inventory: Extraction,
    pub requisition: Extraction,
    pub result: ReconciliationResult,
    pub annotations: Vec<AnnotationReport>,
}

pub fn run(options: &RunOptions) -> Result<RunReport> {
    let single_file = options.single_file();

    info!("extract inventory: {}", options.inventory_path.display());
    let inventory_source = TabularSource::open(&options.inventory_path)?;
    let inventory = extract(&inventory_source, &options.inventory_sheets, &options.inventory);

    info!("extract requisition: {}", options.requisition_path().display());
    let requisition = if single_file {
        extract(&inventory_source, &options.requisition_sheets, &options.requisition)
    } else {
        let source = TabularSource::open(options.requisition_path())?;
        extract(&source, &options.requisition_sheets, &options.requisition)
    };
    drop(inventory_source);

    let result = reconcile(&inventory.quantities, &requisition.quantities);
    info!(
        "reconciled: {} consistent, {} inconsistent, {} only in inventory, {} only in requisition",
        result.consistent.len(),
        result.inconsistent.len(),
        result.only_in_first.len(),
        result.only_in_second.len()
    );

    let annotations = if options.annotate {
        annotate_both(options, &result, single_file)?
    } else {
        debug!("annotation disabled");
        Vec::new()
    };

    Ok(RunReport {
        inventory_path: options.inventory_path.clone(),
        requisition_path: options.requisition_path().to_path_buf(),
        inventory,
        requisition,
        result,
        annotations,
    })
}

/// 盘点表・领用单それぞれの標色依頼
pub fn annotation_requests(
    options: &RunOptions,
    result: &ReconciliationResult,
) -> (AnnotationRequest, AnnotationRequest) {
    let inventory = AnnotationRequest {
        sheets: options.inventory_sheets.clone(),
        name_label: options.inventory.name_label.clone(),
        quantity_label: options.inventory.quantity_label.clone(),
        marks: result.marker_sets_for_first(),
        discrepancies: result.discrepancy_rows_for_first(),
        labels: AnnotationLabels::for_inventory(),
    };
    let requisition = AnnotationRequest {
        sheets: options.requisition_sheets.clone(),
        name_label: options.requisition.name_label.clone(),
        quantity_label: options.requisition.quantity_label.clone(),
        marks: result.marker_sets_for_second(),
        discrepancies: result.discrepancy_rows_for_second(),
        labels: AnnotationLabels::for_requisition(),
    };
    (inventory, requisition)
}

fn annotate_both(
    options: &RunOptions,
    result: &ReconciliationResult,
    single_file: bool,
) -> Result<Vec<AnnotationReport>> {
    let (inventory, requisition) = annotation_requests(options, result);

    // 標色対象が無いファイルは出力しない
    let inventory = (!inventory.marks.is_empty()).then_some(inventory);
    let requisition = (!requisition.marks.is_empty()).then_some(requisition);
    if inventory.is_none() && requisition.is_none() {
        info!("nothing to annotate");
    }

    let mut reports = Vec::new();

    if single_file {
        // 同じファイルは1回だけ読み込み・保存する（2回目が1回目を上書きしないように）
        let requests: Vec<AnnotationRequest> = inventory.into_iter().chain(requisition).collect();
        if !requests.is_empty() {
            reports.push(annotate_all(
                &options.inventory_path,
                &requests,
                &options.output_prefix,
                &options.palette,
            )?);
        }
        return Ok(reports);
    }

    if let Some(request) = inventory {
        reports.push(annotate(
            &options.inventory_path,
            &request,
            &options.output_prefix,
            &options.palette,
        )?);
    }
    if let Some(request) = requisition {
        reports.push(annotate(
            options.requisition_path(),
            &request,
            &options.output_prefix,
            &options.palette,
        )?);
    }

    Ok(reports)
}
