//! Stock Recon Common Library
//!
//! 盘点表と领用单の数量照合コア。
//! 抽出（extract）→ 照合（reconcile）→ 標色（annotate）の順に使う。
//! 画面表示・コンソール出力は行わず、結果と診断を値として返す。

pub mod cell;
pub mod workbook;
pub mod header;
pub mod marker;
pub mod diagnostics;
pub mod extract;
pub mod reconcile;
pub mod annotate;
pub mod error;
#[cfg(feature = "excel")]
pub mod export;

pub use cell::CellValue;
pub use workbook::{Sheet, TabularSource};
pub use header::{find_header, resolve_header_at, HeaderColumns, HEADER_SEARCH_ROWS};
pub use marker::{Classification, MarkerSets};
pub use diagnostics::Diagnostic;
pub use extract::{extract, extract_file, ExtractOptions, Extraction, QuantityMap};
pub use reconcile::{reconcile, ConsistentItem, Discrepancy, DiscrepancyRow, ReconciliationResult};
pub use annotate::{
    annotate_source, annotated_output_path, AnnotationLabels, AnnotationReport, AnnotationRequest,
    SheetAnnotation, DEFAULT_OUTPUT_PREFIX,
};
#[cfg(feature = "excel")]
pub use annotate::{annotate, annotate_all};
#[cfg(feature = "excel")]
pub use export::{save_workbook, MarkerPalette};
pub use error::{Error, Result};
