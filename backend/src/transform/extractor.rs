//! Build performance records from the rows of one outlet block.

use super::coerce::safe_float;
use crate::models::{OutletBlock, PerformanceRecord, NOT_AVAILABLE};
use crate::table::Table;

/// Walk every row for `block`, returning `(date key, record)` pairs in row
/// order. Rows without a date are skipped for this block only.
pub fn extract_block(table: &Table, block: &OutletBlock) -> Vec<(String, PerformanceRecord)> {
    (0..table.row_count())
        .filter_map(|row| extract_row(table, block, row))
        .collect()
}

/// Record for one `(row, block)` pair, or `None` when the date cell is blank.
pub fn extract_row(table: &Table, block: &OutletBlock, row: usize) -> Option<(String, PerformanceRecord)> {
    let date = table.cell(row, block.date_column)?.trim();
    if date.is_empty() {
        return None;
    }

    let text_or_na = |column: usize| {
        table
            .cell(row, column)
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    };

    let mut record = PerformanceRecord {
        outlet: block.outlet.clone(),
        kind: text_or_na(block.type_column),
        url: text_or_na(block.column),
        score: None,
        cls: None,
        lcp: None,
        si: None,
        tbt: None,
        fcp: None,
    };

    for (metric, column) in block.metric_columns() {
        record.set_metric(metric, safe_float(table.cell(row, column)));
    }

    Some((date.to_string(), record))
}
