//! High-level pipeline: source table to grouped records.
//!
//! Combines every step: loading, parsing, block location and grouping.
//! A failure at any step aborts the run; there is no partial result.
//!
//! # Example
//!
//! ```rust,ignore
//! use lighthouse::{summarize_source, OutletCatalog, TableSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = TableSource::Url("https://example.com/pub?output=csv".into());
//!     let report = summarize_source(&source, &OutletCatalog::default()).await?;
//!
//!     println!("{} dates", report.groups.len());
//!     Ok(())
//! }
//! ```

use super::grouper::collect_records;
use super::locator::locate_blocks;
use crate::api::logs::{log_info, log_info_indent, log_success};
use crate::catalog::OutletCatalog;
use crate::error::SummaryResult;
use crate::models::{DateGroups, OutletBlock};
use crate::source::TableSource;
use crate::table::Table;

/// Result of one summary run.
#[derive(Debug, Clone)]
pub struct SummaryReport {
    /// Records grouped by date.
    pub groups: DateGroups,
    /// Outlet blocks found in the header, in processing order.
    pub blocks: Vec<OutletBlock>,
    /// Data rows in the table.
    pub row_count: usize,
    /// Records across all dates.
    pub record_count: usize,
}

/// Load the source table and group it.
pub async fn summarize_source(
    source: &TableSource,
    catalog: &OutletCatalog,
) -> SummaryResult<SummaryReport> {
    log_info(format!("📥 Fetching source table: {}", source));
    let text = source.load().await?;
    log_success(format!("Fetched {} bytes", text.len()));

    summarize_text(&text, catalog)
}

/// Parse table text and group it.
pub fn summarize_text(text: &str, catalog: &OutletCatalog) -> SummaryResult<SummaryReport> {
    let table = Table::parse_auto(text)?;
    log_success(format!(
        "Read {} rows x {} columns",
        table.row_count(),
        table.width()
    ));

    summarize_table(&table, catalog)
}

/// Group an already-parsed table.
pub fn summarize_table(table: &Table, catalog: &OutletCatalog) -> SummaryResult<SummaryReport> {
    log_info("🔎 Locating outlet blocks...");
    let blocks = locate_blocks(table.headers(), catalog)?;
    log_success(format!(
        "{} blocks for {} catalog outlets",
        blocks.len(),
        catalog.len()
    ));
    for block in &blocks {
        log_info_indent(format!("{} → column {}", block.outlet, block.column), 1);
    }

    log_info("📦 Grouping by date...");
    let builder = collect_records(table, &blocks);
    let record_count = builder.record_count();
    let groups = builder.build();
    log_success(format!("{} records over {} dates", record_count, groups.len()));

    Ok(SummaryReport {
        groups,
        blocks,
        row_count: table.row_count(),
        record_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{SummaryError, TableError};
    use crate::transform::sanitize::sanitized;
    use std::io::Write;

    const SHEET: &str = "\
Date1,Type1,Heraldo,Score,CLS,LCP,SI,TBT,FCP,Date2,Type2,Milenio,Score,CLS,LCP,SI,TBT,FCP
2024-01-01,Mobile,https://x,90,0.01,1.2,2.0,50,0.9,2024-01-01,Mobile,https://m,55,,3.1,4.0,300,1.9
2024-01-02,Desktop,https://x,95,0,0.8,1.1,10,0.5,,,,,,,,,
";

    #[test]
    fn test_documented_example() {
        let report = summarize_text(SHEET, &OutletCatalog::default()).unwrap();

        let value = serde_json::to_value(sanitized(&report.groups)).unwrap();
        let first = &value["2024-01-01"][0];
        assert_eq!(first["Outlet"], "Heraldo");
        assert_eq!(first["Type"], "Mobile");
        assert_eq!(first["URL"], "https://x");
        assert_eq!(first["Score"], 90.0);
        assert_eq!(first["CLS"], 0.01);
        assert_eq!(first["LCP"], 1.2);
        assert_eq!(first["SI"], 2.0);
        assert_eq!(first["TBT"], 50.0);
        assert_eq!(first["FCP"], 0.9);

        let second = &value["2024-01-01"][1];
        assert_eq!(second["Outlet"], "Milenio");
        assert!(second["CLS"].is_null());
    }

    #[test]
    fn test_counts() {
        let report = summarize_text(SHEET, &OutletCatalog::default()).unwrap();
        assert_eq!(report.row_count, 2);
        assert_eq!(report.blocks.len(), 2);
        assert_eq!(report.record_count, 3);
        assert_eq!(report.groups["2024-01-02"].len(), 1);
    }

    #[test]
    fn test_malformed_table_aborts() {
        let text = "Type1,Heraldo,Score,CLS,LCP,SI,TBT,FCP\nMobile,https://x,1,2,3,4,5,6";
        let err = summarize_text(text, &OutletCatalog::default()).unwrap_err();
        assert!(matches!(err, SummaryError::Table(TableError::Malformed { .. })));
    }

    #[test]
    fn test_empty_source_aborts() {
        let err = summarize_text("", &OutletCatalog::default()).unwrap_err();
        assert!(matches!(err, SummaryError::Table(TableError::Empty)));
    }

    #[tokio::test]
    async fn test_summarize_file_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", SHEET).unwrap();

        let source = TableSource::File(file.path().to_path_buf());
        let report = summarize_source(&source, &OutletCatalog::default()).await.unwrap();
        assert_eq!(report.groups.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_source_aborts() {
        let source = TableSource::File("/nonexistent/sheet.csv".into());
        let err = summarize_source(&source, &OutletCatalog::default()).await.unwrap_err();
        assert!(matches!(err, SummaryError::Source(_)));
    }
}
