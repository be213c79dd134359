//! Group outlet records by date.
//!
//! This is the reshaping step: one wide row per date becomes one entry per
//! date holding a record for every outlet block that has a date on that row.
//!
//! # Architecture
//!
//! ```text
//! Wide table (one row per date)                      Grouped output
//! ┌──────────────────────────────────────────┐       ┌──────────────────────────┐
//! │ D1 │ T │ Heraldo │ m… │ D1 │ T │ As │ m… │  →    │ D1: [Heraldo, As]        │
//! │ D2 │ T │ Heraldo │ m… │    │   │    │    │       │ D2: [Heraldo]            │
//! └──────────────────────────────────────────┘       └──────────────────────────┘
//! ```
//!
//! Within a date, records follow catalog order, then row order. The grouping
//! is a pure function of the table, so repeated runs give identical output.

use super::extractor::extract_block;
use crate::models::{DateGroups, OutletBlock, PerformanceRecord};
use crate::table::Table;

/// Group the records of every block by date key.
pub fn group_records(table: &Table, blocks: &[OutletBlock]) -> DateGroups {
    collect_records(table, blocks).build()
}

/// Feed every block's records into a builder, keeping the running count.
pub fn collect_records(table: &Table, blocks: &[OutletBlock]) -> DateGroupsBuilder {
    let mut builder = DateGroupsBuilder::default();

    for block in blocks {
        for (date, record) in extract_block(table, block) {
            builder.push(date, record);
        }
    }

    builder
}

/// Accumulates records per date, creating a date's list on first sight.
#[derive(Debug, Default)]
pub struct DateGroupsBuilder {
    groups: DateGroups,
    records: usize,
}

impl DateGroupsBuilder {
    pub fn push(&mut self, date: String, record: PerformanceRecord) {
        debug_assert!(!date.is_empty());
        self.groups.entry(date).or_default().push(record);
        self.records += 1;
    }

    pub fn record_count(&self) -> usize {
        self.records
    }

    pub fn build(self) -> DateGroups {
        self.groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::OutletCatalog;
    use crate::transform::locator::locate_blocks;

    const HEADER: &str = "Date1,Type1,Heraldo,Score,CLS,LCP,SI,TBT,FCP,\
                          Date2,Type2,As,Score,CLS,LCP,SI,TBT,FCP";

    fn grouped(rows: &[&str], outlets: &[&str]) -> DateGroups {
        let mut csv = HEADER.to_string();
        for row in rows {
            csv.push('\n');
            csv.push_str(row);
        }
        let table = Table::parse(&csv, ',').unwrap();
        let catalog = OutletCatalog::new(outlets.iter().copied()).unwrap();
        let blocks = locate_blocks(table.headers(), &catalog).unwrap();
        group_records(&table, &blocks)
    }

    fn outlets_on(groups: &DateGroups, date: &str) -> Vec<String> {
        groups[date].iter().map(|r| r.outlet.clone()).collect()
    }

    #[test]
    fn test_same_date_across_outlets() {
        let groups = grouped(
            &["2024-01-01,Mobile,https://h,90,,,,,,2024-01-01,Mobile,https://a,70,,,,,"],
            &["Heraldo", "As"],
        );

        assert_eq!(groups.len(), 1);
        assert_eq!(outlets_on(&groups, "2024-01-01"), vec!["Heraldo", "As"]);
    }

    #[test]
    fn test_blank_date_only_affects_its_block() {
        let groups = grouped(
            &["2024-01-01,Mobile,https://h,90,,,,,,,Mobile,https://a,70,,,,,"],
            &["Heraldo", "As"],
        );

        assert_eq!(outlets_on(&groups, "2024-01-01"), vec!["Heraldo"]);
    }

    #[test]
    fn test_catalog_order_then_row_order() {
        let groups = grouped(
            &[
                "2024-01-01,Mobile,https://h1,1,,,,,,2024-01-01,Mobile,https://a1,3,,,,,",
                "2024-01-01,Desktop,https://h2,2,,,,,,2024-01-01,Desktop,https://a2,4,,,,,",
            ],
            &["As", "Heraldo"],
        );

        let urls: Vec<&str> = groups["2024-01-01"].iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["https://a1", "https://a2", "https://h1", "https://h2"]);
    }

    #[test]
    fn test_blocks_with_different_dates() {
        let groups = grouped(
            &["2024-01-01,Mobile,https://h,90,,,,,,2024-01-08,Mobile,https://a,70,,,,,"],
            &["Heraldo", "As"],
        );

        assert_eq!(groups.len(), 2);
        assert_eq!(outlets_on(&groups, "2024-01-01"), vec!["Heraldo"]);
        assert_eq!(outlets_on(&groups, "2024-01-08"), vec!["As"]);
    }

    #[test]
    fn test_repeated_runs_identical() {
        let rows = [
            "2024-01-02,Mobile,https://h,90,0.1,,,,,2024-01-01,Mobile,https://a,70,,,,,",
            "2024-01-01,Desktop,https://h,91,0.2,,,,,2024-01-02,Desktop,https://a,71,,,,,",
        ];
        let first = serde_json::to_string(&grouped(&rows, &["Heraldo", "As"])).unwrap();
        for _ in 0..5 {
            let again = serde_json::to_string(&grouped(&rows, &["Heraldo", "As"])).unwrap();
            assert_eq!(first, again);
        }
    }

    #[test]
    fn test_builder_counts() {
        let mut builder = DateGroupsBuilder::default();
        let record = PerformanceRecord {
            outlet: "As".into(),
            kind: "Mobile".into(),
            url: "https://a".into(),
            score: None,
            cls: None,
            lcp: None,
            si: None,
            tbt: None,
            fcp: None,
        };
        builder.push("d1".into(), record.clone());
        builder.push("d1".into(), record);
        assert_eq!(builder.record_count(), 2);
        assert_eq!(builder.build()["d1"].len(), 2);
    }

    #[test]
    fn test_collected_count_matches_groups() {
        let csv = format!(
            "{}\n{}\n{}",
            HEADER,
            "2024-01-01,Mobile,https://h,90,,,,,,2024-01-01,Mobile,https://a,70,,,,,",
            "2024-01-02,Mobile,https://h,91,,,,,,,Mobile,https://a,71,,,,,"
        );
        let table = Table::parse(&csv, ',').unwrap();
        let catalog = OutletCatalog::new(["Heraldo", "As"]).unwrap();
        let blocks = locate_blocks(table.headers(), &catalog).unwrap();

        let builder = collect_records(&table, &blocks);
        assert_eq!(builder.record_count(), 3);
        let groups = builder.build();
        assert_eq!(groups.values().map(Vec::len).sum::<usize>(), 3);
    }
}
