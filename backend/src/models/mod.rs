//! Domain models for the summary pipeline.
//!
//! - [`Metric`] - The six Lighthouse measurements, in their fixed order
//! - [`OutletBlock`] - Column group belonging to one outlet occurrence
//! - [`PerformanceRecord`] - One outlet's measurements for one date
//! - [`DateGroups`] - Records grouped by date key

use serde::Serialize;
use std::collections::BTreeMap;

/// Placeholder used for a missing type or URL cell.
pub const NOT_AVAILABLE: &str = "N/A";

// =============================================================================
// Metrics
// =============================================================================

/// Web performance metric reported per outlet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Overall performance score.
    Score,
    /// Cumulative Layout Shift.
    Cls,
    /// Largest Contentful Paint.
    Lcp,
    /// Speed Index.
    Si,
    /// Total Blocking Time.
    Tbt,
    /// First Contentful Paint.
    Fcp,
}

impl Metric {
    /// Column order of the metrics following an outlet column.
    pub const ALL: [Metric; 6] = [
        Metric::Score,
        Metric::Cls,
        Metric::Lcp,
        Metric::Si,
        Metric::Tbt,
        Metric::Fcp,
    ];

    /// Key used in the serialized record.
    pub fn label(self) -> &'static str {
        match self {
            Metric::Score => "Score",
            Metric::Cls => "CLS",
            Metric::Lcp => "LCP",
            Metric::Si => "SI",
            Metric::Tbt => "TBT",
            Metric::Fcp => "FCP",
        }
    }
}

// =============================================================================
// Outlet Blocks
// =============================================================================

/// Columns associated with one occurrence of an outlet in the header row.
///
/// Built by [`crate::transform::locate_blocks`], which guarantees every index
/// is inside the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutletBlock {
    /// Catalog name of the outlet.
    pub outlet: String,
    /// Column holding the outlet's URL.
    pub column: usize,
    /// Column holding the date (`column - 2`).
    pub date_column: usize,
    /// Column holding the device type (`column - 1`).
    pub type_column: usize,
    /// Metric columns in [`Metric::ALL`] order (`column + 1 ..= column + 6`).
    pub metric_columns: [usize; 6],
}

impl OutletBlock {
    /// Pairs each metric with its column.
    pub fn metric_columns(&self) -> impl Iterator<Item = (Metric, usize)> + '_ {
        Metric::ALL.into_iter().zip(self.metric_columns)
    }
}

// =============================================================================
// Performance Records
// =============================================================================

/// One outlet's measurements on one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceRecord {
    #[serde(rename = "Outlet")]
    pub outlet: String,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Score")]
    pub score: Option<f64>,
    #[serde(rename = "CLS")]
    pub cls: Option<f64>,
    #[serde(rename = "LCP")]
    pub lcp: Option<f64>,
    #[serde(rename = "SI")]
    pub si: Option<f64>,
    #[serde(rename = "TBT")]
    pub tbt: Option<f64>,
    #[serde(rename = "FCP")]
    pub fcp: Option<f64>,
}

impl PerformanceRecord {
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Score => self.score,
            Metric::Cls => self.cls,
            Metric::Lcp => self.lcp,
            Metric::Si => self.si,
            Metric::Tbt => self.tbt,
            Metric::Fcp => self.fcp,
        }
    }

    pub fn set_metric(&mut self, metric: Metric, value: Option<f64>) {
        let slot = match metric {
            Metric::Score => &mut self.score,
            Metric::Cls => &mut self.cls,
            Metric::Lcp => &mut self.lcp,
            Metric::Si => &mut self.si,
            Metric::Tbt => &mut self.tbt,
            Metric::Fcp => &mut self.fcp,
        };
        *slot = value;
    }
}

// =============================================================================
// Date Groups
// =============================================================================

/// Records grouped by trimmed, non-empty date key.
///
/// Keys iterate in sorted order; each list keeps catalog order, then row order.
pub type DateGroups = BTreeMap<String, Vec<PerformanceRecord>>;
