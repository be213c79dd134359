//! # Lighthouse - per-date outlet performance summaries
//!
//! Reshapes the wide Lighthouse spreadsheet (one row per date, one column
//! block per tracked outlet) into a mapping from date to the ordered list of
//! outlet performance records, and serves it to the dashboard.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  CSV Sheet  │────▶│   Locator   │────▶│  Extractor  │────▶│   Grouper   │────▶│  Sanitizer  │
//! │ (wide rows) │     │  (blocks)   │     │ (+coercion) │     │  (by date)  │     │ (JSON-safe) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use lighthouse::{summarize_text, sanitized, OutletCatalog};
//!
//! let report = summarize_text(&csv_text, &OutletCatalog::default())?;
//! println!("{}", serde_json::to_string_pretty(&sanitized(&report.groups))?);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error hierarchy
//! - [`models`] - Metrics, outlet blocks, records
//! - [`catalog`] - Outlet catalog
//! - [`config`] - Environment and flag configuration
//! - [`table`] - Decoding and CSV parsing
//! - [`source`] - Source table retrieval
//! - [`transform`] - Locator, extractor, grouper, sanitizer, pipeline
//! - [`ai`] - Question answering
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod models;
pub mod catalog;
pub mod config;

// Input
pub mod table;
pub mod source;

// Transformation
pub mod transform;

// AI
pub mod ai;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{
    AiError,
    CatalogError,
    ConfigError,
    ServerError,
    SourceError,
    SummaryError,
    TableError,
};

// =============================================================================
// Re-exports - Models and catalog
// =============================================================================

pub use models::{DateGroups, Metric, OutletBlock, PerformanceRecord, NOT_AVAILABLE};
pub use catalog::{OutletCatalog, DEFAULT_OUTLETS};
pub use config::{ServerConfig, Settings};

// =============================================================================
// Re-exports - Input
// =============================================================================

pub use table::{decode_table, detect_delimiter, Table};
pub use source::TableSource;

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::{
    extract_block,
    group_records,
    locate_blocks,
    safe_float,
    sanitize,
    sanitized,
    summarize_source,
    summarize_table,
    summarize_text,
    BlockLayout,
    Shape,
    SummaryReport,
};

// =============================================================================
// Re-exports - AI
// =============================================================================

pub use ai::{AiClient, AnswerGenerator};

// Server
pub mod server {
    pub use crate::api::server::{router, start_server, AppState};
}
