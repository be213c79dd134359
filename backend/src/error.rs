//! Error types for the Lighthouse summary service.
//!
//! This module defines the error hierarchy used across the crate:
//!
//! - [`SourceError`] - Retrieving the source table failed
//! - [`TableError`] - The table cannot be parsed or its layout is malformed
//! - [`CatalogError`] - The outlet catalog could not be loaded
//! - [`ConfigError`] - Startup configuration is missing or invalid
//! - [`AiError`] - Text generation errors
//! - [`SummaryError`] - Top-level errors of the summary pipeline
//! - [`ServerError`] - HTTP-facing errors, mapped to status codes
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::api::types::error_body;

// =============================================================================
// Source Errors
// =============================================================================

/// Errors while retrieving the source table.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Transport failure.
    #[error("Failed to fetch source table: {0}")]
    Http(String),

    /// Remote answered with a non-success status.
    #[error("Source table request returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Local file could not be read.
    #[error("Failed to read source file: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        SourceError::Http(e.to_string())
    }
}

// =============================================================================
// Table Errors
// =============================================================================

/// Errors while parsing the table or deriving outlet blocks.
#[derive(Debug, Error)]
pub enum TableError {
    /// No content at all.
    #[error("Source table is empty")]
    Empty,

    /// The CSV reader rejected the content.
    #[error("Invalid table format: {0}")]
    Parse(String),

    /// An outlet column sits too close to the table edge for its block.
    #[error(
        "Malformed table: outlet '{outlet}' at column {column} needs columns {first}..={last}, \
         but the header has {width} columns"
    )]
    Malformed {
        outlet: String,
        column: usize,
        first: isize,
        last: isize,
        width: usize,
    },
}

impl From<csv::Error> for TableError {
    fn from(e: csv::Error) -> Self {
        TableError::Parse(e.to_string())
    }
}

// =============================================================================
// Catalog and Config Errors
// =============================================================================

/// Errors while loading the outlet catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Cannot read outlet catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid outlet catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Outlet catalog is empty")]
    Empty,

    #[error("Outlet catalog contains a blank name at position {0}")]
    BlankName(usize),

    #[error("Outlet catalog lists '{0}' more than once")]
    Duplicate(String),
}

/// Errors while reading startup configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Neither a URL nor a file was given for the source table.
    #[error("No source table configured (set SOURCE_URL or SOURCE_FILE)")]
    MissingSource,

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

// =============================================================================
// AI Errors
// =============================================================================

/// Errors from the text-generation client.
#[derive(Debug, Error)]
pub enum AiError {
    /// Missing API key.
    #[error("Missing API key: {0}")]
    MissingApiKey(String),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    /// Response body was not the expected JSON.
    #[error("Invalid JSON response: {0}")]
    InvalidJson(String),

    /// The API returned an error payload.
    #[error("API error: {0}")]
    ApiError(String),
}

// =============================================================================
// Summary Errors (pipeline top-level)
// =============================================================================

/// Errors that abort a whole summary run. No partial grouping is ever returned.
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("{0}")]
    Source(#[from] SourceError),

    #[error("{0}")]
    Table(#[from] TableError),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP-facing errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Invalid request.
    #[error("{0}")]
    BadRequest(String),

    /// The requested date has no records.
    #[error("No data for date {0}")]
    DateNotFound(String),

    #[error("Server error: {0}")]
    Summary(#[from] SummaryError),

    #[error("Server error: {0}")]
    Ai(#[from] AiError),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::DateNotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Summary(_) | ServerError::Ai(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        (self.status(), Json(error_body(&self.to_string()))).into_response()
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for source retrieval.
pub type SourceResult<T> = Result<T, SourceError>;

/// Result type for table operations.
pub type TableResult<T> = Result<T, TableError>;

/// Result type for AI operations.
pub type AiResult<T> = Result<T, AiError>;

/// Result type for summary runs.
pub type SummaryResult<T> = Result<T, SummaryError>;
