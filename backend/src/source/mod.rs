//! Retrieval of the source table.
//!
//! The table is refetched on every call: no cache, no retry, no coalescing.

use std::fmt;
use std::path::PathBuf;

use crate::error::{SourceError, SourceResult};
use crate::table::decode_table;

/// Where the performance table comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSource {
    /// Published CSV export, fetched over HTTP(S).
    Url(String),
    /// Local CSV file.
    File(PathBuf),
}

impl TableSource {
    /// Fetch the table and decode it to text.
    pub async fn load(&self) -> SourceResult<String> {
        let bytes = match self {
            TableSource::Url(url) => fetch_url(url).await?,
            TableSource::File(path) => tokio::fs::read(path).await?,
        };
        Ok(decode_table(&bytes))
    }
}

impl fmt::Display for TableSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableSource::Url(url) => write!(f, "{}", url),
            TableSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

async fn fetch_url(url: &str) -> SourceResult<Vec<u8>> {
    let response = reqwest::get(url).await?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SourceError::Status {
            status: status.as_u16(),
            body: body.chars().take(200).collect(),
        });
    }

    Ok(response.bytes().await?.to_vec())
}
