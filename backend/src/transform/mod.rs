//! Transformation module.
//!
//! Reshapes the wide performance table into per-date outlet records:
//! - Locator: header columns to outlet blocks
//! - Extractor + coercion: rows to records
//! - Grouper: records by date
//! - Sanitize: typed null normalization before serialization
//! - Pipeline: the whole run

pub mod coerce;
pub mod extractor;
pub mod grouper;
pub mod locator;
pub mod pipeline;
pub mod sanitize;

pub use coerce::safe_float;
pub use extractor::{extract_block, extract_row};
pub use grouper::{collect_records, group_records, DateGroupsBuilder};
pub use locator::{locate_blocks, locate_blocks_with, BlockLayout};
pub use pipeline::*;
pub use sanitize::{sanitize, sanitized, Scalar, Shape, ToShape};
