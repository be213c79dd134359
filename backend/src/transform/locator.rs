//! Locate outlet column blocks in the header row.
//!
//! ```text
//!   idx-2   idx-1   idx        idx+1  idx+2  idx+3  idx+4  idx+5  idx+6
//! ┌───────┬───────┬──────────┬──────┬──────┬──────┬──────┬──────┬──────┐
//! │ Date  │ Type  │ <Outlet> │Score │ CLS  │ LCP  │  SI  │ TBT  │ FCP  │
//! └───────┴───────┴──────────┴──────┴──────┴──────┴──────┴──────┴──────┘
//! ```

use crate::catalog::OutletCatalog;
use crate::error::{TableError, TableResult};
use crate::models::{Metric, OutletBlock};

/// Column offsets of a block, relative to the outlet column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLayout {
    pub date_offset: isize,
    pub type_offset: isize,
    pub first_metric_offset: isize,
}

impl Default for BlockLayout {
    fn default() -> Self {
        Self {
            date_offset: -2,
            type_offset: -1,
            first_metric_offset: 1,
        }
    }
}

impl BlockLayout {
    fn first_offset(&self) -> isize {
        self.date_offset
            .min(self.type_offset)
            .min(self.first_metric_offset)
            .min(0)
    }

    fn last_offset(&self) -> isize {
        let last_metric = self.first_metric_offset + Metric::ALL.len() as isize - 1;
        self.date_offset.max(self.type_offset).max(last_metric).max(0)
    }

    /// Derive the block for an outlet found at `column`, checking every
    /// derived index against the header `width`.
    pub fn derive(&self, outlet: &str, column: usize, width: usize) -> TableResult<OutletBlock> {
        let first = column as isize + self.first_offset();
        let last = column as isize + self.last_offset();

        if first < 0 || last >= width as isize {
            return Err(TableError::Malformed {
                outlet: outlet.to_string(),
                column,
                first,
                last,
                width,
            });
        }

        let at = |offset: isize| (column as isize + offset) as usize;
        let mut metric_columns = [0; 6];
        for (i, slot) in metric_columns.iter_mut().enumerate() {
            *slot = at(self.first_metric_offset + i as isize);
        }

        Ok(OutletBlock {
            outlet: outlet.to_string(),
            column,
            date_column: at(self.date_offset),
            type_column: at(self.type_offset),
            metric_columns,
        })
    }
}

/// Find every header column whose trimmed label equals a catalog outlet.
///
/// Blocks come out in catalog order, then left to right. An outlet matched
/// twice yields two blocks. Any block that does not fit inside the header
/// fails the whole table.
pub fn locate_blocks(headers: &[String], catalog: &OutletCatalog) -> TableResult<Vec<OutletBlock>> {
    locate_blocks_with(headers, catalog, BlockLayout::default())
}

pub fn locate_blocks_with(
    headers: &[String],
    catalog: &OutletCatalog,
    layout: BlockLayout,
) -> TableResult<Vec<OutletBlock>> {
    let mut blocks = Vec::new();

    for outlet in catalog.iter() {
        for (column, label) in headers.iter().enumerate() {
            if label.trim() == outlet {
                blocks.push(layout.derive(outlet, column, headers.len())?);
            }
        }
    }

    Ok(blocks)
}
