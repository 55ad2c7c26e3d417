//! Per-run state shared by every schema object built during one compilation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use once_cell::sync::OnceCell;

use super::rules::{DEFAULT_PRODUCT_CODE, DEFAULT_STORY, SNAPSHOT_COLUMN};
use super::Column;

const SNAPSHOT_RELEASE: &str = "RO4.0";
const SNAPSHOT_DOCUMENTATION: &str =
    "Snapshot id, used to identify which snapshot the data was created from.";

/// Column creation counter and the shared snapshot column.
///
/// Columns take their `order` from the context they were created in, so DDL
/// column order follows declaration order across independently built tables.
/// Use one context per run; tests create a fresh one per case.
#[derive(Debug, Default)]
pub struct SchemaContext {
    next_order: AtomicU64,
    snapshot_column: OnceCell<Arc<Column>>,
}

impl SchemaContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next column creation order.
    pub(crate) fn next_order(&self) -> u64 {
        self.next_order.fetch_add(1, Ordering::Relaxed)
    }

    /// The `SNAPSHOT_ID` column, created on first use and never mutated afterwards.
    pub fn snapshot_column(&self) -> Arc<Column> {
        self.snapshot_column
            .get_or_init(|| {
                let mut column = Column::from_parts(self, SNAPSHOT_COLUMN, "NUMBER");
                column.set_nullable("FALSE");
                column.set_story(DEFAULT_STORY);
                column.set_release(SNAPSHOT_RELEASE);
                column.set_products(DEFAULT_PRODUCT_CODE);
                column.set_documentation(SNAPSHOT_DOCUMENTATION);
                Arc::new(column)
            })
            .clone()
    }
}
