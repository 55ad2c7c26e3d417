//! Renders DB_OBJECTS and DB_TABLE_COLUMNS data-file records.

use std::collections::BTreeMap;

use once_cell::sync::OnceCell;
use tracing::{error, info};

use crate::error::{DbPackError, Result};
use crate::model::{Column, Table};

use super::template::RecordTemplate;

/// The two bookkeeping tables records are rendered for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictionaryKind {
    DbObjects,
    DbTableColumns,
}

impl DictionaryKind {
    pub fn table_name(&self) -> &'static str {
        match self {
            DictionaryKind::DbObjects => "DB_OBJECTS",
            DictionaryKind::DbTableColumns => "DB_TABLE_COLUMNS",
        }
    }
}

#[derive(Debug, Default)]
struct DictionarySlot {
    table: Option<Table>,
    defaults: BTreeMap<String, String>,
    template: OnceCell<RecordTemplate>,
}

impl DictionarySlot {
    fn template(&self) -> Option<&RecordTemplate> {
        let table = self.table.as_ref()?;
        Some(self.template.get_or_init(|| RecordTemplate::from_table(table)))
    }
}

/// Holds the registered dictionary table definitions.
///
/// Register both tables before rendering. Once registered, rendering only
/// reads, so a shared reference can be used from several threads.
#[derive(Debug, Default)]
pub struct DictionaryEncoder {
    db_objects: DictionarySlot,
    db_table_columns: DictionarySlot,
}

impl DictionaryEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, kind: DictionaryKind) -> &DictionarySlot {
        match kind {
            DictionaryKind::DbObjects => &self.db_objects,
            DictionaryKind::DbTableColumns => &self.db_table_columns,
        }
    }

    fn slot_mut(&mut self, kind: DictionaryKind) -> &mut DictionarySlot {
        match kind {
            DictionaryKind::DbObjects => &mut self.db_objects,
            DictionaryKind::DbTableColumns => &mut self.db_table_columns,
        }
    }

    /// Bind `table` as the column layout for `kind`.
    ///
    /// Registering the same kind again is accepted only when the new table has
    /// the same column layout as the registered one.
    pub fn register_table(&mut self, kind: DictionaryKind, table: Table) -> Result<()> {
        let expected = kind.table_name();
        info!("Initializing table {}.", expected);

        if table.name() != expected {
            let message = format!(
                "Failed to initialize table {}, the given table is {}",
                expected,
                table.name()
            );
            error!("{}", message);
            return Err(DbPackError::state(message));
        }

        let slot = self.slot_mut(kind);
        if let Some(registered) = &slot.table {
            if RecordTemplate::from_table(registered) != RecordTemplate::from_table(&table) {
                let message = format!(
                    "Table {} is already registered with a different column layout",
                    expected
                );
                error!("{}", message);
                return Err(DbPackError::state(message));
            }
        }

        slot.defaults = table
            .columns()
            .values()
            .map(|c| {
                (
                    c.name().to_lowercase(),
                    strip_single_quotes(c.default_value()).to_string(),
                )
            })
            .collect();
        slot.table = Some(table);
        slot.template = OnceCell::new();

        info!("Finish initializing table {}.", expected);
        Ok(())
    }

    pub fn is_registered(&self, kind: DictionaryKind) -> bool {
        self.slot(kind).table.is_some()
    }

    /// The registered definition for `kind`
    pub fn table(&self, kind: DictionaryKind) -> Option<&Table> {
        self.slot(kind).table.as_ref()
    }

    /// One DB_OBJECTS record built from `fields` over the table's column defaults.
    pub fn render_object_record(&self, fields: &BTreeMap<String, String>) -> Result<String> {
        self.render(DictionaryKind::DbObjects, fields)
    }

    /// One DB_TABLE_COLUMNS record per column, numbered from 1.
    pub fn render_column_records(&self, table_name: &str, columns: &[&Column]) -> Result<String> {
        let mut records = String::new();
        for (idx, column) in columns.iter().enumerate() {
            let mut fields = column.metadata_fields();
            fields.insert("table_name".to_string(), table_name.to_string());
            fields.insert("column_id".to_string(), (idx + 1).to_string());
            records.push_str(&self.render(DictionaryKind::DbTableColumns, &fields)?);
        }
        Ok(records)
    }

    fn render(&self, kind: DictionaryKind, fields: &BTreeMap<String, String>) -> Result<String> {
        let slot = self.slot(kind);
        let template = slot.template().ok_or_else(|| {
            DbPackError::state(format!("Table {} is not registered", kind.table_name()))
        })?;

        let mut values = slot.defaults.clone();
        values.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
        for value in values.values_mut() {
            *value = escape_value(value);
        }

        template.render(&values)
    }
}

/// Double every embedded double quote, as the loader expects inside quoted fields.
pub fn escape_value(value: &str) -> String {
    value.replace('"', "\"\"")
}

/// A default such as `'Y'` has to load as `Y` or it overflows a VARCHAR2(1).
fn strip_single_quotes(value: &str) -> &str {
    value.trim_matches('\'')
}
