//! Positional record layout for one dictionary table

use std::collections::BTreeMap;

use crate::error::{DbPackError, Result};
use crate::model::rules::RECORD_TERMINATOR;
use crate::model::Table;

/// Field order of a dictionary table's data file, taken from its sorted columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordTemplate {
    table: String,
    fields: Vec<String>,
}

impl RecordTemplate {
    pub fn from_table(table: &Table) -> Self {
        Self {
            table: table.name().to_string(),
            fields: table
                .sorted_columns()
                .iter()
                .map(|c| c.name().to_lowercase())
                .collect(),
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Render one record: every field double-quoted, comma separated, terminated.
    ///
    /// Values must already be escaped.
    pub fn render(&self, values: &BTreeMap<String, String>) -> Result<String> {
        let mut record = String::with_capacity(self.fields.len() * 16);
        for (i, field) in self.fields.iter().enumerate() {
            let value = values
                .get(field)
                .ok_or_else(|| DbPackError::MissingField {
                    table: self.table.clone(),
                    field: field.clone(),
                })?;
            if i > 0 {
                record.push(',');
            }
            record.push('"');
            record.push_str(value);
            record.push('"');
        }
        record.push_str(RECORD_TERMINATOR);
        Ok(record)
    }
}
