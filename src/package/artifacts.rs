//! Per-table artifact rendering and writing

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::Result;
use crate::metadata::DictionaryEncoder;
use crate::model::Table;

use super::layout::write_error;

/// Everything generated for one table
#[derive(Debug, Clone)]
pub struct TableArtifacts {
    pub name: String,
    pub table_ddl: String,
    /// Present when the table declares indexes
    pub index_ddl: Option<String>,
    /// Present when the table is loaded on install or upgrade
    pub control_file: Option<String>,
    pub object_metadata: String,
    pub column_metadata: String,
    pub index_metadata: String,
}

impl TableArtifacts {
    pub fn render(table: &Table, encoder: &DictionaryEncoder) -> Result<Self> {
        let has_indexes = !table.indexes().is_empty();
        Ok(Self {
            name: table.name().to_string(),
            table_ddl: table.table_ddl(),
            index_ddl: has_indexes.then(|| table.index_ddl()),
            control_file: table.control_file()?,
            object_metadata: table.object_metadata(encoder)?,
            column_metadata: table.column_metadata(encoder)?,
            index_metadata: if has_indexes {
                table.index_metadata(encoder)?
            } else {
                String::new()
            },
        })
    }

    /// Write the SQL and control files of this table under `db_dir`.
    pub fn write_files(&self, db_dir: &Path) -> Result<()> {
        let table_dir = db_dir.join("TABLE");

        let path = table_dir.join(format!("{}.SQL", self.name));
        fs::write(&path, &self.table_ddl).map_err(write_error(&path))?;

        if let Some(index_ddl) = &self.index_ddl {
            let path = table_dir.join(format!("{}.IDX.SQL", self.name));
            fs::write(&path, index_ddl).map_err(write_error(&path))?;
        }

        if let Some(control_file) = &self.control_file {
            let path = db_dir.join("INIT_TABLE").join(format!("{}.CTL", self.name));
            fs::write(&path, control_file).map_err(write_error(&path))?;
        }

        Ok(())
    }
}

/// Render all tables in parallel. The encoder must already hold both dictionary tables.
pub fn render_tables(
    tables: &[Table],
    encoder: &DictionaryEncoder,
) -> Result<Vec<TableArtifacts>> {
    tables
        .par_iter()
        .map(|table| TableArtifacts::render(table, encoder))
        .collect()
}

/// Appends records to a dictionary data file
pub struct DataFileWriter {
    path: PathBuf,
    file: std::io::BufWriter<fs::File>,
}

impl DataFileWriter {
    pub fn open(path: &Path) -> Result<Self> {
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(write_error(path))?;
        Ok(Self {
            path: path.to_path_buf(),
            file: std::io::BufWriter::new(file),
        })
    }

    pub fn append(&mut self, records: &str) -> Result<()> {
        self.file
            .write_all(records.as_bytes())
            .map_err(write_error(&self.path))
    }

    pub fn finish(mut self) -> Result<()> {
        self.file.flush().map_err(write_error(&self.path))
    }
}
