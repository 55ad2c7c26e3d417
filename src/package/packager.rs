//! Create the DB ZIP package

use std::fs::File;
use std::io;
use std::path::Path;

use tracing::info;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::{DbPackError, Result};

use super::layout::write_error;

/// Zip the `db_dir` tree into `output_path`, keeping the folder name as the entry prefix.
pub fn create_package(db_dir: &Path, output_path: &Path) -> Result<()> {
    info!("Start generating db zip package...");

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent).map_err(write_error(output_path))?;
    }
    let file = File::create(output_path).map_err(write_error(output_path))?;

    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .compression_level(Some(1));

    let base = db_dir.parent().unwrap_or(db_dir);
    for entry in WalkDir::new(db_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| DbPackError::SchemaFileRead {
            path: db_dir.to_path_buf(),
            source: e.into(),
        })?;
        let Ok(relative) = entry.path().strip_prefix(base) else {
            continue;
        };
        // ZIP entry names always use forward slashes
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if entry.file_type().is_dir() {
            zip.add_directory(name, options)?;
        } else {
            zip.start_file(name, options)?;
            let mut source = File::open(entry.path()).map_err(|e| DbPackError::SchemaFileRead {
                path: entry.path().to_path_buf(),
                source: e,
            })?;
            io::copy(&mut source, &mut zip).map_err(write_error(output_path))?;
        }
    }

    zip.finish()?;

    info!("Finish generating db zip package: {}", output_path.display());
    Ok(())
}
