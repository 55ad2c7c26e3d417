//! Folder layout of the generated DB package

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{DbPackError, Result};

/// Top-level folders of a DB package
pub const DB_FOLDERS: [&str; 11] = [
    "TOOLS",
    "TABLE",
    "INIT_TABLE",
    "VIEW",
    "PACKAGE",
    "PROCEDURE",
    "FUNCTION",
    "TYPE",
    "TRIGGER",
    "SEQUENCE",
    "SYNONYM",
];

/// Subfolders of `TOOLS`
pub const TOOLS_FOLDERS: [&str; 3] = ["SCHEMA_CREATION", "COMMON", "AUTO_UPGRADE"];

/// Folders holding raw schema description and source files
pub const RAW_FOLDERS: [&str; 9] = [
    "TABLE",
    "VIEW",
    "PACKAGE",
    "PROCEDURE",
    "FUNCTION",
    "TYPE",
    "TRIGGER",
    "SEQUENCE",
    "SYNONYM",
];

pub(crate) fn write_error(path: &Path) -> impl FnOnce(std::io::Error) -> DbPackError + '_ {
    move |source| DbPackError::OutputWrite {
        path: path.to_path_buf(),
        source,
    }
}

/// Create `<root>/<name>` with the package folders, replacing any existing tree.
pub fn create_structure(root: &Path, name: &str) -> Result<PathBuf> {
    let db_dir = root.join(name);
    info!("Start creating the folder structure: {}", db_dir.display());

    if db_dir.exists() {
        fs::remove_dir_all(&db_dir).map_err(write_error(&db_dir))?;
    }
    for folder in DB_FOLDERS {
        let path = db_dir.join(folder);
        fs::create_dir_all(&path).map_err(write_error(&path))?;
    }
    for folder in TOOLS_FOLDERS {
        let path = db_dir.join("TOOLS").join(folder);
        fs::create_dir_all(&path).map_err(write_error(&path))?;
    }

    info!("Finish creating the folder structure: {}", db_dir.display());
    Ok(db_dir)
}

/// Copy the raw schema folders of `from_db_dir` into `to_db_dir`. Missing folders are skipped.
pub fn copy_raw_files(from_db_dir: &Path, to_db_dir: &Path) -> Result<()> {
    info!("Start copying db raw files from {}", from_db_dir.display());

    for folder in RAW_FOLDERS {
        let source_dir = from_db_dir.join(folder);
        if !source_dir.is_dir() {
            continue;
        }
        let target_dir = to_db_dir.join(folder);
        fs::create_dir_all(&target_dir).map_err(write_error(&target_dir))?;

        for file in list_files(&source_dir)? {
            let Some(file_name) = file.file_name() else {
                continue;
            };
            debug!("Copying {}", file.display());
            let target = target_dir.join(file_name);
            fs::copy(&file, &target).map_err(write_error(&target))?;
        }
    }

    info!("Finish copying db raw files.");
    Ok(())
}

/// Copy every file under `from_db_dir/TOOLS` into the same place in `to_db_dir`.
pub fn copy_template_files(from_db_dir: &Path, to_db_dir: &Path) -> Result<()> {
    let tools_dir = from_db_dir.join("TOOLS");
    if !tools_dir.is_dir() {
        return Ok(());
    }
    info!("Start copying template files...");

    for entry in WalkDir::new(&tools_dir).min_depth(1) {
        let entry = entry.map_err(|e| DbPackError::SchemaFileRead {
            path: tools_dir.clone(),
            source: e.into(),
        })?;
        let Ok(relative) = entry.path().strip_prefix(from_db_dir) else {
            continue;
        };
        let target = to_db_dir.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(write_error(&target))?;
        } else {
            fs::copy(entry.path(), &target).map_err(write_error(&target))?;
        }
    }

    info!("Finish copying template files.");
    Ok(())
}

/// Seed the upgrade dictionary data files from the install ones.
pub fn clone_metadata(db_dir: &Path) -> Result<()> {
    info!("Start cloning db metadata...");

    let init_dir = db_dir.join("INIT_TABLE");
    for name in ["DB_OBJECTS", "DB_TABLE_COLUMNS"] {
        let source = init_dir.join(format!("{}.DAT", name));
        let target = init_dir.join(format!("{}_UPGRADE.DAT", name));
        fs::copy(&source, &target).map_err(write_error(&target))?;
    }

    info!("Finish cloning db metadata.");
    Ok(())
}

pub fn write_release_file(db_dir: &Path, release_number: &str) -> Result<()> {
    let path = db_dir.join("RELEASE.TXT");
    fs::write(&path, release_number).map_err(write_error(&path))
}

/// Regular files directly inside `dir`, sorted by name.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| DbPackError::SchemaFileRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| DbPackError::SchemaFileRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Schema description files (`*.XML`, any case) directly inside `dir`.
pub fn list_schema_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    Ok(list_files(dir)?
        .into_iter()
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("xml"))
        })
        .collect())
}
