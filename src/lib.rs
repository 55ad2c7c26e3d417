//! rust-dbpack: A fast Rust compiler for XML schema descriptions
//!
//! This library turns table and program-unit description files into the
//! artifacts needed to install or upgrade an Oracle schema: table and index
//! DDL, SQL*Loader control files, and the data files of the DB_OBJECTS and
//! DB_TABLE_COLUMNS dictionary tables.

pub mod error;
pub mod metadata;
pub mod model;
pub mod package;
pub mod parser;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

pub use error::DbPackError;

use metadata::{DictionaryEncoder, DictionaryKind};
use model::{ObjectType, SchemaContext, Table};
use package::layout;
use package::DataFileWriter;

/// Options for compiling a DB package
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Folder holding this product's TABLE, PACKAGE, ... description folders
    pub source_dir: PathBuf,
    /// Shared description folders and TOOLS templates, copied before `source_dir`
    pub common_dir: Option<PathBuf>,
    /// Where the DB folder and DB.zip are created
    pub target_dir: PathBuf,
    /// Release number written to RELEASE.TXT and the install script
    pub release_number: String,
    /// Prepend SNAPSHOT_ID to every non-dictionary table and primary key
    pub enable_snapshot: bool,
    /// Enable verbose output
    pub verbose: bool,
}

/// Compile the schema descriptions into `<target>/DB` and package it as `<target>/DB.zip`.
pub fn compile_db(options: CompileOptions) -> Result<PathBuf> {
    info!("------------ B E G I N ------------");

    let db_dir = layout::create_structure(&options.target_dir, "DB")?;
    let staging_dir = layout::create_structure(&options.target_dir, "DB_STAGING")?;

    if let Some(common_dir) = &options.common_dir {
        layout::copy_raw_files(common_dir, &staging_dir)?;
    }
    layout::copy_raw_files(&options.source_dir, &staging_dir)?;

    let ctx = SchemaContext::new();
    let encoder = register_dictionary_tables(&ctx, &staging_dir)?;

    generate_tables(&ctx, &encoder, &staging_dir, &db_dir, options.enable_snapshot)?;
    process_procedural_objects(&encoder, &staging_dir, &db_dir)?;
    layout::clone_metadata(&db_dir)?;
    write_upgrade_control_files(&encoder, &db_dir)?;

    info!("Start generating installation script (ifs)...");
    let script = package::generate_install_script(&db_dir, &options.release_number)?;
    let script_path = db_dir
        .join("TOOLS")
        .join("SCHEMA_CREATION")
        .join("IFS_MODEL.SQL");
    std::fs::write(&script_path, script)
        .with_context(|| format!("Failed to write {}", script_path.display()))?;
    info!("Finish generating installation script.");

    if let Some(common_dir) = &options.common_dir {
        layout::copy_template_files(common_dir, &db_dir)?;
    }
    layout::write_release_file(&db_dir, &options.release_number)?;

    let package_path = options.target_dir.join("DB.zip");
    package::create_package(&db_dir, &package_path)?;

    std::fs::remove_dir_all(&staging_dir)
        .with_context(|| format!("Failed to remove {}", staging_dir.display()))?;

    if options.verbose {
        println!("Created package: {}", package_path.display());
    }
    info!("------------ E N D ------------");
    Ok(package_path)
}

/// Parse DB_OBJECTS.XML and DB_TABLE_COLUMNS.XML and register them with a new encoder.
fn register_dictionary_tables(
    ctx: &SchemaContext,
    staging_dir: &Path,
) -> Result<DictionaryEncoder> {
    let mut encoder = DictionaryEncoder::new();
    for kind in [DictionaryKind::DbObjects, DictionaryKind::DbTableColumns] {
        let path = staging_dir
            .join("TABLE")
            .join(format!("{}.XML", kind.table_name()));
        let table = parser::parse_table(ctx, &path, false)?.ok_or_else(|| {
            DbPackError::InvalidSchemaFile {
                path: path.clone(),
                message: "expected a <table> description".to_string(),
            }
        })?;
        encoder.register_table(kind, table)?;
    }
    Ok(encoder)
}

/// Control files for the `*_UPGRADE` dictionary tables seeded by `clone_metadata`.
///
/// A loadable `<T>_UPGRADE.XML` description already produced its own control
/// file; otherwise the registered dictionary layout is used.
fn write_upgrade_control_files(encoder: &DictionaryEncoder, db_dir: &Path) -> Result<()> {
    for kind in [DictionaryKind::DbObjects, DictionaryKind::DbTableColumns] {
        let target = format!("{}_UPGRADE", kind.table_name());
        let path = db_dir.join("INIT_TABLE").join(format!("{}.CTL", target));
        if path.exists() {
            continue;
        }
        let Some(table) = encoder.table(kind) else {
            continue;
        };
        let control = table.control_file_into(&target)?;
        std::fs::write(&path, control)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(())
}

fn generate_tables(
    ctx: &SchemaContext,
    encoder: &DictionaryEncoder,
    staging_dir: &Path,
    db_dir: &Path,
    enable_snapshot: bool,
) -> Result<()> {
    info!("Start generating table SQL files...");

    let mut tables: Vec<Table> = Vec::new();
    for path in layout::list_schema_files(&staging_dir.join("TABLE"))? {
        if let Some(table) = parser::parse_table(ctx, &path, enable_snapshot)? {
            tables.push(table);
        }
    }

    let artifacts = package::render_tables(&tables, encoder)?;

    let init_dir = db_dir.join("INIT_TABLE");
    let mut db_objects = DataFileWriter::open(&init_dir.join("DB_OBJECTS.DAT"))?;
    let mut db_table_columns = DataFileWriter::open(&init_dir.join("DB_TABLE_COLUMNS.DAT"))?;
    for table in &artifacts {
        table.write_files(db_dir)?;
        db_table_columns.append(&table.column_metadata)?;
        db_objects.append(&table.object_metadata)?;
        db_objects.append(&table.index_metadata)?;
    }
    db_objects.finish()?;
    db_table_columns.finish()?;

    info!("Finish generating {} tables.", artifacts.len());
    Ok(())
}

fn process_procedural_objects(
    encoder: &DictionaryEncoder,
    staging_dir: &Path,
    db_dir: &Path,
) -> Result<()> {
    info!("Start processing procedural objects...");

    let mut db_objects =
        DataFileWriter::open(&db_dir.join("INIT_TABLE").join("DB_OBJECTS.DAT"))?;

    for object_type in ObjectType::ALL {
        let source_dir = staging_dir.join(object_type.as_str());
        let target_dir = db_dir.join(object_type.as_str());

        for path in layout::list_schema_files(&source_dir)? {
            let Some(object) = parser::parse_procedural(&path)? else {
                continue;
            };
            db_objects.append(&object.metadata(encoder)?)?;

            for extension in object_type.source_extensions() {
                let source = path.with_extension(extension);
                let Some(file_name) = source.file_name() else {
                    continue;
                };
                let target = target_dir.join(file_name);
                std::fs::copy(&source, &target).with_context(|| {
                    format!("Failed to copy {} to {}", source.display(), target.display())
                })?;
            }
        }
    }
    db_objects.finish()?;

    info!("Finish processing procedural objects.");
    Ok(())
}
