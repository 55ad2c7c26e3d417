use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use rust_dbpack::model::rules;
use rust_dbpack::{compile_db, CompileOptions};

#[derive(Parser)]
#[command(name = "rust-dbpack")]
#[command(author, version, about = "Fast Rust compiler for XML schema descriptions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile schema description folders into a DB package
    Compile {
        /// Folder with the product's TABLE, PACKAGE, VIEW, ... description folders
        #[arg(short, long)]
        source: PathBuf,

        /// Shared description folders and TOOLS templates
        #[arg(short, long)]
        common: Option<PathBuf>,

        /// Output folder for DB and DB.zip
        #[arg(short, long)]
        target: PathBuf,

        /// Release number recorded in RELEASE.TXT and the install script
        #[arg(short, long)]
        release: String,

        /// Prepend SNAPSHOT_ID to tables and primary keys (1, yes, true, on)
        #[arg(
            long,
            env = "DBPACK_ENABLE_SNAPSHOT",
            num_args = 0..=1,
            default_missing_value = "true"
        )]
        enable_snapshot: Option<String>,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn setup_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Compile {
            source,
            common,
            target,
            release,
            enable_snapshot,
            verbose,
        } => {
            setup_logging(verbose);

            let options = CompileOptions {
                source_dir: source,
                common_dir: common,
                target_dir: target,
                release_number: release,
                enable_snapshot: enable_snapshot.as_deref().is_some_and(rules::is_truthy),
                verbose,
            };

            compile_db(options)?;
        }
    }

    Ok(())
}
