//! DB package generation

mod artifacts;
mod install_script;
pub mod layout;
mod packager;

pub use artifacts::{render_tables, DataFileWriter, TableArtifacts};
pub use install_script::generate_install_script;
pub use packager::create_package;
