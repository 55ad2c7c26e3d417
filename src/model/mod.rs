//! In-memory schema object model

mod column;
mod context;
mod index;
mod loader;
mod procedural;
pub mod rules;
mod table;

pub use column::Column;
pub use context::SchemaContext;
pub use index::{Index, IndexKind};
pub use procedural::{ObjectType, ProceduralObject};
pub use table::Table;
