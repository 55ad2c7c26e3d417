//! Schema description parsing

mod schema_xml;

pub use schema_xml::{parse_procedural, parse_procedural_str, parse_table, parse_table_str};
