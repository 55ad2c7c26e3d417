//! Dictionary-table metadata records

mod encoder;
mod template;

pub use encoder::{escape_value, DictionaryEncoder, DictionaryKind};
pub use template::RecordTemplate;
