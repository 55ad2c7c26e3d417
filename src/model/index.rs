//! Table index and constraint model

use tracing::debug;

use crate::error::{DbPackError, Result};

use super::rules::{
    is_dictionary_object, normalize_name, or_default, require, upper_or, DEFAULT_RELEASE,
    DEFAULT_STORY, SNAPSHOT_COLUMN,
};

/// Index kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexKind {
    Primary,
    Unique,
    #[default]
    NonUnique,
}

impl IndexKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexKind::Primary => "PRIMARY",
            IndexKind::Unique => "UNIQUE",
            IndexKind::NonUnique => "NON-UNIQUE",
        }
    }
}

impl std::str::FromStr for IndexKind {
    type Err = DbPackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "PRIMARY" => Ok(IndexKind::Primary),
            "UNIQUE" => Ok(IndexKind::Unique),
            "NON-UNIQUE" => Ok(IndexKind::NonUnique),
            "" => Err(DbPackError::validation("Index type cannot be empty")),
            other => Err(DbPackError::validation(format!(
                "Index type can only be \"PRIMARY\", \"UNIQUE\" or \"NON-UNIQUE\", got \"{}\"",
                other
            ))),
        }
    }
}

type Setter = fn(&mut Index, &str) -> Result<()>;

const SETTERS: &[(&str, Setter)] = &[
    ("name", |i, v| i.set_name(v)),
    // table descriptions call the index name "old_name"
    ("old_name", |i, v| i.set_name(v)),
    ("type", |i, v| i.set_type(v)),
    ("table_name", |i, v| i.set_table_name(v)),
    ("columns", |i, v| i.set_columns(v)),
    ("story", |i, v| {
        i.set_story(v);
        Ok(())
    }),
    ("release", |i, v| {
        i.set_release(v);
        Ok(())
    }),
];

/// A primary key, unique constraint or plain index on one table.
///
/// The name may be left unset and assigned when the index is added to a table.
#[derive(Debug, Clone, Default)]
pub struct Index {
    name: Option<String>,
    kind: IndexKind,
    table_name: Option<String>,
    columns: Option<String>,
    story: String,
    release: String,
    snapshot_tracking: bool,
}

impl Index {
    pub fn new() -> Self {
        Self {
            story: DEFAULT_STORY.to_string(),
            release: DEFAULT_RELEASE.to_string(),
            ..Default::default()
        }
    }

    pub fn from_attributes<'a, I>(attributes: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut index = Self::new();
        index.apply_attributes(attributes)?;
        Ok(index)
    }

    /// Apply every recognized attribute; unknown keys are ignored.
    pub fn apply_attributes<'a, I>(&mut self, attributes: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (key, value) in attributes {
            let key = key.to_lowercase();
            if let Some((_, setter)) = SETTERS.iter().find(|(name, _)| *name == key) {
                setter(self, value)?;
            }
        }
        Ok(())
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, value: &str) -> Result<()> {
        self.name = Some(normalize_name("Index", value)?);
        Ok(())
    }

    pub fn kind(&self) -> IndexKind {
        self.kind
    }

    pub fn set_type(&mut self, value: &str) -> Result<()> {
        self.kind = value.parse()?;
        Ok(())
    }

    pub fn table_name(&self) -> Option<&str> {
        self.table_name.as_deref()
    }

    pub fn set_table_name(&mut self, value: &str) -> Result<()> {
        require("Index table name", value)?;
        self.table_name = Some(value.to_uppercase());
        Ok(())
    }

    /// Columns as declared, without the snapshot column.
    pub fn declared_columns(&self) -> Option<&str> {
        self.columns.as_deref()
    }

    pub fn set_columns(&mut self, value: &str) -> Result<()> {
        require("Index columns", value)?;
        self.columns = Some(value.to_string());
        Ok(())
    }

    pub fn story(&self) -> &str {
        &self.story
    }

    pub fn set_story(&mut self, value: &str) {
        self.story = upper_or(value, DEFAULT_STORY);
    }

    pub fn release(&self) -> &str {
        &self.release
    }

    pub fn set_release(&mut self, value: &str) {
        self.release = or_default(value, DEFAULT_RELEASE);
    }

    pub fn snapshot_tracking(&self) -> bool {
        self.snapshot_tracking
    }

    pub fn set_snapshot_tracking(&mut self, enabled: bool) {
        self.snapshot_tracking = enabled;
    }

    /// Columns used in the DDL.
    ///
    /// A primary key on a snapshot-tracked, non-dictionary table leads with
    /// `SNAPSHOT_ID` unless the declaration already names it.
    pub fn columns(&self) -> Option<String> {
        let columns = self.columns.as_deref()?;
        let table_name = self.table_name.as_deref().unwrap_or("");

        let inject = self.kind == IndexKind::Primary
            && self.snapshot_tracking
            && !columns.to_uppercase().contains(SNAPSHOT_COLUMN)
            && !is_dictionary_object(table_name);

        if inject {
            Some(format!("{},{}", SNAPSHOT_COLUMN, columns))
        } else {
            Some(columns.to_string())
        }
    }

    /// Generate a name for an index declared without one.
    ///
    /// `sequence` is the number of indexes the table already holds.
    pub fn auto_name(&mut self, table_name: &str, sequence: usize) -> Result<()> {
        let name = match self.kind {
            IndexKind::Primary => format!("PK_{}", table_name),
            _ => format!("I{}_{}", sequence, table_name),
        };
        self.set_name(&name)
    }

    /// Statement creating this index, or an empty string while the table,
    /// columns or name are still unknown.
    pub fn ddl_fragment(&self) -> String {
        let (Some(name), Some(table_name), Some(columns)) =
            (self.name.as_deref(), self.table_name.as_deref(), self.columns())
        else {
            return String::new();
        };

        let ddl = match self.kind {
            IndexKind::Primary => format!(
                "ALTER TABLE {} ADD CONSTRAINT {} PRIMARY KEY({}) USING INDEX TABLESPACE &1;",
                table_name, name, columns
            ),
            IndexKind::Unique => format!(
                "ALTER TABLE {} ADD CONSTRAINT {} UNIQUE ({}) USING INDEX TABLESPACE &1;",
                table_name, name, columns
            ),
            IndexKind::NonUnique => format!(
                "CREATE INDEX {} ON {} ({}) TABLESPACE &1;",
                name, table_name, columns
            ),
        };

        debug!("Index [{}] - SQL: {}", name, ddl);
        ddl
    }
}
