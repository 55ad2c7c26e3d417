//! Table model and the artifacts generated from it

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{DbPackError, Result};
use crate::metadata::DictionaryEncoder;

use super::rules::{
    is_dictionary_object, normalize_name, or_default, parse_count, upper_or, yes_no,
    DEFAULT_PRODUCT_CODE, DEFAULT_RELEASE, DEFAULT_STORY, DEFAULT_TABLE_TYPE, RECORD_TERMINATOR,
    SNAPSHOT_COLUMN,
};
use super::{Column, Index, SchemaContext};

/// Column types that force a conventional-path load
const NON_DIRECT_TYPES: [&str; 3] = ["CLOB", "BLOB", "LONG"];

type Setter = fn(&mut Table, &str) -> Result<()>;

const SETTERS: &[(&str, Setter)] = &[
    ("name", |t, v| t.set_name(v)),
    ("documentation", |t, v| {
        t.documentation = v.to_string();
        Ok(())
    }),
    ("story", |t, v| {
        t.story = upper_or(v, DEFAULT_STORY);
        Ok(())
    }),
    ("release", |t, v| {
        t.release = or_default(v, DEFAULT_RELEASE);
        Ok(())
    }),
    ("products_formula", |t, v| {
        t.products_formula = or_default(v, DEFAULT_PRODUCT_CODE);
        Ok(())
    }),
    ("type", |t, v| {
        t.table_type = upper_or(v, DEFAULT_TABLE_TYPE);
        Ok(())
    }),
    ("standard_or_custom", |t, v| {
        t.set_standard_or_custom(v);
        Ok(())
    }),
    ("logging", |t, v| {
        t.logging = yes_no(v);
        Ok(())
    }),
    ("init_trans", |t, v| {
        t.init_trans = parse_count("init_trans", v, 1)?;
        Ok(())
    }),
    ("init_on_install", |t, v| {
        t.init_on_install = yes_no(v);
        Ok(())
    }),
    ("init_on_upgrade", |t, v| {
        t.init_on_upgrade = yes_no(v);
        Ok(())
    }),
    ("init_on_demand", |t, v| {
        t.init_on_demand = yes_no(v);
        Ok(())
    }),
];

/// A table with its columns and indexes.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    documentation: String,
    story: String,
    release: String,
    products_formula: String,
    table_type: String,
    logging: &'static str,
    init_on_install: &'static str,
    init_on_upgrade: &'static str,
    init_on_demand: &'static str,
    standard_or_custom: &'static str,
    init_trans: u32,
    columns: HashMap<String, Column>,
    /// Kept in the order they were added
    indexes: Vec<Index>,
    /// Present only when snapshot tracking is enabled
    snapshot_column: Option<Arc<Column>>,
}

impl Table {
    /// Create an empty table. Snapshot tracking is fixed here for the table's lifetime.
    pub fn new(ctx: &SchemaContext, name: &str, enable_snapshot: bool) -> Result<Self> {
        Ok(Self {
            name: normalize_name("Table", name)?,
            documentation: String::new(),
            story: DEFAULT_STORY.to_string(),
            release: DEFAULT_RELEASE.to_string(),
            products_formula: DEFAULT_PRODUCT_CODE.to_string(),
            table_type: DEFAULT_TABLE_TYPE.to_string(),
            logging: "N",
            init_on_install: "N",
            init_on_upgrade: "N",
            init_on_demand: "N",
            standard_or_custom: "S",
            init_trans: 1,
            columns: HashMap::new(),
            indexes: Vec::new(),
            snapshot_column: enable_snapshot.then(|| ctx.snapshot_column()),
        })
    }

    /// Build a table from its attribute mapping. `name` is required.
    pub fn from_attributes<'a, I>(
        ctx: &SchemaContext,
        attributes: I,
        enable_snapshot: bool,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let attributes: Vec<(&str, &str)> = attributes.into_iter().collect();
        let name = attributes
            .iter()
            .find(|(k, _)| *k == "name")
            .map(|(_, v)| *v)
            .ok_or_else(|| DbPackError::validation("Table name is not set"))?;

        let mut table = Self::new(ctx, name, enable_snapshot)?;
        table.apply_attributes(attributes)?;
        Ok(table)
    }

    /// Apply every recognized attribute; unknown keys are ignored.
    pub fn apply_attributes<'a, I>(&mut self, attributes: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (key, value) in attributes {
            if let Some((_, setter)) = SETTERS.iter().find(|(name, _)| *name == key) {
                setter(self, value)?;
            }
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, value: &str) -> Result<()> {
        self.name = normalize_name("Table", value)?;
        Ok(())
    }

    pub fn documentation(&self) -> &str {
        &self.documentation
    }

    pub fn set_documentation(&mut self, value: &str) {
        self.documentation = value.to_string();
    }

    pub fn story(&self) -> &str {
        &self.story
    }

    pub fn release(&self) -> &str {
        &self.release
    }

    pub fn products_formula(&self) -> &str {
        &self.products_formula
    }

    pub fn table_type(&self) -> &str {
        &self.table_type
    }

    pub fn logging(&self) -> &str {
        self.logging
    }

    pub fn init_on_install(&self) -> &str {
        self.init_on_install
    }

    pub fn init_on_upgrade(&self) -> &str {
        self.init_on_upgrade
    }

    pub fn init_on_demand(&self) -> &str {
        self.init_on_demand
    }

    pub fn standard_or_custom(&self) -> &str {
        self.standard_or_custom
    }

    pub fn set_standard_or_custom(&mut self, value: &str) {
        let value = value.trim();
        self.standard_or_custom =
            if value.eq_ignore_ascii_case("S") || value.eq_ignore_ascii_case("STANDARD") {
                "S"
            } else {
                "C"
            };
    }

    pub fn init_trans(&self) -> u32 {
        self.init_trans
    }

    pub fn snapshot_tracking(&self) -> bool {
        self.snapshot_column.is_some()
    }

    pub fn columns(&self) -> &HashMap<String, Column> {
        &self.columns
    }

    pub fn indexes(&self) -> &[Index] {
        &self.indexes
    }

    /// Insert a column, replacing any existing column of the same name.
    pub fn add_column(&mut self, column: Column) {
        self.columns.insert(column.name().to_string(), column);
    }

    /// Attach an index, naming it first if it was declared without a name.
    pub fn add_index(&mut self, mut index: Index) -> Result<()> {
        if index.name().is_none() {
            index.auto_name(&self.name, self.indexes.len())?;
            warn!(
                "Table {} has an index without a name, generated {}",
                self.name,
                index.name().unwrap_or_default()
            );
        }

        index.set_table_name(&self.name)?;
        index.set_snapshot_tracking(self.snapshot_tracking());

        match self
            .indexes
            .iter_mut()
            .find(|existing| existing.name() == index.name())
        {
            Some(existing) => *existing = index,
            None => self.indexes.push(index),
        }
        Ok(())
    }

    /// Columns in DDL order.
    ///
    /// The snapshot column leads on snapshot-tracked, non-dictionary tables;
    /// every other column follows in creation order.
    pub fn sorted_columns(&self) -> Vec<&Column> {
        let mut columns: Vec<&Column> = Vec::with_capacity(self.columns.len() + 1);
        if let Some(snapshot) = &self.snapshot_column {
            if !is_dictionary_object(&self.name) {
                columns.push(snapshot.as_ref());
            }
        }

        let mut declared: Vec<&Column> = self
            .columns
            .values()
            .filter(|c| c.name() != SNAPSHOT_COLUMN)
            .collect();
        declared.sort_by_key(|c| c.order());
        columns.extend(declared);

        columns
    }

    /// CREATE TABLE statement
    pub fn table_ddl(&self) -> String {
        let mut ddl = vec![format!("CREATE TABLE \"{}\" (", self.name)];
        let mut lines: Vec<String> = self
            .sorted_columns()
            .iter()
            .map(|c| c.ddl_fragment())
            .collect();
        if let Some(last) = lines.last_mut() {
            last.pop();
        }
        ddl.extend(lines);
        ddl.push(")".to_string());
        ddl.push("ENABLE ROW MOVEMENT TABLESPACE &1;".to_string());

        let ddl = ddl.join("\n");
        debug!("Table [{}] - SQL:\n{}", self.name, ddl);
        ddl
    }

    /// Index statements, one per line
    pub fn index_ddl(&self) -> String {
        let ddl = self
            .indexes
            .iter()
            .map(|i| i.ddl_fragment())
            .filter(|fragment| !fragment.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        debug!("Table [{}] - Indexes:\n{}", self.name, ddl);
        ddl
    }

    /// SQL*Loader control file, or `None` when the table is never loaded.
    pub fn control_file(&self) -> Result<Option<String>> {
        if self.init_on_install != "Y" && self.init_on_upgrade != "Y" {
            return Ok(None);
        }
        self.control_file_into(&self.name).map(Some)
    }

    /// SQL*Loader control file loading `<target>.DAT` into table `target`
    /// with this table's column layout, regardless of the init flags.
    pub fn control_file_into(&self, target: &str) -> Result<String> {
        let direct = !self
            .columns
            .values()
            .any(|c| NON_DIRECT_TYPES.contains(&c.data_type()));

        let mut fields = self
            .sorted_columns()
            .iter()
            .map(|c| c.loader_field_fragment())
            .collect::<Result<Vec<_>>>()?;
        if let Some(first) = fields.first_mut() {
            *first = first.trim_start_matches(',').to_string();
        }
        fields.push(")".to_string());

        let control = format!(
            "OPTIONS (SILENT=(HEADER, FEEDBACK), DIRECT={direct})\n\
             LOAD DATA\n\
             CHARACTERSET UTF8\n\
             LENGTH SEMANTICS CHAR\n\
             BYTEORDERMARK CHECK\n\
             INFILE '{table}.DAT' \"STR '{terminator}'\"\n\
             APPEND\n\
             INTO TABLE {table}\n\
             FIELDS TERMINATED BY ',' OPTIONALLY ENCLOSED BY '\"' AND '\"'\n\
             TRAILING NULLCOLS\n\
             (\n{fields}",
            direct = if direct { "TRUE" } else { "FALSE" },
            table = target,
            terminator = RECORD_TERMINATOR.escape_default(),
            fields = fields.join("\n"),
        );

        debug!("Table [{}]'s control file:\n{}", target, control);
        Ok(control)
    }

    /// Field values describing this table in DB_OBJECTS.
    pub fn metadata_fields(&self) -> BTreeMap<String, String> {
        let init_trans = self.init_trans.to_string();
        [
            ("table_name", self.name.as_str()),
            ("table_type", self.table_type.as_str()),
            ("object_type", "TABLE"),
            ("standard_custom", self.standard_or_custom),
            ("description", self.documentation.as_str()),
            ("release", self.release.as_str()),
            ("relevant_for", self.products_formula.as_str()),
            ("story_id", self.story.as_str()),
            ("init_on_install", self.init_on_install),
            ("init_on_upgrade", self.init_on_upgrade),
            ("init_on_demand", self.init_on_demand),
            ("ini_trans", init_trans.as_str()),
            ("logging", self.logging),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    /// Field values describing each index in DB_OBJECTS, in index order.
    pub fn index_metadata_fields(&self) -> Vec<BTreeMap<String, String>> {
        self.indexes
            .iter()
            .map(|index| {
                let columns = index.columns().unwrap_or_default();
                [
                    ("table_name", index.name().unwrap_or_default()),
                    ("table_type", index.kind().as_str()),
                    ("hist_table_name", self.name.as_str()),
                    ("parameter", columns.as_str()),
                    ("object_type", "INDEX"),
                    ("standard_custom", self.standard_or_custom),
                    ("release", index.release()),
                    ("relevant_for", self.products_formula.as_str()),
                    ("story_id", index.story()),
                ]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
            })
            .collect()
    }

    /// DB_OBJECTS record for the table itself
    pub fn object_metadata(&self, encoder: &DictionaryEncoder) -> Result<String> {
        let metadata = encoder.render_object_record(&self.metadata_fields())?;
        debug!("Table [{}] metadata in table DB_OBJECTS:\n{}", self.name, metadata);
        Ok(metadata)
    }

    /// DB_TABLE_COLUMNS records, one per sorted column
    pub fn column_metadata(&self, encoder: &DictionaryEncoder) -> Result<String> {
        let metadata = encoder.render_column_records(&self.name, &self.sorted_columns())?;
        debug!(
            "Table [{}] metadata in table DB_TABLE_COLUMNS:\n{}",
            self.name, metadata
        );
        Ok(metadata)
    }

    /// DB_OBJECTS records for the table's indexes
    pub fn index_metadata(&self, encoder: &DictionaryEncoder) -> Result<String> {
        let metadata = self
            .index_metadata_fields()
            .iter()
            .map(|fields| encoder.render_object_record(fields))
            .collect::<Result<String>>()?;
        debug!(
            "Table [{}]'s index metadata in table DB_OBJECTS:\n{}",
            self.name, metadata
        );
        Ok(metadata)
    }
}
