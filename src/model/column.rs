//! Table column model

use std::collections::BTreeMap;

use tracing::error;

use crate::error::{DbPackError, Result};

use super::loader::loader_fragment;
use super::rules::{
    is_truthy, normalize_name, or_default, require, upper_or, DEFAULT_PRODUCT_CODE,
    DEFAULT_RELEASE, DEFAULT_STORY,
};
use super::SchemaContext;

type Setter = fn(&mut Column, &str) -> Result<()>;

/// Attribute names accepted by [`Column::apply_attributes`]
const SETTERS: &[(&str, Setter)] = &[
    ("name", |c, v| c.set_name(v)),
    ("data_type", |c, v| c.set_data_type(v)),
    ("nullable", |c, v| {
        c.set_nullable(v);
        Ok(())
    }),
    ("default_value", |c, v| {
        c.set_default_value(v);
        Ok(())
    }),
    ("documentation", |c, v| {
        c.set_documentation(v);
        Ok(())
    }),
    ("story", |c, v| {
        c.set_story(v);
        Ok(())
    }),
    ("release", |c, v| {
        c.set_release(v);
        Ok(())
    }),
    ("products", |c, v| {
        c.set_products(v);
        Ok(())
    }),
    ("sql_loader_ctl_expression", |c, v| {
        c.set_sql_loader_expression(v);
        Ok(())
    }),
    ("deprecated_release", |c, v| {
        c.set_deprecated_release(v);
        Ok(())
    }),
    ("sequence_name", |c, v| {
        c.set_sequence_name(v);
        Ok(())
    }),
];

/// One column of a table.
///
/// Equality is by name only.
#[derive(Debug, Clone)]
pub struct Column {
    name: String,
    data_type: String,
    nullable: bool,
    default_value: String,
    documentation: String,
    story: String,
    release: String,
    products: String,
    sql_loader_expression: Option<String>,
    deprecated_release: String,
    sequence_name: String,
    order: u64,
}

impl Column {
    /// Create a column, taking the next creation order from `ctx`.
    pub fn new(ctx: &SchemaContext, name: &str, data_type: &str) -> Result<Self> {
        let mut column = Self::from_parts(ctx, "", "");
        column.set_name(name)?;
        column.set_data_type(data_type)?;
        Ok(column)
    }

    /// Build a column from an attribute mapping. `name` and `data_type` are required.
    pub fn from_attributes<'a, I>(ctx: &SchemaContext, attributes: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let attributes: Vec<(&str, &str)> = attributes.into_iter().collect();
        let lookup = |key: &str| {
            attributes
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| *v)
                .unwrap_or("")
        };

        let mut column = Self::new(ctx, lookup("name"), lookup("data_type"))?;
        column.apply_attributes(attributes)?;
        Ok(column)
    }

    /// Unvalidated constructor for names known to be valid.
    pub(crate) fn from_parts(ctx: &SchemaContext, name: &str, data_type: &str) -> Self {
        Self {
            name: name.to_uppercase(),
            data_type: data_type.to_uppercase(),
            nullable: true,
            default_value: String::new(),
            documentation: String::new(),
            story: DEFAULT_STORY.to_string(),
            release: DEFAULT_RELEASE.to_string(),
            products: DEFAULT_PRODUCT_CODE.to_string(),
            sql_loader_expression: None,
            deprecated_release: String::new(),
            sequence_name: String::new(),
            order: ctx.next_order(),
        }
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
        self.name = normalize_name("Column", value)?;
        Ok(())
    }

    pub fn data_type(&self) -> &str {
        &self.data_type
    }

    pub fn set_data_type(&mut self, value: &str) -> Result<()> {
        require("Column data type", value)?;
        self.data_type = value.trim().to_uppercase();
        Ok(())
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Unrecognized values make the column NOT NULL.
    pub fn set_nullable(&mut self, value: &str) {
        self.nullable = is_truthy(value);
    }

    pub fn default_value(&self) -> &str {
        &self.default_value
    }

    pub fn set_default_value(&mut self, value: &str) {
        self.default_value = value.to_string();
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

    pub fn set_story(&mut self, value: &str) {
        self.story = upper_or(value, DEFAULT_STORY);
    }

    pub fn release(&self) -> &str {
        &self.release
    }

    pub fn set_release(&mut self, value: &str) {
        self.release = or_default(value, DEFAULT_RELEASE);
    }

    pub fn products(&self) -> &str {
        &self.products
    }

    pub fn set_products(&mut self, value: &str) {
        self.products = or_default(value, DEFAULT_PRODUCT_CODE);
    }

    pub fn sql_loader_expression(&self) -> Option<&str> {
        self.sql_loader_expression.as_deref()
    }

    pub fn set_sql_loader_expression(&mut self, value: &str) {
        self.sql_loader_expression = if value.trim().is_empty() {
            None
        } else {
            Some(value.to_string())
        };
    }

    pub fn deprecated_release(&self) -> &str {
        &self.deprecated_release
    }

    pub fn set_deprecated_release(&mut self, value: &str) {
        self.deprecated_release = value.to_string();
    }

    pub fn sequence_name(&self) -> &str {
        &self.sequence_name
    }

    pub fn set_sequence_name(&mut self, value: &str) {
        self.sequence_name = value.to_string();
    }

    /// Creation order within the owning [`SchemaContext`]
    pub fn order(&self) -> u64 {
        self.order
    }

    /// Column definition line for CREATE TABLE, always ending in a comma.
    pub fn ddl_fragment(&self) -> String {
        let mut ddl = format!("\"{}\" {}", self.name, self.data_type);
        if !self.default_value.is_empty() {
            ddl.push_str(" DEFAULT ");
            ddl.push_str(&self.default_value);
        }
        if !self.nullable {
            ddl.push_str(" NOT NULL");
        }
        ddl.push(',');
        ddl
    }

    /// Field clause for the SQL*Loader control file, starting with a comma.
    pub fn loader_field_fragment(&self) -> Result<String> {
        if let Some(expression) = &self.sql_loader_expression {
            return Ok(format!(",{} {}", self.name, expression));
        }

        loader_fragment(&self.name, &self.data_type).ok_or_else(|| {
            error!(
                "Unknown column data type: [name: {}, data_type: {}]",
                self.name, self.data_type
            );
            DbPackError::UnsupportedType {
                column: self.name.clone(),
                data_type: self.data_type.clone(),
            }
        })
    }

    /// Field values describing this column in DB_TABLE_COLUMNS.
    pub fn metadata_fields(&self) -> BTreeMap<String, String> {
        [
            ("column_name", self.name.as_str()),
            ("data_type", self.data_type.as_str()),
            ("nullable", if self.nullable { "Y" } else { "N" }),
            ("column_desc", self.documentation.as_str()),
            ("default_value", self.default_value.as_str()),
            ("story_id", self.story.as_str()),
            ("products", self.products.as_str()),
            ("release", self.release.as_str()),
            ("deprecated_release", self.deprecated_release.as_str()),
            ("sequence_name", self.sequence_name.as_str()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }
}

impl PartialEq for Column {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Column {}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[name: {}, data_type: {}]", self.name, self.data_type)
    }
}
