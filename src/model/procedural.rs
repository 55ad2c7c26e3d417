//! Packages, procedures, functions, types, triggers and sequences.
//!
//! Their source text is copied verbatim by the packager; the model only
//! carries what DB_OBJECTS needs to know about them.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{DbPackError, Result};
use crate::metadata::DictionaryEncoder;

use super::rules::{
    normalize_name, or_default, parse_count, upper_or, DEFAULT_PRODUCT_CODE, DEFAULT_RELEASE,
    DEFAULT_STORY,
};

/// Kind of program unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Package,
    Procedure,
    Function,
    Type,
    Trigger,
    Sequence,
}

impl ObjectType {
    /// All kinds, in the order the packager processes them
    pub const ALL: [ObjectType; 6] = [
        ObjectType::Package,
        ObjectType::Procedure,
        ObjectType::Function,
        ObjectType::Type,
        ObjectType::Trigger,
        ObjectType::Sequence,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Package => "PACKAGE",
            ObjectType::Procedure => "PROCEDURE",
            ObjectType::Function => "FUNCTION",
            ObjectType::Type => "TYPE",
            ObjectType::Trigger => "TRIGGER",
            ObjectType::Sequence => "SEQUENCE",
        }
    }

    /// Extensions of the source files carrying the object's body
    pub fn source_extensions(&self) -> &'static [&'static str] {
        match self {
            ObjectType::Package => &["PKS", "PKB"],
            _ => &["SQL"],
        }
    }
}

impl std::str::FromStr for ObjectType {
    type Err = DbPackError;

    fn from_str(s: &str) -> Result<Self> {
        ObjectType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DbPackError::validation(format!("Unknown object type: {}", s)))
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

type Setter = fn(&mut ProceduralObject, &str) -> Result<()>;

const SETTERS: &[(&str, Setter)] = &[
    ("name", |p, v| {
        p.name = normalize_name(p.object_type.as_str(), v)?;
        Ok(())
    }),
    ("story", |p, v| {
        p.story = upper_or(v, DEFAULT_STORY);
        Ok(())
    }),
    ("release", |p, v| {
        p.release = or_default(v, DEFAULT_RELEASE);
        Ok(())
    }),
    ("products_formula", |p, v| {
        p.products_formula = or_default(v, DEFAULT_PRODUCT_CODE);
        Ok(())
    }),
    ("documentation", |p, v| {
        p.documentation = v.to_string();
        Ok(())
    }),
    ("install_order", |p, v| {
        p.install_order = parse_count("install_order", v, 1)?;
        Ok(())
    }),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProceduralObject {
    object_type: ObjectType,
    name: String,
    story: String,
    release: String,
    products_formula: String,
    documentation: String,
    install_order: u32,
}

impl ProceduralObject {
    /// Fails when `object_type` is not a known kind or `name` is not a valid identifier.
    pub fn new(object_type: &str, name: &str) -> Result<Self> {
        let object_type: ObjectType = object_type.parse()?;
        Ok(Self {
            name: normalize_name(object_type.as_str(), name)?,
            object_type,
            story: DEFAULT_STORY.to_string(),
            release: DEFAULT_RELEASE.to_string(),
            products_formula: DEFAULT_PRODUCT_CODE.to_string(),
            documentation: String::new(),
            install_order: 1,
        })
    }

    pub fn from_attributes<'a, I>(object_type: &str, attributes: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let attributes: Vec<(&str, &str)> = attributes.into_iter().collect();
        let name = attributes
            .iter()
            .find(|(k, _)| *k == "name")
            .map(|(_, v)| *v)
            .unwrap_or("");

        let mut object = Self::new(object_type, name)?;
        object.apply_attributes(attributes)?;
        Ok(object)
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

    pub fn object_type(&self) -> ObjectType {
        self.object_type
    }

    pub fn name(&self) -> &str {
        &self.name
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

    pub fn documentation(&self) -> &str {
        &self.documentation
    }

    pub fn set_documentation(&mut self, value: &str) {
        self.documentation = value.to_string();
    }

    pub fn install_order(&self) -> u32 {
        self.install_order
    }

    /// Field values describing this object in DB_OBJECTS.
    pub fn metadata_fields(&self) -> BTreeMap<String, String> {
        let install_order = self.install_order.to_string();
        [
            ("table_name", self.name.as_str()),
            ("object_type", self.object_type.as_str()),
            ("description", self.documentation.as_str()),
            ("release", self.release.as_str()),
            ("relevant_for", self.products_formula.as_str()),
            ("story_id", self.story.as_str()),
            ("install_order", install_order.as_str()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    /// DB_OBJECTS record for this object
    pub fn metadata(&self, encoder: &DictionaryEncoder) -> Result<String> {
        let metadata = encoder.render_object_record(&self.metadata_fields())?;
        debug!("[{}] metadata in table DB_OBJECTS:\n{}", self.name, metadata);
        Ok(metadata)
    }
}
