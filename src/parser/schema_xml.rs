//! Parser for table and program-unit description files.
//!
//! A table file looks like:
//!
//! ```xml
//! <table name="LO_TEST" init_on_install="yes">
//!   <documentation>Test table</documentation>
//!   <columns>
//!     <column name="ID" data_type="NUMBER" nullable="false">
//!       <default_value>0</default_value>
//!     </column>
//!   </columns>
//!   <indexes>
//!     <index type="PRIMARY"><columns><column name="id"/></columns></index>
//!   </indexes>
//! </table>
//! ```
//!
//! Program units use the object type as the root tag, e.g. `<package name="PKG_X"/>`.

use std::path::Path;

use roxmltree::{Document, Node};
use tracing::{info, warn};

use crate::error::{DbPackError, Result};
use crate::model::{Column, Index, ObjectType, ProceduralObject, SchemaContext, Table};

/// Parse a table description file. Returns `None` when the root is not `<table>`.
pub fn parse_table(
    ctx: &SchemaContext,
    path: &Path,
    enable_snapshot: bool,
) -> Result<Option<Table>> {
    info!("Start processing table file: {}", path.display());
    let content = read_file(path)?;
    let table =
        parse_table_str(ctx, &content, enable_snapshot).map_err(|e| with_path(e, path))?;
    if table.is_none() {
        warn!("Not a table file: {}", path.display());
    }
    info!("Finish processing table file: {}", path.display());
    Ok(table)
}

/// Parse a table description from XML text.
pub fn parse_table_str(
    ctx: &SchemaContext,
    content: &str,
    enable_snapshot: bool,
) -> Result<Option<Table>> {
    let doc = Document::parse(content).map_err(|e| DbPackError::SchemaFileParse {
        path: Default::default(),
        source: e,
    })?;
    let root = doc.root_element();
    if !root.tag_name().name().eq_ignore_ascii_case("table") {
        return Ok(None);
    }

    let mut table = Table::from_attributes(ctx, attributes(&root), enable_snapshot)?;
    if let Some(documentation) = child_text(&root, "documentation") {
        table.set_documentation(documentation);
    }

    for column_node in children(&root, "columns").flat_map(|n| children_of(n, "column")) {
        let mut attrs = attributes(&column_node);
        // documentation, default_value and sql_loader_ctl_expression arrive as child elements
        attrs.extend(
            column_node
                .children()
                .filter(Node::is_element)
                .map(|child| (child.tag_name().name(), child.text().unwrap_or(""))),
        );
        table.add_column(Column::from_attributes(ctx, attrs)?);
    }

    for index_node in children(&root, "indexes").flat_map(|n| children_of(n, "index")) {
        // function-based indexes carry no column list and are not generated
        let columns = children(&index_node, "columns")
            .flat_map(|n| children_of(n, "column"))
            .filter_map(|c| c.attribute("name"))
            .map(|name| name.to_uppercase())
            .collect::<Vec<_>>()
            .join(",");
        if columns.is_empty() {
            continue;
        }

        let mut index = Index::from_attributes(attributes(&index_node))?;
        index.set_columns(&columns)?;
        table.add_index(index)?;
    }

    Ok(Some(table))
}

/// Parse a program-unit description file. Returns `None` for an unknown root tag.
pub fn parse_procedural(path: &Path) -> Result<Option<ProceduralObject>> {
    info!("Start processing xml file: {}", path.display());
    let content = read_file(path)?;
    let object = parse_procedural_str(&content).map_err(|e| with_path(e, path))?;
    if object.is_none() {
        warn!("Not a program unit file: {}", path.display());
    }
    info!("Finish processing xml file: {}", path.display());
    Ok(object)
}

/// Parse a program-unit description from XML text.
pub fn parse_procedural_str(content: &str) -> Result<Option<ProceduralObject>> {
    let doc = Document::parse(content).map_err(|e| DbPackError::SchemaFileParse {
        path: Default::default(),
        source: e,
    })?;
    let root = doc.root_element();
    let tag = root.tag_name().name();
    if tag.parse::<ObjectType>().is_err() {
        return Ok(None);
    }

    let mut object = ProceduralObject::from_attributes(tag, attributes(&root))?;
    if let Some(documentation) = child_text(&root, "documentation") {
        object.set_documentation(documentation);
    }
    Ok(Some(object))
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| DbPackError::SchemaFileRead {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Attach the file path to XML syntax errors.
fn with_path(err: DbPackError, path: &Path) -> DbPackError {
    match err {
        DbPackError::SchemaFileParse { source, .. } => DbPackError::SchemaFileParse {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    }
}

fn attributes<'a>(node: &Node<'a, '_>) -> Vec<(&'a str, &'a str)> {
    node.attributes().map(|a| (a.name(), a.value())).collect()
}

fn children<'a, 'input>(
    node: &Node<'a, 'input>,
    tag: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    children_of(*node, tag)
}

fn children_of<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == tag)
}

fn child_text<'a>(node: &Node<'a, '_>, tag: &'static str) -> Option<&'a str> {
    children(node, tag).next().and_then(|n| n.text())
}
