//! Unit tests for the table model and its generated artifacts

use pretty_assertions::assert_eq;

use rust_dbpack::model::{Column, Index, IndexKind, SchemaContext, Table};
use rust_dbpack::DbPackError;

fn column(ctx: &SchemaContext, name: &str, data_type: &str) -> Column {
    Column::new(ctx, name, data_type).unwrap()
}

fn lo_test(ctx: &SchemaContext, enable_snapshot: bool) -> Table {
    let mut table = Table::new(ctx, "lo_test", enable_snapshot).unwrap();
    let mut name = column(ctx, "NAME", "VARCHAR2(100)");
    name.set_nullable("false");
    table.add_column(name);
    table.add_column(column(ctx, "QTY", "NUMBER"));
    table
}

// ============================================================================
// Construction Tests
// ============================================================================

#[test]
fn test_table_defaults() {
    let ctx = SchemaContext::new();
    let table = Table::new(&ctx, "lo_test", false).unwrap();

    assert_eq!(table.name(), "LO_TEST");
    assert_eq!(table.table_type(), "REGULAR");
    assert_eq!(table.logging(), "N");
    assert_eq!(table.init_on_install(), "N");
    assert_eq!(table.standard_or_custom(), "S");
    assert_eq!(table.init_trans(), 1);
    assert!(!table.snapshot_tracking());
}

#[test]
fn test_from_attributes_coerces_flags() {
    let ctx = SchemaContext::new();
    let table = Table::from_attributes(
        &ctx,
        [
            ("name", "LO_TEST"),
            ("logging", "yes"),
            ("init_on_install", "TRUE"),
            ("init_on_upgrade", "maybe"),
            ("init_on_demand", "1"),
            ("standard_or_custom", "c"),
            ("init_trans", "4"),
            ("type", "temporary"),
        ],
        false,
    )
    .unwrap();

    assert_eq!(table.logging(), "Y");
    assert_eq!(table.init_on_install(), "Y");
    assert_eq!(table.init_on_upgrade(), "N");
    assert_eq!(table.init_on_demand(), "Y");
    assert_eq!(table.standard_or_custom(), "C");
    assert_eq!(table.init_trans(), 4);
    assert_eq!(table.table_type(), "TEMPORARY");
}

#[test]
fn test_from_attributes_rejects_bad_init_trans() {
    let ctx = SchemaContext::new();
    let result =
        Table::from_attributes(&ctx, [("name", "LO_TEST"), ("init_trans", "x")], false);
    assert!(matches!(result, Err(DbPackError::Validation { .. })));
}

#[test]
fn test_table_name_longer_than_30_is_rejected() {
    let ctx = SchemaContext::new();
    assert!(matches!(
        Table::new(&ctx, &"T".repeat(31), false),
        Err(DbPackError::Validation { .. })
    ));
}

#[test]
fn test_add_column_replaces_same_name() {
    let ctx = SchemaContext::new();
    let mut table = lo_test(&ctx, false);
    table.add_column(column(&ctx, "qty", "NUMBER(10,2)"));

    assert_eq!(table.columns().len(), 2);
    assert_eq!(table.columns()["QTY"].data_type(), "NUMBER(10,2)");
}

// ============================================================================
// Column Ordering Tests
// ============================================================================

#[test]
fn test_sorted_columns_follow_creation_order() {
    let ctx = SchemaContext::new();
    let mut table = Table::new(&ctx, "LO_TEST", false).unwrap();
    for name in ["ZETA", "ALPHA", "MIDDLE"] {
        table.add_column(column(&ctx, name, "NUMBER"));
    }

    let names: Vec<&str> = table.sorted_columns().iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["ZETA", "ALPHA", "MIDDLE"]);
}

#[test]
fn test_snapshot_column_comes_first() {
    let ctx = SchemaContext::new();
    let table = lo_test(&ctx, true);

    let names: Vec<&str> = table.sorted_columns().iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["SNAPSHOT_ID", "NAME", "QTY"]);
}

#[test]
fn test_declared_snapshot_column_is_not_duplicated() {
    let ctx = SchemaContext::new();
    let mut table = lo_test(&ctx, true);
    table.add_column(column(&ctx, "SNAPSHOT_ID", "VARCHAR2(10)"));

    let names: Vec<&str> = table.sorted_columns().iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["SNAPSHOT_ID", "NAME", "QTY"]);
    assert_eq!(table.sorted_columns()[0].data_type(), "NUMBER");
}

#[test]
fn test_dictionary_table_never_gets_snapshot_column() {
    let ctx = SchemaContext::new();
    let mut table = Table::new(&ctx, "DB_OBJECTS", true).unwrap();
    table.add_column(column(&ctx, "TABLE_NAME", "VARCHAR2(30)"));

    let names: Vec<&str> = table.sorted_columns().iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["TABLE_NAME"]);
}

// ============================================================================
// Index Tests
// ============================================================================

#[test]
fn test_add_index_auto_names() {
    let ctx = SchemaContext::new();
    let mut table = Table::new(&ctx, "FOO", false).unwrap();

    let mut primary = Index::new();
    primary.set_type("PRIMARY").unwrap();
    primary.set_columns("ID").unwrap();
    table.add_index(primary).unwrap();

    let mut plain = Index::new();
    plain.set_columns("NAME").unwrap();
    table.add_index(plain).unwrap();

    let names: Vec<_> = table.indexes().iter().map(|i| i.name()).collect();
    assert_eq!(names, vec![Some("PK_FOO"), Some("I1_FOO")]);
    assert!(table
        .indexes()
        .iter()
        .all(|i| i.table_name() == Some("FOO")));
}

#[test]
fn test_add_index_replaces_same_name() {
    let ctx = SchemaContext::new();
    let mut table = Table::new(&ctx, "FOO", false).unwrap();

    let mut first = Index::new();
    first.set_name("IX_FOO").unwrap();
    first.set_columns("A").unwrap();
    table.add_index(first).unwrap();

    let mut second = Index::new();
    second.set_name("IX_FOO").unwrap();
    second.set_type("UNIQUE").unwrap();
    second.set_columns("B").unwrap();
    table.add_index(second).unwrap();

    assert_eq!(table.indexes().len(), 1);
    assert_eq!(table.indexes()[0].kind(), IndexKind::Unique);
    assert_eq!(table.indexes()[0].declared_columns(), Some("B"));
}

#[test]
fn test_add_index_binds_snapshot_tracking() {
    let ctx = SchemaContext::new();
    let mut table = lo_test(&ctx, true);

    let mut primary = Index::new();
    primary.set_name("PK_LO_TEST").unwrap();
    primary.set_type("PRIMARY").unwrap();
    primary.set_columns("NAME").unwrap();
    table.add_index(primary).unwrap();

    assert_eq!(
        table.index_ddl(),
        "ALTER TABLE LO_TEST ADD CONSTRAINT PK_LO_TEST PRIMARY KEY(SNAPSHOT_ID,NAME) USING INDEX TABLESPACE &1;"
    );
}

#[test]
fn test_index_ddl_joins_statements() {
    let ctx = SchemaContext::new();
    let mut table = lo_test(&ctx, false);

    let mut primary = Index::new();
    primary.set_type("PRIMARY").unwrap();
    primary.set_columns("NAME").unwrap();
    table.add_index(primary).unwrap();

    let mut plain = Index::new();
    plain.set_columns("QTY").unwrap();
    table.add_index(plain).unwrap();

    assert_eq!(
        table.index_ddl(),
        "ALTER TABLE LO_TEST ADD CONSTRAINT PK_LO_TEST PRIMARY KEY(NAME) USING INDEX TABLESPACE &1;\n\
         CREATE INDEX I1_LO_TEST ON LO_TEST (QTY) TABLESPACE &1;"
    );
}

// ============================================================================
// Table DDL Tests
// ============================================================================

#[test]
fn test_table_ddl() {
    let ctx = SchemaContext::new();
    let table = lo_test(&ctx, false);

    assert_eq!(
        table.table_ddl(),
        "CREATE TABLE \"LO_TEST\" (\n\
         \"NAME\" VARCHAR2(100) NOT NULL,\n\
         \"QTY\" NUMBER\n\
         )\n\
         ENABLE ROW MOVEMENT TABLESPACE &1;"
    );
}

#[test]
fn test_table_ddl_with_snapshot() {
    let ctx = SchemaContext::new();
    let table = lo_test(&ctx, true);

    assert_eq!(
        table.table_ddl(),
        "CREATE TABLE \"LO_TEST\" (\n\
         \"SNAPSHOT_ID\" NUMBER NOT NULL,\n\
         \"NAME\" VARCHAR2(100) NOT NULL,\n\
         \"QTY\" NUMBER\n\
         )\n\
         ENABLE ROW MOVEMENT TABLESPACE &1;"
    );
}

// ============================================================================
// Control File Tests
// ============================================================================

#[test]
fn test_no_control_file_without_init_flags() {
    let ctx = SchemaContext::new();
    let table = Table::from_attributes(
        &ctx,
        [("name", "LO_TEST"), ("init_on_demand", "yes")],
        false,
    )
    .unwrap();
    assert!(table.control_file().unwrap().is_none());
}

#[test]
fn test_control_file() {
    let ctx = SchemaContext::new();
    let mut table =
        Table::from_attributes(&ctx, [("name", "LO_TEST"), ("init_on_install", "yes")], false)
            .unwrap();
    table.add_column(column(&ctx, "NAME", "VARCHAR2(100)"));
    table.add_column(column(&ctx, "QTY", "NUMBER"));

    let expected = r#"OPTIONS (SILENT=(HEADER, FEEDBACK), DIRECT=TRUE)
LOAD DATA
CHARACTERSET UTF8
LENGTH SEMANTICS CHAR
BYTEORDERMARK CHECK
INFILE 'LO_TEST.DAT' "STR '#$EOR$#\r\n'"
APPEND
INTO TABLE LO_TEST
FIELDS TERMINATED BY ',' OPTIONALLY ENCLOSED BY '"' AND '"'
TRAILING NULLCOLS
(
NAME CHAR(100) "TO_CHAR(:NAME)"
,QTY "TO_NUMBER(:QTY)"
)"#;
    assert_eq!(table.control_file().unwrap().unwrap(), expected);
}

#[test]
fn test_control_file_with_clob_is_not_direct() {
    let ctx = SchemaContext::new();
    let mut table =
        Table::from_attributes(&ctx, [("name", "LO_TEST"), ("init_on_upgrade", "on")], false)
            .unwrap();
    table.add_column(column(&ctx, "NAME", "VARCHAR2(100)"));
    table.add_column(column(&ctx, "PAYLOAD", "CLOB"));

    let control = table.control_file().unwrap().unwrap();
    assert!(control.starts_with("OPTIONS (SILENT=(HEADER, FEEDBACK), DIRECT=FALSE)\n"));
    assert!(control.contains(",PAYLOAD CHAR(1048576) ENCLOSED BY '<start_lob>' AND '<end_lob>'"));
}

#[test]
fn test_control_file_with_snapshot_column() {
    let ctx = SchemaContext::new();
    let mut table =
        Table::from_attributes(&ctx, [("name", "LO_TEST"), ("init_on_install", "1")], true)
            .unwrap();
    table.add_column(column(&ctx, "NAME", "VARCHAR2(10)"));

    let control = table.control_file().unwrap().unwrap();
    assert!(control.contains("(\nSNAPSHOT_ID \"TO_NUMBER(:SNAPSHOT_ID)\"\n,NAME CHAR(10)"));
}

#[test]
fn test_control_file_into_other_table_ignores_init_flags() {
    let ctx = SchemaContext::new();
    let table = lo_test(&ctx, false);
    assert!(table.control_file().unwrap().is_none());

    let control = table.control_file_into("LO_TEST_UPGRADE").unwrap();
    assert!(control.contains("INFILE 'LO_TEST_UPGRADE.DAT'"));
    assert!(control.contains("\nINTO TABLE LO_TEST_UPGRADE\n"));
    assert!(control.contains("\n,QTY \"TO_NUMBER(:QTY)\"\n)"));
}

#[test]
fn test_control_file_unsupported_type() {
    let ctx = SchemaContext::new();
    let mut table =
        Table::from_attributes(&ctx, [("name", "LO_TEST"), ("init_on_install", "yes")], false)
            .unwrap();
    table.add_column(column(&ctx, "FLAG", "BOOLEAN"));

    assert!(matches!(
        table.control_file(),
        Err(DbPackError::UnsupportedType { .. })
    ));
}

// ============================================================================
// Metadata Field Tests
// ============================================================================

#[test]
fn test_metadata_fields() {
    let ctx = SchemaContext::new();
    let mut table = Table::from_attributes(
        &ctx,
        [("name", "LO_TEST"), ("story", "us1"), ("init_trans", "")],
        false,
    )
    .unwrap();
    table.set_documentation("Test table");

    let fields = table.metadata_fields();
    assert_eq!(fields["table_name"], "LO_TEST");
    assert_eq!(fields["object_type"], "TABLE");
    assert_eq!(fields["story_id"], "US1");
    assert_eq!(fields["description"], "Test table");
    assert_eq!(fields["ini_trans"], "1");
    assert_eq!(fields["standard_custom"], "S");
}

#[test]
fn test_index_metadata_fields() {
    let ctx = SchemaContext::new();
    let mut table = lo_test(&ctx, true);

    let mut primary = Index::new();
    primary.set_type("PRIMARY").unwrap();
    primary.set_columns("NAME").unwrap();
    table.add_index(primary).unwrap();

    let fields = table.index_metadata_fields();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0]["table_name"], "PK_LO_TEST");
    assert_eq!(fields[0]["table_type"], "PRIMARY");
    assert_eq!(fields[0]["hist_table_name"], "LO_TEST");
    assert_eq!(fields[0]["parameter"], "SNAPSHOT_ID,NAME");
    assert_eq!(fields[0]["object_type"], "INDEX");
}
