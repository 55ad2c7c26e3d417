//! Unit tests for the column model

use rust_dbpack::model::{Column, SchemaContext};
use rust_dbpack::DbPackError;

// ============================================================================
// Construction and Validation Tests
// ============================================================================

#[test]
fn test_name_and_type_are_upper_cased() {
    let ctx = SchemaContext::new();
    let column = Column::new(&ctx, "created_by", " varchar2(30) ").unwrap();

    assert_eq!(column.name(), "CREATED_BY");
    assert_eq!(column.data_type(), "VARCHAR2(30)");
    assert!(column.is_nullable());
    assert_eq!(column.story(), "US138139");
    assert_eq!(column.release(), "4.0.0.0");
    assert_eq!(column.products(), "W");
}

#[test]
fn test_name_longer_than_30_is_rejected() {
    let ctx = SchemaContext::new();
    let result = Column::new(&ctx, &"C".repeat(31), "NUMBER");

    assert!(
        matches!(result, Err(DbPackError::Validation { .. })),
        "31 character column name should fail validation"
    );
    assert!(Column::new(&ctx, &"C".repeat(30), "NUMBER").is_ok());
}

#[test]
fn test_name_limit_is_in_bytes() {
    let ctx = SchemaContext::new();
    // 16 two-byte characters
    let name = "\u{00C9}".repeat(16);
    assert!(matches!(
        Column::new(&ctx, &name, "NUMBER"),
        Err(DbPackError::Validation { .. })
    ));
}

#[test]
fn test_empty_data_type_is_rejected() {
    let ctx = SchemaContext::new();
    assert!(matches!(
        Column::new(&ctx, "ID", "  "),
        Err(DbPackError::Validation { .. })
    ));
}

#[test]
fn test_from_attributes_requires_name() {
    let ctx = SchemaContext::new();
    let result = Column::from_attributes(&ctx, [("data_type", "NUMBER")]);
    assert!(matches!(result, Err(DbPackError::Validation { .. })));
}

#[test]
fn test_from_attributes_ignores_unknown_keys() {
    let ctx = SchemaContext::new();
    let column = Column::from_attributes(
        &ctx,
        [
            ("name", "qty"),
            ("data_type", "number"),
            ("nullable", "no"),
            ("colour", "blue"),
            ("story", "us1"),
            ("sequence_name", "SEQ_QTY"),
        ],
    )
    .unwrap();

    assert_eq!(column.name(), "QTY");
    assert!(!column.is_nullable());
    assert_eq!(column.story(), "US1");
    assert_eq!(column.sequence_name(), "SEQ_QTY");
}

#[test]
fn test_empty_metadata_falls_back_to_defaults() {
    let ctx = SchemaContext::new();
    let mut column = Column::new(&ctx, "ID", "NUMBER").unwrap();
    column.set_story("us42");
    assert_eq!(column.story(), "US42");

    column.set_story("");
    column.set_release("");
    column.set_products("");
    assert_eq!(column.story(), "US138139");
    assert_eq!(column.release(), "4.0.0.0");
    assert_eq!(column.products(), "W");
}

// ============================================================================
// Ordering Tests
// ============================================================================

#[test]
fn test_order_strictly_increases() {
    let ctx = SchemaContext::new();
    let orders: Vec<u64> = ["A", "B", "C", "D"]
        .iter()
        .map(|name| Column::new(&ctx, name, "NUMBER").unwrap().order())
        .collect();

    for pair in orders.windows(2) {
        assert!(pair[0] < pair[1], "orders should increase: {:?}", orders);
    }
}

#[test]
fn test_equality_is_by_name() {
    let ctx = SchemaContext::new();
    let a = Column::new(&ctx, "ID", "NUMBER").unwrap();
    let b = Column::new(&ctx, "id", "VARCHAR2(10)").unwrap();
    let c = Column::new(&ctx, "OTHER", "NUMBER").unwrap();

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.to_string(), "[name: ID, data_type: NUMBER]");
}

// ============================================================================
// DDL Fragment Tests
// ============================================================================

#[test]
fn test_ddl_fragment_plain() {
    let ctx = SchemaContext::new();
    let column = Column::new(&ctx, "ID", "NUMBER").unwrap();
    assert_eq!(column.ddl_fragment(), "\"ID\" NUMBER,");
}

#[test]
fn test_ddl_fragment_default_and_not_null() {
    let ctx = SchemaContext::new();
    let mut column = Column::new(&ctx, "ID", "NUMBER").unwrap();
    column.set_default_value("1");
    column.set_nullable("false");
    assert_eq!(column.ddl_fragment(), "\"ID\" NUMBER DEFAULT 1 NOT NULL,");
}

#[test]
fn test_nullable_truth_vocabulary() {
    let ctx = SchemaContext::new();
    let mut column = Column::new(&ctx, "ID", "NUMBER").unwrap();

    for value in ["1", "Yes", "TRUE", "on"] {
        column.set_nullable(value);
        assert!(column.is_nullable(), "{} should keep the column nullable", value);
    }
    for value in ["0", "N", "off", "whatever"] {
        column.set_nullable(value);
        assert!(!column.is_nullable(), "{} should make the column NOT NULL", value);
    }
}

// ============================================================================
// Loader Fragment Tests
// ============================================================================

#[test]
fn test_loader_fragment_short_varchar() {
    let ctx = SchemaContext::new();
    let column = Column::new(&ctx, "NAME", "VARCHAR2(100)").unwrap();
    assert_eq!(
        column.loader_field_fragment().unwrap(),
        ",NAME CHAR(100) \"TO_CHAR(:NAME)\""
    );
}

#[test]
fn test_loader_fragment_long_varchar_is_split() {
    let ctx = SchemaContext::new();
    let column = Column::new(&ctx, "NOTES", "VARCHAR2(2500)").unwrap();
    assert_eq!(
        column.loader_field_fragment().unwrap(),
        ",NOTES CHAR(2500) \"TO_CHAR(SUBSTR(:NOTES,1,2000))||TO_CHAR(SUBSTR(:NOTES,2001))\""
    );
}

#[test]
fn test_loader_fragment_clob() {
    let ctx = SchemaContext::new();
    let column = Column::new(&ctx, "PAYLOAD", "CLOB").unwrap();
    assert_eq!(
        column.loader_field_fragment().unwrap(),
        ", PAYLOAD# FILTER CHAR\n,PAYLOAD CHAR(1048576) ENCLOSED BY '<start_lob>' AND '<end_lob>' NULLIF PAYLOAD#='Y'"
    );
}

#[test]
fn test_loader_fragment_rowid_binds_column() {
    let ctx = SchemaContext::new();
    let column = Column::new(&ctx, "ROW_REF", "ROWID").unwrap();
    assert_eq!(
        column.loader_field_fragment().unwrap(),
        ",ROW_REF CHAR(30) \"TO_CHAR(:ROW_REF)\""
    );
}

#[test]
fn test_loader_fragment_unsupported_type() {
    let ctx = SchemaContext::new();
    let column = Column::new(&ctx, "FLAG", "BOOLEAN").unwrap();

    match column.loader_field_fragment() {
        Err(DbPackError::UnsupportedType { column, data_type }) => {
            assert_eq!(column, "FLAG");
            assert_eq!(data_type, "BOOLEAN");
        }
        other => panic!("Expected UnsupportedType, got {:?}", other),
    }
}

#[test]
fn test_loader_expression_overrides_type_rules() {
    let ctx = SchemaContext::new();
    let mut column = Column::new(&ctx, "FLAG", "BOOLEAN").unwrap();
    column.set_sql_loader_expression("CONSTANT 'Y'");
    assert_eq!(column.loader_field_fragment().unwrap(), ",FLAG CONSTANT 'Y'");

    column.set_sql_loader_expression("   ");
    assert!(column.sql_loader_expression().is_none());
}

// ============================================================================
// Metadata Field Tests
// ============================================================================

#[test]
fn test_metadata_fields() {
    let ctx = SchemaContext::new();
    let mut column = Column::new(&ctx, "ID", "NUMBER").unwrap();
    column.set_nullable("no");
    column.set_documentation("Primary id");
    column.set_deprecated_release("6.0.0.0");

    let fields = column.metadata_fields();
    assert_eq!(fields["column_name"], "ID");
    assert_eq!(fields["data_type"], "NUMBER");
    assert_eq!(fields["nullable"], "N");
    assert_eq!(fields["column_desc"], "Primary id");
    assert_eq!(fields["default_value"], "");
    assert_eq!(fields["deprecated_release"], "6.0.0.0");
    assert!(!fields.contains_key("table_name"));
}
