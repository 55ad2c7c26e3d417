//! SQL*Loader field clauses keyed on the column data type.
//!
//! Rules are tried in order; the first pattern matching the (upper-cased)
//! data type renders the clause. No match means the type cannot be loaded.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Longest CHAR field SQL*Loader will apply a SQL function to
const LOADER_CHAR_LIMIT: u64 = 2000;

/// Size of the CHAR field used for LOB-like columns
const LOB_FIELD_SIZE: u32 = 1_048_576;

/// Length of the indicator-field prefix taken from a LOB column name
const LOB_INDICATOR_PREFIX: usize = 29;

struct LoaderRule {
    pattern: Regex,
    render: fn(&str, &Captures) -> String,
}

impl LoaderRule {
    fn new(pattern: &str, render: fn(&str, &Captures) -> String) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("valid loader rule pattern"),
            render,
        }
    }
}

static LOADER_RULES: LazyLock<Vec<LoaderRule>> = LazyLock::new(|| {
    vec![
        LoaderRule::new(
            r"^(CHAR|VARCHAR|VARCHAR2|NVARCHAR|NVARCHAR2)\s*\(\s*(?P<size>\d+)\s*\)",
            char_clause,
        ),
        LoaderRule::new(r"^(NUMBER|INTEGER|DECIMAL|FLOAT)", |name, _| {
            format!(",{0} \"TO_NUMBER(:{0})\"", name)
        }),
        LoaderRule::new(r"^DATE$", |name, _| {
            format!(",{} DATE \"YYYY-MM-DD HH24:MI:SS\"", name)
        }),
        LoaderRule::new(r"^TIMESTAMP", |name, _| {
            format!(",{} TIMESTAMP \"YYYY-MM-DD HH24:MI:SS:FF3\"", name)
        }),
        LoaderRule::new(r"^(CLOB|LONG|XMLTYPE)$", lob_clause),
        LoaderRule::new(r"^U?ROWID$", |name, _| {
            format!(",{0} CHAR(30) \"TO_CHAR(:{0})\"", name)
        }),
        LoaderRule::new(r"^RAW\s*\(\s*\d+\s*\)", |name, _| {
            format!(",{0} \"HEXTORAW(:{0})\"", name)
        }),
    ]
});

/// Render the loader clause for a column, or `None` for an unsupported type.
pub(crate) fn loader_fragment(name: &str, data_type: &str) -> Option<String> {
    let data_type = data_type.trim();
    LOADER_RULES.iter().find_map(|rule| {
        rule.pattern
            .captures(data_type)
            .map(|caps| (rule.render)(name, &caps))
    })
}

fn char_clause(name: &str, caps: &Captures) -> String {
    let size = &caps["size"];
    let oversized = size
        .parse::<u64>()
        .map_or(true, |size| size > LOADER_CHAR_LIMIT);

    if oversized {
        format!(
            ",{0} CHAR({1}) \"TO_CHAR(SUBSTR(:{0},1,{2}))||TO_CHAR(SUBSTR(:{0},{3}))\"",
            name,
            size,
            LOADER_CHAR_LIMIT,
            LOADER_CHAR_LIMIT + 1
        )
    } else {
        format!(",{0} CHAR({1}) \"TO_CHAR(:{0})\"", name, size)
    }
}

fn lob_clause(name: &str, _: &Captures) -> String {
    let indicator: String = name.chars().take(LOB_INDICATOR_PREFIX).collect();
    format!(
        ", {0}# FILTER CHAR\n,{1} CHAR({2}) ENCLOSED BY '<start_lob>' AND '<end_lob>' NULLIF {0}#='Y'",
        indicator, name, LOB_FIELD_SIZE
    )
}
