//! Install-from-scratch SQL*Plus script

use std::path::Path;

use crate::error::Result;

use super::layout::list_files;

const RULE: &str =
    "-- -------------------------------------------------------------------------------------\n";

/// Build the IFS_MODEL.SQL script from the files already generated under `db_dir`.
pub fn generate_install_script(db_dir: &Path, release_number: &str) -> Result<String> {
    let mut script = format!(
        "--This script was generated on {}. \n",
        chrono::Local::now().format("%a %b %e %H:%M:%S %Y")
    );
    script.push_str(&session_preamble());

    script.push_str(&section("TYPE"));
    for name in stems(db_dir, "TYPE", |_| true)? {
        script.push_str(&object_piece("TYPE", &name, "SQL"));
    }

    script.push_str(&section("TABLE"));
    for name in stems(db_dir, "TABLE", |f| !f.ends_with(".IDX.SQL"))? {
        script.push_str(&table_piece(&name, "SQL", "TBS_DATA"));
    }

    for folder in ["SEQUENCE", "FUNCTION", "PROCEDURE"] {
        script.push_str(&section(folder));
        for name in stems(db_dir, folder, |_| true)? {
            script.push_str(&object_piece(folder, &name, "SQL"));
        }
    }

    script.push_str(&section("PACKAGE_HEADER"));
    for name in stems(db_dir, "PACKAGE", |f| f.ends_with(".PKS"))? {
        script.push_str(&object_piece("PACKAGE", &name, "PKS"));
    }

    script.push_str(&section("VIEW"));
    for name in stems(db_dir, "VIEW", |_| true)? {
        script.push_str(&object_piece("VIEW", &name, "SQL"));
    }

    script.push_str(&section("PACKAGE_BODY"));
    for name in stems(db_dir, "PACKAGE", |f| f.ends_with(".PKB"))? {
        script.push_str(&object_piece("PACKAGE", &name, "PKB"));
    }

    script.push_str(&section("INIT DATA using SQL Loader"));
    script.push_str("DEFINE SQLLDR_SCRIPT=\"&DB_DIR/TOOLS/COMMON/LOAD_SQLLDR.BAT\" \n");
    script.push_str("prompt SQLLDR_SCRIPT=&SQLLDR_SCRIPT \n");
    for name in stems(db_dir, "INIT_TABLE", |f| f.ends_with(".DAT"))? {
        script.push_str(&loader_piece(&name));
    }

    script.push_str(&section("Load application release table"));
    script.push_str(&release_inserts(release_number));

    script.push_str(&section("INDEXES"));
    for name in stems(db_dir, "TABLE", |f| f.ends_with(".IDX.SQL"))? {
        script.push_str(&table_piece(&name, "IDX.SQL", "TBS_INDEX"));
    }

    script.push_str(RULE);
    script.push_str("-- Show errors\n");
    script.push_str(RULE);
    script.push_str("select * from user_errors;\n");
    script.push_str(
        "select 'ORA-20000: [' ||  object_type ||  ' -  ' || table_name || '] is not succesfully installed.' error_msg \
         from db_objects where table_name not in (select object_name from user_objects);\n",
    );

    Ok(script)
}

/// Object names (text before the first dot) of the files in `db_dir/folder` accepted by `keep`.
fn stems(db_dir: &Path, folder: &str, keep: impl Fn(&str) -> bool) -> Result<Vec<String>> {
    let dir = db_dir.join(folder);
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    Ok(list_files(&dir)?
        .iter()
        .filter_map(|p| p.file_name().and_then(|f| f.to_str()))
        .filter(|f| keep(f))
        .filter_map(|f| f.split('.').next())
        .map(str::to_string)
        .collect())
}

fn session_preamble() -> String {
    [
        "alter session set NLS_DATE_LANGUAGE='AMERICAN';",
        "alter session set NLS_NUMERIC_CHARACTERS='.,';",
        "alter session set NLS_LENGTH_SEMANTICS=&SEMANTIC;",
        "alter user &CENTRAL_NAME default role none;",
        "begin",
        " IF USER <> '&CENTRAL_NAME' THEN",
        "   RAISE_APPLICATION_ERROR(-20000,'This script must be run when connected as &CENTRAL_NAME');",
        " END IF;",
        "end;",
        "/",
        "set serveroutput on size unlimited \n",
    ]
    .join("\n")
}

fn section(name: &str) -> String {
    format!(
        "{RULE}-- CREATE {name} \n{RULE}prompt --- CREATE {name} \nset echo off timing off \n"
    )
}

fn object_piece(folder: &str, name: &str, extension: &str) -> String {
    format!(
        "prompt \"&DB_DIR/{folder}/{name}.{extension}\"\n@\"&DB_DIR/{folder}/{name}.{extension}\"\n"
    )
}

fn table_piece(name: &str, extension: &str, tablespace: &str) -> String {
    format!(
        "set feed on heading on timing on term on\n\
         prompt \"&DB_DIR/TABLE/{name}.{extension}\" &{tablespace}\n\
         @\"&DB_DIR/TABLE/{name}.{extension}\" &{tablespace}\n\n"
    )
}

fn loader_piece(table: &str) -> String {
    let invoke = format!(
        "host \"&SQLLDR_SCRIPT\" {table} \"&NEW_CENTRAL_CONNECTION\" \
         \"&DB_DIR/INIT_TABLE/{table}.DAT\" \"&DB_DIR/INIT_TABLE/{table}.CTL\" \"&OUTPUT_DIR\""
    );
    [
        "set feed on heading on timing on term on".to_string(),
        format!("prompt Loading {table} with SQL*Loader..."),
        format!("exec EXEC_IMMEDIATE('alter table {table} disable all triggers');"),
        format!("prompt {invoke}"),
        invoke,
        "prompt \"&OUTPUT_DIR/LOAD_SQLLDR.RC\"".to_string(),
        "@\"&OUTPUT_DIR/LOAD_SQLLDR.RC\"".to_string(),
        format!("exec EXEC_IMMEDIATE('alter table {table} enable all triggers');"),
        "\n".to_string(),
    ]
    .join("\n")
}

fn release_inserts(release_number: &str) -> String {
    let insert = |product: &str| {
        format!(
            "insert into application(product, release_date, release_number)values('{}', sysdate, '{}');",
            product, release_number
        )
    };
    [insert("Z"), insert("W"), "commit;\n".to_string()].join("\n")
}
