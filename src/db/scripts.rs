// scriptsync/src/db/scripts.rs
//! Statements against the package/script tables. Table names, column names
//! and the join condition are fixed by the identity management schema.

use sqlx::AnyConnection;
use std::collections::HashMap;

use crate::errors::{AppError, Result};

/// Language tag stored with every inserted script.
pub const SCRIPT_LANGUAGE: &str = "JScript";

const SELECT_ALL_SCRIPTS: &str = r#"
    SELECT p.mcqualifiedname, s.mcscriptname,
           COALESCE(s.mcscriptdefinition, '') AS mcscriptdefinition
    FROM mc_package_scripts s
    INNER JOIN mc_package p ON s.mcpackageid = p.mcpackageid
    ORDER BY p.mcqualifiedname, s.mcscriptname
"#;

const SELECT_PACKAGE_ID: &str = "SELECT mcpackageid FROM mc_package WHERE mcqualifiedname = $1";

const SELECT_PACKAGE_SCRIPTS: &str = r#"
    SELECT s.mcscriptname, s.mcscriptid
    FROM mc_package_scripts s
    INNER JOIN mc_package p ON s.mcpackageid = p.mcpackageid
    WHERE p.mcqualifiedname = $1
"#;

const INSERT_SCRIPT: &str = r#"
    INSERT INTO mc_package_scripts
        (mcpackageid, mcscriptname, mcscriptlanguage, mcscriptdefinition,
         mcenabled, mcprotected, mcscriptstatus)
    VALUES ($1, $2, $3, $4, $5, $6, $7)
"#;

const UPDATE_SCRIPT: &str =
    "UPDATE mc_package_scripts SET mcscriptdefinition = $1 WHERE mcscriptid = $2";

/// One exported script together with the package it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRow {
    pub package: String,
    pub name: String,
    /// Stored text; a NULL column comes back empty.
    pub definition: String,
}

/// Every script of every package, ordered by package then script name.
pub async fn fetch_all_scripts(conn: &mut AnyConnection) -> Result<Vec<ScriptRow>> {
    let rows = sqlx::query_as::<_, (String, String, String)>(SELECT_ALL_SCRIPTS)
        .fetch_all(&mut *conn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(package, name, definition)| ScriptRow {
            package,
            name,
            definition,
        })
        .collect())
}

pub async fn query_package_id(conn: &mut AnyConnection, package: &str) -> Result<i64> {
    let id: Option<(i64,)> = sqlx::query_as(SELECT_PACKAGE_ID)
        .bind(package)
        .fetch_optional(&mut *conn)
        .await?;

    id.map(|(id,)| id)
        .ok_or_else(|| AppError::PackageNotFound(package.to_string()))
}

/// Script name to script id for one package.
pub async fn query_package_scripts(
    conn: &mut AnyConnection,
    package: &str,
) -> Result<HashMap<String, i64>> {
    let rows: Vec<(String, i64)> = sqlx::query_as(SELECT_PACKAGE_SCRIPTS)
        .bind(package)
        .fetch_all(&mut *conn)
        .await?;

    Ok(rows.into_iter().collect())
}

/// Inserts a new, enabled, unprotected script with status 0.
pub async fn insert_script(
    conn: &mut AnyConnection,
    package_id: i64,
    script_name: &str,
    encoded_definition: &str,
) -> Result<()> {
    let affected = sqlx::query(INSERT_SCRIPT)
        .bind(package_id)
        .bind(script_name)
        .bind(SCRIPT_LANGUAGE)
        .bind(encoded_definition)
        .bind(1_i32)
        .bind(0_i32)
        .bind(0_i32)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    expect_single_row("INSERT", script_name, affected)
}

pub async fn update_script(
    conn: &mut AnyConnection,
    script_id: i64,
    script_name: &str,
    encoded_definition: &str,
) -> Result<()> {
    let affected = sqlx::query(UPDATE_SCRIPT)
        .bind(encoded_definition)
        .bind(script_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    expect_single_row("UPDATE", script_name, affected)
}

fn expect_single_row(statement: &'static str, script_name: &str, affected: u64) -> Result<()> {
    if affected == 1 {
        Ok(())
    } else {
        Err(AppError::RowCount {
            statement,
            script: script_name.to_string(),
            expected: 1,
            actual: affected,
        })
    }
}
