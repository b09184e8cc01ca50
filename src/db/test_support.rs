//! File-backed SQLite database with the package/script schema, for tests.

use anyhow::Result;
use sqlx::AnyConnection;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::db;

const SQLITE_SCHEMA: &str = r#"
CREATE TABLE mc_package (
    mcpackageid INTEGER PRIMARY KEY AUTOINCREMENT,
    mcqualifiedname TEXT NOT NULL UNIQUE
);

CREATE TABLE mc_package_scripts (
    mcscriptid INTEGER PRIMARY KEY AUTOINCREMENT,
    mcpackageid INTEGER NOT NULL REFERENCES mc_package(mcpackageid),
    mcscriptname TEXT NOT NULL,
    mcscriptlanguage TEXT,
    mcscriptdefinition TEXT,
    mcenabled INTEGER,
    mcprotected INTEGER,
    mcscriptstatus INTEGER
);
"#;

const RAW_SCRIPT_INSERT: &str = "INSERT INTO mc_package_scripts \
    (mcpackageid, mcscriptname, mcscriptlanguage, mcscriptdefinition)";

/// Owns a temp directory holding both the database file and a work
/// directory the sync flows read from and write to.
pub struct TestDb {
    dir: TempDir,
    pub url: String,
}

impl TestDb {
    pub async fn new() -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("idm.db").display());
        std::fs::create_dir(dir.path().join("work"))?;

        let mut conn = db::connect(&url).await?;
        // sqlx::query runs one statement at a time
        for stmt in SQLITE_SCHEMA.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&mut conn).await?;
        }
        db::close(conn).await;

        Ok(Self { dir, url })
    }

    pub fn work_dir(&self) -> PathBuf {
        self.dir.path().join("work")
    }

    /// Scratch directory outside the work directory, for `-f` style inputs.
    pub fn sources_dir(&self) -> PathBuf {
        self.dir.path().join("sources")
    }

    pub async fn connect(&self) -> Result<AnyConnection> {
        db::connect(&self.url).await
    }

    pub async fn add_package(&self, name: &str) -> Result<i64> {
        let mut conn = self.connect().await?;
        sqlx::query("INSERT INTO mc_package (mcqualifiedname) VALUES ($1)")
            .bind(name)
            .execute(&mut conn)
            .await?;
        let (id,): (i64,) =
            sqlx::query_as("SELECT mcpackageid FROM mc_package WHERE mcqualifiedname = $1")
                .bind(name)
                .fetch_one(&mut conn)
                .await?;
        db::close(conn).await;
        Ok(id)
    }

    /// Stores a definition verbatim, bypassing the encoder.
    pub async fn add_raw_script(
        &self,
        package_id: i64,
        name: &str,
        definition: Option<&str>,
    ) -> Result<()> {
        let mut conn = self.connect().await?;
        // literal NULL rather than binding None through the Any driver
        let sql = match definition {
            Some(_) => format!("{RAW_SCRIPT_INSERT} VALUES ($1, $2, 'JScript', $3)"),
            None => format!("{RAW_SCRIPT_INSERT} VALUES ($1, $2, 'JScript', NULL)"),
        };
        let mut query = sqlx::query(&sql).bind(package_id).bind(name);
        if let Some(definition) = definition {
            query = query.bind(definition);
        }
        query.execute(&mut conn).await?;
        db::close(conn).await;
        Ok(())
    }

    /// `(script name, stored definition)` of one package, ordered by name.
    pub async fn scripts(&self, package: &str) -> Result<Vec<(String, Option<String>)>> {
        let mut conn = self.connect().await?;
        let rows = sqlx::query_as(
            "SELECT s.mcscriptname, s.mcscriptdefinition FROM mc_package_scripts s \
             INNER JOIN mc_package p ON s.mcpackageid = p.mcpackageid \
             WHERE p.mcqualifiedname = $1 ORDER BY s.mcscriptname",
        )
        .bind(package)
        .fetch_all(&mut conn)
        .await?;
        db::close(conn).await;
        Ok(rows)
    }
}
