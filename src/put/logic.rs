// scriptsync/src/put/logic.rs
use anyhow::{Context, Result};
use sqlx::Connection;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::{AppConfig, PutConfig};
use crate::db::{self, scripts};
use crate::errors::AppError;
use crate::utils::encoding::encode_script;

const SCRIPT_EXTENSION: &str = ".js";

/// A file picked for upload and the script it maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptFile {
    pub path: PathBuf,
    pub script_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PutSummary {
    pub inserted: usize,
    pub updated: usize,
    pub bytes_read: u64,
    pub elapsed: Duration,
}

impl PutSummary {
    pub fn print_summary(&self, package: &str) {
        println!(
            "✓ Package {}: {} script(s) inserted, {} updated.",
            package, self.inserted, self.updated
        );
        let millis = self.elapsed.as_millis();
        if millis > 0 {
            println!(
                "📊 Speed: {} B/s ({} bytes in {} ms)",
                self.bytes_read as u128 * 1000 / millis,
                self.bytes_read,
                millis
            );
        }
    }
}

/// Strips `.js` (any case) from a file name. `None` for other files and for
/// a bare `.js`.
pub fn script_name_from_path(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let stem_len = file_name.len().checked_sub(SCRIPT_EXTENSION.len())?;
    if stem_len == 0 || !file_name.is_char_boundary(stem_len) {
        return None;
    }
    let (stem, ext) = file_name.split_at(stem_len);
    ext.eq_ignore_ascii_case(SCRIPT_EXTENSION)
        .then(|| stem.to_string())
}

/// Picks the files to upload.
///
/// Explicit `-f` paths are taken as given (relative ones resolve against the
/// working directory) and must exist with a `.js` extension. Without them,
/// every visible `*.js` file directly inside `<base_dir>/<package>` is taken,
/// sorted by file name. Two files mapping to the same script name are
/// rejected.
pub fn collect_script_files(put_config: &PutConfig) -> Result<Vec<ScriptFile>> {
    let candidates = if put_config.files.is_empty() {
        list_package_directory(&put_config.base_dir.join(&put_config.package))?
    } else {
        explicit_files(&put_config.files)?
    };

    let mut seen: HashMap<&str, &Path> = HashMap::new();
    for file in &candidates {
        if let Some(first) = seen.insert(&file.script_name, &file.path) {
            return Err(AppError::DuplicateScript {
                name: file.script_name.clone(),
                first: first.to_path_buf(),
                second: file.path.clone(),
            }
            .into());
        }
    }

    Ok(candidates)
}

fn explicit_files(files: &[PathBuf]) -> Result<Vec<ScriptFile>> {
    files
        .iter()
        .map(|given| {
            let path = given.clone();
            if !path.is_file() {
                return Err(AppError::FileNotFound(path).into());
            }
            match script_name_from_path(&path) {
                Some(script_name) => Ok(ScriptFile { path, script_name }),
                None => Err(AppError::NotAScriptFile(path).into()),
            }
        })
        .collect()
}

fn list_package_directory(pkg_dir: &Path) -> Result<Vec<ScriptFile>> {
    if !pkg_dir.exists() {
        return Err(AppError::DirectoryMissing(pkg_dir.to_path_buf()).into());
    }
    if !pkg_dir.is_dir() {
        return Err(AppError::NotADirectory(pkg_dir.to_path_buf()).into());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(pkg_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry
            .with_context(|| format!("Failed to list directory: {}", pkg_dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let hidden = entry
            .file_name()
            .to_str()
            .is_none_or(|name| name.starts_with('.'));
        if hidden {
            continue;
        }
        if let Some(script_name) = script_name_from_path(entry.path()) {
            files.push(ScriptFile {
                path: entry.into_path(),
                script_name,
            });
        }
    }
    Ok(files)
}

/// Uploads the selected files into the package inside one transaction.
///
/// Existing scripts (by name, within the package) are updated, the rest are
/// inserted. Nothing is committed unless every statement succeeds.
pub async fn perform_put_orchestration(
    app_config: &AppConfig,
    put_config: &PutConfig,
) -> Result<PutSummary> {
    info!(
        "put: package={}, files={:?}",
        put_config.package, put_config.files
    );

    let script_files = collect_script_files(put_config)?;
    if script_files.is_empty() {
        println!(
            "ℹ️  No script files found for package {}. Nothing to upload.",
            put_config.package
        );
        return Ok(PutSummary::default());
    }
    println!(
        "Uploading {} script file(s) into package {}...",
        script_files.len(),
        put_config.package
    );

    let mut conn = db::connect(&put_config.db_url).await?;
    let started = Instant::now();
    let mut summary = PutSummary::default();

    {
        // dropping the transaction without commit rolls it back
        let mut tx = conn
            .begin()
            .await
            .context("Failed to start transaction")?;

        let package_id = scripts::query_package_id(&mut tx, &put_config.package).await?;
        let existing = scripts::query_package_scripts(&mut tx, &put_config.package)
            .await
            .with_context(|| format!("Failed to load scripts of package {}", put_config.package))?;
        debug!(
            "package {} has id {} and {} script(s)",
            put_config.package,
            package_id,
            existing.len()
        );

        let total = script_files.len();
        for (i, script_file) in script_files.iter().enumerate() {
            if app_config.options.show_progress {
                println!("{}/{}: {}", i + 1, total, display_name(&script_file.path));
            }

            let raw = fs::read(&script_file.path).with_context(|| {
                format!("Failed to read script file: {}", script_file.path.display())
            })?;
            summary.bytes_read += raw.len() as u64;
            let encoded = encode_script(&raw);

            match existing.get(&script_file.script_name) {
                Some(&script_id) => {
                    debug!("UPDATE {} (id {})", script_file.script_name, script_id);
                    scripts::update_script(&mut tx, script_id, &script_file.script_name, &encoded)
                        .await?;
                    summary.updated += 1;
                }
                None => {
                    debug!("INSERT {}", script_file.script_name);
                    scripts::insert_script(&mut tx, package_id, &script_file.script_name, &encoded)
                        .await?;
                    summary.inserted += 1;
                }
            }
        }

        tx.commit().await.context("Failed to commit transaction")?;
    }

    summary.elapsed = started.elapsed();
    db::close(conn).await;

    summary.print_summary(&put_config.package);
    Ok(summary)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
