// scriptsync/src/get/logic.rs
use anyhow::{Context, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

use crate::config::{AppConfig, GetConfig};
use crate::db::{self, scripts};
use crate::errors::AppError;
use crate::utils::encoding::decode_script;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetSummary {
    pub packages: usize,
    pub files_written: usize,
    pub bytes_written: u64,
}

/// Makes sure `dir` exists as a directory, creating it when absent.
fn ensure_package_dir(dir: &Path) -> crate::errors::Result<()> {
    if !dir.exists() {
        debug!("creating directory {}", dir.display());
        fs::create_dir_all(dir)?;
    } else if !dir.is_dir() {
        return Err(AppError::NotADirectory(dir.to_path_buf()));
    }
    Ok(())
}

/// Names coming out of the database become path components; anything that
/// would leave the base directory is refused.
fn single_component(name: &str) -> crate::errors::Result<&str> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(name),
        _ => Err(AppError::UnsafeName(name.to_string())),
    }
}

/// Writes every stored script to `<base_dir>/<package>/<script>.js`.
///
/// The directory of the requested package is created up front, so a package
/// without scripts still ends up with an (empty) directory.
pub async fn perform_get_orchestration(
    app_config: &AppConfig,
    get_config: &GetConfig,
) -> Result<GetSummary> {
    info!("get: package={}", get_config.package);

    let requested_dir = get_config
        .base_dir
        .join(single_component(&get_config.package)?);
    ensure_package_dir(&requested_dir)
        .with_context(|| format!("Cannot prepare directory {}", requested_dir.display()))?;

    let mut conn = db::connect(&get_config.db_url).await?;
    let rows = scripts::fetch_all_scripts(&mut conn)
        .await
        .context("Failed to fetch scripts from database")?;
    db::close(conn).await;
    println!("Found {} script(s) in database.", rows.len());

    let mut summary = GetSummary::default();
    let mut current_package: Option<&str> = None;
    let mut pkg_dir = PathBuf::new();
    let total = rows.len();

    for (i, row) in rows.iter().enumerate() {
        // rows arrive grouped by package
        if current_package != Some(row.package.as_str()) {
            pkg_dir = get_config.base_dir.join(single_component(&row.package)?);
            ensure_package_dir(&pkg_dir)
                .with_context(|| format!("Cannot prepare directory {}", pkg_dir.display()))?;
            summary.packages += 1;
            current_package = Some(row.package.as_str());
        }

        let script_path = pkg_dir.join(format!("{}.js", single_component(&row.name)?));
        if app_config.options.show_progress {
            println!("{}/{}: {}", i + 1, total, script_path.display());
        }

        let content = decode_script(&row.name, &row.definition)?;
        fs::write(&script_path, &content).with_context(|| {
            format!("Failed to write script file: {}", script_path.display())
        })?;
        summary.files_written += 1;
        summary.bytes_written += content.len() as u64;
    }

    println!(
        "✓ Wrote {} file(s) for {} package(s) below {}.",
        summary.files_written,
        summary.packages,
        get_config.base_dir.display()
    );
    Ok(summary)
}
