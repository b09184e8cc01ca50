// scriptsync/src/config/mod.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};
use std::str::FromStr;

use crate::cli::Cli;
use crate::errors::AppError;
use crate::utils::{normalize_connection_string, validate_connection_string};

pub const DEFAULT_CONFIG_FILE: &str = "scriptsync.json";
pub const DATABASE_URL_ENV: &str = "SCRIPTSYNC_DATABASE_URL";

// Struct for deserializing scriptsync.json
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawJsonConfig {
    pub database_url: Option<String>,
    pub package: Option<String>,
    pub directory: Option<PathBuf>,
    pub show_progress: Option<bool>,
}

/// Flags every step of a run consults; passed down instead of kept in statics.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub show_progress: bool,
}

#[derive(Clone)]
pub struct GetConfig {
    pub db_url: String,
    pub package: String,
    pub base_dir: PathBuf,
}

#[derive(Clone)]
pub struct PutConfig {
    pub db_url: String,
    pub package: String,
    pub base_dir: PathBuf,
    /// Empty means "every *.js file in the package directory".
    pub files: Vec<PathBuf>,
}

#[derive(Clone)]
pub enum OperationConfig {
    Get(GetConfig),
    Put(PutConfig),
}

#[derive(Clone)]
pub struct AppConfig {
    pub operation: Option<OperationConfig>,
    pub options: RunOptions,
    pub raw_json_config: RawJsonConfig,
}

/// The two commands, matched on any non-empty prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Get,
    Put,
}

impl FromStr for Operation {
    type Err = AppError;

    fn from_str(token: &str) -> std::result::Result<Self, Self::Err> {
        let cmd = token.trim().to_lowercase();
        if cmd.is_empty() {
            return Err(AppError::usage("Missing command"));
        }
        if "get".starts_with(&cmd) {
            Ok(Operation::Get)
        } else if "put".starts_with(&cmd) {
            Ok(Operation::Put)
        } else {
            Err(AppError::usage(format!("Unrecognized command: {}", cmd)))
        }
    }
}

impl AppConfig {
    pub fn load_from_json(config_path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;
        let raw_json_config: RawJsonConfig = serde_json::from_str(&config_content)
            .map_err(|e| AppError::Config(e.to_string()))
            .with_context(|| {
                format!(
                    "Failed to parse JSON from config file at {}",
                    config_path.display()
                )
            })?;

        Ok(AppConfig::from_raw(raw_json_config))
    }

    /// Loads `explicit` when given (it must exist), otherwise `scriptsync.json`
    /// from the working directory if there is one, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from_json(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::load_from_json(default_path)
                } else {
                    Ok(AppConfig::from_raw(RawJsonConfig::default()))
                }
            }
        }
    }

    fn from_raw(raw_json_config: RawJsonConfig) -> Self {
        AppConfig {
            operation: None, // filled by main once the command is resolved
            options: RunOptions {
                show_progress: raw_json_config.show_progress.unwrap_or(false),
            },
            raw_json_config,
        }
    }
}

/// Resolves the command token and the mandatory parameters.
///
/// Precedence is command line, then `env_db_url`, then the config file.
/// Every failure here is an `AppError::Usage`, raised before any connection
/// is attempted.
pub fn resolve_operation(
    cli: &Cli,
    raw_config: &RawJsonConfig,
    env_db_url: Option<String>,
) -> Result<OperationConfig> {
    let operation = match cli.command.as_deref() {
        Some(token) => token.parse::<Operation>()?,
        None => return Err(AppError::usage("Missing command").into()),
    };

    let db_url = mandatory(
        cli.url.clone().or(env_db_url).or_else(|| raw_config.database_url.clone()),
        'u',
    )?;
    let db_url = normalize_connection_string(&db_url);
    validate_connection_string(&db_url)
        .map_err(|e| AppError::usage(format!("{:#}", e)))?;

    let package = mandatory(
        cli.package.clone().or_else(|| raw_config.package.clone()),
        'p',
    )?;
    let package = strip_trailing_separator(&package);
    if package.is_empty() {
        return Err(AppError::usage("Missing mandatory parameter -p").into());
    }

    let base_dir = cli
        .dir
        .clone()
        .or_else(|| raw_config.directory.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    Ok(match operation {
        Operation::Get => {
            if !cli.files.is_empty() {
                tracing::warn!("-f is ignored by get");
            }
            OperationConfig::Get(GetConfig {
                db_url,
                package,
                base_dir,
            })
        }
        Operation::Put => OperationConfig::Put(PutConfig {
            db_url,
            package,
            base_dir,
            files: cli.files.clone(),
        }),
    })
}

fn mandatory(value: Option<String>, flag: char) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(AppError::usage(format!("Missing mandatory parameter -{}", flag)).into()),
    }
}

/// `org.acme.idm/` as produced by shell completion names the same package.
fn strip_trailing_separator(package: &str) -> String {
    package
        .trim_end_matches(|c| c == '/' || c == MAIN_SEPARATOR)
        .to_string()
}
