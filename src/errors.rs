use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// Shown to the user as a bare message, without the context chain.
    #[error("{0}")]
    Usage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Directory {} does not exist", .0.display())]
    DirectoryMissing(PathBuf),

    #[error("{} must be a directory; found file instead", .0.display())]
    NotADirectory(PathBuf),

    #[error("File {} not found", .0.display())]
    FileNotFound(PathBuf),

    #[error("File {} is not a script file (expected a .js extension)", .0.display())]
    NotAScriptFile(PathBuf),

    #[error("Script {name} is supplied twice: {} and {}", first.display(), second.display())]
    DuplicateScript {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Refusing to use {0:?} as a file or directory name")]
    UnsafeName(String),

    #[error("Package {0} not found in database")]
    PackageNotFound(String),

    #[error("{statement} {script} returned {actual} affected rows (should be {expected})")]
    RowCount {
        statement: &'static str,
        script: String,
        expected: u64,
        actual: u64,
    },

    #[error("Stored definition of script {script} is not valid base64: {source}")]
    Decode {
        script: String,
        #[source]
        source: base64::DecodeError,
    },
}

impl AppError {
    pub fn usage(msg: impl Into<String>) -> Self {
        AppError::Usage(format!("{}; try scriptsync --help", msg.into()))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
