pub mod encoding;

use anyhow::{Context, Result};
use url::Url;

/// Sets up diagnostic tracing on stderr. `-v` raises the level to debug;
/// `RUST_LOG` wins over both.
pub fn init_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let log_level = if verbose { "debug" } else { "warn" };

    // try_init: a subscriber may already be installed when running under tests
    let _ = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init();
}

/// Turns a user supplied connection string into a sqlx URL.
/// JDBC style strings (`jdbc:postgresql://...`) lose their `jdbc:` prefix.
pub fn normalize_connection_string(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.get(..5) {
        Some(prefix) if prefix.eq_ignore_ascii_case("jdbc:") => trimmed[5..].to_string(),
        _ => trimmed.to_string(),
    }
}

/// Connection string with the password replaced, safe for log output.
pub fn redact_url(db_url: &str) -> String {
    match Url::parse(db_url) {
        Ok(mut parsed) => {
            if parsed.password().is_some() {
                // only cannot-be-a-base URLs refuse a password, and those never carry one
                let _ = parsed.set_password(Some("***"));
            }
            parsed.to_string()
        }
        Err(_) => "<unparsable connection string>".to_string(),
    }
}

/// Checks that a connection string is a URL sqlx can dispatch on.
pub fn validate_connection_string(db_url: &str) -> Result<()> {
    let parsed = Url::parse(db_url)
        .with_context(|| format!("Invalid connection string: {}", redact_url(db_url)))?;
    match parsed.scheme() {
        "postgres" | "postgresql" | "sqlite" => Ok(()),
        other => Err(anyhow::anyhow!(
            "Unsupported database scheme '{}'; expected postgres:// or sqlite://",
            other
        )),
    }
}
