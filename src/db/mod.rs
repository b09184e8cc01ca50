// scriptsync/src/db/mod.rs
pub(crate) mod scripts;
#[cfg(test)]
pub(crate) mod test_support;

use anyhow::{Context, Result};
use sqlx::{AnyConnection, Connection};

use crate::utils::redact_url;

/// Opens the single connection an invocation works on.
///
/// The driver is picked from the URL scheme (`postgres://`, `sqlite://`).
pub async fn connect(db_url: &str) -> Result<AnyConnection> {
    sqlx::any::install_default_drivers();

    let redacted = redact_url(db_url);
    tracing::debug!("connecting to {}", redacted);

    AnyConnection::connect(db_url)
        .await
        .with_context(|| format!("Failed to connect to database {}", redacted))
}

/// Closes the connection, logging instead of failing: by the time this runs
/// the work is either committed or already rolled back.
pub async fn close(conn: AnyConnection) {
    if let Err(e) = conn.close().await {
        tracing::warn!("closing database connection failed: {}", e);
    }
}
