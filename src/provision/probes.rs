//! Read-only checks that decide which phases still need to run.
//!
//! A probe's exit status is data, never an error. Only failing to start
//! the CLI at all propagates.

use super::AppCli;
use crate::error::Result;
use tracing::debug;

/// Prints the number of records known to the search service.
pub const RECORD_COUNT_SCRIPT: &str = "from invenio_access.permissions import system_identity; from invenio_rdm_records.proxies import current_rdm_records; print(current_rdm_records.records_service.search(system_identity, size=1).total)";

/// Whether the database schema already exists.
pub fn database_ready(app: &AppCli<'_>) -> Result<bool> {
    let result = app.capture(&["db", "check"])?;
    debug!(exit_code = ?result.exit_code, "Database probe");
    Ok(result.success)
}

/// Whether the probe custom field is already registered.
pub fn custom_field_exists(app: &AppCli<'_>, field: &str) -> Result<bool> {
    let result = app.capture(&["rdm-records", "custom-fields", "exists", "-f", field])?;
    let exists = result.stdout.to_lowercase().contains("exists");
    debug!(field, exists, "Custom field probe");
    Ok(exists)
}

/// Whether any records exist yet.
///
/// Output that is not an integer counts as "no records".
pub fn demo_data_exists(app: &AppCli<'_>) -> Result<bool> {
    let result = app.capture(&["shell", "-c", RECORD_COUNT_SCRIPT])?;
    if !result.success {
        return Ok(false);
    }
    Ok(parse_count(&result.stdout).is_some_and(|count| count > 0))
}

fn parse_count(stdout: &str) -> Option<i64> {
    stdout.trim().parse().ok()
}
