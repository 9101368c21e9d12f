//! Phase 1: database, storage, roles, admin user, search indices.

use super::{Provisioner, Step, StepRecord};
use crate::error::Result;
use tracing::info;

pub const SUPERUSER_ROLE: &str = "admin";
pub const ADMINISTRATION_ROLE: &str = "administration";

/// Create everything that `db check` guards.
///
/// Each compensable step is marked in the run state as soon as its
/// creating command succeeds, so a later failure rolls back exactly what
/// exists.
pub fn provision(p: &mut Provisioner<'_>) -> Result<()> {
    info!("Creating database...");
    p.step("create-database", &["db", "init", "create"])?;
    p.state.mark(Step::Database);

    info!("Creating files location...");
    let (location, uri) = p.settings.storage.default_location();
    p.step(
        "create-files-location",
        &["files", "location", "create", "--default", &location, &uri],
    )?;
    p.state.mark(Step::FilesLocation);

    info!("Creating superuser role...");
    p.step("create-admin-role", &["roles", "create", SUPERUSER_ROLE])?;
    p.state.mark(Step::AdminRole);
    p.step(
        "grant-superuser-access",
        &["access", "allow", "superuser-access", "role", SUPERUSER_ROLE],
    )?;

    info!("Creating administration access role...");
    p.step(
        "create-administration-role",
        &["roles", "create", ADMINISTRATION_ROLE],
    )?;
    p.state.mark(Step::AdministrationRole);
    p.step(
        "grant-administration-access",
        &[
            "access",
            "allow",
            "administration-access",
            "role",
            ADMINISTRATION_ROLE,
        ],
    )?;

    let admin = p.settings.admin.clone();
    match admin.credentials() {
        Some((email, password)) => {
            info!("Creating admin user: {}...", email);
            p.step(
                "create-admin-user",
                &[
                    "users",
                    "create",
                    email,
                    "--password",
                    password,
                    "--active",
                    "--confirm",
                ],
            )?;
            p.state.mark(Step::AdminUser);
            p.step("assign-admin-role", &["roles", "add", email, SUPERUSER_ROLE])?;
        }
        None => {
            p.steps.push(StepRecord::skipped(
                "create-admin-user",
                "admin email and password not both set",
            ));
        }
    }

    info!("Dropping and re-creating indices...");
    p.step(
        "destroy-indices",
        &["index", "destroy", "--force", "--yes-i-know"],
    )?;
    p.step("init-indices", &["index", "init"])?;
    p.state.mark(Step::Indices);

    info!("Database and search setup completed.");
    Ok(())
}
