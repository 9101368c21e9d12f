//! Best-effort cleanup after a failed provisioning run.
//!
//! Only steps completed during this run are touched, newest first.
//! Compensating commands are never checked: a failure is logged and the
//! next step is still attempted, and the caller returns the original
//! error regardless.

use super::{AppCli, InitState, Step};
use tracing::{error, info, warn};

const BANNER: &str = "============================================================";

/// What rollback did for one completed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollbackAction {
    /// The compensating command ran successfully.
    Compensated(Step),
    /// There is no command to undo this step.
    ManualInterventionRequired(Step),
    /// The compensating command could not be run or exited non-zero.
    Failed(Step, String),
}

/// Everything rollback attempted, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RollbackReport {
    pub actions: Vec<RollbackAction>,
}

impl RollbackReport {
    /// Whether every compensating command succeeded.
    pub fn is_clean(&self) -> bool {
        !self
            .actions
            .iter()
            .any(|a| matches!(a, RollbackAction::Failed(..)))
    }
}

/// Undo the steps recorded in `state`.
pub fn run(app: &AppCli<'_>, state: &InitState, admin_email: Option<&str>) -> RollbackReport {
    error!("{}", BANNER);
    error!("INITIALIZATION FAILED - Starting cleanup...");
    error!("{}", BANNER);

    let mut report = RollbackReport::default();

    for step in state.to_roll_back() {
        let action = match step {
            Step::CustomFields => {
                warn!("Note: Custom fields cannot be automatically removed.");
                warn!("Manual intervention may be required.");
                Some(RollbackAction::ManualInterventionRequired(step))
            }
            Step::FilesLocation => {
                warn!("Note: Files location cleanup must be done manually if needed.");
                Some(RollbackAction::ManualInterventionRequired(step))
            }
            Step::Indices => {
                info!("Cleaning up search indices...");
                Some(compensate(
                    app,
                    step,
                    &["index", "destroy", "--force", "--yes-i-know"],
                ))
            }
            Step::AdminUser => admin_email.map(|email| {
                info!("Cleaning up admin user: {}...", email);
                compensate(app, step, &["users", "delete", email])
            }),
            Step::AdministrationRole => {
                info!("Cleaning up administration role...");
                Some(compensate(app, step, &["roles", "delete", "administration"]))
            }
            Step::AdminRole => {
                info!("Cleaning up admin role...");
                Some(compensate(app, step, &["roles", "delete", "admin"]))
            }
            Step::Database => {
                info!("Cleaning up database...");
                Some(compensate(app, step, &["db", "drop", "--yes-i-know"]))
            }
        };
        report.actions.extend(action);
    }

    error!("{}", BANNER);
    error!("Cleanup completed. Please review and fix any issues.");
    error!("{}", BANNER);

    report
}

fn compensate(app: &AppCli<'_>, step: Step, args: &[&str]) -> RollbackAction {
    match app.run_unchecked(args) {
        Ok(result) if result.success => {
            info!("Cleaned up {}.", step);
            RollbackAction::Compensated(step)
        }
        Ok(result) => {
            let reason = format!(
                "`{}` exited with code {:?}",
                app.display(args),
                result.exit_code
            );
            warn!("Failed to clean up {}: {}", step, reason);
            RollbackAction::Failed(step, reason)
        }
        Err(e) => {
            warn!("Failed to clean up {}: {}", step, e);
            RollbackAction::Failed(step, e.to_string())
        }
    }
}
