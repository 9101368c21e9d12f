//! First-boot provisioning.
//!
//! Provisioning runs in two phases, each guarded by a probe so that a
//! restart of an already-provisioned deployment only runs the probes:
//!
//! 1. [`database`]: schema, default storage location, roles, admin user,
//!    search indices. Runs when `db check` fails.
//! 2. [`fixtures`]: custom fields, fixtures, index rebuild, demo data,
//!    queues. Runs when the probe custom field is missing.
//!
//! If either phase fails, [`rollback`] compensates the steps completed
//! during this run and the original error is returned.
//!
//! # Example
//!
//! ```
//! use invenio_init::config::Settings;
//! use invenio_init::provision::{PhaseOutcome, Provisioner};
//! use invenio_init::shell::MockRunner;
//!
//! let settings = Settings::default();
//! let runner = MockRunner::new();
//! // db check succeeds and the custom field already exists.
//! runner.respond("invenio rdm-records custom-fields exists", 0, "exists");
//!
//! let report = Provisioner::new(&settings, &runner).run().unwrap();
//! assert_eq!(report.database, PhaseOutcome::AlreadyDone);
//! assert_eq!(report.fixtures, PhaseOutcome::AlreadyDone);
//! assert_eq!(runner.calls().len(), 2);
//! ```

pub mod app;
pub mod database;
pub mod fixtures;
pub mod probes;
pub mod record;
pub mod rollback;
pub mod state;

pub use app::AppCli;
pub use record::{format_duration, StepRecord, StepStatus};
pub use rollback::{RollbackAction, RollbackReport};
pub use state::{InitState, Step};

use crate::config::Settings;
use crate::error::Result;
use crate::shell::CommandRunner;
use std::time::Instant;
use tracing::{error, info};

/// Whether a phase did any work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseOutcome {
    /// The probe found the phase already done.
    AlreadyDone,
    /// The phase ran to completion in this run.
    Completed,
}

/// What happened to demo-data seeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoData {
    /// The fixtures phase did not run.
    NotAttempted,
    /// Demo data is not enabled.
    Disabled,
    /// Records were already present.
    AlreadyPresent,
    /// Enabled but no admin email to own the records.
    MissingAdmin,
    /// Demo records and communities were created.
    Created,
}

/// Summary of a successful provisioning run.
#[derive(Debug, Clone)]
pub struct ProvisionReport {
    pub database: PhaseOutcome,
    pub fixtures: PhaseOutcome,
    pub demo_data: DemoData,
    pub steps: Vec<StepRecord>,
}

impl ProvisionReport {
    /// Whether this run changed anything.
    pub fn did_work(&self) -> bool {
        self.database == PhaseOutcome::Completed || self.fixtures == PhaseOutcome::Completed
    }
}

/// Drives both phases against the application CLI.
pub struct Provisioner<'a> {
    app: AppCli<'a>,
    settings: &'a Settings,
    state: InitState,
    steps: Vec<StepRecord>,
    demo_data: DemoData,
    rollback: Option<RollbackReport>,
}

impl<'a> Provisioner<'a> {
    pub fn new(settings: &'a Settings, runner: &'a dyn CommandRunner) -> Self {
        let mut app = AppCli::new(&settings.cli, runner);
        if let Some(password) = &settings.admin.password {
            app.add_secret(password);
        }

        Self {
            app,
            settings,
            state: InitState::new(),
            steps: Vec::new(),
            demo_data: DemoData::NotAttempted,
            rollback: None,
        }
    }

    /// Steps completed so far in this run.
    pub fn state(&self) -> &InitState {
        &self.state
    }

    /// Steps attempted so far in this run, including a failed one.
    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    /// Report of the rollback, if one ran.
    pub fn rollback_report(&self) -> Option<&RollbackReport> {
        self.rollback.as_ref()
    }

    /// Run whichever phases the probes say are missing.
    pub fn run(&mut self) -> Result<ProvisionReport> {
        let database = if probes::database_ready(&self.app)? {
            info!("Database already initialized, skipping database setup.");
            PhaseOutcome::AlreadyDone
        } else {
            self.guarded("Database initialization", database::provision)?;
            PhaseOutcome::Completed
        };

        let fixtures = if probes::custom_field_exists(&self.app, &self.settings.custom_field_probe)?
        {
            info!("Custom fields already initialized, skipping fixtures setup.");
            PhaseOutcome::AlreadyDone
        } else {
            self.guarded("Custom fields initialization", fixtures::provision)?;
            PhaseOutcome::Completed
        };

        self.log_summary();
        info!("Initialization completed successfully.");

        Ok(ProvisionReport {
            database,
            fixtures,
            demo_data: self.demo_data,
            steps: self.steps.clone(),
        })
    }

    fn guarded(&mut self, phase: &str, body: fn(&mut Self) -> Result<()>) -> Result<()> {
        if let Err(e) = body(self) {
            error!("{} failed: {}", phase, e);
            self.log_summary();
            let report = rollback::run(
                &self.app,
                &self.state,
                self.settings.admin.email.as_deref(),
            );
            self.rollback = Some(report);
            return Err(e);
        }
        Ok(())
    }

    fn log_summary(&self) {
        for step in &self.steps {
            info!("{}", step.summary_line());
        }
    }

    /// Run a checked CLI step and record it.
    fn step(&mut self, name: &str, args: &[&str]) -> Result<()> {
        let start = Instant::now();
        match self.app.run(args) {
            Ok(_) => {
                self.steps.push(StepRecord::completed(name, start.elapsed()));
                Ok(())
            }
            Err(e) => {
                self.steps
                    .push(StepRecord::failed(name, start.elapsed(), e.to_string()));
                Err(e)
            }
        }
    }
}
