//! Steps completed during this run.

use std::fmt;

/// A provisioning step that rollback knows how to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Database,
    FilesLocation,
    AdminRole,
    AdministrationRole,
    AdminUser,
    Indices,
    CustomFields,
}

impl Step {
    /// Rollback order: reverse of creation.
    pub const ROLLBACK_ORDER: [Step; 7] = [
        Step::CustomFields,
        Step::Indices,
        Step::AdminUser,
        Step::AdministrationRole,
        Step::AdminRole,
        Step::FilesLocation,
        Step::Database,
    ];

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Step::Database => "database",
            Step::FilesLocation => "files location",
            Step::AdminRole => "admin role",
            Step::AdministrationRole => "administration role",
            Step::AdminUser => "admin user",
            Step::Indices => "search indices",
            Step::CustomFields => "custom fields",
        };
        write!(f, "{}", s)
    }
}

/// Flag set of completed steps. Lives only as long as the process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InitState {
    done: u8,
}

impl InitState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `step` finished.
    pub fn mark(&mut self, step: Step) {
        self.done |= step.bit();
    }

    pub fn is_done(&self, step: Step) -> bool {
        self.done & step.bit() != 0
    }

    /// Whether nothing has been created yet.
    pub fn is_empty(&self) -> bool {
        self.done == 0
    }

    /// Completed steps in rollback order.
    pub fn to_roll_back(&self) -> impl Iterator<Item = Step> + '_ {
        Step::ROLLBACK_ORDER
            .into_iter()
            .filter(move |step| self.is_done(*step))
    }
}
