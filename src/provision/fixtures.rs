//! Phase 2: custom fields, fixtures, demo data, queues.

use super::{probes, DemoData, Provisioner, Step, StepRecord};
use crate::error::Result;
use std::time::Instant;
use tracing::{info, warn};

/// Initialize everything the custom-field probe guards.
pub fn provision(p: &mut Provisioner<'_>) -> Result<()> {
    info!("Creating custom fields for records...");
    p.step(
        "init-record-custom-fields",
        &["rdm-records", "custom-fields", "init"],
    )?;

    info!("Creating custom fields for communities...");
    p.step(
        "init-community-custom-fields",
        &["communities", "custom-fields", "init"],
    )?;
    p.state.mark(Step::CustomFields);

    info!("Creating rdm fixtures...");
    p.step("load-fixtures", &["rdm-records", "fixtures"])?;

    info!("Rebuilding all indices...");
    p.step("rebuild-indices", &["rdm", "rebuild-all-indices"])?;

    p.demo_data = seed_demo_data(p)?;

    declare_queues(p)?;

    info!("Custom fields and fixtures setup completed.");
    Ok(())
}

fn seed_demo_data(p: &mut Provisioner<'_>) -> Result<DemoData> {
    if !p.settings.demo_data {
        return Ok(DemoData::Disabled);
    }

    if probes::demo_data_exists(&p.app)? {
        info!("Demo data already exists, skipping creation...");
        p.steps.push(StepRecord::skipped("demo-data", "records already present"));
        return Ok(DemoData::AlreadyPresent);
    }

    let Some(email) = p.settings.admin.email.clone() else {
        warn!("INVENIO_ADMIN_EMAIL not set, skipping demo data creation.");
        p.steps.push(StepRecord::skipped("demo-data", "no admin email"));
        return Ok(DemoData::MissingAdmin);
    };

    info!("Creating demo data...");
    p.step(
        "demo-records",
        &["rdm-records", "demo", "records", "--user", &email],
    )?;
    p.step(
        "demo-communities",
        &["rdm-records", "demo", "communities", "--user", &email],
    )?;
    info!("Demo data creation completed.");
    Ok(DemoData::Created)
}

/// Queue declaration is best effort: brokers are often not up yet.
fn declare_queues(p: &mut Provisioner<'_>) -> Result<()> {
    info!("Declaring queues...");
    let start = Instant::now();
    let result = p.app.capture(&["queues", "declare"])?;

    if result.success {
        p.steps.push(StepRecord::completed("declare-queues", start.elapsed()));
        return Ok(());
    }

    warn!("Failed to declare queues. This is usually non-critical.");
    let stderr = result.stderr.trim();
    if !stderr.is_empty() {
        warn!("Queue declaration error: {}", stderr);
    }
    p.steps.push(StepRecord::failed(
        "declare-queues",
        start.elapsed(),
        format!("exit code {:?} (ignored)", result.exit_code),
    ));
    Ok(())
}
