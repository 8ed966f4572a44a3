use crate::binding;
use crate::error::{Error, Result};
use crate::snapshot::{RuleSet, Schedule, Snapshot};
use crate::transport::JsonClient;

use super::Target;

/// Fetch the live rules and schedule of `target` as a portable snapshot.
///
/// Rule identifiers are scrubbed before returning, so the result can be
/// persisted and later applied to a different binding.
pub fn export_snapshot(client: &JsonClient, target: &Target) -> Result<Snapshot> {
    let binding = binding::resolve(client, &target.api_endpoint, &target.app.guid, &target.service)?;

    let mut rules: RuleSet = client
        .get(&binding.rules_url)
        .map_err(|e| Error::FetchRules(Box::new(e)))?;
    rules.scrub();

    let schedule: Schedule = client
        .get(&binding.schedule_url)
        .map_err(|e| Error::FetchSchedule(Box::new(e)))?;

    log::info!(
        "Exported {} rules and {} scheduled changes from binding {}",
        rules.rules().len(),
        schedule.resources.len(),
        binding.binding_guid
    );

    Ok(Snapshot::new(rules, schedule))
}
