use crate::binding;
use crate::error::{Error, Result};
use crate::reconcile::{reconcile, ReconcileReport};
use crate::snapshot::{RuleSet, Snapshot};
use crate::transport::JsonClient;

use super::Target;

/// What an import applied to the remote binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub binding_guid: String,
    pub rules_submitted: usize,
    pub reconcile: ReconcileReport,
    pub scheduled_changes_created: usize,
}

/// Apply `snapshot` to the binding of `target`.
///
/// Rules are replaced in one PUT after their identifiers are taken from the
/// live rules. Schedule entries are then created one POST at a time; a failure
/// part way leaves the earlier entries in place.
pub fn import_snapshot(
    client: &JsonClient,
    target: &Target,
    snapshot: &Snapshot,
) -> Result<ImportSummary> {
    let binding = binding::resolve(client, &target.api_endpoint, &target.app.guid, &target.service)?;

    let live: RuleSet = client
        .get(&binding.rules_url)
        .map_err(|e| Error::FetchRules(Box::new(e)))?;

    let (resolved, report) = reconcile(&snapshot.rules, &live);
    for rule_type in &report.unmatched {
        log::warn!("No live rule of type {rule_type}, submitting it without an identifier");
    }

    client
        .put(&binding.rules_url, &resolved)
        .map_err(|e| Error::SaveRules(Box::new(e)))?;
    log::info!("Replaced rules on binding {}", binding.binding_guid);

    let total = snapshot.schedule.resources.len();
    for (i, change) in snapshot.schedule.resources.iter().enumerate() {
        client
            .post(&binding.schedule_url, change)
            .map_err(|e| Error::SaveSchedule {
                index: i + 1,
                total,
                source: Box::new(e),
            })?;
        log::debug!("Created scheduled change {} of {total}", i + 1);
    }

    Ok(ImportSummary {
        binding_guid: binding.binding_guid,
        rules_submitted: resolved.rules().len(),
        reconcile: report,
        scheduled_changes_created: total,
    })
}
