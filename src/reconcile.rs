use crate::snapshot::RuleSet;

/// Which imported rule types found a live counterpart
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    pub matched: Vec<String>,
    pub unmatched: Vec<String>,
}

/// Rewrite imported rule identifiers with those of the live rules of the same type.
///
/// Rule `type` is the only key: snapshot identifiers are scrubbed and would not
/// match another environment anyway. A type with no live rule ends up with an
/// empty identifier and is left for the autoscaler API to handle.
pub fn reconcile(imported: &RuleSet, live: &RuleSet) -> (RuleSet, ReconcileReport) {
    let mut resolved = imported.clone();
    let mut report = ReconcileReport::default();

    for rule in &mut resolved.relationships.rules {
        rule.guid = live.find_by_type(&rule.rule_type);

        if rule.guid.is_empty() {
            report.unmatched.push(rule.rule_type.clone());
        } else {
            report.matched.push(rule.rule_type.clone());
        }
    }

    (resolved, report)
}
