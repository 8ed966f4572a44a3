use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Instance-count rules configured on an autoscaler binding
///
/// Field names are the file format and the wire format at once, so they stay
/// snake_case exactly as the autoscaler API emits them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    #[serde(deserialize_with = "null_as_default")]
    pub min_instances: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub max_instances: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub enabled: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub relationships: Relationships,
}

/// Wrapper object the autoscaler API nests rules under
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Relationships {
    #[serde(deserialize_with = "null_as_default")]
    pub rules: Vec<Rule>,
}

/// A single scaling rule, e.g. scale on `memoryused` between two thresholds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rule {
    /// Remote identifier; empty until bound to a concrete remote rule
    #[serde(deserialize_with = "null_as_default")]
    pub guid: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub rule_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub enabled: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub sub_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub min_threshold: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub max_threshold: i64,
}

/// Time-triggered instance limit overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Schedule {
    #[serde(deserialize_with = "null_as_default")]
    pub resources: Vec<ScheduledChange>,
}

/// One scheduled limit change. Has no identifier: always created anew on import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledChange {
    pub executes_at: DateTime<FixedOffset>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub min_instances: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub max_instances: u32,
    /// Interval code as understood by the autoscaler API
    #[serde(default, deserialize_with = "null_as_default")]
    pub recurrence: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub enabled: bool,
}

/// The unit persisted to and loaded from a snapshot file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub rules: RuleSet,
    pub schedule: Schedule,
}

/// Decode a JSON `null` as the field's zero value, the same as a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl RuleSet {
    pub fn rules(&self) -> &[Rule] {
        &self.relationships.rules
    }

    /// Clear every rule identifier so the set can be applied to another binding
    pub fn scrub(&mut self) {
        for rule in &mut self.relationships.rules {
            rule.guid.clear();
        }
    }

    /// Identifier of the rule with the given type, or an empty string.
    ///
    /// When several rules share a type the last one wins. Likely accidental,
    /// but import results depend on it, so keep it until the intended meaning
    /// of duplicate types is settled.
    pub fn find_by_type(&self, rule_type: &str) -> String {
        let mut guid = String::new();
        for rule in &self.relationships.rules {
            if rule.rule_type == rule_type {
                guid = rule.guid.clone();
            }
        }
        guid
    }
}

impl Snapshot {
    pub fn new(rules: RuleSet, schedule: Schedule) -> Self {
        Snapshot { rules, schedule }
    }

    /// Pretty-printed JSON with 2-space indentation
    pub fn to_pretty_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Error::SnapshotEncode)
    }

    /// Write the snapshot to `path`, replacing any existing file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_pretty_json()?;

        fs::write(path, content).map_err(|source| Error::SnapshotWrite {
            path: path.to_path_buf(),
            source,
        })?;

        log::debug!("Wrote snapshot to {}", path.display());
        Ok(())
    }

    /// Read and parse a snapshot file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::SnapshotRead {
            path: path.to_path_buf(),
            source,
        })?;

        let snapshot: Snapshot =
            serde_json::from_str(&content).map_err(|source| Error::SnapshotParse {
                path: path.to_path_buf(),
                source,
            })?;

        log::debug!(
            "Loaded snapshot from {} ({} rules, {} scheduled changes)",
            path.display(),
            snapshot.rules.rules().len(),
            snapshot.schedule.resources.len()
        );
        Ok(snapshot)
    }
}
