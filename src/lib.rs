//! # copy-autoscaler
//!
//! Copies App Autoscaler settings between Cloud Foundry apps.
//!
//! ## Overview
//!
//! An autoscaler service instance bound to an app carries two kinds of
//! configuration: instance-count **rules** (scale on CPU, memory, latency...)
//! and a **schedule** of time-triggered limit changes. `copy-autoscaler`
//! exports both into a JSON snapshot file and imports such a file into the
//! binding of another app, possibly in another foundation.
//!
//! Rule identifiers are scrubbed on export. On import each rule is matched to
//! the live rule of the same `type` and takes over its identifier before the
//! rule set is replaced; schedule entries are always created anew.
//!
//! ## Architecture
//!
//! - Snapshot format and rule matching ([`snapshot`], [`reconcile`])
//! - Remote access ([`transport`], [`binding`], [`cloud_controller`], [`session`])
//! - Pipelines ([`copy`]) and their command-line front end ([`handlers`])
//! - Ambient concerns ([`config`], [`logger`], [`error`])

/// Service binding lookup and autoscaler API URL derivation.
pub mod binding;

/// Cloud Controller v2 response types, limited to the fields read here.
pub mod cloud_controller;

/// Configuration directory and `config.toml` settings.
pub mod config;

/// Find, export and import pipelines.
///
/// Sequences session preparation, binding resolution, fetching and submitting.
/// Each pipeline stops at its first failure.
pub mod copy;

/// Typed errors for the core.
pub mod error;

/// User-facing command handlers.
///
/// Load settings, talk to the session, run a pipeline and print the outcome.
pub mod handlers;

/// Logging configuration and the audit log file.
pub mod logger;

/// Matching imported rules to live rules by type.
pub mod reconcile;

/// Platform session abstraction and the cf CLI implementation.
pub mod session;

/// Snapshot file model: rules, schedule, identifier scrubbing and persistence.
pub mod snapshot;

/// JSON-over-HTTP transport with structured error decoding.
pub mod transport;

/// Verbosity level for command output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerbosityLevel {
    /// Only essential output
    Quiet,
    /// Standard output
    #[default]
    Normal,
    /// Extra detail, including debug logging
    Verbose,
}
