//! Error types for the export/import core.
//!
//! Session, resolution, transport and snapshot-file failures each get their own
//! variant so callers can tell them apart. Every error is terminal for the
//! current invocation; nothing is retried.

use std::path::PathBuf;

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while copying autoscaler settings
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Session
    /// No access token or API target in the CLI session
    #[error("you need to log in")]
    NotLoggedIn,

    /// The CLI session configuration could not be read
    #[error("couldn't read CLI session config {path}: {message}")]
    SessionConfig { path: PathBuf, message: String },

    /// The session has no org/space targeted
    #[error("no space targeted, use 'cf target -s SPACE'")]
    NoTargetSpace,

    /// The Cloud Controller rejected the session's access token
    #[error("the cf access token was rejected, it has probably expired; run 'cf oauth-token' or 'cf login' and try again")]
    SessionExpired,

    #[error("couldn't get access token: {0}")]
    AccessToken(String),

    #[error("couldn't get API end-point: {0}")]
    ApiEndpoint(String),

    #[error("couldn't get app {name}")]
    AppLookup {
        name: String,
        #[source]
        source: Box<Error>,
    },

    #[error("app {name} not found")]
    AppNotFound { name: String },

    #[error("couldn't get service named {name}")]
    ServiceLookup {
        name: String,
        #[source]
        source: Box<Error>,
    },

    #[error("service instance {name} not found")]
    ServiceNotFound { name: String },

    // Resolution
    /// Zero or several bound services carry the autoscaler offering
    #[error("an autoscaler service cannot be found")]
    AutoscalerNotFound,

    /// The binding query did not return exactly one binding
    #[error("couldn't find service binding to {service}")]
    BindingNotFound { service: String },

    #[error("couldn't retrieve service binding")]
    BindingQuery(#[source] Box<Error>),

    #[error("invalid API URL from cli: {url}")]
    InvalidApiUrl { url: String },

    #[error("invalid dashboard URL from service instance: {url}")]
    InvalidDashboardUrl { url: String },

    // Transport
    /// Connection, TLS or timeout failure
    #[error("request to {url} failed")]
    Network {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Non-success status with a decodable error payload
    #[error("remote API returned {status} ({description}):\n{}", format_messages(.messages))]
    Remote {
        status: u16,
        description: String,
        messages: Vec<String>,
    },

    #[error("couldn't parse error response (status {status})")]
    MalformedErrorResponse {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    #[error("couldn't parse response from {url}")]
    MalformedResponse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("couldn't encode request body")]
    Encode(#[source] serde_json::Error),

    #[error("couldn't build HTTP client: {0}")]
    HttpClient(String),

    // Autoscaler API steps
    #[error("autoscaler API: couldn't fetch rules")]
    FetchRules(#[source] Box<Error>),

    #[error("autoscaler API: couldn't fetch schedule")]
    FetchSchedule(#[source] Box<Error>),

    #[error("couldn't save rules")]
    SaveRules(#[source] Box<Error>),

    /// Earlier entries stay applied remotely; later ones were never sent
    #[error(
        "couldn't save schedule entry {index} of {total} \
         (entries before it were applied, entries after it were not sent; check the remote state)"
    )]
    SaveSchedule {
        index: usize,
        total: usize,
        #[source]
        source: Box<Error>,
    },

    // Snapshot file
    #[error("couldn't read snapshot file {path}")]
    SnapshotRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("couldn't write snapshot file {path}")]
    SnapshotWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid snapshot file {path}")]
    SnapshotParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("couldn't encode snapshot")]
    SnapshotEncode(#[source] serde_json::Error),
}

/// Render remote error messages one per line, `  - message`
pub fn format_messages(messages: &[String]) -> String {
    messages
        .iter()
        .map(|m| format!("  - {m}"))
        .collect::<Vec<_>>()
        .join("\n")
}
