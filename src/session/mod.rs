//! Platform session abstraction.
//!
//! Everything the copy pipeline needs from the logged-in CLI session: the
//! access token, the API endpoint and app/service lookups. [`CfSession`] reads
//! the Cloud Foundry CLI's own config; tests substitute an in-memory fake.

mod cf;

use crate::error::Result;

pub use cf::{CfConfig, CfSession};

/// An application in the targeted space
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct App {
    pub guid: String,
    pub name: String,
}

/// A service instance as listed in the targeted space
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSummary {
    /// Instance name chosen by the user, e.g. `myscaler`
    pub name: String,
    /// Offering label, e.g. `app-autoscaler`; empty for user-provided services
    pub offering: String,
}

/// Full details of one service instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInstance {
    pub guid: String,
    pub name: String,
    pub dashboard_url: String,
}

/// Capabilities provided by the host CLI session
pub trait Session {
    fn is_logged_in(&self) -> Result<bool>;

    /// Token exactly as it goes into the `Authorization` header
    fn access_token(&self) -> Result<String>;

    fn api_endpoint(&self) -> Result<String>;

    fn is_ssl_disabled(&self) -> Result<bool>;

    fn get_app(&self, name: &str) -> Result<App>;

    fn get_services(&self) -> Result<Vec<ServiceSummary>>;

    fn get_service(&self, name: &str) -> Result<ServiceInstance>;
}
