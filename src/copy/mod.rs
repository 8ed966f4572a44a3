//! Find, export and import pipelines.
//!
//! Each pipeline is a single pass: the first failing step aborts the rest and
//! nothing is retried or rolled back.

mod export;
mod import;

pub use export::export_snapshot;
pub use import::{import_snapshot, ImportSummary};

use crate::error::{Error, Result};
use crate::session::{App, ServiceInstance, ServiceSummary, Session};
use crate::transport::{ClientOptions, JsonClient, ReqwestClient};

/// Offering label of the App Autoscaler service broker
pub const DEFAULT_SERVICE_OFFERING: &str = "app-autoscaler";

/// What one invocation operates on, gathered from the session up front
#[derive(Debug, Clone)]
pub struct Target {
    pub app: App,
    pub service: ServiceInstance,
    pub api_endpoint: String,
    pub access_token: String,
    pub ssl_disabled: bool,
}

impl Target {
    /// Production JSON client for this target's token and TLS setting
    pub fn client(&self, options: &ClientOptions) -> Result<JsonClient> {
        let options = ClientOptions {
            skip_ssl_validation: options.skip_ssl_validation || self.ssl_disabled,
            ..options.clone()
        };
        let http = ReqwestClient::new(&options)?;
        Ok(JsonClient::new(Box::new(http), self.access_token.clone()))
    }
}

/// Name of the single service instance whose offering is `offering`
pub fn find_autoscaler(services: &[ServiceSummary], offering: &str) -> Result<String> {
    let matches: Vec<&ServiceSummary> =
        services.iter().filter(|s| s.offering == offering).collect();

    match matches.as_slice() {
        [only] => Ok(only.name.clone()),
        _ => {
            log::debug!(
                "{} services with offering {offering} in {} listed",
                matches.len(),
                services.len()
            );
            Err(Error::AutoscalerNotFound)
        }
    }
}

/// Collect everything the pipelines need from the session.
///
/// Login is checked before any lookup goes over the network.
pub fn prepare(session: &dyn Session, app_name: &str, offering: &str) -> Result<Target> {
    if !session.is_logged_in()? {
        return Err(Error::NotLoggedIn);
    }

    let access_token = session.access_token()?;
    let api_endpoint = session.api_endpoint()?;
    let app = session.get_app(app_name)?;

    let service_name = find_autoscaler(&session.get_services()?, offering)?;
    let service = session.get_service(&service_name)?;
    let ssl_disabled = session.is_ssl_disabled()?;

    log::info!(
        "Using autoscaler {} ({}) for app {} ({})",
        service.name,
        service.guid,
        app.name,
        app.guid
    );

    Ok(Target {
        app,
        service,
        api_endpoint,
        access_token,
        ssl_disabled,
    })
}
