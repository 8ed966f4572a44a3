//! Service binding resolution.
//!
//! Finds the one binding between an app and its autoscaler service instance
//! and derives the autoscaler API URLs for that binding.

use reqwest::Url;

use crate::cloud_controller::{ResourceList, ServiceBindingEntity};
use crate::error::{Error, Result};
use crate::session::ServiceInstance;
use crate::transport::JsonClient;

/// Autoscaler API locations for one binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingUrls {
    pub binding_guid: String,
    /// Rules resource, supports GET and PUT
    pub rules_url: String,
    /// Scheduled limit changes, supports GET and per-entry POST
    pub schedule_url: String,
}

/// Cloud Controller query for bindings between `app_guid` and `service_instance_guid`
pub fn service_bindings_url(
    api_endpoint: &str,
    app_guid: &str,
    service_instance_guid: &str,
) -> Result<Url> {
    let mut url = Url::parse(api_endpoint).map_err(|_| Error::InvalidApiUrl {
        url: api_endpoint.to_string(),
    })?;

    url.set_path("/v2/service_bindings");
    url.query_pairs_mut()
        .clear()
        .append_pair("q", &format!("app_guid:{app_guid}"))
        .append_pair("q", &format!("service_instance_guid:{service_instance_guid}"));

    Ok(url)
}

/// `{scheme}://{host}/api/bindings/{guid}` on the dashboard's host
pub fn binding_url(dashboard_url: &str, binding_guid: &str) -> Result<String> {
    let invalid = || Error::InvalidDashboardUrl {
        url: dashboard_url.to_string(),
    };

    let dashboard = Url::parse(dashboard_url).map_err(|_| invalid())?;
    let host = dashboard.host_str().ok_or_else(invalid)?;

    let base = match dashboard.port() {
        Some(port) => format!("{}://{}:{}", dashboard.scheme(), host, port),
        None => format!("{}://{}", dashboard.scheme(), host),
    };

    Ok(format!("{base}/api/bindings/{binding_guid}"))
}

pub fn schedule_url(binding_url: &str) -> String {
    format!("{binding_url}/scheduled_limit_changes")
}

/// Locate the binding of `service` to `app_guid` and build its API URLs
pub fn resolve(
    client: &JsonClient,
    api_endpoint: &str,
    app_guid: &str,
    service: &ServiceInstance,
) -> Result<BindingUrls> {
    let query = service_bindings_url(api_endpoint, app_guid, &service.guid)?;

    let bindings: ResourceList<ServiceBindingEntity> = client
        .get(query.as_str())
        .map_err(|e| Error::BindingQuery(Box::new(e)))?;

    if bindings.resources.len() != 1 {
        log::debug!(
            "Expected one binding to {}, found {}",
            service.name,
            bindings.resources.len()
        );
        return Err(Error::BindingNotFound {
            service: service.name.clone(),
        });
    }

    let binding_guid = bindings.resources[0].metadata.guid.clone();
    let rules_url = binding_url(&service.dashboard_url, &binding_guid)?;
    let schedule_url = schedule_url(&rules_url);

    log::info!("Resolved autoscaler binding {binding_guid}");

    Ok(BindingUrls {
        binding_guid,
        rules_url,
        schedule_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_service_bindings_url_has_two_q_values() {
        let url = service_bindings_url("https://api.example.com", "app-1", "si-1").unwrap();

        let q: Vec<String> = url
            .query_pairs()
            .filter(|(k, _)| k == "q")
            .map(|(_, v)| v.into_owned())
            .collect();

        assert_eq!(url.path(), "/v2/service_bindings");
        assert_eq!(q, vec!["app_guid:app-1", "service_instance_guid:si-1"]);
        assert_eq!(
            url.query(),
            Some("q=app_guid%3Aapp-1&q=service_instance_guid%3Asi-1")
        );
    }

    #[test]
    fn test_service_bindings_url_replaces_endpoint_path() {
        let url = service_bindings_url("https://api.example.com/some/path?x=1", "a", "s").unwrap();
        assert_eq!(url.path(), "/v2/service_bindings");
        assert!(!url.as_str().contains("x=1"));
    }

    #[test]
    fn test_invalid_api_endpoint() {
        let err = service_bindings_url("not a url", "a", "s").unwrap_err();
        assert!(matches!(err, Error::InvalidApiUrl { .. }));
    }

    #[rstest]
    #[case::plain(
        "https://autoscale.example.com/manage/xyz?token=1",
        "https://autoscale.example.com/api/bindings/b1"
    )]
    #[case::with_port(
        "http://localhost:8080/dashboard",
        "http://localhost:8080/api/bindings/b1"
    )]
    fn test_binding_url(#[case] dashboard: &str, #[case] expected: &str) {
        assert_eq!(binding_url(dashboard, "b1").unwrap(), expected);
    }

    #[rstest]
    #[case::garbage("::::")]
    #[case::relative("/manage/xyz")]
    #[case::no_host("mailto:ops@example.com")]
    fn test_invalid_dashboard_url(#[case] dashboard: &str) {
        let err = binding_url(dashboard, "b1").unwrap_err();
        assert!(matches!(err, Error::InvalidDashboardUrl { .. }));
    }

    #[test]
    fn test_schedule_url() {
        assert_eq!(
            schedule_url("https://a.example.com/api/bindings/b1"),
            "https://a.example.com/api/bindings/b1/scheduled_limit_changes"
        );
    }
}
