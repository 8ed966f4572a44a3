use std::time::Duration;

use reqwest::blocking::Client;

use super::{HttpClient, HttpRequest, HttpResponse};
use crate::error::{Error, Result};

/// Options for building the production HTTP client
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Overall request timeout; `None` keeps the reqwest default
    pub timeout: Option<Duration>,
    /// Accept any TLS certificate, mirroring `cf login --skip-ssl-validation`
    pub skip_ssl_validation: bool,
}

/// [`HttpClient`] backed by a blocking reqwest client
pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    pub fn new(options: &ClientOptions) -> Result<Self> {
        let mut builder =
            Client::builder().danger_accept_invalid_certs(options.skip_ssl_validation);

        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        if options.skip_ssl_validation {
            log::warn!("TLS certificate verification is disabled");
        }

        let client = builder
            .build()
            .map_err(|e| Error::HttpClient(e.to_string()))?;

        Ok(ReqwestClient { client })
    }
}

impl HttpClient for ReqwestClient {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let network_error = |e: reqwest::Error| Error::Network {
            url: request.url.clone(),
            source: Box::new(e),
        };

        let mut builder = self.client.request(request.method.clone(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().map_err(network_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().map_err(network_error)?.to_vec();

        Ok(HttpResponse { status, body })
    }
}
