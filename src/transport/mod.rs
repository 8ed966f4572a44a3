//! JSON-over-HTTP transport.
//!
//! [`JsonClient`] owns the request/response conventions shared by the Cloud
//! Controller and the autoscaler API: JSON bodies, a raw `Authorization`
//! header, 200/201 as the only success codes and a structured error payload
//! for everything else. The actual I/O sits behind the [`HttpClient`] trait so
//! the whole pipeline can run against an in-memory server in tests.

mod blocking;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub use blocking::{ClientOptions, ReqwestClient};

/// An outgoing HTTP request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Value of the first header matching `name` (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A received HTTP response, fully buffered
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Performs a single HTTP exchange. Implementations must not retry.
pub trait HttpClient {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

/// Error payload returned by the autoscaler API on failure
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ApiErrorResponse {
    pub description: String,
    pub errors: Vec<ApiErrorEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ApiErrorEntry {
    pub resource: String,
    pub messages: Vec<String>,
}

impl ApiErrorResponse {
    /// All messages across all resources, in payload order
    pub fn messages(&self) -> Vec<String> {
        self.errors
            .iter()
            .flat_map(|e| e.messages.iter().cloned())
            .collect()
    }
}

/// JSON client carrying the session's access token
pub struct JsonClient {
    http: Box<dyn HttpClient>,
    access_token: String,
}

impl JsonClient {
    pub fn new(http: Box<dyn HttpClient>, access_token: impl Into<String>) -> Self {
        JsonClient {
            http,
            access_token: access_token.into(),
        }
    }

    /// Send one request and return the raw body of a 200/201 response.
    ///
    /// Any other status is decoded as an [`ApiErrorResponse`].
    pub fn execute<T: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: Option<&T>,
    ) -> Result<Vec<u8>> {
        let mut headers = Vec::new();

        let body = match body {
            Some(data) => {
                let bytes = serde_json::to_vec(data).map_err(Error::Encode)?;
                headers.push(("Content-Type".to_string(), "application/json".to_string()));
                Some(bytes)
            }
            None => None,
        };

        // Sent as-is: the CLI session already stores "bearer <token>"
        headers.push(("Authorization".to_string(), self.access_token.clone()));

        let request = HttpRequest {
            method,
            url: url.to_string(),
            headers,
            body,
        };

        log::debug!("{} {}", request.method, request.url);
        let response = self.http.send(&request)?;
        log::debug!("{} {} -> {}", request.method, request.url, response.status);

        if response.status != 200 && response.status != 201 {
            return Err(decode_error(response));
        }

        Ok(response.body)
    }

    /// GET `url` and decode the JSON body
    pub fn get<R: DeserializeOwned>(&self, url: &str) -> Result<R> {
        let body = self.execute::<()>(Method::GET, url, None)?;
        serde_json::from_slice(&body).map_err(|source| Error::MalformedResponse {
            url: url.to_string(),
            source,
        })
    }

    /// PUT `data` to `url`, ignoring the response body
    pub fn put<T: Serialize + ?Sized>(&self, url: &str, data: &T) -> Result<()> {
        self.execute(Method::PUT, url, Some(data)).map(|_| ())
    }

    /// POST `data` to `url`, ignoring the response body
    pub fn post<T: Serialize + ?Sized>(&self, url: &str, data: &T) -> Result<()> {
        self.execute(Method::POST, url, Some(data)).map(|_| ())
    }
}

fn decode_error(response: HttpResponse) -> Error {
    match serde_json::from_slice::<ApiErrorResponse>(&response.body) {
        Ok(payload) => Error::Remote {
            status: response.status,
            messages: payload.messages(),
            description: payload.description,
        },
        Err(source) => Error::MalformedErrorResponse {
            status: response.status,
            source,
        },
    }
}
