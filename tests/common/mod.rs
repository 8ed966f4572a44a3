//! Fakes shared by the integration tests: a cf session and an in-memory
//! server standing in for the Cloud Controller and the autoscaler API.

#![allow(dead_code)]

use copy_autoscaler::error::{Error, Result};
use copy_autoscaler::session::{App, ServiceInstance, ServiceSummary, Session};
use copy_autoscaler::transport::{HttpClient, HttpRequest, HttpResponse, JsonClient};
use reqwest::Method;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub const API: &str = "https://api.example.com";
pub const BINDINGS_QUERY: &str = "https://api.example.com/v2/service_bindings?q=app_guid%3Aapp-1&q=service_instance_guid%3Asi-1";
pub const RULES_URL: &str = "https://scaler.example.com/api/bindings/b-1";
pub const SCHEDULE_URL: &str = "https://scaler.example.com/api/bindings/b-1/scheduled_limit_changes";

// =============================================================================
// Fakes
// =============================================================================

#[derive(Clone)]
pub struct FakeSession {
    pub logged_in: bool,
    pub services: Vec<ServiceSummary>,
}

impl FakeSession {
    pub fn with_services(services: &[(&str, &str)]) -> Self {
        FakeSession {
            logged_in: true,
            services: services
                .iter()
                .map(|(name, offering)| ServiceSummary {
                    name: name.to_string(),
                    offering: offering.to_string(),
                })
                .collect(),
        }
    }
}

impl Session for FakeSession {
    fn is_logged_in(&self) -> Result<bool> {
        Ok(self.logged_in)
    }

    fn access_token(&self) -> Result<String> {
        Ok("bearer test-token".to_string())
    }

    fn api_endpoint(&self) -> Result<String> {
        Ok(API.to_string())
    }

    fn is_ssl_disabled(&self) -> Result<bool> {
        Ok(false)
    }

    fn get_app(&self, name: &str) -> Result<App> {
        Ok(App {
            guid: "app-1".to_string(),
            name: name.to_string(),
        })
    }

    fn get_services(&self) -> Result<Vec<ServiceSummary>> {
        Ok(self.services.clone())
    }

    fn get_service(&self, name: &str) -> Result<ServiceInstance> {
        Ok(ServiceInstance {
            guid: "si-1".to_string(),
            name: name.to_string(),
            dashboard_url: "https://scaler.example.com/manage/si-1?x=y".to_string(),
        })
    }
}

pub type Requests = Rc<RefCell<Vec<HttpRequest>>>;

/// In-memory server: canned replies keyed by (method, url), optional failure
/// on the n-th POST to the schedule endpoint
pub struct FakeServer {
    routes: HashMap<(Method, String), (u16, String)>,
    pub fail_schedule_post: Option<usize>,
    pub requests: Requests,
}

impl FakeServer {
    pub fn new() -> Self {
        let mut server = FakeServer {
            routes: HashMap::new(),
            fail_schedule_post: None,
            requests: Rc::new(RefCell::new(Vec::new())),
        };
        server.route(
            Method::GET,
            BINDINGS_QUERY,
            200,
            json!({"resources": [{"metadata": {"guid": "b-1"}, "entity": {}}]}),
        );
        server.route(Method::PUT, RULES_URL, 200, json!({}));
        server
    }

    pub fn route(&mut self, method: Method, url: &str, status: u16, body: Value) {
        self.routes
            .insert((method, url.to_string()), (status, body.to_string()));
    }

    pub fn into_client(self) -> (JsonClient, Requests) {
        let requests = Rc::clone(&self.requests);
        (JsonClient::new(Box::new(self), "bearer test-token"), requests)
    }
}

impl HttpClient for FakeServer {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        self.requests.borrow_mut().push(request.clone());

        if request.method == Method::POST && request.url == SCHEDULE_URL {
            let posts = self
                .requests
                .borrow()
                .iter()
                .filter(|r| r.method == Method::POST)
                .count();
            let status = match self.fail_schedule_post {
                Some(n) if n == posts => 500,
                _ => 201,
            };
            let body = if status == 500 {
                r#"{"description":"boom","errors":[{"resource":"schedule","messages":["db down"]}]}"#
            } else {
                "{}"
            };
            return Ok(HttpResponse {
                status,
                body: body.as_bytes().to_vec(),
            });
        }

        match self.routes.get(&(request.method.clone(), request.url.clone())) {
            Some((status, body)) => Ok(HttpResponse {
                status: *status,
                body: body.as_bytes().to_vec(),
            }),
            None => Err(Error::Network {
                url: request.url.clone(),
                source: Box::new(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "no route",
                )),
            }),
        }
    }
}

pub fn live_rules(guid: &str, rule_type: &str) -> Value {
    json!({
        "min_instances": 1,
        "max_instances": 5,
        "enabled": true,
        "relationships": {"rules": [{
            "guid": guid, "type": rule_type, "enabled": true,
            "sub_type": "", "min_threshold": 20, "max_threshold": 80
        }]}
    })
}
