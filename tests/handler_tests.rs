//! Command handler tests: what the CLI prints for find, export and import,
//! and how a failure is rendered.

mod common;

use anyhow::Context;
use common::{live_rules, FakeServer, FakeSession, Requests, RULES_URL, SCHEDULE_URL};
use copy_autoscaler::config::Settings;
use copy_autoscaler::copy::Target;
use copy_autoscaler::handlers::{self, CommandContext, Connector};
use copy_autoscaler::session::Session;
use copy_autoscaler::transport::{ClientOptions, JsonClient};
use copy_autoscaler::VerbosityLevel;
use reqwest::Method;
use serde_json::{json, Value};
use serial_test::serial;
use std::cell::RefCell;
use std::rc::Rc;
use tempfile::TempDir;

/// Hands out the fake session and, once, a client backed by the fake server
struct FakeConnector {
    session: FakeSession,
    server: RefCell<Option<FakeServer>>,
    requests: Requests,
}

impl FakeConnector {
    fn new(session: FakeSession, server: FakeServer) -> Self {
        let requests = Rc::clone(&server.requests);
        FakeConnector {
            session,
            server: RefCell::new(Some(server)),
            requests,
        }
    }

    fn with_autoscaler(server: FakeServer) -> Self {
        Self::new(
            FakeSession::with_services(&[("myscaler", "app-autoscaler")]),
            server,
        )
    }
}

impl Connector for FakeConnector {
    fn open_session(
        &self,
        _settings: &Settings,
        _options: &ClientOptions,
    ) -> anyhow::Result<Box<dyn Session>> {
        Ok(Box::new(self.session.clone()))
    }

    fn connect(&self, _target: &Target, _options: &ClientOptions) -> anyhow::Result<JsonClient> {
        let server = self
            .server
            .borrow_mut()
            .take()
            .context("client requested twice")?;
        Ok(server.into_client().0)
    }
}

/// Point the audit log at a scratch directory for the duration of `f`
fn with_config_dir<F: FnOnce(&TempDir)>(f: F) {
    let temp = TempDir::new().unwrap();
    std::env::set_var("COPY_AUTOSCALER_CONFIG_DIR", temp.path());
    f(&temp);
    std::env::remove_var("COPY_AUTOSCALER_CONFIG_DIR");
}

fn context(verbosity: VerbosityLevel) -> CommandContext {
    CommandContext {
        app_name: "myapp".to_string(),
        settings: Settings::default(),
        verbosity,
    }
}

fn exporting_server() -> FakeServer {
    let mut server = FakeServer::new();
    server.route(Method::GET, RULES_URL, 200, live_rules("g1", "cpu"));
    server.route(
        Method::GET,
        SCHEDULE_URL,
        200,
        json!({"resources": [{
            "executes_at": "2024-03-01T08:00:00Z",
            "min_instances": 2, "max_instances": 4, "recurrence": 10, "enabled": true
        }]}),
    );
    server
}

fn text(out: Vec<u8>) -> String {
    String::from_utf8(out).unwrap()
}

// =============================================================================
// Find
// =============================================================================

#[test]
#[serial]
fn test_find_prints_bare_instance_name() {
    with_config_dir(|_| {
        let connector = FakeConnector::with_autoscaler(FakeServer::new());
        let mut out = Vec::new();

        handlers::handle_find(&context(VerbosityLevel::Normal), &connector, &mut out).unwrap();

        assert_eq!(text(out), "myscaler\n");
        assert!(connector.requests.borrow().is_empty());
    });
}

// =============================================================================
// Export
// =============================================================================

#[test]
#[serial]
fn test_export_to_stdout_writes_only_the_snapshot() {
    with_config_dir(|_| {
        let connector = FakeConnector::with_autoscaler(exporting_server());
        let mut out = Vec::new();

        handlers::handle_export(&context(VerbosityLevel::Normal), &connector, &mut out, "-")
            .unwrap();

        let written: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(written["rules"]["relationships"]["rules"][0]["guid"], "");
        assert_eq!(written["rules"]["relationships"]["rules"][0]["type"], "cpu");
        assert_eq!(written["schedule"]["resources"][0]["recurrence"], 10);
    });
}

#[test]
#[serial]
fn test_export_to_file_reports_counts() {
    with_config_dir(|temp| {
        let path = temp.path().join("settings.json");
        let connector = FakeConnector::with_autoscaler(exporting_server());
        let mut out = Vec::new();

        handlers::handle_export(
            &context(VerbosityLevel::Normal),
            &connector,
            &mut out,
            path.to_str().unwrap(),
        )
        .unwrap();

        let output = text(out);
        assert!(output.contains("Exporting autoscaler settings of myapp"));
        assert!(output.contains("Exported 1 rules and 1 scheduled changes"));
        assert!(path.exists());
    });
}

// =============================================================================
// Import
// =============================================================================

#[test]
#[serial]
fn test_quiet_import_prints_done() {
    with_config_dir(|temp| {
        let path = temp.path().join("settings.json");
        std::fs::write(
            &path,
            json!({
                "rules": {"relationships": {"rules": [{"type": "cpu", "min_threshold": 10}]}},
                "schedule": {"resources": []}
            })
            .to_string(),
        )
        .unwrap();

        let mut server = FakeServer::new();
        server.route(Method::GET, RULES_URL, 200, live_rules("g1", "cpu"));
        let connector = FakeConnector::with_autoscaler(server);
        let mut out = Vec::new();

        handlers::handle_import(&context(VerbosityLevel::Quiet), &connector, &mut out, &path)
            .unwrap();

        assert_eq!(text(out), "done.\n");
    });
}

#[test]
#[serial]
fn test_import_of_missing_file_never_reaches_the_network() {
    with_config_dir(|temp| {
        let connector = FakeConnector::with_autoscaler(FakeServer::new());
        let mut out = Vec::new();

        let err = handlers::handle_import(
            &context(VerbosityLevel::Normal),
            &connector,
            &mut out,
            &temp.path().join("absent.json"),
        )
        .unwrap_err();

        assert!(handlers::render_error(&err).contains("couldn't read snapshot file"));
        assert!(out.is_empty());
        assert!(connector.requests.borrow().is_empty());
    });
}

// =============================================================================
// Error line
// =============================================================================

#[test]
#[serial]
fn test_error_line_for_missing_autoscaler() {
    with_config_dir(|_| {
        let connector = FakeConnector::new(
            FakeSession::with_services(&[("db", "postgres")]),
            FakeServer::new(),
        );
        let mut out = Vec::new();

        let err =
            handlers::handle_find(&context(VerbosityLevel::Normal), &connector, &mut out).unwrap_err();

        let line = handlers::render_error(&err);
        assert!(line.contains("error:"));
        assert!(line.ends_with("an autoscaler service cannot be found"));
    });
}

#[test]
#[serial]
fn test_error_line_names_each_cause_once() {
    with_config_dir(|temp| {
        let path = temp.path().join("settings.json");
        std::fs::write(
            &path,
            json!({
                "rules": {"relationships": {"rules": [{"type": "cpu"}]}},
                "schedule": {"resources": []}
            })
            .to_string(),
        )
        .unwrap();

        let mut server = FakeServer::new();
        server.route(Method::GET, RULES_URL, 200, live_rules("g1", "cpu"));
        server.route(
            Method::PUT,
            RULES_URL,
            422,
            json!({"description": "bad", "errors": [{"resource": "rules", "messages": ["bad threshold"]}]}),
        );
        let connector = FakeConnector::with_autoscaler(server);
        let mut out = Vec::new();

        let err = handlers::handle_import(&context(VerbosityLevel::Quiet), &connector, &mut out, &path)
            .unwrap_err();

        let line = handlers::render_error(&err);
        assert!(line.contains("couldn't save rules: remote API returned 422 (bad):\n  - bad threshold"));
        assert_eq!(line.matches("bad threshold").count(), 1);
        assert_eq!(line.matches("remote API returned").count(), 1);
    });
}
