//! Find, export and import command handlers

use anyhow::{Context, Result};
use colored::Colorize;
use std::io::Write;
use std::path::Path;

use crate::config::Settings;
use crate::copy::{self, ImportSummary, Target};
use crate::logger;
use crate::session::{CfSession, Session};
use crate::snapshot::Snapshot;
use crate::transport::{ClientOptions, JsonClient};
use crate::VerbosityLevel;

/// Export destination meaning "write to standard output"
pub const STDOUT_DESTINATION: &str = "-";

/// Source of the cf session and the autoscaler API client
pub trait Connector {
    fn open_session(&self, settings: &Settings, options: &ClientOptions)
        -> Result<Box<dyn Session>>;

    fn connect(&self, target: &Target, options: &ClientOptions) -> Result<JsonClient>;
}

/// Reads the cf CLI config and talks HTTPS through reqwest
pub struct CfConnector;

impl Connector for CfConnector {
    fn open_session(
        &self,
        settings: &Settings,
        options: &ClientOptions,
    ) -> Result<Box<dyn Session>> {
        let session = CfSession::load(settings.cf_home.as_deref(), options)
            .context("Failed to open cf CLI session")?;
        Ok(Box::new(session))
    }

    fn connect(&self, target: &Target, options: &ClientOptions) -> Result<JsonClient> {
        Ok(target.client(options)?)
    }
}

/// Per-invocation inputs shared by all handlers
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub app_name: String,
    pub settings: Settings,
    pub verbosity: VerbosityLevel,
}

impl CommandContext {
    fn client_options(&self) -> ClientOptions {
        ClientOptions {
            timeout: self.settings.timeout(),
            skip_ssl_validation: false,
        }
    }

    fn target(&self, session: &dyn Session) -> Result<Target> {
        Ok(copy::prepare(
            session,
            &self.app_name,
            &self.settings.service_offering,
        )?)
    }

    fn connect(&self, connector: &dyn Connector) -> Result<(Target, JsonClient)> {
        let options = self.client_options();
        let session = connector.open_session(&self.settings, &options)?;
        let target = self.target(session.as_ref())?;
        let client = connector.connect(&target, &options)?;
        Ok((target, client))
    }

    fn status(&self, out: &mut dyn Write, message: &str) -> Result<()> {
        if self.verbosity != VerbosityLevel::Quiet {
            writeln!(out, "{}", message.cyan())?;
        }
        Ok(())
    }
}

/// The line printed when a command fails: `error: ` followed by the cause chain
pub fn render_error(err: &anyhow::Error) -> String {
    format!("{} {err:#}", "error:".red().bold())
}

/// Print the name of the autoscaler instance bound to the app
pub fn handle_find(
    ctx: &CommandContext,
    connector: &dyn Connector,
    out: &mut dyn Write,
) -> Result<()> {
    let session = connector.open_session(&ctx.settings, &ctx.client_options())?;
    let target = ctx.target(session.as_ref())?;

    writeln!(out, "{}", target.service.name)?;
    audit(&format!("find {}: {}", ctx.app_name, target.service.name));

    Ok(())
}

/// Export rules and schedule to `destination`, or stdout for `-`
pub fn handle_export(
    ctx: &CommandContext,
    connector: &dyn Connector,
    out: &mut dyn Write,
    destination: &str,
) -> Result<()> {
    let to_stdout = destination == STDOUT_DESTINATION;
    if !to_stdout {
        ctx.status(
            out,
            &format!("Exporting autoscaler settings of {}...", ctx.app_name),
        )?;
    }

    let (target, client) = ctx.connect(connector)?;
    let snapshot = copy::export_snapshot(&client, &target)?;

    if to_stdout {
        writeln!(out, "{}", snapshot.to_pretty_json()?)?;
    } else {
        snapshot.save(Path::new(destination))?;
        print_done(
            out,
            ctx.verbosity,
            &format!(
                "Exported {} rules and {} scheduled changes to {}",
                snapshot.rules.rules().len(),
                snapshot.schedule.resources.len(),
                destination
            ),
        )?;
    }

    audit(&format!(
        "export {} ({}) -> {destination}",
        ctx.app_name, target.service.name
    ));
    Ok(())
}

/// Import a snapshot file into the app's autoscaler binding
pub fn handle_import(
    ctx: &CommandContext,
    connector: &dyn Connector,
    out: &mut dyn Write,
    source: &Path,
) -> Result<()> {
    // Read the file before touching the network so a bad file fails fast
    let snapshot = Snapshot::load(source)?;
    ctx.status(
        out,
        &format!(
            "Importing {} into autoscaler settings of {}...",
            source.display(),
            ctx.app_name
        ),
    )?;

    let (target, client) = ctx.connect(connector)?;
    let summary = copy::import_snapshot(&client, &target, &snapshot)?;

    print_import_summary(out, ctx.verbosity, &summary)?;
    audit(&format!(
        "import {} -> {} ({}), binding {}",
        source.display(),
        ctx.app_name,
        target.service.name,
        summary.binding_guid
    ));
    Ok(())
}

fn print_import_summary(
    out: &mut dyn Write,
    verbosity: VerbosityLevel,
    summary: &ImportSummary,
) -> Result<()> {
    if verbosity == VerbosityLevel::Verbose {
        for rule_type in &summary.reconcile.matched {
            writeln!(out, "  {} {rule_type}", "matched".green())?;
        }
        for rule_type in &summary.reconcile.unmatched {
            writeln!(out, "  {} {rule_type}", "new".yellow())?;
        }
    }

    print_done(
        out,
        verbosity,
        &format!(
            "Imported {} rules and {} scheduled changes",
            summary.rules_submitted, summary.scheduled_changes_created
        ),
    )
}

fn print_done(out: &mut dyn Write, verbosity: VerbosityLevel, message: &str) -> Result<()> {
    if verbosity == VerbosityLevel::Quiet {
        writeln!(out, "done.")?;
    } else {
        writeln!(out, "{} {message}", "✓".green())?;
    }
    Ok(())
}

fn audit(message: &str) {
    if let Err(e) = logger::log_to_file(message) {
        log::warn!("Couldn't write audit log: {e:#}");
    }
}
