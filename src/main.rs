use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use std::io;
use std::path::PathBuf;

use copy_autoscaler::config::Settings;
use copy_autoscaler::handlers::{self, CfConnector, CommandContext};
use copy_autoscaler::{logger, VerbosityLevel};

#[derive(Parser)]
#[command(name = "copy-autoscaler")]
#[command(about = "Copy App Autoscaler rules and schedules between apps", long_about = None)]
#[command(version)]
#[command(after_help = "Examples:\n  \
    copy-autoscaler helloworld --find\n  \
    copy-autoscaler helloworld --export autoscaler-settings.json\n  \
    copy-autoscaler helloworld --import autoscaler-settings.json")]
#[command(group(ArgGroup::new("mode").required(true).args(["find", "export", "import"])))]
struct Cli {
    /// Name of the app the autoscaler is bound to
    app: String,

    /// Print the name of the autoscaler service bound to the app
    #[arg(long)]
    find: bool,

    /// Export rules and schedule to FILE ('-' for stdout)
    #[arg(long, value_name = "FILE")]
    export: Option<String>,

    /// Import rules and schedule from FILE
    #[arg(long, value_name = "FILE")]
    import: Option<PathBuf>,

    /// HTTP request timeout in seconds (overrides config.toml)
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Show matched rules and debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print essential output
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn verbosity(&self) -> VerbosityLevel {
        if self.quiet {
            VerbosityLevel::Quiet
        } else if self.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        // Errors go to stdout, matching what the cf CLI shows for plugins
        println!("{}", handlers::render_error(&e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let verbosity = cli.verbosity();

    logger::rotate_log_if_needed().ok();
    logger::init_logger(verbosity)?;

    let settings = Settings::load()
        .context("Failed to load settings")?
        .with_timeout_override(cli.timeout);

    let ctx = CommandContext {
        app_name: cli.app,
        settings,
        verbosity,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(destination) = cli.export.as_deref() {
        handlers::handle_export(&ctx, &CfConnector, &mut out, destination)
    } else if let Some(source) = cli.import.as_deref() {
        handlers::handle_import(&ctx, &CfConnector, &mut out, source)
    } else {
        handlers::handle_find(&ctx, &CfConnector, &mut out)
    }
}
