//! Command handler modules
//!
//! Thin wrappers that connect the CLI to the copy pipelines: open the session
//! and HTTP client through a [`Connector`], run the pipeline, write the outcome.

pub mod copy;

pub use copy::{
    handle_export, handle_find, handle_import, render_error, CfConnector, CommandContext,
    Connector,
};
