//! Command-line front end over [`testmetry_sdk::Monitor`].
//!
//! The binary stays a thin shell: argument parsing in `args`, source
//! resolution in `config`, one handler module per command namespace, and
//! plain-text rendering in `output`. Query semantics live entirely in the
//! SDK so the same results come back whether `--source` is a store file
//! or a server URL.

mod args;
mod commands;
pub mod config;
mod handlers;
mod output;

pub use args::{
    Cli, Commands, ComponentCommand, ConfigCommand, ContextCommand, ExportCommand,
    MetricCommand, MetricFilterArgs, PipelineCommand, RankingArgs, ResourceArg,
    ResourceCommand, ScopeArg, SessionCommand,
};
pub use commands::run;
