//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::cli::commands::{
    config::ConfigCommands, pages::PagesArgs, render::RenderArgs, validate::ValidateArgs,
};

#[derive(Parser)]
#[command(name = "wvw")]
#[command(author, version, about = "Webview Wizard")]
#[command(long_about = "Render declarative multi-page wizard forms to HTML and check page completion.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Log format: pretty, compact or json
    #[arg(long, global = true, env = "WVW_LOG_FORMAT")]
    pub log_format: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a page of a wizard to HTML
    Render(RenderArgs),

    /// Validate a page against a set of values
    Validate(ValidateArgs),

    /// Show completion and navigation state of every page
    Pages(PagesArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Use the configured default (text unless configured otherwise)
    #[default]
    Auto,
    /// Human-readable output
    Text,
    /// JSON format (for programming)
    Json,
    /// YAML format
    Yaml,
}
