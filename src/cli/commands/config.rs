//! `wvw config` command - Configuration inspection

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{effective_format, print_structured};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Show paths to configuration files
    Path,
}

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show => run_show(global),
        ConfigCommands::Path => run_path(),
    }
}

fn run_show(global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    match effective_format(global, &config) {
        OutputFormat::Json => print_structured(&config, OutputFormat::Json),
        _ => {
            print!("{}", serde_yml::to_string(&config).into_diagnostic()?);
            Ok(())
        }
    }
}

fn run_path() -> Result<()> {
    let local = Config::local_config_path();
    let mut paths = vec![("local", local)];
    if let Some(global) = Config::global_config_path() {
        paths.push(("global", global));
    }

    for (scope, path) in paths {
        let marker = if path.exists() {
            style("✓").green()
        } else {
            style("·").dim()
        };
        println!("{} {:<6} {}", marker, scope, path.display());
    }
    Ok(())
}
