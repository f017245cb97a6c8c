//! `wvw validate` command - Validate a page against a set of values

use console::style;
use miette::Result;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::helpers::{
    describe_fragment, effective_format, load_values, print_structured, select_page,
};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::schema::{load_wizard, Fragment};

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Wizard definition file (YAML or JSON)
    pub wizard: PathBuf,

    /// Page to validate (default: first page)
    #[arg(long, short = 'p')]
    pub page: Option<String>,

    /// Current field values (YAML or JSON)
    #[arg(long)]
    pub values: Option<PathBuf>,

    /// Show the empty placeholders too
    #[arg(long)]
    pub all: bool,
}

#[derive(Serialize)]
struct ValidationReport<'a> {
    page: &'a str,
    complete: bool,
    can_advance: bool,
    fragments: &'a [Fragment],
}

pub fn run(args: ValidateArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let wizard = load_wizard(&args.wizard)?;
    let values = load_values(args.values.as_deref())?;
    let page = select_page(&wizard, args.page.as_deref())?;

    let fragments = page.validation_templates(&values)?;
    let complete = page.is_complete();

    match effective_format(global, &config) {
        format @ (OutputFormat::Json | OutputFormat::Yaml) => {
            print_structured(
                &ValidationReport {
                    page: page.id(),
                    complete,
                    can_advance: page.can_advance(),
                    fragments: &fragments,
                },
                format,
            )?;
        }
        OutputFormat::Text | OutputFormat::Auto => {
            for fragment in &fragments {
                let is_placeholder = fragment.content == "&nbsp;";
                if is_placeholder && !args.all {
                    continue;
                }
                let (kind, text) = describe_fragment(&fragment.content);
                let marker = match kind {
                    "error" => style("✗").red(),
                    "warning" => style("!").yellow(),
                    "info" => style("i").blue(),
                    _ => style("·").dim(),
                };
                println!("{} {} {}", marker, style(&fragment.id).dim(), text);
            }

            if !global.quiet {
                if complete {
                    println!(
                        "{} Page {} is complete",
                        style("✓").green(),
                        style(page.id()).cyan()
                    );
                } else {
                    println!(
                        "{} Page {} is incomplete",
                        style("✗").red(),
                        style(page.id()).cyan()
                    );
                }
            }
        }
    }

    if complete {
        Ok(())
    } else {
        Err(miette::miette!("Page '{}' has validation errors", page.id()))
    }
}
