//! `wvw render` command - Render a wizard page to HTML

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use crate::cli::helpers::{effective_format, load_values, print_structured, select_page};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::schema::{load_wizard, FormRenderer};

#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    /// Wizard definition file (YAML or JSON)
    pub wizard: PathBuf,

    /// Page to render (default: first page)
    #[arg(long, short = 'p')]
    pub page: Option<String>,

    /// Current field values (YAML or JSON)
    #[arg(long)]
    pub values: Option<PathBuf>,

    /// Write the HTML to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Serialize)]
struct RenderedPage<'a> {
    page: &'a str,
    title: &'a str,
    html: &'a str,
}

pub fn run(args: RenderArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let wizard = load_wizard(&args.wizard)?;
    let values = load_values(args.values.as_deref())?;
    let page = select_page(&wizard, args.page.as_deref())?;

    let renderer = FormRenderer::from_config(&config).into_diagnostic()?;
    let html = page.content_as_html(&renderer, &values).into_diagnostic()?;

    if let Some(path) = &args.output {
        fs::write(path, &html).into_diagnostic()?;
        if !global.quiet {
            println!(
                "{} Rendered page {} to {}",
                style("✓").green(),
                style(page.id()).cyan(),
                path.display()
            );
        }
        return Ok(());
    }

    match effective_format(global, &config) {
        format @ (OutputFormat::Json | OutputFormat::Yaml) => print_structured(
            &RenderedPage {
                page: page.id(),
                title: page.name(),
                html: &html,
            },
            format,
        ),
        OutputFormat::Text | OutputFormat::Auto => {
            print!("{}", html);
            Ok(())
        }
    }
}
