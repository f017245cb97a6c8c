//! `wvw pages` command - Completion and navigation state of every page

use console::style;
use miette::Result;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::helpers::{effective_format, load_values, print_structured, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Config, PageHandle, Wizard};
use crate::schema::load_wizard;

#[derive(clap::Args, Debug)]
pub struct PagesArgs {
    /// Wizard definition file (YAML or JSON)
    pub wizard: PathBuf,

    /// Current field values (YAML or JSON)
    #[arg(long)]
    pub values: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct PageSummary {
    id: String,
    title: String,
    complete: bool,
    previous: Option<String>,
    next: Option<String>,
    can_advance: bool,
}

#[derive(Debug, Serialize)]
struct WizardSummary {
    title: String,
    can_finish: bool,
    pages: Vec<PageSummary>,
}

fn page_id(wizard: &Wizard, handle: Option<PageHandle>) -> Option<String> {
    handle
        .and_then(|h| wizard.page(h))
        .map(|p| p.id().to_string())
}

pub fn run(args: PagesArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let wizard = load_wizard(&args.wizard)?;
    let values = load_values(args.values.as_deref())?;

    // Completion is only known after each page has been validated
    for page in wizard.pages() {
        page.validation_templates(&values)?;
    }

    let summary = WizardSummary {
        title: wizard.title().to_string(),
        can_finish: wizard.can_finish(),
        pages: wizard
            .pages()
            .iter()
            .map(|page| PageSummary {
                id: page.id().to_string(),
                title: page.name().to_string(),
                complete: page.is_complete(),
                previous: page_id(&wizard, page.previous_page()),
                next: page_id(&wizard, page.next_page()),
                can_advance: page.can_advance(),
            })
            .collect(),
    };

    match effective_format(global, &config) {
        format @ (OutputFormat::Json | OutputFormat::Yaml) => print_structured(&summary, format),
        OutputFormat::Text | OutputFormat::Auto => {
            if !global.quiet && !summary.title.is_empty() {
                println!("{}", style(&summary.title).bold());
                println!("{}", style("─".repeat(50)).dim());
            }
            for page in &summary.pages {
                let marker = if page.complete {
                    style("✓").green()
                } else {
                    style("✗").red()
                };
                println!(
                    "{} {:<16} {:<24} next: {:<12} advance: {}",
                    marker,
                    truncate_str(&page.id, 16),
                    truncate_str(&page.title, 24),
                    page.next.as_deref().unwrap_or("-"),
                    if page.can_advance { "yes" } else { "no" }
                );
            }
            if !global.quiet {
                println!();
                println!(
                    "{} {}",
                    style("→").blue(),
                    if summary.can_finish {
                        "All pages complete"
                    } else {
                        "Some pages are incomplete"
                    }
                );
            }
            Ok(())
        }
    }
}
