use clap::Parser;
use miette::Result;
use wvw::cli::{Cli, Commands};
use wvw::core::Config;
use wvw::logging::{init_logging, LogConfig, LogFormat};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior so piping HTML into `head` exits quietly.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    // Install miette's fancy error handler for definition diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    // Commands load the config again once logging is up, which reports malformed files
    let log_format = global
        .log_format
        .clone()
        .or_else(|| Config::load_quiet().log_format)
        .and_then(|f| f.parse::<LogFormat>().ok())
        .unwrap_or_default();
    let log_config = if global.quiet {
        LogConfig::quiet()
    } else {
        LogConfig::from_verbosity(global.verbose)
    };
    init_logging(&log_config.with_format(log_format).with_ansi(console::colors_enabled_stderr()));

    match cli.command {
        Commands::Render(args) => wvw::cli::commands::render::run(args, &global),
        Commands::Validate(args) => wvw::cli::commands::validate::run(args, &global),
        Commands::Pages(args) => wvw::cli::commands::pages::run(args, &global),
        Commands::Config(cmd) => wvw::cli::commands::config::run(cmd, &global),
    }
}
