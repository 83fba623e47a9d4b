use clap::Parser;
use miette::Result;
use rit::cli::{Cli, Commands};
use rit::core::sampling::validate_tables;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
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

    init_tracing(global.verbose);
    validate_tables()?;

    match cli.command {
        Commands::Init(args) => rit::cli::commands::init::run(args),
        Commands::Plan(args) => rit::cli::commands::plan::run(args, &global),
        Commands::Record(args) => rit::cli::commands::record::run(args, &global),
        Commands::List(args) => rit::cli::commands::list::run(args, &global),
        Commands::Tables(args) => rit::cli::commands::tables::run(args, &global),
        Commands::Config(cmd) => rit::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => rit::cli::commands::completions::run(args),
    }
}

/// Log to stderr. `RUST_LOG` wins over `-v` when set.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
