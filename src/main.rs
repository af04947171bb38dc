use cardblock::cli::{completions, id, list, load_config, parse, Cli, Commands};
use cardblock::output::Printer;
use clap::Parser;
use miette::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let printer = Printer::new();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Parse(args) => parse::run(args, &load_config(config)?, &printer)?,
        Commands::List(args) => list::run(args, &load_config(config)?, &printer)?,
        Commands::SetId(args) => id::run_set(args, &load_config(config)?, &printer)?,
        Commands::DeleteId(args) => id::run_delete(args, &load_config(config)?, &printer)?,
        Commands::Completions(args) => completions::run(args)?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "cardblock=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}
