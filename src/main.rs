mod args;
mod cli;
mod commands;
mod editor;
mod hub;
mod modules;
mod project;

use clap::Parser;
use log::LevelFilter;

fn main() {
    let cli = cli::Cli::parse();
    init_logging(cli.verbose());

    let result = match cli.command {
        cli::Commands::List(args) => commands::handle_list(args),
        cli::Commands::Launch(args) => commands::handle_launch(args),
        cli::Commands::Install(args) => commands::handle_install(args),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(err) => {
            log::error!("{:#}", err);
            1
        }
    };
    std::process::exit(exit_code);
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .format_timestamp(None)
        .init();
}
