use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use homedots::cli::{Cli, Command};
use homedots::commands;
use homedots::engine::Phase;
use homedots::exec::SystemExecutor;
use homedots::logging::{self, Logger};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();

    let log_file = logging::log_file_path(args.command.name());
    logging::init_subscriber(args.verbose, args.global.quiet, log_file.as_deref());
    let log = Arc::new(Logger::new(log_file));

    log.header("    .: Dotfiles :.");

    match &args.command {
        Command::Create => commands::create::run(&commands::resolve_layout(&args.global)?, &*log),
        Command::Get { url } => commands::get::run(
            &commands::resolve_layout(&args.global)?,
            url,
            &SystemExecutor,
            &*log,
        ),
        Command::Add { subdir, file } => commands::add::run(
            &commands::resolve_layout(&args.global)?,
            subdir,
            file,
            &*log,
        )
        .map(|_| ()),
        Command::Run => commands::run::run(&args.global, None, &log),
        Command::Copy => commands::run::run(&args.global, Some(Phase::Copy), &log),
        Command::Link => commands::run::run(&args.global, Some(Phase::Link), &log),
        Command::Init => commands::run::run(&args.global, Some(Phase::Init), &log),
    }
}
