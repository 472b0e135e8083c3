use clap::Parser;
use std::process;

use taskboard::cli::commands::{Cli, Commands};
use taskboard::cli::{self, Context};
use taskboard::logging;

fn main() {
    let cli_args = Cli::parse();
    if let Err(e) = logging::init(cli_args.verbose) {
        eprintln!("warning: {e:#}");
    }
    let ctx = Context {
        json: cli_args.json,
        db: cli_args.db.clone(),
    };

    let exit_code = match cli_args.command {
        Commands::Init { config } => cli::init::run(config.as_deref(), &ctx),
        Commands::Task(cmd) => cli::task::run(cmd, &ctx),
        Commands::Next => cli::next::run(&ctx),
        Commands::Order => cli::order::run(&ctx),
        Commands::Status => cli::status::run(&ctx),
        Commands::Workload { member } => cli::workload::run(member.as_deref(), &ctx),
        Commands::Burndown { from, to } => cli::burndown::run(from, to, &ctx),
    };

    process::exit(exit_code);
}
