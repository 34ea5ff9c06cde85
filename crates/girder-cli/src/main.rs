mod cli;
mod commands;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let code = match cli.command {
        Command::Analyze {
            repo,
            rules,
            format,
            fail_level,
        } => commands::analyze::run(&repo, &rules, format, fail_level),
        Command::Model { repo } => commands::model::run(&repo),
        Command::Rules { rules } => commands::rules::run(&rules),
        Command::Chains { repo, method, to } => {
            commands::chains::run(&repo, &method, to.as_deref())
        }
    };
    std::process::exit(code);
}
