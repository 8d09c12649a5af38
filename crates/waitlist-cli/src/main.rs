//! Waitlist CLI.

use std::io::{self, IsTerminal};

use clap::Parser;
use tracing::Level;
use waitlist_cli::logging::{init_logging, LogConfig, LogFormat};

mod cli;
mod commands;
mod render;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{
    run_add, run_export, run_find, run_grant, run_history, run_list, run_users, Workspace,
};

fn main() {
    let cli = Cli::parse();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let exit_code = match run(&cli) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut ws = Workspace::open(cli)?;
    match &cli.command {
        Command::Add(args) => run_add(&ws, args),
        Command::List(args) => run_list(&ws, args),
        Command::Grant(args) => run_grant(&ws, args),
        Command::Find(args) => run_find(&ws, args),
        Command::Export(args) => run_export(&ws, args).map(|_| ()),
        Command::History => run_history(&ws),
        Command::Users(command) => run_users(&mut ws, command),
    }
}

fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let level = match cli.log_level {
        LogLevelArg::Error => Level::ERROR,
        LogLevelArg::Warn => Level::WARN,
        LogLevelArg::Info => Level::INFO,
        LogLevelArg::Debug => Level::DEBUG,
        LogLevelArg::Trace => Level::TRACE,
    };
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    let mut config = LogConfig::default()
        .with_level(level)
        .with_format(format)
        .with_log_file(cli.log_file.clone());
    config.with_ansi = cli.log_file.is_none() && io::stderr().is_terminal();
    config
}
