//! Invaders CLI - run and inspect a conquest game.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Invaders - conquest game adjudication engine
#[derive(Parser, Debug)]
#[command(name = "invaders")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Poll the store and adjudicate actions
    Run {
        /// Game configuration file
        #[arg(short, long)]
        config: PathBuf,

        /// Seconds between cycles (default: from the configuration)
        #[arg(short, long)]
        interval: Option<u64>,

        /// Stop after this many cycles (default: run forever)
        #[arg(short = 'n', long)]
        cycles: Option<u64>,
    },

    /// Check a configuration file and print a summary
    Validate {
        /// Game configuration file
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Run one cycle on a copy of the store and print the result
    Show {
        /// Game configuration file
        #[arg(short, long)]
        config: PathBuf,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::ShowFormat,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "invaders=info".into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let result = match args.command {
        Commands::Run {
            config,
            interval,
            cycles,
        } => cli::run::execute(&config, interval, cycles),
        Commands::Validate { config } => cli::validate::execute(&config),
        Commands::Show { config, format } => cli::show::execute(&config, format),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
