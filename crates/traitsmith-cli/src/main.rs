// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! traitsmith command-line interface.
//!
//! This is the main entry point for the `traitsmith` command. It reads a
//! JSON reflection model of one round (traits and hosts), generates the
//! Java sources and reports diagnostics.

use camino::Utf8PathBuf;
use clap::{ArgAction, Parser, Subcommand};
use miette::Result;
use tracing_subscriber::EnvFilter;

mod commands;
mod diagnostic;
mod filer;

/// traitsmith: trait composition for Java by code generation
#[derive(Debug, Parser)]
#[command(name = "traitsmith")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v: debug, -vv+: trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate interfaces, delegates and host superclasses
    Generate {
        /// Reflection model of the round (JSON)
        input: Utf8PathBuf,

        /// Output root; files land in `<out>/<package path>/<Name>.java`
        /// (default: `generated/` next to the input)
        #[arg(long)]
        out: Option<Utf8PathBuf>,

        /// Generator options (default: `traitsmith.toml` next to the input)
        #[arg(long)]
        config: Option<Utf8PathBuf>,
    },

    /// Resolve and generate in memory, reporting diagnostics only
    Check {
        /// Reflection model of the round (JSON)
        input: Utf8PathBuf,

        /// Generator options (default: `traitsmith.toml` next to the input)
        #[arg(long)]
        config: Option<Utf8PathBuf>,
    },
}

fn main() -> Result<()> {
    // Install miette's fancy error handler
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))?;

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(directive_for_verbosity(cli.verbose))),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Command::Generate { input, out, config } => {
            commands::generate::generate(&input, out.as_deref(), config.as_deref())
        }
        Command::Check { input, config } => commands::check::check(&input, config.as_deref()),
    };

    // Exit with appropriate code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("{e:?}");
            std::process::exit(1);
        }
    }
}

fn directive_for_verbosity(v: u8) -> &'static str {
    // Targets are crate module paths, so both crates are listed.
    match v {
        0 => "traitsmith_cli=info,traitsmith_core=info",
        1 => "traitsmith_cli=debug,traitsmith_core=debug",
        _ => "traitsmith_cli=trace,traitsmith_core=trace",
    }
}
