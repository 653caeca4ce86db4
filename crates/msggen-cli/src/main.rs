//! msggen CLI - Message schema compiler
//!
//! Commands:
//! - `msggen generate` - Emit the host and embedded trees
//! - `msggen check` - Compile schemas without writing anything
//! - `msggen verify` - Compare a generated tree against its manifest
//! - `msggen addresses` - Print the allocated address table

use clap::{ArgAction, Parser, Subcommand};
use msggen_codegen::OutputError;
use msggen_core::SchemaError;
use std::path::PathBuf;
use std::process::ExitCode;

mod check;
mod generate;
mod logging;

#[derive(Parser)]
#[command(name = "msggen")]
#[command(author, version, about = "Message codec compiler for host and embedded targets", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate C++ and C sources from a message and an address schema
    Generate {
        /// Message schema
        messages: PathBuf,

        /// Address schema
        addresses: PathBuf,

        /// Output directory for the host (C++) tree
        #[arg(long)]
        host_out: PathBuf,

        /// Output directory for the embedded (C) tree
        #[arg(long)]
        embedded_out: PathBuf,

        /// Path to msggen.toml
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write into non-empty directories without a manifest
        #[arg(short, long)]
        force: bool,
    },

    /// Compile schemas and print a summary
    Check {
        /// Message schema
        messages: PathBuf,

        /// Address schema
        addresses: Option<PathBuf>,

        /// Path to msggen.toml
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Check a generated directory against its manifest checksums
    Verify {
        /// Output directory of a previous `generate`
        dir: PathBuf,
    },

    /// Print the allocated address table
    Addresses {
        /// Address schema
        addresses: PathBuf,

        /// Path to msggen.toml
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Generate {
            messages,
            addresses,
            host_out,
            embedded_out,
            config,
            force,
        } => generate::run(&generate::GenerateArgs {
            messages,
            addresses,
            host_out,
            embedded_out,
            config,
            force,
        }),
        Commands::Check {
            messages,
            addresses,
            config,
        } => check::check(&messages, addresses.as_deref(), config.as_deref()),
        Commands::Verify { dir } => check::verify(&dir),
        Commands::Addresses { addresses, config } => {
            check::addresses(&addresses, config.as_deref())
        }
    }
}

/// Library error codes become the exit status; anything else is 1.
fn exit_code(err: &anyhow::Error) -> u8 {
    if let Some(e) = err.downcast_ref::<SchemaError>() {
        return e.error_code();
    }
    if let Some(e) = err.downcast_ref::<OutputError>() {
        return e.error_code();
    }
    1
}
