//! Quill CLI — the command-line interface for the Quill build orchestrator.
//!
//! Provides `quill build` for driving an incremental `quillc` compilation
//! and `quill clean` for purging outputs and local build state.

#![warn(missing_docs)]

mod build;
mod clean;
mod pipeline;

use std::process;

use clap::{Args, Parser, Subcommand};

/// Quill — an incremental build orchestrator for `quillc`.
#[derive(Parser, Debug)]
#[command(name = "quill", version, about = "Quill build orchestrator")]
pub struct Cli {
    /// Global options shared by all commands.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by all commands.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `quill.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile the current project.
    Build(BuildArgs),
    /// Remove build outputs and local build state.
    Clean,
}

/// Arguments for the `quill build` subcommand.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Discard incremental state and force a full rebuild.
    #[arg(long)]
    pub rebuild: bool,

    /// Disable incremental compilation for this invocation.
    #[arg(long)]
    pub no_incremental: bool,
}

fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        Command::Build(args) => build::run(args, &cli.global),
        Command::Clean => clean::run(&cli.global),
    };

    let code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            1
        }
    };
    process::exit(code);
}
