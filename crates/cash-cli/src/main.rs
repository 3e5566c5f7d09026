//! # cash CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cash_cli::claim::{run_claim, run_dev_proof, ClaimArgs, DevProofArgs};
use cash_cli::derive::{run_derive, DeriveArgs};
use cash_cli::init::{run_info, run_init, InitArgs};
use cash_cli::token::{
    run_allowance, run_approve, run_balance, run_transfer, run_transfer_from, AllowanceArgs,
    ApproveArgs, BalanceArgs, TransferArgs, TransferFromArgs,
};
use cash_cli::{CliContext, DEFAULT_STATE_FILE};

/// CASH ledger CLI.
///
/// Verification-gated issuance: one claim per account per wait period,
/// each backed by an identity proof.
#[derive(Parser, Debug)]
#[command(name = "cash", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the JSON state file.
    #[arg(long, global = true, default_value = DEFAULT_STATE_FILE)]
    state: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new state file from configuration.
    Init(InitArgs),

    /// Compute external nullifier and signal hashes.
    Derive(DeriveArgs),

    /// Show token metadata, supply, and issuance parameters.
    Info,

    /// Show an account's balance.
    Balance(BalanceArgs),

    /// Show an allowance.
    Allowance(AllowanceArgs),

    /// Transfer tokens.
    Transfer(TransferArgs),

    /// Set an allowance.
    Approve(ApproveArgs),

    /// Spend an allowance.
    TransferFrom(TransferFromArgs),

    /// Produce a development proof for the mock verifier.
    DevProof(DevProofArgs),

    /// Claim the issuance amount.
    Claim(ClaimArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let ctx = CliContext {
        state_path: cli.state,
        config_path: cli.config,
    };
    tracing::debug!(state = %ctx.state_path.display(), "cash CLI starting");

    let result = match cli.command {
        Commands::Init(args) => run_init(&args, &ctx),
        Commands::Derive(args) => run_derive(&args, &ctx),
        Commands::Info => run_info(&ctx),
        Commands::Balance(args) => run_balance(&args, &ctx),
        Commands::Allowance(args) => run_allowance(&args, &ctx),
        Commands::Transfer(args) => run_transfer(&args, &ctx),
        Commands::Approve(args) => run_approve(&args, &ctx),
        Commands::TransferFrom(args) => run_transfer_from(&args, &ctx),
        Commands::DevProof(args) => run_dev_proof(&args, &ctx),
        Commands::Claim(args) => run_claim(&args, &ctx),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
