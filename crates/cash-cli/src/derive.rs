//! # Derive Subcommand
//!
//! Prints the public signals a prover needs: the external nullifier hash
//! for an application and action, and the signal hash for an account.
//! Works without a state file.

use anyhow::Result;
use clap::{Args, Subcommand};

use cash_core::AccountId;
use cash_zkp::{external_nullifier_hash, signal_hash};

use crate::{parse_account, CliContext};

/// Arguments for `cash derive`.
#[derive(Args, Debug)]
pub struct DeriveArgs {
    #[command(subcommand)]
    pub command: DeriveCommand,
}

/// Derivation targets.
#[derive(Subcommand, Debug)]
pub enum DeriveCommand {
    /// External nullifier hash for an application id and action.
    ExternalNullifier {
        /// Application id. Defaults to the configured one.
        #[arg(long)]
        app_id: Option<String>,
        /// Action label. Defaults to the configured one.
        #[arg(long)]
        action: Option<String>,
    },

    /// Signal hash binding a proof to an account.
    Signal {
        /// Account that will receive the issuance.
        #[arg(value_parser = parse_account)]
        account: AccountId,
    },
}

/// Execute the derive subcommand.
pub fn run_derive(args: &DeriveArgs, ctx: &CliContext) -> Result<u8> {
    match &args.command {
        DeriveCommand::ExternalNullifier { app_id, action } => {
            let (app_id, action) = match (app_id, action) {
                (Some(app_id), Some(action)) => (app_id.clone(), action.clone()),
                _ => {
                    let config = ctx.resolve_config()?;
                    (
                        app_id.clone().unwrap_or(config.app_id),
                        action.clone().unwrap_or(config.action),
                    )
                }
            };
            println!("{:#x}", external_nullifier_hash(&app_id, &action));
        }
        DeriveCommand::Signal { account } => {
            println!("{:#x}", signal_hash(account));
        }
    }
    Ok(0)
}
