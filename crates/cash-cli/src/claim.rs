//! # Claim and Dev-Proof Subcommands
//!
//! `cash claim` runs a claim against the development verifier whose spent
//! nullifiers live in the state file. `cash dev-proof` prints the proof
//! that verifier accepts for an account, root, and nullifier hash.
//!
//! The development verifier has no soundness: anyone can produce its
//! proofs. These commands exist for local exercise of the claim sequence.

use anyhow::{Context, Result};
use clap::Args;

use cash_core::{format_units, AccountId, Clock, ManualClock, SystemClock, Timestamp, U256};
use cash_ledger::{ClaimError, ProofMaterial};
use cash_zkp::{signal_hash, MockVerifier, Proof, VerificationRequest};

use crate::state::StateFile;
use crate::{parse_account, parse_proof, parse_u256, CliContext};

/// Arguments for `cash claim`.
#[derive(Args, Debug)]
pub struct ClaimArgs {
    /// Claimant and recipient.
    #[arg(long, value_parser = parse_account)]
    pub account: AccountId,
    /// Identity group Merkle root.
    #[arg(long, value_parser = parse_u256)]
    pub root: U256,
    /// Nullifier hash for this claimant and action.
    #[arg(long, value_parser = parse_u256)]
    pub nullifier_hash: U256,
    /// Eight comma-separated proof elements.
    #[arg(long, value_parser = parse_proof)]
    pub proof: Proof,
    /// Claim as of this Unix time instead of the system clock.
    #[arg(long, value_name = "UNIX_SECS")]
    pub now: Option<i64>,
}

/// Arguments for `cash dev-proof`.
#[derive(Args, Debug)]
pub struct DevProofArgs {
    #[arg(long, value_parser = parse_account)]
    pub account: AccountId,
    #[arg(long, value_parser = parse_u256)]
    pub root: U256,
    #[arg(long, value_parser = parse_u256)]
    pub nullifier_hash: U256,
}

/// Print a development proof.
pub fn run_dev_proof(args: &DevProofArgs, ctx: &CliContext) -> Result<u8> {
    let state = StateFile::load(&ctx.state_path)?;
    println!(
        "{}",
        dev_proof(&state, &args.account, args.root, args.nullifier_hash)
    );
    Ok(0)
}

/// The proof the development verifier accepts for these inputs under the
/// state's group and external nullifier.
pub fn dev_proof(state: &StateFile, account: &AccountId, root: U256, nullifier_hash: U256) -> Proof {
    MockVerifier::prove(&VerificationRequest {
        root,
        group_id: state.ledger.config.group_id,
        signal_hash: signal_hash(account),
        nullifier_hash,
        external_nullifier_hash: state.ledger.external_nullifier_hash,
    })
}

/// Execute a claim.
pub fn run_claim(args: &ClaimArgs, ctx: &CliContext) -> Result<u8> {
    let state = StateFile::load(&ctx.state_path)?;
    match args.now {
        Some(secs) => {
            let start = Timestamp::from_unix(secs).context("invalid --now")?;
            claim_with(state, ManualClock::new(start), args, ctx)
        }
        None => claim_with(state, SystemClock, args, ctx),
    }
}

fn claim_with<C: Clock>(state: StateFile, clock: C, args: &ClaimArgs, ctx: &CliContext) -> Result<u8> {
    let mut gate = state.into_gate(clock)?;
    let material = ProofMaterial {
        root: args.root,
        nullifier_hash: args.nullifier_hash,
        proof: args.proof,
    };

    match gate.claim(args.account, &material) {
        Ok(amount) => {
            StateFile::capture(&gate).save(&ctx.state_path)?;
            let ledger = gate.ledger();
            println!(
                "OK: issued {} {} to {}",
                format_units(amount, ledger.decimals()),
                ledger.symbol(),
                args.account
            );
            if let Some(next) = gate.next_eligible_at(&args.account) {
                println!("next claim from {next}");
            }
            Ok(0)
        }
        Err(err) if err.is_recoverable() => {
            println!("FAIL: {err}");
            if let ClaimError::NotReady { .. } = err {
                if let Some(next) = gate.next_eligible_at(&args.account) {
                    println!("next claim from {next}");
                }
            }
            Ok(1)
        }
        Err(err) => Err(anyhow::Error::new(err).context("issuance invariant violated")),
    }
}
