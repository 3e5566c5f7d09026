//! # Init and Info Subcommands
//!
//! `cash init` writes a fresh state file from the resolved configuration.
//! `cash info` prints the fixed parameters and current supply.

use anyhow::{bail, Result};
use clap::Args;

use cash_core::{format_units, SystemClock};

use crate::state::StateFile;
use crate::CliContext;

/// Arguments for `cash init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing state file.
    #[arg(long)]
    pub force: bool,
}

/// Create the state file.
pub fn run_init(args: &InitArgs, ctx: &CliContext) -> Result<u8> {
    if ctx.state_path.exists() && !args.force {
        bail!(
            "state file already exists: {} (use --force to overwrite)",
            ctx.state_path.display()
        );
    }
    let config = ctx.resolve_config()?;
    let state = StateFile::new(config)?;
    state.save(&ctx.state_path)?;

    println!(
        "OK: initialized {} ({}) at {}",
        state.ledger.metadata.name,
        state.ledger.metadata.symbol,
        ctx.state_path.display()
    );
    println!(
        "external nullifier hash: {:#x}",
        state.ledger.external_nullifier_hash
    );
    Ok(0)
}

/// Print ledger parameters and supply.
pub fn run_info(ctx: &CliContext) -> Result<u8> {
    let gate = StateFile::load(&ctx.state_path)?.into_gate(SystemClock)?;
    let ledger = gate.ledger();
    let config = gate.config();

    println!("name:                    {}", ledger.name());
    println!("symbol:                  {}", ledger.symbol());
    println!("decimals:                {}", ledger.decimals());
    println!(
        "total supply:            {} {}",
        format_units(ledger.total_supply(), ledger.decimals()),
        ledger.symbol()
    );
    println!("holders:                 {}", ledger.balances().count());
    println!("claimants:               {}", gate.registry().len());
    println!("app id:                  {}", config.app_id);
    println!("action:                  {}", config.action);
    println!("group id:                {}", gate.group_id());
    println!("external nullifier hash: {:#x}", gate.external_nullifier_hash());
    println!("wait period:             {}s", gate.wait_period_secs());
    println!(
        "claim amount:            {} {}",
        format_units(gate.claim_amount(), ledger.decimals()),
        ledger.symbol()
    );
    Ok(0)
}
