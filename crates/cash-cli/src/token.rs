//! # Token Subcommands
//!
//! Balance and allowance queries plus `transfer`, `approve`, and
//! `transfer-from`. Amounts are token units on input and output. A
//! mutation is persisted only when the ledger accepts it.

use anyhow::Result;
use clap::Args;

use cash_core::{format_units, AccountId, SystemClock, U256};
use cash_ledger::{BalanceLedger, LedgerError};

use crate::state::StateFile;
use crate::{parse_account, parse_allowance, parse_amount, CliContext};

/// Arguments for `cash balance`.
#[derive(Args, Debug)]
pub struct BalanceArgs {
    #[arg(value_parser = parse_account)]
    pub account: AccountId,
}

/// Arguments for `cash allowance`.
#[derive(Args, Debug)]
pub struct AllowanceArgs {
    #[arg(value_parser = parse_account)]
    pub owner: AccountId,
    #[arg(value_parser = parse_account)]
    pub spender: AccountId,
}

/// Arguments for `cash transfer`.
#[derive(Args, Debug)]
pub struct TransferArgs {
    /// Account being debited.
    #[arg(long, value_parser = parse_account)]
    pub from: AccountId,
    /// Account being credited.
    #[arg(long, value_parser = parse_account)]
    pub to: AccountId,
    /// Amount in token units (e.g. `0.5`).
    #[arg(long, value_parser = parse_amount)]
    pub amount: U256,
}

/// Arguments for `cash approve`.
#[derive(Args, Debug)]
pub struct ApproveArgs {
    /// Account granting the allowance.
    #[arg(long, value_parser = parse_account)]
    pub owner: AccountId,
    /// Account allowed to spend.
    #[arg(long, value_parser = parse_account)]
    pub spender: AccountId,
    /// Allowance in token units, or `max` for unlimited.
    #[arg(long, value_parser = parse_allowance)]
    pub amount: U256,
}

/// Arguments for `cash transfer-from`.
#[derive(Args, Debug)]
pub struct TransferFromArgs {
    /// Account spending the allowance.
    #[arg(long, value_parser = parse_account)]
    pub spender: AccountId,
    /// Account being debited.
    #[arg(long, value_parser = parse_account)]
    pub from: AccountId,
    /// Account being credited.
    #[arg(long, value_parser = parse_account)]
    pub to: AccountId,
    /// Amount in token units.
    #[arg(long, value_parser = parse_amount)]
    pub amount: U256,
}

fn display(ledger: &BalanceLedger, amount: U256) -> String {
    if amount == U256::MAX {
        return "unlimited".to_string();
    }
    format!("{} {}", format_units(amount, ledger.decimals()), ledger.symbol())
}

/// Print an account's balance.
pub fn run_balance(args: &BalanceArgs, ctx: &CliContext) -> Result<u8> {
    let gate = StateFile::load(&ctx.state_path)?.into_gate(SystemClock)?;
    let ledger = gate.ledger();
    println!("{}: {}", args.account, display(ledger, ledger.balance_of(&args.account)));
    Ok(0)
}

/// Print an allowance.
pub fn run_allowance(args: &AllowanceArgs, ctx: &CliContext) -> Result<u8> {
    let gate = StateFile::load(&ctx.state_path)?.into_gate(SystemClock)?;
    let ledger = gate.ledger();
    println!(
        "{} -> {}: {}",
        args.owner,
        args.spender,
        display(ledger, ledger.allowance(&args.owner, &args.spender))
    );
    Ok(0)
}

/// Move tokens between accounts.
pub fn run_transfer(args: &TransferArgs, ctx: &CliContext) -> Result<u8> {
    mutate(ctx, |ledger| {
        ledger.transfer(args.from, args.to, args.amount)?;
        Ok(format!(
            "transferred {} from {} to {}",
            display(ledger, args.amount),
            args.from,
            args.to
        ))
    })
}

/// Set an allowance.
pub fn run_approve(args: &ApproveArgs, ctx: &CliContext) -> Result<u8> {
    mutate(ctx, |ledger| {
        ledger.approve(args.owner, args.spender, args.amount);
        Ok(format!(
            "{} may spend {} from {}",
            args.spender,
            display(ledger, args.amount),
            args.owner
        ))
    })
}

/// Spend an allowance.
pub fn run_transfer_from(args: &TransferFromArgs, ctx: &CliContext) -> Result<u8> {
    mutate(ctx, |ledger| {
        ledger.transfer_from(args.spender, args.from, args.to, args.amount)?;
        Ok(format!(
            "{} moved {} from {} to {}",
            args.spender,
            display(ledger, args.amount),
            args.from,
            args.to
        ))
    })
}

/// Load, apply `op`, and save only if it succeeded.
fn mutate(
    ctx: &CliContext,
    op: impl FnOnce(&mut BalanceLedger) -> Result<String, LedgerError>,
) -> Result<u8> {
    let mut gate = StateFile::load(&ctx.state_path)?.into_gate(SystemClock)?;
    match op(gate.ledger_mut()) {
        Ok(summary) => {
            StateFile::capture(&gate).save(&ctx.state_path)?;
            println!("OK: {summary}");
            Ok(0)
        }
        Err(err) => {
            println!("FAIL: {err}");
            Ok(1)
        }
    }
}
