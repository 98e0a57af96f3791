use anchor_lang::prelude::*;

use crate::constants::RAFFLE_SEED;
use crate::state::Raffle;

/// Accounts required to query whether a settlement is due.
#[derive(Accounts)]
pub struct CheckUpkeep<'info> {
    /// The raffle state account.
    #[account(
        seeds = [RAFFLE_SEED],
        bump = raffle.bump,
    )]
    pub raffle: Account<'info, Raffle>,
}

/// Read-only probe for off-chain cranks: returns true when `perform_upkeep`
/// would succeed. Never mutates state; callable by anyone, at any rate.
///
/// `_check_data` is accepted and ignored, reserved for future use.
pub fn process_check_upkeep(ctx: Context<CheckUpkeep>, _check_data: Vec<u8>) -> Result<bool> {
    let clock = Clock::get()?;
    Ok(ctx.accounts.raffle.upkeep_needed(clock.unix_timestamp))
}
