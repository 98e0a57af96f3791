use anchor_lang::prelude::*;
use switchboard_on_demand::accounts::RandomnessAccountData;

use crate::constants::{RAFFLE_SEED, SWITCHBOARD_PROGRAM};
use crate::error::RaffleError;
use crate::state::Raffle;

/// Event emitted when a settlement has been initiated and a randomness
/// account committed for the round.
#[event]
pub struct SettlementRequested {
    /// The committed Switchboard randomness account.
    pub randomness_account: Pubkey,
}

/// Accounts required to initiate a settlement.
///
/// Ensures:
/// 1. The settlement conditions actually hold at execution time.
/// 2. The randomness account is a fresh Switchboard commitment whose value
///    cannot be known yet.
#[derive(Accounts)]
pub struct PerformUpkeep<'info> {
    /// The account paying transaction fees. Upkeep is permissionless.
    #[account(mut)]
    pub payer: Signer<'info>,

    /// The raffle state account.
    #[account(
        mut,
        seeds = [RAFFLE_SEED],
        bump = raffle.bump,
    )]
    pub raffle: Account<'info, Raffle>,

    /// Randomness account from Switchboard, committed for this round.
    /// CHECK: owner and account data are validated in the handler.
    pub randomness_account_data: UncheckedAccount<'info>,
}

/// Initiates a settlement: re-checks the upkeep conditions, commits the
/// randomness account, and moves the raffle into `Calculating`. The winner
/// is not picked here; that waits for the reveal in `settle_raffle`.
pub fn process_perform_upkeep(ctx: Context<PerformUpkeep>) -> Result<()> {
    let clock = Clock::get()?;
    let raffle = &mut ctx.accounts.raffle;

    // Callers are expected to have polled check_upkeep, but the predicate
    // is never trusted from the caller; state may have changed since.
    if !raffle.upkeep_needed(clock.unix_timestamp) {
        msg!("Pot: {} lamports", raffle.pot);
        msg!("Players: {}", raffle.player_count());
        msg!("State: {:?}", raffle.state);
        return Err(RaffleError::UpkeepNotNeeded.into());
    }

    require_keys_eq!(
        *ctx.accounts.randomness_account_data.owner,
        SWITCHBOARD_PROGRAM,
        RaffleError::Unauthorized
    );

    let randomness_data =
        RandomnessAccountData::parse(ctx.accounts.randomness_account_data.data.borrow())
            .map_err(|_| RaffleError::InvalidRandomnessAccount)?;

    // A commitment is only sound while its value is still unknown: the
    // account must have been seeded at the immediately previous slot.
    if randomness_data.seed_slot != clock.slot - 1 {
        return Err(RaffleError::RandomnessAlreadyRevealed.into());
    }

    raffle.begin_settlement(
        ctx.accounts.randomness_account_data.key(),
        clock.unix_timestamp,
    )?;

    emit!(SettlementRequested {
        randomness_account: ctx.accounts.randomness_account_data.key(),
    });

    Ok(())
}
