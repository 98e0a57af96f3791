use anchor_lang::prelude::*;
use switchboard_on_demand::accounts::RandomnessAccountData;

use crate::constants::{RAFFLE_SEED, SWITCHBOARD_PROGRAM};
use crate::error::RaffleError;
use crate::state::{Raffle, RaffleState};
use crate::utils::first_random_word;

/// Event emitted when a round has been settled and paid out.
#[event]
pub struct WinnerPicked {
    /// The winning entrant.
    pub winner: Pubkey,
    /// Lamports paid out, equal to the round's collected entry payments.
    pub prize: u64,
}

/// Accounts required to settle a round.
///
/// Ensures:
/// 1. The presented randomness account is exactly the pending commitment.
/// 2. The account is Switchboard-owned and its value has been revealed.
/// 3. The presented winner wallet matches the drawn entrant.
#[derive(Accounts)]
pub struct SettleRaffle<'info> {
    /// The account paying transaction fees. Settlement is permissionless.
    #[account(mut)]
    pub payer: Signer<'info>,

    /// The raffle state account; holds the pooled lamports.
    #[account(
        mut,
        seeds = [RAFFLE_SEED],
        bump = raffle.bump,
    )]
    pub raffle: Account<'info, Raffle>,

    /// The randomness account committed by `perform_upkeep`.
    /// CHECK: owner, pending-commitment match, and reveal state are
    /// validated in the handler.
    pub randomness_account_data: UncheckedAccount<'info>,

    /// Wallet of the drawn winner. The caller derives the winner off-chain
    /// from the revealed value and must present the matching account.
    /// CHECK: verified against the entrant selected by the random word.
    #[account(mut)]
    pub winner: UncheckedAccount<'info>,
}

/// Consumes the revealed randomness exactly once: picks the winner, pays
/// out the whole pot, and reopens the raffle with a fresh round.
///
/// A failed payout aborts the instruction, so the raffle stays in
/// `Calculating` with the same commitment pending and the funds held; the
/// reveal can be retried without a second draw.
pub fn process_settle_raffle(ctx: Context<SettleRaffle>) -> Result<()> {
    let clock = Clock::get()?;
    let raffle = &mut ctx.accounts.raffle;

    // Reject stale or foreign reveals before touching the account data.
    require!(
        raffle.state == RaffleState::Calculating
            && ctx.accounts.randomness_account_data.key() == raffle.pending_randomness,
        RaffleError::UnknownRequest
    );

    require_keys_eq!(
        *ctx.accounts.randomness_account_data.owner,
        SWITCHBOARD_PROGRAM,
        RaffleError::Unauthorized
    );

    let randomness_data =
        RandomnessAccountData::parse(ctx.accounts.randomness_account_data.data.borrow())
            .map_err(|_| RaffleError::InvalidRandomnessAccount)?;
    let revealed = randomness_data
        .get_value(&clock)
        .map_err(|_| RaffleError::RandomnessNotResolved)?;

    let word = first_random_word(&revealed);
    msg!("Randomness result: {}", word);

    let (winner, prize) = raffle.finalize(
        ctx.accounts.randomness_account_data.key(),
        word,
        clock.unix_timestamp,
    )?;

    require_keys_eq!(
        ctx.accounts.winner.key(),
        winner,
        RaffleError::WinnerMismatch
    );

    // Pay out of the tracked pot only; the PDA's rent reserve stays put.
    let raffle_info = raffle.to_account_info();
    let winner_info = ctx.accounts.winner.to_account_info();
    let raffle_lamports = raffle_info.lamports();
    let winner_lamports = winner_info.lamports();
    **raffle_info.try_borrow_mut_lamports()? = raffle_lamports
        .checked_sub(prize)
        .ok_or(RaffleError::PayoutFailed)?;
    **winner_info.try_borrow_mut_lamports()? = winner_lamports
        .checked_add(prize)
        .ok_or(RaffleError::PayoutFailed)?;

    msg!("Winner: {}", winner);
    msg!("Prize: {} lamports", prize);

    emit!(WinnerPicked { winner, prize });

    Ok(())
}
