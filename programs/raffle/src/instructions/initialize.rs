use anchor_lang::prelude::*;

use crate::constants::RAFFLE_SEED;
use crate::error::RaffleError;
use crate::state::{Raffle, RaffleState};

/// Accounts required to create the raffle.
///
/// The raffle account is a singleton PDA; `init` makes creation a one-time
/// operation for the deployment.
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// The account paying for the raffle account's rent.
    #[account(mut)]
    pub payer: Signer<'info>,

    /// The raffle state account, sized for a full round of players.
    #[account(
        init,
        payer = payer,
        space = 8 + Raffle::INIT_SPACE,
        seeds = [RAFFLE_SEED],
        bump
    )]
    pub raffle: Box<Account<'info, Raffle>>,

    /// System program to create accounts.
    pub system_program: Program<'info, System>,
}

/// Creates the raffle with its two immutable parameters: the entrance fee
/// in lamports and the minimum number of seconds between settlements.
pub fn process_initialize(
    ctx: Context<Initialize>,
    entrance_fee: u64,
    interval: i64,
) -> Result<()> {
    require!(entrance_fee > 0, RaffleError::InvalidEntranceFee);
    require!(interval > 0, RaffleError::InvalidInterval);

    let clock = Clock::get()?;
    let raffle = &mut ctx.accounts.raffle;
    raffle.bump = ctx.bumps.raffle;
    raffle.entrance_fee = entrance_fee;
    raffle.interval = interval;
    raffle.last_timestamp = clock.unix_timestamp;
    raffle.state = RaffleState::Open;
    raffle.pending_randomness = Pubkey::default();
    raffle.recent_winner = None;
    raffle.pot = 0;
    raffle.players = Vec::new();

    Ok(())
}
