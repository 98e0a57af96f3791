use anchor_lang::prelude::*;
use anchor_lang::system_program;

use crate::constants::RAFFLE_SEED;
use crate::state::Raffle;

/// Event emitted when a player joins the current round.
#[event]
pub struct RaffleEntered {
    /// The entrant's address.
    pub player: Pubkey,
    /// Amount paid in lamports.
    pub amount: u64,
}

/// Accounts required to enter the raffle.
#[derive(Accounts)]
pub struct EnterRaffle<'info> {
    /// The entrant; pays the entrance fee.
    #[account(mut)]
    pub player: Signer<'info>,

    /// The raffle state account; also holds the pooled lamports.
    #[account(
        mut,
        seeds = [RAFFLE_SEED],
        bump = raffle.bump,
    )]
    pub raffle: Account<'info, Raffle>,

    /// System program for the lamports transfer.
    pub system_program: Program<'info, System>,
}

/// Enters the signer into the current round for `amount` lamports.
///
/// The payment must be at least the entrance fee and the raffle must be
/// open. The raffle state is updated before the transfer is invoked.
pub fn process_enter_raffle(ctx: Context<EnterRaffle>, amount: u64) -> Result<()> {
    let raffle = &mut ctx.accounts.raffle;
    raffle.record_entry(ctx.accounts.player.key(), amount)?;

    system_program::transfer(
        CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            system_program::Transfer {
                from: ctx.accounts.player.to_account_info(),
                to: raffle.to_account_info(),
            },
        ),
        amount,
    )?;

    emit!(RaffleEntered {
        player: ctx.accounts.player.key(),
        amount,
    });

    Ok(())
}
