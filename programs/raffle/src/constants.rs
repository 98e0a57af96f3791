use anchor_lang::prelude::*;

/// Seed for deriving the singleton raffle PDA.
pub const RAFFLE_SEED: &[u8] = b"raffle";

/// Maximum entrants per round. The raffle account is allocated for this
/// many players at initialization.
pub const MAX_PLAYERS: usize = 128;

/// The Switchboard On-Demand program. Only randomness accounts owned by
/// this program are accepted as a randomness source.
pub const SWITCHBOARD_PROGRAM: Pubkey =
    solana_program::pubkey!("SBondMDrcV3K4kxZR1HNVT7osZxAHVHgYXL5Ze1oMUv");
