use anchor_lang::prelude::*;

use crate::constants::MAX_PLAYERS;
use crate::error::RaffleError;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug, InitSpace)]
pub enum RaffleState {
    /// Accepting entries.
    Open,
    /// A draw is in flight; entries are rejected until it settles.
    Calculating,
}

#[account]
#[derive(InitSpace)]
pub struct Raffle {
    /// The bump seed used for deriving the PDA address of this account.
    pub bump: u8,

    /// Lamports required to join a round. Fixed at initialization.
    pub entrance_fee: u64,

    /// Minimum seconds between settlements. Fixed at initialization.
    pub interval: i64,

    /// Unix timestamp of the last completed settlement, or of
    /// initialization before any round has settled.
    pub last_timestamp: i64,

    /// Whether the raffle is open or mid-settlement.
    pub state: RaffleState,

    /// The randomness account committed for the in-flight draw.
    /// `Pubkey::default()` whenever no draw is pending.
    pub pending_randomness: Pubkey,

    /// Winner of the most recently completed round.
    pub recent_winner: Option<Pubkey>,

    /// Sum of all entry payments collected this round, in lamports.
    /// The lamports themselves sit on this account, on top of its
    /// rent-exempt reserve.
    pub pot: u64,

    /// Entrants of the current round, in entry order.
    #[max_len(MAX_PLAYERS)]
    pub players: Vec<Pubkey>,
}

impl Raffle {
    pub fn player_count(&self) -> u64 {
        self.players.len() as u64
    }

    pub fn player(&self, index: usize) -> Option<&Pubkey> {
        self.players.get(index)
    }

    /// True when a settlement is due: the raffle is open, the interval has
    /// elapsed since the last settlement, and the round has both funds and
    /// entrants.
    pub fn upkeep_needed(&self, now: i64) -> bool {
        self.state == RaffleState::Open
            && now.saturating_sub(self.last_timestamp) >= self.interval
            && self.pot > 0
            && !self.players.is_empty()
    }

    /// Records an entry for `player` paying `amount` lamports.
    pub fn record_entry(&mut self, player: Pubkey, amount: u64) -> Result<()> {
        require!(amount >= self.entrance_fee, RaffleError::InsufficientPayment);
        require!(self.state == RaffleState::Open, RaffleError::RaffleNotOpen);
        require!(self.players.len() < MAX_PLAYERS, RaffleError::RaffleFull);

        self.pot = self.pot.checked_add(amount).ok_or(RaffleError::Overflow)?;
        self.players.push(player);

        Ok(())
    }

    /// Moves the raffle into `Calculating` and records the randomness
    /// account whose reveal will decide this round. The settlement
    /// conditions are re-checked here regardless of what the caller
    /// observed through `upkeep_needed`.
    pub fn begin_settlement(&mut self, randomness_account: Pubkey, now: i64) -> Result<()> {
        require!(self.upkeep_needed(now), RaffleError::UpkeepNotNeeded);

        self.state = RaffleState::Calculating;
        self.pending_randomness = randomness_account;

        Ok(())
    }

    /// Consumes the random word revealed by the committed randomness
    /// account: picks the winner, resets the round, and returns the winner
    /// with the prize amount to pay out. A reveal presented for any other
    /// account, or while no draw is pending, is rejected without touching
    /// state.
    pub fn finalize(
        &mut self,
        randomness_account: Pubkey,
        word: u64,
        now: i64,
    ) -> Result<(Pubkey, u64)> {
        require!(
            self.state == RaffleState::Calculating,
            RaffleError::UnknownRequest
        );
        require!(
            randomness_account == self.pending_randomness,
            RaffleError::UnknownRequest
        );

        // Plain modulo keeps a slight bias toward low indices when the
        // player count does not divide 2^64. Against a 64-bit word and
        // realistic pool sizes the skew is immaterial, and the selection
        // stays deterministic in the revealed value.
        let index = word
            .checked_rem(self.player_count())
            .ok_or(RaffleError::Overflow)?;
        let winner = self.players[index as usize];
        let prize = self.pot;

        self.recent_winner = Some(winner);
        self.players.clear();
        self.pot = 0;
        self.pending_randomness = Pubkey::default();
        self.state = RaffleState::Open;
        self.last_timestamp = now;

        Ok((winner, prize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEE: u64 = 10;
    const INTERVAL: i64 = 60;
    const START: i64 = 1_000;

    fn open_raffle() -> Raffle {
        Raffle {
            bump: 254,
            entrance_fee: FEE,
            interval: INTERVAL,
            last_timestamp: START,
            state: RaffleState::Open,
            pending_randomness: Pubkey::default(),
            recent_winner: None,
            pot: 0,
            players: Vec::new(),
        }
    }

    #[test]
    fn entry_records_player_and_payment() {
        let mut raffle = open_raffle();
        let player = Pubkey::new_unique();

        raffle.record_entry(player, FEE).unwrap();
        assert_eq!(raffle.player_count(), 1);
        assert_eq!(raffle.player(0), Some(&player));
        assert_eq!(raffle.pot, FEE);

        // Overpaying is allowed; the pot grows by the full payment.
        let second = Pubkey::new_unique();
        raffle.record_entry(second, FEE + 5).unwrap();
        assert_eq!(raffle.player_count(), 2);
        assert_eq!(raffle.pot, 2 * FEE + 5);
    }

    #[test]
    fn entry_rejects_underpayment() {
        let mut raffle = open_raffle();

        let err = raffle
            .record_entry(Pubkey::new_unique(), FEE - 1)
            .unwrap_err();
        assert_eq!(err, RaffleError::InsufficientPayment.into());
        assert_eq!(raffle.player_count(), 0);
        assert_eq!(raffle.pot, 0);
    }

    #[test]
    fn entry_rejected_while_calculating() {
        let mut raffle = open_raffle();
        raffle.record_entry(Pubkey::new_unique(), FEE).unwrap();
        raffle
            .begin_settlement(Pubkey::new_unique(), START + INTERVAL)
            .unwrap();

        let err = raffle.record_entry(Pubkey::new_unique(), FEE).unwrap_err();
        assert_eq!(err, RaffleError::RaffleNotOpen.into());
        assert_eq!(raffle.player_count(), 1);
        assert_eq!(raffle.pot, FEE);
    }

    #[test]
    fn entry_rejected_when_round_is_full() {
        let mut raffle = open_raffle();
        for _ in 0..MAX_PLAYERS {
            raffle.record_entry(Pubkey::new_unique(), FEE).unwrap();
        }

        let err = raffle.record_entry(Pubkey::new_unique(), FEE).unwrap_err();
        assert_eq!(err, RaffleError::RaffleFull.into());
        assert_eq!(raffle.player_count(), MAX_PLAYERS as u64);
    }

    #[test]
    fn upkeep_needed_only_when_all_conditions_hold() {
        for is_open in [false, true] {
            for time_passed in [false, true] {
                for has_funds in [false, true] {
                    for has_players in [false, true] {
                        let mut raffle = open_raffle();
                        if !is_open {
                            raffle.state = RaffleState::Calculating;
                        }
                        if has_funds {
                            raffle.pot = 3 * FEE;
                        }
                        if has_players {
                            raffle.players.push(Pubkey::new_unique());
                        }
                        // The interval boundary itself counts as elapsed.
                        let now = if time_passed {
                            START + INTERVAL
                        } else {
                            START + INTERVAL - 5
                        };

                        assert_eq!(
                            raffle.upkeep_needed(now),
                            is_open && time_passed && has_funds && has_players,
                            "open={is_open} elapsed={time_passed} funds={has_funds} players={has_players}",
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn settlement_commits_randomness_account() {
        let mut raffle = open_raffle();
        raffle.record_entry(Pubkey::new_unique(), FEE).unwrap();

        let randomness = Pubkey::new_unique();
        raffle
            .begin_settlement(randomness, START + INTERVAL + 1)
            .unwrap();

        assert_eq!(raffle.state, RaffleState::Calculating);
        assert_eq!(raffle.pending_randomness, randomness);
    }

    #[test]
    fn settlement_rejected_before_interval() {
        let mut raffle = open_raffle();
        raffle.record_entry(Pubkey::new_unique(), FEE).unwrap();

        let err = raffle
            .begin_settlement(Pubkey::new_unique(), START + INTERVAL - 1)
            .unwrap_err();
        assert_eq!(err, RaffleError::UpkeepNotNeeded.into());
        assert_eq!(raffle.state, RaffleState::Open);
        assert_eq!(raffle.pending_randomness, Pubkey::default());
    }

    #[test]
    fn second_settlement_rejected_while_calculating() {
        let mut raffle = open_raffle();
        raffle.record_entry(Pubkey::new_unique(), FEE).unwrap();

        let committed = Pubkey::new_unique();
        let now = START + INTERVAL;
        raffle.begin_settlement(committed, now).unwrap();

        let err = raffle
            .begin_settlement(Pubkey::new_unique(), now + 1)
            .unwrap_err();
        assert_eq!(err, RaffleError::UpkeepNotNeeded.into());
        assert_eq!(raffle.pending_randomness, committed);
    }

    #[test]
    fn reveal_without_pending_draw_is_rejected() {
        let mut raffle = open_raffle();
        raffle.record_entry(Pubkey::new_unique(), FEE).unwrap();

        let err = raffle
            .finalize(Pubkey::new_unique(), 7, START + INTERVAL)
            .unwrap_err();
        assert_eq!(err, RaffleError::UnknownRequest.into());
        assert_eq!(raffle.state, RaffleState::Open);
        assert_eq!(raffle.player_count(), 1);
        assert_eq!(raffle.pot, FEE);
    }

    #[test]
    fn reveal_for_wrong_account_leaves_state_untouched() {
        let mut raffle = open_raffle();
        let player = Pubkey::new_unique();
        raffle.record_entry(player, FEE).unwrap();

        let committed = Pubkey::new_unique();
        raffle.begin_settlement(committed, START + INTERVAL).unwrap();

        let err = raffle
            .finalize(Pubkey::new_unique(), 7, START + INTERVAL + 5)
            .unwrap_err();
        assert_eq!(err, RaffleError::UnknownRequest.into());
        assert_eq!(raffle.state, RaffleState::Calculating);
        assert_eq!(raffle.pending_randomness, committed);
        assert_eq!(raffle.player(0), Some(&player));
        assert_eq!(raffle.pot, FEE);
        assert_eq!(raffle.recent_winner, None);
    }

    #[test]
    fn full_round_pays_the_drawn_player_and_resets() {
        let mut raffle = open_raffle();
        let players: Vec<Pubkey> = (0..4).map(|_| Pubkey::new_unique()).collect();
        for player in &players {
            raffle.record_entry(*player, FEE).unwrap();
        }
        assert_eq!(raffle.pot, 40);

        let randomness = Pubkey::new_unique();
        let settle_time = START + INTERVAL + 2;
        raffle.begin_settlement(randomness, settle_time).unwrap();

        // 6 % 4 == 2: the third entrant wins.
        let (winner, prize) = raffle.finalize(randomness, 6, settle_time).unwrap();
        assert_eq!(winner, players[2]);
        assert_eq!(prize, 40);

        assert_eq!(raffle.recent_winner, Some(players[2]));
        assert!(raffle.players.is_empty());
        assert_eq!(raffle.pot, 0);
        assert_eq!(raffle.state, RaffleState::Open);
        assert_eq!(raffle.pending_randomness, Pubkey::default());
        assert_eq!(raffle.last_timestamp, settle_time);
    }

    #[test]
    fn winner_index_wraps_modulo_player_count() {
        let mut raffle = open_raffle();
        let players: Vec<Pubkey> = (0..4).map(|_| Pubkey::new_unique()).collect();
        for player in &players {
            raffle.record_entry(*player, FEE).unwrap();
        }

        let randomness = Pubkey::new_unique();
        raffle
            .begin_settlement(randomness, START + INTERVAL)
            .unwrap();

        // u64::MAX % 4 == 3: the last entrant wins.
        let (winner, _) = raffle
            .finalize(randomness, u64::MAX, START + INTERVAL)
            .unwrap();
        assert_eq!(winner, players[3]);
    }

    #[test]
    fn settled_raffle_accepts_a_fresh_round() {
        let mut raffle = open_raffle();
        for _ in 0..4 {
            raffle.record_entry(Pubkey::new_unique(), FEE).unwrap();
        }

        let randomness = Pubkey::new_unique();
        let settle_time = START + INTERVAL;
        raffle.begin_settlement(randomness, settle_time).unwrap();
        raffle.finalize(randomness, 1, settle_time).unwrap();

        // The new round behaves exactly like a fresh raffle: entries are
        // accepted and the interval counts from the settlement.
        let returning = Pubkey::new_unique();
        raffle.record_entry(returning, FEE).unwrap();
        assert_eq!(raffle.player_count(), 1);
        assert_eq!(raffle.pot, FEE);
        assert!(!raffle.upkeep_needed(settle_time + INTERVAL - 1));
        assert!(raffle.upkeep_needed(settle_time + INTERVAL));

        let next_randomness = Pubkey::new_unique();
        let next_settle = settle_time + INTERVAL;
        raffle
            .begin_settlement(next_randomness, next_settle)
            .unwrap();
        let (winner, prize) = raffle.finalize(next_randomness, 0, next_settle).unwrap();
        assert_eq!(winner, returning);
        assert_eq!(prize, FEE);
        assert_eq!(raffle.recent_winner, Some(returning));
    }
}
