use anchor_lang::prelude::error_code;

#[error_code]
pub enum RaffleError {
    #[msg("Payment is below the entrance fee")]
    InsufficientPayment,
    #[msg("Raffle is not accepting entries")]
    RaffleNotOpen,
    #[msg("Player limit for this round has been reached")]
    RaffleFull,
    #[msg("Settlement conditions are not met")]
    UpkeepNotNeeded,
    #[msg("Randomness account is not owned by the Switchboard program")]
    Unauthorized,
    #[msg("Randomness account does not match the pending settlement")]
    UnknownRequest,
    #[msg("Randomness account data could not be parsed")]
    InvalidRandomnessAccount,
    #[msg("Randomness was already revealed when committed")]
    RandomnessAlreadyRevealed,
    #[msg("Randomness has not been revealed yet")]
    RandomnessNotResolved,
    #[msg("Winner account does not match the drawn player")]
    WinnerMismatch,
    #[msg("Prize transfer to the winner failed")]
    PayoutFailed,
    #[msg("Entrance fee must be greater than 0")]
    InvalidEntranceFee,
    #[msg("Interval must be greater than 0")]
    InvalidInterval,
    #[msg("Invalid calculation")]
    Overflow,
}
