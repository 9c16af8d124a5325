// SolPot Raffle Program - Errors
use solana_program::{
    decode_error::DecodeError, msg, program_error::PrintProgramError, program_error::ProgramError,
};
use thiserror::Error;

/// Errors that may be returned by the raffle program
#[derive(Error, Debug, Copy, Clone, PartialEq)]
pub enum RaffleError {
    /// Invalid instruction data passed
    #[error("Invalid instruction data")]
    InvalidInstruction,

    /// Account is already initialized
    #[error("Account is already initialized")]
    AlreadyInitialized,

    /// Configuration value out of range
    #[error("Configuration value out of range")]
    InvalidConfig,

    /// Payment is below the entry fee
    #[error("Payment is below the entry fee")]
    InsufficientPayment,

    /// Entry attempted while the round is not open
    #[error("Round is not open for entries")]
    RoundNotOpen,

    /// Round is at participant capacity
    #[error("Round is at participant capacity")]
    RoundFull,

    /// Draw trigger attempted while the draw conditions do not hold
    #[error("Draw is not due")]
    DrawNotDue,

    /// Resolution attempted with a stale, foreign, or already consumed request
    #[error("Unknown or already consumed randomness request")]
    UnknownRequest,

    /// Resolution attempted outside the configured oracle channel
    #[error("Caller is not the configured oracle channel")]
    Unauthorized,

    /// Oracle has accepted the request but not produced a result yet
    #[error("Oracle result is not ready")]
    RandomnessNotReady,

    /// Oracle queue or escrow does not match the configuration
    #[error("Oracle account does not match the configuration")]
    OracleMismatch,

    /// Randomness request account is not usable
    #[error("Randomness request account is invalid")]
    InvalidRequestAccount,

    /// Winner account does not match the drawn participant
    #[error("Winner account does not match the drawn participant")]
    WinnerMismatch,

    /// Arithmetic overflow during lamport accounting
    #[error("Arithmetic overflow")]
    Overflow,
}

impl From<RaffleError> for ProgramError {
    fn from(e: RaffleError) -> Self {
        ProgramError::Custom(e as u32)
    }
}

impl<T> DecodeError<T> for RaffleError {
    fn type_of() -> &'static str {
        "Raffle Error"
    }
}

impl PrintProgramError for RaffleError {
    fn print<E>(&self) {
        msg!(&self.to_string());
    }
}
