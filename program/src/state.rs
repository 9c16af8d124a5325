// SolPot Raffle Program - State
use arrayref::{array_mut_ref, array_ref, array_refs, mut_array_refs};
use solana_program::{
    clock::UnixTimestamp,
    program_error::ProgramError,
    program_pack::{IsInitialized, Pack, Sealed},
    pubkey::Pubkey,
};
use std::convert::TryFrom;

use crate::error::RaffleError;

/// Seed for the config PDA
pub const CONFIG_SEED: &[u8] = b"config";
/// Seed for the round PDA
pub const ROUND_SEED: &[u8] = b"round";

/// Compile-time capacity of the participant list. The account layout is
/// fixed-size, so this bounds how many entries a single round can hold;
/// `Config::max_participants` may tighten it but never exceed it.
pub const MAX_PARTICIPANTS: usize = 64;

/// Find the program derived address of the config account
pub fn find_config_address(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[CONFIG_SEED], program_id)
}

/// Find the program derived address of the round account
pub fn find_round_address(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[ROUND_SEED], program_id)
}

/// Status of the live round
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RoundStatus {
    /// Round is open for entries
    Open,
    /// A randomness request is outstanding; entries are rejected
    Drawing,
}

impl TryFrom<u8> for RoundStatus {
    type Error = &'static str;

    fn try_from(val: u8) -> Result<Self, Self::Error> {
        match val {
            0 => Ok(RoundStatus::Open),
            1 => Ok(RoundStatus::Drawing),
            _ => Err("Invalid round status"),
        }
    }
}

impl From<RoundStatus> for u8 {
    fn from(status: RoundStatus) -> Self {
        match status {
            RoundStatus::Open => 0,
            RoundStatus::Drawing => 1,
        }
    }
}

/// Program configuration account. Written once at initialization and never
/// mutated afterwards; there are no update instructions.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Is the account initialized
    pub is_initialized: bool,
    /// Entry fee per participant in lamports
    pub entry_fee: u64,
    /// Seconds that must elapse between draws
    pub draw_interval: i64,
    /// Cap on entries per round; bounds the work the resolve callback does
    pub max_participants: u16,
    /// Oracle queue randomness requests are issued against
    pub oracle_queue: Pubkey,
    /// Escrow account funding oracle requests
    pub escrow: Pubkey,
}

/// The single live round of the raffle. Created once, then reset in place by
/// every successful resolution; never destroyed.
#[derive(Debug, Clone, Copy)]
pub struct Round {
    /// Is the account initialized
    pub is_initialized: bool,
    /// Current status of the round
    pub status: RoundStatus,
    /// Entry fee per participant in lamports (copied from config)
    pub entry_fee: u64,
    /// Seconds that must elapse between draws (copied from config)
    pub draw_interval: i64,
    /// When the previous draw resolved (round creation time for round one)
    pub last_draw_timestamp: UnixTimestamp,
    /// Accumulated entry payments for this round, in lamports
    pub pool: u64,
    /// Winner of the most recently resolved round (zero before the first)
    pub recent_winner: Pubkey,
    /// Outstanding randomness request account (zero while none is pending).
    /// Non-default exactly while `status == Drawing`.
    pub pending_request: Pubkey,
    /// Cap on entries per round (copied from config)
    pub max_participants: u16,
    /// Number of live entries in `participants`
    pub participant_count: u16,
    /// Entry list in admission order; duplicates allowed
    pub participants: [Pubkey; MAX_PARTICIPANTS],
}

impl Round {
    /// Entries in admission order.
    pub fn participants(&self) -> &[Pubkey] {
        &self.participants[..self.participant_count as usize]
    }

    /// Pure draw-due evaluation: the round is open, the interval has
    /// elapsed, at least one entry exists, and the pool holds lamports.
    /// Safe to call at any frequency; no side effects.
    pub fn is_draw_due(&self, now: UnixTimestamp) -> bool {
        self.status == RoundStatus::Open
            && now.saturating_sub(self.last_draw_timestamp) >= self.draw_interval
            && self.participant_count > 0
            && self.pool > 0
    }

    /// Validates an entry without mutating anything. The payment is checked
    /// before the round status, so an underpaying entry into a drawing round
    /// reports `InsufficientPayment`.
    pub fn check_admission(&self, payment: u64) -> Result<(), RaffleError> {
        if payment < self.entry_fee {
            return Err(RaffleError::InsufficientPayment);
        }
        if self.status != RoundStatus::Open {
            return Err(RaffleError::RoundNotOpen);
        }
        if self.participant_count >= self.max_participants {
            return Err(RaffleError::RoundFull);
        }
        Ok(())
    }

    /// Appends a participant and grows the pool by the full payment.
    /// Overpayment beyond the entry fee is retained, not refunded.
    pub fn admit(&mut self, participant: Pubkey, payment: u64) -> Result<(), RaffleError> {
        let slot = self.participant_count as usize;
        if slot >= MAX_PARTICIPANTS {
            return Err(RaffleError::RoundFull);
        }
        self.participants[slot] = participant;
        self.participant_count += 1;
        self.pool = self.pool.checked_add(payment).ok_or(RaffleError::Overflow)?;
        Ok(())
    }

    /// Applies every state mutation of a successful resolution and returns
    /// the selected winner with the payout amount. Callers must persist the
    /// round before transferring the payout, so that any reentry during the
    /// transfer observes an already reset, open round with an empty pool.
    ///
    /// The participant list must be non-empty; the trigger-time draw-due
    /// check guarantees this for every outstanding request.
    pub fn apply_resolution(
        &mut self,
        random_value: u64,
        now: UnixTimestamp,
    ) -> (Pubkey, u64) {
        let index = (random_value % self.participant_count as u64) as usize;
        let winner = self.participants[index];
        let payout = self.pool;

        self.participants = [Pubkey::default(); MAX_PARTICIPANTS];
        self.participant_count = 0;
        self.pool = 0;
        self.status = RoundStatus::Open;
        self.last_draw_timestamp = now;
        self.pending_request = Pubkey::default();
        self.recent_winner = winner;

        (winner, payout)
    }
}

impl Sealed for Config {}
impl Sealed for Round {}

impl IsInitialized for Config {
    fn is_initialized(&self) -> bool {
        self.is_initialized
    }
}

impl IsInitialized for Round {
    fn is_initialized(&self) -> bool {
        self.is_initialized
    }
}

impl Pack for Config {
    const LEN: usize = 1 + 8 + 8 + 2 + 32 + 32;

    fn unpack_from_slice(src: &[u8]) -> Result<Self, ProgramError> {
        let src = array_ref![src, 0, Config::LEN];
        let (is_initialized, entry_fee, draw_interval, max_participants, oracle_queue, escrow) =
            array_refs![src, 1, 8, 8, 2, 32, 32];

        Ok(Config {
            is_initialized: is_initialized[0] != 0,
            entry_fee: u64::from_le_bytes(*entry_fee),
            draw_interval: i64::from_le_bytes(*draw_interval),
            max_participants: u16::from_le_bytes(*max_participants),
            oracle_queue: Pubkey::new_from_array(*oracle_queue),
            escrow: Pubkey::new_from_array(*escrow),
        })
    }

    fn pack_into_slice(&self, dst: &mut [u8]) {
        let dst = array_mut_ref![dst, 0, Config::LEN];
        let (is_initialized_dst, entry_fee_dst, draw_interval_dst, max_participants_dst, oracle_queue_dst, escrow_dst) =
            mut_array_refs![dst, 1, 8, 8, 2, 32, 32];

        is_initialized_dst[0] = self.is_initialized as u8;
        *entry_fee_dst = self.entry_fee.to_le_bytes();
        *draw_interval_dst = self.draw_interval.to_le_bytes();
        *max_participants_dst = self.max_participants.to_le_bytes();
        oracle_queue_dst.copy_from_slice(self.oracle_queue.as_ref());
        escrow_dst.copy_from_slice(self.escrow.as_ref());
    }
}

impl Pack for Round {
    const LEN: usize = 1 + 1 + 8 + 8 + 8 + 8 + 32 + 32 + 2 + 2 + 32 * MAX_PARTICIPANTS;

    fn unpack_from_slice(src: &[u8]) -> Result<Self, ProgramError> {
        let src = array_ref![src, 0, Round::LEN];
        let (
            is_initialized,
            status,
            entry_fee,
            draw_interval,
            last_draw_timestamp,
            pool,
            recent_winner,
            pending_request,
            max_participants,
            participant_count,
            participants,
        ) = array_refs![src, 1, 1, 8, 8, 8, 8, 32, 32, 2, 2, 32 * MAX_PARTICIPANTS];

        let status = match RoundStatus::try_from(status[0]) {
            Ok(status) => status,
            Err(_) => return Err(ProgramError::InvalidAccountData),
        };

        let participant_count = u16::from_le_bytes(*participant_count);
        if participant_count as usize > MAX_PARTICIPANTS {
            return Err(ProgramError::InvalidAccountData);
        }

        let mut list = [Pubkey::default(); MAX_PARTICIPANTS];
        for (i, slot) in list.iter_mut().enumerate() {
            *slot = Pubkey::new_from_array(*array_ref![participants, i * 32, 32]);
        }

        Ok(Round {
            is_initialized: is_initialized[0] != 0,
            status,
            entry_fee: u64::from_le_bytes(*entry_fee),
            draw_interval: i64::from_le_bytes(*draw_interval),
            last_draw_timestamp: UnixTimestamp::from_le_bytes(*last_draw_timestamp),
            pool: u64::from_le_bytes(*pool),
            recent_winner: Pubkey::new_from_array(*recent_winner),
            pending_request: Pubkey::new_from_array(*pending_request),
            max_participants: u16::from_le_bytes(*max_participants),
            participant_count,
            participants: list,
        })
    }

    fn pack_into_slice(&self, dst: &mut [u8]) {
        let dst = array_mut_ref![dst, 0, Round::LEN];
        let (
            is_initialized_dst,
            status_dst,
            entry_fee_dst,
            draw_interval_dst,
            last_draw_timestamp_dst,
            pool_dst,
            recent_winner_dst,
            pending_request_dst,
            max_participants_dst,
            participant_count_dst,
            participants_dst,
        ) = mut_array_refs![dst, 1, 1, 8, 8, 8, 8, 32, 32, 2, 2, 32 * MAX_PARTICIPANTS];

        is_initialized_dst[0] = self.is_initialized as u8;
        status_dst[0] = self.status.into();
        *entry_fee_dst = self.entry_fee.to_le_bytes();
        *draw_interval_dst = self.draw_interval.to_le_bytes();
        *last_draw_timestamp_dst = self.last_draw_timestamp.to_le_bytes();
        *pool_dst = self.pool.to_le_bytes();
        recent_winner_dst.copy_from_slice(self.recent_winner.as_ref());
        pending_request_dst.copy_from_slice(self.pending_request.as_ref());
        *max_participants_dst = self.max_participants.to_le_bytes();
        *participant_count_dst = self.participant_count.to_le_bytes();
        for (i, participant) in self.participants.iter().enumerate() {
            participants_dst[i * 32..(i + 1) * 32].copy_from_slice(participant.as_ref());
        }
    }
}
