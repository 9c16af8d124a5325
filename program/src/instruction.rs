// SolPot Raffle Program - Instructions
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    program_error::ProgramError,
    pubkey::Pubkey,
    system_program,
};

use crate::error::RaffleError;
use crate::state::{find_config_address, find_round_address};

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq)]
pub enum RaffleInstruction {
    /// Initialize the immutable raffle configuration
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` Payer funding the config account
    /// 1. `[writable]` The config account (PDA, seeds = ["config"])
    /// 2. `[]` Oracle queue randomness requests will be issued against
    /// 3. `[]` Escrow account funding oracle requests
    /// 4. `[]` The system program
    InitializeConfig {
        /// Entry fee per participant in lamports
        entry_fee: u64,
        /// Seconds that must elapse between draws
        draw_interval: i64,
        /// Cap on entries per round
        max_participants: u16,
    },

    /// Create the single live round, open for entries
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` Payer funding the round account
    /// 1. `[writable]` The round account (PDA, seeds = ["round"])
    /// 2. `[]` The config account
    /// 3. `[]` The system program
    InitializeRound,

    /// Enter the current round by paying at least the entry fee
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` The participant paying the entry fee
    /// 1. `[writable]` The round account
    /// 2. `[]` The system program
    Enter {
        /// Payment in lamports; anything beyond the entry fee is retained
        payment: u64,
    },

    /// Trigger a due draw: lock the round and request oracle randomness
    ///
    /// Re-validates the draw conditions on-chain; a caller's own check is
    /// never trusted. Safe to invoke speculatively from a scheduler.
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` Payer funding the oracle request
    /// 1. `[writable]` The round account
    /// 2. `[]` The config account
    /// 3. `[writable]` The randomness request account (Switchboard VRF)
    /// 4. `[writable]` Oracle queue (must match the config)
    /// 5. `[writable]` Escrow account (must match the config)
    /// 6. `[]` The Switchboard program
    /// 7.. Remaining accounts required by the deployed Switchboard queue
    TriggerDraw,

    /// Resolve the outstanding draw with the oracle's result: pay the winner
    /// and reset the round in place
    ///
    /// Accounts expected:
    /// 0. `[signer]` Any caller (the oracle result itself is the authority)
    /// 1. `[writable]` The round account
    /// 2. `[]` The randomness request account holding the result
    /// 3. `[writable]` The winner account (must match the drawn participant)
    Resolve,
}

impl RaffleInstruction {
    /// Unpacks a byte buffer into a RaffleInstruction
    pub fn unpack(input: &[u8]) -> Result<Self, ProgramError> {
        Self::try_from_slice(input).map_err(|_| RaffleError::InvalidInstruction.into())
    }
}

/// Create initialize_config instruction
pub fn initialize_config(
    program_id: &Pubkey,
    payer: &Pubkey,
    oracle_queue: &Pubkey,
    escrow: &Pubkey,
    entry_fee: u64,
    draw_interval: i64,
    max_participants: u16,
) -> Instruction {
    let (config, _) = find_config_address(program_id);

    Instruction::new_with_borsh(
        *program_id,
        &RaffleInstruction::InitializeConfig {
            entry_fee,
            draw_interval,
            max_participants,
        },
        vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(config, false),
            AccountMeta::new_readonly(*oracle_queue, false),
            AccountMeta::new_readonly(*escrow, false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
    )
}

/// Create initialize_round instruction
pub fn initialize_round(program_id: &Pubkey, payer: &Pubkey) -> Instruction {
    let (config, _) = find_config_address(program_id);
    let (round, _) = find_round_address(program_id);

    Instruction::new_with_borsh(
        *program_id,
        &RaffleInstruction::InitializeRound,
        vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(round, false),
            AccountMeta::new_readonly(config, false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
    )
}

/// Create enter instruction
pub fn enter(program_id: &Pubkey, participant: &Pubkey, payment: u64) -> Instruction {
    let (round, _) = find_round_address(program_id);

    Instruction::new_with_borsh(
        *program_id,
        &RaffleInstruction::Enter { payment },
        vec![
            AccountMeta::new(*participant, true),
            AccountMeta::new(round, false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
    )
}

/// Create trigger_draw instruction
pub fn trigger_draw(
    program_id: &Pubkey,
    payer: &Pubkey,
    request: &Pubkey,
    oracle_queue: &Pubkey,
    escrow: &Pubkey,
    switchboard_program: &Pubkey,
    remaining_accounts: &[AccountMeta],
) -> Instruction {
    let (config, _) = find_config_address(program_id);
    let (round, _) = find_round_address(program_id);

    let mut accounts = vec![
        AccountMeta::new(*payer, true),
        AccountMeta::new(round, false),
        AccountMeta::new_readonly(config, false),
        AccountMeta::new(*request, false),
        AccountMeta::new(*oracle_queue, false),
        AccountMeta::new(*escrow, false),
        AccountMeta::new_readonly(*switchboard_program, false),
    ];
    accounts.extend_from_slice(remaining_accounts);

    Instruction::new_with_borsh(*program_id, &RaffleInstruction::TriggerDraw, accounts)
}

/// Create resolve instruction
pub fn resolve(
    program_id: &Pubkey,
    caller: &Pubkey,
    request: &Pubkey,
    winner: &Pubkey,
) -> Instruction {
    let (round, _) = find_round_address(program_id);

    Instruction::new_with_borsh(
        *program_id,
        &RaffleInstruction::Resolve,
        vec![
            AccountMeta::new_readonly(*caller, true),
            AccountMeta::new(round, false),
            AccountMeta::new_readonly(*request, false),
            AccountMeta::new(*winner, false),
        ],
    )
}
