// SolPot Raffle Program
//
// A recurring lottery on Solana: participants pay an entry fee into a pooled
// round, a time-gated trigger requests Switchboard VRF randomness, and the
// verified result picks a winner, pays out the pool, and reopens the round.
pub mod error;
pub mod instruction;
pub mod oracle;
pub mod processor;
pub mod state;

#[cfg(not(feature = "no-entrypoint"))]
mod entrypoint;

use solana_program::{
    account_info::AccountInfo, entrypoint::ProgramResult, pubkey::Pubkey,
};

pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    processor::Processor::process(program_id, accounts, instruction_data)
}
