// Switchboard VRF integration for the SolPot raffle program
use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    instruction::{AccountMeta, Instruction},
    msg,
    program::invoke,
    program_error::ProgramError,
};
use switchboard_v2::VrfAccountData;

pub use switchboard_v2::SWITCHBOARD_PROGRAM_ID;

use crate::error::RaffleError;

// Switchboard VRF request instruction discriminator
const VRF_REQUEST_IX: u8 = 1;

/// Issue a randomness request to the Switchboard program.
///
/// The request account's pubkey is the correlation id the raffle records; the
/// oracle fulfills the request by writing its result into that same account.
/// `remaining` carries whatever extra accounts the deployed Switchboard queue
/// needs (permission, data buffer, recent blockhashes, token program); they
/// are forwarded to the CPI untouched.
pub fn request_randomness<'a>(
    switchboard_program: &AccountInfo<'a>,
    request: &AccountInfo<'a>,
    oracle_queue: &AccountInfo<'a>,
    escrow: &AccountInfo<'a>,
    payer: &AccountInfo<'a>,
    remaining: &[AccountInfo<'a>],
) -> ProgramResult {
    if switchboard_program.key != &SWITCHBOARD_PROGRAM_ID {
        msg!("Oracle program account is not the Switchboard program");
        return Err(RaffleError::Unauthorized.into());
    }

    if request.owner != &SWITCHBOARD_PROGRAM_ID {
        msg!("Randomness request account not owned by the Switchboard program");
        return Err(RaffleError::InvalidRequestAccount.into());
    }

    let mut account_infos = vec![
        request.clone(),
        oracle_queue.clone(),
        escrow.clone(),
        payer.clone(),
    ];
    account_infos.extend_from_slice(remaining);

    let accounts = account_infos
        .iter()
        .map(|info| AccountMeta {
            pubkey: *info.key,
            is_signer: info.is_signer,
            is_writable: info.is_writable,
        })
        .collect();

    let instruction = Instruction {
        program_id: *switchboard_program.key,
        accounts,
        data: vec![VRF_REQUEST_IX],
    };

    account_infos.push(switchboard_program.clone());
    invoke(&instruction, &account_infos)?;

    Ok(())
}

/// Verify that `request` is an authentic Switchboard randomness account with
/// a produced result, and return the 32-byte result buffer. Anything not
/// owned and written by the Switchboard program is outside the oracle trust
/// boundary and rejected as `Unauthorized`.
pub fn verify_randomness(request: &AccountInfo) -> Result<[u8; 32], ProgramError> {
    if request.owner != &SWITCHBOARD_PROGRAM_ID {
        msg!("Randomness account not owned by the Switchboard program");
        return Err(RaffleError::Unauthorized.into());
    }

    let vrf_account = VrfAccountData::new(request).map_err(|_| RaffleError::Unauthorized)?;

    if vrf_account.current_round.result == [0u8; 32] {
        msg!("Randomness account does not hold a result yet");
        return Err(RaffleError::RandomnessNotReady.into());
    }

    let result_buffer = vrf_account.get_result()?;
    let mut result = [0u8; 32];
    result.copy_from_slice(&result_buffer);

    Ok(result)
}

/// Reduce a VRF result buffer to the random value used for winner selection:
/// the first 8 bytes, little endian.
pub fn random_value(result: &[u8; 32]) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&result[..8]);
    u64::from_le_bytes(bytes)
}
