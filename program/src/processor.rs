// SolPot Raffle Program - Processor
//
// Every handler executes atomically with respect to the round account: the
// Solana runtime serializes all transactions that name it writable, so no
// operation ever observes a half-applied round. All checks run before any
// effect; a failed handler leaves every account untouched.
use crate::error::RaffleError;
use crate::instruction::RaffleInstruction;
use crate::oracle;
use crate::state::{
    find_config_address, find_round_address, Config, Round, RoundStatus, CONFIG_SEED,
    MAX_PARTICIPANTS, ROUND_SEED,
};

use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program::{invoke, invoke_signed},
    program_error::ProgramError,
    program_pack::Pack,
    pubkey::Pubkey,
    system_instruction,
    sysvar::{clock::Clock, rent::Rent, Sysvar},
};

pub struct Processor;

impl Processor {
    pub fn process(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        instruction_data: &[u8],
    ) -> ProgramResult {
        let instruction = RaffleInstruction::unpack(instruction_data)?;

        match instruction {
            RaffleInstruction::InitializeConfig {
                entry_fee,
                draw_interval,
                max_participants,
            } => {
                msg!("Instruction: Initialize Config");
                Self::process_initialize_config(
                    accounts,
                    entry_fee,
                    draw_interval,
                    max_participants,
                    program_id,
                )
            }
            RaffleInstruction::InitializeRound => {
                msg!("Instruction: Initialize Round");
                Self::process_initialize_round(accounts, program_id)
            }
            RaffleInstruction::Enter { payment } => {
                msg!("Instruction: Enter");
                Self::process_enter(accounts, payment, program_id)
            }
            RaffleInstruction::TriggerDraw => {
                msg!("Instruction: Trigger Draw");
                Self::process_trigger_draw(accounts, program_id)
            }
            RaffleInstruction::Resolve => {
                msg!("Instruction: Resolve");
                Self::process_resolve(accounts, program_id)
            }
        }
    }

    /// Creates and writes the config PDA. The configuration is immutable
    /// from this point on; no instruction mutates it.
    fn process_initialize_config(
        accounts: &[AccountInfo],
        entry_fee: u64,
        draw_interval: i64,
        max_participants: u16,
        program_id: &Pubkey,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let payer_info = next_account_info(account_info_iter)?;
        let config_info = next_account_info(account_info_iter)?;
        let oracle_queue_info = next_account_info(account_info_iter)?;
        let escrow_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        if !payer_info.is_signer {
            msg!("Payer must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }

        let (expected_config_pubkey, bump_seed) = find_config_address(program_id);
        if *config_info.key != expected_config_pubkey {
            msg!("Invalid config account address");
            return Err(ProgramError::InvalidArgument);
        }

        if entry_fee == 0
            || draw_interval <= 0
            || max_participants == 0
            || max_participants as usize > MAX_PARTICIPANTS
        {
            msg!(
                "Rejecting configuration: fee={} lamports, interval={}s, capacity={}",
                entry_fee,
                draw_interval,
                max_participants
            );
            return Err(RaffleError::InvalidConfig.into());
        }

        if config_info.owner != program_id {
            msg!("Creating config account");
            let rent = Rent::get()?;
            invoke_signed(
                &system_instruction::create_account(
                    payer_info.key,
                    config_info.key,
                    rent.minimum_balance(Config::LEN),
                    Config::LEN as u64,
                    program_id,
                ),
                &[
                    payer_info.clone(),
                    config_info.clone(),
                    system_program_info.clone(),
                ],
                &[&[CONFIG_SEED, &[bump_seed]]],
            )?;
        }

        let existing = Config::unpack_unchecked(&config_info.data.borrow())?;
        if existing.is_initialized {
            msg!("Config account is already initialized");
            return Err(RaffleError::AlreadyInitialized.into());
        }

        let config_data = Config {
            is_initialized: true,
            entry_fee,
            draw_interval,
            max_participants,
            oracle_queue: *oracle_queue_info.key,
            escrow: *escrow_info.key,
        };
        Config::pack(config_data, &mut config_info.data.borrow_mut())?;

        msg!(
            "Config initialized: fee={} lamports, interval={}s, capacity={}, queue={}, escrow={}",
            entry_fee,
            draw_interval,
            max_participants,
            oracle_queue_info.key,
            escrow_info.key
        );
        Ok(())
    }

    /// Creates the single live round, open for entries, with the draw clock
    /// starting now.
    fn process_initialize_round(accounts: &[AccountInfo], program_id: &Pubkey) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let payer_info = next_account_info(account_info_iter)?;
        let round_info = next_account_info(account_info_iter)?;
        let config_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        if !payer_info.is_signer {
            msg!("Payer must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }

        let (expected_round_pubkey, bump_seed) = find_round_address(program_id);
        if *round_info.key != expected_round_pubkey {
            msg!("Invalid round account address");
            return Err(ProgramError::InvalidArgument);
        }

        if config_info.owner != program_id {
            msg!("Config account must be owned by this program");
            return Err(ProgramError::IncorrectProgramId);
        }
        let config_data = Config::unpack(&config_info.data.borrow())?;

        if round_info.owner != program_id {
            msg!("Creating round account");
            let rent = Rent::get()?;
            invoke_signed(
                &system_instruction::create_account(
                    payer_info.key,
                    round_info.key,
                    rent.minimum_balance(Round::LEN),
                    Round::LEN as u64,
                    program_id,
                ),
                &[
                    payer_info.clone(),
                    round_info.clone(),
                    system_program_info.clone(),
                ],
                &[&[ROUND_SEED, &[bump_seed]]],
            )?;
        }

        let existing = Round::unpack_unchecked(&round_info.data.borrow())?;
        if existing.is_initialized {
            msg!("Round account is already initialized");
            return Err(RaffleError::AlreadyInitialized.into());
        }

        let now = Clock::get()?.unix_timestamp;
        let round_data = Round {
            is_initialized: true,
            status: RoundStatus::Open,
            entry_fee: config_data.entry_fee,
            draw_interval: config_data.draw_interval,
            last_draw_timestamp: now,
            pool: 0,
            recent_winner: Pubkey::default(),
            pending_request: Pubkey::default(),
            max_participants: config_data.max_participants,
            participant_count: 0,
            participants: [Pubkey::default(); MAX_PARTICIPANTS],
        };
        Round::pack(round_data, &mut round_info.data.borrow_mut())?;

        msg!("Round initialized: open, draw clock starts at {}", now);
        Ok(())
    }

    /// Entry admission. Appends the participant and moves the payment into
    /// the round account; overpayment is retained in the pool.
    fn process_enter(accounts: &[AccountInfo], payment: u64, program_id: &Pubkey) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let participant_info = next_account_info(account_info_iter)?;
        let round_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        if !participant_info.is_signer {
            msg!("Participant must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }

        if round_info.owner != program_id {
            msg!("Round account must be owned by this program");
            return Err(ProgramError::IncorrectProgramId);
        }

        let mut round_data = Round::unpack(&round_info.data.borrow())?;

        if let Err(err) = round_data.check_admission(payment) {
            msg!("Entry rejected: {}", err);
            return Err(err.into());
        }

        invoke(
            &system_instruction::transfer(participant_info.key, round_info.key, payment),
            &[
                participant_info.clone(),
                round_info.clone(),
                system_program_info.clone(),
            ],
        )?;

        round_data.admit(*participant_info.key, payment)?;
        Round::pack(round_data, &mut round_info.data.borrow_mut())?;

        msg!(
            "Entered: participant={}, payment={} lamports, pool={} lamports, participants={}",
            participant_info.key,
            payment,
            round_data.pool,
            round_data.participant_count
        );
        Ok(())
    }

    /// Triggers a due draw: locks the round and issues exactly one
    /// randomness request to the configured oracle queue.
    ///
    /// The draw conditions are re-evaluated here no matter what the caller
    /// checked beforehand; schedulers may invoke this speculatively and a
    /// stale trigger must fail cleanly.
    fn process_trigger_draw(accounts: &[AccountInfo], program_id: &Pubkey) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let payer_info = next_account_info(account_info_iter)?;
        let round_info = next_account_info(account_info_iter)?;
        let config_info = next_account_info(account_info_iter)?;
        let request_info = next_account_info(account_info_iter)?;
        let oracle_queue_info = next_account_info(account_info_iter)?;
        let escrow_info = next_account_info(account_info_iter)?;
        let switchboard_program_info = next_account_info(account_info_iter)?;
        let remaining: Vec<AccountInfo> = account_info_iter.cloned().collect();

        if !payer_info.is_signer {
            msg!("Payer must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }

        if round_info.owner != program_id || config_info.owner != program_id {
            msg!("Round and config accounts must be owned by this program");
            return Err(ProgramError::IncorrectProgramId);
        }

        let config_data = Config::unpack(&config_info.data.borrow())?;
        let mut round_data = Round::unpack(&round_info.data.borrow())?;

        let now = Clock::get()?.unix_timestamp;
        if !round_data.is_draw_due(now) {
            msg!(
                "Draw not due: participants={}, pool={} lamports, status={:?}",
                round_data.participant_count,
                round_data.pool,
                round_data.status
            );
            return Err(RaffleError::DrawNotDue.into());
        }

        if oracle_queue_info.key != &config_data.oracle_queue {
            msg!("Oracle queue does not match the configuration");
            return Err(RaffleError::OracleMismatch.into());
        }
        if escrow_info.key != &config_data.escrow {
            msg!("Escrow account does not match the configuration");
            return Err(RaffleError::OracleMismatch.into());
        }

        // Lock the round before the outbound request. While the request is
        // outstanding, is_draw_due is false and no second request can be
        // issued.
        round_data.status = RoundStatus::Drawing;
        round_data.pending_request = *request_info.key;
        Round::pack(round_data, &mut round_info.data.borrow_mut())?;

        oracle::request_randomness(
            switchboard_program_info,
            request_info,
            oracle_queue_info,
            escrow_info,
            payer_info,
            &remaining,
        )?;

        msg!(
            "Draw requested: escrow={}, request={}",
            config_data.escrow,
            request_info.key
        );
        Ok(())
    }

    /// Consumes the oracle's result for the outstanding request: selects the
    /// winner, resets the round in place, and only then pays out the pool.
    fn process_resolve(accounts: &[AccountInfo], program_id: &Pubkey) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let caller_info = next_account_info(account_info_iter)?;
        let round_info = next_account_info(account_info_iter)?;
        let request_info = next_account_info(account_info_iter)?;
        let winner_info = next_account_info(account_info_iter)?;

        if !caller_info.is_signer {
            msg!("Caller must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }

        if round_info.owner != program_id {
            msg!("Round account must be owned by this program");
            return Err(ProgramError::IncorrectProgramId);
        }

        let mut round_data = Round::unpack(&round_info.data.borrow())?;

        // Covers the stale-retry case too: a consumed request leaves the
        // round Open with the pending id cleared.
        if round_data.status != RoundStatus::Drawing
            || round_data.pending_request != *request_info.key
        {
            msg!("No matching request outstanding: presented={}", request_info.key);
            return Err(RaffleError::UnknownRequest.into());
        }

        let result = oracle::verify_randomness(request_info)?;

        if round_data.participant_count == 0 {
            // Unreachable: a draw is only triggered with at least one entry.
            return Err(ProgramError::InvalidAccountData);
        }

        let now = Clock::get()?.unix_timestamp;
        let (winner, payout) = round_data.apply_resolution(oracle::random_value(&result), now);

        if winner_info.key != &winner {
            msg!("Winner account mismatch: drawn winner is {}", winner);
            return Err(RaffleError::WinnerMismatch.into());
        }

        // Persist the fully reset round before the payout leaves the
        // account. The transfer is the only external interaction of this
        // handler; anything it re-enters observes an open round with an
        // empty pool and cannot draw twice.
        Round::pack(round_data, &mut round_info.data.borrow_mut())?;

        let round_lamports = round_info.lamports();
        **round_info.try_borrow_mut_lamports()? = round_lamports
            .checked_sub(payout)
            .ok_or(RaffleError::Overflow)?;
        let winner_lamports = winner_info.lamports();
        **winner_info.try_borrow_mut_lamports()? = winner_lamports
            .checked_add(payout)
            .ok_or(RaffleError::Overflow)?;

        msg!("Winner picked: winner={}, payout={} lamports", winner, payout);
        Ok(())
    }
}
