//! # Payout
//!
//! The single choke point for every value transfer the engine performs:
//! milestone releases (manual and auto-approval), dispute splits, and
//! cancellation refunds. All paths commit their state effects before the
//! first outbound transfer, and every caller holds the re-entrancy lock
//! across the call.
//!
//! ## Fee arithmetic
//!
//! `fee = amount * fee_percent / 100` with i128 truncating division, so
//! `fee + payee_amount == amount` reconstructs the milestone amount exactly.
//! No fee is taken on dispute splits or refunds.

use soroban_sdk::{token, Address, Env, Vec};

use crate::types::{Milestone, MilestoneStatus, ProjectConfig, ProjectState, ProjectStatus};
use crate::{storage, Error};

/// Split `amount` into `(fee, payee_amount)` for the given fee percentage.
///
/// Division truncates toward zero; the remainder stays with the payee, so
/// the two parts always sum back to `amount`.
pub fn fee_split(amount: i128, fee_percent: u32) -> (i128, i128) {
    let fee = amount * fee_percent as i128 / 100;
    (fee, amount - fee)
}

/// True once every milestone has been released.
pub fn all_milestones_approved(milestones: &Vec<Milestone>) -> bool {
    for milestone in milestones.iter() {
        if milestone.status != MilestoneStatus::Approved {
            return false;
        }
    }
    true
}

/// Release the payment for one milestone: mark it `Approved`, flip the
/// project to `Completed` when it was the last one, then transfer the
/// fee-reduced amount to the payee and the fee to the owner.
///
/// Returns `(payee_amount, fee)`. The `Pending/Submitted → Approved` one-way
/// transition is what makes this fire at most once per milestone; callers
/// have already verified the milestone is `Submitted`.
pub fn release_milestone_payment(
    env: &Env,
    config: &ProjectConfig,
    state: &mut ProjectState,
    milestones: &mut Vec<Milestone>,
    milestone_id: u32,
) -> (i128, i128) {
    let mut milestone = match milestones.get(milestone_id) {
        Some(milestone) => milestone,
        None => soroban_sdk::panic_with_error!(env, Error::MilestoneNotFound),
    };
    let payee = match &state.payee {
        Some(payee) => payee.clone(),
        None => soroban_sdk::panic_with_error!(env, Error::ProjectNotActive),
    };

    let (fee, payee_amount) = fee_split(milestone.amount, storage::get_fee_percent(env));

    // Effects before interactions: the approval and completion writes land
    // before any token leaves the contract.
    milestone.status = MilestoneStatus::Approved;
    milestones.set(milestone_id, milestone);
    storage::save_milestones(env, config.id, milestones);

    if all_milestones_approved(milestones) {
        state.status = ProjectStatus::Completed;
    }
    storage::save_project_state(env, config.id, state);

    let client = token_client(env);
    let contract = env.current_contract_address();
    client.transfer(&contract, &payee, &payee_amount);
    if fee > 0 {
        client.transfer(&contract, &storage::get_owner(env), &fee);
    }

    (payee_amount, fee)
}

/// Disburse a resolved dispute: `avg_percentage` of `amount` to the payee,
/// the remainder back to the payer. No platform fee. Zero legs are skipped.
///
/// Returns `(payee_amount, payer_amount)`.
pub fn settle_dispute_split(
    env: &Env,
    payer: &Address,
    payee: &Address,
    amount: i128,
    avg_percentage: u32,
) -> (i128, i128) {
    let payee_amount = amount * avg_percentage as i128 / 100;
    let payer_amount = amount - payee_amount;

    let client = token_client(env);
    let contract = env.current_contract_address();
    if payee_amount > 0 {
        client.transfer(&contract, payee, &payee_amount);
    }
    if payer_amount > 0 {
        client.transfer(&contract, payer, &payer_amount);
    }

    (payee_amount, payer_amount)
}

/// Pull `deposit` from the payer and immediately return any overage above
/// `total`, leaving exactly the escrowed total in custody.
pub fn collect_deposit(env: &Env, payer: &Address, deposit: i128, total: i128) {
    let client = token_client(env);
    let contract = env.current_contract_address();
    client.transfer(payer, &contract, &deposit);
    let excess = deposit - total;
    if excess > 0 {
        client.transfer(&contract, payer, &excess);
    }
}

/// Return the full escrowed total to the payer on cancellation.
pub fn refund_deposit(env: &Env, payer: &Address, amount: i128) {
    let client = token_client(env);
    client.transfer(&env.current_contract_address(), payer, &amount);
}

/// Settlement-token balance currently held by the contract.
pub fn contract_balance(env: &Env) -> i128 {
    token_client(env).balance(&env.current_contract_address())
}

fn token_client(env: &Env) -> token::Client<'_> {
    token::Client::new(env, &storage::get_token(env))
}
