//! # Escrow Engine Contract
//!
//! This is the root crate of the **milestone escrow engine**. It exposes the
//! single Soroban contract `EscrowEngine` whose entry points cover the full
//! escrow lifecycle:
//!
//! | Phase        | Entry Point(s)                                          |
//! |--------------|---------------------------------------------------------|
//! | Bootstrap    | [`EscrowEngine::init`]                                  |
//! | Governance   | `add_admin`, `remove_admin`, `pause`, `unpause`, `set_platform_fee` |
//! | Lifecycle    | [`EscrowEngine::create_project`], `accept_project`, `submit_milestone`, `cancel_project` |
//! | Release      | [`EscrowEngine::approve_milestone`], [`EscrowEngine::auto_approve_milestone`] |
//! | Arbitration  | [`EscrowEngine::raise_dispute`], [`EscrowEngine::vote_on_dispute`] |
//! | Reputation   | `rate_user`                                             |
//! | Queries      | `get_project`, `get_project_milestones`, `get_dispute_votes`, ... |
//!
//! ## Architecture
//!
//! Authorization is fully delegated to [`access`]. Storage access is fully
//! delegated to [`storage`]. Value transfers flow through [`payout`] — the
//! single choke point for every release, split, and refund. Time gating
//! lives in [`timeouts`]. This file contains the entry points, their
//! precondition checks, and event emissions.
//!
//! ## Discipline
//!
//! Every entry point that moves value holds the re-entrancy lock for its
//! whole duration and commits all state effects before the first outbound
//! transfer. A failed precondition panics with a typed [`Error`], rolling
//! back the entire invocation.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, panic_with_error, Address, Env, String, Vec,
};

pub mod access;
pub mod events;
mod payout;
mod storage;
mod timeouts;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_events;

pub use timeouts::{AUTO_APPROVE_WINDOW, DISPUTE_WINDOW};
pub use types::{
    Dispute, DisputeVote, DisputeVotes, Milestone, MilestoneStatus, Project, ProjectConfig,
    ProjectState, ProjectStatus, UserRating,
};

/// Distinct admin votes required to trigger dispute resolution.
pub const DISPUTE_QUORUM: u32 = 2;

/// Upper bound on the platform fee schedule.
pub const MAX_FEE_PERCENT: u32 = 10;

/// All failure conditions, grouped in decades by kind: validation (1–19),
/// authorization (20–29), state (30–49), timeout (50–59),
/// availability/lifecycle (60–69).
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    EmptyMilestones = 1,
    LengthMismatch = 2,
    InvalidAmount = 3,
    InvalidDeadline = 4,
    InsufficientDeposit = 5,
    EmptyDeliverable = 6,
    InvalidRating = 7,
    FeeTooHigh = 8,
    InvalidPercentage = 9,
    Overflow = 10,
    NotAuthorized = 20,
    PayerCannotAccept = 21,
    ProjectNotFound = 30,
    MilestoneNotFound = 31,
    DisputeNotFound = 32,
    ProjectNotOpen = 33,
    ProjectNotActive = 34,
    AlreadyAccepted = 35,
    MilestoneNotPending = 36,
    MilestoneNotSubmitted = 37,
    AlreadyVoted = 38,
    DisputeAlreadyResolved = 39,
    AdminAlreadyExists = 40,
    AdminNotFound = 41,
    LastAdmin = 42,
    DisputeWindowElapsed = 50,
    AutoApproveNotReady = 51,
    EnginePaused = 60,
    ReentrancyLocked = 61,
    AlreadyInitialized = 62,
    NotInitialized = 63,
}

#[contract]
pub struct EscrowEngine;

#[contractimpl]
impl EscrowEngine {
    // ─────────────────────────────────────────────────────────
    // Initialisation
    // ─────────────────────────────────────────────────────────

    /// Initialise the engine: bind the owner and the settlement token.
    ///
    /// Must be called exactly once immediately after deployment.
    /// Subsequent calls panic with `Error::AlreadyInitialized`.
    ///
    /// - `owner` governs the roster, fee, and pause switch, collects
    ///   platform fees, and seeds the admin roster as its first member.
    /// - `token` is the Stellar asset all deposits and payouts move in.
    pub fn init(env: Env, owner: Address, token: Address) {
        owner.require_auth();
        access::init_owner(&env, &owner);
        storage::set_token(&env, &token);
    }

    // ─────────────────────────────────────────────────────────
    // Governance
    // ─────────────────────────────────────────────────────────

    /// Add `admin` to the dispute-voter roster.
    ///
    /// - `caller` must be the owner. Available while paused.
    pub fn add_admin(env: Env, caller: Address, admin: Address) {
        caller.require_auth();
        access::add_admin(&env, &caller, &admin);
    }

    /// Remove `admin` from the roster.
    ///
    /// - `caller` must be the owner. Available while paused.
    /// - The roster can never be emptied; removing the last member panics
    ///   with `Error::LastAdmin`.
    pub fn remove_admin(env: Env, caller: Address, admin: Address) {
        caller.require_auth();
        access::remove_admin(&env, &caller, &admin);
    }

    /// Pause the engine, halting everything except governance.
    ///
    /// - `caller` must be the owner.
    pub fn pause(env: Env, caller: Address) {
        caller.require_auth();
        access::require_owner(&env, &caller);
        storage::set_paused(&env, true);
        events::emit_paused(&env, caller);
    }

    /// Unpause the engine.
    ///
    /// - `caller` must be the owner.
    pub fn unpause(env: Env, caller: Address) {
        caller.require_auth();
        access::require_owner(&env, &caller);
        storage::set_paused(&env, false);
        events::emit_unpaused(&env, caller);
    }

    /// Set the platform fee percentage charged on approved releases.
    ///
    /// - `caller` must be the owner.
    /// - Percentages above 10 are rejected.
    pub fn set_platform_fee(env: Env, caller: Address, percent: u32) {
        Self::require_not_paused(&env);
        caller.require_auth();
        access::require_owner(&env, &caller);
        if percent > MAX_FEE_PERCENT {
            panic_with_error!(&env, Error::FeeTooHigh);
        }
        storage::set_fee_percent(&env, percent);
    }

    // ─────────────────────────────────────────────────────────
    // Project lifecycle
    // ─────────────────────────────────────────────────────────

    /// Create an escrowed project and deposit its funds in one step.
    ///
    /// The three milestone arrays must be equally long and non-empty; every
    /// amount must be positive and every deadline strictly in the future.
    /// `deposit` is pulled from the payer and must cover the milestone sum;
    /// any excess is returned in the same invocation, so the engine only
    /// ever custodies the exact total.
    pub fn create_project(
        env: Env,
        payer: Address,
        title: String,
        description_ref: String,
        milestone_descs: Vec<String>,
        milestone_amounts: Vec<i128>,
        milestone_deadlines: Vec<u64>,
        deposit: i128,
    ) -> u64 {
        Self::require_not_paused(&env);
        payer.require_auth();
        storage::acquire_lock(&env);

        if milestone_descs.is_empty() {
            panic_with_error!(&env, Error::EmptyMilestones);
        }
        if milestone_amounts.len() != milestone_descs.len()
            || milestone_deadlines.len() != milestone_descs.len()
        {
            panic_with_error!(&env, Error::LengthMismatch);
        }

        let now = env.ledger().timestamp();
        let mut total: i128 = 0;
        let mut milestones: Vec<types::Milestone> = Vec::new(&env);
        for i in 0..milestone_descs.len() {
            let amount = milestone_amounts.get_unchecked(i);
            let deadline = milestone_deadlines.get_unchecked(i);
            if amount <= 0 {
                panic_with_error!(&env, Error::InvalidAmount);
            }
            if deadline <= now {
                panic_with_error!(&env, Error::InvalidDeadline);
            }
            total = match total.checked_add(amount) {
                Some(total) => total,
                None => panic_with_error!(&env, Error::Overflow),
            };
            milestones.push_back(types::Milestone {
                description: milestone_descs.get_unchecked(i),
                amount,
                deadline,
                status: MilestoneStatus::Pending,
                deliverable_ref: String::from_str(&env, ""),
                submitted_at: 0,
            });
        }
        if deposit < total {
            panic_with_error!(&env, Error::InsufficientDeposit);
        }

        let id = storage::get_and_increment_project_id(&env);
        let config = types::ProjectConfig {
            id,
            payer: payer.clone(),
            title: title.clone(),
            description_ref,
            total_amount: total,
            created_at: now,
        };
        let state = types::ProjectState {
            payee: None,
            status: ProjectStatus::Created,
            accepted_at: 0,
            funds_deposited: true,
        };
        storage::save_new_project(&env, &config, &state, &milestones);
        storage::add_user_project(&env, &payer, id);

        // Interactions last: pull the deposit, return any overage.
        payout::collect_deposit(&env, &payer, deposit, total);

        events::emit_project_created(&env, id, payer.clone(), title, total);
        events::emit_funds_deposited(&env, id, payer, total);

        storage::release_lock(&env);
        id
    }

    /// Accept a project as its payee, activating the milestone lifecycle.
    ///
    /// The payee slot binds exactly once; the payer cannot accept their own
    /// project.
    pub fn accept_project(env: Env, payee: Address, project_id: u64) {
        Self::require_not_paused(&env);
        payee.require_auth();

        let (config, mut state) = storage::load_project_pair(&env, project_id);
        if state.payee.is_some() {
            panic_with_error!(&env, Error::AlreadyAccepted);
        }
        if state.status != ProjectStatus::Created {
            panic_with_error!(&env, Error::ProjectNotOpen);
        }
        if payee == config.payer {
            panic_with_error!(&env, Error::PayerCannotAccept);
        }

        state.payee = Some(payee.clone());
        state.status = ProjectStatus::Active;
        state.accepted_at = env.ledger().timestamp();
        storage::save_project_state(&env, project_id, &state);
        storage::add_user_project(&env, &payee, project_id);

        events::emit_project_accepted(&env, project_id, payee);
    }

    /// Record a deliverable for a pending milestone, starting its dispute
    /// and auto-approval windows.
    ///
    /// - `payee` must be the bound payee; the project must be active.
    /// - `deliverable_ref` is an opaque non-empty reference.
    pub fn submit_milestone(
        env: Env,
        payee: Address,
        project_id: u64,
        milestone_id: u32,
        deliverable_ref: String,
    ) {
        Self::require_not_paused(&env);
        payee.require_auth();

        let (_config, state) = storage::load_project_pair(&env, project_id);
        access::require_payee(&env, &state, &payee);
        if state.status != ProjectStatus::Active {
            panic_with_error!(&env, Error::ProjectNotActive);
        }

        let mut milestones = storage::load_milestones(&env, project_id);
        let mut milestone = match milestones.get(milestone_id) {
            Some(milestone) => milestone,
            None => panic_with_error!(&env, Error::MilestoneNotFound),
        };
        if milestone.status != MilestoneStatus::Pending {
            panic_with_error!(&env, Error::MilestoneNotPending);
        }
        if deliverable_ref.len() == 0 {
            panic_with_error!(&env, Error::EmptyDeliverable);
        }

        milestone.status = MilestoneStatus::Submitted;
        milestone.deliverable_ref = deliverable_ref;
        milestone.submitted_at = env.ledger().timestamp();
        milestones.set(milestone_id, milestone);
        storage::save_milestones(&env, project_id, &milestones);

        events::emit_milestone_submitted(&env, project_id, milestone_id, payee);
    }

    /// Release a submitted milestone's payment as the payer.
    ///
    /// The fee-reduced amount goes to the payee, the fee to the owner; when
    /// this was the last milestone the project completes.
    pub fn approve_milestone(env: Env, payer: Address, project_id: u64, milestone_id: u32) {
        Self::require_not_paused(&env);
        payer.require_auth();
        storage::acquire_lock(&env);

        let (config, mut state) = storage::load_project_pair(&env, project_id);
        access::require_payer(&env, &config, &payer);
        if state.status != ProjectStatus::Active {
            panic_with_error!(&env, Error::ProjectNotActive);
        }

        let mut milestones = storage::load_milestones(&env, project_id);
        Self::require_submitted(&env, &milestones, milestone_id);

        let (payee_amount, fee) =
            payout::release_milestone_payment(&env, &config, &mut state, &mut milestones, milestone_id);

        events::emit_milestone_approved(&env, project_id, milestone_id);
        events::emit_payment_released(&env, project_id, milestone_id, payee_amount, fee);

        storage::release_lock(&env);
    }

    /// Release a milestone that sat submitted-but-unactioned past the
    /// auto-approval window. Deliberately unauthenticated: any caller may
    /// trigger it, so a payer who disappears cannot strand the payee's
    /// funds. Payout is identical to a manual approval.
    pub fn auto_approve_milestone(env: Env, project_id: u64, milestone_id: u32) {
        Self::require_not_paused(&env);
        storage::acquire_lock(&env);

        let (config, mut state) = storage::load_project_pair(&env, project_id);
        if state.status != ProjectStatus::Active {
            panic_with_error!(&env, Error::ProjectNotActive);
        }

        let mut milestones = storage::load_milestones(&env, project_id);
        Self::require_submitted(&env, &milestones, milestone_id);
        let milestone = milestones.get_unchecked(milestone_id);
        if !timeouts::auto_approve_eligible(&milestone, env.ledger().timestamp()) {
            panic_with_error!(&env, Error::AutoApproveNotReady);
        }

        let (payee_amount, fee) =
            payout::release_milestone_payment(&env, &config, &mut state, &mut milestones, milestone_id);

        events::emit_milestone_auto_approved(&env, project_id, milestone_id);
        events::emit_milestone_approved(&env, project_id, milestone_id);
        events::emit_payment_released(&env, project_id, milestone_id, payee_amount, fee);

        storage::release_lock(&env);
    }

    /// Cancel an unaccepted project and refund the full escrowed total to
    /// the payer.
    pub fn cancel_project(env: Env, payer: Address, project_id: u64) {
        Self::require_not_paused(&env);
        payer.require_auth();
        storage::acquire_lock(&env);

        let (config, mut state) = storage::load_project_pair(&env, project_id);
        access::require_payer(&env, &config, &payer);
        if state.payee.is_some() {
            panic_with_error!(&env, Error::AlreadyAccepted);
        }
        if state.status != ProjectStatus::Created {
            panic_with_error!(&env, Error::ProjectNotOpen);
        }

        state.status = ProjectStatus::Cancelled;
        storage::save_project_state(&env, project_id, &state);

        payout::refund_deposit(&env, &config.payer, config.total_amount);

        storage::release_lock(&env);
    }

    // ─────────────────────────────────────────────────────────
    // Arbitration
    // ─────────────────────────────────────────────────────────

    /// Contest a submitted milestone within the dispute window.
    ///
    /// - `initiator` must be the payer or the bound payee.
    /// - Freezes the milestone and the project until the quorum votes.
    pub fn raise_dispute(
        env: Env,
        initiator: Address,
        project_id: u64,
        milestone_id: u32,
        reason: String,
    ) -> u64 {
        Self::require_not_paused(&env);
        initiator.require_auth();

        let (config, mut state) = storage::load_project_pair(&env, project_id);
        access::require_participant(&env, &config, &state, &initiator);
        if state.status != ProjectStatus::Active {
            panic_with_error!(&env, Error::ProjectNotActive);
        }

        let mut milestones = storage::load_milestones(&env, project_id);
        let mut milestone = match milestones.get(milestone_id) {
            Some(milestone) => milestone,
            None => panic_with_error!(&env, Error::MilestoneNotFound),
        };
        if milestone.status != MilestoneStatus::Submitted {
            panic_with_error!(&env, Error::MilestoneNotSubmitted);
        }
        let now = env.ledger().timestamp();
        if !timeouts::within_dispute_window(&milestone, now) {
            panic_with_error!(&env, Error::DisputeWindowElapsed);
        }

        milestone.status = MilestoneStatus::Disputed;
        milestones.set(milestone_id, milestone);
        storage::save_milestones(&env, project_id, &milestones);

        state.status = ProjectStatus::Disputed;
        storage::save_project_state(&env, project_id, &state);

        let dispute_id = storage::get_and_increment_dispute_id(&env);
        let dispute = Dispute {
            id: dispute_id,
            project_id,
            milestone_id,
            initiator: initiator.clone(),
            reason,
            resolved: false,
            created_at: now,
            votes: Vec::new(&env),
        };
        storage::save_dispute(&env, &dispute);

        events::emit_dispute_raised(&env, dispute_id, project_id, milestone_id, initiator);
        dispute_id
    }

    /// Cast an admin vote on an open dispute: the share of the milestone
    /// amount (0–100) the payee should receive. One vote per admin; when the
    /// quorum is reached the dispute resolves synchronously in this same
    /// invocation.
    pub fn vote_on_dispute(env: Env, admin: Address, dispute_id: u64, percentage: u32) {
        Self::require_not_paused(&env);
        admin.require_auth();
        access::require_admin(&env, &admin);
        if percentage > 100 {
            panic_with_error!(&env, Error::InvalidPercentage);
        }
        storage::acquire_lock(&env);

        let mut dispute = storage::load_dispute(&env, dispute_id);
        if dispute.resolved {
            panic_with_error!(&env, Error::DisputeAlreadyResolved);
        }
        if dispute.has_voted(&admin) {
            panic_with_error!(&env, Error::AlreadyVoted);
        }

        dispute.votes.push_back(DisputeVote {
            admin: admin.clone(),
            percentage,
        });
        storage::save_dispute(&env, &dispute);
        events::emit_dispute_voted(&env, dispute_id, admin, percentage);

        if dispute.votes.len() >= DISPUTE_QUORUM {
            Self::resolve_dispute(&env, &mut dispute);
        }

        storage::release_lock(&env);
    }

    // ─────────────────────────────────────────────────────────
    // Reputation
    // ─────────────────────────────────────────────────────────

    /// Record a 1–5 rating for `target`. Any authenticated address may rate
    /// any other; the engine does not require a completed engagement between
    /// them.
    pub fn rate_user(env: Env, rater: Address, target: Address, rating: u32) {
        Self::require_not_paused(&env);
        rater.require_auth();

        if rating < 1 || rating > 5 {
            panic_with_error!(&env, Error::InvalidRating);
        }

        let mut record = storage::get_rating(&env, &target);
        record.total += rating as u64;
        record.count += 1;
        storage::save_rating(&env, &target, &record);

        events::emit_user_rated(&env, target, rater, rating);
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    pub fn get_project(env: Env, project_id: u64) -> Project {
        storage::load_project(&env, project_id)
    }

    pub fn get_project_milestones(env: Env, project_id: u64) -> Vec<Milestone> {
        storage::load_milestones(&env, project_id)
    }

    pub fn get_dispute(env: Env, dispute_id: u64) -> Dispute {
        storage::load_dispute(&env, dispute_id)
    }

    /// Vote tally for a dispute, filtered to current roster membership in
    /// roster enumeration order.
    pub fn get_dispute_votes(env: Env, dispute_id: u64) -> DisputeVotes {
        let dispute = storage::load_dispute(&env, dispute_id);
        let mut voters: Vec<Address> = Vec::new(&env);
        let mut percentages: Vec<u32> = Vec::new(&env);
        for vote in Self::admin_votes(&env, &dispute).iter() {
            voters.push_back(vote.admin);
            percentages.push_back(vote.percentage);
        }
        DisputeVotes {
            vote_count: dispute.votes.len(),
            resolved: dispute.resolved,
            voters,
            percentages,
        }
    }

    pub fn get_user_rating(env: Env, user: Address) -> UserRating {
        storage::get_rating(&env, &user)
    }

    pub fn get_user_projects(env: Env, user: Address) -> Vec<u64> {
        storage::get_user_projects(&env, &user)
    }

    pub fn get_admin_list(env: Env) -> Vec<Address> {
        access::admin_list(&env)
    }

    /// True once `auto_approve_milestone` would succeed for this milestone.
    pub fn can_auto_approve(env: Env, project_id: u64, milestone_id: u32) -> bool {
        let milestones = storage::load_milestones(&env, project_id);
        let milestone = match milestones.get(milestone_id) {
            Some(milestone) => milestone,
            None => panic_with_error!(&env, Error::MilestoneNotFound),
        };
        timeouts::auto_approve_eligible(&milestone, env.ledger().timestamp())
    }

    /// Settlement-token balance held by the engine across all escrows.
    pub fn get_contract_balance(env: Env) -> i128 {
        payout::contract_balance(&env)
    }

    pub fn get_platform_fee(env: Env) -> u32 {
        storage::get_fee_percent(&env)
    }

    pub fn is_paused(env: Env) -> bool {
        storage::is_paused(&env)
    }

    /// Number of projects ever created; ids are never reused.
    pub fn get_project_count(env: Env) -> u64 {
        storage::get_project_count(&env)
    }

    // ─────────────────────────────────────────────────────────
    // Internal Helpers
    // ─────────────────────────────────────────────────────────

    fn require_not_paused(env: &Env) {
        if storage::is_paused(env) {
            panic_with_error!(env, Error::EnginePaused);
        }
    }

    /// Assert the milestone exists and is `Submitted`.
    fn require_submitted(env: &Env, milestones: &Vec<Milestone>, milestone_id: u32) {
        match milestones.get(milestone_id) {
            Some(milestone) => {
                if milestone.status != MilestoneStatus::Submitted {
                    panic_with_error!(env, Error::MilestoneNotSubmitted);
                }
            }
            None => panic_with_error!(env, Error::MilestoneNotFound),
        }
    }

    /// The dispute's votes restricted to current admins, in roster
    /// enumeration order; the owner's vote comes last when the owner no
    /// longer holds a roster seat. Votes of since-removed admins are
    /// dropped.
    fn admin_votes(env: &Env, dispute: &Dispute) -> Vec<DisputeVote> {
        let mut filtered: Vec<DisputeVote> = Vec::new(env);
        let admins = access::admin_list(env);
        for admin in admins.iter() {
            if let Some(percentage) = dispute.vote_of(&admin) {
                filtered.push_back(DisputeVote { admin, percentage });
            }
        }
        let owner = storage::get_owner(env);
        if !admins.contains(&owner) {
            if let Some(percentage) = dispute.vote_of(&owner) {
                filtered.push_back(DisputeVote {
                    admin: owner,
                    percentage,
                });
            }
        }
        filtered
    }

    /// Floor-average of the percentages submitted by admins still holding
    /// voting rights.
    fn quorum_average(env: &Env, dispute: &Dispute) -> u32 {
        let mut sum: u64 = 0;
        let mut count: u64 = 0;
        for vote in Self::admin_votes(env, dispute).iter() {
            sum += vote.percentage as u64;
            count += 1;
        }
        if count == 0 {
            // The vote that crossed the quorum came from a current admin,
            // so at least one vote is always counted.
            return 0;
        }
        (sum / count) as u32
    }

    /// Settle a dispute that reached the quorum: mark everything before any
    /// token moves, then split the milestone amount by the vote average.
    ///
    /// The project returns to `Active` without re-checking completion, even
    /// when the disputed milestone was the last pending one.
    fn resolve_dispute(env: &Env, dispute: &mut Dispute) {
        dispute.resolved = true;
        storage::save_dispute(env, dispute);

        let (config, mut state) = storage::load_project_pair(env, dispute.project_id);
        let mut milestones = storage::load_milestones(env, dispute.project_id);
        let mut milestone = match milestones.get(dispute.milestone_id) {
            Some(milestone) => milestone,
            None => panic_with_error!(env, Error::MilestoneNotFound),
        };
        let payee = match &state.payee {
            Some(payee) => payee.clone(),
            None => panic_with_error!(env, Error::ProjectNotActive),
        };

        let avg = Self::quorum_average(env, dispute);
        let amount = milestone.amount;

        milestone.status = MilestoneStatus::Approved;
        milestones.set(dispute.milestone_id, milestone);
        storage::save_milestones(env, config.id, &milestones);

        state.status = ProjectStatus::Active;
        storage::save_project_state(env, config.id, &state);

        payout::settle_dispute_split(env, &config.payer, &payee, amount, avg);

        events::emit_dispute_resolved(env, dispute.id, config.id, dispute.milestone_id, avg);
    }
}
