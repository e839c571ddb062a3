//! # Storage
//!
//! Provides typed helpers over Soroban's two storage tiers used by the engine:
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key            | Type           | Description                          |
//! |----------------|----------------|--------------------------------------|
//! | `Owner`        | `Address`      | Platform owner set at `init`         |
//! | `Token`        | `Address`      | Settlement token set at `init`       |
//! | `Admins`       | `Vec<Address>` | Ordered dispute-voter roster         |
//! | `ProjectCount` | `u64`          | Auto-increment project ID counter    |
//! | `DisputeCount` | `u64`          | Auto-increment dispute ID counter    |
//! | `FeePercent`   | `u32`          | Platform fee, 0–10 (default 2)       |
//! | `Paused`       | `bool`         | Circuit-breaker flag                 |
//! | `Lock`         | `bool`         | Re-entrancy lock                     |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                  | Type             | Description                     |
//! |----------------------|------------------|---------------------------------|
//! | `ProjConfig(id)`     | `ProjectConfig`  | Immutable project data          |
//! | `ProjState(id)`      | `ProjectState`   | Mutable project lifecycle state |
//! | `Milestones(id)`     | `Vec<Milestone>` | Ordered milestone list          |
//! | `Dispute(id)`        | `Dispute`        | Dispute record with vote table  |
//! | `UserProjects(addr)` | `Vec<u64>`       | Project ids per participant     |
//! | `Rating(addr)`       | `UserRating`     | Cumulative rating per address   |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days
//! remaining.

use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::types::{Dispute, Milestone, Project, ProjectConfig, ProjectState, UserRating};
use crate::Error;

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

/// Fee charged on approved releases when the owner never set one.
pub const DEFAULT_FEE_PERCENT: u32 = 2;

// ── Storage Keys ─────────────────────────────────────────────────────

/// All contract storage keys.
///
/// Instance-tier keys hold process-wide configuration and live as long as
/// the contract. Persistent-tier keys hold per-entity records with
/// independent TTLs.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Platform owner (Instance).
    Owner,
    /// Settlement token contract (Instance).
    Token,
    /// Ordered admin roster (Instance).
    Admins,
    /// Global auto-increment counter for project IDs (Instance).
    ProjectCount,
    /// Global auto-increment counter for dispute IDs (Instance).
    DisputeCount,
    /// Platform fee percentage (Instance).
    FeePercent,
    /// Circuit-breaker flag (Instance).
    Paused,
    /// Re-entrancy lock (Instance).
    Lock,
    /// Immutable project data keyed by ID (Persistent).
    ProjConfig(u64),
    /// Mutable project state keyed by ID (Persistent).
    ProjState(u64),
    /// Milestone list keyed by project ID (Persistent).
    Milestones(u64),
    /// Dispute record keyed by ID (Persistent).
    Dispute(u64),
    /// Project ids a user participates in (Persistent).
    UserProjects(Address),
    /// Cumulative rating for an address (Persistent).
    Rating(Address),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

/// Extend instance storage TTL if it falls below the threshold.
fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

/// Store the owner address. Called exactly once, from `init`.
pub fn set_owner(env: &Env, owner: &Address) {
    bump_instance(env);
    env.storage().instance().set(&DataKey::Owner, owner);
}

/// Read the owner address. Panics with `NotInitialized` before `init`.
pub fn get_owner(env: &Env) -> Address {
    bump_instance(env);
    match env.storage().instance().get(&DataKey::Owner) {
        Some(owner) => owner,
        None => soroban_sdk::panic_with_error!(env, Error::NotInitialized),
    }
}

pub fn has_owner(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Owner)
}

/// Store the settlement token address. Called exactly once, from `init`.
pub fn set_token(env: &Env, token: &Address) {
    bump_instance(env);
    env.storage().instance().set(&DataKey::Token, token);
}

/// Read the settlement token address. Panics with `NotInitialized` before `init`.
pub fn get_token(env: &Env) -> Address {
    bump_instance(env);
    match env.storage().instance().get(&DataKey::Token) {
        Some(token) => token,
        None => soroban_sdk::panic_with_error!(env, Error::NotInitialized),
    }
}

pub fn get_admins(env: &Env) -> Vec<Address> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Admins)
        .unwrap_or_else(|| Vec::new(env))
}

pub fn set_admins(env: &Env, admins: &Vec<Address>) {
    bump_instance(env);
    env.storage().instance().set(&DataKey::Admins, admins);
}

pub fn get_fee_percent(env: &Env) -> u32 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::FeePercent)
        .unwrap_or(DEFAULT_FEE_PERCENT)
}

pub fn set_fee_percent(env: &Env, percent: u32) {
    bump_instance(env);
    env.storage().instance().set(&DataKey::FeePercent, &percent);
}

pub fn is_paused(env: &Env) -> bool {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Paused)
        .unwrap_or(false)
}

pub fn set_paused(env: &Env, paused: bool) {
    bump_instance(env);
    env.storage().instance().set(&DataKey::Paused, &paused);
}

// ─────────────────────────────────────────────────────────
// Re-entrancy lock
// ─────────────────────────────────────────────────────────

/// Take the transfer lock, panicking with `ReentrancyLocked` if it is
/// already held. A panic rolls back the whole invocation, so error paths
/// never leave the lock stuck.
pub fn acquire_lock(env: &Env) {
    let locked: bool = env
        .storage()
        .instance()
        .get(&DataKey::Lock)
        .unwrap_or(false);
    if locked {
        soroban_sdk::panic_with_error!(env, Error::ReentrancyLocked);
    }
    env.storage().instance().set(&DataKey::Lock, &true);
}

/// Drop the transfer lock at the end of the success path.
pub fn release_lock(env: &Env) {
    env.storage().instance().set(&DataKey::Lock, &false);
}

// ─────────────────────────────────────────────────────────
// ID counters
// ─────────────────────────────────────────────────────────

/// Atomically read and increment the project counter.
/// Returns the ID that should be used for the next project.
pub fn get_and_increment_project_id(env: &Env) -> u64 {
    bump_instance(env);
    let current: u64 = env
        .storage()
        .instance()
        .get(&DataKey::ProjectCount)
        .unwrap_or(0);
    env.storage()
        .instance()
        .set(&DataKey::ProjectCount, &(current + 1));
    current
}

/// Number of projects ever created. Ids are never reused, so this is also
/// the next id to be assigned.
pub fn get_project_count(env: &Env) -> u64 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::ProjectCount)
        .unwrap_or(0)
}

/// Atomically read and increment the dispute counter.
pub fn get_and_increment_dispute_id(env: &Env) -> u64 {
    bump_instance(env);
    let current: u64 = env
        .storage()
        .instance()
        .get(&DataKey::DisputeCount)
        .unwrap_or(0);
    env.storage()
        .instance()
        .set(&DataKey::DisputeCount, &(current + 1));
    current
}

// ── Persistent Storage Helpers ───────────────────────────────────────

/// Extend the TTL for a persistent storage key.
fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// Save the immutable config, initial state, and milestone list for a new
/// project.
pub fn save_new_project(
    env: &Env,
    config: &ProjectConfig,
    state: &ProjectState,
    milestones: &Vec<Milestone>,
) {
    let config_key = DataKey::ProjConfig(config.id);
    env.storage().persistent().set(&config_key, config);
    bump_persistent(env, &config_key);

    save_project_state(env, config.id, state);
    save_milestones(env, config.id, milestones);
}

/// Load the full `Project` by combining config and state.
pub fn load_project(env: &Env, id: u64) -> Project {
    let config = load_project_config(env, id);
    let state = load_project_state(env, id);
    Project {
        id: config.id,
        payer: config.payer,
        payee: state.payee,
        title: config.title,
        description_ref: config.description_ref,
        total_amount: config.total_amount,
        status: state.status,
        created_at: config.created_at,
        accepted_at: state.accepted_at,
        funds_deposited: state.funds_deposited,
    }
}

/// Load only the immutable project config.
/// Panics with `ProjectNotFound` if the project does not exist.
pub fn load_project_config(env: &Env, id: u64) -> ProjectConfig {
    let key = DataKey::ProjConfig(id);
    let config: ProjectConfig = match env.storage().persistent().get(&key) {
        Some(config) => config,
        None => soroban_sdk::panic_with_error!(env, Error::ProjectNotFound),
    };
    bump_persistent(env, &key);
    config
}

/// Load only the mutable project state.
pub fn load_project_state(env: &Env, id: u64) -> ProjectState {
    let key = DataKey::ProjState(id);
    let state: ProjectState = match env.storage().persistent().get(&key) {
        Some(state) => state,
        None => soroban_sdk::panic_with_error!(env, Error::ProjectNotFound),
    };
    bump_persistent(env, &key);
    state
}

/// Read both config and state with a single helper that bumps TTLs together.
pub fn load_project_pair(env: &Env, id: u64) -> (ProjectConfig, ProjectState) {
    (load_project_config(env, id), load_project_state(env, id))
}

/// Save only the mutable project state.
pub fn save_project_state(env: &Env, id: u64, state: &ProjectState) {
    let key = DataKey::ProjState(id);
    env.storage().persistent().set(&key, state);
    bump_persistent(env, &key);
}

/// Load a project's milestone list.
pub fn load_milestones(env: &Env, project_id: u64) -> Vec<Milestone> {
    let key = DataKey::Milestones(project_id);
    let milestones: Vec<Milestone> = match env.storage().persistent().get(&key) {
        Some(milestones) => milestones,
        None => soroban_sdk::panic_with_error!(env, Error::ProjectNotFound),
    };
    bump_persistent(env, &key);
    milestones
}

pub fn save_milestones(env: &Env, project_id: u64, milestones: &Vec<Milestone>) {
    let key = DataKey::Milestones(project_id);
    env.storage().persistent().set(&key, milestones);
    bump_persistent(env, &key);
}

/// Load a dispute record. Panics with `DisputeNotFound` if absent.
pub fn load_dispute(env: &Env, id: u64) -> Dispute {
    let key = DataKey::Dispute(id);
    let dispute: Dispute = match env.storage().persistent().get(&key) {
        Some(dispute) => dispute,
        None => soroban_sdk::panic_with_error!(env, Error::DisputeNotFound),
    };
    bump_persistent(env, &key);
    dispute
}

pub fn save_dispute(env: &Env, dispute: &Dispute) {
    let key = DataKey::Dispute(dispute.id);
    env.storage().persistent().set(&key, dispute);
    bump_persistent(env, &key);
}

// ─────────────────────────────────────────────────────────
// User indexes
// ─────────────────────────────────────────────────────────

/// Append `project_id` to `user`'s project index.
pub fn add_user_project(env: &Env, user: &Address, project_id: u64) {
    let key = DataKey::UserProjects(user.clone());
    let mut projects: Vec<u64> = env
        .storage()
        .persistent()
        .get(&key)
        .unwrap_or_else(|| Vec::new(env));
    projects.push_back(project_id);
    env.storage().persistent().set(&key, &projects);
    bump_persistent(env, &key);
}

pub fn get_user_projects(env: &Env, user: &Address) -> Vec<u64> {
    let key = DataKey::UserProjects(user.clone());
    let projects: Vec<u64> = env
        .storage()
        .persistent()
        .get(&key)
        .unwrap_or_else(|| Vec::new(env));
    if !projects.is_empty() {
        bump_persistent(env, &key);
    }
    projects
}

// ─────────────────────────────────────────────────────────
// Ratings
// ─────────────────────────────────────────────────────────

pub fn get_rating(env: &Env, user: &Address) -> UserRating {
    let key = DataKey::Rating(user.clone());
    let rating: Option<UserRating> = env.storage().persistent().get(&key);
    match rating {
        Some(rating) => {
            bump_persistent(env, &key);
            rating
        }
        None => UserRating { total: 0, count: 0 },
    }
}

pub fn save_rating(env: &Env, user: &Address, rating: &UserRating) {
    let key = DataKey::Rating(user.clone());
    env.storage().persistent().set(&key, rating);
    bump_persistent(env, &key);
}
