//! # Access control
//!
//! Capability checks for the engine's three authority sources:
//!
//! ```text
//! Owner ──────── governs roster membership, fees, pause
//! Admin roster ─ votes on disputes (owner is the first member)
//! Project roles ─ payer / payee / participant, per project
//! ```
//!
//! ## Storage layout
//!
//! - `DataKey::Owner`  → `Address`      — the one and only owner.
//! - `DataKey::Admins` → `Vec<Address>` — ordered roster, never empty.
//!
//! ## Roster semantics
//!
//! The roster is an order-preserving list used for deterministic enumeration
//! in vote tallies. Removal swaps the target with the last element and
//! truncates, so enumeration order changes after a removal; membership
//! semantics do not. The roster can never be emptied — removing the last
//! member is rejected — and `is_admin` also accepts the owner even after the
//! owner's roster entry is removed.
//!
//! Every roster mutation emits an event so off-chain indexers can
//! reconstruct membership history.

use soroban_sdk::{Address, Env, Vec};

use crate::types::{ProjectConfig, ProjectState};
use crate::{events, storage, Error};

// ─────────────────────────────────────────────────────────
// Initialisation
// ─────────────────────────────────────────────────────────

/// Bind the owner and seed the roster with them. Must be called exactly
/// once, from `init`. Panics with `AlreadyInitialized` on a second call.
pub fn init_owner(env: &Env, owner: &Address) {
    if storage::has_owner(env) {
        panic_auth(env, Error::AlreadyInitialized);
    }
    storage::set_owner(env, owner);

    let mut admins = Vec::new(env);
    admins.push_back(owner.clone());
    storage::set_admins(env, &admins);

    events::emit_admin_added(env, owner.clone());
}

// ─────────────────────────────────────────────────────────
// Roster mutation
// ─────────────────────────────────────────────────────────

/// Append `admin` to the roster.
///
/// - `caller` must be the owner.
/// - Duplicates are rejected.
///
/// Emits an `AdminAdded` event.
pub fn add_admin(env: &Env, caller: &Address, admin: &Address) {
    require_owner(env, caller);

    let mut admins = storage::get_admins(env);
    if admins.contains(admin) {
        panic_auth(env, Error::AdminAlreadyExists);
    }
    admins.push_back(admin.clone());
    storage::set_admins(env, &admins);

    events::emit_admin_added(env, admin.clone());
}

/// Remove `admin` from the roster by swap-and-truncate.
///
/// - `caller` must be the owner.
/// - Removing a non-member or the last remaining member is rejected.
///
/// Emits an `AdminRemoved` event.
pub fn remove_admin(env: &Env, caller: &Address, admin: &Address) {
    require_owner(env, caller);

    let mut admins = storage::get_admins(env);
    let index = match admins.first_index_of(admin) {
        Some(index) => index,
        None => panic_auth(env, Error::AdminNotFound),
    };
    if admins.len() <= 1 {
        panic_auth(env, Error::LastAdmin);
    }

    // Swap with the last element, then truncate.
    if let Some(last) = admins.last() {
        admins.set(index, last);
    }
    admins.pop_back();
    storage::set_admins(env, &admins);

    events::emit_admin_removed(env, admin.clone());
}

/// The roster in its current enumeration order.
pub fn admin_list(env: &Env) -> Vec<Address> {
    storage::get_admins(env)
}

// ─────────────────────────────────────────────────────────
// Capability guards (called from lib.rs handlers)
// ─────────────────────────────────────────────────────────

/// True if `address` may vote on disputes: a roster member, or the owner.
pub fn is_admin(env: &Env, address: &Address) -> bool {
    if storage::get_admins(env).contains(address) {
        return true;
    }
    *address == storage::get_owner(env)
}

/// Assert that `address` is the owner.
pub fn require_owner(env: &Env, address: &Address) {
    if *address != storage::get_owner(env) {
        panic_auth(env, Error::NotAuthorized);
    }
}

/// Assert that `address` may vote on disputes.
pub fn require_admin(env: &Env, address: &Address) {
    if !is_admin(env, address) {
        panic_auth(env, Error::NotAuthorized);
    }
}

/// Assert that `address` is the project's payer.
pub fn require_payer(env: &Env, config: &ProjectConfig, address: &Address) {
    if *address != config.payer {
        panic_auth(env, Error::NotAuthorized);
    }
}

/// Assert that `address` is the project's bound payee.
pub fn require_payee(env: &Env, state: &ProjectState, address: &Address) {
    match &state.payee {
        Some(payee) if payee == address => {}
        _ => panic_auth(env, Error::NotAuthorized),
    }
}

/// Assert that `address` is the payer or the bound payee.
pub fn require_participant(
    env: &Env,
    config: &ProjectConfig,
    state: &ProjectState,
    address: &Address,
) {
    if *address == config.payer {
        return;
    }
    if let Some(payee) = &state.payee {
        if payee == address {
            return;
        }
    }
    panic_auth(env, Error::NotAuthorized);
}

/// Thin wrapper so we can call panic_with_error from inside access.rs
/// without importing the macro from the parent.
#[inline(always)]
fn panic_auth(env: &Env, err: Error) -> ! {
    soroban_sdk::panic_with_error!(env, err)
}
