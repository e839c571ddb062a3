//! # Timeouts
//!
//! Pure time predicates over milestone submission timestamps. Both windows
//! anchor on `submitted_at` and are evaluated once per operation against the
//! invocation's ledger timestamp, never polled.

use crate::types::{Milestone, MilestoneStatus};

/// Participants may contest a submitted milestone for 3 days.
pub const DISPUTE_WINDOW: u64 = 3 * 86_400;

/// Anyone may force-release a submitted milestone after 7 days.
pub const AUTO_APPROVE_WINDOW: u64 = 7 * 86_400;

/// True while a dispute may still be raised against `milestone`.
pub fn within_dispute_window(milestone: &Milestone, now: u64) -> bool {
    now <= milestone.submitted_at.saturating_add(DISPUTE_WINDOW)
}

/// True once `milestone` sat submitted-but-unactioned long enough for the
/// permissionless release path.
pub fn auto_approve_eligible(milestone: &Milestone, now: u64) -> bool {
    milestone.status == MilestoneStatus::Submitted
        && now >= milestone.submitted_at.saturating_add(AUTO_APPROVE_WINDOW)
}
