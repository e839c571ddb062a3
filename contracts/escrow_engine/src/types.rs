//! # Types
//!
//! Shared data structures used across all modules of the escrow engine.
//!
//! ## Design decisions
//!
//! ### Config / State split
//!
//! A `Project` is internally stored as two separate ledger entries:
//!
//! - [`ProjectConfig`] — written once at creation; never mutated.
//! - [`ProjectState`] — written on acceptance, disputes, and releases.
//!
//! The public API exposes the reconstructed [`Project`] struct for convenience.
//!
//! ### Status as a Finite-State Machine
//!
//! [`ProjectStatus`] enforces a strict forward-only lifecycle:
//!
//! ```text
//! Created ──► Active ──► Completed
//!     │        │  ▲
//!     │        ▼  │
//!     │       Disputed
//!     └──► Cancelled
//! ```
//!
//! `Disputed → Active` is the single backward edge, taken when a quorum vote
//! settles the dispute. Every other backward transition is rejected.
//!
//! [`MilestoneStatus`] is forward-only with no exceptions:
//!
//! ```text
//! Pending ──► Submitted ──► Approved
//!                 │            ▲
//!                 ▼            │
//!              Disputed ───────┘
//! ```
//!
//! `Approved` is terminal and gates the payout exactly once.

use soroban_sdk::{contracttype, Address, String, Vec};

/// Current lifecycle state of an escrowed project.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProjectStatus {
    /// Funds deposited, waiting for a payee to accept.
    Created,
    /// Payee bound; milestones may be submitted and released.
    Active,
    /// A milestone is under dispute; lifecycle frozen until the quorum votes.
    Disputed,
    /// Every milestone approved and paid out.
    Completed,
    /// Cancelled by the payer before acceptance; deposit refunded.
    Cancelled,
}

/// Lifecycle state of a single milestone.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MilestoneStatus {
    /// Created with the project; no deliverable yet.
    Pending,
    /// Deliverable reference recorded; dispute/auto-approve windows running.
    Submitted,
    /// Released. Terminal.
    Approved,
    /// Under dispute; leaves this state only via quorum resolution.
    Disputed,
    /// Declared in the model but never produced by any transition.
    Rejected,
}

/// Immutable project data, written once at creation.
///
/// Stored separately from mutable state so the frequent lifecycle writes
/// (acceptance, submissions, releases) never rewrite titles and references.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectConfig {
    pub id: u64,
    pub payer: Address,
    pub title: String,
    /// Opaque content-addressed reference to the project description.
    /// Stored and echoed back verbatim; never interpreted.
    pub description_ref: String,
    /// Sum of all milestone amounts; the escrowed total.
    pub total_amount: i128,
    pub created_at: u64,
}

/// Mutable project state, updated as the lifecycle advances.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectState {
    /// Bound once by `accept_project`; `None` until then.
    pub payee: Option<Address>,
    pub status: ProjectStatus,
    /// Ledger timestamp of acceptance; 0 until accepted.
    pub accepted_at: u64,
    pub funds_deposited: bool,
}

/// Full representation of a project — the public API return type,
/// reconstructed from the split `ProjectConfig` + `ProjectState` entries.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Project {
    /// Auto-incremented unique ID.
    pub id: u64,
    /// Address that created the project and deposited the escrow.
    pub payer: Address,
    /// Counterparty receiving milestone payouts; bound once at acceptance.
    pub payee: Option<Address>,
    pub title: String,
    pub description_ref: String,
    /// Escrowed total; equals the sum of milestone amounts, forever.
    pub total_amount: i128,
    pub status: ProjectStatus,
    pub created_at: u64,
    pub accepted_at: u64,
    pub funds_deposited: bool,
}

/// One deliverable of a project, identified by its index in the project's
/// milestone list.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Milestone {
    pub description: String,
    /// Payout for this milestone, in the smallest token unit. Always > 0.
    pub amount: i128,
    /// Agreed completion time; strictly after creation time.
    pub deadline: u64,
    pub status: MilestoneStatus,
    /// Opaque deliverable reference; empty until submitted.
    pub deliverable_ref: String,
    /// Ledger timestamp of submission; 0 until submitted. Anchors the
    /// dispute and auto-approval windows.
    pub submitted_at: u64,
}

/// A single admin's vote on a dispute.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DisputeVote {
    pub admin: Address,
    /// Share of the milestone amount awarded to the payee, 0–100.
    pub percentage: u32,
}

/// A disagreement over one submitted milestone.
///
/// Votes are kept as an ordered table scoped to the dispute; presence of an
/// admin in the table is the has-voted flag, and its length is the vote
/// count. At most one unresolved dispute exists per (project, milestone) —
/// disputing requires `Submitted` and immediately moves the milestone to
/// `Disputed`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Dispute {
    pub id: u64,
    pub project_id: u64,
    pub milestone_id: u32,
    pub initiator: Address,
    pub reason: String,
    pub resolved: bool,
    pub created_at: u64,
    pub votes: Vec<DisputeVote>,
}

impl Dispute {
    /// The percentage `admin` voted, if they voted.
    pub fn vote_of(&self, admin: &Address) -> Option<u32> {
        for vote in self.votes.iter() {
            if &vote.admin == admin {
                return Some(vote.percentage);
            }
        }
        None
    }

    pub fn has_voted(&self, admin: &Address) -> bool {
        self.vote_of(admin).is_some()
    }
}

/// Vote tally view returned by `get_dispute_votes`.
///
/// `voters` and `percentages` are parallel lists filtered to current admin
/// roster membership, in roster enumeration order. `vote_count` is the total
/// number of recorded votes, including any cast by since-removed admins.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DisputeVotes {
    pub vote_count: u32,
    pub resolved: bool,
    pub voters: Vec<Address>,
    pub percentages: Vec<u32>,
}

/// Cumulative rating record for one address.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserRating {
    /// Sum of all ratings received (each 1–5).
    pub total: u64,
    pub count: u64,
}
