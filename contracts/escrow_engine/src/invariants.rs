#![allow(dead_code)]

extern crate std;

use soroban_sdk::Vec;

use crate::payout;
use crate::types::{Milestone, MilestoneStatus, Project, ProjectStatus};

/// INV-1: the escrowed total always equals the sum of milestone amounts.
pub fn assert_milestone_sum(project: &Project, milestones: &Vec<Milestone>) {
    let mut sum: i128 = 0;
    for milestone in milestones.iter() {
        sum += milestone.amount;
    }
    assert_eq!(
        project.total_amount, sum,
        "INV-1 violated: project {} total {} != milestone sum {}",
        project.id, project.total_amount, sum
    );
}

/// INV-2: fee arithmetic reconstructs the milestone amount exactly, and the
/// fee is the floored percentage.
pub fn assert_fee_conservation(amount: i128, fee_percent: u32) {
    let (fee, payee_amount) = payout::fee_split(amount, fee_percent);
    assert_eq!(
        fee + payee_amount,
        amount,
        "INV-2 violated: {} + {} != {}",
        fee,
        payee_amount,
        amount
    );
    assert_eq!(
        fee,
        amount * fee_percent as i128 / 100,
        "INV-2 violated: fee {} is not floor({} * {} / 100)",
        fee,
        amount,
        fee_percent
    );
}

/// INV-3: every milestone amount is positive.
pub fn assert_amounts_positive(milestones: &Vec<Milestone>) {
    for (i, milestone) in milestones.iter().enumerate() {
        assert!(
            milestone.amount > 0,
            "INV-3 violated: milestone {} has non-positive amount ({})",
            i,
            milestone.amount
        );
    }
}

/// INV-4: project status transition validity. Only these edges exist:
///   Created  -> Active | Cancelled
///   Active   -> Disputed | Completed
///   Disputed -> Active
pub fn assert_valid_project_transition(from: &ProjectStatus, to: &ProjectStatus) {
    let valid = matches!(
        (from, to),
        (ProjectStatus::Created, ProjectStatus::Active)
            | (ProjectStatus::Created, ProjectStatus::Cancelled)
            | (ProjectStatus::Active, ProjectStatus::Disputed)
            | (ProjectStatus::Active, ProjectStatus::Completed)
            | (ProjectStatus::Disputed, ProjectStatus::Active)
    );

    assert!(
        valid,
        "INV-4 violated: invalid project transition from {:?} to {:?}",
        from, to
    );
}

/// INV-5: milestone status transition validity. `Approved` is terminal and
/// `Rejected` is unreachable.
pub fn assert_valid_milestone_transition(from: &MilestoneStatus, to: &MilestoneStatus) {
    let valid = matches!(
        (from, to),
        (MilestoneStatus::Pending, MilestoneStatus::Submitted)
            | (MilestoneStatus::Submitted, MilestoneStatus::Approved)
            | (MilestoneStatus::Submitted, MilestoneStatus::Disputed)
            | (MilestoneStatus::Disputed, MilestoneStatus::Approved)
    );

    assert!(
        valid,
        "INV-5 violated: invalid milestone transition from {:?} to {:?}",
        from, to
    );
}

/// INV-6: project IDs are sequential starting from 0.
pub fn assert_sequential_ids(projects: &[Project]) {
    for (i, project) in projects.iter().enumerate() {
        assert_eq!(
            project.id, i as u64,
            "INV-6 violated: expected id {}, got {}",
            i, project.id
        );
    }
}

/// INV-7: fields written at creation never change afterward.
pub fn assert_project_immutable_fields(original: &Project, current: &Project) {
    assert_eq!(original.id, current.id, "INV-7 violated: project id changed");
    assert_eq!(
        original.payer, current.payer,
        "INV-7 violated: project payer changed"
    );
    assert_eq!(
        original.title, current.title,
        "INV-7 violated: project title changed"
    );
    assert_eq!(
        original.description_ref, current.description_ref,
        "INV-7 violated: project description_ref changed"
    );
    assert_eq!(
        original.total_amount, current.total_amount,
        "INV-7 violated: project total_amount changed"
    );
    assert_eq!(
        original.created_at, current.created_at,
        "INV-7 violated: project created_at changed"
    );
}

/// Run all stateless project invariants.
pub fn assert_all_project_invariants(project: &Project, milestones: &Vec<Milestone>) {
    assert_milestone_sum(project, milestones);
    assert_amounts_positive(milestones);
    assert!(
        project.total_amount > 0,
        "project {} has non-positive total",
        project.id
    );
}
