use soroban_sdk::{contracttype, symbol_short, Address, Env, String};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectCreated {
    pub project_id: u64,
    pub payer: Address,
    pub title: String,
    pub total_amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundsDeposited {
    pub project_id: u64,
    pub payer: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectAccepted {
    pub project_id: u64,
    pub payee: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MilestoneSubmitted {
    pub project_id: u64,
    pub milestone_id: u32,
    pub payee: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MilestoneApproved {
    pub project_id: u64,
    pub milestone_id: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MilestoneAutoApproved {
    pub project_id: u64,
    pub milestone_id: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PaymentReleased {
    pub project_id: u64,
    pub milestone_id: u32,
    pub payee_amount: i128,
    pub fee: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DisputeRaised {
    pub dispute_id: u64,
    pub project_id: u64,
    pub milestone_id: u32,
    pub initiator: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DisputeVoted {
    pub dispute_id: u64,
    pub admin: Address,
    pub percentage: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DisputeResolved {
    pub dispute_id: u64,
    pub project_id: u64,
    pub milestone_id: u32,
    pub payee_percentage: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserRated {
    pub target: Address,
    pub rater: Address,
    pub rating: u32,
}

pub fn emit_project_created(
    env: &Env,
    project_id: u64,
    payer: Address,
    title: String,
    total_amount: i128,
) {
    let topics = (symbol_short!("created"), project_id);
    let data = ProjectCreated {
        project_id,
        payer,
        title,
        total_amount,
    };
    env.events().publish(topics, data);
}

pub fn emit_funds_deposited(env: &Env, project_id: u64, payer: Address, amount: i128) {
    let topics = (symbol_short!("deposited"), project_id);
    let data = FundsDeposited {
        project_id,
        payer,
        amount,
    };
    env.events().publish(topics, data);
}

pub fn emit_project_accepted(env: &Env, project_id: u64, payee: Address) {
    let topics = (symbol_short!("accepted"), project_id);
    let data = ProjectAccepted { project_id, payee };
    env.events().publish(topics, data);
}

pub fn emit_milestone_submitted(env: &Env, project_id: u64, milestone_id: u32, payee: Address) {
    let topics = (symbol_short!("submitted"), project_id);
    let data = MilestoneSubmitted {
        project_id,
        milestone_id,
        payee,
    };
    env.events().publish(topics, data);
}

pub fn emit_milestone_approved(env: &Env, project_id: u64, milestone_id: u32) {
    let topics = (symbol_short!("approved"), project_id);
    let data = MilestoneApproved {
        project_id,
        milestone_id,
    };
    env.events().publish(topics, data);
}

pub fn emit_milestone_auto_approved(env: &Env, project_id: u64, milestone_id: u32) {
    let topics = (symbol_short!("auto_appr"), project_id);
    let data = MilestoneAutoApproved {
        project_id,
        milestone_id,
    };
    env.events().publish(topics, data);
}

pub fn emit_payment_released(
    env: &Env,
    project_id: u64,
    milestone_id: u32,
    payee_amount: i128,
    fee: i128,
) {
    let topics = (symbol_short!("released"), project_id);
    let data = PaymentReleased {
        project_id,
        milestone_id,
        payee_amount,
        fee,
    };
    env.events().publish(topics, data);
}

pub fn emit_dispute_raised(
    env: &Env,
    dispute_id: u64,
    project_id: u64,
    milestone_id: u32,
    initiator: Address,
) {
    let topics = (symbol_short!("disputed"), dispute_id);
    let data = DisputeRaised {
        dispute_id,
        project_id,
        milestone_id,
        initiator,
    };
    env.events().publish(topics, data);
}

pub fn emit_dispute_voted(env: &Env, dispute_id: u64, admin: Address, percentage: u32) {
    let topics = (symbol_short!("voted"), dispute_id);
    let data = DisputeVoted {
        dispute_id,
        admin,
        percentage,
    };
    env.events().publish(topics, data);
}

pub fn emit_dispute_resolved(
    env: &Env,
    dispute_id: u64,
    project_id: u64,
    milestone_id: u32,
    payee_percentage: u32,
) {
    let topics = (symbol_short!("resolved"), dispute_id);
    let data = DisputeResolved {
        dispute_id,
        project_id,
        milestone_id,
        payee_percentage,
    };
    env.events().publish(topics, data);
}

pub fn emit_user_rated(env: &Env, target: Address, rater: Address, rating: u32) {
    let topics = (symbol_short!("rated"), target.clone());
    let data = UserRated {
        target,
        rater,
        rating,
    };
    env.events().publish(topics, data);
}

pub fn emit_admin_added(env: &Env, admin: Address) {
    env.events()
        .publish((symbol_short!("adm_add"), admin.clone()), admin);
}

pub fn emit_admin_removed(env: &Env, admin: Address) {
    env.events()
        .publish((symbol_short!("adm_del"), admin.clone()), admin);
}

pub fn emit_paused(env: &Env, owner: Address) {
    env.events().publish((symbol_short!("paused"),), owner);
}

pub fn emit_unpaused(env: &Env, owner: Address) {
    env.events().publish((symbol_short!("unpaused"),), owner);
}
