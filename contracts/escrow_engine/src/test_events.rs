#![cfg(test)]

extern crate std;

use soroban_sdk::{
    testutils::{Address as _, Events},
    token, vec, symbol_short, Address, Env, IntoVal, String, TryIntoVal, Vec,
};

use crate::events::{
    DisputeRaised, DisputeResolved, DisputeVoted, FundsDeposited, PaymentReleased, ProjectAccepted,
    ProjectCreated, UserRated,
};
use crate::{EscrowEngine, EscrowEngineClient};

// ─── Helpers ─────────────────────────────────────────────

fn setup() -> (Env, EscrowEngineClient<'static>, Address, Address) {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(EscrowEngine, ());
    let client = EscrowEngineClient::new(&env, &contract_id);
    let owner = Address::generate(&env);
    let token_admin = Address::generate(&env);
    let token = env.register_stellar_asset_contract_v2(token_admin);
    client.init(&owner, &token.address());
    (env, client, owner, token.address())
}

fn create_project(
    env: &Env,
    client: &EscrowEngineClient,
    token: &Address,
    payer: &Address,
    amount: i128,
) -> u64 {
    token::StellarAssetClient::new(env, token).mint(payer, &amount);
    let deadline = env.ledger().timestamp() + 30 * 86_400;
    let descs = vec![env, String::from_str(env, "deliverable")];
    let amts: Vec<i128> = vec![env, amount];
    let deadlines = vec![env, deadline];
    client.create_project(
        payer,
        &String::from_str(env, "Site build"),
        &String::from_str(env, "QmProjectDescRef"),
        &descs,
        &amts,
        &deadlines,
        &amount,
    )
}

// ─── Creation ────────────────────────────────────────────

#[test]
fn test_project_created_and_deposited_events() {
    let (env, client, _owner, token) = setup();
    let payer = Address::generate(&env);
    let id = create_project(&env, &client, &token, &payer, 5000);

    let all_events = env.events().all();
    let deposited = all_events.last().expect("No events found");

    // Topic: (symbol_short!("deposited"), project_id)
    assert_eq!(deposited.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("deposited").into_val(&env),
        id.into_val(&env),
    ];
    assert_eq!(deposited.1, expected_topics);
    let deposited_data: FundsDeposited = deposited.2.try_into_val(&env).unwrap();
    assert_eq!(
        deposited_data,
        FundsDeposited {
            project_id: id,
            payer: payer.clone(),
            amount: 5000,
        }
    );

    // The creation event directly precedes the deposit notification.
    let created = all_events.get(all_events.len() - 2).unwrap();
    let expected_topics = vec![
        &env,
        symbol_short!("created").into_val(&env),
        id.into_val(&env),
    ];
    assert_eq!(created.1, expected_topics);
    let created_data: ProjectCreated = created.2.try_into_val(&env).unwrap();
    assert_eq!(
        created_data,
        ProjectCreated {
            project_id: id,
            payer,
            title: String::from_str(&env, "Site build"),
            total_amount: 5000,
        }
    );
}

#[test]
fn test_project_accepted_event() {
    let (env, client, _owner, token) = setup();
    let payer = Address::generate(&env);
    let payee = Address::generate(&env);
    let id = create_project(&env, &client, &token, &payer, 5000);

    client.accept_project(&payee, &id);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");
    let expected_topics = vec![
        &env,
        symbol_short!("accepted").into_val(&env),
        id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);
    let event_data: ProjectAccepted = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        ProjectAccepted {
            project_id: id,
            payee,
        }
    );
}

// ─── Release ─────────────────────────────────────────────

#[test]
fn test_payment_released_event() {
    let (env, client, _owner, token) = setup();
    let payer = Address::generate(&env);
    let payee = Address::generate(&env);
    let id = create_project(&env, &client, &token, &payer, 5000);
    client.accept_project(&payee, &id);
    client.submit_milestone(&payee, &id, &0, &String::from_str(&env, "QmDeliverableRef"));

    client.approve_milestone(&payer, &id, &0);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");
    let expected_topics = vec![
        &env,
        symbol_short!("released").into_val(&env),
        id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);
    let event_data: PaymentReleased = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        PaymentReleased {
            project_id: id,
            milestone_id: 0,
            payee_amount: 4900,
            fee: 100,
        }
    );
}

// ─── Disputes ────────────────────────────────────────────

#[test]
fn test_dispute_lifecycle_events() {
    let (env, client, owner, token) = setup();
    let admin_a = Address::generate(&env);
    let admin_b = Address::generate(&env);
    client.add_admin(&owner, &admin_a);
    client.add_admin(&owner, &admin_b);

    let payer = Address::generate(&env);
    let payee = Address::generate(&env);
    let id = create_project(&env, &client, &token, &payer, 5000);
    client.accept_project(&payee, &id);
    client.submit_milestone(&payee, &id, &0, &String::from_str(&env, "QmDeliverableRef"));

    let dispute_id = client.raise_dispute(
        &payer,
        &id,
        &0,
        &String::from_str(&env, "deliverable does not match"),
    );
    let all_events = env.events().all();
    let raised = all_events.last().expect("No events found");
    let expected_topics = vec![
        &env,
        symbol_short!("disputed").into_val(&env),
        dispute_id.into_val(&env),
    ];
    assert_eq!(raised.1, expected_topics);
    let raised_data: DisputeRaised = raised.2.try_into_val(&env).unwrap();
    assert_eq!(
        raised_data,
        DisputeRaised {
            dispute_id,
            project_id: id,
            milestone_id: 0,
            initiator: payer,
        }
    );

    client.vote_on_dispute(&admin_a, &dispute_id, &60);
    let all_events = env.events().all();
    let voted = all_events.last().expect("No events found");
    let voted_data: DisputeVoted = voted.2.try_into_val(&env).unwrap();
    assert_eq!(
        voted_data,
        DisputeVoted {
            dispute_id,
            admin: admin_a,
            percentage: 60,
        }
    );

    // The quorum-crossing vote resolves in the same invocation, so the
    // resolution event lands last.
    client.vote_on_dispute(&admin_b, &dispute_id, &40);
    let all_events = env.events().all();
    let resolved = all_events.last().expect("No events found");
    let expected_topics = vec![
        &env,
        symbol_short!("resolved").into_val(&env),
        dispute_id.into_val(&env),
    ];
    assert_eq!(resolved.1, expected_topics);
    let resolved_data: DisputeResolved = resolved.2.try_into_val(&env).unwrap();
    assert_eq!(
        resolved_data,
        DisputeResolved {
            dispute_id,
            project_id: id,
            milestone_id: 0,
            payee_percentage: 50,
        }
    );
}

// ─── Ratings ─────────────────────────────────────────────

#[test]
fn test_user_rated_event() {
    let (env, client, _owner, _token) = setup();
    let rater = Address::generate(&env);
    let target = Address::generate(&env);

    client.rate_user(&rater, &target, &4);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");
    let expected_topics = vec![
        &env,
        symbol_short!("rated").into_val(&env),
        target.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);
    let event_data: UserRated = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        UserRated {
            target,
            rater,
            rating: 4,
        }
    );
}
