mod common;

use betledger::db::match_repo::MatchUpdate;
use betledger::ledger::accounts::{self, Approval};
use betledger::ledger::bets::{self, SelectionRequest};
use betledger::ledger::{catalog, LedgerError};
use betledger::models::{
    BetStatus, MainChoice, MarketKind, Outcome, SelectionResult, TransactionKind,
    TransactionStatus,
};

use serde_json::json;

use common::{balance_of, dec};

fn main_pick(match_id: uuid::Uuid, choice: MainChoice) -> SelectionRequest {
    SelectionRequest::Main {
        match_id,
        choice,
        odd: None,
    }
}

#[tokio::test]
async fn test_place_bet_debits_exact_stake() {
    let pool = common::setup_test_db().await;
    let (user, ctx) = common::seed_user(&pool, dec("100.00"), false).await;
    let first = common::seed_match(&pool, dec("2.0"), dec("3.1"), dec("3.5")).await;
    let second = common::seed_match(&pool, dec("1.8"), dec("3.0"), dec("1.5")).await;

    let placed = bets::place_bet(
        &pool,
        &ctx,
        dec("10"),
        &[
            main_pick(first.id, MainChoice::Home),
            main_pick(second.id, MainChoice::Away),
        ],
    )
    .await
    .unwrap();

    assert_eq!(placed.combined_odds, dec("3.0"));
    assert_eq!(placed.potential, dec("30.00"));
    assert_eq!(placed.balance, dec("90.00"));
    assert_eq!(placed.bet.status, BetStatus::Pending);
    assert_eq!(balance_of(&pool, user.id).await, dec("90.00"));

    assert_eq!(placed.selections.len(), 2);
    assert_eq!(placed.selections[0].label, first.home_team);
    assert_eq!(placed.selections[1].label, second.away_team);
}

#[tokio::test]
async fn test_insufficient_funds_leaves_state_unchanged() {
    let pool = common::setup_test_db().await;
    let (user, ctx) = common::seed_user(&pool, dec("5.00"), false).await;
    let fixture = common::seed_match(&pool, dec("2.0"), dec("3.0"), dec("4.0")).await;

    let err = bets::place_bet(&pool, &ctx, dec("10"), &[main_pick(fixture.id, MainChoice::Draw)])
        .await
        .unwrap_err();

    match err {
        LedgerError::InsufficientFunds {
            required,
            available,
        } => {
            assert_eq!(required, dec("10"));
            assert_eq!(available, dec("5.00"));
        }
        other => panic!("expected InsufficientFunds, got {other:?}"),
    }

    assert_eq!(balance_of(&pool, user.id).await, dec("5.00"));
    assert_eq!(common::count_bets(&pool, user.id).await, 0);
}

#[tokio::test]
async fn test_invalid_stake_and_empty_selections_rejected() {
    let pool = common::setup_test_db().await;
    let (user, ctx) = common::seed_user(&pool, dec("50.00"), false).await;
    let fixture = common::seed_match(&pool, dec("2.0"), dec("3.0"), dec("4.0")).await;

    let err = bets::place_bet(&pool, &ctx, dec("0"), &[main_pick(fixture.id, MainChoice::Home)])
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidBet(_)));

    let err = bets::place_bet(&pool, &ctx, dec("10"), &[]).await.unwrap_err();
    assert!(matches!(err, LedgerError::InvalidBet(_)));

    assert_eq!(balance_of(&pool, user.id).await, dec("50.00"));
}

#[tokio::test]
async fn test_inactive_match_aborts_whole_placement() {
    let pool = common::setup_test_db().await;
    let (_admin, admin_ctx) = common::seed_user(&pool, dec("0"), true).await;
    let (user, ctx) = common::seed_user(&pool, dec("100.00"), false).await;
    let open = common::seed_match(&pool, dec("2.0"), dec("3.0"), dec("4.0")).await;
    let closed = common::seed_match(&pool, dec("1.5"), dec("3.0"), dec("5.0")).await;

    catalog::update_match(
        &pool,
        &admin_ctx,
        closed.id,
        &MatchUpdate {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let err = bets::place_bet(
        &pool,
        &ctx,
        dec("10"),
        &[
            main_pick(open.id, MainChoice::Home),
            main_pick(closed.id, MainChoice::Home),
        ],
    )
    .await
    .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)), "got {err:?}");

    let missing = uuid::Uuid::new_v4();
    let err = bets::place_bet(&pool, &ctx, dec("10"), &[main_pick(missing, MainChoice::Away)])
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)), "got {err:?}");

    assert_eq!(balance_of(&pool, user.id).await, dec("100.00"));
    assert_eq!(common::count_bets(&pool, user.id).await, 0);
}

#[tokio::test]
async fn test_changed_odd_is_refused() {
    let pool = common::setup_test_db().await;
    let (user, ctx) = common::seed_user(&pool, dec("100.00"), false).await;
    let fixture = common::seed_match(&pool, dec("2.0"), dec("3.0"), dec("4.0")).await;

    let stale = SelectionRequest::Main {
        match_id: fixture.id,
        choice: MainChoice::Home,
        odd: Some(json!("2.2")),
    };
    let err = bets::place_bet(&pool, &ctx, dec("10"), &[stale]).await.unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)), "got {err:?}");

    let current = SelectionRequest::Main {
        match_id: fixture.id,
        choice: MainChoice::Home,
        odd: Some(json!(2.0)),
    };
    bets::place_bet(&pool, &ctx, dec("10"), &[current]).await.unwrap();
    assert_eq!(balance_of(&pool, user.id).await, dec("90.00"));
}

#[tokio::test]
async fn test_extra_market_selection() {
    let pool = common::setup_test_db().await;
    let (_admin, admin_ctx) = common::seed_user(&pool, dec("0"), true).await;
    let (_user, ctx) = common::seed_user(&pool, dec("20.00"), false).await;
    let fixture = common::seed_match(&pool, dec("2.0"), dec("3.0"), dec("4.0")).await;

    let extra = catalog::add_extra(&pool, &admin_ctx, fixture.id, "Both teams score", dec("1.75"))
        .await
        .unwrap();

    let placed = bets::place_bet(
        &pool,
        &ctx,
        dec("4"),
        &[SelectionRequest::Extra {
            match_id: fixture.id,
            extra_id: extra.id,
            odd: None,
        }],
    )
    .await
    .unwrap();

    assert_eq!(placed.combined_odds, dec("1.75"));
    assert_eq!(placed.potential, dec("7.00"));
    assert_eq!(placed.selections[0].selection.market_kind, MarketKind::Extra);
    assert_eq!(placed.selections[0].label, "Both teams score");
}

#[tokio::test]
async fn test_settle_won_credits_potential_once() {
    let pool = common::setup_test_db().await;
    let (_admin, admin_ctx) = common::seed_user(&pool, dec("0"), true).await;
    let (user, ctx) = common::seed_user(&pool, dec("50.00"), false).await;
    let fixture = common::seed_match(&pool, dec("2.5"), dec("3.0"), dec("2.8")).await;

    let placed = bets::place_bet(&pool, &ctx, dec("10"), &[main_pick(fixture.id, MainChoice::Home)])
        .await
        .unwrap();
    assert_eq!(placed.potential, dec("25.00"));
    assert_eq!(balance_of(&pool, user.id).await, dec("40.00"));

    let settled = bets::settle_bet(&pool, &admin_ctx, placed.bet_id, Outcome::Won)
        .await
        .unwrap();
    assert_eq!(settled.bet.status, BetStatus::Won);
    assert_eq!(settled.credited, dec("25.00"));
    assert!(settled.bet.settled_at.is_some());
    assert_eq!(balance_of(&pool, user.id).await, dec("65.00"));

    let err = bets::settle_bet(&pool, &admin_ctx, placed.bet_id, Outcome::Won)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::AlreadySettled(id) if id == placed.bet_id));

    let err = bets::settle_bet(&pool, &admin_ctx, placed.bet_id, Outcome::Lost)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::AlreadySettled(_)));
    assert_eq!(balance_of(&pool, user.id).await, dec("65.00"));
}

#[tokio::test]
async fn test_settle_lost_leaves_balance() {
    let pool = common::setup_test_db().await;
    let (_admin, admin_ctx) = common::seed_user(&pool, dec("0"), true).await;
    let (user, ctx) = common::seed_user(&pool, dec("30.00"), false).await;
    let fixture = common::seed_match(&pool, dec("2.0"), dec("3.0"), dec("4.0")).await;

    let placed = bets::place_bet(&pool, &ctx, dec("10"), &[main_pick(fixture.id, MainChoice::Away)])
        .await
        .unwrap();

    let settled = bets::settle_bet(&pool, &admin_ctx, placed.bet_id, Outcome::Lost)
        .await
        .unwrap();
    assert_eq!(settled.bet.status, BetStatus::Lost);
    assert_eq!(settled.credited, dec("0"));
    assert_eq!(balance_of(&pool, user.id).await, dec("20.00"));
}

#[tokio::test]
async fn test_settlement_requires_admin() {
    let pool = common::setup_test_db().await;
    let (user, ctx) = common::seed_user(&pool, dec("30.00"), false).await;
    let fixture = common::seed_match(&pool, dec("2.0"), dec("3.0"), dec("4.0")).await;

    let placed = bets::place_bet(&pool, &ctx, dec("10"), &[main_pick(fixture.id, MainChoice::Home)])
        .await
        .unwrap();

    let err = bets::settle_bet(&pool, &ctx, placed.bet_id, Outcome::Won)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Forbidden));
    assert_eq!(balance_of(&pool, user.id).await, dec("20.00"));

    let err = bets::settle_bet(&pool, &ctx, uuid::Uuid::new_v4(), Outcome::Won)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Forbidden));
}

#[tokio::test]
async fn test_settle_unknown_bet_not_found() {
    let pool = common::setup_test_db().await;
    let (_admin, admin_ctx) = common::seed_user(&pool, dec("0"), true).await;

    let err = bets::settle_bet(&pool, &admin_ctx, uuid::Uuid::new_v4(), Outcome::Won)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)));
}

#[tokio::test]
async fn test_history_round_trip_survives_match_deletion() {
    let pool = common::setup_test_db().await;
    let (_admin, admin_ctx) = common::seed_user(&pool, dec("0"), true).await;
    let (user, ctx) = common::seed_user(&pool, dec("100.00"), false).await;
    let first = common::seed_match(&pool, dec("1.333333"), dec("3.0"), dec("4.0")).await;
    let second = common::seed_match(&pool, dec("2.0"), dec("1.333333"), dec("4.0")).await;

    let placed = bets::place_bet(
        &pool,
        &ctx,
        dec("12.50"),
        &[
            main_pick(first.id, MainChoice::Home),
            main_pick(second.id, MainChoice::Draw),
        ],
    )
    .await
    .unwrap();

    catalog::delete_match(&pool, &admin_ctx, first.id).await.unwrap();

    let history = bets::list_bet_history(&pool, &ctx, user.id).await.unwrap();
    assert_eq!(history.len(), 1);

    let bet = &history[0];
    assert_eq!(bet.bet.id, placed.bet_id);
    assert_eq!(bet.bet.stake, dec("12.50"));
    assert_eq!(bet.bet.combined_odds, placed.combined_odds);
    assert_eq!(bet.bet.potential, placed.potential);
    assert_eq!(bet.selections.len(), 2);

    let odds: Vec<_> = bet.selections.iter().map(|s| s.selection.odd).collect();
    assert_eq!(odds, vec![dec("1.333333"), dec("1.333333")]);

    let deleted_leg = &bet.selections[0].selection;
    assert_eq!(deleted_leg.match_id, None);
    assert_eq!(deleted_leg.home_team, first.home_team);
    assert_eq!(bet.selections[0].label, first.home_team);
    assert_eq!(bet.selections[1].label, "Draw");
}

#[tokio::test]
async fn test_history_is_private() {
    let pool = common::setup_test_db().await;
    let (owner, _) = common::seed_user(&pool, dec("10.00"), false).await;
    let (_other, other_ctx) = common::seed_user(&pool, dec("10.00"), false).await;
    let (_admin, admin_ctx) = common::seed_user(&pool, dec("0"), true).await;

    let err = bets::list_bet_history(&pool, &other_ctx, owner.id).await.unwrap_err();
    assert!(matches!(err, LedgerError::Forbidden));

    let err = accounts::get_balance(&pool, &other_ctx, owner.id).await.unwrap_err();
    assert!(matches!(err, LedgerError::Forbidden));

    let balance = accounts::get_balance(&pool, &admin_ctx, owner.id).await.unwrap();
    assert_eq!(balance, dec("10.00"));
}

#[tokio::test]
async fn test_selection_result_is_informational() {
    let pool = common::setup_test_db().await;
    let (_admin, admin_ctx) = common::seed_user(&pool, dec("0"), true).await;
    let (user, ctx) = common::seed_user(&pool, dec("10.00"), false).await;
    let fixture = common::seed_match(&pool, dec("2.0"), dec("3.0"), dec("4.0")).await;

    let placed = bets::place_bet(&pool, &ctx, dec("5"), &[main_pick(fixture.id, MainChoice::Home)])
        .await
        .unwrap();
    let selection_id = placed.selections[0].selection.id;

    let selection = bets::record_selection_result(&pool, &admin_ctx, selection_id, Outcome::Won)
        .await
        .unwrap();
    assert_eq!(selection.result, SelectionResult::Won);

    let bet = common::fetch_bet(&pool, placed.bet_id).await.unwrap();
    assert_eq!(bet.status, BetStatus::Pending);
    assert_eq!(balance_of(&pool, user.id).await, dec("5.00"));
}

#[tokio::test]
async fn test_deposit_approval_credits_exact_amount() {
    let pool = common::setup_test_db().await;
    let (_admin, admin_ctx) = common::seed_user(&pool, dec("0"), true).await;
    let (user, ctx) = common::seed_user(&pool, dec("12.34"), false).await;

    let requested = accounts::request_transaction(&pool, &ctx, TransactionKind::Deposit, dec("50.01"))
        .await
        .unwrap();
    assert_eq!(requested.status, TransactionStatus::Pending);
    assert_eq!(balance_of(&pool, user.id).await, dec("12.34"));

    let result = accounts::approve_transaction(&pool, &admin_ctx, requested.id)
        .await
        .unwrap();
    assert_eq!(result.outcome, Approval::Approved);
    assert_eq!(result.transaction.status, TransactionStatus::Approved);
    assert!(result.transaction.resolved_at.is_some());
    assert_eq!(result.balance, dec("62.35"));
    assert_eq!(balance_of(&pool, user.id).await, dec("62.35"));

    let err = accounts::approve_transaction(&pool, &admin_ctx, requested.id)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::AlreadyProcessed(_)));
    assert_eq!(balance_of(&pool, user.id).await, dec("62.35"));
}

#[tokio::test]
async fn test_withdrawal_above_balance_auto_rejects() {
    let pool = common::setup_test_db().await;
    let (_admin, admin_ctx) = common::seed_user(&pool, dec("0"), true).await;
    let (user, ctx) = common::seed_user(&pool, dec("20.00"), false).await;

    let requested =
        accounts::request_transaction(&pool, &ctx, TransactionKind::Withdrawal, dec("25.00"))
            .await
            .unwrap();

    let result = accounts::approve_transaction(&pool, &admin_ctx, requested.id)
        .await
        .unwrap();
    assert_eq!(result.outcome, Approval::AutoRejected);
    assert_eq!(result.transaction.status, TransactionStatus::Rejected);
    assert_eq!(balance_of(&pool, user.id).await, dec("20.00"));
}

#[tokio::test]
async fn test_withdrawal_within_balance_debits() {
    let pool = common::setup_test_db().await;
    let (_admin, admin_ctx) = common::seed_user(&pool, dec("0"), true).await;
    let (user, ctx) = common::seed_user(&pool, dec("20.00"), false).await;

    let requested =
        accounts::request_transaction(&pool, &ctx, TransactionKind::Withdrawal, dec("20.00"))
            .await
            .unwrap();

    let result = accounts::approve_transaction(&pool, &admin_ctx, requested.id)
        .await
        .unwrap();
    assert_eq!(result.outcome, Approval::Approved);
    assert_eq!(balance_of(&pool, user.id).await, dec("0.00"));
}

#[tokio::test]
async fn test_reject_and_already_processed() {
    let pool = common::setup_test_db().await;
    let (_admin, admin_ctx) = common::seed_user(&pool, dec("0"), true).await;
    let (user, ctx) = common::seed_user(&pool, dec("10.00"), false).await;

    let requested = accounts::request_transaction(&pool, &ctx, TransactionKind::Deposit, dec("5"))
        .await
        .unwrap();

    let rejected = accounts::reject_transaction(&pool, &admin_ctx, requested.id)
        .await
        .unwrap();
    assert_eq!(rejected.status, TransactionStatus::Rejected);

    let err = accounts::approve_transaction(&pool, &admin_ctx, requested.id)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::AlreadyProcessed(_)));

    let err = accounts::reject_transaction(&pool, &admin_ctx, requested.id)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::AlreadyProcessed(_)));

    assert_eq!(balance_of(&pool, user.id).await, dec("10.00"));

    let own = accounts::list_transactions(&pool, &ctx, user.id).await.unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].status, TransactionStatus::Rejected);
}

#[tokio::test]
async fn test_transaction_amount_validation() {
    let pool = common::setup_test_db().await;
    let (_user, ctx) = common::seed_user(&pool, dec("10.00"), false).await;

    for amount in ["0", "-5", "1.005"] {
        let err = accounts::request_transaction(&pool, &ctx, TransactionKind::Deposit, dec(amount))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)), "amount {amount}: {err:?}");
    }
}

#[tokio::test]
async fn test_pending_queue_lists_owner() {
    let pool = common::setup_test_db().await;
    let (_admin, admin_ctx) = common::seed_user(&pool, dec("0"), true).await;
    let (user, ctx) = common::seed_user(&pool, dec("0"), false).await;

    let requested = accounts::request_transaction(&pool, &ctx, TransactionKind::Deposit, dec("7.50"))
        .await
        .unwrap();

    let pending = accounts::list_pending_transactions(&pool, &admin_ctx).await.unwrap();
    let mine = pending
        .iter()
        .find(|t| t.transaction.id == requested.id)
        .expect("pending transaction listed");
    assert_eq!(mine.username, user.username);

    let err = accounts::list_pending_transactions(&pool, &ctx).await.unwrap_err();
    assert!(matches!(err, LedgerError::Forbidden));
}

#[tokio::test]
async fn test_active_matches_hide_inactive() {
    let pool = common::setup_test_db().await;
    let (_admin, admin_ctx) = common::seed_user(&pool, dec("0"), true).await;
    let shown = common::seed_match(&pool, dec("2.0"), dec("3.0"), dec("4.0")).await;
    let hidden = common::seed_match(&pool, dec("2.0"), dec("3.0"), dec("4.0")).await;

    catalog::update_match(
        &pool,
        &admin_ctx,
        hidden.id,
        &MatchUpdate {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let active = catalog::list_active_matches(&pool).await.unwrap();
    assert!(active.iter().any(|m| m.fixture.id == shown.id));
    assert!(!active.iter().any(|m| m.fixture.id == hidden.id));

    let err = catalog::get_active_match(&pool, hidden.id).await.unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)));

    let all = catalog::list_all_matches(&pool, &admin_ctx).await.unwrap();
    assert!(all.iter().any(|m| m.fixture.id == hidden.id));
}

#[tokio::test]
async fn test_non_numeric_client_odd_names_selection() {
    let pool = common::setup_test_db().await;
    let (user, ctx) = common::seed_user(&pool, dec("50.00"), false).await;
    let fixture = common::seed_match(&pool, dec("2.0"), dec("3.0"), dec("4.0")).await;

    let request: Vec<SelectionRequest> = serde_json::from_value(json!([
        { "market_kind": "main", "match_id": fixture.id, "choice": "home" },
        { "market_kind": "main", "match_id": fixture.id, "choice": "away", "odd": "abc" },
    ]))
    .unwrap();

    let err = bets::place_bet(&pool, &ctx, dec("10"), &request).await.unwrap_err();
    match err {
        LedgerError::Validation(msg) => assert!(msg.contains("selection 2"), "{msg}"),
        other => panic!("expected Validation, got {other:?}"),
    }
    assert_eq!(balance_of(&pool, user.id).await, dec("50.00"));
    assert_eq!(common::count_bets(&pool, user.id).await, 0);
}

#[tokio::test]
async fn test_zero_potential_bet_can_still_be_won() {
    let pool = common::setup_test_db().await;
    let (_admin, admin_ctx) = common::seed_user(&pool, dec("0"), true).await;
    let (user, ctx) = common::seed_user(&pool, dec("1.00"), false).await;
    let fixture = common::seed_match(&pool, dec("0.4"), dec("3.0"), dec("4.0")).await;

    let placed = bets::place_bet(&pool, &ctx, dec("0.01"), &[main_pick(fixture.id, MainChoice::Home)])
        .await
        .unwrap();
    assert_eq!(placed.potential, dec("0"));
    assert_eq!(balance_of(&pool, user.id).await, dec("0.99"));

    let settled = bets::settle_bet(&pool, &admin_ctx, placed.bet_id, Outcome::Won)
        .await
        .unwrap();
    assert_eq!(settled.bet.status, BetStatus::Won);
    assert_eq!(settled.credited, dec("0"));
    assert_eq!(balance_of(&pool, user.id).await, dec("0.99"));
}

#[tokio::test]
async fn test_unstorable_combined_odds_are_a_validation_error() {
    let pool = common::setup_test_db().await;
    let (user, ctx) = common::seed_user(&pool, dec("10.00"), false).await;

    let mut legs = Vec::new();
    for _ in 0..5 {
        let fixture = common::seed_match(&pool, dec("1000"), dec("3.0"), dec("4.0")).await;
        legs.push(main_pick(fixture.id, MainChoice::Home));
    }

    let err = bets::place_bet(&pool, &ctx, dec("1"), &legs).await.unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)), "got {err:?}");
    assert_eq!(balance_of(&pool, user.id).await, dec("10.00"));
    assert_eq!(common::count_bets(&pool, user.id).await, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_bet_and_withdrawal_never_overdraw() {
    let pool = common::setup_test_db().await;
    let (_admin, admin_ctx) = common::seed_user(&pool, dec("0"), true).await;
    let fixture = common::seed_match(&pool, dec("2.0"), dec("3.0"), dec("4.0")).await;

    for _ in 0..5 {
        let (user, ctx) = common::seed_user(&pool, dec("20.00"), false).await;
        let withdrawal =
            accounts::request_transaction(&pool, &ctx, TransactionKind::Withdrawal, dec("15.00"))
                .await
                .unwrap();

        let bet = tokio::spawn({
            let pool = pool.clone();
            let picks = vec![main_pick(fixture.id, MainChoice::Home)];
            async move { bets::place_bet(&pool, &ctx, dec("10.00"), &picks).await }
        });
        let approval = tokio::spawn({
            let pool = pool.clone();
            let admin_ctx = admin_ctx.clone();
            async move { accounts::approve_transaction(&pool, &admin_ctx, withdrawal.id).await }
        });

        let (bet, approval) = tokio::join!(bet, approval);
        let bet = bet.unwrap();
        let approval = approval.unwrap().unwrap();

        let balance = balance_of(&pool, user.id).await;
        match (&bet, approval.outcome) {
            (Ok(_), Approval::AutoRejected) => {
                assert_eq!(balance, dec("10.00"));
                assert_eq!(common::count_bets(&pool, user.id).await, 1);
            }
            (Err(LedgerError::InsufficientFunds { .. }), Approval::Approved) => {
                assert_eq!(balance, dec("5.00"));
                assert_eq!(common::count_bets(&pool, user.id).await, 0);
            }
            (bet, outcome) => panic!("both or neither debited: bet={bet:?} withdrawal={outcome:?}"),
        }
    }
}
