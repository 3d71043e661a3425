//! End-to-end table flows against a scripted engine.
//!
//! Time is paused in every test, so the table's delays elapse instantly
//! and in order.

mod common;

use blackjack_table::{
    engine::EngineError,
    game::{
        entities::{InsuranceDecision, Outcome, PlayerAction, SpotTarget},
        patches::{DealResult, IntermediateResult, ShoeState},
    },
    table::{CardFace, Destination, InsuranceMode, Phase, SessionConfig, TableResponse},
};
use common::*;
use std::time::Duration;

async fn sleep_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

/// Starts a session and bets `chip` on each of `spots`.
async fn seat(table: &TestTable, chip: i64, spots: &[u8]) {
    assert_eq!(
        table.handle.start_session(SessionConfig::default()).await,
        TableResponse::Success
    );
    assert_eq!(table.handle.select_chip(chip).await, TableResponse::Success);
    for spot in spots {
        assert_eq!(
            table.handle.place_bet(SpotTarget::Number(*spot)).await,
            TableResponse::Success
        );
    }
}

// ============================================================================
// Full hand: deal, stand, dealer, clear
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_single_spot_hand_from_deal_to_clear() {
    let table = TestTable::spawn(vec![
        Reply::Session(session(1, 1, 1)),
        Reply::Deal(deal(7, &["6h"], Some(11), vec![dealt(11, 1, &["Ts", "9d"])])),
        Reply::Action(action(11, &["Ts", "9d"], pointer(7, None))),
        Reply::Dealer(dealer(
            7,
            &["6h", "Kc", "4d"],
            vec![settled(11, Outcome::Loss, -2_500)],
            ShoeState {
                discarded_cards: 5,
                shuffle: false,
            },
        )),
    ]);
    seat(&table, 2_500, &[1]).await;

    assert_eq!(table.handle.deal().await, TableResponse::Success);
    let view = table.view().await;
    assert_eq!(view.phase, Phase::PlayerTurn(11));
    assert_eq!(view.spots[0].cards, cards(&["Ts", "9d"]));
    assert_eq!(table.reveal_count(), view.spots[0].cards.len() + 2);

    assert_eq!(
        table.handle.act(11, PlayerAction::Stand).await,
        TableResponse::Success
    );
    let view = table.view().await;
    assert_eq!(view.phase, Phase::Resolved);
    assert_eq!(view.hand.dealer_cards.len(), 3);
    assert_eq!(view.spots[0].outcome, Some(Outcome::Loss));
    assert_eq!(view.spots[0].profit, Some(-2_500));
    assert_eq!(view.session.as_ref().map(|s| s.profit), Some(-2_500));
    assert_eq!(view.discarded_cards, 5);

    sleep_ms(4_900).await;
    assert!(table.view().await.is_dealt);

    sleep_ms(200).await;
    let view = table.view().await;
    assert_eq!(view.phase, Phase::Betting);
    assert!(!view.is_dealt);
    assert_eq!(view.spots[0].wager, 0);
    assert!(view.spots[0].cards.is_empty());
    assert_eq!(view.hand.id, None);

    assert_eq!(
        table.engine.calls(),
        vec![
            Call::CreateSession(SessionConfig::default()),
            Call::DealHand(
                1,
                vec![blackjack_table::game::patches::SpotWager {
                    spot_number: 1,
                    wager: 2_500
                }]
            ),
            Call::PlayerAction(11, PlayerAction::Stand),
            Call::DealerActions(7),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_deal_reveals_round_robin_with_hole_card() {
    let table = TestTable::spawn(vec![
        Reply::Session(session(1, 6, 2)),
        Reply::Deal(deal(
            7,
            &["6h"],
            Some(11),
            vec![dealt(11, 1, &["Ts", "9d"]), dealt(12, 2, &["2c", "3c"])],
        )),
    ]);
    seat(&table, 500, &[1, 2]).await;
    table.handle.deal().await;

    let reveals = table.reveals.lock().unwrap().clone();
    let destinations: Vec<Destination> = reveals.iter().map(|e| e.destination).collect();
    assert_eq!(
        destinations,
        vec![
            Destination::Spot(1),
            Destination::Spot(2),
            Destination::Dealer,
            Destination::Spot(1),
            Destination::Spot(2),
            Destination::Dealer,
        ]
    );
    assert_eq!(reveals[5].face, CardFace::Down);
}

// ============================================================================
// Betting
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_bet_all_adds_chip_to_every_spot() {
    let table = TestTable::spawn(vec![Reply::Session(session(1, 6, 2))]);
    seat(&table, 500, &[1, 1, 2, 2, 2, 2]).await;

    let view = table.view().await;
    assert_eq!(view.spots[0].wager, 1_000);
    assert_eq!(view.spots[1].wager, 2_000);

    table.handle.set_bet_all(true).await;
    assert_eq!(
        table.handle.place_bet(SpotTarget::Number(1)).await,
        TableResponse::Success
    );

    let view = table.view().await;
    assert_eq!(view.spots[0].wager, 1_500);
    assert_eq!(view.spots[1].wager, 2_500);
    assert_eq!(view.total_wager, 4_000);
}

#[tokio::test(start_paused = true)]
async fn test_local_guards_never_reach_engine() {
    let table = TestTable::spawn(vec![
        Reply::Session(session(1, 6, 1)),
        Reply::Deal(deal(7, &["6h"], Some(11), vec![dealt(11, 1, &["Ts", "9d"])])),
    ]);

    assert!(matches!(
        table.handle.deal().await,
        TableResponse::Ignored(_)
    ));
    assert!(matches!(
        table.handle.select_chip(1_234).await,
        TableResponse::Ignored(_)
    ));

    table.handle.start_session(SessionConfig::default()).await;
    assert!(matches!(
        table.handle.deal().await,
        TableResponse::Ignored(_)
    ));

    table.handle.select_chip(500).await;
    table.handle.place_bet(SpotTarget::Number(1)).await;
    assert_eq!(table.handle.deal().await, TableResponse::Success);

    assert!(matches!(
        table.handle.place_bet(SpotTarget::Number(1)).await,
        TableResponse::Ignored(_)
    ));
    assert!(matches!(
        table.handle.act(99, PlayerAction::Hit).await,
        TableResponse::Ignored(_)
    ));
    assert!(matches!(
        table.handle.act(11, PlayerAction::Split).await,
        TableResponse::Ignored(_)
    ));
    assert!(matches!(
        table.handle.insure_all(true).await,
        TableResponse::Ignored(_)
    ));

    assert_eq!(table.engine.calls().len(), 2);
    assert_eq!(table.view().await.error, None);
    assert_eq!(table.view().await.spots[0].wager, 500);
}

// ============================================================================
// Insurance
// ============================================================================

fn insurance_deal() -> DealResult {
    DealResult {
        insurance_offered: true,
        ..deal(
            7,
            &["As"],
            Some(11),
            vec![dealt(11, 1, &["Ts", "9d"]), dealt(12, 2, &["8c", "8d"])],
        )
    }
}

#[tokio::test(start_paused = true)]
async fn test_insure_all_settles_insurance_automatically() {
    let table = TestTable::spawn(vec![
        Reply::Session(session(1, 6, 3)),
        Reply::Deal(insurance_deal()),
        Reply::EchoInsurance,
        Reply::Intermediate(IntermediateResult {
            hand: pointer(7, Some(11)),
            spots: Vec::new(),
        }),
    ]);
    seat(&table, 500, &[1, 2]).await;
    table.handle.deal().await;
    assert_eq!(table.view().await.phase, Phase::InsurancePending);

    assert_eq!(table.handle.insure_all(true).await, TableResponse::Success);

    let view = table.view().await;
    assert!(!view.insurance_offered);
    assert_eq!(view.phase, Phase::PlayerTurn(11));
    assert_eq!(view.spots[0].insurance, InsuranceDecision::Insured);
    assert_eq!(view.spots[1].insurance, InsuranceDecision::Insured);
    assert_eq!(view.spots[2].insurance, InsuranceDecision::Undecided);
    assert!(!view.spots[2].active);

    let calls = table.engine.calls();
    assert_eq!(calls[calls.len() - 1], Call::IntermediateActions(7));
    assert!(matches!(&calls[calls.len() - 2], Call::InsureSpots(spots) if spots.len() == 2));

    // A spot still owes an action, so nothing follows on its own
    sleep_ms(10_000).await;
    assert_eq!(table.view().await.phase, Phase::PlayerTurn(11));
    assert_eq!(table.engine.calls(), calls);
}

#[tokio::test(start_paused = true)]
async fn test_individual_insurance_confirms_before_recording() {
    let table = TestTable::spawn(vec![
        Reply::Session(session(1, 6, 2)),
        Reply::Deal(insurance_deal()),
        Reply::Fail(EngineError::Transport("connection reset".into())),
        Reply::EchoInsurance,
        Reply::EchoInsurance,
        Reply::Intermediate(IntermediateResult {
            hand: pointer(7, Some(11)),
            spots: Vec::new(),
        }),
    ]);
    seat(&table, 500, &[1, 2]).await;
    table.handle.deal().await;

    assert!(matches!(
        table.handle.insure_spot(11, true).await,
        TableResponse::Ignored(_)
    ));
    assert_eq!(
        table.handle.insure_individually().await,
        TableResponse::Success
    );
    assert!(matches!(
        table.handle.insure_all(true).await,
        TableResponse::Ignored(_)
    ));

    let response = table.handle.insure_spot(11, true).await;
    assert_eq!(
        response,
        TableResponse::Error("Game engine unreachable".to_string())
    );
    let view = table.view().await;
    assert_eq!(view.spots[0].insurance, InsuranceDecision::Undecided);
    assert_eq!(view.error.as_deref(), Some("Game engine unreachable"));
    assert_eq!(view.phase, Phase::InsurancePending);

    assert_eq!(
        table.handle.insure_spot(11, true).await,
        TableResponse::Success
    );
    let view = table.view().await;
    assert_eq!(view.spots[0].insurance, InsuranceDecision::Insured);
    assert_eq!(view.error, None);
    assert!(view.insurance_offered);
    assert_eq!(view.insurance_mode, InsuranceMode::Individual);

    assert_eq!(
        table.handle.insure_spot(12, false).await,
        TableResponse::Success
    );
    let view = table.view().await;
    assert!(!view.insurance_offered);
    assert_eq!(view.phase, Phase::PlayerTurn(11));
    assert_eq!(table.engine.remaining(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_insurance_without_pending_spot_waits_before_dealer() {
    let table = TestTable::spawn(vec![
        Reply::Session(session(1, 6, 1)),
        Reply::Deal(DealResult {
            insurance_offered: true,
            ..deal(7, &["As"], Some(11), vec![dealt(11, 1, &["Ts", "9d"])])
        }),
        Reply::EchoInsurance,
        Reply::Intermediate(IntermediateResult {
            hand: blackjack_table::game::patches::HandPointer {
                id: 7,
                dealer_cards: Some(cards(&["As", "Kd"])),
                current_spot_id: None,
            },
            spots: vec![blackjack_table::game::patches::SettlementPatch {
                id: 11,
                insurance_outcome: Some(blackjack_table::game::entities::InsuranceOutcome::Won),
                ..Default::default()
            }],
        }),
        Reply::Dealer(dealer(
            7,
            &["As", "Kd"],
            vec![settled(11, Outcome::Loss, 0)],
            ShoeState::default(),
        )),
    ]);
    seat(&table, 500, &[1]).await;
    table.handle.deal().await;
    table.handle.insure_all(true).await;

    let view = table.view().await;
    assert_eq!(view.phase, Phase::DealerPending);
    assert_eq!(view.hand.dealer_cards.len(), 2);
    assert_eq!(
        table.engine.calls().last(),
        Some(&Call::IntermediateActions(7))
    );

    sleep_ms(3_100).await;
    assert_eq!(table.view().await.phase, Phase::Resolved);
    assert_eq!(table.engine.calls().last(), Some(&Call::DealerActions(7)));

    sleep_ms(5_100).await;
    assert_eq!(table.view().await.phase, Phase::Betting);
}

// ============================================================================
// Bust and blackjack reveals
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_bust_spot_leaves_play_once_after_grace() {
    let mut bust = action(11, &["Ts", "6d", "9c"], pointer(7, Some(12)));
    bust.is_bust = true;

    let table = TestTable::spawn(vec![
        Reply::Session(session(1, 6, 2)),
        Reply::Deal(deal(
            7,
            &["6h"],
            Some(11),
            vec![dealt(11, 1, &["Ts", "6d"]), dealt(12, 2, &["9h", "9s"])],
        )),
        Reply::Action(bust),
    ]);
    seat(&table, 500, &[1, 2]).await;
    table.handle.deal().await;

    assert_eq!(
        table.handle.act(11, PlayerAction::Hit).await,
        TableResponse::Success
    );
    let view = table.view().await;
    assert_eq!(view.phase, Phase::PlayerTurn(12));
    assert!(view.spots[0].is_bust);
    assert!(view.spots[0].active);
    assert_eq!(view.discarded_cards, 0);

    sleep_ms(2_900).await;
    assert!(table.view().await.spots[0].active);

    sleep_ms(200).await;
    let view = table.view().await;
    assert!(!view.spots[0].active);
    assert_eq!(view.discarded_cards, 3);

    sleep_ms(10_000).await;
    assert_eq!(table.view().await.discarded_cards, 3);
}

#[tokio::test(start_paused = true)]
async fn test_natural_blackjack_resolves_dealer_and_reveals() {
    let mut natural = dealt(11, 1, &["As", "Kd"]);
    natural.is_blackjack = true;
    natural.outcome = Some(Outcome::Blackjack);

    let table = TestTable::spawn(vec![
        Reply::Session(session(1, 6, 1)),
        Reply::Deal(deal(7, &["6h"], None, vec![natural])),
        Reply::Dealer(dealer(
            7,
            &["6h", "Th"],
            vec![settled(11, Outcome::Blackjack, 750)],
            ShoeState::default(),
        )),
    ]);
    seat(&table, 500, &[1]).await;

    assert_eq!(table.handle.deal().await, TableResponse::Success);
    let view = table.view().await;
    assert_eq!(view.phase, Phase::Resolved);
    assert_eq!(view.spots[0].profit, Some(750));
    assert!(view.spots[0].active);

    sleep_ms(3_100).await;
    let view = table.view().await;
    assert!(!view.spots[0].active);
    assert_eq!(view.discarded_cards, 2);
}

#[tokio::test(start_paused = true)]
async fn test_natural_stays_in_play_while_insurance_is_offered() {
    let mut natural = dealt(11, 1, &["As", "Kd"]);
    natural.is_blackjack = true;

    let table = TestTable::spawn(vec![
        Reply::Session(session(1, 6, 1)),
        Reply::Deal(DealResult {
            insurance_offered: true,
            ..deal(7, &["Ah"], None, vec![natural])
        }),
        Reply::EchoInsurance,
        Reply::Intermediate(IntermediateResult {
            hand: pointer(7, None),
            spots: Vec::new(),
        }),
        Reply::Dealer(dealer(
            7,
            &["Ah", "9c"],
            vec![settled(11, Outcome::Blackjack, 750)],
            ShoeState::default(),
        )),
    ]);
    seat(&table, 500, &[1]).await;
    table.handle.deal().await;

    // The player answers well after the grace delay
    sleep_ms(4_000).await;
    let view = table.view().await;
    assert_eq!(view.phase, Phase::InsurancePending);
    assert!(view.spots[0].active);
    assert_eq!(view.discarded_cards, 0);

    assert_eq!(table.handle.insure_all(false).await, TableResponse::Success);
    assert_eq!(table.view().await.phase, Phase::DealerPending);
    assert!(table.view().await.spots[0].active);

    sleep_ms(3_100).await;
    let view = table.view().await;
    assert_eq!(view.phase, Phase::Resolved);
    assert_eq!(view.spots[0].profit, Some(750));
    assert!(!view.spots[0].active);
    assert_eq!(view.discarded_cards, 2);

    sleep_ms(5_100).await;
    assert_eq!(table.view().await.phase, Phase::Betting);
    assert_eq!(
        table.engine.calls()[2..],
        [
            Call::InsureSpots(vec![blackjack_table::game::patches::SpotInsurance {
                id: 11,
                insurance: false,
            }]),
            Call::IntermediateActions(7),
            Call::DealerActions(7),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_natural_answers_insurance_with_the_table() {
    let mut natural = dealt(11, 1, &["As", "Kd"]);
    natural.is_blackjack = true;

    let table = TestTable::spawn(vec![
        Reply::Session(session(1, 6, 2)),
        Reply::Deal(DealResult {
            insurance_offered: true,
            ..deal(7, &["Ah"], Some(12), vec![natural, dealt(12, 2, &["9h", "7s"])])
        }),
        Reply::EchoInsurance,
        Reply::Intermediate(IntermediateResult {
            hand: pointer(7, Some(12)),
            spots: Vec::new(),
        }),
    ]);
    seat(&table, 500, &[1, 2]).await;
    table.handle.deal().await;

    sleep_ms(4_000).await;
    assert_eq!(table.handle.insure_all(true).await, TableResponse::Success);
    let view = table.view().await;
    assert_eq!(view.phase, Phase::PlayerTurn(12));
    assert_eq!(view.spots[0].insurance, InsuranceDecision::Insured);
    assert_eq!(view.spots[1].insurance, InsuranceDecision::Insured);
    assert!(matches!(&table.engine.calls()[2], Call::InsureSpots(spots) if spots.len() == 2));

    // Grace runs from the insurance answer, not from the deal
    sleep_ms(2_900).await;
    assert!(table.view().await.spots[0].active);
    sleep_ms(200).await;
    let view = table.view().await;
    assert!(!view.spots[0].active);
    assert!(view.spots[1].active);
    assert_eq!(view.phase, Phase::PlayerTurn(12));
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_rejected_action_keeps_phase_and_sets_error() {
    let table = TestTable::spawn(vec![
        Reply::Session(session(1, 6, 1)),
        Reply::Deal(deal(7, &["6h"], Some(11), vec![dealt(11, 1, &["Ts", "9d"])])),
        Reply::Fail(EngineError::Rejected(vec!["Spot has already acted".into()])),
        Reply::Action(action(11, &["Ts", "9d", "2c"], pointer(7, Some(11)))),
    ]);
    seat(&table, 500, &[1]).await;
    table.handle.deal().await;

    let response = table.handle.act(11, PlayerAction::Hit).await;
    assert_eq!(
        response,
        TableResponse::Error("Spot has already acted".to_string())
    );
    let view = table.view().await;
    assert_eq!(view.phase, Phase::PlayerTurn(11));
    assert_eq!(view.spots[0].cards.len(), 2);
    assert_eq!(view.error.as_deref(), Some("Spot has already acted"));

    assert_eq!(
        table.handle.act(11, PlayerAction::Hit).await,
        TableResponse::Success
    );
    let view = table.view().await;
    assert_eq!(view.spots[0].cards.len(), 3);
    assert_eq!(view.error, None);
}

#[tokio::test(start_paused = true)]
async fn test_failed_dealer_resolution_can_be_retried() {
    let table = TestTable::spawn(vec![
        Reply::Session(session(1, 6, 1)),
        Reply::Deal(deal(7, &["6h"], Some(11), vec![dealt(11, 1, &["Ts", "9d"])])),
        Reply::Action(action(11, &["Ts", "9d"], pointer(7, None))),
        Reply::Fail(EngineError::Status {
            status: 502,
            body: "bad gateway".into(),
        }),
        Reply::Dealer(dealer(
            7,
            &["6h", "Kc", "2d"],
            vec![settled(11, Outcome::Win, 500)],
            ShoeState::default(),
        )),
    ]);
    seat(&table, 500, &[1]).await;
    table.handle.deal().await;

    let response = table.handle.act(11, PlayerAction::Stand).await;
    assert!(matches!(response, TableResponse::Error(_)));
    assert_eq!(table.view().await.phase, Phase::DealerPending);

    sleep_ms(10_000).await;
    let view = table.view().await;
    assert!(view.is_dealt);
    assert_eq!(view.phase, Phase::DealerPending);

    assert_eq!(table.handle.resolve_dealer().await, TableResponse::Success);
    let view = table.view().await;
    assert_eq!(view.phase, Phase::Resolved);
    assert_eq!(view.spots[0].outcome, Some(Outcome::Win));
    assert_eq!(view.error, None);
}

// ============================================================================
// Shoe
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_shuffle_banner_clears_after_delay() {
    let table = TestTable::spawn(vec![
        Reply::Session(session(1, 6, 1)),
        Reply::Deal(deal(7, &["6h"], None, vec![dealt(11, 1, &["Ts", "9d"])])),
        Reply::Dealer(dealer(
            7,
            &["6h", "Kc", "4d"],
            vec![settled(11, Outcome::Loss, -500)],
            ShoeState {
                discarded_cards: 0,
                shuffle: true,
            },
        )),
    ]);
    seat(&table, 500, &[1]).await;
    table.handle.deal().await;
    assert!(table.view().await.shuffling);

    sleep_ms(5_900).await;
    assert!(table.view().await.shuffling);

    sleep_ms(200).await;
    assert!(!table.view().await.shuffling);
}

// ============================================================================
// Session lifecycle
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_resume_open_session() {
    let mut open = session(42, 8, 3);
    open.hand_count = 17;

    let table = TestTable::spawn(vec![
        Reply::ActiveSession(Some(open)),
        Reply::ActiveSession(None),
    ]);

    assert_eq!(table.handle.resume_session().await, TableResponse::Success);
    let view = table.view().await;
    assert_eq!(view.phase, Phase::Betting);
    assert_eq!(view.spots.len(), 3);
    assert_eq!(view.session.map(|s| s.hand_count), Some(17));

    assert!(matches!(
        table.handle.resume_session().await,
        TableResponse::Ignored(_)
    ));
}

#[tokio::test(start_paused = true)]
async fn test_end_session_cancels_pending_clear() {
    let table = TestTable::spawn(vec![
        Reply::Session(session(1, 6, 1)),
        Reply::Deal(deal(7, &["6h"], None, vec![dealt(11, 1, &["Ts", "9d"])])),
        Reply::Dealer(dealer(
            7,
            &["6h", "Kc", "4d"],
            vec![settled(11, Outcome::Loss, -500)],
            ShoeState::default(),
        )),
        Reply::Ended,
    ]);
    seat(&table, 500, &[1]).await;
    table.handle.deal().await;
    assert_eq!(table.view().await.phase, Phase::Resolved);

    assert_eq!(table.handle.end_session().await, TableResponse::Success);
    sleep_ms(10_000).await;

    let view = table.view().await;
    assert_eq!(view.phase, Phase::NoSession);
    assert!(view.spots.is_empty());
    assert_eq!(table.engine.calls().last(), Some(&Call::EndSession(1)));
}

#[tokio::test(start_paused = true)]
async fn test_end_session_refused_mid_hand() {
    let table = TestTable::spawn(vec![
        Reply::Session(session(1, 6, 1)),
        Reply::Deal(deal(7, &["6h"], Some(11), vec![dealt(11, 1, &["Ts", "9d"])])),
    ]);
    seat(&table, 500, &[1]).await;
    table.handle.deal().await;

    assert!(matches!(
        table.handle.end_session().await,
        TableResponse::Ignored(_)
    ));
    assert_eq!(table.engine.calls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_teardown_stops_actor() {
    let table = TestTable::spawn(vec![Reply::Session(session(1, 6, 1))]);
    table.handle.start_session(SessionConfig::default()).await;

    table.handle.teardown();
    table.actor.await.unwrap();

    assert_eq!(table.handle.deal().await, TableResponse::Closed);
    assert!(table.handle.view().await.is_none());
    assert!(table.handle.is_closed());
}

#[tokio::test(start_paused = true)]
async fn test_subscribers_see_every_change() {
    let table = TestTable::spawn(vec![Reply::Session(session(1, 6, 1))]);
    let mut updates = table.handle.subscribe().await.unwrap();

    let initial = updates.recv().await.unwrap();
    assert_eq!(initial.phase, Phase::NoSession);

    table.handle.start_session(SessionConfig::default()).await;

    let mut saw_loading = false;
    loop {
        let view = updates.recv().await.unwrap();
        saw_loading |= view.loading;
        if view.phase == Phase::Betting {
            assert!(!view.loading);
            break;
        }
    }
    assert!(saw_loading);
}

#[tokio::test(start_paused = true)]
async fn test_teardown_abandons_stalled_reveal() {
    use blackjack_table::table::{TableActor, TimingConfig};
    use std::sync::Arc;

    let engine = Arc::new(ScriptedEngine::new(vec![
        Reply::Session(session(1, 6, 1)),
        Reply::Deal(deal(7, &["6h"], Some(11), vec![dealt(11, 1, &["Ts", "9d"])])),
    ]));
    let (actor, handle, mut feed) = TableActor::new(engine, TimingConfig::default());
    let actor = tokio::spawn(actor.run());

    // Holds every reveal without ever completing it.
    let renderer = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Some(reveal) = feed.next_reveal().await {
            held.push(reveal);
        }
        held.len()
    });

    handle.start_session(SessionConfig::default()).await;
    handle.select_chip(500).await;
    handle.place_bet(SpotTarget::Number(1)).await;

    let dealer = handle.clone();
    let stalled = tokio::spawn(async move { dealer.deal().await });
    sleep_ms(1_000).await;
    assert!(!stalled.is_finished());

    handle.teardown();
    actor.await.unwrap();
    assert_eq!(stalled.await.unwrap(), TableResponse::Closed);
    assert_eq!(renderer.await.unwrap(), 1);
}
