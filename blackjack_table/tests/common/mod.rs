//! Shared fixtures: a scripted engine and a table wired to an instant renderer.

#![allow(dead_code)]

use async_trait::async_trait;
use blackjack_table::{
    engine::{EngineError, EngineResult, GameEngine},
    game::{
        entities::{Card, Cents, HandId, Outcome, PlayerAction, Session, SessionId, SpotId},
        patches::{
            ActionResult, DealResult, DealerResult, DealtSpot, HandPointer, InsurancePatch,
            IntermediateResult, SessionCounters, SettlementPatch, ShoeState, SpotInsurance,
            SpotWager,
        },
    },
    table::{
        AnimationEvent, SessionConfig, TableActor, TableHandle, TableView, TimingConfig,
    },
};
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};
use tokio::task::JoinHandle;

/// A request as the engine received it.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateSession(SessionConfig),
    ActiveSession,
    EndSession(SessionId),
    DealHand(SessionId, Vec<SpotWager>),
    UpdateInsurance(SpotId, bool),
    InsureSpots(Vec<SpotInsurance>),
    IntermediateActions(HandId),
    PlayerAction(SpotId, PlayerAction),
    DealerActions(HandId),
}

/// The next scripted answer.
#[derive(Debug)]
pub enum Reply {
    Session(Session),
    ActiveSession(Option<Session>),
    Ended,
    Deal(DealResult),
    /// Confirm whatever insurance answers were sent
    EchoInsurance,
    Intermediate(IntermediateResult),
    Action(ActionResult),
    Dealer(DealerResult),
    Fail(EngineError),
}

/// Replays canned answers in order and records every request.
#[derive(Default)]
pub struct ScriptedEngine {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedEngine {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn push(&self, reply: Reply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.replies.lock().unwrap().len()
    }

    fn next(&self, call: Call) -> Reply {
        self.calls.lock().unwrap().push(call.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Reply::Fail(EngineError::Decode(format!("unscripted {call:?}"))))
    }
}

fn unexpected<T>(reply: Reply) -> EngineResult<T> {
    match reply {
        Reply::Fail(err) => Err(err),
        other => Err(EngineError::Decode(format!("script out of order: {other:?}"))),
    }
}

#[async_trait]
impl GameEngine for ScriptedEngine {
    async fn create_session(&self, config: &SessionConfig) -> EngineResult<Session> {
        match self.next(Call::CreateSession(*config)) {
            Reply::Session(session) => Ok(session),
            other => unexpected(other),
        }
    }

    async fn active_session(&self) -> EngineResult<Option<Session>> {
        match self.next(Call::ActiveSession) {
            Reply::ActiveSession(session) => Ok(session),
            other => unexpected(other),
        }
    }

    async fn end_session(&self, session_id: SessionId) -> EngineResult<()> {
        match self.next(Call::EndSession(session_id)) {
            Reply::Ended => Ok(()),
            other => unexpected(other),
        }
    }

    async fn deal_hand(
        &self,
        session_id: SessionId,
        spots: &[SpotWager],
    ) -> EngineResult<DealResult> {
        match self.next(Call::DealHand(session_id, spots.to_vec())) {
            Reply::Deal(result) => Ok(result),
            other => unexpected(other),
        }
    }

    async fn update_insurance(
        &self,
        spot_id: SpotId,
        insurance: bool,
    ) -> EngineResult<InsurancePatch> {
        match self.next(Call::UpdateInsurance(spot_id, insurance)) {
            Reply::EchoInsurance => Ok(InsurancePatch {
                id: spot_id,
                insurance: insurance.into(),
            }),
            other => unexpected(other),
        }
    }

    async fn insure_spots(&self, spots: &[SpotInsurance]) -> EngineResult<Vec<InsurancePatch>> {
        match self.next(Call::InsureSpots(spots.to_vec())) {
            Reply::EchoInsurance => Ok(spots
                .iter()
                .map(|spot| InsurancePatch {
                    id: spot.id,
                    insurance: spot.insurance.into(),
                })
                .collect()),
            other => unexpected(other),
        }
    }

    async fn intermediate_actions(&self, hand_id: HandId) -> EngineResult<IntermediateResult> {
        match self.next(Call::IntermediateActions(hand_id)) {
            Reply::Intermediate(result) => Ok(result),
            other => unexpected(other),
        }
    }

    async fn player_action(
        &self,
        spot_id: SpotId,
        action: PlayerAction,
    ) -> EngineResult<ActionResult> {
        match self.next(Call::PlayerAction(spot_id, action)) {
            Reply::Action(result) => Ok(result),
            other => unexpected(other),
        }
    }

    async fn dealer_actions(&self, hand_id: HandId) -> EngineResult<DealerResult> {
        match self.next(Call::DealerActions(hand_id)) {
            Reply::Dealer(result) => Ok(result),
            other => unexpected(other),
        }
    }
}

/// A running table whose renderer completes every reveal at once.
pub struct TestTable {
    pub handle: TableHandle,
    pub engine: Arc<ScriptedEngine>,
    pub reveals: Arc<Mutex<Vec<AnimationEvent>>>,
    pub actor: JoinHandle<()>,
}

impl TestTable {
    pub fn spawn(replies: Vec<Reply>) -> Self {
        Self::spawn_with_timing(replies, TimingConfig::default())
    }

    pub fn spawn_with_timing(replies: Vec<Reply>, timing: TimingConfig) -> Self {
        let engine = Arc::new(ScriptedEngine::new(replies));
        let (actor, handle, mut feed) = TableActor::new(engine.clone(), timing);
        let actor = tokio::spawn(actor.run());

        let reveals = Arc::new(Mutex::new(Vec::new()));
        let seen = reveals.clone();
        tokio::spawn(async move {
            while let Some(reveal) = feed.next_reveal().await {
                seen.lock().unwrap().push(reveal.event);
                reveal.complete();
            }
        });

        Self {
            handle,
            engine,
            reveals,
            actor,
        }
    }

    pub async fn view(&self) -> TableView {
        self.handle.view().await.expect("table is running")
    }

    pub fn reveal_count(&self) -> usize {
        self.reveals.lock().unwrap().len()
    }
}

pub fn card(s: &str) -> Card {
    s.parse().expect("valid card")
}

pub fn cards(list: &[&str]) -> Vec<Card> {
    list.iter().map(|c| card(c)).collect()
}

pub fn session(id: SessionId, decks: u8, num_spots: u8) -> Session {
    Session {
        id,
        decks,
        num_spots,
        penetration: 75,
        six_five: false,
        stand17: true,
        start_time: None,
        end_time: None,
        hand_count: 0,
        shoe_count: 0,
        spot_count: 0,
        profit: 0,
    }
}

pub fn dealt(id: SpotId, spot_number: u8, player_cards: &[&str]) -> DealtSpot {
    DealtSpot {
        id,
        spot_number,
        cards: cards(player_cards),
        ..DealtSpot::default()
    }
}

pub fn deal(
    hand_id: HandId,
    dealer: &[&str],
    current_spot_id: Option<SpotId>,
    spots: Vec<DealtSpot>,
) -> DealResult {
    DealResult {
        id: hand_id,
        dealer_cards: cards(dealer),
        insurance_offered: false,
        current_spot_id,
        spots,
    }
}

pub fn pointer(hand_id: HandId, current_spot_id: Option<SpotId>) -> HandPointer {
    HandPointer {
        id: hand_id,
        dealer_cards: None,
        current_spot_id,
    }
}

pub fn action(spot_id: SpotId, player_cards: &[&str], hand: HandPointer) -> ActionResult {
    ActionResult {
        id: spot_id,
        cards: cards(player_cards),
        hand,
        ..ActionResult::default()
    }
}

pub fn settled(spot_id: SpotId, outcome: Outcome, profit: Cents) -> SettlementPatch {
    SettlementPatch {
        id: spot_id,
        outcome: Some(outcome),
        profit: Some(profit),
        ..SettlementPatch::default()
    }
}

pub fn dealer(
    hand_id: HandId,
    dealer_cards: &[&str],
    spots: Vec<SettlementPatch>,
    shoe: ShoeState,
) -> DealerResult {
    let profit = spots.iter().filter_map(|spot| spot.profit).sum();
    DealerResult {
        hand: HandPointer {
            id: hand_id,
            dealer_cards: Some(cards(dealer_cards)),
            current_spot_id: None,
        },
        session: SessionCounters {
            shoe_count: 1,
            profit,
            hand_count: 1,
            spot_count: u32::try_from(spots.len()).unwrap_or(0),
        },
        spots,
        shoe,
    }
}
