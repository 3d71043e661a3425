//! Table actor implementation with async message handling.
//!
//! The actor owns the [`TableState`] and is the only place it changes.
//! Commands from [`TableHandle`]s and delayed transitions from the
//! scheduler arrive through the same inbox and are handled one at a time.

use super::{
    animation::{AnimationFeed, AnimationQueue},
    config::{SessionConfig, TimingConfig},
    insurance::{InsuranceCoordinator, InsuranceMode},
    messages::{Phase, TableMessage, TableResponse, TableView},
    reveal::{CardCounts, plan_reveals},
    scheduler::Scheduled,
    timers::{BustRevealTimer, ShuffleNotifier, TableScheduler, TimerKey, Transition},
};
use crate::{
    engine::{ActionDispatcher, DispatchResult, GameEngine},
    game::{
        entities::{CHIP_VALUES, Cents, PlayerAction, Session, SpotId, SpotTarget, format_money},
        state::TableState,
    },
};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};

const INBOX_CAPACITY: usize = 100;
const SUBSCRIBER_CAPACITY: usize = 32;

/// Table actor handle for sending commands
#[derive(Clone)]
pub struct TableHandle {
    sender: mpsc::Sender<TableMessage>,
    shutdown: Arc<watch::Sender<bool>>,
}

impl TableHandle {
    async fn request(
        &self,
        message: impl FnOnce(oneshot::Sender<TableResponse>) -> TableMessage,
    ) -> TableResponse {
        let (response, receiver) = oneshot::channel();
        if self.sender.send(message(response)).await.is_err() {
            return TableResponse::Closed;
        }
        receiver.await.unwrap_or(TableResponse::Closed)
    }

    pub async fn start_session(&self, config: SessionConfig) -> TableResponse {
        self.request(|response| TableMessage::StartSession { config, response })
            .await
    }

    pub async fn resume_session(&self) -> TableResponse {
        self.request(|response| TableMessage::ResumeSession { response })
            .await
    }

    pub async fn end_session(&self) -> TableResponse {
        self.request(|response| TableMessage::EndSession { response })
            .await
    }

    pub async fn select_chip(&self, value: Cents) -> TableResponse {
        self.request(|response| TableMessage::SelectChip { value, response })
            .await
    }

    pub async fn set_bet_all(&self, enabled: bool) -> TableResponse {
        self.request(|response| TableMessage::SetBetAll { enabled, response })
            .await
    }

    pub async fn place_bet(&self, target: SpotTarget) -> TableResponse {
        self.request(|response| TableMessage::PlaceBet { target, response })
            .await
    }

    pub async fn clear_bet(&self, target: SpotTarget) -> TableResponse {
        self.request(|response| TableMessage::ClearBet { target, response })
            .await
    }

    pub async fn deal(&self) -> TableResponse {
        self.request(|response| TableMessage::Deal { response }).await
    }

    pub async fn act(&self, spot_id: SpotId, action: PlayerAction) -> TableResponse {
        self.request(|response| TableMessage::Act {
            spot_id,
            action,
            response,
        })
        .await
    }

    pub async fn insure_all(&self, insure: bool) -> TableResponse {
        self.request(|response| TableMessage::InsureAll { insure, response })
            .await
    }

    pub async fn insure_individually(&self) -> TableResponse {
        self.request(|response| TableMessage::InsureIndividually { response })
            .await
    }

    pub async fn insure_spot(&self, spot_id: SpotId, insure: bool) -> TableResponse {
        self.request(|response| TableMessage::InsureSpot {
            spot_id,
            insure,
            response,
        })
        .await
    }

    /// Retries whichever settlement request last failed.
    pub async fn resolve_dealer(&self) -> TableResponse {
        self.request(|response| TableMessage::ResolveDealer { response })
            .await
    }

    /// Current table snapshot, or `None` once the table has shut down.
    pub async fn view(&self) -> Option<TableView> {
        let (response, receiver) = oneshot::channel();
        self.sender
            .send(TableMessage::GetView { response })
            .await
            .ok()?;
        receiver.await.ok()
    }

    /// Receives a snapshot after every change, starting with the current one.
    pub async fn subscribe(&self) -> Option<mpsc::Receiver<TableView>> {
        let (sender, receiver) = mpsc::channel(SUBSCRIBER_CAPACITY);
        self.sender
            .send(TableMessage::Subscribe { sender })
            .await
            .ok()?;
        Some(receiver)
    }

    /// Stops the table. Pending timers and any reveal in progress are
    /// abandoned.
    pub fn teardown(&self) {
        self.shutdown.send_replace(true);
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Everything the settlement transitions touch, kept apart from the
/// scheduler that arms their follow-ups.
struct TableCore {
    state: TableState,
    phase: Phase,
    dispatcher: ActionDispatcher,
    animations: AnimationQueue,
    insurance: InsuranceCoordinator,
    subscribers: Vec<mpsc::Sender<TableView>>,
}

impl TableCore {
    fn view(&self) -> TableView {
        TableView::new(&self.state, self.phase, self.insurance.mode())
    }

    /// Broadcast the current view to all subscribers
    fn publish(&mut self) {
        if self.subscribers.is_empty() {
            return;
        }
        let view = self.view();
        self.subscribers
            .retain(|sender| match sender.try_send(view.clone()) {
                Ok(()) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    log::warn!("Subscriber channel full, dropping table update");
                    true
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    log::debug!("Subscriber disconnected, removing");
                    false
                }
            });
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            log::debug!("Phase {} -> {}", self.phase, phase);
            self.phase = phase;
        }
    }

    /// Derives the phase from the state after a hand-level result.
    fn settle_phase(&mut self) {
        let phase = if self.state.session.is_none() {
            Phase::NoSession
        } else if !self.state.is_dealt {
            Phase::Betting
        } else if self.state.insurance_offered {
            Phase::InsurancePending
        } else if let Some(spot_id) = self.state.hand.current_spot_id {
            Phase::PlayerTurn(spot_id)
        } else {
            Phase::DealerPending
        };
        self.set_phase(phase);
    }

    fn begin_request(&mut self) {
        self.state.loading = true;
        self.publish();
    }

    /// Local refusals come back as `Ignored`. Engine failures replace the
    /// error slot and a success clears it.
    fn finish_request<T>(&mut self, result: DispatchResult<T>) -> Result<T, TableResponse> {
        self.state.loading = false;
        match result {
            Ok(value) => {
                self.state.clear_error();
                Ok(value)
            }
            Err(err) if err.is_local() => {
                log::debug!("Request refused locally: {err}");
                Err(TableResponse::Ignored(err.to_string()))
            }
            Err(err) => {
                let message = err.client_message();
                log::warn!("Engine request failed: {err}");
                self.state.set_error(message.clone());
                Err(TableResponse::Error(message))
            }
        }
    }

    /// Plays every card that appeared since `before`. State is already
    /// authoritative, so a missing renderer only costs the animation.
    async fn reveal(&mut self, before: &CardCounts) {
        let events = plan_reveals(before, &self.state);
        if events.is_empty() {
            return;
        }
        log::debug!("Revealing {} cards", events.len());
        if let Err(err) = self.animations.play(events).await {
            log::warn!("Card reveal skipped: {err}");
        }
    }

    async fn resolve_insurance(&mut self) -> Result<(), TableResponse> {
        self.begin_request();
        let before = CardCounts::snapshot(&self.state);
        let result = self
            .dispatcher
            .intermediate_actions(self.state.hand.id)
            .await;
        let update = self.finish_request(result)?;

        self.state.apply_intermediate_result(update);
        self.settle_phase();
        self.publish();
        self.reveal(&before).await;
        Ok(())
    }

    async fn resolve_dealer(&mut self) -> Result<(), TableResponse> {
        self.set_phase(Phase::DealerTurn);
        self.begin_request();
        let before = CardCounts::snapshot(&self.state);
        let result = self.dispatcher.dealer_actions(self.state.hand.id).await;
        let update = match self.finish_request(result) {
            Ok(update) => update,
            Err(response) => {
                self.set_phase(Phase::DealerPending);
                return Err(response);
            }
        };

        self.state.apply_dealer_result(update);
        self.publish();
        self.reveal(&before).await;
        self.set_phase(Phase::Resolved);

        if let Some(session) = &self.state.session {
            log::info!(
                "Hand {:?} settled, session profit {} over {} hands",
                self.state.hand.id,
                format_money(session.profit, true),
                session.hand_count
            );
        }
        Ok(())
    }
}

/// Table actor orchestrating one blackjack table
pub struct TableActor {
    core: TableCore,

    /// Delayed transitions, keyed per hand
    scheduler: TableScheduler,

    timing: TimingConfig,

    reveal_timer: BustRevealTimer,

    shuffle_notifier: ShuffleNotifier,

    /// Message inbox
    inbox: mpsc::Receiver<TableMessage>,

    /// Flips to `true` on teardown
    shutdown: watch::Receiver<bool>,
}

impl TableActor {
    /// Create a new table actor
    ///
    /// # Returns
    ///
    /// * `(TableActor, TableHandle, AnimationFeed)` - Actor, handle for sending
    ///   commands and the feed a renderer drains card reveals from
    pub fn new(
        engine: Arc<dyn GameEngine>,
        timing: TimingConfig,
    ) -> (Self, TableHandle, AnimationFeed) {
        let (sender, inbox) = mpsc::channel(INBOX_CAPACITY);
        let (shutdown_tx, shutdown) = watch::channel(false);
        let (animations, feed) = AnimationQueue::new(1);

        let actor = Self {
            core: TableCore {
                state: TableState::new(),
                phase: Phase::NoSession,
                dispatcher: ActionDispatcher::new(engine),
                animations,
                insurance: InsuranceCoordinator::new(),
                subscribers: Vec::new(),
            },
            scheduler: TableScheduler::new(sender.clone()),
            timing,
            reveal_timer: BustRevealTimer::new(timing.reveal_grace()),
            shuffle_notifier: ShuffleNotifier::new(timing.shuffle_banner()),
            inbox,
            shutdown,
        };

        let handle = TableHandle {
            sender,
            shutdown: Arc::new(shutdown_tx),
        };

        (actor, handle, feed)
    }

    /// Run the table actor event loop
    pub async fn run(mut self) {
        log::info!("Blackjack table starting");
        let mut shutdown = self.shutdown.clone();

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }

                message = self.inbox.recv() => {
                    let Some(message) = message else {
                        break;
                    };

                    // Teardown abandons whatever the message was waiting on.
                    tokio::select! {
                        changed = shutdown.changed() => {
                            if changed.is_err() || *shutdown.borrow() {
                                break;
                            }
                        }
                        () = self.handle_message(message) => {}
                    }
                }
            }
        }

        let cancelled = self.scheduler.cancel_all();
        log::info!("Blackjack table closed ({cancelled} timers cancelled)");
    }

    /// Handle a table message
    async fn handle_message(&mut self, message: TableMessage) {
        match message {
            TableMessage::StartSession { config, response } => {
                let result = self.handle_start_session(config).await;
                let _ = response.send(result);
            }

            TableMessage::ResumeSession { response } => {
                let result = self.handle_resume_session().await;
                let _ = response.send(result);
            }

            TableMessage::EndSession { response } => {
                let result = self.handle_end_session().await;
                let _ = response.send(result);
            }

            TableMessage::SelectChip { value, response } => {
                let result = self.handle_select_chip(value);
                let _ = response.send(result);
            }

            TableMessage::SetBetAll { enabled, response } => {
                self.core.state.bet_all = enabled;
                let _ = response.send(TableResponse::Success);
            }

            TableMessage::PlaceBet { target, response } => {
                let result = self.handle_place_bet(target);
                let _ = response.send(result);
            }

            TableMessage::ClearBet { target, response } => {
                let result = self.handle_clear_bet(target);
                let _ = response.send(result);
            }

            TableMessage::Deal { response } => {
                let result = self.handle_deal().await;
                let _ = response.send(result);
            }

            TableMessage::Act {
                spot_id,
                action,
                response,
            } => {
                let result = self.handle_act(spot_id, action).await;
                let _ = response.send(result);
            }

            TableMessage::InsureAll { insure, response } => {
                let result = self.handle_insure_all(insure).await;
                let _ = response.send(result);
            }

            TableMessage::InsureIndividually { response } => {
                let result = self.handle_insure_individually();
                let _ = response.send(result);
            }

            TableMessage::InsureSpot {
                spot_id,
                insure,
                response,
            } => {
                let result = self.handle_insure_spot(spot_id, insure).await;
                let _ = response.send(result);
            }

            TableMessage::ResolveDealer { response } => {
                let result = self.handle_retry().await;
                let _ = response.send(result);
            }

            TableMessage::GetView { response } => {
                let _ = response.send(self.core.view());
                return;
            }

            TableMessage::Subscribe { sender } => {
                let _ = sender.try_send(self.core.view());
                self.core.subscribers.push(sender);
                log::debug!("Subscriber added ({} total)", self.core.subscribers.len());
                return;
            }

            TableMessage::Transition(transition) => {
                self.handle_transition(transition).await;
            }
        }

        self.core.publish();
    }

    fn install_session(&mut self, session: Session) {
        log::info!(
            "Session {} started: {} decks, {} spots, {}% penetration, blackjack pays {}",
            session.id,
            session.decks,
            session.num_spots,
            session.penetration,
            session.payout()
        );
        self.scheduler.cancel_all();
        self.core.insurance.reset();
        self.core.state.start_session(session);
        self.core.set_phase(Phase::Betting);
    }

    async fn handle_start_session(&mut self, config: SessionConfig) -> TableResponse {
        if let Err(err) = config.validate() {
            return TableResponse::Ignored(err.to_string());
        }
        if self.core.state.is_dealt {
            return TableResponse::Ignored("Hand in progress".to_string());
        }

        self.core.begin_request();
        let result = self.core.dispatcher.create_session(&config).await;
        match self.core.finish_request(result) {
            Ok(session) => {
                self.install_session(session);
                TableResponse::Success
            }
            Err(response) => response,
        }
    }

    async fn handle_resume_session(&mut self) -> TableResponse {
        if self.core.state.session.is_some() {
            return TableResponse::Ignored("Session already active".to_string());
        }

        self.core.begin_request();
        let result = self.core.dispatcher.active_session().await;
        match self.core.finish_request(result) {
            Ok(Some(session)) => {
                self.install_session(session);
                TableResponse::Success
            }
            Ok(None) => TableResponse::Ignored("No open session to resume".to_string()),
            Err(response) => response,
        }
    }

    async fn handle_end_session(&mut self) -> TableResponse {
        if self.core.state.is_dealt && self.core.phase != Phase::Resolved {
            return TableResponse::Ignored("Hand in progress".to_string());
        }

        self.core.begin_request();
        let result = self
            .core
            .dispatcher
            .end_session(self.core.state.session_id())
            .await;
        if let Err(response) = self.core.finish_request(result) {
            return response;
        }

        let cancelled = self.scheduler.cancel_all();
        log::info!(
            "Session {:?} ended ({cancelled} timers cancelled)",
            self.core.state.session_id()
        );
        self.core.insurance.reset();
        self.core.state.end_session();
        self.core.set_phase(Phase::NoSession);
        TableResponse::Success
    }

    fn handle_select_chip(&mut self, value: Cents) -> TableResponse {
        if !CHIP_VALUES.contains(&value) {
            return TableResponse::Ignored(format!("No {} chip", format_money(value, false)));
        }
        self.core.state.selected_chip = Some(value);
        TableResponse::Success
    }

    fn handle_place_bet(&mut self, target: SpotTarget) -> TableResponse {
        let state = &mut self.core.state;
        if state.session.is_none() {
            return TableResponse::Ignored("No active session".to_string());
        }
        if state.is_dealt {
            return TableResponse::Ignored("Wagers are locked while a hand is in play".to_string());
        }
        let Some(chip) = state.selected_chip else {
            return TableResponse::Ignored("Select a chip first".to_string());
        };

        if state.set_wager(target, chip) {
            TableResponse::Success
        } else {
            TableResponse::Ignored(format!("No spot {target:?}"))
        }
    }

    fn handle_clear_bet(&mut self, target: SpotTarget) -> TableResponse {
        let state = &mut self.core.state;
        if state.is_dealt {
            return TableResponse::Ignored("Wagers are locked while a hand is in play".to_string());
        }
        if state.clear_wager(target) {
            TableResponse::Success
        } else {
            TableResponse::Ignored("Nothing to clear".to_string())
        }
    }

    async fn handle_deal(&mut self) -> TableResponse {
        let core = &mut self.core;
        if core.state.session.is_none() {
            return TableResponse::Ignored("No active session".to_string());
        }
        if core.state.is_dealt {
            return TableResponse::Ignored("Hand already in progress".to_string());
        }
        let wagers = core.state.wagers();
        if wagers.is_empty() {
            return TableResponse::Ignored("Place a bet before dealing".to_string());
        }

        core.begin_request();
        let before = CardCounts::snapshot(&core.state);
        let result = core.dispatcher.deal(core.state.session_id(), &wagers).await;
        let deal = match core.finish_request(result) {
            Ok(deal) => deal,
            Err(response) => return response,
        };

        log::info!(
            "Hand {} dealt to {} spots ({} wagered)",
            deal.id,
            deal.spots.len(),
            format_money(core.state.total_wager(), false)
        );
        core.insurance.reset();
        core.state.apply_deal_result(deal);
        core.settle_phase();
        core.publish();
        core.reveal(&before).await;

        self.arm_natural_reveals();
        self.advance_to_dealer().await
    }

    async fn handle_act(&mut self, spot_id: SpotId, action: PlayerAction) -> TableResponse {
        let core = &mut self.core;
        if core.state.insurance_offered {
            return TableResponse::Ignored("Insurance decision pending".to_string());
        }
        if !core.state.is_dealt || core.state.hand.current_spot_id != Some(spot_id) {
            return TableResponse::Ignored(format!("Spot {spot_id} is not the active spot"));
        }
        if let Some(spot) = core.state.spot_by_id(spot_id) {
            match action {
                PlayerAction::Double if spot.cards.len() != 2 => {
                    return TableResponse::Ignored("Double is only allowed on two cards".to_string());
                }
                PlayerAction::Split if !spot.split_offered => {
                    return TableResponse::Ignored("Split is not offered".to_string());
                }
                _ => {}
            }
        }

        core.begin_request();
        let before = CardCounts::snapshot(&core.state);
        let result = core.dispatcher.player_action(Some(spot_id), action).await;
        let update = match core.finish_request(result) {
            Ok(update) => update,
            Err(response) => return response,
        };

        log::debug!("Spot {spot_id} {action}");
        core.state.apply_action_result(update);
        core.settle_phase();
        core.publish();
        core.reveal(&before).await;

        if let Some(hand_id) = self.core.state.hand.id
            && let Some(spot) = self.core.state.spot_by_id(spot_id)
            && spot.is_bust
            && spot.active
        {
            self.reveal_timer.arm(&mut self.scheduler, hand_id, spot_id);
        }
        self.advance_to_dealer().await
    }

    async fn handle_insure_all(&mut self, insure: bool) -> TableResponse {
        let core = &mut self.core;
        if core.phase != Phase::InsurancePending {
            return TableResponse::Ignored("Insurance is not on offer".to_string());
        }
        if !core.insurance.is_group() {
            return TableResponse::Ignored("Insurance is being decided per spot".to_string());
        }

        let decisions = InsuranceCoordinator::group_decisions(&core.state, insure);
        if !decisions.is_empty() {
            core.begin_request();
            let result = core.dispatcher.insure_spots(&decisions).await;
            let patches = match core.finish_request(result) {
                Ok(patches) => patches,
                Err(response) => return response,
            };
            log::debug!("Group insurance {insure} recorded for {} spots", patches.len());
            core.state.apply_insurance(&patches);
        }

        if !InsuranceCoordinator::is_complete(&self.core.state) {
            return TableResponse::Ignored("Not every spot has answered".to_string());
        }
        self.settle_insurance().await
    }

    fn handle_insure_individually(&mut self) -> TableResponse {
        if self.core.phase != Phase::InsurancePending {
            return TableResponse::Ignored("Insurance is not on offer".to_string());
        }
        if self.core.insurance.switch_to_individual() {
            TableResponse::Success
        } else {
            TableResponse::Ignored("Already deciding per spot".to_string())
        }
    }

    async fn handle_insure_spot(&mut self, spot_id: SpotId, insure: bool) -> TableResponse {
        let core = &mut self.core;
        if core.phase != Phase::InsurancePending {
            return TableResponse::Ignored("Insurance is not on offer".to_string());
        }
        if core.insurance.mode() != InsuranceMode::Individual {
            return TableResponse::Ignored("Switch to per-spot insurance first".to_string());
        }
        if !core
            .state
            .spot_by_id(spot_id)
            .is_some_and(InsuranceCoordinator::is_eligible)
        {
            return TableResponse::Ignored(format!("Spot {spot_id} cannot take insurance"));
        }

        core.begin_request();
        let result = core.dispatcher.update_insurance(Some(spot_id), insure).await;
        let patch = match core.finish_request(result) {
            Ok(patch) => patch,
            Err(response) => return response,
        };
        core.state.apply_insurance(&[patch]);

        if !InsuranceCoordinator::is_complete(&core.state) {
            return TableResponse::Success;
        }
        self.settle_insurance().await
    }

    /// Re-issues the settlement request a failure left pending.
    async fn handle_retry(&mut self) -> TableResponse {
        match self.core.phase {
            Phase::DealerPending => self.advance_to_dealer().await,
            Phase::InsurancePending if InsuranceCoordinator::is_complete(&self.core.state) => {
                self.settle_insurance().await
            }
            phase => TableResponse::Ignored(format!("Nothing to resolve during {phase}")),
        }
    }

    /// Resolves the dealer once no spot owes an action, then clears the
    /// table after the clear delay.
    async fn advance_to_dealer(&mut self) -> TableResponse {
        let Some(hand_id) = self.core.state.hand.id else {
            return TableResponse::Success;
        };
        let delay = self.timing.clear_delay();

        let outcome: Result<Scheduled, TableResponse> = self
            .scheduler
            .pre_check(
                &mut self.core,
                |core| core.phase == Phase::DealerPending,
                |core| Box::pin(core.resolve_dealer()),
                TimerKey::ClearTable(hand_id),
                Transition::ClearTable { hand_id }.into(),
                delay,
            )
            .await;

        if self.core.state.shuffling {
            self.shuffle_notifier.arm(&mut self.scheduler);
        }
        match outcome {
            Ok(_) => TableResponse::Success,
            Err(response) => response,
        }
    }

    /// Settles insurance, then hands over to the dealer after a pause if no
    /// spot owes an action.
    async fn settle_insurance(&mut self) -> TableResponse {
        let Some(hand_id) = self.core.state.hand.id else {
            return TableResponse::Ignored("No hand in progress".to_string());
        };
        let delay = self.timing.insurance_settle();

        let outcome: Result<Scheduled, TableResponse> = self
            .scheduler
            .post_check(
                &mut self.core,
                |core| core.phase == Phase::DealerPending,
                |core| Box::pin(core.resolve_insurance()),
                TimerKey::SettleInsurance(hand_id),
                Transition::ResolveDealer { hand_id }.into(),
                delay,
            )
            .await;

        match outcome {
            Ok(_) => {
                self.arm_natural_reveals();
                TableResponse::Success
            }
            Err(response) => response,
        }
    }

    /// Naturals stay in play until insurance is settled, so every wagered
    /// spot can still answer the offer.
    fn arm_natural_reveals(&mut self) {
        if self.core.state.insurance_offered {
            return;
        }
        let Some(hand_id) = self.core.state.hand.id else {
            return;
        };
        for spot in &self.core.state.spots {
            if spot.active
                && spot.is_blackjack
                && let Some(spot_id) = spot.id
            {
                self.reveal_timer.arm(&mut self.scheduler, hand_id, spot_id);
            }
        }
    }

    async fn handle_transition(&mut self, transition: Transition) {
        self.scheduler.fired(&transition.key());

        match transition {
            Transition::ClearTable { hand_id } => {
                if !self.core.state.is_current_hand(hand_id) {
                    log::debug!("Ignoring clear for finished hand {hand_id}");
                    return;
                }
                self.core.set_phase(Phase::Clearing);
                self.scheduler
                    .cancel_where(|key| key.hand_id() == Some(hand_id));
                self.core.state.clear_table();
                self.core.insurance.reset();
                self.core.set_phase(Phase::Betting);
            }

            Transition::ResolveDealer { hand_id } => {
                if self.core.state.is_current_hand(hand_id) {
                    // Failures land in the error slot for the player to retry.
                    let _ = self.advance_to_dealer().await;
                }
            }

            Transition::RevealElapsed { hand_id, spot_id } => {
                if self.core.state.is_current_hand(hand_id)
                    && let Some(discarded) = self.core.state.mark_spot_inactive(spot_id)
                {
                    log::debug!("Spot {spot_id} left play, {discarded} cards discarded");
                }
            }

            Transition::ShuffleBannerElapsed => {
                self.core.state.clear_shuffle();
            }
        }
    }
}
