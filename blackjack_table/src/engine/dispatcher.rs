//! Translates table commands into engine requests.
//!
//! The dispatcher checks only that the ids a request needs are present.
//! Whether an action is legal is the engine's decision.

use std::{collections::HashSet, future::Future, sync::Arc};
use tokio::time::Instant;

use super::{DispatchError, DispatchResult, EngineError, EngineResult, GameEngine};
use crate::{
    game::{
        entities::{HandId, PlayerAction, Session, SessionId, SpotId},
        patches::{
            ActionResult, DealResult, DealerResult, InsurancePatch, IntermediateResult,
            SpotInsurance, SpotWager,
        },
    },
    table::config::SessionConfig,
};

/// Engine calls slower than this are logged as warnings.
const SLOW_CALL_MS: u128 = 1_000;

/// Level a successful call of `elapsed_ms` is logged at.
fn completion_level(elapsed_ms: u128) -> log::Level {
    if elapsed_ms > SLOW_CALL_MS {
        log::Level::Warn
    } else {
        log::Level::Debug
    }
}

#[derive(Clone)]
pub struct ActionDispatcher {
    engine: Arc<dyn GameEngine>,
}

impl ActionDispatcher {
    pub fn new(engine: Arc<dyn GameEngine>) -> Self {
        Self { engine }
    }

    async fn timed<T>(
        operation: &'static str,
        call: impl Future<Output = EngineResult<T>>,
    ) -> DispatchResult<T> {
        log::debug!("Dispatching {operation}");
        let started = Instant::now();
        let result = call.await;
        let elapsed = started.elapsed().as_millis();

        match &result {
            Ok(_) => log::log!(
                completion_level(elapsed),
                "{operation} completed in {elapsed}ms"
            ),
            Err(err) => log::warn!("{operation} failed after {elapsed}ms: {err}"),
        }

        result.map_err(DispatchError::from)
    }

    pub async fn create_session(&self, config: &SessionConfig) -> DispatchResult<Session> {
        Self::timed("create_session", self.engine.create_session(config)).await
    }

    pub async fn active_session(&self) -> DispatchResult<Option<Session>> {
        Self::timed("active_session", self.engine.active_session()).await
    }

    pub async fn end_session(&self, session_id: Option<SessionId>) -> DispatchResult<()> {
        let session_id = session_id.ok_or(DispatchError::MissingSession)?;
        Self::timed("end_session", self.engine.end_session(session_id)).await
    }

    /// Deals to the given seats. Every seat in the result must be one that
    /// was wagered on.
    pub async fn deal(
        &self,
        session_id: Option<SessionId>,
        spots: &[SpotWager],
    ) -> DispatchResult<DealResult> {
        let session_id = session_id.ok_or(DispatchError::MissingSession)?;
        let result = Self::timed("deal_hand", self.engine.deal_hand(session_id, spots)).await?;

        let requested: HashSet<u8> = spots.iter().map(|spot| spot.spot_number).collect();
        if let Some(stray) = result
            .spots
            .iter()
            .find(|spot| !requested.contains(&spot.spot_number))
        {
            return Err(EngineError::Inconsistent(format!(
                "dealt to unwagered seat {}",
                stray.spot_number
            ))
            .into());
        }
        Ok(result)
    }

    pub async fn update_insurance(
        &self,
        spot_id: Option<SpotId>,
        insurance: bool,
    ) -> DispatchResult<InsurancePatch> {
        let spot_id = spot_id.ok_or(DispatchError::MissingSpot)?;
        let patch = Self::timed(
            "update_insurance",
            self.engine.update_insurance(spot_id, insurance),
        )
        .await?;

        if patch.id != spot_id {
            return Err(EngineError::Inconsistent(format!(
                "insurance answer for spot {} instead of {spot_id}",
                patch.id
            ))
            .into());
        }
        Ok(patch)
    }

    /// Submits answers for several spots. Patches for spots that were not
    /// part of the request are dropped.
    pub async fn insure_spots(
        &self,
        spots: &[SpotInsurance],
    ) -> DispatchResult<Vec<InsurancePatch>> {
        if spots.is_empty() {
            return Err(DispatchError::MissingSpot);
        }
        let patches = Self::timed("insure_spots", self.engine.insure_spots(spots)).await?;

        let requested: HashSet<SpotId> = spots.iter().map(|spot| spot.id).collect();
        Ok(patches
            .into_iter()
            .filter(|patch| requested.contains(&patch.id))
            .collect())
    }

    pub async fn intermediate_actions(
        &self,
        hand_id: Option<HandId>,
    ) -> DispatchResult<IntermediateResult> {
        let hand_id = hand_id.ok_or(DispatchError::MissingHand)?;
        Self::timed(
            "intermediate_actions",
            self.engine.intermediate_actions(hand_id),
        )
        .await
    }

    pub async fn player_action(
        &self,
        spot_id: Option<SpotId>,
        action: PlayerAction,
    ) -> DispatchResult<ActionResult> {
        let spot_id = spot_id.ok_or(DispatchError::MissingSpot)?;
        Self::timed("player_action", self.engine.player_action(spot_id, action)).await
    }

    pub async fn dealer_actions(&self, hand_id: Option<HandId>) -> DispatchResult<DealerResult> {
        let hand_id = hand_id.ok_or(DispatchError::MissingHand)?;
        Self::timed("dealer_actions", self.engine.dealer_actions(hand_id)).await
    }
}
