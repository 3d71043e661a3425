//! The seam between the table and the remote game engine.
//!
//! The engine owns every blackjack rule: dealing, legality of actions,
//! dealer play and settlement. The table only sends requests through
//! [`GameEngine`] and folds the typed results back into its state.

pub mod dispatcher;
pub mod errors;

pub use dispatcher::ActionDispatcher;
pub use errors::{DispatchError, DispatchResult, EngineError, EngineResult};

use async_trait::async_trait;

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

/// Remote blackjack engine operations.
#[async_trait]
pub trait GameEngine: Send + Sync {
    /// Start a new session with the given table rules
    async fn create_session(&self, config: &SessionConfig) -> EngineResult<Session>;

    /// The caller's unfinished session, if any
    async fn active_session(&self) -> EngineResult<Option<Session>>;

    /// Close a session
    async fn end_session(&self, session_id: SessionId) -> EngineResult<()>;

    /// Deal a hand to every wagered seat
    async fn deal_hand(&self, session_id: SessionId, spots: &[SpotWager])
    -> EngineResult<DealResult>;

    /// Record one spot's insurance answer
    async fn update_insurance(&self, spot_id: SpotId, insurance: bool)
    -> EngineResult<InsurancePatch>;

    /// Record insurance answers for several spots at once
    async fn insure_spots(&self, spots: &[SpotInsurance]) -> EngineResult<Vec<InsurancePatch>>;

    /// Settle insurance and peek for a dealer blackjack
    async fn intermediate_actions(&self, hand_id: HandId) -> EngineResult<IntermediateResult>;

    /// Apply a player decision to a spot
    async fn player_action(&self, spot_id: SpotId, action: PlayerAction)
    -> EngineResult<ActionResult>;

    /// Play out the dealer's hand and settle every spot
    async fn dealer_actions(&self, hand_id: HandId) -> EngineResult<DealerResult>;
}
