//! Table actor message types.

use serde::Serialize;
use tokio::sync::{mpsc, oneshot};

use super::{config::SessionConfig, insurance::InsuranceMode, timers::Transition};
use crate::game::{
    entities::{Cents, Hand, PlayerAction, Session, Spot, SpotId, SpotTarget},
    state::TableState,
};

/// Messages that can be sent to a TableActor
#[derive(Debug)]
pub enum TableMessage {
    /// Create a session with the given rules
    StartSession {
        config: SessionConfig,
        response: oneshot::Sender<TableResponse>,
    },

    /// Continue the engine's open session, if there is one
    ResumeSession {
        response: oneshot::Sender<TableResponse>,
    },

    /// Close the current session
    EndSession {
        response: oneshot::Sender<TableResponse>,
    },

    /// Pick the chip that `PlaceBet` adds
    SelectChip {
        value: Cents,
        response: oneshot::Sender<TableResponse>,
    },

    /// Toggle betting on every spot at once
    SetBetAll {
        enabled: bool,
        response: oneshot::Sender<TableResponse>,
    },

    /// Add the selected chip to a spot
    PlaceBet {
        target: SpotTarget,
        response: oneshot::Sender<TableResponse>,
    },

    /// Remove a spot's wager
    ClearBet {
        target: SpotTarget,
        response: oneshot::Sender<TableResponse>,
    },

    /// Deal a hand to every wagered spot
    Deal {
        response: oneshot::Sender<TableResponse>,
    },

    /// Player decision for the active spot
    Act {
        spot_id: SpotId,
        action: PlayerAction,
        response: oneshot::Sender<TableResponse>,
    },

    /// Answer insurance for every eligible spot at once
    InsureAll {
        insure: bool,
        response: oneshot::Sender<TableResponse>,
    },

    /// Switch to per-spot insurance answers for this hand
    InsureIndividually {
        response: oneshot::Sender<TableResponse>,
    },

    /// Answer insurance for one spot
    InsureSpot {
        spot_id: SpotId,
        insure: bool,
        response: oneshot::Sender<TableResponse>,
    },

    /// Retry dealer resolution after a failure
    ResolveDealer {
        response: oneshot::Sender<TableResponse>,
    },

    /// Get a snapshot of the table
    GetView {
        response: oneshot::Sender<TableView>,
    },

    /// Subscribe to table snapshots published after every change
    Subscribe { sender: mpsc::Sender<TableView> },

    /// Internal: a delayed transition became due
    Transition(Transition),
}

/// Response from table operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableResponse {
    /// Operation succeeded
    Success,

    /// Refused locally without contacting the engine
    Ignored(String),

    /// The engine call failed; the message is also in the error slot
    Error(String),

    /// The table has shut down
    Closed,
}

impl TableResponse {
    /// Check if response is success
    pub fn is_success(&self) -> bool {
        matches!(self, TableResponse::Success)
    }

    /// Get error message if response is error
    pub fn error_message(&self) -> Option<String> {
        match self {
            TableResponse::Error(msg) => Some(msg.clone()),
            TableResponse::Closed => Some("Table is closed".to_string()),
            _ => None,
        }
    }
}

/// Where the table is in the hand lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    NoSession,
    Betting,
    InsurancePending,
    PlayerTurn(SpotId),
    DealerPending,
    DealerTurn,
    Resolved,
    Clearing,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::NoSession => write!(f, "no session"),
            Phase::Betting => write!(f, "betting"),
            Phase::InsurancePending => write!(f, "insurance"),
            Phase::PlayerTurn(spot_id) => write!(f, "player turn (spot {spot_id})"),
            Phase::DealerPending => write!(f, "dealer pending"),
            Phase::DealerTurn => write!(f, "dealer turn"),
            Phase::Resolved => write!(f, "resolved"),
            Phase::Clearing => write!(f, "clearing"),
        }
    }
}

/// Table snapshot for front-ends
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub phase: Phase,
    pub session: Option<Session>,
    pub hand: Hand,
    pub spots: Vec<Spot>,
    pub is_dealt: bool,
    pub insurance_offered: bool,
    pub insurance_mode: InsuranceMode,
    pub bet_all: bool,
    pub selected_chip: Option<Cents>,
    pub total_wager: Cents,
    pub can_deal: bool,
    pub discarded_cards: u32,
    /// Share of the shoe in the discard tray, `0.0..=1.0`
    pub discard_fraction: f64,
    pub shuffling: bool,
    pub loading: bool,
    pub error: Option<String>,
}

impl TableView {
    pub fn new(state: &TableState, phase: Phase, insurance_mode: InsuranceMode) -> Self {
        Self {
            phase,
            session: state.session.clone(),
            hand: state.hand.clone(),
            spots: state.spots.clone(),
            is_dealt: state.is_dealt,
            insurance_offered: state.insurance_offered,
            insurance_mode,
            bet_all: state.bet_all,
            selected_chip: state.selected_chip,
            total_wager: state.total_wager(),
            can_deal: state.can_deal(),
            discarded_cards: state.discarded_cards,
            discard_fraction: state.discard_fraction(),
            shuffling: state.shuffling,
            loading: state.loading,
            error: state.error.clone(),
        }
    }

    pub fn active_spot_id(&self) -> Option<SpotId> {
        match self.phase {
            Phase::PlayerTurn(spot_id) => Some(spot_id),
            _ => None,
        }
    }
}
