//! # Blackjack Table
//!
//! The client-side core of a multi-spot blackjack table. Every rule lives in
//! a remote game engine; this crate keeps the table's view of the hand in
//! step with the engine's answers and sequences what the player sees.
//!
//! ## Flow
//!
//! A hand moves through these phases:
//!
//! - **Betting**: chips are placed on up to six spots
//! - **InsurancePending**: the dealer shows an ace and every spot answers
//! - **PlayerTurn**: the engine names the spot that owes a decision
//! - **DealerPending / DealerTurn**: the engine plays out the dealer
//! - **Resolved / Clearing**: outcomes stay up, then the felt is cleared
//!
//! ## Core Modules
//!
//! - [`game`]: entities, typed engine results and the table state reducer
//! - [`engine`]: the [`GameEngine`] trait and the request dispatcher
//! - [`table`]: the table actor, card reveals and delayed transitions

/// Cards, spots, hands and the table state reducer.
pub mod game;
pub use game::{
    entities::{self, CHIP_VALUES, Card, Cents, Outcome, PlayerAction, SpotTarget, format_money},
    state::TableState,
};

/// The remote engine contract.
pub mod engine;
pub use engine::{ActionDispatcher, EngineError, EngineResult, GameEngine};

/// The table actor and its collaborators.
pub mod table;
pub use table::{
    AnimationFeed, SessionConfig, TableActor, TableHandle, TableResponse, TableView,
    TimingConfig,
};
