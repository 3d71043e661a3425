//! Table domain model.
//!
//! - [`entities`]: cards, sessions, hands and spots as the engine reports them
//! - [`patches`]: typed engine results, one per operation
//! - [`state`]: the [`TableState`](state::TableState) reducer

pub mod entities;
pub mod patches;
pub mod state;
