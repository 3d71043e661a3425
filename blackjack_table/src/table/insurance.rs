//! Insurance answer collection.
//!
//! When the dealer shows an ace the table offers insurance. Answers are
//! collected either for the whole table in one request (group mode) or spot
//! by spot (individual mode). Switching to individual mode is one-way for
//! the rest of the hand.

use serde::Serialize;

use crate::game::{
    entities::{Spot, SpotId},
    patches::SpotInsurance,
    state::TableState,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum InsuranceMode {
    #[default]
    Group,
    Individual,
}

#[derive(Debug, Default)]
pub struct InsuranceCoordinator {
    mode: InsuranceMode,
}

impl InsuranceCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> InsuranceMode {
        self.mode
    }

    /// Returns whether the mode changed.
    pub fn switch_to_individual(&mut self) -> bool {
        let changed = self.mode == InsuranceMode::Group;
        self.mode = InsuranceMode::Individual;
        changed
    }

    /// Group mode can only be restored by [`reset`](Self::reset).
    pub fn is_group(&self) -> bool {
        self.mode == InsuranceMode::Group
    }

    /// Back to group mode for the next hand.
    pub fn reset(&mut self) {
        self.mode = InsuranceMode::Group;
    }

    /// A spot can still answer if it is in play with money on it and has
    /// not answered yet.
    pub fn is_eligible(spot: &Spot) -> bool {
        spot.id.is_some() && spot.active && spot.has_wager() && !spot.insurance.is_decided()
    }

    pub fn eligible_spots(state: &TableState) -> Vec<SpotId> {
        state
            .spots
            .iter()
            .filter(|spot| Self::is_eligible(spot))
            .filter_map(|spot| spot.id)
            .collect()
    }

    /// The same answer for every eligible spot.
    pub fn group_decisions(state: &TableState, insure: bool) -> Vec<SpotInsurance> {
        Self::eligible_spots(state)
            .into_iter()
            .map(|id| SpotInsurance {
                id,
                insurance: insure,
            })
            .collect()
    }

    /// Every wagered spot in play has answered.
    pub fn is_complete(state: &TableState) -> bool {
        let mut in_play = state
            .spots
            .iter()
            .filter(|spot| spot.active && spot.has_wager())
            .peekable();
        in_play.peek().is_some() && in_play.all(|spot| spot.insurance.is_decided())
    }
}
