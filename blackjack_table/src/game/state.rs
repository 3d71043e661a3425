//! Client-side table state and the reducer that folds engine results into it.
//!
//! Every mutation goes through a method on [`TableState`]. Engine results
//! arrive as typed patches from [`super::patches`] and each `apply_*` method
//! writes only the fields its patch names.

use serde::Serialize;

use super::{
    entities::{
        Cents, Hand, HandId, InsuranceDecision, Session, SessionId, Spot, SpotId, SpotTarget,
    },
    patches::{
        ActionResult, DealResult, DealerResult, HandPointer, InsurancePatch, IntermediateResult,
        SettlementPatch, SpotWager,
    },
};

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TableState {
    pub session: Option<Session>,
    pub hand: Hand,
    pub spots: Vec<Spot>,
    pub is_dealt: bool,
    pub insurance_offered: bool,
    pub bet_all: bool,
    pub selected_chip: Option<Cents>,
    pub discarded_cards: u32,
    pub shuffling: bool,
    pub loading: bool,
    pub error: Option<String>,
}

impl TableState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a session and seats one empty spot per configured seat.
    ///
    /// Chip selection and the bet-all toggle carry over.
    pub fn start_session(&mut self, session: Session) {
        let spots = (1..=session.num_spots).map(Spot::new).collect();
        *self = Self {
            session: Some(session),
            spots,
            bet_all: self.bet_all,
            selected_chip: self.selected_chip,
            ..Self::default()
        };
    }

    pub fn end_session(&mut self) {
        *self = Self {
            bet_all: self.bet_all,
            selected_chip: self.selected_chip,
            ..Self::default()
        };
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(|session| session.id)
    }

    pub fn spot_by_id(&self, spot_id: SpotId) -> Option<&Spot> {
        self.spots.iter().find(|spot| spot.id == Some(spot_id))
    }

    fn spot_by_id_mut(&mut self, spot_id: SpotId) -> Option<&mut Spot> {
        self.spots.iter_mut().find(|spot| spot.id == Some(spot_id))
    }

    pub fn spot_by_number(&self, spot_number: u8) -> Option<&Spot> {
        self.spots.iter().find(|spot| spot.spot_number == spot_number)
    }

    /// The spot currently owed a player decision.
    pub fn active_spot(&self) -> Option<&Spot> {
        self.hand
            .current_spot_id
            .and_then(|spot_id| self.spot_by_id(spot_id))
    }

    pub fn total_wager(&self) -> Cents {
        self.spots.iter().map(|spot| spot.wager).sum()
    }

    /// Wagers for every seat with money on it, in seat order.
    pub fn wagers(&self) -> Vec<SpotWager> {
        self.spots
            .iter()
            .filter(|spot| spot.has_wager())
            .map(|spot| SpotWager {
                spot_number: spot.spot_number,
                wager: spot.wager,
            })
            .collect()
    }

    /// A deal needs a session, no hand in progress and at least one wager.
    pub fn can_deal(&self) -> bool {
        self.session.is_some() && !self.is_dealt && self.spots.iter().any(Spot::has_wager)
    }

    /// Fraction of the shoe already in the discard tray, in `0.0..=1.0`.
    pub fn discard_fraction(&self) -> f64 {
        match &self.session {
            Some(session) if session.shoe_size() > 0 => {
                (f64::from(self.discarded_cards) / f64::from(session.shoe_size())).min(1.0)
            }
            _ => 0.0,
        }
    }

    /// Adds `amount` to the targeted spot, or to every spot when bet-all is
    /// on. Returns whether anything changed.
    pub fn set_wager(&mut self, target: SpotTarget, amount: Cents) -> bool {
        if self.is_dealt || amount <= 0 {
            return false;
        }

        let bet_all = self.bet_all;
        let mut changed = false;
        for spot in &mut self.spots {
            let selected = match target {
                _ if bet_all => true,
                SpotTarget::All => true,
                SpotTarget::Number(n) => spot.spot_number == n,
            };
            if selected {
                spot.wager += amount;
                changed = true;
            }
        }
        changed
    }

    /// Zeroes the targeted spot's wager, or every wager when bet-all is on.
    pub fn clear_wager(&mut self, target: SpotTarget) -> bool {
        if self.is_dealt {
            return false;
        }

        let bet_all = self.bet_all;
        let mut changed = false;
        for spot in &mut self.spots {
            let selected = match target {
                _ if bet_all => true,
                SpotTarget::All => true,
                SpotTarget::Number(n) => spot.spot_number == n,
            };
            if selected && spot.wager != 0 {
                spot.wager = 0;
                changed = true;
            }
        }
        changed
    }

    fn replace_hand(&mut self, pointer: HandPointer) {
        let dealer_cards = pointer
            .dealer_cards
            .unwrap_or_else(|| std::mem::take(&mut self.hand.dealer_cards));
        self.hand = Hand {
            id: Some(pointer.id),
            dealer_cards,
            current_spot_id: pointer.current_spot_id,
        };
    }

    fn apply_settlement(&mut self, patches: &[SettlementPatch]) {
        for patch in patches {
            let Some(spot) = self.spot_by_id_mut(patch.id) else {
                log::debug!("Settlement for unknown spot {} ignored", patch.id);
                continue;
            };
            if patch.insurance.is_decided() {
                spot.insurance = patch.insurance;
            }
            if let Some(outcome) = patch.insurance_outcome {
                spot.insurance_outcome = Some(outcome);
            }
            if let Some(profit) = patch.profit {
                spot.profit = Some(profit);
            }
            if let Some(outcome) = patch.outcome {
                spot.outcome = Some(outcome);
            }
        }
    }

    /// Installs a freshly dealt hand. Spots are matched by seat number and
    /// unwagered spots sit the hand out.
    pub fn apply_deal_result(&mut self, result: DealResult) {
        self.hand = Hand {
            id: Some(result.id),
            dealer_cards: result.dealer_cards,
            current_spot_id: result.current_spot_id,
        };
        self.is_dealt = true;
        self.insurance_offered = result.insurance_offered;

        for dealt in result.spots {
            let Some(spot) = self
                .spots
                .iter_mut()
                .find(|spot| spot.spot_number == dealt.spot_number)
            else {
                log::debug!("Deal result for unknown seat {} ignored", dealt.spot_number);
                continue;
            };
            spot.id = Some(dealt.id);
            spot.cards = dealt.cards;
            spot.split_offered = dealt.split_offered;
            spot.is_blackjack = dealt.is_blackjack;
            spot.outcome = dealt.outcome;
            spot.profit = dealt.profit;
            spot.insurance = InsuranceDecision::Undecided;
            spot.insurance_outcome = None;
        }

        for spot in &mut self.spots {
            if !spot.has_wager() {
                spot.active = false;
            }
        }
    }

    /// Records confirmed insurance answers.
    pub fn apply_insurance(&mut self, patches: &[InsurancePatch]) {
        for patch in patches {
            if let Some(spot) = self.spot_by_id_mut(patch.id) {
                spot.insurance = patch.insurance;
            }
        }
    }

    pub fn apply_intermediate_result(&mut self, result: IntermediateResult) {
        self.replace_hand(result.hand);
        self.apply_settlement(&result.spots);
        self.insurance_offered = false;
    }

    /// Merges the acted-on spot by id and moves the hand pointer. A result
    /// for a spot this table does not hold only moves the pointer.
    pub fn apply_action_result(&mut self, result: ActionResult) {
        if let Some(spot) = self.spot_by_id_mut(result.id) {
            spot.cards = result.cards;
            if let Some(wager) = result.wager {
                spot.wager = wager;
            }
            spot.outcome = result.outcome.or(spot.outcome);
            spot.profit = result.profit.or(spot.profit);
            spot.insurance_outcome = result.insurance_outcome.or(spot.insurance_outcome);
            spot.is_bust = result.is_bust;
            spot.is_blackjack = result.is_blackjack;
            spot.split = result.split;
            spot.doubled = result.double;
            spot.split_offered = result.split_offered;
        } else {
            log::debug!("Action result for unknown spot {} ignored", result.id);
        }
        self.replace_hand(result.hand);
    }

    /// Installs the dealer's final cards, settlements, shoe state and the
    /// session's cumulative counters.
    pub fn apply_dealer_result(&mut self, result: DealerResult) {
        self.replace_hand(result.hand);
        self.apply_settlement(&result.spots);

        self.discarded_cards = if result.shoe.shuffle {
            result.shoe.discarded_cards
        } else {
            self.discarded_cards.max(result.shoe.discarded_cards)
        };
        if result.shoe.shuffle {
            self.shuffling = true;
        }

        if let Some(session) = self.session.as_mut() {
            session.shoe_count = result.session.shoe_count;
            session.profit = result.session.profit;
            session.hand_count = result.session.hand_count;
            session.spot_count = result.session.spot_count;
        }
    }

    /// Removes a spot from play and moves its cards to the discard tray.
    /// Returns the number of cards discarded, or `None` if the spot was
    /// unknown or already inactive.
    pub fn mark_spot_inactive(&mut self, spot_id: SpotId) -> Option<u32> {
        let spot = self.spot_by_id_mut(spot_id)?;
        if !spot.active {
            return None;
        }
        spot.active = false;
        let discarded = u32::try_from(spot.cards.len()).unwrap_or(u32::MAX);
        self.discarded_cards = self.discarded_cards.saturating_add(discarded);
        Some(discarded)
    }

    /// Resets every spot for the next hand, keeping the seat layout.
    pub fn clear_table(&mut self) {
        for spot in &mut self.spots {
            *spot = Spot::new(spot.spot_number);
        }
        self.hand = Hand::default();
        self.is_dealt = false;
        self.insurance_offered = false;
    }

    pub fn clear_shuffle(&mut self) {
        self.shuffling = false;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Whether `hand_id` is still the hand on the felt.
    pub fn is_current_hand(&self, hand_id: HandId) -> bool {
        self.hand.id == Some(hand_id)
    }
}
