//! Turns card-count differences into an ordered list of card reveals.

use serde::Serialize;

use crate::game::{entities::Card, state::TableState};

/// How a card is shown when it lands.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum CardFace {
    Up(Card),
    /// The dealer's hole card before it is turned over
    Down,
}

/// Where a card lands.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum Destination {
    Spot(u8),
    Dealer,
}

/// One card flying to one position.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct AnimationEvent {
    pub face: CardFace,
    pub destination: Destination,
}

/// Card counts captured before an engine result is applied.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CardCounts {
    spots: Vec<(u8, usize)>,
    dealer: usize,
}

impl CardCounts {
    pub fn snapshot(state: &TableState) -> Self {
        Self {
            spots: state
                .spots
                .iter()
                .map(|spot| (spot.spot_number, spot.cards.len()))
                .collect(),
            dealer: state.hand.dealer_cards.len(),
        }
    }

    fn spot(&self, spot_number: u8) -> usize {
        self.spots
            .iter()
            .find(|(number, _)| *number == spot_number)
            .map_or(0, |(_, count)| *count)
    }
}

/// Every card in `state` beyond the `before` snapshot, dealt round-robin:
/// for each card index, spots in seat order and then the dealer.
///
/// A fresh deal that shows a single dealer card also gets a face-down hole
/// card after the spots' second cards.
pub fn plan_reveals(before: &CardCounts, state: &TableState) -> Vec<AnimationEvent> {
    let mut spots: Vec<_> = state
        .spots
        .iter()
        .map(|spot| (spot.spot_number, before.spot(spot.spot_number), &spot.cards))
        .collect();
    spots.sort_by_key(|(number, _, _)| *number);

    let dealer = &state.hand.dealer_cards;
    let hole_card = before.dealer == 0 && dealer.len() == 1;
    let dealer_len = if hole_card { 2 } else { dealer.len() };

    let rounds = spots
        .iter()
        .map(|(_, _, cards)| cards.len())
        .chain(std::iter::once(dealer_len))
        .max()
        .unwrap_or(0);

    let mut events = Vec::new();
    for index in 0..rounds {
        for (number, seen, cards) in &spots {
            if index >= *seen
                && let Some(card) = cards.get(index)
            {
                events.push(AnimationEvent {
                    face: CardFace::Up(*card),
                    destination: Destination::Spot(*number),
                });
            }
        }

        if index < before.dealer {
            continue;
        }
        let face = match dealer.get(index) {
            Some(card) => Some(CardFace::Up(*card)),
            None if hole_card && index == 1 => Some(CardFace::Down),
            None => None,
        };
        if let Some(face) = face {
            events.push(AnimationEvent {
                face,
                destination: Destination::Dealer,
            });
        }
    }
    events
}
