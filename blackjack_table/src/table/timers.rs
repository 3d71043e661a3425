//! Timer keys, delayed transitions and the two cosmetic timers.

use std::time::Duration;

use super::{
    messages::TableMessage,
    scheduler::{DelayedTransitionScheduler, Scheduled},
};
use crate::game::entities::{HandId, SpotId};

/// Identifies one armed timer. Hand-scoped keys die with their hand.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TimerKey {
    ClearTable(HandId),
    SettleInsurance(HandId),
    Reveal(HandId, SpotId),
    ShuffleBanner,
}

impl TimerKey {
    pub fn hand_id(&self) -> Option<HandId> {
        match self {
            TimerKey::ClearTable(hand_id)
            | TimerKey::SettleInsurance(hand_id)
            | TimerKey::Reveal(hand_id, _) => Some(*hand_id),
            TimerKey::ShuffleBanner => None,
        }
    }
}

/// A delayed transition delivered back to the table's inbox.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Transition {
    ClearTable { hand_id: HandId },
    ResolveDealer { hand_id: HandId },
    RevealElapsed { hand_id: HandId, spot_id: SpotId },
    ShuffleBannerElapsed,
}

impl Transition {
    /// The key this transition was armed under.
    pub fn key(&self) -> TimerKey {
        match *self {
            Transition::ClearTable { hand_id } => TimerKey::ClearTable(hand_id),
            Transition::ResolveDealer { hand_id } => TimerKey::SettleInsurance(hand_id),
            Transition::RevealElapsed { hand_id, spot_id } => TimerKey::Reveal(hand_id, spot_id),
            Transition::ShuffleBannerElapsed => TimerKey::ShuffleBanner,
        }
    }
}

impl From<Transition> for TableMessage {
    fn from(transition: Transition) -> Self {
        TableMessage::Transition(transition)
    }
}

pub type TableScheduler = DelayedTransitionScheduler<TimerKey, TableMessage>;

/// Keeps a busted or natural-blackjack spot on the felt for a grace period
/// before its cards go to the discard tray.
#[derive(Debug, Clone, Copy)]
pub struct BustRevealTimer {
    grace: Duration,
}

impl BustRevealTimer {
    pub fn new(grace: Duration) -> Self {
        Self { grace }
    }

    /// Arms once per (hand, spot).
    pub fn arm(&self, scheduler: &mut TableScheduler, hand_id: HandId, spot_id: SpotId) -> Scheduled {
        scheduler.arm(
            TimerKey::Reveal(hand_id, spot_id),
            Transition::RevealElapsed { hand_id, spot_id }.into(),
            self.grace,
        )
    }
}

/// Clears the shuffle notice after it has been shown for a while.
#[derive(Debug, Clone, Copy)]
pub struct ShuffleNotifier {
    banner: Duration,
}

impl ShuffleNotifier {
    pub fn new(banner: Duration) -> Self {
        Self { banner }
    }

    pub fn arm(&self, scheduler: &mut TableScheduler) -> Scheduled {
        scheduler.arm(
            TimerKey::ShuffleBanner,
            Transition::ShuffleBannerElapsed.into(),
            self.banner,
        )
    }
}
