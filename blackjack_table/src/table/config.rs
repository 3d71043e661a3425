//! Table configuration models.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::game::entities::BlackjackPayout;

/// Longest delay any table timer may use.
pub const MAX_DELAY_MS: u64 = 60_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Delays for the table's timed transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Grace period before a busted or natural-blackjack spot leaves play
    pub reveal_grace_ms: u64,

    /// Time the settled table stays on screen before it is cleared
    pub clear_delay_ms: u64,

    /// Lifetime of the shuffle notice
    pub shuffle_banner_ms: u64,

    /// Pause between insurance settlement and dealer play
    pub insurance_settle_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            reveal_grace_ms: 3_000,
            clear_delay_ms: 5_000,
            shuffle_banner_ms: 6_000,
            insurance_settle_ms: 3_000,
        }
    }
}

impl TimingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("reveal_grace_ms", self.reveal_grace_ms),
            ("clear_delay_ms", self.clear_delay_ms),
            ("shuffle_banner_ms", self.shuffle_banner_ms),
            ("insurance_settle_ms", self.insurance_settle_ms),
        ] {
            if value == 0 || value > MAX_DELAY_MS {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{value}ms is outside 1..={MAX_DELAY_MS}ms"),
                });
            }
        }
        Ok(())
    }

    pub fn reveal_grace(&self) -> Duration {
        Duration::from_millis(self.reveal_grace_ms)
    }

    pub fn clear_delay(&self) -> Duration {
        Duration::from_millis(self.clear_delay_ms)
    }

    pub fn shuffle_banner(&self) -> Duration {
        Duration::from_millis(self.shuffle_banner_ms)
    }

    pub fn insurance_settle(&self) -> Duration {
        Duration::from_millis(self.insurance_settle_ms)
    }
}

/// Rules for a new session, sent to the engine as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// Decks in the shoe (1-8)
    pub decks: u8,

    /// Seats at the table (1-6)
    #[serde(rename = "numSpots")]
    pub spots: u8,

    /// Percentage of the shoe dealt before a reshuffle (10-90)
    pub penetration: u8,

    /// Pay naturals 6:5 instead of 3:2
    pub six_five: bool,

    /// Dealer stands on soft 17
    #[serde(rename = "stand17")]
    pub stand_17: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            decks: 6,
            spots: 1,
            penetration: 75,
            six_five: false,
            stand_17: true,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=8).contains(&self.decks) {
            return Err(ConfigError::Invalid {
                field: "decks",
                reason: format!("{} is outside 1..=8", self.decks),
            });
        }

        if !(1..=6).contains(&self.spots) {
            return Err(ConfigError::Invalid {
                field: "spots",
                reason: format!("{} is outside 1..=6", self.spots),
            });
        }

        if !(10..=90).contains(&self.penetration) {
            return Err(ConfigError::Invalid {
                field: "penetration",
                reason: format!("{}% is outside 10..=90%", self.penetration),
            });
        }

        Ok(())
    }

    pub fn payout(&self) -> BlackjackPayout {
        BlackjackPayout::from_six_five(self.six_five)
    }
}
