//! Client configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use blackjack_table::{SessionConfig, TimingConfig};
use std::time::Duration;

pub const DEFAULT_ENGINE_URL: &str = "http://localhost:3000/graphql";

/// Longest card animation the renderer will play.
pub const MAX_CARD_ANIMATION_MS: u64 = 5_000;

/// Complete client configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// GraphQL endpoint of the game engine
    pub engine_url: String,
    /// Bearer token sent with every request
    pub auth_token: Option<String>,
    /// Rules for sessions this client creates
    pub session: SessionConfig,
    /// Table timer delays
    pub timing: TimingConfig,
    /// How long the renderer takes to show one card
    pub card_animation_ms: u64,
    /// Per-request HTTP timeout
    pub request_timeout_secs: u64,
}

/// Values given on the command line, which win over the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub engine_url: Option<String>,
    pub auth_token: Option<String>,
    pub spots: Option<u8>,
    pub decks: Option<u8>,
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// Unset or unparsable variables fall back to their defaults; call
    /// [`validate`](Self::validate) afterwards.
    pub fn from_env(overrides: Overrides) -> Self {
        let engine_url = overrides
            .engine_url
            .or_else(|| std::env::var("BJ_ENGINE_URL").ok())
            .unwrap_or_else(|| DEFAULT_ENGINE_URL.to_string());

        let auth_token = overrides
            .auth_token
            .or_else(|| std::env::var("BJ_AUTH_TOKEN").ok())
            .filter(|token| !token.trim().is_empty());

        let defaults = SessionConfig::default();
        let session = SessionConfig {
            decks: overrides
                .decks
                .unwrap_or_else(|| parse_env_or("BJ_DECKS", defaults.decks)),
            spots: overrides
                .spots
                .unwrap_or_else(|| parse_env_or("BJ_SPOTS", defaults.spots)),
            penetration: parse_env_or("BJ_PENETRATION", defaults.penetration),
            six_five: parse_env_or("BJ_SIX_FIVE", defaults.six_five),
            stand_17: parse_env_or("BJ_STAND_17", defaults.stand_17),
        };

        let defaults = TimingConfig::default();
        let timing = TimingConfig {
            reveal_grace_ms: parse_env_or("BJ_REVEAL_GRACE_MS", defaults.reveal_grace_ms),
            clear_delay_ms: parse_env_or("BJ_CLEAR_DELAY_MS", defaults.clear_delay_ms),
            shuffle_banner_ms: parse_env_or("BJ_SHUFFLE_BANNER_MS", defaults.shuffle_banner_ms),
            insurance_settle_ms: parse_env_or(
                "BJ_INSURANCE_SETTLE_MS",
                defaults.insurance_settle_ms,
            ),
        };

        ClientConfig {
            engine_url,
            auth_token,
            session,
            timing,
            card_animation_ms: parse_env_or("BJ_CARD_ANIMATION_MS", 500),
            request_timeout_secs: parse_env_or("BJ_REQUEST_TIMEOUT_SECS", 10),
        }
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.engine_url.starts_with("http://") || self.engine_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                var: "BJ_ENGINE_URL".to_string(),
                reason: format!("'{}' is not an http(s) URL", self.engine_url),
            });
        }

        if self.card_animation_ms > MAX_CARD_ANIMATION_MS {
            return Err(ConfigError::Invalid {
                var: "BJ_CARD_ANIMATION_MS".to_string(),
                reason: format!("Must be at most {MAX_CARD_ANIMATION_MS}"),
            });
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "BJ_REQUEST_TIMEOUT_SECS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        self.session.validate()?;
        self.timing.validate()?;
        Ok(())
    }

    pub fn card_animation(&self) -> Duration {
        Duration::from_millis(self.card_animation_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },

    #[error(transparent)]
    Table(#[from] blackjack_table::table::ConfigError),
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
