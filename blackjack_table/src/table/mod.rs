//! Table module running one blackjack table as an async actor.
//!
//! This module implements:
//! - TableActor: the turn orchestrator owning the table state
//! - AnimationQueue: one-at-a-time card reveals for a renderer
//! - DelayedTransitionScheduler: conditional immediate/delayed transition pairs
//! - InsuranceCoordinator: group and per-spot insurance answers
//!
//! ## Architecture
//!
//! The actor runs in its own Tokio task with an mpsc inbox. Commands from
//! [`TableHandle`]s and timer transitions share that inbox, so every change
//! to the table is applied in order by a single task.
//!
//! ## Example
//!
//! ```ignore
//! use blackjack_table::table::{SessionConfig, TableActor, TimingConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let engine = Arc::new(my_engine());
//!     let (actor, handle, mut feed) = TableActor::new(engine, TimingConfig::default());
//!     tokio::spawn(actor.run());
//!
//!     // Complete reveals as soon as they arrive
//!     tokio::spawn(async move {
//!         while let Some(reveal) = feed.next_reveal().await {
//!             reveal.complete();
//!         }
//!     });
//!
//!     handle.start_session(SessionConfig::default()).await;
//! }
//! ```

pub mod actor;
pub mod animation;
pub mod config;
pub mod insurance;
pub mod messages;
pub mod reveal;
pub mod scheduler;
pub mod timers;

pub use actor::{TableActor, TableHandle};
pub use animation::{AnimationError, AnimationFeed, AnimationQueue, PendingReveal};
pub use config::{ConfigError, SessionConfig, TimingConfig};
pub use insurance::{InsuranceCoordinator, InsuranceMode};
pub use messages::{Phase, TableMessage, TableResponse, TableView};
pub use reveal::{AnimationEvent, CardCounts, CardFace, Destination, plan_reveals};
pub use scheduler::{DelayedTransitionScheduler, Scheduled};
pub use timers::{BustRevealTimer, ShuffleNotifier, TimerKey, Transition};
