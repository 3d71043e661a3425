//! Internal modules for the blackjack client.
//!
//! This library provides the GraphQL engine client, command parsing,
//! configuration and terminal rendering used by the bj_client binary.

pub mod api_client;
pub mod commands;
pub mod config;
pub mod logging;
pub mod renderer;
