//! A terminal blackjack client.
//!
//! The client runs one table actor against a remote GraphQL game engine,
//! resumes the player's open session when there is one and reads table
//! commands from stdin.

use anyhow::{Context, Result};
use bj_client::{
    api_client::GraphqlEngine,
    commands::{Command, HELP as COMMANDS_HELP, parse_command},
    config::{ClientConfig, Overrides},
    logging, renderer,
};
use blackjack_table::{SessionConfig, TableActor, TableHandle, TableResponse};
use pico_args::Arguments;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
Play blackjack against a remote game engine

USAGE:
  bj_client [OPTIONS]

OPTIONS:
  --engine     URL         GraphQL endpoint  [default: env BJ_ENGINE_URL or http://localhost:3000/graphql]
  --token      TOKEN       Bearer token  [default: env BJ_AUTH_TOKEN]
  --spots      N           Spots for a new session (1-6)  [default: env BJ_SPOTS or 1]
  --decks      N           Decks for a new session (1-8)  [default: env BJ_DECKS or 6]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  BJ_PENETRATION, BJ_SIX_FIVE, BJ_STAND_17           session rules
  BJ_REVEAL_GRACE_MS, BJ_CLEAR_DELAY_MS,
  BJ_SHUFFLE_BANNER_MS, BJ_INSURANCE_SETTLE_MS       table delays
  BJ_CARD_ANIMATION_MS, BJ_REQUEST_TIMEOUT_SECS      client timing
  RUST_LOG                                           log filter
  (A .env file in the working directory is read first)
";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let overrides = Overrides {
        engine_url: pargs.opt_value_from_str("--engine")?,
        auth_token: pargs.opt_value_from_str("--token")?,
        spots: pargs.opt_value_from_str("--spots")?,
        decks: pargs.opt_value_from_str("--decks")?,
    };

    logging::init();

    let config = ClientConfig::from_env(overrides);
    config.validate().context("Invalid configuration")?;

    run(config).await
}

async fn run(config: ClientConfig) -> Result<()> {
    let engine = GraphqlEngine::new(
        config.engine_url.clone(),
        config.auth_token.clone(),
        config.request_timeout(),
    )
    .context("Failed to build engine client")?;
    tracing::info!(engine = engine.endpoint(), "Connecting to game engine");

    let (actor, handle, feed) = TableActor::new(Arc::new(engine), config.timing);
    let actor = tokio::spawn(actor.run());
    tokio::spawn(renderer::run_reveals(feed, config.card_animation()));

    let updates = handle
        .subscribe()
        .await
        .context("Table stopped before it started")?;
    tokio::spawn(renderer::print_updates(updates));

    // Continue an unfinished session before starting a new one.
    match handle.resume_session().await {
        TableResponse::Success => println!("Resumed your open session."),
        TableResponse::Error(message) => println!("Could not check for an open session: {message}"),
        _ => report(handle.start_session(config.session).await),
    }
    println!("Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => execute(&handle, command, config.session).await,
            Err(err) => println!("{err}"),
        }
    }

    handle.teardown();
    actor.await.context("Table task failed")?;
    println!("Goodbye.");
    Ok(())
}

fn report(response: TableResponse) {
    match response {
        TableResponse::Success => {}
        TableResponse::Ignored(reason) => println!("{reason}"),
        TableResponse::Error(message) => println!("Engine error: {message}"),
        TableResponse::Closed => println!("The table has closed."),
    }
}

async fn execute(handle: &TableHandle, command: Command, session: SessionConfig) {
    let response = match command {
        Command::NewSession => handle.start_session(session).await,
        Command::Resume => handle.resume_session().await,
        Command::EndSession => handle.end_session().await,
        Command::SelectChip(value) => handle.select_chip(value).await,
        Command::BetAll(enabled) => handle.set_bet_all(enabled).await,
        Command::Bet(target) => handle.place_bet(target).await,
        Command::ClearBet(target) => handle.clear_bet(target).await,
        Command::Deal => handle.deal().await,
        Command::Act(action) => {
            let active = handle.view().await.and_then(|view| view.active_spot_id());
            match active {
                Some(spot_id) => handle.act(spot_id, action).await,
                None => TableResponse::Ignored("No spot is waiting for a decision".to_string()),
            }
        }
        Command::InsureAll(insure) => handle.insure_all(insure).await,
        Command::InsureEach => handle.insure_individually().await,
        Command::InsureSpot {
            spot_number,
            insure,
        } => {
            let spot_id = handle.view().await.and_then(|view| {
                view.spots
                    .iter()
                    .find(|spot| spot.spot_number == spot_number)
                    .and_then(|spot| spot.id)
            });
            match spot_id {
                Some(spot_id) => handle.insure_spot(spot_id, insure).await,
                None => TableResponse::Ignored(format!("Spot {spot_number} is not in play")),
            }
        }
        Command::Resolve => handle.resolve_dealer().await,
        Command::Show => {
            if let Some(view) = handle.view().await {
                print!("{}", renderer::render_view(&view));
            }
            TableResponse::Success
        }
        Command::Help => {
            println!("{COMMANDS_HELP}");
            TableResponse::Success
        }
        Command::Quit => TableResponse::Success,
    };
    report(response);
}
