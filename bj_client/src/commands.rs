use blackjack_table::{CHIP_VALUES, Cents, PlayerAction, SpotTarget, format_money};
use std::fmt;

/// A line typed at the table prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start a new session with the configured rules
    NewSession,
    /// Pick up the engine's open session
    Resume,
    EndSession,
    SelectChip(Cents),
    BetAll(bool),
    Bet(SpotTarget),
    ClearBet(SpotTarget),
    Deal,
    /// Decision for whichever spot is active
    Act(PlayerAction),
    /// Same insurance answer for every spot
    InsureAll(bool),
    /// Answer insurance spot by spot
    InsureEach,
    InsureSpot { spot_number: u8, insure: bool },
    /// Retry a settlement request that failed
    Resolve,
    Show,
    Help,
    Quit,
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Chip amount is not one of the table's denominations.
    InvalidChip(String),
    /// Spot is not a number between 1 and 6.
    InvalidSpot(String),
    /// Expected yes/no or on/off.
    InvalidAnswer(String),
    /// Command needs an argument it did not get.
    MissingArgument(&'static str),
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidChip(value) => {
                let chips: Vec<String> = CHIP_VALUES
                    .iter()
                    .map(|chip| format_money(*chip, false))
                    .collect();
                write!(
                    f,
                    "No '{}' chip. Choose one of {}",
                    value,
                    chips.join(", ")
                )
            }
            Self::InvalidSpot(value) => {
                write!(f, "Invalid spot '{}'. Use a spot number 1-6 or 'all'", value)
            }
            Self::InvalidAnswer(value) => write!(f, "Expected yes or no, got '{}'", value),
            Self::MissingArgument(usage) => write!(f, "Usage: {}", usage),
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{}'. Type 'help' to see available commands",
                cmd
            ),
        }
    }
}

impl std::error::Error for ParseError {}

pub const HELP: &str = "\
Commands:
  new | resume | end            start, resume or end a session
  chip AMOUNT                   select a chip ($1, $5, $25, $100, $500, $1000, $5000)
  bet SPOT|all, clear SPOT|all  add the chip to a spot, or remove its wager
  betall on|off                 bet on every spot at once
  deal                          deal the hand
  hit | stand | double | split  act for the active spot (h, s, d, p)
  insure yes|no                 answer insurance for every spot
  insure each                   answer insurance spot by spot
  insure SPOT yes|no            answer insurance for one spot
  resolve                       retry a failed settlement
  show | help | quit";

/// Parse a command string into a [`Command`].
///
/// # Examples
///
/// ```
/// use bj_client::commands::{Command, parse_command};
/// use blackjack_table::{PlayerAction, SpotTarget};
///
/// assert_eq!(parse_command("h"), Ok(Command::Act(PlayerAction::Hit)));
/// assert_eq!(parse_command("chip 25"), Ok(Command::SelectChip(2_500)));
/// assert_eq!(parse_command("bet 2"), Ok(Command::Bet(SpotTarget::Number(2))));
/// ```
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let trimmed = input.trim();
    let lowered = trimmed.to_ascii_lowercase();

    // Try single-word commands first
    match lowered.as_str() {
        "new" | "start" => return Ok(Command::NewSession),
        "resume" => return Ok(Command::Resume),
        "end" => return Ok(Command::EndSession),
        "deal" => return Ok(Command::Deal),
        "hit" | "h" => return Ok(Command::Act(PlayerAction::Hit)),
        "stand" | "s" => return Ok(Command::Act(PlayerAction::Stand)),
        "double" | "d" => return Ok(Command::Act(PlayerAction::Double)),
        "split" | "p" => return Ok(Command::Act(PlayerAction::Split)),
        "resolve" => return Ok(Command::Resolve),
        "show" | "" => return Ok(Command::Show),
        "help" | "?" => return Ok(Command::Help),
        "quit" | "exit" | "q" => return Ok(Command::Quit),
        _ => {}
    }

    // Parse multi-word commands
    let parts: Vec<&str> = lowered.split_ascii_whitespace().collect();
    match parts.first() {
        Some(&"chip") => parse_chip(parts.get(1)),
        Some(&"bet") => parse_target(parts.get(1), "bet SPOT|all").map(Command::Bet),
        Some(&"clear") => parse_target(parts.get(1), "clear SPOT|all").map(Command::ClearBet),
        Some(&"betall") => parse_answer(parts.get(1), "betall on|off").map(Command::BetAll),
        Some(&"insure") => parse_insure(&parts),
        _ => Err(ParseError::UnrecognizedCommand(trimmed.to_string())),
    }
}

/// Parse a chip amount in dollars: "chip 25" or "chip $25"
fn parse_chip(value: Option<&&str>) -> Result<Command, ParseError> {
    let value = value.ok_or(ParseError::MissingArgument("chip AMOUNT"))?;
    let dollars = value.trim_start_matches('$');
    let cents = dollars
        .parse::<Cents>()
        .ok()
        .and_then(|d| d.checked_mul(100))
        .filter(|cents| CHIP_VALUES.contains(cents))
        .ok_or_else(|| ParseError::InvalidChip(value.to_string()))?;
    Ok(Command::SelectChip(cents))
}

fn parse_target(value: Option<&&str>, usage: &'static str) -> Result<SpotTarget, ParseError> {
    match value {
        None => Err(ParseError::MissingArgument(usage)),
        Some(&"all") => Ok(SpotTarget::All),
        Some(value) => parse_spot(value).map(SpotTarget::Number),
    }
}

fn parse_spot(value: &str) -> Result<u8, ParseError> {
    value
        .parse::<u8>()
        .ok()
        .filter(|n| (1..=6).contains(n))
        .ok_or_else(|| ParseError::InvalidSpot(value.to_string()))
}

fn parse_answer(value: Option<&&str>, usage: &'static str) -> Result<bool, ParseError> {
    match value {
        None => Err(ParseError::MissingArgument(usage)),
        Some(&("yes" | "y" | "on" | "true")) => Ok(true),
        Some(&("no" | "n" | "off" | "false")) => Ok(false),
        Some(other) => Err(ParseError::InvalidAnswer(other.to_string())),
    }
}

/// Parse "insure yes|no", "insure each" or "insure SPOT yes|no"
fn parse_insure(parts: &[&str]) -> Result<Command, ParseError> {
    const USAGE: &str = "insure yes|no|each, or insure SPOT yes|no";
    match (parts.get(1), parts.get(2)) {
        (None, _) => Err(ParseError::MissingArgument(USAGE)),
        (Some(&"each"), None) => Ok(Command::InsureEach),
        (Some(spot), None) if spot.parse::<u8>().is_ok() => Err(ParseError::MissingArgument(USAGE)),
        (Some(answer), None) => parse_answer(Some(answer), USAGE).map(Command::InsureAll),
        (Some(spot), answer) => Ok(Command::InsureSpot {
            spot_number: parse_spot(spot)?,
            insure: parse_answer(answer, USAGE)?,
        }),
    }
}
