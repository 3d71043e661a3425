use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};

/// Engine-assigned session identifier.
pub type SessionId = i64;

/// Engine-assigned hand identifier.
pub type HandId = i64;

/// Engine-assigned spot identifier. Distinct from the spot's seat number.
pub type SpotId = i64;

/// Money amounts travel as integer cents.
pub type Cents = i64;

/// Chip denominations offered by the chip rack ($1 through $5000).
pub const CHIP_VALUES: [Cents; 7] = [100, 500, 2_500, 10_000, 50_000, 100_000, 500_000];

/// Cards in a single deck, used for shoe fractions.
pub const CARDS_PER_DECK: u32 = 52;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Club,
    Spade,
    Diamond,
    Heart,
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Club => "♣",
            Self::Spade => "♠",
            Self::Diamond => "♦",
            Self::Heart => "♥",
        };
        write!(f, "{repr}")
    }
}

impl TryFrom<char> for Suit {
    type Error = CardParseError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            'c' | 'C' | '♣' => Ok(Self::Club),
            's' | 'S' | '♠' => Ok(Self::Spade),
            'd' | 'D' | '♦' => Ok(Self::Diamond),
            'h' | 'H' | '♥' => Ok(Self::Heart),
            other => Err(CardParseError::Suit(other)),
        }
    }
}

/// Card rank, ace = 1 through king = 13.
pub type Rank = u8;

/// A dealt card as reported by the engine, e.g. `"T♠"` or `"9d"`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(into = "String")]
pub struct Card(pub Rank, pub Suit);

impl Card {
    fn rank_symbol(&self) -> &'static str {
        match self.0 {
            1 => "A",
            2 => "2",
            3 => "3",
            4 => "4",
            5 => "5",
            6 => "6",
            7 => "7",
            8 => "8",
            9 => "9",
            10 => "T",
            11 => "J",
            12 => "Q",
            _ => "K",
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.rank_symbol(), self.1)
    }
}

impl From<Card> for String {
    fn from(card: Card) -> Self {
        card.to_string()
    }
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum CardParseError {
    #[error("empty card")]
    Empty,
    #[error("unknown rank {0:?}")]
    Rank(String),
    #[error("unknown suit {0:?}")]
    Suit(char),
}

impl FromStr for Card {
    type Err = CardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let suit_char = s.chars().last().ok_or(CardParseError::Empty)?;
        let suit = Suit::try_from(suit_char)?;
        let rank_part = &s[..s.len() - suit_char.len_utf8()];
        let rank = match rank_part.to_ascii_uppercase().as_str() {
            "A" | "1" => 1,
            "T" | "10" => 10,
            "J" => 11,
            "Q" => 12,
            "K" => 13,
            digit => match digit.parse::<Rank>() {
                Ok(v @ 2..=9) => v,
                _ => return Err(CardParseError::Rank(rank_part.to_string())),
            },
        };
        Ok(Card(rank, suit))
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Final result tag the engine attaches to a spot.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Outcome {
    #[serde(rename = "win")]
    Win,
    #[serde(rename = "loss")]
    Loss,
    #[serde(rename = "push")]
    Push,
    #[serde(rename = "bj", alias = "blackjack")]
    Blackjack,
    #[serde(rename = "splitHand", alias = "split")]
    Split,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Win => "WIN",
            Self::Loss => "LOSS",
            Self::Push => "PUSH",
            Self::Blackjack => "BLACKJACK",
            Self::Split => "SPLIT",
        };
        write!(f, "{repr}")
    }
}

/// A spot's answer to an insurance offer.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize)]
pub enum InsuranceDecision {
    #[default]
    Undecided,
    Insured,
    Declined,
}

impl InsuranceDecision {
    pub fn is_decided(&self) -> bool {
        !matches!(self, Self::Undecided)
    }
}

impl From<Option<bool>> for InsuranceDecision {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => Self::Undecided,
            Some(true) => Self::Insured,
            Some(false) => Self::Declined,
        }
    }
}

impl From<bool> for InsuranceDecision {
    fn from(value: bool) -> Self {
        Some(value).into()
    }
}

impl<'de> Deserialize<'de> for InsuranceDecision {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<bool>::deserialize(deserializer)?.into())
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum InsuranceOutcome {
    #[serde(rename = "insWin", alias = "ins_win")]
    Won,
    #[serde(rename = "insLoss", alias = "ins_loss")]
    Lost,
}

impl fmt::Display for InsuranceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Won => write!(f, "Insurance WIN"),
            Self::Lost => write!(f, "Insurance LOSS"),
        }
    }
}

/// Player decisions the engine accepts for the active spot.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerAction {
    Hit,
    Stand,
    Double,
    Split,
}

impl PlayerAction {
    /// Name sent to the engine.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hit => "hit",
            Self::Stand => "stand",
            Self::Double => "double",
            Self::Split => "split",
        }
    }
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which spots a wager edit applies to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SpotTarget {
    All,
    Number(u8),
}

/// Blackjack payout rule for a session.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum BlackjackPayout {
    #[default]
    ThreeToTwo,
    SixToFive,
}

impl BlackjackPayout {
    pub fn from_six_five(six_five: bool) -> Self {
        if six_five {
            Self::SixToFive
        } else {
            Self::ThreeToTwo
        }
    }
}

impl fmt::Display for BlackjackPayout {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ThreeToTwo => write!(f, "3:2"),
            Self::SixToFive => write!(f, "6:5"),
        }
    }
}

/// A table configuration plus the engine's cumulative counters.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(deserialize_with = "de_id")]
    pub id: SessionId,
    pub decks: u8,
    pub num_spots: u8,
    #[serde(alias = "penetrationIndex")]
    pub penetration: u8,
    #[serde(default)]
    pub six_five: bool,
    #[serde(default)]
    pub stand17: bool,
    #[serde(default)]
    pub start_time: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub end_time: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default, alias = "handsPlayed")]
    pub hand_count: u32,
    #[serde(default)]
    pub shoe_count: u32,
    #[serde(default)]
    pub spot_count: u32,
    #[serde(default, alias = "profitCents")]
    pub profit: Cents,
}

impl Session {
    pub fn payout(&self) -> BlackjackPayout {
        BlackjackPayout::from_six_five(self.six_five)
    }

    /// Total cards in the shoe.
    pub fn shoe_size(&self) -> u32 {
        CARDS_PER_DECK * u32::from(self.decks)
    }
}

/// One deal cycle. `id` stays `None` until the engine deals.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Hand {
    pub id: Option<HandId>,
    pub dealer_cards: Vec<Card>,
    pub current_spot_id: Option<SpotId>,
}

/// One betting position at the table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Spot {
    pub id: Option<SpotId>,
    pub spot_number: u8,
    pub wager: Cents,
    pub cards: Vec<Card>,
    pub active: bool,
    pub outcome: Option<Outcome>,
    pub profit: Option<Cents>,
    pub insurance: InsuranceDecision,
    pub insurance_outcome: Option<InsuranceOutcome>,
    pub is_bust: bool,
    pub is_blackjack: bool,
    pub doubled: bool,
    pub split: bool,
    pub split_offered: bool,
}

impl Spot {
    /// An empty, undealt spot in the given seat.
    pub fn new(spot_number: u8) -> Self {
        Self {
            id: None,
            spot_number,
            wager: 0,
            cards: Vec::new(),
            active: true,
            outcome: None,
            profit: None,
            insurance: InsuranceDecision::Undecided,
            insurance_outcome: None,
            is_bust: false,
            is_blackjack: false,
            doubled: false,
            split: false,
            split_offered: false,
        }
    }

    pub fn has_wager(&self) -> bool {
        self.wager > 0
    }
}

/// Accepts GraphQL `ID` values serialised either as numbers or strings.
pub(crate) fn de_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Num(i64),
        Str(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Num(n) => Ok(n),
        RawId::Str(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

pub(crate) fn de_opt_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapped(#[serde(deserialize_with = "de_id")] i64);

    Ok(Option::<Wrapped>::deserialize(deserializer)?.map(|Wrapped(id)| id))
}

/// Formats integer cents as dollars, e.g. `$12.50` or `-$3.00`.
pub fn format_money(cents: Cents, show_sign: bool) -> String {
    let dollars = cents.unsigned_abs() / 100;
    let remainder = cents.unsigned_abs() % 100;
    let sign = match (show_sign, cents < 0) {
        (_, true) => "-",
        (true, false) => "+",
        (false, false) => "",
    };
    format!("{sign}${dollars}.{remainder:02}")
}
