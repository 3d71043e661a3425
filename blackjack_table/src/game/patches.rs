//! Typed engine results.
//!
//! Each engine operation answers with its own patch type that names exactly
//! the fields it is allowed to write into [`TableState`](super::state::TableState).
//! The field names follow the engine's camelCase wire format so transports
//! can deserialise straight into these types.

use serde::{Deserialize, Serialize};

use super::entities::{
    Card, Cents, HandId, InsuranceDecision, InsuranceOutcome, Outcome, SpotId, de_id, de_opt_id,
};

fn de_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// Wager for one seat, as sent with a deal request.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotWager {
    pub spot_number: u8,
    pub wager: Cents,
}

/// Insurance answer for one spot, as sent to the engine.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct SpotInsurance {
    pub id: SpotId,
    pub insurance: bool,
}

/// Hand-level pointer fields carried by action and resolution responses.
///
/// `dealer_cards` is `None` when the response did not include them.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HandPointer {
    #[serde(deserialize_with = "de_id")]
    pub id: HandId,
    #[serde(default)]
    pub dealer_cards: Option<Vec<Card>>,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub current_spot_id: Option<SpotId>,
}

/// Per-spot slice of a deal response.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DealtSpot {
    #[serde(deserialize_with = "de_id")]
    pub id: SpotId,
    pub spot_number: u8,
    #[serde(rename = "playerCards", default)]
    pub cards: Vec<Card>,
    #[serde(default, deserialize_with = "de_flag")]
    pub split_offered: bool,
    #[serde(default, deserialize_with = "de_flag")]
    pub is_blackjack: bool,
    #[serde(rename = "result", default)]
    pub outcome: Option<Outcome>,
    #[serde(default)]
    pub profit: Option<Cents>,
}

/// DealHand response.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DealResult {
    #[serde(deserialize_with = "de_id")]
    pub id: HandId,
    #[serde(default)]
    pub dealer_cards: Vec<Card>,
    #[serde(default, deserialize_with = "de_flag")]
    pub insurance_offered: bool,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub current_spot_id: Option<SpotId>,
    #[serde(default)]
    pub spots: Vec<DealtSpot>,
}

/// UpdateInsurance / InsureSpots response entry.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
pub struct InsurancePatch {
    #[serde(deserialize_with = "de_id")]
    pub id: SpotId,
    #[serde(default)]
    pub insurance: InsuranceDecision,
}

/// Settlement fields written by intermediate and dealer resolution.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SettlementPatch {
    #[serde(deserialize_with = "de_id")]
    pub id: SpotId,
    #[serde(default)]
    pub insurance: InsuranceDecision,
    #[serde(rename = "insuranceResult", default)]
    pub insurance_outcome: Option<InsuranceOutcome>,
    #[serde(default)]
    pub profit: Option<Cents>,
    #[serde(rename = "result", default)]
    pub outcome: Option<Outcome>,
}

/// IntermediateActions response.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IntermediateResult {
    #[serde(flatten)]
    pub hand: HandPointer,
    #[serde(default)]
    pub spots: Vec<SettlementPatch>,
}

/// PlayerActions response: the acted-on spot plus the hand pointer.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActionResult {
    #[serde(deserialize_with = "de_id")]
    pub id: SpotId,
    #[serde(rename = "playerCards", default)]
    pub cards: Vec<Card>,
    #[serde(default)]
    pub wager: Option<Cents>,
    #[serde(rename = "result", default)]
    pub outcome: Option<Outcome>,
    #[serde(default)]
    pub profit: Option<Cents>,
    #[serde(rename = "insuranceResult", default)]
    pub insurance_outcome: Option<InsuranceOutcome>,
    #[serde(default, deserialize_with = "de_flag")]
    pub is_bust: bool,
    #[serde(default, deserialize_with = "de_flag")]
    pub is_blackjack: bool,
    #[serde(default, deserialize_with = "de_flag")]
    pub split: bool,
    #[serde(default, deserialize_with = "de_flag")]
    pub double: bool,
    #[serde(default, deserialize_with = "de_flag")]
    pub split_offered: bool,
    pub hand: HandPointer,
}

/// Shoe state reported after dealer resolution.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShoeState {
    #[serde(default)]
    pub discarded_cards: u32,
    #[serde(default, deserialize_with = "de_flag")]
    pub shuffle: bool,
}

/// Session counters reported after dealer resolution.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionCounters {
    #[serde(default)]
    pub shoe_count: u32,
    #[serde(default)]
    pub profit: Cents,
    #[serde(default)]
    pub hand_count: u32,
    #[serde(default)]
    pub spot_count: u32,
}

/// DealerActions response.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DealerResult {
    #[serde(flatten)]
    pub hand: HandPointer,
    #[serde(default)]
    pub spots: Vec<SettlementPatch>,
    #[serde(default)]
    pub shoe: ShoeState,
    #[serde(default)]
    pub session: SessionCounters,
}
