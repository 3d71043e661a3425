//! GraphQL client for the blackjack game engine.

use async_trait::async_trait;
use blackjack_table::{
    SessionConfig,
    engine::{EngineError, EngineResult, GameEngine},
    game::{
        entities::{HandId, PlayerAction, Session, SessionId, SpotId},
        patches::{
            ActionResult, DealResult, DealerResult, InsurancePatch, IntermediateResult,
            SpotInsurance, SpotWager,
        },
    },
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use std::time::Duration;

const ACTIVE_SESSION: &str = "query FetchActiveSession { activeSession { id startTime endTime handCount shoeCount spotCount profit decks numSpots penetration sixFive stand17 } }";

const CREATE_SESSION: &str = "mutation CreateSession($input: CreateSessionInput!) { createSession(input: $input) { session { id startTime decks numSpots penetration sixFive stand17 } errors } }";

const END_SESSION: &str =
    "mutation EndSession($id: ID!) { endSession(input: {id: $id}) { session { id endTime } errors } }";

const DEAL_HAND: &str = "mutation DealHand($sessionId: ID!, $spots: [SpotInput!]!) { dealHand(input: {sessionId: $sessionId, spots: $spots}) { success errors hand { id dealerCards insuranceOffered currentSpotId spots { id spotNumber playerCards splitOffered isBlackjack result profit } } } }";

const UPDATE_INSURANCE: &str = "mutation UpdateInsurance($spotId: ID!, $insurance: Boolean!) { updateInsurance(input: {spotId: $spotId, insurance: $insurance}) { spot { id insurance } errors } }";

const INSURE_SPOTS: &str = "mutation InsureSpots($spots: [SpotInsuranceInput!]!) { insureSpots(input: {spots: $spots}) { spots { id insurance } errors } }";

const INTERMEDIATE_ACTIONS: &str = "mutation IntermediateActions($handId: ID!) { intermediateActions(input: {handId: $handId}) { hand { id dealerCards currentSpotId spots { id insurance insuranceResult profit result } } errors } }";

const PLAYER_ACTIONS: &str = "mutation PlayerActions($spotId: ID!, $action: String!) { playerActions(input: {spotId: $spotId, action: $action}) { spot { id spotNumber wager playerCards insurance result profit insuranceResult split double splitOffered isBlackjack isBust hand { id currentSpotId dealerCards } } errors } }";

const DEALER_ACTIONS: &str = "mutation DealerActions($handId: ID!) { dealerActions(input: {handId: $handId}) { hand { id dealerCards currentSpotId spots { id insurance insuranceResult profit result } shoe { discardedCards shuffle } session { shoeCount profit handCount spotCount } } errors } }";

#[derive(Debug, Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<GraphqlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct SessionPayload {
    session: Option<Session>,
}

#[derive(Debug, Deserialize)]
struct HandPayload<T> {
    hand: Option<T>,
}

#[derive(Debug, Deserialize)]
struct SpotPayload<T> {
    spot: Option<T>,
}

#[derive(Debug, Deserialize)]
struct SpotsPayload {
    #[serde(default)]
    spots: Vec<InsurancePatch>,
}

/// Error strings a mutation payload reports in its own `errors` field.
fn payload_errors(payload: &Value) -> Vec<String> {
    match payload.get("errors") {
        Some(Value::Array(errors)) => errors
            .iter()
            .map(|err| match err {
                Value::String(message) => message.clone(),
                Value::Object(fields) => fields
                    .get("message")
                    .and_then(Value::as_str)
                    .map_or_else(|| err.to_string(), str::to_string),
                other => other.to_string(),
            })
            .collect(),
        Some(Value::String(message)) if !message.is_empty() => vec![message.clone()],
        _ => Vec::new(),
    }
}

/// Splits a GraphQL response into the operation's payload, turning
/// top-level and payload-level errors into [`EngineError::Rejected`].
fn extract_payload(response: GraphqlResponse, field: &'static str) -> EngineResult<Value> {
    if let Some(errors) = response.errors
        && !errors.is_empty()
    {
        return Err(EngineError::Rejected(
            errors.into_iter().map(|err| err.message).collect(),
        ));
    }

    let payload = response
        .data
        .and_then(|mut data| data.get_mut(field).map(Value::take))
        .ok_or(EngineError::MissingField(field))?;

    let errors = payload_errors(&payload);
    if !errors.is_empty() {
        return Err(EngineError::Rejected(errors));
    }
    Ok(payload)
}

/// [`GameEngine`] over HTTP GraphQL
pub struct GraphqlEngine {
    endpoint: String,
    client: reqwest::Client,
    auth_token: Option<String>,
}

impl GraphqlEngine {
    /// Create a new engine client
    ///
    /// # Arguments
    ///
    /// * `endpoint` - GraphQL endpoint URL
    /// * `auth_token` - Optional bearer token
    /// * `timeout` - Per-request timeout
    pub fn new(
        endpoint: String,
        auth_token: Option<String>,
        timeout: Duration,
    ) -> EngineResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| EngineError::Transport(err.to_string()))?;

        Ok(Self {
            endpoint,
            client,
            auth_token,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send(&self, query: &str, variables: Value) -> EngineResult<GraphqlResponse> {
        let mut request = self.client.post(&self.endpoint).json(&GraphqlRequest {
            query,
            variables,
        });
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|err| EngineError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response: {e}"));
            return Err(EngineError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|err| EngineError::Decode(err.to_string()))
    }

    /// Runs one operation and returns its payload decoded as `T`.
    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        query: &str,
        field: &'static str,
        variables: Value,
    ) -> EngineResult<T> {
        let result = self
            .send(query, variables)
            .await
            .and_then(|response| extract_payload(response, field))
            .and_then(|payload| serde_json::from_value(payload).map_err(EngineError::from));

        if let Err(err) = &result {
            tracing::debug!(operation = operation, "Engine error: {err}");
        }
        result
    }
}

#[async_trait]
impl GameEngine for GraphqlEngine {
    async fn create_session(&self, config: &SessionConfig) -> EngineResult<Session> {
        let payload: SessionPayload = self
            .execute(
                "CreateSession",
                CREATE_SESSION,
                "createSession",
                json!({ "input": config }),
            )
            .await?;
        payload.session.ok_or(EngineError::MissingField("session"))
    }

    async fn active_session(&self) -> EngineResult<Option<Session>> {
        self.execute("FetchActiveSession", ACTIVE_SESSION, "activeSession", json!({}))
            .await
    }

    async fn end_session(&self, session_id: SessionId) -> EngineResult<()> {
        let _: Value = self
            .execute(
                "EndSession",
                END_SESSION,
                "endSession",
                json!({ "id": session_id.to_string() }),
            )
            .await?;
        Ok(())
    }

    async fn deal_hand(
        &self,
        session_id: SessionId,
        spots: &[SpotWager],
    ) -> EngineResult<DealResult> {
        let payload: HandPayload<DealResult> = self
            .execute(
                "DealHand",
                DEAL_HAND,
                "dealHand",
                json!({ "sessionId": session_id.to_string(), "spots": spots }),
            )
            .await?;
        payload.hand.ok_or(EngineError::MissingField("hand"))
    }

    async fn update_insurance(
        &self,
        spot_id: SpotId,
        insurance: bool,
    ) -> EngineResult<InsurancePatch> {
        let payload: SpotPayload<InsurancePatch> = self
            .execute(
                "UpdateInsurance",
                UPDATE_INSURANCE,
                "updateInsurance",
                json!({ "spotId": spot_id.to_string(), "insurance": insurance }),
            )
            .await?;
        payload.spot.ok_or(EngineError::MissingField("spot"))
    }

    async fn insure_spots(&self, spots: &[SpotInsurance]) -> EngineResult<Vec<InsurancePatch>> {
        let payload: SpotsPayload = self
            .execute(
                "InsureSpots",
                INSURE_SPOTS,
                "insureSpots",
                json!({ "spots": spots }),
            )
            .await?;
        Ok(payload.spots)
    }

    async fn intermediate_actions(&self, hand_id: HandId) -> EngineResult<IntermediateResult> {
        let payload: HandPayload<IntermediateResult> = self
            .execute(
                "IntermediateActions",
                INTERMEDIATE_ACTIONS,
                "intermediateActions",
                json!({ "handId": hand_id.to_string() }),
            )
            .await?;
        payload.hand.ok_or(EngineError::MissingField("hand"))
    }

    async fn player_action(
        &self,
        spot_id: SpotId,
        action: PlayerAction,
    ) -> EngineResult<ActionResult> {
        let payload: SpotPayload<ActionResult> = self
            .execute(
                "PlayerActions",
                PLAYER_ACTIONS,
                "playerActions",
                json!({ "spotId": spot_id.to_string(), "action": action.as_str() }),
            )
            .await?;
        payload.spot.ok_or(EngineError::MissingField("spot"))
    }

    async fn dealer_actions(&self, hand_id: HandId) -> EngineResult<DealerResult> {
        let payload: HandPayload<DealerResult> = self
            .execute(
                "DealerActions",
                DEALER_ACTIONS,
                "dealerActions",
                json!({ "handId": hand_id.to_string() }),
            )
            .await?;
        payload.hand.ok_or(EngineError::MissingField("hand"))
    }
}
