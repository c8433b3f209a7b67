//! Match-outcome prediction via the generative-AI completion service.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;

use crate::error::ApiError;
use crate::http::cors::{GateDecision, MethodGate};
use crate::http::request::{read_body, request_id};
use crate::http::response::{finish, preflight, within_deadline};
use crate::http::server::AppState;
use crate::observability::metrics::{self, UpstreamOutcome};

const HANDLER: &str = "gemini_prediction";
const UPSTREAM: &str = "gemini";
const GENERIC_FAILURE: &str = "Failed to get prediction from AI model.";

/// The three caller-supplied strings the prompt is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionRequest {
    pub home_team_name: String,
    pub away_team_name: String,
    pub competition_name: String,
}

impl PredictionRequest {
    /// Extract the request from a raw body; any missing or empty field
    /// rejects the whole request.
    ///
    /// Non-zero numbers and `true` are accepted and stringified into the
    /// prompt. `false`, `0`, `null`, arrays and objects count as missing.
    pub fn from_body(body: &[u8]) -> Result<Self, ApiError> {
        let value: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
        let field = |name: &str| value.get(name).and_then(prompt_text);
        match (
            field("homeTeamName"),
            field("awayTeamName"),
            field("competitionName"),
        ) {
            (Some(home_team_name), Some(away_team_name), Some(competition_name)) => Ok(Self {
                home_team_name,
                away_team_name,
                competition_name,
            }),
            _ => Err(ApiError::InvalidInput(
                "Missing required fields: homeTeamName, awayTeamName, competitionName.".to_string(),
            )),
        }
    }

    pub fn prompt(&self) -> String {
        let home = &self.home_team_name;
        let away = &self.away_team_name;
        format!(
            "Predict the outcome (win for {home}, win for {away}, or draw) for the upcoming soccer match \
             between {home} and {away} in the {competition}. Provide a one-sentence justification. \
             Be concise. Example: Draw, as both teams have similar recent form.",
            competition = self.competition_name
        )
    }
}

fn prompt_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub prediction: String,
}

pub async fn gemini_prediction(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let start = Instant::now();
    let request_id = request_id(&headers).to_string();
    let cors = state.cors.headers(headers.get(header::ORIGIN));
    let result = within_deadline(
        state.request_timeout,
        GENERIC_FAILURE,
        predict(&state, &request_id, &method, body),
    )
    .await;
    finish(HANDLER, &request_id, start, cors, result)
}

async fn predict(
    state: &AppState,
    request_id: &str,
    method: &Method,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    if MethodGate::new(Method::POST, true).check(method)? == GateDecision::Preflight {
        return Ok(preflight());
    }

    let api_key = state
        .credentials
        .gemini_api_key()
        .ok_or(ApiError::ConfigurationMissing("API key"))?;

    let request = PredictionRequest::from_body(&read_body(body)?)?;
    tracing::debug!(
        request_id = %request_id,
        home = %request.home_team_name,
        away = %request.away_team_name,
        competition = %request.competition_name,
        model = state.gemini.model(),
        "Requesting prediction"
    );

    let generation = state.gemini.request_for(request.prompt());
    let response = match state.gemini.generate(api_key, &generation).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Error calling completion service");
            metrics::record_upstream(UPSTREAM, UpstreamOutcome::Unreachable);
            return Err(ApiError::UpstreamUnreachable(GENERIC_FAILURE));
        }
    };

    if response.first_content().is_none() {
        let reason = response.block_reason().unwrap_or("Unknown reason").to_string();
        tracing::error!(request_id = %request_id, block_reason = %reason, "Completion response blocked or empty");
        metrics::record_upstream(UPSTREAM, UpstreamOutcome::ErrorStatus);
        return Err(ApiError::GenerationBlocked(reason));
    }

    let prediction = match response.text() {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Completion text unusable");
            metrics::record_upstream(UPSTREAM, UpstreamOutcome::ErrorStatus);
            return Err(ApiError::UpstreamUnreachable(GENERIC_FAILURE));
        }
    };

    metrics::record_upstream(UPSTREAM, UpstreamOutcome::Success);
    Ok((StatusCode::OK, Json(PredictionResponse { prediction })).into_response())
}
