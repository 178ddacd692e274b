//! Router for the chat API

use std::sync::Arc;

use axum::{Json, Router, body::Bytes, extract::State, routing::post};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use super::public;
use crate::api::state::AppState;
use crate::relay::{RelayError, parse_history};

type SharedState = Arc<AppState>;

/// Relay the conversation upstream and respond with the reply
async fn chat_handler(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<public::ChatResponse>, RelayError> {
    // Anything that isn't a JSON object with a `messages` array is
    // rejected the same way
    let payload: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let history = parse_history(&payload)?;

    // Cancelled when this handler is dropped, e.g. the client hung up
    let cancel = CancellationToken::new();
    let _disconnect_guard = cancel.clone().drop_guard();

    let relay = Arc::clone(&state.relay);
    let reply = tokio::spawn(async move { relay.reply(history, &cancel).await })
        .await
        .map_err(anyhow::Error::from)??;

    Ok(Json(public::ChatResponse::new(&reply)))
}

/// Create the chat router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", post(chat_handler))
}
