use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use super::RelayError;
use crate::core::AppConfig;
use crate::openai::{
    CompletionError, CompletionRequest, Completions, Message, OpenAiCompletions, Role, reply_text,
};

pub const MAX_TOKENS: u32 = 800;
pub const TEMPERATURE: f64 = 0.6;

/// Anything that isn't exactly `user` is forwarded as the assistant.
pub fn normalize_role(label: Option<&str>) -> Role {
    match label {
        Some("user") => Role::User,
        _ => Role::Assistant,
    }
}

fn content_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Read the `messages` field of a request body into upstream messages,
/// keeping their order.
pub fn parse_history(body: &Value) -> Result<Vec<Message>, RelayError> {
    let messages = body["messages"]
        .as_array()
        .ok_or(RelayError::InvalidInput)?;

    Ok(messages
        .iter()
        .map(|m| Message {
            role: normalize_role(m["role"].as_str()),
            content: content_text(&m["content"]),
        })
        .collect())
}

/// Forwards a conversation to the completion API with a fixed system
/// instruction and generation parameters, then returns the reply text.
pub struct Relay {
    upstream: Arc<dyn Completions>,
    model: String,
    system_message: String,
    deadline: Duration,
}

impl Relay {
    pub fn new(
        upstream: Arc<dyn Completions>,
        model: &str,
        system_message: &str,
        deadline: Duration,
    ) -> Self {
        Self {
            upstream,
            model: model.to_string(),
            system_message: system_message.to_string(),
            deadline,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let upstream = OpenAiCompletions::new(
            &config.openai_api_hostname,
            config.openai_api_key.as_deref(),
        );
        Self::new(
            Arc::new(upstream),
            &config.openai_model,
            &config.system_message,
            Duration::from_secs(config.upstream_timeout_secs),
        )
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    pub fn build_request(&self, history: Vec<Message>) -> CompletionRequest {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(Message::new(Role::System, &self.system_message));
        messages.extend(history);

        CompletionRequest {
            model: self.model.clone(),
            messages,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        }
    }

    /// Make exactly one upstream call for `history`. The call is
    /// abandoned when `cancel` fires or the deadline passes.
    pub async fn reply(
        &self,
        history: Vec<Message>,
        cancel: &CancellationToken,
    ) -> Result<String, RelayError> {
        let request = self.build_request(history);
        tracing::debug!(
            "Relaying {} messages to model {}",
            request.messages.len(),
            request.model
        );

        let call = tokio::time::timeout(self.deadline, self.upstream.complete(&request));
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!("Client went away, abandoning upstream call");
                return Err(RelayError::Cancelled);
            }
            result = call => result.map_err(|_| {
                tracing::error!("Upstream call exceeded deadline of {:?}", self.deadline);
                RelayError::Timeout(self.deadline)
            })?,
        };

        match result {
            Ok(resp) => Ok(reply_text(&resp)),
            Err(CompletionError::Status { status, body }) => {
                tracing::error!("OpenAI error {} {}", status, body);
                Err(RelayError::Upstream(body))
            }
            Err(e @ (CompletionError::Transport(_) | CompletionError::Decode(_))) => {
                tracing::error!("Upstream request failed: {}", e);
                Err(RelayError::Unexpected(anyhow!(e)))
            }
        }
    }
}
