use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "system")]
    System,
    #[serde(rename = "assistant")]
    Assistant,
    #[serde(rename = "user")]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::Assistant => "assistant",
            Role::User => "user",
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Self {
        Message {
            role,
            content: content.to_string(),
        }
    }
}

/// Body of a `/v1/chat/completions` call.
#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: f64,
}

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("upstream responded with {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    /// A success response whose body isn't JSON
    #[error("invalid completion response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub async fn completion(
    request: &CompletionRequest,
    api_hostname: &str,
    api_key: Option<&str>,
) -> Result<Value, CompletionError> {
    let url = format!("{}/v1/chat/completions", api_hostname.trim_end_matches("/"));
    let mut builder = reqwest::Client::new()
        .post(url)
        .header("Content-Type", "application/json")
        .json(request);
    if let Some(key) = api_key {
        builder = builder.bearer_auth(key);
    }

    let response = builder.send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await?;
        return Err(CompletionError::Status { status, body });
    }

    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Pull the reply text out of a completion response. Falls back to
/// the legacy `text` field and then to a fixed placeholder.
pub fn reply_text(resp: &Value) -> String {
    let choice = &resp["choices"][0];
    [choice["message"]["content"].as_str(), choice["text"].as_str()]
        .into_iter()
        .flatten()
        .find(|text| !text.is_empty())
        .unwrap_or("No reply")
        .trim()
        .to_string()
}

/// Anything that can answer a chat completion request.
#[async_trait]
pub trait Completions: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<Value, CompletionError>;
}

/// Completions served by an OpenAI compatible HTTP API.
pub struct OpenAiCompletions {
    api_hostname: String,
    api_key: Option<String>,
}

impl OpenAiCompletions {
    pub fn new(api_hostname: &str, api_key: Option<&str>) -> Self {
        Self {
            api_hostname: api_hostname.to_string(),
            api_key: api_key.map(String::from),
        }
    }
}

#[async_trait]
impl Completions for OpenAiCompletions {
    async fn complete(&self, request: &CompletionRequest) -> Result<Value, CompletionError> {
        completion(request, &self.api_hostname, self.api_key.as_deref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![
                Message::new(Role::System, "You are a helpful assistant."),
                Message::new(Role::User, "Hi"),
            ],
            max_tokens: 800,
            temperature: 0.6,
        }
    }

    #[test]
    fn test_reply_text_uses_message_content() {
        let resp = json!({"choices": [{"message": {"role": "assistant", "content": "  Hello \n"}}]});
        assert_eq!(reply_text(&resp), "Hello");
    }

    #[test]
    fn test_reply_text_falls_back_to_legacy_text() {
        let resp = json!({"choices": [{"text": "legacy"}]});
        assert_eq!(reply_text(&resp), "legacy");
    }

    #[test]
    fn test_reply_text_skips_empty_content() {
        let resp = json!({"choices": [{"message": {"content": ""}, "text": "fallback"}]});
        assert_eq!(reply_text(&resp), "fallback");
    }

    #[test]
    fn test_reply_text_placeholder() {
        assert_eq!(reply_text(&json!({"choices": []})), "No reply");
        assert_eq!(reply_text(&json!({})), "No reply");
        assert_eq!(
            reply_text(&json!({"choices": [{"message": {"content": null}}]})),
            "No reply"
        );
    }

    #[test]
    fn test_request_serializes_to_wire_format() {
        let body = serde_json::to_value(request()).unwrap();
        assert_eq!(
            body,
            json!({
                "model": "gpt-4o-mini",
                "messages": [
                    {"role": "system", "content": "You are a helpful assistant."},
                    {"role": "user", "content": "Hi"}
                ],
                "max_tokens": 800,
                "temperature": 0.6
            })
        );
    }

    #[tokio::test]
    async fn test_completion_sends_bearer_auth() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(mockito::Matcher::PartialJson(json!({"model": "gpt-4o-mini"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices": [{"message": {"role": "assistant", "content": "Hello"}}]}"#)
            .create_async()
            .await;

        let url = server.url();
        let resp = completion(&request(), &format!("{}/", url), Some("test-key"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(reply_text(&resp), "Hello");
    }

    #[tokio::test]
    async fn test_completion_returns_status_error_with_raw_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(429)
            .with_body("rate limited")
            .create_async()
            .await;

        let client = OpenAiCompletions::new(&server.url(), None);
        let err = client.complete(&request()).await.unwrap_err();

        match err {
            CompletionError::Status { status, body } => {
                assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
                assert_eq!(body, "rate limited");
            }
            other => panic!("Expected a status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_completion_reports_unreachable_host_as_transport_error() {
        // Nothing listens on port 9 locally
        let client = OpenAiCompletions::new("http://127.0.0.1:9", None);
        let err = client.complete(&request()).await.unwrap_err();
        assert!(matches!(err, CompletionError::Transport(_)));
    }

    #[tokio::test]
    async fn test_completion_reports_non_json_success_as_decode_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = OpenAiCompletions::new(&server.url(), Some("test-key"));
        let err = client.complete(&request()).await.unwrap_err();
        assert!(matches!(err, CompletionError::Decode(_)));
    }
}
