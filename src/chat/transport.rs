use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::models::ChatMessage;

#[derive(Debug, Error)]
pub enum TransportError {
    /// The relay answered with a non-success status
    #[error("Server error: {0}")]
    Server(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Sends the whole conversation to the relay and returns the reply.
#[async_trait]
pub trait RelayTransport: Send + Sync {
    async fn send(&self, messages: &[ChatMessage]) -> Result<String, TransportError>;
}

#[derive(Serialize)]
struct ChatPayload<'a> {
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    reply: Option<String>,
}

/// Talks to the relay's `POST /api/chat` endpoint.
pub struct HttpTransport {
    server_url: String,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(server_url: &str) -> Self {
        Self {
            server_url: server_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl RelayTransport for HttpTransport {
    async fn send(&self, messages: &[ChatMessage]) -> Result<String, TransportError> {
        let url = format!("{}/api/chat", self.server_url);
        let resp = self
            .client
            .post(url)
            .json(&ChatPayload { messages })
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(TransportError::Server(resp.text().await?));
        }

        let data: ChatReply = resp.json().await?;
        Ok(data.reply.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openai::Role;
    use serde_json::json;

    #[tokio::test]
    async fn test_send_posts_history_and_reads_reply() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/chat")
            .match_body(mockito::Matcher::PartialJson(json!({
                "messages": [{"role": "user", "content": "Hi"}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"reply": "Hello"}"#)
            .create_async()
            .await;

        let transport = HttpTransport::new(&format!("{}/", server.url()));
        let reply = transport
            .send(&[ChatMessage::new(Role::User, "Hi")])
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(reply, "Hello");
    }

    #[tokio::test]
    async fn test_send_missing_reply_is_empty() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/chat")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{}")
            .create_async()
            .await;

        let transport = HttpTransport::new(&server.url());
        let reply = transport.send(&[]).await.unwrap();
        assert_eq!(reply, "");
    }

    #[tokio::test]
    async fn test_send_surfaces_server_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/chat")
            .with_status(400)
            .with_body("messages must be an array")
            .create_async()
            .await;

        let transport = HttpTransport::new(&server.url());
        let err = transport.send(&[]).await.unwrap_err();
        assert_eq!(err.to_string(), "Server error: messages must be an array");
    }

    #[tokio::test]
    async fn test_send_surfaces_network_errors() {
        // Nothing listens on port 9 locally
        let transport = HttpTransport::new("http://127.0.0.1:9");
        let err = transport.send(&[]).await.unwrap_err();
        assert!(matches!(err, TransportError::Network(_)));
        assert!(err.to_string().starts_with("Network error: "));
    }
}
