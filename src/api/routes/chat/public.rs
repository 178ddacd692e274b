//! Public types for the chat API
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct ChatResponse {
    pub reply: String,
}

impl ChatResponse {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}
