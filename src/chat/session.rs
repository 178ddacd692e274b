use super::models::{ChatMessage, Conversation};
use super::transport::{RelayTransport, TransportError};
use crate::openai::Role;

/// Where a session shows its messages.
pub trait ChatView {
    fn render(&mut self, message: &ChatMessage);
    /// Show a failed submission. Styled like an assistant reply.
    fn render_error(&mut self, text: &str);
    fn clear(&mut self);
    /// Disable composing and show a typing indicator while busy.
    fn set_busy(&mut self, busy: bool);
}

/// The history to send for one accepted submission.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub conversation_id: String,
    pub messages: Vec<ChatMessage>,
}

/// One user's chat: the conversation, whether a relay call is
/// outstanding, and the view it renders to.
pub struct ChatSession<V: ChatView> {
    conversation: Conversation,
    busy: bool,
    view: V,
}

impl<V: ChatView> ChatSession<V> {
    pub fn new(view: V) -> Self {
        Self {
            conversation: Conversation::new(),
            busy: false,
            view,
        }
    }

    /// Start the session with a local assistant greeting.
    pub fn with_greeting(view: V, greeting: &str) -> Self {
        let mut session = Self::new(view);
        session.append_assistant_message(Some(greeting));
        session
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Returns false without touching the conversation when `text` is
    /// blank.
    pub fn append_user_message(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.append(ChatMessage::new(Role::User, text));
        true
    }

    pub fn append_assistant_message(&mut self, text: Option<&str>) {
        self.append(ChatMessage::new(Role::Assistant, text.unwrap_or("")));
    }

    fn append(&mut self, msg: ChatMessage) {
        self.view.render(&msg);
        self.conversation.push(msg);
    }

    /// Start over with an empty conversation and a new id. An
    /// outstanding request is left alone, its reply lands in the new
    /// conversation.
    pub fn reset(&mut self) {
        self.conversation = Conversation::new();
        self.view.clear();
    }

    /// Accept a submission. Returns `None` while another request is
    /// outstanding or when `text` is blank.
    pub fn begin_submit(&mut self, text: &str) -> Option<PendingRequest> {
        if self.busy || !self.append_user_message(text) {
            return None;
        }

        self.busy = true;
        self.view.set_busy(true);

        Some(PendingRequest {
            conversation_id: self.conversation.id().to_string(),
            messages: self.conversation.messages().to_vec(),
        })
    }

    /// Record the outcome of the outstanding request. Errors are shown
    /// but never become part of the conversation.
    pub fn finish_submit(&mut self, result: Result<String, TransportError>) {
        match result {
            Ok(reply) => self.append_assistant_message(Some(&reply)),
            Err(e) => {
                tracing::debug!("Relay call failed: {}", e);
                self.view.render_error(&e.to_string());
            }
        }
        self.busy = false;
        self.view.set_busy(false);
    }

    /// Submit `text` and wait for the reply. Returns whether the
    /// submission was accepted.
    pub async fn submit<T>(&mut self, transport: &T, text: &str) -> bool
    where
        T: RelayTransport + ?Sized,
    {
        let Some(pending) = self.begin_submit(text) else {
            return false;
        };
        let result = transport.send(&pending.messages).await;
        self.finish_submit(result);
        true
    }
}
