//! Client side of the chat: the conversation a user is having, the
//! session that guards submissions, and the transport to the relay.
mod models;
mod session;
mod transport;

pub use models::{ChatMessage, Conversation};
pub use session::{ChatSession, ChatView, PendingRequest};
pub use transport::{HttpTransport, RelayTransport, TransportError};
