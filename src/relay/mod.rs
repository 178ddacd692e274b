//! The relay between a chat client and the upstream completion API.
mod core;
mod error;

pub use self::core::{MAX_TOKENS, Relay, TEMPERATURE, normalize_role, parse_history};
pub use error::RelayError;
