use std::env;

pub const DEFAULT_SYSTEM_MESSAGE: &str =
    "You are Vision, a helpful assistant. Reply concisely in Hindi or English depending on user.";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub openai_api_hostname: String,
    // Missing keys are allowed, the upstream rejects the call instead
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub system_message: String,
    pub upstream_timeout_secs: u64,
    pub static_dir: String,
}

impl AppConfig {
    /// Build the config from any key/value source. `Default` uses the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let openai_api_hostname = lookup("VISION_LLM_HOST")
            .unwrap_or_else(|| "https://api.openai.com".to_string());
        let openai_api_key = lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty());
        let openai_model =
            lookup("VISION_LLM_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string());
        let system_message = lookup("VISION_SYSTEM_MESSAGE")
            .unwrap_or_else(|| DEFAULT_SYSTEM_MESSAGE.to_string());
        let upstream_timeout_secs = lookup("VISION_UPSTREAM_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(600);
        let static_dir = lookup("VISION_STATIC_DIR").unwrap_or_else(|| "./".to_string());

        Self {
            openai_api_hostname,
            openai_api_key,
            openai_model,
            system_message,
            upstream_timeout_secs,
            static_dir,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }
}
