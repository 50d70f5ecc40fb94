//! Service configuration, loaded once from the environment at startup and
//! passed into the components that need it.

use std::env;

const DEFAULT_VISION_MODEL: &str = "gpt-4o-mini";
const DEFAULT_VISION_TIMEOUT_SECS: u64 = 30;
const DEFAULT_INGEST_PORT: u16 = 8000;

#[derive(Debug, Clone)]
pub struct Config {
    /// LiveKit connection URL (empty if not configured).
    pub livekit_url: String,
    pub livekit_api_key: String,
    pub livekit_api_secret: String,
    /// API keys for vision models. Empty keys do not prevent startup;
    /// the remote call fails at invocation time instead.
    pub openai_api_key: String,
    pub anthropic_api_key: String,
    /// Vision model used for trigger classification.
    pub vision_model: String,
    /// Deadline for a single classification round trip.
    pub vision_timeout_secs: u64,
    /// Comma-separated CORS origin allow-list. `*` allows all.
    pub allowed_origins: String,
    pub ingest_port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            livekit_url: env_or("LIVEKIT_URL", ""),
            livekit_api_key: env_or("LIVEKIT_API_KEY", ""),
            livekit_api_secret: env_or("LIVEKIT_API_SECRET", ""),
            openai_api_key: env_or("OPENAI_API_KEY", ""),
            anthropic_api_key: env_or("ANTHROPIC_API_KEY", ""),
            vision_model: env_or("VISION_MODEL", DEFAULT_VISION_MODEL),
            vision_timeout_secs: env::var("VISION_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|v| *v > 0)
                .unwrap_or(DEFAULT_VISION_TIMEOUT_SECS),
            allowed_origins: env_or("ALLOWED_ORIGINS", "*"),
            ingest_port: env::var("INGEST_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_INGEST_PORT),
        }
    }

    /// Origins for the CORS allow-list. Blank entries are dropped;
    /// an empty or unset variable means allow all.
    pub fn origin_list(&self) -> Vec<String> {
        parse_origins(&self.allowed_origins)
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(|o| o.trim())
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect();
    if origins.is_empty() {
        vec!["*".to_string()]
    } else {
        origins
    }
}
