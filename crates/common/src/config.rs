use serde::Deserialize;

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Feed URL to poll
    pub rss_url: String,

    /// Webhook URL for the AI-related channel (unset = skip that channel)
    pub discord_ai_webhook: Option<String>,

    /// Webhook URL for the everything-else channel (unset = skip)
    pub discord_other_webhook: Option<String>,

    /// Path of the processed-id cache file
    pub cache_file: String,

    /// Path the feed stage writes new articles to
    pub new_articles_file: String,

    /// Path the analyzer writes (and the notifier reads) classified articles from
    pub analyzed_articles_file: String,

    /// Raw classifier output, provided by the CI job that ran the model
    pub gemini_json: Option<String>,

    /// Delivery tunables, threaded explicitly into the router
    pub delivery: DeliveryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            rss_url: std::env::var("RSS_URL")
                .unwrap_or_else(|_| "https://zenn.dev/feed".to_string()),
            discord_ai_webhook: std::env::var("DISCORD_AI_WEBHOOK").ok(),
            discord_other_webhook: std::env::var("DISCORD_OTHER_WEBHOOK").ok(),
            cache_file: std::env::var("CACHE_FILE")
                .unwrap_or_else(|_| "cache/rss-processed.json".to_string()),
            new_articles_file: std::env::var("NEW_ARTICLES_FILE")
                .unwrap_or_else(|_| "new-articles.json".to_string()),
            analyzed_articles_file: std::env::var("ANALYZED_ARTICLES_FILE")
                .unwrap_or_else(|_| "analyzed-articles.json".to_string()),
            gemini_json: std::env::var("GEMINI_JSON").ok(),
            delivery: DeliveryConfig::default(),
        })
    }
}

/// Tunables for the notification delivery subsystem.
///
/// Defaults are the production constants; tests construct the struct
/// directly with smaller values instead of mutating the environment.
#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryConfig {
    /// Username field of the webhook payload
    pub username: String,

    /// Hard limit on message content length, in characters (Discord: 2000)
    pub max_content_length: usize,

    /// Fixed gap between successive sends to one destination, in milliseconds
    pub pacing_ms: u64,

    /// Maximum number of retries after a rate-limit signal
    pub max_retries: u32,

    /// Multiplier applied to the rate-limit hint per attempt
    pub backoff_factor: f64,

    /// Ceiling on any single backoff wait, in milliseconds
    pub backoff_cap_ms: u64,

    /// Wait used when the rate-limit hint is absent or non-positive, in milliseconds
    pub retry_after_fallback_ms: u64,

    /// Hint values below this are interpreted as seconds, not milliseconds
    pub retry_after_seconds_threshold: f64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            username: "Zenn RSS Monitor".to_string(),
            max_content_length: 2000,
            pacing_ms: 400,
            max_retries: 5,
            backoff_factor: 1.6,
            backoff_cap_ms: 10_000,
            retry_after_fallback_ms: 1500,
            retry_after_seconds_threshold: 50.0,
        }
    }
}
