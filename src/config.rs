use std::env;

use tracing::info;

pub const DEFAULT_BASE_URL: &str = "https://www.finnkino.fi/xml";
pub const BASE_URL_ENV: &str = "FEED_BASE_URL";

// Feed client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct FeedConfig {
    pub base_url: String,
    pub user_agent: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: format!("showtime-search/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl FeedConfig {
    // Base URL from the environment, falling back to the public feed
    pub fn from_env() -> Self {
        let base_url = match env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => url,
            _ => {
                info!("{BASE_URL_ENV} not set, using default: {DEFAULT_BASE_URL}");
                DEFAULT_BASE_URL.to_string()
            }
        };
        Self::default().with_base_url(base_url)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    // Joins an endpoint path onto the base URL
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}
