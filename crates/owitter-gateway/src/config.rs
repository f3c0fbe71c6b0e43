//! Gateway configuration loaded from environment variables.
//!
//! All settings have sensible defaults so the client can start with zero
//! configuration against a local backend.

use owitter_shared::constants::DEFAULT_API_URL;

/// Connection settings for the hosted backend.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the backend's REST surface.
    /// Env: `OWITTER_API_URL`
    /// Default: `http://127.0.0.1:8080`
    pub api_url: String,

    /// Project identifier sent with every request.
    /// Env: `OWITTER_PROJECT_ID`
    /// Default: `"owitter-dev"`
    pub project_id: String,

    /// API key sent as a bearer token. Optional for local development.
    /// Env: `OWITTER_API_KEY`
    /// Default: none.
    pub api_key: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            project_id: "owitter-dev".to_string(),
            api_key: None,
        }
    }
}

impl GatewayConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("OWITTER_API_URL") {
            if url.starts_with("http://") || url.starts_with("https://") {
                config.api_url = url.trim_end_matches('/').to_string();
            } else {
                tracing::warn!(value = %url, "Invalid OWITTER_API_URL, using default");
            }
        }

        if let Ok(id) = std::env::var("OWITTER_PROJECT_ID") {
            if !id.is_empty() {
                config.project_id = id;
            }
        }

        if let Ok(key) = std::env::var("OWITTER_API_KEY") {
            if !key.is_empty() {
                config.api_key = Some(key);
            }
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter,
        // so we do not store it here.

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GatewayConfig::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.api_key, None);
    }
}
