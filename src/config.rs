use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL for the REST notification API, e.g. `http://localhost:8000/api/v1`
    pub api_base_url: String,
    /// Base URL for the WebSocket endpoint, e.g. `ws://localhost:8000`
    pub ws_base_url: String,
    /// Page size for list fetches and stream sync requests (default: 50)
    pub page_limit: u32,
    /// Keep-alive ping period in seconds (default: 30)
    pub heartbeat_interval_secs: u64,
    /// Delay before a single reconnection attempt in milliseconds (default: 3000)
    pub reconnect_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: "http://localhost:8000/api/v1".to_string(),
            ws_base_url: "ws://localhost:8000".to_string(),
            page_limit: 50,
            heartbeat_interval_secs: 30,
            reconnect_delay_ms: 3000,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Config {
            api_base_url: std::env::var("NOTIFICATIONS_API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8000/api/v1".to_string()),
            ws_base_url: std::env::var("NOTIFICATIONS_WS_BASE_URL")
                .unwrap_or_else(|_| "ws://localhost:8000".to_string()),
            page_limit: std::env::var("NOTIFICATIONS_PAGE_LIMIT")
                .unwrap_or_else(|_| "50".to_string())
                .parse()?,
            heartbeat_interval_secs: std::env::var("NOTIFICATIONS_HEARTBEAT_INTERVAL_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()?,
            reconnect_delay_ms: std::env::var("NOTIFICATIONS_RECONNECT_DELAY_MS")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,
        })
    }
}
