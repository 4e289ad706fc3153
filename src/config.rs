use std::time::Duration;

use serde::Deserialize;

use crate::services::location::PositionOptions;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Directory holding the durable key-value entries.
    pub data_dir: String,

    // Position acquisition bounds
    pub position_timeout_secs: u64,
    pub position_max_age_secs: u64,

    /// Whether new reservations are shared automatically.
    pub auto_share: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        // Load .env file if it exists (for local development)
        let _ = dotenvy::dotenv();

        let config = config::Config::builder()
            .add_source(config::Environment::default().separator("__"))
            .build()?;

        Ok(Self {
            data_dir: config
                .get("data_dir")
                .unwrap_or_else(|_| "data".to_string()),
            position_timeout_secs: config.get("position_timeout_secs").unwrap_or(10),
            position_max_age_secs: config.get("position_max_age_secs").unwrap_or(300),
            auto_share: config.get("auto_share").unwrap_or(true),
        })
    }

    pub fn position_options(&self) -> PositionOptions {
        PositionOptions {
            timeout: Duration::from_secs(self.position_timeout_secs),
            maximum_age: Duration::from_secs(self.position_max_age_secs),
        }
    }
}
