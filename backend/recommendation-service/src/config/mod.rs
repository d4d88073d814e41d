use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app_env: String,

    // HTTP server config
    pub http_host: String,
    pub http_port: u16,

    // PostgreSQL (hotels, bookings, user_mapping)
    pub database_url: String,
    pub database_max_connections: u32,

    // Persisted factor model artifact (.json or .bin)
    pub factor_model_path: String,

    // Recommendation defaults
    pub default_content_count: usize,
    pub default_factor_count: usize,
    pub max_recommendation_count: usize,
    pub rebuild_on_startup: bool,

    // Comma separated list, "*" allows any origin
    pub cors_allowed_origins: String,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .set_default("app_env", "development")?
            .set_default("http_host", "0.0.0.0")?
            .set_default("http_port", 8000)?
            .set_default("database_url", "")?
            .set_default("database_max_connections", 10)?
            .set_default("factor_model_path", "./models/factor_model.json")?
            .set_default("default_content_count", 6)?
            .set_default("default_factor_count", 5)?
            .set_default("max_recommendation_count", 100)?
            .set_default("rebuild_on_startup", true)?
            .set_default("cors_allowed_origins", "http://localhost:5173")?
            .add_source(config::Environment::default().separator("__"))
            .build()?;

        config.try_deserialize()
    }

    pub fn validate(&self) -> Result<()> {
        if self.http_port == 0 {
            return Err(anyhow!("HTTP port must be greater than 0"));
        }

        if self.database_url.is_empty() {
            return Err(anyhow!("Database URL is required"));
        }

        if self.database_max_connections == 0 {
            return Err(anyhow!("Database max connections must be greater than 0"));
        }

        if self.factor_model_path.is_empty() {
            return Err(anyhow!("Factor model path is required"));
        }

        if self.max_recommendation_count == 0 || self.max_recommendation_count > 1000 {
            return Err(anyhow!(
                "Max recommendation count must be between 1 and 1000"
            ));
        }

        if self.default_content_count > self.max_recommendation_count
            || self.default_factor_count > self.max_recommendation_count
        {
            return Err(anyhow!(
                "Default recommendation counts must not exceed max_recommendation_count"
            ));
        }

        Ok(())
    }

    /// Allowed CORS origins, trimmed, empty entries removed
    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }
}
