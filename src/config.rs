use crate::error::{ItineraryError, Result};
use std::env;
use std::time::Duration;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const GEMINI_MODEL: &str = "gemini-1.5-flash";
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const GENERATION_TIMEOUT_SECS: u64 = 60;
const MAX_GENERATION_TIMEOUT_SECS: u64 = 600;

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// Zero disables the caller-side deadline.
    pub timeout_secs: u64,
}

impl GeminiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        if self.timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.timeout_secs))
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub gemini: GeminiConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let host = env::var("HOST").unwrap_or_else(|_| HOST.to_string());
        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| PORT.to_string())
            .parse()
            .unwrap_or(PORT);

        let api_key = env::var("GOOGLE_GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                ItineraryError::Configuration("GOOGLE_GEMINI_API_KEY not set".to_string())
            })?;

        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| GEMINI_MODEL.to_string());
        let base_url =
            env::var("GEMINI_BASE_URL").unwrap_or_else(|_| GEMINI_BASE_URL.to_string());
        let timeout_secs = match env::var("GENERATION_TIMEOUT_SECS") {
            Ok(raw) => raw.trim().parse().map_err(|_| {
                ItineraryError::Configuration(format!(
                    "GENERATION_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                    raw
                ))
            })?,
            Err(_) => GENERATION_TIMEOUT_SECS,
        };

        let config = Self {
            host,
            port,
            gemini: GeminiConfig {
                api_key,
                model,
                base_url: base_url.trim_end_matches('/').to_string(),
                timeout_secs,
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.gemini.model.trim().is_empty() {
            return Err(ItineraryError::Configuration(
                "GEMINI_MODEL cannot be empty".to_string(),
            ));
        }

        if !self.gemini.base_url.starts_with("http://")
            && !self.gemini.base_url.starts_with("https://")
        {
            return Err(ItineraryError::Configuration(
                "GEMINI_BASE_URL must be a valid HTTP or HTTPS URL".to_string(),
            ));
        }

        if self.gemini.timeout_secs > MAX_GENERATION_TIMEOUT_SECS {
            return Err(ItineraryError::Configuration(format!(
                "GENERATION_TIMEOUT_SECS cannot exceed {} seconds",
                MAX_GENERATION_TIMEOUT_SECS
            )));
        }

        Ok(())
    }
}
