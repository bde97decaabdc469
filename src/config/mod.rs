// src/config/mod.rs
// All tunables come from the environment (.env supported); defaults are safe
// for a fresh checkout.

use once_cell::sync::Lazy;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CoachConfig {
    // ── Decision service
    pub endpoint: String,
    pub request_timeout: u64,

    // ── Share links
    pub share_base_url: String,

    // ── History
    pub history_enabled: bool,
    pub history_cap: usize,
    pub history_db: PathBuf,

    // ── Logging
    pub log_level: String,
}

// Values may carry inline comments when sourced from a .env file.
fn env_var_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(val) => {
            let clean_val = val.split('#').next().unwrap_or("").trim();
            match clean_val.parse::<T>() {
                Ok(parsed) => parsed,
                Err(_) => {
                    eprintln!("Config: {} = '{}' (parse failed, using default)", key, val);
                    default
                }
            }
        }
        Err(_) => default,
    }
}

fn default_history_db() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("coach").join("history.db"))
        .unwrap_or_else(|| PathBuf::from("./coach-history.db"))
}

impl CoachConfig {
    pub fn from_env() -> Self {
        // Load from .env file first if it exists; plain env vars win anyway.
        let _ = dotenvy::dotenv();

        Self {
            endpoint: env_var_or(
                "COACH_ENDPOINT",
                "https://decision-coach-api.onrender.com/api/decide".to_string(),
            ),
            request_timeout: env_var_or("COACH_TIMEOUT", 60),
            share_base_url: env_var_or(
                "COACH_SHARE_BASE_URL",
                "https://decision-coach-api.onrender.com/".to_string(),
            ),
            history_enabled: env_var_or("COACH_HISTORY_ENABLED", true),
            history_cap: env_var_or("COACH_HISTORY_CAP", 20),
            history_db: env_var_or("COACH_HISTORY_DB", default_history_db()),
            log_level: env_var_or("COACH_LOG_LEVEL", "info".to_string()),
        }
    }

    /// Request timeout as a Duration for the HTTP client builder.
    pub fn request_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn is_debug(&self) -> bool {
        self.log_level.to_lowercase() == "debug"
    }
}

// Global config instance - loaded once at startup
pub static CONFIG: Lazy<CoachConfig> = Lazy::new(CoachConfig::from_env);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = CoachConfig::from_env();

        assert!(config.endpoint.starts_with("https://"));
        assert!(config.history_cap > 0);
        assert_eq!(config.request_timeout_duration().as_secs(), config.request_timeout);
    }

    #[test]
    fn test_env_var_or_strips_inline_comments() {
        std::env::set_var("COACH_TEST_CAP", "12 # keep small");
        let parsed: usize = env_var_or("COACH_TEST_CAP", 99);
        assert_eq!(parsed, 12);
        std::env::remove_var("COACH_TEST_CAP");
    }
}
