use crate::error::{env_error, ClientResult};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Backend origin used when nothing else is configured
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3000";

/// Where the backend sends the browser after the provider login
pub const DEFAULT_CALLBACK_ADDR: &str = "127.0.0.1:5173";

/// Wait before re-checking the session after a successful login redirect
pub const DEFAULT_PROPAGATION_DELAY_MS: u64 = 1000;

/// Default window for the upcoming events listing
pub const DEFAULT_UPCOMING_DAYS: u32 = 30;

/// Optional overrides read from the config file
const CONFIG_FILE: &str = "config/client.toml";

/// Main configuration structure for the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend origin (scheme, host and port)
    pub backend_url: String,
    /// Session cookie (`name=value`) to seed the cookie jar with
    pub session_cookie: Option<String>,
    /// Address of the local landing listener for login redirects
    pub callback_addr: String,
    /// Delay before the session is re-checked after a login redirect
    pub propagation_delay_ms: u64,
    /// Default number of days for upcoming events
    pub upcoming_days: u32,
}

/// Subset of the configuration that may be set from the config file
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    backend_url: Option<String>,
    session_cookie: Option<String>,
    callback_addr: Option<String>,
    propagation_delay_ms: Option<u64>,
    upcoming_days: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            session_cookie: None,
            callback_addr: DEFAULT_CALLBACK_ADDR.to_string(),
            propagation_delay_ms: DEFAULT_PROPAGATION_DELAY_MS,
            upcoming_days: DEFAULT_UPCOMING_DAYS,
        }
    }
}

impl Config {
    /// Configuration pointing at the given backend, everything else default
    pub fn with_backend(backend_url: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into(),
            ..Self::default()
        }
    }

    /// Load configuration from the config file and environment.
    /// Environment variables win over the file.
    pub fn load() -> ClientResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let mut config = Self::default();

        if Path::new(CONFIG_FILE).exists() {
            let content = fs::read_to_string(CONFIG_FILE)?;
            config.merge_file(&content)?;
        }

        if let Ok(url) = env::var("BACKEND_URL") {
            config.backend_url = url;
        }
        if let Ok(cookie) = env::var("SESSION_COOKIE") {
            config.session_cookie = Some(cookie);
        }
        if let Ok(addr) = env::var("CALLBACK_ADDR") {
            config.callback_addr = addr;
        }
        if let Ok(delay) = env::var("SESSION_PROPAGATION_DELAY_MS") {
            config.propagation_delay_ms = delay
                .parse::<u64>()
                .map_err(|_| env_error("SESSION_PROPAGATION_DELAY_MS"))?;
        }
        if let Ok(days) = env::var("UPCOMING_DAYS") {
            config.upcoming_days = days.parse::<u32>().map_err(|_| env_error("UPCOMING_DAYS"))?;
        }

        Ok(config)
    }

    /// Apply overrides from a TOML document
    fn merge_file(&mut self, content: &str) -> ClientResult<()> {
        let file: FileConfig = toml::from_str(content)?;

        if let Some(url) = file.backend_url {
            self.backend_url = url;
        }
        if file.session_cookie.is_some() {
            self.session_cookie = file.session_cookie;
        }
        if let Some(addr) = file.callback_addr {
            self.callback_addr = addr;
        }
        if let Some(delay) = file.propagation_delay_ms {
            self.propagation_delay_ms = delay;
        }
        if let Some(days) = file.upcoming_days {
            self.upcoming_days = days;
        }

        Ok(())
    }
}
