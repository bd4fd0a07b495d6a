//! Configuration for the routing endpoint, request pacing and the solver.

use std::env;
use std::time::Duration;

/// Default endpoint for route matrix requests.
pub const DEFAULT_ROUTES_BASE_URL: &str = "https://routes.googleapis.com";

/// Default user agent for routing requests.
pub const DEFAULT_USER_AGENT: &str = "itinerary-optimizer/0.1";

/// Environment variable holding the routing API key.
pub const API_KEY_ENV: &str = "ROUTES_API_KEY";

/// Environment variable overriding the routing base URL.
pub const BASE_URL_ENV: &str = "ROUTES_API_BASE_URL";

#[derive(Debug, Clone)]
pub struct RoutesApiConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for RoutesApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ROUTES_BASE_URL.to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl RoutesApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Read the API key (and optionally the base URL) from the environment.
    ///
    /// Returns `None` when no key is set.
    pub fn from_env() -> Option<Self> {
        let api_key = env::var(API_KEY_ENV).ok().filter(|key| !key.is_empty())?;
        let mut config = Self::new(api_key);
        if let Ok(base_url) = env::var(BASE_URL_ENV) {
            if !base_url.is_empty() {
                config.base_url = base_url;
            }
        }
        Some(config)
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Pacing for one external API family: at most `capacity` calls start
/// within any `window`.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Name used in logs and errors, e.g. `"routes"`.
    pub family: String,
    pub capacity: usize,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            family: "routes".to_string(),
            capacity: 5,
            window: Duration::from_secs(1),
        }
    }
}

impl RateLimitConfig {
    pub fn new(family: impl Into<String>, capacity: usize, window: Duration) -> Self {
        Self {
            family: family.into(),
            capacity,
            window,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SolveOptions {
    /// Largest activity count (spots plus others) still searched exhaustively.
    pub permutation_threshold: usize,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            permutation_threshold: 7,
        }
    }
}
