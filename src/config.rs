use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::pagination::NextPolicy;

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    Config {
        search_api_url: get_env_or_default("SEARCH_API_URL", DEFAULT_SEARCH_API_URL),
        timeout_secs: get_env_parsed_or("SEARCH_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS),
        guard_next_by_total: get_env_parsed_or("GUARD_NEXT_BY_TOTAL", false),
    }
});

const DEFAULT_SEARCH_API_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the external search endpoint, without the `/search` path.
    pub search_api_url: String,
    pub timeout_secs: u64,
    /// Disable "next" once the current page reaches the backend's total.
    pub guard_next_by_total: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_api_url: DEFAULT_SEARCH_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            guard_next_by_total: false,
        }
    }
}

impl Config {
    pub fn with_search_api_url(mut self, url: impl Into<String>) -> Self {
        self.search_api_url = url.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_guard_next_by_total(mut self, guard: bool) -> Self {
        self.guard_next_by_total = guard;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn next_policy(&self) -> NextPolicy {
        if self.guard_next_by_total {
            NextPolicy::GuardByTotal
        } else {
            NextPolicy::Always
        }
    }
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn get_env_parsed_or<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Debug,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("ignoring invalid {key}={raw:?}, using default {default:?}");
            default
        }),
        Err(_) => default,
    }
}

#[test]
fn test_next_policy_follows_guard_flag() {
    assert_eq!(Config::default().next_policy(), NextPolicy::Always);
    assert_eq!(
        Config::default().with_guard_next_by_total(true).next_policy(),
        NextPolicy::GuardByTotal
    );
}

#[test]
fn test_get_env_parsed_or_falls_back_when_unset() {
    let value: u64 = get_env_parsed_or("SCOUT_TEST_SURELY_UNSET_VARIABLE", 7);
    assert_eq!(value, 7);
}
