//! Application-level configuration loading, including the write-retry policy.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "STREAM_BINGO_CONFIG_PATH";

/// How often a room document is re-read and re-written after a conflict.
///
/// The default mirrors the historical behavior: one retry after a second.
/// The delay doubles on consecutive conflicts up to `max_delay`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Number of retries after the initial attempt.
    pub attempts: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Ceiling for the doubled delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 1,
            initial_delay: Duration::from_millis(1_000),
            max_delay: Duration::from_secs(10),
        }
    }
}

/// Limits applied to the per-user word-set library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordSetCaps {
    /// Maximum number of sets one user may own.
    pub max_sets_per_owner: usize,
    /// Maximum number of items inside one set.
    pub max_items_per_set: usize,
}

impl Default for WordSetCaps {
    fn default() -> Self {
        Self {
            max_sets_per_owner: 10,
            max_items_per_set: 50,
        }
    }
}

/// Immutable runtime configuration shared across the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Retry policy applied to conflicting room writes.
    pub write_retry: RetryPolicy,
    /// Limits for the word-set library.
    pub word_set_caps: WordSetCaps,
    /// Capacity of each per-room SSE broadcast channel.
    pub sse_capacity: usize,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to
    /// baked-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let config: Self = raw.into();
                    info!(path = %path.display(), "loaded configuration");
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default_values()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default_values()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default_values()
            }
        }
    }

    fn default_values() -> Self {
        Self {
            write_retry: RetryPolicy::default(),
            word_set_caps: WordSetCaps::default(),
            sse_capacity: 16,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::default_values()
    }
}

fn resolve_config_path() -> PathBuf {
    env::var(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    write_retry_attempts: Option<u32>,
    #[serde(default)]
    write_retry_delay_ms: Option<u64>,
    #[serde(default)]
    write_retry_max_delay_ms: Option<u64>,
    #[serde(default)]
    max_word_sets_per_owner: Option<usize>,
    #[serde(default)]
    max_items_per_word_set: Option<usize>,
    #[serde(default)]
    sse_capacity: Option<usize>,
}

impl From<RawConfig> for AppConfig {
    fn from(raw: RawConfig) -> Self {
        let defaults = AppConfig::default_values();
        let retry_defaults = defaults.write_retry.clone();
        let caps_defaults = defaults.word_set_caps;

        Self {
            write_retry: RetryPolicy {
                attempts: raw.write_retry_attempts.unwrap_or(retry_defaults.attempts),
                initial_delay: raw
                    .write_retry_delay_ms
                    .map(Duration::from_millis)
                    .unwrap_or(retry_defaults.initial_delay),
                max_delay: raw
                    .write_retry_max_delay_ms
                    .map(Duration::from_millis)
                    .unwrap_or(retry_defaults.max_delay),
            },
            word_set_caps: WordSetCaps {
                max_sets_per_owner: raw
                    .max_word_sets_per_owner
                    .unwrap_or(caps_defaults.max_sets_per_owner),
                max_items_per_set: raw
                    .max_items_per_word_set
                    .unwrap_or(caps_defaults.max_items_per_set),
            },
            sse_capacity: raw.sse_capacity.unwrap_or(defaults.sse_capacity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_config_overrides_only_what_it_names() {
        let raw: RawConfig = serde_json::from_str(r#"{"write_retry_attempts": 3}"#).unwrap();
        let config: AppConfig = raw.into();
        assert_eq!(config.write_retry.attempts, 3);
        assert_eq!(
            config.write_retry.initial_delay,
            Duration::from_millis(1_000)
        );
        assert_eq!(config.word_set_caps.max_sets_per_owner, 10);
        assert_eq!(config.word_set_caps.max_items_per_set, 50);
    }
}
