//! Application-level configuration loading, including gameplay limits.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "SJOELEN_BACK_CONFIG_PATH";

/// Largest roster a single game accepts.
const DEFAULT_MAX_PLAYERS: usize = 8;
/// Discs handed to a player for one round.
const DEFAULT_DISC_BUDGET: u32 = 30;
/// Broadcast channel capacity per game event stream.
const DEFAULT_SSE_CAPACITY: usize = 16;

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    max_players: usize,
    disc_budget: u32,
    sse_capacity: usize,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to baked-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(path = %path.display(), "loaded configuration");
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Largest roster a single game accepts.
    pub fn max_players(&self) -> usize {
        self.max_players
    }

    /// Number of discs a player throws per round; submissions exceeding it are rejected.
    pub fn disc_budget(&self) -> u32 {
        self.disc_budget
    }

    /// Capacity of each per-game event broadcast channel.
    pub fn sse_capacity(&self) -> usize {
        self.sse_capacity
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_players: DEFAULT_MAX_PLAYERS,
            disc_budget: DEFAULT_DISC_BUDGET,
            sse_capacity: DEFAULT_SSE_CAPACITY,
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    max_players: Option<usize>,
    disc_budget: Option<u32>,
    sse_capacity: Option<usize>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        Self {
            max_players: value.max_players.unwrap_or(DEFAULT_MAX_PLAYERS),
            disc_budget: value.disc_budget.unwrap_or(DEFAULT_DISC_BUDGET),
            sse_capacity: value.sse_capacity.unwrap_or(DEFAULT_SSE_CAPACITY),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let raw: RawConfig = serde_json::from_str(r#"{"disc_budget": 20}"#).unwrap();
        let config: AppConfig = raw.into();
        assert_eq!(config.disc_budget(), 20);
        assert_eq!(config.max_players(), DEFAULT_MAX_PLAYERS);
        assert_eq!(config.sse_capacity(), DEFAULT_SSE_CAPACITY);
    }
}
