use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use vidbench_core::progress::DEFAULT_MAX_STEP;

use crate::error::SessionError;

/// Default interval between simulated progress ticks.
pub const DEFAULT_UPLOAD_TICK_MS: u64 = 300;

/// Default pause between reaching 100% and the video appearing.
pub const DEFAULT_COMPLETION_DELAY_MS: u64 = 800;

/// Session configuration loaded from environment variables.
///
/// All fields have defaults matching the interactive workbench.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub upload_tick: Duration,
    pub completion_delay: Duration,
    /// Largest progress increment per tick, in percentage points.
    pub max_step: f64,
    /// Fixed RNG seed for reproducible progress; entropy when `None`.
    pub rng_seed: Option<u64>,
    /// JSON file holding the initial [`AppState`](vidbench_core::entities::AppState).
    pub seed_path: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            upload_tick: Duration::from_millis(DEFAULT_UPLOAD_TICK_MS),
            completion_delay: Duration::from_millis(DEFAULT_COMPLETION_DELAY_MS),
            max_step: DEFAULT_MAX_STEP,
            rng_seed: None,
            seed_path: None,
        }
    }
}

impl SessionConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default |
    /// |------------------------------|---------|
    /// | `UPLOAD_TICK_MS`             | `300`   |
    /// | `UPLOAD_COMPLETION_DELAY_MS` | `800`   |
    /// | `UPLOAD_MAX_STEP`            | `15`    |
    /// | `UPLOAD_RNG_SEED`            | unset   |
    /// | `SEED_PATH`                  | unset   |
    pub fn from_env() -> Result<Self, SessionError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SessionError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let tick_ms: u64 = parse_or(&lookup, "UPLOAD_TICK_MS", DEFAULT_UPLOAD_TICK_MS)?;
        if tick_ms == 0 {
            return Err(SessionError::Config {
                key: "UPLOAD_TICK_MS",
                value: tick_ms.to_string(),
                reason: "must be greater than zero".into(),
            });
        }

        let delay_ms: u64 = parse_or(
            &lookup,
            "UPLOAD_COMPLETION_DELAY_MS",
            DEFAULT_COMPLETION_DELAY_MS,
        )?;

        let max_step: f64 = parse_or(&lookup, "UPLOAD_MAX_STEP", DEFAULT_MAX_STEP)?;
        if !(max_step.is_finite() && max_step > 0.0 && max_step <= 100.0) {
            return Err(SessionError::Config {
                key: "UPLOAD_MAX_STEP",
                value: max_step.to_string(),
                reason: "must be in (0, 100]".into(),
            });
        }

        let rng_seed = match lookup("UPLOAD_RNG_SEED") {
            Some(raw) => Some(parse_value("UPLOAD_RNG_SEED", &raw)?),
            None => None,
        };

        let seed_path = lookup("SEED_PATH")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            upload_tick: Duration::from_millis(tick_ms),
            completion_delay: Duration::from_millis(delay_ms),
            max_step,
            rng_seed,
            seed_path,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, SessionError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_value<T>(key: &'static str, raw: &str) -> Result<T, SessionError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| SessionError::Config {
        key,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
