//! Build [`TrainConfig`] from environment variables.
//!
//! Key names live in the config `constants` submodule; every key is read through
//! [`env_string`] or [`env_parsed`] so failures carry the full key and raw value.

use super::constants::{
    ENV_ACTIVATION, ENV_EPOCHS, ENV_INPUT_SIZE, ENV_LAYER_SIZES, ENV_LEARNING_RATE,
    ENV_LOG_EVERY, ENV_PREFIX, ENV_SEED,
};
use super::ConfigError;
use super::TrainConfig;
use crate::nn::Activation;

/// Returns the full environment variable key for a suffix (e.g. `SEED` → `NODEGRAD_SEED`).
#[must_use]
pub fn env_key(suffix: &str) -> String {
    format!("{ENV_PREFIX}{suffix}")
}

/// Reads an environment variable as a string.
///
/// Returns `Some(value)` if set, `None` if unset, and [`ConfigError::EnvVar`] if the
/// variable is set but not valid Unicode.
pub fn env_string(key: &str) -> Result<Option<String>, ConfigError> {
    match std::env::var(key) {
        Ok(s) => Ok(Some(s)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(ConfigError::EnvVar {
            key: key.to_string(),
            message: e.to_string(),
        }),
    }
}

/// Reads an environment variable and parses it into `T`.
///
/// Returns `Ok(None)` if unset and [`ConfigError::Parse`] if set but unparsable.
pub fn env_parsed<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Some(s) = env_string(key)? else {
        return Ok(None);
    };
    match s.trim().parse() {
        Ok(t) => Ok(Some(t)),
        Err(e) => Err(ConfigError::Parse {
            key: key.to_string(),
            value: s,
            message: e.to_string(),
        }),
    }
}

/// Parses a comma-separated list of layer widths, e.g. `"4, 4, 1"`.
pub fn parse_layer_sizes(key: &str, raw: &str) -> Result<Vec<usize>, ConfigError> {
    raw.split(',')
        .map(|part| {
            part.trim().parse::<usize>().map_err(|e| ConfigError::Parse {
                key: key.to_string(),
                value: raw.to_string(),
                message: format!("layer size {:?}: {e}", part.trim()),
            })
        })
        .collect()
}

/// Builds [`TrainConfig`] from environment variables, falling back to
/// [`TrainConfig::default`] for unset values.
///
/// Does not validate; call [`TrainConfig::validate`] on the result.
pub fn from_env() -> Result<TrainConfig, ConfigError> {
    let default = TrainConfig::default();

    let seed = env_parsed::<u64>(&env_key(ENV_SEED))?.unwrap_or(default.seed);
    let learning_rate =
        env_parsed::<f64>(&env_key(ENV_LEARNING_RATE))?.unwrap_or(default.learning_rate);
    let epochs = env_parsed::<usize>(&env_key(ENV_EPOCHS))?.unwrap_or(default.epochs);
    let input_size =
        env_parsed::<usize>(&env_key(ENV_INPUT_SIZE))?.unwrap_or(default.input_size);
    let layer_sizes_key = env_key(ENV_LAYER_SIZES);
    let layer_sizes = match env_string(&layer_sizes_key)? {
        Some(raw) => parse_layer_sizes(&layer_sizes_key, &raw)?,
        None => default.layer_sizes,
    };
    let activation =
        env_parsed::<Activation>(&env_key(ENV_ACTIVATION))?.unwrap_or(default.activation);
    let log_every = env_parsed::<usize>(&env_key(ENV_LOG_EVERY))?.unwrap_or(default.log_every);

    Ok(TrainConfig {
        seed,
        learning_rate,
        epochs,
        input_size,
        layer_sizes,
        activation,
        log_every,
    })
}
