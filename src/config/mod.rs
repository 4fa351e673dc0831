//! Configuration for the training demo.
//!
//! Load from environment via [`from_env`] and validate with [`TrainConfig::validate`].
//! Default values and env key names are centralized in the `constants` submodule.

mod builder;
mod constants;
mod error;

use constants::{
    DEFAULT_EPOCHS, DEFAULT_INPUT_SIZE, DEFAULT_LAYER_SIZES, DEFAULT_LEARNING_RATE,
    DEFAULT_LOG_EVERY, DEFAULT_SEED,
};

pub use builder::{env_key, env_parsed, env_string, from_env, parse_layer_sizes};
pub use error::ConfigError;

use crate::nn::Activation;

/// Model shape and optimisation settings for [`crate::train::run`].
#[derive(Clone, Debug, PartialEq)]
pub struct TrainConfig {
    /// Seed for parameter initialisation.
    pub seed: u64,
    /// Gradient descent step size.
    pub learning_rate: f64,
    /// Number of full passes over the dataset.
    pub epochs: usize,
    /// Number of input features.
    pub input_size: usize,
    /// Width of each layer; the last entry is the output width.
    pub layer_sizes: Vec<usize>,
    /// Activation applied after every layer.
    pub activation: Activation,
    /// Log the loss every this many epochs (and on the last one).
    pub log_every: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            learning_rate: DEFAULT_LEARNING_RATE,
            epochs: DEFAULT_EPOCHS,
            input_size: DEFAULT_INPUT_SIZE,
            layer_sizes: DEFAULT_LAYER_SIZES.to_vec(),
            activation: Activation::default(),
            log_every: DEFAULT_LOG_EVERY,
        }
    }
}

impl TrainConfig {
    /// Validates configuration. Returns `Ok(())` if valid, or a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "learning_rate must be finite and positive, got {}",
                self.learning_rate
            )));
        }
        if self.epochs == 0 {
            return Err(ConfigError::Validation(
                "epochs must be greater than 0".to_string(),
            ));
        }
        if self.input_size == 0 {
            return Err(ConfigError::Validation(
                "input_size must be greater than 0".to_string(),
            ));
        }
        if self.layer_sizes.is_empty() {
            return Err(ConfigError::Validation(
                "layer_sizes must name at least one layer".to_string(),
            ));
        }
        if let Some(i) = self.layer_sizes.iter().position(|&n| n == 0) {
            return Err(ConfigError::Validation(format!(
                "layer_sizes[{i}] must be greater than 0"
            )));
        }
        if self.log_every == 0 {
            return Err(ConfigError::Validation(
                "log_every must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Width of the final layer.
    #[must_use]
    pub fn output_size(&self) -> usize {
        self.layer_sizes.last().copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::constants::{ENV_ACTIVATION, ENV_EPOCHS, ENV_LAYER_SIZES, ENV_LEARNING_RATE};
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = TrainConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.layer_sizes, vec![4, 4, 1]);
        assert_eq!(cfg.output_size(), 1);
    }

    #[test]
    fn validate_rejects_bad_learning_rate() {
        for lr in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            let cfg = TrainConfig {
                learning_rate: lr,
                ..TrainConfig::default()
            };
            assert!(cfg.validate().is_err(), "lr {lr} accepted");
        }
    }

    #[test]
    fn validate_rejects_zero_epochs() {
        let cfg = TrainConfig {
            epochs: 0,
            ..TrainConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_or_zero_layers() {
        let empty = TrainConfig {
            layer_sizes: vec![],
            ..TrainConfig::default()
        };
        assert!(empty.validate().is_err());
        let zero = TrainConfig {
            layer_sizes: vec![4, 0, 1],
            ..TrainConfig::default()
        };
        let err = zero.validate().unwrap_err();
        assert!(err.message().contains("layer_sizes[1]"));
    }

    #[test]
    fn validate_rejects_zero_log_every_and_input_size() {
        let cfg = TrainConfig {
            log_every: 0,
            ..TrainConfig::default()
        };
        assert!(cfg.validate().is_err());
        let cfg = TrainConfig {
            input_size: 0,
            ..TrainConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn parse_layer_sizes_accepts_spaces() {
        assert_eq!(parse_layer_sizes("K", "8, 4,1").unwrap(), vec![8, 4, 1]);
        assert!(matches!(
            parse_layer_sizes("K", "8,x"),
            Err(ConfigError::Parse { .. })
        ));
    }

    /// Lock so env tests don't run in parallel and pollute each other.
    static CONFIG_ENV_LOCK: std::sync::OnceLock<std::sync::Mutex<()>> = std::sync::OnceLock::new();

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        CONFIG_ENV_LOCK
            .get_or_init(|| std::sync::Mutex::new(()))
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    #[test]
    fn from_env_falls_back_to_defaults() {
        let _g = env_lock();
        std::env::remove_var(env_key(ENV_EPOCHS));
        std::env::remove_var(env_key(ENV_LAYER_SIZES));
        std::env::remove_var(env_key(ENV_LEARNING_RATE));
        std::env::remove_var(env_key(ENV_ACTIVATION));
        let cfg = from_env().unwrap();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.epochs, TrainConfig::default().epochs);
    }

    #[test]
    fn from_env_overrides_with_env_vars() {
        let _g = env_lock();
        let epochs = env_key(ENV_EPOCHS);
        let layers = env_key(ENV_LAYER_SIZES);
        let activation = env_key(ENV_ACTIVATION);
        std::env::set_var(&epochs, "5");
        std::env::set_var(&layers, "8,2");
        std::env::set_var(&activation, "relu");
        let cfg = from_env();
        std::env::remove_var(&epochs);
        std::env::remove_var(&layers);
        std::env::remove_var(&activation);
        let cfg = cfg.unwrap();
        assert_eq!(cfg.epochs, 5);
        assert_eq!(cfg.layer_sizes, vec![8, 2]);
        assert_eq!(cfg.activation, Activation::Relu);
    }

    #[test]
    fn from_env_returns_error_on_invalid_parse() {
        let _g = env_lock();
        let key = env_key(ENV_LEARNING_RATE);
        std::env::set_var(&key, "fast");
        let res = from_env();
        std::env::remove_var(&key);
        assert!(matches!(res, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn from_env_rejects_unknown_activation() {
        let _g = env_lock();
        let key = env_key(ENV_ACTIVATION);
        std::env::set_var(&key, "sigmoid");
        let res = from_env();
        std::env::remove_var(&key);
        let err = res.unwrap_err();
        assert!(err.to_string().contains("NODEGRAD_ACTIVATION"));
        assert!(err.message().contains("unknown activation"));
    }

    #[test]
    fn config_error_display() {
        let e = ConfigError::Validation("epochs must be greater than 0".to_string());
        assert!(e.to_string().contains("config validation"));
        assert_eq!(e.message(), "epochs must be greater than 0");

        let e = ConfigError::Parse {
            key: "NODEGRAD_SEED".to_string(),
            value: "abc".to_string(),
            message: "invalid digit".to_string(),
        };
        assert!(e.to_string().contains("NODEGRAD_SEED"));
        assert!(e.to_string().contains("abc"));
    }

    #[test]
    fn env_parsed_unset_returns_none() {
        assert_eq!(env_parsed::<u64>("NODEGRAD_UNLIKELY_KEY_67890").unwrap(), None);
        assert_eq!(env_string("NODEGRAD_UNLIKELY_KEY_12345").unwrap(), None);
    }
}
