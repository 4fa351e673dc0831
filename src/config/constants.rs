//! Default values and environment variable key names used by the config builder.

/// Environment variable prefix (e.g. `NODEGRAD_LEARNING_RATE`).
pub(crate) const ENV_PREFIX: &str = "NODEGRAD_";

// --- Env key suffixes (full key = ENV_PREFIX + suffix) ---

pub(crate) const ENV_SEED: &str = "SEED";
pub(crate) const ENV_LEARNING_RATE: &str = "LEARNING_RATE";
pub(crate) const ENV_EPOCHS: &str = "EPOCHS";
pub(crate) const ENV_INPUT_SIZE: &str = "INPUT_SIZE";
pub(crate) const ENV_LAYER_SIZES: &str = "LAYER_SIZES";
pub(crate) const ENV_ACTIVATION: &str = "ACTIVATION";
pub(crate) const ENV_LOG_EVERY: &str = "LOG_EVERY";

// --- Default values ---

pub(crate) const DEFAULT_SEED: u64 = 42;
pub(crate) const DEFAULT_LEARNING_RATE: f64 = 0.1;
pub(crate) const DEFAULT_EPOCHS: usize = 20;
pub(crate) const DEFAULT_INPUT_SIZE: usize = 3;
pub(crate) const DEFAULT_LAYER_SIZES: [usize; 3] = [4, 4, 1];
pub(crate) const DEFAULT_LOG_EVERY: usize = 1;
