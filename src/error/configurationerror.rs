use thiserror::Error;

use crate::error::griderror::GridError;

/// Errors raised while loading a [`Configuration`](crate::configuration::Configuration) from disk.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("cannot read configuration: {0}")]
    IOError(#[from] std::io::Error),

    #[error("cannot parse configuration: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] GridError),
}
