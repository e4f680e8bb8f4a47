//! Error types for the shared plumbing

use thiserror::Error;

/// Result type alias using the shared Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from configuration handling
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Config encode error: {0}")]
    TomlEncode(#[from] toml::ser::Error),
}
