//! Flexion reserve utilities
//!
//! Ambient helpers shared by the flexion reserve crates: loading and merging
//! configuration files (TOML, JSON, YAML) and initialising `tracing` output.

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod config;
pub mod logging;

pub use config::{load_config, merge_configs, ConfigBuilder, ConfigFormat};
pub use logging::{basic_config, init_logging, LogLevel, LoggerConfig};

/// Result type used throughout the utilities
pub type Result<T> = std::result::Result<T, UtilError>;

/// Error types for utility operations
#[derive(Debug, thiserror::Error)]
pub enum UtilError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}
