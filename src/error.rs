//! Error types for the coordination core
//!
//! Centralized error handling using snafu for ergonomic error definitions.
//! Failures of external collaborators (model parsing, missing geometry)
//! are wrapped into `LoadFailed` events by the load coordinator; the
//! variants here surface programming errors and edge-layer IO.

use snafu::Snafu;

/// Main error type for the coordination core
#[derive(Debug, Snafu)]
pub enum Error {
    /// Invalid input or configuration
    #[snafu(display("Invalid: {message}"))]
    Invalid { message: String },

    /// Resource load failure reported by a `ModelLoader` implementation
    #[snafu(display("Load error: {message}"))]
    Load { message: String },

    /// Subscriber handler failure (caught and logged by the bus)
    #[snafu(display("Subscriber error: {message}"))]
    Subscriber { message: String },

    /// IO error (config files, etc.)
    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },

    /// JSON serialization/deserialization error
    #[snafu(display("JSON error: {source}"))]
    Json { source: serde_json::Error },

    /// TOML deserialization error
    #[snafu(display("TOML parse error: {source}"))]
    TomlDe { source: toml::de::Error },

    /// TOML serialization error
    #[snafu(display("TOML serialize error: {source}"))]
    TomlSe { source: toml::ser::Error },
}

impl Error {
    /// Create an `Invalid` error from a message
    pub fn invalid(message: impl Into<String>) -> Self {
        Error::Invalid {
            message: message.into(),
        }
    }

    /// Create a `Load` error from a message
    pub fn load(message: impl Into<String>) -> Self {
        Error::Load {
            message: message.into(),
        }
    }

    /// Create a `Subscriber` error from a message
    pub fn subscriber(message: impl Into<String>) -> Self {
        Error::Subscriber {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io { source }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Error::Json { source }
    }
}

impl From<toml::de::Error> for Error {
    fn from(source: toml::de::Error) -> Self {
        Error::TomlDe { source }
    }
}

impl From<toml::ser::Error> for Error {
    fn from(source: toml::ser::Error) -> Self {
        Error::TomlSe { source }
    }
}

/// Result type alias for convenience
pub type Result<T, E = Error> = std::result::Result<T, E>;
