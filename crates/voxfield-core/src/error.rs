use thiserror::Error;

/// Top-level error type for the Voxfield system.
///
/// Recognition failures are the one domain error; they carry the opaque
/// platform-supplied cause and are delivered asynchronously through the
/// registry's Error event, never thrown from start/stop calls. The remaining
/// variants cover ambient concerns (configuration, I/O, serialization).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VoxfieldError {
    #[error("Recognition error: {0}")]
    Recognition(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for VoxfieldError {
    fn from(err: toml::de::Error) -> Self {
        VoxfieldError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for VoxfieldError {
    fn from(err: toml::ser::Error) -> Self {
        VoxfieldError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for VoxfieldError {
    fn from(err: serde_json::Error) -> Self {
        VoxfieldError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Voxfield operations.
pub type Result<T> = std::result::Result<T, VoxfieldError>;
