use thiserror::Error;

/// Structured error hierarchy for Affilink.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; internal code continues to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("transport: {0}")]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("channel {channel} send failed: {message}")]
    Send { channel: String, message: String },

    #[error("channel {channel} delete failed: {message}")]
    Delete { channel: String, message: String },
}

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, BotError>;
