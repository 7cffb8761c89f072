use thiserror::Error;

#[derive(Error, Debug)]
pub enum CirlError {
    #[error("Invalid policy table row {row}: {reason}")]
    Validation { row: usize, reason: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("State not found in policy: {state}")]
    StateNotFound { state: String },

    #[error("Illegal action for {agent}: {action} is not in its action space")]
    IllegalAction { agent: String, action: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CirlError>;
