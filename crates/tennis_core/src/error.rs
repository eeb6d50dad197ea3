use std::fmt;

use crate::models::ConfigError;

#[derive(Debug)]
pub enum MatchError {
    InvalidConfig(ConfigError),
    SerializationError(String),
    DeserializationError(String),
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MatchError::InvalidConfig(err) => {
                write!(f, "Invalid match configuration: {}", err)
            }
            MatchError::SerializationError(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            MatchError::DeserializationError(msg) => {
                write!(f, "Deserialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for MatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MatchError::InvalidConfig(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for MatchError {
    fn from(err: ConfigError) -> Self {
        MatchError::InvalidConfig(err)
    }
}

impl From<serde_json::Error> for MatchError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            MatchError::DeserializationError(err.to_string())
        } else {
            MatchError::SerializationError(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, MatchError>;
