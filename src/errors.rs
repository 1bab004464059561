use thiserror::Error;

use crate::mapper::PokemonId;

/// Errors produced while talking to the catalog API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request never completed (connection refused, reset, DNS, ...)
    #[error("Network error: {0}")]
    Network(String),
    /// The server answered with a non-2xx status
    #[error("API error: {status}")]
    Http { status: u16 },
    /// A detail lookup answered 404
    #[error("Pokemon with ID {id} not found.")]
    NotFound { id: PokemonId },
    /// The response body was not the JSON we expected
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// Coarse error category, kept alongside the message once an error has been
/// turned into view state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Http(u16),
    NotFound,
    Decode,
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Network(_) => ErrorKind::Network,
            FetchError::Http { status } => ErrorKind::Http(*status),
            FetchError::NotFound { .. } => ErrorKind::NotFound,
            FetchError::Decode(_) => ErrorKind::Decode,
        }
    }
}

/// Errors related to loading and validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed config file: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Invalid API base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("Invalid page size {0}: must be between 1 and 100")]
    InvalidPageSize(u64),
    #[error("Invalid debounce window {0}ms: must be at most 5000ms")]
    InvalidDebounce(u64),
}

/// Errors related to parsing interactive commands
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command: {0}. Type 'help' for a list of commands.")]
    UnknownCommand(String),
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),
    #[error("Invalid {what}: {value}")]
    InvalidArgument { what: &'static str, value: String },
}

/// Type alias for Results using FetchError
pub type FetchResult<T> = Result<T, FetchError>;

/// Type alias for Results using ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Type alias for Results using CommandError
pub type CommandResult<T> = Result<T, CommandError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_user_facing_messages() {
        assert_eq!(FetchError::Http { status: 500 }.to_string(), "API error: 500");
        assert_eq!(
            FetchError::NotFound { id: 9999 }.to_string(),
            "Pokemon with ID 9999 not found."
        );
        assert_eq!(
            FetchError::Network("connection refused".to_string()).to_string(),
            "Network error: connection refused"
        );
    }

    #[test]
    fn test_kind_distinguishes_not_found_from_http() {
        assert_eq!(FetchError::NotFound { id: 1 }.kind(), ErrorKind::NotFound);
        assert_eq!(FetchError::Http { status: 404 }.kind(), ErrorKind::Http(404));
    }
}
