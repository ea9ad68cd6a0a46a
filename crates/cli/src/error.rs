//! Host error types with exit code mapping.

use std::path::PathBuf;

use domain::DomainError;
use thiserror::Error;

/// Errors that end a run.
#[derive(Debug, Error)]
pub enum CliError {
    /// Wrong command-line arguments.
    #[error("usage: warehouse <history.json> <commands.json>")]
    Usage,

    /// An environment variable holds an invalid value.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// An input file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An input file is not valid JSON for its content.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Replay or publication failed.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Usage | CliError::Config(_) => 2,
            CliError::Io { .. } | CliError::Parse { .. } | CliError::Domain(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::Usage.exit_code(), 2);
        assert_eq!(CliError::Config("bad".to_string()).exit_code(), 2);
        assert_eq!(CliError::from(DomainError::StaleAggregate).exit_code(), 1);
    }

    #[test]
    fn test_io_error_names_path() {
        let error = CliError::Io {
            path: PathBuf::from("history.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(error.to_string(), "failed to read history.json: missing");
    }
}
