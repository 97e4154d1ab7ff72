//! Startup errors.
//!
//! Nothing that happens during a round is an error: hitting a pipe or the
//! ground is a state transition. Everything here aborts startup (or ends the
//! process while restoring the terminal).

use std::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Debug)]
pub enum Error {
    /// Terminal setup or drawing failed.
    Io(io::Error),
    /// The configuration file exists but could not be read.
    ConfigRead { path: PathBuf, source: io::Error },
    /// The configuration file is not valid JSON for [`crate::config::Config`].
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// A tuning value is out of range.
    InvalidTuning(String),
    /// The log file could not be opened or the logger was already set.
    Logging(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "terminal i/o error: {e}"),
            Error::ConfigRead { path, source } => {
                write!(f, "cannot read config {}: {source}", path.display())
            }
            Error::ConfigParse { path, source } => {
                write!(f, "malformed config {}: {source}", path.display())
            }
            Error::InvalidTuning(msg) => write!(f, "invalid tuning: {msg}"),
            Error::Logging(msg) => write!(f, "cannot initialize logging: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::ConfigRead { source, .. } => Some(source),
            Error::ConfigParse { source, .. } => Some(source),
            Error::InvalidTuning(_) | Error::Logging(_) => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_file() {
        let err = Error::ConfigRead {
            path: PathBuf::from("/tmp/flappy.json"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/flappy.json"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_io_conversion_keeps_source() {
        let err: Error = io::Error::other("boom").into();
        assert!(matches!(err, Error::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
