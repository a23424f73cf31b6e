//! # Design
//!
//! - Provide a single crate-level error type for API server bootstrap/serve failures.
//! - Keep error messages constant; capture operational context in structured fields.
//! - Preserve sources for diagnostics without double-logging.

use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::net::SocketAddr;

/// Result alias for API server operations.
pub type ApiServerResult<T> = std::result::Result<T, ApiServerError>;

/// Errors raised while assembling or serving the API.
#[derive(Debug)]
pub enum ApiServerError {
    /// Two triggers would be mounted on the same route.
    DuplicateTrigger {
        /// Conflicting trigger name.
        name: String,
    },
    /// A trigger name cannot be used as a route segment.
    InvalidTriggerName {
        /// Offending trigger name.
        name: String,
    },
    /// Binding the API listener failed.
    Bind {
        /// Address attempted.
        addr: SocketAddr,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Serving the API failed.
    Serve {
        /// Underlying IO error.
        source: std::io::Error,
    },
}

impl Display for ApiServerError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateTrigger { .. } => formatter.write_str("duplicate trigger route"),
            Self::InvalidTriggerName { .. } => formatter.write_str("invalid trigger name"),
            Self::Bind { .. } => formatter.write_str("failed to bind api listener"),
            Self::Serve { .. } => formatter.write_str("api server terminated unexpectedly"),
        }
    }
}

impl Error for ApiServerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Bind { source, .. } | Self::Serve { source } => Some(source),
            Self::DuplicateTrigger { .. } | Self::InvalidTriggerName { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn api_server_error_display_and_source() -> Result<(), Box<dyn Error>> {
        let duplicate = ApiServerError::DuplicateTrigger {
            name: "tdarr".to_string(),
        };
        assert_eq!(duplicate.to_string(), "duplicate trigger route");
        assert!(duplicate.source().is_none());

        let invalid = ApiServerError::InvalidTriggerName {
            name: "a/b".to_string(),
        };
        assert_eq!(invalid.to_string(), "invalid trigger name");
        assert!(invalid.source().is_none());

        let bind = ApiServerError::Bind {
            addr: "127.0.0.1:3030".parse()?,
            source: io::Error::new(io::ErrorKind::AddrInUse, "busy"),
        };
        assert_eq!(bind.to_string(), "failed to bind api listener");
        assert!(bind.source().is_some());

        let serve = ApiServerError::Serve {
            source: io::Error::new(io::ErrorKind::BrokenPipe, "lost"),
        };
        assert_eq!(serve.to_string(), "api server terminated unexpectedly");
        assert!(serve.source().is_some());
        Ok(())
    }
}
