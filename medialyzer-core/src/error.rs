//! Error types for the MediaLyzer system.
//!
//! None of these ever cross the detection surface: [`HostError`] is produced by host
//! implementations and swallowed by the detector, [`ProfileError`] is only returned when
//! loading a [`HostProfile`](crate::host::HostProfile).

use std::path::PathBuf;
use thiserror::Error;

/// Failure reported by a host implementation when one of its APIs cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The host threw while the API was being accessed.
    #[error("Host API '{api}' threw: {message}")]
    Threw {
        api: String,
        message: String,
    },

    /// The API is not exposed by this host at all.
    #[error("Host API '{api}' is unavailable")]
    Unavailable {
        api: String,
    },
}

impl HostError {
    /// Name of the host API that failed.
    pub fn api(&self) -> &str {
        match self {
            HostError::Threw { api, .. } | HostError::Unavailable { api } => api,
        }
    }
}

/// Creates a [`HostError::Threw`].
pub fn host_threw(api: impl Into<String>, message: impl Into<String>) -> HostError {
    HostError::Threw {
        api: api.into(),
        message: message.into(),
    }
}

/// Creates a [`HostError::Unavailable`].
pub fn host_unavailable(api: impl Into<String>) -> HostError {
    HostError::Unavailable { api: api.into() }
}

/// Errors raised while loading a host profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The profile file could not be read.
    #[error("Failed to read host profile {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The profile is not valid JSON or does not match the profile schema.
    #[error("Invalid host profile: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

/// Result type alias for host calls.
pub type HostResult<T> = std::result::Result<T, HostError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = host_threw("localStorage", "SecurityError");
        assert_eq!(err.to_string(), "Host API 'localStorage' threw: SecurityError");

        let err = host_unavailable("ActiveXObject");
        assert_eq!(err.to_string(), "Host API 'ActiveXObject' is unavailable");
    }

    #[test]
    fn test_error_api_name() {
        assert_eq!(host_threw("getContext", "boom").api(), "getContext");
        assert_eq!(host_unavailable("ActiveXObject").api(), "ActiveXObject");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ProfileError = json_err.into();
        assert!(matches!(err, ProfileError::Json { .. }));
    }
}
