use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const UNREACHABLE_MESSAGE: &str =
    "Unable to reach the server. Check your network connection.";
const MALFORMED_MESSAGE: &str = "The server returned a malformed response.";

#[derive(Error, Debug)]
pub enum RequestError {
    /// The server could not be reached, or its reply could not be read.
    #[error("{message}")]
    Network {
        message: String,
        #[source]
        source: BoxError,
    },

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Api { status: StatusCode, message: String },

    /// The access token expired and could not be refreshed. The session has
    /// already been cleared; do not retry with it.
    #[error("Your session has expired. Please log in again.")]
    AuthExpired,

    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl RequestError {
    pub fn unreachable(source: impl Into<BoxError>) -> Self {
        RequestError::Network {
            message: UNREACHABLE_MESSAGE.to_string(),
            source: source.into(),
        }
    }

    pub fn malformed(source: impl Into<BoxError>) -> Self {
        RequestError::Network {
            message: MALFORMED_MESSAGE.to_string(),
            source: source.into(),
        }
    }

    /// Build an `Api` error, preferring the `message` field of a JSON body.
    pub fn from_status(status: StatusCode, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("HTTP error {}", status.as_u16()));
        RequestError::Api { status, message }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RequestError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Only transport failures are worth retrying by the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RequestError::Network { .. })
    }

    pub fn is_auth_expired(&self) -> bool {
        matches!(self, RequestError::AuthExpired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_uses_server_message() {
        let err = RequestError::from_status(
            StatusCode::CONFLICT,
            br#"{"status":409,"message":"Email already registered"}"#,
        );
        assert_eq!(err.to_string(), "Email already registered");
        assert_eq!(err.status(), Some(StatusCode::CONFLICT));
    }

    #[test]
    fn test_from_status_falls_back_to_generic_message() {
        let err = RequestError::from_status(StatusCode::INTERNAL_SERVER_ERROR, b"<html>oops</html>");
        assert_eq!(err.to_string(), "HTTP error 500");

        let err = RequestError::from_status(StatusCode::NOT_FOUND, br#"{"error":"x"}"#);
        assert_eq!(err.to_string(), "HTTP error 404");

        let err = RequestError::from_status(StatusCode::BAD_REQUEST, br#"{"message":""}"#);
        assert_eq!(err.to_string(), "HTTP error 400");
    }

    #[test]
    fn test_network_message_hides_cause() {
        let cause = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = RequestError::unreachable(cause);
        assert_eq!(err.to_string(), UNREACHABLE_MESSAGE);
        assert!(err.is_retryable());
        assert!(std::error::Error::source(&err).is_some());
        assert!(!RequestError::AuthExpired.is_retryable());
    }
}
