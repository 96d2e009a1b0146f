//! Error taxonomy for `RestClient` operations.
//!
//! # Design
//! Callers never see a raw `reqwest` or `serde_json` error. A bad
//! `ClientConfig` is reported as `Config` at construction. Failures detected
//! before dispatch (`BadRequest`, `Unidentifiable`) are distinct from failures
//! reported by the server (`ClientError`, `ServerError`), from bodies that do
//! not match the expected model (`DecodingError`), and from requests that never
//! got an answer (`ConnectionFailure`). Status-bearing variants keep the raw
//! body for debugging.

use thiserror::Error;

use crate::config::ConfigError;
use crate::identifier::Unidentifiable;
use crate::transport::TransportError;

/// Errors returned by every `RestClient` operation.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The client was constructed from an invalid `ClientConfig`.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The request could not be assembled: malformed query, body encode
    /// failure, or a verb used without the address it requires.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// An identifier segment could not be parsed into its typed form.
    #[error(transparent)]
    Unidentifiable(#[from] Unidentifiable),

    /// The server answered with a 4xx status.
    #[error("client error HTTP {status}: {body}")]
    ClientError { status: u16, body: String },

    /// The server answered with a 5xx status.
    #[error("server error HTTP {status}: {body}")]
    ServerError { status: u16, body: String },

    /// A 2xx body could not be decoded into the expected model shape.
    #[error("decoding failed: {0}")]
    DecodingError(String),

    /// No response was received.
    #[error("connection failure: {0}")]
    ConnectionFailure(#[from] TransportError),

    /// A 1xx or 3xx status the transport did not resolve on its own.
    #[error("unexpected HTTP {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
}

impl RequestError {
    /// HTTP status of the response that produced this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::ClientError { status, .. }
            | RequestError::ServerError { status, .. }
            | RequestError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_exposed_for_http_variants_only() {
        let err = RequestError::ClientError {
            status: 401,
            body: String::new(),
        };
        assert_eq!(err.status(), Some(401));
        assert!(err.is_unauthorized());
        assert!(!err.is_not_found());

        let err = RequestError::ServerError {
            status: 503,
            body: "down".to_string(),
        };
        assert_eq!(err.status(), Some(503));

        let err = RequestError::DecodingError("eof".to_string());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn unidentifiable_converts_transparently() {
        let err: RequestError = Unidentifiable::new("abc").into();
        assert!(matches!(err, RequestError::Unidentifiable(_)));
        assert_eq!(err.to_string(), r#"cannot identify resource from segment "abc""#);
    }

    #[test]
    fn transport_errors_become_connection_failures() {
        let err: RequestError = TransportError::Connect("connection refused".to_string()).into();
        assert!(matches!(err, RequestError::ConnectionFailure(_)));
        assert_eq!(err.to_string(), "connection failure: connect: connection refused");
    }

    #[test]
    fn display_includes_status_and_body() {
        let err = RequestError::ClientError {
            status: 404,
            body: "no such user".to_string(),
        };
        assert_eq!(err.to_string(), "client error HTTP 404: no such user");
    }

    #[test]
    fn config_errors_keep_their_variant() {
        let err: RequestError = ConfigError::InvalidBaseUrl("localhost".to_string()).into();
        assert!(matches!(err, RequestError::Config(ConfigError::InvalidBaseUrl(_))));
        assert_eq!(
            err.to_string(),
            r#"invalid configuration: base url must start with http:// or https://, got "localhost""#
        );
        assert_eq!(err.status(), None);
    }
}
