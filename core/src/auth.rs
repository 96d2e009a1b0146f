//! Pluggable request authentication.
//!
//! # Design
//! An `AuthScheme` knows how to produce one header. Applying it is a pure
//! transform over a finished `HttpRequest`, run immediately before dispatch.
//! New schemes only implement `header_value` (and `header_name` when the
//! credential does not travel in `authorization`).

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::http::HttpRequest;

pub const AUTHORIZATION: &str = "authorization";

/// Produces the credential header attached to every outgoing request.
pub trait AuthScheme: Send + Sync + fmt::Debug {
    fn header_name(&self) -> &str {
        AUTHORIZATION
    }

    fn header_value(&self) -> String;

    /// Return `request` with this scheme's header set, replacing any
    /// header of the same name.
    fn apply(&self, mut request: HttpRequest) -> HttpRequest {
        let name = self.header_name();
        request.headers.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
        request.headers.push((name.to_string(), self.header_value()));
        request
    }
}

/// HTTP Basic credentials.
#[derive(Clone)]
pub struct BasicAuth {
    username: String,
    password: String,
}

impl BasicAuth {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl AuthScheme for BasicAuth {
    fn header_value(&self) -> String {
        let credentials = format!("{}:{}", self.username, self.password);
        format!("Basic {}", STANDARD.encode(credentials))
    }
}

/// `Authorization: Bearer <token>`.
#[derive(Clone)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: &str) -> Self {
        Self(token.to_string())
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

impl AuthScheme for BearerToken {
    fn header_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

/// A static credential carried in a custom header such as `x-api-key`.
#[derive(Clone)]
pub struct ApiKeyHeader {
    name: String,
    value: String,
}

impl ApiKeyHeader {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            value: value.to_string(),
        }
    }
}

impl fmt::Debug for ApiKeyHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyHeader")
            .field("name", &self.name)
            .field("value", &"<redacted>")
            .finish()
    }
}

impl AuthScheme for ApiKeyHeader {
    fn header_name(&self) -> &str {
        &self.name
    }

    fn header_value(&self) -> String {
        self.value.clone()
    }
}
