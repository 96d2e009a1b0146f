//! Generic, type-safe REST client.
//!
//! # Overview
//! Given a model type implementing `Persistable` and a resource path,
//! `RestClient` performs create / read / update / patch / delete calls
//! against a remote HTTP service and returns decoded models or a typed
//! `RequestError`.
//!
//! # Design
//! - `request` builds `HttpRequest` values and `response` classifies
//!   `HttpResponse` values; neither touches the network.
//! - `Transport` is the only I/O seam. `ReqwestTransport` is the production
//!   implementation; tests stub it.
//! - Credentials are an `AuthScheme` snapshot applied to each request just
//!   before dispatch.
//! - Models are defined by the caller; the client only needs serde and an
//!   identifier type.

pub mod auth;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod http;
pub mod identifier;
pub mod model;
pub mod request;
pub mod response;
pub mod transport;

pub use auth::{ApiKeyHeader, AuthScheme, BasicAuth, BearerToken};
pub use client::RestClient;
pub use config::{ClientConfig, ConfigError};
pub use error::RequestError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use identifier::{Identifier, Unidentifiable};
pub use model::Persistable;
pub use request::{Address, RequestBuilder, Verb};
pub use transport::{ReqwestTransport, Transport, TransportError};
