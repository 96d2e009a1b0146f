//! Generic, asynchronous CRUD client.
//!
//! # Design
//! `RestClient` owns a `RequestBuilder`, a shared `Transport` and the current
//! credential snapshot. Each operation builds a fresh `HttpRequest`, applies
//! the active `AuthScheme`, sends it, and hands the response to one of the
//! `response::parse_*` functions. Nothing else is shared between calls, so
//! one client can serve any number of concurrent requests.
//!
//! The credential is held in an `ArcSwapOption`: reconfiguring swaps in a new
//! snapshot atomically and in-flight requests keep the one they loaded.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use serde::Serialize;

use crate::auth::{AuthScheme, BasicAuth, BearerToken};
use crate::config::ClientConfig;
use crate::error::RequestError;
use crate::http::{HttpRequest, HttpResponse};
use crate::identifier::Identifier;
use crate::model::Persistable;
use crate::request::{Address, RequestBuilder, Verb};
use crate::response;
use crate::transport::{ReqwestTransport, Transport};

type Credential = Box<dyn AuthScheme>;

/// Type-safe client for a REST service.
///
/// ```no_run
/// use rest_core::{Persistable, RestClient};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct User {
///     id: u32,
///     name: String,
/// }
///
/// impl Persistable for User {
///     type Id = u32;
/// }
///
/// # async fn run() -> Result<(), rest_core::RequestError> {
/// let client = RestClient::new("http://localhost:3000")?;
/// client.add_basic_auth("John", "12345");
/// let users: Vec<User> = client.read_all("/users").await?;
/// let first: User = client.read("/users", &1).await?;
/// # Ok(())
/// # }
/// ```
pub struct RestClient {
    builder: RequestBuilder,
    transport: Arc<dyn Transport>,
    auth: ArcSwapOption<Credential>,
}

impl RestClient {
    /// Client for `base_url` over `ReqwestTransport` with default settings.
    pub fn new(base_url: &str) -> Result<Self, RequestError> {
        Self::from_config(ClientConfig::new(base_url))
    }

    pub fn from_config(config: ClientConfig) -> Result<Self, RequestError> {
        config.validate()?;
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(&config, Arc::new(transport)))
    }

    pub fn with_transport(config: &ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            builder: RequestBuilder::new(&config.base_url),
            transport,
            auth: ArcSwapOption::empty(),
        }
    }

    pub fn base_url(&self) -> &str {
        self.builder.base_url()
    }

    // -----------------------------------------------------------------------
    // Credentials
    // -----------------------------------------------------------------------

    /// Replace the active credential. Applies to every later request.
    pub fn set_auth<A: AuthScheme + 'static>(&self, scheme: A) {
        tracing::debug!(scheme = ?scheme, "auth scheme configured");
        let credential: Credential = Box::new(scheme);
        self.auth.store(Some(Arc::new(credential)));
    }

    pub fn add_basic_auth(&self, username: &str, password: &str) {
        self.set_auth(BasicAuth::new(username, password));
    }

    pub fn add_bearer_token(&self, token: &str) {
        self.set_auth(BearerToken::new(token));
    }

    pub fn clear_auth(&self) {
        self.auth.store(None);
    }

    pub fn has_auth(&self) -> bool {
        self.auth.load().is_some()
    }

    // -----------------------------------------------------------------------
    // Create
    // -----------------------------------------------------------------------

    pub async fn create<M: Persistable>(&self, path: &str, data: &M) -> Result<M, RequestError> {
        let request = self
            .builder
            .build_with_body(Verb::Create, path, Address::Collection, data)?;
        let response = self.dispatch(request).await?;
        response::parse_model(&response)
    }

    /// Create, returning the identifier the server reports in `Location`
    /// alongside the stored model.
    pub async fn create_returning_id<M: Persistable>(
        &self,
        path: &str,
        data: &M,
    ) -> Result<(M::Id, M), RequestError> {
        let request = self
            .builder
            .build_with_body(Verb::Create, path, Address::Collection, data)?;
        let response = self.dispatch(request).await?;
        let model = response::parse_model(&response)?;
        let id = response::parse_location_id::<M::Id>(&response)?;
        Ok((id, model))
    }

    // -----------------------------------------------------------------------
    // Read
    // -----------------------------------------------------------------------

    pub async fn read_all<M: Persistable>(&self, path: &str) -> Result<Vec<M>, RequestError> {
        let request = self.builder.build(Verb::ReadAll, path, Address::Collection)?;
        let response = self.dispatch(request).await?;
        response::parse_collection(&response)
    }

    pub async fn read<M: Persistable>(&self, path: &str, id: &M::Id) -> Result<M, RequestError> {
        let request = self.builder.build(Verb::Read, path, Address::item(id))?;
        let response = self.dispatch(request).await?;
        response::parse_model(&response)
    }

    /// Collection filtered by the fields of `query`.
    pub async fn read_matching<M, Q>(&self, path: &str, query: &Q) -> Result<Vec<M>, RequestError>
    where
        M: Persistable,
        Q: Serialize + ?Sized,
    {
        let request = self.builder.build(Verb::ReadAll, path, Address::filtered(query)?)?;
        let response = self.dispatch(request).await?;
        response::parse_collection(&response)
    }

    // -----------------------------------------------------------------------
    // Update
    // -----------------------------------------------------------------------

    /// Replace the resource at `id` with `data` (PUT).
    pub async fn update<M: Persistable>(&self, path: &str, id: &M::Id, data: &M) -> Result<M, RequestError> {
        let request = self
            .builder
            .build_with_body(Verb::Update, path, Address::item(id), data)?;
        let response = self.dispatch(request).await?;
        response::parse_model(&response)
    }

    /// Apply the fields present in `data` to the resource at `id` (PATCH).
    pub async fn patch<M, P>(&self, path: &str, id: &M::Id, data: &P) -> Result<M, RequestError>
    where
        M: Persistable,
        P: Serialize + ?Sized,
    {
        let request = self
            .builder
            .build_with_body(Verb::Patch, path, Address::item(id), data)?;
        let response = self.dispatch(request).await?;
        response::parse_model(&response)
    }

    // -----------------------------------------------------------------------
    // Delete
    // -----------------------------------------------------------------------

    pub async fn delete<I: Identifier>(&self, path: &str, id: &I) -> Result<(), RequestError> {
        let request = self.builder.build(Verb::Delete, path, Address::item(id))?;
        let response = self.dispatch(request).await?;
        response::parse_empty(&response)
    }

    pub async fn delete_all(&self, path: &str) -> Result<(), RequestError> {
        let request = self.builder.build(Verb::DeleteAll, path, Address::Collection)?;
        let response = self.dispatch(request).await?;
        response::parse_empty(&response)
    }

    /// Delete every member of the collection matching `query`.
    pub async fn delete_matching<Q: Serialize + ?Sized>(&self, path: &str, query: &Q) -> Result<(), RequestError> {
        let request = self
            .builder
            .build(Verb::DeleteAll, path, Address::filtered(query)?)?;
        let response = self.dispatch(request).await?;
        response::parse_empty(&response)
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    async fn dispatch(&self, request: HttpRequest) -> Result<HttpResponse, RequestError> {
        let request = match self.auth.load_full() {
            Some(scheme) => scheme.apply(request),
            None => request,
        };
        let method = request.method.as_str();
        let url = request.url.clone();

        tracing::debug!(method, url = %url, "dispatching request");
        match self.transport.send(request).await {
            Ok(response) => {
                tracing::debug!(method, url = %url, status = response.status, "response received");
                Ok(response)
            }
            Err(err) => {
                tracing::warn!(method, url = %url, error = %err, "no response received");
                Err(err.into())
            }
        }
    }
}
