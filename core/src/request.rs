//! Request builder: verb + path + address + body into an `HttpRequest`.
//!
//! # Design
//! The builder holds only the base URL and carries no state between calls.
//! `Address` makes "one resource" and "filtered collection" mutually
//! exclusive by construction; the only remaining mismatch, a verb that needs
//! an identifier used without one (or the reverse), is rejected here as
//! `BadRequest` before anything is dispatched.

use serde::Serialize;

use crate::codec::{self, JSON_CONTENT_TYPE};
use crate::error::RequestError;
use crate::http::{HttpMethod, HttpRequest};
use crate::identifier::Identifier;

/// One of the CRUD operations a resource supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Create,
    Read,
    ReadAll,
    /// Full replacement.
    Update,
    /// Partial update.
    Patch,
    Delete,
    DeleteAll,
}

impl Verb {
    pub fn method(self) -> HttpMethod {
        match self {
            Verb::Create => HttpMethod::Post,
            Verb::Read | Verb::ReadAll => HttpMethod::Get,
            Verb::Update => HttpMethod::Put,
            Verb::Patch => HttpMethod::Patch,
            Verb::Delete | Verb::DeleteAll => HttpMethod::Delete,
        }
    }

    pub fn requires_identifier(self) -> bool {
        matches!(self, Verb::Read | Verb::Update | Verb::Patch | Verb::Delete)
    }
}

/// What a request points at under its resource path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address {
    /// `<path>`
    Collection,
    /// `<path>/<segment>`, segment already percent-encoded.
    Item(String),
    /// `<path>?<encoded query>`
    Filtered(String),
}

impl Address {
    /// Address one resource. Every byte outside the unreserved set is
    /// escaped so the identifier stays a single path segment.
    pub fn item<I: Identifier>(id: &I) -> Self {
        Address::Item(urlencoding::encode(&id.to_segment()).into_owned())
    }

    /// `Filtered` for a non-empty query, `Collection` when every field is `None`.
    pub fn filtered<Q: Serialize + ?Sized>(query: &Q) -> Result<Self, RequestError> {
        Ok(match codec::encode_query(query)? {
            Some(encoded) => Address::Filtered(encoded),
            None => Address::Collection,
        })
    }
}

/// Stateless builder bound to a base endpoint.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: String,
}

impl RequestBuilder {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Assemble a request without a body.
    pub fn build(&self, verb: Verb, path: &str, address: Address) -> Result<HttpRequest, RequestError> {
        self.assemble(verb, path, address, None)
    }

    /// Assemble a request whose body is `data` encoded as JSON.
    pub fn build_with_body<B: Serialize + ?Sized>(
        &self,
        verb: Verb,
        path: &str,
        address: Address,
        data: &B,
    ) -> Result<HttpRequest, RequestError> {
        let body = codec::encode(data)?;
        self.assemble(verb, path, address, Some(body))
    }

    fn assemble(
        &self,
        verb: Verb,
        path: &str,
        address: Address,
        body: Option<Vec<u8>>,
    ) -> Result<HttpRequest, RequestError> {
        let addressed = matches!(address, Address::Item(_));
        if verb.requires_identifier() != addressed {
            return Err(RequestError::BadRequest(format!(
                "{verb:?} {} an identifier",
                if addressed { "does not take" } else { "requires" }
            )));
        }
        if let Address::Item(segment) = &address {
            if segment.is_empty() || segment == "." || segment == ".." {
                return Err(RequestError::BadRequest(format!("{segment:?} is not a resource segment")));
            }
        }
        if verb == Verb::Create && matches!(address, Address::Filtered(_)) {
            return Err(RequestError::BadRequest("Create does not take a query".to_string()));
        }

        let mut headers = vec![("accept".to_string(), JSON_CONTENT_TYPE.to_string())];
        if body.is_some() {
            headers.push(("content-type".to_string(), JSON_CONTENT_TYPE.to_string()));
        }

        Ok(HttpRequest {
            method: verb.method(),
            url: self.url(path, &address),
            headers,
            body,
        })
    }

    fn url(&self, path: &str, address: &Address) -> String {
        let path = path.trim_end_matches('/');
        let separator = if path.starts_with('/') { "" } else { "/" };
        let mut url = format!("{}{separator}{path}", self.base_url);
        match address {
            Address::Collection => {}
            Address::Item(segment) => {
                url.push('/');
                url.push_str(segment);
            }
            Address::Filtered(query) => {
                url.push('?');
                url.push_str(query);
            }
        }
        url
    }
}
