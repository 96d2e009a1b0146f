//! The capability contract a type implements to be managed by `RestClient`.
//!
//! # Design
//! A model is anything serde can encode and decode that names the identifier
//! type addressing its instances. No base type or registration is involved:
//! `impl Persistable for User { type Id = u32; }` is all the glue a caller
//! writes before using every client verb with `User`.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::identifier::Identifier;

/// A remotely manageable resource model.
///
/// The client only borrows models for the length of one request and hands
/// decoded values back by ownership.
pub trait Persistable: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Type of the path segment addressing a single instance.
    type Id: Identifier;
}
