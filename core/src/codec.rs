//! JSON body codec and query-string flattening.
//!
//! Encode failures surface as `BadRequest` because they happen before any
//! request exists. Decode failures surface as `DecodingError` and never
//! yield a partially decoded value.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::RequestError;

pub const JSON_CONTENT_TYPE: &str = "application/json";

pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, RequestError> {
    serde_json::to_vec(value).map_err(|e| RequestError::BadRequest(format!("body encoding failed: {e}")))
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, RequestError> {
    serde_json::from_slice(bytes).map_err(|e| RequestError::DecodingError(e.to_string()))
}

/// Flatten a query struct into `key=value&...`.
///
/// Keys follow the struct's field order and `None` fields are left out.
/// Returns `None` when nothing remains, so no bare `?` is appended.
pub fn encode_query<Q: Serialize + ?Sized>(query: &Q) -> Result<Option<String>, RequestError> {
    let encoded = serde_urlencoded::to_string(query)
        .map_err(|e| RequestError::BadRequest(format!("query encoding failed: {e}")))?;
    Ok(if encoded.is_empty() { None } else { Some(encoded) })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde::Deserialize;

    use super::*;

    #[derive(Serialize)]
    struct UserQuery {
        name: Option<String>,
        age: Option<u32>,
        city: Option<String>,
    }

    #[test]
    fn query_keeps_field_order_and_skips_none() {
        let query = UserQuery {
            name: Some("Mike".to_string()),
            age: None,
            city: Some("Zürich & Bern".to_string()),
        };
        let encoded = encode_query(&query).unwrap().unwrap();
        assert_eq!(encoded, "name=Mike&city=Z%C3%BCrich+%26+Bern");
    }

    #[test]
    fn empty_query_is_omitted() {
        let query = UserQuery {
            name: None,
            age: None,
            city: None,
        };
        assert_eq!(encode_query(&query).unwrap(), None);
    }

    #[test]
    fn nested_query_is_a_bad_request() {
        #[derive(Serialize)]
        struct Nested {
            inner: UserQuery,
        }
        let query = Nested {
            inner: UserQuery {
                name: None,
                age: Some(3),
                city: None,
            },
        };
        let err = encode_query(&query).unwrap_err();
        assert!(matches!(err, RequestError::BadRequest(_)));
    }

    #[test]
    fn non_string_map_keys_fail_to_encode() {
        let mut map = HashMap::new();
        map.insert((1u8, 2u8), "pair");
        let err = encode(&map).unwrap_err();
        assert!(matches!(err, RequestError::BadRequest(_)));
    }

    #[test]
    fn decode_is_all_or_nothing() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct User {
            id: u32,
            name: String,
        }
        let err = decode::<User>(br#"{"id":1}"#).unwrap_err();
        assert!(matches!(err, RequestError::DecodingError(_)));
        let err = decode::<Vec<User>>(br#"[{"id":1,"name":"a"},{"id":"x","name":"b"}]"#).unwrap_err();
        assert!(matches!(err, RequestError::DecodingError(_)));
    }
}
