//! Response classification and decoding.
//!
//! Every parser first maps the status onto the error taxonomy and only then
//! looks at the body, so a failed call never reports a `DecodingError` for an
//! error page.

use serde::de::DeserializeOwned;

use crate::codec;
use crate::error::RequestError;
use crate::http::HttpResponse;
use crate::identifier::{Identifier, Unidentifiable};

/// Map non-success status codes to the matching `RequestError` variant.
pub fn check_status(response: &HttpResponse) -> Result<(), RequestError> {
    let status = response.status;
    match status {
        200..=299 => Ok(()),
        400..=499 => Err(RequestError::ClientError {
            status,
            body: response.body_text(),
        }),
        500..=599 => Err(RequestError::ServerError {
            status,
            body: response.body_text(),
        }),
        _ => Err(RequestError::UnexpectedStatus {
            status,
            body: response.body_text(),
        }),
    }
}

pub fn parse_model<M: DeserializeOwned>(response: &HttpResponse) -> Result<M, RequestError> {
    check_status(response)?;
    codec::decode(&response.body)
}

pub fn parse_collection<M: DeserializeOwned>(response: &HttpResponse) -> Result<Vec<M>, RequestError> {
    check_status(response)?;
    codec::decode(&response.body)
}

/// Success check for operations without a result. The body is ignored.
pub fn parse_empty(response: &HttpResponse) -> Result<(), RequestError> {
    check_status(response)
}

/// Identifier assigned by the server, read from the `Location` header.
///
/// Accepts both a bare segment (`5`) and a path or URL (`/users/5`); the last
/// non-empty segment is percent-decoded, then parsed.
pub fn parse_location_id<I: Identifier>(response: &HttpResponse) -> Result<I, RequestError> {
    let location = response
        .header("location")
        .ok_or_else(|| RequestError::DecodingError("response has no Location header".to_string()))?;
    let segment = location
        .split('?')
        .next()
        .unwrap_or_default()
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();
    if segment.is_empty() {
        return Err(Unidentifiable::new(location).into());
    }
    let decoded = urlencoding::decode(segment).map_err(|_| Unidentifiable::new(segment))?;
    Ok(I::parse(&decoded)?)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, PartialEq, Deserialize)]
    struct User {
        id: u32,
        name: String,
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.as_bytes().to_vec(),
        }
    }

    fn with_location(location: &str) -> HttpResponse {
        HttpResponse {
            status: 201,
            headers: vec![("location".to_string(), location.to_string())],
            body: Vec::new(),
        }
    }

    #[test]
    fn parse_model_success() {
        let user: User = parse_model(&response(200, r#"{"id":1,"name":"Mike"}"#)).unwrap();
        assert_eq!(
            user,
            User {
                id: 1,
                name: "Mike".to_string()
            }
        );
    }

    #[test]
    fn parse_collection_success() {
        let users: Vec<User> = parse_collection(&response(
            200,
            r#"[{"id":1,"name":"Mike"},{"id":2,"name":"Chris"}]"#,
        ))
        .unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[1].name, "Chris");
    }

    #[test]
    fn any_2xx_is_success() {
        assert!(parse_empty(&response(200, "")).is_ok());
        assert!(parse_empty(&response(204, "")).is_ok());
        let user: User = parse_model(&response(201, r#"{"id":3,"name":"Ricardo"}"#)).unwrap();
        assert_eq!(user.id, 3);
    }

    #[test]
    fn four_hundreds_are_client_errors() {
        let err = parse_model::<User>(&response(401, "unauthorized")).unwrap_err();
        assert!(matches!(err, RequestError::ClientError { status: 401, ref body } if body == "unauthorized"));
        let err = parse_empty(&response(404, "")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn five_hundreds_are_server_errors() {
        let err = parse_collection::<User>(&response(503, "maintenance")).unwrap_err();
        assert!(matches!(err, RequestError::ServerError { status: 503, .. }));
    }

    #[test]
    fn redirects_are_unexpected() {
        let err = parse_empty(&response(304, "")).unwrap_err();
        assert!(matches!(err, RequestError::UnexpectedStatus { status: 304, .. }));
    }

    #[test]
    fn bad_body_on_success_is_decoding_error() {
        let err = parse_model::<User>(&response(200, "not json")).unwrap_err();
        assert!(matches!(err, RequestError::DecodingError(_)));
        let err = parse_collection::<User>(&response(200, r#"{"id":1,"name":"Mike"}"#)).unwrap_err();
        assert!(matches!(err, RequestError::DecodingError(_)));
    }

    #[test]
    fn error_status_wins_over_bad_body() {
        let err = parse_model::<User>(&response(500, "<html>oops</html>")).unwrap_err();
        assert!(matches!(err, RequestError::ServerError { .. }));
    }

    #[test]
    fn location_id_from_path_or_segment() {
        assert_eq!(parse_location_id::<u32>(&with_location("/users/5")).unwrap(), 5);
        assert_eq!(parse_location_id::<u32>(&with_location("5")).unwrap(), 5);
        assert_eq!(
            parse_location_id::<u32>(&with_location("http://localhost:3000/users/12/")).unwrap(),
            12
        );
    }

    #[test]
    fn location_id_is_percent_decoded() {
        let id: String = parse_location_id(&with_location("/docs/a%3Fx%3D1")).unwrap();
        assert_eq!(id, "a?x=1");
        let id: String = parse_location_id(&with_location("/docs/two%20words?rev=2")).unwrap();
        assert_eq!(id, "two words");
    }

    #[test]
    fn missing_location_is_decoding_error() {
        let err = parse_location_id::<u32>(&response(201, "")).unwrap_err();
        assert!(matches!(err, RequestError::DecodingError(_)));
    }

    #[test]
    fn malformed_location_is_unidentifiable() {
        let err = parse_location_id::<u32>(&with_location("/users/abc")).unwrap_err();
        assert!(matches!(err, RequestError::Unidentifiable(ref u) if u.segment == "abc"));
        let err = parse_location_id::<u32>(&with_location("/")).unwrap_err();
        assert!(matches!(err, RequestError::Unidentifiable(_)));
    }
}
