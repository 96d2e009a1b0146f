//! Typed resource identifiers parsed from a single URL path segment.
//!
//! # Design
//! An `Identifier` is the typed form of the `<id>` in `<path>/<id>`. Parsing
//! is strict: integer identifiers accept only their canonical decimal form so
//! that a parsed value always renders back to the exact segment it came from.
//! The same trait serves a server-side route dispatcher and the client when it
//! reads an identifier out of a `Location` header.

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// A path segment could not be converted into the requested identifier type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot identify resource from segment {segment:?}")]
pub struct Unidentifiable {
    pub segment: String,
}

impl Unidentifiable {
    pub fn new(segment: &str) -> Self {
        Self {
            segment: segment.to_string(),
        }
    }
}

/// A value that addresses one resource instance inside a collection.
pub trait Identifier: fmt::Display + Sized + Send + Sync + 'static {
    /// Parse a raw path segment. Empty or malformed input fails.
    fn parse(segment: &str) -> Result<Self, Unidentifiable>;

    /// The segment used to address the resource, `parse`'s inverse.
    fn to_segment(&self) -> String {
        self.to_string()
    }
}

macro_rules! integer_identifier {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Identifier for $ty {
                fn parse(segment: &str) -> Result<Self, Unidentifiable> {
                    let value: $ty = segment.parse().map_err(|_| Unidentifiable::new(segment))?;
                    // Reject "007", "+7" and friends so the segment round-trips.
                    if value.to_string() != segment {
                        return Err(Unidentifiable::new(segment));
                    }
                    Ok(value)
                }
            }
        )*
    };
}

integer_identifier!(u32, u64, i32, i64, usize);

/// Any non-empty text except the dot segments `.` and `..`, which a URL
/// resolver would collapse. Reserved characters are escaped when addressed.
impl Identifier for String {
    fn parse(segment: &str) -> Result<Self, Unidentifiable> {
        if segment.is_empty() || segment == "." || segment == ".." {
            return Err(Unidentifiable::new(segment));
        }
        Ok(segment.to_string())
    }
}

/// Only the lowercase hyphenated form is accepted; braced or uppercase
/// input would not render back to the same segment.
impl Identifier for Uuid {
    fn parse(segment: &str) -> Result<Self, Unidentifiable> {
        let value = Uuid::parse_str(segment).map_err(|_| Unidentifiable::new(segment))?;
        if value.to_string() != segment {
            return Err(Unidentifiable::new(segment));
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_segments_round_trip() {
        for raw in ["0", "1", "42", "4294967295"] {
            let id = <u32 as Identifier>::parse(raw).unwrap();
            assert_eq!(id.to_segment(), raw);
        }
        let id = <i64 as Identifier>::parse("-17").unwrap();
        assert_eq!(id.to_segment(), "-17");
    }

    #[test]
    fn non_numeric_segments_are_unidentifiable() {
        for raw in ["", "abc", "1a", "1.5", " 1", "one"] {
            let err = <u32 as Identifier>::parse(raw).unwrap_err();
            assert_eq!(err.segment, raw);
        }
    }

    #[test]
    fn non_canonical_integers_are_rejected() {
        assert!(<u32 as Identifier>::parse("007").is_err());
        assert!(<u32 as Identifier>::parse("+7").is_err());
        assert!(<i32 as Identifier>::parse("-0").is_err());
    }

    #[test]
    fn out_of_range_integer_is_unidentifiable() {
        assert!(<u32 as Identifier>::parse("4294967296").is_err());
        assert!(<u32 as Identifier>::parse("-1").is_err());
    }

    #[test]
    fn string_identifier_rejects_empty_and_dot_segments() {
        assert_eq!(<String as Identifier>::parse("alice").unwrap(), "alice");
        assert!(<String as Identifier>::parse("").is_err());
        assert!(<String as Identifier>::parse(".").is_err());
        assert!(<String as Identifier>::parse("..").is_err());
    }

    #[test]
    fn string_identifier_keeps_reserved_characters_verbatim() {
        for raw in ["a?x=1", "a/b", "50%", "c#d", "..."] {
            let id = <String as Identifier>::parse(raw).unwrap();
            assert_eq!(id.to_segment(), raw);
        }
    }

    #[test]
    fn uppercase_and_braced_uuids_are_rejected() {
        assert!(<Uuid as Identifier>::parse("00000000-0000-0000-0000-00000000000A").is_err());
        assert!(<Uuid as Identifier>::parse("{00000000-0000-0000-0000-000000000001}").is_err());
    }

    #[test]
    fn uuid_identifier_requires_hyphenated_lowercase() {
        let raw = "00000000-0000-0000-0000-000000000001";
        let id = <Uuid as Identifier>::parse(raw).unwrap();
        assert_eq!(id.to_segment(), raw);
        assert!(<Uuid as Identifier>::parse("not-a-uuid").is_err());
        assert!(<Uuid as Identifier>::parse("00000000000000000000000000000001").is_err());
    }

    #[test]
    fn unidentifiable_display_names_the_segment() {
        let err = Unidentifiable::new("abc");
        assert_eq!(err.to_string(), r#"cannot identify resource from segment "abc""#);
    }
}
