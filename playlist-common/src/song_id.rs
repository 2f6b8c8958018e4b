//! Song identifiers
//!
//! A `SongId` is the store-native identifier (UUIDv4). Its external form,
//! used on the wire and in HTML forms, is the lowercase hyphenated string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongId(Uuid);

impl SongId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        SongId(Uuid::new_v4())
    }

    /// Parse an external id.
    ///
    /// Accepts any textual UUID form the `uuid` crate does; renders back in
    /// hyphenated lowercase.
    pub fn parse(s: &str) -> Result<Self, Error> {
        Uuid::parse_str(s)
            .map(SongId)
            .map_err(|e| Error::InvalidId(format!("{:?}: {}", s, e)))
    }
}

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for SongId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SongId::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_form_parses_back() {
        let id = SongId::generate();
        let external = id.to_string();

        assert_eq!(external.len(), 36);
        assert_eq!(external, external.to_lowercase());
        assert_eq!(SongId::parse(&external).unwrap(), id);
    }

    #[test]
    fn test_uppercase_and_simple_forms_normalize() {
        let id = SongId::generate();
        let simple_upper = id.to_string().replace('-', "").to_uppercase();

        let parsed: SongId = simple_upper.parse().unwrap();
        assert_eq!(parsed, id);
        assert_eq!(parsed.to_string(), id.to_string());
    }

    #[test]
    fn test_malformed_ids_rejected() {
        for bad in ["", "123", "not-a-uuid", "65f1c2a9e4b0a1b2c3d4e5f6"] {
            let err = SongId::parse(bad).unwrap_err();
            assert!(matches!(err, Error::InvalidId(_)), "{:?} should be invalid", bad);
        }
    }
}
