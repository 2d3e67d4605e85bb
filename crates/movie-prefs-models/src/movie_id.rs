use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Opaque movie identifier.
///
/// The backend sends ids as either JSON strings or integers depending on the
/// endpoint. Both forms are accepted and normalized to the decimal string so
/// that `"42"` and `42` name the same movie. Ids always serialize as strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MovieId(String);

impl MovieId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MovieId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for MovieId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for MovieId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl std::str::FromStr for MovieId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("movie id cannot be empty".to_string());
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl Serialize for MovieId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMovieId {
    Text(String),
    Unsigned(u64),
    Signed(i64),
}

impl<'de> Deserialize<'de> for MovieId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawMovieId::deserialize(deserializer)?;
        Ok(match raw {
            RawMovieId::Text(s) => Self(s),
            RawMovieId::Unsigned(n) => Self(n.to_string()),
            RawMovieId::Signed(n) => Self(n.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_string_and_integer_ids() {
        let ids: Vec<MovieId> = serde_json::from_str(r#"["550", 550, "tt0137523"]"#).unwrap();
        assert_eq!(ids[0], ids[1]);
        assert_eq!(ids[2].as_str(), "tt0137523");
    }

    #[test]
    fn test_serialize_as_string() {
        let json = serde_json::to_string(&MovieId::from(27205u64)).unwrap();
        assert_eq!(json, r#""27205""#);
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert!("   ".parse::<MovieId>().is_err());
        assert_eq!(" m1 ".parse::<MovieId>().unwrap().as_str(), "m1");
    }
}
