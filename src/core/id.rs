use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier shared by notes and categories.
///
/// New ids are random UUIDs, but any string is accepted from storage, and
/// integer ids are read back as their decimal text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First `len` characters, for compact listings.
    pub fn short(&self, len: usize) -> &str {
        match self.0.char_indices().nth(len) {
            Some((end, _)) => &self.0[..end],
            None => &self.0,
        }
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Self(s),
            Raw::Signed(n) => Self(n.to_string()),
            Raw::Unsigned(n) => Self(n.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique_uuids() {
        let a = Id::generate();
        let b = Id::generate();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn reads_strings_and_integers() {
        let ids: Vec<Id> = serde_json::from_str(r#"["a", "work", 1, 18446744073709551615]"#).unwrap();
        assert_eq!(ids[0], Id::from("a"));
        assert_eq!(ids[1], Id::from("work"));
        assert_eq!(ids[2], Id::from("1"));
        assert_eq!(ids[3].as_str(), "18446744073709551615");
    }

    #[test]
    fn writes_as_plain_string() {
        assert_eq!(serde_json::to_string(&Id::from("a")).unwrap(), r#""a""#);
    }

    #[test]
    fn short_handles_short_and_multibyte_ids() {
        assert_eq!(Id::from("a").short(8), "a");
        assert_eq!(Id::from("ééééééééé").short(8), "éééééééé");
        assert_eq!(Id::from("0123456789").short(8), "01234567");
    }
}
