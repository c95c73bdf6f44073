use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Deserializer};

/// Token a replica set primary reports to identify the election that made it primary.
///
/// Newer elections carry greater ids. Ids are usually 12-byte ObjectIds, but some servers and
/// test fixtures hand out opaque strings, so both forms are accepted.
///
/// Ordering: two ObjectIds compare by their raw bytes, every other pairing compares the string
/// forms (an ObjectId renders as lower-case hex). A missing id is `None` and, through `Option`'s
/// ordering, sorts below every present id.
#[derive(Debug, Clone)]
pub enum ElectionId {
    ObjectId([u8; 12]),
    Opaque(String),
}

impl ElectionId {
    /// Parses a 24 character hex string into an ObjectId election id.
    pub fn parse_object_id(s: &str) -> Result<Self, ElectionIdError> {
        let mut bytes = [0u8; 12];
        hex::decode_to_slice(s, &mut bytes).map_err(|e| ElectionIdError {
            value: s.to_string(),
            reason: e.to_string(),
        })?;
        Ok(ElectionId::ObjectId(bytes))
    }

    pub fn bytes(&self) -> Option<&[u8; 12]> {
        match self {
            ElectionId::ObjectId(bytes) => Some(bytes),
            ElectionId::Opaque(_) => None,
        }
    }
}

impl From<[u8; 12]> for ElectionId {
    fn from(bytes: [u8; 12]) -> Self {
        ElectionId::ObjectId(bytes)
    }
}

impl FromStr for ElectionId {
    type Err = ElectionIdError;

    /// Anything that isn't an ObjectId in hex is kept as an opaque token.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ElectionIdError {
                value: s.to_string(),
                reason: "election id is empty".to_string(),
            });
        }
        Ok(ElectionId::parse_object_id(s).unwrap_or_else(|_| ElectionId::Opaque(s.to_string())))
    }
}

impl fmt::Display for ElectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElectionId::ObjectId(bytes) => write!(f, "{}", hex::encode(bytes)),
            ElectionId::Opaque(token) => write!(f, "{}", token),
        }
    }
}

impl Ord for ElectionId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (ElectionId::ObjectId(a), ElectionId::ObjectId(b)) => a.cmp(b),
            _ => self.to_string().cmp(&other.to_string()),
        }
    }
}

impl PartialOrd for ElectionId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ElectionId {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ElectionId {}

impl<'de> Deserialize<'de> for ElectionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Extended JSON wraps ObjectIds as `{"$oid": "..."}`.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            ObjectId {
                #[serde(rename = "$oid")]
                oid: String,
            },
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::ObjectId { oid } => {
                ElectionId::parse_object_id(&oid).map_err(serde::de::Error::custom)
            }
            Repr::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{value}` is not a valid election id. Caused by: {reason}")]
pub struct ElectionIdError {
    value: String,
    reason: String,
}
