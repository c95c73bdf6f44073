use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_PORT: u16 = 27017;

/// The address a server was reached at, used as the key of every server map.
///
/// Hosts are stored lower-cased so `"DB1:27017"` and `"db1:27017"` name the same server.
/// Addresses order by host, then port.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServerAddress {
    host: String,
    port: u16,
}

impl ServerAddress {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            host: host.to_lowercase(),
            port,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for ServerAddress {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AddressParseError::Empty);
        }

        // Borrow the url crate's authority parsing, which already knows about ports and
        // bracketed IPv6 literals.
        let invalid = |reason: String| AddressParseError::Invalid {
            address: s.to_string(),
            reason,
        };
        let url = Url::parse(&format!("mongodb://{}", trimmed)).map_err(|e| invalid(e.to_string()))?;

        if !url.username().is_empty() || url.password().is_some() {
            return Err(invalid("credentials are not part of a server address".to_string()));
        }
        if !url.path().is_empty() || url.query().is_some() || url.fragment().is_some() {
            return Err(invalid("unexpected trailing characters".to_string()));
        }

        let host = match url.host_str() {
            Some(host) if !host.is_empty() => host,
            _ => return Err(invalid("missing host".to_string())),
        };

        Ok(ServerAddress::new(host, url.port().unwrap_or(DEFAULT_PORT)))
    }
}

impl TryFrom<String> for ServerAddress {
    type Error = AddressParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ServerAddress> for String {
    fn from(address: ServerAddress) -> Self {
        address.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressParseError {
    #[error("A server address can't be empty")]
    Empty,
    #[error("`{address}` is not a valid server address. Caused by: {reason}")]
    Invalid { address: String, reason: String },
}
