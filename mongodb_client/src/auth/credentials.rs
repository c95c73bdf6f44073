use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::auth::AuthError;

#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum AuthMechanism {
    /// Negotiated with the server during the handshake.
    #[default]
    #[serde(rename = "DEFAULT")]
    Default,
    #[serde(rename = "SCRAM-SHA-1")]
    ScramSha1,
    #[serde(rename = "SCRAM-SHA-256")]
    ScramSha256,
    #[serde(rename = "MONGODB-X509")]
    MongoDbX509,
    #[serde(rename = "PLAIN")]
    Plain,
    #[serde(rename = "GSSAPI")]
    Gssapi,
    #[serde(rename = "MONGODB-AWS")]
    MongoDbAws,
}

impl AuthMechanism {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMechanism::Default => "DEFAULT",
            AuthMechanism::ScramSha1 => "SCRAM-SHA-1",
            AuthMechanism::ScramSha256 => "SCRAM-SHA-256",
            AuthMechanism::MongoDbX509 => "MONGODB-X509",
            AuthMechanism::Plain => "PLAIN",
            AuthMechanism::Gssapi => "GSSAPI",
            AuthMechanism::MongoDbAws => "MONGODB-AWS",
        }
    }
}

impl fmt::Display for AuthMechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AuthMechanism {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mechanism = match s.to_uppercase().as_str() {
            "DEFAULT" => AuthMechanism::Default,
            "SCRAM-SHA-1" => AuthMechanism::ScramSha1,
            "SCRAM-SHA-256" => AuthMechanism::ScramSha256,
            "MONGODB-X509" => AuthMechanism::MongoDbX509,
            "PLAIN" => AuthMechanism::Plain,
            "GSSAPI" => AuthMechanism::Gssapi,
            "MONGODB-AWS" => AuthMechanism::MongoDbAws,
            _ => return Err(AuthError::UnknownMechanism(s.to_string())),
        };
        Ok(mechanism)
    }
}

/// Who to authenticate as, and how.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: Option<String>,
    /// The database the user is defined in.
    pub source: String,
    pub password: Option<String>,
    pub mechanism: AuthMechanism,
}

impl Credentials {
    pub fn new(username: &str, password: &str, source: &str) -> Self {
        Self {
            username: Some(username.to_string()),
            source: source.to_string(),
            password: Some(password.to_string()),
            mechanism: AuthMechanism::Default,
        }
    }

    pub fn with_mechanism(mut self, mechanism: AuthMechanism) -> Self {
        self.mechanism = mechanism;
        self
    }
}

// Keeps passwords out of logs and spans.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("source", &self.source)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("mechanism", &self.mechanism)
            .finish()
    }
}
