use rand::RngCore;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::{auth::Credentials, ServerAddress};

/// The document sent as the first command on a new connection.
pub type HandshakeDocument = Map<String, Value>;

pub const NONCE_LENGTH: usize = 24;

/// The connection being authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionHandle {
    pub id: Uuid,
    pub address: ServerAddress,
}

impl ConnectionHandle {
    pub fn new(address: ServerAddress) -> Self {
        Self {
            id: Uuid::new_v4(),
            address,
        }
    }
}

/// Client metadata included in the handshake.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandshakeOptions {
    pub app_name: Option<String>,
    pub compressors: Vec<String>,
}

impl HandshakeOptions {
    /// Builds the handshake before any auth provider has had a chance to augment it.
    pub fn handshake_document(&self) -> HandshakeDocument {
        let mut client = Map::new();
        client.insert(
            "driver".to_string(),
            json!({ "name": env!("CARGO_PKG_NAME"), "version": env!("CARGO_PKG_VERSION") }),
        );
        client.insert(
            "os".to_string(),
            json!({ "type": std::env::consts::OS, "architecture": std::env::consts::ARCH }),
        );
        if let Some(app_name) = &self.app_name {
            client.insert("application".to_string(), json!({ "name": app_name }));
        }

        let mut handshake = Map::new();
        handshake.insert("ismaster".to_string(), json!(1));
        handshake.insert("client".to_string(), Value::Object(client));
        if !self.compressors.is_empty() {
            handshake.insert("compression".to_string(), json!(self.compressors));
        }
        handshake
    }
}

/// State shared by every step of one connection's authentication conversation.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub connection: ConnectionHandle,
    pub credentials: Option<Credentials>,
    pub options: HandshakeOptions,
    /// A response from an initial auth attempt. Only some mechanisms use this.
    pub response: Option<Value>,
    /// A random nonce for mechanisms that need one in their conversation.
    pub nonce: Option<Vec<u8>>,
}

impl AuthContext {
    pub fn new(
        connection: ConnectionHandle,
        credentials: Option<Credentials>,
        options: HandshakeOptions,
    ) -> Self {
        Self {
            connection,
            credentials,
            options,
            response: None,
            nonce: None,
        }
    }

    /// Replaces the nonce with fresh random bytes and returns it.
    pub fn generate_nonce(&mut self) -> &[u8] {
        let mut nonce = vec![0u8; NONCE_LENGTH];
        rand::thread_rng().fill_bytes(&mut nonce);
        self.nonce.insert(nonce).as_slice()
    }
}
