use std::collections::HashMap;

use async_trait::async_trait;
use dyn_clone::DynClone;
use tracing::instrument;

use crate::auth::{AuthContext, AuthError, AuthMechanism, HandshakeDocument};

/// One authentication mechanism.
///
/// Both steps have defaults: `prepare` leaves the handshake untouched, and `authenticate` fails
/// with [`AuthError::NotImplemented`], so a provider that doesn't override it can never silently
/// let a connection through.
#[async_trait]
pub trait AuthProvider: DynClone + Send + Sync + std::fmt::Debug {
    fn mechanism(&self) -> AuthMechanism;

    /// Augments the handshake sent before authentication starts.
    async fn prepare(
        &self,
        handshake: HandshakeDocument,
        _context: &AuthContext,
    ) -> Result<HandshakeDocument, AuthError> {
        Ok(handshake)
    }

    /// Runs the mechanism's challenge/response conversation.
    async fn authenticate(&self, _context: &mut AuthContext) -> Result<(), AuthError> {
        Err(AuthError::NotImplemented(self.mechanism()))
    }
}

dyn_clone::clone_trait_object!(AuthProvider);

/// Picks the provider for a connection's credentials.
#[derive(Debug, Clone, Default)]
pub struct AuthProviderRegistry {
    providers: HashMap<AuthMechanism, Box<dyn AuthProvider>>,
}

impl AuthProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `provider` for its mechanism, returning the provider it replaced.
    pub fn register(&mut self, provider: Box<dyn AuthProvider>) -> Option<Box<dyn AuthProvider>> {
        self.providers.insert(provider.mechanism(), provider)
    }

    pub fn provider_for(&self, mechanism: AuthMechanism) -> Result<&dyn AuthProvider, AuthError> {
        self.providers
            .get(&mechanism)
            .map(|provider| provider.as_ref())
            .ok_or(AuthError::UnsupportedMechanism(mechanism))
    }

    /// Lets the provider for the context's credentials augment the handshake. Connections
    /// without credentials keep the handshake as is.
    #[instrument(level = "debug", name = "Auth - Prepare Handshake", skip(self, handshake))]
    pub async fn prepare_handshake(
        &self,
        handshake: HandshakeDocument,
        context: &AuthContext,
    ) -> Result<HandshakeDocument, AuthError> {
        match &context.credentials {
            Some(credentials) => {
                self.provider_for(credentials.mechanism)?
                    .prepare(handshake, context)
                    .await
            }
            None => Ok(handshake),
        }
    }

    #[instrument(level = "debug", name = "Auth - Authenticate", skip(self))]
    pub async fn authenticate(&self, context: &mut AuthContext) -> Result<(), AuthError> {
        let mechanism = context
            .credentials
            .as_ref()
            .map(|credentials| credentials.mechanism)
            .ok_or(AuthError::MissingCredentials)?;

        let provider = self.provider_for(mechanism)?;
        let result = provider.authenticate(context).await;
        if let Err(e) = &result {
            tracing::error!(
                connection = %context.connection.id,
                "Authentication failed. Caused by: {}",
                e
            );
        }
        result
    }
}
