use crate::{auth::AuthMechanism, error_chain_fmt};

#[derive(thiserror::Error)]
pub enum AuthError {
    #[error("The {0} auth provider must implement `authenticate`")]
    NotImplemented(AuthMechanism),
    #[error("No auth provider is registered for the {0} mechanism")]
    UnsupportedMechanism(AuthMechanism),
    #[error("`{0}` is not a known authentication mechanism")]
    UnknownMechanism(String),
    #[error("Authentication requires credentials but none were supplied")]
    MissingCredentials,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}
impl std::fmt::Debug for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
