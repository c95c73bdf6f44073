use crate::{error_chain_fmt, AddressParseError, ServerAddress};

#[derive(thiserror::Error)]
pub enum TopologyError {
    #[error("No seeds were supplied and a topology can't exist without at least one")]
    MissingSeedsError,
    #[error("Invalid seed address")]
    InvalidAddress(#[from] AddressParseError),
    #[error("Invalid topology configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Replica set member `{address}` was applied to a topology with a primary but no recorded set name")]
    MissingSetName { address: ServerAddress },
    #[error("The topology actor has stopped and can't accept updates")]
    ActorStopped,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}
impl std::fmt::Debug for TopologyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
