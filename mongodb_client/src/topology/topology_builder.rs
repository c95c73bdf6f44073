use std::collections::BTreeSet;

use tracing::instrument;

use crate::{
    AddressParseError, ServerAddress, Topology, TopologyDescription, TopologyError,
    TopologyOptions,
};

#[derive(Debug, Default)]
pub struct TopologyBuilder {
    seeds: Vec<String>,
    options: TopologyOptions,
}

impl TopologyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_seeds<T>(mut self, seeds: &[T]) -> Self
    where
        T: AsRef<str>,
    {
        for s in seeds {
            self.seeds.push(s.as_ref().to_string());
        }
        self
    }

    pub fn set_replica_set_name(mut self, replica_set_name: &str) -> Self {
        self.options = self.options.with_replica_set_name(replica_set_name);
        self
    }

    pub fn set_direct_connection(mut self, direct_connection: bool) -> Self {
        self.options = self.options.with_direct_connection(direct_connection);
        self
    }

    pub fn set_heartbeat_frequency_ms(mut self, heartbeat_frequency_ms: u64) -> Self {
        self.options = self.options.with_heartbeat_frequency_ms(heartbeat_frequency_ms);
        self
    }

    pub fn set_local_threshold_ms(mut self, local_threshold_ms: u64) -> Self {
        self.options = self.options.with_local_threshold_ms(local_threshold_ms);
        self
    }

    /// Validates the configuration and returns the bootstrap snapshot, without starting an actor.
    #[instrument(level = "debug", name = "Build Topology Description", skip(self))]
    pub fn build_description(&self) -> Result<TopologyDescription, TopologyError> {
        if self.seeds.is_empty() {
            tracing::error!(
                "No seeds were supplied and a topology can't exist without at least one"
            );
            return Err(TopologyError::MissingSeedsError);
        }

        let seeds = validate_seeds(self.seeds.as_slice())?;

        if self.options.direct_connection() && seeds.len() > 1 {
            return Err(TopologyError::InvalidConfiguration(
                "A direct connection can only be made to a single seed".to_string(),
            ));
        }

        tracing::trace!("Initial seeds: {:?}", &seeds);

        Ok(TopologyDescription::from_seeds(seeds, self.options.clone()))
    }

    /// Starts a topology actor and returns a handle to it.
    ///
    /// Each call creates a new actor, so the builder can be reused as a template. Must be called
    /// from within a tokio runtime.
    #[instrument(level = "debug", name = "Build Topology", skip(self))]
    pub fn build(&self) -> Result<Topology, TopologyError> {
        let initial_description = self.build_description()?;
        Ok(Topology::new(initial_description))
    }
}

/// Parses every seed into a [`ServerAddress`], collapsing duplicates.
#[instrument(level = "debug", name = "Validate Seeds")]
fn validate_seeds<T: std::fmt::Debug>(seeds: &[T]) -> Result<BTreeSet<ServerAddress>, AddressParseError>
where
    T: AsRef<str>,
{
    seeds
        .iter()
        .map(|seed| seed.as_ref().parse::<ServerAddress>())
        .collect()
}
