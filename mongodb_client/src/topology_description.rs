//! The cluster snapshot and the reconciliation step that folds one server's heartbeat into it.

use std::{collections::BTreeMap, fmt, sync::Arc};

use tracing::instrument;

use crate::{
    compatibility, ElectionId, HeartbeatError, ServerAddress, ServerDescription, ServerType,
    SrvPollingEvent, TopologyError, TopologyOptions,
};

mod replica_set;

use replica_set::ReplicaSetUpdate;

pub type ServerMap = BTreeMap<ServerAddress, ServerDescription>;

/// The shape of the deployment as far as the client can tell.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
pub enum TopologyType {
    #[default]
    Unknown,
    Single,
    Sharded,
    ReplicaSetNoPrimary,
    ReplicaSetWithPrimary,
}

impl TopologyType {
    /// The topology a single server of `server_type` implies when nothing else is known yet.
    pub fn for_server_type(server_type: ServerType) -> Self {
        match server_type {
            ServerType::Standalone => TopologyType::Single,
            ServerType::Mongos => TopologyType::Sharded,
            ServerType::RSPrimary => TopologyType::ReplicaSetWithPrimary,
            ServerType::RSSecondary | ServerType::RSOther => TopologyType::ReplicaSetNoPrimary,
            _ => TopologyType::Unknown,
        }
    }
}

impl fmt::Display for TopologyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Immutable snapshot of the whole deployment.
///
/// A snapshot is created once from the seed list and afterwards only derived through
/// [`update`](TopologyDescription::update) and
/// [`update_from_srv_polling_event`](TopologyDescription::update_from_srv_polling_event), each of
/// which returns a new snapshot and leaves the old one untouched. `compatible`,
/// `compatibility_error` and `logical_session_timeout_minutes` are derived every time a snapshot
/// is built.
#[derive(Debug, Clone, PartialEq)]
pub struct TopologyDescription {
    topology_type: TopologyType,
    servers: ServerMap,
    set_name: Option<String>,
    max_set_version: Option<i32>,
    max_election_id: Option<ElectionId>,
    common_wire_version: Option<i32>,
    compatible: bool,
    compatibility_error: Option<String>,
    logical_session_timeout_minutes: Option<u32>,
    stale: bool,
    options: TopologyOptions,
}

impl TopologyDescription {
    fn new(
        topology_type: TopologyType,
        servers: ServerMap,
        set_name: Option<String>,
        max_set_version: Option<i32>,
        max_election_id: Option<ElectionId>,
        common_wire_version: Option<i32>,
        options: TopologyOptions,
    ) -> Self {
        let compatibility_error = compatibility::check_compatibility(servers.values());
        let logical_session_timeout_minutes = logical_session_timeout(&servers);

        Self {
            topology_type,
            servers,
            set_name,
            max_set_version,
            max_election_id,
            common_wire_version,
            compatible: compatibility_error.is_none(),
            compatibility_error,
            logical_session_timeout_minutes,
            stale: false,
            options,
        }
    }

    /// Creates the bootstrap snapshot: every seed is known by address only.
    ///
    /// A direct connection starts out as `Single`. A configured replica set name starts out as
    /// `ReplicaSetNoPrimary` with that name already recorded. Anything else starts as `Unknown`.
    pub fn from_seeds(seeds: impl IntoIterator<Item = ServerAddress>, options: TopologyOptions) -> Self {
        let servers = seeds
            .into_iter()
            .map(|address| (address.clone(), ServerDescription::new(address)))
            .collect::<ServerMap>();

        let (topology_type, set_name) = if options.direct_connection() {
            (TopologyType::Single, None)
        } else if let Some(set_name) = options.replica_set_name() {
            (TopologyType::ReplicaSetNoPrimary, Some(set_name.to_string()))
        } else {
            (TopologyType::Unknown, None)
        };

        Self::new(topology_type, servers, set_name, None, None, None, options)
    }

    /// Returns the snapshot that results from absorbing `description`.
    ///
    /// Contradictory or stale reports never fail the update; the offending server is reset or
    /// dropped instead.
    ///
    /// # Panics
    ///
    /// Panics when a replica set member is applied to a topology that has a primary but never
    /// recorded a set name. A primary report without a set name that lists itself among its
    /// hosts leads to that state. Use
    /// [`try_update`](TopologyDescription::try_update) to receive it as an error instead.
    pub fn update(&self, description: ServerDescription) -> TopologyDescription {
        match self.try_update(description) {
            Ok(updated) => updated,
            Err(e) => {
                tracing::error!("Topology invariant violated. Caused by: {}", e);
                panic!("{}", e);
            }
        }
    }

    /// Same as [`update`](TopologyDescription::update) but reports the invariant violation as
    /// [`TopologyError::MissingSetName`].
    #[instrument(
        level = "debug",
        name = "Topology Description - Update",
        skip(self, description),
        fields(server = %description.address, server_type = %description.server_type)
    )]
    pub fn try_update(
        &self,
        description: ServerDescription,
    ) -> Result<TopologyDescription, TopologyError> {
        let address = description.address.clone();
        let mut state = ReplicaSetUpdate {
            topology_type: self.topology_type,
            set_name: self.set_name.clone(),
            max_set_version: self.max_set_version,
            max_election_id: self.max_election_id.clone(),
        };
        let mut common_wire_version = self.common_wire_version;

        // A report from a different replica set tells us nothing about this one.
        let conflicting_set_name = matches!(
            (description.set_name.as_deref(), state.set_name.as_deref()),
            (Some(reported), Some(recorded)) if reported != recorded
        );
        let description = if conflicting_set_name {
            tracing::debug!(
                reported = ?description.set_name,
                recorded = ?state.set_name,
                "Server belongs to another replica set. Resetting it."
            );
            ServerDescription::new(address.clone())
        } else {
            description
        };
        let server_type = description.server_type;

        if description.max_wire_version != 0 {
            common_wire_version = Some(match common_wire_version {
                Some(common) => common.min(description.max_wire_version),
                None => description.max_wire_version,
            });
        }

        let mut servers = self.servers.clone();
        servers.insert(address.clone(), description.clone());

        if state.topology_type == TopologyType::Single {
            return Ok(self.derive(state, servers, common_wire_version));
        }

        if state.topology_type == TopologyType::Unknown {
            if server_type == ServerType::Standalone && self.servers.len() != 1 {
                tracing::debug!("Dropping standalone server found among several seeds.");
                servers.remove(&address);
            } else {
                state.topology_type = TopologyType::for_server_type(server_type);
            }
        }

        // A type resolved just above is handled by its own rules in the same step.
        match state.topology_type {
            TopologyType::Sharded => {
                if !matches!(server_type, ServerType::Mongos | ServerType::Unknown) {
                    tracing::debug!("Dropping {} server from a sharded topology.", server_type);
                    servers.remove(&address);
                }
            }
            TopologyType::ReplicaSetNoPrimary => {
                if matches!(server_type, ServerType::Standalone | ServerType::Mongos) {
                    tracing::debug!("Dropping {} server from a replica set.", server_type);
                    servers.remove(&address);
                } else if server_type == ServerType::RSPrimary {
                    state = replica_set::update_from_primary(&mut servers, state, &description);
                } else if server_type.is_replica_set_member() {
                    state = replica_set::update_no_primary_from_member(
                        &mut servers,
                        state,
                        &description,
                    );
                }
            }
            TopologyType::ReplicaSetWithPrimary => {
                if matches!(server_type, ServerType::Standalone | ServerType::Mongos) {
                    tracing::debug!("Dropping {} server from a replica set.", server_type);
                    servers.remove(&address);
                    state.topology_type = replica_set::check_has_primary(&servers);
                } else if server_type == ServerType::RSPrimary {
                    state = replica_set::update_from_primary(&mut servers, state, &description);
                } else if server_type.is_replica_set_member() {
                    state = replica_set::update_with_primary_from_member(
                        &mut servers,
                        state,
                        &description,
                    )?;
                } else {
                    state.topology_type = replica_set::check_has_primary(&servers);
                }
            }
            TopologyType::Unknown | TopologyType::Single => {}
        }

        if state.topology_type != self.topology_type {
            tracing::debug!(
                "Topology type changed from {} to {}",
                self.topology_type,
                state.topology_type
            );
        }

        Ok(self.derive(state, servers, common_wire_version))
    }

    /// Returns a snapshot whose membership matches a fresh SRV lookup.
    ///
    /// Addresses no longer resolved are removed and new ones are added as unknown servers. The
    /// topology type and replica set bookkeeping carry over unchanged. When nothing changed the
    /// same `Arc` is returned, so callers can skip republishing with [`Arc::ptr_eq`].
    #[instrument(level = "debug", name = "Topology Description - SRV Update", skip_all)]
    pub fn update_from_srv_polling_event(self: &Arc<Self>, event: &SrvPollingEvent) -> Arc<Self> {
        let addresses = event.addresses();
        let removed = self
            .servers
            .keys()
            .filter(|address| !addresses.contains(*address))
            .cloned()
            .collect::<Vec<_>>();
        let added = addresses
            .iter()
            .filter(|address| !self.servers.contains_key(*address))
            .cloned()
            .collect::<Vec<_>>();

        if removed.is_empty() && added.is_empty() {
            tracing::trace!("SRV records unchanged.");
            return Arc::clone(self);
        }

        tracing::debug!(
            removed = removed.len(),
            added = added.len(),
            "Applying SRV membership change."
        );

        let mut servers = self.servers.clone();
        for address in &removed {
            servers.remove(address);
        }
        for address in added {
            servers.insert(address.clone(), ServerDescription::new(address));
        }

        Arc::new(Self::new(
            self.topology_type,
            servers,
            self.set_name.clone(),
            self.max_set_version,
            self.max_election_id.clone(),
            self.common_wire_version,
            self.options.clone(),
        ))
    }

    fn derive(
        &self,
        state: ReplicaSetUpdate,
        servers: ServerMap,
        common_wire_version: Option<i32>,
    ) -> TopologyDescription {
        Self::new(
            state.topology_type,
            servers,
            state.set_name,
            state.max_set_version,
            state.max_election_id,
            common_wire_version,
            self.options.clone(),
        )
    }
}

// Queries
impl TopologyDescription {
    /// The first heartbeat error recorded on any server, in address order.
    pub fn error(&self) -> Option<&HeartbeatError> {
        self.servers.values().find_map(|server| server.error.as_ref())
    }

    pub fn has_known_servers(&self) -> bool {
        self.servers
            .values()
            .any(|server| server.server_type != ServerType::Unknown)
    }

    pub fn has_data_bearing_servers(&self) -> bool {
        self.servers.values().any(ServerDescription::is_data_bearing)
    }

    pub fn has_server(&self, address: &ServerAddress) -> bool {
        self.servers.contains_key(address)
    }

    pub fn server(&self, address: &ServerAddress) -> Option<&ServerDescription> {
        self.servers.get(address)
    }
}

// Getters
impl TopologyDescription {
    pub fn topology_type(&self) -> TopologyType {
        self.topology_type
    }

    pub fn servers(&self) -> &ServerMap {
        &self.servers
    }

    pub fn set_name(&self) -> Option<&str> {
        self.set_name.as_deref()
    }

    pub fn max_set_version(&self) -> Option<i32> {
        self.max_set_version
    }

    pub fn max_election_id(&self) -> Option<&ElectionId> {
        self.max_election_id.as_ref()
    }

    pub fn common_wire_version(&self) -> Option<i32> {
        self.common_wire_version
    }

    pub fn compatible(&self) -> bool {
        self.compatible
    }

    pub fn compatibility_error(&self) -> Option<&str> {
        self.compatibility_error.as_deref()
    }

    pub fn logical_session_timeout_minutes(&self) -> Option<u32> {
        self.logical_session_timeout_minutes
    }

    /// Reserved, always `false`.
    pub fn stale(&self) -> bool {
        self.stale
    }

    pub fn heartbeat_frequency_ms(&self) -> u64 {
        self.options.heartbeat_frequency_ms()
    }

    pub fn local_threshold_ms(&self) -> u64 {
        self.options.local_threshold_ms()
    }

    pub fn options(&self) -> &TopologyOptions {
        &self.options
    }
}

/// Smallest session timeout among readable servers. Unset if there are none, or if any of them
/// doesn't report one.
fn logical_session_timeout(servers: &ServerMap) -> Option<u32> {
    servers
        .values()
        .filter(|server| server.is_readable())
        .try_fold(None, |smallest: Option<u32>, server| {
            let timeout = server.logical_session_timeout_minutes?;
            Some(Some(smallest.map_or(timeout, |smallest| smallest.min(timeout))))
        })
        .flatten()
}
