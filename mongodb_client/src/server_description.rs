use std::{collections::BTreeSet, fmt};

use crate::{error_chain_fmt, ElectionId, HelloReply, ServerAddress};

/// The role a server reported in its latest heartbeat.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ServerType {
    #[default]
    Unknown,
    Standalone,
    Mongos,
    RSPrimary,
    RSSecondary,
    RSArbiter,
    RSOther,
    RSGhost,
    PossiblePrimary,
}

impl ServerType {
    pub fn is_readable(self) -> bool {
        matches!(
            self,
            ServerType::RSPrimary | ServerType::RSSecondary | ServerType::Standalone | ServerType::Mongos
        )
    }

    pub fn is_data_bearing(self) -> bool {
        matches!(
            self,
            ServerType::RSPrimary | ServerType::RSSecondary | ServerType::Standalone | ServerType::Mongos
        )
    }

    /// Secondaries, arbiters and other non-primary members of a replica set.
    pub fn is_replica_set_member(self) -> bool {
        matches!(
            self,
            ServerType::RSSecondary | ServerType::RSArbiter | ServerType::RSOther
        )
    }
}

impl fmt::Display for ServerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Why the latest heartbeat against a server failed.
#[derive(Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeartbeatError {
    #[error("Network error while checking the server: {0}")]
    Network(String),
    #[error("The server check timed out")]
    Timeout,
    #[error("The server check failed with code {code}: {message}")]
    CommandFailed { code: i32, message: String },
}
impl fmt::Debug for HeartbeatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Snapshot of one server's latest heartbeat result.
///
/// Descriptions are produced by the monitoring side and never modified once they are handed to
/// a [`TopologyDescription`](crate::TopologyDescription). When a server has to be demoted without
/// contacting it, it is replaced by [`ServerDescription::new`], the reset description.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerDescription {
    pub address: ServerAddress,
    pub server_type: ServerType,
    pub min_wire_version: i32,
    pub max_wire_version: i32,
    pub set_name: Option<String>,
    pub set_version: Option<i32>,
    pub election_id: Option<ElectionId>,
    /// The address the server believes it is reachable at.
    pub me: Option<ServerAddress>,
    /// Every replica set member the server reported.
    pub hosts: BTreeSet<ServerAddress>,
    pub logical_session_timeout_minutes: Option<u32>,
    pub error: Option<HeartbeatError>,
}

impl ServerDescription {
    /// Creates the reset description: `Unknown` type, no wire versions, nothing reported.
    pub fn new(address: ServerAddress) -> Self {
        Self {
            address,
            server_type: ServerType::Unknown,
            min_wire_version: 0,
            max_wire_version: 0,
            set_name: None,
            set_version: None,
            election_id: None,
            me: None,
            hosts: BTreeSet::new(),
            logical_session_timeout_minutes: None,
            error: None,
        }
    }

    /// Creates the description for a server whose heartbeat failed.
    pub fn from_error(address: ServerAddress, error: HeartbeatError) -> Self {
        Self {
            error: Some(error),
            ..Self::new(address)
        }
    }

    /// Creates the description for a server from its `hello` reply.
    ///
    /// Host entries that can't be parsed as addresses are skipped.
    pub fn from_hello(address: ServerAddress, reply: &HelloReply) -> Self {
        let hosts = reply
            .all_hosts()
            .filter_map(|host| match host.parse::<ServerAddress>() {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    tracing::warn!(server = %address, "Ignoring reported host. Caused by: {}", e);
                    None
                }
            })
            .collect();

        let me = reply.me.as_deref().and_then(|me| match me.parse::<ServerAddress>() {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!(server = %address, "Ignoring reported `me`. Caused by: {}", e);
                None
            }
        });

        Self {
            server_type: reply.server_type(),
            min_wire_version: reply.min_wire_version,
            max_wire_version: reply.max_wire_version,
            set_name: reply.set_name.clone(),
            set_version: reply.set_version,
            election_id: reply.election_id.clone(),
            me,
            hosts,
            logical_session_timeout_minutes: reply.logical_session_timeout_minutes,
            error: None,
            address,
        }
    }

    pub fn is_readable(&self) -> bool {
        self.server_type.is_readable()
    }

    pub fn is_data_bearing(&self) -> bool {
        self.server_type.is_data_bearing()
    }

    /// True when the server names itself with an address other than the one it was reached at.
    pub fn reports_different_me(&self) -> bool {
        self.me.as_ref().map(|me| me != &self.address).unwrap_or(false)
    }
}
