//! Replica set bookkeeping: which reports to trust, which servers to demote, and how membership
//! follows the primary's host list.

use crate::{ElectionId, ServerDescription, ServerType, TopologyError};

use super::{ServerMap, TopologyType};

/// Everything a replica set rule may change besides the server map.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ReplicaSetUpdate {
    pub(crate) topology_type: TopologyType,
    pub(crate) set_name: Option<String>,
    pub(crate) max_set_version: Option<i32>,
    pub(crate) max_election_id: Option<ElectionId>,
}

/// Absorbs a report from a server claiming to be primary.
///
/// A claim older than the freshest one seen so far, by set version and then election id, resets
/// the claimant to unknown. An accepted claim demotes the previous primary and makes the
/// reported host list the authoritative membership.
pub(crate) fn update_from_primary(
    servers: &mut ServerMap,
    mut state: ReplicaSetUpdate,
    primary: &ServerDescription,
) -> ReplicaSetUpdate {
    let address = &primary.address;

    if state.set_name.is_none() {
        state.set_name = primary.set_name.clone();
    }
    if state.set_name != primary.set_name {
        tracing::debug!(server = %address, "Primary reported a different set name. Dropping it.");
        servers.remove(address);
        state.topology_type = check_has_primary(servers);
        return state;
    }

    if let (Some(set_version), Some(election_id)) = (primary.set_version, &primary.election_id) {
        if let (Some(max_set_version), Some(max_election_id)) =
            (state.max_set_version, &state.max_election_id)
        {
            if max_set_version > set_version || max_election_id > election_id {
                tracing::debug!(
                    server = %address,
                    set_version,
                    %election_id,
                    max_set_version,
                    %max_election_id,
                    "Primary is stale. Resetting it."
                );
                servers.insert(address.clone(), ServerDescription::new(address.clone()));
                state.topology_type = check_has_primary(servers);
                return state;
            }
        }

        state.max_election_id = Some(election_id.clone());
    }

    if let Some(set_version) = primary.set_version {
        if state.max_set_version.map_or(true, |max| set_version > max) {
            state.max_set_version = Some(set_version);
        }
    }

    // Only one primary can exist, so the first other one found is the previous primary.
    let previous_primary = servers
        .values()
        .find(|server| server.server_type == ServerType::RSPrimary && &server.address != address)
        .map(|server| server.address.clone());
    if let Some(previous) = previous_primary {
        tracing::debug!(server = %previous, "Demoting previous primary.");
        servers.insert(previous.clone(), ServerDescription::new(previous));
    }

    for host in &primary.hosts {
        if !servers.contains_key(host) {
            tracing::debug!(server = %host, "Discovered replica set member.");
            servers.insert(host.clone(), ServerDescription::new(host.clone()));
        }
    }

    servers.retain(|known, _| {
        let reported = primary.hosts.contains(known);
        if !reported {
            tracing::debug!(server = %known, "Primary no longer reports server. Removing it.");
        }
        reported
    });

    state.topology_type = check_has_primary(servers);
    state
}

/// Absorbs a report from a secondary, arbiter or other member while no primary is known.
///
/// New hosts are discovered, but without a primary nothing is pruned.
pub(crate) fn update_no_primary_from_member(
    servers: &mut ServerMap,
    mut state: ReplicaSetUpdate,
    member: &ServerDescription,
) -> ReplicaSetUpdate {
    state.topology_type = TopologyType::ReplicaSetNoPrimary;

    if state.set_name.is_none() {
        state.set_name = member.set_name.clone();
    }
    if state.set_name != member.set_name {
        tracing::debug!(server = %member.address, "Member reported a different set name. Dropping it.");
        servers.remove(&member.address);
        return state;
    }

    for host in &member.hosts {
        if !servers.contains_key(host) {
            tracing::debug!(server = %host, "Discovered replica set member.");
            servers.insert(host.clone(), ServerDescription::new(host.clone()));
        }
    }

    if member.reports_different_me() {
        tracing::debug!(server = %member.address, "Member reported a different `me`. Dropping it.");
        servers.remove(&member.address);
    }

    state
}

/// Absorbs a report from a secondary, arbiter or other member while a primary is known.
///
/// A known primary means a set name was recorded; when it wasn't, the snapshot chain is broken
/// and [`TopologyError::MissingSetName`] is returned.
pub(crate) fn update_with_primary_from_member(
    servers: &mut ServerMap,
    mut state: ReplicaSetUpdate,
    member: &ServerDescription,
) -> Result<ReplicaSetUpdate, TopologyError> {
    let set_name = match state.set_name.as_deref() {
        Some(set_name) => set_name,
        None => {
            return Err(TopologyError::MissingSetName {
                address: member.address.clone(),
            })
        }
    };

    if member.set_name.as_deref() != Some(set_name) || member.reports_different_me() {
        tracing::debug!(server = %member.address, "Member doesn't belong to this replica set. Dropping it.");
        servers.remove(&member.address);
    }

    state.topology_type = check_has_primary(servers);
    Ok(state)
}

pub(crate) fn check_has_primary(servers: &ServerMap) -> TopologyType {
    if servers
        .values()
        .any(|server| server.server_type == ServerType::RSPrimary)
    {
        TopologyType::ReplicaSetWithPrimary
    } else {
        TopologyType::ReplicaSetNoPrimary
    }
}
