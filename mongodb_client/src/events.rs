//! Monitoring events published by a [`Topology`](crate::Topology) whenever its snapshot changes.

use std::sync::Arc;

use crate::{ServerAddress, ServerDescription, TopologyDescription};

#[derive(Clone, Debug)]
pub enum TopologyEvent {
    /// A server joined the topology.
    ServerOpening { address: ServerAddress },
    /// A server left the topology.
    ServerClosed { address: ServerAddress },
    ServerDescriptionChanged {
        address: ServerAddress,
        previous: Box<ServerDescription>,
        new: Box<ServerDescription>,
    },
    TopologyDescriptionChanged {
        previous: Arc<TopologyDescription>,
        new: Arc<TopologyDescription>,
    },
}

/// Lists the events that describe going from `previous` to `new`: server changes first, in
/// address order, then the topology change itself.
pub(crate) fn diff(
    previous: &Arc<TopologyDescription>,
    new: &Arc<TopologyDescription>,
) -> Vec<TopologyEvent> {
    if previous == new {
        return Vec::new();
    }

    let mut events = Vec::new();

    for (address, server) in new.servers() {
        match previous.server(address) {
            Some(old) if old != server => events.push(TopologyEvent::ServerDescriptionChanged {
                address: address.clone(),
                previous: Box::new(old.clone()),
                new: Box::new(server.clone()),
            }),
            Some(_) => {}
            None => events.push(TopologyEvent::ServerOpening {
                address: address.clone(),
            }),
        }
    }

    for address in previous.servers().keys() {
        if !new.has_server(address) {
            events.push(TopologyEvent::ServerClosed {
                address: address.clone(),
            });
        }
    }

    events.push(TopologyEvent::TopologyDescriptionChanged {
        previous: Arc::clone(previous),
        new: Arc::clone(new),
    });

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ServerType, TopologyOptions};

    fn address(s: &str) -> ServerAddress {
        s.parse().unwrap()
    }

    #[test]
    fn identical_snapshots_produce_no_events() {
        let topology = Arc::new(TopologyDescription::from_seeds(
            [address("a:1")],
            TopologyOptions::default(),
        ));

        assert!(diff(&topology, &topology.clone()).is_empty());
    }

    #[test]
    fn diff_reports_server_and_topology_changes() {
        // Arrange
        let previous = Arc::new(TopologyDescription::from_seeds(
            [address("a:1"), address("b:1")],
            TopologyOptions::default(),
        ));
        let primary = ServerDescription {
            server_type: ServerType::RSPrimary,
            set_name: Some("rs0".to_string()),
            max_wire_version: 9,
            hosts: [address("a:1"), address("c:1")].into(),
            ..ServerDescription::new(address("a:1"))
        };

        // Act
        let new = Arc::new(previous.update(primary));
        let events = diff(&previous, &new);

        // Assert
        assert_eq!(events.len(), 4);
        assert!(matches!(
            &events[0],
            TopologyEvent::ServerDescriptionChanged { address: a, .. } if a == &address("a:1")
        ));
        assert!(matches!(
            &events[1],
            TopologyEvent::ServerOpening { address: a } if a == &address("c:1")
        ));
        assert!(matches!(
            &events[2],
            TopologyEvent::ServerClosed { address: a } if a == &address("b:1")
        ));
        assert!(matches!(&events[3], TopologyEvent::TopologyDescriptionChanged { .. }));
    }
}
