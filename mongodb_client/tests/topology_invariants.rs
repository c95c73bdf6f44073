mod helpers;

use mongodb_client::{
    ElectionId, ServerAddress, ServerDescription, ServerType, TopologyDescription,
    TopologyOptions, TopologyType,
};
use proptest::{collection::vec, prelude::*, sample::subsequence};

const HOSTS: [&str; 3] = ["a:27017", "b:27017", "c:27017"];

fn address_strategy() -> impl Strategy<Value = ServerAddress> {
    prop::sample::select(HOSTS.to_vec()).prop_map(helpers::address)
}

fn server_type_strategy() -> impl Strategy<Value = ServerType> {
    prop::sample::select(vec![
        ServerType::Unknown,
        ServerType::Standalone,
        ServerType::Mongos,
        ServerType::RSPrimary,
        ServerType::RSSecondary,
        ServerType::RSArbiter,
        ServerType::RSOther,
        ServerType::RSGhost,
    ])
}

/// Heartbeat results as a monitor could produce them: replica set roles always carry a set name.
fn description_strategy() -> impl Strategy<Value = ServerDescription> {
    (
        address_strategy(),
        server_type_strategy(),
        prop::sample::select(vec!["rs0", "rs1"]),
        prop::option::of(1..4i32),
        prop::option::of(0..4u8),
        subsequence(HOSTS.to_vec(), 0..=HOSTS.len()),
        prop::option::of(address_strategy()),
    )
        .prop_map(
            |(address, server_type, set_name, set_version, election, hosts, me)| {
                let is_replica_set = matches!(
                    server_type,
                    ServerType::RSPrimary
                        | ServerType::RSSecondary
                        | ServerType::RSArbiter
                        | ServerType::RSOther
                );
                let mut description = ServerDescription::new(address);
                description.server_type = server_type;
                if server_type != ServerType::Unknown {
                    description.max_wire_version = 9;
                }
                if is_replica_set {
                    description.set_name = Some(set_name.to_string());
                    description.set_version = set_version;
                    description.election_id = election.map(|byte| ElectionId::from([byte; 12]));
                    description.hosts = hosts.into_iter().map(helpers::address).collect();
                    description.me = me;
                }
                description
            },
        )
}

fn primaries(topology: &TopologyDescription) -> usize {
    topology
        .servers()
        .values()
        .filter(|server| server.server_type == ServerType::RSPrimary)
        .count()
}

proptest! {
    #[test]
    fn never_more_than_one_primary(
        replica_set_name in prop::option::of(Just("rs0")),
        updates in vec(description_strategy(), 1..40)
    ) {
        let mut options = TopologyOptions::default();
        if let Some(name) = replica_set_name {
            options = options.with_replica_set_name(name);
        }
        let mut topology = TopologyDescription::from_seeds(
            HOSTS.iter().map(|host| helpers::address(host)),
            options,
        );

        for update in updates {
            topology = topology.update(update);

            prop_assert!(primaries(&topology) <= 1);
            if topology.topology_type() == TopologyType::ReplicaSetWithPrimary {
                prop_assert_eq!(primaries(&topology), 1);
                prop_assert!(topology.set_name().is_some());
            }
        }
    }

    #[test]
    fn single_topology_is_sticky(updates in vec(description_strategy(), 1..40)) {
        let mut topology = TopologyDescription::from_seeds(
            [helpers::address("a:27017")],
            TopologyOptions::default().with_direct_connection(true),
        );

        for update in updates {
            topology = topology.update(update);

            prop_assert_eq!(topology.topology_type(), TopologyType::Single);
        }
    }

    #[test]
    fn reapplying_a_description_changes_nothing(
        updates in vec(description_strategy(), 1..20),
        last in description_strategy()
    ) {
        let mut topology = TopologyDescription::from_seeds(
            HOSTS.iter().map(|host| helpers::address(host)),
            TopologyOptions::default(),
        );
        for update in updates {
            topology = topology.update(update);
        }

        let once = topology.update(last.clone());
        let twice = once.update(last);

        prop_assert_eq!(once.topology_type(), twice.topology_type());
        prop_assert_eq!(primaries(&once), primaries(&twice));
    }
}
