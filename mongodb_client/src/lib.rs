/*!
mongodb_client holds the cluster-membership engine of a MongoDB driver.

Monitoring tasks turn heartbeat replies into [`ServerDescription`]s. Each one is folded into
the current [`TopologyDescription`], which produces a brand-new, internally consistent snapshot
describing the whole deployment: a single node, a sharded cluster, or a replica set with or
without a primary. Stale primaries, contradictory server types and mismatched replica set names
are absorbed by demoting or dropping the offending server.

The engine itself is pure. The [`Topology`] actor wraps it for concurrent use: it is the single
writer that applies descriptions one at a time and publishes every snapshot so readers always
observe a complete one.

# Example
```rust
# tokio_test::block_on(async {
use mongodb_client::{HelloReply, ServerAddress, ServerDescription, TopologyBuilder, TopologyType};

let topology = TopologyBuilder::new()
    .set_seeds(&["localhost:27017"])
    .build()
    .unwrap();

let address: ServerAddress = "localhost:27017".parse().unwrap();
let reply = HelloReply {
    ok: 1.0,
    is_writable_primary: Some(true),
    max_wire_version: 9,
    ..Default::default()
};
topology
    .apply_server_description(ServerDescription::from_hello(address, &reply))
    .await
    .unwrap();

assert_eq!(topology.description().topology_type(), TopologyType::Single);
# })
```
*/

mod election_id;
mod hello_reply;
mod server_address;
mod server_description;
mod srv_polling;
mod topology;
mod topology_description;
mod topology_options;

pub mod auth;
pub mod compatibility;
pub mod events;

pub use election_id::*;
pub use hello_reply::*;
pub use server_address::*;
pub use server_description::*;
pub use srv_polling::*;
pub use topology::*;
pub use topology_description::*;
pub use topology_options::*;

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
