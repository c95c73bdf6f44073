use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::instrument;

use crate::{
    events::TopologyEvent, run_topology_actor, ServerDescription, SrvPollingEvent,
    TopologyActor, TopologyBuilder, TopologyDescription, TopologyError, TopologyMessage,
    EVENT_CHANNEL_CAPACITY,
};

/**
This a handle to the topology actor.

Only one topology should exist per deployment. Cloning this handle is cheap and will not
instantiate a new actor in the background; give a clone to every monitoring task and every
component that reads the topology. When the last handle is dropped, the backing actor stops.

Reads never wait on the actor: [`Topology::description`] returns the latest published snapshot.
Writes are queued and applied one at a time.

```rust
# tokio_test::block_on(async {
use mongodb_client::{ServerDescription, ServerType, TopologyBuilder, TopologyType};

let topology = TopologyBuilder::new()
    .set_seeds(&["a:27017", "b:27017"])
    .build()
    .unwrap();

let mongos = ServerDescription {
    server_type: ServerType::Mongos,
    max_wire_version: 9,
    ..ServerDescription::new("a:27017".parse().unwrap())
};
let snapshot = topology.apply_server_description(mongos).await.unwrap();

assert_eq!(snapshot.topology_type(), TopologyType::Sharded);
# })
```
*/
#[derive(Clone, Debug)]
pub struct Topology {
    sender: mpsc::Sender<TopologyMessage>,
    description: watch::Receiver<Arc<TopologyDescription>>,
    events: broadcast::Sender<TopologyEvent>,
}

impl Topology {
    pub fn builder() -> TopologyBuilder {
        TopologyBuilder::default()
    }

    // This is pub(crate) so only the builder can crank it out
    pub(crate) fn new(initial_description: TopologyDescription) -> Self {
        let (sender, receiver) = mpsc::channel(8);
        let (description_sender, description) = watch::channel(Arc::new(initial_description));
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let actor = TopologyActor::new(receiver, description_sender, events.clone());
        tokio::spawn(run_topology_actor(actor));

        Self {
            sender,
            description,
            events,
        }
    }

    /// Applies one heartbeat result and returns the snapshot it produced, once published.
    #[instrument(
        level = "debug",
        name = "Topology Handle - Apply Server Description",
        skip(self, description),
        fields(server = %description.address)
    )]
    pub async fn apply_server_description(
        &self,
        description: ServerDescription,
    ) -> Result<Arc<TopologyDescription>, TopologyError> {
        let (tx, rx) = oneshot::channel();
        self.send(TopologyMessage::ApplyServerDescription {
            description,
            respond_to: tx,
        })
        .await?;
        rx.await.map_err(|_| actor_stopped())
    }

    /// Applies a fresh SRV lookup and returns the resulting snapshot. When membership didn't
    /// change this is the snapshot that was already published.
    #[instrument(
        level = "debug",
        name = "Topology Handle - Apply SRV Polling Event",
        skip(self)
    )]
    pub async fn apply_srv_polling_event(
        &self,
        event: SrvPollingEvent,
    ) -> Result<Arc<TopologyDescription>, TopologyError> {
        let (tx, rx) = oneshot::channel();
        self.send(TopologyMessage::ApplySrvPollingEvent {
            event,
            respond_to: tx,
        })
        .await?;
        rx.await.map_err(|_| actor_stopped())
    }

    /// The latest published snapshot.
    pub fn description(&self) -> Arc<TopologyDescription> {
        Arc::clone(&*self.description.borrow())
    }

    /// A receiver that is notified every time a new snapshot is published.
    pub fn watch(&self) -> watch::Receiver<Arc<TopologyDescription>> {
        self.description.clone()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<TopologyEvent> {
        self.events.subscribe()
    }

    async fn send(&self, msg: TopologyMessage) -> Result<(), TopologyError> {
        tracing::trace!("Sending message to actor");
        self.sender.send(msg).await.map_err(|_| actor_stopped())
    }
}

fn actor_stopped() -> TopologyError {
    tracing::error!("Topology actor task has been killed");
    TopologyError::ActorStopped
}
