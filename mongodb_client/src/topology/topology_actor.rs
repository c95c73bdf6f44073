use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, watch};
use tracing::{instrument, Span};
use uuid::Uuid;

use crate::{
    events::{self, TopologyEvent},
    TopologyDescription, TopologyError, TopologyMessage,
};

/// The single writer of a topology.
///
/// Messages are applied strictly one at a time, each producing a new snapshot that replaces the
/// published one in a single swap. Readers holding the previous snapshot keep a valid,
/// consistent value.
pub struct TopologyActor {
    receiver: mpsc::Receiver<TopologyMessage>,
    description: watch::Sender<Arc<TopologyDescription>>,
    events: broadcast::Sender<TopologyEvent>,
}
impl TopologyActor {
    pub fn new(
        receiver: mpsc::Receiver<TopologyMessage>,
        description: watch::Sender<Arc<TopologyDescription>>,
        events: broadcast::Sender<TopologyEvent>,
    ) -> Self {
        Self {
            receiver,
            description,
            events,
        }
    }

    /// Message handler for the TopologyActor
    #[instrument(
        level = "debug",
        name = "Topology Actor - Handle Message",
        skip(self),
        fields(correlation_id)
    )]
    fn handle_message(&mut self, msg: TopologyMessage) -> Result<(), TopologyError> {
        // Apply a correlation id to all child spans of this message handler
        let correlation_id = Uuid::new_v4().to_string();
        Span::current().record("correlation_id", correlation_id.as_str());

        let current = Arc::clone(&*self.description.borrow());
        match msg {
            TopologyMessage::ApplyServerDescription {
                description,
                respond_to,
            } => {
                let updated = Arc::new(current.try_update(description)?);
                self.publish(&current, &updated);
                let _ = respond_to.send(updated);
            }
            TopologyMessage::ApplySrvPollingEvent { event, respond_to } => {
                let updated = current.update_from_srv_polling_event(&event);
                if Arc::ptr_eq(&current, &updated) {
                    tracing::trace!("SRV polling changed nothing, skipping publish.");
                } else {
                    self.publish(&current, &updated);
                }
                let _ = respond_to.send(updated);
            }
        }

        Ok(())
    }

    fn publish(&self, previous: &Arc<TopologyDescription>, updated: &Arc<TopologyDescription>) {
        self.description.send_replace(Arc::clone(updated));

        // Nobody listening for events is fine.
        for event in events::diff(previous, updated) {
            let _ = self.events.send(event);
        }

        tracing::debug!(
            topology_type = %updated.topology_type(),
            servers = updated.servers().len(),
            "Published topology description."
        );
    }
}

#[instrument(level = "debug", name = "Running Topology Actor", skip(actor))]
pub async fn run_topology_actor(mut actor: TopologyActor) {
    while let Some(msg) = actor.receiver.recv().await {
        if let Err(e) = actor.handle_message(msg) {
            tracing::error!("Topology actor is stopping. Caused by: {}", e);
            break;
        }
    }
}
