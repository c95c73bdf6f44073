use std::sync::Arc;

use tokio::sync::oneshot;

use crate::{ServerDescription, SrvPollingEvent, TopologyDescription};

/// How many monitoring events a slow subscriber may lag behind before it starts missing some.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug)]
pub enum TopologyMessage {
    /// Folds one heartbeat result into the current snapshot.
    ApplyServerDescription {
        description: ServerDescription,
        respond_to: oneshot::Sender<Arc<TopologyDescription>>,
    },
    /// Reconciles the current snapshot with a fresh SRV lookup.
    ApplySrvPollingEvent {
        event: SrvPollingEvent,
        respond_to: oneshot::Sender<Arc<TopologyDescription>>,
    },
}
