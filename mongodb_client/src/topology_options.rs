pub const DEFAULT_HEARTBEAT_FREQUENCY_MS: u64 = 10_000;
pub const DEFAULT_LOCAL_THRESHOLD_MS: u64 = 15;

/// Static configuration captured by a topology when it is created. Never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologyOptions {
    heartbeat_frequency_ms: u64,
    local_threshold_ms: u64,
    replica_set_name: Option<String>,
    direct_connection: bool,
}

impl Default for TopologyOptions {
    fn default() -> Self {
        Self {
            heartbeat_frequency_ms: DEFAULT_HEARTBEAT_FREQUENCY_MS,
            local_threshold_ms: DEFAULT_LOCAL_THRESHOLD_MS,
            replica_set_name: None,
            direct_connection: false,
        }
    }
}

// Mutators
impl TopologyOptions {
    pub fn with_heartbeat_frequency_ms(mut self, heartbeat_frequency_ms: u64) -> Self {
        self.heartbeat_frequency_ms = heartbeat_frequency_ms;
        self
    }

    pub fn with_local_threshold_ms(mut self, local_threshold_ms: u64) -> Self {
        self.local_threshold_ms = local_threshold_ms;
        self
    }

    pub fn with_replica_set_name(mut self, replica_set_name: &str) -> Self {
        self.replica_set_name = Some(replica_set_name.to_string());
        self
    }

    pub fn with_direct_connection(mut self, direct_connection: bool) -> Self {
        self.direct_connection = direct_connection;
        self
    }
}

// Getters
impl TopologyOptions {
    pub fn heartbeat_frequency_ms(&self) -> u64 {
        self.heartbeat_frequency_ms
    }

    pub fn local_threshold_ms(&self) -> u64 {
        self.local_threshold_ms
    }

    pub fn replica_set_name(&self) -> Option<&str> {
        self.replica_set_name.as_deref()
    }

    pub fn direct_connection(&self) -> bool {
        self.direct_connection
    }
}
