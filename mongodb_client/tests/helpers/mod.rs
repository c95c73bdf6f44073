#![allow(dead_code)]

use std::sync::Arc;

use mongodb_client::{
    ElectionId, HelloReply, ServerAddress, ServerDescription, Topology, TopologyBuilder,
};
use once_cell::sync::Lazy;
use tracing::subscriber::set_global_default;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

// Logs are noisy, so they're only emitted when TEST_LOG is set.
static TRACING: Lazy<()> = Lazy::new(|| {
    if std::env::var("TEST_LOG").is_err() {
        return;
    }

    LogTracer::init().expect("Failed to set logger");
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let formatting_layer = BunyanFormattingLayer::new("mongodb_client-tests".into(), std::io::stdout);
    let subscriber = Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer);
    set_global_default(subscriber).expect("Failed to set subscriber");
});

pub fn init_tracing() {
    Lazy::force(&TRACING);
}

pub fn address(s: &str) -> ServerAddress {
    s.parse().unwrap()
}

pub fn spawn_topology(seeds: &[&str], replica_set_name: Option<&str>) -> Topology {
    init_tracing();
    let mut builder = TopologyBuilder::new().set_seeds(seeds);
    if let Some(name) = replica_set_name {
        builder = builder.set_replica_set_name(name);
    }
    builder.build().unwrap()
}

pub fn primary_reply(set_name: &str, hosts: &[&str], set_version: i32, election: u8) -> HelloReply {
    HelloReply {
        ok: 1.0,
        is_writable_primary: Some(true),
        set_name: Some(set_name.to_string()),
        set_version: Some(set_version),
        election_id: Some(ElectionId::from([election; 12])),
        hosts: hosts.iter().map(ToString::to_string).collect(),
        max_wire_version: 9,
        logical_session_timeout_minutes: Some(30),
        ..Default::default()
    }
}

pub fn secondary_reply(set_name: &str, hosts: &[&str]) -> HelloReply {
    HelloReply {
        ok: 1.0,
        is_writable_primary: Some(false),
        secondary: Some(true),
        set_name: Some(set_name.to_string()),
        hosts: hosts.iter().map(ToString::to_string).collect(),
        max_wire_version: 9,
        logical_session_timeout_minutes: Some(30),
        ..Default::default()
    }
}

pub fn describe(server: &str, reply: &HelloReply) -> ServerDescription {
    ServerDescription::from_hello(address(server), reply)
}

pub fn addresses_of(description: &Arc<mongodb_client::TopologyDescription>) -> Vec<String> {
    description
        .servers()
        .keys()
        .map(ToString::to_string)
        .collect()
}
