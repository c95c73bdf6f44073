use mongodb_client::{
    events::TopologyEvent, ElectionId, HelloReply, ServerDescription, SrvPollingEvent,
    TopologyBuilder,
};
use tracing::subscriber::set_global_default;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

/// Walks a three member replica set through discovery, an election and an SRV change, printing
/// every event the topology publishes.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing();
    let set_name = std::env::var("MONGODB_REPLICA_SET").unwrap_or_else(|_| "rs0".to_string());
    let hosts = ["a.example.com:27017", "b.example.com:27017", "c.example.com:27017"];

    let topology = TopologyBuilder::new()
        .set_seeds(&hosts[..2])
        .set_replica_set_name(&set_name)
        .build()?;

    let mut events = topology.subscribe_events();
    let printer = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                TopologyEvent::ServerOpening { address } => println!("+ {}", address),
                TopologyEvent::ServerClosed { address } => println!("- {}", address),
                TopologyEvent::ServerDescriptionChanged { address, previous, new } => {
                    println!("~ {}: {} -> {}", address, previous.server_type, new.server_type)
                }
                TopologyEvent::TopologyDescriptionChanged { previous, new } => println!(
                    "= {} -> {}",
                    previous.topology_type(),
                    new.topology_type()
                ),
            }
        }
    });

    let primary = |set_version: i32, election: u8| HelloReply {
        ok: 1.0,
        is_writable_primary: Some(true),
        set_name: Some(set_name.clone()),
        set_version: Some(set_version),
        election_id: Some(ElectionId::from([election; 12])),
        hosts: hosts.iter().map(ToString::to_string).collect(),
        max_wire_version: 9,
        logical_session_timeout_minutes: Some(30),
        ..Default::default()
    };

    topology
        .apply_server_description(ServerDescription::from_hello(hosts[0].parse()?, &primary(1, 1)))
        .await?;
    let snapshot = topology
        .apply_server_description(ServerDescription::from_hello(hosts[1].parse()?, &primary(1, 2)))
        .await?;
    tracing::info!(
        topology_type = %snapshot.topology_type(),
        servers = snapshot.servers().len(),
        "Election observed."
    );

    let snapshot = topology
        .apply_srv_polling_event(SrvPollingEvent::from_records(&[
            ("b.example.com.", 27017),
            ("c.example.com.", 27017),
        ])?)
        .await?;
    println!("{:#?}", snapshot.servers().keys().collect::<Vec<_>>());

    // Dropping the last handle stops the actor, which closes the event stream.
    drop(topology);
    printer.await?;

    Ok(())
}

fn setup_tracing() {
    // Redirect all `log`'s events to the subscriber
    LogTracer::init().expect("Failed to set logger");
    // Set up tracing
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let formatting_layer = BunyanFormattingLayer::new("mongodb_client-demo".into(), std::io::stdout);
    let subscriber = Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer);
    set_global_default(subscriber).expect("Failed to set subscriber");
}
