mod command;
mod config;
mod connection;
mod model;
mod transport;

use anyhow::Context;
use command::Dispatcher;
use config::{AgentConfig, TransportConfig};
use connection::ConnectionManager;
use model::predicate::is_a;
use model::{ChannelSink, ModelUpdater};
use std::sync::Arc;
use transport::{SerialConnector, TcpConnector, TransportConnector};
use zwave_protocol::CommandRegistry;

use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Capability namespaces broken out in the periodic stats line
const REPORTED_CAPABILITIES: &[&str] = &["devpow", "swit", "temp", "humid", "illum", "notif", "wkup"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = AgentConfig::from_env()?;

    // A clash in the command table is a build defect, not a runtime condition
    let registry = Arc::new(
        CommandRegistry::standard().context("Invalid standard command table")?,
    );
    info!("Z-Wave agent starting with {} registered commands", registry.len());
    info!("  forward timeout: {:?}", config.forward_timeout);
    info!("  model queue: {}", config.queue_capacity);

    let (update_tx, update_rx) = tokio::sync::mpsc::channel(config.queue_capacity);
    let updater = ModelUpdater::new();
    let devices = updater.devices();
    tokio::spawn(updater.run(update_rx));

    let dispatcher = Arc::new(Dispatcher::new(
        registry,
        Arc::new(ChannelSink::new(update_tx)),
        config.forward_timeout,
    ));

    // Periodic stats
    let stats = dispatcher.stats();
    let stats_interval = config.stats_interval;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(stats_interval);
        interval.tick().await;
        loop {
            interval.tick().await;
            let snapshot = stats.snapshot();
            let (nodes, capabilities) = {
                let devices = devices.read().await;
                let capabilities: Vec<String> = REPORTED_CAPABILITIES
                    .iter()
                    .map(|&ns| format!("{}={}", ns, devices.count_matching(is_a(ns))))
                    .collect();
                (devices.len(), capabilities.join(" "))
            };
            info!(
                "Stats: dispatched={} dropped={} (unknown={} truncated={} malformed={} timeouts={}) nodes={} [{}]",
                snapshot.dispatched,
                snapshot.dropped(),
                snapshot.unknown,
                snapshot.truncated,
                snapshot.malformed,
                snapshot.forward_timeouts,
                nodes,
                capabilities
            );
        }
    });

    match config.transport.clone() {
        TransportConfig::Serial { path, baud_rate } => {
            run(SerialConnector::new(path, baud_rate), dispatcher, &config).await
        }
        TransportConfig::Tcp { address } => run(TcpConnector::new(address), dispatcher, &config).await,
    }

    Ok(())
}

async fn run<C: TransportConnector>(connector: C, dispatcher: Arc<Dispatcher>, config: &AgentConfig) {
    info!("  controller: {}", connector.describe());
    let manager = ConnectionManager::new(
        connector,
        dispatcher,
        config.reconnect_delay,
        config.read_buffer_size,
    );
    manager.run().await;
}
