//! Connection manager with automatic reconnection to the controller

use super::session::Session;
use crate::command::Dispatcher;
use crate::transport::TransportConnector;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

/// Keeps one session open against a connector, reopening it after loss
pub struct ConnectionManager<C> {
    connector: C,
    dispatcher: Arc<Dispatcher>,
    reconnect_delay: Duration,
    read_buffer_size: usize,
    session_id: AtomicU64,
}

impl<C: TransportConnector> ConnectionManager<C> {
    pub fn new(
        connector: C,
        dispatcher: Arc<Dispatcher>,
        reconnect_delay: Duration,
        read_buffer_size: usize,
    ) -> Self {
        Self {
            connector,
            dispatcher,
            reconnect_delay,
            read_buffer_size,
            session_id: AtomicU64::new(0),
        }
    }

    /// Get the next session ID
    pub fn next_session_id(&self) -> u64 {
        self.session_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Open one session and run it to completion
    pub async fn run_once(&self) -> anyhow::Result<()> {
        let stream = self.connector.connect().await?;
        let id = self.next_session_id();
        info!("Session {} opened on {}", id, self.connector.describe());
        Session::new(id, stream, self.read_buffer_size)
            .run(&self.dispatcher)
            .await
    }

    /// Main connection loop; never returns
    pub async fn run(&self) {
        loop {
            match self.run_once().await {
                Ok(()) => warn!("Controller connection {} closed", self.connector.describe()),
                Err(e) => error!("Controller connection {} failed: {:#}", self.connector.describe(), e),
            }
            sleep(self.reconnect_delay).await;
        }
    }
}
