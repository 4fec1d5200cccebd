//! Command dispatcher - resolves, decodes and forwards inbound commands

use super::sink::{CapabilitySink, ForwardError, ModelUpdate};
use super::stats::DispatchStats;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, trace, warn};
use zwave_protocol::{CommandIdentity, CommandRegistry, DecodeContext, DecodeError};

/// Why a single frame was dropped; never fatal to the session
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Unknown command {identity} from node {node_id}")]
    UnknownCommand {
        identity: CommandIdentity,
        node_id: u8,
    },

    #[error("Failed to decode {identity} ({payload_len} byte payload): {source}")]
    Decode {
        identity: CommandIdentity,
        payload_len: usize,
        #[source]
        source: DecodeError,
    },

    #[error("Capability model did not accept {identity} within {timeout:?}")]
    ForwardTimeout {
        identity: CommandIdentity,
        timeout: Duration,
    },

    #[error("Capability model closed while forwarding {identity}")]
    ForwardClosed { identity: CommandIdentity },
}

/// Stateless between calls; safe to share across sessions behind an `Arc`
pub struct Dispatcher {
    registry: Arc<CommandRegistry>,
    sink: Arc<dyn CapabilitySink>,
    forward_timeout: Duration,
    stats: Arc<DispatchStats>,
}

impl Dispatcher {
    /// Create a dispatcher over a frozen registry
    pub fn new(
        registry: Arc<CommandRegistry>,
        sink: Arc<dyn CapabilitySink>,
        forward_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            sink,
            forward_timeout,
            stats: Arc::new(DispatchStats::new()),
        }
    }

    pub fn stats(&self) -> Arc<DispatchStats> {
        self.stats.clone()
    }

    /// Decode one command payload and forward the result
    ///
    /// `payload` excludes the command class and command bytes. Returns once
    /// the capability model has accepted the update, or with the reason the
    /// frame was dropped.
    pub async fn dispatch(
        &self,
        class_id: u8,
        command_id: u8,
        payload: &[u8],
        ctx: &DecodeContext,
    ) -> Result<(), DispatchError> {
        let identity = CommandIdentity::new(class_id, command_id);

        let Some(descriptor) = self.registry.lookup(identity) else {
            self.stats.record_unknown();
            debug!("Dropping unknown command {} from node {}", identity, ctx.node_id);
            return Err(DispatchError::UnknownCommand {
                identity,
                node_id: ctx.node_id,
            });
        };

        let entity = match descriptor.decode(payload, ctx) {
            Ok(entity) => entity,
            Err(source) => {
                self.stats.record_decode_error(&source);
                warn!(
                    "Dropping {} ({}) from node {}: {} [{} bytes]",
                    descriptor.name(),
                    identity,
                    ctx.node_id,
                    source,
                    payload.len()
                );
                return Err(DispatchError::Decode {
                    identity,
                    payload_len: payload.len(),
                    source,
                });
            }
        };

        let update = ModelUpdate::new(*ctx, entity);
        match timeout(self.forward_timeout, self.sink.forward(update)).await {
            Ok(Ok(())) => {
                self.stats.record_dispatched();
                trace!("Dispatched {} from node {}", descriptor.name(), ctx.node_id);
                Ok(())
            }
            Ok(Err(ForwardError::Closed)) => {
                self.stats.record_forward_closed();
                warn!("Capability model closed, dropping {}", descriptor.name());
                Err(DispatchError::ForwardClosed { identity })
            }
            Err(_) => {
                self.stats.record_forward_timeout();
                warn!(
                    "Capability model stalled for {:?}, dropping {} from node {}",
                    self.forward_timeout,
                    descriptor.name(),
                    ctx.node_id
                );
                Err(DispatchError::ForwardTimeout {
                    identity,
                    timeout: self.forward_timeout,
                })
            }
        }
    }
}
