//! Boundary between dispatch and the capability model

use async_trait::async_trait;
use thiserror::Error;
use zwave_protocol::{DecodeContext, Entity};

/// A decoded entity tagged with where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct ModelUpdate {
    pub origin: DecodeContext,
    pub entity: Entity,
}

impl ModelUpdate {
    pub fn new(origin: DecodeContext, entity: Entity) -> Self {
        Self { origin, entity }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ForwardError {
    #[error("Capability model is no longer accepting updates")]
    Closed,
}

/// Update entry point of the capability model
///
/// Called at most once per successfully decoded frame. Implementations may
/// wait (e.g. on a full queue); the dispatcher bounds that wait.
#[async_trait]
pub trait CapabilitySink: Send + Sync {
    async fn forward(&self, update: ModelUpdate) -> Result<(), ForwardError>;
}
