//! Outbound payload encoding, keyed by the same identities as decoding

use bytes::BytesMut;
use thiserror::Error;

use crate::entity::Entity;
use crate::identity::CommandIdentity;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("No encoder registered for command {0}")]
    Unsupported(CommandIdentity),

    #[error("Encoder for {expected} cannot encode entity of command {actual}")]
    Mismatch {
        expected: CommandIdentity,
        actual: CommandIdentity,
    },

    #[error("Value out of range: {0}")]
    ValueOutOfRange(String),
}

/// Writes the payload of one entity (without class/command bytes)
pub trait Encoder: Send + Sync {
    fn encode(&self, entity: &Entity, buf: &mut BytesMut) -> Result<(), EncodeError>;
}
