//! Command descriptor: the unit of registration

use std::fmt;

use crate::decoder::{DecodeContext, DecodeError, Decoder};
use crate::encoder::Encoder;
use crate::entity::Entity;
use crate::identity::CommandIdentity;

/// Binds a command identity to its name, decoder and optional encoder
#[derive(Clone, Copy)]
pub struct CommandDescriptor {
    identity: CommandIdentity,
    name: &'static str,
    decoder: &'static dyn Decoder,
    encoder: Option<&'static dyn Encoder>,
}

impl CommandDescriptor {
    pub const fn new(
        identity: CommandIdentity,
        name: &'static str,
        decoder: &'static dyn Decoder,
    ) -> Self {
        Self {
            identity,
            name,
            decoder,
            encoder: None,
        }
    }

    /// Attach the outbound encoder for the same command
    pub const fn with_encoder(self, encoder: &'static dyn Encoder) -> Self {
        Self {
            encoder: Some(encoder),
            ..self
        }
    }

    pub fn identity(&self) -> CommandIdentity {
        self.identity
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn decoder(&self) -> &'static dyn Decoder {
        self.decoder
    }

    pub fn encoder(&self) -> Option<&'static dyn Encoder> {
        self.encoder
    }

    /// Run this command's decoder on a payload
    pub fn decode(&self, payload: &[u8], ctx: &DecodeContext) -> Result<Entity, DecodeError> {
        self.decoder.decode(payload, ctx)
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("identity", &self.identity)
            .field("name", &self.name)
            .field("encodes", &self.encoder.is_some())
            .finish()
    }
}
