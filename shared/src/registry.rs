//! Command registry
//!
//! Built once through [`RegistryBuilder`], then frozen into a read-only
//! [`CommandRegistry`]. The frozen registry has no mutating methods, so it can
//! be shared across threads behind an `Arc` without any lock.

use std::collections::HashMap;

use bytes::{Bytes, BytesMut};
use thiserror::Error;

use crate::commands::STANDARD_COMMANDS;
use crate::descriptor::CommandDescriptor;
use crate::encoder::EncodeError;
use crate::entity::Entity;
use crate::identity::CommandIdentity;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Duplicate command {identity}: '{existing}' already registered, rejected '{rejected}'")]
    DuplicateCommand {
        identity: CommandIdentity,
        existing: &'static str,
        rejected: &'static str,
    },
}

/// Mutable build phase of the registry
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    commands: HashMap<CommandIdentity, CommandDescriptor>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a descriptor, rejecting an identity that is already taken
    pub fn register(&mut self, descriptor: CommandDescriptor) -> Result<&mut Self, RegistryError> {
        let identity = descriptor.identity();
        if let Some(existing) = self.commands.get(&identity) {
            return Err(RegistryError::DuplicateCommand {
                identity,
                existing: existing.name(),
                rejected: descriptor.name(),
            });
        }
        self.commands.insert(identity, descriptor);
        Ok(self)
    }

    /// Register every descriptor from a table, stopping at the first collision
    pub fn register_all<'a>(
        &mut self,
        descriptors: impl IntoIterator<Item = &'a CommandDescriptor>,
    ) -> Result<&mut Self, RegistryError> {
        for descriptor in descriptors {
            self.register(*descriptor)?;
        }
        Ok(self)
    }

    /// Freeze the registry; no further registration is possible
    pub fn build(self) -> CommandRegistry {
        CommandRegistry {
            commands: self.commands,
        }
    }
}

/// Read-only lookup table from command identity to descriptor
#[derive(Debug)]
pub struct CommandRegistry {
    commands: HashMap<CommandIdentity, CommandDescriptor>,
}

impl CommandRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Registry over the built-in command table
    pub fn standard() -> Result<Self, RegistryError> {
        Self::from_descriptors(STANDARD_COMMANDS)
    }

    pub fn from_descriptors<'a>(
        descriptors: impl IntoIterator<Item = &'a CommandDescriptor>,
    ) -> Result<Self, RegistryError> {
        let mut builder = RegistryBuilder::new();
        builder.register_all(descriptors)?;
        Ok(builder.build())
    }

    /// Unknown identities are normal traffic, so absence is not an error
    pub fn lookup(&self, identity: CommandIdentity) -> Option<&CommandDescriptor> {
        self.commands.get(&identity)
    }

    pub fn contains(&self, identity: CommandIdentity) -> bool {
        self.commands.contains_key(&identity)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Registered descriptors, in no particular order
    pub fn descriptors(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.commands.values()
    }

    /// Encode an entity's payload with the encoder registered for its identity
    pub fn encode(&self, entity: &Entity) -> Result<Bytes, EncodeError> {
        let identity = entity.identity();
        let encoder = self
            .lookup(identity)
            .and_then(|d| d.encoder())
            .ok_or(EncodeError::Unsupported(identity))?;

        let mut buf = BytesMut::with_capacity(8);
        encoder.encode(entity, &mut buf)?;
        Ok(buf.freeze())
    }
}
