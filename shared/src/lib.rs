//! Z-Wave Protocol Types
//!
//! This crate provides the command identities, typed payload entities,
//! decoders and command registry used to turn inbound Z-Wave frames into
//! strongly-typed values, plus the Serial API framing that carries them.

pub mod commands;
pub mod decoder;
pub mod descriptor;
pub mod encoder;
pub mod entity;
pub mod identity;
pub mod registry;
pub mod serial;

// Re-export commonly used types at crate root
pub use commands::STANDARD_COMMANDS;
pub use decoder::{DecodeContext, DecodeError, Decoder, PayloadReader};
pub use descriptor::CommandDescriptor;
pub use encoder::{EncodeError, Encoder};
pub use entity::*;
pub use identity::CommandIdentity;
pub use registry::{CommandRegistry, RegistryBuilder, RegistryError};

use std::time::{SystemTime, UNIX_EPOCH};

/// Get current timestamp in milliseconds since Unix epoch
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Timing parameters shared by the agent
pub mod timing {
    /// How long dispatch waits for the capability model to accept an update
    pub const FORWARD_TIMEOUT_MS: u64 = 500;

    /// Delay before reopening a lost transport
    pub const RECONNECT_DELAY_MS: u64 = 2000;

    /// Interval between dispatch statistics log lines
    pub const STATS_INTERVAL_MS: u64 = 60_000;
}
