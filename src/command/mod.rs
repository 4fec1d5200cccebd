//! Inbound command dispatch for the agent
//!
//! This module handles:
//! - Resolving command identities against the frozen registry
//! - Decoding payloads into typed entities
//! - Forwarding entities to the capability model with a bounded wait
//! - Counting every dropped frame by cause

mod dispatcher;
mod sink;
mod stats;

pub use dispatcher::{DispatchError, Dispatcher};
pub use sink::{CapabilitySink, ForwardError, ModelUpdate};
