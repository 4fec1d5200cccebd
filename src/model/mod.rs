//! Capability model consumed by the dispatcher
//!
//! This module handles:
//! - Attribute storage per device, with capabilities in `base:caps`
//! - Predicates over device capabilities
//! - Mapping decoded entities onto device attributes
//! - The queue-draining task the dispatcher forwards into

mod attributes;
mod devices;
pub mod predicate;
mod updater;

pub use updater::{ChannelSink, ModelUpdater};
