//! Dispatch counters

use std::sync::atomic::{AtomicU64, Ordering};
use zwave_protocol::DecodeError;

/// Lock-free counters shared by every dispatch call
#[derive(Debug, Default)]
pub struct DispatchStats {
    dispatched: AtomicU64,
    unknown: AtomicU64,
    truncated: AtomicU64,
    malformed: AtomicU64,
    forward_timeouts: AtomicU64,
    forward_closed: AtomicU64,
}

/// Point-in-time copy of [`DispatchStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchStatsSnapshot {
    pub dispatched: u64,
    pub unknown: u64,
    pub truncated: u64,
    pub malformed: u64,
    pub forward_timeouts: u64,
    pub forward_closed: u64,
}

impl DispatchStatsSnapshot {
    /// Frames that did not reach the capability model
    pub fn dropped(&self) -> u64 {
        self.unknown + self.truncated + self.malformed + self.forward_timeouts + self.forward_closed
    }
}

impl DispatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_dispatched(&self) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_unknown(&self) {
        self.unknown.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_decode_error(&self, error: &DecodeError) {
        let counter = match error {
            DecodeError::TruncatedFrame { .. } => &self.truncated,
            DecodeError::MalformedFrame(_) => &self.malformed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_forward_timeout(&self) {
        self.forward_timeouts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_forward_closed(&self) {
        self.forward_closed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> DispatchStatsSnapshot {
        DispatchStatsSnapshot {
            dispatched: self.dispatched.load(Ordering::Relaxed),
            unknown: self.unknown.load(Ordering::Relaxed),
            truncated: self.truncated.load(Ordering::Relaxed),
            malformed: self.malformed.load(Ordering::Relaxed),
            forward_timeouts: self.forward_timeouts.load(Ordering::Relaxed),
            forward_closed: self.forward_closed.load(Ordering::Relaxed),
        }
    }
}
